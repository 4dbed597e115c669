//! The fixed-order orchestrator: wires every stage (connector, polyline
//! decomposer, classifier, bridge calculator, plywood, straight-knife,
//! text, remover) into one deterministic pass over an entity list.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::bridge::{apply_bridges, BridgeSettings};
use crate::classify::{EntityClassifier, UnclassifiedHandling};
use crate::connector::SegmentConnector;
use crate::geometry::{BoundingBox, Entity, LineCategory, Transformable};
use crate::knife::{self, StraightKnifeSettings};
use crate::paper_size::PaperSize;
use crate::plywood::{self, PlateType, PlywoodSettings};
use crate::polyline_decompose;
use crate::remover::{self, RemovalMode, RemovalSettings};
use crate::text_gen::{self, JobInfo, Side};

/// The single parameter to [`process_drawing`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingOptions {
    pub side: Side,
    pub plate_type: PlateType,
    pub apply_bridges: bool,
    pub generate_plywood: bool,
    pub generate_text: bool,
    pub apply_straight_knife: bool,
    pub remove_external: bool,
    pub connect_segments: bool,
    pub decompose_polylines: bool,
    pub job_info: Option<JobInfo>,
    pub paper_size: Option<PaperSize>,
    pub cut_bridge_settings: BridgeSettings,
    pub crease_bridge_settings: BridgeSettings,
    pub connection_tolerance: f64,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            side: Side::Front,
            plate_type: PlateType::Auto,
            apply_bridges: true,
            generate_plywood: true,
            generate_text: false,
            apply_straight_knife: true,
            remove_external: true,
            connect_segments: true,
            decompose_polylines: true,
            job_info: None,
            paper_size: None,
            cut_bridge_settings: BridgeSettings::for_cut(),
            crease_bridge_settings: BridgeSettings::for_crease(),
            connection_tolerance: crate::math::DEFAULT_CONNECTION_TOLERANCE,
        }
    }
}

/// Per-category entity counts in the final output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineStatistics {
    pub cut_count: usize,
    pub crease_count: usize,
    pub auxiliary_count: usize,
    pub plywood_count: usize,
    pub text_count: usize,
    pub unknown_count: usize,
}

/// The output of [`process_drawing`].
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    pub entities: Vec<Entity>,
    pub success: bool,
    pub message: String,
    pub statistics: PipelineStatistics,
    pub removed_count: usize,
    pub connection_count: usize,
    pub polyline_count: usize,
}

fn compute_statistics(entities: &[Entity]) -> PipelineStatistics {
    let mut stats = PipelineStatistics::default();
    for entity in entities {
        if matches!(entity, Entity::Text(_)) {
            stats.text_count += 1;
            continue;
        }
        match entity.category() {
            LineCategory::Cut => stats.cut_count += 1,
            LineCategory::Crease => stats.crease_count += 1,
            LineCategory::Auxiliary => stats.auxiliary_count += 1,
            LineCategory::Plywood => stats.plywood_count += 1,
            LineCategory::Unknown => stats.unknown_count += 1,
        }
    }
    stats
}

fn non_plywood_bbox(entities: &[Entity]) -> Option<BoundingBox> {
    entities
        .iter()
        .filter(|e| e.category() != LineCategory::Plywood)
        .map(Transformable::bbox)
        .reduce(|a, b| a.union(b))
}

/// Runs the full fixed-order pipeline over `entities` with `options`.
#[instrument(skip(entities, options), fields(input_count = entities.len()))]
#[must_use]
pub fn process_drawing(entities: &[Entity], options: &ProcessingOptions) -> ProcessingResult {
    if entities.is_empty() {
        debug!(target: "diecut::pipeline", stage = "empty-input", count = 0);
        return ProcessingResult {
            entities: Vec::new(),
            success: true,
            message: "no entities to process".to_string(),
            statistics: PipelineStatistics::default(),
            removed_count: 0,
            connection_count: 0,
            polyline_count: 0,
        };
    }

    let mut current = entities.to_vec();
    let mut connection_count = 0;
    let mut polyline_count = 0;

    if options.connect_segments {
        let connector = SegmentConnector {
            tolerance: options.connection_tolerance,
            ..SegmentConnector::default()
        };
        let result = connector.connect_segments(&current);
        current = result.connected_entities;
        connection_count = result.connection_count;
        debug!(target: "diecut::pipeline", stage = "connect_segments", count = current.len());
    }

    if options.decompose_polylines {
        polyline_count = polyline_decompose::count_polylines(&current);
        current = polyline_decompose::decompose_all(&current);
        debug!(target: "diecut::pipeline", stage = "decompose_polylines", count = current.len());
    }

    let classifier = EntityClassifier::default();
    let (classified, _stats) = classifier.apply_categories(&current, UnclassifiedHandling::KeepUnknown);
    current = classified;
    debug!(target: "diecut::pipeline", stage = "classify", count = current.len());

    if options.apply_bridges {
        current = current
            .into_iter()
            .flat_map(|entity| match &entity {
                Entity::Line(line) if line.attrs.category == LineCategory::Cut => {
                    apply_bridges(line, &options.cut_bridge_settings)
                        .into_iter()
                        .map(Entity::Line)
                        .collect::<Vec<_>>()
                }
                Entity::Line(line) if line.attrs.category == LineCategory::Crease => {
                    apply_bridges(line, &options.crease_bridge_settings)
                        .into_iter()
                        .map(Entity::Line)
                        .collect::<Vec<_>>()
                }
                _ => vec![entity],
            })
            .collect();
        debug!(target: "diecut::pipeline", stage = "apply_bridges", count = current.len());
    }

    if options.side == Side::Front {
        if let Some(bbox) = current
            .iter()
            .map(Transformable::bbox)
            .reduce(|a, b| a.union(b))
        {
            let axis = bbox.center().x;
            current = current.iter().map(|e| e.mirror_x(axis)).collect();
        }
        debug!(target: "diecut::pipeline", stage = "mirror_front", count = current.len());
    }

    let mut plywood_bbox: Option<BoundingBox> = None;
    let mut drawing_bbox: Option<BoundingBox> = None;

    if options.generate_plywood {
        drawing_bbox = non_plywood_bbox(&current);
        if let Some(d_bbox) = drawing_bbox {
            let (frame_lines, p_bbox) = if let Some(paper_size) = &options.paper_size {
                let p_bbox = paper_size.bbox();
                (plywood::generate_rectangle(p_bbox), p_bbox)
            } else {
                let settings = PlywoodSettings::for_plate_type(options.plate_type);
                plywood::generate_with_margins(d_bbox, &settings)
            };
            current.extend(frame_lines.into_iter().map(Entity::Line));
            plywood_bbox = Some(p_bbox);
        }
        debug!(target: "diecut::pipeline", stage = "generate_plywood", count = current.len());
    }

    if options.apply_straight_knife {
        if let (Some(d_bbox), Some(p_bbox)) = (drawing_bbox, plywood_bbox) {
            let knife_settings = StraightKnifeSettings {
                apply_bridges: options.apply_bridges,
                bridge_settings: options.cut_bridge_settings,
            };
            let knives = knife::generate_at_center(d_bbox, p_bbox, &knife_settings);
            current.extend(knives.into_iter().map(Entity::Line));
        }
        debug!(target: "diecut::pipeline", stage = "apply_straight_knife", count = current.len());
    }

    if options.generate_text {
        if let (Some(job_info), Some(p_bbox)) = (&options.job_info, plywood_bbox) {
            let texts = text_gen::generate_positioned_texts(job_info, p_bbox, 10.0, 5.0, 1.5);
            current.extend(texts);
        }
        debug!(target: "diecut::pipeline", stage = "generate_text", count = current.len());
    }

    let mut removed_count = 0;
    if options.remove_external {
        if let Some(p_bbox) = plywood_bbox {
            let result = remover::remove_external_elements(
                &current,
                p_bbox,
                RemovalMode::RemoveAll,
                &RemovalSettings::default(),
            );
            current = result.kept_entities;
            removed_count = result.removed_count;
        }
        debug!(target: "diecut::pipeline", stage = "remove_external", count = current.len());
    }

    let statistics = compute_statistics(&current);
    debug!(target: "diecut::pipeline", stage = "statistics", count = current.len());

    ProcessingResult {
        entities: current,
        success: true,
        message: "ok".to_string(),
        statistics,
        removed_count,
        connection_count,
        polyline_count,
    }
}
