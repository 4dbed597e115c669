//! External-element removal: drops entities wholly outside the plywood
//! frame once layout is finalized.

use std::collections::HashSet;

use crate::geometry::{BoundingBox, Entity, LineCategory, Transformable};

/// How to treat entities that fall wholly outside the plywood bbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalMode {
    RemoveAll,
    KeepAuxiliary,
    KeepText,
    /// The caller performs interactive confirmation; nothing is removed
    /// here.
    ConfirmEach,
}

/// The result of a removal pass.
#[derive(Debug, Clone)]
pub struct RemovalResult {
    pub kept_entities: Vec<Entity>,
    pub removed_count: usize,
}

/// Settings controlling the always-preserved keep set, independent of
/// `RemovalMode`.
#[derive(Debug, Clone)]
pub struct RemovalSettings {
    pub exclude_layers: HashSet<String>,
    pub keep_categories: HashSet<LineCategory>,
}

impl Default for RemovalSettings {
    fn default() -> Self {
        Self {
            exclude_layers: ["PLYWOOD", "TEXT"].into_iter().map(String::from).collect(),
            keep_categories: [LineCategory::Plywood].into_iter().collect(),
        }
    }
}

impl RemovalSettings {
    fn is_in_keep_set(&self, entity: &Entity) -> bool {
        let layer_upper = entity.attrs().layer.to_uppercase();
        self.exclude_layers
            .iter()
            .any(|l| l.to_uppercase() == layer_upper)
            || self.keep_categories.contains(&entity.category())
    }
}

fn is_wholly_outside(entity: &Entity, plywood_bbox: BoundingBox) -> bool {
    let bbox = entity.bbox();
    bbox.max_x < plywood_bbox.min_x
        || bbox.min_x > plywood_bbox.max_x
        || bbox.max_y < plywood_bbox.min_y
        || bbox.min_y > plywood_bbox.max_y
}

/// Removes entities wholly outside `plywood_bbox` according to `mode`,
/// always preserving the keep set defined by `settings`.
#[must_use]
pub fn remove_external_elements(
    entities: &[Entity],
    plywood_bbox: BoundingBox,
    mode: RemovalMode,
    settings: &RemovalSettings,
) -> RemovalResult {
    if mode == RemovalMode::ConfirmEach {
        return RemovalResult {
            kept_entities: entities.to_vec(),
            removed_count: 0,
        };
    }

    let mut kept = Vec::with_capacity(entities.len());
    let mut removed_count = 0;

    for entity in entities {
        if settings.is_in_keep_set(entity) || !is_wholly_outside(entity, plywood_bbox) {
            kept.push(entity.clone());
            continue;
        }

        let exempt = match mode {
            RemovalMode::RemoveAll => false,
            RemovalMode::KeepAuxiliary => entity.category() == LineCategory::Auxiliary,
            RemovalMode::KeepText => matches!(entity, Entity::Text(_)),
            RemovalMode::ConfirmEach => unreachable!("handled above"),
        };

        if exempt {
            kept.push(entity.clone());
        } else {
            removed_count += 1;
        }
    }

    RemovalResult {
        kept_entities: kept,
        removed_count,
    }
}
