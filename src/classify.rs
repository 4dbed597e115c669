//! Entity classification by layer name then color.

use crate::geometry::{Entity, LineCategory};

/// What to do with an entity that was, and remains, unclassified after
/// applying the layer and color tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnclassifiedHandling {
    TreatAsCut,
    TreatAsCrease,
    TreatAsAuxiliary,
    KeepUnknown,
    Skip,
}

/// Statistics from a classification pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationStats {
    pub cut_count: usize,
    pub crease_count: usize,
    pub auxiliary_count: usize,
    pub plywood_count: usize,
    pub unknown_count: usize,
    /// Count of entities that were UNKNOWN before the handling policy was
    /// applied, independent of what the policy then did with them.
    pub originally_unclassified_count: usize,
}

/// Classifies entities by layer-name substring, falling back to color.
///
/// The default layer/color tables mirror the distilled system's defaults;
/// a caller can substitute its own tables per instance — there are no
/// process-wide globals here.
#[derive(Debug, Clone)]
pub struct EntityClassifier {
    layer_patterns: Vec<(LineCategory, Vec<String>)>,
    color_map: Vec<(i32, LineCategory)>,
}

impl Default for EntityClassifier {
    fn default() -> Self {
        Self {
            layer_patterns: vec![
                (
                    LineCategory::Cut,
                    vec!["CUT", "칼", "KNIFE", "DIE"]
                        .into_iter()
                        .map(String::from)
                        .collect(),
                ),
                (
                    LineCategory::Crease,
                    vec!["CREASE", "괘", "FOLD", "SCORE"]
                        .into_iter()
                        .map(String::from)
                        .collect(),
                ),
                (
                    LineCategory::Auxiliary,
                    vec!["AUX", "HELPER", "보조"]
                        .into_iter()
                        .map(String::from)
                        .collect(),
                ),
                (
                    LineCategory::Plywood,
                    vec!["PLYWOOD", "합판", "FRAME", "WOOD"]
                        .into_iter()
                        .map(String::from)
                        .collect(),
                ),
            ],
            color_map: vec![
                (1, LineCategory::Cut),    // red
                (5, LineCategory::Crease), // blue
                (3, LineCategory::Auxiliary), // green
                (7, LineCategory::Plywood),    // white
            ],
        }
    }
}

impl EntityClassifier {
    /// Classifies a single `(layer, color)` pair.
    #[must_use]
    pub fn classify(&self, layer: &str, color: i32) -> LineCategory {
        if !layer.is_empty() && layer != "0" {
            if let Some(category) = self.classify_by_layer(layer) {
                return category;
            }
        }
        self.classify_by_color(color).unwrap_or(LineCategory::Unknown)
    }

    fn classify_by_layer(&self, layer: &str) -> Option<LineCategory> {
        let layer_upper = layer.to_uppercase();
        self.layer_patterns.iter().find_map(|(category, patterns)| {
            patterns
                .iter()
                .any(|p| layer_upper.contains(&p.to_uppercase()))
                .then_some(*category)
        })
    }

    fn classify_by_color(&self, color: i32) -> Option<LineCategory> {
        self.color_map
            .iter()
            .find(|(c, _)| *c == color)
            .map(|(_, category)| *category)
    }

    /// Classifies every entity, sets its category, applies `handling` to
    /// entities that remain UNKNOWN, and returns the result list alongside
    /// the resulting statistics.
    #[must_use]
    pub fn apply_categories(
        &self,
        entities: &[Entity],
        handling: UnclassifiedHandling,
    ) -> (Vec<Entity>, ClassificationStats) {
        let mut output = Vec::with_capacity(entities.len());
        let mut stats = ClassificationStats::default();

        for entity in entities {
            let attrs = entity.attrs();
            let category = self.classify(&attrs.layer, attrs.color);

            if category == LineCategory::Unknown {
                stats.originally_unclassified_count += 1;
            }

            let final_category = if category == LineCategory::Unknown {
                match handling {
                    UnclassifiedHandling::TreatAsCut => LineCategory::Cut,
                    UnclassifiedHandling::TreatAsCrease => LineCategory::Crease,
                    UnclassifiedHandling::TreatAsAuxiliary => LineCategory::Auxiliary,
                    UnclassifiedHandling::KeepUnknown => LineCategory::Unknown,
                    UnclassifiedHandling::Skip => continue,
                }
            } else {
                category
            };

            match final_category {
                LineCategory::Cut => stats.cut_count += 1,
                LineCategory::Crease => stats.crease_count += 1,
                LineCategory::Auxiliary => stats.auxiliary_count += 1,
                LineCategory::Plywood => stats.plywood_count += 1,
                LineCategory::Unknown => stats.unknown_count += 1,
            }

            output.push(entity.with_category(final_category));
        }

        (output, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Attributes, Entity, EntityId, Line, Point};

    fn line_with(layer: &str, color: i32) -> Entity {
        Entity::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Attributes {
                id: EntityId::fresh(),
                layer: layer.to_string(),
                color,
                linetype: "CONTINUOUS".to_string(),
                category: LineCategory::Unknown,
            },
        ))
    }

    #[test]
    fn layer_pattern_match_is_case_insensitive() {
        let classifier = EntityClassifier::default();
        assert_eq!(classifier.classify("my_cut_layer", 7), LineCategory::Cut);
        assert_eq!(classifier.classify("MY-Knife-Line", 7), LineCategory::Cut);
    }

    #[test]
    fn layer_takes_priority_over_color() {
        // Scenario: non-default layer matches CUT, but color maps to CREASE (blue=5).
        let classifier = EntityClassifier::default();
        assert_eq!(classifier.classify("CUT_LAYER", 5), LineCategory::Cut);
    }

    #[test]
    fn default_layer_falls_back_to_color() {
        let classifier = EntityClassifier::default();
        assert_eq!(classifier.classify("0", 1), LineCategory::Cut);
        assert_eq!(classifier.classify("", 5), LineCategory::Crease);
    }

    #[test]
    fn no_match_is_unknown() {
        let classifier = EntityClassifier::default();
        assert_eq!(classifier.classify("MISC", 99), LineCategory::Unknown);
    }

    #[test]
    fn scan_order_is_cut_then_crease_then_auxiliary_then_plywood() {
        // A layer name containing both a CUT and CREASE substring should
        // resolve to CUT, since CUT is scanned first.
        let classifier = EntityClassifier::default();
        assert_eq!(classifier.classify("CUT_CREASE_LAYER", 7), LineCategory::Cut);
    }

    #[test]
    fn skip_policy_removes_unknown_entities() {
        let classifier = EntityClassifier::default();
        let entities = vec![line_with("MISC", 99), line_with("CUT", 7)];
        let (output, stats) = classifier.apply_categories(&entities, UnclassifiedHandling::Skip);
        assert_eq!(output.len(), 1);
        assert_eq!(stats.originally_unclassified_count, 1);
    }

    #[test]
    fn treat_as_cut_policy_promotes_unknown() {
        let classifier = EntityClassifier::default();
        let entities = vec![line_with("MISC", 99)];
        let (output, stats) =
            classifier.apply_categories(&entities, UnclassifiedHandling::TreatAsCut);
        assert_eq!(output[0].category(), LineCategory::Cut);
        assert_eq!(stats.cut_count, 1);
        assert_eq!(stats.originally_unclassified_count, 1);
    }
}
