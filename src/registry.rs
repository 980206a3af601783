use std::collections::HashMap;

use crate::models::{Dimension, RawMonthRecord};

const KNOWN_COLORS: [(&str, &str); 8] = [
    ("emotional", "#FB7185"),
    ("physical", "#F97316"),
    ("social", "#FACC15"),
    ("intellectual", "#60A5FA"),
    ("spiritual", "#A78BFA"),
    ("financial", "#10B981"),
    ("environmental", "#34D399"),
    ("vocational", "#4F46E5"),
];

const FALLBACK_PALETTE: [&str; 8] = [
    "#4F46E5", "#22C55E", "#F59E0B", "#3B82F6", "#EC4899", "#10B981", "#8B5CF6", "#EF4444",
];

/// Stable identifier for a backend dimension name.
pub fn dimension_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Every dimension seen during a session, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct DimensionRegistry {
    dimensions: Vec<Dimension>,
    index: HashMap<String, usize>,
}

impl DimensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records any dimension not seen before. Existing entries keep their
    /// position and colour.
    pub fn register<'a, I>(&mut self, records: I) -> &[Dimension]
    where
        I: IntoIterator<Item = &'a RawMonthRecord>,
    {
        for record in records {
            for entry in &record.entries {
                let key = dimension_key(&entry.dimension_name);
                if key.is_empty() || self.index.contains_key(&key) {
                    continue;
                }

                let color = entry
                    .color
                    .clone()
                    .unwrap_or_else(|| fallback_color(&key, self.dimensions.len()));
                self.index.insert(key.clone(), self.dimensions.len());
                self.dimensions.push(Dimension {
                    key,
                    label: entry.dimension_name.trim().to_string(),
                    color,
                });
            }
        }

        &self.dimensions
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn get(&self, key: &str) -> Option<&Dimension> {
        self.index.get(key).map(|&position| &self.dimensions[position])
    }

    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }
}

fn fallback_color(key: &str, position: usize) -> String {
    KNOWN_COLORS
        .iter()
        .find(|(known, _)| *known == key)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_PALETTE[position % FALLBACK_PALETTE.len()])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawEntry;

    fn record(entries: &[(&str, Option<&str>)]) -> RawMonthRecord {
        RawMonthRecord {
            entries: entries
                .iter()
                .map(|(name, color)| RawEntry {
                    dimension_name: name.to_string(),
                    percentage: 50.0,
                    color: color.map(str::to_string),
                })
                .collect(),
        }
    }

    fn keys(registry: &DimensionRegistry) -> Vec<&str> {
        registry
            .dimensions()
            .iter()
            .map(|dimension| dimension.key.as_str())
            .collect()
    }

    #[test]
    fn registers_in_first_seen_order() {
        let mut registry = DimensionRegistry::new();
        let batch = vec![
            record(&[("Social", None), ("Emotional", None)]),
            record(&[("Emotional", None), ("Physical", None)]),
        ];
        registry.register(&batch);
        assert_eq!(keys(&registry), vec!["social", "emotional", "physical"]);
    }

    #[test]
    fn registering_twice_is_idempotent() {
        let mut registry = DimensionRegistry::new();
        let batch = vec![record(&[("Social", None), ("Emotional", None)])];
        registry.register(&batch);
        let first = registry.dimensions().to_vec();
        registry.register(&batch);
        assert_eq!(registry.dimensions(), first.as_slice());
    }

    #[test]
    fn dimensions_are_never_removed() {
        let mut registry = DimensionRegistry::new();
        registry.register(&[record(&[("Social", None), ("Emotional", None)])]);
        registry.register(&[record(&[("Physical", None)])]);
        assert_eq!(keys(&registry), vec!["social", "emotional", "physical"]);
    }

    #[test]
    fn backend_color_wins_on_first_sighting() {
        let mut registry = DimensionRegistry::new();
        registry.register(&[record(&[("Emotional", Some("#123456"))])]);
        registry.register(&[record(&[("Emotional", Some("#654321"))])]);
        assert_eq!(registry.get("emotional").unwrap().color, "#123456");
    }

    #[test]
    fn fallback_colors_are_deterministic() {
        let mut registry = DimensionRegistry::new();
        registry.register(&[record(&[("Physical", None), ("Mindfulness", None)])]);
        assert_eq!(registry.get("physical").unwrap().color, "#F97316");
        assert_eq!(registry.get("mindfulness").unwrap().color, "#22C55E");
    }

    #[test]
    fn names_differing_only_in_case_share_a_key() {
        let mut registry = DimensionRegistry::new();
        registry.register(&[record(&[("Emotional", None), ("emotional ", None)])]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("emotional").unwrap().label, "Emotional");
    }
}
