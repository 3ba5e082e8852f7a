//! # Collapse Policy
//!
//! Destinations accept one content object per delivery, so the resolved item
//! list collapses to a single document before signing. The policy is explicit
//! and configurable: `first-wins` keeps only the first resolved item's data;
//! `merge-all` deep-merges every item's data in mapping order, later items
//! winning per key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::resolver::ResolvedItem;

/// How a resolved item list collapses into the delivered content object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollapsePolicy {
    FirstWins,
    MergeAll,
}

impl CollapsePolicy {
    /// Parse a configured policy string, if recognized.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "first-wins" => Some(CollapsePolicy::FirstWins),
            "merge-all" => Some(CollapsePolicy::MergeAll),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CollapsePolicy::FirstWins => "first-wins",
            CollapsePolicy::MergeAll => "merge-all",
        }
    }
}

impl Default for CollapsePolicy {
    fn default() -> Self {
        CollapsePolicy::FirstWins
    }
}

/// Collapse the resolved item list into the single delivered content object.
///
/// An empty item list collapses to an empty object under either policy.
pub fn collapse(items: &[ResolvedItem], policy: CollapsePolicy) -> JsonValue {
    match policy {
        CollapsePolicy::FirstWins => items
            .first()
            .map(|item| item.data.clone())
            .unwrap_or_else(|| JsonValue::Object(Map::new())),
        CollapsePolicy::MergeAll => {
            let mut merged = JsonValue::Object(Map::new());
            for item in items {
                deep_merge(&mut merged, &item.data);
            }
            merged
        }
    }
}

/// Recursively merge `incoming` into `base`. Objects merge per key; any other
/// value replaces the base value outright.
fn deep_merge(base: &mut JsonValue, incoming: &JsonValue) {
    match (base, incoming) {
        (JsonValue::Object(base_map), JsonValue::Object(incoming_map)) => {
            for (key, value) in incoming_map {
                deep_merge(
                    base_map.entry(key.clone()).or_insert(JsonValue::Null),
                    value,
                );
            }
        }
        (base_slot, incoming_value) => {
            *base_slot = incoming_value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::MappingMode;
    use serde_json::json;
    use uuid::Uuid;

    fn resolved(data: JsonValue) -> ResolvedItem {
        ResolvedItem {
            id: Uuid::new_v4(),
            title: "item".to_string(),
            data,
            mode: MappingMode::Full,
        }
    }

    #[test]
    fn parse_recognizes_both_policies() {
        assert_eq!(CollapsePolicy::parse("first-wins"), Some(CollapsePolicy::FirstWins));
        assert_eq!(CollapsePolicy::parse("merge-all"), Some(CollapsePolicy::MergeAll));
        assert_eq!(CollapsePolicy::parse("other"), None);
    }

    #[test]
    fn empty_list_collapses_to_empty_object() {
        assert_eq!(collapse(&[], CollapsePolicy::FirstWins), json!({}));
        assert_eq!(collapse(&[], CollapsePolicy::MergeAll), json!({}));
    }

    #[test]
    fn first_wins_keeps_only_the_first_item() {
        let items = vec![
            resolved(json!({"headline": "First", "cta": "Go"})),
            resolved(json!({"headline": "Second", "extra": true})),
        ];

        assert_eq!(
            collapse(&items, CollapsePolicy::FirstWins),
            json!({"headline": "First", "cta": "Go"})
        );
    }

    #[test]
    fn merge_all_later_items_win_per_key() {
        let items = vec![
            resolved(json!({"headline": "First", "cta": "Go"})),
            resolved(json!({"headline": "Second", "extra": true})),
        ];

        assert_eq!(
            collapse(&items, CollapsePolicy::MergeAll),
            json!({"headline": "Second", "cta": "Go", "extra": true})
        );
    }

    #[test]
    fn merge_all_merges_nested_objects() {
        let items = vec![
            resolved(json!({"location": {"city": "Lisbon", "hours": "9-5"}})),
            resolved(json!({"location": {"hours": "24/7"}})),
        ];

        assert_eq!(
            collapse(&items, CollapsePolicy::MergeAll),
            json!({"location": {"city": "Lisbon", "hours": "24/7"}})
        );
    }
}
