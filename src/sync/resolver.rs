//! # Mapping Resolver
//!
//! Pure transform from one site's mappings (joined with their content items)
//! to the effective item list delivered to that destination.
//!
//! Inclusion rule: a mapping contributes an item iff its mode is not `block`
//! and the joined item is published. Drafts and archived items never
//! syndicate, whatever their mapping mode says. Input order is preserved.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::MappingMode;
use crate::models::{content_item, site_item_mapping};

/// Item status eligible for syndication.
const STATUS_PUBLISHED: &str = "published";

/// One mapping row joined with its content item, scoped to a single site.
#[derive(Debug, Clone)]
pub struct MappedItem {
    pub mapping: site_item_mapping::Model,
    pub item: Option<content_item::Model>,
}

impl From<(site_item_mapping::Model, Option<content_item::Model>)> for MappedItem {
    fn from((mapping, item): (site_item_mapping::Model, Option<content_item::Model>)) -> Self {
        Self { mapping, item }
    }
}

/// One entry of the effective per-site item list.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedItem {
    pub id: Uuid,
    pub title: String,
    pub data: JsonValue,
    pub mode: MappingMode,
}

/// The per-site payload produced from the resolved item list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePayload {
    pub items: Vec<ResolvedItem>,
    pub synced_at: DateTime<Utc>,
    pub version: String,
}

impl SitePayload {
    pub fn new(items: Vec<ResolvedItem>) -> Self {
        Self {
            items,
            synced_at: Utc::now(),
            version: super::PAYLOAD_VERSION.to_string(),
        }
    }
}

/// Resolve one site's mappings into the effective item list.
///
/// No side effects; the output order is the input order.
pub fn resolve(rows: &[MappedItem]) -> Vec<ResolvedItem> {
    rows.iter()
        .filter_map(|row| {
            let mode = MappingMode::parse(&row.mapping.mode);
            if mode == MappingMode::Block {
                return None;
            }

            let item = row.item.as_ref()?;
            if item.status != STATUS_PUBLISHED {
                return None;
            }

            let data = match mode {
                MappingMode::Override => shallow_merge(&item.data, &row.mapping.overrides),
                _ => item.data.clone(),
            };

            Some(ResolvedItem {
                id: item.id,
                title: item.title.clone(),
                data,
                mode,
            })
        })
        .collect()
}

/// Shallow merge: every key of `overrides` wins over the same key in `base`;
/// all other base keys pass through untouched. Non-object overrides are
/// treated as empty.
fn shallow_merge(base: &JsonValue, overrides: &JsonValue) -> JsonValue {
    let mut merged = base.as_object().cloned().unwrap_or_default();

    if let Some(override_map) = overrides.as_object() {
        for (key, value) in override_map {
            merged.insert(key.clone(), value.clone());
        }
    }

    JsonValue::Object(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(mode: &str, overrides: JsonValue) -> site_item_mapping::Model {
        let now = Utc::now().fixed_offset();
        site_item_mapping::Model {
            id: Uuid::new_v4(),
            site_id: Uuid::new_v4(),
            content_item_id: Uuid::new_v4(),
            mode: mode.to_string(),
            overrides,
            created_at: now,
            updated_at: now,
        }
    }

    fn item(status: &str, title: &str, data: JsonValue) -> content_item::Model {
        let now = Utc::now().fixed_offset();
        content_item::Model {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            content_type_id: Uuid::new_v4(),
            title: title.to_string(),
            data,
            status: status.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn row(mode: &str, overrides: JsonValue, item: Option<content_item::Model>) -> MappedItem {
        MappedItem {
            mapping: mapping(mode, overrides),
            item,
        }
    }

    #[test]
    fn full_mode_passes_item_data_unchanged() {
        let data = json!({"headline": "Summer Sale", "cta": "Shop now"});
        let rows = vec![row("full", json!({}), Some(item("published", "Sale", data.clone())))];

        let resolved = resolve(&rows);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].data, data);
        assert_eq!(resolved[0].mode, MappingMode::Full);
        assert_eq!(resolved[0].title, "Sale");
    }

    #[test]
    fn override_mode_merges_with_override_keys_winning() {
        let rows = vec![row(
            "override",
            json!({"headline": "Local Deal", "badge": "NEW"}),
            Some(item(
                "published",
                "Sale",
                json!({"headline": "Summer Sale", "cta": "Shop now"}),
            )),
        )];

        let resolved = resolve(&rows);

        assert_eq!(resolved.len(), 1);
        assert_eq!(
            resolved[0].data,
            json!({"headline": "Local Deal", "cta": "Shop now", "badge": "NEW"})
        );
        assert_eq!(resolved[0].mode, MappingMode::Override);
    }

    #[test]
    fn blocked_mapping_is_always_excluded() {
        let rows = vec![
            row(
                "block",
                json!({}),
                Some(item("published", "Blocked", json!({"a": 1}))),
            ),
            row(
                "full",
                json!({}),
                Some(item("published", "Kept", json!({"b": 2}))),
            ),
        ];

        let resolved = resolve(&rows);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].title, "Kept");
    }

    #[test]
    fn unpublished_items_never_syndicate_regardless_of_mode() {
        for status in ["draft", "archived"] {
            for mode in ["full", "override"] {
                let rows = vec![row(
                    mode,
                    json!({"headline": "x"}),
                    Some(item(status, "Hidden", json!({"a": 1}))),
                )];
                assert!(
                    resolve(&rows).is_empty(),
                    "{} item with mode {} must be excluded",
                    status,
                    mode
                );
            }
        }
    }

    #[test]
    fn missing_joined_item_is_excluded() {
        let rows = vec![row("full", json!({}), None)];
        assert!(resolve(&rows).is_empty());
    }

    #[test]
    fn input_order_is_preserved() {
        let rows = vec![
            row("full", json!({}), Some(item("published", "first", json!({})))),
            row("full", json!({}), Some(item("published", "second", json!({})))),
            row("full", json!({}), Some(item("published", "third", json!({})))),
        ];

        let titles: Vec<String> = resolve(&rows).into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn override_of_non_object_overrides_is_ignored() {
        let rows = vec![row(
            "override",
            json!(null),
            Some(item("published", "Sale", json!({"headline": "Summer Sale"}))),
        )];

        let resolved = resolve(&rows);
        assert_eq!(resolved[0].data, json!({"headline": "Summer Sale"}));
    }
}
