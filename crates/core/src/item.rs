//! The item record, its typed category view, and the create/update form.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::CoreError;
use crate::registry::{RegistryEntry, RegistryValueType, ValueName};
use crate::types::{EpochMillis, ItemId};

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// One stored prompt, snippet, registry entry or note.
///
/// This is the flat wire and storage shape. Category-specific fields are kept
/// even when the category does not use them, so switching an item's category
/// back and forth never loses data. Use [`Item::payload`] for logic that
/// depends on the category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: EpochMillis,
    pub updated_at: EpochMillis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_type: Option<String>,
}

/// Category-keyed view of an item's meaningful fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemPayload<'a> {
    Prompt,
    Code { language: Option<&'a str> },
    Registry(RegistryEntry<'a>),
    Note,
}

impl Item {
    pub fn payload(&self) -> ItemPayload<'_> {
        match self.category {
            Category::Prompt => ItemPayload::Prompt,
            Category::Note => ItemPayload::Note,
            Category::Code => ItemPayload::Code {
                language: non_blank(self.language.as_deref()),
            },
            Category::Registry => ItemPayload::Registry(self.registry_entry()),
        }
    }

    /// Registry declaration for this item. The value name falls back to the
    /// title when `registryName` is absent or blank.
    fn registry_entry(&self) -> RegistryEntry<'_> {
        let name = non_blank(self.registry_name.as_deref()).unwrap_or(self.title.as_str());
        RegistryEntry {
            path: self.registry_path.as_deref().map(str::trim).unwrap_or(""),
            name: ValueName::parse(name),
            value_type: RegistryValueType::from_stored(self.registry_type.as_deref()),
            raw: &self.content,
        }
    }

    /// Case-insensitive substring match against title, content and tags.
    /// `term_lower` must already be lower-cased.
    pub fn matches_search(&self, term_lower: &str) -> bool {
        term_lower.is_empty()
            || self.title.to_lowercase().contains(term_lower)
            || self.content.to_lowercase().contains(term_lower)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(term_lower))
    }

    /// Structural checks applied before an item is accepted into the store.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::Validation("Item id must not be empty".into()));
        }
        if self.title.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Item '{}' must have a non-empty title",
                self.id
            )));
        }
        if let Some(dup) = first_duplicate(&self.tags) {
            return Err(CoreError::Validation(format!(
                "Item '{}' has duplicate tag '{dup}'",
                self.id
            )));
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn first_duplicate(tags: &[String]) -> Option<&str> {
    tags.iter()
        .enumerate()
        .find(|&(i, tag)| tags[..i].contains(tag))
        .map(|(_, tag)| tag.as_str())
}

/// Trim tags, drop empties, and drop repeats keeping the first occurrence.
pub fn normalize_tags<I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// Create/update input. `id` present means "update that item".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemForm {
    #[serde(default)]
    pub id: Option<ItemId>,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub registry_path: Option<String>,
    #[serde(default)]
    pub registry_name: Option<String>,
    #[serde(default)]
    pub registry_type: Option<String>,
}

impl ItemForm {
    /// Title and content are required.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.title.trim().is_empty() {
            return Err(CoreError::Validation("Title is required".into()));
        }
        if self.content.trim().is_empty() {
            return Err(CoreError::Validation("Content is required".into()));
        }
        Ok(())
    }

    /// Build a brand-new item.
    pub fn into_new_item(self, id: ItemId, now: EpochMillis) -> Item {
        Item {
            id,
            title: self.title,
            content: self.content,
            description: self.description,
            category: self.category,
            tags: normalize_tags(self.tags),
            created_at: now,
            updated_at: now,
            language: self.language,
            registry_path: self.registry_path,
            registry_name: self.registry_name,
            registry_type: self.registry_type,
        }
    }

    /// Overwrite every editable field of `existing`, keeping its id and
    /// creation time and bumping `updated_at`.
    pub fn apply_to(self, existing: &Item, now: EpochMillis) -> Item {
        let mut item = self.into_new_item(existing.id.clone(), now);
        item.created_at = existing.created_at;
        item
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::registry::RegistryData;

    fn registry_item() -> Item {
        Item {
            id: "r1".into(),
            title: "EnableFeature".into(),
            content: "255".into(),
            description: None,
            category: Category::Registry,
            tags: vec![],
            created_at: 1,
            updated_at: 1,
            language: Some("python".into()),
            registry_path: Some(r" HKEY_CURRENT_USER\Software\App ".into()),
            registry_name: None,
            registry_type: Some("REG_DWORD".into()),
        }
    }

    #[test]
    fn deserializes_camel_case_wire_format() {
        let json = r#"{
            "id": "1",
            "title": "Hook",
            "content": "x",
            "category": "CODE",
            "tags": ["react", "hooks"],
            "createdAt": 10,
            "updatedAt": 20,
            "language": "typescript"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.category, Category::Code);
        assert_eq!(item.tags, vec!["react", "hooks"]);
        assert_eq!(item.updated_at, 20);
        assert_eq!(item.registry_path, None);

        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["createdAt"], 10);
        assert!(back.get("registryPath").is_none());
    }

    #[test]
    fn registry_payload_falls_back_to_title() {
        let item = registry_item();
        let entry = assert_matches!(item.payload(), ItemPayload::Registry(e) => e);
        assert_eq!(entry.path, r"HKEY_CURRENT_USER\Software\App");
        assert_eq!(entry.name, ValueName::Named("EnableFeature"));
        assert_eq!(entry.data(), RegistryData::Dword(255));
    }

    #[test]
    fn category_switch_preserves_foreign_fields() {
        let mut item = registry_item();
        item.category = Category::Code;
        assert_matches!(
            item.payload(),
            ItemPayload::Code {
                language: Some("python")
            }
        );
        assert!(item.registry_path.is_some());
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let mut item = registry_item();
        item.tags = vec!["Windows".into()];
        assert!(item.matches_search("enable"));
        assert!(item.matches_search("255"));
        assert!(item.matches_search("wind"));
        assert!(item.matches_search(""));
        assert!(!item.matches_search("linux"));
    }

    #[test]
    fn validate_rejects_blank_title_and_duplicate_tags() {
        let mut item = registry_item();
        item.title = "  ".into();
        assert_matches!(item.validate(), Err(CoreError::Validation(_)));

        let mut item = registry_item();
        item.tags = vec!["a".into(), "b".into(), "a".into()];
        let err = item.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate tag 'a'"));
    }

    #[test]
    fn normalize_tags_keeps_first_occurrence() {
        let tags = normalize_tags(
            ["rust", " cli ", "", "rust", "cli"]
                .into_iter()
                .map(String::from),
        );
        assert_eq!(tags, vec!["rust", "cli"]);
    }

    #[test]
    fn form_requires_title_and_content() {
        let form = ItemForm {
            title: "t".into(),
            ..Default::default()
        };
        assert_matches!(form.validate(), Err(CoreError::Validation(msg)) if msg.contains("Content"));
    }

    #[test]
    fn apply_keeps_id_and_created_at() {
        let existing = registry_item();
        let form = ItemForm {
            id: Some("ignored".into()),
            title: "Renamed".into(),
            content: "1".into(),
            category: Category::Registry,
            ..Default::default()
        };
        let updated = form.apply_to(&existing, 99);
        assert_eq!(updated.id, "r1");
        assert_eq!(updated.created_at, 1);
        assert_eq!(updated.updated_at, 99);
        assert_eq!(updated.title, "Renamed");
    }
}
