//! Row mapping for the `items` table.

use devsnippet_core::item::Item;
use devsnippet_core::types::EpochMillis;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `items` table.
#[derive(Debug, Clone, FromRow)]
pub struct ItemRow {
    pub id: String,
    pub title: String,
    pub content: String,
    pub description: Option<String>,
    pub category: String,
    pub tags: Json<Vec<String>>,
    pub language: Option<String>,
    pub registry_path: Option<String>,
    pub registry_name: Option<String>,
    pub registry_type: Option<String>,
    pub created_at: EpochMillis,
    pub updated_at: EpochMillis,
}

impl TryFrom<ItemRow> for Item {
    type Error = sqlx::Error;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .parse()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Item {
            id: row.id,
            title: row.title,
            content: row.content,
            description: row.description,
            category,
            tags: row.tags.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
            language: row.language,
            registry_path: row.registry_path,
            registry_name: row.registry_name,
            registry_type: row.registry_type,
        })
    }
}

/// Column-oriented copy of a batch of items, bound as parallel arrays to an
/// `UNNEST` insert.
#[derive(Debug, Default)]
pub struct ItemColumns {
    pub ids: Vec<String>,
    pub titles: Vec<String>,
    pub contents: Vec<String>,
    pub descriptions: Vec<Option<String>>,
    pub categories: Vec<String>,
    pub tags: Vec<serde_json::Value>,
    pub languages: Vec<Option<String>>,
    pub registry_paths: Vec<Option<String>>,
    pub registry_names: Vec<Option<String>>,
    pub registry_types: Vec<Option<String>>,
    pub created_ats: Vec<EpochMillis>,
    pub updated_ats: Vec<EpochMillis>,
}

impl ItemColumns {
    pub fn from_items(items: &[Item]) -> Self {
        let mut cols = ItemColumns::default();
        for item in items {
            cols.ids.push(item.id.clone());
            cols.titles.push(item.title.clone());
            cols.contents.push(item.content.clone());
            cols.descriptions.push(item.description.clone());
            cols.categories.push(item.category.as_str().to_string());
            cols.tags.push(serde_json::Value::from(item.tags.clone()));
            cols.languages.push(item.language.clone());
            cols.registry_paths.push(item.registry_path.clone());
            cols.registry_names.push(item.registry_name.clone());
            cols.registry_types.push(item.registry_type.clone());
            cols.created_ats.push(item.created_at);
            cols.updated_ats.push(item.updated_at);
        }
        cols
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
