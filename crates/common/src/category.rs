use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{require, CollectionName, Record};
use crate::Result;

/// Icon assigned to every new category
pub const DEFAULT_CATEGORY_ICON: &str = "box";

fn default_icon() -> String {
    DEFAULT_CATEGORY_ICON.to_string()
}

/// A device category. Names are not required to be unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_icon")]
    pub icon: String,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Category {
    const COLLECTION: CollectionName = CollectionName::Categories;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Category {
    pub fn apply(&mut self, patch: CategoryPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        self.updated_at = Some(now);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,
}

impl CategoryDraft {
    pub fn validate(&self) -> Result<()> {
        require("name", &self.name)
    }

    pub fn into_category(self, id: String, now: DateTime<Utc>) -> Category {
        Category {
            id,
            name: self.name,
            description: self.description,
            icon: default_icon(),
            created_at: now,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
