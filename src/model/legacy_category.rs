use crate::model::{non_empty, Id};
use serde::{Deserialize, Serialize};

/// Row of the older `categories` table (name/description/url).
///
/// `row_version` is bumped by every whole-record replace; a replace carrying a
/// stale version is rejected by the store as a concurrency conflict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LegacyCategory {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub url: String,
    #[serde(skip)]
    pub row_version: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLegacyCategory {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
}

impl NewLegacyCategory {
    pub fn into_legacy_category(self, id: Id) -> LegacyCategory {
        LegacyCategory {
            id,
            name: self.name,
            description: self.description,
            url: self.url,
            row_version: 0,
        }
    }
}

/// Partial update body; blank fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyCategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
}

impl LegacyCategory {
    /// Applies the non-blank fields of `update`. The url is stored lower-cased.
    pub fn apply(&mut self, update: &LegacyCategoryUpdate) {
        if let Some(name) = non_empty(update.name.as_deref()) {
            self.name = name.to_string();
        }
        if let Some(description) = non_empty(update.description.as_deref()) {
            self.description = description.to_string();
        }
        if let Some(url) = non_empty(update.url.as_deref()) {
            self.url = url.to_lowercase();
        }
    }
}
