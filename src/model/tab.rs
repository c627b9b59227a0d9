use crate::model::Id;
use serde::{Deserialize, Serialize};

/// Top-level navigation grouping. Categories refer to a tab by its `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tab {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTab {
    pub name: String,
    pub description: String,
    pub url: String,
}

impl NewTab {
    pub fn into_tab(self, id: Id) -> Tab {
        Tab {
            id,
            name: self.name,
            description: self.description,
            url: self.url,
        }
    }
}
