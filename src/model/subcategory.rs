use crate::model::Id;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Content item shown under a category. `category` holds the parent category's title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: Id,
    pub heading: String,
    pub title: String,
    pub description: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category: String,
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubcategory {
    pub heading: String,
    pub title: String,
    pub description: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category: String,
    pub image_path: Option<String>,
}

impl NewSubcategory {
    pub fn into_subcategory(self, id: Id) -> Subcategory {
        Subcategory {
            id,
            heading: self.heading,
            title: self.title,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            category: self.category,
            image_path: self.image_path,
        }
    }
}
