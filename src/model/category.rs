use crate::model::Id;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Content item shown under a tab. `tabs` holds the parent tab's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub tabs: String,
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub tabs: String,
    pub image_path: Option<String>,
}

impl NewCategory {
    pub fn into_category(self, id: Id) -> Category {
        Category {
            id,
            title: self.title,
            description: self.description,
            url: self.url,
            start_date: self.start_date,
            end_date: self.end_date,
            tabs: self.tabs,
            image_path: self.image_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_camel_case_dates() {
        let category = NewCategory {
            title: "Cars".to_string(),
            description: "desc".to_string(),
            url: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: Some(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()),
            tabs: "Auto".to_string(),
            image_path: None,
        }
        .into_category(7);

        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["startDate"], "2024-01-01");
        assert_eq!(json["endDate"], "2024-02-01");
        assert!(json["imagePath"].is_null());
        assert!(json.get("start_date").is_none());
    }
}
