use crate::model::{NewCategory, NewSubcategory, NewTab};
use crate::store::traits::Store;
use anyhow::Result;
use chrono::NaiveDate;

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| anyhow::anyhow!("invalid seed date {year}-{month}-{day}"))
}

fn seed_tabs() -> Vec<NewTab> {
    vec![
        NewTab {
            name: "Projects".to_string(),
            description: "Things I have built".to_string(),
            url: "projects".to_string(),
        },
        NewTab {
            name: "Experience".to_string(),
            description: "Where I have worked".to_string(),
            url: "experience".to_string(),
        },
    ]
}

fn seed_categories() -> Result<Vec<NewCategory>> {
    Ok(vec![
        NewCategory {
            title: "Portfolio site".to_string(),
            description: "This site and its content API".to_string(),
            url: Some("https://github.com/example/portfolio".to_string()),
            start_date: date(2024, 1, 15)?,
            end_date: None,
            tabs: "Projects".to_string(),
            image_path: None,
        },
        NewCategory {
            title: "Backend developer".to_string(),
            description: "Services and data pipelines".to_string(),
            url: None,
            start_date: date(2021, 9, 1)?,
            end_date: Some(date(2023, 12, 31)?),
            tabs: "Experience".to_string(),
            image_path: None,
        },
    ])
}

fn seed_subcategories() -> Result<Vec<NewSubcategory>> {
    Ok(vec![NewSubcategory {
        heading: "Stack".to_string(),
        title: "Frontend".to_string(),
        description: "Single-page app served on port 5173".to_string(),
        start_date: Some(date(2024, 1, 15)?),
        end_date: None,
        category: "Portfolio site".to_string(),
        image_path: None,
    }])
}

/// Inserts a small demo hierarchy. Does nothing if any tab already exists.
pub async fn load_seed_data<S: Store>(store: &S) -> Result<()> {
    if !store.list_tabs().await?.is_empty() {
        log::info!("Store already has content, skipping seed data");
        return Ok(());
    }

    for tab in seed_tabs() {
        store.insert_tab(tab).await?;
    }
    for category in seed_categories()? {
        store.insert_category(category).await?;
    }
    for subcategory in seed_subcategories()? {
        store.insert_subcategory(subcategory).await?;
    }

    log::info!("Seed data loaded");
    Ok(())
}
