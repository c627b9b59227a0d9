use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use std::collections::HashMap;

use crate::api::error::ApiError;
use crate::api::extract::ApiQuery;
use crate::api::form::FormData;
use crate::api::handlers::{created, AppState, Created, IdQuery, ImageUploadResponse};
use crate::logic::{
    ensure_date_range, is_unset_date, parse_date_exact, parse_date_loose,
    parse_optional_date_exact, require_fields, DateField, ValidationError,
};
use crate::model::{non_empty, Category, Id, ImageFolder, NewCategory};
use crate::store::traits::Store;

#[derive(Debug, Deserialize)]
pub struct TabsQuery {
    pub tabs: Option<String>,
}

/// Query for the single-field edit endpoints; each reads only its own field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEdit {
    #[serde(default)]
    pub id: Id,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub tabs: Option<String>,
    pub start_date_string: Option<String>,
    pub end_date_string: Option<String>,
}

fn category_not_found(id: Id) -> ApiError {
    ApiError::not_found(format!("Category {id} not found"))
}

pub async fn list_categories<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.store.list_categories().await?))
}

pub async fn get_category<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(IdQuery { id }): ApiQuery<IdQuery>,
) -> Result<Json<Category>, ApiError> {
    state
        .store
        .get_category(id)
        .await?
        .map(Json)
        .ok_or_else(|| category_not_found(id))
}

/// Categories under one tab; an empty result is reported as 404.
pub async fn get_categories_by_tab<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(query): ApiQuery<TabsQuery>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let tabs = query.tabs.unwrap_or_default();
    let categories = state.store.find_categories_by_tab(&tabs).await?;
    if categories.is_empty() {
        return Err(ApiError::not_found(format!(
            "No categories found for tab '{tabs}'"
        )));
    }
    Ok(Json(categories))
}

/// Multipart form (or query) with title, description, url?, startDate,
/// endDate?, tabs and an optional `imageFile`.
pub async fn add_category<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(query): ApiQuery<HashMap<String, String>>,
    multipart: Option<Multipart>,
) -> Result<Created<Category>, ApiError> {
    let mut form = FormData::collect(query, multipart).await?;

    require_fields(&[
        ("title", form.text("title")),
        ("description", form.text("description")),
        ("startDate", form.text("startDate")),
        ("tabs", form.text("tabs")),
    ])?;

    let start_date = parse_date_exact(form.text("startDate").unwrap_or_default(), DateField::Start)?;
    let end_date = parse_optional_date_exact(form.text("endDate"), DateField::End)?;
    ensure_date_range(Some(start_date), end_date)?;

    let image_path = match form.take_file("imageFile") {
        Some(file) => Some(
            state
                .images
                .save(ImageFolder::Category, &file.file_name, &file.bytes)
                .await?,
        ),
        None => None,
    };

    let category = state
        .store
        .insert_category(NewCategory {
            title: form.text("title").unwrap_or_default().to_string(),
            description: form.text("description").unwrap_or_default().to_string(),
            url: non_empty(form.text("url")).map(str::to_string),
            start_date,
            end_date,
            tabs: form.text("tabs").unwrap_or_default().to_string(),
            image_path,
        })
        .await?;

    log::info!(
        "Created category {} '{}' under tab '{}'",
        category.id,
        category.title,
        category.tabs
    );
    Ok(created(
        format!("/api/Category/CategoryId?id={}", category.id),
        category,
    ))
}

/// Multipart form with `categoryId` and `imageFile`; replaces the image path.
pub async fn upload_category_image<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(query): ApiQuery<HashMap<String, String>>,
    multipart: Option<Multipart>,
) -> Result<Json<ImageUploadResponse>, ApiError> {
    let mut form = FormData::collect(query, multipart).await?;
    let file = form.take_file("imageFile").ok_or(ValidationError::MissingImage)?;
    let id = form.id("categoryId")?;

    let mut category = state
        .store
        .get_category(id)
        .await?
        .ok_or_else(|| category_not_found(id))?;

    let image_path = state
        .images
        .save(ImageFolder::Category, &file.file_name, &file.bytes)
        .await?;
    category.image_path = Some(image_path.clone());

    state
        .store
        .update_category(category)
        .await?
        .ok_or_else(|| category_not_found(id))?;

    log::info!("Attached image {} to category {}", image_path, id);
    Ok(Json(ImageUploadResponse { image_path }))
}

/// Loads the category, lets `apply` validate and mutate it, then writes it
/// back. Nothing is written when `apply` rejects the change.
async fn edit_category<S: Store>(
    store: &S,
    id: Id,
    apply: impl FnOnce(&mut Category) -> Result<(), ValidationError> + Send,
) -> Result<Json<Category>, ApiError> {
    let mut category = store
        .get_category(id)
        .await?
        .ok_or_else(|| category_not_found(id))?;
    apply(&mut category)?;

    let category = store
        .update_category(category)
        .await?
        .ok_or_else(|| category_not_found(id))?;
    Ok(Json(category))
}

pub async fn edit_category_title<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(edit): ApiQuery<CategoryEdit>,
) -> Result<Json<Category>, ApiError> {
    edit_category(&state.store, edit.id, |category| {
        if let Some(title) = non_empty(edit.title.as_deref()) {
            category.title = title.to_string();
        }
        Ok(())
    })
    .await
}

pub async fn edit_category_description<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(edit): ApiQuery<CategoryEdit>,
) -> Result<Json<Category>, ApiError> {
    edit_category(&state.store, edit.id, |category| {
        if let Some(description) = non_empty(edit.description.as_deref()) {
            category.description = description.to_string();
        }
        Ok(())
    })
    .await
}

pub async fn edit_category_url<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(edit): ApiQuery<CategoryEdit>,
) -> Result<Json<Category>, ApiError> {
    edit_category(&state.store, edit.id, |category| {
        if let Some(url) = non_empty(edit.url.as_deref()) {
            category.url = Some(url.to_string());
        }
        Ok(())
    })
    .await
}

pub async fn edit_category_tabs<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(edit): ApiQuery<CategoryEdit>,
) -> Result<Json<Category>, ApiError> {
    edit_category(&state.store, edit.id, |category| {
        if let Some(tabs) = non_empty(edit.tabs.as_deref()) {
            category.tabs = tabs.to_string();
        }
        Ok(())
    })
    .await
}

/// Loose date parse. `0001-01-01` leaves the stored start date unchanged.
pub async fn edit_category_start_date<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(edit): ApiQuery<CategoryEdit>,
) -> Result<Json<Category>, ApiError> {
    edit_category(&state.store, edit.id, |category| {
        let input = edit.start_date_string.as_deref().unwrap_or_default();
        let start_date = parse_date_loose(input, DateField::Start)?;
        if is_unset_date(start_date) {
            return Ok(());
        }
        ensure_date_range(Some(start_date), category.end_date)?;
        category.start_date = start_date;
        Ok(())
    })
    .await
}

/// Loose date parse; a blank value clears the end date.
pub async fn edit_category_end_date<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(edit): ApiQuery<CategoryEdit>,
) -> Result<Json<Category>, ApiError> {
    edit_category(&state.store, edit.id, |category| {
        let end_date = non_empty(edit.end_date_string.as_deref())
            .map(|input| parse_date_loose(input, DateField::End))
            .transpose()?;
        ensure_date_range(Some(category.start_date), end_date)?;
        category.end_date = end_date;
        Ok(())
    })
    .await
}

pub async fn delete_category<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(IdQuery { id }): ApiQuery<IdQuery>,
) -> Result<StatusCode, ApiError> {
    if !state.store.delete_category(id).await? {
        return Err(category_not_found(id));
    }
    log::info!("Deleted category {}", id);
    Ok(StatusCode::NO_CONTENT)
}
