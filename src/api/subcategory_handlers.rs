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
    ensure_date_range, parse_date_loose, parse_optional_date_exact, require_fields, DateField,
    ValidationError,
};
use crate::model::{non_empty, Id, ImageFolder, NewSubcategory, Subcategory};
use crate::store::traits::Store;

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryEdit {
    #[serde(default)]
    pub id: Id,
    pub heading: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub start_date_string: Option<String>,
    pub end_date_string: Option<String>,
}

fn subcategory_not_found(id: Id) -> ApiError {
    ApiError::not_found(format!("Subcategory {id} not found"))
}

pub async fn list_subcategories<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Subcategory>>, ApiError> {
    Ok(Json(state.store.list_subcategories().await?))
}

pub async fn get_subcategory<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(IdQuery { id }): ApiQuery<IdQuery>,
) -> Result<Json<Subcategory>, ApiError> {
    state
        .store
        .get_subcategory(id)
        .await?
        .map(Json)
        .ok_or_else(|| subcategory_not_found(id))
}

pub async fn get_subcategories_by_category<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(query): ApiQuery<CategoryQuery>,
) -> Result<Json<Vec<Subcategory>>, ApiError> {
    let category = query.category.unwrap_or_default();
    let subcategories = state
        .store
        .find_subcategories_by_category(&category)
        .await?;
    if subcategories.is_empty() {
        return Err(ApiError::not_found(format!(
            "No subcategories found for category '{category}'"
        )));
    }
    Ok(Json(subcategories))
}

/// Multipart form (or query) with heading, title, description, startDate?,
/// endDate?, category and an optional `imageFile`.
pub async fn add_subcategory<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(query): ApiQuery<HashMap<String, String>>,
    multipart: Option<Multipart>,
) -> Result<Created<Subcategory>, ApiError> {
    let mut form = FormData::collect(query, multipart).await?;

    require_fields(&[
        ("heading", form.text("heading")),
        ("title", form.text("title")),
        ("description", form.text("description")),
        ("category", form.text("category")),
    ])?;

    let start_date = parse_optional_date_exact(form.text("startDate"), DateField::Start)?;
    let end_date = parse_optional_date_exact(form.text("endDate"), DateField::End)?;
    ensure_date_range(start_date, end_date)?;

    let image_path = match form.take_file("imageFile") {
        Some(file) => Some(
            state
                .images
                .save(ImageFolder::Subcategory, &file.file_name, &file.bytes)
                .await?,
        ),
        None => None,
    };

    let subcategory = state
        .store
        .insert_subcategory(NewSubcategory {
            heading: form.text("heading").unwrap_or_default().to_string(),
            title: form.text("title").unwrap_or_default().to_string(),
            description: form.text("description").unwrap_or_default().to_string(),
            start_date,
            end_date,
            category: form.text("category").unwrap_or_default().to_string(),
            image_path,
        })
        .await?;

    log::info!(
        "Created subcategory {} '{}' under category '{}'",
        subcategory.id,
        subcategory.title,
        subcategory.category
    );
    Ok(created(
        format!("/api/Subcategory/subcategoryId?id={}", subcategory.id),
        subcategory,
    ))
}

pub async fn upload_subcategory_image<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(query): ApiQuery<HashMap<String, String>>,
    multipart: Option<Multipart>,
) -> Result<Json<ImageUploadResponse>, ApiError> {
    let mut form = FormData::collect(query, multipart).await?;
    let file = form.take_file("imageFile").ok_or(ValidationError::MissingImage)?;
    let id = form.id("subcategoryId")?;

    let mut subcategory = state
        .store
        .get_subcategory(id)
        .await?
        .ok_or_else(|| subcategory_not_found(id))?;

    let image_path = state
        .images
        .save(ImageFolder::Subcategory, &file.file_name, &file.bytes)
        .await?;
    subcategory.image_path = Some(image_path.clone());

    state
        .store
        .update_subcategory(subcategory)
        .await?
        .ok_or_else(|| subcategory_not_found(id))?;

    log::info!("Attached image {} to subcategory {}", image_path, id);
    Ok(Json(ImageUploadResponse { image_path }))
}

async fn edit_subcategory<S: Store>(
    store: &S,
    id: Id,
    apply: impl FnOnce(&mut Subcategory) -> Result<(), ValidationError> + Send,
) -> Result<Json<Subcategory>, ApiError> {
    let mut subcategory = store
        .get_subcategory(id)
        .await?
        .ok_or_else(|| subcategory_not_found(id))?;
    apply(&mut subcategory)?;

    let subcategory = store
        .update_subcategory(subcategory)
        .await?
        .ok_or_else(|| subcategory_not_found(id))?;
    Ok(Json(subcategory))
}

/// Sets `target` when `value` is non-blank; blank leaves it as it was.
fn set_if_present(target: &mut String, value: Option<&str>) {
    if let Some(value) = non_empty(value) {
        *target = value.to_string();
    }
}

pub async fn edit_subcategory_heading<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(edit): ApiQuery<SubcategoryEdit>,
) -> Result<Json<Subcategory>, ApiError> {
    edit_subcategory(&state.store, edit.id, |subcategory| {
        set_if_present(&mut subcategory.heading, edit.heading.as_deref());
        Ok(())
    })
    .await
}

pub async fn edit_subcategory_title<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(edit): ApiQuery<SubcategoryEdit>,
) -> Result<Json<Subcategory>, ApiError> {
    edit_subcategory(&state.store, edit.id, |subcategory| {
        set_if_present(&mut subcategory.title, edit.title.as_deref());
        Ok(())
    })
    .await
}

pub async fn edit_subcategory_description<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(edit): ApiQuery<SubcategoryEdit>,
) -> Result<Json<Subcategory>, ApiError> {
    edit_subcategory(&state.store, edit.id, |subcategory| {
        set_if_present(&mut subcategory.description, edit.description.as_deref());
        Ok(())
    })
    .await
}

pub async fn edit_subcategory_category<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(edit): ApiQuery<SubcategoryEdit>,
) -> Result<Json<Subcategory>, ApiError> {
    edit_subcategory(&state.store, edit.id, |subcategory| {
        set_if_present(&mut subcategory.category, edit.category.as_deref());
        Ok(())
    })
    .await
}

/// Loose date parse; a blank value clears the start date.
pub async fn edit_subcategory_start_date<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(edit): ApiQuery<SubcategoryEdit>,
) -> Result<Json<Subcategory>, ApiError> {
    edit_subcategory(&state.store, edit.id, |subcategory| {
        let start_date = non_empty(edit.start_date_string.as_deref())
            .map(|input| parse_date_loose(input, DateField::Start))
            .transpose()?;
        ensure_date_range(start_date, subcategory.end_date)?;
        subcategory.start_date = start_date;
        Ok(())
    })
    .await
}

/// Loose date parse; a blank value clears the end date.
pub async fn edit_subcategory_end_date<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(edit): ApiQuery<SubcategoryEdit>,
) -> Result<Json<Subcategory>, ApiError> {
    edit_subcategory(&state.store, edit.id, |subcategory| {
        let end_date = non_empty(edit.end_date_string.as_deref())
            .map(|input| parse_date_loose(input, DateField::End))
            .transpose()?;
        ensure_date_range(subcategory.start_date, end_date)?;
        subcategory.end_date = end_date;
        Ok(())
    })
    .await
}

pub async fn delete_subcategory<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(IdQuery { id }): ApiQuery<IdQuery>,
) -> Result<StatusCode, ApiError> {
    if !state.store.delete_subcategory(id).await? {
        return Err(subcategory_not_found(id));
    }
    log::info!("Deleted subcategory {}", id);
    Ok(StatusCode::NO_CONTENT)
}
