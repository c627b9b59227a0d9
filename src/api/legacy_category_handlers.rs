use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};

use crate::api::error::{resolve_conflict, ApiError};
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::handlers::{created, AppState, Created};
use crate::logic::require_fields;
use crate::model::{Id, LegacyCategory, LegacyCategoryUpdate, NewLegacyCategory};
use crate::store::traits::Store;

const CATEGORY_NOT_FOUND: &str = "Category not found.";

pub async fn list_legacy_categories<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<LegacyCategory>>, ApiError> {
    Ok(Json(state.store.list_legacy_categories().await?))
}

pub async fn get_legacy_category<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<LegacyCategory>, ApiError> {
    state
        .store
        .get_legacy_category(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(CATEGORY_NOT_FOUND))
}

/// The only lookup in the API that ignores case.
pub async fn get_legacy_category_by_name<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(name): ApiPath<String>,
) -> Result<Json<LegacyCategory>, ApiError> {
    state
        .store
        .find_legacy_category_by_name(&name)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("No category named '{name}'")))
}

pub async fn create_legacy_category<S: Store>(
    State(state): State<AppState<S>>,
    ApiJson(new_category): ApiJson<NewLegacyCategory>,
) -> Result<Created<LegacyCategory>, ApiError> {
    require_fields(&[
        ("name", Some(new_category.name.as_str())),
        ("description", Some(new_category.description.as_str())),
        ("url", Some(new_category.url.as_str())),
    ])?;

    let category = state.store.insert_legacy_category(new_category).await?;
    log::info!("Created legacy category {} '{}'", category.id, category.name);
    Ok(created(format!("/api/Categories/{}", category.id), category))
}

/// Applies the non-blank fields of the body. The write is rejected if the row
/// changed since it was read; see [`resolve_conflict`].
pub async fn update_legacy_category<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(update): ApiJson<LegacyCategoryUpdate>,
) -> Result<StatusCode, ApiError> {
    let mut category = state
        .store
        .get_legacy_category(id)
        .await?
        .ok_or_else(|| ApiError::not_found(CATEGORY_NOT_FOUND))?;
    category.apply(&update);

    if let Err(err) = state.store.replace_legacy_category(category).await {
        return Err(
            resolve_conflict(err, state.store.legacy_category_exists(id), CATEGORY_NOT_FOUND).await,
        );
    }

    log::info!("Updated legacy category {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_legacy_category<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
) -> Result<StatusCode, ApiError> {
    if !state.store.delete_legacy_category(id).await? {
        return Err(ApiError::not_found(CATEGORY_NOT_FOUND));
    }
    log::info!("Deleted legacy category {}", id);
    Ok(StatusCode::NO_CONTENT)
}
