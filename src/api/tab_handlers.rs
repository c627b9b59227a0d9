use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::extract::ApiQuery;
use crate::api::handlers::{created, AppState, Created, IdQuery};
use crate::logic::{require_fields, ValidationError};
use crate::model::{non_empty, Id, NewTab, Tab};
use crate::store::traits::Store;

#[derive(Debug, Default, Deserialize)]
pub struct TabParams {
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
}

impl TabParams {
    /// Body values take precedence over query values.
    fn or(self, fallback: TabParams) -> TabParams {
        TabParams {
            name: self.name.or(fallback.name),
            description: self.description.or(fallback.description),
            url: self.url.or(fallback.url),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UrlQuery {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

/// Query for the single-field edit endpoints; each reads only its own field.
#[derive(Debug, Deserialize)]
pub struct TabEdit {
    #[serde(default)]
    pub id: Id,
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
}

fn tab_not_found(id: Id) -> ApiError {
    ApiError::not_found(format!("Tab {id} not found"))
}

pub async fn list_tabs<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Tab>>, ApiError> {
    Ok(Json(state.store.list_tabs().await?))
}

pub async fn get_tab<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(IdQuery { id }): ApiQuery<IdQuery>,
) -> Result<Json<Tab>, ApiError> {
    state
        .store
        .get_tab(id)
        .await?
        .map(Json)
        .ok_or_else(|| tab_not_found(id))
}

pub async fn get_tab_by_url<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(query): ApiQuery<UrlQuery>,
) -> Result<Json<Tab>, ApiError> {
    let url = query.url.unwrap_or_default();
    state
        .store
        .find_tab_by_url(&url)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("No tab with url '{url}'")))
}

pub async fn get_tab_by_name<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(query): ApiQuery<NameQuery>,
) -> Result<Json<Tab>, ApiError> {
    let name = query.name.unwrap_or_default();
    state
        .store
        .find_tab_by_name(&name)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("No tab named '{name}'")))
}

/// Accepts the fields as a JSON body or as query parameters. A body that is
/// present but not a JSON object is rejected rather than ignored.
pub async fn add_tab<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(query): ApiQuery<TabParams>,
    body: Bytes,
) -> Result<Created<Tab>, ApiError> {
    let params = if body.is_empty() {
        query
    } else {
        let body: TabParams = serde_json::from_slice(&body)
            .map_err(|e| ValidationError::Malformed(format!("Invalid JSON body: {e}")))?;
        body.or(query)
    };

    require_fields(&[
        ("name", params.name.as_deref()),
        ("description", params.description.as_deref()),
        ("url", params.url.as_deref()),
    ])?;

    let tab = state
        .store
        .insert_tab(NewTab {
            name: params.name.unwrap_or_default(),
            description: params.description.unwrap_or_default(),
            url: params.url.unwrap_or_default(),
        })
        .await?;

    log::info!("Created tab {} '{}'", tab.id, tab.name);
    Ok(created(format!("/api/Tabs/Id?id={}", tab.id), tab))
}

/// Loads the tab, applies `apply` and writes it back. Last writer wins.
async fn edit_tab<S: Store>(
    store: &S,
    id: Id,
    apply: impl FnOnce(&mut Tab) + Send,
) -> Result<Json<Tab>, ApiError> {
    let mut tab = store.get_tab(id).await?.ok_or_else(|| tab_not_found(id))?;
    apply(&mut tab);

    let tab = store
        .update_tab(tab)
        .await?
        .ok_or_else(|| tab_not_found(id))?;
    Ok(Json(tab))
}

pub async fn edit_tab_name<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(edit): ApiQuery<TabEdit>,
) -> Result<Json<Tab>, ApiError> {
    edit_tab(&state.store, edit.id, |tab| {
        if let Some(name) = non_empty(edit.name.as_deref()) {
            tab.name = name.to_string();
        }
    })
    .await
}

pub async fn edit_tab_description<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(edit): ApiQuery<TabEdit>,
) -> Result<Json<Tab>, ApiError> {
    edit_tab(&state.store, edit.id, |tab| {
        if let Some(description) = non_empty(edit.description.as_deref()) {
            tab.description = description.to_string();
        }
    })
    .await
}

pub async fn edit_tab_url<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(edit): ApiQuery<TabEdit>,
) -> Result<Json<Tab>, ApiError> {
    edit_tab(&state.store, edit.id, |tab| {
        if let Some(url) = non_empty(edit.url.as_deref()) {
            tab.url = url.to_string();
        }
    })
    .await
}

pub async fn delete_tab<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(IdQuery { id }): ApiQuery<IdQuery>,
) -> Result<StatusCode, ApiError> {
    if !state.store.delete_tab(id).await? {
        return Err(tab_not_found(id));
    }
    log::info!("Deleted tab {}", id);
    Ok(StatusCode::NO_CONTENT)
}
