use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    services::ServeDir,
};

use crate::api::handlers::{self, AppState};
use crate::api::{
    category_handlers, legacy_category_handlers, subcategory_handlers, tab_handlers,
    todo_handlers,
};
use crate::config::{AppConfig, CorsConfig};
use crate::store::traits::Store;
use crate::store::IMAGE_URL_PREFIX;

pub fn create_router<S: Store + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Tabs
        .route("/api/Tabs/All", get(tab_handlers::list_tabs::<S>))
        .route("/api/Tabs/Id", get(tab_handlers::get_tab::<S>))
        .route("/api/Tabs/Url", get(tab_handlers::get_tab_by_url::<S>))
        .route("/api/Tabs/Name", get(tab_handlers::get_tab_by_name::<S>))
        .route("/api/Tabs/AddTab", post(tab_handlers::add_tab::<S>))
        .route("/api/Tabs/Add", post(tab_handlers::add_tab::<S>))
        .route("/api/Tabs/EditName", put(tab_handlers::edit_tab_name::<S>))
        .route(
            "/api/Tabs/EditDescription",
            put(tab_handlers::edit_tab_description::<S>),
        )
        .route("/api/Tabs/EditUrl", put(tab_handlers::edit_tab_url::<S>))
        .route("/api/Tabs/DeleteTab", delete(tab_handlers::delete_tab::<S>))
        // Category
        .route(
            "/api/Category/AllCategories",
            get(category_handlers::list_categories::<S>),
        )
        .route(
            "/api/Category/CategoryId",
            get(category_handlers::get_category::<S>),
        )
        .route(
            "/api/Category/CategoriesByTabs",
            get(category_handlers::get_categories_by_tab::<S>),
        )
        .route(
            "/api/Category/AddCategory",
            post(category_handlers::add_category::<S>),
        )
        .route(
            "/api/Category/UploadImage",
            post(category_handlers::upload_category_image::<S>),
        )
        .route(
            "/api/Category/EditCategoryTitle",
            put(category_handlers::edit_category_title::<S>),
        )
        .route(
            "/api/Category/EditCategoryDescription",
            put(category_handlers::edit_category_description::<S>),
        )
        .route(
            "/api/Category/EditCategoryUrl",
            put(category_handlers::edit_category_url::<S>),
        )
        .route(
            "/api/Category/EditCategoryTabs",
            put(category_handlers::edit_category_tabs::<S>),
        )
        .route(
            "/api/Category/EditCategoryStartDate",
            put(category_handlers::edit_category_start_date::<S>),
        )
        .route(
            "/api/Category/EditCategoryEndDate",
            put(category_handlers::edit_category_end_date::<S>),
        )
        .route(
            "/api/Category/DeleteCategory",
            delete(category_handlers::delete_category::<S>),
        )
        // Subcategory
        .route(
            "/api/Subcategory/AllSubcategories",
            get(subcategory_handlers::list_subcategories::<S>),
        )
        .route(
            "/api/Subcategory/subcategoryId",
            get(subcategory_handlers::get_subcategory::<S>),
        )
        .route(
            "/api/Subcategory/SubcategoriesByCategory",
            get(subcategory_handlers::get_subcategories_by_category::<S>),
        )
        .route(
            "/api/Subcategory/AddSubcategory",
            post(subcategory_handlers::add_subcategory::<S>),
        )
        .route(
            "/api/Subcategory/UploadImage",
            post(subcategory_handlers::upload_subcategory_image::<S>),
        )
        .route(
            "/api/Subcategory/EditSubcategoryHeading",
            put(subcategory_handlers::edit_subcategory_heading::<S>),
        )
        .route(
            "/api/Subcategory/EditSubcategoryTitle",
            put(subcategory_handlers::edit_subcategory_title::<S>),
        )
        .route(
            "/api/Subcategory/EditSubcategoryDescription",
            put(subcategory_handlers::edit_subcategory_description::<S>),
        )
        .route(
            "/api/Subcategory/EditSubcategoryCategory",
            put(subcategory_handlers::edit_subcategory_category::<S>),
        )
        // Misspelled path still used by deployed clients
        .route(
            "/api/Subcategory/EditSubategoryCategory",
            put(subcategory_handlers::edit_subcategory_category::<S>),
        )
        .route(
            "/api/Subcategory/EditSubcategoryStartDate",
            put(subcategory_handlers::edit_subcategory_start_date::<S>),
        )
        .route(
            "/api/Subcategory/EditSubcategoryEndDate",
            put(subcategory_handlers::edit_subcategory_end_date::<S>),
        )
        .route(
            "/api/Subcategory/DeleteSubcategory",
            delete(subcategory_handlers::delete_subcategory::<S>),
        )
        // ToDos
        .route(
            "/api/ToDos",
            get(todo_handlers::list_todos::<S>).post(todo_handlers::create_todo::<S>),
        )
        .route(
            "/api/ToDos/:id",
            get(todo_handlers::get_todo::<S>)
                .put(todo_handlers::replace_todo::<S>)
                .delete(todo_handlers::delete_todo::<S>),
        )
        // Legacy categories
        .route(
            "/api/Categories",
            get(legacy_category_handlers::list_legacy_categories::<S>)
                .post(legacy_category_handlers::create_legacy_category::<S>),
        )
        .route(
            "/api/Categories/:id",
            get(legacy_category_handlers::get_legacy_category::<S>)
                .put(legacy_category_handlers::update_legacy_category::<S>)
                .delete(legacy_category_handlers::delete_legacy_category::<S>),
        )
        .route(
            "/api/Categories/byname/:name",
            get(legacy_category_handlers::get_legacy_category_by_name::<S>),
        )
}

/// Full application: API routes, the stored-image mount, the request body
/// limit and CORS.
pub fn build_app<S: Store + 'static>(state: AppState<S>, config: &AppConfig) -> Router {
    let images = ServeDir::new(state.images.root());

    create_router::<S>()
        .nest_service(IMAGE_URL_PREFIX, images)
        .layer(DefaultBodyLimit::max(config.storage.max_upload_bytes))
        .layer(cors_layer(&config.cors))
        .with_state(state)
}

/// Credentialed CORS for the configured origins, any method and header.
pub fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ImageStore, MemoryStore};
    use crate::api::handlers::AppContext;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app(image_root: &std::path::Path) -> Router {
        test_app_with(image_root, AppConfig::default())
    }

    fn test_app_with(image_root: &std::path::Path, config: AppConfig) -> Router {
        let state = Arc::new(AppContext::new(MemoryStore::new(), ImageStore::new(image_root)));
        build_app(state, &config)
    }

    const BOUNDARY: &str = "cms-test-boundary";

    /// Hand-built `multipart/form-data` POST with text fields and one optional file.
    fn multipart_request(
        uri: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &str, Vec<u8>)>,
    ) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((name, file_name, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(&bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    const CATEGORY_FIELDS: [(&str, &str); 4] = [
        ("title", "Landscapes"),
        ("description", "Photos"),
        ("startDate", "2024-01-01"),
        ("tabs", "Gallery"),
    ];

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        app.clone().oneshot(request.body(body).unwrap()).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn add_category(app: &Router, query: &str) -> Response {
        send(app, Method::POST, &format!("/api/Category/AddCategory?{query}"), None).await
    }

    #[tokio::test]
    async fn test_add_tab_returns_created_with_location() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        let response = send(
            &app,
            Method::POST,
            "/api/Tabs/AddTab",
            Some(json!({"name": "Projects", "description": "Things I built", "url": "/projects"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::LOCATION], "/api/Tabs/Id?id=1");
        let tab = body_json(response).await;
        assert_eq!(tab["id"], 1);
        assert_eq!(tab["name"], "Projects");
    }

    #[tokio::test]
    async fn test_add_tab_from_query_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        let response = send(
            &app,
            Method::POST,
            "/api/Tabs/Add?name=Blog&description=Posts&url=%2Fblog",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = send(&app, Method::GET, "/api/Tabs/Url?url=%2Fblog", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["name"], "Blog");
    }

    #[tokio::test]
    async fn test_add_tab_missing_fields_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        let response = send(
            &app,
            Method::POST,
            "/api/Tabs/AddTab",
            Some(json!({"name": "Projects"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = body_json(response).await;
        assert!(error["error"]
            .as_str()
            .unwrap()
            .ends_with("Missing required field: description, url."));
    }

    #[tokio::test]
    async fn test_end_before_start_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        let response = add_category(
            &app,
            "title=T&description=D&tabs=Projects&startDate=2024-05-10&endDate=2024-05-01",
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"error": "End date cannot be before start date."})
        );

        let all = send(&app, Method::GET, "/api/Category/AllCategories", None).await;
        assert_eq!(body_json(all).await, json!([]));
    }

    #[tokio::test]
    async fn test_malformed_start_date_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        let response = add_category(
            &app,
            "title=T&description=D&tabs=Projects&startDate=10%2F05%2F2024",
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "Invalid start date format. Use yyyy-MM-dd."
        );
    }

    #[tokio::test]
    async fn test_categories_by_unknown_tab_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        let created = add_category(
            &app,
            "title=T&description=D&tabs=Projects&startDate=2024-05-01",
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);

        let found = send(&app, Method::GET, "/api/Category/CategoriesByTabs?tabs=Projects", None).await;
        assert_eq!(found.status(), StatusCode::OK);
        assert_eq!(body_json(found).await.as_array().unwrap().len(), 1);

        let missing = send(&app, Method::GET, "/api/Category/CategoriesByTabs?tabs=NoSuchTab", None).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_field_edit_changes_only_that_field() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        add_category(
            &app,
            "title=Old&description=D&tabs=Projects&startDate=2024-05-01&url=https%3A%2F%2Fa.dev",
        )
        .await;

        let uri = "/api/Category/EditCategoryTitle?id=1&title=New";
        let first = body_json(send(&app, Method::PUT, uri, None).await).await;
        let second = body_json(send(&app, Method::PUT, uri, None).await).await;

        assert_eq!(first, second);
        assert_eq!(first["title"], "New");
        assert_eq!(first["description"], "D");
        assert_eq!(first["url"], "https://a.dev");
        assert_eq!(first["startDate"], "2024-05-01");

        let blank = send(&app, Method::PUT, "/api/Category/EditCategoryTitle?id=1&title=", None).await;
        assert_eq!(blank.status(), StatusCode::OK);
        assert_eq!(body_json(blank).await["title"], "New");
    }

    #[tokio::test]
    async fn test_date_edits_keep_range_valid() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        add_category(
            &app,
            "title=T&description=D&tabs=Projects&startDate=2024-05-01&endDate=2024-06-01",
        )
        .await;

        let response = send(
            &app,
            Method::PUT,
            "/api/Category/EditCategoryEndDate?id=1&endDateString=2024-04-01",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            Method::PUT,
            "/api/Category/EditCategoryStartDate?id=1&startDateString=0001-01-01",
            None,
        )
        .await;
        assert_eq!(body_json(response).await["startDate"], "2024-05-01");

        let response = send(
            &app,
            Method::PUT,
            "/api/Category/EditCategoryEndDate?id=1&endDateString=",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["endDate"], Value::Null);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        send(
            &app,
            Method::POST,
            "/api/Tabs/AddTab",
            Some(json!({"name": "A", "description": "B", "url": "/a"})),
        )
        .await;

        let deleted = send(&app, Method::DELETE, "/api/Tabs/DeleteTab?id=1", None).await;
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

        let missing = send(&app, Method::GET, "/api/Tabs/Id?id=1", None).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let again = send(&app, Method::DELETE, "/api/Tabs/DeleteTab?id=1", None).await;
        assert_eq!(again.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_subcategory_misspelled_route_edits_category() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let response = send(
            &app,
            Method::POST,
            "/api/Subcategory/AddSubcategory?heading=H&title=T&description=D&category=Rust",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/api/Subcategory/subcategoryId?id=1"
        );

        let response = send(
            &app,
            Method::PUT,
            "/api/Subcategory/EditSubategoryCategory?id=1&category=Go",
            None,
        )
        .await;
        assert_eq!(body_json(response).await["category"], "Go");
    }

    #[tokio::test]
    async fn test_todo_replace_rules() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let created = send(&app, Method::POST, "/api/ToDos", Some(json!({"name": "write"}))).await;
        assert_eq!(created.status(), StatusCode::CREATED);
        assert_eq!(created.headers()[header::LOCATION], "/api/ToDos/1");

        let mismatch = send(&app, Method::PUT, "/api/ToDos/1", Some(json!({"id": 2, "name": "x"}))).await;
        assert_eq!(mismatch.status(), StatusCode::BAD_REQUEST);

        let empty = send(&app, Method::PUT, "/api/ToDos/1", Some(json!({"id": 1, "name": ""}))).await;
        assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

        let gone = send(&app, Method::PUT, "/api/ToDos/9", Some(json!({"id": 9, "name": "x"}))).await;
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);

        let ok = send(&app, Method::PUT, "/api/ToDos/1", Some(json!({"id": 1, "name": "edit"}))).await;
        assert_eq!(ok.status(), StatusCode::NO_CONTENT);
        let todo = body_json(send(&app, Method::GET, "/api/ToDos/1", None).await).await;
        assert_eq!(todo["name"], "edit");
    }

    #[tokio::test]
    async fn test_legacy_category_lookup_ignores_case() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        send(
            &app,
            Method::POST,
            "/api/Categories",
            Some(json!({"name": "Music", "description": "Songs", "url": "/music"})),
        )
        .await;

        let found = send(&app, Method::GET, "/api/Categories/byname/MUSIC", None).await;
        assert_eq!(found.status(), StatusCode::OK);
        assert_eq!(body_json(found).await["name"], "Music");

        let updated = send(
            &app,
            Method::PUT,
            "/api/Categories/1",
            Some(json!({"url": "/Music/New"})),
        )
        .await;
        assert_eq!(updated.status(), StatusCode::NO_CONTENT);
        let category = body_json(send(&app, Method::GET, "/api/Categories/1", None).await).await;
        assert_eq!(category["url"], "/music/new");
        assert_eq!(category["description"], "Songs");

        let missing = send(&app, Method::PUT, "/api/Categories/7", Some(json!({}))).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(missing).await["error"], "Category not found.");
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_configured_origin() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/Tabs/All")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
    }

    #[tokio::test]
    async fn test_image_larger_than_two_mib_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let photo = vec![0xAB; 3 * 1024 * 1024];

        let request = multipart_request(
            "/api/Category/AddCategory",
            &CATEGORY_FIELDS,
            Some(("imageFile", "sunset.jpg", photo.clone())),
        );
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let category = body_json(response).await;
        let image_path = category["imagePath"].as_str().unwrap();
        let stored = dir
            .path()
            .join(image_path.trim_start_matches("/StoredImages/"));
        assert_eq!(std::fs::read(stored).unwrap().len(), photo.len());
    }

    #[tokio::test]
    async fn test_image_over_configured_limit_is_payload_too_large() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.storage.max_upload_bytes = 64 * 1024;
        let app = test_app_with(dir.path(), config);

        let request = multipart_request(
            "/api/Category/AddCategory",
            &CATEGORY_FIELDS,
            Some(("imageFile", "huge.jpg", vec![0xAB; 256 * 1024])),
        );
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let error = body_json(response).await;
        assert!(error["error"].as_str().unwrap().starts_with("Upload exceeds"));

        let all = send(&app, Method::GET, "/api/Category/AllCategories", None).await;
        assert_eq!(body_json(all).await, json!([]));
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        for (method, uri) in [
            (Method::GET, "/api/Tabs/Id"),
            (Method::PUT, "/api/Tabs/EditName?name=x"),
            (Method::GET, "/api/Category/CategoryId"),
            (Method::DELETE, "/api/Subcategory/DeleteSubcategory"),
        ] {
            let response = send(&app, method, uri, None).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
            assert!(body_json(response).await["error"].is_string(), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_malformed_id_is_json_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        for (method, uri) in [
            (Method::PUT, "/api/Tabs/EditName?id=abc&name=x"),
            (Method::GET, "/api/Category/CategoryId?id=1.5"),
            (Method::GET, "/api/ToDos/abc"),
            (Method::DELETE, "/api/Categories/abc"),
        ] {
            let response = send(&app, method, uri, None).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert!(body_json(response).await["error"].is_string(), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_malformed_json_body_is_json_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/Tabs/AddTab?name=A&description=B&url=c")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"name\": "))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = body_json(response).await;
        assert!(error["error"].as_str().unwrap().starts_with("Invalid JSON body"));

        let all = send(&app, Method::GET, "/api/Tabs/All", None).await;
        assert_eq!(body_json(all).await, json!([]));

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/ToDos")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_category_start_date_edit_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        add_category(
            &app,
            "title=T&description=D&tabs=Projects&startDate=2024-05-01&endDate=2024-06-01",
        )
        .await;

        let response = send(
            &app,
            Method::PUT,
            "/api/Category/EditCategoryStartDate?id=1&startDateString=not-a-date",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "Invalid start date format. Use yyyy-MM-dd."
        );

        let response = send(
            &app,
            Method::PUT,
            "/api/Category/EditCategoryStartDate?id=1&startDateString=2024-07-01",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "End date cannot be before start date."
        );

        let category = body_json(send(&app, Method::GET, "/api/Category/CategoryId?id=1", None).await).await;
        assert_eq!(category["startDate"], "2024-05-01");
    }

    #[tokio::test]
    async fn test_add_subcategory_validates_dates() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let base = "/api/Subcategory/AddSubcategory?heading=H&title=T&description=D&category=Rust";

        let cases = [
            ("&startDate=2024-13-40", "Invalid start date format. Use yyyy-MM-dd."),
            ("&endDate=yesterday", "Invalid end date format. Use yyyy-MM-dd."),
            (
                "&startDate=2024-05-10&endDate=2024-05-01",
                "End date cannot be before start date.",
            ),
        ];
        for (dates, message) in cases {
            let response = send(&app, Method::POST, &format!("{base}{dates}"), None).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{dates}");
            assert_eq!(body_json(response).await["error"], message, "{dates}");
        }

        let all = send(&app, Method::GET, "/api/Subcategory/AllSubcategories", None).await;
        assert_eq!(body_json(all).await, json!([]));
    }
}
