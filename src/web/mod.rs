pub mod error;

use std::{sync::Arc, time::Instant};

use anyhow::{Context, Result};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get},
    Json, Router,
};
use log::info;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::{
    config::Config,
    models::{
        post::{InsertablePost, Post, PostChanges},
        post_like::PostLike,
        user::{InsertableUser, User},
    },
    search::{
        executor::{QueryExecutor, StoreExecutor},
        filter::{Category, Filter},
        pagination::{Page, PageRequest},
        SearchError,
    },
    store::ListingStore,
};
use error::ApiError;

pub const SEARCH_PATH: &str = "/recherche";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn ListingStore>,
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Query string of the search page. Same three keys as the search bar plus
/// the page number.
#[derive(Deserialize, Default)]
pub struct SearchParams {
    pub query: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub page: Option<u32>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub filters: Filter,
    pub posts: Page<Post>,
}

#[derive(Serialize)]
pub struct CategoryResponse {
    pub id: &'static str,
    pub name: &'static str,
}

#[derive(Deserialize)]
pub struct LikeRequest {
    pub user_id: i64,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(SEARCH_PATH, get(search_posts))
        .route("/api/categories", get(list_categories))
        .route("/api/cities", get(list_cities))
        .route("/api/users", axum::routing::post(create_user))
        .route("/api/users/:id", delete(delete_user))
        .route("/api/posts", axum::routing::post(create_post))
        .route(
            "/api/posts/:id",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/api/posts/:id/likes", get(list_likes).post(like_post))
        .route("/api/posts/:id/likes/:user_id", delete(unlike_post))
        .layer(middleware::from_fn(cors_layer))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

pub async fn start_http_server(
    state: AppState,
    mut shutdown_rx: tokio::sync::broadcast::Receiver<()>,
) -> Result<()> {
    let bind_addr = state.config.bind_address();

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind http listener on {bind_addr}"))?;
    info!("HTTP server listening on {}", bind_addr);
    let app = router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await
        .context("HTTP server crashed")?;

    info!("HTTP server stopped");
    Ok(())
}

async fn cors_layer(req: axum::http::Request<axum::body::Body>, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        let mut response = Response::new(axum::body::Body::empty());
        apply_cors_headers(response.headers_mut());
        *response.status_mut() = StatusCode::NO_CONTENT;
        response
    } else {
        let mut response = next.run(req).await;
        apply_cors_headers(response.headers_mut());
        response
    }
}

fn apply_cors_headers(headers: &mut axum::http::HeaderMap) {
    headers.insert(
        axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        axum::http::header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type"),
    );
    headers.insert(
        axum::http::header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
}

async fn log_requests(req: axum::http::Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let response = next.run(req).await;

    info!(
        "{} {} -> {} in {:?}",
        method,
        uri,
        response.status().as_u16(),
        start.elapsed()
    );
    response
}

/// diesel is synchronous; keep it off the async workers.
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
}

async fn search_posts(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<ApiResponse<SearchResponse>>, ApiError> {
    let Query(params) = params.map_err(|e| SearchError::InvalidArgument(e.body_text()))?;
    let filter = Filter::normalize(
        params.query.as_deref(),
        params.category.as_deref(),
        params.city.as_deref(),
    );
    let page = PageRequest::new(params.page.unwrap_or(1), state.config.page_size)
        .with_path(SEARCH_PATH);
    let executor = StoreExecutor::new(state.store.clone());

    let response = blocking(move || {
        let posts = executor.execute(&filter, &page)?;
        Ok(SearchResponse {
            filters: filter,
            posts,
        })
    })
    .await?;

    Ok(Json(ApiResponse { data: response }))
}

async fn list_categories() -> Json<ApiResponse<Vec<CategoryResponse>>> {
    let categories = Category::ALL
        .iter()
        .map(|category| CategoryResponse {
            id: category.slug(),
            name: category.label(),
        })
        .collect();

    Json(ApiResponse { data: categories })
}

async fn list_cities(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let store = state.store.clone();
    let cities = blocking(move || Ok(store.cities()?)).await?;
    Ok(Json(ApiResponse { data: cities }))
}

async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<InsertableUser>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ApiError> {
    let store = state.store.clone();
    let user = blocking(move || Ok(store.create_user(body)?)).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse { data: user })))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let store = state.store.clone();
    blocking(move || Ok(store.delete_user(id)?)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_post(
    State(state): State<AppState>,
    Json(body): Json<InsertablePost>,
) -> Result<(StatusCode, Json<ApiResponse<Post>>), ApiError> {
    let store = state.store.clone();
    let post = blocking(move || Ok(store.create_post(body)?)).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse { data: post })))
}

async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Post>>, ApiError> {
    let store = state.store.clone();
    blocking(move || store.get_post(id)?.ok_or(ApiError::NotFound(format!("post {id} not found"))))
        .await
        .map(|post| Json(ApiResponse { data: post }))
}

async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<PostChanges>,
) -> Result<Json<ApiResponse<Post>>, ApiError> {
    let store = state.store.clone();
    let post = blocking(move || Ok(store.update_post(id, body)?)).await?;
    Ok(Json(ApiResponse { data: post }))
}

async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let store = state.store.clone();
    blocking(move || Ok(store.delete_post(id)?)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_likes(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<PostLike>>>, ApiError> {
    let store = state.store.clone();
    let likes = blocking(move || Ok(store.likes_for_post(id)?)).await?;
    Ok(Json(ApiResponse { data: likes }))
}

async fn like_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(LikeRequest { user_id }): Json<LikeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PostLike>>), ApiError> {
    let store = state.store.clone();
    let like = blocking(move || Ok(store.like(user_id, id)?)).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse { data: like })))
}

async fn unlike_post(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let store = state.store.clone();
    blocking(move || Ok(store.unlike(user_id, id)?)).await?;
    Ok(StatusCode::NO_CONTENT)
}
