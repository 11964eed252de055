use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, Method, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use format_lister::{list_formats, ErrorPolicy, MetadataProvider};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use crate::{config::ServerConfig, errors::ApiError};

#[derive(Debug, Deserialize)]
pub struct ItagQuery {
    v: Option<String>,
}

pub struct AppState<P> {
    provider: Arc<P>,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
        }
    }
}

/// Both endpoints list the same formats; they only differ in how provider failures
/// are reported.
pub fn router<P: MetadataProvider>(provider: P, config: &ServerConfig) -> Router {
    Router::new()
        .route(&config.endpoint, get(classified::<P>))
        .route(&config.generic_endpoint, get(generic::<P>))
        .with_state(AppState {
            provider: Arc::new(provider),
        })
        .layer(CorsLayer::new().allow_origin(Any).allow_methods([Method::GET]))
}

async fn classified<P: MetadataProvider>(
    State(state): State<AppState<P>>,
    uri: Uri,
    query: Result<Query<ItagQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    respond(&state, &uri, query, ErrorPolicy::Classified).await
}

async fn generic<P: MetadataProvider>(
    State(state): State<AppState<P>>,
    uri: Uri,
    query: Result<Query<ItagQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    respond(&state, &uri, query, ErrorPolicy::Generic).await
}

async fn respond<P: MetadataProvider>(
    state: &AppState<P>,
    uri: &Uri,
    query: Result<Query<ItagQuery>, QueryRejection>,
    policy: ErrorPolicy,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let payload = list_formats(&*state.provider, query.v.as_deref(), uri.path(), policy).await?;
    let body = payload.to_pretty_json()?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
