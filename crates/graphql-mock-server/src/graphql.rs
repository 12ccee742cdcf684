//! HTTP handlers for the mocked GraphQL endpoint
//!
//! - `GET /` - server status with the endpoint URLs
//! - `POST /graphql` - GraphQL over HTTP with a JSON body
//! - `GET /graphql` - GraphQL over HTTP with query parameters, or the
//!   GraphiQL playground when a browser asks for HTML; only queries may be
//!   sent this way

use std::net::SocketAddr;

use async_graphql::{
    Request, Response, Variables,
    http::GraphiQLSource,
    parser::{
        parse_query,
        types::{DocumentOperations, OperationType},
    },
};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Json, Router,
    extract::{Query, Request as HttpRequest, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{Html, IntoResponse},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::{errors::ServerError, mock::MockSchema};

/// Path of the GraphQL endpoint
pub const GRAPHQL_PATH: &str = "/graphql";

const STATUS_MESSAGE: &str = "GraphQL Mock Server";
const DRAINING_MESSAGE: &str = "Server is shutting down";
const GET_NOT_QUERY_MESSAGE: &str = "GET requests only support query operations";

/// State shared by the GraphQL handlers
#[derive(Debug, Clone)]
pub(crate) struct AppState {
    pub(crate) schema: MockSchema,
    pub(crate) endpoint: Url,
    pub(crate) draining: CancellationToken,
}

/// Query parameters of a GraphQL GET request
#[derive(Debug, Deserialize)]
struct GraphQLQueryParams {
    query: Option<String>,

    #[serde(rename = "operationName")]
    operation_name: Option<String>,

    /// JSON encoded variables
    variables: Option<String>,
}

/// Routes for the status response and the GraphQL endpoint
pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        .route(
            GRAPHQL_PATH,
            get(graphql_get)
                .post(graphql_post)
                .layer(middleware::from_fn_with_state(
                    state.draining.clone(),
                    refuse_while_draining,
                )),
        )
        .with_state(state)
}

/// The URL clients should use to reach the GraphQL endpoint
#[allow(clippy::result_large_err)]
pub(crate) fn endpoint_url(address: SocketAddr) -> Result<Url, ServerError> {
    let authority = if address.ip().is_loopback() || address.ip().is_unspecified() {
        format!("localhost:{}", address.port())
    } else {
        address.to_string()
    };
    Ok(Url::parse(&format!("http://{authority}{GRAPHQL_PATH}"))?)
}

async fn status(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "message": STATUS_MESSAGE,
        "graphql": state.endpoint.as_str(),
        "playground": state.endpoint.as_str(),
    }))
}

async fn graphql_post(
    State(state): State<AppState>,
    request: GraphQLRequest,
) -> axum::response::Response {
    debug!("Processing GraphQL POST request");
    execute(&state, request.into_inner()).await
}

async fn graphql_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<GraphQLQueryParams>,
) -> axum::response::Response {
    if params.query.is_none() && accepts_html(&headers) {
        return Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish()).into_response();
    }

    let query = params.query.unwrap_or_default();
    if matches!(
        operation_type(&query, params.operation_name.as_deref()),
        Some(OperationType::Mutation | OperationType::Subscription)
    ) {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "POST")],
            error_response(GET_NOT_QUERY_MESSAGE.to_string()),
        )
            .into_response();
    }

    let mut request = Request::new(query);
    if let Some(operation_name) = params.operation_name {
        request = request.operation_name(operation_name);
    }
    if let Some(variables) = params.variables {
        match serde_json::from_str::<serde_json::Value>(&variables) {
            Ok(variables) => request = request.variables(Variables::from_json(variables)),
            Err(error) => {
                return (
                    StatusCode::BAD_REQUEST,
                    error_response(format!("Invalid variables: {error}")),
                )
                    .into_response();
            }
        }
    }

    debug!("Processing GraphQL GET request");
    execute(&state, request).await
}

/// Refuse requests that arrive once draining started; requests already
/// received run to completion
async fn refuse_while_draining(
    State(draining): State<CancellationToken>,
    request: HttpRequest,
    next: Next,
) -> axum::response::Response {
    if draining.is_cancelled() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            error_response(DRAINING_MESSAGE.to_string()),
        )
            .into_response();
    }
    next.run(request).await
}

async fn execute(state: &AppState, request: Request) -> axum::response::Response {
    GraphQLResponse::from(state.schema.execute(request).await).into_response()
}

/// The type of the operation a request selects, when the document parses and
/// the selection is unambiguous
fn operation_type(query: &str, operation_name: Option<&str>) -> Option<OperationType> {
    let document = parse_query(query).ok()?;
    match document.operations {
        DocumentOperations::Single(operation) => Some(operation.node.ty),
        DocumentOperations::Multiple(operations) => {
            let operation_name = operation_name?;
            operations
                .iter()
                .find(|(name, _)| name.as_str() == operation_name)
                .map(|(_, operation)| operation.node.ty)
        }
    }
}

fn error_response(message: String) -> GraphQLResponse {
    Response::from_errors(vec![async_graphql::ServerError::new(message, None)]).into()
}

fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|accept| accept.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}
