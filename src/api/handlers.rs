use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::logic::{CatalogError, Repository};
use crate::model::{EntityKind, Id, Record};
use crate::store::EntityStore;

pub type AppState<S> = Arc<S>;

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

/// Maps repository outcomes onto status codes. Storage failures are logged
/// and reported with a generic message.
fn error_response(kind: EntityKind, action: &str, err: CatalogError) -> ApiError {
    match err {
        CatalogError::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(&err.to_string())),
        ),
        ref e if e.is_validation() => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(&err.to_string())),
        ),
        _ => {
            log::error!("Failed to {} {}: {}", action, kind, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&format!(
                    "Failed to {} {}",
                    action,
                    kind.spec().display_name.to_lowercase()
                ))),
            )
        }
    }
}

fn body_or_bad_request(payload: Result<Json<Record>, JsonRejection>) -> Result<Record, ApiError> {
    match payload {
        Ok(Json(record)) => Ok(record),
        Err(rejection) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(&format!(
                "Request body must be a JSON object: {}",
                rejection.body_text()
            ))),
        )),
    }
}

pub async fn list_records<S: EntityStore>(
    State(store): State<AppState<S>>,
    kind: EntityKind,
) -> Result<Json<Vec<Record>>, ApiError> {
    match Repository::new(store, kind).list_all().await {
        Ok(records) => Ok(Json(records)),
        Err(e) => Err(error_response(kind, "retrieve", e)),
    }
}

pub async fn get_record<S: EntityStore>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
    kind: EntityKind,
) -> Result<Json<Record>, ApiError> {
    match Repository::new(store, kind).get_by_id(&id).await {
        Ok(record) => Ok(Json(record)),
        Err(e) => Err(error_response(kind, "retrieve", e)),
    }
}

pub async fn create_record<S: EntityStore>(
    State(store): State<AppState<S>>,
    kind: EntityKind,
    payload: Result<Json<Record>, JsonRejection>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let payload = body_or_bad_request(payload)?;

    match Repository::new(store, kind).create(payload).await {
        Ok(record) => Ok((StatusCode::CREATED, Json(record))),
        Err(e) => Err(error_response(kind, "create", e)),
    }
}

pub async fn update_record<S: EntityStore>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
    kind: EntityKind,
    payload: Result<Json<Record>, JsonRejection>,
) -> Result<Json<Record>, ApiError> {
    let patch = body_or_bad_request(payload)?;

    match Repository::new(store, kind).update(&id, patch).await {
        Ok(record) => Ok(Json(record)),
        Err(e) => Err(error_response(kind, "update", e)),
    }
}

pub async fn delete_record<S: EntityStore>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
    kind: EntityKind,
) -> Result<StatusCode, ApiError> {
    match Repository::new(store, kind).delete(&id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(error_response(kind, "delete", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn catalog_errors_map_to_status_codes() {
        let (status, _) = error_response(
            EntityKind::Category,
            "retrieve",
            CatalogError::NotFound {
                entity: EntityKind::Category,
                id: "x".to_string(),
            },
        );
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, Json(body)) = error_response(
            EntityKind::Object,
            "create",
            CatalogError::MissingFields {
                entity: EntityKind::Object,
                fields: vec!["nameTitle"],
            },
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("nameTitle"));

        let (status, Json(body)) = error_response(
            EntityKind::ExhibitGrouping,
            "update",
            CatalogError::Storage(StoreError::Io {
                collection: "exhibit-groupings".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            }),
        );
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Failed to update exhibit grouping");
    }
}
