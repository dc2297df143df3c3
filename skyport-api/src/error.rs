use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use skyport_catalog::CatalogError;
use skyport_core::filters::FilterError;
use skyport_core::{RouteError, SeatOutOfRange, StoreError};
use skyport_order::OrderError;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    ValidationError {
        message: String,
        fields: BTreeMap<&'static str, String>,
    },
    NotFoundError(String),
    ConflictError(String),
    InternalServerError(String),
}

impl AppError {
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        let message = message.into();
        AppError::ValidationError {
            fields: BTreeMap::from([(field, message.clone())]),
            message,
        }
    }

    fn seat_out_of_range(prefix: String, error: &SeatOutOfRange) -> Self {
        let fields = error
            .violations
            .iter()
            .map(|v| (v.dimension.field(), v.to_string()))
            .collect();
        AppError::ValidationError { message: format!("{prefix}{error}"), fields }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, fields) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg, BTreeMap::new()),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg, BTreeMap::new()),
            AppError::ValidationError { message, fields } => (StatusCode::BAD_REQUEST, message, fields),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg, BTreeMap::new()),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg, BTreeMap::new()),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string(), BTreeMap::new())
            }
        };

        let body = if fields.is_empty() {
            json!({ "error": error_message })
        } else {
            json!({ "error": error_message, "fields": fields })
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => AppError::NotFoundError(err.to_string()),
            StoreError::Duplicate { field, .. } => AppError::invalid_field(field, err.to_string()),
            StoreError::MissingReference { .. } => AppError::ValidationError {
                message: err.to_string(),
                fields: BTreeMap::new(),
            },
            StoreError::SeatTaken { .. } | StoreError::SeatMapLocked(_) => AppError::ConflictError(err.to_string()),
            StoreError::SeatOutOfRange { flight_id, ref source } => {
                AppError::seat_out_of_range(format!("Invalid seat for flight {flight_id}: "), source)
            }
            StoreError::Backend(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Route(e @ RouteError::SameEndpoint { .. }) => AppError::invalid_field("destination", e.to_string()),
            CatalogError::Airplane(e) => AppError::invalid_field(e.field(), e.to_string()),
            CatalogError::Store(e) => e.into(),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::EmptyOrder | OrderError::FlightNotFound { .. } => {
                AppError::invalid_field("tickets", err.to_string())
            }
            OrderError::SeatOutOfRange { index, ref source, .. } => {
                AppError::seat_out_of_range(format!("Ticket {index}: "), source)
            }
            OrderError::SeatTaken { .. } => AppError::ConflictError(err.to_string()),
            OrderError::NotFound(_) => AppError::NotFoundError(err.to_string()),
            OrderError::Store(e) => e.into(),
        }
    }
}

impl From<FilterError> for AppError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::MalformedRoutePair { field, .. } => AppError::invalid_field(field, err.to_string()),
        }
    }
}
