//! Error types for server startup and HTTP handlers.
//!
//! # Invariants
//! - Handler failures never leak internal detail to clients; the detail is
//!   logged and the body carries a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use itemlist_core::db::DbError;
use itemlist_core::{CatalogError, RepoError};
use log::error;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Handler-level error.
#[derive(Debug)]
pub enum ServerError {
    /// Blocking task failed or shared state is unusable.
    Internal(String),
}

/// JSON body returned on error.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: u16,
}

impl Display for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Internal(detail) => write!(f, "internal server error: {detail}"),
        }
    }
}

impl Error for ServerError {}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(detail) => {
                error!(
                    "event=http_handler module=http status=error error_code=internal error={detail}"
                );
            }
        }

        let body = ErrorBody {
            error: "internal server error".to_string(),
            code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Errors that prevent the server from starting.
#[derive(Debug)]
pub enum StartupError {
    Logging(String),
    Db(DbError),
    Repo(RepoError),
    Catalog(CatalogError),
    Io(std::io::Error),
}

impl Display for StartupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(message) => write!(f, "logging init failed: {message}"),
            Self::Db(err) => write!(f, "database open failed: {err}"),
            Self::Repo(err) => write!(f, "order repository init failed: {err}"),
            Self::Catalog(err) => write!(f, "catalog build failed: {err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StartupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(_) => None,
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Catalog(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<DbError> for StartupError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for StartupError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<CatalogError> for StartupError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<std::io::Error> for StartupError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
