//! The fixed JSON shape every API response is wrapped in.
//!
//! ```json
//! { "payload": { "status_code": 200, "datas": [], "message": "..." },
//!   "pagination": { "prev": "", "next": "", "max": "" } }
//! ```
//!
//! Pagination is reserved but never filled in.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub payload: Payload<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Payload<T> {
    pub status_code: u16,
    pub datas: T,
    pub message: String,
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub prev: String,
    pub next: String,
    pub max: String,
}

impl<T> Envelope<T> {
    pub fn new(status_code: StatusCode, datas: T, message: impl Into<String>) -> Self {
        Self {
            payload: Payload {
                status_code: status_code.as_u16(),
                datas,
                message: message.into(),
            },
            pagination: Pagination::default(),
        }
    }
}

/// Writes `datas` inside the envelope, with `status_code` as the HTTP status too.
pub fn response<T: Serialize>(
    status_code: StatusCode,
    datas: T,
    message: impl Into<String>,
) -> Response {
    (status_code, Json(Envelope::new(status_code, datas, message))).into_response()
}
