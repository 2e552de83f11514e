use crate::envelope;
use axum::{
    extract::rejection::{FormRejection, JsonRejection, PathRejection},
    http::{Method, StatusCode, header::InvalidHeaderValue},
    response::{IntoResponse, Response},
};
use snafu::Snafu;
use std::num::ParseIntError;

pub type StudentResult<T> = Result<T, StudentError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StudentError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: sqlx::Error },
    #[snafu(display("Error getting db connection"))]
    GetDatabaseConnection { source: sqlx::Error },
    #[snafu(display("Error making SQL query"))]
    MakeQuery { source: sqlx::Error },
    #[snafu(display("Error creating the `mahasiswa` table"))]
    CreateSchema { source: sqlx::Error },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse env var `{}` as a number", name))]
    ParseNumber {
        source: ParseIntError,
        name: &'static str,
    },
    #[snafu(display("Unknown store kind {:?}, expected `postgres` or `memory`", found))]
    UnknownStoreKind { found: String },
    #[snafu(display("Postgres store selected, but no database configuration was loaded"))]
    MissingDbConfig,
    #[snafu(display("Invalid frontend origin {:?}", origin))]
    BadOrigin {
        source: InvalidHeaderValue,
        origin: String,
    },
    #[snafu(display("Data not found: no mahasiswa with id {}", id))]
    MissingStudent { id: i32 },
    #[snafu(display("Invalid `{}`: {}", field, problem))]
    InvalidField {
        field: &'static str,
        problem: String,
    },
    #[snafu(display("Invalid JSON body: {}", source.body_text()))]
    BadJson { source: JsonRejection },
    #[snafu(display("Invalid form body: {}", source.body_text()))]
    BadForm { source: FormRejection },
    #[snafu(display("Invalid id in path: {}", source.body_text()))]
    BadPathId { source: PathRejection },
    #[snafu(display("No route for {} {}", method, path))]
    NoSuchRoute { method: Method, path: String },
    #[snafu(display("{} is not allowed on {}", method, path))]
    MethodNotAllowed { method: Method, path: String },
}

impl StudentError {
    #[allow(clippy::match_same_arms)]
    pub fn status_code(&self) -> StatusCode {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        match self {
            Self::OpenDatabase { .. } | Self::GetDatabaseConnection { .. } => ISE,
            Self::MakeQuery { .. } | Self::CreateSchema { .. } => ISE,
            Self::BadEnvVar { .. } | Self::ParseNumber { .. } => ISE,
            Self::UnknownStoreKind { .. } | Self::MissingDbConfig => ISE,
            Self::BadOrigin { .. } => ISE,
            Self::MissingStudent { .. } => NF,
            Self::InvalidField { .. } => BI,
            //oversized bodies keep their 413
            Self::BadJson { source } => match source.status() {
                StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
                _ => BI,
            },
            Self::BadForm { source } => match source.status() {
                StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
                _ => BI,
            },
            Self::BadPathId { .. } => BI,
            Self::NoSuchRoute { .. } => NF,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for StudentError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        error!(?self, "Error!");
        envelope::response(status_code, serde_json::Value::Null, self.to_string())
    }
}
