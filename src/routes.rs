use crate::{
    error::{BadOriginSnafu, StudentError, StudentResult},
    routes::{
        api::{delete_student, get_all_students, post_new_student, put_student},
        health::get_health,
        ui::{
            get_ui, internal_delete_student, internal_get_close_modal, internal_get_modal,
            internal_get_students, internal_post_student, internal_put_student,
        },
    },
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, Uri, header::CONTENT_TYPE},
    routing::{get, post, put},
};
use snafu::ResultExt;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod health;
pub mod ui;

const MAX_BODY_BYTES: usize = 64 * 1024;

async fn no_such_route(method: Method, uri: Uri) -> StudentError {
    StudentError::NoSuchRoute {
        method,
        path: uri.path().to_string(),
    }
}

async fn method_not_allowed(method: Method, uri: Uri) -> StudentError {
    StudentError::MethodNotAllowed {
        method,
        path: uri.path().to_string(),
    }
}

pub fn build_router(state: AppState) -> StudentResult<Router> {
    let frontend_origin = state.config().server_config().frontend_origin.clone();
    let origin = HeaderValue::from_str(&frontend_origin).context(BadOriginSnafu {
        origin: frontend_origin.clone(),
    })?;

    let cors_layer = CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    Ok(Router::new()
        .route("/", get(get_all_students))
        .route("/mahasiswa", post(post_new_student))
        .route("/mahasiswa/{id}", put(put_student).delete(delete_student))
        .route("/health", get(get_health))
        .route("/ui", get(get_ui))
        .route(
            "/internal/students",
            get(internal_get_students).post(internal_post_student),
        )
        .route(
            "/internal/students/{id}",
            put(internal_put_student).delete(internal_delete_student),
        )
        .route("/internal/modal", get(internal_get_modal))
        .route("/internal/modal/close", get(internal_get_close_modal))
        .fallback(no_such_route)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
