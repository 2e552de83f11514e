//! The JSON API. The `*_student(s)` operations are shared with the UI handlers, so both
//! surfaces validate, write and report missing rows the same way.

use crate::{
    data::{WriteOutcome, student::{Student, StudentForm}},
    envelope,
    error::{BadJsonSnafu, BadPathIdSnafu, MissingStudentSnafu, StudentResult},
    state::AppState,
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::Response,
};
use snafu::ResultExt;

pub async fn list_students(state: &AppState) -> StudentResult<Vec<Student>> {
    state.get_all().await
}

pub async fn create_student(state: &AppState, form: StudentForm) -> StudentResult<WriteOutcome> {
    let outcome = state.insert(form.validate()?).await?;
    info!(id = ?outcome.insert_id, "Added mahasiswa");
    Ok(outcome)
}

pub async fn update_student(
    state: &AppState,
    id: i32,
    form: StudentForm,
) -> StudentResult<WriteOutcome> {
    let outcome = state.update(id, form.validate()?).await?;
    snafu::ensure!(!outcome.matched_nothing(), MissingStudentSnafu { id });
    info!(id, "Updated mahasiswa");
    Ok(outcome)
}

pub async fn remove_student(state: &AppState, id: i32) -> StudentResult<WriteOutcome> {
    let outcome = state.remove(id).await?;
    snafu::ensure!(!outcome.matched_nothing(), MissingStudentSnafu { id });
    info!(id, "Deleted mahasiswa");
    Ok(outcome)
}

pub async fn get_all_students(State(state): State<AppState>) -> StudentResult<Response> {
    let students = list_students(&state).await?;
    Ok(envelope::response(
        StatusCode::OK,
        students,
        "Get all data mahasiswa",
    ))
}

pub async fn post_new_student(
    State(state): State<AppState>,
    body: Result<Json<StudentForm>, JsonRejection>,
) -> StudentResult<Response> {
    let Json(form) = body.context(BadJsonSnafu)?;

    let outcome = create_student(&state, form).await?;
    Ok(envelope::response(
        StatusCode::CREATED,
        outcome,
        "Data mahasiswa added successfully",
    ))
}

pub async fn put_student(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<StudentForm>, JsonRejection>,
) -> StudentResult<Response> {
    let Path(id) = id.context(BadPathIdSnafu)?;
    let Json(form) = body.context(BadJsonSnafu)?;

    let outcome = update_student(&state, id, form).await?;
    Ok(envelope::response(
        StatusCode::OK,
        outcome,
        "Data mahasiswa updated successfully",
    ))
}

pub async fn delete_student(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> StudentResult<Response> {
    let Path(id) = id.context(BadPathIdSnafu)?;

    let outcome = remove_student(&state, id).await?;
    Ok(envelope::response(
        StatusCode::OK,
        outcome,
        "Data mahasiswa deleted successfully",
    ))
}
