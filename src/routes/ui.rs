//! Server-rendered student table with create/edit/delete modals.
//!
//! The table lives in `#students` and reloads on page load and whenever a mutation
//! answers with the `students-changed` trigger. Mutations go through the same operations
//! as the JSON API and always close the modal, even when they fail; failures only end up
//! in the logs.

use crate::{
    data::student::{Student, StudentForm},
    error::{BadFormSnafu, BadPathIdSnafu, InvalidFieldSnafu, MissingStudentSnafu, StudentResult},
    maud_conveniences::{error_banner, form_element, render_table, simple_form_element, title},
    routes::api::{create_student, list_students, remove_student, update_student},
    state::AppState,
};
use axum::{
    Form,
    extract::{
        Path, Query, State,
        rejection::{FormRejection, PathRejection},
    },
    response::IntoResponse,
};
use maud::{Markup, Render, html};
use serde::Deserialize;
use snafu::{OptionExt, ResultExt};

const HX_TRIGGER: &str = "HX-Trigger";
const STUDENTS_CHANGED: &str = "students-changed";

pub async fn get_ui(State(state): State<AppState>) -> Markup {
    state.render(html! {
        h1 class="text-4xl font-bold text-gray-700 mb-6" {"Data Mahasiswa"}

        button hx-get="/internal/modal?mode=create" hx-target="#modal" class="mb-4 px-6 py-2 bg-blue-500 text-white rounded-lg" {
            "Tambah Mahasiswa"
        }

        div class="w-full max-w-4xl bg-white p-6 rounded-lg shadow-lg" {
            div id="students" hx-get="/internal/students" hx-trigger={"load, " (STUDENTS_CHANGED) " from:body"} {
                p class="text-lg text-blue-500" {"Loading..."}
            }
        }

        div id="modal" {}
    })
}

pub async fn internal_get_students(State(state): State<AppState>) -> Markup {
    let students = match list_students(&state).await {
        Ok(students) => students,
        Err(e) => {
            error!(?e, "Unable to fetch mahasiswa for the table");
            return error_banner("Gagal mengambil data");
        }
    };

    render_table(
        ["ID", "NIM", "Nama Lengkap", "Kelas", "Alamat", "Actions"],
        students.into_iter().map(student_row).collect(),
        "Data tidak tersedia",
    )
}

fn student_row(student: Student) -> [Markup; 6] {
    let id = student.id;
    [
        html! {(id)},
        html! {(student.nim)},
        html! {(student.nama_lengkap)},
        html! {(student.kelas)},
        html! {(student.alamat)},
        html! {
            button hx-get={"/internal/modal?mode=edit&id=" (id)} hx-target="#modal" class="px-4 py-2 bg-yellow-500 text-white rounded-lg mr-2" {
                "Edit"
            }
            button hx-get={"/internal/modal?mode=delete&id=" (id)} hx-target="#modal" class="px-4 py-2 bg-red-500 text-white rounded-lg" {
                "Delete"
            }
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalMode {
    Create,
    Edit,
    Delete,
}

#[derive(Deserialize)]
pub struct ModalQuery {
    mode: ModalMode,
    id: Option<i32>,
}

/// `Closed -> {Create, Edit, Delete} -> Closed`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Closed,
    Create,
    Edit(Student),
    Delete(Student),
}

impl Modal {
    fn overlay(inner: Markup) -> Markup {
        html! {
            div class="fixed inset-0 bg-gray-800/50 flex items-center justify-center" {
                div class="bg-white p-6 rounded-lg shadow-lg w-96" {
                    (inner)
                }
            }
        }
    }

    fn cancel_button() -> Markup {
        html! {
            button type="button" hx-get="/internal/modal/close" hx-target="#modal" class="px-4 py-2 bg-gray-400 text-white rounded-lg mr-2" {
                "Cancel"
            }
        }
    }

    fn student_form(existing: Option<&Student>) -> Markup {
        let nim = existing.map(|student| student.nim.to_string());
        let form_body = html! {
            (simple_form_element("nim", "NIM", Some("number"), nim.as_deref()))
            (simple_form_element("nama_lengkap", "Nama Lengkap", None, existing.map(|s| s.nama_lengkap.as_str())))
            (simple_form_element("kelas", "Kelas", None, existing.map(|s| s.kelas.as_str())))
            (simple_form_element("alamat", "Alamat", None, existing.map(|s| s.alamat.as_str())))
            div class="flex justify-end" {
                (Self::cancel_button())
                button type="submit" class="px-4 py-2 bg-blue-500 text-white rounded-lg" {
                    @if existing.is_some() { "Simpan" } @else { "Tambah" }
                }
            }
        };

        match existing {
            Some(student) => html! {
                form hx-put={"/internal/students/" (student.id)} hx-target="#modal" {
                    (form_body)
                }
            },
            None => html! {
                form hx-post="/internal/students" hx-target="#modal" {
                    (form_body)
                }
            },
        }
    }
}

impl Render for Modal {
    fn render(&self) -> Markup {
        match self {
            Self::Closed => html! {},
            Self::Create => Self::overlay(html! {
                (title("Tambah Mahasiswa"))
                (Self::student_form(None))
            }),
            Self::Edit(student) => Self::overlay(html! {
                (title("Edit Mahasiswa"))
                (Self::student_form(Some(student)))
            }),
            Self::Delete(student) => Self::overlay(html! {
                (title("Hapus Mahasiswa"))
                p class="mb-4" {
                    "Apakah Anda yakin ingin menghapus mahasiswa ini?"
                }
                (form_element("nama_lengkap", "Nama Lengkap", html! {
                    p id="nama_lengkap" class="text-gray-600" {(student.nama_lengkap) " (" (student.nim) ")"}
                }))
                div class="flex justify-end" {
                    (Self::cancel_button())
                    button hx-delete={"/internal/students/" (student.id)} hx-target="#modal" class="px-4 py-2 bg-red-500 text-white rounded-lg" {
                        "Hapus"
                    }
                }
            }),
        }
    }
}

pub async fn internal_get_modal(
    State(state): State<AppState>,
    Query(ModalQuery { mode, id }): Query<ModalQuery>,
) -> StudentResult<Markup> {
    let modal = match mode {
        ModalMode::Create => Modal::Create,
        ModalMode::Edit | ModalMode::Delete => {
            let id = id.context(InvalidFieldSnafu {
                field: "id",
                problem: "required to edit or delete",
            })?;
            let student = state
                .get_by_id(id)
                .await?
                .context(MissingStudentSnafu { id })?;

            if mode == ModalMode::Edit {
                Modal::Edit(student)
            } else {
                Modal::Delete(student)
            }
        }
    };

    Ok(modal.render())
}

pub async fn internal_get_close_modal() -> Markup {
    Modal::Closed.render()
}

fn close_after<T>(action: &'static str, result: StudentResult<T>) -> impl IntoResponse {
    if let Err(e) = result {
        error!(?e, action, "Unable to change mahasiswa");
    }

    ([(HX_TRIGGER, STUDENTS_CHANGED)], Modal::Closed.render())
}

fn form_body(form: Result<Form<StudentForm>, FormRejection>) -> StudentResult<StudentForm> {
    let Form(form) = form.context(BadFormSnafu)?;
    Ok(form)
}

fn path_id(id: Result<Path<i32>, PathRejection>) -> StudentResult<i32> {
    let Path(id) = id.context(BadPathIdSnafu)?;
    Ok(id)
}

pub async fn internal_post_student(
    State(state): State<AppState>,
    form: Result<Form<StudentForm>, FormRejection>,
) -> impl IntoResponse {
    let result = match form_body(form) {
        Ok(form) => create_student(&state, form).await,
        Err(e) => Err(e),
    };
    close_after("create", result)
}

pub async fn internal_put_student(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    form: Result<Form<StudentForm>, FormRejection>,
) -> impl IntoResponse {
    let result = match (path_id(id), form_body(form)) {
        (Ok(id), Ok(form)) => update_student(&state, id, form).await,
        (Err(e), _) | (_, Err(e)) => Err(e),
    };
    close_after("update", result)
}

pub async fn internal_delete_student(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> impl IntoResponse {
    let result = match path_id(id) {
        Ok(id) => remove_student(&state, id).await,
        Err(e) => Err(e),
    };
    close_after("delete", result)
}
