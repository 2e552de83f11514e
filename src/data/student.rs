use crate::error::{InvalidFieldSnafu, StudentResult};
use serde::{Deserialize, Serialize};

const MAX_NAMA_LENGKAP: usize = 255;
const MAX_KELAS: usize = 50;
const MAX_ALAMAT: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    pub id: i32,
    pub nim: i64,
    pub nama_lengkap: String,
    pub kelas: String,
    pub alamat: String,
}

/// Body of a create or update, as sent by a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentForm {
    pub nim: i64,
    pub nama_lengkap: String,
    pub kelas: String,
    pub alamat: String,
}

/// A [`StudentForm`] that has passed [`StudentForm::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    nim: i64,
    nama_lengkap: String,
    kelas: String,
    alamat: String,
}

impl NewStudent {
    pub const fn nim(&self) -> i64 {
        self.nim
    }

    pub fn nama_lengkap(&self) -> &str {
        &self.nama_lengkap
    }

    pub fn kelas(&self) -> &str {
        &self.kelas
    }

    pub fn alamat(&self) -> &str {
        &self.alamat
    }

    pub fn into_student(self, id: i32) -> Student {
        let Self {
            nim,
            nama_lengkap,
            kelas,
            alamat,
        } = self;
        Student {
            id,
            nim,
            nama_lengkap,
            kelas,
            alamat,
        }
    }
}

fn check_text(field: &'static str, value: String, max: usize) -> StudentResult<String> {
    let trimmed = value.trim();
    snafu::ensure!(
        !trimmed.is_empty(),
        InvalidFieldSnafu {
            field,
            problem: "must not be empty"
        }
    );
    let length = trimmed.chars().count();
    snafu::ensure!(
        length <= max,
        InvalidFieldSnafu {
            field,
            problem: format!("must be at most {max} characters, got {length}")
        }
    );

    Ok(trimmed.to_string())
}

impl StudentForm {
    pub fn validate(self) -> StudentResult<NewStudent> {
        let Self {
            nim,
            nama_lengkap,
            kelas,
            alamat,
        } = self;

        snafu::ensure!(
            nim >= 0,
            InvalidFieldSnafu {
                field: "nim",
                problem: "must not be negative"
            }
        );

        Ok(NewStudent {
            nim,
            nama_lengkap: check_text("nama_lengkap", nama_lengkap, MAX_NAMA_LENGKAP)?,
            kelas: check_text("kelas", kelas, MAX_KELAS)?,
            alamat: check_text("alamat", alamat, MAX_ALAMAT)?,
        })
    }
}
