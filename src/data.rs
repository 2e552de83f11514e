use crate::{
    data::student::{NewStudent, Student},
    error::StudentResult,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub mod memory;
pub mod postgres;
pub mod student;

/// What a write did, in place of the written row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOutcome {
    pub affected_rows: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub insert_id: Option<i32>,
}

impl WriteOutcome {
    pub const fn inserted(id: i32) -> Self {
        Self {
            affected_rows: 1,
            insert_id: Some(id),
        }
    }

    pub const fn affected(affected_rows: u64) -> Self {
        Self {
            affected_rows,
            insert_id: None,
        }
    }

    pub const fn matched_nothing(&self) -> bool {
        self.affected_rows == 0
    }
}

/// Storage for the `mahasiswa` table. Handlers only ever see this, so tests can swap in
/// [`memory::MemoryStudentStore`].
#[async_trait]
pub trait StudentStore: Debug + Send + Sync {
    async fn get_all(&self) -> StudentResult<Vec<Student>>;
    async fn get_by_id(&self, id: i32) -> StudentResult<Option<Student>>;
    async fn insert(&self, to_be_added: NewStudent) -> StudentResult<WriteOutcome>;
    /// Overwrites every mutable column. A missing row is reported as zero affected rows.
    async fn update(&self, id: i32, replacement: NewStudent) -> StudentResult<WriteOutcome>;
    async fn remove(&self, id: i32) -> StudentResult<WriteOutcome>;

    async fn close(&self) {}
}
