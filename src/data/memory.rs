use crate::{
    data::{
        StudentStore, WriteOutcome,
        student::{NewStudent, Student},
    },
    error::StudentResult,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

/// Keeps the table in process memory, handing out ids like a `SERIAL` column.
#[derive(Debug)]
pub struct MemoryStudentStore {
    table: Mutex<MemoryTable>,
}

#[derive(Debug)]
struct MemoryTable {
    next_id: i32,
    rows: BTreeMap<i32, Student>,
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(MemoryTable {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }
}

impl Default for MemoryStudentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn get_all(&self) -> StudentResult<Vec<Student>> {
        Ok(self.table.lock().await.rows.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i32) -> StudentResult<Option<Student>> {
        Ok(self.table.lock().await.rows.get(&id).cloned())
    }

    async fn insert(&self, to_be_added: NewStudent) -> StudentResult<WriteOutcome> {
        let mut table = self.table.lock().await;
        let id = table.next_id;
        table.next_id += 1;
        table.rows.insert(id, to_be_added.into_student(id));

        Ok(WriteOutcome::inserted(id))
    }

    async fn update(&self, id: i32, replacement: NewStudent) -> StudentResult<WriteOutcome> {
        let mut table = self.table.lock().await;
        Ok(match table.rows.get_mut(&id) {
            Some(row) => {
                *row = replacement.into_student(id);
                WriteOutcome::affected(1)
            }
            None => WriteOutcome::affected(0),
        })
    }

    async fn remove(&self, id: i32) -> StudentResult<WriteOutcome> {
        let removed = self.table.lock().await.rows.remove(&id);
        Ok(WriteOutcome::affected(u64::from(removed.is_some())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::student::StudentForm;

    fn new_student(nim: i64, nama: &str, kelas: &str, alamat: &str) -> NewStudent {
        StudentForm {
            nim,
            nama_lengkap: nama.into(),
            kelas: kelas.into(),
            alamat: alamat.into(),
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn ids_are_assigned_in_order_and_never_reused() {
        let store = MemoryStudentStore::new();

        let first = store.insert(new_student(1, "A", "X", "Y")).await.unwrap();
        let second = store.insert(new_student(2, "B", "X", "Y")).await.unwrap();
        assert_eq!(first, WriteOutcome::inserted(1));
        assert_eq!(second, WriteOutcome::inserted(2));

        store.remove(2).await.unwrap();
        let third = store.insert(new_student(3, "C", "X", "Y")).await.unwrap();
        assert_eq!(third.insert_id, Some(3));
    }

    #[tokio::test]
    async fn update_replaces_every_field() {
        let store = MemoryStudentStore::new();
        store.insert(new_student(123, "A", "X", "Y")).await.unwrap();

        let outcome = store
            .update(1, new_student(456, "B", "Z", "W"))
            .await
            .unwrap();
        assert_eq!(outcome.affected_rows, 1);
        assert_eq!(
            store.get_by_id(1).await.unwrap(),
            Some(Student {
                id: 1,
                nim: 456,
                nama_lengkap: "B".into(),
                kelas: "Z".into(),
                alamat: "W".into(),
            })
        );
    }

    #[tokio::test]
    async fn missing_rows_affect_nothing() {
        let store = MemoryStudentStore::new();
        store.insert(new_student(1, "A", "X", "Y")).await.unwrap();

        assert!(store
            .update(9, new_student(2, "B", "X", "Y"))
            .await
            .unwrap()
            .matched_nothing());
        assert!(store.remove(9).await.unwrap().matched_nothing());
        assert_eq!(store.get_all().await.unwrap().len(), 1);
    }
}
