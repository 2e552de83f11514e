use crate::{
    config::DbConfig,
    data::{
        StudentStore, WriteOutcome,
        student::{NewStudent, Student},
    },
    error::{
        CreateSchemaSnafu, GetDatabaseConnectionSnafu, MakeQuerySnafu, OpenDatabaseSnafu,
        StudentResult,
    },
};
use async_trait::async_trait;
use snafu::ResultExt;
use sqlx::{Pool, Postgres, pool::PoolConnection, postgres::PgPoolOptions};

const SCHEMA: &str = include_str!("../../schema.sql");

#[derive(Clone, Debug)]
pub struct PostgresStudentStore {
    pool: Pool<Postgres>,
}

impl PostgresStudentStore {
    /// Never fails because the database is down: if the first connection can't be made
    /// the error is logged and a lazy pool is used instead, so each query fails on its own
    /// until the database comes back.
    pub async fn connect(options: PgPoolOptions, db_config: &DbConfig) -> StudentResult<Self> {
        let url = db_config.get_db_path();

        let pool = match options.clone().connect(&url).await {
            Ok(pool) => {
                info!("Connected to the database");
                pool
            }
            Err(e) => {
                error!(?e, "Error connecting to the database, continuing without it");
                options.connect_lazy(&url).context(OpenDatabaseSnafu)?
            }
        };

        Ok(Self { pool })
    }

    pub const fn from_pool(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> StudentResult<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .context(CreateSchemaSnafu)?;
        Ok(())
    }

    async fn get_connection(&self) -> StudentResult<PoolConnection<Postgres>> {
        self.pool
            .acquire()
            .await
            .context(GetDatabaseConnectionSnafu)
    }
}

#[async_trait]
impl StudentStore for PostgresStudentStore {
    async fn get_all(&self) -> StudentResult<Vec<Student>> {
        let mut conn = self.get_connection().await?;
        sqlx::query_as::<_, Student>(
            "SELECT id, nim, nama_lengkap, kelas, alamat FROM mahasiswa ORDER BY id",
        )
        .fetch_all(&mut *conn)
        .await
        .context(MakeQuerySnafu)
    }

    async fn get_by_id(&self, id: i32) -> StudentResult<Option<Student>> {
        let mut conn = self.get_connection().await?;
        sqlx::query_as::<_, Student>(
            "SELECT id, nim, nama_lengkap, kelas, alamat FROM mahasiswa WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .context(MakeQuerySnafu)
    }

    async fn insert(&self, to_be_added: NewStudent) -> StudentResult<WriteOutcome> {
        let mut conn = self.get_connection().await?;
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO mahasiswa (nim, nama_lengkap, kelas, alamat) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(to_be_added.nim())
        .bind(to_be_added.nama_lengkap())
        .bind(to_be_added.kelas())
        .bind(to_be_added.alamat())
        .fetch_one(&mut *conn)
        .await
        .context(MakeQuerySnafu)?;

        Ok(WriteOutcome::inserted(id))
    }

    async fn update(&self, id: i32, replacement: NewStudent) -> StudentResult<WriteOutcome> {
        let mut conn = self.get_connection().await?;
        let result = sqlx::query(
            "UPDATE mahasiswa SET nim = $1, nama_lengkap = $2, kelas = $3, alamat = $4 WHERE id = $5",
        )
        .bind(replacement.nim())
        .bind(replacement.nama_lengkap())
        .bind(replacement.kelas())
        .bind(replacement.alamat())
        .bind(id)
        .execute(&mut *conn)
        .await
        .context(MakeQuerySnafu)?;

        Ok(WriteOutcome::affected(result.rows_affected()))
    }

    async fn remove(&self, id: i32) -> StudentResult<WriteOutcome> {
        let mut conn = self.get_connection().await?;
        let result = sqlx::query("DELETE FROM mahasiswa WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .context(MakeQuerySnafu)?;

        Ok(WriteOutcome::affected(result.rows_affected()))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::student::StudentForm;

    // Run with: DATABASE_URL=postgres://... cargo test -- --ignored

    async fn store() -> PostgresStudentStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("pool creation failed");
        let store = PostgresStudentStore::from_pool(pool);
        store.ensure_schema().await.expect("schema creation failed");
        store
    }

    fn new_student(nim: i64, nama: &str) -> NewStudent {
        StudentForm {
            nim,
            nama_lengkap: nama.into(),
            kelas: "X".into(),
            alamat: "Y".into(),
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn unreachable_database_gives_up_within_the_acquire_timeout() {
        let db_config = DbConfig::from_lookup(|name| match name {
            "DB_USER" => Ok("nobody".into()),
            "DB_PATH" => Ok("127.0.0.1".into()),
            "DB_PORT" => Ok("1".into()),
            "DB_NAME" => Ok("nowhere".into()),
            "DB_ACQUIRE_TIMEOUT_SECS" => Ok("1".into()),
            _ => Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)),
        })
        .unwrap();
        let options = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(db_config.acquire_timeout());

        let started = std::time::Instant::now();
        let store = PostgresStudentStore::connect(options, &db_config)
            .await
            .expect("a down database still yields a store");
        assert!(store.get_all().await.is_err());
        assert!(store.ensure_schema().await.is_err());
        assert!(started.elapsed() < std::time::Duration::from_secs(10));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn insert_update_remove_round_trip() {
        let store = store().await;

        let outcome = store.insert(new_student(123, "A")).await.unwrap();
        let id = outcome.insert_id.expect("insert returns the new id");
        assert_eq!(outcome.affected_rows, 1);

        let updated = store.update(id, new_student(456, "B")).await.unwrap();
        assert_eq!(updated.affected_rows, 1);
        let found = store.get_by_id(id).await.unwrap().expect("row exists");
        assert_eq!(found.nim, 456);
        assert_eq!(found.nama_lengkap, "B");

        assert_eq!(store.remove(id).await.unwrap().affected_rows, 1);
        assert!(store.get_by_id(id).await.unwrap().is_none());
        assert!(store.remove(id).await.unwrap().matched_nothing());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn bound_values_are_not_interpreted_as_sql() {
        let store = store().await;

        let nasty = "x'); DROP TABLE mahasiswa; --";
        let id = store
            .insert(new_student(1, nasty))
            .await
            .unwrap()
            .insert_id
            .unwrap();

        let found = store.get_by_id(id).await.unwrap().expect("row exists");
        assert_eq!(found.nama_lengkap, nasty);
        store.remove(id).await.unwrap();
    }
}
