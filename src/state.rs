use crate::{
    config::{RuntimeConfiguration, StoreKind},
    data::{StudentStore, memory::MemoryStudentStore, postgres::PostgresStudentStore},
    error::{MissingDbConfigSnafu, StudentResult},
};
use maud::{DOCTYPE, Markup, html};
use snafu::OptionExt;
use sqlx::postgres::PgPoolOptions;
use std::{ops::Deref, sync::Arc};

#[derive(Clone, Debug)]
pub struct AppState {
    store: Arc<dyn StudentStore>,
    config: RuntimeConfiguration,
}

impl AppState {
    pub async fn new(config: RuntimeConfiguration) -> StudentResult<Self> {
        let store: Arc<dyn StudentStore> = match config.server_config().store_kind {
            StoreKind::Postgres => {
                let db_config = config.db_config().context(MissingDbConfigSnafu)?;
                let options = PgPoolOptions::new()
                    .max_connections(db_config.max_connections())
                    .acquire_timeout(db_config.acquire_timeout());

                let store = PostgresStudentStore::connect(options, &db_config).await?;

                //off the startup path so an unreachable database can't hold up the listener
                let schema_store = store.clone();
                tokio::spawn(async move {
                    if let Err(e) = schema_store.ensure_schema().await {
                        error!(?e, "Unable to make sure the `mahasiswa` table exists");
                    }
                });

                Arc::new(store)
            }
            StoreKind::Memory => {
                warn!("Using the in-memory store, nothing will be persisted");
                Arc::new(MemoryStudentStore::new())
            }
        };

        Ok(Self::with_store(store, config))
    }

    pub fn with_store(store: Arc<dyn StudentStore>, config: RuntimeConfiguration) -> Self {
        Self { store, config }
    }

    pub const fn config(&self) -> &RuntimeConfiguration {
        &self.config
    }

    #[allow(clippy::unused_self, clippy::needless_pass_by_value)] //in case self is ever needed, and to allow direct html! usage
    pub fn render(&self, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Data Mahasiswa" }
                }
                body class="min-h-screen bg-gray-100 flex flex-col items-center justify-center p-4" {
                    (markup)
                }
            }
        }
    }

    pub async fn sensible_shutdown(&self) {
        self.store.close().await;
    }
}

impl Deref for AppState {
    type Target = dyn StudentStore;

    fn deref(&self) -> &Self::Target {
        self.store.as_ref()
    }
}
