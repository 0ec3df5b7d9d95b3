//! Backend selection and wiring of the chat dispatcher.

use std::sync::Arc;

use tracing::info;

use quartermaster_infra::{
    ActorDirectory, AppConfig, HttpMorphologyOracle, InMemoryInventoryStore, InventoryMutator,
    InventoryStore, MorphologyOracle, OracleBackend, PostgresInventoryStore, RuleBasedOracle,
    StoreBackend, StoreError, TimeoutOracle,
};

use crate::chat::ChatDispatcher;

pub type DynDispatcher =
    ChatDispatcher<Arc<dyn InventoryStore>, Arc<dyn ActorDirectory>, Arc<dyn MorphologyOracle>>;

pub struct AppServices {
    pub dispatcher: DynDispatcher,
}

impl AppServices {
    /// In-memory store with the rule-based oracle. Used by tests and local runs.
    pub fn in_memory(prefix: &str) -> Self {
        let store = Arc::new(InMemoryInventoryStore::new());
        let oracle: Arc<dyn MorphologyOracle> = Arc::new(RuleBasedOracle::new());
        Self::wire(store.clone(), store, oracle, prefix)
    }

    fn wire(
        store: Arc<dyn InventoryStore>,
        directory: Arc<dyn ActorDirectory>,
        oracle: Arc<dyn MorphologyOracle>,
        prefix: &str,
    ) -> Self {
        let mutator = InventoryMutator::new(store, oracle);
        Self {
            dispatcher: ChatDispatcher::new(mutator, directory, prefix),
        }
    }

    pub fn store(&self) -> &Arc<dyn InventoryStore> {
        self.dispatcher.store()
    }

    pub fn directory(&self) -> &Arc<dyn ActorDirectory> {
        self.dispatcher.directory()
    }
}

pub async fn build_services(config: &AppConfig) -> Result<AppServices, StoreError> {
    let oracle: Arc<dyn MorphologyOracle> = match &config.oracle {
        OracleBackend::Rules => {
            Arc::new(TimeoutOracle::new(RuleBasedOracle::new(), config.oracle_timeout))
        }
        OracleBackend::Http { url } => Arc::new(TimeoutOracle::new(
            HttpMorphologyOracle::new(url, config.oracle_timeout),
            config.oracle_timeout,
        )),
    };

    let services = match &config.store {
        StoreBackend::Memory => {
            info!("using in-memory inventory store");
            let store = Arc::new(InMemoryInventoryStore::new());
            AppServices::wire(store.clone(), store, oracle, &config.command_prefix)
        }
        StoreBackend::Postgres { database_url } => {
            let store = Arc::new(PostgresInventoryStore::connect(database_url).await?);
            store.ensure_schema().await?;
            info!("using postgres inventory store");
            AppServices::wire(store.clone(), store, oracle, &config.command_prefix)
        }
    };

    Ok(services)
}
