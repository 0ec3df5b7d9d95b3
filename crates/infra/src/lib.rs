//! Infrastructure layer: stores, morphology oracles, locking, config.

pub mod config;
pub mod locks;
pub mod morphology;
pub mod mutator;
pub mod store;


pub use config::{AppConfig, ConfigError, OracleBackend, StoreBackend};
pub use locks::UserLocks;
pub use morphology::{
    HttpMorphologyOracle, MorphologyOracle, OracleError, RuleBasedOracle, TimeoutOracle,
};
pub use mutator::{InventoryMutator, MutationError};
pub use store::{
    ActorDirectory, InMemoryInventoryStore, InventoryStore, PostgresInventoryStore, StoreError,
    UserProfile,
};
