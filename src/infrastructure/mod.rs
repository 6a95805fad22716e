pub mod memory;
pub mod models;
pub mod pg_store;

use crate::domain::errors::DomainError;
use crate::domain::ports::{Store, StoreTx};

pub use memory::InMemoryStore;
pub use pg_store::PgStore;

/// The store the server runs on, picked once at startup.
#[derive(Clone)]
pub enum ShopStore {
    Postgres(PgStore),
    Memory(InMemoryStore),
}

impl Store for ShopStore {
    fn transaction<T, F>(&self, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn StoreTx) -> Result<T, DomainError>,
    {
        match self {
            ShopStore::Postgres(store) => store.transaction(f),
            ShopStore::Memory(store) => store.transaction(f),
        }
    }
}
