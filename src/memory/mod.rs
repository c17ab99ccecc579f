// src/memory/mod.rs — Usage log and contact inbox persisted in SQLite

pub mod schema;
pub mod store;
pub mod store_server;

use rusqlite::Connection;

use crate::infra::config::StoreConfig;
pub use store_server::{spawn_store_server, StoreHandle};

/// Open (or create) the database named by `config` and run migrations.
pub fn open_store(config: &StoreConfig) -> anyhow::Result<store::Store> {
    let conn = if config.is_in_memory() {
        Connection::open_in_memory()?
    } else {
        let conn = Connection::open(&config.path)?;
        // Enable WAL mode for better concurrent performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn
    };

    schema::run_migrations(&conn)?;
    Ok(store::Store::new(conn))
}
