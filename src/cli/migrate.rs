// src/cli/migrate.rs — Database migration command
//
// Migrations run automatically whenever the store opens; this command
// shows the applied versions or reverts the newest one.

use rusqlite::Connection;

use crate::infra::config::StoreConfig;
use crate::memory::schema;

pub fn run_migrate(config: &StoreConfig, status_only: bool, rollback: bool) -> anyhow::Result<()> {
    if config.is_in_memory() {
        println!("Store is configured as :memory:; nothing to migrate.");
        return Ok(());
    }

    let db_path = std::path::Path::new(&config.path);
    if !db_path.exists() && (status_only || rollback) {
        println!("No database found at: {}", db_path.display());
        println!("Run `folio migrate` or start the server to create it.");
        return Ok(());
    }

    let conn = Connection::open(db_path)?;

    if status_only {
        return show_migration_status(&conn, &config.path);
    }

    if rollback {
        return run_rollback(&conn);
    }

    println!("Running database migrations...");
    schema::run_migrations(&conn)?;
    println!("Migrations complete.");

    show_migration_status(&conn, &config.path)
}

fn show_migration_status(conn: &Connection, path: &str) -> anyhow::Result<()> {
    let table_exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='_migrations'",
        [],
        |row| row.get(0),
    )?;

    if !table_exists {
        println!("No migrations have been run yet.");
        return Ok(());
    }

    let latest = schema::MIGRATIONS.last().map(|m| m.version).unwrap_or(0);
    println!("Database: {path}");
    println!("Current schema version: {} (latest {latest})", schema::current_version(conn)?);
    println!();

    let mut stmt =
        conn.prepare("SELECT version, name, applied_at FROM _migrations ORDER BY version")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, u32>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    println!("Applied migrations:");
    for row in rows {
        let (version, name, applied_at) = row?;
        println!("  v{version}: {name} (applied {applied_at})");
    }

    Ok(())
}

/// Revert the newest applied migration using its compiled-in down SQL.
fn run_rollback(conn: &Connection) -> anyhow::Result<()> {
    let current = schema::current_version(conn)?;
    if current == 0 {
        println!("No migrations to roll back.");
        return Ok(());
    }

    println!("Rolling back migration v{current}...");
    println!("WARNING: the tables created by this migration are dropped with their data.");
    schema::rollback_to(conn, current - 1)?;
    println!("Now at schema version {}.", schema::current_version(conn)?);

    Ok(())
}
