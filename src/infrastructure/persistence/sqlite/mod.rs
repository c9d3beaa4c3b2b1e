mod prescription_repo;

pub use prescription_repo::SqlitePrescriptionRepository;

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

pub type DbConnection = Arc<Mutex<Connection>>;

/// Initialize the SQLite database at `db_path`
pub fn init_database(db_path: &Path) -> anyhow::Result<DbConnection> {
    // Ensure directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!("Initializing database at {:?}", db_path);

    let conn = Connection::open(db_path)?;
    create_schema(&conn)?;

    tracing::info!("Database initialized successfully");

    Ok(Arc::new(Mutex::new(conn)))
}

fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS prescriptions (
            id TEXT PRIMARY KEY,
            patient_name TEXT NOT NULL,
            gender TEXT,
            age TEXT,
            phone TEXT,
            diagnosis TEXT,
            herbs TEXT NOT NULL,
            usage TEXT,
            doctor TEXT,
            doctor_phone TEXT,
            created_at TEXT NOT NULL,
            printed_at TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_prescriptions_created_at
         ON prescriptions (created_at DESC)",
        [],
    )?;

    Ok(())
}

/// In-memory database with the full schema, for tests.
#[cfg(test)]
pub(crate) fn init_test_database() -> DbConnection {
    let conn = Connection::open_in_memory().expect("open in-memory database");
    create_schema(&conn).expect("create schema");
    Arc::new(Mutex::new(conn))
}
