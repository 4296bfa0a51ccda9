//! Database Module
//!
//! Embedded SurrealDB bootstrap and schema (unique index) definition.

pub mod models;
pub mod repository;

use shared::error::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "inventory";
const DATABASE: &str = "inventory";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the RocksDB-backed database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::init(db).await
    }

    /// In-memory database, used by tests
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::init(db).await
    }

    async fn init(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;
        tracing::info!("Database ready (namespace={}, db={})", NAMESPACE, DATABASE);

        Ok(Self { db })
    }
}

/// Define the unique indexes the data model relies on.
///
/// These back the uniqueness invariants: organization slug and invite code,
/// one membership per (user, organization), and customer email/phone.
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        "
        DEFINE INDEX IF NOT EXISTS organization_slug ON TABLE organization COLUMNS slug UNIQUE;
        DEFINE INDEX IF NOT EXISTS organization_invite_code ON TABLE organization COLUMNS invite_code UNIQUE;
        DEFINE INDEX IF NOT EXISTS membership_user_organization ON TABLE membership COLUMNS user, organization UNIQUE;
        DEFINE INDEX IF NOT EXISTS customer_email ON TABLE customer COLUMNS email UNIQUE;
        DEFINE INDEX IF NOT EXISTS customer_phone_number ON TABLE customer COLUMNS phone_number UNIQUE;
        ",
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
    .check()
    .map_err(|e| AppError::database(format!("Schema definition rejected: {e}")))?;

    Ok(())
}
