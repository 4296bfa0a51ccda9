//! Repository Module
//!
//! CRUD access to the SurrealDB tables, one repository per table.

pub mod customer;
pub mod membership;
pub mod order;
pub mod organization;
pub mod product;

// Re-exports
pub use customer::{CustomerListQuery, CustomerRepository};
pub use membership::MembershipRepository;
pub use order::{OrderListQuery, OrderRepository};
pub use organization::OrganizationRepository;
pub use product::{ProductListQuery, ProductRepository};

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        // Unique index violations surface as Duplicate so callers can map
        // them to the conflict envelope
        let text = err.to_string();
        if text.contains("already contains") {
            RepoError::Duplicate(text)
        } else {
            RepoError::Database(text)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

impl From<RepoError> for shared::error::AppError {
    fn from(err: RepoError) -> Self {
        use shared::error::AppError;
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Strip a "table:" prefix from an id if present
pub fn strip_table_prefix<'a>(table: &str, id: &'a str) -> &'a str {
    id.strip_prefix(&format!("{}:", table)[..])
        .unwrap_or(id)
        .trim_start_matches('⟨')
        .trim_end_matches('⟩')
}

/// Build a Thing from a table name and an id that may already carry the prefix
pub fn make_thing(table: &str, id: &str) -> Thing {
    Thing::from((table, strip_table_prefix(table, id)))
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_table_prefix() {
        assert_eq!(strip_table_prefix("product", "product:abc"), "abc");
        assert_eq!(strip_table_prefix("product", "abc"), "abc");
        assert_eq!(strip_table_prefix("order_doc", "order_doc:xyz"), "xyz");
    }

    #[test]
    fn test_make_thing() {
        let thing = make_thing("customer", "customer:c1");
        assert_eq!(thing.tb, "customer");
        assert_eq!(thing.id.to_string(), "c1");
    }
}
