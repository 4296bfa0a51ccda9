//! Customer Repository

use super::{BaseRepository, RepoError, RepoResult, make_thing};
use crate::db::models::{Customer, CustomerUpdate};
use chrono::Utc;
use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const CUSTOMER_TABLE: &str = "customer";

/// Filters for the paginated customer listing
#[derive(Debug, Clone, Default)]
pub struct CustomerListQuery {
    pub search: Option<String>,
    pub black_listed: Option<bool>,
    pub page: u64,
    pub limit: u64,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    count: u64,
}

#[derive(Clone)]
pub struct CustomerRepository {
    base: BaseRepository,
}

impl CustomerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a customer. Email and phone number collisions trip the unique
    /// indexes and map to [`RepoError::Duplicate`].
    pub async fn create(&self, customer: Customer) -> RepoResult<Customer> {
        let created: Option<Customer> = self
            .base
            .db()
            .create(CUSTOMER_TABLE)
            .content(customer)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create customer".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Customer>> {
        let thing = make_thing(CUSTOMER_TABLE, id);
        let customer: Option<Customer> = self
            .base
            .db()
            .select((CUSTOMER_TABLE, thing.id.to_raw()))
            .await?;
        Ok(customer)
    }

    /// Whether a customer with this email or phone number already exists
    pub async fn exists_by_contact(&self, email: &str, phone_number: &str) -> RepoResult<bool> {
        let found: Vec<Customer> = self
            .base
            .db()
            .query("SELECT * FROM customer WHERE email = $email OR phone_number = $phone LIMIT 1")
            .bind(("email", email.to_lowercase()))
            .bind(("phone", phone_number.to_string()))
            .await?
            .take(0)?;
        Ok(!found.is_empty())
    }

    /// Overwrite the editable customer fields. Email is immutable.
    pub async fn update(&self, id: &str, update: CustomerUpdate) -> RepoResult<Option<Customer>> {
        let thing = make_thing(CUSTOMER_TABLE, id);
        let updated: Vec<Customer> = self
            .base
            .db()
            .query(
                "UPDATE $id SET
                    first_name = $first_name,
                    last_name = $last_name,
                    phone_number = $phone_number,
                    address = $address,
                    company_name = $company_name,
                    updated_at = $now
                 RETURN AFTER",
            )
            .bind(("id", thing))
            .bind(("first_name", update.first_name))
            .bind(("last_name", update.last_name.unwrap_or_default()))
            .bind(("phone_number", update.phone_number))
            .bind(("address", update.address.unwrap_or_default()))
            .bind(("company_name", update.company_name))
            .bind(("now", Utc::now()))
            .await?
            .take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Flip the blacklist flag
    pub async fn toggle_blacklist(&self, id: &str) -> RepoResult<Option<Customer>> {
        let thing = make_thing(CUSTOMER_TABLE, id);
        let updated: Vec<Customer> = self
            .base
            .db()
            .query("UPDATE $id SET black_listed = !black_listed, updated_at = $now RETURN AFTER")
            .bind(("id", thing))
            .bind(("now", Utc::now()))
            .await?
            .take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Paginated listing of an organization's customers, newest first.
    /// Search matches name, email, or company; the filter runs before
    /// pagination so every matching record is reachable.
    pub async fn list(
        &self,
        organization_id: &str,
        query: &CustomerListQuery,
    ) -> RepoResult<(Vec<Customer>, u64)> {
        let org = make_thing("organization", organization_id);
        let mut conditions = vec!["organization = $org".to_string()];
        if query.black_listed.is_some() {
            conditions.push("black_listed = $black_listed".to_string());
        }
        if query.search.is_some() {
            conditions.push(
                "(string::contains(string::lowercase(first_name), $search)
                  OR string::contains(string::lowercase(last_name), $search)
                  OR string::contains(string::lowercase(email), $search)
                  OR string::contains(string::lowercase(company_name ?? ''), $search))"
                    .to_string(),
            );
        }
        let where_clause = conditions.join(" AND ");

        let page = query.page.max(1);
        let limit = query.limit.max(1);
        let start = (page - 1) * limit;

        let select = format!(
            "SELECT * FROM customer WHERE {where_clause}
             ORDER BY created_at DESC LIMIT $limit START $start"
        );
        let count = format!("SELECT count() AS count FROM customer WHERE {where_clause} GROUP ALL");

        let mut request = self
            .base
            .db()
            .query(select)
            .query(count)
            .bind(("org", org))
            .bind(("limit", limit))
            .bind(("start", start));
        if let Some(black_listed) = query.black_listed {
            request = request.bind(("black_listed", black_listed));
        }
        if let Some(search) = &query.search {
            request = request.bind(("search", search.to_lowercase()));
        }

        let mut response = request.await?;
        let customers: Vec<Customer> = response.take(0)?;
        let counts: Vec<CountRow> = response.take(1)?;
        let total = counts.first().map(|c| c.count).unwrap_or(0);
        Ok((customers, total))
    }
}
