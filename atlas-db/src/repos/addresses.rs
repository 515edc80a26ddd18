//! Address repository
//!
//! Leaf of the location hierarchy; nothing references an address.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::{DbError, NaturalKey, Repository};

const RESOURCE: &str = "address";

/// Address record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[sqlx(rename = "AddressID")]
    pub id: i32,
    #[sqlx(rename = "LocalityID")]
    pub locality_id: i32,
    #[sqlx(rename = "AddressName")]
    pub name: String,
    #[sqlx(rename = "AddressPostalCode")]
    pub postal_code: String,
}

/// Writable address columns
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressFields {
    pub locality_id: i32,
    pub name: String,
    pub postal_code: String,
}

impl AddressFields {
    pub fn new(locality_id: i32, name: impl Into<String>, postal_code: impl Into<String>) -> Self {
        Self {
            locality_id,
            name: name.into(),
            postal_code: postal_code.into(),
        }
    }
}

/// Address repository
pub struct AddressRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// First address with exactly this name.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Address>, DbError> {
        let address = sqlx::query_as::<_, Address>(
            r#"
            SELECT "AddressID", "LocalityID", "AddressName", "AddressPostalCode"
            FROM "Address"
            WHERE "AddressName" = $1
            ORDER BY "AddressID"
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(address)
    }
}

#[async_trait]
impl<'a> Repository for AddressRepo<'a> {
    type Record = Address;
    type Fields = AddressFields;

    async fn get_by_id(&self, id: i32) -> Result<Option<Address>, DbError> {
        let address = sqlx::query_as::<_, Address>(
            r#"
            SELECT "AddressID", "LocalityID", "AddressName", "AddressPostalCode"
            FROM "Address"
            WHERE "AddressID" = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(address)
    }

    async fn get_all(&self) -> Result<Vec<Address>, DbError> {
        let addresses = sqlx::query_as::<_, Address>(
            r#"
            SELECT "AddressID", "LocalityID", "AddressName", "AddressPostalCode"
            FROM "Address"
            ORDER BY "AddressID"
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(addresses)
    }

    async fn create(&self, fields: &AddressFields) -> Result<Address, DbError> {
        sqlx::query_as::<_, Address>(
            r#"
            INSERT INTO "Address" ("LocalityID", "AddressName", "AddressPostalCode")
            VALUES ($1, $2, $3)
            RETURNING "AddressID", "LocalityID", "AddressName", "AddressPostalCode"
            "#,
        )
        .bind(fields.locality_id)
        .bind(&fields.name)
        .bind(&fields.postal_code)
        .fetch_one(self.pool)
        .await
        .map_err(DbError::on(RESOURCE))
    }

    async fn update(&self, id: i32, fields: &AddressFields) -> Result<Option<Address>, DbError> {
        let address = sqlx::query_as::<_, Address>(
            r#"
            UPDATE "Address"
            SET "LocalityID" = $1, "AddressName" = $2, "AddressPostalCode" = $3
            WHERE "AddressID" = $4
            RETURNING "AddressID", "LocalityID", "AddressName", "AddressPostalCode"
            "#,
        )
        .bind(fields.locality_id)
        .bind(&fields.name)
        .bind(&fields.postal_code)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(DbError::on(RESOURCE))?;

        if address.is_none() {
            tracing::debug!(address_id = id, "update matched no address");
        }
        Ok(address)
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, DbError> {
        let result = sqlx::query(r#"DELETE FROM "Address" WHERE "AddressID" = $1"#)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(DbError::on(RESOURCE))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl<'a> NaturalKey for AddressRepo<'a> {
    type Key = str;

    async fn get_by_natural_key(&self, name: &str) -> Result<Option<Address>, DbError> {
        self.get_by_name(name).await
    }
}
