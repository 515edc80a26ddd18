//! Contact type repository

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::{DbError, NaturalKey, Repository};

const RESOURCE: &str = "contact_type";

/// Contact type record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactType {
    #[sqlx(rename = "ContactTypeID")]
    pub id: i32,
    #[sqlx(rename = "ContactTypeName")]
    pub name: String,
    /// Pattern a contact value of this type must match. Stored verbatim,
    /// never compiled here.
    #[sqlx(rename = "ContactRegex")]
    pub validation_pattern: String,
}

/// Writable contact type columns
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactTypeFields {
    pub name: String,
    pub validation_pattern: String,
}

impl ContactTypeFields {
    pub fn new(name: impl Into<String>, validation_pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            validation_pattern: validation_pattern.into(),
        }
    }
}

/// Contact type repository
pub struct ContactTypeRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactTypeRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<ContactType>, DbError> {
        let contact_type = sqlx::query_as::<_, ContactType>(
            r#"
            SELECT "ContactTypeID", "ContactTypeName", "ContactRegex"
            FROM "ContactType"
            WHERE "ContactTypeName" = $1
            ORDER BY "ContactTypeID"
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(contact_type)
    }
}

#[async_trait]
impl<'a> Repository for ContactTypeRepo<'a> {
    type Record = ContactType;
    type Fields = ContactTypeFields;

    async fn get_by_id(&self, id: i32) -> Result<Option<ContactType>, DbError> {
        let contact_type = sqlx::query_as::<_, ContactType>(
            r#"
            SELECT "ContactTypeID", "ContactTypeName", "ContactRegex"
            FROM "ContactType"
            WHERE "ContactTypeID" = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(contact_type)
    }

    async fn get_all(&self) -> Result<Vec<ContactType>, DbError> {
        let contact_types = sqlx::query_as::<_, ContactType>(
            r#"
            SELECT "ContactTypeID", "ContactTypeName", "ContactRegex"
            FROM "ContactType"
            ORDER BY "ContactTypeID"
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(contact_types)
    }

    async fn create(&self, fields: &ContactTypeFields) -> Result<ContactType, DbError> {
        sqlx::query_as::<_, ContactType>(
            r#"
            INSERT INTO "ContactType" ("ContactTypeName", "ContactRegex")
            VALUES ($1, $2)
            RETURNING "ContactTypeID", "ContactTypeName", "ContactRegex"
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.validation_pattern)
        .fetch_one(self.pool)
        .await
        .map_err(DbError::on(RESOURCE))
    }

    async fn update(
        &self,
        id: i32,
        fields: &ContactTypeFields,
    ) -> Result<Option<ContactType>, DbError> {
        let contact_type = sqlx::query_as::<_, ContactType>(
            r#"
            UPDATE "ContactType"
            SET "ContactTypeName" = $1, "ContactRegex" = $2
            WHERE "ContactTypeID" = $3
            RETURNING "ContactTypeID", "ContactTypeName", "ContactRegex"
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.validation_pattern)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(DbError::on(RESOURCE))?;

        if contact_type.is_none() {
            tracing::debug!(contact_type_id = id, "update matched no contact type");
        }
        Ok(contact_type)
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, DbError> {
        let result = sqlx::query(r#"DELETE FROM "ContactType" WHERE "ContactTypeID" = $1"#)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(DbError::on(RESOURCE))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl<'a> NaturalKey for ContactTypeRepo<'a> {
    type Key = str;

    async fn get_by_natural_key(&self, name: &str) -> Result<Option<ContactType>, DbError> {
        self.get_by_name(name).await
    }
}
