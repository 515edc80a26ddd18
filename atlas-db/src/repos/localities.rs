//! Locality repository

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::{DbError, NaturalKey, Repository};

const RESOURCE: &str = "locality";

/// Locality record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Locality {
    #[sqlx(rename = "LocalityID")]
    pub id: i32,
    #[sqlx(rename = "DistrictID")]
    pub district_id: i32,
    #[sqlx(rename = "LocalityName")]
    pub name: String,
}

/// Writable locality columns
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalityFields {
    pub district_id: i32,
    pub name: String,
}

impl LocalityFields {
    pub fn new(district_id: i32, name: impl Into<String>) -> Self {
        Self {
            district_id,
            name: name.into(),
        }
    }
}

/// Locality repository
pub struct LocalityRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> LocalityRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// First locality with exactly this name.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Locality>, DbError> {
        let locality = sqlx::query_as::<_, Locality>(
            r#"
            SELECT "LocalityID", "DistrictID", "LocalityName"
            FROM "Locality"
            WHERE "LocalityName" = $1
            ORDER BY "LocalityID"
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(locality)
    }
}

#[async_trait]
impl<'a> Repository for LocalityRepo<'a> {
    type Record = Locality;
    type Fields = LocalityFields;

    async fn get_by_id(&self, id: i32) -> Result<Option<Locality>, DbError> {
        let locality = sqlx::query_as::<_, Locality>(
            r#"
            SELECT "LocalityID", "DistrictID", "LocalityName"
            FROM "Locality"
            WHERE "LocalityID" = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(locality)
    }

    async fn get_all(&self) -> Result<Vec<Locality>, DbError> {
        let localities = sqlx::query_as::<_, Locality>(
            r#"
            SELECT "LocalityID", "DistrictID", "LocalityName"
            FROM "Locality"
            ORDER BY "LocalityID"
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(localities)
    }

    async fn create(&self, fields: &LocalityFields) -> Result<Locality, DbError> {
        sqlx::query_as::<_, Locality>(
            r#"
            INSERT INTO "Locality" ("DistrictID", "LocalityName")
            VALUES ($1, $2)
            RETURNING "LocalityID", "DistrictID", "LocalityName"
            "#,
        )
        .bind(fields.district_id)
        .bind(&fields.name)
        .fetch_one(self.pool)
        .await
        .map_err(DbError::on(RESOURCE))
    }

    async fn update(&self, id: i32, fields: &LocalityFields) -> Result<Option<Locality>, DbError> {
        let locality = sqlx::query_as::<_, Locality>(
            r#"
            UPDATE "Locality"
            SET "DistrictID" = $1, "LocalityName" = $2
            WHERE "LocalityID" = $3
            RETURNING "LocalityID", "DistrictID", "LocalityName"
            "#,
        )
        .bind(fields.district_id)
        .bind(&fields.name)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(DbError::on(RESOURCE))?;

        if locality.is_none() {
            tracing::debug!(locality_id = id, "update matched no locality");
        }
        Ok(locality)
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, DbError> {
        let result = sqlx::query(r#"DELETE FROM "Locality" WHERE "LocalityID" = $1"#)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(DbError::on(RESOURCE))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl<'a> NaturalKey for LocalityRepo<'a> {
    type Key = str;

    async fn get_by_natural_key(&self, name: &str) -> Result<Option<Locality>, DbError> {
        self.get_by_name(name).await
    }
}
