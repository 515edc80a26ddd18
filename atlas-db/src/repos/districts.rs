//! District repository

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::{DbError, NaturalKey, Repository};

const RESOURCE: &str = "district";

/// District record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct District {
    #[sqlx(rename = "DistrictID")]
    pub id: i32,
    #[sqlx(rename = "CountryID")]
    pub country_id: i32,
    #[sqlx(rename = "DistrictName")]
    pub name: String,
}

/// Writable district columns
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictFields {
    pub country_id: i32,
    pub name: String,
}

impl DistrictFields {
    pub fn new(country_id: i32, name: impl Into<String>) -> Self {
        Self {
            country_id,
            name: name.into(),
        }
    }
}

/// District repository
pub struct DistrictRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> DistrictRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// First district with exactly this name.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<District>, DbError> {
        let district = sqlx::query_as::<_, District>(
            r#"
            SELECT "DistrictID", "CountryID", "DistrictName"
            FROM "District"
            WHERE "DistrictName" = $1
            ORDER BY "DistrictID"
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(district)
    }
}

#[async_trait]
impl<'a> Repository for DistrictRepo<'a> {
    type Record = District;
    type Fields = DistrictFields;

    async fn get_by_id(&self, id: i32) -> Result<Option<District>, DbError> {
        let district = sqlx::query_as::<_, District>(
            r#"
            SELECT "DistrictID", "CountryID", "DistrictName"
            FROM "District"
            WHERE "DistrictID" = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(district)
    }

    async fn get_all(&self) -> Result<Vec<District>, DbError> {
        let districts = sqlx::query_as::<_, District>(
            r#"
            SELECT "DistrictID", "CountryID", "DistrictName"
            FROM "District"
            ORDER BY "DistrictID"
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(districts)
    }

    async fn create(&self, fields: &DistrictFields) -> Result<District, DbError> {
        sqlx::query_as::<_, District>(
            r#"
            INSERT INTO "District" ("CountryID", "DistrictName")
            VALUES ($1, $2)
            RETURNING "DistrictID", "CountryID", "DistrictName"
            "#,
        )
        .bind(fields.country_id)
        .bind(&fields.name)
        .fetch_one(self.pool)
        .await
        .map_err(DbError::on(RESOURCE))
    }

    async fn update(&self, id: i32, fields: &DistrictFields) -> Result<Option<District>, DbError> {
        let district = sqlx::query_as::<_, District>(
            r#"
            UPDATE "District"
            SET "CountryID" = $1, "DistrictName" = $2
            WHERE "DistrictID" = $3
            RETURNING "DistrictID", "CountryID", "DistrictName"
            "#,
        )
        .bind(fields.country_id)
        .bind(&fields.name)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(DbError::on(RESOURCE))?;

        if district.is_none() {
            tracing::debug!(district_id = id, "update matched no district");
        }
        Ok(district)
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, DbError> {
        let result = sqlx::query(r#"DELETE FROM "District" WHERE "DistrictID" = $1"#)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(DbError::on(RESOURCE))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl<'a> NaturalKey for DistrictRepo<'a> {
    type Key = str;

    async fn get_by_natural_key(&self, name: &str) -> Result<Option<District>, DbError> {
        self.get_by_name(name).await
    }
}
