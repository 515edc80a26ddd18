//! Country repository
//!
//! Root of the location hierarchy. Districts reference countries, so a
//! country can only be deleted once its districts are gone.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::{DbError, NaturalKey, Repository};

const RESOURCE: &str = "country";

/// Country record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    #[sqlx(rename = "CountryID")]
    pub id: i32,
    #[sqlx(rename = "CountryName")]
    pub name: String,
}

/// Writable country columns
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryFields {
    pub name: String,
}

impl CountryFields {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Country repository
pub struct CountryRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CountryRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// First country with exactly this name.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Country>, DbError> {
        let country = sqlx::query_as::<_, Country>(
            r#"
            SELECT "CountryID", "CountryName"
            FROM "Country"
            WHERE "CountryName" = $1
            ORDER BY "CountryID"
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(country)
    }
}

#[async_trait]
impl<'a> Repository for CountryRepo<'a> {
    type Record = Country;
    type Fields = CountryFields;

    async fn get_by_id(&self, id: i32) -> Result<Option<Country>, DbError> {
        let country = sqlx::query_as::<_, Country>(
            r#"SELECT "CountryID", "CountryName" FROM "Country" WHERE "CountryID" = $1"#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(country)
    }

    async fn get_all(&self) -> Result<Vec<Country>, DbError> {
        let countries = sqlx::query_as::<_, Country>(
            r#"SELECT "CountryID", "CountryName" FROM "Country" ORDER BY "CountryID""#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(countries)
    }

    async fn create(&self, fields: &CountryFields) -> Result<Country, DbError> {
        sqlx::query_as::<_, Country>(
            r#"
            INSERT INTO "Country" ("CountryName")
            VALUES ($1)
            RETURNING "CountryID", "CountryName"
            "#,
        )
        .bind(&fields.name)
        .fetch_one(self.pool)
        .await
        .map_err(DbError::on(RESOURCE))
    }

    async fn update(&self, id: i32, fields: &CountryFields) -> Result<Option<Country>, DbError> {
        let country = sqlx::query_as::<_, Country>(
            r#"
            UPDATE "Country"
            SET "CountryName" = $1
            WHERE "CountryID" = $2
            RETURNING "CountryID", "CountryName"
            "#,
        )
        .bind(&fields.name)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(DbError::on(RESOURCE))?;

        if country.is_none() {
            tracing::debug!(country_id = id, "update matched no country");
        }
        Ok(country)
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, DbError> {
        let result = sqlx::query(r#"DELETE FROM "Country" WHERE "CountryID" = $1"#)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(DbError::on(RESOURCE))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl<'a> NaturalKey for CountryRepo<'a> {
    type Key = str;

    async fn get_by_natural_key(&self, name: &str) -> Result<Option<Country>, DbError> {
        self.get_by_name(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case() {
        let country = Country {
            id: 7,
            name: "Portugal".into(),
        };
        let json = serde_json::to_value(&country).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 7, "name": "Portugal" }));
    }
}
