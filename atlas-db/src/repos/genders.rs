//! Gender repository

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::{DbError, NaturalKey, Repository};

const RESOURCE: &str = "gender";

/// Gender record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gender {
    #[sqlx(rename = "GenderID")]
    pub id: i32,
    #[sqlx(rename = "GenderName")]
    pub name: String,
}

/// Writable gender columns
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenderFields {
    pub name: String,
}

impl GenderFields {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Gender repository
pub struct GenderRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> GenderRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Gender>, DbError> {
        let gender = sqlx::query_as::<_, Gender>(
            r#"
            SELECT "GenderID", "GenderName"
            FROM "Gender"
            WHERE "GenderName" = $1
            ORDER BY "GenderID"
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(gender)
    }
}

#[async_trait]
impl<'a> Repository for GenderRepo<'a> {
    type Record = Gender;
    type Fields = GenderFields;

    async fn get_by_id(&self, id: i32) -> Result<Option<Gender>, DbError> {
        let gender = sqlx::query_as::<_, Gender>(
            r#"SELECT "GenderID", "GenderName" FROM "Gender" WHERE "GenderID" = $1"#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(gender)
    }

    async fn get_all(&self) -> Result<Vec<Gender>, DbError> {
        let genders = sqlx::query_as::<_, Gender>(
            r#"SELECT "GenderID", "GenderName" FROM "Gender" ORDER BY "GenderID""#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(genders)
    }

    async fn create(&self, fields: &GenderFields) -> Result<Gender, DbError> {
        sqlx::query_as::<_, Gender>(
            r#"
            INSERT INTO "Gender" ("GenderName")
            VALUES ($1)
            RETURNING "GenderID", "GenderName"
            "#,
        )
        .bind(&fields.name)
        .fetch_one(self.pool)
        .await
        .map_err(DbError::on(RESOURCE))
    }

    async fn update(&self, id: i32, fields: &GenderFields) -> Result<Option<Gender>, DbError> {
        let gender = sqlx::query_as::<_, Gender>(
            r#"
            UPDATE "Gender"
            SET "GenderName" = $1
            WHERE "GenderID" = $2
            RETURNING "GenderID", "GenderName"
            "#,
        )
        .bind(&fields.name)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(DbError::on(RESOURCE))?;

        if gender.is_none() {
            tracing::debug!(gender_id = id, "update matched no gender");
        }
        Ok(gender)
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, DbError> {
        let result = sqlx::query(r#"DELETE FROM "Gender" WHERE "GenderID" = $1"#)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(DbError::on(RESOURCE))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl<'a> NaturalKey for GenderRepo<'a> {
    type Key = str;

    async fn get_by_natural_key(&self, name: &str) -> Result<Option<Gender>, DbError> {
        self.get_by_name(name).await
    }
}
