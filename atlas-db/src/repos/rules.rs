//! Rule repository
//!
//! Rules are looked up by `RuleCode` rather than by name.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::{DbError, NaturalKey, Repository};

const RESOURCE: &str = "rule";

/// Rule record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[sqlx(rename = "RuleID")]
    pub id: i32,
    #[sqlx(rename = "RuleName")]
    pub name: String,
    #[sqlx(rename = "RuleDescription")]
    pub description: String,
    #[sqlx(rename = "RuleCode")]
    pub code: String,
    #[sqlx(rename = "RuleCreatedAt")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "RuleModifiedAt")]
    pub modified_at: Option<DateTime<Utc>>,
}

/// Writable rule columns
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleFields {
    pub name: String,
    pub description: String,
    pub code: String,
}

impl RuleFields {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            code: code.into(),
        }
    }
}

/// Rule repository
pub struct RuleRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> RuleRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// First rule carrying this code.
    pub async fn get_by_code(&self, code: &str) -> Result<Option<Rule>, DbError> {
        let rule = sqlx::query_as::<_, Rule>(
            r#"
            SELECT "RuleID", "RuleName", "RuleDescription", "RuleCode",
                   "RuleCreatedAt", "RuleModifiedAt"
            FROM "Rule"
            WHERE "RuleCode" = $1
            ORDER BY "RuleID"
            LIMIT 1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool)
        .await?;

        Ok(rule)
    }
}

#[async_trait]
impl<'a> Repository for RuleRepo<'a> {
    type Record = Rule;
    type Fields = RuleFields;

    async fn get_by_id(&self, id: i32) -> Result<Option<Rule>, DbError> {
        let rule = sqlx::query_as::<_, Rule>(
            r#"
            SELECT "RuleID", "RuleName", "RuleDescription", "RuleCode",
                   "RuleCreatedAt", "RuleModifiedAt"
            FROM "Rule"
            WHERE "RuleID" = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(rule)
    }

    async fn get_all(&self) -> Result<Vec<Rule>, DbError> {
        let rules = sqlx::query_as::<_, Rule>(
            r#"
            SELECT "RuleID", "RuleName", "RuleDescription", "RuleCode",
                   "RuleCreatedAt", "RuleModifiedAt"
            FROM "Rule"
            ORDER BY "RuleID"
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rules)
    }

    async fn create(&self, fields: &RuleFields) -> Result<Rule, DbError> {
        sqlx::query_as::<_, Rule>(
            r#"
            INSERT INTO "Rule" ("RuleName", "RuleDescription", "RuleCode", "RuleCreatedAt")
            VALUES ($1, $2, $3, NOW())
            RETURNING "RuleID", "RuleName", "RuleDescription", "RuleCode",
                      "RuleCreatedAt", "RuleModifiedAt"
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.code)
        .fetch_one(self.pool)
        .await
        .map_err(DbError::on(RESOURCE))
    }

    async fn update(&self, id: i32, fields: &RuleFields) -> Result<Option<Rule>, DbError> {
        let rule = sqlx::query_as::<_, Rule>(
            r#"
            UPDATE "Rule"
            SET "RuleName" = $1,
                "RuleDescription" = $2,
                "RuleCode" = $3,
                "RuleModifiedAt" = NOW()
            WHERE "RuleID" = $4
            RETURNING "RuleID", "RuleName", "RuleDescription", "RuleCode",
                      "RuleCreatedAt", "RuleModifiedAt"
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.code)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(DbError::on(RESOURCE))?;

        if rule.is_none() {
            tracing::debug!(rule_id = id, "update matched no rule");
        }
        Ok(rule)
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, DbError> {
        let result = sqlx::query(r#"DELETE FROM "Rule" WHERE "RuleID" = $1"#)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(DbError::on(RESOURCE))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl<'a> NaturalKey for RuleRepo<'a> {
    type Key = str;

    async fn get_by_natural_key(&self, code: &str) -> Result<Option<Rule>, DbError> {
        self.get_by_code(code).await
    }
}
