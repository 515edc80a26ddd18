//! Shared fixtures for repository integration tests
//!
//! Every test runs against a fresh database created by `#[sqlx::test]`
//! and migrated with `atlas_db::MIGRATOR`, so tables start empty.
//! Run with: DATABASE_URL=postgres://... cargo test -p atlas-db -- --ignored

#![allow(dead_code)]

use std::fmt::Debug;

use anyhow::{ensure, Context, Result};
use atlas_db::{
    CountryFields, CountryRepo, District, DistrictFields, DistrictRepo, Gender, GenderFields,
    GenderRepo, Group, GroupFields, GroupRepo, Repository, Rule, RuleFields, RuleRepo, User,
    UserFields, UserRepo,
};
use chrono::NaiveDate;
use sqlx::PgPool;

/// An id no SERIAL column will ever hand out.
pub const MISSING_ID: i32 = -1;

/// Walk one repository through the whole CRUD contract.
///
/// Starts from an empty table, ends with the created row removed again.
/// Returns the record as it looked after `update`.
pub async fn check_crud_contract<R>(
    repo: &R,
    fields: R::Fields,
    changed: R::Fields,
    id_of: fn(&R::Record) -> i32,
) -> Result<R::Record>
where
    R: Repository,
    R::Record: Debug + Clone + PartialEq,
{
    ensure!(repo.get_all().await?.is_empty(), "table should start empty");

    let created = repo.create(&fields).await?;
    let id = id_of(&created);
    assert_eq!(repo.get_by_id(id).await?, Some(created.clone()));
    assert_eq!(repo.get_all().await?, vec![created.clone()]);

    assert_eq!(repo.get_by_id(MISSING_ID).await?, None);

    assert_eq!(repo.update(MISSING_ID, &changed).await?, None);
    assert_eq!(repo.get_by_id(id).await?, Some(created.clone()));

    let updated = repo
        .update(id, &changed)
        .await?
        .context("update of an existing row returned None")?;
    assert_eq!(id_of(&updated), id);
    assert_ne!(updated, created);
    assert_eq!(repo.get_by_id(id).await?, Some(updated.clone()));

    assert!(repo.delete_by_id(id).await?);
    assert_eq!(repo.get_by_id(id).await?, None);
    assert!(!repo.delete_by_id(id).await?);
    assert!(!repo.delete_by_id(MISSING_ID).await?);
    assert!(repo.get_all().await?.is_empty());

    Ok(updated)
}

pub async fn seed_district(pool: &PgPool, name: &str) -> Result<District> {
    let country = CountryRepo::new(pool)
        .create(&CountryFields::new(format!("{name} Country")))
        .await?;
    let district = DistrictRepo::new(pool)
        .create(&DistrictFields::new(country.id, name))
        .await?;
    Ok(district)
}

pub async fn seed_gender(pool: &PgPool, name: &str) -> Result<Gender> {
    Ok(GenderRepo::new(pool).create(&GenderFields::new(name)).await?)
}

pub fn user_fields(gender_id: i32, email: &str) -> UserFields {
    let birthdate = NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid date");
    UserFields::new(gender_id, email, "Test User", "password", birthdate).active(true)
}

pub async fn seed_user(pool: &PgPool, email: &str) -> Result<User> {
    let gender = seed_gender(pool, "test gender - user").await?;
    Ok(UserRepo::new(pool).create(&user_fields(gender.id, email)).await?)
}

pub async fn seed_rule(pool: &PgPool, name: &str, code: &str) -> Result<Rule> {
    Ok(RuleRepo::new(pool)
        .create(&RuleFields::new(name, "test", code))
        .await?)
}

pub async fn seed_group(pool: &PgPool, name: &str) -> Result<Group> {
    Ok(GroupRepo::new(pool)
        .create(&GroupFields::new(name, "test"))
        .await?)
}
