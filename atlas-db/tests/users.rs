//! Gender, User and LoginActivity repositories

mod common;

use anyhow::Result;
use atlas_db::{
    GenderFields, GenderRepo, LoginActivityFields, LoginActivityRepo, NaturalKey, Repository,
    UserRepo,
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use common::{check_crud_contract, seed_gender, seed_user, user_fields, MISSING_ID};

#[sqlx::test(migrator = "atlas_db::MIGRATOR")]
#[ignore = "requires database"]
async fn gender_crud_contract(pool: PgPool) -> Result<()> {
    let repo = GenderRepo::new(&pool);
    check_crud_contract(
        &repo,
        GenderFields::new("test gender"),
        GenderFields::new("updated gender"),
        |g| g.id,
    )
    .await?;
    Ok(())
}

#[sqlx::test(migrator = "atlas_db::MIGRATOR")]
#[ignore = "requires database"]
async fn gender_lookup_by_name(pool: PgPool) -> Result<()> {
    let gender = seed_gender(&pool, "test gender").await?;
    let repo = GenderRepo::new(&pool);

    assert_eq!(repo.get_by_natural_key("test gender").await?, Some(gender));
    assert_eq!(repo.get_by_name("nonexistent gender").await?, None);
    Ok(())
}

#[sqlx::test(migrator = "atlas_db::MIGRATOR")]
#[ignore = "requires database"]
async fn user_crud_contract(pool: PgPool) -> Result<()> {
    let gender = seed_gender(&pool, "test gender - user").await?;
    let mut changed = user_fields(gender.id, "changed@example.com");
    changed.is_active = false;

    let updated = check_crud_contract(
        &UserRepo::new(&pool),
        user_fields(gender.id, "test@example.com"),
        changed,
        |u| u.id,
    )
    .await?;

    assert_eq!(updated.email, "changed@example.com");
    assert!(!updated.is_active);
    assert!(updated.modified_at.is_some());
    Ok(())
}

#[sqlx::test(migrator = "atlas_db::MIGRATOR")]
#[ignore = "requires database"]
async fn user_timestamps(pool: PgPool) -> Result<()> {
    let before: DateTime<Utc> = sqlx::query_scalar("SELECT NOW()").fetch_one(&pool).await?;
    let user = seed_user(&pool, "test@example.com").await?;
    assert!(user.created_at >= before);
    assert_eq!(user.modified_at, None);

    let repo = UserRepo::new(&pool);
    let fields = user_fields(user.gender_id, "test@example.com");
    let first = repo.update(user.id, &fields).await?.expect("user exists");
    let second = repo.update(user.id, &fields).await?.expect("user exists");

    assert_eq!(first.created_at, user.created_at);
    assert_eq!(second.created_at, user.created_at);
    assert!(first.modified_at.is_some());
    assert_ne!(second.modified_at, first.modified_at);
    Ok(())
}

#[sqlx::test(migrator = "atlas_db::MIGRATOR")]
#[ignore = "requires database"]
async fn user_lookup_by_email(pool: PgPool) -> Result<()> {
    let user = seed_user(&pool, "test@example.com").await?;
    let repo = UserRepo::new(&pool);

    assert_eq!(repo.get_by_email("test@example.com").await?, Some(user.clone()));
    assert_eq!(repo.get_by_natural_key("test@example.com").await?, Some(user));
    assert_eq!(repo.get_by_email("nonexistent@example.com").await?, None);
    Ok(())
}

#[sqlx::test(migrator = "atlas_db::MIGRATOR")]
#[ignore = "requires database"]
async fn duplicate_email_is_a_conflict(pool: PgPool) -> Result<()> {
    let user = seed_user(&pool, "test@example.com").await?;
    let err = UserRepo::new(&pool)
        .create(&user_fields(user.gender_id, "test@example.com"))
        .await
        .unwrap_err();

    assert!(err.is_conflict(), "unexpected error: {err}");
    Ok(())
}

#[sqlx::test(migrator = "atlas_db::MIGRATOR")]
#[ignore = "requires database"]
async fn login_activity_crud_contract(pool: PgPool) -> Result<()> {
    let user = seed_user(&pool, "test@example.com").await?;
    let occurred_at: DateTime<Utc> = sqlx::query_scalar("SELECT date_trunc('second', NOW())")
        .fetch_one(&pool)
        .await?;

    let updated = check_crud_contract(
        &LoginActivityRepo::new(&pool),
        LoginActivityFields {
            user_id: user.id,
            ip: None,
            geo_location: None,
            occurred_at: None,
        },
        LoginActivityFields {
            user_id: user.id,
            ip: Some("127.0.0.1".into()),
            geo_location: Some("38.7223,-9.1393".into()),
            occurred_at: Some(occurred_at),
        },
        |a| a.id,
    )
    .await?;

    assert_eq!(updated.ip.as_deref(), Some("127.0.0.1"));
    assert_eq!(updated.occurred_at, Some(occurred_at));
    Ok(())
}

#[sqlx::test(migrator = "atlas_db::MIGRATOR")]
#[ignore = "requires database"]
async fn login_activities_listed_per_user(pool: PgPool) -> Result<()> {
    let user = seed_user(&pool, "test@example.com").await?;
    let repo = LoginActivityRepo::new(&pool);
    let fields = LoginActivityFields {
        user_id: user.id,
        ip: Some("10.0.0.1".into()),
        geo_location: None,
        occurred_at: None,
    };
    let first = repo.create(&fields).await?;
    let second = repo.create(&fields).await?;

    assert_eq!(repo.list_for_user(user.id).await?, vec![first.clone(), second.clone()]);
    assert!(repo.list_for_user(MISSING_ID).await?.is_empty());

    // A user with logins cannot be removed until the audit trail is.
    assert!(UserRepo::new(&pool).delete_by_id(user.id).await.is_err());
    assert!(repo.delete_by_id(first.id).await?);
    assert!(repo.delete_by_id(second.id).await?);
    assert!(UserRepo::new(&pool).delete_by_id(user.id).await?);
    Ok(())
}
