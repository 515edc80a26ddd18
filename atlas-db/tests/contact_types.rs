mod common;

use anyhow::Result;
use atlas_db::{ContactTypeFields, ContactTypeRepo, NaturalKey, Repository};
use sqlx::PgPool;

use common::check_crud_contract;

#[sqlx::test(migrator = "atlas_db::MIGRATOR")]
#[ignore = "requires database"]
async fn contact_type_crud_contract(pool: PgPool) -> Result<()> {
    let updated = check_crud_contract(
        &ContactTypeRepo::new(&pool),
        ContactTypeFields::new("Email", r"^\S+@\S+$"),
        ContactTypeFields::new("Email", r"^[^@\s]+@[^@\s]+\.[^@\s]+$"),
        |c| c.id,
    )
    .await?;

    assert_eq!(updated.validation_pattern, r"^[^@\s]+@[^@\s]+\.[^@\s]+$");
    Ok(())
}

#[sqlx::test(migrator = "atlas_db::MIGRATOR")]
#[ignore = "requires database"]
async fn pattern_is_stored_verbatim(pool: PgPool) -> Result<()> {
    let repo = ContactTypeRepo::new(&pool);
    // Not a valid regex; this layer never compiles it.
    let created = repo.create(&ContactTypeFields::new("Broken", "([unclosed")).await?;

    let found = repo.get_by_natural_key("Broken").await?.expect("contact type exists");
    assert_eq!(found, created);
    assert_eq!(found.validation_pattern, "([unclosed");
    assert_eq!(repo.get_by_name("Phone").await?, None);
    Ok(())
}
