//! Country, District, Locality and Address repositories

mod common;

use anyhow::Result;
use atlas_db::{
    AddressFields, AddressRepo, CountryFields, CountryRepo, DbError, DistrictFields,
    DistrictRepo, LocalityFields, LocalityRepo, NaturalKey, Repository,
};
use sqlx::PgPool;

use common::{check_crud_contract, seed_district, MISSING_ID};

#[sqlx::test(migrator = "atlas_db::MIGRATOR")]
#[ignore = "requires database"]
async fn country_crud_contract(pool: PgPool) -> Result<()> {
    let repo = CountryRepo::new(&pool);
    let updated = check_crud_contract(
        &repo,
        CountryFields::new("Test Country"),
        CountryFields::new("Updated Country"),
        |c| c.id,
    )
    .await?;

    assert_eq!(updated.name, "Updated Country");
    Ok(())
}

#[sqlx::test(migrator = "atlas_db::MIGRATOR")]
#[ignore = "requires database"]
async fn country_lookup_by_name(pool: PgPool) -> Result<()> {
    let repo = CountryRepo::new(&pool);
    let first = repo.create(&CountryFields::new("Test Country")).await?;
    repo.create(&CountryFields::new("Test Country")).await?;

    assert_eq!(repo.get_by_name("Test Country").await?, Some(first.clone()));
    assert_eq!(repo.get_by_natural_key("Test Country").await?, Some(first));
    assert_eq!(repo.get_by_name("Nonexistent Country").await?, None);
    Ok(())
}

#[sqlx::test(migrator = "atlas_db::MIGRATOR")]
#[ignore = "requires database"]
async fn district_crud_contract(pool: PgPool) -> Result<()> {
    let countries = CountryRepo::new(&pool);
    let home = countries.create(&CountryFields::new("Home")).await?;
    let abroad = countries.create(&CountryFields::new("Abroad")).await?;

    let updated = check_crud_contract(
        &DistrictRepo::new(&pool),
        DistrictFields::new(home.id, "Test District"),
        DistrictFields::new(abroad.id, "Moved District"),
        |d| d.id,
    )
    .await?;

    assert_eq!(updated.country_id, abroad.id);
    Ok(())
}

#[sqlx::test(migrator = "atlas_db::MIGRATOR")]
#[ignore = "requires database"]
async fn district_lookup_by_name(pool: PgPool) -> Result<()> {
    let country = CountryRepo::new(&pool)
        .create(&CountryFields::new("Test Country"))
        .await?;
    let repo = DistrictRepo::new(&pool);
    let first = repo
        .create(&DistrictFields::new(country.id, "Test District"))
        .await?;
    let second = repo
        .create(&DistrictFields::new(country.id, "Test District"))
        .await?;
    assert!(second.id > first.id);

    assert_eq!(repo.get_by_natural_key("Test District").await?, Some(first.clone()));
    assert_eq!(repo.get_by_name("Test District").await?, Some(first));
    assert_eq!(repo.get_by_name("Nonexistent District").await?, None);
    Ok(())
}

#[sqlx::test(migrator = "atlas_db::MIGRATOR")]
#[ignore = "requires database"]
async fn district_requires_existing_country(pool: PgPool) -> Result<()> {
    let err = DistrictRepo::new(&pool)
        .create(&DistrictFields::new(MISSING_ID, "Orphan District"))
        .await
        .unwrap_err();

    assert!(err.is_invalid_reference(), "unexpected error: {err}");
    Ok(())
}

#[sqlx::test(migrator = "atlas_db::MIGRATOR")]
#[ignore = "requires database"]
async fn locality_crud_contract(pool: PgPool) -> Result<()> {
    let district = seed_district(&pool, "Test District").await?;

    let updated = check_crud_contract(
        &LocalityRepo::new(&pool),
        LocalityFields::new(district.id, "Test Locality"),
        LocalityFields::new(district.id, "Renamed Locality"),
        |l| l.id,
    )
    .await?;

    assert_eq!(updated.name, "Renamed Locality");
    Ok(())
}

#[sqlx::test(migrator = "atlas_db::MIGRATOR")]
#[ignore = "requires database"]
async fn address_crud_contract(pool: PgPool) -> Result<()> {
    let district = seed_district(&pool, "Test District").await?;
    let locality = LocalityRepo::new(&pool)
        .create(&LocalityFields::new(district.id, "Test Locality"))
        .await?;

    let updated = check_crud_contract(
        &AddressRepo::new(&pool),
        AddressFields::new(locality.id, "Test Address", "1000-001"),
        AddressFields::new(locality.id, "Test Address", "1000-999"),
        |a| a.id,
    )
    .await?;

    assert_eq!(updated.postal_code, "1000-999");
    Ok(())
}

#[sqlx::test(migrator = "atlas_db::MIGRATOR")]
#[ignore = "requires database"]
async fn address_lookup_by_name(pool: PgPool) -> Result<()> {
    let district = seed_district(&pool, "Test District").await?;
    let locality = LocalityRepo::new(&pool)
        .create(&LocalityFields::new(district.id, "Test Locality"))
        .await?;
    let repo = AddressRepo::new(&pool);
    let address = repo
        .create(&AddressFields::new(locality.id, "Rua Augusta 1", "1100-048"))
        .await?;

    assert_eq!(repo.get_by_name("Rua Augusta 1").await?, Some(address));
    assert_eq!(repo.get_by_name("Rua Augusta 2").await?, None);
    Ok(())
}

#[sqlx::test(migrator = "atlas_db::MIGRATOR")]
#[ignore = "requires database"]
async fn hierarchy_lookup_and_child_first_teardown(pool: PgPool) -> Result<()> {
    let countries = CountryRepo::new(&pool);
    let districts = DistrictRepo::new(&pool);
    let localities = LocalityRepo::new(&pool);

    let country = countries.create(&CountryFields::new("Test Country")).await?;
    let district = districts
        .create(&DistrictFields::new(country.id, "Test District"))
        .await?;
    let locality = localities
        .create(&LocalityFields::new(district.id, "Test Locality"))
        .await?;

    let found = localities
        .get_by_name("Test Locality")
        .await?
        .expect("locality should exist");
    assert_eq!(found.district_id, district.id);
    assert_eq!(localities.get_by_name("Nonexistent Locality").await?, None);

    // Parents cannot go while children still reference them.
    let err = countries.delete_by_id(country.id).await.unwrap_err();
    assert!(matches!(err, DbError::InvalidReference { resource: "country", .. }));
    assert!(districts.delete_by_id(district.id).await.is_err());

    assert!(localities.delete_by_id(locality.id).await?);
    assert!(districts.delete_by_id(district.id).await?);
    assert!(countries.delete_by_id(country.id).await?);

    assert_eq!(countries.get_by_id(country.id).await?, None);
    Ok(())
}
