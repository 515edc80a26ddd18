//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows the pool; one statement per call, no transactions
//! - Reads return `Option`/`Vec`, deletes return whether a row went away
//! - Writes classify constraint violations into [`crate::DbError`]

pub mod addresses;
pub mod contact_types;
pub mod countries;
pub mod districts;
pub mod genders;
pub mod groups;
pub mod localities;
pub mod login_activities;
pub mod rule_groups;
pub mod rules;
pub mod users;

pub use addresses::{Address, AddressFields, AddressRepo};
pub use contact_types::{ContactType, ContactTypeFields, ContactTypeRepo};
pub use countries::{Country, CountryFields, CountryRepo};
pub use districts::{District, DistrictFields, DistrictRepo};
pub use genders::{Gender, GenderFields, GenderRepo};
pub use groups::{Group, GroupFields, GroupRepo};
pub use localities::{Locality, LocalityFields, LocalityRepo};
pub use login_activities::{LoginActivity, LoginActivityFields, LoginActivityRepo};
pub use rule_groups::{RuleGroup, RuleGroupDetail, RuleGroupRepo};
pub use rules::{Rule, RuleFields, RuleRepo};
pub use users::{User, UserFields, UserRepo};
