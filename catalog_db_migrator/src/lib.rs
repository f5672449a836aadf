//! The sole responsibility of this crate is to expose the statically imported sql migrations for the catalog database.
//!
//! Both the service binary and the `#[sqlx::test]` suites of the catalog crate depend on this.
pub static CATALOG_DB_MIGRATIONS: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
