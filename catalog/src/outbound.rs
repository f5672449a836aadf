pub mod pg_catalog_repo;
