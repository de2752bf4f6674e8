//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration. Tables are described with
//! the schema builders so the same migrations run on Postgres and SQLite.

pub use sea_orm_migration::prelude::*;

mod m20261016_000001_initial;
mod m20261016_000002_question_reads;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261016_000001_initial::Migration),
            Box::new(m20261016_000002_question_reads::Migration),
        ]
    }
}
