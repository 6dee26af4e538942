//! Create `spaceship` table.
//! `id` is storage-assigned (bigserial on PostgreSQL, INTEGER PRIMARY KEY on SQLite).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Spaceship::Table)
                    .if_not_exists()
                    .col(big_integer(Spaceship::Id).auto_increment().primary_key())
                    .col(string(Spaceship::Name).not_null())
                    .col(string(Spaceship::Series).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Spaceship::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Spaceship { Table, Id, Name, Series }
