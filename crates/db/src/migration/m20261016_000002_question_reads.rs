//! Question read tracking.
//!
//! Records which users have opened a question. The composite primary key
//! makes each (question, reader) pair count once.

use sea_orm_migration::prelude::*;

use super::m20261016_000001_initial::Questions;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QuestionReads::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(QuestionReads::QuestionId).uuid().not_null())
                    .col(ColumnDef::new(QuestionReads::UserId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(QuestionReads::QuestionId)
                            .col(QuestionReads::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_reads_question")
                            .from(QuestionReads::Table, QuestionReads::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(QuestionReads::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum QuestionReads {
    Table,
    QuestionId,
    UserId,
}
