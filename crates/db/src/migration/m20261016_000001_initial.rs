//! Initial database migration.
//!
//! Creates the users, questions and answers tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::DisplayName).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().null())
                    .col(
                        ColumnDef::new(Users::FcmUid)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Picture).string().not_null())
                    .col(ColumnDef::new(Users::CreatedDate).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Questions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Questions::WriterId).uuid().not_null())
                    .col(ColumnDef::new(Questions::Title).string().not_null())
                    .col(ColumnDef::new(Questions::Contents).text().not_null())
                    .col(ColumnDef::new(Questions::Subtitles).text().not_null())
                    .col(ColumnDef::new(Questions::SoundUrl).string().not_null())
                    .col(
                        ColumnDef::new(Questions::CreatedDate)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing is newest first.
        manager
            .create_index(
                Index::create()
                    .name("idx_questions_created_date")
                    .table(Questions::Table)
                    .col(Questions::CreatedDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_questions_writer")
                    .table(Questions::Table)
                    .col(Questions::WriterId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Answers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Answers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Answers::QuestionId).uuid().not_null())
                    .col(ColumnDef::new(Answers::WriterId).uuid().not_null())
                    .col(ColumnDef::new(Answers::Contents).text().not_null())
                    .col(ColumnDef::new(Answers::CreatedDate).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_answers_question")
                            .from(Answers::Table, Answers::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_answers_question")
                    .table(Answers::Table)
                    .col(Answers::QuestionId)
                    .col(Answers::CreatedDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_answers_writer")
                    .table(Answers::Table)
                    .col(Answers::WriterId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Answers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Questions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    DisplayName,
    Email,
    FcmUid,
    Picture,
    CreatedDate,
}

#[derive(DeriveIden)]
pub(super) enum Questions {
    Table,
    Id,
    WriterId,
    Title,
    Contents,
    Subtitles,
    SoundUrl,
    CreatedDate,
}

#[derive(DeriveIden)]
enum Answers {
    Table,
    Id,
    QuestionId,
    WriterId,
    Contents,
    CreatedDate,
}
