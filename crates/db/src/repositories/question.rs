//! Question repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::OnConflict,
};
use uuid::Uuid;
use voicereader_shared::types::{QuestionId, UserId};

use super::load_writers;
use crate::entities::{answers, question_reads, questions, users};

/// Input for creating a question.
///
/// The ID is chosen by the caller so the uploaded sound can be stored under
/// it before the row is written.
#[derive(Debug, Clone)]
pub struct CreateQuestionInput {
    /// Question ID.
    pub id: QuestionId,
    /// Author.
    pub writer_id: UserId,
    /// Title.
    pub title: String,
    /// Body text.
    pub contents: String,
    /// Transcript of the recorded audio.
    pub subtitles: String,
    /// Public URL of the recorded audio.
    pub sound_url: String,
}

/// Question with its author and counters.
#[derive(Debug, Clone)]
pub struct QuestionWithStats {
    /// The question record.
    pub question: questions::Model,
    /// Author, if the user still exists.
    pub writer: Option<users::Model>,
    /// Number of distinct users who opened the question.
    pub num_of_view: u64,
    /// Number of answers.
    pub num_of_answers: u64,
}

/// Question repository.
#[derive(Debug, Clone)]
pub struct QuestionRepository {
    db: DatabaseConnection,
}

impl QuestionRepository {
    /// Creates a new question repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a question.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateQuestionInput) -> Result<questions::Model, DbErr> {
        let question = questions::ActiveModel {
            id: Set(input.id.into_inner()),
            writer_id: Set(input.writer_id.into_inner()),
            title: Set(input.title),
            contents: Set(input.contents),
            subtitles: Set(input.subtitles),
            sound_url: Set(input.sound_url),
            created_date: Set(chrono::Utc::now().timestamp()),
        };

        question.insert(&self.db).await
    }

    /// Lists questions newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, offset: u64, limit: u64) -> Result<Vec<QuestionWithStats>, DbErr> {
        let rows = questions::Entity::find()
            .order_by_desc(questions::Column::CreatedDate)
            .order_by_desc(questions::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;

        self.with_stats(rows).await
    }

    /// Lists the questions written by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_writer(&self, writer_id: UserId) -> Result<Vec<QuestionWithStats>, DbErr> {
        let rows = questions::Entity::find()
            .filter(questions::Column::WriterId.eq(writer_id.into_inner()))
            .order_by_desc(questions::Column::CreatedDate)
            .order_by_desc(questions::Column::Id)
            .all(&self.db)
            .await?;

        self.with_stats(rows).await
    }

    /// Finds a question with its author and counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: QuestionId) -> Result<Option<QuestionWithStats>, DbErr> {
        let Some(question) = questions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        Ok(self.with_stats(vec![question]).await?.pop())
    }

    /// Checks if a question exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn exists(&self, id: QuestionId) -> Result<bool, DbErr> {
        let count = questions::Entity::find_by_id(id.into_inner())
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// Records that a user opened a question. Repeated reads count once.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn add_read(&self, question_id: QuestionId, user_id: UserId) -> Result<(), DbErr> {
        let read = question_reads::ActiveModel {
            question_id: Set(question_id.into_inner()),
            user_id: Set(user_id.into_inner()),
        };

        question_reads::Entity::insert(read)
            .on_conflict(
                OnConflict::columns([
                    question_reads::Column::QuestionId,
                    question_reads::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(())
    }

    /// Deletes a question together with its answers and reads.
    ///
    /// Returns false if no question has this ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn delete(&self, id: QuestionId) -> Result<bool, DbErr> {
        let id = id.into_inner();
        let txn = self.db.begin().await?;

        answers::Entity::delete_many()
            .filter(answers::Column::QuestionId.eq(id))
            .exec(&txn)
            .await?;
        question_reads::Entity::delete_many()
            .filter(question_reads::Column::QuestionId.eq(id))
            .exec(&txn)
            .await?;
        let result = questions::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    async fn with_stats(
        &self,
        rows: Vec<questions::Model>,
    ) -> Result<Vec<QuestionWithStats>, DbErr> {
        let writers = load_writers(&self.db, rows.iter().map(|q| q.writer_id)).await?;

        let mut result = Vec::with_capacity(rows.len());
        for question in rows {
            let num_of_view = self.count_reads(question.id).await?;
            let num_of_answers = answers::Entity::find()
                .filter(answers::Column::QuestionId.eq(question.id))
                .count(&self.db)
                .await?;
            let writer = writers.get(&question.writer_id).cloned();

            result.push(QuestionWithStats {
                question,
                writer,
                num_of_view,
                num_of_answers,
            });
        }

        Ok(result)
    }

    async fn count_reads(&self, question_id: Uuid) -> Result<u64, DbErr> {
        question_reads::Entity::find()
            .filter(question_reads::Column::QuestionId.eq(question_id))
            .count(&self.db)
            .await
    }
}
