//! Answer repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use voicereader_shared::types::{AnswerId, QuestionId, UserId};

use super::load_writers;
use crate::entities::{answers, users};

/// Input for creating an answer.
#[derive(Debug, Clone)]
pub struct CreateAnswerInput {
    /// Question being answered.
    pub question_id: QuestionId,
    /// Author.
    pub writer_id: UserId,
    /// Answer text.
    pub contents: String,
}

/// Answer with its author.
#[derive(Debug, Clone)]
pub struct AnswerWithWriter {
    /// The answer record.
    pub answer: answers::Model,
    /// Author, if the user still exists.
    pub writer: Option<users::Model>,
}

/// Answer repository.
#[derive(Debug, Clone)]
pub struct AnswerRepository {
    db: DatabaseConnection,
}

impl AnswerRepository {
    /// Creates a new answer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an answer. The caller checks that the question exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateAnswerInput) -> Result<AnswerWithWriter, DbErr> {
        let answer = answers::ActiveModel {
            id: Set(AnswerId::new().into_inner()),
            question_id: Set(input.question_id.into_inner()),
            writer_id: Set(input.writer_id.into_inner()),
            contents: Set(input.contents),
            created_date: Set(chrono::Utc::now().timestamp()),
        }
        .insert(&self.db)
        .await?;

        let writer = users::Entity::find_by_id(answer.writer_id)
            .one(&self.db)
            .await?;
        Ok(AnswerWithWriter { answer, writer })
    }

    /// Finds an answer of a question.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        question_id: QuestionId,
        answer_id: AnswerId,
    ) -> Result<Option<AnswerWithWriter>, DbErr> {
        let rows = answers::Entity::find_by_id(answer_id.into_inner())
            .filter(answers::Column::QuestionId.eq(question_id.into_inner()))
            .all(&self.db)
            .await?;

        Ok(self.with_writers(rows).await?.pop())
    }

    /// Lists the answers of a question, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_question(
        &self,
        question_id: QuestionId,
    ) -> Result<Vec<AnswerWithWriter>, DbErr> {
        let rows = answers::Entity::find()
            .filter(answers::Column::QuestionId.eq(question_id.into_inner()))
            .order_by_asc(answers::Column::CreatedDate)
            .order_by_asc(answers::Column::Id)
            .all(&self.db)
            .await?;

        self.with_writers(rows).await
    }

    /// Lists the answers written by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_writer(&self, writer_id: UserId) -> Result<Vec<answers::Model>, DbErr> {
        answers::Entity::find()
            .filter(answers::Column::WriterId.eq(writer_id.into_inner()))
            .order_by_desc(answers::Column::CreatedDate)
            .order_by_desc(answers::Column::Id)
            .all(&self.db)
            .await
    }

    /// Deletes an answer of a question. Returns false if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn delete(&self, question_id: QuestionId, answer_id: AnswerId) -> Result<bool, DbErr> {
        let result = answers::Entity::delete_many()
            .filter(answers::Column::Id.eq(answer_id.into_inner()))
            .filter(answers::Column::QuestionId.eq(question_id.into_inner()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn with_writers(
        &self,
        rows: Vec<answers::Model>,
    ) -> Result<Vec<AnswerWithWriter>, DbErr> {
        let writers = load_writers(&self.db, rows.iter().map(|a| a.writer_id)).await?;

        Ok(rows
            .into_iter()
            .map(|answer| AnswerWithWriter {
                writer: writers.get(&answer.writer_id).cloned(),
                answer,
            })
            .collect())
    }
}
