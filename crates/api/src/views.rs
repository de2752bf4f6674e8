//! JSON representations of stored records.

use serde::Serialize;
use uuid::Uuid;
use voicereader_db::entities::{answers, questions, users};
use voicereader_db::repositories::{AnswerWithWriter, QuestionWithStats};

/// A user.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    /// User ID.
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Display name.
    pub display_name: String,
    /// Email address.
    pub email: Option<String>,
    /// Identity provider user ID.
    pub fcm_uid: String,
    /// Profile picture URL.
    pub picture: String,
    /// Unix seconds.
    pub created_date: i64,
}

impl From<users::Model> for UserView {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
            email: user.email,
            fcm_uid: user.fcm_uid,
            picture: user.picture,
            created_date: user.created_date,
        }
    }
}

/// A question as stored.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    /// Question ID.
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Author ID.
    pub writer_id: Uuid,
    /// Title.
    pub title: String,
    /// Body text.
    pub contents: String,
    /// Transcript of the audio.
    pub subtitles: String,
    /// Audio URL.
    pub sound_url: String,
    /// Unix seconds.
    pub created_date: i64,
}

impl From<questions::Model> for QuestionView {
    fn from(question: questions::Model) -> Self {
        Self {
            id: question.id,
            writer_id: question.writer_id,
            title: question.title,
            contents: question.contents,
            subtitles: question.subtitles,
            sound_url: question.sound_url,
            created_date: question.created_date,
        }
    }
}

/// A question with its author and counters.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionDetailView {
    /// Stored fields.
    #[serde(flatten)]
    pub question: QuestionView,
    /// Author, `null` if the user was deleted.
    pub writer: Option<UserView>,
    /// Distinct readers.
    pub num_of_view: u64,
    /// Answer count.
    pub num_of_answers: u64,
}

impl From<QuestionWithStats> for QuestionDetailView {
    fn from(q: QuestionWithStats) -> Self {
        Self {
            question: q.question.into(),
            writer: q.writer.map(Into::into),
            num_of_view: q.num_of_view,
            num_of_answers: q.num_of_answers,
        }
    }
}

/// An answer as stored.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerView {
    /// Answer ID.
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Question the answer belongs to.
    pub question_id: Uuid,
    /// Author ID.
    pub writer_id: Uuid,
    /// Answer text.
    pub contents: String,
    /// Unix seconds.
    pub created_date: i64,
}

impl From<answers::Model> for AnswerView {
    fn from(answer: answers::Model) -> Self {
        Self {
            id: answer.id,
            question_id: answer.question_id,
            writer_id: answer.writer_id,
            contents: answer.contents,
            created_date: answer.created_date,
        }
    }
}

/// An answer with its author.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerDetailView {
    /// Stored fields.
    #[serde(flatten)]
    pub answer: AnswerView,
    /// Author, `null` if the user was deleted.
    pub writer: Option<UserView>,
}

impl From<AnswerWithWriter> for AnswerDetailView {
    fn from(a: AnswerWithWriter) -> Self {
        Self {
            answer: a.answer.into(),
            writer: a.writer.map(Into::into),
        }
    }
}
