//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod answer;
pub mod question;
pub mod user;

pub use answer::{AnswerRepository, AnswerWithWriter, CreateAnswerInput};
pub use question::{CreateQuestionInput, QuestionRepository, QuestionWithStats};
pub use user::{CreateUserInput, UpdateUserInput, UserError, UserRepository};

use std::collections::HashMap;

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::users;

/// Loads the users with the given IDs, keyed by ID.
async fn load_writers(
    db: &DatabaseConnection,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, users::Model>, DbErr> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let writers = users::Entity::find()
        .filter(users::Column::Id.is_in(ids))
        .all(db)
        .await?;

    Ok(writers.into_iter().map(|u| (u.id, u)).collect())
}
