//! User repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr,
};
use uuid::Uuid;
use voicereader_shared::AppError;
use voicereader_shared::error::messages;
use voicereader_shared::types::UserId;

use crate::entities::users;

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// A user is already registered for this identity.
    #[error("User already exists for uid '{0}'")]
    AlreadyExists(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::AlreadyExists(_) => Self::Conflict(messages::ALREADY_EXISTS_USER.to_string()),
            UserError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for registering a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Name shown next to the user's questions and answers.
    pub display_name: String,
    /// Email asserted by the identity provider.
    pub email: Option<String>,
    /// Identity provider user ID.
    pub fcm_uid: String,
    /// Profile picture URL.
    pub picture: String,
}

/// Partial update of a user. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    /// New display name.
    pub display_name: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New picture URL.
    pub picture: Option<String>,
}

impl UpdateUserInput {
    /// Returns true if no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.email.is_none() && self.picture.is_none()
    }
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns `UserError::AlreadyExists` if a user with the same `fcm_uid`
    /// is registered, or a database error.
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, UserError> {
        let fcm_uid = input.fcm_uid.clone();
        let user = users::ActiveModel {
            id: Set(UserId::new().into_inner()),
            display_name: Set(input.display_name),
            email: Set(input.email),
            fcm_uid: Set(input.fcm_uid),
            picture: Set(input.picture),
            created_date: Set(chrono::Utc::now().timestamp()),
        };

        user.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                UserError::AlreadyExists(fcm_uid)
            } else {
                UserError::Database(e)
            }
        })
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id.into_inner()).one(&self.db).await
    }

    /// Finds the ID of the user registered for an identity provider uid.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_id_by_fcm_uid(&self, fcm_uid: &str) -> Result<Option<UserId>, DbErr> {
        let id: Option<Uuid> = users::Entity::find()
            .select_only()
            .column(users::Column::Id)
            .filter(users::Column::FcmUid.eq(fcm_uid))
            .into_tuple()
            .one(&self.db)
            .await?;

        Ok(id.map(UserId::from_uuid))
    }

    /// Applies a partial update.
    ///
    /// Returns `None` if no user has this ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn update(
        &self,
        id: UserId,
        input: UpdateUserInput,
    ) -> Result<Option<users::Model>, DbErr> {
        let Some(user) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        if input.is_empty() {
            return Ok(Some(user));
        }

        let mut active: users::ActiveModel = user.into();
        if let Some(display_name) = input.display_name {
            active.display_name = Set(display_name);
        }
        if let Some(email) = input.email {
            active.email = Set(Some(email));
        }
        if let Some(picture) = input.picture {
            active.picture = Set(picture);
        }

        active.update(&self.db).await.map(Some)
    }

    /// Sets the picture URL. Returns false if no user has this ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn set_picture(&self, id: UserId, picture: &str) -> Result<bool, DbErr> {
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::Picture,
                sea_orm::sea_query::Expr::value(picture.to_string()),
            )
            .filter(users::Column::Id.eq(id.into_inner()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Deletes a user. Returns false if no user has this ID.
    ///
    /// Questions and answers written by the user are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn delete(&self, id: UserId) -> Result<bool, DbErr> {
        let result = users::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Lists every user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(&self) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .order_by_asc(users::Column::CreatedDate)
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
    }
}
