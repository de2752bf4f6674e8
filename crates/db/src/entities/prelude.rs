//! Entity re-exports.

pub use super::answers::Entity as Answers;
pub use super::question_reads::Entity as QuestionReads;
pub use super::questions::Entity as Questions;
pub use super::users::Entity as Users;
