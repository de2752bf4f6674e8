//! `SeaORM` entity definitions.

pub mod prelude;

pub mod answers;
pub mod question_reads;
pub mod questions;
pub mod users;
