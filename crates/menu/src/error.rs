use crate::types::MenuItemId;
use common::{DatabaseError, ValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MenuError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Menu item not found: {0}")]
    NotFound(MenuItemId),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

pub type MenuResult<T> = Result<T, MenuError>;

impl From<rusqlite::Error> for MenuError {
    fn from(err: rusqlite::Error) -> Self {
        MenuError::Database(DatabaseError::QueryFailed(err.to_string()))
    }
}

impl From<r2d2::Error> for MenuError {
    fn from(err: r2d2::Error) -> Self {
        MenuError::Database(DatabaseError::ConnectionFailed(err.to_string()))
    }
}

impl MenuError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, MenuError::NotFound(_))
    }
}
