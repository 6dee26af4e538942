use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn spaceship_not_found(id: i64) -> Self { Self::NotFound(format!("Spaceship not found with id {id}")) }
}
