//! Service layer providing spaceship CRUD operations on top of models.
//! - Separates business logic from data access via `SpaceshipRepository`.
//! - Owns the name-search cache.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod pagination;
pub mod spaceship;
#[cfg(test)]
pub mod test_support;
