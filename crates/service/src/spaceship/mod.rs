//! Spaceship storage abstraction, cached service facade and startup seeding.

pub mod repository;
pub mod seed;
pub mod service;

pub use models::spaceship::SpaceshipDraft;
pub use repository::SpaceshipRepository;
pub use service::SpaceshipService;

/// A persisted spaceship.
pub type Spaceship = models::spaceship::Model;
