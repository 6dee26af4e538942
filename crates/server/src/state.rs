use std::sync::Arc;

use service::spaceship::SpaceshipService;

/// Shared handler state; cloned per request.
#[derive(Clone)]
pub struct ServerState {
    pub spaceships: Arc<SpaceshipService>,
}

impl ServerState {
    pub fn new(spaceships: SpaceshipService) -> Self {
        Self { spaceships: Arc::new(spaceships) }
    }
}
