use tracing::info;

use super::{SpaceshipDraft, SpaceshipService};
use crate::errors::ServiceError;

pub const DEFAULT_SERIES: &str = "Star Wars";

pub const DEFAULT_FLEET: [&str; 8] = [
    "X-Wing",
    "TIE Fighter",
    "Millennium Falcon",
    "Slave I",
    "Star Destroyer",
    "Executor",
    "Nebulon-B Frigate",
    "Jedi Starfighter",
];

/// Insert the default fleet. Not idempotent: a persistent store gains another copy per call.
pub async fn seed_default_fleet(svc: &SpaceshipService) -> Result<usize, ServiceError> {
    for name in DEFAULT_FLEET {
        svc.save(SpaceshipDraft::new(name, DEFAULT_SERIES)).await?;
    }
    info!(count = DEFAULT_FLEET.len(), series = DEFAULT_SERIES, "seeded default fleet");
    Ok(DEFAULT_FLEET.len())
}
