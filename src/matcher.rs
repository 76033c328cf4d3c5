use crate::error::CoreError;
use crate::model::participant::{Coordinates, Match};
use crate::model::role::Role;
use crate::registry::Registry;

/// Finds active counterparts strictly closer than `radius_km`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ProximityMatcher {
    radius_km: f64,
}

impl ProximityMatcher {
    pub(crate) fn new(radius_km: f64) -> Self {
        Self { radius_km }
    }

    pub(crate) fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Reads the pool opposite to `query_role`; never mutates the registry.
    ///
    /// An empty result is a valid answer, distinct from [`CoreError::NoLocation`].
    pub(crate) async fn find_nearby(
        &self,
        registry: &Registry,
        query_role: Role,
        query_location: Option<Coordinates>,
    ) -> Result<Vec<Match>, CoreError> {
        let origin = query_location.ok_or(CoreError::NoLocation)?;

        let mut matches = Vec::new();
        registry
            .pool(query_role.opposite())
            .scan_async(|_, participant| {
                if let Some(location) = participant.live_location() {
                    if origin.distance_to(&location) < self.radius_km {
                        matches.push(Match {
                            contact: participant.contact.clone(),
                            location,
                        });
                    }
                }
            })
            .await;

        log::info!(
            "{} {} found within {} km",
            matches.len(),
            query_role.opposite(),
            self.radius_km
        );
        log::debug!(
            "Search origin: latitude = {}, longitude = {}",
            origin.latitude,
            origin.longitude
        );
        Ok(matches)
    }
}
