use crate::error::CoreError;
use crate::utils::distance::calculate_distance;
use crate::utils::map_link::make_map_link;
use url::Url;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(CoreError::InvalidLocation {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        calculate_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Participant {
    pub contact: String,
    pub location: Option<Coordinates>,
    pub active: bool,
}

impl Participant {
    /// Freshly registered: no location yet, so not matchable.
    pub fn new(contact: String) -> Self {
        Self {
            contact,
            location: None,
            active: false,
        }
    }

    pub fn locate(&mut self, location: Coordinates) {
        self.location = Some(location);
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.location = None;
        self.active = false;
    }

    /// Location of an active participant, if any.
    pub fn live_location(&self) -> Option<Coordinates> {
        self.location.filter(|_| self.active)
    }
}

/// A counterpart found within the search radius.
#[derive(Clone, Debug, PartialEq)]
pub struct Match {
    pub contact: String,
    pub location: Coordinates,
}

impl Match {
    pub fn map_link(&self) -> Url {
        make_map_link(&self.location)
    }
}
