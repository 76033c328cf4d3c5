use thiserror::Error;

/// Recoverable outcomes of registry and matcher operations.
///
/// None of these are fatal: the transport layer turns each into a prompt.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// No role has been chosen in the current session.
    #[error("no role selected for this session")]
    NotRegistered,

    /// Location arrived before contact registration.
    #[error("participant has not shared a contact yet")]
    NoSuchParticipant,

    /// Matching requested without a stored location.
    #[error("participant has no location")]
    NoLocation,

    #[error("invalid location: latitude = {latitude}, longitude = {longitude}")]
    InvalidLocation { latitude: f64, longitude: f64 },
}
