use crate::model::participant::{Coordinates, Match};
use crate::model::role::Role;

/// Inbound events, already classified by the transport layer.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Started,
    RoleSelected(Role),
    ContactShared(String),
    LocationShared(Coordinates),
    RefreshRequested,
    FinishRequested,
}

/// What the transport layer has to render after an event was applied.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    SessionReset,
    RoleSelected(Role),
    ContactRegistered(Role),
    /// `role` is the querying side; `matches` come from the opposite pool.
    Matches { role: Role, matches: Vec<Match> },
    Finished(Role),
}
