use crate::error::CoreError;
use crate::model::participant::{Coordinates, Participant};
use crate::model::role::Role;
use scc::hash_map::Entry;
use std::collections::HashSet;
use teloxide::types::ChatId;

pub(crate) type Pool = scc::HashMap<ChatId, Participant>;

/// Participants of both roles plus the per-chat registration sessions.
///
/// Every mutation of a participant happens under the entry lock of its
/// pool, so the matcher never observes a half-written record.
#[derive(Default)]
pub(crate) struct Registry {
    requesters: Pool,
    providers: Pool,
    sessions: scc::HashMap<ChatId, Role>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn pool(&self, role: Role) -> &Pool {
        match role {
            Role::Requester => &self.requesters,
            Role::Provider => &self.providers,
        }
    }

    /// Role chosen in the current session, if any.
    pub(crate) async fn session_role(&self, identity: ChatId) -> Option<Role> {
        self.sessions.read_async(&identity, |_, role| *role).await
    }

    /// Forgets the session. Registered participants are left as they are.
    pub(crate) async fn reset_session(&self, identity: ChatId) {
        if self.sessions.remove_async(&identity).await.is_some() {
            log::info!("Session of chat id = {} reset", identity.0);
        }
    }

    pub(crate) async fn select_role(&self, identity: ChatId, role: Role) {
        self.sessions
            .entry_async(identity)
            .await
            .and_modify(|current| *current = role)
            .or_insert(role);
        log::info!("Chat id = {} selected role {}", identity.0, role);
    }

    /// Registers (or re-registers) the contact under the session role.
    ///
    /// A record of the same chat in the opposite pool is dropped, so a chat
    /// is matchable under one role only. Re-registering under the same role
    /// replaces the contact and keeps location and activity.
    pub(crate) async fn register_contact(
        &self,
        identity: ChatId,
        contact: String,
    ) -> Result<Role, CoreError> {
        let role = self
            .session_role(identity)
            .await
            .ok_or(CoreError::NotRegistered)?;

        if self
            .pool(role.opposite())
            .remove_async(&identity)
            .await
            .is_some()
        {
            log::info!(
                "Chat id = {} moved from {} pool to {} pool",
                identity.0,
                role.opposite(),
                role
            );
        }

        match self.pool(role).entry_async(identity).await {
            Entry::Occupied(mut entry) => {
                entry.get_mut().contact = contact;
                log::info!("Chat id = {} updated contact as {}", identity.0, role);
            }
            Entry::Vacant(entry) => {
                entry.insert_entry(Participant::new(contact));
                log::info!("Chat id = {} registered as {}", identity.0, role);
            }
        }

        Ok(role)
    }

    /// Stores a fresh location and (re)activates the participant.
    pub(crate) async fn update_location(
        &self,
        identity: ChatId,
        location: Coordinates,
    ) -> Result<Role, CoreError> {
        let role = self
            .session_role(identity)
            .await
            .ok_or(CoreError::NotRegistered)?;

        self.pool(role)
            .update_async(&identity, |_, participant| participant.locate(location))
            .await
            .ok_or(CoreError::NoSuchParticipant)?;

        log::info!("Chat id = {} as {} shared location", identity.0, role);
        log::debug!(
            "Chat id = {} location: latitude = {}, longitude = {}",
            identity.0,
            location.latitude,
            location.longitude
        );
        Ok(role)
    }

    /// Ends activity: clears location and the session, keeps the contact.
    pub(crate) async fn deactivate(&self, identity: ChatId) -> Result<Role, CoreError> {
        let role = self
            .session_role(identity)
            .await
            .ok_or(CoreError::NotRegistered)?;

        self.pool(role)
            .update_async(&identity, |_, participant| participant.deactivate())
            .await;
        self.sessions.remove_async(&identity).await;

        log::info!("Chat id = {} as {} finished", identity.0, role);
        Ok(role)
    }

    pub(crate) async fn get_participant(&self, role: Role, identity: ChatId) -> Option<Participant> {
        self.pool(role)
            .read_async(&identity, |_, participant| participant.clone())
            .await
    }

    /// Session role and last stored location, as needed for a refresh.
    pub(crate) async fn last_known_location(
        &self,
        identity: ChatId,
    ) -> Result<(Role, Option<Coordinates>), CoreError> {
        let role = self
            .session_role(identity)
            .await
            .ok_or(CoreError::NotRegistered)?;
        let participant = self
            .get_participant(role, identity)
            .await
            .ok_or(CoreError::NoSuchParticipant)?;
        Ok((role, participant.location))
    }

    /// Snapshot of every chat known to either pool, active or not.
    pub(crate) async fn known_identities(&self) -> Vec<ChatId> {
        let mut identities = HashSet::new();
        for role in [Role::Requester, Role::Provider] {
            self.pool(role)
                .scan_async(|identity, _| {
                    identities.insert(*identity);
                })
                .await;
        }
        identities.into_iter().collect()
    }
}
