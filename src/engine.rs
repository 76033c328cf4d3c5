use crate::error::CoreError;
use crate::matcher::ProximityMatcher;
use crate::model::event::{Event, Outcome};
use crate::registry::Registry;
use teloxide::types::ChatId;

/// Applies one classified event to the registry and runs matching where the
/// event calls for it.
pub(crate) async fn handle_event(
    registry: &Registry,
    matcher: &ProximityMatcher,
    identity: ChatId,
    event: Event,
) -> Result<Outcome, CoreError> {
    match event {
        Event::Started => {
            registry.reset_session(identity).await;
            Ok(Outcome::SessionReset)
        }
        Event::RoleSelected(role) => {
            registry.select_role(identity, role).await;
            Ok(Outcome::RoleSelected(role))
        }
        Event::ContactShared(contact) => registry
            .register_contact(identity, contact)
            .await
            .map(Outcome::ContactRegistered),
        Event::LocationShared(location) => {
            let role = registry.update_location(identity, location).await?;
            let matches = matcher
                .find_nearby(registry, role, Some(location))
                .await?;
            Ok(Outcome::Matches { role, matches })
        }
        Event::RefreshRequested => {
            let (role, location) = registry.last_known_location(identity).await?;
            let matches = matcher.find_nearby(registry, role, location).await?;
            Ok(Outcome::Matches { role, matches })
        }
        Event::FinishRequested => registry.deactivate(identity).await.map(Outcome::Finished),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::participant::{Coordinates, Match};
    use crate::model::role::Role;
    use crate::utils::constants::DEFAULT_SEARCH_RADIUS_KM;

    const A: ChatId = ChatId(100);
    const B: ChatId = ChatId(200);
    const C: ChatId = ChatId(300);

    struct Harness {
        registry: Registry,
        matcher: ProximityMatcher,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                registry: Registry::new(),
                matcher: ProximityMatcher::new(DEFAULT_SEARCH_RADIUS_KM),
            }
        }

        async fn send(&self, identity: ChatId, event: Event) -> Result<Outcome, CoreError> {
            handle_event(&self.registry, &self.matcher, identity, event).await
        }

        async fn join(&self, identity: ChatId, role: Role, contact: &str, at: Coordinates) -> Outcome {
            self.send(identity, Event::Started).await.unwrap();
            self.send(identity, Event::RoleSelected(role)).await.unwrap();
            self.send(identity, Event::ContactShared(contact.to_owned()))
                .await
                .unwrap();
            self.send(identity, Event::LocationShared(at)).await.unwrap()
        }
    }

    fn point(latitude: f64, longitude: f64) -> Coordinates {
        Coordinates::new(latitude, longitude).unwrap()
    }

    #[tokio::test]
    async fn registration_flow_outcomes() {
        let harness = Harness::new();
        assert_eq!(harness.send(A, Event::Started).await, Ok(Outcome::SessionReset));
        assert_eq!(
            harness.send(A, Event::RoleSelected(Role::Requester)).await,
            Ok(Outcome::RoleSelected(Role::Requester))
        );
        assert_eq!(
            harness.send(A, Event::ContactShared("+A".to_owned())).await,
            Ok(Outcome::ContactRegistered(Role::Requester))
        );
        assert_eq!(
            harness
                .send(A, Event::LocationShared(point(41.30, 69.25)))
                .await,
            Ok(Outcome::Matches {
                role: Role::Requester,
                matches: vec![],
            })
        );
    }

    #[tokio::test]
    async fn out_of_order_events_report_errors() {
        let harness = Harness::new();
        assert_eq!(
            harness.send(A, Event::ContactShared("+A".to_owned())).await,
            Err(CoreError::NotRegistered)
        );
        assert_eq!(
            harness.send(A, Event::RefreshRequested).await,
            Err(CoreError::NotRegistered)
        );
        assert_eq!(
            harness.send(A, Event::FinishRequested).await,
            Err(CoreError::NotRegistered)
        );

        harness.send(A, Event::RoleSelected(Role::Provider)).await.unwrap();
        assert_eq!(
            harness
                .send(A, Event::LocationShared(point(41.30, 69.25)))
                .await,
            Err(CoreError::NoSuchParticipant)
        );
    }

    #[tokio::test]
    async fn refresh_without_location_is_distinct_from_no_matches() {
        let harness = Harness::new();
        harness.send(A, Event::RoleSelected(Role::Requester)).await.unwrap();
        harness
            .send(A, Event::ContactShared("+A".to_owned()))
            .await
            .unwrap();
        assert_eq!(
            harness.send(A, Event::RefreshRequested).await,
            Err(CoreError::NoLocation)
        );

        harness
            .send(A, Event::LocationShared(point(41.30, 69.25)))
            .await
            .unwrap();
        assert_eq!(
            harness.send(A, Event::RefreshRequested).await,
            Ok(Outcome::Matches {
                role: Role::Requester,
                matches: vec![],
            })
        );
    }

    #[tokio::test]
    async fn requester_sees_near_provider_only() {
        let harness = Harness::new();
        harness.join(B, Role::Provider, "+B", point(41.31, 69.26)).await;
        harness.join(C, Role::Provider, "+C", point(41.50, 69.50)).await;

        let outcome = harness
            .join(A, Role::Requester, "+A", point(41.30, 69.25))
            .await;
        assert_eq!(
            outcome,
            Outcome::Matches {
                role: Role::Requester,
                matches: vec![Match {
                    contact: "+B".to_owned(),
                    location: point(41.31, 69.26),
                }],
            }
        );
    }

    #[tokio::test]
    async fn finished_provider_disappears_until_next_location() {
        let harness = Harness::new();
        harness.join(B, Role::Provider, "+B", point(41.31, 69.26)).await;
        harness.join(A, Role::Requester, "+A", point(41.30, 69.25)).await;

        assert_eq!(
            harness.send(B, Event::FinishRequested).await,
            Ok(Outcome::Finished(Role::Provider))
        );
        assert_eq!(
            harness.send(A, Event::RefreshRequested).await,
            Ok(Outcome::Matches {
                role: Role::Requester,
                matches: vec![],
            })
        );
        let record = harness
            .registry
            .get_participant(Role::Provider, B)
            .await
            .unwrap();
        assert_eq!(record.contact, "+B");

        harness.send(B, Event::RoleSelected(Role::Provider)).await.unwrap();
        harness
            .send(B, Event::LocationShared(point(41.31, 69.26)))
            .await
            .unwrap();

        match harness.send(A, Event::RefreshRequested).await {
            Ok(Outcome::Matches { matches, .. }) => {
                assert_eq!(matches.len(), 1);
                assert_eq!(matches[0].contact, "+B");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn provider_sees_requesters() {
        let harness = Harness::new();
        harness.join(A, Role::Requester, "+A", point(41.30, 69.25)).await;

        match harness.join(B, Role::Provider, "+B", point(41.31, 69.26)).await {
            Outcome::Matches { role, matches } => {
                assert_eq!(role, Role::Provider);
                assert_eq!(matches.len(), 1);
                assert_eq!(matches[0].contact, "+A");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn switching_roles_leaves_no_ghost() {
        let harness = Harness::new();
        harness.join(B, Role::Provider, "+B", point(41.31, 69.26)).await;
        harness.join(B, Role::Requester, "+B", point(41.31, 69.26)).await;

        harness.join(A, Role::Requester, "+A", point(41.30, 69.25)).await;
        match harness.send(A, Event::RefreshRequested).await {
            Ok(Outcome::Matches { matches, .. }) => assert!(matches.is_empty()),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
