//! Default event handlers: structured logging of domain facts.
//!
//! Wired once at startup by whoever owns the dispatcher; nothing here is
//! registered implicitly.

use fieldops_clients::ClientEvent;
use fieldops_events::SyncEventDispatcher;
use fieldops_interventions::InterventionEvent;

/// Log newly planned interventions and team-membership changes.
pub fn register_intervention_logging(dispatcher: &SyncEventDispatcher<InterventionEvent>) {
    dispatcher.register("intervention.planned", |event| {
        if let InterventionEvent::Planned(e) = event {
            tracing::info!(
                intervention_id = %e.intervention_id,
                client_id = %e.client_id,
                billable_client_id = %e.billable_client_id,
                kind = ?e.kind,
                "intervention planned"
            );
        }
        Ok(())
    });

    dispatcher.register("intervention.team_member_added", |event| {
        if let InterventionEvent::TeamMemberAdded(e) = event {
            tracing::info!(
                intervention_id = %e.intervention_id,
                member_id = %e.member_id,
                "team member added to intervention"
            );
        }
        Ok(())
    });
}

/// Log client registrations.
pub fn register_client_logging(dispatcher: &SyncEventDispatcher<ClientEvent>) {
    dispatcher.register("client.created", |event| {
        let ClientEvent::Created(e) = event;
        tracing::info!(client_id = %e.client_id, name = %e.name, "client created");
        Ok(())
    });
}
