use chrono::{DateTime, Utc};

/// A domain event: an immutable fact describing something that happened to an
/// aggregate.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - **keyed** by a stable kind string (used for handler registration)
/// - recorded by the aggregate and delivered only after persistence
pub trait DomainEvent: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event kind identifier (e.g. "intervention.planned").
    fn event_type(&self) -> &'static str;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
