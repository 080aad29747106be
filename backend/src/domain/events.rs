//! Domain events for person mutations.
//!
//! Mutations publish events to sinks that are injected explicitly when the
//! service is constructed. There is deliberately no ambient subscriber
//! registry: the set of listeners is fixed per process lifecycle and
//! visible at the wiring site.
//!
//! Delivery is synchronous and best-effort; sinks handle their own
//! failures so a misbehaving listener cannot fail the mutation that
//! triggered it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::person::{Person, PersonStatus};

/// What happened to a person record.
#[derive(Debug, Clone, PartialEq)]
pub enum PersonEventKind {
    /// A person was created.
    Created,
    /// A person's attributes were updated.
    Updated,
    /// A person was deleted.
    Deleted,
    /// The manager assignment changed.
    ManagerChanged {
        /// Manager before the change.
        previous: Option<i32>,
        /// Manager after the change.
        current: Option<i32>,
    },
    /// The status changed.
    StatusChanged {
        /// Status before the change.
        previous: PersonStatus,
        /// Status after the change.
        current: PersonStatus,
    },
}

impl PersonEventKind {
    /// Stable dotted event name for logs and downstream consumers.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created => "person.created",
            Self::Updated => "person.updated",
            Self::Deleted => "person.deleted",
            Self::ManagerChanged { .. } => "person.manager_changed",
            Self::StatusChanged { .. } => "person.status_changed",
        }
    }
}

/// A person mutation event.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonEvent {
    /// Identifier of the affected person.
    pub person_id: i32,
    /// What happened.
    pub kind: PersonEventKind,
    /// When the mutation was observed.
    pub occurred_at: DateTime<Utc>,
}

impl PersonEvent {
    /// Build an event stamped with the current time.
    #[must_use]
    pub fn now(person_id: i32, kind: PersonEventKind) -> Self {
        Self {
            person_id,
            kind,
            occurred_at: Utc::now(),
        }
    }

    /// Shorthand for a creation event.
    #[must_use]
    pub fn created(person: &Person) -> Self {
        Self::now(person.id, PersonEventKind::Created)
    }
}

/// Receiver for person events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Deliver one event. Implementations must not fail the caller.
    async fn deliver(&self, event: &PersonEvent);
}

/// Fan-out sink over an explicit list of listeners.
#[derive(Clone, Default)]
pub struct CompositeEventSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl CompositeEventSink {
    /// Build a composite over the given sinks.
    #[must_use]
    pub fn new(sinks: Vec<Arc<dyn EventSink>>) -> Self {
        Self { sinks }
    }

    /// Append another listener.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether no listeners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl EventSink for CompositeEventSink {
    async fn deliver(&self, event: &PersonEvent) {
        for sink in &self.sinks {
            sink.deliver(event).await;
        }
    }
}

/// Sink that records events to the structured log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn deliver(&self, event: &PersonEvent) {
        info!(
            event = event.kind.name(),
            person_id = event.person_id,
            occurred_at = %event.occurred_at,
            "person event published"
        );
    }
}
