//! Observable events
//!
//! Every line the crate logs names one of these events.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration and bootstrap
    /// Configuration loaded
    ConfigLoaded,
    /// Bootstrap document loaded and normalized
    SchemaLoaded,

    // Store lifecycle
    /// Store created
    StoreCreated,
    /// Whole tree replaced
    SchemaSeeded,

    // Mutations
    /// Property inserted
    PropertyAdded,
    /// Add dropped because the target is not a container
    PropertyAddIgnored,
    /// Property fields merged
    PropertyEdited,
    /// Property re-keyed under a new name
    PropertyRenamed,
    /// Property removed
    PropertyDeleted,
    /// Mutation rejected with an error
    MutationRejected,

    // Subscriptions
    /// Listener registered
    ListenerSubscribed,
    /// Listener removed
    ListenerUnsubscribed,

    // Session
    /// Editing session started
    SessionBegin,
    /// Editing session ended
    SessionEnd,
    /// Session request failed
    RequestFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaLoaded => "SCHEMA_LOADED",

            Event::StoreCreated => "STORE_CREATED",
            Event::SchemaSeeded => "SCHEMA_SEEDED",

            Event::PropertyAdded => "PROPERTY_ADDED",
            Event::PropertyAddIgnored => "PROPERTY_ADD_IGNORED",
            Event::PropertyEdited => "PROPERTY_EDITED",
            Event::PropertyRenamed => "PROPERTY_RENAMED",
            Event::PropertyDeleted => "PROPERTY_DELETED",
            Event::MutationRejected => "MUTATION_REJECTED",

            Event::ListenerSubscribed => "LISTENER_SUBSCRIBED",
            Event::ListenerUnsubscribed => "LISTENER_UNSUBSCRIBED",

            Event::SessionBegin => "SESSION_BEGIN",
            Event::SessionEnd => "SESSION_END",
            Event::RequestFailed => "REQUEST_FAILED",
        }
    }

    /// Returns true for per-operation events that are logged at TRACE
    pub fn is_detail(&self) -> bool {
        matches!(
            self,
            Event::PropertyAdded
                | Event::PropertyAddIgnored
                | Event::PropertyEdited
                | Event::PropertyRenamed
                | Event::PropertyDeleted
                | Event::MutationRejected
                | Event::ListenerSubscribed
                | Event::ListenerUnsubscribed
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ConfigLoaded,
            Event::SchemaLoaded,
            Event::StoreCreated,
            Event::SchemaSeeded,
            Event::PropertyAdded,
            Event::PropertyAddIgnored,
            Event::PropertyEdited,
            Event::PropertyRenamed,
            Event::PropertyDeleted,
            Event::MutationRejected,
            Event::ListenerSubscribed,
            Event::ListenerUnsubscribed,
            Event::SessionBegin,
            Event::SessionEnd,
            Event::RequestFailed,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_detail_events() {
        assert!(Event::PropertyAdded.is_detail());
        assert!(Event::ListenerUnsubscribed.is_detail());
        assert!(!Event::SchemaLoaded.is_detail());
        assert!(!Event::SessionBegin.is_detail());
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::PropertyRenamed), "PROPERTY_RENAMED");
    }
}
