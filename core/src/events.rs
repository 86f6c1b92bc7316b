//! Events emitted by state transitions
//!
//! Events are queued on the [`Context`](crate::store::Context) and released
//! with the committed result. The registry never waits on a sink.

use serde::{Deserialize, Serialize};

/// Event type names
pub mod types {
    /// A name was registered
    pub const NAME_REGISTERED: &str = "xid_name_registered";
    /// A name changed owner
    pub const NAME_TRANSFERRED: &str = "xid_name_transferred";
    /// A profile was overwritten
    pub const PROFILE_UPDATED: &str = "xid_profile_updated";
    /// A DNS record was set
    pub const DNS_RECORD_SET: &str = "xid_dns_record_set";
    /// A DNS record was deleted
    pub const DNS_RECORD_DELETED: &str = "xid_dns_record_deleted";
    /// A TLD was created
    pub const TLD_CREATED: &str = "xid_tld_created";
    /// A TLD configuration was replaced
    pub const TLD_UPDATED: &str = "xid_tld_updated";
    /// Module parameters were replaced
    pub const PARAMS_UPDATED: &str = "xid_params_updated";
    /// A peer was linked
    pub const PEER_SET: &str = "xid_epixnet_peer_set";
    /// A peer was revoked
    pub const PEER_REVOKED: &str = "xid_epixnet_peer_revoked";
}

/// Attribute keys
pub mod attributes {
    /// Name label
    pub const NAME: &str = "name";
    /// TLD label
    pub const TLD: &str = "tld";
    /// Owner identity
    pub const OWNER: &str = "owner";
    /// Fee charged
    pub const FEE: &str = "fee";
    /// Previous owner
    pub const FROM: &str = "from";
    /// New owner
    pub const TO: &str = "to";
    /// DNS record type
    pub const RECORD_TYPE: &str = "record_type";
    /// Peer address
    pub const ADDRESS: &str = "address";
    /// Peer label
    pub const LABEL: &str = "label";
    /// Content root after the change
    pub const CONTENT_ROOT: &str = "content_root";
    /// Whether a TLD is enabled
    pub const ENABLED: &str = "enabled";
    /// Governance identity
    pub const AUTHORITY: &str = "authority";
}

/// A named event with ordered key-value attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event type, see [`types`]
    pub kind: String,

    /// Attributes in insertion order
    pub attributes: Vec<(String, String)>,
}

impl Event {
    /// Create an event with no attributes
    pub fn new(kind: impl Into<String>) -> Self {
        Event {
            kind: kind.into(),
            attributes: Vec::new(),
        }
    }

    /// Append an attribute
    pub fn attr(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.push((key.into(), value.to_string()));
        self
    }

    /// First value recorded for `key`
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Receiver of committed events
pub trait EventSink {
    /// Accept one event
    fn publish(&mut self, event: &Event);

    /// Accept events in order
    fn publish_all(&mut self, events: &[Event]) {
        for event in events {
            self.publish(event);
        }
    }
}

impl EventSink for Vec<Event> {
    fn publish(&mut self, event: &Event) {
        self.push(event.clone());
    }
}

/// Sink writing each event to the log at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn publish(&mut self, event: &Event) {
        log::debug!("event {} {:?}", event.kind, event.attributes);
    }
}
