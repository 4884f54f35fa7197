//! Message envelope published onto queues.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::queue_names::{QueueNames, short_type_name};

/// Anything that can be published as a message envelope.
///
/// Implementors carry their own routing hint: the destination queue name is a
/// pure function of the envelope's type and metadata.
pub trait QueueMessage: Serialize + Send + Sync {
    /// Short name of the body type, used for routing.
    fn type_name(&self) -> String;

    fn priority(&self) -> i64 {
        0
    }

    /// Destination queue this envelope routes to by default.
    fn to_in_queue_name(&self, names: &QueueNames) -> String {
        let type_name = self.type_name();
        if self.priority() > 0 {
            names.priority_queue(&type_name)
        } else {
            names.in_queue(&type_name)
        }
    }
}

/// In-memory representation of a message.
///
/// The JSON form of this struct is the wire body sent to SQS. Field order is
/// fixed by the struct and `meta` is ordered, so serializing equal envelopes
/// always yields identical bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Message<T> {
    pub id: Uuid,
    pub created_date: DateTime<Utc>,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub retry_attempts: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
    pub body: T,
}

impl<T> Message<T> {
    /// Wrap a body in a fresh envelope with no explicit metadata.
    pub fn new(body: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_date: Utc::now(),
            priority: 0,
            retry_attempts: 0,
            reply_to: None,
            reply_id: None,
            tag: None,
            meta: BTreeMap::new(),
            body,
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }
}

impl<T: Serialize + Send + Sync> QueueMessage for Message<T> {
    fn type_name(&self) -> String {
        short_type_name::<T>()
    }

    fn priority(&self) -> i64 {
        self.priority
    }
}

/// A value handed to [`MessageProducer::publish`](crate::MessageProducer::publish).
///
/// Either a bare payload, which gets wrapped in a new [`Message`] and routed by
/// its type, or an envelope that already knows where it goes.
#[derive(Debug, Clone, PartialEq)]
pub enum Publishable<T> {
    Raw(T),
    Envelope(Message<T>),
}

impl<T> From<Message<T>> for Publishable<T> {
    fn from(message: Message<T>) -> Self {
        Publishable::Envelope(message)
    }
}
