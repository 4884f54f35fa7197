//! Queue naming convention.
//!
//! Every message type gets a family of logical queues derived from its short
//! type name, e.g. `mq:Hello.inq`. SQS only accepts alphanumerics, `-` and `_`
//! in queue names, so logical names are mapped to an SQS-safe form before they
//! reach the provider.

use sha2::{Digest, Sha256};

const IN_QUEUE_SUFFIX: &str = ".inq";
const PRIORITY_QUEUE_SUFFIX: &str = ".priorityq";
const OUT_QUEUE_SUFFIX: &str = ".outq";
const DLQ_SUFFIX: &str = ".dlq";
const FIFO_SUFFIX: &str = ".fifo";
const DIGEST_LEN: usize = 16;

/// Maximum length of an SQS queue name.
pub const MAX_SQS_QUEUE_NAME_LEN: usize = 80;

/// Resolves logical queue names for message types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueNames {
    prefix: String,
}

impl QueueNames {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn resolve(&self, type_name: &str, suffix: &str) -> String {
        format!("{}mq:{type_name}{suffix}", self.prefix)
    }

    /// Inbound queue for a type name, e.g. `mq:Hello.inq`.
    #[must_use]
    pub fn in_queue(&self, type_name: &str) -> String {
        self.resolve(type_name, IN_QUEUE_SUFFIX)
    }

    /// Queue for messages published with a priority above zero.
    #[must_use]
    pub fn priority_queue(&self, type_name: &str) -> String {
        self.resolve(type_name, PRIORITY_QUEUE_SUFFIX)
    }

    #[must_use]
    pub fn out_queue(&self, type_name: &str) -> String {
        self.resolve(type_name, OUT_QUEUE_SUFFIX)
    }

    #[must_use]
    pub fn dlq(&self, type_name: &str) -> String {
        self.resolve(type_name, DLQ_SUFFIX)
    }

    /// Default destination for an unwrapped payload of type `T`.
    ///
    /// Wrapping a `T` in a fresh [`Message`](crate::Message) routes to the same
    /// name, so both paths always agree.
    #[must_use]
    pub fn for_type<T: ?Sized>(&self) -> String {
        self.in_queue(&short_type_name::<T>())
    }

    /// Map a logical queue name to a name SQS accepts.
    ///
    /// Characters outside `[A-Za-z0-9_-]` become `-` and a trailing `.fifo` is
    /// preserved. Names longer than [`MAX_SQS_QUEUE_NAME_LEN`] keep their head
    /// and end in a digest of the full logical name, so queues that only differ
    /// in their tail (`.inq` vs `.priorityq`) stay distinct.
    #[must_use]
    pub fn sqs_queue_name(queue_name: &str) -> String {
        let (stem, fifo) = match queue_name.strip_suffix(FIFO_SUFFIX) {
            Some(stem) => (stem, FIFO_SUFFIX),
            None => (queue_name, ""),
        };

        let mut name: String = stem
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '-'
                }
            })
            .collect();

        if name.len() + fifo.len() > MAX_SQS_QUEUE_NAME_LEN {
            let digest = hex::encode(Sha256::digest(queue_name.as_bytes()));
            name.truncate(MAX_SQS_QUEUE_NAME_LEN - fifo.len() - DIGEST_LEN - 1);
            name.push('-');
            name.push_str(&digest[..DIGEST_LEN]);
        }
        name.push_str(fifo);
        name
    }
}

/// Rust type name of `T` with every module path stripped.
///
/// `app::models::Hello` becomes `Hello` and `Vec<app::Hello>` becomes
/// `Vec<Hello>`.
#[must_use]
pub fn short_type_name<T: ?Sized>() -> String {
    strip_module_paths(std::any::type_name::<T>())
}

fn strip_module_paths(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    let mut chars = full.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                segment.clear();
            }
            c if c.is_alphanumeric() || c == '_' => segment.push(c),
            c => {
                out.push_str(&segment);
                segment.clear();
                out.push(c);
            }
        }
    }
    out.push_str(&segment);
    out
}
