use std::env;

use super::queue_names::QueueNames;
use crate::errors::MqError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqConfig {
    pub queue_prefix: String,
    pub create_queues: bool,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
}

impl Default for MqConfig {
    fn default() -> Self {
        Self {
            queue_prefix: String::new(),
            create_queues: true,
            region: None,
            endpoint_url: None,
        }
    }
}

impl MqConfig {
    /// # Errors
    ///
    /// Returns an error if `MQ_CREATE_QUEUES` is set to something that is not a boolean.
    pub fn from_env() -> Result<Self, MqError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns an error if `MQ_CREATE_QUEUES` is set to something that is not a boolean.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MqError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let create_queues = match lookup("MQ_CREATE_QUEUES") {
            Some(value) => parse_bool(&value)
                .ok_or_else(|| MqError::Config(format!("MQ_CREATE_QUEUES: invalid value {value:?}")))?,
            None => true,
        };

        Ok(Self {
            queue_prefix: lookup("MQ_QUEUE_PREFIX").unwrap_or_default(),
            create_queues,
            region: lookup("AWS_REGION").filter(|v| !v.is_empty()),
            endpoint_url: lookup("MQ_SQS_ENDPOINT_URL").filter(|v| !v.is_empty()),
        })
    }

    #[must_use]
    pub fn queue_names(&self) -> QueueNames {
        QueueNames::new(self.queue_prefix.clone())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = MqConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, MqConfig::default());
        assert!(config.create_queues);
    }

    #[test]
    fn reads_all_variables() {
        let config = MqConfig::from_lookup(lookup_from(&[
            ("MQ_QUEUE_PREFIX", "site1."),
            ("MQ_CREATE_QUEUES", "no"),
            ("AWS_REGION", "eu-west-1"),
            ("MQ_SQS_ENDPOINT_URL", "http://localhost:4566"),
        ]))
        .unwrap();

        assert_eq!(config.queue_prefix, "site1.");
        assert!(!config.create_queues);
        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:4566"));
        assert_eq!(config.queue_names().in_queue("Hello"), "site1.mq:Hello.inq");
    }

    #[test]
    fn rejects_invalid_create_queues() {
        let err = MqConfig::from_lookup(lookup_from(&[("MQ_CREATE_QUEUES", "maybe")])).unwrap_err();
        assert!(matches!(err, MqError::Config(msg) if msg.contains("MQ_CREATE_QUEUES")));
    }

    #[test]
    fn empty_region_is_ignored() {
        let config = MqConfig::from_lookup(lookup_from(&[("AWS_REGION", "")])).unwrap();
        assert!(config.region.is_none());
    }
}
