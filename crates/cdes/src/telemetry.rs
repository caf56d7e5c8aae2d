//! Privacy-respecting usage telemetry.
//!
//! Events are buffered in memory on an application-owned [`Telemetry`]
//! recorder and mirrored as `tracing` events at TRACE level. Nothing is sent
//! over the network; callers decide what to do with [`Telemetry::events`].
//!
//! Events carry a random per-session id and an anonymous install id: the
//! first 16 hex characters of `SHA-256("<host>:<user>")`.

use std::env;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::TelemetryConfig;

/// A recorded usage event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryEvent {
    pub event: String,
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    pub install_id: String,
    pub properties: Map<String, Value>,
}

/// In-memory telemetry recorder.
#[derive(Debug, Clone)]
pub struct Telemetry {
    config: TelemetryConfig,
    session_id: String,
    install_id: String,
    events: Vec<TelemetryEvent>,
}

impl Telemetry {
    /// Creates a recorder with a fresh session id.
    pub fn new(config: TelemetryConfig) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
            install_id: install_id_from_env(),
            events: Vec::new(),
        }
    }

    /// Creates a recorder configured from the environment.
    pub fn from_env() -> Self {
        Self::new(TelemetryConfig::from_env())
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn enable(&mut self) {
        self.config.enabled = true;
    }

    pub fn disable(&mut self) {
        self.config.enabled = false;
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn install_id(&self) -> &str {
        &self.install_id
    }

    /// Configured collection endpoint.
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Records an event. Does nothing while telemetry is disabled.
    pub fn track_event(&mut self, event: &str, properties: Map<String, Value>) {
        if !self.config.enabled {
            return;
        }
        tracing::trace!(
            event,
            session_id = %self.session_id,
            properties = %serde_json::Value::Object(properties.clone()),
            "telemetry event"
        );
        self.events.push(TelemetryEvent {
            event: event.to_string(),
            timestamp: Utc::now(),
            session_id: self.session_id.clone(),
            install_id: self.install_id.clone(),
            properties,
        });
    }

    /// Records a validation call and its outcome.
    pub fn track_validation(&mut self, schema: &str, valid: bool) {
        let mut props = Map::new();
        props.insert("schema".into(), schema.into());
        props.insert("valid".into(), valid.into());
        self.track_event("validate", props);
    }

    /// Records use of a model type, optionally naming the method.
    pub fn track_model_usage(&mut self, model: &str, method: Option<&str>) {
        let mut props = Map::new();
        props.insert("model".into(), model.into());
        if let Some(method) = method {
            props.insert("method".into(), method.into());
        }
        self.track_event("model_usage", props);
    }

    /// Events recorded so far, oldest first.
    pub fn events(&self) -> &[TelemetryEvent] {
        &self.events
    }

    /// Drops all buffered events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// Anonymous install id for a host/user pair.
pub fn anonymous_install_id(host: &str, user: &str) -> String {
    let hash = Sha256::digest(format!("{host}:{user}").as_bytes());
    let mut s = String::with_capacity(16);
    for byte in &hash[..8] {
        s.push_str(&format!("{:02x}", byte));
    }
    s
}

fn install_id_from_env() -> String {
    let host = env::var("COMPUTERNAME")
        .or_else(|_| env::var("HOSTNAME"))
        .unwrap_or_else(|_| "unknown".to_string());
    let user = env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());
    anonymous_install_id(&host, &user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_id() {
        assert_eq!(anonymous_install_id("grow-01", "alice"), "2dc8cd1c246cd959");
        assert_eq!(anonymous_install_id("a", "b").len(), 16);
    }

    #[test]
    fn test_tracking() {
        let mut telemetry = Telemetry::new(TelemetryConfig::default());
        telemetry.track_validation("strain", true);
        telemetry.track_model_usage("GeneticsProfile", Some("from_simple"));
        telemetry.track_model_usage("Strain", None);

        let events = telemetry.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].event, "validate");
        assert_eq!(events[0].properties["valid"], Value::Bool(true));
        assert_eq!(events[1].properties["method"], Value::from("from_simple"));
        assert!(!events[2].properties.contains_key("method"));
        assert!(events.iter().all(|e| e.session_id == telemetry.session_id()));

        telemetry.clear();
        assert!(telemetry.events().is_empty());
    }

    #[test]
    fn test_disabled_records_nothing() {
        let mut telemetry = Telemetry::new(TelemetryConfig::disabled());
        telemetry.track_event("import", Map::new());
        assert!(telemetry.events().is_empty());

        telemetry.enable();
        telemetry.track_event("import", Map::new());
        assert_eq!(telemetry.events().len(), 1);

        telemetry.disable();
        assert!(!telemetry.is_enabled());
    }

    #[test]
    fn test_session_ids_differ() {
        let a = Telemetry::new(TelemetryConfig::default());
        let b = Telemetry::new(TelemetryConfig::default());
        assert_ne!(a.session_id(), b.session_id());
        assert_eq!(a.install_id(), b.install_id());
    }
}
