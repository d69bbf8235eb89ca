use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// A unit of follow-up work emitted after a primary state change.
///
/// Events are plain serializable values so they can be executed inline or
/// handed to a queue without changing their contract.
pub trait Event: Send + Sync + Sized + Serialize + DeserializeOwned {
    /// Event topic (e.g. "notify", "evaluate_badges").
    fn topic(&self) -> &str;

    /// Wrap the event in a topic-tagged envelope.
    fn to_envelope(&self) -> Result<EventEnvelope, serde_json::Error> {
        Ok(EventEnvelope {
            topic: self.topic().to_string(),
            payload: serde_json::to_value(self)?,
        })
    }

    /// Rebuild an event from an envelope.
    fn from_envelope(envelope: &EventEnvelope) -> Result<Self, serde_json::Error> {
        serde_json::from_value(envelope.payload.clone())
    }
}

/// Topic-tagged, transport-neutral form of an [`Event`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub topic: String,
    pub payload: serde_json::Value,
}
