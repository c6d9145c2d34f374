//! Outbound voice contacts and contact attributes

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key/value data attached to a contact and visible to its flow
pub type ContactAttributes = BTreeMap<String, String>;

/// Place an outbound call to a customer
///
/// # Example
///
/// ```rust,ignore
/// let request = StartOutboundVoiceContactRequest::new(instance_id, "+15555550123", flow_id)
///     .with_client_token("order-1234")
///     .with_attribute("order", "1234");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StartOutboundVoiceContactRequest {
    pub instance_id: String,
    /// E.164 formatted
    pub destination_phone_number: String,
    pub contact_flow_id: String,
    /// Repeating a token returns the contact started with it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_id: Option<String>,
    pub attributes: ContactAttributes,
}

impl StartOutboundVoiceContactRequest {
    pub fn new(
        instance_id: impl Into<String>,
        destination_phone_number: impl Into<String>,
        contact_flow_id: impl Into<String>,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            destination_phone_number: destination_phone_number.into(),
            contact_flow_id: contact_flow_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_client_token(mut self, token: impl Into<String>) -> Self {
        self.client_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_source_phone_number(mut self, number: impl Into<String>) -> Self {
        self.source_phone_number = Some(number.into());
        self
    }

    #[must_use]
    pub fn with_queue(mut self, queue_id: impl Into<String>) -> Self {
        self.queue_id = Some(queue_id.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StartOutboundVoiceContactResult {
    pub contact_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StopContactRequest {
    pub instance_id: String,
    pub contact_id: String,
}

impl StopContactRequest {
    pub fn new(instance_id: impl Into<String>, contact_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            contact_id: contact_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GetContactAttributesRequest {
    pub instance_id: String,
    pub initial_contact_id: String,
}

impl GetContactAttributesRequest {
    pub fn new(instance_id: impl Into<String>, initial_contact_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            initial_contact_id: initial_contact_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GetContactAttributesResult {
    pub attributes: ContactAttributes,
}

/// Merge attributes into a contact; existing keys are overwritten
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UpdateContactAttributesRequest {
    pub instance_id: String,
    pub initial_contact_id: String,
    pub attributes: ContactAttributes,
}

impl UpdateContactAttributesRequest {
    pub fn new(instance_id: impl Into<String>, initial_contact_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            initial_contact_id: initial_contact_id.into(),
            attributes: ContactAttributes::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}
