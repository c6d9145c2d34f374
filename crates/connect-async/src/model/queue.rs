//! Queues

use super::common::{Tags, impl_paginated};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueType {
    #[default]
    Standard,
    /// One per user, created and removed with the user
    Agent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueStatus {
    #[default]
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Queue {
    pub queue_id: String,
    pub queue_arn: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub queue_type: QueueType,
    pub hours_of_operation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_contacts: Option<u32>,
    pub status: QueueStatus,
    pub tags: Tags,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct QueueSummary {
    pub id: String,
    pub arn: String,
    pub name: String,
    pub queue_type: QueueType,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CreateQueueRequest {
    pub instance_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub hours_of_operation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_contacts: Option<u32>,
    pub tags: Tags,
}

impl CreateQueueRequest {
    pub fn new(
        instance_id: impl Into<String>,
        name: impl Into<String>,
        hours_of_operation_id: impl Into<String>,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            name: name.into(),
            hours_of_operation_id: hours_of_operation_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_max_contacts(mut self, max_contacts: u32) -> Self {
        self.max_contacts = Some(max_contacts);
        self
    }

    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CreateQueueResult {
    pub queue_id: String,
    pub queue_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeQueueRequest {
    pub instance_id: String,
    pub queue_id: String,
}

impl DescribeQueueRequest {
    pub fn new(instance_id: impl Into<String>, queue_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            queue_id: queue_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeQueueResult {
    pub queue: Queue,
}

/// Delete a standard queue; agent queues go away with their user
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DeleteQueueRequest {
    pub instance_id: String,
    pub queue_id: String,
}

impl DeleteQueueRequest {
    pub fn new(instance_id: impl Into<String>, queue_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            queue_id: queue_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListQueuesRequest {
    pub instance_id: String,
    /// Empty means every type
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub queue_types: Vec<QueueType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl ListQueuesRequest {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_queue_type(mut self, queue_type: QueueType) -> Self {
        self.queue_types.push(queue_type);
        self
    }

    #[must_use]
    pub fn with_next_token(mut self, token: impl Into<String>) -> Self {
        self.next_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

impl_paginated!(ListQueuesRequest);

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListQueuesResult {
    pub queue_summary_list: Vec<QueueSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}
