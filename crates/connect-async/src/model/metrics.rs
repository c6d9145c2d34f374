//! Real-time and historical queue metrics

use super::common::impl_paginated;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Largest page the metric operations return
pub const METRICS_MAX_RESULTS_LIMIT: u32 = 100;

/// Most queues a metrics filter may name
pub const MAX_FILTER_QUEUES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    #[default]
    Voice,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Grouping {
    Queue,
    Channel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Unit {
    Seconds,
    #[default]
    Count,
    Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Statistic {
    #[default]
    Sum,
    Max,
    Avg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Comparison {
    #[default]
    Lt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CurrentMetricName {
    AgentsOnline,
    AgentsAvailable,
    AgentsOnCall,
    AgentsNonProductive,
    AgentsAfterContactWork,
    AgentsError,
    AgentsStaffed,
    ContactsInQueue,
    OldestContactAge,
    ContactsScheduled,
    AgentsOnContact,
    SlotsActive,
    SlotsAvailable,
}

impl CurrentMetricName {
    /// The only unit the service accepts for this metric
    pub fn unit(self) -> Unit {
        match self {
            CurrentMetricName::OldestContactAge => Unit::Seconds,
            _ => Unit::Count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoricalMetricName {
    ContactsQueued,
    ContactsHandled,
    ContactsAbandoned,
    ContactsConsulted,
    ContactsAgentHungUpFirst,
    ContactsHandledIncoming,
    ContactsHandledOutbound,
    ContactsHoldAbandons,
    ContactsTransferredIn,
    ContactsTransferredOut,
    ContactsTransferredInFromQueue,
    ContactsTransferredOutFromQueue,
    ContactsMissed,
    CallbackContactsHandled,
    ApiContactsHandled,
    Occupancy,
    HandleTime,
    AfterContactWorkTime,
    QueuedTime,
    AbandonTime,
    QueueAnswerTime,
    HoldTime,
    InteractionTime,
    InteractionAndHoldTime,
    ServiceLevel,
}

impl HistoricalMetricName {
    pub fn unit(self) -> Unit {
        use HistoricalMetricName::*;
        match self {
            Occupancy | ServiceLevel => Unit::Percent,
            HandleTime | AfterContactWorkTime | QueuedTime | AbandonTime | QueueAnswerTime
            | HoldTime | InteractionTime | InteractionAndHoldTime => Unit::Seconds,
            _ => Unit::Count,
        }
    }
}

/// Queues and channels to report on
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Filters {
    /// Between 1 and 100 queue ids or ARNs
    pub queues: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<Channel>,
}

impl Filters {
    pub fn queues<I, S>(queues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queues: queues.into_iter().map(Into::into).collect(),
            channels: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channels.push(channel);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CurrentMetric {
    pub name: CurrentMetricName,
    pub unit: Unit,
}

impl CurrentMetric {
    pub fn new(name: CurrentMetricName) -> Self {
        Self {
            name,
            unit: name.unit(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Threshold {
    pub comparison: Comparison,
    pub threshold_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HistoricalMetric {
    pub name: HistoricalMetricName,
    /// Only meaningful for `SERVICE_LEVEL`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Threshold>,
    pub statistic: Statistic,
    pub unit: Unit,
}

impl HistoricalMetric {
    pub fn new(name: HistoricalMetricName, statistic: Statistic) -> Self {
        Self {
            name,
            threshold: None,
            statistic,
            unit: name.unit(),
        }
    }

    /// `SERVICE_LEVEL` measured against an answer time in seconds
    pub fn service_level(threshold_seconds: f64) -> Self {
        Self {
            threshold: Some(Threshold {
                comparison: Comparison::Lt,
                threshold_value: threshold_seconds,
            }),
            ..Self::new(HistoricalMetricName::ServiceLevel, Statistic::Avg)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct QueueReference {
    pub id: String,
    pub arn: String,
}

/// Which queue and channel a row of results describes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Dimensions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<QueueReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CurrentMetricData {
    pub metric: CurrentMetric,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CurrentMetricResult {
    pub dimensions: Dimensions,
    pub collections: Vec<CurrentMetricData>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GetCurrentMetricDataRequest {
    pub instance_id: String,
    pub filters: Filters,
    /// At most one of each; empty means one aggregated row
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groupings: Vec<Grouping>,
    pub current_metrics: Vec<CurrentMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl GetCurrentMetricDataRequest {
    pub fn new(instance_id: impl Into<String>, filters: Filters) -> Self {
        Self {
            instance_id: instance_id.into(),
            filters,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_grouping(mut self, grouping: Grouping) -> Self {
        self.groupings.push(grouping);
        self
    }

    #[must_use]
    pub fn with_metric(mut self, name: CurrentMetricName) -> Self {
        self.current_metrics.push(CurrentMetric::new(name));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetCurrentMetricDataResult {
    pub metric_results: Vec<CurrentMetricResult>,
    pub data_snapshot_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HistoricalMetricData {
    pub metric: HistoricalMetric,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HistoricalMetricResult {
    pub dimensions: Dimensions,
    pub collections: Vec<HistoricalMetricData>,
}

/// Historical metrics over a window
///
/// Both ends must fall on a 5 minute boundary, the window may span at most
/// 24 hours, and it may start no earlier than 24 hours ago.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GetMetricDataRequest {
    pub instance_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub filters: Filters,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groupings: Vec<Grouping>,
    pub historical_metrics: Vec<HistoricalMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl GetMetricDataRequest {
    pub fn new(
        instance_id: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        filters: Filters,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            start_time,
            end_time,
            filters,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_grouping(mut self, grouping: Grouping) -> Self {
        self.groupings.push(grouping);
        self
    }

    #[must_use]
    pub fn with_metric(mut self, metric: HistoricalMetric) -> Self {
        self.historical_metrics.push(metric);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GetMetricDataResult {
    pub metric_results: Vec<HistoricalMetricResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl_paginated!(GetCurrentMetricDataRequest, GetMetricDataRequest);
