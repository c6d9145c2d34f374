//! Read-only catalog listings: routing profiles, security profiles, contact
//! flows, hours of operation and phone numbers

use super::common::{ResourceSummary, impl_paginated, list_request};
use serde::{Deserialize, Serialize};

list_request!(ListRoutingProfilesRequest);

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListRoutingProfilesResult {
    pub routing_profile_summary_list: Vec<ResourceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

list_request!(ListSecurityProfilesRequest);

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListSecurityProfilesResult {
    pub security_profile_summary_list: Vec<ResourceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

list_request!(ListHoursOfOperationsRequest);

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListHoursOfOperationsResult {
    pub hours_of_operation_summary_list: Vec<ResourceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactFlowType {
    #[default]
    ContactFlow,
    CustomerQueue,
    CustomerHold,
    CustomerWhisper,
    AgentHold,
    AgentWhisper,
    OutboundWhisper,
    AgentTransfer,
    QueueTransfer,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ContactFlowSummary {
    pub id: String,
    pub arn: String,
    pub name: String,
    pub contact_flow_type: ContactFlowType,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListContactFlowsRequest {
    pub instance_id: String,
    /// Empty means every type
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contact_flow_types: Vec<ContactFlowType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl ListContactFlowsRequest {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_type(mut self, contact_flow_type: ContactFlowType) -> Self {
        self.contact_flow_types.push(contact_flow_type);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListContactFlowsResult {
    pub contact_flow_summary_list: Vec<ContactFlowSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhoneNumberType {
    TollFree,
    #[default]
    Did,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PhoneNumberSummary {
    pub id: String,
    pub arn: String,
    /// E.164 formatted
    pub phone_number: String,
    pub phone_number_type: PhoneNumberType,
    /// ISO 3166-1 alpha-2, e.g. `US`
    pub phone_number_country_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListPhoneNumbersRequest {
    pub instance_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phone_number_types: Vec<PhoneNumberType>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phone_number_country_codes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl ListPhoneNumbersRequest {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_type(mut self, phone_number_type: PhoneNumberType) -> Self {
        self.phone_number_types.push(phone_number_type);
        self
    }

    #[must_use]
    pub fn with_country_code(mut self, country_code: impl Into<String>) -> Self {
        self.phone_number_country_codes.push(country_code.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListPhoneNumbersResult {
    pub phone_number_summary_list: Vec<PhoneNumberSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl_paginated!(ListContactFlowsRequest, ListPhoneNumbersRequest);
