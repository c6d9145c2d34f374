//! Fixed resources every in-memory instance starts with

use super::store::{Arns, Instance};
use crate::model::{
    ContactFlowSummary, ContactFlowType, HierarchyGroup, HierarchyLevel, HierarchyPath,
    HierarchyStructure, PhoneNumberSummary, PhoneNumberType, Queue, QueueStatus, QueueType,
    ResourceSummary,
};

pub const BASIC_ROUTING_PROFILE_ID: &str = "00000000-0000-4000-8000-00000000a001";
pub const ADMIN_SECURITY_PROFILE_ID: &str = "00000000-0000-4000-8000-00000000b001";
pub const AGENT_SECURITY_PROFILE_ID: &str = "00000000-0000-4000-8000-00000000b002";
/// Inbound/outbound flow of type `CONTACT_FLOW`
pub const DEFAULT_CONTACT_FLOW_ID: &str = "00000000-0000-4000-8000-00000000c001";
pub const DEFAULT_QUEUE_FLOW_ID: &str = "00000000-0000-4000-8000-00000000c002";
pub const DEFAULT_AGENT_WHISPER_FLOW_ID: &str = "00000000-0000-4000-8000-00000000c003";
pub const BASIC_HOURS_ID: &str = "00000000-0000-4000-8000-00000000d001";
pub const CLAIMED_PHONE_NUMBER_ID: &str = "00000000-0000-4000-8000-00000000e001";
pub const CLAIMED_PHONE_NUMBER: &str = "+15555550100";
/// Standard queue used by outbound contacts that name no queue
pub const BASIC_QUEUE_ID: &str = "00000000-0000-4000-8000-00000000f001";
pub const BASIC_QUEUE_NAME: &str = "BasicQueue";
pub const HIERARCHY_LEVEL_ONE_ID: &str = "00000000-0000-4000-8000-000000001001";
pub const HIERARCHY_LEVEL_TWO_ID: &str = "00000000-0000-4000-8000-000000001002";
/// Level one group "Americas"
pub const REGION_GROUP_ID: &str = "00000000-0000-4000-8000-000000002001";
/// Level two group "Seattle", under "Americas"
pub const SITE_GROUP_ID: &str = "00000000-0000-4000-8000-000000002002";

pub(super) fn seed(instance: &mut Instance, arns: &Arns) {
    let id = instance.id.clone();
    let summary = |kind: &str, resource_id: &str, name: &str| {
        ResourceSummary::new(resource_id, arns.resource(&id, kind, resource_id), name)
    };

    instance.routing_profiles = vec![summary(
        "routing-profile",
        BASIC_ROUTING_PROFILE_ID,
        "Basic Routing Profile",
    )];
    instance.security_profiles = vec![
        summary("security-profile", ADMIN_SECURITY_PROFILE_ID, "Admin"),
        summary("security-profile", AGENT_SECURITY_PROFILE_ID, "Agent"),
    ];
    instance.hours_of_operations = vec![summary("operating-hours", BASIC_HOURS_ID, "Basic Hours")];

    instance.contact_flows = [
        (DEFAULT_CONTACT_FLOW_ID, "Default outbound", ContactFlowType::ContactFlow),
        (DEFAULT_QUEUE_FLOW_ID, "Default customer queue", ContactFlowType::CustomerQueue),
        (DEFAULT_AGENT_WHISPER_FLOW_ID, "Default agent whisper", ContactFlowType::AgentWhisper),
    ]
    .into_iter()
    .map(|(flow_id, name, contact_flow_type)| ContactFlowSummary {
        id: flow_id.to_string(),
        arn: arns.resource(&id, "contact-flow", flow_id),
        name: name.to_string(),
        contact_flow_type,
    })
    .collect();

    instance.phone_numbers = vec![PhoneNumberSummary {
        id: CLAIMED_PHONE_NUMBER_ID.to_string(),
        arn: arns.phone_number(CLAIMED_PHONE_NUMBER_ID),
        phone_number: CLAIMED_PHONE_NUMBER.to_string(),
        phone_number_type: PhoneNumberType::Did,
        phone_number_country_code: "US".to_string(),
    }];

    instance.queues.insert(
        BASIC_QUEUE_ID.to_string(),
        Queue {
            queue_id: BASIC_QUEUE_ID.to_string(),
            queue_arn: arns.resource(&id, "queue", BASIC_QUEUE_ID),
            name: BASIC_QUEUE_NAME.to_string(),
            description: Some("Default queue".to_string()),
            queue_type: QueueType::Standard,
            hours_of_operation_id: BASIC_HOURS_ID.to_string(),
            max_contacts: None,
            status: QueueStatus::Enabled,
            tags: Default::default(),
        },
    );

    let level = |level_id: &str, name: &str| HierarchyLevel {
        id: level_id.to_string(),
        arn: arns.resource(&id, "agent-group-level", level_id),
        name: name.to_string(),
    };
    instance.hierarchy_structure = HierarchyStructure {
        level_one: Some(level(HIERARCHY_LEVEL_ONE_ID, "Region")),
        level_two: Some(level(HIERARCHY_LEVEL_TWO_ID, "Site")),
        ..HierarchyStructure::default()
    };

    let region = summary("agent-group", REGION_GROUP_ID, "Americas");
    let site = summary("agent-group", SITE_GROUP_ID, "Seattle");
    instance.hierarchy_groups = vec![
        HierarchyGroup {
            id: region.id.clone(),
            arn: region.arn.clone(),
            name: region.name.clone(),
            level_id: HIERARCHY_LEVEL_ONE_ID.to_string(),
            hierarchy_path: HierarchyPath::from_groups(vec![region.clone()]),
        },
        HierarchyGroup {
            id: site.id.clone(),
            arn: site.arn.clone(),
            name: site.name.clone(),
            level_id: HIERARCHY_LEVEL_TWO_ID.to_string(),
            hierarchy_path: HierarchyPath::from_groups(vec![region, site]),
        },
    ];
}
