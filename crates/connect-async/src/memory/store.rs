//! Process-local state and the operation logic behind [`super::InMemoryConnect`]

use super::seed::{self, BASIC_QUEUE_ID, BASIC_HOURS_ID};
use super::validate::{
    check_metric_window, check_password, check_tags, invalid_parameter, invalid_request,
    is_e164, paginate, require, resource_not_found,
};
use crate::error::{ConnectError, Result, ServiceErrorKind};
use crate::model::*;
use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};

const MAX_USERNAME_LEN: usize = 64;
const MAX_QUEUE_NAME_LEN: usize = 127;
const ACCESS_TOKEN_TTL_HOURS: i64 = 12;
const REFRESH_TOKEN_TTL_DAYS: i64 = 30;

/// ARN construction for one region and account
#[derive(Debug, Clone)]
pub(super) struct Arns {
    region: String,
    account_id: String,
}

impl Arns {
    pub(super) fn new(region: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            account_id: account_id.into(),
        }
    }

    pub(super) fn instance(&self, instance_id: &str) -> String {
        format!(
            "arn:aws:connect:{}:{}:instance/{}",
            self.region, self.account_id, instance_id
        )
    }

    pub(super) fn resource(&self, instance_id: &str, kind: &str, id: &str) -> String {
        format!("{}/{}/{}", self.instance(instance_id), kind, id)
    }

    pub(super) fn phone_number(&self, id: &str) -> String {
        format!(
            "arn:aws:connect:{}:{}:phone-number/{}",
            self.region, self.account_id, id
        )
    }
}

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    agent_queue_id: String,
}

#[derive(Debug, Clone)]
struct Contact {
    queue_id: String,
    attributes: ContactAttributes,
    initiated_at: DateTime<Utc>,
    stopped_at: Option<DateTime<Utc>>,
}

impl Contact {
    fn is_active(&self) -> bool {
        self.stopped_at.is_none()
    }
}

#[derive(Debug, Default)]
pub(super) struct Instance {
    pub(super) id: String,
    users: BTreeMap<String, StoredUser>,
    pub(super) queues: BTreeMap<String, Queue>,
    pub(super) routing_profiles: Vec<ResourceSummary>,
    pub(super) security_profiles: Vec<ResourceSummary>,
    pub(super) contact_flows: Vec<ContactFlowSummary>,
    pub(super) hours_of_operations: Vec<ResourceSummary>,
    pub(super) phone_numbers: Vec<PhoneNumberSummary>,
    pub(super) hierarchy_structure: HierarchyStructure,
    pub(super) hierarchy_groups: Vec<HierarchyGroup>,
    contacts: HashMap<String, Contact>,
    client_tokens: HashMap<String, String>,
}

impl Instance {
    fn user(&self, user_id: &str) -> Result<&StoredUser> {
        self.users.get(user_id).ok_or_else(|| user_not_found(user_id))
    }

    fn user_mut(&mut self, user_id: &str) -> Result<&mut StoredUser> {
        self.users.get_mut(user_id).ok_or_else(|| user_not_found(user_id))
    }

    fn check_routing_profile(&self, id: &str) -> Result<()> {
        if self.routing_profiles.iter().any(|p| p.id == id) {
            Ok(())
        } else {
            Err(resource_not_found("Routing profile", id))
        }
    }

    fn check_security_profiles(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Err(invalid_parameter("SecurityProfileIds must not be empty"));
        }
        for id in ids {
            if !self.security_profiles.iter().any(|p| &p.id == id) {
                return Err(resource_not_found("Security profile", id));
            }
        }
        Ok(())
    }

    fn check_hierarchy_group(&self, id: &str) -> Result<()> {
        if self.hierarchy_groups.iter().any(|g| g.id == id) {
            Ok(())
        } else {
            Err(resource_not_found("Hierarchy group", id))
        }
    }

    fn check_hours(&self, id: &str) -> Result<()> {
        if self.hours_of_operations.iter().any(|h| h.id == id) {
            Ok(())
        } else {
            Err(resource_not_found("Hours of operation", id))
        }
    }

    /// Look a queue up by id or ARN
    fn find_queue(&self, id_or_arn: &str) -> Option<&Queue> {
        self.queues
            .get(id_or_arn)
            .or_else(|| self.queues.values().find(|q| q.queue_arn == id_or_arn))
    }

    fn contact_mut(&mut self, contact_id: &str) -> Result<&mut Contact> {
        self.contacts
            .get_mut(contact_id)
            .ok_or_else(|| contact_not_found(contact_id))
    }
}

fn user_not_found(user_id: &str) -> ConnectError {
    ConnectError::service(
        ServiceErrorKind::UserNotFound,
        format!("User not found: {user_id}"),
    )
}

fn contact_not_found(contact_id: &str) -> ConnectError {
    ConnectError::service(
        ServiceErrorKind::ContactNotFound,
        format!("Contact not found: {contact_id}"),
    )
}

fn check_phone_config(config: &UserPhoneConfig) -> Result<()> {
    match (config.phone_type, config.desk_phone_number.as_deref()) {
        (PhoneType::DeskPhone, Some(number)) if is_e164(number) => Ok(()),
        (PhoneType::DeskPhone, Some(number)) => Err(invalid_parameter(format!(
            "DeskPhoneNumber must be in E.164 format: '{number}'"
        ))),
        (PhoneType::DeskPhone, None) => Err(invalid_parameter(
            "DeskPhoneNumber is required for DESK_PHONE",
        )),
        (PhoneType::SoftPhone, _) => Ok(()),
    }
}

fn check_identity(identity: &UserIdentityInfo) -> Result<()> {
    match identity.email.as_deref() {
        Some(email) if !email.contains('@') => Err(invalid_parameter(format!(
            "Email is not a valid address: '{email}'"
        ))),
        _ => Ok(()),
    }
}

/// Everything the in-memory provider knows
#[derive(Debug)]
pub(super) struct State {
    arns: Arns,
    instances: HashMap<String, Instance>,
    /// Tags of every taggable resource, keyed by ARN
    tags: HashMap<String, Tags>,
    next_id: u64,
}

impl State {
    pub(super) fn new(arns: Arns) -> Self {
        Self {
            arns,
            instances: HashMap::new(),
            tags: HashMap::new(),
            next_id: 1,
        }
    }

    pub(super) fn arns(&self) -> &Arns {
        &self.arns
    }

    pub(super) fn add_instance(&mut self, instance_id: &str) {
        if self.instances.contains_key(instance_id) {
            return;
        }
        let mut instance = Instance {
            id: instance_id.to_string(),
            ..Instance::default()
        };
        seed::seed(&mut instance, &self.arns);

        let mut arns = vec![self.arns.instance(instance_id)];
        arns.extend(instance.routing_profiles.iter().map(|r| r.arn.clone()));
        arns.extend(instance.security_profiles.iter().map(|r| r.arn.clone()));
        arns.extend(instance.hours_of_operations.iter().map(|r| r.arn.clone()));
        arns.extend(instance.contact_flows.iter().map(|r| r.arn.clone()));
        arns.extend(instance.phone_numbers.iter().map(|r| r.arn.clone()));
        arns.extend(instance.queues.values().map(|q| q.queue_arn.clone()));
        for arn in arns {
            self.tags.entry(arn).or_default();
        }

        self.instances.insert(instance_id.to_string(), instance);
    }

    pub(super) fn next_request_id(&mut self) -> String {
        self.fresh_id()
    }

    fn fresh_id(&mut self) -> String {
        let n = self.next_id;
        self.next_id += 1;
        format!("00000000-0000-4000-9000-{n:012x}")
    }

    fn instance(&self, instance_id: &str) -> Result<&Instance> {
        require("InstanceId", instance_id)?;
        self.instances
            .get(instance_id)
            .ok_or_else(|| resource_not_found("Instance", instance_id))
    }

    fn instance_mut(&mut self, instance_id: &str) -> Result<&mut Instance> {
        require("InstanceId", instance_id)?;
        self.instances
            .get_mut(instance_id)
            .ok_or_else(|| resource_not_found("Instance", instance_id))
    }

    fn tags_of(&self, arn: &str) -> Tags {
        self.tags.get(arn).cloned().unwrap_or_default()
    }

    // Users

    pub(super) fn create_user(&mut self, request: &CreateUserRequest) -> Result<CreateUserResult> {
        require("Username", &request.username)?;
        if request.username.chars().count() > MAX_USERNAME_LEN
            || request.username.chars().any(char::is_whitespace)
        {
            return Err(invalid_parameter(format!(
                "Username must be at most {MAX_USERNAME_LEN} characters without spaces"
            )));
        }
        require("RoutingProfileId", &request.routing_profile_id)?;
        if let Some(password) = &request.password {
            check_password(password)?;
        }
        check_phone_config(&request.phone_config)?;
        check_identity(&request.identity_info)?;
        check_tags(&request.tags, None)?;

        let instance = self.instance(&request.instance_id)?;
        if instance
            .users
            .values()
            .any(|u| u.user.username.eq_ignore_ascii_case(&request.username))
        {
            return Err(ConnectError::service(
                ServiceErrorKind::DuplicateResource,
                format!("User '{}' already exists", request.username),
            ));
        }
        instance.check_routing_profile(&request.routing_profile_id)?;
        instance.check_security_profiles(&request.security_profile_ids)?;
        if let Some(group) = &request.hierarchy_group_id {
            instance.check_hierarchy_group(group)?;
        }

        let user_id = self.fresh_id();
        let queue_id = self.fresh_id();
        let user_arn = self.arns.resource(&request.instance_id, "agent", &user_id);
        let queue_arn = self.arns.resource(&request.instance_id, "queue", &queue_id);

        let user = User {
            id: user_id.clone(),
            arn: user_arn.clone(),
            username: request.username.clone(),
            identity_info: request.identity_info.clone(),
            phone_config: request.phone_config.clone(),
            directory_user_id: request.directory_user_id.clone(),
            security_profile_ids: request.security_profile_ids.clone(),
            routing_profile_id: request.routing_profile_id.clone(),
            hierarchy_group_id: request.hierarchy_group_id.clone(),
            tags: Tags::new(),
        };
        let agent_queue = Queue {
            queue_id: queue_id.clone(),
            queue_arn: queue_arn.clone(),
            name: format!("agent-{}", request.username),
            description: None,
            queue_type: QueueType::Agent,
            hours_of_operation_id: BASIC_HOURS_ID.to_string(),
            max_contacts: None,
            status: QueueStatus::Enabled,
            tags: Tags::new(),
        };

        let instance = self.instance_mut(&request.instance_id)?;
        instance.queues.insert(queue_id.clone(), agent_queue);
        instance.users.insert(
            user_id.clone(),
            StoredUser {
                user,
                agent_queue_id: queue_id,
            },
        );
        self.tags.insert(user_arn.clone(), request.tags.clone());
        self.tags.insert(queue_arn, Tags::new());

        tracing::debug!(
            instance_id = %request.instance_id,
            user_id = %user_id,
            username = %request.username,
            "Created user"
        );
        Ok(CreateUserResult { user_id, user_arn })
    }

    pub(super) fn delete_user(&mut self, request: &DeleteUserRequest) -> Result<()> {
        require("UserId", &request.user_id)?;
        let instance = self.instance_mut(&request.instance_id)?;
        let stored = instance
            .users
            .remove(&request.user_id)
            .ok_or_else(|| user_not_found(&request.user_id))?;
        let queue_arn = instance
            .queues
            .remove(&stored.agent_queue_id)
            .map(|q| q.queue_arn);

        self.tags.remove(&stored.user.arn);
        if let Some(arn) = queue_arn {
            self.tags.remove(&arn);
        }

        tracing::debug!(
            instance_id = %request.instance_id,
            user_id = %request.user_id,
            "Deleted user"
        );
        Ok(())
    }

    pub(super) fn describe_user(&self, request: &DescribeUserRequest) -> Result<DescribeUserResult> {
        require("UserId", &request.user_id)?;
        let instance = self.instance(&request.instance_id)?;
        let mut user = instance.user(&request.user_id)?.user.clone();
        user.tags = self.tags_of(&user.arn);
        Ok(DescribeUserResult { user })
    }

    pub(super) fn list_users(&self, request: &ListUsersRequest) -> Result<ListUsersResult> {
        let instance = self.instance(&request.instance_id)?;
        let summaries = instance
            .users
            .values()
            .map(|u| UserSummary {
                id: u.user.id.clone(),
                arn: u.user.arn.clone(),
                username: u.user.username.clone(),
            })
            .collect();
        let (user_summary_list, next_token) = paginate(summaries, request, MAX_RESULTS_LIMIT)?;
        Ok(ListUsersResult {
            user_summary_list,
            next_token,
        })
    }

    pub(super) fn update_user_hierarchy(
        &mut self,
        request: &UpdateUserHierarchyRequest,
    ) -> Result<()> {
        require("UserId", &request.user_id)?;
        let instance = self.instance_mut(&request.instance_id)?;
        instance.user(&request.user_id)?;
        if let Some(group) = &request.hierarchy_group_id {
            instance.check_hierarchy_group(group)?;
        }
        instance.user_mut(&request.user_id)?.user.hierarchy_group_id =
            request.hierarchy_group_id.clone();
        tracing::debug!(user_id = %request.user_id, "Updated user hierarchy");
        Ok(())
    }

    pub(super) fn update_user_identity_info(
        &mut self,
        request: &UpdateUserIdentityInfoRequest,
    ) -> Result<()> {
        require("UserId", &request.user_id)?;
        check_identity(&request.identity_info)?;
        let instance = self.instance_mut(&request.instance_id)?;
        instance.user_mut(&request.user_id)?.user.identity_info = request.identity_info.clone();
        tracing::debug!(user_id = %request.user_id, "Updated user identity info");
        Ok(())
    }

    pub(super) fn update_user_phone_config(
        &mut self,
        request: &UpdateUserPhoneConfigRequest,
    ) -> Result<()> {
        require("UserId", &request.user_id)?;
        check_phone_config(&request.phone_config)?;
        let instance = self.instance_mut(&request.instance_id)?;
        instance.user_mut(&request.user_id)?.user.phone_config = request.phone_config.clone();
        tracing::debug!(user_id = %request.user_id, "Updated user phone config");
        Ok(())
    }

    pub(super) fn update_user_routing_profile(
        &mut self,
        request: &UpdateUserRoutingProfileRequest,
    ) -> Result<()> {
        require("UserId", &request.user_id)?;
        require("RoutingProfileId", &request.routing_profile_id)?;
        let instance = self.instance_mut(&request.instance_id)?;
        instance.user(&request.user_id)?;
        instance.check_routing_profile(&request.routing_profile_id)?;
        instance.user_mut(&request.user_id)?.user.routing_profile_id =
            request.routing_profile_id.clone();
        tracing::debug!(user_id = %request.user_id, "Updated user routing profile");
        Ok(())
    }

    pub(super) fn update_user_security_profiles(
        &mut self,
        request: &UpdateUserSecurityProfilesRequest,
    ) -> Result<()> {
        require("UserId", &request.user_id)?;
        let instance = self.instance_mut(&request.instance_id)?;
        instance.user(&request.user_id)?;
        instance.check_security_profiles(&request.security_profile_ids)?;
        instance.user_mut(&request.user_id)?.user.security_profile_ids =
            request.security_profile_ids.clone();
        tracing::debug!(user_id = %request.user_id, "Updated user security profiles");
        Ok(())
    }

    // Hierarchy

    pub(super) fn describe_user_hierarchy_group(
        &self,
        request: &DescribeUserHierarchyGroupRequest,
    ) -> Result<DescribeUserHierarchyGroupResult> {
        require("HierarchyGroupId", &request.hierarchy_group_id)?;
        let instance = self.instance(&request.instance_id)?;
        let hierarchy_group = instance
            .hierarchy_groups
            .iter()
            .find(|g| g.id == request.hierarchy_group_id)
            .cloned()
            .ok_or_else(|| resource_not_found("Hierarchy group", &request.hierarchy_group_id))?;
        Ok(DescribeUserHierarchyGroupResult { hierarchy_group })
    }

    pub(super) fn describe_user_hierarchy_structure(
        &self,
        request: &DescribeUserHierarchyStructureRequest,
    ) -> Result<DescribeUserHierarchyStructureResult> {
        let instance = self.instance(&request.instance_id)?;
        Ok(DescribeUserHierarchyStructureResult {
            hierarchy_structure: instance.hierarchy_structure.clone(),
        })
    }

    pub(super) fn list_user_hierarchy_groups(
        &self,
        request: &ListUserHierarchyGroupsRequest,
    ) -> Result<ListUserHierarchyGroupsResult> {
        let instance = self.instance(&request.instance_id)?;
        let summaries = instance
            .hierarchy_groups
            .iter()
            .map(|g| ResourceSummary::new(&g.id, &g.arn, &g.name))
            .collect();
        let (user_hierarchy_group_summary_list, next_token) =
            paginate(summaries, request, MAX_RESULTS_LIMIT)?;
        Ok(ListUserHierarchyGroupsResult {
            user_hierarchy_group_summary_list,
            next_token,
        })
    }

    // Queues

    pub(super) fn create_queue(&mut self, request: &CreateQueueRequest) -> Result<CreateQueueResult> {
        require("Name", &request.name)?;
        if request.name.chars().count() > MAX_QUEUE_NAME_LEN {
            return Err(invalid_parameter(format!(
                "Name must be at most {MAX_QUEUE_NAME_LEN} characters"
            )));
        }
        require("HoursOfOperationId", &request.hours_of_operation_id)?;
        if request.max_contacts == Some(0) {
            return Err(invalid_parameter("MaxContacts must be at least 1"));
        }
        check_tags(&request.tags, None)?;

        let instance = self.instance(&request.instance_id)?;
        if instance.queues.values().any(|q| q.name == request.name) {
            return Err(ConnectError::service(
                ServiceErrorKind::DuplicateResource,
                format!("Queue '{}' already exists", request.name),
            ));
        }
        instance.check_hours(&request.hours_of_operation_id)?;

        let queue_id = self.fresh_id();
        let queue_arn = self.arns.resource(&request.instance_id, "queue", &queue_id);
        let queue = Queue {
            queue_id: queue_id.clone(),
            queue_arn: queue_arn.clone(),
            name: request.name.clone(),
            description: request.description.clone(),
            queue_type: QueueType::Standard,
            hours_of_operation_id: request.hours_of_operation_id.clone(),
            max_contacts: request.max_contacts,
            status: QueueStatus::Enabled,
            tags: Tags::new(),
        };

        self.instance_mut(&request.instance_id)?
            .queues
            .insert(queue_id.clone(), queue);
        self.tags.insert(queue_arn.clone(), request.tags.clone());

        tracing::debug!(
            instance_id = %request.instance_id,
            queue_id = %queue_id,
            name = %request.name,
            "Created queue"
        );
        Ok(CreateQueueResult {
            queue_id,
            queue_arn,
        })
    }

    pub(super) fn describe_queue(&self, request: &DescribeQueueRequest) -> Result<DescribeQueueResult> {
        require("QueueId", &request.queue_id)?;
        let instance = self.instance(&request.instance_id)?;
        let mut queue = instance
            .queues
            .get(&request.queue_id)
            .cloned()
            .ok_or_else(|| resource_not_found("Queue", &request.queue_id))?;
        queue.tags = self.tags_of(&queue.queue_arn);
        Ok(DescribeQueueResult { queue })
    }

    pub(super) fn delete_queue(&mut self, request: &DeleteQueueRequest) -> Result<()> {
        require("QueueId", &request.queue_id)?;
        let instance = self.instance_mut(&request.instance_id)?;
        let queue = instance
            .queues
            .get(&request.queue_id)
            .ok_or_else(|| resource_not_found("Queue", &request.queue_id))?;
        if queue.queue_type == QueueType::Agent {
            return Err(invalid_request(format!(
                "Queue {} is an agent queue and is removed with its user",
                request.queue_id
            )));
        }
        if instance
            .contacts
            .values()
            .any(|c| c.is_active() && c.queue_id == request.queue_id)
        {
            return Err(invalid_request(format!(
                "Queue {} has active contacts",
                request.queue_id
            )));
        }

        if let Some(queue) = instance.queues.remove(&request.queue_id) {
            self.tags.remove(&queue.queue_arn);
        }
        tracing::debug!(
            instance_id = %request.instance_id,
            queue_id = %request.queue_id,
            "Deleted queue"
        );
        Ok(())
    }

    pub(super) fn list_queues(&self, request: &ListQueuesRequest) -> Result<ListQueuesResult> {
        let instance = self.instance(&request.instance_id)?;
        let summaries = instance
            .queues
            .values()
            .filter(|q| request.queue_types.is_empty() || request.queue_types.contains(&q.queue_type))
            .map(|q| QueueSummary {
                id: q.queue_id.clone(),
                arn: q.queue_arn.clone(),
                name: q.name.clone(),
                queue_type: q.queue_type,
            })
            .collect();
        let (queue_summary_list, next_token) = paginate(summaries, request, MAX_RESULTS_LIMIT)?;
        Ok(ListQueuesResult {
            queue_summary_list,
            next_token,
        })
    }

    // Catalog

    pub(super) fn list_routing_profiles(
        &self,
        request: &ListRoutingProfilesRequest,
    ) -> Result<ListRoutingProfilesResult> {
        let instance = self.instance(&request.instance_id)?;
        let (routing_profile_summary_list, next_token) =
            paginate(instance.routing_profiles.clone(), request, MAX_RESULTS_LIMIT)?;
        Ok(ListRoutingProfilesResult {
            routing_profile_summary_list,
            next_token,
        })
    }

    pub(super) fn list_security_profiles(
        &self,
        request: &ListSecurityProfilesRequest,
    ) -> Result<ListSecurityProfilesResult> {
        let instance = self.instance(&request.instance_id)?;
        let (security_profile_summary_list, next_token) =
            paginate(instance.security_profiles.clone(), request, MAX_RESULTS_LIMIT)?;
        Ok(ListSecurityProfilesResult {
            security_profile_summary_list,
            next_token,
        })
    }

    pub(super) fn list_contact_flows(
        &self,
        request: &ListContactFlowsRequest,
    ) -> Result<ListContactFlowsResult> {
        let instance = self.instance(&request.instance_id)?;
        let flows = instance
            .contact_flows
            .iter()
            .filter(|f| {
                request.contact_flow_types.is_empty()
                    || request.contact_flow_types.contains(&f.contact_flow_type)
            })
            .cloned()
            .collect();
        let (contact_flow_summary_list, next_token) = paginate(flows, request, MAX_RESULTS_LIMIT)?;
        Ok(ListContactFlowsResult {
            contact_flow_summary_list,
            next_token,
        })
    }

    pub(super) fn list_hours_of_operations(
        &self,
        request: &ListHoursOfOperationsRequest,
    ) -> Result<ListHoursOfOperationsResult> {
        let instance = self.instance(&request.instance_id)?;
        let (hours_of_operation_summary_list, next_token) =
            paginate(instance.hours_of_operations.clone(), request, MAX_RESULTS_LIMIT)?;
        Ok(ListHoursOfOperationsResult {
            hours_of_operation_summary_list,
            next_token,
        })
    }

    pub(super) fn list_phone_numbers(
        &self,
        request: &ListPhoneNumbersRequest,
    ) -> Result<ListPhoneNumbersResult> {
        let instance = self.instance(&request.instance_id)?;
        let numbers = instance
            .phone_numbers
            .iter()
            .filter(|n| {
                request.phone_number_types.is_empty()
                    || request.phone_number_types.contains(&n.phone_number_type)
            })
            .filter(|n| {
                request.phone_number_country_codes.is_empty()
                    || request
                        .phone_number_country_codes
                        .iter()
                        .any(|c| c.eq_ignore_ascii_case(&n.phone_number_country_code))
            })
            .cloned()
            .collect();
        let (phone_number_summary_list, next_token) =
            paginate(numbers, request, MAX_RESULTS_LIMIT)?;
        Ok(ListPhoneNumbersResult {
            phone_number_summary_list,
            next_token,
        })
    }

    // Contacts

    pub(super) fn start_outbound_voice_contact(
        &mut self,
        request: &StartOutboundVoiceContactRequest,
        now: DateTime<Utc>,
    ) -> Result<StartOutboundVoiceContactResult> {
        require("ContactFlowId", &request.contact_flow_id)?;
        if !is_e164(&request.destination_phone_number) {
            return Err(ConnectError::service(
                ServiceErrorKind::DestinationNotAllowed,
                format!(
                    "Destination '{}' is not an E.164 number",
                    request.destination_phone_number
                ),
            ));
        }
        if request.attributes.keys().any(|k| k.is_empty()) {
            return Err(invalid_parameter("Attribute keys must not be empty"));
        }

        let instance = self.instance(&request.instance_id)?;
        if let Some(token) = &request.client_token
            && let Some(contact_id) = instance.client_tokens.get(token)
        {
            return Ok(StartOutboundVoiceContactResult {
                contact_id: contact_id.clone(),
            });
        }
        if !instance
            .contact_flows
            .iter()
            .any(|f| f.id == request.contact_flow_id)
        {
            return Err(resource_not_found("Contact flow", &request.contact_flow_id));
        }
        if let Some(source) = &request.source_phone_number
            && !instance.phone_numbers.iter().any(|n| &n.phone_number == source)
        {
            return Err(resource_not_found("Phone number", source));
        }
        let queue_ref = request.queue_id.as_deref().unwrap_or(BASIC_QUEUE_ID);
        let queue_id = instance
            .find_queue(queue_ref)
            .map(|q| q.queue_id.clone())
            .ok_or_else(|| resource_not_found("Queue", queue_ref))?;

        let contact_id = self.fresh_id();
        let instance = self.instance_mut(&request.instance_id)?;
        instance.contacts.insert(
            contact_id.clone(),
            Contact {
                queue_id,
                attributes: request.attributes.clone(),
                initiated_at: now,
                stopped_at: None,
            },
        );
        if let Some(token) = &request.client_token {
            instance
                .client_tokens
                .insert(token.clone(), contact_id.clone());
        }

        tracing::debug!(
            instance_id = %request.instance_id,
            contact_id = %contact_id,
            "Started outbound voice contact"
        );
        Ok(StartOutboundVoiceContactResult { contact_id })
    }

    pub(super) fn stop_contact(&mut self, request: &StopContactRequest, now: DateTime<Utc>) -> Result<()> {
        require("ContactId", &request.contact_id)?;
        let instance = self.instance_mut(&request.instance_id)?;
        let contact = instance.contact_mut(&request.contact_id)?;
        if !contact.is_active() {
            return Err(ConnectError::service(
                ServiceErrorKind::ContactNotFound,
                format!("Contact {} is not active", request.contact_id),
            ));
        }
        contact.stopped_at = Some(now);
        tracing::debug!(contact_id = %request.contact_id, "Stopped contact");
        Ok(())
    }

    pub(super) fn get_contact_attributes(
        &mut self,
        request: &GetContactAttributesRequest,
    ) -> Result<GetContactAttributesResult> {
        require("InitialContactId", &request.initial_contact_id)?;
        let instance = self.instance_mut(&request.instance_id)?;
        let contact = instance.contact_mut(&request.initial_contact_id)?;
        Ok(GetContactAttributesResult {
            attributes: contact.attributes.clone(),
        })
    }

    pub(super) fn update_contact_attributes(
        &mut self,
        request: &UpdateContactAttributesRequest,
    ) -> Result<()> {
        require("InitialContactId", &request.initial_contact_id)?;
        if request.attributes.keys().any(|k| k.is_empty()) {
            return Err(invalid_parameter("Attribute keys must not be empty"));
        }
        let instance = self.instance_mut(&request.instance_id)?;
        let contact = instance.contact_mut(&request.initial_contact_id)?;
        contact
            .attributes
            .extend(request.attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
        tracing::debug!(
            contact_id = %request.initial_contact_id,
            updated = request.attributes.len(),
            "Updated contact attributes"
        );
        Ok(())
    }

    // Metrics

    pub(super) fn get_current_metric_data(
        &self,
        request: &GetCurrentMetricDataRequest,
        now: DateTime<Utc>,
    ) -> Result<GetCurrentMetricDataResult> {
        let instance = self.instance(&request.instance_id)?;
        if request.current_metrics.is_empty() {
            return Err(invalid_parameter("CurrentMetrics must not be empty"));
        }
        for metric in &request.current_metrics {
            if metric.unit != metric.name.unit() {
                return Err(invalid_parameter(format!(
                    "Unit {:?} is not valid for {:?}",
                    metric.unit, metric.name
                )));
            }
        }
        let rows = metric_rows(instance, &request.filters, &request.groupings)?;
        let agents = instance.users.len() as f64;

        let results: Vec<CurrentMetricResult> = rows
            .into_iter()
            .map(|row| {
                let active: Vec<&Contact> = row.contacts(instance).filter(|c| c.is_active()).collect();
                let collections = request
                    .current_metrics
                    .iter()
                    .map(|metric| {
                        let value = match metric.name {
                            CurrentMetricName::AgentsOnline
                            | CurrentMetricName::AgentsStaffed
                            | CurrentMetricName::AgentsAvailable => agents,
                            CurrentMetricName::ContactsInQueue => active.len() as f64,
                            CurrentMetricName::OldestContactAge => active
                                .iter()
                                .map(|c| (now - c.initiated_at).num_seconds().max(0) as f64)
                                .fold(0.0, f64::max),
                            _ => 0.0,
                        };
                        CurrentMetricData {
                            metric: *metric,
                            value: Some(value),
                        }
                    })
                    .collect();
                CurrentMetricResult {
                    dimensions: row.dimensions,
                    collections,
                }
            })
            .collect();

        let (metric_results, next_token) = paginate(results, request, METRICS_MAX_RESULTS_LIMIT)?;
        Ok(GetCurrentMetricDataResult {
            metric_results,
            data_snapshot_time: now,
            next_token,
        })
    }

    pub(super) fn get_metric_data(
        &self,
        request: &GetMetricDataRequest,
        now: DateTime<Utc>,
    ) -> Result<GetMetricDataResult> {
        let instance = self.instance(&request.instance_id)?;
        check_metric_window(request.start_time, request.end_time, now)?;
        if request.historical_metrics.is_empty() {
            return Err(invalid_parameter("HistoricalMetrics must not be empty"));
        }
        for metric in &request.historical_metrics {
            if metric.unit != metric.name.unit() {
                return Err(invalid_parameter(format!(
                    "Unit {:?} is not valid for {:?}",
                    metric.unit, metric.name
                )));
            }
            let is_service_level = metric.name == HistoricalMetricName::ServiceLevel;
            if is_service_level != metric.threshold.is_some() {
                return Err(invalid_parameter(
                    "A Threshold is required for SERVICE_LEVEL and not allowed otherwise",
                ));
            }
        }
        let rows = metric_rows(instance, &request.filters, &request.groupings)?;
        let in_window = |t: &DateTime<Utc>| *t >= request.start_time && *t < request.end_time;

        let results: Vec<HistoricalMetricResult> = rows
            .into_iter()
            .map(|row| {
                let queued: Vec<&Contact> = row
                    .contacts(instance)
                    .filter(|c| in_window(&c.initiated_at))
                    .collect();
                let handled: Vec<&Contact> = row
                    .contacts(instance)
                    .filter(|c| c.stopped_at.as_ref().is_some_and(in_window))
                    .collect();
                let durations: Vec<f64> = handled
                    .iter()
                    .filter_map(|c| c.stopped_at.map(|s| (s - c.initiated_at).num_seconds() as f64))
                    .collect();

                let collections = request
                    .historical_metrics
                    .iter()
                    .map(|metric| {
                        let value = match metric.name {
                            HistoricalMetricName::ContactsQueued => Some(queued.len() as f64),
                            HistoricalMetricName::ContactsHandled
                            | HistoricalMetricName::ContactsHandledOutbound
                            | HistoricalMetricName::ApiContactsHandled => {
                                Some(handled.len() as f64)
                            }
                            HistoricalMetricName::HandleTime
                            | HistoricalMetricName::InteractionTime => {
                                aggregate(&durations, metric.statistic)
                            }
                            name if name.unit() == Unit::Count => Some(0.0),
                            _ => None,
                        };
                        HistoricalMetricData {
                            metric: metric.clone(),
                            value,
                        }
                    })
                    .collect();
                HistoricalMetricResult {
                    dimensions: row.dimensions,
                    collections,
                }
            })
            .collect();

        let (metric_results, next_token) = paginate(results, request, METRICS_MAX_RESULTS_LIMIT)?;
        Ok(GetMetricDataResult {
            metric_results,
            next_token,
        })
    }

    // Federation

    pub(super) fn get_federation_token(
        &mut self,
        request: &GetFederationTokenRequest,
        now: DateTime<Utc>,
    ) -> Result<GetFederationTokenResult> {
        self.instance(&request.instance_id)?;
        let access = self.fresh_id();
        let refresh = self.fresh_id();
        Ok(GetFederationTokenResult {
            credentials: FederationCredentials {
                access_token: format!("access-{access}"),
                access_token_expiration: now + Duration::hours(ACCESS_TOKEN_TTL_HOURS),
                refresh_token: format!("refresh-{refresh}"),
                refresh_token_expiration: now + Duration::days(REFRESH_TOKEN_TTL_DAYS),
            },
        })
    }

    // Tagging

    pub(super) fn list_tags_for_resource(
        &self,
        request: &ListTagsForResourceRequest,
    ) -> Result<ListTagsForResourceResult> {
        require("ResourceArn", &request.resource_arn)?;
        let tags = self
            .tags
            .get(&request.resource_arn)
            .cloned()
            .ok_or_else(|| resource_not_found("Resource", &request.resource_arn))?;
        Ok(ListTagsForResourceResult { tags })
    }

    pub(super) fn tag_resource(&mut self, request: &TagResourceRequest) -> Result<()> {
        require("ResourceArn", &request.resource_arn)?;
        if request.tags.is_empty() {
            return Err(invalid_parameter("Tags must not be empty"));
        }
        let current = self
            .tags
            .get_mut(&request.resource_arn)
            .ok_or_else(|| resource_not_found("Resource", &request.resource_arn))?;
        check_tags(&request.tags, Some(&*current))?;
        current.extend(request.tags.iter().map(|(k, v)| (k.clone(), v.clone())));
        tracing::debug!(arn = %request.resource_arn, added = request.tags.len(), "Tagged resource");
        Ok(())
    }

    pub(super) fn untag_resource(&mut self, request: &UntagResourceRequest) -> Result<()> {
        require("ResourceArn", &request.resource_arn)?;
        if request.tag_keys.is_empty() {
            return Err(invalid_parameter("TagKeys must not be empty"));
        }
        let current = self
            .tags
            .get_mut(&request.resource_arn)
            .ok_or_else(|| resource_not_found("Resource", &request.resource_arn))?;
        for key in &request.tag_keys {
            current.remove(key);
        }
        tracing::debug!(arn = %request.resource_arn, removed = request.tag_keys.len(), "Untagged resource");
        Ok(())
    }
}

/// One output row of a metrics query
struct MetricRow {
    dimensions: Dimensions,
    queue_ids: Vec<String>,
    channel: Option<Channel>,
}

impl MetricRow {
    /// Contacts this row counts; every contact is a voice contact
    fn contacts<'i>(&self, instance: &'i Instance) -> impl Iterator<Item = &'i Contact> {
        let voice = self.channel.is_none_or(|c| c == Channel::Voice);
        let queue_ids = &self.queue_ids;
        instance
            .contacts
            .values()
            .filter(move |c| voice && queue_ids.contains(&c.queue_id))
    }
}

fn metric_rows(
    instance: &Instance,
    filters: &Filters,
    groupings: &[Grouping],
) -> Result<Vec<MetricRow>> {
    if filters.queues.is_empty() || filters.queues.len() > MAX_FILTER_QUEUES {
        return Err(invalid_parameter(format!(
            "Filters must name between 1 and {MAX_FILTER_QUEUES} queues"
        )));
    }
    let mut seen = HashSet::new();
    if groupings.iter().any(|g| !seen.insert(*g)) {
        return Err(invalid_parameter("Groupings must not repeat"));
    }

    let mut queues: Vec<&Queue> = Vec::new();
    for id in &filters.queues {
        let queue = instance
            .find_queue(id)
            .ok_or_else(|| resource_not_found("Queue", id))?;
        if !queues.iter().any(|q| q.queue_id == queue.queue_id) {
            queues.push(queue);
        }
    }
    let mut channels = filters.channels.clone();
    channels.sort();
    channels.dedup();
    if channels.is_empty() {
        channels.push(Channel::Voice);
    }

    let by_queue = groupings.contains(&Grouping::Queue);
    let by_channel = groupings.contains(&Grouping::Channel);
    let all_ids: Vec<String> = queues.iter().map(|q| q.queue_id.clone()).collect();

    let queue_groups: Vec<(Option<QueueReference>, Vec<String>)> = if by_queue {
        queues
            .iter()
            .map(|q| {
                (
                    Some(QueueReference {
                        id: q.queue_id.clone(),
                        arn: q.queue_arn.clone(),
                    }),
                    vec![q.queue_id.clone()],
                )
            })
            .collect()
    } else {
        vec![(None, all_ids)]
    };

    let mut rows = Vec::new();
    for (queue, queue_ids) in queue_groups {
        if by_channel {
            for channel in &channels {
                rows.push(MetricRow {
                    dimensions: Dimensions {
                        queue: queue.clone(),
                        channel: Some(*channel),
                    },
                    queue_ids: queue_ids.clone(),
                    channel: Some(*channel),
                });
            }
        } else {
            let channel = match channels.as_slice() {
                [only] => Some(*only),
                _ => None,
            };
            rows.push(MetricRow {
                dimensions: Dimensions {
                    queue,
                    channel: None,
                },
                queue_ids,
                channel,
            });
        }
    }
    Ok(rows)
}

fn aggregate(values: &[f64], statistic: Statistic) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(match statistic {
        Statistic::Sum => values.iter().sum(),
        Statistic::Max => values.iter().copied().fold(f64::MIN, f64::max),
        Statistic::Avg => values.iter().sum::<f64>() / values.len() as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::seed::*;
    use pretty_assertions::assert_eq;

    const INSTANCE: &str = "test-instance";

    fn state() -> State {
        let mut state = State::new(Arns::new("us-east-1", "123456789012"));
        state.add_instance(INSTANCE);
        state
    }

    fn kind(err: ConnectError) -> ServiceErrorKind {
        err.kind().cloned().expect("service error")
    }

    fn create_user(state: &mut State, username: &str) -> CreateUserResult {
        state
            .create_user(
                &CreateUserRequest::new(INSTANCE, username, BASIC_ROUTING_PROFILE_ID)
                    .with_security_profile(AGENT_SECURITY_PROFILE_ID)
                    .with_password("Passw0rd!"),
            )
            .unwrap()
    }

    fn five_minute_floor(t: DateTime<Utc>) -> DateTime<Utc> {
        let secs = t.timestamp();
        DateTime::from_timestamp(secs - secs.rem_euclid(300), 0).unwrap()
    }

    #[test]
    fn test_seeded_catalog() {
        let state = state();
        let flows = state
            .list_contact_flows(
                &ListContactFlowsRequest::new(INSTANCE).with_type(ContactFlowType::CustomerQueue),
            )
            .unwrap();
        assert_eq!(flows.contact_flow_summary_list.len(), 1);
        assert_eq!(flows.contact_flow_summary_list[0].id, DEFAULT_QUEUE_FLOW_ID);

        let numbers = state
            .list_phone_numbers(&ListPhoneNumbersRequest::new(INSTANCE).with_country_code("us"))
            .unwrap();
        assert_eq!(numbers.phone_number_summary_list[0].phone_number, CLAIMED_PHONE_NUMBER);

        let structure = state
            .describe_user_hierarchy_structure(&DescribeUserHierarchyStructureRequest::new(INSTANCE))
            .unwrap();
        assert_eq!(structure.hierarchy_structure.levels().count(), 2);

        let site = state
            .describe_user_hierarchy_group(&DescribeUserHierarchyGroupRequest::new(
                INSTANCE,
                SITE_GROUP_ID,
            ))
            .unwrap()
            .hierarchy_group;
        assert_eq!(
            site.hierarchy_path.level_one.map(|g| g.id),
            Some(REGION_GROUP_ID.to_string())
        );
    }

    #[test]
    fn test_unknown_instance() {
        let state = state();
        let err = state
            .list_users(&ListUsersRequest::new("no-such-instance"))
            .unwrap_err();
        assert_eq!(kind(err), ServiceErrorKind::ResourceNotFound);

        let err = state.list_users(&ListUsersRequest::new("")).unwrap_err();
        assert_eq!(kind(err), ServiceErrorKind::InvalidParameter);
    }

    #[test]
    fn test_user_lifecycle() {
        let mut state = state();
        let created = create_user(&mut state, "jdoe");

        let agent_queues = state
            .list_queues(&ListQueuesRequest::new(INSTANCE).with_queue_type(QueueType::Agent))
            .unwrap();
        assert_eq!(agent_queues.queue_summary_list.len(), 1);

        state
            .update_user_hierarchy(&UpdateUserHierarchyRequest {
                instance_id: INSTANCE.to_string(),
                user_id: created.user_id.clone(),
                hierarchy_group_id: Some(SITE_GROUP_ID.to_string()),
            })
            .unwrap();
        state
            .update_user_phone_config(&UpdateUserPhoneConfigRequest {
                instance_id: INSTANCE.to_string(),
                user_id: created.user_id.clone(),
                phone_config: UserPhoneConfig::desk_phone("+15555550111"),
            })
            .unwrap();

        let user = state
            .describe_user(&DescribeUserRequest::new(INSTANCE, &created.user_id))
            .unwrap()
            .user;
        assert_eq!(user.arn, created.user_arn);
        assert_eq!(user.hierarchy_group_id.as_deref(), Some(SITE_GROUP_ID));
        assert_eq!(user.phone_config.phone_type, PhoneType::DeskPhone);

        state
            .delete_user(&DeleteUserRequest::new(INSTANCE, &created.user_id))
            .unwrap();
        let err = state
            .describe_user(&DescribeUserRequest::new(INSTANCE, &created.user_id))
            .unwrap_err();
        assert_eq!(kind(err), ServiceErrorKind::UserNotFound);

        let agent_queues = state
            .list_queues(&ListQueuesRequest::new(INSTANCE).with_queue_type(QueueType::Agent))
            .unwrap();
        assert!(agent_queues.queue_summary_list.is_empty());
        let err = state
            .list_tags_for_resource(&ListTagsForResourceRequest::new(&created.user_arn))
            .unwrap_err();
        assert_eq!(kind(err), ServiceErrorKind::ResourceNotFound);
    }

    #[test]
    fn test_create_user_validation() {
        let mut state = state();
        create_user(&mut state, "jdoe");

        let duplicate = CreateUserRequest::new(INSTANCE, "JDoe", BASIC_ROUTING_PROFILE_ID)
            .with_security_profile(AGENT_SECURITY_PROFILE_ID);
        assert_eq!(
            kind(state.create_user(&duplicate).unwrap_err()),
            ServiceErrorKind::DuplicateResource
        );

        let no_profiles = CreateUserRequest::new(INSTANCE, "amy", BASIC_ROUTING_PROFILE_ID);
        assert_eq!(
            kind(state.create_user(&no_profiles).unwrap_err()),
            ServiceErrorKind::InvalidParameter
        );

        let bad_routing = CreateUserRequest::new(INSTANCE, "amy", "missing")
            .with_security_profile(AGENT_SECURITY_PROFILE_ID);
        assert_eq!(
            kind(state.create_user(&bad_routing).unwrap_err()),
            ServiceErrorKind::ResourceNotFound
        );

        let desk_without_number = CreateUserRequest::new(INSTANCE, "amy", BASIC_ROUTING_PROFILE_ID)
            .with_security_profile(AGENT_SECURITY_PROFILE_ID)
            .with_phone_config(UserPhoneConfig {
                phone_type: PhoneType::DeskPhone,
                ..UserPhoneConfig::default()
            });
        assert_eq!(
            kind(state.create_user(&desk_without_number).unwrap_err()),
            ServiceErrorKind::InvalidParameter
        );

        let reserved_tag = CreateUserRequest::new(INSTANCE, "amy", BASIC_ROUTING_PROFILE_ID)
            .with_security_profile(AGENT_SECURITY_PROFILE_ID)
            .with_tag("aws:team", "x");
        assert_eq!(
            kind(state.create_user(&reserved_tag).unwrap_err()),
            ServiceErrorKind::InvalidParameter
        );
    }

    #[test]
    fn test_list_users_pages() {
        let mut state = state();
        for i in 0..5 {
            create_user(&mut state, &format!("agent{i}"));
        }

        let mut names = Vec::new();
        let mut request = ListUsersRequest::new(INSTANCE).with_max_results(2);
        loop {
            let page = state.list_users(&request).unwrap();
            assert!(page.user_summary_list.len() <= 2);
            names.extend(page.user_summary_list.into_iter().map(|u| u.username));
            match page.next_token {
                Some(token) => request = request.with_next_token(token),
                None => break,
            }
        }
        assert_eq!(names, vec!["agent0", "agent1", "agent2", "agent3", "agent4"]);
    }

    #[test]
    fn test_queue_rules() {
        let mut state = state();
        let created = state
            .create_queue(
                &CreateQueueRequest::new(INSTANCE, "Billing", BASIC_HOURS_ID)
                    .with_max_contacts(5)
                    .with_tag("team", "billing"),
            )
            .unwrap();

        let queue = state
            .describe_queue(&DescribeQueueRequest::new(INSTANCE, &created.queue_id))
            .unwrap()
            .queue;
        assert_eq!(queue.name, "Billing");
        assert_eq!(queue.max_contacts, Some(5));
        assert_eq!(queue.tags.get("team").map(String::as_str), Some("billing"));

        let err = state
            .create_queue(&CreateQueueRequest::new(INSTANCE, "Billing", BASIC_HOURS_ID))
            .unwrap_err();
        assert_eq!(kind(err), ServiceErrorKind::DuplicateResource);

        let err = state
            .create_queue(&CreateQueueRequest::new(INSTANCE, "Sales", "no-hours"))
            .unwrap_err();
        assert_eq!(kind(err), ServiceErrorKind::ResourceNotFound);

        create_user(&mut state, "jdoe");
        let agent_queue = state
            .list_queues(&ListQueuesRequest::new(INSTANCE).with_queue_type(QueueType::Agent))
            .unwrap()
            .queue_summary_list
            .remove(0);
        let err = state
            .delete_queue(&DeleteQueueRequest::new(INSTANCE, &agent_queue.id))
            .unwrap_err();
        assert_eq!(kind(err), ServiceErrorKind::InvalidRequest);

        state
            .delete_queue(&DeleteQueueRequest::new(INSTANCE, &created.queue_id))
            .unwrap();
        let err = state
            .delete_queue(&DeleteQueueRequest::new(INSTANCE, &created.queue_id))
            .unwrap_err();
        assert_eq!(kind(err), ServiceErrorKind::ResourceNotFound);
    }

    #[test]
    fn test_outbound_contact_lifecycle() {
        let mut state = state();
        let now = Utc::now();
        let request = StartOutboundVoiceContactRequest::new(
            INSTANCE,
            "+15555550123",
            DEFAULT_CONTACT_FLOW_ID,
        )
        .with_client_token("order-1")
        .with_attribute("order", "1");

        let first = state.start_outbound_voice_contact(&request, now).unwrap();
        let again = state.start_outbound_voice_contact(&request, now).unwrap();
        assert_eq!(first, again);

        state
            .update_contact_attributes(
                &UpdateContactAttributesRequest::new(INSTANCE, &first.contact_id)
                    .with_attribute("status", "dialing"),
            )
            .unwrap();
        let attributes = state
            .get_contact_attributes(&GetContactAttributesRequest::new(INSTANCE, &first.contact_id))
            .unwrap()
            .attributes;
        assert_eq!(attributes.len(), 2);

        let err = state
            .delete_queue(&DeleteQueueRequest::new(INSTANCE, BASIC_QUEUE_ID))
            .unwrap_err();
        assert_eq!(kind(err), ServiceErrorKind::InvalidRequest);

        let stop = StopContactRequest::new(INSTANCE, &first.contact_id);
        state.stop_contact(&stop, now).unwrap();
        assert_eq!(
            kind(state.stop_contact(&stop, now).unwrap_err()),
            ServiceErrorKind::ContactNotFound
        );
    }

    #[test]
    fn test_outbound_contact_validation() {
        let mut state = state();
        let now = Utc::now();

        let bad_destination =
            StartOutboundVoiceContactRequest::new(INSTANCE, "555-0123", DEFAULT_CONTACT_FLOW_ID);
        assert_eq!(
            kind(state.start_outbound_voice_contact(&bad_destination, now).unwrap_err()),
            ServiceErrorKind::DestinationNotAllowed
        );

        let bad_flow = StartOutboundVoiceContactRequest::new(INSTANCE, "+15555550123", "nope");
        assert_eq!(
            kind(state.start_outbound_voice_contact(&bad_flow, now).unwrap_err()),
            ServiceErrorKind::ResourceNotFound
        );

        let bad_source =
            StartOutboundVoiceContactRequest::new(INSTANCE, "+15555550123", DEFAULT_CONTACT_FLOW_ID)
                .with_source_phone_number("+15555550999");
        assert_eq!(
            kind(state.start_outbound_voice_contact(&bad_source, now).unwrap_err()),
            ServiceErrorKind::ResourceNotFound
        );

        let err = state
            .get_contact_attributes(&GetContactAttributesRequest::new(INSTANCE, "missing"))
            .unwrap_err();
        assert_eq!(kind(err), ServiceErrorKind::ContactNotFound);
    }

    #[test]
    fn test_current_metrics_grouped_by_queue() {
        let mut state = state();
        let billing = state
            .create_queue(&CreateQueueRequest::new(INSTANCE, "Billing", BASIC_HOURS_ID))
            .unwrap();
        create_user(&mut state, "jdoe");
        let now = Utc::now();
        for _ in 0..2 {
            state
                .start_outbound_voice_contact(
                    &StartOutboundVoiceContactRequest::new(
                        INSTANCE,
                        "+15555550123",
                        DEFAULT_CONTACT_FLOW_ID,
                    )
                    .with_queue(&billing.queue_arn),
                    now,
                )
                .unwrap();
        }

        let request = GetCurrentMetricDataRequest::new(
            INSTANCE,
            Filters::queues([BASIC_QUEUE_ID, billing.queue_id.as_str()]),
        )
        .with_grouping(Grouping::Queue)
        .with_metric(CurrentMetricName::ContactsInQueue)
        .with_metric(CurrentMetricName::AgentsOnline);
        let result = state.get_current_metric_data(&request, now).unwrap();

        assert_eq!(result.data_snapshot_time, now);
        assert_eq!(result.metric_results.len(), 2);
        let billing_row = &result.metric_results[1];
        assert_eq!(
            billing_row.dimensions.queue.as_ref().map(|q| q.id.as_str()),
            Some(billing.queue_id.as_str())
        );
        assert_eq!(billing_row.collections[0].value, Some(2.0));
        assert_eq!(billing_row.collections[1].value, Some(1.0));
        assert_eq!(result.metric_results[0].collections[0].value, Some(0.0));
    }

    #[test]
    fn test_current_metrics_validation() {
        let state = state();
        let no_metrics =
            GetCurrentMetricDataRequest::new(INSTANCE, Filters::queues([BASIC_QUEUE_ID]));
        assert_eq!(
            kind(state.get_current_metric_data(&no_metrics, Utc::now()).unwrap_err()),
            ServiceErrorKind::InvalidParameter
        );

        let unknown_queue = GetCurrentMetricDataRequest::new(INSTANCE, Filters::queues(["nope"]))
            .with_metric(CurrentMetricName::ContactsInQueue);
        assert_eq!(
            kind(state.get_current_metric_data(&unknown_queue, Utc::now()).unwrap_err()),
            ServiceErrorKind::ResourceNotFound
        );

        let repeated = GetCurrentMetricDataRequest::new(INSTANCE, Filters::queues([BASIC_QUEUE_ID]))
            .with_grouping(Grouping::Queue)
            .with_grouping(Grouping::Queue)
            .with_metric(CurrentMetricName::ContactsInQueue);
        assert_eq!(
            kind(state.get_current_metric_data(&repeated, Utc::now()).unwrap_err()),
            ServiceErrorKind::InvalidParameter
        );
    }

    #[test]
    fn test_historical_metrics() {
        let mut state = state();
        let now = Utc::now();
        let start = five_minute_floor(now - Duration::hours(1));
        let end = five_minute_floor(now) + Duration::minutes(5);

        let contact = state
            .start_outbound_voice_contact(
                &StartOutboundVoiceContactRequest::new(
                    INSTANCE,
                    "+15555550123",
                    DEFAULT_CONTACT_FLOW_ID,
                ),
                now - Duration::seconds(90),
            )
            .unwrap();
        state
            .stop_contact(&StopContactRequest::new(INSTANCE, &contact.contact_id), now)
            .unwrap();

        let request =
            GetMetricDataRequest::new(INSTANCE, start, end, Filters::queues([BASIC_QUEUE_ID]))
                .with_grouping(Grouping::Channel)
                .with_metric(HistoricalMetric::new(
                    HistoricalMetricName::ContactsHandled,
                    Statistic::Sum,
                ))
                .with_metric(HistoricalMetric::new(
                    HistoricalMetricName::HandleTime,
                    Statistic::Avg,
                ))
                .with_metric(HistoricalMetric::service_level(20.0));
        let result = state.get_metric_data(&request, now).unwrap();

        assert_eq!(result.metric_results.len(), 1);
        let row = &result.metric_results[0];
        assert_eq!(row.dimensions.channel, Some(Channel::Voice));
        assert_eq!(row.collections[0].value, Some(1.0));
        assert_eq!(row.collections[1].value, Some(90.0));
        assert_eq!(row.collections[2].value, None);
    }

    #[test]
    fn test_historical_metrics_threshold_rules() {
        let state = state();
        let now = Utc::now();
        let start = five_minute_floor(now - Duration::hours(1));
        let end = five_minute_floor(now);

        let mut missing_threshold = HistoricalMetric::service_level(20.0);
        missing_threshold.threshold = None;
        let request =
            GetMetricDataRequest::new(INSTANCE, start, end, Filters::queues([BASIC_QUEUE_ID]))
                .with_metric(missing_threshold);
        assert_eq!(
            kind(state.get_metric_data(&request, now).unwrap_err()),
            ServiceErrorKind::InvalidParameter
        );
    }

    #[test]
    fn test_tagging() {
        let mut state = state();
        let arn = state.arns().instance(INSTANCE);

        state
            .tag_resource(&TagResourceRequest::new(&arn).with_tag("env", "prod").with_tag("team", "cx"))
            .unwrap();
        state
            .untag_resource(&UntagResourceRequest::new(&arn, ["team"]))
            .unwrap();
        let tags = state
            .list_tags_for_resource(&ListTagsForResourceRequest::new(&arn))
            .unwrap()
            .tags;
        assert_eq!(tags, Tags::from([("env".to_string(), "prod".to_string())]));

        let err = state
            .tag_resource(&TagResourceRequest::new("arn:aws:connect:nowhere").with_tag("k", "v"))
            .unwrap_err();
        assert_eq!(kind(err), ServiceErrorKind::ResourceNotFound);

        let err = state
            .untag_resource(&UntagResourceRequest::new(&arn, Vec::<String>::new()))
            .unwrap_err();
        assert_eq!(kind(err), ServiceErrorKind::InvalidParameter);
    }

    #[test]
    fn test_federation_token() {
        let mut state = state();
        let now = Utc::now();
        let token = state
            .get_federation_token(&GetFederationTokenRequest::new(INSTANCE), now)
            .unwrap()
            .credentials;
        assert!(token.access_token_expiration > now);
        assert!(token.refresh_token_expiration > token.access_token_expiration);
        assert_ne!(token.access_token, token.refresh_token);
        assert!(!format!("{token:?}").contains(&token.access_token));
    }
}
