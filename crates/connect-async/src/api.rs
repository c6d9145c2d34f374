//! The synchronous operation provider
//!
//! [`ConnectApi`] is the seam between the async facade and whatever actually
//! talks to the service. Implementations block the calling thread for the
//! duration of a call; the facade runs them on worker threads.

use crate::error::Result;
use crate::model::*;

/// Synchronous contact-center client
///
/// One method per operation. Implementations must be shareable across worker
/// threads.
pub trait ConnectApi: Send + Sync {
    // Users
    fn create_user(&self, request: &CreateUserRequest) -> Result<CreateUserResult>;
    fn delete_user(&self, request: &DeleteUserRequest) -> Result<()>;
    fn describe_user(&self, request: &DescribeUserRequest) -> Result<DescribeUserResult>;
    fn list_users(&self, request: &ListUsersRequest) -> Result<ListUsersResult>;
    fn update_user_hierarchy(&self, request: &UpdateUserHierarchyRequest) -> Result<()>;
    fn update_user_identity_info(&self, request: &UpdateUserIdentityInfoRequest) -> Result<()>;
    fn update_user_phone_config(&self, request: &UpdateUserPhoneConfigRequest) -> Result<()>;
    fn update_user_routing_profile(&self, request: &UpdateUserRoutingProfileRequest)
    -> Result<()>;
    fn update_user_security_profiles(
        &self,
        request: &UpdateUserSecurityProfilesRequest,
    ) -> Result<()>;

    // Hierarchy
    fn describe_user_hierarchy_group(
        &self,
        request: &DescribeUserHierarchyGroupRequest,
    ) -> Result<DescribeUserHierarchyGroupResult>;
    fn describe_user_hierarchy_structure(
        &self,
        request: &DescribeUserHierarchyStructureRequest,
    ) -> Result<DescribeUserHierarchyStructureResult>;
    fn list_user_hierarchy_groups(
        &self,
        request: &ListUserHierarchyGroupsRequest,
    ) -> Result<ListUserHierarchyGroupsResult>;

    // Queues
    fn create_queue(&self, request: &CreateQueueRequest) -> Result<CreateQueueResult>;
    fn describe_queue(&self, request: &DescribeQueueRequest) -> Result<DescribeQueueResult>;
    fn delete_queue(&self, request: &DeleteQueueRequest) -> Result<()>;
    fn list_queues(&self, request: &ListQueuesRequest) -> Result<ListQueuesResult>;

    // Catalog
    fn list_routing_profiles(
        &self,
        request: &ListRoutingProfilesRequest,
    ) -> Result<ListRoutingProfilesResult>;
    fn list_security_profiles(
        &self,
        request: &ListSecurityProfilesRequest,
    ) -> Result<ListSecurityProfilesResult>;
    fn list_contact_flows(&self, request: &ListContactFlowsRequest)
    -> Result<ListContactFlowsResult>;
    fn list_hours_of_operations(
        &self,
        request: &ListHoursOfOperationsRequest,
    ) -> Result<ListHoursOfOperationsResult>;
    fn list_phone_numbers(&self, request: &ListPhoneNumbersRequest)
    -> Result<ListPhoneNumbersResult>;

    // Contacts
    fn start_outbound_voice_contact(
        &self,
        request: &StartOutboundVoiceContactRequest,
    ) -> Result<StartOutboundVoiceContactResult>;
    fn stop_contact(&self, request: &StopContactRequest) -> Result<()>;
    fn get_contact_attributes(
        &self,
        request: &GetContactAttributesRequest,
    ) -> Result<GetContactAttributesResult>;
    fn update_contact_attributes(&self, request: &UpdateContactAttributesRequest) -> Result<()>;

    // Metrics
    fn get_current_metric_data(
        &self,
        request: &GetCurrentMetricDataRequest,
    ) -> Result<GetCurrentMetricDataResult>;
    fn get_metric_data(&self, request: &GetMetricDataRequest) -> Result<GetMetricDataResult>;

    // Federation
    fn get_federation_token(
        &self,
        request: &GetFederationTokenRequest,
    ) -> Result<GetFederationTokenResult>;

    // Tagging
    fn list_tags_for_resource(
        &self,
        request: &ListTagsForResourceRequest,
    ) -> Result<ListTagsForResourceResult>;
    fn tag_resource(&self, request: &TagResourceRequest) -> Result<()>;
    fn untag_resource(&self, request: &UntagResourceRequest) -> Result<()>;

    /// Release connections and other resources held by the provider
    fn shutdown(&self) {}
}
