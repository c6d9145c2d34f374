//! In-memory contact-center provider
//!
//! [`InMemoryConnect`] implements [`ConnectApi`] against process-local state.
//! Each instance it knows about starts with a fixed catalog (routing profile,
//! security profiles, contact flows, hours, a claimed number, a standard queue
//! and a two-level agent hierarchy) whose ids are exported as constants.
//!
//! Calls block for the configured latency, which makes the provider useful for
//! exercising the async facade's concurrency behavior.
//!
//! # Example
//!
//! ```rust
//! use connect_async::ConnectApi;
//! use connect_async::memory::{BASIC_ROUTING_PROFILE_ID, AGENT_SECURITY_PROFILE_ID, InMemoryConnect};
//! use connect_async::model::{CreateUserRequest, DescribeUserRequest};
//!
//! let api = InMemoryConnect::with_instance("inst-1");
//! let created = api
//!     .create_user(
//!         &CreateUserRequest::new("inst-1", "jdoe", BASIC_ROUTING_PROFILE_ID)
//!             .with_security_profile(AGENT_SECURITY_PROFILE_ID),
//!     )
//!     .unwrap();
//! let user = api
//!     .describe_user(&DescribeUserRequest::new("inst-1", &created.user_id))
//!     .unwrap()
//!     .user;
//! assert_eq!(user.username, "jdoe");
//! ```

mod seed;
mod store;
mod validate;

pub use seed::*;

use crate::api::ConnectApi;
use crate::error::{ConnectError, Result};
use crate::model::*;
use chrono::Utc;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use store::{Arns, State};

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_ACCOUNT_ID: &str = "123456789012";

#[derive(Debug, Default)]
struct CallStats {
    calls: AtomicU64,
    in_flight: AtomicU64,
    peak_in_flight: AtomicU64,
}

/// Counts one call in flight for as long as it lives
struct InFlight<'a>(&'a CallStats);

impl<'a> InFlight<'a> {
    fn enter(stats: &'a CallStats) -> Self {
        stats.calls.fetch_add(1, Ordering::Relaxed);
        let now = stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        stats.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        Self(stats)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Process-local [`ConnectApi`] implementation
pub struct InMemoryConnect {
    state: Mutex<State>,
    latency: Duration,
    stats: CallStats,
    closed: AtomicBool,
}

impl InMemoryConnect {
    /// A provider with no instances
    pub fn new() -> Self {
        Self::with_region(DEFAULT_REGION, DEFAULT_ACCOUNT_ID)
    }

    /// A provider whose ARNs carry the given region and account
    pub fn with_region(region: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(State::new(Arns::new(region, account_id))),
            latency: Duration::ZERO,
            stats: CallStats::default(),
            closed: AtomicBool::new(false),
        }
    }

    /// A provider with one seeded instance
    pub fn with_instance(instance_id: &str) -> Self {
        Self::new().and_instance(instance_id)
    }

    /// Add a seeded instance; existing instances are left alone
    #[must_use]
    pub fn and_instance(self, instance_id: &str) -> Self {
        self.lock().add_instance(instance_id);
        self
    }

    /// Block every call for `latency` before it touches state
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn instance_arn(&self, instance_id: &str) -> String {
        self.lock().arns().instance(instance_id)
    }

    /// Total calls received, including failed ones
    pub fn calls(&self) -> u64 {
        self.stats.calls.load(Ordering::Relaxed)
    }

    pub fn in_flight(&self) -> u64 {
        self.stats.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of calls ever executing at once
    pub fn peak_in_flight(&self) -> u64 {
        self.stats.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn is_shutdown(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn call<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut State) -> Result<T>,
    ) -> Result<T> {
        let _in_flight = InFlight::enter(&self.stats);
        if self.is_shutdown() {
            return Err(ConnectError::client(format!(
                "Client has been shut down; cannot call {operation}"
            )));
        }
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }

        let mut state = self.lock();
        let request_id = state.next_request_id();
        tracing::trace!(operation, request_id = %request_id, "Calling in-memory provider");
        f(&mut state).map_err(|err| {
            let err = err.with_request_id(request_id);
            tracing::debug!(operation, error = %err, "In-memory call failed");
            err
        })
    }
}

impl Default for InMemoryConnect {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InMemoryConnect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryConnect")
            .field("latency", &self.latency)
            .field("calls", &self.calls())
            .field("in_flight", &self.in_flight())
            .field("closed", &self.is_shutdown())
            .finish()
    }
}

impl ConnectApi for InMemoryConnect {
    fn create_user(&self, request: &CreateUserRequest) -> Result<CreateUserResult> {
        self.call("create_user", |s| s.create_user(request))
    }

    fn delete_user(&self, request: &DeleteUserRequest) -> Result<()> {
        self.call("delete_user", |s| s.delete_user(request))
    }

    fn describe_user(&self, request: &DescribeUserRequest) -> Result<DescribeUserResult> {
        self.call("describe_user", |s| s.describe_user(request))
    }

    fn list_users(&self, request: &ListUsersRequest) -> Result<ListUsersResult> {
        self.call("list_users", |s| s.list_users(request))
    }

    fn update_user_hierarchy(&self, request: &UpdateUserHierarchyRequest) -> Result<()> {
        self.call("update_user_hierarchy", |s| s.update_user_hierarchy(request))
    }

    fn update_user_identity_info(&self, request: &UpdateUserIdentityInfoRequest) -> Result<()> {
        self.call("update_user_identity_info", |s| {
            s.update_user_identity_info(request)
        })
    }

    fn update_user_phone_config(&self, request: &UpdateUserPhoneConfigRequest) -> Result<()> {
        self.call("update_user_phone_config", |s| {
            s.update_user_phone_config(request)
        })
    }

    fn update_user_routing_profile(
        &self,
        request: &UpdateUserRoutingProfileRequest,
    ) -> Result<()> {
        self.call("update_user_routing_profile", |s| {
            s.update_user_routing_profile(request)
        })
    }

    fn update_user_security_profiles(
        &self,
        request: &UpdateUserSecurityProfilesRequest,
    ) -> Result<()> {
        self.call("update_user_security_profiles", |s| {
            s.update_user_security_profiles(request)
        })
    }

    fn describe_user_hierarchy_group(
        &self,
        request: &DescribeUserHierarchyGroupRequest,
    ) -> Result<DescribeUserHierarchyGroupResult> {
        self.call("describe_user_hierarchy_group", |s| {
            s.describe_user_hierarchy_group(request)
        })
    }

    fn describe_user_hierarchy_structure(
        &self,
        request: &DescribeUserHierarchyStructureRequest,
    ) -> Result<DescribeUserHierarchyStructureResult> {
        self.call("describe_user_hierarchy_structure", |s| {
            s.describe_user_hierarchy_structure(request)
        })
    }

    fn list_user_hierarchy_groups(
        &self,
        request: &ListUserHierarchyGroupsRequest,
    ) -> Result<ListUserHierarchyGroupsResult> {
        self.call("list_user_hierarchy_groups", |s| {
            s.list_user_hierarchy_groups(request)
        })
    }

    fn create_queue(&self, request: &CreateQueueRequest) -> Result<CreateQueueResult> {
        self.call("create_queue", |s| s.create_queue(request))
    }

    fn describe_queue(&self, request: &DescribeQueueRequest) -> Result<DescribeQueueResult> {
        self.call("describe_queue", |s| s.describe_queue(request))
    }

    fn delete_queue(&self, request: &DeleteQueueRequest) -> Result<()> {
        self.call("delete_queue", |s| s.delete_queue(request))
    }

    fn list_queues(&self, request: &ListQueuesRequest) -> Result<ListQueuesResult> {
        self.call("list_queues", |s| s.list_queues(request))
    }

    fn list_routing_profiles(
        &self,
        request: &ListRoutingProfilesRequest,
    ) -> Result<ListRoutingProfilesResult> {
        self.call("list_routing_profiles", |s| s.list_routing_profiles(request))
    }

    fn list_security_profiles(
        &self,
        request: &ListSecurityProfilesRequest,
    ) -> Result<ListSecurityProfilesResult> {
        self.call("list_security_profiles", |s| s.list_security_profiles(request))
    }

    fn list_contact_flows(
        &self,
        request: &ListContactFlowsRequest,
    ) -> Result<ListContactFlowsResult> {
        self.call("list_contact_flows", |s| s.list_contact_flows(request))
    }

    fn list_hours_of_operations(
        &self,
        request: &ListHoursOfOperationsRequest,
    ) -> Result<ListHoursOfOperationsResult> {
        self.call("list_hours_of_operations", |s| {
            s.list_hours_of_operations(request)
        })
    }

    fn list_phone_numbers(
        &self,
        request: &ListPhoneNumbersRequest,
    ) -> Result<ListPhoneNumbersResult> {
        self.call("list_phone_numbers", |s| s.list_phone_numbers(request))
    }

    fn start_outbound_voice_contact(
        &self,
        request: &StartOutboundVoiceContactRequest,
    ) -> Result<StartOutboundVoiceContactResult> {
        self.call("start_outbound_voice_contact", |s| {
            s.start_outbound_voice_contact(request, Utc::now())
        })
    }

    fn stop_contact(&self, request: &StopContactRequest) -> Result<()> {
        self.call("stop_contact", |s| s.stop_contact(request, Utc::now()))
    }

    fn get_contact_attributes(
        &self,
        request: &GetContactAttributesRequest,
    ) -> Result<GetContactAttributesResult> {
        self.call("get_contact_attributes", |s| s.get_contact_attributes(request))
    }

    fn update_contact_attributes(&self, request: &UpdateContactAttributesRequest) -> Result<()> {
        self.call("update_contact_attributes", |s| {
            s.update_contact_attributes(request)
        })
    }

    fn get_current_metric_data(
        &self,
        request: &GetCurrentMetricDataRequest,
    ) -> Result<GetCurrentMetricDataResult> {
        self.call("get_current_metric_data", |s| {
            s.get_current_metric_data(request, Utc::now())
        })
    }

    fn get_metric_data(&self, request: &GetMetricDataRequest) -> Result<GetMetricDataResult> {
        self.call("get_metric_data", |s| s.get_metric_data(request, Utc::now()))
    }

    fn get_federation_token(
        &self,
        request: &GetFederationTokenRequest,
    ) -> Result<GetFederationTokenResult> {
        self.call("get_federation_token", |s| {
            s.get_federation_token(request, Utc::now())
        })
    }

    fn list_tags_for_resource(
        &self,
        request: &ListTagsForResourceRequest,
    ) -> Result<ListTagsForResourceResult> {
        self.call("list_tags_for_resource", |s| s.list_tags_for_resource(request))
    }

    fn tag_resource(&self, request: &TagResourceRequest) -> Result<()> {
        self.call("tag_resource", |s| s.tag_resource(request))
    }

    fn untag_resource(&self, request: &UntagResourceRequest) -> Result<()> {
        self.call("untag_resource", |s| s.untag_resource(request))
    }

    fn shutdown(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!(calls = self.calls(), "In-memory provider shut down");
        }
    }
}
