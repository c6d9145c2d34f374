//! Asynchronous facade over a [`ConnectApi`] provider
//!
//! Every operation gets two entry points generated from one list:
//! `<op>_async(request)` and `<op>_async_with_listener(request, listener)`.
//! Both return immediately with a [`TaskHandle`]; the synchronous call runs on
//! the client's [`WorkerPool`].

use crate::api::ConnectApi;
use crate::config::ClientSettings;
use crate::error::ConnectError;
use crate::model::*;
use crate::task::{CompletionListener, PoolError, TaskHandle, WorkerPool};
use std::fmt;
use std::sync::Arc;

/// Async contact-center client
///
/// Cloning is cheap; clones share the provider and the pool.
///
/// # Example
///
/// ```rust,ignore
/// let client = ConnectAsyncClient::new(InMemoryConnect::with_instance("inst-1"))?;
///
/// let handle = client.describe_user_async(DescribeUserRequest::new("inst-1", user_id));
/// let user = handle.await?.user;
///
/// client.shutdown();
/// ```
pub struct ConnectAsyncClient<C> {
    api: Arc<C>,
    pool: WorkerPool,
    settings: Option<ClientSettings>,
}

impl<C> Clone for ConnectAsyncClient<C> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            pool: self.pool.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<C: ConnectApi + 'static> ConnectAsyncClient<C> {
    /// Wrap a provider with a pool of the default size on the current runtime
    pub fn new(api: C) -> Result<Self, PoolError> {
        Ok(Self::with_pool(api, WorkerPool::new(crate::task::DEFAULT_POOL_SIZE)?))
    }

    /// Size the pool from `max_connections`
    pub fn with_config(api: C, config: &crate::config::ClientConfig) -> Result<Self, PoolError> {
        Ok(Self::with_pool(api, WorkerPool::from_config(config)?))
    }

    /// Use a caller-supplied pool, possibly shared with other clients
    pub fn with_pool(api: C, pool: WorkerPool) -> Self {
        Self {
            api: Arc::new(api),
            pool,
            settings: None,
        }
    }

    /// Build the provider from resolved profile settings
    ///
    /// The settings are handed to `factory` untouched; the pool is sized from
    /// `settings.client.max_connections`.
    pub fn from_settings<F>(settings: ClientSettings, factory: F) -> Result<Self, PoolError>
    where
        F: FnOnce(&ClientSettings) -> C,
    {
        let pool = WorkerPool::from_config(&settings.client)?;
        let api = factory(&settings);
        tracing::debug!(
            profile = %settings.profile,
            region = %settings.region,
            pool_size = pool.size(),
            "Created client from settings"
        );
        Ok(Self {
            api: Arc::new(api),
            pool,
            settings: Some(settings),
        })
    }

    /// The synchronous provider
    pub fn api(&self) -> &C {
        &self.api
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Settings the client was built from, if any
    pub fn settings(&self) -> Option<&ClientSettings> {
        self.settings.as_ref()
    }

    /// Release the provider, then shut the pool down
    ///
    /// Queued calls are rejected and running ones terminated. Calling this
    /// more than once has no further effect on the pool.
    pub fn shutdown(&self) {
        self.api.shutdown();
        self.pool.shutdown();
    }
}

macro_rules! async_operations {
    ($($op:ident($req:ty) -> $res:ty;)+) => {
        pastey::paste! {
            impl<C: ConnectApi + 'static> ConnectAsyncClient<C> {
                $(
                    #[doc = concat!("Submit `", stringify!($op), "` and return a handle to its result")]
                    pub fn [<$op _async>](&self, request: $req) -> TaskHandle<$res, ConnectError> {
                        let api = Arc::clone(&self.api);
                        self.pool
                            .submit(stringify!($op), request, move |request: &$req| api.$op(request))
                    }

                    #[doc = concat!(
                        "Submit `", stringify!($op),
                        "`; `listener` hears the outcome before the handle resolves"
                    )]
                    pub fn [<$op _async_with_listener>]<L>(
                        &self,
                        request: $req,
                        listener: L,
                    ) -> TaskHandle<$res, ConnectError>
                    where
                        L: CompletionListener<$req, $res, ConnectError> + 'static,
                    {
                        let api = Arc::clone(&self.api);
                        self.pool.submit_with_listener(
                            stringify!($op),
                            request,
                            move |request: &$req| api.$op(request),
                            listener,
                        )
                    }
                )+
            }
        }
    };
}

async_operations! {
    create_user(CreateUserRequest) -> CreateUserResult;
    delete_user(DeleteUserRequest) -> ();
    describe_user(DescribeUserRequest) -> DescribeUserResult;
    list_users(ListUsersRequest) -> ListUsersResult;
    update_user_hierarchy(UpdateUserHierarchyRequest) -> ();
    update_user_identity_info(UpdateUserIdentityInfoRequest) -> ();
    update_user_phone_config(UpdateUserPhoneConfigRequest) -> ();
    update_user_routing_profile(UpdateUserRoutingProfileRequest) -> ();
    update_user_security_profiles(UpdateUserSecurityProfilesRequest) -> ();

    describe_user_hierarchy_group(DescribeUserHierarchyGroupRequest) -> DescribeUserHierarchyGroupResult;
    describe_user_hierarchy_structure(DescribeUserHierarchyStructureRequest) -> DescribeUserHierarchyStructureResult;
    list_user_hierarchy_groups(ListUserHierarchyGroupsRequest) -> ListUserHierarchyGroupsResult;

    create_queue(CreateQueueRequest) -> CreateQueueResult;
    describe_queue(DescribeQueueRequest) -> DescribeQueueResult;
    delete_queue(DeleteQueueRequest) -> ();
    list_queues(ListQueuesRequest) -> ListQueuesResult;

    list_routing_profiles(ListRoutingProfilesRequest) -> ListRoutingProfilesResult;
    list_security_profiles(ListSecurityProfilesRequest) -> ListSecurityProfilesResult;
    list_contact_flows(ListContactFlowsRequest) -> ListContactFlowsResult;
    list_hours_of_operations(ListHoursOfOperationsRequest) -> ListHoursOfOperationsResult;
    list_phone_numbers(ListPhoneNumbersRequest) -> ListPhoneNumbersResult;

    start_outbound_voice_contact(StartOutboundVoiceContactRequest) -> StartOutboundVoiceContactResult;
    stop_contact(StopContactRequest) -> ();
    get_contact_attributes(GetContactAttributesRequest) -> GetContactAttributesResult;
    update_contact_attributes(UpdateContactAttributesRequest) -> ();

    get_current_metric_data(GetCurrentMetricDataRequest) -> GetCurrentMetricDataResult;
    get_metric_data(GetMetricDataRequest) -> GetMetricDataResult;

    get_federation_token(GetFederationTokenRequest) -> GetFederationTokenResult;

    list_tags_for_resource(ListTagsForResourceRequest) -> ListTagsForResourceResult;
    tag_resource(TagResourceRequest) -> ();
    untag_resource(UntagResourceRequest) -> ();
}

impl<C> fmt::Debug for ConnectAsyncClient<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectAsyncClient")
            .field("pool", &self.pool)
            .field("profile", &self.settings.as_ref().map(|s| s.profile.as_str()))
            .finish()
    }
}
