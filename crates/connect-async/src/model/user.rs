//! Agent users

use super::common::{Tags, list_request};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhoneType {
    #[default]
    SoftPhone,
    DeskPhone,
}

/// How the agent's phone behaves
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UserPhoneConfig {
    pub phone_type: PhoneType,
    pub auto_accept: bool,
    /// Seconds of after contact work before the agent becomes available
    pub after_contact_work_time_limit: u32,
    /// Required for [`PhoneType::DeskPhone`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desk_phone_number: Option<String>,
}

impl UserPhoneConfig {
    pub fn soft_phone() -> Self {
        Self::default()
    }

    pub fn desk_phone(number: impl Into<String>) -> Self {
        Self {
            phone_type: PhoneType::DeskPhone,
            desk_phone_number: Some(number.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UserIdentityInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct User {
    pub id: String,
    pub arn: String,
    pub username: String,
    pub identity_info: UserIdentityInfo,
    pub phone_config: UserPhoneConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory_user_id: Option<String>,
    pub security_profile_ids: Vec<String>,
    pub routing_profile_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hierarchy_group_id: Option<String>,
    pub tags: Tags,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UserSummary {
    pub id: String,
    pub arn: String,
    pub username: String,
}

/// Create a user account in an instance
///
/// # Example
///
/// ```rust,ignore
/// let request = CreateUserRequest::new(instance_id, "jdoe", routing_profile_id)
///     .with_security_profile(security_profile_id)
///     .with_password("Passw0rd!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CreateUserRequest {
    pub instance_id: String,
    pub username: String,
    /// Required unless the instance uses directory or SAML identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub identity_info: UserIdentityInfo,
    pub phone_config: UserPhoneConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory_user_id: Option<String>,
    pub security_profile_ids: Vec<String>,
    pub routing_profile_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hierarchy_group_id: Option<String>,
    pub tags: Tags,
}

impl CreateUserRequest {
    pub fn new(
        instance_id: impl Into<String>,
        username: impl Into<String>,
        routing_profile_id: impl Into<String>,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            username: username.into(),
            routing_profile_id: routing_profile_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn with_security_profile(mut self, security_profile_id: impl Into<String>) -> Self {
        self.security_profile_ids.push(security_profile_id.into());
        self
    }

    #[must_use]
    pub fn with_identity_info(mut self, identity_info: UserIdentityInfo) -> Self {
        self.identity_info = identity_info;
        self
    }

    #[must_use]
    pub fn with_phone_config(mut self, phone_config: UserPhoneConfig) -> Self {
        self.phone_config = phone_config;
        self
    }

    #[must_use]
    pub fn with_hierarchy_group(mut self, hierarchy_group_id: impl Into<String>) -> Self {
        self.hierarchy_group_id = Some(hierarchy_group_id.into());
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
pub struct CreateUserResult {
    pub user_id: String,
    pub user_arn: String,
}

/// Identifies one user in one instance
macro_rules! user_request {
    ($(#[$meta:meta])* $name:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
        #[serde(rename_all = "PascalCase", default)]
        pub struct $name {
            pub instance_id: String,
            pub user_id: String,
            $(pub $field: $ty,)*
        }
    };
}

user_request!(DeleteUserRequest {});

impl DeleteUserRequest {
    pub fn new(instance_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            user_id: user_id.into(),
        }
    }
}

user_request!(DescribeUserRequest {});

impl DescribeUserRequest {
    pub fn new(instance_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            user_id: user_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeUserResult {
    pub user: User,
}

list_request!(ListUsersRequest);

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListUsersResult {
    pub user_summary_list: Vec<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

user_request!(
    /// Assign a user to a hierarchy group, or clear it with `None`
    UpdateUserHierarchyRequest {
        hierarchy_group_id: Option<String>,
    }
);

user_request!(UpdateUserIdentityInfoRequest {
    identity_info: UserIdentityInfo,
});

user_request!(UpdateUserPhoneConfigRequest {
    phone_config: UserPhoneConfig,
});

user_request!(UpdateUserRoutingProfileRequest {
    routing_profile_id: String,
});

user_request!(
    /// Replace the user's security profiles
    UpdateUserSecurityProfilesRequest {
        security_profile_ids: Vec<String>,
    }
);
