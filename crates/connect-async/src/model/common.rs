//! Shapes shared by several operations

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resource tags, key to value
pub type Tags = BTreeMap<String, String>;

/// Largest page a list operation will return
pub const MAX_RESULTS_LIMIT: u32 = 1000;

/// Page size used when a list request leaves `max_results` unset
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Id, ARN and name of a resource, as returned by list operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceSummary {
    pub id: String,
    pub arn: String,
    pub name: String,
}

impl ResourceSummary {
    pub fn new(id: impl Into<String>, arn: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            arn: arn.into(),
            name: name.into(),
        }
    }
}

/// Paging fields common to list requests
pub trait Paginated {
    fn next_token(&self) -> Option<&str>;
    fn max_results(&self) -> Option<u32>;
}

/// Declares a list request carrying only an instance id and paging fields
macro_rules! list_request {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
        #[serde(rename_all = "PascalCase", default)]
        pub struct $name {
            pub instance_id: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub next_token: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub max_results: Option<u32>,
        }

        impl $name {
            pub fn new(instance_id: impl Into<String>) -> Self {
                Self {
                    instance_id: instance_id.into(),
                    ..Self::default()
                }
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

        impl $crate::model::common::Paginated for $name {
            fn next_token(&self) -> Option<&str> {
                self.next_token.as_deref()
            }

            fn max_results(&self) -> Option<u32> {
                self.max_results
            }
        }
    };
}

/// Implements [`Paginated`] for a request with its own filter fields
macro_rules! impl_paginated {
    ($($name:ty),+ $(,)?) => {
        $(
            impl $crate::model::common::Paginated for $name {
                fn next_token(&self) -> Option<&str> {
                    self.next_token.as_deref()
                }

                fn max_results(&self) -> Option<u32> {
                    self.max_results
                }
            }
        )+
    };
}

pub(crate) use impl_paginated;
pub(crate) use list_request;
