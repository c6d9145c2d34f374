//! Resource tagging

use super::common::Tags;
use serde::{Deserialize, Serialize};

/// Most tags a single resource may carry
pub const MAX_TAGS_PER_RESOURCE: usize = 50;

/// Key prefix reserved for the service
pub const RESERVED_TAG_PREFIX: &str = "aws:";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListTagsForResourceRequest {
    pub resource_arn: String,
}

impl ListTagsForResourceRequest {
    pub fn new(resource_arn: impl Into<String>) -> Self {
        Self {
            resource_arn: resource_arn.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListTagsForResourceResult {
    pub tags: Tags,
}

/// Add or overwrite tags on a resource
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TagResourceRequest {
    pub resource_arn: String,
    pub tags: Tags,
}

impl TagResourceRequest {
    pub fn new(resource_arn: impl Into<String>) -> Self {
        Self {
            resource_arn: resource_arn.into(),
            tags: Tags::new(),
        }
    }

    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UntagResourceRequest {
    pub resource_arn: String,
    pub tag_keys: Vec<String>,
}

impl UntagResourceRequest {
    pub fn new<I, S>(resource_arn: impl Into<String>, tag_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            resource_arn: resource_arn.into(),
            tag_keys: tag_keys.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagging_request_shape() {
        let request = TagResourceRequest::new("arn:aws:connect:us-east-1:1:instance/i")
            .with_tag("env", "prod");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["ResourceArn"], "arn:aws:connect:us-east-1:1:instance/i");
        assert_eq!(value["Tags"]["env"], "prod");
    }
}
