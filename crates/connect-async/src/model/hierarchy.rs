//! Agent hierarchy groups and levels

use super::common::{ResourceSummary, list_request};
use serde::{Deserialize, Serialize};

/// One named level of the hierarchy structure
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HierarchyLevel {
    pub id: String,
    pub arn: String,
    pub name: String,
}

/// Up to five levels, top first
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HierarchyStructure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_one: Option<HierarchyLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_two: Option<HierarchyLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_three: Option<HierarchyLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_four: Option<HierarchyLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_five: Option<HierarchyLevel>,
}

impl HierarchyStructure {
    /// Levels in order, stopping at the first gap
    pub fn levels(&self) -> impl Iterator<Item = &HierarchyLevel> {
        [
            &self.level_one,
            &self.level_two,
            &self.level_three,
            &self.level_four,
            &self.level_five,
        ]
        .into_iter()
        .map_while(Option::as_ref)
    }
}

/// Groups from the top of the hierarchy down to (and including) a group
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HierarchyPath {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_one: Option<ResourceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_two: Option<ResourceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_three: Option<ResourceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_four: Option<ResourceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_five: Option<ResourceSummary>,
}

impl HierarchyPath {
    /// Build a path from groups ordered top first; extra entries are ignored
    pub fn from_groups(groups: Vec<ResourceSummary>) -> Self {
        let mut slots = groups.into_iter();
        Self {
            level_one: slots.next(),
            level_two: slots.next(),
            level_three: slots.next(),
            level_four: slots.next(),
            level_five: slots.next(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HierarchyGroup {
    pub id: String,
    pub arn: String,
    pub name: String,
    pub level_id: String,
    pub hierarchy_path: HierarchyPath,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeUserHierarchyGroupRequest {
    pub instance_id: String,
    pub hierarchy_group_id: String,
}

impl DescribeUserHierarchyGroupRequest {
    pub fn new(instance_id: impl Into<String>, hierarchy_group_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            hierarchy_group_id: hierarchy_group_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeUserHierarchyGroupResult {
    pub hierarchy_group: HierarchyGroup,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeUserHierarchyStructureRequest {
    pub instance_id: String,
}

impl DescribeUserHierarchyStructureRequest {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeUserHierarchyStructureResult {
    pub hierarchy_structure: HierarchyStructure,
}

list_request!(ListUserHierarchyGroupsRequest);

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListUserHierarchyGroupsResult {
    pub user_hierarchy_group_summary_list: Vec<ResourceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}
