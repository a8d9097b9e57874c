use database::entities::prerequisite_edges;
use models::prerequisite::{PrereqStatus, PrereqTree, PrereqTreeNode, SatisfactionReport};
use sea_orm::prelude::Uuid;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddPrerequisiteRequest {
    pub prerequisite_id: Uuid,
    #[serde(default = "default_mandatory")]
    pub mandatory: bool,
}

fn default_mandatory() -> bool {
    true
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PrerequisiteEdgeResponse {
    pub id: String,
    pub course_id: String,
    pub prerequisite_id: String,
    pub mandatory: bool,
}

impl From<prerequisite_edges::Model> for PrerequisiteEdgeResponse {
    fn from(edge: prerequisite_edges::Model) -> Self {
        Self {
            id: edge.id.to_string(),
            course_id: edge.course_id.to_string(),
            prerequisite_id: edge.prerequisite_id.to_string(),
            mandatory: edge.mandatory,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PrerequisiteStatusResponse {
    pub course_id: String,
    pub code: String,
    pub mandatory: bool,
    pub passed: bool,
}

impl From<PrereqStatus> for PrerequisiteStatusResponse {
    fn from(status: PrereqStatus) -> Self {
        Self {
            course_id: status.course_id.to_string(),
            code: status.code,
            mandatory: status.mandatory,
            passed: status.passed,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SatisfactionResponse {
    pub satisfied: bool,
    pub mandatory_met: usize,
    pub mandatory_total: usize,
    pub prerequisites: Vec<PrerequisiteStatusResponse>,
}

impl From<SatisfactionReport> for SatisfactionResponse {
    fn from(report: SatisfactionReport) -> Self {
        Self {
            satisfied: report.satisfied,
            mandatory_met: report.mandatory_met,
            mandatory_total: report.mandatory_total,
            prerequisites: report
                .prerequisites
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PrerequisiteTreeResponse {
    pub course_id: String,
    pub code: String,
    pub title: String,
    pub requires: Vec<PrerequisiteTreeNodeResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PrerequisiteTreeNodeResponse {
    pub course_id: String,
    pub code: String,
    pub title: String,
    pub mandatory: bool,
    pub requires: Vec<PrerequisiteTreeNodeResponse>,
}

impl From<PrereqTree> for PrerequisiteTreeResponse {
    fn from(tree: PrereqTree) -> Self {
        Self {
            course_id: tree.course_id.to_string(),
            code: tree.code,
            title: tree.title,
            requires: tree.requires.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<PrereqTreeNode> for PrerequisiteTreeNodeResponse {
    fn from(node: PrereqTreeNode) -> Self {
        Self {
            course_id: node.course_id.to_string(),
            code: node.code,
            title: node.title,
            mandatory: node.mandatory,
            requires: node.requires.into_iter().map(Into::into).collect(),
        }
    }
}
