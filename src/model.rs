//! Common JSON:API envelope types shared by every App Store Connect resource.

use serde::{Deserialize, Serialize};

/// Self-links attached to a single resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceLinks {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
}

/// Links attached to a single-document response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentLinks {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
}

/// Links attached to a paged response. `next` is absent on the last page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PagedDocumentLinks {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PagingInformation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paging {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

/// `{ "type": ..., "id": ... }` reference used inside relationships.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipData {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
}

impl RelationshipData {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipLinks {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
}

/// To-one relationship.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<RelationshipData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<RelationshipLinks>,
}

/// To-many relationship with paging metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PagedRelationship {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<RelationshipData>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<RelationshipLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PagingInformation>,
}

// Query-string assembly. The API expects repeated-field filters as a single
// comma-joined value, e.g. `fields[appInfos]=appStoreState,kidsAgeBand`.

pub(crate) fn push_csv(query: &mut Vec<(String, String)>, key: &str, values: &[String]) {
    if !values.is_empty() {
        query.push((key.to_string(), values.join(",")));
    }
}

pub(crate) fn push_int(query: &mut Vec<(String, String)>, key: &str, value: Option<u32>) {
    if let Some(value) = value {
        query.push((key.to_string(), value.to_string()));
    }
}

pub(crate) fn push_str(query: &mut Vec<(String, String)>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        query.push((key.to_string(), value.to_string()));
    }
}
