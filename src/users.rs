//! Team user invitation resources.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::apps::AppsResponse;
use crate::client::AppStoreConnectClient;
use crate::model::{
    DocumentLinks, PagedDocumentLinks, PagedRelationship, PagingInformation, RelationshipData,
    ResourceLinks, push_csv, push_int,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Finance,
    AccountHolder,
    Sales,
    Marketing,
    AppManager,
    Developer,
    AccessToReports,
    CustomerSupport,
}

/// https://developer.apple.com/documentation/appstoreconnectapi/userinvitation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInvitation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<UserInvitationAttributes>,
    pub id: String,
    #[serde(default)]
    pub links: ResourceLinks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<UserInvitationRelationships>,
    #[serde(rename = "type")]
    pub resource_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInvitationAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_apps_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_allowed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<UserRole>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInvitationRelationships {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_apps: Option<PagedRelationship>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInvitationResponse {
    pub data: UserInvitation,
    #[serde(default)]
    pub links: DocumentLinks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInvitationsResponse {
    pub data: Vec<UserInvitation>,
    #[serde(default)]
    pub links: PagedDocumentLinks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PagingInformation>,
}

/// Options for inviting a user with assigned roles to join the team.
#[derive(Debug, Clone)]
pub struct UserInvitationCreateRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<UserRole>,
    pub all_apps_visible: Option<bool>,
    pub provisioning_allowed: Option<bool>,
    /// App IDs that will be visible to the invited user.
    pub visible_app_ids: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserInvitationCreateAttributes<'a> {
    email: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    roles: &'a [UserRole],
    #[serde(skip_serializing_if = "Option::is_none")]
    all_apps_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    provisioning_allowed: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ListInvitationsQuery {
    pub fields_user_invitations: Vec<String>,
    pub filter_roles: Vec<String>,
    pub filter_email: Vec<String>,
    pub include: Vec<String>,
    pub limit: Option<u32>,
    pub sort: Vec<String>,
}

impl ListInvitationsQuery {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut q = Vec::new();
        push_csv(
            &mut q,
            "fields[userInvitations]",
            &self.fields_user_invitations,
        );
        push_csv(&mut q, "filter[roles]", &self.filter_roles);
        push_csv(&mut q, "filter[email]", &self.filter_email);
        push_csv(&mut q, "include", &self.include);
        push_int(&mut q, "limit", self.limit);
        push_csv(&mut q, "sort", &self.sort);
        q
    }
}

impl AppStoreConnectClient {
    /// Gets the pending invitations to join the team.
    pub async fn list_invitations(
        &self,
        query: &ListInvitationsQuery,
    ) -> Result<UserInvitationsResponse> {
        self.get_query("v1/userInvitations", &query.to_query()).await
    }

    pub async fn get_invitation(&self, id: &str) -> Result<UserInvitationResponse> {
        self.get_query(&format!("v1/userInvitations/{}", id), &[])
            .await
    }

    /// Invites a user with assigned roles to join the team.
    pub async fn create_invitation(
        &self,
        request: &UserInvitationCreateRequest,
    ) -> Result<UserInvitationResponse> {
        let mut data = serde_json::json!({
            "type": "userInvitations",
            "attributes": UserInvitationCreateAttributes {
                email: &request.email,
                first_name: &request.first_name,
                last_name: &request.last_name,
                roles: &request.roles,
                all_apps_visible: request.all_apps_visible,
                provisioning_allowed: request.provisioning_allowed,
            },
        });
        if !request.visible_app_ids.is_empty() {
            let apps: Vec<RelationshipData> = request
                .visible_app_ids
                .iter()
                .map(|id| RelationshipData::new("apps", id))
                .collect();
            data["relationships"] = serde_json::json!({"visibleApps": {"data": apps}});
        }
        let body = serde_json::json!({ "data": data });
        self.post("v1/userInvitations", &body).await
    }

    /// Cancels a pending invitation to join the team.
    pub async fn cancel_invitation(&self, id: &str) -> Result<()> {
        self.delete(&format!("v1/userInvitations/{}", id)).await
    }

    /// Gets the apps that will be visible to a user with a pending
    /// invitation.
    pub async fn list_visible_apps_for_invitation(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<AppsResponse> {
        let mut q = Vec::new();
        push_int(&mut q, "limit", limit);
        self.get_query(&format!("v1/userInvitations/{}/visibleApps", id), &q)
            .await
    }
}
