//! App, app info, and App Store version resources.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::client::AppStoreConnectClient;
use crate::model::{
    DocumentLinks, PagedDocumentLinks, PagedRelationship, PagingInformation, Relationship,
    RelationshipData, ResourceLinks, push_csv, push_int, push_str,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    Ios,
    MacOs,
    TvOs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppStoreAgeRating {
    FourPlus,
    NinePlus,
    SeventeenPlus,
    TwelvePlus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BrazilAgeRating {
    Eighteen,
    Fourteen,
    L,
    Sixteen,
    Ten,
    Twelve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KidsAgeBand {
    FiveAndUnder,
    NineToEleven,
    SixToEight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppStoreVersionState {
    DeveloperRejected,
    DeveloperRemovedFromSale,
    InvalidBinary,
    InReview,
    MetadataRejected,
    PendingAppleRelease,
    PendingContract,
    PendingDeveloperRelease,
    PreorderReadyForSale,
    PrepareForSubmission,
    ProcessingForAppStore,
    ReadyForSale,
    Rejected,
    RemovedFromSale,
    ReplacedWithNewVersion,
    WaitingForExportCompliance,
    WaitingForReview,
}

/// https://developer.apple.com/documentation/appstoreconnectapi/app
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AppAttributes>,
    pub id: String,
    #[serde(default)]
    pub links: ResourceLinks,
    #[serde(rename = "type")]
    pub resource_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppsResponse {
    pub data: Vec<App>,
    #[serde(default)]
    pub links: PagedDocumentLinks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PagingInformation>,
}

/// https://developer.apple.com/documentation/appstoreconnectapi/appinfo
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AppInfoAttributes>,
    pub id: String,
    #[serde(default)]
    pub links: ResourceLinks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<AppInfoRelationships>,
    #[serde(rename = "type")]
    pub resource_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfoAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_store_age_rating: Option<AppStoreAgeRating>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_store_state: Option<AppStoreVersionState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brazil_age_rating: Option<BrazilAgeRating>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kids_age_band: Option<KidsAgeBand>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfoRelationships {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app: Option<Relationship>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_info_localizations: Option<PagedRelationship>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_category: Option<Relationship>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_category: Option<Relationship>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfoResponse {
    pub data: AppInfo,
    #[serde(default)]
    pub links: DocumentLinks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfosResponse {
    pub data: Vec<AppInfo>,
    #[serde(default)]
    pub links: PagedDocumentLinks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PagingInformation>,
}

/// https://developer.apple.com/documentation/appstoreconnectapi/appstoreversion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStoreVersion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AppStoreVersionAttributes>,
    pub id: String,
    #[serde(default)]
    pub links: ResourceLinks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<AppStoreVersionRelationships>,
    #[serde(rename = "type")]
    pub resource_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStoreVersionAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_store_state: Option<AppStoreVersionState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloadable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earliest_release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_type: Option<String>,
    #[serde(rename = "usesIdfa", skip_serializing_if = "Option::is_none")]
    pub uses_idfa: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_string: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStoreVersionRelationships {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_rating_declaration: Option<Relationship>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app: Option<Relationship>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_store_version_localizations: Option<PagedRelationship>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<Relationship>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppStoreVersionResponse {
    pub data: AppStoreVersion,
    #[serde(default)]
    pub links: DocumentLinks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppStoreVersionsResponse {
    pub data: Vec<AppStoreVersion>,
    #[serde(default)]
    pub links: PagedDocumentLinks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PagingInformation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppStoreVersionBuildLinkageResponse {
    pub data: RelationshipData,
    #[serde(default)]
    pub links: DocumentLinks,
}

/// https://developer.apple.com/documentation/appstoreconnectapi/ageratingdeclaration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeRatingDeclaration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AgeRatingDeclarationAttributes>,
    pub id: String,
    #[serde(default)]
    pub links: ResourceLinks,
    #[serde(rename = "type")]
    pub resource_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeRatingDeclarationAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alcohol_tobacco_or_drug_use_or_references: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gambling_and_contests: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gambling_simulated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horror_or_fear_themes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kids_age_band: Option<KidsAgeBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mature_or_suggestive_themes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_or_treatment_information: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profanity_or_crude_humor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sexual_content_graphic_and_nudity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sexual_content_or_nudity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unrestricted_web_access: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violence_cartoon_or_fantasy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violence_realistic: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeRatingDeclarationResponse {
    pub data: AgeRatingDeclaration,
    #[serde(default)]
    pub links: DocumentLinks,
}

// Request bodies. The public option structs flatten to the JSON:API
// `{ "data": { ... } }` envelope the API expects.

#[derive(Debug, Clone, Default)]
pub struct AppInfoUpdateRelationships {
    pub primary_category_id: Option<String>,
    pub primary_subcategory_one_id: Option<String>,
    pub primary_subcategory_two_id: Option<String>,
    pub secondary_category_id: Option<String>,
    pub secondary_subcategory_one_id: Option<String>,
    pub secondary_subcategory_two_id: Option<String>,
}

#[derive(Serialize)]
struct RelationshipDeclaration {
    data: RelationshipData,
}

fn category(id: &Option<String>) -> Option<RelationshipDeclaration> {
    id.as_ref().map(|id| RelationshipDeclaration {
        data: RelationshipData::new("appCategories", id),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AppInfoUpdateRequestRelationships {
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_category: Option<RelationshipDeclaration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_subcategory_one: Option<RelationshipDeclaration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_subcategory_two: Option<RelationshipDeclaration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    secondary_category: Option<RelationshipDeclaration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    secondary_subcategory_one: Option<RelationshipDeclaration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    secondary_subcategory_two: Option<RelationshipDeclaration>,
}

#[derive(Debug, Clone)]
pub struct AppStoreVersionCreateRequest {
    pub app_id: String,
    pub platform: Platform,
    pub version_string: String,
    pub build_id: Option<String>,
    pub copyright: Option<String>,
    pub release_type: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AppStoreVersionCreateAttributes<'a> {
    platform: Platform,
    version_string: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    copyright: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    release_type: Option<&'a str>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStoreVersionUpdateAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloadable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_type: Option<String>,
    #[serde(rename = "usesIdfa", skip_serializing_if = "Option::is_none")]
    pub uses_idfa: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_string: Option<String>,
}

// Query structs. Each one flattens to the `key=value` pairs the endpoint
// accepts, with list filters comma-joined.

#[derive(Debug, Clone, Default)]
pub struct GetAppInfoQuery {
    pub fields_app_infos: Vec<String>,
    pub fields_app_info_localizations: Vec<String>,
    pub fields_app_categories: Vec<String>,
    pub include: Vec<String>,
    pub limit_app_info_localizations: Option<u32>,
}

impl GetAppInfoQuery {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut q = Vec::new();
        push_csv(&mut q, "fields[appInfos]", &self.fields_app_infos);
        push_csv(
            &mut q,
            "fields[appInfoLocalizations]",
            &self.fields_app_info_localizations,
        );
        push_csv(&mut q, "fields[appCategories]", &self.fields_app_categories);
        push_csv(&mut q, "include", &self.include);
        push_int(
            &mut q,
            "limit[appInfoLocalizations]",
            self.limit_app_info_localizations,
        );
        q
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListAppInfosForAppQuery {
    pub fields_app_infos: Vec<String>,
    pub fields_apps: Vec<String>,
    pub include: Vec<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl ListAppInfosForAppQuery {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut q = Vec::new();
        push_csv(&mut q, "fields[appInfos]", &self.fields_app_infos);
        push_csv(&mut q, "fields[apps]", &self.fields_apps);
        push_csv(&mut q, "include", &self.include);
        push_int(&mut q, "limit", self.limit);
        push_str(&mut q, "cursor", self.cursor.as_deref());
        q
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListAppStoreVersionsQuery {
    pub fields_app_store_versions: Vec<String>,
    pub fields_builds: Vec<String>,
    pub filter_id: Vec<String>,
    pub filter_version_string: Vec<String>,
    pub filter_platform: Vec<String>,
    pub filter_app_store_state: Vec<String>,
    pub include: Vec<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl ListAppStoreVersionsQuery {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut q = Vec::new();
        push_csv(
            &mut q,
            "fields[appStoreVersions]",
            &self.fields_app_store_versions,
        );
        push_csv(&mut q, "fields[builds]", &self.fields_builds);
        push_csv(&mut q, "filter[id]", &self.filter_id);
        push_csv(&mut q, "filter[versionString]", &self.filter_version_string);
        push_csv(&mut q, "filter[platform]", &self.filter_platform);
        push_csv(
            &mut q,
            "filter[appStoreState]",
            &self.filter_app_store_state,
        );
        push_csv(&mut q, "include", &self.include);
        push_int(&mut q, "limit", self.limit);
        push_str(&mut q, "cursor", self.cursor.as_deref());
        q
    }
}

impl AppStoreConnectClient {
    /// Reads App Store information including state, age ratings, and kids'
    /// age band.
    pub async fn get_app_info(
        &self,
        id: &str,
        query: &GetAppInfoQuery,
    ) -> Result<AppInfoResponse> {
        self.get_query(&format!("v1/appInfos/{}", id), &query.to_query())
            .await
    }

    /// Gets information about an app that is live on the App Store, or goes
    /// live with the next version.
    pub async fn list_app_infos_for_app(
        &self,
        app_id: &str,
        query: &ListAppInfosForAppQuery,
    ) -> Result<AppInfosResponse> {
        self.get_query(&format!("v1/apps/{}/appInfos", app_id), &query.to_query())
            .await
    }

    /// Updates the App Store categories and sub-categories for an app.
    pub async fn update_app_info(
        &self,
        id: &str,
        relationships: &AppInfoUpdateRelationships,
    ) -> Result<AppInfoResponse> {
        let body = serde_json::json!({
            "data": {
                "id": id,
                "type": "appInfos",
                "relationships": AppInfoUpdateRequestRelationships {
                    primary_category: category(&relationships.primary_category_id),
                    primary_subcategory_one: category(&relationships.primary_subcategory_one_id),
                    primary_subcategory_two: category(&relationships.primary_subcategory_two_id),
                    secondary_category: category(&relationships.secondary_category_id),
                    secondary_subcategory_one: category(
                        &relationships.secondary_subcategory_one_id,
                    ),
                    secondary_subcategory_two: category(
                        &relationships.secondary_subcategory_two_id,
                    ),
                },
            }
        });
        self.patch(&format!("v1/appInfos/{}", id), &body).await
    }

    /// Gets every App Store version of an app across all platforms.
    pub async fn list_app_store_versions_for_app(
        &self,
        app_id: &str,
        query: &ListAppStoreVersionsQuery,
    ) -> Result<AppStoreVersionsResponse> {
        self.get_query(
            &format!("v1/apps/{}/appStoreVersions", app_id),
            &query.to_query(),
        )
        .await
    }

    pub async fn get_app_store_version(&self, id: &str) -> Result<AppStoreVersionResponse> {
        self.get_query(&format!("v1/appStoreVersions/{}", id), &[])
            .await
    }

    /// Adds a new App Store version or platform to an app.
    pub async fn create_app_store_version(
        &self,
        request: &AppStoreVersionCreateRequest,
    ) -> Result<AppStoreVersionResponse> {
        let mut relationships = serde_json::json!({
            "app": {"data": RelationshipData::new("apps", &request.app_id)},
        });
        if let Some(build_id) = &request.build_id {
            relationships["build"] =
                serde_json::json!({"data": RelationshipData::new("builds", build_id)});
        }
        let body = serde_json::json!({
            "data": {
                "type": "appStoreVersions",
                "attributes": AppStoreVersionCreateAttributes {
                    platform: request.platform,
                    version_string: &request.version_string,
                    copyright: request.copyright.as_deref(),
                    release_type: request.release_type.as_deref(),
                },
                "relationships": relationships,
            }
        });
        self.post("v1/appStoreVersions", &body).await
    }

    pub async fn update_app_store_version(
        &self,
        id: &str,
        attributes: &AppStoreVersionUpdateAttributes,
    ) -> Result<AppStoreVersionResponse> {
        let body = serde_json::json!({
            "data": {
                "id": id,
                "type": "appStoreVersions",
                "attributes": attributes,
            }
        });
        self.patch(&format!("v1/appStoreVersions/{}", id), &body)
            .await
    }

    pub async fn delete_app_store_version(&self, id: &str) -> Result<()> {
        self.delete(&format!("v1/appStoreVersions/{}", id)).await
    }

    /// Gets the ID of the build attached to a specific App Store version.
    pub async fn get_build_id_for_app_store_version(
        &self,
        id: &str,
    ) -> Result<AppStoreVersionBuildLinkageResponse> {
        self.get_query(&format!("v1/appStoreVersions/{}/relationships/build", id), &[])
            .await
    }

    /// Changes the build attached to a specific App Store version.
    pub async fn update_build_for_app_store_version(
        &self,
        id: &str,
        build_id: &str,
    ) -> Result<AppStoreVersionBuildLinkageResponse> {
        let body = serde_json::json!({"data": RelationshipData::new("builds", build_id)});
        self.patch(&format!("v1/appStoreVersions/{}/relationships/build", id), &body)
            .await
    }

    pub async fn get_age_rating_declaration_for_app_store_version(
        &self,
        version_id: &str,
    ) -> Result<AgeRatingDeclarationResponse> {
        self.get_query(
            &format!("v1/appStoreVersions/{}/ageRatingDeclaration", version_id),
            &[],
        )
        .await
    }

    /// Provides age-related information so the App Store can determine the
    /// age rating for an app.
    pub async fn update_age_rating_declaration(
        &self,
        id: &str,
        attributes: &AgeRatingDeclarationAttributes,
    ) -> Result<AgeRatingDeclarationResponse> {
        let body = serde_json::json!({
            "data": {
                "id": id,
                "type": "ageRatingDeclarations",
                "attributes": attributes,
            }
        });
        self.patch(&format!("v1/ageRatingDeclarations/{}", id), &body)
            .await
    }
}
