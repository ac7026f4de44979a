//! Power and performance metrics and diagnostic reporting resources.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::client::AppStoreConnectClient;
use crate::model::{
    PagedDocumentLinks, PagingInformation, ResourceLinks, push_csv, push_int, push_str,
};

/// https://developer.apple.com/documentation/appstoreconnectapi/perfpowermetric
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerfPowerMetric {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<PerfPowerMetricAttributes>,
    pub id: String,
    #[serde(default)]
    pub links: ResourceLinks,
    #[serde(rename = "type")]
    pub resource_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerfPowerMetricAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerfPowerMetricsResponse {
    pub data: Vec<PerfPowerMetric>,
    #[serde(default)]
    pub links: PagedDocumentLinks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PagingInformation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticSignature {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<DiagnosticSignatureAttributes>,
    pub id: String,
    #[serde(default)]
    pub links: ResourceLinks,
    #[serde(rename = "type")]
    pub resource_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticSignatureAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticSignaturesResponse {
    pub data: Vec<DiagnosticSignature>,
    #[serde(default)]
    pub links: PagedDocumentLinks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PagingInformation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticLog {
    pub id: String,
    #[serde(default)]
    pub links: ResourceLinks,
    #[serde(rename = "type")]
    pub resource_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticLogsResponse {
    pub data: Vec<DiagnosticLog>,
    #[serde(default)]
    pub links: PagedDocumentLinks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PagingInformation>,
}

#[derive(Debug, Clone, Default)]
pub struct GetPerfPowerMetricsQuery {
    pub filter_device_type: Vec<String>,
    pub filter_metric_type: Vec<String>,
    pub filter_platform: Vec<String>,
    pub cursor: Option<String>,
}

impl GetPerfPowerMetricsQuery {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut q = Vec::new();
        push_csv(&mut q, "filter[deviceType]", &self.filter_device_type);
        push_csv(&mut q, "filter[metricType]", &self.filter_metric_type);
        push_csv(&mut q, "filter[platform]", &self.filter_platform);
        push_str(&mut q, "cursor", self.cursor.as_deref());
        q
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListDiagnosticSignaturesQuery {
    pub fields_diagnostic_signatures: Vec<String>,
    pub filter_diagnostic_type: Vec<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl ListDiagnosticSignaturesQuery {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut q = Vec::new();
        push_csv(
            &mut q,
            "fields[diagnosticSignatures]",
            &self.fields_diagnostic_signatures,
        );
        push_csv(&mut q, "filter[diagnosticType]", &self.filter_diagnostic_type);
        push_int(&mut q, "limit", self.limit);
        push_str(&mut q, "cursor", self.cursor.as_deref());
        q
    }
}

impl AppStoreConnectClient {
    /// Gets performance and power metrics for the most recent versions of
    /// an app.
    pub async fn get_perf_power_metrics_for_app(
        &self,
        app_id: &str,
        query: &GetPerfPowerMetricsQuery,
    ) -> Result<PerfPowerMetricsResponse> {
        self.get_query(
            &format!("v1/apps/{}/perfPowerMetrics", app_id),
            &query.to_query(),
        )
        .await
    }

    /// Gets performance and power metrics for a specific build.
    pub async fn get_perf_power_metrics_for_build(
        &self,
        build_id: &str,
        query: &GetPerfPowerMetricsQuery,
    ) -> Result<PerfPowerMetricsResponse> {
        self.get_query(
            &format!("v1/builds/{}/perfPowerMetrics", build_id),
            &query.to_query(),
        )
        .await
    }

    /// Lists the aggregate backtrace signatures captured for a build.
    pub async fn list_diagnostic_signatures_for_build(
        &self,
        build_id: &str,
        query: &ListDiagnosticSignaturesQuery,
    ) -> Result<DiagnosticSignaturesResponse> {
        self.get_query(
            &format!("v1/builds/{}/diagnosticSignatures", build_id),
            &query.to_query(),
        )
        .await
    }

    /// Gets the anonymized backtrace logs for a diagnostic signature.
    pub async fn get_logs_for_diagnostic_signature(
        &self,
        signature_id: &str,
        limit: Option<u32>,
    ) -> Result<DiagnosticLogsResponse> {
        let mut q = Vec::new();
        push_int(&mut q, "limit", limit);
        self.get_query(&format!("v1/diagnosticSignatures/{}/logs", signature_id), &q)
            .await
    }
}
