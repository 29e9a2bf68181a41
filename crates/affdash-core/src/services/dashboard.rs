//! Dashboard aggregates.

use chrono::{Duration, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::AffiliateService;
use crate::api::{ApiClient, ApiError, RequestDescriptor};
use crate::models::{
    AffiliateApplication, AffiliateStats, AffiliateTree, ApplicationStatus, DashboardStats,
    GraphData, GraphPeriod, PageParams, RecentApplication,
};
use crate::utils::parse_timestamp;

const STATS_PATH: &str = "/admin/dashboard/stats";
const GRAPH_PATH: &str = "/admin/dashboard/graph-data";
const AFFILIATE_STATS_PATH: &str = "/admin/dashboard/affiliate-stats";
const AFFILIATE_TREE_PATH: &str = "/admin/dashboard/affiliate-tree";

/// How far back "recent" applications reach.
const RECENT_APPLICATION_DAYS: i64 = 7;

#[derive(Serialize)]
struct GraphQuery {
    period: GraphPeriod,
}

#[derive(Serialize)]
struct TreeQuery<'q> {
    #[serde(skip_serializing_if = "Option::is_none")]
    affiliate_id: Option<&'q str>,
}

pub struct DashboardService<'a> {
    client: &'a ApiClient,
}

impl<'a> DashboardService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        Ok(self.client.get(STATS_PATH, &()).await?.data)
    }

    pub async fn graph_data(&self, period: GraphPeriod) -> Result<GraphData, ApiError> {
        Ok(self.client.get(GRAPH_PATH, &GraphQuery { period }).await?.data)
    }

    pub async fn affiliate_stats(&self) -> Result<AffiliateStats, ApiError> {
        let raw: Value = self.client.get(AFFILIATE_STATS_PATH, &()).await?.data;
        if raw.get("application_stats").is_none() {
            warn!("Affiliate stats response missing application_stats, using defaults");
        }
        Ok(AffiliateStats::from_raw(&raw))
    }

    /// Referral tree rooted at `affiliate_id`, or at the backend's default root.
    pub async fn affiliate_tree(&self, affiliate_id: Option<&str>) -> Result<AffiliateTree, ApiError> {
        let request = RequestDescriptor::get(AFFILIATE_TREE_PATH).query(&TreeQuery { affiliate_id })?;
        let raw: Value = self.client.send(request).await?.data;
        Ok(AffiliateTree::from_raw(&raw))
    }

    /// Pending applications submitted in the last week (first page only).
    pub async fn recent_applications(&self) -> Result<Vec<RecentApplication>, ApiError> {
        let response = AffiliateService::new(self.client)
            .applications(PageParams::default(), Some(ApplicationStatus::Pending))
            .await?;
        Ok(recent_since(
            &response.applications,
            Utc::now() - Duration::days(RECENT_APPLICATION_DAYS),
        ))
    }
}

/// Applications created at or after `cutoff`. Undated or unparseable
/// entries are dropped.
fn recent_since(
    applications: &[AffiliateApplication],
    cutoff: chrono::DateTime<Utc>,
) -> Vec<RecentApplication> {
    applications
        .iter()
        .filter(|app| {
            app.created_at
                .as_deref()
                .and_then(parse_timestamp)
                .is_some_and(|created| created >= cutoff)
        })
        .map(RecentApplication::from_application)
        .collect()
}
