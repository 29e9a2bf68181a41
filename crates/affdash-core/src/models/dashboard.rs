//! Dashboard aggregates.
//!
//! The affiliate statistics and tree endpoints return shapes that drifted
//! from what the dashboard renders, so those two are normalized here from
//! raw JSON rather than deserialized directly.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{lenient_f64, AffiliateApplication};

const UNKNOWN_NAME: &str = "Unknown";
const NO_EMAIL: &str = "No email";
const DEFAULT_TIER: &str = "standard";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum GraphPeriod {
    Day,
    Week,
    Month,
    Year,
}

impl fmt::Display for GraphPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GraphPeriod::Day => "day",
            GraphPeriod::Week => "week",
            GraphPeriod::Month => "month",
            GraphPeriod::Year => "year",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UserCounts {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub active: u64,
    #[serde(default)]
    pub new_this_month: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AffiliateCounts {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pending_applications: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CommissionTotals {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_pending: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_paid: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct StatsBreakdown {
    #[serde(default)]
    pub users: UserCounts,
    #[serde(default)]
    pub affiliates: AffiliateCounts,
    #[serde(default)]
    pub commissions: CommissionTotals,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct DashboardStats {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub stats: StatsBreakdown,
}

/// Time series keyed by bucket label.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct GraphData {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub users: BTreeMap<String, f64>,
    #[serde(default)]
    pub affiliates: BTreeMap<String, f64>,
    #[serde(default)]
    pub commissions: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct StatsTotals {
    pub affiliates: u64,
    pub referred_users: u64,
    pub total_commissions: f64,
    pub average_commission: f64,
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct PerformanceData {
    #[serde(default)]
    pub registrations: BTreeMap<String, f64>,
    #[serde(default)]
    pub commissions: BTreeMap<String, f64>,
    #[serde(default)]
    pub conversion_rate: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct TopAffiliate {
    pub id: String,
    pub user_name: String,
    pub user_email: String,
    pub profile_image: Option<String>,
    pub tier: String,
    pub lifetime_earnings: f64,
    pub referrals: u64,
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Applicant {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RecentApplication {
    pub id: String,
    pub user: Applicant,
    pub tax_id: String,
    pub payment_method: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl RecentApplication {
    /// Build from an application of the affiliate-applications list.
    pub fn from_application(app: &AffiliateApplication) -> Self {
        let (split_first, split_last) = split_name(app.user_name.as_deref());
        let user = app.user.as_ref();
        let nonempty = |s: Option<&str>| s.filter(|v| !v.is_empty()).map(str::to_string);

        Self {
            id: app.id.to_string(),
            user: Applicant {
                first_name: nonempty(user.and_then(|u| u.first_name.as_deref()))
                    .unwrap_or(split_first),
                last_name: nonempty(user.and_then(|u| u.last_name.as_deref()))
                    .unwrap_or(split_last),
                email: nonempty(user.map(|u| u.email.as_str()))
                    .or_else(|| nonempty(app.user_email.as_deref()))
                    .unwrap_or_else(|| NO_EMAIL.to_string()),
                profile_image: user.and_then(|u| u.profile_image.clone()),
            },
            tax_id: app.tax_id.clone().unwrap_or_default(),
            payment_method: Some(
                app.payment_details
                    .get("payment_method")
                    .and_then(Value::as_str)
                    .unwrap_or("Not specified")
                    .to_string(),
            ),
            status: serde_json::to_value(app.status)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_else(|| "pending".to_string()),
            created_at: app
                .created_at
                .clone()
                .unwrap_or_else(|| Utc::now().to_rfc3339()),
        }
    }

    fn from_stats_entry(entry: &Value) -> Self {
        let (first_name, last_name) = split_name(entry.get("user_name").and_then(Value::as_str));
        Self {
            id: text(entry, "id").unwrap_or_default(),
            user: Applicant {
                first_name,
                last_name,
                email: text(entry, "user_email").unwrap_or_else(|| NO_EMAIL.to_string()),
                profile_image: text(entry, "profile_image"),
            },
            tax_id: text(entry, "tax_id").unwrap_or_default(),
            payment_method: None,
            status: text(entry, "status").unwrap_or_else(|| "pending".to_string()),
            created_at: text(entry, "created_at").unwrap_or_else(|| Utc::now().to_rfc3339()),
        }
    }
}

/// Affiliate program statistics as the dashboard renders them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AffiliateStats {
    pub success: bool,
    pub totals: StatsTotals,
    pub tiers: BTreeMap<String, u64>,
    pub performance_data: PerformanceData,
    pub top_affiliates: Vec<TopAffiliate>,
    pub recent_applications: Vec<RecentApplication>,
}

impl AffiliateStats {
    /// Normalize the `affiliate-stats` payload.
    ///
    /// Totals come from `application_stats.approved`; recent applications
    /// from `application_stats.recent`. Missing sections default to empty.
    pub fn from_raw(raw: &Value) -> Self {
        let app_stats = raw.get("application_stats");

        let totals = match app_stats {
            Some(stats) => StatsTotals {
                affiliates: stats.get("approved").and_then(Value::as_u64).unwrap_or(0),
                ..StatsTotals::default()
            },
            None => StatsTotals::default(),
        };

        let recent_applications = app_stats
            .and_then(|stats| stats.get("recent"))
            .and_then(Value::as_array)
            .map(|items| items.iter().map(RecentApplication::from_stats_entry).collect())
            .unwrap_or_default();

        let top_affiliates = raw
            .get("top_affiliates")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|aff| TopAffiliate {
                        id: text(aff, "id").unwrap_or_default(),
                        user_name: text(aff, "user_name").unwrap_or_else(|| UNKNOWN_NAME.to_string()),
                        user_email: text(aff, "user_email").unwrap_or_else(|| NO_EMAIL.to_string()),
                        profile_image: text(aff, "profile_image"),
                        tier: text(aff, "tier").unwrap_or_else(|| DEFAULT_TIER.to_string()),
                        lifetime_earnings: number(aff, "lifetime_earnings"),
                        referrals: aff.get("referral_count").and_then(Value::as_u64).unwrap_or(0),
                        conversion_rate: 0.0,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let tiers = raw
            .get("tiers")
            .and_then(|t| serde_json::from_value(t.clone()).ok())
            .unwrap_or_default();
        let performance_data = raw
            .get("performance_data")
            .and_then(|p| serde_json::from_value(p.clone()).ok())
            .unwrap_or_default();

        Self {
            success: true,
            totals,
            tiers,
            performance_data,
            top_affiliates,
            recent_applications,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AffiliateTreeNode {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile_image: Option<String>,
    pub tier: String,
    pub earnings: f64,
    pub referrals: u64,
    pub children: Vec<AffiliateTreeNode>,
}

impl AffiliateTreeNode {
    fn placeholder() -> Self {
        Self {
            id: String::new(),
            name: UNKNOWN_NAME.to_string(),
            email: NO_EMAIL.to_string(),
            profile_image: None,
            tier: DEFAULT_TIER.to_string(),
            earnings: 0.0,
            referrals: 0,
            children: Vec::new(),
        }
    }

    /// Map a backend tree node and its descendants.
    pub fn from_raw(node: &Value) -> Self {
        let user = node.get("user");
        let user_text = |key: &str| user.and_then(|u| text(u, key));
        Self {
            id: text(node, "id").unwrap_or_default(),
            name: user_text("name").unwrap_or_default(),
            email: user_text("email").unwrap_or_default(),
            profile_image: user_text("profile_image"),
            tier: text(node, "tier").unwrap_or_else(|| DEFAULT_TIER.to_string()),
            earnings: number(node, "earnings"),
            referrals: node
                .get("referred_users")
                .and_then(Value::as_array)
                .map(|r| r.len() as u64)
                .unwrap_or(0),
            children: node
                .get("children")
                .and_then(Value::as_array)
                .map(|children| children.iter().map(AffiliateTreeNode::from_raw).collect())
                .unwrap_or_default(),
        }
    }

    /// Number of nodes in this subtree, including itself.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(AffiliateTreeNode::size).sum::<usize>()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AffiliateTree {
    pub success: bool,
    pub root_affiliate: AffiliateTreeNode,
}

impl AffiliateTree {
    pub fn from_raw(raw: &Value) -> Self {
        let root_affiliate = match raw.get("tree") {
            Some(tree) if !tree.is_null() => AffiliateTreeNode::from_raw(tree),
            _ => AffiliateTreeNode::placeholder(),
        };
        Self {
            success: true,
            root_affiliate,
        }
    }
}

/// Split "First Last" into its first two words.
fn split_name(name: Option<&str>) -> (String, String) {
    match name.filter(|n| !n.trim().is_empty()) {
        Some(name) => {
            let mut parts = name.split_whitespace();
            let first = parts.next().unwrap_or(UNKNOWN_NAME).to_string();
            let last = parts.next().unwrap_or_default().to_string();
            (first, last)
        }
        None => (UNKNOWN_NAME.to_string(), String::new()),
    }
}

/// String field, accepting numbers as well (ids arrive as either).
fn text(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number(value: &Value, key: &str) -> f64 {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_affiliate_stats_from_application_stats() {
        let raw = json!({
            "application_stats": {
                "approved": 12,
                "recent": [
                    {"id": 4, "user_name": "Grace Hopper", "user_email": "grace@example.com", "status": "pending", "created_at": "2024-05-01T00:00:00Z"},
                    {"id": 5}
                ]
            },
            "top_affiliates": [
                {"id": 9, "user_name": "Alan T", "lifetime_earnings": "410.5", "referral_count": 7}
            ],
            "tiers": {"gold": 2, "standard": 10}
        });

        let stats = AffiliateStats::from_raw(&raw);
        assert!(stats.success);
        assert_eq!(stats.totals.affiliates, 12);
        assert_eq!(stats.totals.referred_users, 0);

        assert_eq!(stats.recent_applications.len(), 2);
        let first = &stats.recent_applications[0];
        assert_eq!(first.id, "4");
        assert_eq!(first.user.first_name, "Grace");
        assert_eq!(first.user.last_name, "Hopper");
        let second = &stats.recent_applications[1];
        assert_eq!(second.user.first_name, "Unknown");
        assert_eq!(second.user.email, "No email");
        assert_eq!(second.status, "pending");

        let top = &stats.top_affiliates[0];
        assert_eq!(top.tier, "standard");
        assert_eq!(top.user_email, "No email");
        assert_eq!(top.lifetime_earnings, 410.5);
        assert_eq!(top.referrals, 7);

        assert_eq!(stats.tiers.get("gold"), Some(&2));
        assert!(stats.performance_data.registrations.is_empty());
    }

    #[test]
    fn test_affiliate_stats_without_application_stats() {
        let stats = AffiliateStats::from_raw(&json!({"success": false}));
        assert_eq!(stats.totals, StatsTotals::default());
        assert!(stats.recent_applications.is_empty());
        assert!(stats.top_affiliates.is_empty());
    }

    #[test]
    fn test_affiliate_tree_mapping() {
        let raw = json!({
            "tree": {
                "id": 1,
                "user": {"name": "Root", "email": "root@example.com"},
                "tier": "gold",
                "earnings": 100.0,
                "referred_users": [{}, {}, {}],
                "children": [
                    {"id": 2, "user": {"name": "Child"}, "children": [{"id": 3}]}
                ]
            }
        });
        let tree = AffiliateTree::from_raw(&raw);
        let root = &tree.root_affiliate;
        assert_eq!(root.name, "Root");
        assert_eq!(root.tier, "gold");
        assert_eq!(root.referrals, 3);
        assert_eq!(root.children[0].tier, "standard");
        assert_eq!(root.children[0].children[0].id, "3");
        assert_eq!(root.size(), 3);

        let empty = AffiliateTree::from_raw(&json!({}));
        assert_eq!(empty.root_affiliate.name, "Unknown");
        assert!(empty.root_affiliate.children.is_empty());
    }

    #[test]
    fn test_graph_period_serializes_lowercase() {
        assert_eq!(serde_json::to_value(GraphPeriod::Week).unwrap(), json!("week"));
        assert_eq!(GraphPeriod::Year.to_string(), "year");
    }
}
