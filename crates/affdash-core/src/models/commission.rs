use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{lenient_f64, Id, PageMeta, PersonSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum CommissionStatus {
    #[default]
    Pending,
    Approved,
    Released,
    Rejected,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CommissionAffiliate {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default)]
    pub referral_code: Option<String>,
    #[serde(default)]
    pub user: Option<PersonSummary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Referral {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub referred_user: Option<PersonSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Commission {
    pub id: Id,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rate: f64,
    #[serde(default)]
    pub status: CommissionStatus,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub affiliate: Option<CommissionAffiliate>,
    #[serde(default)]
    pub referral: Option<Referral>,
    #[serde(default)]
    #[cfg_attr(feature = "ts", ts(type = "any"))]
    pub metadata: Value,
    #[serde(default)]
    pub released_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CommissionsResponse {
    #[serde(default)]
    pub commissions: Vec<Commission>,
    #[serde(default)]
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CommissionResponse {
    #[serde(default)]
    pub commission: Option<Commission>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CommissionFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CommissionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}
