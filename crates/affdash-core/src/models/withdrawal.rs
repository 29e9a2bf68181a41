use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{lenient_f64, Id, PageMeta, PersonSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    #[default]
    Pending,
    Approved,
    Completed,
    Rejected,
    Cancelled,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct WithdrawalAffiliate {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default)]
    pub user: Option<PersonSummary>,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub referral_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Wallet {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub balance: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pending_balance: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_earned: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_withdrawn: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct WithdrawnCommission {
    pub id: Id,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rate: f64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub released_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct WithdrawalRequest {
    pub id: Id,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "ts", ts(type = "Record<string, any>"))]
    pub payment_details: HashMap<String, Value>,
    #[serde(default)]
    pub status: WithdrawalStatus,
    #[serde(default)]
    pub processed_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub affiliate: Option<WithdrawalAffiliate>,
    #[serde(default)]
    pub wallet: Option<Wallet>,
    #[serde(default)]
    #[cfg_attr(feature = "ts", ts(type = "any"))]
    pub processed_by: Value,
    #[serde(default)]
    pub commissions: Vec<WithdrawnCommission>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct WithdrawalListResponse {
    #[serde(default)]
    pub withdrawal_requests: Vec<WithdrawalRequest>,
    #[serde(default)]
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct WithdrawalDetailResponse {
    pub withdrawal_request: WithdrawalRequest,
}

/// Result of approve / reject / complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct WithdrawalActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    #[cfg_attr(feature = "ts", ts(type = "any"))]
    pub withdrawal_request: Value,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WithdrawalFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WithdrawalStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_id: Option<i64>,
}
