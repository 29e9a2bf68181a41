use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{lenient_f64, Id, PageMeta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// User summary nested in applications, commissions and withdrawals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct PersonSummary {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl PersonSummary {
    pub fn full_name(&self) -> String {
        let name = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        );
        name.trim().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AffiliateApplication {
    pub id: Id,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "ts", ts(type = "Record<string, any>"))]
    pub payment_details: HashMap<String, Value>,
    #[serde(default)]
    pub user: Option<PersonSummary>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub approved_by: Option<PersonSummary>,
    #[serde(default)]
    pub approved_at: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ApplicationsResponse {
    #[serde(default)]
    pub applications: Vec<AffiliateApplication>,
    #[serde(default)]
    pub meta: PageMeta,
}

/// Single application. The backend answers either wrapped in
/// `application` or with the bare object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(untagged)]
pub enum ApplicationResponse {
    Wrapped { application: AffiliateApplication },
    Bare(AffiliateApplication),
}

impl ApplicationResponse {
    pub fn into_application(self) -> AffiliateApplication {
        match self {
            ApplicationResponse::Wrapped { application } => application,
            ApplicationResponse::Bare(application) => application,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Affiliate {
    pub id: Id,
    #[serde(default)]
    pub referral_code: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub user: Option<PersonSummary>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lifetime_earnings: f64,
    #[serde(default)]
    pub referral_count: u64,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Affiliate {
    pub fn email(&self) -> Option<&str> {
        self.user
            .as_ref()
            .map(|u| u.email.as_str())
            .filter(|e| !e.is_empty())
            .or(self.user_email.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AffiliatesResponse {
    #[serde(default)]
    pub affiliates: Vec<Affiliate>,
    #[serde(default)]
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_response_shapes() {
        let wrapped: ApplicationResponse =
            serde_json::from_str(r#"{"application": {"id": 5, "status": "approved"}}"#).unwrap();
        assert_eq!(wrapped.into_application().status, ApplicationStatus::Approved);

        let bare: ApplicationResponse = serde_json::from_str(
            r#"{"id": 6, "tax_id": "12-345", "payment_details": {"paypal_email": "a@b.c"}}"#,
        )
        .unwrap();
        let app = bare.into_application();
        assert_eq!(app.id, Id::Num(6));
        assert_eq!(app.status, ApplicationStatus::Pending);
        assert_eq!(
            app.payment_details.get("paypal_email").and_then(Value::as_str),
            Some("a@b.c")
        );
    }

    #[test]
    fn test_affiliate_email_fallback() {
        let affiliate: Affiliate =
            serde_json::from_str(r#"{"id": 1, "user_email": "aff@example.com"}"#).unwrap();
        assert_eq!(affiliate.email(), Some("aff@example.com"));
    }
}
