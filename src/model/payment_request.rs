use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{PersonRef, RequestStatus, flexible_date};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub project_name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub purpose: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, with = "flexible_date::option")]
    pub required_by_date: Option<NaiveDate>,
    #[serde(default)]
    pub document_url: String,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee: Option<PersonRef>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub project_name: String,
    pub department: String,
    pub purpose: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "flexible_date")]
    pub required_by_date: NaiveDate,
    pub document_url: String,
}

impl CreatePaymentRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.project_name.trim().is_empty() {
            return Err("Project name is required".to_string());
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err("Amount must be greater than zero".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentStatusUpdate {
    pub status: RequestStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_without_optional_fields() {
        let json = r#"{
            "_id": "p1",
            "projectName": "Atlas",
            "amount": 1250.5,
            "status": "hold",
            "requiredByDate": "2026-11-01T00:00:00.000Z"
        }"#;
        let req: PaymentRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.status, RequestStatus::Hold);
        assert!(req.required_by_date.is_some());
        assert!(req.employee.is_none());
    }

    #[test]
    fn rejects_non_positive_amount() {
        let req = CreatePaymentRequest {
            project_name: "Atlas".into(),
            department: "Ops".into(),
            purpose: "Hardware".into(),
            amount: 0.0,
            description: None,
            required_by_date: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
            document_url: String::new(),
        };
        assert!(req.validate().is_err());
    }
}
