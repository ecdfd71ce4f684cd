use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::text_enum;
use crate::{
    errors::{ParishError, ParishResult},
    payments::{GoalProgress, PaymentSummary},
};

text_enum! {
    pub enum PaymentType {
        Donation => "donation",
        Offering => "offering",
    }
}

text_enum! {
    pub enum PaymentStatus {
        Paid => "paid",
        Unpaid => "unpaid",
        Failed => "failed",
    }
}

/// Largest accepted payment or goal target: ten billion naira in kobo.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Amounts are integer minor units (kobo).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_id: Option<Uuid>,
    pub amount: i64,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    pub category: Option<String>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    pub amount: i64,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    pub category: Option<String>,
    pub goal_id: Option<Uuid>,
}

impl CreatePaymentRequest {
    pub fn validate(&self) -> ParishResult<()> {
        if self.amount <= 0 {
            return Err(ParishError::Validation("Amount must be greater than 0".to_string()));
        }
        if self.amount > MAX_AMOUNT {
            return Err(ParishError::Validation(format!(
                "Amount cannot exceed {}",
                MAX_AMOUNT
            )));
        }
        if self.goal_id.is_some() && self.payment_type != PaymentType::Donation {
            return Err(ParishError::Validation(
                "Only donations can be made towards a fundraising goal".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePaymentStatusRequest {
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundraisingGoal {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub target_amount: i64,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalResponse {
    #[serde(flatten)]
    pub goal: FundraisingGoal,
    pub progress: GoalProgress,
}

/// Admin donations screen: paid totals plus progress of every goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOverview {
    #[serde(flatten)]
    pub summary: PaymentSummary,
    pub goals: Vec<GoalResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGoalRequest {
    pub title: String,
    pub description: Option<String>,
    pub target_amount: i64,
    pub end_date: Option<NaiveDate>,
}

impl CreateGoalRequest {
    pub fn validate(&self) -> ParishResult<()> {
        if self.title.trim().is_empty() {
            return Err(ParishError::Validation("Goal title is required".to_string()));
        }
        validate_target(self.target_amount)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGoalRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_amount: Option<i64>,
    pub end_date: Option<NaiveDate>,
}

impl UpdateGoalRequest {
    pub fn validate(&self) -> ParishResult<()> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(ParishError::Validation("Goal title is required".to_string()));
            }
        }
        match self.target_amount {
            Some(target) => validate_target(target),
            None => Ok(()),
        }
    }
}

fn validate_target(target: i64) -> ParishResult<()> {
    if target <= 0 {
        return Err(ParishError::Validation(
            "Target amount must be greater than 0".to_string(),
        ));
    }
    if target > MAX_AMOUNT {
        return Err(ParishError::Validation(format!(
            "Target amount cannot exceed {}",
            MAX_AMOUNT
        )));
    }
    Ok(())
}
