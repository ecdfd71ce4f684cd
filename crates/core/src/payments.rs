use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::payment::{Payment, PaymentStatus, PaymentType};

/// Totals shown on the admin donations screen. Only paid payments count
/// towards any total. Totals saturate at `i64::MAX`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub total_donations: i64,
    pub total_offerings: i64,
    pub by_category: BTreeMap<String, i64>,
    pub unpaid_count: u64,
    pub failed_count: u64,
}

pub fn summarize(payments: &[Payment]) -> PaymentSummary {
    let mut summary = PaymentSummary::default();

    for payment in payments {
        match payment.status {
            PaymentStatus::Unpaid => summary.unpaid_count += 1,
            PaymentStatus::Failed => summary.failed_count += 1,
            PaymentStatus::Paid => match payment.payment_type {
                PaymentType::Offering => {
                    summary.total_offerings = summary.total_offerings.saturating_add(payment.amount)
                }
                PaymentType::Donation => {
                    summary.total_donations =
                        summary.total_donations.saturating_add(payment.amount);
                    if let Some(category) = payment.category.as_deref().filter(|c| !c.is_empty()) {
                        let total = summary.by_category.entry(category.to_string()).or_default();
                        *total = total.saturating_add(payment.amount);
                    }
                }
            },
        }
    }

    summary
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub raised: i64,
    pub target: i64,
    /// Whole percent of the target reached, capped at 100.
    pub percent: u8,
}

impl GoalProgress {
    pub fn compute(target: i64, raised: i64) -> Self {
        let raised = raised.max(0);
        let percent = if target <= 0 {
            0
        } else {
            (i128::from(raised) * 100 / i128::from(target)).min(100) as u8
        };
        Self {
            raised,
            target,
            percent,
        }
    }

    pub fn is_reached(&self) -> bool {
        self.target > 0 && self.raised >= self.target
    }
}
