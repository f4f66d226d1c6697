// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle label recorded by the fee backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "fully_paid")]
    FullyPaid,
    #[serde(rename = "partially_paid")]
    PartiallyPaid,
    #[serde(rename = "overdue")]
    Overdue,
    #[serde(rename = "OverPayed")]
    OverPayed,
    #[serde(rename = "waived")]
    Waived,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 5] = [
        PaymentStatus::FullyPaid,
        PaymentStatus::PartiallyPaid,
        PaymentStatus::Overdue,
        PaymentStatus::OverPayed,
        PaymentStatus::Waived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::FullyPaid => "fully_paid",
            PaymentStatus::PartiallyPaid => "partially_paid",
            PaymentStatus::Overdue => "overdue",
            PaymentStatus::OverPayed => "OverPayed",
            PaymentStatus::Waived => "waived",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
    Pending,
    Failed,
    Refunded,
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(TransactionStatus::Completed),
            "pending" => Ok(TransactionStatus::Pending),
            "failed" => Ok(TransactionStatus::Failed),
            "refunded" => Ok(TransactionStatus::Refunded),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomScholarship {
    pub r#type: Option<String>,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTransaction {
    pub transaction_id: Option<String>,
    pub amount: Decimal,
    pub payment_method: Option<String>,
    pub status: TransactionStatus,
    pub payment_date: Option<DateTime<Utc>>,
}

/// Read-only snapshot of a backend fee payment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeePayment {
    pub id: Option<String>,
    pub student: Option<String>,
    pub fee_plan: Option<String>,
    pub course: Option<String>,
    pub total_amount: Decimal,
    pub amount_paid: Decimal,
    pub scholarship_applied: Decimal,
    pub custom_scholarship: Option<CustomScholarship>,
    pub discount_applied: Decimal,
    pub late_fee_applied: Decimal,
    pub due_date: DateTime<Utc>,
    pub status: Option<PaymentStatus>,
    pub transactions: Vec<PaymentTransaction>,
}

impl FeePayment {
    /// A record with every amount zeroed, due at `due_date`.
    pub fn new(due_date: DateTime<Utc>) -> Self {
        FeePayment {
            id: None,
            student: None,
            fee_plan: None,
            course: None,
            total_amount: Decimal::ZERO,
            amount_paid: Decimal::ZERO,
            scholarship_applied: Decimal::ZERO,
            custom_scholarship: None,
            discount_applied: Decimal::ZERO,
            late_fee_applied: Decimal::ZERO,
            due_date,
            status: None,
            transactions: Vec::new(),
        }
    }

    pub fn custom_scholarship_amount(&self) -> Decimal {
        self.custom_scholarship
            .as_ref()
            .map(|c| c.amount)
            .unwrap_or(Decimal::ZERO)
    }

    /// Backend plus custom scholarship, `None` if the sum overflows.
    pub fn total_scholarship(&self) -> Option<Decimal> {
        self.scholarship_applied
            .checked_add(self.custom_scholarship_amount())
    }

    /// Sum of transactions the backend marked completed, `None` on overflow.
    pub fn completed_total(&self) -> Option<Decimal> {
        self.transactions
            .iter()
            .filter(|t| t.status == TransactionStatus::Completed)
            .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(t.amount))
    }

    pub fn label(&self) -> String {
        self.id.clone().unwrap_or_else(|| "(no id)".to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBalanceSummary {
    pub total_due: Decimal,
    pub balance: Decimal, // negative = credit
    pub is_overdue: bool,
}
