// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The fee balance calculator.
//!
//! ```text
//! total_due = total_amount - (scholarship + custom scholarship) - discount + late fee
//! balance   = total_due - amount_paid
//! overdue   = now > due_date && balance > 0
//! ```
//!
//! Scholarships and discounts always reduce the obligation and late fees always
//! raise it. Every caller goes through [`compute_summary`] so list views and
//! detail views can never disagree.

use crate::error::{FeeError, InputFault, Result};
use crate::models::{FeeBalanceSummary, FeePayment, PaymentStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

pub fn compute_summary(payment: &FeePayment, now: DateTime<Utc>) -> Result<FeeBalanceSummary> {
    check_non_negative(payment)?;

    let overflow = |field: &str| FeeError::invalid(field, InputFault::Overflow);
    let scholarship = payment
        .total_scholarship()
        .ok_or_else(|| overflow("customScholarship.amount"))?;
    let total_due = payment
        .total_amount
        .checked_sub(scholarship)
        .ok_or_else(|| overflow("scholarshipApplied"))?
        .checked_sub(payment.discount_applied)
        .ok_or_else(|| overflow("discountApplied"))?
        .checked_add(payment.late_fee_applied)
        .ok_or_else(|| overflow("lateFeeApplied"))?;
    let balance = total_due
        .checked_sub(payment.amount_paid)
        .ok_or_else(|| overflow("amountPaid"))?;
    let is_overdue = now > payment.due_date && balance > Decimal::ZERO;

    Ok(FeeBalanceSummary {
        total_due,
        balance,
        is_overdue,
    })
}

pub fn compute_summary_now(payment: &FeePayment) -> Result<FeeBalanceSummary> {
    compute_summary(payment, Utc::now())
}

/// Decode a raw backend record and summarize it in one step.
pub fn summarize_record(
    record: &Value,
    now: DateTime<Utc>,
) -> Result<(FeePayment, FeeBalanceSummary)> {
    let payment = FeePayment::from_json(record)?;
    let summary = compute_summary(&payment, now)?;
    tracing::debug!(
        id = %payment.label(),
        total_due = %summary.total_due,
        balance = %summary.balance,
        overdue = summary.is_overdue,
        "summarized fee payment"
    );
    Ok((payment, summary))
}

fn check_non_negative(payment: &FeePayment) -> Result<()> {
    let fields = [
        ("totalAmount", payment.total_amount),
        ("amountPaid", payment.amount_paid),
        ("scholarshipApplied", payment.scholarship_applied),
        ("customScholarship.amount", payment.custom_scholarship_amount()),
        ("discountApplied", payment.discount_applied),
        ("lateFeeApplied", payment.late_fee_applied),
    ];
    for (field, value) in fields {
        if value < Decimal::ZERO {
            return Err(FeeError::invalid(field, InputFault::Negative(value)));
        }
    }
    Ok(())
}

impl FeeBalanceSummary {
    /// Status implied by the numbers alone. A backend `waived` label wins,
    /// since waiving is a workflow decision rather than a balance.
    pub fn effective_status(&self, recorded: Option<PaymentStatus>) -> PaymentStatus {
        if recorded == Some(PaymentStatus::Waived) {
            return PaymentStatus::Waived;
        }
        if self.balance < Decimal::ZERO {
            PaymentStatus::OverPayed
        } else if self.balance.is_zero() {
            PaymentStatus::FullyPaid
        } else if self.is_overdue {
            PaymentStatus::Overdue
        } else {
            PaymentStatus::PartiallyPaid
        }
    }

    pub fn is_credit(&self) -> bool {
        self.balance < Decimal::ZERO
    }
}
