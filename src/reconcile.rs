// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Cross-checks between what the backend recorded and what the numbers say.
//!
//! Nothing here is an error. The derived summary is authoritative for balance
//! math and the backend status stays authoritative for workflow, so a mismatch
//! is only reported for a person to look at.

use crate::models::{FeeBalanceSummary, FeePayment, PaymentStatus};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    StaleOverdue,
    PaidWithBalance,
    UnflaggedOverdue,
    UnrecordedOverpayment,
    OverpaymentNotReflected,
    PaidAmountMismatch,
}

impl AdvisoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisoryKind::StaleOverdue => "stale_overdue",
            AdvisoryKind::PaidWithBalance => "paid_with_balance",
            AdvisoryKind::UnflaggedOverdue => "unflagged_overdue",
            AdvisoryKind::UnrecordedOverpayment => "unrecorded_overpayment",
            AdvisoryKind::OverpaymentNotReflected => "overpayment_not_reflected",
            AdvisoryKind::PaidAmountMismatch => "paid_amount_mismatch",
        }
    }
}

impl fmt::Display for AdvisoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub kind: AdvisoryKind,
    pub message: String,
}

impl Advisory {
    fn new(kind: AdvisoryKind, message: String) -> Self {
        Advisory { kind, message }
    }
}

pub fn reconcile(payment: &FeePayment, summary: &FeeBalanceSummary) -> Vec<Advisory> {
    let mut out = Vec::new();
    let recorded = payment.status;
    let balance = summary.balance.round_dp(2);

    // waived payments are not collected, so only data problems are worth raising
    if recorded != Some(PaymentStatus::Waived) {
        if recorded == Some(PaymentStatus::Overdue) && summary.balance <= Decimal::ZERO {
            out.push(Advisory::new(
                AdvisoryKind::StaleOverdue,
                format!("recorded overdue but balance is {}", balance),
            ));
        }
        if recorded == Some(PaymentStatus::FullyPaid) && summary.balance > Decimal::ZERO {
            out.push(Advisory::new(
                AdvisoryKind::PaidWithBalance,
                format!("recorded fully paid but {} is still owed", balance),
            ));
        }
        if summary.is_overdue && matches!(recorded, None | Some(PaymentStatus::PartiallyPaid)) {
            out.push(Advisory::new(
                AdvisoryKind::UnflaggedOverdue,
                format!(
                    "past due since {} with {} owed, not recorded overdue",
                    payment.due_date.format("%Y-%m-%d"),
                    balance
                ),
            ));
        }
        if summary.balance < Decimal::ZERO && recorded != Some(PaymentStatus::OverPayed) {
            out.push(Advisory::new(
                AdvisoryKind::UnrecordedOverpayment,
                format!("overpaid by {} but not recorded OverPayed", -balance),
            ));
        }
        if recorded == Some(PaymentStatus::OverPayed) && summary.balance >= Decimal::ZERO {
            out.push(Advisory::new(
                AdvisoryKind::OverpaymentNotReflected,
                format!("recorded OverPayed but balance is {}", balance),
            ));
        }
    }

    if !payment.transactions.is_empty() {
        match payment.completed_total() {
            Some(completed) if completed == payment.amount_paid => {}
            Some(completed) => out.push(Advisory::new(
                AdvisoryKind::PaidAmountMismatch,
                format!(
                    "amountPaid is {} but completed transactions sum to {}",
                    payment.amount_paid.round_dp(2),
                    completed.round_dp(2)
                ),
            )),
            None => out.push(Advisory::new(
                AdvisoryKind::PaidAmountMismatch,
                format!(
                    "amountPaid is {} but completed transactions sum past the largest amount",
                    payment.amount_paid.round_dp(2)
                ),
            )),
        }
    }

    out
}
