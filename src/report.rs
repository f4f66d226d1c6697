// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{FeeError, InputFault, Result};
use crate::models::{FeeBalanceSummary, FeePayment, PaymentStatus};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Dashboard totals across a set of fee payments.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeReport {
    pub payments: usize,
    pub invalid: usize,
    pub total_billed: Decimal,
    pub total_scholarships: Decimal,
    pub total_discounts: Decimal,
    pub total_fines: Decimal,
    pub total_due: Decimal,
    pub total_collected: Decimal,
    pub outstanding: Decimal,
    pub credit: Decimal,
    pub overdue_count: usize,
    pub overdue_amount: Decimal,
    pub waived_count: usize,
    pub by_status: BTreeMap<String, usize>,
}

impl FeeReport {
    pub fn build<'a, I>(entries: I) -> Result<FeeReport>
    where
        I: IntoIterator<Item = (&'a FeePayment, &'a FeeBalanceSummary)>,
    {
        let mut r = FeeReport::default();
        for (payment, summary) in entries {
            r.add(payment, summary)?;
        }
        Ok(r)
    }

    /// Fold one summarized payment into the totals. On overflow the report is
    /// left as it was and the error names the total that ran out of range.
    pub fn add(&mut self, payment: &FeePayment, summary: &FeeBalanceSummary) -> Result<()> {
        let scholarship = payment
            .total_scholarship()
            .ok_or_else(|| FeeError::invalid("customScholarship.amount", InputFault::Overflow))?;
        let status = summary.effective_status(payment.status);

        let mut next = self.clone();
        next.payments += 1;
        accumulate(&mut next.total_billed, payment.total_amount, "totalBilled")?;
        accumulate(&mut next.total_scholarships, scholarship, "totalScholarships")?;
        accumulate(&mut next.total_discounts, payment.discount_applied, "totalDiscounts")?;
        accumulate(&mut next.total_fines, payment.late_fee_applied, "totalFines")?;
        accumulate(&mut next.total_due, summary.total_due, "totalDue")?;
        accumulate(&mut next.total_collected, payment.amount_paid, "totalCollected")?;
        *next.by_status.entry(status.to_string()).or_insert(0) += 1;

        if summary.balance < Decimal::ZERO {
            accumulate(&mut next.credit, -summary.balance, "credit")?;
        }
        if status == PaymentStatus::Waived {
            next.waived_count += 1;
        } else {
            if summary.balance > Decimal::ZERO {
                accumulate(&mut next.outstanding, summary.balance, "outstanding")?;
            }
            if summary.is_overdue {
                next.overdue_count += 1;
                accumulate(&mut next.overdue_amount, summary.balance, "overdueAmount")?;
            }
        }

        *self = next;
        Ok(())
    }

    pub fn add_invalid(&mut self) {
        self.invalid += 1;
    }
}

fn accumulate(total: &mut Decimal, amount: Decimal, field: &str) -> Result<()> {
    *total = total
        .checked_add(amount)
        .ok_or_else(|| FeeError::invalid(field, InputFault::Overflow))?;
    Ok(())
}
