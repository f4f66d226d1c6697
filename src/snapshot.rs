// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Decoding of fee payment records as the backend serves them.
//!
//! Amounts arrive as JSON numbers or, from form round-trips, numeric strings.
//! An absent or `null` amount counts as zero; anything present that is not a
//! non-negative decimal is rejected with the offending field name. Numbers are
//! read from their source text, never through `f64`, so every digit the
//! backend sent survives.

use crate::error::{FeeError, InputFault, Result};
use crate::models::{
    CustomScholarship, FeePayment, PaymentStatus, PaymentTransaction, TransactionStatus,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

impl FeePayment {
    pub fn from_json(value: &Value) -> Result<FeePayment> {
        let obj = value
            .as_object()
            .ok_or_else(|| FeeError::invalid("record", InputFault::NotAnObject))?;

        let due_date = decode_due_date(obj.get("dueDate"))?;
        let custom_scholarship = decode_custom_scholarship(obj.get("customScholarship"))?;
        let status = decode_status(obj.get("status"))?;
        let transactions = decode_transactions(obj.get("transactions"))?;

        Ok(FeePayment {
            id: record_id(value),
            student: label_of(obj.get("student")),
            fee_plan: label_of(obj.get("feePlan")),
            course: label_of(obj.get("course")),
            total_amount: decode_amount(obj.get("totalAmount"), "totalAmount")?,
            amount_paid: decode_amount(obj.get("amountPaid"), "amountPaid")?,
            scholarship_applied: decode_amount(
                obj.get("scholarshipApplied"),
                "scholarshipApplied",
            )?,
            custom_scholarship,
            discount_applied: decode_amount(obj.get("discountApplied"), "discountApplied")?,
            late_fee_applied: decode_amount(obj.get("lateFeeApplied"), "lateFeeApplied")?,
            due_date,
            status,
            transactions,
        })
    }
}

/// Accepts RFC 3339, naive ISO date-times (taken as UTC) and plain dates
/// (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Pull the list of payment records out of whatever envelope the backend
/// wrapped them in.
pub fn records_from_json(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => {
            if let Some(docs) = obj.remove("docs") {
                return records_from_json(docs);
            }
            if let Some(data) = obj.remove("data") {
                return records_from_json(data);
            }
            vec![Value::Object(obj)]
        }
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

pub fn decode_amount(value: Option<&Value>, field: &str) -> Result<Decimal> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(Decimal::ZERO),
        Some(Value::Number(n)) => parse_decimal_text(&n.to_string()),
        Some(Value::String(s)) => parse_decimal_text(s.trim()),
        Some(_) => None,
    };
    let amount = parsed.ok_or_else(|| {
        let raw = match value {
            Some(Value::String(s)) => s.clone(),
            Some(v) => v.to_string(),
            None => String::new(),
        };
        FeeError::invalid(field, InputFault::NotNumeric(raw))
    })?;
    if amount < Decimal::ZERO {
        return Err(FeeError::invalid(field, InputFault::Negative(amount)));
    }
    Ok(amount)
}

fn parse_decimal_text(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

fn decode_due_date(value: Option<&Value>) -> Result<DateTime<Utc>> {
    match value {
        None | Some(Value::Null) => Err(FeeError::invalid("dueDate", InputFault::Missing)),
        Some(Value::String(s)) => parse_timestamp(s)
            .ok_or_else(|| FeeError::invalid("dueDate", InputFault::Unparsable(s.clone()))),
        Some(other) => Err(FeeError::invalid(
            "dueDate",
            InputFault::Unparsable(other.to_string()),
        )),
    }
}

fn decode_custom_scholarship(value: Option<&Value>) -> Result<Option<CustomScholarship>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(obj)) => Ok(Some(CustomScholarship {
            r#type: label_of(obj.get("type")),
            amount: decode_amount(obj.get("amount"), "customScholarship.amount")?,
        })),
        Some(_) => Err(FeeError::invalid(
            "customScholarship",
            InputFault::NotAnObject,
        )),
    }
}

fn decode_status(value: Option<&Value>) -> Result<Option<PaymentStatus>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<PaymentStatus>()
            .map(Some)
            .map_err(|label| FeeError::invalid("status", InputFault::UnknownLabel(label))),
        Some(other) => Err(FeeError::invalid(
            "status",
            InputFault::UnknownLabel(other.to_string()),
        )),
    }
}

fn decode_transactions(value: Option<&Value>) -> Result<Vec<PaymentTransaction>> {
    let items = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(FeeError::invalid("transactions", InputFault::NotAnObject)),
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let obj = item.as_object().ok_or_else(|| {
                FeeError::invalid(format!("transactions[{}]", i), InputFault::NotAnObject)
            })?;
            decode_transaction(i, obj)
        })
        .collect()
}

fn decode_transaction(i: usize, obj: &Map<String, Value>) -> Result<PaymentTransaction> {
    let status = match obj.get("status") {
        None | Some(Value::Null) => TransactionStatus::Completed,
        Some(v) => {
            let raw = v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string());
            raw.trim().parse::<TransactionStatus>().map_err(|label| {
                FeeError::invalid(
                    format!("transactions[{}].status", i),
                    InputFault::UnknownLabel(label),
                )
            })?
        }
    };
    Ok(PaymentTransaction {
        transaction_id: label_of(obj.get("transactionId")),
        amount: decode_amount(obj.get("amount"), &format!("transactions[{}].amount", i))?,
        payment_method: label_of(obj.get("paymentMethod")),
        status,
        payment_date: decode_payment_date(i, obj.get("paymentDate"))?,
    })
}

fn decode_payment_date(i: usize, value: Option<&Value>) -> Result<Option<DateTime<Utc>>> {
    let field = || format!("transactions[{}].paymentDate", i);
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => parse_timestamp(s)
            .map(Some)
            .ok_or_else(|| FeeError::invalid(field(), InputFault::Unparsable(s.clone()))),
        Some(other) => Err(FeeError::invalid(
            field(),
            InputFault::Unparsable(other.to_string()),
        )),
    }
}

/// Backend identity of a raw record: `_id`, else `id`, given as a string or
/// a number.
pub fn record_id(value: &Value) -> Option<String> {
    ["_id", "id"].into_iter().find_map(|key| match value.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Ids arrive either as plain strings or as populated objects.
fn label_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(obj) => obj
            .get("name")
            .or_else(|| obj.get("_id"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}
