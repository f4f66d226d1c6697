// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Errors raised while decoding or summarizing a fee payment record.

use rust_decimal::Decimal;
use thiserror::Error;

/// What was wrong with a single field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputFault {
    #[error("value '{0}' is not numeric")]
    NotNumeric(String),

    #[error("value {0} is negative")]
    Negative(Decimal),

    #[error("value is missing")]
    Missing,

    #[error("value '{0}' cannot be parsed as a date")]
    Unparsable(String),

    #[error("unknown label '{0}'")]
    UnknownLabel(String),

    #[error("expected a JSON object")]
    NotAnObject,

    #[error("amount is too large to represent")]
    Overflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeeError {
    #[error("invalid input in '{field}': {fault}")]
    InvalidInput { field: String, fault: InputFault },
}

impl FeeError {
    pub fn invalid(field: impl Into<String>, fault: InputFault) -> Self {
        FeeError::InvalidInput {
            field: field.into(),
            fault,
        }
    }

    pub fn field(&self) -> &str {
        match self {
            FeeError::InvalidInput { field, .. } => field,
        }
    }

    pub fn fault(&self) -> &InputFault {
        match self {
            FeeError::InvalidInput { fault, .. } => fault,
        }
    }
}

pub type Result<T> = std::result::Result<T, FeeError>;
