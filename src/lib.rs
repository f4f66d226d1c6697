// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod calc;
pub mod cli;
pub mod commands;
pub mod db;
pub mod error;
pub mod models;
pub mod reconcile;
pub mod report;
pub mod snapshot;
pub mod utils;

pub use calc::{compute_summary, compute_summary_now, summarize_record};
pub use error::{FeeError, InputFault};
pub use models::{FeeBalanceSummary, FeePayment, PaymentStatus};
