#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod receipt;
mod scan;

pub use receipt::{ReceiptFields, parse_receipt, parse_receipt_text};
pub use scan::{MoneyMention, scan_dates, scan_money};

/// Tracing target for extraction operations.
pub const TRACING_TARGET: &str = "shelfscan_extract";
