#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod distance;
mod matcher;
mod normalize;

pub use distance::{DpDistance, EditDistance, default_distance};
#[cfg(feature = "strsim")]
#[cfg_attr(docsrs, doc(cfg(feature = "strsim")))]
pub use distance::StrsimDistance;
pub use matcher::{
    InventoryProduct, MatchCandidate, MatchConfig, MatchMethod, Matcher, find_best_match,
};
pub use normalize::normalize;

/// Tracing target for matching operations.
pub const TRACING_TARGET: &str = "shelfscan_match";
