//! Monthly performance reports — aggregation, synthesis, persistence,
//! backfill, and ranking.
//!
//! Flow: collect review texts for one calendar month → synthesize a
//! structured report via the LLM (or substitute the zero-score
//! placeholder when the month has no reviews) → persist one row per
//! (employee, month) → re-read for listings and the trailing-three-month
//! ranking.

pub mod aggregator;
pub mod backfill;
pub mod handlers;
pub mod prompts;
pub mod ranking;
pub mod store;
pub mod synthesizer;
