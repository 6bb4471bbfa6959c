//! Internship digest: classify scraped listings, keep the fresh ones and post
//! them to a Telegram chat.

pub mod classify;
pub mod config;
pub mod consts;
pub mod dedupe;
pub mod digest;
pub mod errors;
pub mod logic;
pub mod network;
pub mod recency;
pub mod record;
pub mod store;
