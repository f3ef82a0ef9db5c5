//! Bounty Trends - a bug bounty feed tracker
//!
//! Polls a fixed set of RSS feeds, merges entries that appear in more than one
//! feed, flags entries that are new since the last report or published today,
//! and writes the result as a sorted markdown table, optionally followed by a
//! tally of the most frequent title keywords.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod keywords;
pub mod report;
pub mod tracker;
