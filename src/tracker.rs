use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::aggregate::{AggregatedEntry, Aggregator};
use crate::classify::reference_date;
use crate::config::Config;
use crate::error::{FetchError, ReportError};
use crate::fetcher::Fetcher;
use crate::keywords::{self, KeywordCount};
use crate::report::{read_prior_report, render, sort_entries, write_report};

#[derive(Debug)]
pub enum FeedStatus {
    Fetched { entries: usize },
    Failed(FetchError),
}

#[derive(Debug)]
pub struct FeedOutcome {
    pub url: String,
    pub status: FeedStatus,
}

/// Result of one run: what happened to each feed and the rows that were written.
#[derive(Debug)]
pub struct RunSummary {
    pub feeds: Vec<FeedOutcome>,
    /// Entries in report order
    pub entries: Vec<AggregatedEntry>,
    pub report_path: PathBuf,
    /// Most frequent title words, most common first
    pub keywords: Vec<KeywordCount>,
}

impl RunSummary {
    pub fn failed_feeds(&self) -> impl Iterator<Item = &FeedOutcome> {
        self.feeds
            .iter()
            .filter(|outcome| matches!(outcome.status, FeedStatus::Failed(_)))
    }

    pub fn new_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_new).count()
    }

    pub fn today_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_today).count()
    }
}

pub struct TrendTracker {
    config: Config,
    fetcher: Fetcher,
}

impl TrendTracker {
    pub fn new(config: Config) -> reqwest::Result<Self> {
        let fetcher = Fetcher::new(config.fetch_timeout())?;
        Ok(Self { config, fetcher })
    }

    pub async fn run(&self) -> Result<RunSummary, ReportError> {
        self.run_at(Utc::now()).await
    }

    /// Fetch every feed, merge, sort and overwrite the report, treating `now`
    /// as the current time.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<RunSummary, ReportError> {
        let report_path = self.config.report_path.clone();
        let prior = read_prior_report(&report_path)?;
        let today = reference_date(&now, self.config.reference_offset());

        let mut aggregator = Aggregator::new(&prior, today);
        let mut feeds = Vec::with_capacity(self.config.feeds.len());

        for feed in &self.config.feeds {
            let status = match self.fetcher.fetch(feed).await {
                Ok(items) => {
                    let count = items.len();
                    aggregator.extend(feed, items);
                    info!("Added {} items from feed '{}'", count, feed.display_name());
                    FeedStatus::Fetched { entries: count }
                }
                Err(e) => {
                    error!("Failed to fetch feed '{}': {}", feed.display_name(), e);
                    FeedStatus::Failed(e)
                }
            };
            feeds.push(FeedOutcome {
                url: feed.url.clone(),
                status,
            });

            tokio::time::sleep(self.config.pause()).await;
        }

        let mut entries = aggregator.into_entries();
        sort_entries(&mut entries);

        write_report(&report_path, &render(&entries, self.config.max_title_length))?;

        let keywords = keywords::tally_entries(&entries, self.config.top_keywords);
        if let Some(path) = &self.config.keyword_report_path {
            write_report(path, &keywords::render(&keywords))?;
            info!("Keyword tally written to {}", path.display());
        }

        let summary = RunSummary {
            feeds,
            entries,
            report_path,
            keywords,
        };
        info!(
            entries = summary.entries.len(),
            new = summary.new_count(),
            today = summary.today_count(),
            failed_feeds = summary.failed_feeds().count(),
            "Report written to {}",
            summary.report_path.display()
        );
        Ok(summary)
    }
}
