//! Pipeline driver: ingest, classify, dedupe, persist, filter, format, deliver.

use crate::classify::RuleTable;
use crate::config::Config;
use crate::consts::store::DATE_FORMAT;
use crate::dedupe::dedupe;
use crate::digest::format_digest;
use crate::errors::AppError;
use crate::network::{deliver, DeliveryReport, Messenger};
use crate::recency::filter_recent;
use crate::record::Record;
use crate::store;
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};

/// Per-stage counts of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ingested: usize,
    pub loaded: usize,
    pub classified: usize,
    pub unique: usize,
    pub recent: usize,
    pub stored: bool,
    pub delivery: Option<DeliveryReport>,
}

/// Keep titles the rules accept and give them a posting date if they lack one
pub fn classify_all(raw: Vec<Record>, rules: &RuleTable, today: NaiveDate) -> Vec<Record> {
    let today = today.format(DATE_FORMAT).to_string();
    raw.into_iter()
        .filter(|record| {
            let verdict = rules.verdict(&record.title);
            if !verdict.is_accepted() {
                log::debug!("Rejected ({:?}): {}", verdict, record.title);
            }
            verdict.is_accepted()
        })
        .map(|mut record| {
            record.inject_default_date(&today);
            record
        })
        .collect()
}

/// Append every readable export to the raw store. Unreadable ones are skipped.
pub fn ingest(sources: &[PathBuf], raw_store: &Path, today: NaiveDate) -> usize {
    let mut total = 0;
    for source in sources {
        let records = match store::read(source) {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Skipping export: {}", e);
                continue;
            }
        };
        match store::append(raw_store, &records, today) {
            Ok(n) => {
                log::info!("Ingested {} records from {}", n, source.display());
                total += n;
            }
            Err(e) => log::error!("Cannot append to raw store: {}", e),
        }
    }
    total
}

pub async fn run(config: &Config, messenger: Option<&dyn Messenger>) -> Result<RunSummary, AppError> {
    run_at(config, messenger, Local::now().naive_local()).await
}

/// One full pass with a fixed clock. `None` prints the digest to stdout.
pub async fn run_at(
    config: &Config,
    messenger: Option<&dyn Messenger>,
    now: NaiveDateTime,
) -> Result<RunSummary, AppError> {
    let today = now.date();
    let mut summary = RunSummary {
        ingested: ingest(&config.ingest, &config.raw_store, today),
        ..RunSummary::default()
    };

    let raw = store::load_or_empty(&config.raw_store);
    summary.loaded = raw.len();

    let classified = classify_all(raw, &config.rules, today);
    summary.classified = classified.len();
    log::info!("Classified {} of {} listings as IT internships", summary.classified, summary.loaded);

    let unique = dedupe(classified);
    summary.unique = unique.len();
    log::info!("{} unique listings after dedup", summary.unique);
    summary.stored = store::save(&config.filtered_store, &unique);

    let recent = filter_recent(unique, config.window, today);
    summary.recent = recent.len();
    if recent.is_empty() {
        log::info!("No listings inside the window ({}), nothing to send", config.window);
        return Ok(summary);
    }

    let text = format_digest(&recent, config.max_entries, now);
    log::info!(
        "Digest holds {} of {} listings",
        recent.len().min(config.max_entries),
        recent.len()
    );

    let Some(messenger) = messenger else {
        println!("{}", text);
        return Ok(summary);
    };

    let report = deliver(messenger, &text, &config.delivery).await;
    summary.delivery = Some(report);
    if !report.is_success() {
        return Err(AppError::DeliveryFailed {
            parts: report.parts,
            sent: report.sent,
            failed: report.failed,
        });
    }
    Ok(summary)
}

/// Build summary line
pub fn build_summary(summary: &RunSummary) -> String {
    let delivery = match &summary.delivery {
        Some(report) => format!("{}/{} parts sent", report.sent, report.parts),
        None => "not sent".to_string(),
    };
    format!(
        "ingested {} | loaded {} | classified {} | unique {} | recent {} | stored {} | {}",
        summary.ingested,
        summary.loaded,
        summary.classified,
        summary.unique,
        summary.recent,
        if summary.stored { "yes" } else { "no" },
        delivery
    )
}
