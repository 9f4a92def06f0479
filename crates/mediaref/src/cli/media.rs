//! Hydrate and resolve command handlers.

use super::commands::OutputFormat;
use mediaref::{
    ItemOutcome, ItemReport, JsonError, MEDIA_UNAVAILABLE, MediaEngine, MediarefConfig,
    MediarefResult, PersistenceMethod, Resolution, Strategy,
};
use serde::Serialize;
use std::path::Path;

/// One line of a hydration report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportRow {
    id: String,
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    persistence_method: Option<PersistenceMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    strategy: Option<Strategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ReportRow {
    fn resolved(id: &str, resolution: &Resolution) -> Self {
        Self {
            id: id.to_string(),
            outcome: "resolved",
            url: Some(resolution.url.clone()),
            persistence_method: Some(resolution.persistence_method),
            strategy: Some(resolution.strategy),
            error: None,
        }
    }

    fn bare(id: &str, outcome: &'static str) -> Self {
        Self {
            id: id.to_string(),
            outcome,
            url: None,
            persistence_method: None,
            strategy: None,
            error: None,
        }
    }

    fn detail(&self) -> String {
        match (&self.url, &self.error) {
            (Some(url), _) => format!(
                "{} via {} ({})",
                shorten(url),
                self.strategy.map(|s| s.to_string()).unwrap_or_default(),
                self.persistence_method
                    .map(|m| m.to_string())
                    .unwrap_or_default()
            ),
            (None, Some(error)) => error.clone(),
            (None, None) => String::new(),
        }
    }
}

impl From<&ItemReport> for ReportRow {
    fn from(report: &ItemReport) -> Self {
        match &report.outcome {
            ItemOutcome::Resolved(resolution) => Self::resolved(&report.item_id, resolution),
            ItemOutcome::Skipped => Self::bare(&report.item_id, "skipped"),
            ItemOutcome::Discarded => Self::bare(&report.item_id, "discarded"),
            ItemOutcome::Failed(e) => Self {
                error: Some(format!("{}: {}", MEDIA_UNAVAILABLE, e.attempts.join(", "))),
                ..Self::bare(&report.item_id, "failed")
            },
        }
    }
}

/// Data URLs run to megabytes; keep human output on one line.
fn shorten(url: &str) -> String {
    match url.char_indices().nth(60) {
        Some((end, _)) => format!("{}...", &url[..end]),
        None => url.to_string(),
    }
}

fn to_json<T: Serialize>(value: &T) -> MediarefResult<String> {
    Ok(serde_json::to_string_pretty(value).map_err(|e| JsonError::new(e.to_string()))?)
}

/// Hydrate every item in `items_path` and print a report.
pub async fn handle_hydrate(
    config: &MediarefConfig,
    items_path: &Path,
    format: OutputFormat,
) -> MediarefResult<()> {
    let items = MediaEngine::load_items(items_path).await?;
    let engine = MediaEngine::new(config, items).await?;

    let report = engine.hydrate_all().await;
    let rows: Vec<ReportRow> = report.items.iter().map(ReportRow::from).collect();

    match format {
        OutputFormat::Json => println!("{}", to_json(&rows)?),
        OutputFormat::Human => {
            println!("{:-<80}", "");
            for row in &rows {
                println!("{:<24} {:<10} {}", row.id, row.outcome, row.detail());
            }
            println!("{:-<80}", "");
            println!(
                "Resolved: {}  Failed: {}  Skipped: {}  Minted: {}",
                report.resolved(),
                report.failed(),
                report.skipped(),
                report.minted
            );
        }
    }

    let revoked = engine.revoke_all().await;
    tracing::debug!(revoked, "Released minted object URLs");
    Ok(())
}

/// Resolve one item and print the result.
pub async fn handle_resolve(
    config: &MediarefConfig,
    items_path: &Path,
    id: &str,
    format: OutputFormat,
) -> MediarefResult<()> {
    let items = MediaEngine::load_items(items_path).await?;
    let engine = MediaEngine::new(config, items).await?;

    engine.item(id).await?;
    let row = match engine.resolve(id).await {
        Ok(Some(resolution)) => ReportRow::resolved(id, &resolution),
        Ok(None) => ReportRow::bare(id, "removed"),
        Err(e) => ReportRow {
            error: Some(format!("{}: {}", MEDIA_UNAVAILABLE, e.attempts.join(", "))),
            ..ReportRow::bare(id, "failed")
        },
    };

    match format {
        OutputFormat::Json => println!("{}", to_json(&row)?),
        OutputFormat::Human => println!("{:<24} {:<10} {}", row.id, row.outcome, row.detail()),
    }

    engine.revoke_all().await;
    Ok(())
}
