// src/report/snapshot.rs
use crate::poller::CheckResult;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::info;

pub fn snapshot_file_name(now: DateTime<Local>) -> String {
    format!("url_poll_results_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// Write `results` as a pretty-printed JSON array into `dir`, named after
/// the current local time. Returns the path written.
pub async fn write_snapshot<P: AsRef<Path>>(dir: P, results: &[CheckResult]) -> Result<PathBuf> {
    let path = dir.as_ref().join(snapshot_file_name(Local::now()));
    write_snapshot_to(&path, results).await?;
    Ok(path)
}

pub async fn write_snapshot_to(path: &Path, results: &[CheckResult]) -> Result<()> {
    let json = serde_json::to_string_pretty(results).context("Failed to serialize results")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Saved {} results to {}", results.len(), path.display());
    Ok(())
}

pub async fn read_snapshot<P: AsRef<Path>>(path: P) -> Result<Vec<CheckResult>> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid snapshot {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poller::{CheckError, CheckStatus};
    use chrono::TimeZone;

    #[test]
    fn test_file_name_pattern() {
        let now = Local.with_ymd_and_hms(2024, 12, 31, 23, 59, 1).unwrap();
        assert_eq!(snapshot_file_name(now), "url_poll_results_20241231_235901.json");
    }

    #[tokio::test]
    async fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let results = vec![
            CheckResult::from_response("a", "http://a", 200, 12.34),
            CheckResult::from_response("b", "http://b", 404, 0.5),
            CheckResult::from_error("c", "http://c", &CheckError::Connection),
            CheckResult::dispatch_failure("d", "http://d", "task 7 was cancelled"),
        ];

        let path = write_snapshot(dir.path(), &results).await.unwrap();
        assert!(path.starts_with(dir.path()));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("url_poll_results_"));
        assert!(name.ends_with(".json"));

        let loaded = read_snapshot(&path).await.unwrap();
        assert_eq!(loaded, results);
        assert_eq!(loaded[3].status, CheckStatus::Error);
    }

    #[tokio::test]
    async fn test_snapshot_is_indented_array_with_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let results = vec![CheckResult::from_error("x", "http://x", &CheckError::Timeout(10))];

        write_snapshot_to(&path, &results).await.unwrap();
        let text = std::fs::read_to_string(&path).unwrap();

        assert!(text.starts_with("[\n  {"));
        assert!(text.contains("\"status\": \"timeout\""));
        assert!(text.contains("\"status_code\": null"));
        assert!(text.contains("\"response_time_ms\": null"));
    }

    #[tokio::test]
    async fn test_write_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(write_snapshot(&missing, &[]).await.is_err());
    }
}
