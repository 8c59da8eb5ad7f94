// src/report/console.rs
use crate::poller::{CheckResult, CheckStatus};
use chrono::{DateTime, Local};
use std::io::{self, Write};

const RULE_WIDTH: usize = 80;

/// Human-readable summary of a poll run.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    show_details: bool,
}

impl ConsoleReporter {
    pub fn new(show_details: bool) -> Self {
        Self { show_details }
    }

    /// Print the report to stdout.
    pub fn print(&self, results: &[CheckResult]) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.render(results, Local::now(), &mut out)?;
        out.flush()
    }

    pub fn render<W: Write>(
        &self,
        results: &[CheckResult],
        now: DateTime<Local>,
        out: &mut W,
    ) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(out)?;
        writeln!(out, "{}", rule)?;
        writeln!(out, "URL POLLING RESULTS - {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(out, "{}", rule)?;

        let up = results
            .iter()
            .filter(|r| r.status == CheckStatus::Up)
            .count();
        writeln!(out, "Summary: {}/{} URLs are responding", up, results.len())?;
        writeln!(out)?;

        for result in results {
            writeln!(
                out,
                "{} {:<30} | {:<50}",
                symbol(result.status),
                result.name,
                result.url
            )?;

            if self.show_details {
                if let Some(code) = result.status_code {
                    writeln!(out, "   Status Code: {}", code)?;
                }
                // Debug formatting keeps the `.0` on whole milliseconds.
                if let Some(ms) = result.response_time_ms.filter(|ms| *ms > 0.0) {
                    writeln!(out, "   Response Time: {:?}ms", ms)?;
                }
                if let Some(error) = &result.error {
                    writeln!(out, "   Error: {}", error)?;
                }
                writeln!(out)?;
            }
        }

        Ok(())
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(true)
    }
}

pub fn symbol(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Up => "✅",
        CheckStatus::Timeout => "⏰",
        CheckStatus::ConnectionError => "🔌",
        CheckStatus::Redirect => "↗️",
        CheckStatus::ClientError => "4️⃣",
        CheckStatus::ServerError => "5️⃣",
        CheckStatus::Error => "❌",
        CheckStatus::Unknown => "❓",
    }
}
