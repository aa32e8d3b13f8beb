//! Remediation reporter: console text over structured probe results
//!
//! Pure formatting, no IO and no errors of its own. Every renderer writes into
//! a [`Report`] buffer so the CLI can print it and tests can inspect it.

mod apis;
mod oauth;
mod permissions;
mod scan;

pub use apis::{render_api_listing, render_enablement, render_key_services, render_relevant_apis};
pub use oauth::{render_oauth_check, render_oauth_inspection};
pub use permissions::{render_access_tests, render_permissions};
pub use scan::{render_api_key_tests, render_full_scan, render_verify};

use crate::probe::ProbeResult;
use std::fmt::Write;

const WIDE_RULE: usize = 80;

/// Accumulates report text line by line
#[derive(Debug, Default)]
pub struct Report {
    buffer: String,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finished report text
    pub fn into_string(self) -> String {
        self.buffer
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// One line of text
    pub fn line(&mut self, text: impl AsRef<str>) {
        let _ = writeln!(self.buffer, "{}", text.as_ref());
    }

    /// Empty line
    pub fn blank(&mut self) {
        self.buffer.push('\n');
    }

    /// `=` banner with a title between two full-width rules
    pub fn banner(&mut self, title: &str) {
        self.line("=".repeat(WIDE_RULE));
        self.line(title);
        self.line("=".repeat(WIDE_RULE));
    }

    /// Section heading followed by a `-` rule
    pub fn section(&mut self, title: &str) {
        self.line(title);
        self.line("-".repeat(WIDE_RULE));
    }

    /// Standard lines for the failure shapes shared by every probe section.
    ///
    /// Returns the payload when the probe found one, so callers can follow up
    /// with their specific formatting.
    pub fn handle_failure<T>(&mut self, result: ProbeResult<T>) -> Option<T> {
        match result {
            ProbeResult::Found(v) => Some(v),
            ProbeResult::PermissionDenied => {
                self.line("❌ 403 Forbidden - Permessi insufficienti");
                None
            }
            ProbeResult::Missing => {
                self.line("⚠️  404 Not Found - Risorsa non trovata");
                None
            }
            ProbeResult::Warning { status, detail } => {
                match status {
                    Some(code) => self.line(format!("⚠️  Status: {}", code)),
                    None => self.line("⚠️  Errore di rete"),
                }
                if !detail.is_empty() {
                    self.line(format!("   {}", detail));
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_failure_variants() {
        let mut report = Report::new();
        assert_eq!(report.handle_failure(ProbeResult::Found(7)), Some(7));
        assert_eq!(report.handle_failure::<u8>(ProbeResult::PermissionDenied), None);
        assert_eq!(report.handle_failure::<u8>(ProbeResult::Missing), None);
        assert_eq!(
            report.handle_failure::<u8>(ProbeResult::Warning {
                status: Some(500),
                detail: "boom".to_string()
            }),
            None
        );
        let text = report.into_string();
        assert!(text.contains("403 Forbidden"));
        assert!(text.contains("404 Not Found"));
        assert!(text.contains("Status: 500"));
        assert!(text.contains("boom"));
    }
}
