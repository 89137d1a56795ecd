//! # Report Log
//!
//! Global, append-only log of user reports. Reasons pass through the same
//! [`ModerationFilter`] as chat before they are stored.
//!
//! Reports are part of the persisted snapshot, so submitting one goes through
//! the same [`SharedState`] transaction as a purchase.

use std::sync::Arc;

use gamehub_shared::constants::{DEFAULT_REPORT_TARGET, DEFAULT_REPORT_TYPE};
use gamehub_shared::{new_record_id, now_millis, Report, SharedState};

use crate::error::{ReportError, ReportResult};
use crate::moderation::ModerationFilter;

/// Moderated report intake.
pub struct ReportLog {
    /// Owner of the persisted log.
    state: Arc<SharedState>,
    /// Applied to every reason.
    filter: Arc<ModerationFilter>,
}

impl ReportLog {
    /// Creates a report log over shared state.
    #[must_use]
    pub fn new(state: Arc<SharedState>, filter: Arc<ModerationFilter>) -> Self {
        Self { state, filter }
    }

    /// Records a report.
    ///
    /// Blank or missing `report_type` becomes `"chat"`, blank or missing
    /// `target_id` becomes `"unknown"`. The reason is trimmed and filtered.
    ///
    /// # Errors
    ///
    /// Returns error only if the log could not be saved. Nothing is appended
    /// in that case.
    pub fn submit(
        &self,
        user_id: &str,
        report_type: Option<&str>,
        target_id: Option<&str>,
        raw_reason: &str,
    ) -> ReportResult<Report> {
        let sanitized = self.filter.sanitize(raw_reason.trim());
        let report = Report {
            id: new_record_id(),
            user_id: user_id.trim().to_string(),
            report_type: or_default(report_type, DEFAULT_REPORT_TYPE),
            target_id: or_default(target_id, DEFAULT_REPORT_TARGET),
            reason: sanitized.cleaned,
            flagged: sanitized.flagged,
            timestamp: now_millis(),
        };

        self.state.transact(|draft| {
            draft.reports.push(report.clone());
            Ok::<_, ReportError>(())
        })?;

        tracing::info!(
            report_id = %report.id,
            user = %report.user_id,
            report_type = %report.report_type,
            target = %report.target_id,
            flagged = report.flagged,
            "report submitted"
        );
        Ok(report)
    }

    /// All reports, oldest first.
    #[must_use]
    pub fn all(&self) -> Vec<Report> {
        self.state.read(|s| s.reports.clone())
    }

    /// All reports, newest first.
    #[must_use]
    pub fn newest_first(&self) -> Vec<Report> {
        self.state.read(|s| s.reports.iter().rev().cloned().collect())
    }

    /// Number of reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read(|s| s.reports.len())
    }

    /// Returns true if no report was ever submitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The filter applied to reasons.
    #[must_use]
    pub fn filter(&self) -> &ModerationFilter {
        &self.filter
    }
}

fn or_default(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}
