//! Plain-text rendering of the form and its results
//!
//! Output is derived purely from a [`ViewState`] snapshot.

use crate::core::controller::{Phase, ViewState};
use crate::models::{MatchResult, Report, ResponsePayload};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt;

pub const TITLE: &str = "Funding Opportunity Finder";
pub const TAGLINE: &str =
    "Describe your project in natural language and get matching grants and funds with a score and brief report.";
pub const SUBMIT_LABEL: &str = "Find opportunities";
pub const BUSY_LABEL: &str = "Finding matches...";
pub const EMPTY_RESULTS_MESSAGE: &str = "No opportunities found. Try broadening your description.";

const LOCAL_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Render the whole view
pub fn render(view: &ViewState) -> String {
    RenderedView(view).to_string()
}

/// Display adapter over a view snapshot
pub struct RenderedView<'a>(pub &'a ViewState);

impl fmt::Display for RenderedView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        write_form(f, view)?;

        match &view.phase {
            Phase::Failure(message) => {
                writeln!(f)?;
                writeln!(f, "! {}", message)?;
            }
            Phase::Success(data) => {
                writeln!(f)?;
                write_payload(f, data)?;
            }
            Phase::Idle | Phase::Loading => {}
        }

        Ok(())
    }
}

fn write_form(f: &mut fmt::Formatter<'_>, view: &ViewState) -> fmt::Result {
    writeln!(f, "{}", TITLE)?;
    writeln!(f, "{}", TAGLINE)?;
    writeln!(f)?;
    writeln!(f, "Project description: {}", view.form.description)?;
    writeln!(f, "Sector (optional):   {}", view.form.sector)?;
    writeln!(f, "Region (optional):   {}", view.form.region)?;

    if view.loading() {
        writeln!(f, "[ {} ] (disabled)", BUSY_LABEL)
    } else {
        writeln!(f, "[ {} ]", SUBMIT_LABEL)
    }
}

fn write_payload(f: &mut fmt::Formatter<'_>, data: &ResponsePayload) -> fmt::Result {
    if data.results.is_empty() {
        writeln!(f, "{}", EMPTY_RESULTS_MESSAGE)?;
    }

    // Server order is the ranking; never re-sort
    for (idx, item) in data.results.iter().enumerate() {
        write_card(f, idx + 1, item)?;
        writeln!(f)?;
    }

    write_report(f, &data.report)
}

fn write_card(f: &mut fmt::Formatter<'_>, position: usize, item: &MatchResult) -> fmt::Result {
    writeln!(f, "{}. {}  ({}% match)", position, item.title, format_score(item.match_score))?;
    writeln!(f, "   {}", item.agency)?;
    writeln!(f, "   {}", item.why)?;

    let chips: Vec<String> = item
        .categories
        .iter()
        .map(String::as_str)
        .chain(non_blank(&item.region))
        .map(|c| format!("[{}]", c))
        .collect();
    if !chips.is_empty() {
        writeln!(f, "   {}", chips.join(" "))?;
    }

    let mut details = Vec::new();
    if let Some(amount) = non_blank(&item.amount) {
        details.push(format!("Amount: {}", amount));
    }
    if let Some(deadline) = non_blank(&item.deadline) {
        details.push(format!("Deadline: {}", deadline));
    }
    if let Some(url) = non_blank(&item.url) {
        details.push(format!("View details: {}", url));
    }
    if !details.is_empty() {
        writeln!(f, "   {}", details.join("  |  "))?;
    }

    Ok(())
}

fn write_report(f: &mut fmt::Formatter<'_>, report: &Report) -> fmt::Result {
    writeln!(f, "Report")?;
    writeln!(f, "Detected categories: {}", report.detected_categories.join(", "))?;
    for highlight in &report.highlights {
        writeln!(f, "  • {}", highlight)?;
    }
    writeln!(f, "{}", report.notes)?;
    writeln!(f, "Generated {}", format_timestamp(&report.generated_at))
}

// An empty string is falsy in the form too, so it is treated as absent
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Whole scores print without a fractional part
pub fn format_score(score: f64) -> String {
    if score.is_finite() && score.fract() == 0.0 {
        format!("{:.0}", score)
    } else {
        format!("{}", score)
    }
}

/// Render an ISO-8601 timestamp in the local time zone
///
/// Timestamps without an offset are read as local time and bare dates as
/// UTC midnight. Anything unparseable is shown as received.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.with_timezone(&Local).format(LOCAL_FORMAT).to_string();
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        if let Some(ts) = Local.from_local_datetime(&naive).earliest() {
            return ts.format(LOCAL_FORMAT).to_string();
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Utc
                .from_utc_datetime(&midnight)
                .with_timezone(&Local)
                .format(LOCAL_FORMAT)
                .to_string();
        }
    }

    raw.to_string()
}
