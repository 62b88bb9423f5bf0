//! Run reporting.
//!
//! Scenario narration accumulates in memory during the run and is written
//! out once, as a single themed HTML document, when the session closes.
//! Steps are append-only; nothing in the suite reads them back except the
//! summary counters that decide the process exit code.

use crate::config::{ReportConfig, ReportTheme};
use crate::result::VenderResult;
use chrono::{DateTime, Local};
use std::cell::RefCell;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Severity of one narration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Pass,
    Fail,
}

impl Severity {
    const fn css_class(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Pass => "pass",
            Self::Fail => "fail",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARN",
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

/// Outcome of one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioStatus {
    Passed,
    Failed,
    Skipped,
}

impl ScenarioStatus {
    const fn css_class(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::Skipped => "SKIPPED",
        }
    }
}

/// One narration step.
#[derive(Debug, Clone)]
pub struct StepEntry {
    pub severity: Severity,
    pub message: String,
    pub at: DateTime<Local>,
}

/// Completed scenario.
#[derive(Debug, Clone)]
pub struct ScenarioRecord {
    pub name: String,
    pub description: String,
    pub status: ScenarioStatus,
    pub duration: Duration,
    pub error: Option<String>,
    pub screenshot: Option<PathBuf>,
    pub steps: Vec<StepEntry>,
}

#[derive(Debug)]
struct OpenScenario {
    name: String,
    description: String,
    started: Instant,
    steps: Vec<StepEntry>,
    screenshot: Option<PathBuf>,
}

#[derive(Debug)]
struct Inner {
    config: ReportConfig,
    started_at: DateTime<Local>,
    records: Vec<ScenarioRecord>,
    current: Option<OpenScenario>,
}

/// Append-only report sink.
///
/// Interior mutability keeps the call sites simple: page objects narrate
/// through a shared reference held by the session.
#[derive(Debug)]
pub struct Reporter {
    inner: RefCell<Inner>,
}

impl Reporter {
    #[must_use]
    pub fn new(config: ReportConfig) -> Self {
        Self {
            inner: RefCell::new(Inner {
                config,
                started_at: Local::now(),
                records: Vec::new(),
                current: None,
            }),
        }
    }

    /// Open a scenario; steps logged from now on attach to it.
    pub fn begin_scenario(&self, name: &str, description: &str) {
        info!(scenario = name, "starting scenario");
        self.inner.borrow_mut().current = Some(OpenScenario {
            name: name.to_string(),
            description: description.to_string(),
            started: Instant::now(),
            steps: Vec::new(),
            screenshot: None,
        });
    }

    /// Close the open scenario with the given outcome.
    pub fn end_scenario(&self, status: ScenarioStatus, error: Option<String>) {
        let mut inner = self.inner.borrow_mut();
        let Some(open) = inner.current.take() else {
            warn!("end_scenario without a begin_scenario");
            return;
        };
        match status {
            ScenarioStatus::Failed => {
                error!(scenario = %open.name, error = ?error, "scenario failed");
            }
            _ => info!(scenario = %open.name, status = status.label(), "scenario finished"),
        }
        inner.records.push(ScenarioRecord {
            name: open.name,
            description: open.description,
            status,
            duration: open.started.elapsed(),
            error,
            screenshot: open.screenshot,
            steps: open.steps,
        });
    }

    /// Append a narration step to the open scenario.
    pub fn step(&self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Warning => warn!("{message}"),
            Severity::Fail => error!("{message}"),
            _ => info!("{message}"),
        }
        let mut inner = self.inner.borrow_mut();
        if let Some(open) = inner.current.as_mut() {
            open.steps.push(StepEntry {
                severity,
                message,
                at: Local::now(),
            });
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.step(Severity::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.step(Severity::Warning, message);
    }

    pub fn pass(&self, message: impl Into<String>) {
        self.step(Severity::Pass, message);
    }

    pub fn fail(&self, message: impl Into<String>) {
        self.step(Severity::Fail, message);
    }

    /// Attach a failure screenshot to the open scenario.
    pub fn attach_screenshot(&self, path: &Path) {
        let mut inner = self.inner.borrow_mut();
        if let Some(open) = inner.current.as_mut() {
            open.screenshot = Some(path.to_path_buf());
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.inner.borrow().records.len()
    }

    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(ScenarioStatus::Passed)
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(ScenarioStatus::Failed)
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(ScenarioStatus::Skipped)
    }

    fn count(&self, status: ScenarioStatus) -> usize {
        self.inner
            .borrow()
            .records
            .iter()
            .filter(|r| r.status == status)
            .count()
    }

    /// True when no scenario failed (skips do not count against the run).
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    /// One-line run summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} scenarios: {} passed, {} failed, {} skipped",
            self.total(),
            self.passed_count(),
            self.failed_count(),
            self.skipped_count()
        )
    }

    /// Completed records, in execution order.
    #[must_use]
    pub fn records(&self) -> Vec<ScenarioRecord> {
        self.inner.borrow().records.clone()
    }

    /// Write the HTML document and return its path.
    pub fn flush(&self) -> VenderResult<PathBuf> {
        let inner = self.inner.borrow();
        let path = inner.config.path();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&path, inner.render_html())?;
        info!(report = %path.display(), "report written");
        Ok(path)
    }
}

impl Inner {
    fn render_html(&self) -> String {
        let mut html = String::with_capacity(8192);
        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n",
            escape(&self.config.title),
            self.stylesheet(),
        );
        let _ = write!(
            html,
            "<h1>{}</h1>\n<p class=\"meta\">Started {}</p>\n",
            escape(&self.config.name),
            self.started_at.format(&self.config.timestamp_format),
        );

        let passed = self
            .records
            .iter()
            .filter(|r| r.status == ScenarioStatus::Passed)
            .count();
        let failed = self
            .records
            .iter()
            .filter(|r| r.status == ScenarioStatus::Failed)
            .count();
        let _ = write!(
            html,
            "<div class=\"summary\"><span class=\"passed\">{passed} passed</span> \
             <span class=\"failed\">{failed} failed</span> \
             <span>{} total</span></div>\n",
            self.records.len(),
        );

        for record in &self.records {
            let _ = write!(
                html,
                "<div class=\"scenario {}\">\n<h2>{} <span class=\"status\">{}</span></h2>\n<p>{}</p>\n<p class=\"meta\">{:.1}s</p>\n",
                record.status.css_class(),
                escape(&record.name),
                record.status.label(),
                escape(&record.description),
                record.duration.as_secs_f64(),
            );
            if let Some(error) = &record.error {
                let _ = write!(html, "<p class=\"error\">{}</p>\n", escape(error));
            }
            if let Some(shot) = &record.screenshot {
                let _ = write!(
                    html,
                    "<p class=\"meta\">Screenshot: <a href=\"{0}\">{0}</a></p>\n",
                    escape(&shot.display().to_string()),
                );
            }
            html.push_str("<ul class=\"steps\">\n");
            for step in &record.steps {
                let _ = write!(
                    html,
                    "<li class=\"{}\"><span class=\"ts\">{}</span> [{}] {}</li>\n",
                    step.severity.css_class(),
                    step.at.format(&self.config.timestamp_format),
                    step.severity.label(),
                    escape(&step.message),
                );
            }
            html.push_str("</ul>\n</div>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    fn stylesheet(&self) -> &'static str {
        match self.config.theme {
            ReportTheme::Standard => {
                "body{font-family:sans-serif;margin:2em;background:#fafafa;color:#222}\
                 h1{border-bottom:2px solid #444}\
                 .meta{color:#777;font-size:0.85em}\
                 .summary span{margin-right:1em;font-weight:bold}\
                 .summary .passed{color:#2e7d32}.summary .failed{color:#c62828}\
                 .scenario{border:1px solid #ddd;border-left:6px solid #999;background:#fff;margin:1em 0;padding:0.5em 1em}\
                 .scenario.passed{border-left-color:#2e7d32}\
                 .scenario.failed{border-left-color:#c62828}\
                 .scenario.skipped{border-left-color:#f9a825}\
                 .status{font-size:0.7em;color:#555}\
                 .error{color:#c62828;font-weight:bold}\
                 .steps{list-style:none;padding-left:0;font-size:0.9em}\
                 .steps .ts{color:#999;margin-right:0.5em}\
                 .steps .warning{color:#e65100}.steps .fail{color:#c62828}.steps .pass{color:#2e7d32}"
            }
            ReportTheme::Dark => {
                "body{font-family:sans-serif;margin:2em;background:#1e1e1e;color:#ddd}\
                 h1{border-bottom:2px solid #888}\
                 .meta{color:#888;font-size:0.85em}\
                 .summary span{margin-right:1em;font-weight:bold}\
                 .summary .passed{color:#81c784}.summary .failed{color:#e57373}\
                 .scenario{border:1px solid #333;border-left:6px solid #666;background:#252526;margin:1em 0;padding:0.5em 1em}\
                 .scenario.passed{border-left-color:#81c784}\
                 .scenario.failed{border-left-color:#e57373}\
                 .scenario.skipped{border-left-color:#ffd54f}\
                 .status{font-size:0.7em;color:#aaa}\
                 .error{color:#e57373;font-weight:bold}\
                 .steps{list-style:none;padding-left:0;font-size:0.9em}\
                 .steps .ts{color:#777;margin-right:0.5em}\
                 .steps .warning{color:#ffb74d}.steps .fail{color:#e57373}.steps .pass{color:#81c784}"
            }
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
