//! Output formatting utilities
//!
//! Provides table and JSON output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::domain::{AlertThreshold, Rule, SystemStats};
use crate::services::ProcessReport;
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", render(data, format))
}

/// Render output in the selected format
pub fn render<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => data.to_table(),
        OutputFormat::Json => {
            serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
        }
        OutputFormat::Compact => data.to_compact(),
    }
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

impl TableDisplay for Rule {
    fn to_table(&self) -> String {
        format!(
            "Rule {}\n  Condition: {}\n  Action:    {}",
            self.id, self.condition, self.action
        )
    }

    fn to_compact(&self) -> String {
        self.to_string()
    }
}

/// Rule list for display
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct RuleList {
    pub rules: Vec<Rule>,
}

impl TableDisplay for RuleList {
    fn to_table(&self) -> String {
        if self.rules.is_empty() {
            return "No rules registered".to_string();
        }

        let id_width = self
            .rules
            .iter()
            .map(|r| r.id.len())
            .max()
            .unwrap_or(0)
            .max(2);
        let cond_width = self
            .rules
            .iter()
            .map(|r| r.condition.len())
            .max()
            .unwrap_or(0)
            .max(9);

        let mut output = format!(
            "{:<id_width$}  {:<cond_width$}  ACTION\n",
            "ID", "CONDITION"
        );
        for rule in &self.rules {
            output.push_str(&format!(
                "{:<id_width$}  {:<cond_width$}  {}\n",
                rule.id, rule.condition, rule.action
            ));
        }
        output.push_str(&format!("\nTotal rules: {}", self.rules.len()));
        output
    }

    fn to_compact(&self) -> String {
        self.rules
            .iter()
            .map(|r| r.id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl TableDisplay for ProcessReport {
    fn to_table(&self) -> String {
        let mut output = format!(
            "Event processed: {} rule(s) evaluated, {} matched",
            self.evaluated,
            self.matched.len()
        );
        for id in &self.matched {
            output.push_str(&format!("\n  fired: {}", id));
        }
        output
    }

    fn to_compact(&self) -> String {
        format!(
            "evaluated={} matched=[{}]",
            self.evaluated,
            self.matched.join(",")
        )
    }
}

impl TableDisplay for SystemStats {
    fn to_table(&self) -> String {
        format!(
            "CPU Usage:    {:>6.2}%\nMemory Usage: {:>6.2}%\nTimestamp:    {}",
            self.cpu_usage, self.memory_usage, self.timestamp
        )
    }

    fn to_compact(&self) -> String {
        format!(
            "cpu={:.2}% mem={:.2}%",
            self.cpu_usage, self.memory_usage
        )
    }
}

impl TableDisplay for AlertThreshold {
    fn to_table(&self) -> String {
        format!(
            "CPU Threshold:    {:.2}%\nMemory Threshold: {:.2}%",
            self.cpu_threshold, self.memory_threshold
        )
    }

    fn to_compact(&self) -> String {
        format!(
            "cpu>{:.2}% mem>{:.2}%",
            self.cpu_threshold, self.memory_threshold
        )
    }
}

/// Confirmation message for write operations
#[derive(Debug, Clone, Serialize)]
pub struct StatusMessage {
    pub status: &'static str,
    pub message: String,
}

impl StatusMessage {
    /// Create a success message
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
        }
    }
}

impl TableDisplay for StatusMessage {
    fn to_table(&self) -> String {
        self.message.clone()
    }
}
