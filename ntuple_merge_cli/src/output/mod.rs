//! Rendering of merge reports for stdout

use anyhow::Result;
use colored::*;
use ntuple_merge_core::units::{format_bytes, format_elapsed};
use ntuple_merge_core::{MergeOutcome, MergeReport};
use std::time::Duration;

/// Output format for the merge report
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render `report` in the requested format
pub fn render_report(report: &MergeReport, format: OutputFormat, use_color: bool) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(TextReport { use_color }.render(report)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

struct TextReport {
    use_color: bool,
}

impl TextReport {
    fn colorize(&self, text: &str, color: fn(&str) -> ColoredString) -> String {
        if self.use_color {
            color(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn render(&self, report: &MergeReport) -> String {
        let mut output = String::new();

        output.push_str(&format!("Directory: {}\n", report.base_dir.display()));
        output.push_str(&format!("Pattern: {}\n", report.pattern));
        output.push_str(&format!("Output: {}\n", report.output.display()));
        output.push_str(&format!("Engine: {}\n", report.engine));
        output.push_str(&format!("Files merged: {}\n", report.files_discovered));
        output.push_str(&format!(
            "Estimated size: {} ({})\n",
            format_bytes(report.estimated_bytes),
            report.estimated_bytes
        ));
        if report.size_failures > 0 {
            let warning = format!("{} file(s) could not be sized", report.size_failures);
            output.push_str(&format!("{}\n", self.colorize(&warning, |s| s.yellow())));
        }

        match &report.outcome {
            MergeOutcome::Succeeded {
                final_bytes,
                size_delta,
            } => {
                output.push_str(&format!(
                    "Status: {}\n",
                    self.colorize("succeeded", |s| s.green())
                ));
                match (final_bytes, size_delta) {
                    (Some(bytes), Some(delta)) => {
                        output.push_str(&format!(
                            "Merged size: {} ({bytes})\n",
                            format_bytes(*bytes)
                        ));
                        output.push_str(&format!("Size difference: {delta:+} bytes\n"));
                    }
                    _ => output.push_str("Merged size: unavailable\n"),
                }
            }
            MergeOutcome::Failed { reason } => {
                output.push_str(&format!(
                    "Status: {}\n",
                    self.colorize("failed", |s| s.red())
                ));
                output.push_str(&format!("Reason: {reason}\n"));
            }
        }

        output.push_str(&format!(
            "Elapsed: {}\n",
            format_elapsed(Duration::from_secs_f64(report.elapsed_secs))
        ));
        output
    }
}
