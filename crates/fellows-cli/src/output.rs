//! Output formatting utilities

use fellows_core::{ReportRow, TokenConfig, render_json, render_table};

/// Output format for the member report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table format
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Routes progress lines and the final report.
///
/// In JSON mode progress goes to stderr so stdout stays machine-readable.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a progress or diagnostic line.
    pub fn line(&self, message: impl std::fmt::Display) {
        match self.format {
            OutputFormat::Table => println!("{}", message),
            OutputFormat::Json => eprintln!("{}", message),
        }
    }

    /// Print the member report.
    pub fn report(&self, rows: &[ReportRow], token: &TokenConfig) -> Result<(), serde_json::Error> {
        println!("{}", self.render(rows, token)?);
        Ok(())
    }

    fn render(&self, rows: &[ReportRow], token: &TokenConfig) -> Result<String, serde_json::Error> {
        match self.format {
            OutputFormat::Table => Ok(render_table(rows, token)),
            OutputFormat::Json => render_json(rows),
        }
    }
}
