//! Report rendering
//!
//! A [`ReportRequest`] carries everything the report shows. Renderers turn
//! it into bytes; the caller decides where those bytes go.

pub mod markdown;
pub mod pdf;

pub use markdown::MarkdownRenderer;
pub use pdf::PdfRenderer;

use crate::error::Result;
use crate::scoring::ScoreMap;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const REPORT_TITLE: &str = "Your Reflection Report";
pub const SNAPSHOT_HEADING: &str = "Your Theme Snapshot";
pub const TOP_THEMES_HEADING: &str = "Top Themes";
pub const GUIDANCE_HEADING: &str = "Your Personalized Guidance";
pub const FOOTER: &str = "Life Minus Work • This report is a starting point for reflection. Nothing here is medical or financial advice.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Pdf,
    Markdown,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Markdown => "md",
        }
    }
}

/// Everything a report shows
#[derive(Debug, Clone, Serialize)]
pub struct ReportRequest<'a> {
    pub identity: &'a str,
    pub date: NaiveDate,
    /// Full score map in declared theme order
    pub scores: &'a ScoreMap,
    pub top_themes: &'a [String],
    pub narrative: &'a str,
}

impl ReportRequest<'_> {
    /// Report date as shown on the document, e.g. `07 Mar 2026`
    pub fn display_date(&self) -> String {
        self.date.format("%d %b %Y").to_string()
    }
}

pub trait ReportRenderer: Send + Sync {
    fn render(&self, request: &ReportRequest<'_>) -> Result<Vec<u8>>;
    fn format(&self) -> ReportFormat;
}

pub fn renderer_for(format: ReportFormat) -> Result<Box<dyn ReportRenderer>> {
    Ok(match format {
        ReportFormat::Pdf => Box::new(PdfRenderer::new()),
        ReportFormat::Markdown => Box::new(MarkdownRenderer::new()?),
    })
}
