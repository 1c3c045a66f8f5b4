// Report export: the two backend outputs rendered as text, HTML or PDF.
// PDF goes through an external HTML-to-PDF converter; its temp files never outlive a request.

pub mod builder;
pub mod handlers;
pub mod pdf;

use std::str::FromStr;

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use thiserror::Error;

use crate::errors::AppError;

pub use builder::build_report;
pub use pdf::PdfRenderer;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Unknown report type '{0}' (expected txt, html or pdf)")]
    UnknownKind(String),

    #[error("PDF generation not available on server (no '{0}' renderer found)")]
    PdfUnavailable(String),

    #[error("PDF renderer failed: {0}")]
    RenderFailed(String),

    #[error("Report I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ReportError> for AppError {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::UnknownKind(_) => AppError::Validation(e.to_string()),
            ReportError::PdfUnavailable(_) => AppError::CapabilityUnavailable(e.to_string()),
            other => AppError::Internal(other.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Text,
    Html,
    Pdf,
}

impl FromStr for ReportKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(ReportKind::Text),
            "html" => Ok(ReportKind::Html),
            "pdf" => Ok(ReportKind::Pdf),
            _ => Err(ReportError::UnknownKind(s.to_string())),
        }
    }
}

impl ReportKind {
    pub fn filename(self) -> &'static str {
        match self {
            ReportKind::Text => "art_of_prompting_report.txt",
            ReportKind::Html => "art_of_prompting_report.html",
            ReportKind::Pdf => "art_of_prompting_report.pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ReportKind::Text => "text/plain; charset=utf-8",
            ReportKind::Html => "text/html; charset=utf-8",
            ReportKind::Pdf => "application/pdf",
        }
    }
}

/// A rendered report, served as a file download.
#[derive(Debug, Clone)]
pub struct Report {
    pub kind: ReportKind,
    pub body: Bytes,
}

impl IntoResponse for Report {
    fn into_response(self) -> Response {
        let headers = [
            (header::CONTENT_TYPE, self.kind.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", self.kind.filename()),
            ),
        ];
        (headers, self.body).into_response()
    }
}
