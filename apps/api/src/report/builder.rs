use bytes::Bytes;

use crate::report::{PdfRenderer, Report, ReportError, ReportKind};

/// The two outputs a report combines.
#[derive(Debug, Clone, Copy)]
pub struct ReportOutputs<'a> {
    pub mistral: &'a str,
    pub qwen: &'a str,
}

/// Renders a report of the requested kind.
/// Text and HTML are built in memory; PDF goes through the external renderer.
pub async fn build_report(
    kind: ReportKind,
    outputs: ReportOutputs<'_>,
    pdf: &PdfRenderer,
) -> Result<Report, ReportError> {
    let body = match kind {
        ReportKind::Text => Bytes::from(render_text(outputs)),
        ReportKind::Html => Bytes::from(render_html(outputs)),
        ReportKind::Pdf => Bytes::from(pdf.render(&render_html(outputs)).await?),
    };
    Ok(Report { kind, body })
}

pub fn render_text(outputs: ReportOutputs<'_>) -> String {
    format!(
        "=== Mistral Output ===\n{}\n\n=== Qwen Output ===\n{}\n",
        outputs.mistral, outputs.qwen
    )
}

pub fn render_html(outputs: ReportOutputs<'_>) -> String {
    format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Art Of Prompting Report</title>
<style>body{{font-family: Arial, Helvetica, sans-serif; padding:20px;}} .box{{border-radius:8px;padding:12px;margin-bottom:12px;box-shadow:0 6px 12px rgba(0,0,0,0.06);}}</style>
</head>
<body>
<h1>Art Of Prompting - Report</h1>
<h2>Mistral Output</h2>
<div class="box"><pre style="white-space:pre-wrap">{}</pre></div>
<h2>Qwen Output</h2>
<div class="box"><pre style="white-space:pre-wrap">{}</pre></div>
</body></html>
"#,
        escape_html(outputs.mistral),
        escape_html(outputs.qwen)
    )
}

/// Escapes text for use in HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
