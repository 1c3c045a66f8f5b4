//! HTML-to-PDF conversion through an external renderer (wkhtmltopdf CLI convention:
//! `<renderer> [options] <input.html> <output.pdf>`).

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::report::ReportError;

/// Handle to the PDF renderer, resolved once at startup.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    name: String,
    program: Option<PathBuf>,
}

impl PdfRenderer {
    /// Looks up `program` as a path or on `PATH`.
    pub fn detect(program: &str) -> Self {
        Self {
            name: program.to_string(),
            program: resolve_program(program),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            name: "wkhtmltopdf".to_string(),
            program: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.program.is_some()
    }

    pub fn program(&self) -> Option<&Path> {
        self.program.as_deref()
    }

    /// Converts an HTML document into PDF bytes.
    ///
    /// Source and output live in temp files that are removed when this returns,
    /// on success and failure alike. If the caller drops the future, the renderer
    /// process is killed.
    pub async fn render(&self, html: &str) -> Result<Vec<u8>, ReportError> {
        let program = self
            .program
            .as_ref()
            .ok_or_else(|| ReportError::PdfUnavailable(self.name.clone()))?;

        let mut source = tempfile::Builder::new()
            .prefix("report-")
            .suffix(".html")
            .tempfile()?;
        source.write_all(html.as_bytes())?;
        source.flush()?;

        let output = tempfile::Builder::new()
            .prefix("report-")
            .suffix(".pdf")
            .tempfile()?;

        debug!(
            "Rendering PDF with {} ({} -> {})",
            program.display(),
            source.path().display(),
            output.path().display()
        );

        let result = Command::new(program)
            .arg("--quiet")
            .arg(source.path())
            .arg(output.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                // Renderer removed or made non-executable since startup.
                ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                    ReportError::PdfUnavailable(self.name.clone())
                }
                _ => ReportError::Io(e),
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(ReportError::RenderFailed(format!(
                "{} ({})",
                result.status,
                stderr.trim()
            )));
        }

        Ok(tokio::fs::read(output.path()).await?)
    }
}

fn resolve_program(program: &str) -> Option<PathBuf> {
    let program = program.trim();
    if program.is_empty() {
        return None;
    }

    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    std::env::var_os("PATH").and_then(|paths| {
        std::env::split_paths(&paths)
            .map(|dir| dir.join(program))
            .find(|path| is_executable(path))
    })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
