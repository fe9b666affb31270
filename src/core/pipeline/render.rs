//! Artifact renderer seam
//!
//! Visual artifacts (HTML reports, images, thumbnails) are produced by
//! renderers registered with the pipeline. Only the HTML report ships with the
//! crate; image rendering is left to callers that link an imaging library.

use crate::core::routing::OutputKind;
use crate::domain::{FlatRecord, Result};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

/// Produces one artifact kind from a record
pub trait ArtifactRenderer: Send + Sync {
    fn name(&self) -> &'static str;

    fn supports(&self, kind: OutputKind) -> bool;

    /// Writes the artifact for `record` (decoded from `source`) to `dest`
    fn render(&self, kind: OutputKind, record: &FlatRecord, source: &Path, dest: &Path) -> Result<()>;
}

/// Renderers available to a pipeline
#[derive(Clone, Default)]
pub struct RendererRegistry {
    renderers: Vec<Arc<dyn ArtifactRenderer>>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in HTML report renderer
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(HtmlReportRenderer));
        registry
    }

    pub fn register(&mut self, renderer: Arc<dyn ArtifactRenderer>) {
        self.renderers.push(renderer);
    }

    /// First renderer that supports `kind`
    pub fn find(&self, kind: OutputKind) -> Option<&Arc<dyn ArtifactRenderer>> {
        self.renderers.iter().find(|r| r.supports(kind))
    }

    pub fn supports(&self, kind: OutputKind) -> bool {
        self.find(kind).is_some()
    }
}

impl std::fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.renderers.iter().map(|r| r.name()))
            .finish()
    }
}

/// Minimal HTML listing of a record
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlReportRenderer;

impl HtmlReportRenderer {
    pub fn to_html(record: &FlatRecord, source: &Path) -> String {
        let title = escape_html(&source.display().to_string());
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        let _ = writeln!(html, "<title>Metadata: {title}</title>");
        html.push_str("</head>\n<body>\n");
        let _ = writeln!(html, "<h1>{title}</h1>");
        html.push_str("<table>\n<tr><th>Field</th><th>Value</th></tr>\n");
        for (key, _) in record.iter() {
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{}</td></tr>",
                escape_html(key),
                escape_html(&record.cell(key))
            );
        }
        html.push_str("</table>\n</body>\n</html>\n");
        html
    }
}

impl ArtifactRenderer for HtmlReportRenderer {
    fn name(&self) -> &'static str {
        "html-report"
    }

    fn supports(&self, kind: OutputKind) -> bool {
        kind == OutputKind::Html
    }

    fn render(&self, _kind: OutputKind, record: &FlatRecord, source: &Path, dest: &Path) -> Result<()> {
        std::fs::write(dest, Self::to_html(record, source))?;
        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_html_values_are_escaped() {
        let record = FlatRecord::from_iter([("note".to_string(), json!("<b>Smith & Co</b>"))]);
        let html = HtmlReportRenderer::to_html(&record, Path::new("/x/a.json"));

        assert!(html.contains("&lt;b&gt;Smith &amp; Co&lt;/b&gt;"));
        assert!(!html.contains("<b>Smith"));
    }

    #[test]
    fn test_registry_defaults_cover_html_only() {
        let registry = RendererRegistry::with_defaults();
        assert!(registry.supports(OutputKind::Html));
        assert!(!registry.supports(OutputKind::Thumbnail));
        assert!(!registry.supports(OutputKind::Image));
    }
}
