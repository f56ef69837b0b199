//! Print window: a standalone HTML sheet opened in the browser, which prints itself
//! once every barcode graphic is in the document.

use anyhow::{Context, Result};
use std::path::PathBuf;

use super::{BarcodeError, Label, PaperSize};

/// Upper bound on readiness checks before printing anyway
pub const PRINT_MAX_ATTEMPTS: u32 = 10;
pub const PRINT_POLL_INTERVAL_MS: u32 = 100;

const MODULE_PX: u32 = 2;
const BAR_HEIGHT: u32 = 48;

pub(crate) fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn label_markup(label: &Label, currency: &str) -> String {
    format!(
        "<div class=\"label\"><div class=\"name\">{}</div>{}<div class=\"price\">{}{:.2}</div></div>",
        escape(&label.name),
        label.barcode.to_svg(MODULE_PX, BAR_HEIGHT),
        escape(currency),
        label.price
    )
}

/// Complete print document for `labels` on `paper`
pub fn render_print_document(
    labels: &[Label],
    paper: PaperSize,
    title: &str,
    currency: &str,
) -> Result<String, BarcodeError> {
    if labels.is_empty() {
        return Err(BarcodeError::NoLabels);
    }

    let body: String = labels.iter().map(|l| label_markup(l, currency)).collect();

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8"/>
<title>{title}</title>
<style>
@page {{ size: {size}; margin: 8mm; }}
* {{ box-sizing: border-box; }}
body {{ margin: 0; font-family: ui-sans-serif, Helvetica, Arial, sans-serif; color: #111; }}
.sheet {{ display: grid; grid-template-columns: repeat({columns}, 1fr); gap: 4mm; }}
.label {{ border: 1px dashed #999; padding: 2mm; text-align: center; page-break-inside: avoid; break-inside: avoid; }}
.label .name {{ font-size: 10pt; font-weight: 600; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; }}
.label .price {{ font-size: 11pt; font-weight: 700; }}
.label svg {{ max-width: 100%; height: auto; }}
@media print {{ .label {{ border-color: transparent; }} }}
</style>
</head>
<body>
<div class="sheet" data-expected="{count}">{body}</div>
<script>
(function () {{
  var attempts = 0;
  var expected = {count};
  function ready() {{
    return document.querySelectorAll('svg.barcode').length >= expected;
  }}
  function tryPrint() {{
    attempts += 1;
    if (ready() || attempts >= {max_attempts}) {{
      window.print();
      return;
    }}
    setTimeout(tryPrint, {interval});
  }}
  window.addEventListener('load', function () {{ setTimeout(tryPrint, {interval}); }});
}})();
</script>
</body>
</html>"#,
        title = escape(title),
        size = paper.css_size(),
        columns = paper.columns(),
        count = labels.len(),
        body = body,
        max_attempts = PRINT_MAX_ATTEMPTS,
        interval = PRINT_POLL_INTERVAL_MS,
    ))
}

/// Write the document to the cache directory and open it in the browser
pub fn open_print_window(html: &str) -> Result<PathBuf> {
    let dir = dirs::cache_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?
        .join("backroom")
        .join("print");
    std::fs::create_dir_all(&dir).context("Could not create print directory")?;

    let path = dir.join(format!(
        "labels-{}.html",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));
    std::fs::write(&path, html).context("Could not write print document")?;

    webbrowser::open(&path.to_string_lossy())
        .with_context(|| format!("Could not open {}", path.display()))?;

    tracing::info!("Opened print window {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::{expand_labels, LabelRequest};

    fn labels(quantity: u32) -> Vec<Label> {
        expand_labels(&[LabelRequest {
            name: "Tea & Biscuits".to_string(),
            sku: "SNK-9".to_string(),
            price: 3.5,
            quantity,
        }])
        .unwrap()
    }

    #[test]
    fn test_document_uses_paper_size() {
        let html = render_print_document(&labels(1), PaperSize::Letter, "Labels", "$").unwrap();
        assert!(html.contains("@page { size: letter; margin: 8mm; }"));
        assert!(html.contains("repeat(3, 1fr)"));

        let html = render_print_document(&labels(1), PaperSize::A5, "Labels", "$").unwrap();
        assert!(html.contains("@page { size: A5;"));
        assert!(html.contains("repeat(2, 1fr)"));
    }

    #[test]
    fn test_document_contains_every_label() {
        let html = render_print_document(&labels(4), PaperSize::A4, "Labels", "$").unwrap();
        assert_eq!(html.matches("class=\"label\"").count(), 4);
        assert_eq!(html.matches("<svg class=\"barcode\"").count(), 4);
        assert!(html.contains("var expected = 4;"));
        assert!(html.contains("Tea &amp; Biscuits"));
        assert!(html.contains("$3.50"));
    }

    #[test]
    fn test_print_poll_is_bounded() {
        let html = render_print_document(&labels(1), PaperSize::A4, "Labels", "$").unwrap();
        assert!(html.contains(&format!("attempts >= {PRINT_MAX_ATTEMPTS}")));
        assert!(html.contains("window.print()"));
    }

    #[test]
    fn test_empty_sheet_is_rejected() {
        assert_eq!(
            render_print_document(&[], PaperSize::A4, "Labels", "$"),
            Err(BarcodeError::NoLabels)
        );
    }
}
