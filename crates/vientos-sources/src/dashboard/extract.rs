//! Structural extraction helpers for the dashboard pages.
//!
//! The pages render a fixed list of `.variable` blocks, each holding a
//! `.nombre` label element and a nested values table. Block positions
//! shift between page variants (sections are inserted or omitted), so
//! blocks are addressed by label; cells within a matched table are
//! addressed positionally. Absence of a label, table, or cell is a
//! valid outcome, never a failure.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Inner table selector for the wind block.
pub(crate) const VALUES_TABLE: &str = "table.valores";
/// Inner table selector for the remaining weather blocks.
pub(crate) const SUMMARY_TABLE: &str = ".tabla";

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid css selector")
}

pub(crate) fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// First `.variable` block whose `.nombre` trimmed text equals `label`
/// exactly (case-sensitive). First match wins in document order.
pub(crate) fn labeled_section<'a>(doc: &'a Html, label: &str) -> Option<ElementRef<'a>> {
    let block_sel = selector(".variable");
    let name_sel = selector(".nombre");

    doc.select(&block_sel).find(|block| {
        block
            .select(&name_sel)
            .next()
            .is_some_and(|name| element_text(&name) == label)
    })
}

/// Inner table of the labeled block, or `None` when the label or table
/// is absent from this page variant.
pub(crate) fn section_table<'a>(
    doc: &'a Html,
    label: &str,
    table_css: &str,
) -> Option<ElementRef<'a>> {
    let section = labeled_section(doc, label)?;
    let table_sel = selector(table_css);
    let table = section.select(&table_sel).next();
    if table.is_none() {
        tracing::warn!(label, "dashboard section found but its table is missing");
    }
    table
}

/// Trimmed text of the cell at `(row, col)`; empty coerced to `None`.
pub(crate) fn cell_text(table: &ElementRef<'_>, row: usize, col: usize) -> Option<String> {
    let row_sel = selector("tr");
    let col_sel = selector("td");

    let cell = table.select(&row_sel).nth(row)?.select(&col_sel).nth(col)?;
    let text = element_text(&cell);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Leading numeric token of the cell at `(row, col)`: `"23,4 km/h"` → `23.4`.
pub(crate) fn cell_number(table: &ElementRef<'_>, row: usize, col: usize) -> Option<f64> {
    cell_text(table, row, col).as_deref().and_then(leading_number)
}

/// Trimmed text of the first element matching `css` inside `scope`.
pub(crate) fn scoped_text(scope: &ElementRef<'_>, css: &str) -> Option<String> {
    let sel = selector(css);
    let found = scope.select(&sel).next()?;
    let text = element_text(&found);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Parses the leading numeric token of a free-text value, normalizing a
/// decimal comma to a period. No numeric prefix → `None`.
pub(crate) fn leading_number(text: &str) -> Option<f64> {
    let re = Regex::new(r"^\d+(?:[.,]\d+)?").expect("valid leading number regex");
    let token = re.find(text.trim())?.as_str().replace(',', ".");
    token.parse::<f64>().ok()
}
