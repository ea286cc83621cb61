// src/core/html.rs
//! Table-cell text extraction.
//!
//! Scoring-key pages are laid out as (often nested) tables, and the only
//! structure the scanner relies on is the order of cell texts. Every `<td>` in
//! document order yields one fragment; text belonging to a `<td>` nested inside
//! it is left out of the outer fragment and shows up as its own fragment later.
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};

use super::sanitize::has_letters;

static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("static selector"));

/// Ordered cell texts of every `<td>` in `doc`, dropping cells without letters.
pub fn extract_cells(doc: &str) -> Vec<String> {
    let html = Html::parse_document(doc);
    html.select(&TD)
        .map(own_text)
        .filter(|t| has_letters(t))
        .collect()
}

/// Text of `td` minus anything under a nested `<td>`. Each text node is trimmed
/// and the pieces are joined with a single space.
fn own_text(td: ElementRef<'_>) -> String {
    let mut pieces: Vec<&str> = Vec::new();
    for node in td.descendants() {
        let Node::Text(text) = node.value() else { continue };
        let nested = node
            .ancestors()
            .take_while(|a| a.id() != td.id())
            .any(|a| matches!(a.value(), Node::Element(e) if e.name() == "td"));
        if nested { continue; }
        let t = text.trim();
        if !t.is_empty() { pieces.push(t); }
    }
    pieces.join(" ")
}
