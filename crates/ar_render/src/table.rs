//! Argument table and its plain-text layout.

use ar_core::NormalizedArgument;
use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

pub const COLUMNS: [&str; 5] = ["conclusion", "stance", "source", "relevance", "aspects"];

const TRUNCATION_MARKER: &str = "…";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub conclusion: String,
    pub stance: String,
    /// Source title, or its URL when the title is missing.
    pub source: String,
    pub relevance: String,
    pub aspects: String,
}

impl TableRow {
    fn cells(&self) -> [&str; 5] {
        [&self.conclusion, &self.stance, &self.source, &self.relevance, &self.aspects]
    }
}

impl From<&NormalizedArgument> for TableRow {
    fn from(argument: &NormalizedArgument) -> Self {
        Self {
            conclusion: argument.conclusion.clone(),
            stance: argument.stance.to_string(),
            source: argument.source_label().unwrap_or_default().to_string(),
            relevance: format!("{:.2}", argument.relevance),
            aspects: argument
                .aspects
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArgumentTable {
    pub rows: Vec<TableRow>,
}

impl ArgumentTable {
    pub fn from_arguments(arguments: &[NormalizedArgument]) -> Self {
        Self {
            rows: arguments.iter().map(TableRow::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Lays the table out as aligned text. Cells wider than
    /// `max_cell_width` columns are truncated.
    pub fn render_text(&self, max_cell_width: usize) -> String {
        let max_cell_width = max_cell_width.max(1);

        let mut widths = COLUMNS.map(|c| c.width().min(max_cell_width));
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row.cells()) {
                *width = (*width).max(cell.width().min(max_cell_width));
            }
        }

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(format_line(&COLUMNS, &widths));
        lines.push(
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        for row in &self.rows {
            lines.push(format_line(&row.cells(), &widths));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

fn format_line(cells: &[&str; 5], widths: &[usize; 5]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(&truncate(cell, *width), *width))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

/// Truncates `text` to `width` display columns, ending in a marker when cut.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }

    let available = width.saturating_sub(TRUNCATION_MARKER.width());
    let mut result = String::new();
    let mut current = 0;
    for grapheme in text.graphemes(true) {
        let w = grapheme.width();
        if current + w > available {
            break;
        }
        result.push_str(grapheme);
        current += w;
    }
    result.push_str(TRUNCATION_MARKER);
    result
}
