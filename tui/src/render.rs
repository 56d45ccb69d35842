//! Terminal rendering utilities -- ANSI formatting, tables, panels.
//!
//! All functions produce `String` output. Nothing is written to stdout
//! directly; [`crate::views`] composes these building blocks into full
//! page fragments.

// ---------------------------------------------------------------------------
// ANSI escape constants
// ---------------------------------------------------------------------------

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

// ---------------------------------------------------------------------------
// Box-drawing characters
// ---------------------------------------------------------------------------

pub const BOX_H: char = '\u{2500}';  // ─
pub const BOX_V: char = '\u{2502}';  // │
pub const BOX_TL: char = '\u{250C}'; // ┌
pub const BOX_TR: char = '\u{2510}'; // ┐
pub const BOX_BL: char = '\u{2514}'; // └
pub const BOX_BR: char = '\u{2518}'; // ┘

// ---------------------------------------------------------------------------
// String helpers
// ---------------------------------------------------------------------------

/// Truncate a string to `max_width` characters, appending an ellipsis if
/// truncated. If `max_width` < 3 the string is simply cut.
pub fn truncate(s: &str, max_width: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_width {
        return s.to_string();
    }
    if max_width < 3 {
        return chars[..max_width].iter().collect();
    }
    let mut result: String = chars[..max_width - 1].iter().collect();
    result.push('\u{2026}');
    result
}

/// Pad a string on the right to exactly `width` characters.
/// If the string is longer, it is truncated.
pub fn pad_right(s: &str, width: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() >= width {
        return truncate(s, width);
    }
    let mut result = s.to_string();
    for _ in 0..(width - chars.len()) {
        result.push(' ');
    }
    result
}


// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// A text table whose columns size themselves to their widest cell,
/// capped per column so one long value cannot crowd out the rest.
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    max_col_width: usize,
}


impl Table {
    pub fn new(headers: Vec<&str>) -> Self {
        Table {
            headers: headers.into_iter().map(String::from).collect(),
            rows: Vec::new(),
            max_col_width: 32,
        }
    }

    /// Add a row of cell values. Missing cells render empty.
    pub fn add_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }
        widths.iter().map(|w| (*w).min(self.max_col_width)).collect()
    }

    /// Render the table as one line per row: bold header, separator,
    /// then data rows. An optional `selected` row index is highlighted.
    pub fn render(&self, selected: Option<usize>) -> Vec<String> {
        let widths = self.column_widths();
        let mut lines = Vec::new();

        let header: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| pad_right(h, *w))
            .collect();
        lines.push(format!("{}{}{}", BOLD, header.join("  "), RESET));

        let total: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * 2;
        lines.push(std::iter::repeat(BOX_H).take(total).collect());

        for (row_index, row) in self.rows.iter().enumerate() {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, w)| pad_right(row.get(i).map(String::as_str).unwrap_or(""), *w))
                .collect();
            let line = cells.join("  ");
            if selected == Some(row_index) {
                lines.push(format!("{}{}> {}{}", BOLD, CYAN, line, RESET));
            } else {
                lines.push(format!("  {}", line));
            }
        }
        lines
    }
}


// ---------------------------------------------------------------------------
// Panel
// ---------------------------------------------------------------------------

/// A titled box around a block of pre-rendered lines.
pub struct Panel;

impl Panel {
    /// Render `lines` inside a box-drawing border with `title` embedded
    /// in the top edge. Content longer than the inner width is truncated.
    pub fn render(title: &str, lines: &[String], width: usize) -> Vec<String> {
        let inner = width.saturating_sub(4).max(8);
        let mut out = Vec::with_capacity(lines.len() + 2);

        let title = truncate(title, inner);
        let dashes = inner.saturating_sub(title.chars().count() + 1);
        let top: String = std::iter::repeat(BOX_H).take(dashes).collect();
        out.push(format!("{}{} {} {}{}", BOX_TL, BOX_H, title, top, BOX_TR));

        for line in lines {
            out.push(format!("{} {} {}", BOX_V, pad_right(line, inner), BOX_V));
        }

        let bottom: String = std::iter::repeat(BOX_H).take(inner + 2).collect();
        out.push(format!("{}{}{}", BOX_BL, bottom, BOX_BR));
        out
    }
}


/// Format a label/value pair as one detail-panel row.
pub fn field_row(label: &str, value: &str) -> String {
    format!("{}{}{}  {}", DIM, pad_right(label, 22), RESET, value)
}
