//! Terminal preview of a built layout.
//!
//! Colours and labels are taken from the layout as-is.

use std::fmt::Write;

use crossterm::style::{Color, Stylize, style};

use crate::types::{ActivityTotals, GridCell, GridLayout, TimelineLayout};
use crate::utils::{NumberFormatOptions, format_number};

const DAY_GLYPH: &str = "■";
const BUCKET_GLYPH: &str = "█";
const QUARTER_GLYPH: char = '•';

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Emit truecolour escape sequences.
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { color: true }
    }
}

/// `#rrggbb` or `#rgb` to a terminal colour.
pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.strip_prefix('#').filter(|hex| hex.is_ascii())?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb {
            r: channel(hex.get(0..2)?)?,
            g: channel(hex.get(2..4)?)?,
            b: channel(hex.get(4..6)?)?,
        }),
        3 => {
            let expand = |s: &str| channel(s).map(|v| v * 17);
            Some(Color::Rgb {
                r: expand(hex.get(0..1)?)?,
                g: expand(hex.get(1..2)?)?,
                b: expand(hex.get(2..3)?)?,
            })
        }
        _ => None,
    }
}

fn paint(out: &mut String, glyph: &str, color: &str, options: RenderOptions) {
    match parse_hex_color(color).filter(|_| options.color) {
        Some(c) => {
            let _ = write!(out, "{}", style(glyph).with(c));
        }
        None => out.push_str(glyph),
    }
}

/// Place labels into a row of `width` characters, skipping any that would
/// overlap the previous one.
fn label_row(labels: &[String], cell_width: usize) -> String {
    let mut row: Vec<char> = vec![' '; labels.len() * cell_width];
    let mut next_free = 0;
    for (col, label) in labels.iter().enumerate() {
        let at = col * cell_width;
        if label.is_empty() || at < next_free {
            continue;
        }
        for (i, ch) in label.chars().enumerate() {
            if at + i >= row.len() {
                row.push(ch);
            } else {
                row[at + i] = ch;
            }
        }
        next_free = at + label.chars().count() + 1;
    }
    row.into_iter().collect::<String>().trim_end().to_string()
}

fn grid_cell(out: &mut String, cell: Option<&GridCell>, options: RenderOptions) {
    match cell {
        Some(cell) if !cell.is_padding() => {
            paint(out, DAY_GLYPH, &cell.color, options);
            out.push(' ');
        }
        _ => out.push_str("  "),
    }
}

pub fn render_grid(layout: &GridLayout, options: RenderOptions) -> String {
    let mut out = String::new();
    out.push_str(&label_row(&layout.month_labels, 2));
    out.push('\n');

    if layout.quarter_labels.iter().any(|l| !l.is_empty()) {
        let quarters: String = layout
            .quarter_labels
            .iter()
            .map(|l| if l.is_empty() { "  ".to_string() } else { format!("{QUARTER_GLYPH} ") })
            .collect();
        out.push_str(quarters.trim_end());
        out.push('\n');
    }

    for row in 0..7 {
        let mut line = String::new();
        for week in 0..layout.weeks {
            grid_cell(&mut line, layout.cells.get(week * 7 + row), options);
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub fn render_timeline(layout: &TimelineLayout, options: RenderOptions) -> String {
    let ticks: Vec<String> = (0..layout.cells.len())
        .map(|i| {
            let minutes = i as u32 * layout.bucket_minutes;
            if minutes % 180 == 0 {
                format!("{:02}", minutes / 60)
            } else {
                String::new()
            }
        })
        .collect();

    let mut out = label_row(&ticks, 1);
    out.push('\n');
    for cell in &layout.cells {
        paint(&mut out, BUCKET_GLYPH, &cell.color, options);
    }
    out.push('\n');
    out
}

pub fn render_totals(totals: &ActivityTotals, format: &NumberFormatOptions) -> String {
    format!(
        "typing {} ({}%) | active {} | idle {} ({}%)",
        format_number(totals.typing, format),
        totals.typing_percent,
        format_number(totals.active, format),
        format_number(totals.idle, format),
        totals.idle_percent
    )
}
