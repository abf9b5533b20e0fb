use chrono::Month;
use itertools::Itertools;
use num_traits::FromPrimitive;
use std::fmt::Write;
use unicode_width::UnicodeWidthStr;

use crate::grid::{Block, CalendarGrid, Cell, DayCell, Heading};
use crate::symbols::Palette;

const CELL_WIDTH: usize = 7;
const REST_DAY_MARKER: char = '*';
const HOLIDAY_MARKER: char = '+';

/// Plain-text rendering of a calendar grid.
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    title: Option<String>,
    memo: Option<String>,
}

impl TextRenderer {
    pub fn new() -> Self {
        TextRenderer::default()
    }

    pub fn title(mut self, title: Option<&str>) -> Self {
        self.title = title.map(str::to_owned).filter(|t| !t.trim().is_empty());
        self
    }

    pub fn memo(mut self, memo: Option<&str>) -> Self {
        self.memo = memo.map(str::to_owned).filter(|m| !m.trim().is_empty());
        self
    }

    pub fn render(&self, grid: &CalendarGrid, palette: &Palette) -> String {
        let mut out = String::new();

        if let Some(title) = &self.title {
            push_line(&mut out, title);
            push_line(&mut out, "");
        }

        for block in grid.blocks.iter() {
            self.render_block(&mut out, grid, block);
            push_line(&mut out, "");
        }

        let holidays = grid
            .days()
            .filter(|day| day.in_range)
            .filter_map(|day| day.holiday.as_ref().map(|name| (day.date, name)))
            .collect_vec();
        if !holidays.is_empty() {
            push_line(&mut out, "Holidays:");
            for (date, name) in holidays {
                push_line(&mut out, &format!("  {} {}", date, name));
            }
        }

        let legend = palette
            .legend()
            .map(|(glyph, label)| format!("{} {}", glyph, label))
            .join("  ");
        if !legend.is_empty() {
            push_line(&mut out, &format!("Legend: {}", legend));
        }

        if let Some(memo) = &self.memo {
            push_line(&mut out, "");
            memo.lines().for_each(|line| push_line(&mut out, line));
        }

        out
    }

    fn render_block(&self, out: &mut String, grid: &CalendarGrid, block: &Block) {
        push_line(out, &heading(&block.heading));

        let header = grid
            .week_start
            .weekdays()
            .map(|day| pad(&day.to_string()))
            .join("");
        push_line(out, &header);

        for week in block.weeks() {
            let labels = week.iter().map(|cell| pad(&label(cell))).join("");
            let symbols = week
                .iter()
                .map(|cell| pad(&cell.day().map_or(String::new(), |d| d.symbols.to_string())))
                .join("");
            push_line(out, &labels);
            push_line(out, &symbols);
        }
    }
}

pub fn heading(heading: &Heading) -> String {
    match heading {
        Heading::Month { year, month } => match Month::from_u32(*month) {
            Some(m) => format!("{} {}", m.name(), year),
            None => format!("{}-{:02}", year, month),
        },
        Heading::Span { start, end } => format!("{} to {}", start, end),
    }
}

fn label(cell: &Cell) -> String {
    match cell {
        Cell::Blank => String::new(),
        Cell::Day(day) if !day.in_range => format!("({})", day.label),
        Cell::Day(day) => format!("{}{}", day.label, markers(day)),
    }
}

fn markers(day: &DayCell) -> String {
    let mut markers = String::new();
    if day.is_rest_day() {
        markers.push(REST_DAY_MARKER);
    }
    if day.is_weekday_holiday() {
        markers.push(HOLIDAY_MARKER);
    }
    markers
}

/// Right-aligns `text` in a cell, measured in terminal columns.
fn pad(text: &str) -> String {
    let width = UnicodeWidthStr::width(text);
    format!("{}{}", " ".repeat(CELL_WIDTH.saturating_sub(width)), text)
}

fn push_line(out: &mut String, line: &str) {
    // Writing to a String cannot fail
    let _ = writeln!(out, "{}", line.trim_end());
}
