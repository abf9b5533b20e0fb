use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

use crate::calendar::{self, Layout, WeekStart};
use crate::holidays::HolidayTable;
use crate::range::DateRange;
use crate::symbols::SymbolSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_range: bool,
    pub saturday: bool,
    pub sunday: bool,
    pub holiday: Option<String>,
    pub symbols: SymbolSet,
    pub label: String,
}

impl DayCell {
    fn new(date: NaiveDate, label: String, range: &DateRange, holidays: &HolidayTable) -> Self {
        let in_range = range.contains(&date);
        let weekday = date.weekday();

        DayCell {
            date,
            in_range,
            saturday: in_range && weekday == Weekday::Sat,
            sunday: in_range && weekday == Weekday::Sun,
            holiday: if in_range {
                holidays.lookup(&date).map(str::to_owned)
            } else {
                None
            },
            symbols: SymbolSet::default(),
            label,
        }
    }

    pub fn is_holiday(&self) -> bool {
        self.holiday.is_some()
    }

    /// Sundays and holidays share one visual class.
    pub fn is_rest_day(&self) -> bool {
        self.sunday || self.is_holiday()
    }

    /// Holidays that do not fall on a Sunday get an extra marker.
    pub fn is_weekday_holiday(&self) -> bool {
        self.is_holiday() && !self.sunday
    }

    pub fn is_selectable(&self) -> bool {
        self.in_range
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Cell {
    Blank,
    Day(DayCell),
}

impl Cell {
    pub fn day(&self) -> Option<&DayCell> {
        match self {
            Cell::Day(day) => Some(day),
            Cell::Blank => None,
        }
    }

    pub fn day_mut(&mut self) -> Option<&mut DayCell> {
        match self {
            Cell::Day(day) => Some(day),
            Cell::Blank => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Heading {
    Month { year: i32, month: u32 },
    Span { start: NaiveDate, end: NaiveDate },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub heading: Heading,
    pub cells: Vec<Cell>,
}

impl Block {
    /// Cells grouped into 7-day rows.
    pub fn weeks(&self) -> std::slice::Chunks<'_, Cell> {
        self.cells.chunks(7)
    }

    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter().filter_map(Cell::day)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarGrid {
    pub range: DateRange,
    pub week_start: WeekStart,
    pub layout: Layout,
    pub generation: u64,
    pub blocks: Vec<Block>,
}

impl CalendarGrid {
    pub fn build(
        range: DateRange,
        week_start: WeekStart,
        layout: Layout,
        holidays: &HolidayTable,
    ) -> Self {
        let blocks = match layout {
            Layout::ByMonth => range
                .months()
                .map(|first| month_block(first, &range, week_start, holidays))
                .collect(),
            Layout::Continuous => vec![continuous_block(&range, week_start, holidays)],
        };

        CalendarGrid {
            range,
            week_start,
            layout,
            generation: 0,
            blocks,
        }
    }

    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.blocks.iter().flat_map(Block::days)
    }

    /// The in-range cell for `date`, if any.
    pub fn cell(&self, date: &NaiveDate) -> Option<&DayCell> {
        self.days().find(|day| day.in_range && day.date == *date)
    }

    pub fn cell_mut(&mut self, date: &NaiveDate) -> Option<&mut DayCell> {
        self.blocks
            .iter_mut()
            .flat_map(|block| block.cells.iter_mut())
            .filter_map(Cell::day_mut)
            .find(|day| day.in_range && day.date == *date)
    }

    /// In-range days that carry at least one symbol.
    pub fn marked(&self) -> impl Iterator<Item = &DayCell> {
        self.days().filter(|day| day.in_range && !day.symbols.is_empty())
    }
}

fn month_block(
    first: NaiveDate,
    range: &DateRange,
    week_start: WeekStart,
    holidays: &HolidayTable,
) -> Block {
    let offset = week_start.offset(first.weekday()) as usize;
    let days = calendar::days_of_month(&first) as usize;
    let total = (offset + days + 6) / 7 * 7;

    let cells = (0..total)
        .map(|i| {
            if i < offset || i >= offset + days {
                Cell::Blank
            } else {
                let date = first + Duration::days((i - offset) as i64);
                Cell::Day(DayCell::new(date, date.day().to_string(), range, holidays))
            }
        })
        .collect();

    Block {
        heading: Heading::Month {
            year: first.year(),
            month: first.month(),
        },
        cells,
    }
}

fn continuous_block(range: &DateRange, week_start: WeekStart, holidays: &HolidayTable) -> Block {
    let lead = week_start.offset(range.start().weekday()) as i64;
    let trail = 6 - week_start.offset(range.end().weekday()) as i64;
    let first = range.start() - Duration::days(lead);
    let last = range.end() + Duration::days(trail);

    let cells = first
        .iter_days()
        .take_while(|date| *date <= last)
        .map(|date| {
            let label = if date == first || date.day() == 1 {
                format!("{}/{}", date.month(), date.day())
            } else {
                date.day().to_string()
            };
            Cell::Day(DayCell::new(date, label, range, holidays))
        })
        .collect();

    Block {
        heading: Heading::Span {
            start: range.start(),
            end: range.end(),
        },
        cells,
    }
}
