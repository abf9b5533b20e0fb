use chrono::NaiveDate;

use crate::calendar::{Layout, WeekStart};
use crate::error::{Error, ErrorKind, Result};
use crate::grid::CalendarGrid;
use crate::holidays::{HolidayCache, HolidaySource, HolidayTable};
use crate::range::DateRange;
use crate::symbols::{Palette, Toggle};

/// Raw input of a generate action.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub start: Option<String>,
    pub end: Option<String>,
    pub week_start: WeekStart,
    pub layout: Layout,
}

impl GenerateRequest {
    pub fn new(start: &str, end: &str) -> Self {
        GenerateRequest {
            start: Some(start.to_owned()),
            end: Some(end.to_owned()),
            ..GenerateRequest::default()
        }
    }

    pub fn week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }
}

/// State of one interactive session.
///
/// Every successful `generate` replaces the grid, which clears all symbols,
/// and bumps the generation counter. The holiday table outlives
/// generations.
pub struct Session {
    holidays: HolidayCache,
    palette: Palette,
    grid: Option<CalendarGrid>,
    generation: u64,
}

impl Session {
    pub fn new(source: Box<dyn HolidaySource>, palette: Palette) -> Self {
        Session {
            holidays: HolidayCache::new(source),
            palette,
            grid: None,
            generation: 0,
        }
    }

    pub fn generate(&mut self, request: &GenerateRequest) -> Result<&CalendarGrid> {
        let range = DateRange::parse(request.start.as_deref(), request.end.as_deref())?;

        log::debug!(
            "Generating {} calendar from {} to {} (week starts {})",
            request.layout,
            range.start(),
            range.end(),
            request.week_start
        );

        let grid = CalendarGrid::build(
            range,
            request.week_start,
            request.layout,
            self.holidays.load(),
        );

        self.generation += 1;
        let grid: &CalendarGrid = self.grid.insert(grid.with_generation(self.generation));
        Ok(grid)
    }

    pub fn grid(&self) -> Option<&CalendarGrid> {
        self.grid.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Holidays loaded by an earlier `generate`; never fetches.
    pub fn holidays(&self) -> &HolidayTable {
        self.holidays.table()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn select_symbol(&mut self, glyph: char) -> Result<()> {
        self.palette.activate(glyph)
    }

    /// Toggles the active symbol on `date` in the current grid.
    pub fn toggle(&mut self, date: &NaiveDate) -> Result<Toggle> {
        let symbol = self
            .palette
            .active()
            .ok_or_else(|| Error::from(ErrorKind::NoActiveSymbol))?;
        let grid = self
            .grid
            .as_mut()
            .ok_or_else(|| Error::from(ErrorKind::NoCalendar))?;
        let cell = grid
            .cell_mut(date)
            .filter(|cell| cell.is_selectable())
            .ok_or_else(|| Error::new(ErrorKind::NotSelectable, &date.to_string()))?;

        let result = cell.symbols.toggle(symbol);
        log::debug!("{:?} '{}' on {}", result, symbol, date);
        Ok(result)
    }

    /// Like `toggle`, but only if `generation` still names the current grid.
    pub fn toggle_in(&mut self, generation: u64, date: &NaiveDate) -> Result<Toggle> {
        if self.grid.is_none() {
            return Err(ErrorKind::NoCalendar.into());
        }
        if generation != self.generation {
            return Err(Error::new(
                ErrorKind::StaleGeneration,
                &format!("{} superseded by {}", generation, self.generation),
            ));
        }
        self.toggle(date)
    }
}
