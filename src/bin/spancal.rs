extern crate spancal as lib;

use chrono::NaiveDate;
use flexi_logger::{FileSpec, Logger};
use lib::calendar::{self, Layout, WeekStart};
use lib::holidays::{FileHolidaySource, HolidaySource, NoHolidays};
use lib::render::TextRenderer;
use lib::session::{GenerateRequest, Session};
use lib::symbols::Toggle;
use lib::{Error, ErrorKind};
use std::io::{stdout, Write};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "spancal",
    about = "Spancal - printable calendars for a date range of up to six months."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(short = "s", long = "start", help = "first day (YYYY-MM-DD)")]
    pub start: Option<String>,

    #[structopt(short = "e", long = "end", help = "last day (YYYY-MM-DD)")]
    pub end: Option<String>,

    #[structopt(short = "w", long = "week-start", help = "first column: sun or mon")]
    pub week_start: Option<WeekStart>,

    #[structopt(short = "l", long = "layout", help = "month or continuous")]
    pub layout: Option<Layout>,

    #[structopt(
        short = "m",
        long = "mark",
        help = "toggle a symbol on a day, e.g. 2025-03-05=○",
        parse(try_from_str = parse_mark)
    )]
    pub marks: Vec<(NaiveDate, char)>,

    #[structopt(long = "title", help = "title printed above the calendar")]
    pub title: Option<String>,

    #[structopt(long = "memo", help = "memo printed below the calendar")]
    pub memo: Option<String>,

    #[structopt(long = "json", help = "print the calendar grid as JSON")]
    pub json: bool,

    #[structopt(long = "no-holidays", help = "do not look up public holidays")]
    pub no_holidays: bool,

    #[structopt(
        long = "holidays-file",
        help = "read holidays from a JSON file instead of the network",
        parse(from_os_str)
    )]
    pub holidays_file: Option<PathBuf>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn parse_mark(s: &str) -> Result<(NaiveDate, char), Error> {
    let (date, glyph) = s
        .split_once('=')
        .ok_or_else(|| Error::new(ErrorKind::SymbolParse, "expected DATE=SYMBOL"))?;

    let mut chars = glyph.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(glyph), None) => Ok((calendar::parse_date(date)?, glyph)),
        _ => Err(Error::new(
            ErrorKind::SymbolParse,
            &format!("'{}' is not a single character", glyph),
        )),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "warn"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = &args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    std::panic::set_hook(Box::new(|info| {
        eprintln!("Spancal ran into a fatal error!");
        eprintln!("{}", info);
        eprintln!("{:?}", backtrace::Backtrace::new());
    }));

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    let source: Box<dyn HolidaySource> = if args.no_holidays {
        Box::new(NoHolidays)
    } else if let Some(path) = &args.holidays_file {
        Box::new(FileHolidaySource::new(path))
    } else {
        config.holidays.source()
    };

    let mut session = Session::new(source, config.palette()?);

    let request = GenerateRequest {
        start: args.start.clone(),
        end: args.end.clone(),
        week_start: args.week_start.unwrap_or(config.week_start),
        layout: args.layout.unwrap_or(config.layout),
    };

    if let Err(e) = session.generate(&request) {
        if e.is_validation() {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        return Err(e.into());
    }

    for (date, glyph) in args.marks.iter() {
        session.select_symbol(*glyph)?;
        if session.toggle(date)? == Toggle::Full {
            log::warn!("{} already carries the maximum number of symbols", date);
        }
    }

    let grid = session
        .grid()
        .ok_or_else(|| Error::from(ErrorKind::NoCalendar))?;

    let mut out = stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, grid)?;
        writeln!(out)?;
    } else {
        let text = TextRenderer::new()
            .title(args.title.as_deref().or(config.title.as_deref()))
            .memo(args.memo.as_deref().or(config.memo.as_deref()))
            .render(grid, session.palette());
        write!(out, "{}", text)?;
    }

    Ok(())
}
