extern crate habgrid as lib;

use chrono::{DateTime, Utc};
use flexi_logger::{Duplicate, FileSpec, Logger};
use itertools::Itertools;
use lib::error::Error;
use lib::timeline::SnapshotGenerator;
use lib::widget::{TimelineContext, TimelineProvider, WidgetBundle};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "habgrid",
    about = "Prints the habit grid timeline a widget host would receive."
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

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,

    #[structopt(
        long = "at",
        help = "reference instant (RFC 3339), defaults to now",
        parse(try_from_str = parse_instant)
    )]
    pub at: Option<DateTime<Utc>>,

    #[structopt(
        short = "n",
        long = "entries",
        help = "number of timeline entries, overrides the config",
        allow_hyphen_values = true
    )]
    pub entries: Option<i64>,
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>, Error> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .duplicate_to_stderr(Duplicate::Warn);
    }

    logger.start()?;

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    let mut provider = config.provider();
    if let Some(entries) = args.entries {
        provider = provider.with_generator(SnapshotGenerator::new(entries));
    }

    let bundle = WidgetBundle::default().with_widget(config.widget());
    let ctx = TimelineContext::new(args.at.unwrap_or_else(Utc::now));
    let timeline = provider.timeline(&ctx);

    for widget in bundle.widgets() {
        let month = provider
            .calendar()
            .month_of(&ctx.now)
            .map_or("?", |m| m.name());
        let reload = timeline
            .next_reload()
            .map_or_else(|| "never".to_owned(), |dt| dt.to_rfc3339());

        println!(
            "{} ({}) - {}, next reload {}",
            widget.display_name, widget.kind, month, reload
        );

        for entry in timeline.entries() {
            let days = entry.days();
            let span = match (days.first(), days.last()) {
                (Some(first), Some(last)) => format!("{}-{}", first, last),
                _ => "-".to_owned(),
            };

            println!(
                "  {}  {}  days {}",
                entry.timestamp().to_rfc3339(),
                entry.row_titles().join(" "),
                span
            );
        }
    }

    Ok(())
}
