use std::io::Read;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use heatgrid::config::{self, Config};
use heatgrid::render::{self, RenderOptions};
use heatgrid::types::{
    ActivityRecord, ContributionRecord, GridLayout, GridRange, TimelineRecord,
};
use heatgrid::{date_key, debug_log, grid, selection, timeline, utils};

#[derive(Parser)]
#[command(name = "heatgrid")]
#[command(version)]
#[command(disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out the editor-activity heatmap (typing / active / idle)
    Activity(GridArgs),
    /// Lay out the contribution heatmap
    Contributions(GridArgs),
    /// Lay out one day as fixed-width time buckets
    Timeline(TimelineArgs),
    /// Manage configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct GridArgs {
    /// Calendar year to lay out (Jan 1 - Dec 31). Defaults to the newest year in the input.
    #[arg(long, conflicts_with_all = ["days", "rolling"])]
    year: Option<String>,

    /// Lay out the last N days ending today instead of a calendar year.
    #[arg(long, allow_negative_numbers = true)]
    days: Option<i64>,

    /// Lay out a rolling window using the configured length.
    #[arg(long, default_value_t = false, conflicts_with = "days")]
    rolling: bool,

    /// Date to treat as today (YYYY-MM-DD). Defaults to the local date.
    #[arg(long)]
    today: Option<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct TimelineArgs {
    /// Bucket width in minutes. Defaults to the configured width.
    #[arg(long, allow_negative_numbers = true)]
    bucket_minutes: Option<i64>,

    /// Day the records belong to (YYYY-MM-DD), shown in the header.
    #[arg(long)]
    date: Option<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct OutputArgs {
    /// JSON file with the records, or "-" for stdin.
    #[arg(long, default_value = "-")]
    input: String,

    /// Print the layout as JSON instead of a terminal preview.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Print the layout as indented JSON.
    #[arg(long, default_value_t = false)]
    pretty: bool,

    /// Disable colours in the terminal preview.
    #[arg(long, default_value_t = false)]
    no_color: bool,
}

#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    subcommand: ConfigSubcommands,
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Create default configuration file
    Init {
        #[arg(long, default_value_t = false)]
        overwrite: bool,
    },
    /// Show current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key (typing-palette, active-palette, idle-color, contribution-palette,
        /// contribution-empty, rolling-days, bucket-minutes, number-comma, locale)
        key: String,
        /// Configuration value
        value: String,
    },
}

/// The shapes a data source may answer with.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordsPayload<T> {
    List(Vec<T>),
    Items(Items<T>),
    Envelope { data: Items<T> },
}

#[derive(Deserialize)]
struct Items<T> {
    items: Vec<T>,
}

fn main() {
    debug_log::init();
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            utils::warn_once(format!("Ignoring config file: {e:#}"));
            Config::default()
        }
    };

    let today = chrono::Local::now().date_naive();

    let result = match cli.command {
        Commands::Activity(args) => run_activity(args, &config, today),
        Commands::Contributions(args) => run_contributions(args, &config, today),
        Commands::Timeline(args) => run_timeline(args, &config),
        Commands::Config(args) => handle_config_subcommand(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn read_records<T: DeserializeOwned>(input: &str) -> Result<Vec<T>> {
    let mut bytes = Vec::new();
    if input == "-" {
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read stdin")?;
    } else {
        bytes = std::fs::read(input).with_context(|| format!("Failed to read {input}"))?;
    }

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let payload: RecordsPayload<T> =
        simd_json::serde::from_slice(&mut bytes).context("Failed to parse input JSON")?;
    Ok(match payload {
        RecordsPayload::List(items) => items,
        RecordsPayload::Items(wrapped) | RecordsPayload::Envelope { data: wrapped } => {
            wrapped.items
        }
    })
}

fn warn_dropped(kind: &str, raw: usize, kept: usize) {
    if kept < raw {
        utils::warn_once(format!(
            "Skipped {} {kind} record(s) with an invalid date",
            raw - kept
        ));
    }
}

/// `--today` when given, otherwise the local date read at startup.
fn resolve_today(raw: Option<&str>, local_today: NaiveDate) -> Result<NaiveDate> {
    match raw {
        Some(raw) => Ok(date_key::parse(raw)?),
        None => Ok(local_today),
    }
}

fn resolve_span(
    args: &GridArgs,
    config: &Config,
    years_in_data: &[i32],
    today: NaiveDate,
) -> Result<grid::GridSpan> {
    if let Some(days) = args.days {
        return Ok(grid::GridSpan::rolling(today, days)?);
    }
    if args.rolling {
        return Ok(grid::GridSpan::Rolling {
            today,
            days: config.grid.rolling_days,
        });
    }

    let requested = args.year.as_deref().map(grid::parse_year).transpose()?;
    Ok(grid::GridSpan::Year(selection::resolve_display_year(
        requested,
        None,
        years_in_data,
        today,
    )))
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        simd_json::to_string_pretty(value)?
    } else {
        simd_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

fn print_grid_header(layout: &GridLayout) {
    match layout.range {
        GridRange::Year { year } => println!(
            "{year}  ({} - {})",
            layout.range_start_label, layout.range_end_label
        ),
        GridRange::Rolling { start, end, days } => println!(
            "{} .. {}  ({days} days)",
            date_key::format(start),
            date_key::format(end)
        ),
    }
}

/// Tooltip of the day the dashboard would open on.
fn print_selected_day(layout: &GridLayout, today: NaiveDate) -> Result<()> {
    let selected = match layout.range {
        GridRange::Year { year } => selection::default_selected_date(year, today)?,
        GridRange::Rolling { end, .. } => end,
    };
    if let Some(cell) = layout.cell_for(&date_key::format(selected)) {
        println!("{}", cell.tooltip);
    }
    Ok(())
}

fn run_activity(args: GridArgs, config: &Config, local_today: NaiveDate) -> Result<()> {
    let today = resolve_today(args.today.as_deref(), local_today)?;
    let records: Vec<ActivityRecord> = read_records(&args.output.input)?;
    let metrics = utils::normalize_activity(&records);
    warn_dropped("activity", records.len(), metrics.len());

    let years: Vec<i32> = metrics.iter().map(|m| m.date.year()).collect();
    let span = resolve_span(&args, config, &years, today)?;
    let layout = grid::build_activity_grid(span, &metrics, &config.palettes.activity())?;

    if args.output.json || args.output.pretty {
        return print_json(&layout, args.output.pretty);
    }

    let options = RenderOptions {
        color: !args.output.no_color,
    };
    let totals = grid::summarize_activity(span, &metrics)?;
    print_grid_header(&layout);
    print!("{}", render::render_grid(&layout, options));
    println!(
        "{}",
        render::render_totals(&totals, &config.formatting.number_options())
    );
    print_selected_day(&layout, today)
}

fn run_contributions(args: GridArgs, config: &Config, local_today: NaiveDate) -> Result<()> {
    let today = resolve_today(args.today.as_deref(), local_today)?;
    let records: Vec<ContributionRecord> = read_records(&args.output.input)?;
    let metrics = utils::normalize_contributions(&records);
    warn_dropped("contribution", records.len(), metrics.len());

    let years: Vec<i32> = metrics.iter().map(|m| m.date.year()).collect();
    let span = resolve_span(&args, config, &years, today)?;
    let layout = grid::build_contribution_grid(span, &metrics, &config.palettes.contributions())?;

    if args.output.json || args.output.pretty {
        return print_json(&layout, args.output.pretty);
    }

    let options = RenderOptions {
        color: !args.output.no_color,
    };
    let total: u64 = metrics.iter().map(|m| m.count).sum();
    print_grid_header(&layout);
    print!("{}", render::render_grid(&layout, options));
    println!(
        "{} contributions in input",
        utils::format_number(total, &config.formatting.number_options())
    );
    print_selected_day(&layout, today)
}

fn run_timeline(args: TimelineArgs, config: &Config) -> Result<()> {
    let records: Vec<TimelineRecord> = read_records(&args.output.input)?;
    let width = args
        .bucket_minutes
        .unwrap_or_else(|| i64::from(config.grid.bucket_minutes));
    let layout =
        timeline::build_timeline_from_records(&records, width, &config.palettes.activity())?;

    if args.output.json || args.output.pretty {
        return print_json(&layout, args.output.pretty);
    }

    if let Some(date) = args.date.as_deref() {
        let date = date_key::parse(date)?;
        println!(
            "{}  ({} x {} min)",
            date_key::format(date),
            layout.buckets,
            layout.bucket_minutes
        );
    }
    let options = RenderOptions {
        color: !args.output.no_color,
    };
    print!("{}", render::render_timeline(&layout, options));
    Ok(())
}

fn handle_config_subcommand(config_args: ConfigArgs) -> Result<()> {
    match config_args.subcommand {
        ConfigSubcommands::Init { overwrite } => {
            config::create_default_config(overwrite).context("Error creating config")
        }
        ConfigSubcommands::Show => config::show_config().context("Error showing config"),
        ConfigSubcommands::Set { key, value } => {
            config::set_config_value(&key, &value).context("Error setting config")
        }
    }
}
