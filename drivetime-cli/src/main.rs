//! DriveTime CLI — traffic-aware departure-time scanner.
//!
//! Commands:
//! - `scan` — query ETAs across a departure grid, report best/worst times
//! - `geocode` — resolve a free-text place to coordinate candidates
//! - `map` — build (and optionally download) a static route map

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

use drivetime_core::domain::LatLng;
use drivetime_core::engine::StdoutProgress;
use drivetime_core::maps::{Geocoder, GoogleMapsClient, MapsConfig};
use drivetime_runner::config::{ChartSpec, FetchSpec, RouteSpec, ScanConfig, WindowSpec};
use drivetime_runner::report;
use drivetime_runner::{run_scan, save_artifacts, ScanError};

#[derive(Parser)]
#[command(
    name = "drivetime",
    about = "DriveTime CLI — find the best and worst times to drive a route"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query traffic-aware ETAs across a departure grid.
    Scan {
        /// Path to a TOML scan config. Mutually exclusive with the window flags.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Origin (free text or "lat,lng").
        #[arg(long)]
        origin: Option<String>,

        /// Destination (free text or "lat,lng").
        #[arg(long)]
        destination: Option<String>,

        /// Date (YYYY-MM-DD, local to the timezone).
        #[arg(long)]
        date: Option<String>,

        /// Window start (HH:MM, 24h).
        #[arg(long)]
        start: Option<String>,

        /// Window end (HH:MM, 24h).
        #[arg(long)]
        end: Option<String>,

        /// Minutes between departures.
        #[arg(long, default_value_t = 15)]
        interval: u32,

        /// IANA timezone of the window.
        #[arg(long, default_value = "America/Los_Angeles")]
        tz: String,

        /// Chart height in rows.
        #[arg(long, default_value_t = 20)]
        height: usize,

        /// Skip the endpoint confirmation prompt.
        #[arg(long, default_value_t = false)]
        yes: bool,

        /// Save a static route map PNG to this path.
        #[arg(long)]
        save_map: Option<PathBuf>,

        /// Skip chart rendering.
        #[arg(long, default_value_t = false)]
        no_chart: bool,

        /// Print the result as JSON instead of table + chart.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Artifact output directory.
        #[arg(long, default_value = "scans")]
        out_dir: PathBuf,
    },
    /// Resolve a free-text place to up to five candidates.
    Geocode {
        query: String,
    },
    /// Print a static-map URL for a route; optionally download the PNG.
    Map {
        /// Origin (free text or "lat,lng").
        #[arg(long)]
        origin: String,

        /// Destination (free text or "lat,lng").
        #[arg(long)]
        destination: String,

        /// Download the PNG to this path.
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            config,
            origin,
            destination,
            date,
            start,
            end,
            interval,
            tz,
            height,
            yes,
            save_map,
            no_chart,
            json,
            out_dir,
        } => run_scan_cmd(ScanArgs {
            config,
            origin,
            destination,
            date,
            start,
            end,
            interval,
            tz,
            height,
            yes,
            save_map,
            no_chart,
            json,
            out_dir,
        }),
        Commands::Geocode { query } => run_geocode(&query),
        Commands::Map {
            origin,
            destination,
            save,
        } => run_map(&origin, &destination, save.as_deref()),
    }
}

struct ScanArgs {
    config: Option<PathBuf>,
    origin: Option<String>,
    destination: Option<String>,
    date: Option<String>,
    start: Option<String>,
    end: Option<String>,
    interval: u32,
    tz: String,
    height: usize,
    yes: bool,
    save_map: Option<PathBuf>,
    no_chart: bool,
    json: bool,
    out_dir: PathBuf,
}

fn run_scan_cmd(args: ScanArgs) -> Result<()> {
    let scan_config = build_scan_config(&args)?;

    let client = GoogleMapsClient::new(MapsConfig::from_env()?);

    let (origin, origin_label) = resolve_endpoint(&client, &scan_config.route.origin, "Origin")?;
    let (destination, dest_label) =
        resolve_endpoint(&client, &scan_config.route.destination, "Destination")?;

    if !args.yes {
        let prompt = format!(
            "Proceed with\n  ORIGIN: {origin_label} ({origin})\n  DEST:   {dest_label} ({destination})"
        );
        if !ask_confirm(&prompt)? {
            println!("Okay. Re-run with --origin/--destination set to lat,lng directly.");
            std::process::exit(2);
        }
    }

    if let Some(path) = &args.save_map {
        let url = client.static_map_url(origin, destination)?;
        let bytes = client.fetch_static_map(&url)?;
        std::fs::write(path, bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Saved static map -> {}", path.display());
    }

    let result = match run_scan(&scan_config, origin, destination, &client, &StdoutProgress) {
        Ok(result) => result,
        Err(ScanError::NoCompleteSamples { failed_tasks }) => {
            eprintln!(
                "Error: no valid data points retrieved ({failed_tasks} calls failed). \
                 Check your API key and network connection."
            );
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&scan_json(&result))?);
    } else {
        println!();
        print!("{}", report::departure_table(&result.points));

        if !result.chart.is_empty() {
            println!();
            print!("{}", result.chart);
        }

        println!();
        print!("{}", report::key_points(&result.insight));

        if result.dropped_points > 0 {
            println!();
            println!(
                "Note: {} time point(s) skipped because only one traffic model succeeded",
                result.dropped_points
            );
        }
        if result.failed_tasks > 0 {
            println!(
                "Warning: {} call(s) never succeeded after {} rounds of retries",
                result.failed_tasks, scan_config.fetch.max_rounds
            );
        }
    }

    let dir = save_artifacts(&result, &scan_config, &args.out_dir)?;
    println!();
    println!("Artifacts saved to: {}", dir.display());

    Ok(())
}

fn build_scan_config(args: &ScanArgs) -> Result<ScanConfig> {
    if let Some(path) = &args.config {
        let window_flags_given = args.origin.is_some()
            || args.destination.is_some()
            || args.date.is_some()
            || args.start.is_some()
            || args.end.is_some();
        if window_flags_given {
            bail!("--config and the explicit route/window flags are mutually exclusive");
        }
        return Ok(ScanConfig::from_file(path)?);
    }

    let (Some(origin), Some(destination)) = (&args.origin, &args.destination) else {
        bail!("--origin and --destination are required without --config");
    };
    let (Some(date), Some(start), Some(end)) = (&args.date, &args.start, &args.end) else {
        bail!("--date, --start, and --end are required without --config");
    };

    let config = ScanConfig {
        route: RouteSpec {
            origin: origin.clone(),
            destination: destination.clone(),
        },
        window: WindowSpec {
            date: date.clone(),
            start: start.clone(),
            end: end.clone(),
            interval_minutes: args.interval,
            timezone: args.tz.clone(),
        },
        fetch: FetchSpec::default(),
        chart: ChartSpec {
            height: args.height,
            enabled: !args.no_chart,
        },
    };

    // Surface window mistakes before any network call.
    config.resolved_window()?;
    Ok(config)
}

/// JSON surface for scripting: the series rows plus the insights block.
fn scan_json(result: &drivetime_runner::ScanResult) -> serde_json::Value {
    let series: Vec<serde_json::Value> = result
        .points
        .iter()
        .map(|p| {
            serde_json::json!({
                "departure": p.departure.to_rfc3339(),
                "optimistic_min": p.optimistic,
                "pessimistic_min": p.pessimistic,
                "average_min": p.average,
            })
        })
        .collect();

    let insight_row = |p: &drivetime_core::assemble::SeriesPoint| {
        serde_json::json!({
            "departure": p.departure.format("%H:%M").to_string(),
            "average_min": p.average,
            "optimistic_min": p.optimistic,
            "pessimistic_min": p.pessimistic,
        })
    };

    serde_json::json!({
        "series": series,
        "insights": {
            "best_time": insight_row(&result.insight.best),
            "worst_time": insight_row(&result.insight.worst),
            "time_difference_min": result.insight.spread,
        },
        "dropped_points": result.dropped_points,
        "failed_tasks": result.failed_tasks,
    })
}

/// Resolve one endpoint: "lat,lng" input is used directly, anything else
/// goes through the geocoder and the top candidate wins.
fn resolve_endpoint(
    client: &GoogleMapsClient,
    input: &str,
    label: &str,
) -> Result<(LatLng, String)> {
    if let Some(coord) = LatLng::parse(input) {
        return Ok((coord, input.to_string()));
    }

    let candidates = client
        .resolve(input)
        .with_context(|| format!("geocoding failed for {}", label.to_lowercase()))?;

    println!("{label} candidates:");
    for (i, candidate) in candidates.iter().enumerate() {
        println!(
            "  {}. {}  ({})",
            i + 1,
            candidate.formatted_address,
            candidate.location
        );
    }

    let top = &candidates[0];
    Ok((top.location, top.formatted_address.clone()))
}

fn ask_confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N]: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let resp = line.trim().to_lowercase();
    Ok(resp == "y" || resp == "yes")
}

fn run_geocode(query: &str) -> Result<()> {
    let client = GoogleMapsClient::new(MapsConfig::from_env()?);
    let candidates = client.resolve(query)?;
    for (i, candidate) in candidates.iter().enumerate() {
        println!(
            "{}. {}  ({})  place_id={}",
            i + 1,
            candidate.formatted_address,
            candidate.location,
            candidate.place_id.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn run_map(origin: &str, destination: &str, save: Option<&Path>) -> Result<()> {
    let client = GoogleMapsClient::new(MapsConfig::from_env()?);

    let (origin, _) = resolve_endpoint(&client, origin, "Origin")?;
    let (destination, _) = resolve_endpoint(&client, destination, "Destination")?;

    let url = client.static_map_url(origin, destination)?;
    println!("{url}");

    if let Some(path) = save {
        let bytes = client.fetch_static_map(&url)?;
        std::fs::write(path, bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Saved static map -> {}", path.display());
    }

    Ok(())
}
