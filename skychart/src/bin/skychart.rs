//! Sky chart command line tool
//!
//! Renders charts to PNG, animates transitions between two observers into a
//! frame sequence, resolves place names and prints single star positions.
//!
//! ```text
//! skychart snapshot --lat 64.15 --lon -21.94 --date 2024-12-21 --time 22:00:00
//! skychart snapshot --place Reykjavik --transparent
//! skychart animate --lat 31.23 --lon 121.47 --to-lat 51.5 --to-lon -0.12 --every 5
//! skychart locate "Mauna Kea"
//! skychart position --ra 101.287 --dec -16.716
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand};
use skychart::export::encode_png;
use skychart::{
    apply_place_lookup, ChartConfig, Clock, FrameSource, LiveView, NominatimLookup, ObserverState,
    PlaceLookup, SimulatedFrames, SnapshotExporter,
};
use starfield::SkyData;

#[derive(Parser, Debug)]
#[command(
    name = "skychart",
    about = "Renders azimuthal charts of the naked-eye sky",
    long_about = None
)]
struct Cli {
    /// JSON configuration file; command line flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct ObserverArgs {
    /// Observer latitude in degrees, north positive
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Observer longitude in degrees, east positive
    #[arg(long, allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Calendar date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Wall-clock time (HH:MM:SS), defaults to now
    #[arg(long)]
    time: Option<NaiveTime>,

    /// Place name to search for; a match replaces latitude and longitude
    #[arg(long)]
    place: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct DataArgs {
    /// Star catalog JSON file
    #[arg(long)]
    stars: Option<PathBuf>,

    /// Constellation lines JSON file
    #[arg(long)]
    lines: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct StyleArgs {
    /// Hide constellation lines
    #[arg(long)]
    no_constellations: bool,

    /// Star opacity multiplier
    #[arg(long)]
    brightness: Option<f64>,

    /// Star size multiplier
    #[arg(long)]
    star_size: Option<f64>,

    /// Edge length of the rendered image in pixels
    #[arg(long)]
    resolution: Option<u32>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one chart to starmap_<date>.png
    Snapshot {
        #[command(flatten)]
        observer: ObserverArgs,

        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        style: StyleArgs,

        /// Leave the sky background transparent
        #[arg(long)]
        transparent: bool,

        /// Directory to write the image into
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Animate from one observer to another and write frames as PNG
    Animate {
        #[command(flatten)]
        observer: ObserverArgs,

        /// Target latitude, defaults to the start latitude
        #[arg(long, allow_negative_numbers = true)]
        to_lat: Option<f64>,

        /// Target longitude, defaults to the start longitude
        #[arg(long, allow_negative_numbers = true)]
        to_lon: Option<f64>,

        /// Target date, defaults to the start date
        #[arg(long)]
        to_date: Option<NaiveDate>,

        /// Target time, defaults to the start time
        #[arg(long)]
        to_time: Option<NaiveTime>,

        /// Target place name; a match replaces the target coordinates
        #[arg(long)]
        to_place: Option<String>,

        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        style: StyleArgs,

        /// Write every N-th frame (the last frame is always written)
        #[arg(long, default_value_t = 10)]
        every: usize,

        /// Directory for frame_NNNN.png files
        #[arg(long, default_value = "frames")]
        output_dir: PathBuf,
    },

    /// Resolve a place name to coordinates
    Locate {
        /// Free text place name
        query: String,
    },

    /// Print altitude and azimuth of one equatorial position
    Position {
        #[command(flatten)]
        observer: ObserverArgs,

        /// Right ascension in degrees
        #[arg(long, allow_negative_numbers = true)]
        ra: f64,

        /// Declination in degrees
        #[arg(long, allow_negative_numbers = true)]
        dec: f64,
    },
}

fn load_config(path: Option<&Path>) -> Result<ChartConfig> {
    match path {
        Some(path) => ChartConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display())),
        None => Ok(ChartConfig::default()),
    }
}

fn apply_style(config: &mut ChartConfig, style: &StyleArgs) {
    if style.no_constellations {
        config.render.show_constellations = false;
    }
    if let Some(brightness) = style.brightness {
        config.render.brightness = brightness;
    }
    if let Some(star_size) = style.star_size {
        config.render.star_size = star_size;
    }
    if let Some(resolution) = style.resolution {
        config.resolution = resolution;
    }
}

fn load_sky(config: &ChartConfig, data: &DataArgs) -> Result<SkyData> {
    let stars = data.stars.as_ref().unwrap_or(&config.data.stars_path);
    let lines = data
        .lines
        .as_ref()
        .unwrap_or(&config.data.constellation_lines_path);
    SkyData::load(stars, lines).with_context(|| {
        format!(
            "Failed to load sky data from {} and {}",
            stars.display(),
            lines.display()
        )
    })
}

/// Apply `--place` style searches; a failed search keeps `observer` as given.
fn with_place<L: PlaceLookup + ?Sized>(
    lookup: &L,
    place: Option<&str>,
    observer: ObserverState,
) -> ObserverState {
    match place {
        Some(query) => apply_place_lookup(lookup, query, &observer),
        None => observer,
    }
}

fn observer_from_args<L: PlaceLookup + ?Sized>(
    config: &ChartConfig,
    args: &ObserverArgs,
    lookup: &L,
) -> Result<ObserverState> {
    let now = Local::now().naive_local();
    let date = args.date.unwrap_or(now.date());
    let time = args.time.unwrap_or(now.time());
    let latitude = args.lat.unwrap_or(config.observer.latitude_deg);
    let longitude = args.lon.unwrap_or(config.observer.longitude_deg);
    let observer = ObserverState::new(latitude, longitude, NaiveDateTime::new(date, time))
        .context("Invalid observer")?;
    Ok(with_place(lookup, args.place.as_deref(), observer))
}

fn snapshot(
    config: &ChartConfig,
    observer: &ObserverState,
    sky: &SkyData,
    transparent: bool,
    output_dir: &Path,
) -> Result<()> {
    let exporter = SnapshotExporter::new(config.resolution);
    let path = exporter.save(
        sky,
        observer,
        &config.render,
        !transparent,
        output_dir,
        Utc::now().date_naive(),
    )?;
    println!("{}", path.display());
    Ok(())
}

fn animate(
    config: &ChartConfig,
    from: ObserverState,
    to: ObserverState,
    sky: SkyData,
    every: usize,
    output_dir: &Path,
) -> Result<()> {
    if every == 0 {
        bail!("--every must be at least 1");
    }
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let mut view = LiveView::with_settings(
        Arc::new(sky),
        from,
        config.render,
        config.resolution,
        config.transition_duration(),
    )?;
    let mut frames = SimulatedFrames::new(config.frame_interval());
    view.set_observer(to, frames.now())?;

    let mut index = 0;
    let mut written = 0;
    while view.has_pending_frame() {
        let now = frames.wait_next_frame();
        let Some(frame) = view.on_frame(now)? else {
            break;
        };
        if index % every == 0 || frame.finished {
            let path = output_dir.join(format!("frame_{index:04}.png"));
            std::fs::write(&path, encode_png(view.surface())?)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::debug!("Wrote {} at progress {:.3}", path.display(), frame.progress);
            written += 1;
        }
        index += 1;
    }

    println!(
        "Rendered {index} frames, wrote {written} to {}",
        output_dir.display()
    );
    Ok(())
}

fn locate(lookup: &NominatimLookup, query: &str) -> Result<()> {
    match lookup.lookup(query)? {
        Some(place) => println!(
            "{}: {:.6}, {:.6}",
            place.label, place.latitude_deg, place.longitude_deg
        ),
        None => println!("No match for {query:?}"),
    }
    Ok(())
}

fn position(observer: &ObserverState, ra: f64, dec: f64) {
    let horizontal = observer.horizontal(ra, dec);
    println!(
        "alt {:.4} az {:.4} ({})",
        horizontal.altitude_deg,
        horizontal.azimuth_deg,
        if horizontal.is_above_horizon() {
            "visible"
        } else {
            "below horizon"
        }
    );
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    let lookup = NominatimLookup::default();

    match cli.command {
        Command::Snapshot {
            observer,
            data,
            style,
            transparent,
            output_dir,
        } => {
            apply_style(&mut config, &style);
            config.validate()?;
            let observer = observer_from_args(&config, &observer, &lookup)?;
            let sky = load_sky(&config, &data)?;
            snapshot(&config, &observer, &sky, transparent, &output_dir)
        }
        Command::Animate {
            observer,
            to_lat,
            to_lon,
            to_date,
            to_time,
            to_place,
            data,
            style,
            every,
            output_dir,
        } => {
            apply_style(&mut config, &style);
            config.validate()?;
            let from = observer_from_args(&config, &observer, &lookup)?;
            let to = ObserverState::new(
                to_lat.unwrap_or(from.latitude_deg()),
                to_lon.unwrap_or(from.longitude_deg()),
                NaiveDateTime::new(
                    to_date.unwrap_or(from.timestamp().date()),
                    to_time.unwrap_or(from.timestamp().time()),
                ),
            )
            .context("Invalid target observer")?;
            let to = with_place(&lookup, to_place.as_deref(), to);
            let sky = load_sky(&config, &data)?;
            animate(&config, from, to, sky, every, &output_dir)
        }
        Command::Locate { query } => locate(&lookup, &query),
        Command::Position { observer, ra, dec } => {
            let observer = observer_from_args(&config, &observer, &lookup)?;
            position(&observer, ra, dec);
            Ok(())
        }
    }
}
