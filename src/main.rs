use anyhow::{Context as _, Result};
use cairo::{Context, Format, ImageSurface};
use chrono::{NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use clap::{Parser, ValueEnum};
use crossbeam::channel::{bounded, Receiver, Sender};
use line_watchface::config::load_images;
use line_watchface::core::{HeadlessHost, RedrawRequester, TokioTicker, WatchFaceEngine, WatchFaceHost};
use line_watchface::engine_core::{ManualTicker, Ticker};
use line_watchface::types::{ActionError, StyleMode, WatchFaceAction};
use line_watchface::{AppConfig, ComplicationsFile};
use log::{info, warn};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// line-watchface - render the line watch face to PNG
#[derive(Parser, Debug, Clone)]
#[command(name = "line-watchface")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output PNG file
    #[arg(short = 'o', long = "output", value_name = "PNG", default_value = "watchface.png")]
    output: PathBuf,

    /// Config file to use instead of the saved one
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Complication JSON, keyed by slot role; image keys are PNG paths relative to it
    #[arg(long = "complications", value_name = "FILE")]
    complications: Option<PathBuf>,

    /// Render in ambient mode
    #[arg(short = 'a', long = "ambient")]
    ambient: bool,

    /// Bezel shape override
    #[arg(long = "bezel", value_enum)]
    bezel: Option<Bezel>,

    /// Style mode override
    #[arg(long = "style", value_enum)]
    style: Option<StyleArg>,

    /// Surface edge length in pixels
    #[arg(long = "size", value_name = "PX")]
    size: Option<u32>,

    /// Time zone override (IANA name, e.g. Europe/Berlin)
    #[arg(long = "tz", value_name = "ZONE")]
    tz: Option<Tz>,

    /// Local time to render, e.g. 2024-03-14T10:09:30 (default: now)
    #[arg(short = 't', long = "time", value_name = "DATETIME")]
    time: Option<NaiveDateTime>,

    /// Unread and total notification counts
    #[arg(long = "notifications", value_name = "UNREAD,TOTAL", value_parser = parse_pair)]
    notifications: Option<(u32, u32)>,

    /// Tap this point after rendering and print the resulting action
    #[arg(long = "tap", value_name = "X,Y", value_parser = parse_point)]
    tap: Option<(f64, f64)>,

    /// Keep redrawing the output file on the frame ticker for this many seconds
    #[arg(long = "live", value_name = "SECONDS")]
    live: Option<u64>,

    /// Save the effective configuration as the new default
    #[arg(long = "save-config")]
    save_config: bool,

    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Bezel {
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StyleArg {
    Digitalog,
    Digital,
    Analog,
}

impl From<StyleArg> for StyleMode {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Digitalog => StyleMode::Digitalog,
            StyleArg::Digital => StyleMode::Digital,
            StyleArg::Analog => StyleMode::Analog,
        }
    }
}

/// Parse "A,B" into two numbers
fn parse_two<T: std::str::FromStr>(s: &str) -> Result<(T, T), String>
where
    T::Err: std::fmt::Display,
{
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| format!("Expected format: A,B (e.g., 50,50), got: {}", s))?;
    let a = a.trim().parse::<T>().map_err(|e| format!("Invalid first value: {}", e))?;
    let b = b.trim().parse::<T>().map_err(|e| format!("Invalid second value: {}", e))?;
    Ok((a, b))
}

fn parse_pair(s: &str) -> Result<(u32, u32), String> {
    parse_two(s)
}

fn parse_point(s: &str) -> Result<(f64, f64), String> {
    parse_two(s)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = effective_config(&cli)?;
    if cli.save_config {
        config.save()?;
        info!("Saved config to {}", AppConfig::config_path()?.display());
    }

    let complications = match &cli.complications {
        Some(path) => {
            let file = ComplicationsFile::load_from_path(path)?;
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            let loaded = load_images(&file, base);
            info!("Loaded {} complications, {} images", file.slots.len(), loaded);
            file
        }
        None => ComplicationsFile::default(),
    };

    match cli.live {
        Some(seconds) => run_live(&cli, &config, &complications, Duration::from_secs(seconds)),
        None => render_once(&cli, &config, &complications),
    }
}

fn effective_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::load().unwrap_or_else(|e| {
            warn!("Using default config: {:#}", e);
            AppConfig::default()
        }),
    };
    if let Some(bezel) = cli.bezel {
        config.device.is_round = matches!(bezel, Bezel::Round);
    }
    if let Some(style) = cli.style {
        config.preferences.style_mode = style.into();
    }
    if let Some(size) = cli.size {
        config.surface.width = size;
        config.surface.height = size;
    }
    if let Some(tz) = cli.tz {
        config.time_zone = tz;
    }
    Ok(config)
}

fn render_millis(cli: &Cli, tz: Tz) -> Result<i64> {
    match cli.time {
        Some(local) => tz
            .from_local_datetime(&local)
            .earliest()
            .map(|time| time.timestamp_millis())
            .ok_or_else(|| anyhow::anyhow!("{} does not exist in {}", local, tz)),
        None => Ok(Utc::now().timestamp_millis()),
    }
}

/// Push the CLI's scene into a fresh engine
fn prepare<H: WatchFaceHost + 'static, T: Ticker>(
    engine: &mut WatchFaceEngine<H, T>,
    cli: &Cli,
    complications: &ComplicationsFile,
) {
    engine.on_visibility_changed(true);
    engine.on_ambient_mode_changed(cli.ambient);
    for (slot, data) in complications.entries() {
        engine.update_complication(slot, data.clone());
    }
    if let Some((unread, total)) = cli.notifications {
        engine.on_notification_counts_changed(unread, total);
    }
}

fn write_frame<H: WatchFaceHost + 'static, T: Ticker>(
    engine: &mut WatchFaceEngine<H, T>,
    now_millis: i64,
    output: &Path,
) -> Result<()> {
    let (width, height) = engine.surface_size();
    let surface = ImageSurface::create(Format::ARgb32, width as i32, height as i32)?;
    {
        let cr = Context::new(&surface)?;
        let regions = engine.draw(&cr, now_millis);
        log::debug!("Frame registered {} tap regions", regions.len());
    }
    let mut file = File::create(output)
        .with_context(|| format!("creating {}", output.display()))?;
    surface.write_to_png(&mut file)?;
    Ok(())
}

fn render_once(cli: &Cli, config: &AppConfig, complications: &ComplicationsFile) -> Result<()> {
    let host = Arc::new(HeadlessHost::new(true));
    let redraw = RedrawRequester::new(host.clone());
    let mut engine = WatchFaceEngine::new(host.clone(), redraw, ManualTicker::new(), config);
    prepare(&mut engine, cli, complications);

    let now = render_millis(cli, config.time_zone)?;
    write_frame(&mut engine, now, &cli.output)?;
    println!("Wrote {}", cli.output.display());

    if let Some((x, y)) = cli.tap {
        engine.on_tap(x, y, now);
        match host.actions().last() {
            Some(action) => println!("Tap at ({}, {}): {:?}", x, y, action),
            None => println!("Tap at ({}, {}) hit nothing", x, y),
        }
    }
    engine.shutdown();
    Ok(())
}

/// Host for live mode: redraw requests wake the render loop
struct LiveHost {
    wake: Sender<()>,
}

impl WatchFaceHost for LiveHost {
    fn request_redraw(&self) {
        // A full channel already holds a wake-up
        let _ = self.wake.try_send(());
    }

    fn invoke_action(&self, action: &WatchFaceAction) -> Result<(), ActionError> {
        println!("Action: {:?}", action);
        Ok(())
    }

    fn register_time_zone_listener(&self) {}

    fn unregister_time_zone_listener(&self) {}

    fn uses_24_hour_format(&self) -> bool {
        true
    }
}

fn run_live(
    cli: &Cli,
    config: &AppConfig,
    complications: &ComplicationsFile,
    duration: Duration,
) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let (wake, woken): (Sender<()>, Receiver<()>) = bounded(1);
    let host = Arc::new(LiveHost { wake });
    let redraw = RedrawRequester::new(host.clone());
    let ticker = TokioTicker::new(runtime.handle().clone(), redraw.clone());
    let mut engine = WatchFaceEngine::new(host, redraw, ticker, config);
    prepare(&mut engine, cli, complications);

    info!("Live rendering to {} for {:?}", cli.output.display(), duration);
    let deadline = Instant::now() + duration;
    let mut frames = 0u64;
    while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
        if woken.recv_timeout(remaining).is_err() {
            break;
        }
        write_frame(&mut engine, Utc::now().timestamp_millis(), &cli.output)?;
        frames += 1;
    }
    engine.shutdown();
    println!("Wrote {} frames to {}", frames, cli.output.display());
    Ok(())
}
