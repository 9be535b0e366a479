use std::{
    io::BufRead as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pagespot", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the normalized page sequence as JSON.
    Pages(PagesArgs),
    /// Print centroid, zoom viewport and spotlight stops for one hotspot.
    Viewport(ViewportArgs),
    /// Apply a JSON-lines playback command script and print the final reader state.
    Replay(ReplayArgs),
}

#[derive(Parser, Debug)]
struct PagesArgs {
    /// Input manifest JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Only print this page (1-based).
    #[arg(long)]
    page: Option<u32>,
}

#[derive(Parser, Debug)]
struct ViewportArgs {
    /// Input manifest JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Page holding the hotspot (1-based).
    #[arg(long)]
    page: u32,

    /// Hotspot id.
    #[arg(long)]
    hotspot: String,

    /// Page image width in pixels.
    #[arg(long, requires = "height", conflicts_with = "image")]
    width: Option<f64>,

    /// Page image height in pixels.
    #[arg(long, requires = "width", conflicts_with = "image")]
    height: Option<f64>,

    /// Read the page image size from this file instead.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Zoom factor (defaults to the configured default zoom scale).
    #[arg(long)]
    zoom: Option<f64>,

    /// Reader configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Input manifest JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// JSON-lines file, one playback command per line.
    #[arg(long)]
    script: PathBuf,

    /// Reader configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Persist read-state and settings to this JSON file.
    #[arg(long)]
    store: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Pages(args) => cmd_pages(args),
        Command::Viewport(args) => cmd_viewport(args),
        Command::Replay(args) => cmd_replay(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<pagespot::ReaderConfig> {
    match path {
        Some(p) => pagespot::ReaderConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(pagespot::ReaderConfig::default()),
    }
}

fn load_manifest(path: &Path) -> anyhow::Result<pagespot::ManifestDef> {
    pagespot::load_manifest_file(path)
        .with_context(|| format!("load manifest '{}'", path.display()))
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("encode output json")?;
    println!("{json}");
    Ok(())
}

fn cmd_pages(args: PagesArgs) -> anyhow::Result<()> {
    let manifest = load_manifest(&args.in_path)?;
    match args.page {
        Some(n) => {
            let page = pagespot::manifest_page(&manifest, pagespot::PageNumber(n))
                .with_context(|| format!("page {n} is outside the manifest"))?;
            print_json(&page)
        }
        None => print_json(&pagespot::normalize(&manifest)),
    }
}

fn image_size(args: &ViewportArgs) -> anyhow::Result<pagespot::ImageSize> {
    let size = match (&args.image, args.width, args.height) {
        (Some(path), _, _) => {
            let (w, h) = image::image_dimensions(path)
                .with_context(|| format!("read image size '{}'", path.display()))?;
            pagespot::ImageSize::new(f64::from(w), f64::from(h))
        }
        (None, Some(w), Some(h)) => pagespot::ImageSize::new(w, h),
        _ => anyhow::bail!("pass --width and --height, or --image"),
    };
    anyhow::ensure!(size.is_usable(), "image size must be positive and finite");
    Ok(size)
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewportReport {
    hotspot: String,
    outline: String,
    centroid: Option<pagespot::Point>,
    zoom: f64,
    viewport: pagespot::Viewport,
    view_box: String,
    spotlight: pagespot::SpotlightStops,
}

fn cmd_viewport(args: ViewportArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let manifest = load_manifest(&args.in_path)?;
    let image = image_size(&args)?;

    let page = pagespot::manifest_page(&manifest, pagespot::PageNumber(args.page))
        .with_context(|| format!("page {} is outside the manifest", args.page))?;
    let hotspot = page
        .hotspot(&args.hotspot)
        .with_context(|| format!("no hotspot '{}' on page {}", args.hotspot, args.page))?;

    let zoom = args.zoom.unwrap_or(config.feature_flags.default_zoom_scale);
    let centroid = pagespot::centroid(&hotspot.points);
    let viewport = match centroid {
        Some(focal) => pagespot::compute_viewport(image, focal, zoom),
        None => pagespot::full_viewport(image),
    };
    print_json(&ViewportReport {
        hotspot: hotspot.id.clone(),
        outline: pagespot::to_coordinate_string(&hotspot.points),
        centroid,
        zoom,
        viewport,
        view_box: viewport.to_view_box(),
        spotlight: pagespot::compute_spotlight_stops(viewport, image),
    })
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let manifest = load_manifest(&args.in_path)?;

    let mut session = match &args.store {
        Some(path) => {
            let store = pagespot::JsonFileStore::new(path);
            pagespot::ReaderSession::with_store(config, Box::new(store))
        }
        None => pagespot::ReaderSession::new(config),
    };
    session.load_manifest(manifest);

    let file = std::fs::File::open(&args.script)
        .with_context(|| format!("open script '{}'", args.script.display()))?;
    for (index, line) in std::io::BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("read script line {}", index + 1))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let value: serde_json::Value = serde_json::from_str(line)
            .with_context(|| format!("script line {} is not json", index + 1))?;
        let command = pagespot::parse_command(&value);
        let changed = session.dispatch(&command);
        tracing::info!(line = index + 1, ?command, changed, "replayed");
    }

    print_json(session.state())
}
