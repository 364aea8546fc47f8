use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use laserfx::{
    ChainDocument, CurvePoint, EffectCategory, EffectInstance, EffectRegistry, Point, RenderOpts,
    curves::points::validate_control_points,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "laserfx", version)]
struct Cli {
    /// Log at debug level (overridden by `RUST_LOG`).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the built-in effect definitions as JSON.
    Effects(EffectsArgs),
    /// Apply a chain document to a frame of points.
    Render(RenderArgs),
    /// Build a lookup table from curve control points.
    Lut(LutArgs),
}

#[derive(Parser, Debug)]
struct EffectsArgs {
    /// Only list one category (color, shape, intensity, calibration).
    #[arg(long)]
    category: Option<String>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Chain document JSON.
    #[arg(long)]
    chain: PathBuf,

    /// Input frame JSON (array of points).
    #[arg(long)]
    points: PathBuf,

    /// Show time in milliseconds.
    #[arg(long, default_value_t = 0.0)]
    time_ms: f64,

    /// Tempo; falls back to the configured default when omitted.
    #[arg(long)]
    bpm: Option<f64>,

    /// Render options JSON.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Output frame JSON (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Print frame stats to stderr.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

#[derive(Parser, Debug)]
struct LutArgs {
    /// Control points as JSON, e.g. `[[0,0],[0.5,0.7],[1,1]]`.
    #[arg(long)]
    curve: String,

    /// Number of table entries.
    #[arg(long, default_value_t = 256)]
    resolution: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Effects(args) => cmd_effects(args),
        Command::Render(args) => cmd_render(args),
        Command::Lut(args) => cmd_lut(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "laserfx=debug" } else { "laserfx=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse {what} '{}'", path.display()))
}

fn write_json(out: Option<&Path>, value: &impl serde::Serialize) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(path, text + "\n")
                .with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}").context("write stdout")?;
        }
    }
    Ok(())
}

fn cmd_effects(args: EffectsArgs) -> anyhow::Result<()> {
    let registry = EffectRegistry::with_builtins();
    let defs: Vec<_> = match args.category {
        Some(name) => {
            let category: EffectCategory =
                serde_json::from_value(serde_json::Value::String(name.clone()))
                    .with_context(|| format!("unknown category '{name}'"))?;
            registry.by_category(category).collect()
        }
        None => registry.definitions().collect(),
    };
    write_json(None, &defs)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let doc: ChainDocument<EffectInstance> = read_json(&args.chain, "chain")?;
    let points: Vec<Point> = read_json(&args.points, "points")?;
    let opts: RenderOpts = match &args.opts {
        Some(path) => read_json(path, "render options")?,
        None => RenderOpts::default(),
    };
    opts.validate()?;

    let registry = EffectRegistry::with_builtins();
    let bpm = args.bpm.unwrap_or(opts.default_bpm);
    let (frame, stats) = laserfx::render_frame_with_stats(
        &registry,
        &doc.nodes,
        &points,
        args.time_ms,
        bpm,
        &opts,
    );

    write_json(args.out.as_deref(), &frame)?;
    if args.stats {
        eprintln!(
            "{}",
            serde_json::to_string(&stats).context("serialize stats")?
        );
    }
    Ok(())
}

fn cmd_lut(args: LutArgs) -> anyhow::Result<()> {
    let points: Vec<CurvePoint> =
        serde_json::from_str(&args.curve).context("parse curve control points")?;
    let points = validate_control_points(&points);
    let table = laserfx::build_lut(&points, args.resolution)?;
    write_json(None, &table)
}
