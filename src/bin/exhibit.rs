use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "exhibit", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a storyboard JSON file.
    Validate(ValidateArgs),
    /// Apply storyboard steps through a scene controller and dump the scene
    /// snapshot as JSON.
    Snapshot(SnapshotArgs),
    /// Run a storyboard headlessly, printing each step's narration.
    Play(PlayArgs),
    /// Query the built-in exhibit catalog.
    Catalog(CatalogArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input storyboard JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SnapshotArgs {
    /// Exhibit id whose scene to drive (e.g. 9293 for TCP).
    #[arg(long, default_value_t = exhibit::exhibits::tcp::ID)]
    exhibit: u32,

    /// Optional storyboard JSON; defaults to the exhibit's built-in storyboard.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Step index to land on (0-based). Steps 0..=N are applied in order.
    #[arg(long)]
    step: usize,

    /// Output JSON path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Exhibit id to play.
    #[arg(long, default_value_t = exhibit::exhibits::tcp::ID)]
    exhibit: u32,
}

#[derive(Parser, Debug)]
struct CatalogArgs {
    /// Search query; empty lists every exhibit.
    #[arg(long, default_value = "")]
    query: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Snapshot(args) => cmd_snapshot(args),
        Command::Play(args) => cmd_play(args),
        Command::Catalog(args) => cmd_catalog(args),
    }
}

fn read_storyboard_json(path: &Path) -> anyhow::Result<exhibit::Storyboard> {
    let f = File::open(path).with_context(|| format!("open storyboard '{}'", path.display()))?;
    let r = BufReader::new(f);
    let sb: exhibit::Storyboard =
        serde_json::from_reader(r).with_context(|| "parse storyboard JSON")?;
    Ok(sb)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let sb = read_storyboard_json(&args.in_path)?;
    sb.validate()?;
    eprintln!("ok: {} steps", sb.len());
    Ok(())
}

fn cmd_snapshot(args: SnapshotArgs) -> anyhow::Result<()> {
    let registry = exhibit::Registry::with_defaults();
    let sb = match &args.in_path {
        Some(path) => read_storyboard_json(path)?,
        None => registry.storyboard(args.exhibit)?,
    };
    sb.validate()?;

    let meta = registry
        .catalog()
        .by_id(args.exhibit)
        .map(|m| m.accents)
        .unwrap_or_default();
    let mut controller = registry.build_scene(args.exhibit, meta)?;

    let mut engine = exhibit::PlaybackEngine::new(sb)?;
    engine.attach_controller(controller, exhibit::Millis::ZERO);
    for i in 0..=args.step as i64 {
        engine.seek(i, exhibit::Millis::ZERO);
    }
    // Run the final step's timeline to rest before snapshotting.
    engine.tick(exhibit::Millis(60_000));

    controller = engine
        .detach_controller()
        .context("controller detached unexpectedly")?;
    let snapshot = controller.snapshot();

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&snapshot)?;
    std::fs::write(&args.out, json)
        .with_context(|| format!("write snapshot '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let registry = exhibit::Registry::with_defaults();
    let sb = registry.storyboard(args.exhibit)?;
    let count = sb.len();
    let mut engine = exhibit::PlaybackEngine::new(sb)?;

    for i in 0..count as i64 {
        engine.seek(i, exhibit::Millis::ZERO);
        let view = exhibit::panels::narration_view(engine.current_step(), i as usize, count);
        println!(
            "[{}/{}] {}  {}",
            view.step_number,
            view.step_count,
            view.progress_bar(20),
            view.title
        );
        println!("        {}", view.narration);
    }
    Ok(())
}

fn cmd_catalog(args: CatalogArgs) -> anyhow::Result<()> {
    let catalog = exhibit::Registry::with_defaults().catalog();
    for meta in catalog.search(&args.query) {
        println!(
            "{:>6}  {:<6} {:<36} {:<10} {:?}",
            meta.id, meta.name, meta.title, meta.layer, meta.status
        );
    }
    Ok(())
}
