use std::{
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "circuitar", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Logs go to stderr.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve one experiment definition and print the result as JSON.
    Solve(SolveArgs),
    /// Drive a session from a command script and print render plans as JSON lines.
    Replay(ReplayArgs),
    /// Composite one overlay frame to a PNG.
    Frame(FrameArgs),
}

#[derive(Args, Debug)]
struct SolveArgs {
    /// Experiment definition JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Args, Debug)]
struct EngineArgs {
    /// Engine config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the experiments directory.
    #[arg(long)]
    experiments: Option<PathBuf>,

    /// Override the sprite directory.
    #[arg(long)]
    assets: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    #[command(flatten)]
    engine: EngineArgs,

    /// Script file, or `-` for stdin.
    #[arg(long)]
    script: PathBuf,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    engine: EngineArgs,

    /// Marker detected in the frame.
    #[arg(long)]
    marker: u32,

    /// Number of steps to advance before drawing.
    #[arg(long, default_value_t = 0)]
    advance: usize,

    /// Camera frame to draw over. A black canvas of the configured size is used otherwise.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Solve(args) => cmd_solve(args),
        Command::Replay(args) => cmd_replay(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,circuitar={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn load_config(args: &EngineArgs) -> anyhow::Result<circuitar::EngineConfig> {
    let mut cfg = match &args.config {
        Some(path) => circuitar::EngineConfig::from_json_path(path)?,
        None => circuitar::EngineConfig::default(),
    };
    if let Some(dir) = &args.experiments {
        cfg.experiments_dir = dir.clone();
    }
    if let Some(dir) = &args.assets {
        cfg.assets_dir = Some(dir.clone());
    }
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_solve(args: SolveArgs) -> anyhow::Result<()> {
    let def = circuitar::ExperimentDefinition::from_json_path(&args.in_path)
        .with_context(|| format!("load definition '{}'", args.in_path.display()))?;
    let result = circuitar::solve(&def.circuit);
    let out = serde_json::to_string_pretty(&result).context("serialize solve result")?;
    println!("{out}");
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ReplayCmd {
    Observe(Option<circuitar::MarkerId>),
    Advance,
    Reset,
    Plan,
    Quit,
}

fn parse_replay_line(line: &str) -> anyhow::Result<Option<ReplayCmd>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut words = line.split_whitespace();
    let cmd = match (words.next(), words.next()) {
        (Some("observe"), None) => ReplayCmd::Observe(None),
        (Some("observe"), Some(id)) => {
            let id: u32 = id
                .parse()
                .with_context(|| format!("invalid marker id '{id}'"))?;
            ReplayCmd::Observe(Some(circuitar::MarkerId(id)))
        }
        (Some("advance" | "n"), None) => ReplayCmd::Advance,
        (Some("reset" | "r"), None) => ReplayCmd::Reset,
        (Some("plan"), None) => ReplayCmd::Plan,
        (Some("quit" | "q"), None) => ReplayCmd::Quit,
        _ => anyhow::bail!("unrecognized command '{line}'"),
    };
    if words.next().is_some() {
        anyhow::bail!("unexpected arguments in '{line}'");
    }
    Ok(Some(cmd))
}

fn open_script(path: &Path) -> anyhow::Result<Box<dyn BufRead>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufReader::new(std::io::stdin())));
    }
    let f = std::fs::File::open(path)
        .with_context(|| format!("open script '{}'", path.display()))?;
    Ok(Box::new(BufReader::new(f)))
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.engine)?;
    let sprites = cfg.load_sprites()?;
    let mut session = cfg.build_session();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for (idx, line) in open_script(&args.script)?.lines().enumerate() {
        let line = line.context("read script")?;
        let Some(cmd) = parse_replay_line(&line).with_context(|| format!("line {}", idx + 1))?
        else {
            continue;
        };
        tracing::debug!(?cmd, "replay");
        match cmd {
            ReplayCmd::Observe(Some(marker)) => {
                session.observe_frame(&[marker]);
            }
            ReplayCmd::Observe(None) => {
                session.observe_frame(&[]);
            }
            ReplayCmd::Advance => {
                session.advance_step();
            }
            ReplayCmd::Reset => session.reset_progress(),
            ReplayCmd::Plan => {
                let plan = circuitar::project(&session, &sprites);
                serde_json::to_writer(&mut out, &plan).context("serialize render plan")?;
                writeln!(out).context("write stdout")?;
            }
            ReplayCmd::Quit => break,
        }
    }
    out.flush().context("flush stdout")?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.engine)?;
    let sprites = cfg.load_sprites()?;
    let mut session = cfg.build_session();

    session.observe_frame(&[circuitar::MarkerId(args.marker)]);
    for _ in 0..args.advance {
        if !session.advance_step() {
            break;
        }
    }

    let mut frame = match &args.background {
        Some(path) => circuitar::FrameRgba::load_png(path)?,
        None => circuitar::FrameRgba::new(
            cfg.canvas.width,
            cfg.canvas.height,
            circuitar::Rgba8::opaque(0, 0, 0),
        )?,
    };

    let plan = circuitar::project(&session, &sprites);
    let stats = circuitar::composite_plan(&mut frame, &plan, &sprites)?;
    tracing::info!(?stats, "composited frame");

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    frame
        .to_rgba_image()?
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    for (_, text) in plan.texts() {
        println!("{text}");
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
