/// orbitfield terminal demo - shapes orbiting through a particle field
///
/// Controls:
///   - Mouse wheel: spin the orbit (the spin decays on its own)
///   - Mouse movement: nudge the camera
///   - G: toggle the debug panel, Tab/Arrows: select and adjust
///   - Q/ESC: Quit
use anyhow::Context;
use clap::Parser;
use orbitfield_core::SceneConfig;
use orbitfield_terminal::TerminalApp;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "orbitfield-terminal", version, about = "Orbiting shapes rendered in the terminal")]
struct Cli {
    /// Scene config file (TOML); missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target frames per second
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,

    /// Seed for the particle field
    #[arg(long)]
    seed: Option<u64>,

    /// Number of particles
    #[arg(long)]
    particles: Option<usize>,

    /// Write logs to this file (the terminal itself is used for rendering)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut config = match &cli.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.particles.seed = seed;
    }
    if let Some(count) = cli.particles {
        config.particles.count = count;
    }
    config.validate()?;

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let mut app = TerminalApp::new(&config, cli.fps).context("querying terminal size")?;
    app.run().context("running terminal renderer")?;

    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
