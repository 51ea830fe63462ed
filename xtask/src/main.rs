use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

/// The browser host only ships for this target; native builds can't catch
/// dependencies that refuse to compile there.
const WEB_TARGET: &str = "wasm32-unknown-unknown";

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for orbitfield")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run native tests, then check the web crate for wasm32
    Check,
    /// Run all native tests
    Test,
    /// Check orbitfield-web for wasm32-unknown-unknown
    Web,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            cargo(&test_args(), "cargo test")?;
            cargo(&web_check_args(), "wasm32 check")?;
        }
        Commands::Test => cargo(&test_args(), "cargo test")?,
        Commands::Web => cargo(&web_check_args(), "wasm32 check")?,
    }

    Ok(())
}

fn test_args() -> Vec<&'static str> {
    vec!["test", "--workspace"]
}

fn web_check_args() -> Vec<&'static str> {
    vec!["check", "-p", "orbitfield-web", "--lib", "--target", WEB_TARGET]
}

fn cargo(args: &[&str], what: &str) -> Result<()> {
    println!("==> Running cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{what} failed");
    }
    Ok(())
}
