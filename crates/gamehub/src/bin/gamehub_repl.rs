//! # GAMEHUB Console
//!
//! Drives several client sessions against one hub from stdin.
//!
//! The last logged-in user is kept next to the state file and logged back in
//! as session `a` on the next start.
//!
//! ```bash
//! gamehub_repl --config gamehub.toml
//! RUST_LOG=debug gamehub_repl --state /tmp/hub.json < script.txt
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gamehub::{Console, GameHub, HubConfig, Outcome};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gamehub_repl")]
#[command(about = "Line-driven console for GAMEHUB sessions", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// State file path (overrides the config)
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// Do not print the prompt
    #[arg(short, long)]
    quiet: bool,
}

/// Session label the previous profile is restored into.
const RESTORED_SESSION: &str = "a";

fn print_outcome(outcome: Outcome) -> bool {
    match outcome {
        Outcome::Output(lines) => {
            for l in lines {
                println!("{l}");
            }
            true
        }
        Outcome::Quit => false,
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
    {
        eprintln!("tracing init failed: {e}");
    }

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match HubConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "cannot load config");
                return ExitCode::FAILURE;
            }
        },
        None => HubConfig::default(),
    };
    if let Some(state) = cli.state {
        config.storage.path = state;
    }

    let last_user_path = config.storage.path.with_extension("last_user");

    let hub = match GameHub::open(config) {
        Ok(hub) => hub,
        Err(e) => {
            tracing::error!(error = %e, "cannot open hub");
            return ExitCode::FAILURE;
        }
    };

    let mut console = Console::new(hub);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    if !cli.quiet {
        println!("GAMEHUB console. Type `help` for commands.");
    }

    if let Ok(raw) = std::fs::read_to_string(&last_user_path) {
        let name = raw.trim();
        if !name.is_empty() {
            tracing::info!(user = name, "restoring last profile");
            print_outcome(console.restore(RESTORED_SESSION, name));
        }
    }

    loop {
        if !cli.quiet {
            print!("> ");
            let _ = stdout.flush();
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "cannot read input");
                return ExitCode::FAILURE;
            }
        }

        if !print_outcome(console.run_line(&line)) {
            break;
        }
    }

    if let Some(name) = console.last_user() {
        if let Err(e) = std::fs::write(&last_user_path, name) {
            tracing::warn!(path = %last_user_path.display(), error = %e, "cannot save last profile");
        }
    }

    ExitCode::SUCCESS
}
