mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "oboeru", about = "Spaced repetition flashcard reviewer", version)]
struct Cli {
    /// Config file (default: $CONFIG_DIR/oboeru/config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write decks to <deck>.debug instead of overwriting them
    #[arg(short, long, global = true)]
    debug: bool,

    /// Fix the review order (default: random)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the number of due cards and exit
    Count {
        /// Deck files
        #[arg(required = true)]
        decks: Vec<PathBuf>,
    },

    /// Review due cards, one prompt per line on stdout
    Review {
        /// Named pipe the front-end writes pass / fail / quit into
        pipe: PathBuf,
        /// Deck files
        #[arg(required = true)]
        decks: Vec<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("oboeru: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let app = app::App::new(cli.config.as_deref(), cli.debug, cli.seed)?;

    match cli.command {
        Command::Count { decks } => commands::count::run(&app, &decks),
        Command::Review { pipe, decks } => commands::review::run(&app, &pipe, &decks),
    }
}
