// Entry point for the in-place terminal Minesweeper
// Parses the command line, loads configuration, sets up logging and launches the game loop

use clap::Parser;
use crossterm::tty::IsTty;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::error::Error;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;

// Module declarations
mod asw_color;  // Terminal color matching
mod asw_config; // Config file and command-line overrides
mod asw_field;  // Minefield model: placement, flood fill, flags, cursor
mod asw_game;   // Command dispatch and win/loss tracking
mod asw_lang;   // Multi-language string resources
mod asw_term;   // Scoped raw terminal mode
mod asw_ui;     // In-place rendering and the input loop

use asw_config::{Overrides, load_or_create_config};
use asw_game::{Game, GameStatus};
use asw_lang::Lang;
use asw_ui::run as run_ui;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    overrides: Overrides,

    /// Write logs to this file (the terminal belongs to the game)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

fn init_logging(args: &Args) -> Result<(), Box<dyn Error>> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(args.verbose.tracing_level_filter())
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    // File settings first, then this run's command-line flags
    let mut cfg = load_or_create_config();
    cfg.apply_overrides(&args.overrides);
    let lang = Lang::new(&cfg.language);

    if !io::stdin().is_tty() {
        eprintln!("{}", lang.assets.err_not_a_tty);
        process::exit(1);
    }

    let rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = match Game::new(cfg.game_settings(), rng) {
        Ok(game) => game,
        Err(e) => {
            tracing::error!(error = %e, "invalid game setup");
            eprintln!("{}", lang.setup_error(&e));
            process::exit(1);
        }
    };

    match run_ui(&mut game, &cfg, &lang)? {
        GameStatus::Won => println!("{}", lang.assets.win_message),
        GameStatus::Lost => println!("\n{}", lang.assets.loss_message),
        GameStatus::Quit | GameStatus::Playing => {}
    }
    Ok(())
}
