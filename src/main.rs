mod app;
mod command;
mod config;
mod consts;
mod game;
mod highscores;
mod options;
mod util;
use crate::app::App;
use crate::config::Config;
use crate::highscores::HighScores;
use crate::util::Globals;
use anyhow::Context;
use lexopt::prelude::*;
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = match Args::parse() {
        Ok(Some(args)) => args,
        Ok(None) => return ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("longdog: {e}");
            return ExitCode::from(2);
        }
    };
    let globals = match load_globals(&args) {
        Ok(globals) => globals,
        Err(e) => {
            eprintln!("longdog: {e:#}");
            return ExitCode::from(2);
        }
    };
    let terminal = ratatui::init();
    let r = App::new(globals).run(terminal);
    ratatui::restore();
    io_exit(r)
}

fn load_globals(args: &Args) -> anyhow::Result<Globals> {
    let (path, allow_missing) = match &args.config {
        Some(path) => (path.clone(), false),
        None => (Config::default_path()?, true),
    };
    let mut config = Config::load(&path, allow_missing)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    if args.no_save {
        config.disable_score_saving();
    }
    let scores = if config.save_scores() {
        match config.scores_file() {
            Some(path) => HighScores::load(&path)
                .with_context(|| format!("failed to load high scores from {}", path.display()))?,
            None => HighScores::default(),
        }
    } else {
        HighScores::default()
    };
    Ok(Globals {
        options: config.options,
        config,
        scores,
    })
}

fn io_exit(r: io::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(2)
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    no_save: bool,
}

impl Args {
    /// Parse command-line arguments.  Returns `Ok(None)` if the program
    /// should exit successfully without running (e.g., after `--help`).
    fn parse() -> Result<Option<Args>, lexopt::Error> {
        let mut args = Args::default();
        let mut parser = lexopt::Parser::from_env();
        while let Some(arg) = parser.next()? {
            match arg {
                Short('c') | Long("config") => {
                    args.config = Some(PathBuf::from(parser.value()?));
                }
                Long("no-save") => args.no_save = true,
                Short('h') | Long("help") => {
                    println!("Usage: longdog [-c|--config PATH] [--no-save]");
                    println!();
                    println!("Options:");
                    println!("  -c, --config PATH  Read configuration from PATH");
                    println!("      --no-save      Do not load or save high scores");
                    println!("  -h, --help         Show this message and exit");
                    return Ok(None);
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Some(args))
    }
}
