use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use config::{Config, OversizedPolicy};
use dictionary::WordTable;
use lexer::Lexer;
use log::{debug, error, info, warn};
use pipeline::Pipeline;
use report::{Report, Timings};

mod config;
mod dictionary;
mod lexer;
mod pipeline;
mod report;

/// Spell-check a text file against a word list.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Word list to load, followed by the text to check. The word list may be
    /// omitted to use the configured one.
    #[arg(value_name = "PATH", num_args = 1..=2, required = true)]
    paths: Vec<PathBuf>,

    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// How to treat word-list entries longer than the maximum word length.
    #[arg(long, value_enum)]
    oversized: Option<OversizedPolicy>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn dictionary_and_text(&self) -> (Option<&PathBuf>, &PathBuf) {
        match self.paths.as_slice() {
            [dictionary, text] => (Some(dictionary), text),
            [text] => (None, text),
            _ => unreachable!("clap enforces one or two paths"),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()).await {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let (dictionary, text) = cli.dictionary_and_text();
    let dictionary = match config
        .resolve_dictionary(dictionary.map(|p| p.as_path()))
        .await
    {
        Ok(path) => path,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let policy = cli.oversized.unwrap_or(config.oversized);
    let mut table = WordTable::with_policy(policy);

    let start = Instant::now();
    let loaded = table.load(&dictionary);
    let time_load = start.elapsed();

    if let Err(err) = loaded {
        error!("{err}");
        println!("Could not load {}.", dictionary.display());
        return ExitCode::FAILURE;
    }
    if table.is_empty() {
        warn!("{} contains no words", dictionary.display());
    }

    let bytes = match tokio::fs::read(text).await {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!("{err}");
            println!("Could not open {}.", text.display());
            table.unload();
            return ExitCode::FAILURE;
        }
    };

    let run = Pipeline::new(&table).run(Lexer::new(bytes));
    info!("checked {} words from {:?}", run.words, text);

    let start = Instant::now();
    let words_in_dictionary = table.size();
    let time_size = start.elapsed();

    let start = Instant::now();
    let unloaded = table.unload();
    let time_unload = start.elapsed();

    if !unloaded {
        println!("Could not unload {}.", dictionary.display());
        return ExitCode::FAILURE;
    }

    let report = Report {
        words_misspelled: run.misspelled.len(),
        misspellings: run.misspelled.into_iter().map(Into::into).collect(),
        words_in_dictionary,
        words_in_text: run.words,
        timings: Timings::new(time_load, run.check_time, time_size, time_unload),
    };

    if cli.json {
        match report.to_json() {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{report}");
    }

    ExitCode::SUCCESS
}
