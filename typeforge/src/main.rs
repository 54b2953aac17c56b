use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pacer::{Difficulty, Language, LanguageFamily, SessionReport, TimeLimit, snippets, tokenize};
use tracing_subscriber::{EnvFilter, fmt};

use crate::app::App;
use crate::config::{Config, TextSource, source::language_of};
use crate::error::AppError;
use crate::replay::Script;

mod app;
mod config;
mod error;
mod page;
mod replay;

/// Paced code-typing challenges for your terminal
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Configuration directory (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the highlight tokens of a source file
    Tokenize {
        file: PathBuf,

        /// Language of the file; guessed from its extension otherwise
        #[arg(short, long)]
        language: Option<Language>,
    },

    /// Replay a keystroke script and print the session report as TOML
    Replay { script: PathBuf },

    /// Type a snippet against the pace-setter
    Practice {
        /// Pick the first snippet written in this language
        #[arg(short, long)]
        language: Option<Language>,

        /// Pick a snippet by title
        #[arg(short, long, conflicts_with = "file")]
        title: Option<String>,

        /// Practice on a file instead of a snippet
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// 1m, 3m, 5m, 10m or unlimited
        #[arg(long)]
        time_limit: Option<TimeLimit>,

        /// Practice without a pace-setter
        #[arg(long)]
        free: bool,
    },

    /// List the built-in snippets
    Snippets,
}

fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Tokenize { file, language } => {
            let text = std::fs::read_to_string(&file)?;
            let family = language
                .or_else(|| language_of(&file))
                .map_or(LanguageFamily::default(), Language::family);

            let mut stdout = std::io::stdout().lock();
            for token in tokenize(&text, family) {
                writeln!(
                    stdout,
                    "{} {}..{} {:?}",
                    token.kind, token.start, token.end, token.value
                )?;
            }
        }
        Command::Replay { script } => {
            let config = Config::get(cli.config)?;
            let report = Script::load(&script)?.run(&config.configuration()?)?;
            print!("{}", toml::to_string_pretty(&report)?);
        }
        Command::Practice {
            language,
            title,
            file,
            difficulty,
            time_limit,
            free,
        } => {
            let mut config = Config::get(cli.config)?;
            let settings = &mut config.settings;
            if let Some(difficulty) = difficulty {
                settings.difficulty = difficulty;
            }
            if let Some(time_limit) = time_limit {
                settings.time_limit = time_limit;
            }
            settings.free |= free;

            let source = match (title, file) {
                (Some(title), _) => TextSource::Snippet(title),
                (None, Some(path)) => TextSource::File { path, language },
                (None, None) => TextSource::Library(language.or(settings.language)),
            };

            let passage = source.fetch()?;
            let report = App::new(passage, config.configuration()?)?.run()?;
            print_summary(&report);
        }
        Command::Snippets => {
            for snippet in snippets::all() {
                println!(
                    "{:<20} {:<12} {} chars",
                    snippet.title,
                    snippet.language,
                    snippet.code.chars().count()
                );
            }
        }
    }

    Ok(())
}

fn print_summary(report: &SessionReport) {
    println!(
        "{}: {} WPM, {}% accuracy, {}/{} characters in {:.1}s",
        report.status,
        report.wpm,
        report.accuracy,
        report.typed_characters,
        report.target_characters,
        report.elapsed_seconds
    );
}
