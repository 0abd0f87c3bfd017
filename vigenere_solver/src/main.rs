use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cryptanalysis::vigenere::{self, friedman, kasiski};
use cryptanalysis::{Ciphertext, CryptanalysisError, LanguageModel, VigenereKey};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Command-line arguments for the Vigenère solver.
#[derive(Parser, Debug)]
struct Cli {
    /// Path to the input file containing the ciphertext
    #[arg(short, long, help = "Path to the input file containing the ciphertext (A-Z)")]
    file: PathBuf,

    /// Language of the plaintext
    #[arg(short, long, default_value = "fr", help = "Language of the plaintext (en, fr, de, es, it)")]
    language: String,

    /// Root of the language data directories
    #[arg(short, long, default_value = "./Data", help = "Directory holding <language>/freq.data and <language>/bigrammes.data")]
    data: PathBuf,

    /// Commands to run instead of reading them from stdin
    #[arg(short, long = "command", help = "Run this command and exit (repeatable)")]
    commands: Vec<String>,
}

/// Repeats listed by the `kasiski` command
const KASISKI_SHOWN: usize = 20;

/// Shifts listed by the `frequent` command
const FREQUENT_SHOWN: usize = 10;

/// Commands understood by the solver shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Key,
    Length(usize),
    Set(usize, usize),
    Unset(usize),
    Best(usize),
    Brute(usize),
    Frequent(usize),
    Show,
    Kasiski,
    Friedman,
    Help,
    Quit,
}

const HELP: &str = "List of commands:
- 'key'           shows the current key
- 'length N'      sets the key length to N and unsets every column
- 'set j s'       sets the shift of column j (0-based) to s (0-25)
- 'unset j'       unsets the shift of column j
- 'best j'        five best shifts of column j as [shift, #intersection, transitions]
- 'brute j'       decrypts column j under all 26 shifts
- 'frequent j'    shifts of column j with the most frequent letters in common
- 'show'          shows the decrypted text, one key period per line
- 'kasiski'       Kasiski examination
- 'friedman'      Friedman autocorrelation test
- 'help'          prints this help
- 'quit'          quits the loop";

fn parse_integer(arg: &str) -> std::result::Result<usize, String> {
    arg.parse().map_err(|_| format!("\"{arg}\" is not a valid integer"))
}

/// Parse one input line; the error is the message to print.
fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Err(HELP.to_string());
    };
    let args: Vec<&str> = words.collect();

    let column = |usage: &str| match args.as_slice() {
        [j] => parse_integer(j).map_err(|e| format!("{e}\nUsage: {usage}")),
        _ => Err(format!("Usage: {usage}")),
    };

    match name {
        "key" => Ok(Command::Key),
        "length" => match args.as_slice() {
            [n] => match n.parse::<usize>() {
                Ok(n) if n > 0 => Ok(Command::Length(n)),
                _ => Err(format!(
                    "\"{n}\" is not a valid key length\nUsage: length N (where N is a positive integer)"
                )),
            },
            _ => Err("Usage: length N (where N is a positive integer)".to_string()),
        },
        "set" => match args.as_slice() {
            [j, s] => Ok(Command::Set(parse_integer(j)?, parse_integer(s)?)),
            _ => Err("'set' expects two integer arguments.\nUsage: set j s".to_string()),
        },
        "unset" => column("unset j").map(Command::Unset),
        "best" => column("best j").map(Command::Best),
        "brute" => column("brute j").map(Command::Brute),
        "frequent" => column("frequent j").map(Command::Frequent),
        "show" => Ok(Command::Show),
        "kasiski" => Ok(Command::Kasiski),
        "friedman" => Ok(Command::Friedman),
        "help" | "?" => Ok(Command::Help),
        "quit" => Ok(Command::Quit),
        _ => Err(format!("Unknown command '{line}'\n{HELP}")),
    }
}

/// Shell message for a failed key operation.
fn explain(error: CryptanalysisError) -> String {
    match error {
        CryptanalysisError::KeyLengthNotSet => "The key length should be defined to use this tool".to_string(),
        CryptanalysisError::ColumnOutOfRange { length, .. } => {
            format!("The column number should be between 0 and {}.", length - 1)
        }
        CryptanalysisError::ShiftOutOfRange(_) => "The shift should be between 0 and 25.".to_string(),
        other => other.to_string(),
    }
}

/// One solving session over a fixed ciphertext and language.
struct Session {
    key: VigenereKey,
    model: LanguageModel,
}

impl Session {
    fn new(ciphertext: Ciphertext, model: LanguageModel) -> Self {
        Self {
            key: VigenereKey::new(ciphertext),
            model,
        }
    }

    /// Run a command and return the text to print; `None` means quit.
    fn execute(&mut self, command: Command) -> Option<String> {
        debug!(?command, "execute");
        let output = match command {
            Command::Quit => return None,
            Command::Help => Ok(HELP.to_string()),
            Command::Key => Ok(self.key.describe()),
            Command::Length(n) => self
                .key
                .set_length(n)
                .map(|()| format!("Key length set to {n}.")),
            Command::Set(j, s) => self.key.set_column(j, s).map(|()| String::new()),
            Command::Unset(j) => self.key.unset_column(j).map(|()| String::new()),
            Command::Best(j) => vigenere::best_shifts(&self.key, &self.model, j).map(|scores| {
                let scores: Vec<String> = scores.iter().map(ToString::to_string).collect();
                format!("[shift, #intersection, trans_proba]\n{}", scores.join("\n"))
            }),
            Command::Brute(j) => vigenere::all_shifts(&self.key, j).map(|shifts| {
                shifts
                    .iter()
                    .map(|(shift, text)| format!("{shift:>2} {text}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            }),
            Command::Frequent(j) => {
                vigenere::frequent_letter_shifts(&self.key, &self.model, j, FREQUENT_SHOWN).map(|shifts| {
                    let lines: Vec<String> = shifts
                        .iter()
                        .map(|(score, text)| format!("{:>2} {:>2} {text}", score.shift, score.intersection))
                        .collect();
                    format!(
                        "Top {FREQUENT_SHOWN} values of shift with highest intersection of frequent letters\n{}",
                        lines.join("\n")
                    )
                })
            }
            Command::Show => self.key.render_rows(),
            Command::Kasiski => Ok(self.kasiski()),
            Command::Friedman => {
                let series = friedman::autocorrelation(self.key.ciphertext());
                Ok(format!(
                    "Friedman: value of auto-correlation index for 1 <= k < {}\n{}",
                    friedman::MAX_SHIFT,
                    friedman::render_series(&series)
                ))
            }
        };
        Some(output.unwrap_or_else(explain))
    }

    fn kasiski(&self) -> String {
        let repeats = kasiski::kasiski(self.key.ciphertext());
        let mut out = vec![
            format!("Kasiski: {KASISKI_SHOWN} longest repeated patterns"),
            format!("{:<12} {:>6} {:>6} {:>6}  divisors", "pattern", "first", "later", "dist"),
        ];
        out.extend(repeats.iter().take(KASISKI_SHOWN).map(ToString::to_string));

        let tally: Vec<String> = kasiski::divisor_tally(&repeats)
            .iter()
            .map(|(divisor, count)| format!("{divisor}:{count}"))
            .collect();
        out.push(format!("Divisor counts: {}", tally.join(" ")));
        out.join("\n")
    }
}

/// Main entry point for the Vigenère solver.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli: Cli = Cli::parse();

    let text = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read the input file {}", cli.file.display()))?;
    let ciphertext = Ciphertext::parse(&text).context("The input file is not a valid ciphertext")?;
    let model = LanguageModel::load(cli.data.join(&cli.language))
        .with_context(|| format!("Failed to load language data for '{}'", cli.language))?;
    info!(symbols = ciphertext.len(), language = %cli.language, "ciphertext loaded");

    let mut session = Session::new(ciphertext, model);

    if !cli.commands.is_empty() {
        for line in &cli.commands {
            if !run_line(&mut session, line) {
                break;
            }
        }
        return Ok(());
    }

    println!("Welcome to the Vigenere solver.  Type help or ? to list commands.\n");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("[Command:] ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        if !run_line(&mut session, &line?) {
            break;
        }
    }
    Ok(())
}

/// Parse and run one line, printing its output; false once the user quits.
fn run_line(session: &mut Session, line: &str) -> bool {
    match parse_command(line) {
        Ok(command) => match session.execute(command) {
            Some(output) => {
                if !output.is_empty() {
                    println!("{output}");
                }
                true
            }
            None => {
                println!("Goodbye!");
                false
            }
        },
        Err(usage) => {
            println!("{usage}");
            true
        }
    }
}
