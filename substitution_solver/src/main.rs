use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cryptanalysis::alphabet::{self, CIPHER_ALPHABET, PLAIN_ALPHABET};
use cryptanalysis::substitution::{self, digraph, GainesReport, VowelReport};
use cryptanalysis::{Ciphertext, CryptanalysisError, LanguageModel, LanguageProfile, SubstitutionKey, Symbol};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Command-line arguments for the substitution solver.
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

    /// Symbols per line when showing the text
    #[arg(short, long, default_value_t = 50, help = "Number of symbols per line in 'show'")]
    block: usize,

    /// Commands to run instead of reading them from stdin
    #[arg(short, long = "command", help = "Run this command and exit (repeatable)")]
    commands: Vec<String>,
}

/// Commands understood by the solver shell.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Key(Option<String>),
    Show,
    Set(Symbol, Option<Symbol>),
    Unset(Symbol),
    Map(String, String),
    Vowels,
    Consonants,
    Qu,
    Probable(String),
    Auto,
    Help,
    Quit,
}

const HELP: &str = "List of commands:
- 'key [KEY]'       shows the key, or replaces it with a 26-symbol key (a-z or -)
- 'show'            shows the ciphertext and its decryption
- 'set C p'         maps ciphertext symbol C to plaintext symbol p (or -)
- 'unset C'         unmaps ciphertext symbol C
- 'map CWORD pword' maps each symbol of CWORD to the symbol of pword below it
- 'vowels'          finds probable vowels using Sukhotin's method
- 'consonants'      finds probable consonants using Gaines' method
- 'qu'              suggests likely \"qu\" pairs
- 'probable word'   lists ciphertext windows with the same letter pattern as word
- 'auto'            suggests a key from scratch
- 'help'            prints this help
- 'quit'            quits the loop";

fn set_usage() -> String {
    format!(
        "Usage: set C p\n       where C = ciphertext symbol (from {CIPHER_ALPHABET})\n       where p = plaintext symbol (from {PLAIN_ALPHABET}) or -"
    )
}

fn map_usage() -> String {
    format!(
        "Usage: map CWORD pword\n       where CWORD and pword have the same length;\n       CWORD contains only symbols from {CIPHER_ALPHABET}\n       pword contains only symbols from {PLAIN_ALPHABET} or -"
    )
}

/// Parse one input line; the error is the message to print.
fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Err(HELP.to_string());
    };
    let args: Vec<&str> = words.collect();

    match (name, args.as_slice()) {
        ("key", []) => Ok(Command::Key(None)),
        ("key", [key]) => Ok(Command::Key(Some(key.to_string()))),
        ("key", _) => Err("Usage: key [KEY]\n       where KEY has 26 symbols from a-z or -".to_string()),
        ("show", []) => Ok(Command::Show),
        ("show", _) => Err("Usage: show".to_string()),
        ("set", [c, p]) => {
            let (mut c_chars, mut p_chars) = (c.chars(), p.chars());
            match (c_chars.next(), c_chars.next(), p_chars.next(), p_chars.next()) {
                (Some(c), None, Some(p), None) => {
                    let c = Symbol::from_cipher(c).map_err(|_| set_usage())?;
                    let p = Symbol::from_plain_or_unknown(p).map_err(|_| set_usage())?;
                    Ok(Command::Set(c, p))
                }
                _ => Err(set_usage()),
            }
        }
        ("set", _) => Err(set_usage()),
        ("unset", [c]) => {
            let mut chars = c.chars();
            match (chars.next().map(Symbol::from_cipher), chars.next()) {
                (Some(Ok(symbol)), None) => Ok(Command::Unset(symbol)),
                _ => Err(format!("\"{c}\" is not a valid ciphertext symbol\nUsage: unset C")),
            }
        }
        ("unset", _) => Err("Usage: unset C".to_string()),
        ("map", [cword, pword]) => {
            let valid = cword.chars().count() == pword.chars().count()
                && alphabet::parse_cipher_word(cword).is_ok()
                && alphabet::parse_plain_word(pword).is_ok();
            if valid {
                Ok(Command::Map(cword.to_string(), pword.to_string()))
            } else {
                Err(map_usage())
            }
        }
        ("map", _) => Err(map_usage()),
        ("vowels", []) => Ok(Command::Vowels),
        ("vowels", _) => Err("Usage: vowels".to_string()),
        ("consonants", []) => Ok(Command::Consonants),
        ("consonants", _) => Err("Usage: consonants".to_string()),
        ("qu", []) => Ok(Command::Qu),
        ("qu", _) => Err("Usage: qu".to_string()),
        ("probable", [word]) => Ok(Command::Probable(word.to_string())),
        ("probable", _) => Err("Usage: probable plaintext_word".to_string()),
        ("auto", []) => Ok(Command::Auto),
        ("auto", _) => Err("Usage: auto".to_string()),
        ("help", _) => Ok(Command::Help),
        ("quit", _) => Ok(Command::Quit),
        _ => Err(format!("Unknown command '{line}'\n{HELP}")),
    }
}

/// One solving session over a fixed ciphertext and language.
struct Session {
    ciphertext: Ciphertext,
    model: LanguageModel,
    profile: LanguageProfile,
    key: SubstitutionKey,
    block: usize,
}

impl Session {
    fn new(ciphertext: Ciphertext, model: LanguageModel, profile: LanguageProfile, block: usize) -> Self {
        Self {
            ciphertext,
            model,
            profile,
            key: SubstitutionKey::new(),
            block,
        }
    }

    /// Run a command and return the text to print; `None` means quit.
    fn execute(&mut self, command: Command) -> Option<String> {
        debug!(?command, "execute");
        let output = match command {
            Command::Key(None) => self.key.to_string(),
            Command::Key(Some(arg)) => match SubstitutionKey::parse(&arg) {
                Ok(key) => {
                    self.key = key;
                    self.key.to_string()
                }
                Err(_) => format!("Illegal (partial) decryption key \"{arg}\""),
            },
            Command::Show => self.key.render(&self.ciphertext, self.block),
            Command::Set(c, p) => {
                self.key.assign(c, p);
                String::new()
            }
            Command::Unset(c) => {
                self.key.unset(c);
                String::new()
            }
            Command::Map(cword, pword) => match self.key.map_range(&cword, &pword) {
                Ok(()) => String::new(),
                Err(e) => format!("{e}\n{}", map_usage()),
            },
            Command::Vowels => {
                let report = VowelReport::new(&self.ciphertext, &self.model, &self.profile);
                format!("Sukhotin's method\n{report}")
            }
            Command::Consonants => {
                let report: GainesReport = substitution::gaines(&self.ciphertext);
                report.to_string()
            }
            Command::Qu => self.digraph_hints(&self.key),
            Command::Probable(word) => match substitution::find_probable_word(&self.ciphertext, &word) {
                Ok(found) if found.is_empty() => "No candidates found".to_string(),
                Ok(found) => {
                    let lines: Vec<String> = found
                        .iter()
                        .map(|m| format!("{:>15}{} (at {})", "", m.text, m.position))
                        .collect();
                    format!("Candidates for {word}:\n{}", lines.join("\n"))
                }
                Err(e) => format!("{e}\nUsage: probable plaintext_word"),
            },
            Command::Auto => self.auto(),
            Command::Help => HELP.to_string(),
            Command::Quit => return None,
        };
        Some(output)
    }

    fn digraph_hints(&self, key: &SubstitutionKey) -> String {
        match substitution::find_digraph_hints(&self.ciphertext, key, &self.profile) {
            Ok(hints) => format!("Trying to locate q and u\n{}", digraph::render_hints(&hints)),
            Err(CryptanalysisError::DigraphUnsupported(_)) => "Rules only implemented for languages fr, es, it".to_string(),
            Err(e) => e.to_string(),
        }
    }

    fn auto(&self) -> String {
        let solution = substitution::auto_solve(&self.ciphertext, &self.model, &self.profile);
        let mut out = Vec::new();
        if self.profile.has_fixed_digraph() {
            out.push(format!("Trying to locate q and u\n{}", digraph::render_hints(&solution.hints)));
        }
        out.push(solution.key.render(&self.ciphertext, self.block));
        out.push(format!("From suggested key:\n{}", solution.key));
        let clear: String = Symbol::all().map(|c| alphabet::plain_or_unknown(solution.key.get(c))).collect();
        out.push(format!("Adopt it with: key {clear}"));
        out.join("\n")
    }
}

/// Main entry point for the substitution solver.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli: Cli = Cli::parse();

    let text = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read the input file {}", cli.file.display()))?;
    let ciphertext = Ciphertext::parse(&text).context("The input file is not a valid ciphertext")?;
    let profile = LanguageProfile::builtin(&cli.language)?;
    let model = LanguageModel::load(cli.data.join(&cli.language))
        .with_context(|| format!("Failed to load language data for '{}'", cli.language))?;
    info!(symbols = ciphertext.len(), language = %cli.language, "ciphertext loaded");

    let mut session = Session::new(ciphertext, model, profile, cli.block);

    if !cli.commands.is_empty() {
        for line in &cli.commands {
            if !run_line(&mut session, line) {
                break;
            }
        }
        return Ok(());
    }

    println!("Welcome to the substitution solver.  Type help or ? to list commands.\n");
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
    let line = if line.trim() == "?" { "help" } else { line };
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

#[cfg(test)]
mod tests {
    use super::*;

    fn session(text: &str, language: &str) -> Session {
        let model = LanguageModel::from_sample_text("the quick brown fox jumps over the lazy dog");
        Session::new(
            Ciphertext::parse(text).unwrap(),
            model,
            LanguageProfile::builtin(language).unwrap(),
            4,
        )
    }

    fn sym(c: char) -> Symbol {
        Symbol::from_cipher(c).unwrap()
    }

    #[test]
    fn test_parse_set() {
        assert_eq!(
            parse_command("set A e"),
            Ok(Command::Set(sym('A'), Some(Symbol::from_plain('e').unwrap())))
        );
        assert_eq!(parse_command("set A -"), Ok(Command::Set(sym('A'), None)));
        assert!(parse_command("set a e").is_err());
        assert!(parse_command("set A E").is_err());
        assert!(parse_command("set AB e").is_err());
        assert!(parse_command("set A").is_err());
    }

    #[test]
    fn test_parse_map_and_unset() {
        assert_eq!(
            parse_command("map XYZ th-"),
            Ok(Command::Map("XYZ".to_string(), "th-".to_string()))
        );
        assert!(parse_command("map XYZ th").is_err());
        assert!(parse_command("map xyz the").is_err());
        assert_eq!(parse_command("unset Q"), Ok(Command::Unset(sym('Q'))));
        assert!(parse_command("unset q").unwrap_err().contains("not a valid ciphertext symbol"));
        assert!(parse_command("frobnicate").is_err());
    }

    #[test]
    fn test_set_show_unset() {
        let mut s = session("ABCAB", "en");
        s.execute(parse_command("map AB th").unwrap());
        assert_eq!(s.execute(Command::Show).unwrap(), "ABCA\nth-t\nB\nh");

        s.execute(parse_command("unset A").unwrap());
        assert_eq!(s.execute(Command::Show).unwrap(), "ABCA\n-h--\nB\nh");
    }

    #[test]
    fn test_key_command() {
        let mut s = session("ABC", "en");
        let output = s.execute(Command::Key(Some("abc".to_string()))).unwrap();
        assert!(output.starts_with("Illegal"));
        assert_eq!(s.key, SubstitutionKey::new());

        let full = "zyxwvutsrqponmlkjihgfedcba";
        let output = s.execute(Command::Key(Some(full.to_string()))).unwrap();
        assert!(output.ends_with(full));
        assert_eq!(s.key.get(sym('A')), Some(Symbol::from_plain('z').unwrap()));
    }

    #[test]
    fn test_qu_depends_on_language() {
        let mut en = session("QUAQUB", "en");
        assert!(en.execute(Command::Qu).unwrap().starts_with("Rules only"));

        let mut fr = session("QUAQUB", "fr");
        let output = fr.execute(Command::Qu).unwrap();
        assert!(output.contains("QU: 2"));
    }

    #[test]
    fn test_reports_and_quit() {
        let mut s = session("BACADAFAGABACADA", "fr");
        assert!(s.execute(Command::Vowels).unwrap().contains("Putative vowels:    A"));
        assert!(s.execute(Command::Consonants).unwrap().starts_with("Suggested consonants:"));
        assert!(s.execute(Command::Auto).unwrap().contains("From suggested key:"));
        assert_eq!(s.key, SubstitutionKey::new());
        assert_eq!(s.execute(Command::Quit), None);
    }

    #[test]
    fn test_wrong_arity_prints_usage() {
        assert!(parse_command("key a b").unwrap_err().starts_with("Usage: key [KEY]"));
        assert_eq!(parse_command("show x"), Err("Usage: show".to_string()));
        assert_eq!(parse_command("vowels x"), Err("Usage: vowels".to_string()));
        assert_eq!(parse_command("consonants x y"), Err("Usage: consonants".to_string()));
        assert_eq!(parse_command("qu x"), Err("Usage: qu".to_string()));
        assert_eq!(parse_command("auto now"), Err("Usage: auto".to_string()));
        assert!(parse_command("show").is_ok());
    }

    #[test]
    fn test_auto_reports_suggested_hints() {
        let mut fr = session("QUAQUB", "fr");
        let output = fr.execute(Command::Auto).unwrap();
        assert!(output.starts_with("Trying to locate q and u"));
        assert!(output.contains("QU: 2"));

        let mut en = session("QUAQUB", "en");
        assert!(!en.execute(Command::Auto).unwrap().contains("Trying to locate"));
    }

    #[test]
    fn test_probable_command() {
        let mut s = session("QXABCCBD", "en");
        let output = s.execute(Command::Probable("letter".to_string())).unwrap();
        assert!(output.contains("ABCCBD (at 2)"));
        let output = s.execute(Command::Probable("Letter".to_string())).unwrap();
        assert!(output.contains("Usage: probable"));
    }
}
