//! spellcheck: interactive dictionary lookup with suggestions.

use chained_speller::config::DEFAULT_MAX_LOAD_FACTOR;
use chained_speller::query::{parse_line, Command};
use chained_speller::spell_checker::DEFAULT_DICTIONARY_CAPACITY;
use chained_speller::suggest::DEFAULT_SUGGESTION_LIMIT;
use chained_speller::{
    Error, RankingPolicy, Result, SpellChecker, Suggester, TableConfig, Verdict,
};
use clap::{ArgAction, Parser, ValueEnum};
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use tracing::Level;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Ranking {
    /// Closest words first.
    Nearest,
    /// Legacy first-exceeding slot replacement.
    FirstExceeding,
}

impl From<Ranking> for RankingPolicy {
    fn from(r: Ranking) -> Self {
        match r {
            Ranking::Nearest => RankingPolicy::Nearest,
            Ranking::FirstExceeding => RankingPolicy::FirstExceeding,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "spellcheck",
    version,
    about = "Check words against a dictionary and suggest corrections"
)]
struct Args {
    /// Text file whose words form the dictionary.
    #[arg(short, long, default_value = "dictionary.txt")]
    dictionary: PathBuf,

    /// Initial number of hash buckets.
    #[arg(long, default_value_t = DEFAULT_DICTIONARY_CAPACITY)]
    capacity: usize,

    /// Load factor at which the bucket array doubles.
    #[arg(long, default_value_t = DEFAULT_MAX_LOAD_FACTOR)]
    max_load: f64,

    /// Suggestions printed for a misspelled word.
    #[arg(short = 'n', long, default_value_t = DEFAULT_SUGGESTION_LIMIT)]
    suggestions: usize,

    #[arg(long, value_enum, default_value_t = Ranking::Nearest)]
    ranking: Ranking,

    /// Print table statistics after loading.
    #[arg(long)]
    stats: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn print_verdict(out: &mut impl Write, verdict: &Verdict<'_>) -> io::Result<()> {
    write!(out, "The inputted word is ... ")?;
    match verdict {
        Verdict::Correct => writeln!(out, "spelled correctly.")?,
        Verdict::Misspelled(_) => {
            writeln!(out, "spelled incorrectly.")?;
            writeln!(out, "Did you mean...?")?;
            for word in verdict.words() {
                writeln!(out, "{word}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Prompt, read one line, answer; until `quit` or end of input. Lines that
/// are not UTF-8 are rejected like any other malformed word.
fn repl<R, W>(checker: &SpellChecker, mut input: R, out: &mut W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    let mut line = Vec::new();
    loop {
        write!(out, "Enter a word or \"quit\" to quit: ")?;
        out.flush()?;
        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            break; // EOF
        }
        match parse_line(&String::from_utf8_lossy(&line)) {
            Ok(Command::Quit) => break,
            Ok(Command::Check(word)) => print_verdict(out, &checker.check(&word))?,
            Err(Error::InvalidQuery(_)) => writeln!(
                out,
                "Invalid string. Please enter a single word containing only letters."
            )?,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let config = TableConfig::default()
        .with_initial_capacity(args.capacity)
        .with_max_load_factor(args.max_load);
    let suggester = Suggester::new(args.suggestions, args.ranking.into());

    let file = File::open(&args.dictionary)?;
    let (checker, report) = SpellChecker::from_reader(file, config, suggester)?;
    println!(
        "Dictionary loaded in {:.6} seconds",
        report.elapsed.as_secs_f64()
    );
    if args.stats {
        println!("{}", checker.stats());
    }

    repl(&checker, io::stdin().lock(), &mut io::stdout().lock())
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
