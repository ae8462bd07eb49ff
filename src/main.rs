use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser};
use setfts::{Error, IndexOptions, Query, SearchEngine, SearchOptions, SearchResult};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// CLI Arguments
//
// Options are long-only: any short form would swallow a negative term such
// as `-i` or `-h` written in first position.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Word-subset full-text search over lines of text",
    long_about = "Reads one document per line, then prints the documents containing \
                  every TERM. Terms starting with '-' exclude documents containing that word. \
                  Options must come before the first term.",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Args {
    /// Read documents from a file instead of standard input
    #[arg(long)]
    input: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Index the empty word produced by punctuation-only tokens
    #[arg(long)]
    keep_empty_tokens: bool,

    /// Maximum number of results to print
    #[arg(long)]
    limit: Option<usize>,

    /// Number of results to skip
    #[arg(long, default_value_t = 0)]
    offset: usize,

    /// Print index statistics to stderr
    #[arg(long)]
    stats: bool,

    /// Increase log verbosity (once for info, twice for debug)
    #[arg(long, action = ArgAction::Count)]
    verbose: u8,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Print version
    #[arg(long, action = ArgAction::Version)]
    version: Option<bool>,

    /// Query terms; prefix a term with '-' to exclude it
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    terms: Vec<String>,
}

impl Args {
    fn index_options(&self) -> IndexOptions {
        IndexOptions {
            keep_empty_tokens: self.keep_empty_tokens,
            ..Default::default()
        }
    }

    fn search_options(&self) -> SearchOptions {
        SearchOptions {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Read one document per line. Invalid UTF-8 is replaced rather than
/// rejected, so one bad line does not drop the rest of the input.
fn read_documents(reader: impl BufRead) -> Result<Vec<String>> {
    let mut docs = Vec::new();

    for (line_no, line) in reader.split(b'\n').enumerate() {
        let mut bytes = line.context("Failed to read documents")?;
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(line = line_no + 1, "invalid UTF-8 in document, bytes replaced");
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };
        docs.push(text);
    }

    Ok(docs)
}

fn load_documents(engine: &SearchEngine, input: Option<&PathBuf>) -> Result<usize> {
    let docs = match input {
        Some(path) => read_documents(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        ))?,
        None => read_documents(io::stdin().lock())?,
    };

    Ok(engine.add_documents(docs).len())
}

fn print_results(mut out: impl Write, results: &SearchResult, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut out, results)?;
        writeln!(out)?;
    } else {
        for hit in &results.hits {
            writeln!(out, "Entry found: {}", hit.text)?;
        }
    }
    Ok(())
}

fn usage_message(err: &Error) -> &'static str {
    match err {
        Error::NoTerms => "Give some word!",
        _ => "Give some non-negative word!",
    }
}

/// Negative terms that spell one of our long options, e.g. `--json` given
/// after the first term
fn misplaced_options(query: &Query) -> Vec<String> {
    let cmd = Args::command();
    query
        .negative()
        .iter()
        .filter_map(|word| word.strip_prefix('-'))
        .filter_map(|option| option.split('=').next())
        .filter(|name| cmd.get_arguments().any(|arg| arg.get_long() == Some(*name)))
        .map(|name| format!("--{name}"))
        .collect()
}

fn run(args: Args) -> Result<()> {
    // Usage errors are reported before any input is read
    let query = match Query::parse(&args.terms) {
        Ok(query) => query,
        Err(err) if err.is_usage() => {
            eprintln!("{}", usage_message(&err));
            process::exit(1);
        }
        Err(err) => return Err(err.into()),
    };

    for option in misplaced_options(&query) {
        tracing::warn!(
            option = %option,
            "option after the first term is treated as a negative term; move it before the terms"
        );
    }

    let engine = SearchEngine::with_options(args.index_options());

    let start = Instant::now();
    let count = load_documents(&engine, args.input.as_ref())?;
    tracing::info!(documents = count, elapsed = ?start.elapsed(), "indexed input");

    if args.stats {
        let stats = engine.stats();
        eprintln!("{}", serde_json::to_string_pretty(&stats)?);
    }

    let start = Instant::now();
    let results = engine.search(&query, &args.search_options())?;
    tracing::info!(matches = results.total, elapsed = ?start.elapsed(), "search finished");

    print_results(io::stdout().lock(), &results, args.json)
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn terms(argv: &[&str]) -> Vec<String> {
        Args::try_parse_from(argv).unwrap().terms
    }

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_leading_negative_terms_stay_terms() {
        assert_eq!(terms(&["setfts", "-i", "python"]), vec!["-i", "python"]);
        assert_eq!(terms(&["setfts", "-vi", "python"]), vec!["-vi", "python"]);
        assert_eq!(terms(&["setfts", "-h", "python"]), vec!["-h", "python"]);
        assert_eq!(terms(&["setfts", "-V", "python"]), vec!["-V", "python"]);
        assert_eq!(
            terms(&["setfts", "-windows", "python", "linux"]),
            vec!["-windows", "python", "linux"]
        );
    }

    #[test]
    fn test_options_before_terms() {
        let args =
            Args::try_parse_from(["setfts", "--json", "--limit", "3", "python", "-windows"])
                .unwrap();
        assert!(args.json);
        assert_eq!(args.limit, Some(3));
        assert_eq!(args.terms, vec!["python", "-windows"]);
    }

    #[test]
    fn test_no_terms_parses() {
        assert!(terms(&["setfts"]).is_empty());
    }

    #[test]
    fn test_usage_messages() {
        assert_eq!(usage_message(&Error::NoTerms), "Give some word!");
        assert_eq!(
            usage_message(&Error::NoPositiveTerms),
            "Give some non-negative word!"
        );
    }

    #[test]
    fn test_misplaced_options() {
        let query = Query::parse(["python", "--json", "--limit=2", "-windows"]).unwrap();
        assert_eq!(misplaced_options(&query), vec!["--json", "--limit"]);

        let query = Query::parse(["python", "-linux"]).unwrap();
        assert!(misplaced_options(&query).is_empty());
    }

    #[test]
    fn test_read_documents_replaces_invalid_utf8() {
        let input = Cursor::new(b"python linux\n\xff\xfe bad\r\npython\n".to_vec());
        let docs = read_documents(input).unwrap();

        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0], "python linux");
        assert_eq!(docs[1], "\u{FFFD}\u{FFFD} bad");
        assert_eq!(docs[2], "python");

        let engine = SearchEngine::new();
        engine.add_documents(docs);
        let query = Query::parse(["python"]).unwrap();
        let results = engine.search(&query, &SearchOptions::default()).unwrap();
        assert_eq!(results.total, 2);
    }

    #[test]
    fn test_print_results_labelled() {
        let engine = SearchEngine::new();
        engine.add_documents(["python and linux", "rust", "python on linux"]);
        let query = Query::parse(["python", "linux"]).unwrap();
        let results = engine.search(&query, &SearchOptions::default()).unwrap();

        let mut out = Vec::new();
        print_results(&mut out, &results, false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Entry found: python and linux\nEntry found: python on linux\n"
        );
    }

    #[test]
    fn test_print_results_json() {
        let engine = SearchEngine::new();
        engine.add_document("rust");
        let query = Query::parse(["rust"]).unwrap();
        let results = engine.search(&query, &SearchOptions::default()).unwrap();

        let mut out = Vec::new();
        print_results(&mut out, &results, true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["total"], 1);
        assert_eq!(value["hits"][0]["text"], "rust");
    }
}
