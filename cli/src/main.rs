use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::process;

use npchunk::{Analysis, ChunkStrategy, Err, Grammar, ParseError, ParseLimits, Pipeline};
use tracing_subscriber::EnvFilter;

fn usage(prog_name: &str) -> String {
  format!(
    r"Usage: {} [options] [FILE]

Parses the sentence in FILE (or read from stdin) and prints every parse tree
with its noun phrase chunks.

Options:
  -h, --help            Print this message
  -g, --grammar FILE    Read the grammar from FILE (defaults to the bundled grammar)
  -i, --innermost       Chunk the innermost noun phrases instead of the outermost
  -c, --chart           Print the parse chart
      --max-trees N     Give up when a span has more than N trees
      --max-tokens N    Give up on sentences longer than N tokens",
    prog_name
  )
}

struct Args {
  filename: Option<String>,
  grammar: Option<String>,
  strategy: ChunkStrategy,
  print_chart: bool,
  limits: ParseLimits,
}

impl Args {
  fn make_error_message(msg: &str, prog_name: impl AsRef<str>) -> String {
    format!("argument error: {}.\n\n{}", msg, usage(prog_name.as_ref()))
  }

  fn parse(v: Vec<String>) -> Result<Self, String> {
    let mut iter = v.into_iter();
    let Some(prog_name) = iter.next() else {
      return Err(Self::make_error_message("bad argument vector", "npchunk"));
    };

    let mut filename: Option<String> = None;
    let mut grammar: Option<String> = None;
    let mut strategy = ChunkStrategy::Outermost;
    let mut print_chart = false;
    let mut limits = ParseLimits::default();

    let number = |value: Option<String>, flag: &str| -> Result<usize, String> {
      value
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| Self::make_error_message(&format!("{} needs a number", flag), &prog_name))
    };

    while let Some(o) = iter.next() {
      match o.as_str() {
        "-h" | "--help" => {
          println!("{}", usage(&prog_name));
          process::exit(0);
        }
        "-i" | "--innermost" => strategy = ChunkStrategy::Innermost,
        "-c" | "--chart" => print_chart = true,
        "-g" | "--grammar" => match iter.next() {
          Some(g) => grammar = Some(g),
          None => return Err(Self::make_error_message("--grammar needs a file", &prog_name)),
        },
        "--max-trees" => limits = limits.with_max_trees(number(iter.next(), "--max-trees")?),
        "--max-tokens" => limits = limits.with_max_tokens(number(iter.next(), "--max-tokens")?),
        _ if filename.is_none() && !o.starts_with('-') => filename = Some(o.clone()),
        _ => return Err(Self::make_error_message("invalid arguments", &prog_name)),
      }
    }

    Ok(Self {
      filename,
      grammar,
      strategy,
      print_chart,
      limits,
    })
  }
}

fn read_sentence(filename: Option<&str>) -> Result<String, Err> {
  if let Some(filename) = filename {
    return Ok(fs::read_to_string(filename)?);
  }

  print!("Sentence: ");
  io::stdout().flush()?;
  let mut input = String::new();
  io::stdin().read_line(&mut input)?;
  Ok(input)
}

/// What gets printed for one sentence: the error, a failed parse, or every tree
/// with its chunks
struct Report<'a>(&'a Result<Analysis, ParseError>);

impl fmt::Display for Report<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let analysis = match self.0 {
      Ok(analysis) => analysis,
      Err(e) => return writeln!(f, "{}", e),
    };

    if !analysis.is_parsed() {
      return writeln!(f, "Could not parse sentence.");
    }

    for parsed in analysis.parses.iter() {
      writeln!(f, "{}\n", parsed.tree)?;
      writeln!(f, "Noun Phrase Chunks")?;
      for chunk in parsed.chunks.iter() {
        writeln!(f, "{}", chunk.join(" "))?;
      }
      writeln!(f)?;
    }
    Ok(())
  }
}

fn main() -> Result<(), Err> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(io::stderr)
    .init();

  let opts = match Args::parse(env::args().collect()) {
    Ok(opts) => opts,
    Err(msg) => {
      eprintln!("{}", msg);
      process::exit(255);
    }
  };

  let g = match &opts.grammar {
    Some(path) => Grammar::read_from_file(path)?,
    None => Grammar::default_grammar()?,
  };
  tracing::debug!(start = g.start(), "loaded grammar");

  let sentence = read_sentence(opts.filename.as_deref())?;
  let pipeline = Pipeline::new(&g)
    .with_limits(opts.limits)
    .with_strategy(opts.strategy);

  let result = if opts.print_chart {
    pipeline.analyze_charted(&sentence).map(|(analysis, chart)| {
      println!("chart:\n{}", chart);
      analysis
    })
  } else {
    pipeline.analyze(&sentence)
  };

  print!("{}", Report(&result));
  Ok(())
}
