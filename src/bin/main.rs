use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::style::Stylize;
use std::path::PathBuf;
use wordbreak_core::core::engine::DEFAULT_CANDIDATES_PER_ITERATION;
use wordbreak_core::{persistence, RunConfig, SegmentationRun};

/// Segments unbroken text into words by growing a lexicon that shortens
/// the description of the corpus.
#[derive(Parser, Debug)]
#[command(name = "wordbreaker", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run iterations (ibase, itarget] and checkpoint the result
    Run(RunArgs),
    /// Print the iteration marker and contents of a checkpoint
    Inspect {
        /// Checkpoint written by a previous run
        checkpoint: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Whitespace-segmented corpus, one sentence per line; not needed
    /// when resuming from a checkpoint
    #[arg(long, required_unless_present = "statefile")]
    corpus: Option<PathBuf>,

    /// Folder receiving the wb-[first,last] output folder
    #[arg(long, default_value = "wordbreaking")]
    output_dir: PathBuf,

    /// Processing starts at iteration ibase+1; 0 is a fresh start
    #[arg(long, default_value_t = 0)]
    ibase: u32,

    /// Last iteration to perform; cycles = itarget - ibase
    #[arg(long)]
    itarget: u32,

    /// Checkpoint to resume from; required when ibase > 0
    #[arg(long)]
    statefile: Option<PathBuf>,

    /// Number of candidates admitted per iteration
    #[arg(long, default_value_t = DEFAULT_CANDIDATES_PER_ITERATION)]
    candidates: usize,

    /// Number of corpus lines to read (default: all)
    #[arg(long)]
    corpus_lines_to_read: Option<usize>,

    /// Trace every parser window position
    #[arg(long)]
    verbose: bool,
}

impl From<RunArgs> for RunConfig {
    fn from(a: RunArgs) -> Self {
        RunConfig {
            corpus: a.corpus,
            output_dir: a.output_dir,
            ibase: a.ibase,
            itarget: a.itarget,
            checkpoint: a.statefile,
            candidates_per_iteration: a.candidates,
            max_corpus_lines: a.corpus_lines_to_read,
            verbose: a.verbose,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = matches!(&cli.command, Commands::Run(args) if args.verbose);
    init_tracing(verbose)?;

    match cli.command {
        Commands::Run(args) => run(args.into()),
        Commands::Inspect { checkpoint } => inspect(checkpoint),
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(format!("wordbreak_core={level},wordbreaker={level}")))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn run(config: RunConfig) -> Result<()> {
    match (&config.checkpoint, &config.corpus) {
        (Some(state), _) => println!(
            "{} iterations {} resuming from '{}'",
            "wordbreaker".bold().cyan(),
            config.iteration_label(),
            state.display()
        ),
        (None, Some(corpus)) => println!(
            "{} iterations {} on '{}'",
            "wordbreaker".bold().cyan(),
            config.iteration_label(),
            corpus.display()
        ),
        (None, None) => {}
    }

    let report = SegmentationRun::new(config)
        .execute()
        .context("segmentation run failed")?;

    if let Some(last) = &report.last {
        println!(
            "{} iteration {}: {:.1} bits ({:.1} dictionary + {:.1} corpus)",
            "Done.".green().bold(),
            last.iteration,
            last.total_cost(),
            last.dictionary_cost,
            last.corpus_cost
        );
    }
    println!(
        "{} entries, {} rejected, {:.2?} elapsed",
        report.entries, report.rejected, report.elapsed
    );
    println!("Outputs in '{}'", report.outputs.dir.display());
    println!(
        "Resume later with --ibase {} --statefile '{}'",
        report.last.map_or(0, |r| r.iteration),
        report.outputs.checkpoint.display()
    );
    Ok(())
}

fn inspect(checkpoint: PathBuf) -> Result<()> {
    let header = persistence::read_header(&checkpoint)
        .with_context(|| format!("cannot inspect '{}'", checkpoint.display()))?;
    let state = persistence::load_checkpoint(&checkpoint, header.last_iteration)?;

    println!("{} {}", "Checkpoint".bold(), checkpoint.display());
    println!("  format version : {}", header.format_version);
    println!("  last iteration : {}", header.last_iteration);
    println!("  corpus lines   : {}", state.corpus.lines.len());
    println!("  entries        : {}", state.lexicon.len());
    println!("  rejected       : {}", state.lexicon.rejected().count());
    println!("  longest entry  : {}", state.lexicon.longest_entry_length());
    if let Some(last) = state.history.last() {
        println!("  total cost     : {:.4} bits", last.total_cost());
    }
    Ok(())
}
