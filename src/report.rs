// File: src/report.rs
//! Plain-text outputs: the run log, the re-segmented corpus, the lexicon
//! with its count history and the precision/recall table.

use crate::config::RunConfig;
use crate::core::corpus::Corpus;
use crate::core::cost::plog;
use crate::core::engine::IterationSummary;
use crate::core::lexicon::Lexicon;
use crate::core::types::{IterationRecord, LexiconEntry};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// The per-run log: a header, then one block per reported iteration.
pub struct RunLog<W: Write> {
    out: W,
}

impl RunLog<BufWriter<File>> {
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> RunLog<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn header(&mut self, config: &RunConfig, checkpoint_out: &Path) -> io::Result<()> {
        let loaded = config
            .checkpoint
            .as_deref()
            .map_or_else(|| "None".to_string(), |p| p.display().to_string());
        let lines = config
            .max_corpus_lines
            .map_or_else(|| "all".to_string(), |n| n.to_string());
        let corpus = config
            .corpus
            .as_deref()
            .map_or_else(|| "from checkpoint".to_string(), |p| p.display().to_string());
        writeln!(self.out, "# corpus = {}", corpus)?;
        writeln!(self.out, "# state loaded from {}", loaded)?;
        writeln!(self.out, "# state saved to {}", checkpoint_out.display())?;
        writeln!(
            self.out,
            "# {} cycles, (first = {}, last = {})",
            config.itarget - config.ibase,
            config.ibase + 1,
            config.itarget
        )?;
        writeln!(self.out, "# {} candidates on each cycle.", config.candidates_per_iteration)?;
        writeln!(self.out, "# lines read from original corpus = {}", lines)
    }

    /// Lists the lines break-based scoring leaves out.
    pub fn skipped_lines(&mut self, corpus: &Corpus) -> io::Result<()> {
        for (line_no, line) in corpus.single_word_lines() {
            writeln!(self.out, "Skipping this line: {} {}", line_no, line)?;
        }
        Ok(())
    }

    /// Costs and scores for the starting parse.
    pub fn startup(&mut self, record: &IterationRecord) -> io::Result<()> {
        writeln!(self.out, "\n Startup")?;
        self.record(record)
    }

    pub fn iteration(&mut self, summary: &IterationSummary) -> io::Result<()> {
        writeln!(self.out, "\n\n Iteration number {}", summary.record.iteration)?;
        writeln!(self.out, "Nominees:")?;
        writeln!(self.out, "{:>15}  {:>10} {:>12}{:>12}", "piece", "count", "parent0", "parent1")?;
        for nominee in &summary.admitted {
            writeln!(
                self.out,
                "{:>15}  {:>10} {:>12}{:>12}",
                nominee.key,
                group_thousands(nominee.count),
                nominee.parents.0,
                nominee.parents.1
            )?;
        }
        for key in &summary.rejected {
            writeln!(self.out, "---> Deleted {}", key)?;
        }
        self.record(&summary.record)
    }

    pub fn finish(&mut self, elapsed: Duration) -> io::Result<()> {
        writeln!(self.out, "\n\nElapsed wall time in seconds = {:.3}", elapsed.as_secs_f64())?;
        self.out.flush()
    }

    fn record(&mut self, record: &IterationRecord) -> io::Result<()> {
        writeln!(self.out, "Cost: ")?;
        for (label, bits) in [
            ("Corpus: ", record.corpus_cost),
            ("Dictionary: ", record.dictionary_cost),
            ("Combined: ", record.total_cost()),
        ] {
            writeln!(self.out, "-{:>16} {:>18.4}", label, bits)?;
        }
        let eval = &record.evaluation;
        for (label, pr) in [
            ("Break based word", eval.break_based),
            ("Token_based word", eval.token_based),
            (" Type_based word", eval.type_based),
        ] {
            writeln!(
                self.out,
                "{:>16} {:>12} {:6.4} {:>9} {:6.4}",
                label, "precision", pr.precision, "recall", pr.recall
            )?;
        }
        Ok(())
    }
}

/// One line per corpus line, tokens separated by a single space.
pub fn write_broken_corpus<W: Write>(out: &mut W, parsed_lines: &[Vec<String>]) -> io::Result<()> {
    for line in parsed_lines {
        writeln!(out, "{}", line.join(" "))?;
    }
    Ok(())
}

/// Every entry with its provenance and count register, then the rejected
/// entries in the same layout.
pub fn write_lexicon<W: Write>(out: &mut W, lexicon: &Lexicon) -> io::Result<()> {
    writeln!(out, "LEXICON with trace information")?;
    for entry in lexicon.entries() {
        write_entry(out, entry)?;
    }
    writeln!(out, "\n\nDELETIONS")?;
    for entry in lexicon.rejected() {
        write_entry(out, entry)?;
    }
    Ok(())
}

fn write_entry<W: Write>(out: &mut W, entry: &LexiconEntry) -> io::Result<()> {
    if entry.frequency > 0.0 {
        writeln!(out, "{}    {:.7}    {:.7}", entry.key, entry.frequency, plog(entry.frequency))?;
    } else {
        writeln!(out, "{}    {:.7}    -", entry.key, entry.frequency)?;
    }
    if let Some((left, right)) = &entry.parents {
        writeln!(out, "{}/{}", left, right)?;
    }
    for row in &entry.register {
        if row.children.is_empty() {
            writeln!(out, "{:6} {:>10}", row.iteration, group_thousands(row.count))?;
        } else {
            writeln!(
                out,
                "{:6} {:>10}    [{}]",
                row.iteration,
                group_thousands(row.count),
                row.children.join(", ")
            )?;
        }
    }
    Ok(())
}

/// Costs and the three precision/recall pairs for every recorded iteration.
pub fn write_recall_precision<W: Write>(out: &mut W, history: &[IterationRecord]) -> io::Result<()> {
    writeln!(
        out,
        "iteration\tdictionary_cost\tcorpus_cost\tbreak_precision\tbreak_recall\t\
         token_precision\ttoken_recall\ttype_precision\ttype_recall"
    )?;
    for record in history {
        let eval = &record.evaluation;
        writeln!(
            out,
            "{}\t{:.4}\t{:.4}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}",
            record.iteration,
            record.dictionary_cost,
            record.corpus_cost,
            eval.break_based.precision,
            eval.break_based.recall,
            eval.token_based.precision,
            eval.token_based.recall,
            eval.type_based.precision,
            eval.type_based.recall
        )?;
    }
    Ok(())
}

/// Writes a report file through `write`, creating or truncating it.
pub fn write_file<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let mut out = BufWriter::new(File::create(path)?);
    write(&mut out)?;
    out.flush()
}

/// `1234567` -> `1,234,567`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
