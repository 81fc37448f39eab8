use std::io::{BufReader, BufWriter, Read, Write};
use std::sync::Arc;

use anyhow::Context;
use lcptools::fasta::reader::FastaReader;
use lcptools::lcpt::writer::{LcptWriter, LcptWriterParams};
use lcptools::lps::LpsParams;
use lcptools::progress::ProgressNotifier;
use log::debug;

#[derive(clap::Args, Debug, Clone)]
pub struct ParseOptions {
    /// Level to deepen the parses to; parses that cannot be deepened any
    /// further are stored at the highest level reached
    #[clap(default_value_t = 1, short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub level: u32,

    /// Number of additional threads parsing sequences at the same time
    #[clap(long, value_parser)]
    pub threads: Option<usize>,

    /// Number of threads parsing the segments of a single long sequence
    #[clap(long, value_parser)]
    pub segment_threads: Option<usize>,

    /// Sequences longer than this are parsed in segments of this length
    #[clap(long, value_parser)]
    pub split_length: Option<usize>,

    /// Length of the overlap added in front of every segment
    #[clap(long, value_parser)]
    pub overlap_margin: Option<usize>,

    /// Parse the reverse complement of every sequence
    #[clap(long, value_parser)]
    pub reverse_complement: bool,
}

impl ParseOptions {
    fn lps_params(&self) -> LpsParams {
        let mut params = LpsParams::builder();
        params
            .level(self.level)
            .reverse_complement(self.reverse_complement);
        if let Some(split_length) = self.split_length {
            params.sequence_split_length(split_length);
        }
        if let Some(overlap_margin) = self.overlap_margin {
            params.overlap_margin_length(overlap_margin);
        }
        if let Some(segment_threads) = self.segment_threads {
            params.thread_num(segment_threads);
        }

        params.build()
    }
}

pub fn parse<R: Read, W: Write + Send + 'static>(
    reader: R,
    writer: W,
    options: &ParseOptions,
    progress_notifier: Arc<dyn ProgressNotifier>,
) -> anyhow::Result<()> {
    let fasta_reader = FastaReader::new(BufReader::new(reader));

    let mut params = LcptWriterParams::builder();
    params
        .lps_params(options.lps_params())
        .progress_notifier(progress_notifier);
    if let Some(threads) = options.threads {
        params.thread_num(threads);
    }
    let mut lcpt_writer = LcptWriter::with_params(BufWriter::new(writer), params.build());

    for record in fasta_reader {
        let record = record.context("Could not parse a record from the FASTA file")?;
        debug!(
            "Submitting record `{}` ({} symbols)",
            record.identifier(),
            record.len()
        );

        let identifier = record.identifier().to_owned();
        lcpt_writer
            .add_sequence(record.into_sequence())
            .with_context(|| format!("Could not parse the sequence `{}`", identifier))?;
    }

    lcpt_writer
        .finish()
        .context("Could not write the LCPT file")?;

    Ok(())
}
