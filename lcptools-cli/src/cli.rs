use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};

use crate::cmd::parse::ParseOptions;
use crate::opts::{input_stream, InputStream};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub struct Cli {
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,

    /// Don't display a progress bar/spinner
    #[clap(long, global = true, value_parser)]
    pub no_progress: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse every sequence of a FASTA file and store the parses in an LCPT
    /// file
    Parse {
        /// Input FASTA file to read; `-` is the standard input
        #[clap(default_value_t, value_parser = input_stream)]
        input: InputStream,

        /// Output LCPT file path; `-` is the standard output
        #[clap(short, long, value_parser)]
        output: Option<PathBuf>,

        #[clap(flatten)]
        options: ParseOptions,
    },

    /// Print the number of cores and time spent on each level of a FASTA file
    Stats {
        /// Input FASTA file to read; `-` is the standard input
        #[clap(default_value_t, value_parser = input_stream)]
        input: InputStream,

        /// Highest level to deepen the parses to
        #[clap(default_value_t = 4, long, value_parser = clap::value_parser!(u32).range(1..))]
        levels: u32,

        /// Output the statistics as a CSV file to the standard output
        #[clap(long, value_parser)]
        csv: bool,
    },

    /// Print the parses stored in an LCPT file
    Show {
        /// Input LCPT file to read; `-` is the standard input
        #[clap(default_value_t, value_parser = input_stream)]
        input: InputStream,

        /// Output file path; `-` is the standard output
        #[clap(default_value = "-", short, long, value_parser)]
        output: PathBuf,
    },
}
