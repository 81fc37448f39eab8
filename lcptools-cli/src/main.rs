#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use cmd::{parse, show, stats};
use human_panic::setup_panic;
use lazy_static::lazy_static;
use log::info;

use crate::logging::init_logging;
use crate::opts::{OutputMode, OutputWriter};
use crate::progress_bar::LcpProgressBar;

mod cli;
mod cmd;
mod logging;
mod opts;
mod progress_bar;

lazy_static! {
    pub(crate) static ref PROGRESS_BAR: LcpProgressBar = LcpProgressBar::new();
}

fn main() -> anyhow::Result<()> {
    setup_panic!();

    let cli: Cli = Cli::parse();

    if !cli.no_progress {
        PROGRESS_BAR.show();
    }

    init_logging(cli.verbose.log_level_filter()).expect("Could not initialize logging");

    match &cli.command {
        Commands::Parse {
            input,
            output,
            options,
        } => {
            let reader = input.as_reader()?;
            info!("Parsing {} to level {}", input, options.level);
            PROGRESS_BAR.set_total_bytes(reader.length()?.unwrap_or(0));
            let output =
                OutputWriter::from_path_and_input(output, &reader, "lcpt", OutputMode::Binary)?;

            parse::parse(
                reader.into_read(),
                output.into_write(),
                options,
                Arc::new(PROGRESS_BAR.clone()),
            )
            .context("Failed to parse given file")?;
        }
        Commands::Stats { input, levels, csv } => {
            let reader = input.as_reader()?;
            PROGRESS_BAR.set_total_bytes(reader.length()?.unwrap_or(0));

            stats::stats(reader.into_read(), *levels, *csv)
                .context("Failed to compute parse statistics")?;
        }
        Commands::Show { input, output } => {
            let reader = input.as_reader()?;
            let output = OutputWriter::from_path(output, OutputMode::Text)?;

            show::show(reader.into_read(), output.into_write())
                .context("Failed to read given LCPT file")?;
        }
    }

    PROGRESS_BAR.finish();
    Ok(())
}
