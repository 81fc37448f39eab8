use std::io;
use std::io::{BufReader, Read};
use std::time::{Duration, Instant};

use anyhow::Context;
use derive_more::{Add, AddAssign};
use itertools::{EitherOrBoth, Itertools};
use lcptools::fasta::reader::FastaReader;
use lcptools::lps::Lps;
use lcptools::progress::{ByteNum, ProgressNotifier};
use rayon::iter::{ParallelBridge, ParallelIterator};

use crate::PROGRESS_BAR;

pub(crate) fn stats<R: Read + Send>(reader: R, levels: u32, csv: bool) -> anyhow::Result<()> {
    let fasta_reader = FastaReader::new(BufReader::new(reader));

    let level_stats = fasta_reader
        .into_iter()
        .par_bridge()
        .map(|record| -> anyhow::Result<Vec<LevelStats>> {
            let record = record.context("Could not parse a record from the FASTA file")?;
            let stats = record_stats(record.sequence(), levels).with_context(|| {
                format!("Could not parse the sequence `{}`", record.identifier())
            })?;

            PROGRESS_BAR.processed_bytes(ByteNum::new(record.len()));
            PROGRESS_BAR.record_written();
            Ok(stats)
        })
        .try_reduce(Vec::new, |a, b| Ok(merge_level_stats(a, b)))?;

    PROGRESS_BAR.finish();

    if csv {
        write_csv(&level_stats)?;
    } else {
        print_level_stats(&level_stats);
    }

    Ok(())
}

/// Totals of all the parses that reached a single level.
#[derive(Debug, Copy, Clone, Default, Add, AddAssign)]
struct LevelStats {
    records: u64,
    cores: u64,
    memsize: usize,
    time: Duration,
}

impl LevelStats {
    fn new(lps: &Lps, time: Duration) -> Self {
        Self {
            records: 1,
            cores: lps.len() as u64,
            memsize: lps.memsize(),
            time,
        }
    }
}

/// Parses the sequence and deepens it up to `levels`, timing every step.
fn record_stats(sequence: &[u8], levels: u32) -> anyhow::Result<Vec<LevelStats>> {
    let start_time = Instant::now();
    let mut lps = Lps::new(sequence)?;
    let mut stats = vec![LevelStats::new(&lps, start_time.elapsed())];

    while lps.level() < levels {
        let start_time = Instant::now();
        if !lps.deepen() {
            break;
        }
        stats.push(LevelStats::new(&lps, start_time.elapsed()));
    }

    Ok(stats)
}

fn merge_level_stats(a: Vec<LevelStats>, b: Vec<LevelStats>) -> Vec<LevelStats> {
    a.into_iter()
        .zip_longest(b)
        .map(|stats| match stats {
            EitherOrBoth::Both(a, b) => a + b,
            EitherOrBoth::Left(stats) | EitherOrBoth::Right(stats) => stats,
        })
        .collect()
}

fn print_level_stats(level_stats: &[LevelStats]) {
    if level_stats.is_empty() {
        eprintln!("No sequences found");
        return;
    }

    for (level, stats) in (1..).zip(level_stats) {
        eprintln!(
            "Level {}: {} cores in {} sequences, {} bytes, {:.3}s",
            level,
            stats.cores,
            stats.records,
            stats.memsize,
            stats.time.as_secs_f64()
        );
    }
}

fn write_csv(level_stats: &[LevelStats]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());

    writer.write_record(&["level", "sequences", "cores", "memsize", "time"])?;
    for (level, stats) in (1u32..).zip(level_stats) {
        writer.write_record(&[
            level.to_string(),
            stats.records.to_string(),
            stats.cores.to_string(),
            stats.memsize.to_string(),
            format!("{:.6}", stats.time.as_secs_f64()),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::cmd::stats::{merge_level_stats, record_stats, LevelStats};

    #[test]
    fn should_stop_at_requested_level() {
        let stats = record_stats(b"GACTTGACTTGACTT", 1).unwrap();

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].records, 1);
    }

    #[test]
    fn should_stop_when_parse_cannot_be_deepened() {
        let stats = record_stats(b"GACTT", 10).unwrap();

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].cores, 1);
    }

    #[test]
    fn should_fail_on_invalid_symbol() {
        assert!(record_stats(b"ACGTN", 2).is_err());
    }

    #[test]
    fn should_merge_levels_of_different_depth() {
        let stats = |cores| LevelStats {
            records: 1,
            cores,
            memsize: 0,
            time: Duration::from_millis(10),
        };

        let merged = merge_level_stats(vec![stats(10), stats(3)], vec![stats(20)]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].cores, 30);
        assert_eq!(merged[0].records, 2);
        assert_eq!(merged[0].time, Duration::from_millis(20));
        assert_eq!(merged[1].cores, 3);
        assert_eq!(merged[1].records, 1);
    }
}
