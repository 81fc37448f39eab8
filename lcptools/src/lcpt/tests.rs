use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::_internal_test_data::{random_sequence, SHORT_TEST_SEQUENCE};
use crate::error::LcpError;
use crate::lcpt::reader::LcptReader;
use crate::lcpt::writer::{LcptWriter, LcptWriterParams};
use crate::lps::{Lps, LpsParams};
use crate::progress::{ByteNum, ProgressNotifier};

fn test_sequences() -> Vec<Vec<u8>> {
    let mut sequences = vec![SHORT_TEST_SEQUENCE.as_bytes().to_vec(), Vec::new()];
    sequences.extend((0..10).map(|seed| random_sequence(1_000 + 317 * seed as usize, seed)));
    sequences
}

fn write_all(sequences: &[Vec<u8>], params: LcptWriterParams) -> Vec<u8> {
    let mut writer = LcptWriter::with_params(Vec::new(), params);
    for sequence in sequences {
        writer.add_sequence(sequence.clone()).unwrap();
    }
    writer.finish().unwrap()
}

fn read_all(data: &[u8]) -> Vec<Lps> {
    LcptReader::new(data)
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[test]
fn test_empty_container() {
    let data = write_all(&[], LcptWriterParams::default());

    assert_eq!(data, [0]);
    assert!(read_all(&data).is_empty());
}

#[test]
fn test_short_sequence_round_trip() {
    let sequence = SHORT_TEST_SEQUENCE.as_bytes().to_vec();
    let data = write_all(&[sequence], LcptWriterParams::default());

    assert_eq!(data.len(), 1 + 12 + 19 * 20 + 1);
    let parses = read_all(&data);
    assert_eq!(parses.len(), 1);
    assert_eq!(parses[0], Lps::new(SHORT_TEST_SEQUENCE.as_bytes()).unwrap());
}

#[test_log::test]
fn test_round_trip_foreground() {
    let sequences = test_sequences();
    let params = LcptWriterParams::builder()
        .lps_params(LpsParams::builder().level(2).build())
        .build();

    let parses = read_all(&write_all(&sequences, params));

    assert_eq!(parses.len(), sequences.len());
    for (lps, sequence) in parses.iter().zip(&sequences) {
        let mut expected = Lps::new(sequence).unwrap();
        expected.deepen_to(2);
        assert_eq!(*lps, expected);
    }
}

#[test_log::test]
fn test_round_trip_threaded_keeps_order() {
    let sequences = test_sequences();
    let lps_params = LpsParams::builder()
        .level(3)
        .sequence_split_length(1_500)
        .overlap_margin_length(300)
        .build();

    let foreground = write_all(
        &sequences,
        LcptWriterParams::builder()
            .lps_params(lps_params.clone())
            .build(),
    );
    let threaded = write_all(
        &sequences,
        LcptWriterParams::builder()
            .lps_params(lps_params)
            .thread_num(4)
            .build(),
    );

    assert_eq!(foreground, threaded);
    assert_eq!(read_all(&threaded).len(), sequences.len());
}

#[test]
fn test_invalid_sequence_foreground() {
    let mut writer = LcptWriter::new(Vec::new());
    writer.add_sequence(b"ACGT".to_vec()).unwrap();

    let result = writer.add_sequence(b"ACGTNN".to_vec());

    assert!(matches!(
        result,
        Err(LcpError::InvalidSymbol {
            byte: b'N',
            offset: 4
        })
    ));
}

#[test]
fn test_invalid_sequence_threaded() {
    let params = LcptWriterParams::builder().thread_num(2).build();
    let mut writer = LcptWriter::with_params(Vec::new(), params);
    writer.add_sequence(b"ACGT-".to_vec()).unwrap();

    assert!(matches!(
        writer.finish(),
        Err(LcpError::InvalidSymbol {
            byte: b'-',
            offset: 4
        })
    ));
}

#[test]
fn test_missing_terminator() {
    let sequences = test_sequences();
    let mut data = write_all(&sequences[..2], LcptWriterParams::default());
    data.pop();

    let mut reader = LcptReader::new(data.as_slice());
    assert!(reader.next().unwrap().is_ok());
    assert!(reader.next().unwrap().is_ok());
    assert!(matches!(
        reader.next(),
        Some(Err(LcpError::MissingTerminator { records: 2 }))
    ));
    assert!(reader.next().is_none());
}

#[test]
fn test_truncated_record() {
    let sequence = SHORT_TEST_SEQUENCE.as_bytes().to_vec();
    let mut data = write_all(&[sequence], LcptWriterParams::default());
    data.truncate(1 + 12 + 3 * 20);

    let mut reader = LcptReader::new(data.as_slice());
    assert!(matches!(
        reader.next(),
        Some(Err(LcpError::CorruptData {
            declared: 19,
            actual: 3
        }))
    ));
    assert!(reader.next().is_none());
}

#[test]
fn test_invalid_tag() {
    let mut reader = LcptReader::new([7u8].as_slice());

    assert!(matches!(
        reader.next(),
        Some(Err(LcpError::SerializeError(_)))
    ));
}

#[derive(Debug, Default)]
struct CountingNotifier {
    bytes: AtomicUsize,
    records: AtomicU64,
}

impl ProgressNotifier for CountingNotifier {
    fn processed_bytes(&self, bytes: ByteNum) {
        self.bytes.fetch_add(bytes.get(), Ordering::SeqCst);
    }

    fn record_written(&self) {
        self.records.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_progress_notifier() {
    let sequences = test_sequences();
    let notifier = Arc::new(CountingNotifier::default());
    let params = LcptWriterParams::builder()
        .progress_notifier(notifier.clone())
        .thread_num(2)
        .build();

    write_all(&sequences, params);

    let total: usize = sequences.iter().map(Vec::len).sum();
    assert_eq!(notifier.bytes.load(Ordering::SeqCst), total);
    assert_eq!(notifier.records.load(Ordering::SeqCst), sequences.len() as u64);
}
