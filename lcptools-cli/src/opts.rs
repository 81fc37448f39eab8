use std::fmt::Display;
use std::fs::File;
use std::io;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use atty::Stream;
use log::info;

const STANDARD_STREAM_PATH: &str = "-";

fn is_standard_stream(path: &Path) -> bool {
    path.as_os_str() == STANDARD_STREAM_PATH
}

pub fn input_stream(path: &str) -> Result<InputStream, String> {
    if path.is_empty() {
        return Err("Input path cannot be empty".to_owned());
    }

    Ok(InputStream {
        path: PathBuf::from(path),
    })
}

/// Input file path, or `-` for the standard input.
#[derive(Debug, Clone)]
pub struct InputStream {
    path: PathBuf,
}

impl Display for InputStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl Default for InputStream {
    fn default() -> Self {
        Self {
            path: PathBuf::from(STANDARD_STREAM_PATH),
        }
    }
}

impl InputStream {
    pub fn as_reader(&self) -> anyhow::Result<InputReader> {
        InputReader::from_path(&self.path)
    }
}

#[derive(Debug)]
pub enum InputReader {
    Stdin(io::Stdin),
    File { file: File, path: PathBuf },
}

impl InputReader {
    fn from_path(path: &Path) -> anyhow::Result<Self> {
        if is_standard_stream(path) {
            return Ok(Self::Stdin(io::stdin()));
        }

        let file = File::open(path)
            .with_context(|| format!("Could not open input file {}", path.display()))?;
        Ok(Self::File {
            file,
            path: path.to_owned(),
        })
    }

    /// Size of the input in bytes, if known.
    pub fn length(&self) -> anyhow::Result<Option<u64>> {
        let val = match self {
            InputReader::Stdin(_) => None,
            InputReader::File { file, .. } => Some(file.metadata()?.len()),
        };
        Ok(val)
    }

    pub fn file_path(&self) -> Option<&Path> {
        match self {
            InputReader::Stdin(_) => None,
            InputReader::File { path, .. } => Some(path),
        }
    }

    #[must_use]
    pub fn into_read(self) -> Box<dyn Read + Send> {
        match self {
            InputReader::Stdin(stdin) => Box::new(stdin),
            InputReader::File { file, .. } => Box::new(file),
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Binary,
}

#[derive(Debug)]
pub enum OutputWriter {
    Stdout(io::Stdout),
    File(File),
}

impl OutputWriter {
    /// Opens `output`, or a file named after the input with `new_extension`
    /// when no output was given. Standard input maps to standard output.
    pub fn from_path_and_input(
        output: &Option<PathBuf>,
        input: &InputReader,
        new_extension: &str,
        mode: OutputMode,
    ) -> anyhow::Result<Self> {
        match output {
            Some(path) => Self::from_path(path, mode),
            None => {
                let path = input
                    .file_path()
                    .map(|path| path.with_extension(new_extension))
                    .unwrap_or_else(|| PathBuf::from(STANDARD_STREAM_PATH));

                Self::from_path(&path, mode)
            }
        }
    }

    pub fn from_path(path: &Path, mode: OutputMode) -> anyhow::Result<Self> {
        if is_standard_stream(path) {
            if mode == OutputMode::Binary && atty::is(Stream::Stdout) {
                bail!("Cannot output binary file to stdout when running in terminal; please use -o option instead or pipe the standard output");
            }

            return Ok(Self::Stdout(io::stdout()));
        }

        info!("Output file: {}", path.display());
        let file = File::create(path)
            .with_context(|| format!("Could not create output file {}", path.display()))?;
        Ok(Self::File(file))
    }

    pub fn into_write(self) -> Box<dyn Write + Send> {
        match self {
            OutputWriter::Stdout(stdout) => Box::new(stdout),
            OutputWriter::File(file) => Box::new(file),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use crate::opts::{input_stream, InputReader, OutputMode, OutputWriter};

    #[test]
    fn should_read_stdin_for_dash() {
        let reader = input_stream("-").unwrap().as_reader().unwrap();

        assert!(matches!(reader, InputReader::Stdin(_)));
        assert!(reader.file_path().is_none());
        assert_eq!(reader.length().unwrap(), None);
    }

    #[test]
    fn should_reject_empty_input_path() {
        assert!(input_stream("").is_err());
    }

    #[test]
    fn should_fail_on_missing_input() {
        let stream = input_stream("/nonexistent/lcptools/input.fa").unwrap();

        assert!(stream.as_reader().is_err());
    }

    #[test]
    fn should_write_stdout_for_stdin_input() {
        let reader = input_stream("-").unwrap().as_reader().unwrap();
        let writer = OutputWriter::from_path_and_input(&None, &reader, "lcpt", OutputMode::Text);

        assert!(matches!(writer, Ok(OutputWriter::Stdout(_))));
    }

    #[test]
    fn should_write_text_to_stdout() {
        let writer = OutputWriter::from_path(&PathBuf::from("-"), OutputMode::Text);

        assert!(matches!(writer, Ok(OutputWriter::Stdout(_))));
        assert!(OutputWriter::from_path(Path::new("/nonexistent/dir/out.lcpt"), OutputMode::Text).is_err());
    }
}
