use std::io::{BufReader, BufWriter, Read, Write};

use anyhow::Context;
use lcptools::lcpt::reader::LcptReader;

pub fn show<R: Read, W: Write>(reader: R, writer: W) -> anyhow::Result<()> {
    let lcpt_reader = LcptReader::new(BufReader::new(reader));
    let mut writer = BufWriter::new(writer);

    for (index, lps) in lcpt_reader.enumerate() {
        let lps = lps.with_context(|| format!("Could not read record {} of the LCPT file", index))?;
        writeln!(writer, "{}", lps)?;
    }

    writer.flush()?;
    Ok(())
}
