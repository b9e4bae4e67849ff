use crate::core::error::Result;
use crate::core::fs::is_gzipped;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

const READ_BUFFER: usize = 256 * 1024;

/// Open a text file for line-oriented reading, transparently decompressing
/// gzip input based on the file extension.
pub fn open_text_reader<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader: Box<dyn BufRead> = if is_gzipped(path) {
        Box::new(BufReader::with_capacity(
            READ_BUFFER,
            MultiGzDecoder::new(file),
        ))
    } else {
        Box::new(BufReader::with_capacity(READ_BUFFER, file))
    };
    Ok(reader)
}

/// Build a tab-delimited reader for (optionally gzipped) side files.
///
/// Quoting is disabled and rows may have differing field counts, matching
/// the loose TSV produced by CellRanger and STARsolo.
pub fn get_reader<P: AsRef<Path>>(
    path: P,
    has_headers: bool,
) -> Result<csv::Reader<Box<dyn Read>>> {
    let raw_reader: Box<dyn Read> = Box::new(open_text_reader(path)?);

    Ok(csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .flexible(true)
        .quoting(false)
        .from_reader(raw_reader))
}

/// Build a tab-delimited writer targeting a file. Fields are never quoted.
pub fn get_writer<P: AsRef<Path>>(path: P) -> Result<csv::Writer<Box<dyn Write>>> {
    let raw_writer: Box<dyn Write> = Box::new(BufWriter::new(File::create(path)?));

    Ok(csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(raw_writer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::tempdir;

    #[test]
    fn reads_gzipped_tsv() -> anyhow::Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("features.tsv.gz");
        let mut encoder = GzEncoder::new(File::create(&path)?, Compression::default());
        encoder.write_all(b"ENSG1\tTP53\tGene Expression\nENSG2\tGAPDH\n")?;
        encoder.finish()?;

        let mut reader = get_reader(&path, false)?;
        let rows: Vec<csv::StringRecord> = reader.records().collect::<std::result::Result<_, _>>()?;
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "TP53");
        assert_eq!(rows[1].len(), 2);
        Ok(())
    }

    #[test]
    fn writer_does_not_quote() -> anyhow::Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("out.txt");
        {
            let mut writer = get_writer(&path)?;
            writer.write_record(["cell \"a\"", "1"])?;
            writer.flush()?;
        }
        assert_eq!(std::fs::read_to_string(&path)?, "cell \"a\"\t1\n");
        Ok(())
    }
}
