// 💾 CSV Export - the loaded (optionally filtered) table as a download
// Same header as the source file, no derived columns.

use crate::aggregate::{filter_rows, RowPredicate};
use crate::dataset::{ArtistRecord, ArtistTable, WordTable};
use anyhow::{Context, Result};
use std::io::Write;

/// Default file name offered for downloads
pub const EXPORT_FILE_NAME: &str = "museum_artists_analysis.csv";

/// Write `table`'s header followed by the normalised cells of `rows`.
pub fn write_csv<'a, W, I>(table: &ArtistTable, rows: I, writer: W) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a ArtistRecord>,
{
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&table.columns)
        .context("Failed to write CSV header")?;

    let mut written = 0;
    for record in rows {
        wtr.write_record(record.cells())
            .with_context(|| format!("Failed to write row for {}", record.name))?;
        written += 1;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(written)
}

/// Rows matching `predicate`, serialised into memory
pub fn export_filtered<P: RowPredicate + ?Sized>(table: &ArtistTable, predicate: &P) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(table, filter_rows(table, predicate), &mut buffer)?;
    Ok(buffer)
}

/// Word table as `Words,Frequency`
pub fn write_words_csv<W: Write>(table: &WordTable, writer: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Words", "Frequency"])
        .context("Failed to write CSV header")?;

    for entry in &table.entries {
        wtr.write_record([entry.word.clone(), entry.frequency.to_string()])
            .context("Failed to write word row")?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(table.entries.len())
}
