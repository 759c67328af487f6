//! CSV export of the current result table.
//!
//! Files are UTF-8 with the header `title,genres,avg_rating,num_ratings,year`.
//! Averages are written as already rounded, so reading an export back gives
//! the same rows.

use crate::validation::validate_export_path;
use crate::{Error, MovieAggregateRow, Result, ROW_COLUMNS};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// File name offered for downloads
pub const DEFAULT_EXPORT_FILE: &str = "top_movies_filtered.csv";

fn export_error(err: csv::Error) -> Error {
    Error::Export(err.to_string())
}

/// Write `rows` as CSV, header first. An empty slice still gets the header.
pub fn write_csv<W: Write>(writer: W, rows: &[MovieAggregateRow]) -> Result<()> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    out.write_record(ROW_COLUMNS).map_err(export_error)?;
    for row in rows {
        out.serialize(row).map_err(export_error)?;
    }
    out.flush()?;
    Ok(())
}

/// Parse an export back into rows.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<MovieAggregateRow>> {
    let mut input = csv::Reader::from_reader(reader);
    let headers = input.headers().map_err(export_error)?;
    if !headers.iter().eq(ROW_COLUMNS.iter().copied()) {
        return Err(Error::Export(format!(
            "Unexpected header '{}', expected '{}'",
            headers.iter().collect::<Vec<_>>().join(","),
            ROW_COLUMNS.join(",")
        )));
    }

    input
        .deserialize::<MovieAggregateRow>()
        .enumerate()
        .map(|(line, record)| {
            record.map_err(|e| Error::Export(format!("row {}: {}", line + 1, e)))
        })
        .collect()
}

/// Write `rows` to a file at `path`, replacing any existing file.
pub fn export_to_path<P: AsRef<Path>>(path: P, rows: &[MovieAggregateRow]) -> Result<()> {
    let path = path.as_ref();
    validate_export_path(path)?;
    let file = File::create(path)?;
    write_csv(std::io::BufWriter::new(file), rows)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Exported results");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<MovieAggregateRow> {
        vec![
            MovieAggregateRow::new("Heat (1995)", "Action|Crime|Thriller", 3.6667, 3, Some(1995)),
            MovieAggregateRow::new(
                "American President, The (1995)",
                "Comedy|Drama|Romance",
                4.0,
                120,
                Some(1995),
            ),
        ]
    }

    #[test]
    fn test_header_and_quoting() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &sample()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("title,genres,avg_rating,num_ratings,year"));
        assert_eq!(lines.next(), Some("Heat (1995),Action|Crime|Thriller,3.67,3,1995"));
        assert_eq!(
            lines.next(),
            Some("\"American President, The (1995)\",Comedy|Drama|Romance,4.0,120,1995")
        );
    }

    #[test]
    fn test_empty_export_has_header() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "title,genres,avg_rating,num_ratings,year\n");
        assert!(read_csv("title,genres,avg_rating,num_ratings,year\n".as_bytes())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_read_rejects_foreign_header() {
        let err = read_csv("movieId,title,genres\n1,Heat (1995),Action\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Export(ref msg) if msg.contains("Unexpected header")));
    }

    #[test]
    fn test_read_reports_bad_row() {
        let text = "title,genres,avg_rating,num_ratings,year\nHeat (1995),Action,high,3,1995\n";
        let err = read_csv(text.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Export(ref msg) if msg.starts_with("row 1")));
    }
}
