use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::NEW_BANNER_FLAG;
use crate::error::{PrimoError, PrimoResult};
use crate::model::Row;

const FIELDS: usize = 4;

// Fields kept as text so numeric failures can name the offending line.
#[derive(Debug, Deserialize)]
struct RawRow {
    date_label: String,
    day_index: String,
    banner_flag: String,
    amount: String,
}

pub fn load_rows(path: impl AsRef<Path>, max_rows: usize) -> PrimoResult<Vec<Row>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| PrimoError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let rows = read_rows(file, max_rows)?;
    info!(
        path = %path.display(),
        rows = rows.len(),
        first = ?rows.first().map(|r| r.date_label.as_str()),
        last = ?rows.last().map(|r| r.date_label.as_str()),
        "loaded primogem history"
    );
    Ok(rows)
}

/// Reads the header plus at most `max_rows - 1` data rows.
pub fn read_rows<R: Read>(reader: R, max_rows: usize) -> PrimoResult<Vec<Row>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .quoting(false)
        .flexible(true)
        .from_reader(reader);

    let mut prev_line = rdr.headers()?.position().map(|p| p.line()).unwrap_or(1);
    let mut consumed_to = rdr.position().line();

    let limit = max_rows.saturating_sub(1);
    let mut rows = Vec::new();
    let mut record = csv::StringRecord::new();

    while rows.len() < limit && rdr.read_record(&mut record)? {
        // The reader skips empty lines; one that was skipped is a row with no fields.
        let end = rdr.position().line();
        if end - consumed_to > 1 {
            return Err(PrimoError::FieldCount { line: prev_line + 1, found: 0 });
        }
        consumed_to = end;

        let line = record.position().map(|p| p.line()).unwrap_or(prev_line + 1);
        prev_line = line;

        if record.len() != FIELDS {
            return Err(PrimoError::FieldCount { line, found: record.len() });
        }

        let raw: RawRow = record.deserialize(None)?;
        rows.push(parse_row(raw, line)?);
    }

    debug!(rows = rows.len(), max_rows, "finished reading rows");
    Ok(rows)
}

fn parse_row(raw: RawRow, line: u64) -> PrimoResult<Row> {
    let day_index = raw.day_index.trim().parse::<f64>().map_err(|_| PrimoError::DayIndex {
        line,
        value: raw.day_index.clone(),
    })?;

    let amount = raw.amount.trim().parse::<i64>().map_err(|_| PrimoError::Amount {
        line,
        value: raw.amount.clone(),
    })?;

    Ok(Row {
        date_label: raw.date_label,
        day_index,
        new_banner: raw.banner_flag == NEW_BANNER_FLAG,
        amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HISTORY: &[u8] = b"\
Date\tDay\tNew Banner?\tPrimogems
d1\t0\tF\t100
d2\t1\tF\t80
d3\t2\tT\t150
";

    #[test]
    fn reads_every_row_after_the_header() {
        let rows = read_rows(HISTORY, 375).unwrap();
        assert_eq!(
            rows,
            [
                Row { date_label: "d1".into(), day_index: 0.0, new_banner: false, amount: 100 },
                Row { date_label: "d2".into(), day_index: 1.0, new_banner: false, amount: 80 },
                Row { date_label: "d3".into(), day_index: 2.0, new_banner: true, amount: 150 },
            ]
        );
    }

    #[test]
    fn row_cap_counts_the_header() {
        let rows = read_rows(HISTORY, 3).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].amount, 80);

        assert!(read_rows(HISTORY, 1).unwrap().is_empty());
    }

    #[test]
    fn crlf_line_endings() {
        let input = b"Date\tDay\tNew\tAmount\r\nd1\t0\tT\t100\r\nd2\t1\tF\t90\r\n";
        let rows = read_rows(&input[..], 375).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].new_banner);
        assert_eq!(rows[1].amount, 90);
    }

    #[test]
    fn banner_flag_is_compared_verbatim() {
        let input = b"h\th\th\th\nd1\t0\tt\t100\nd2\t1\tTrue\t100\nd3\t2\tT\t100\n";
        let flags: Vec<bool> = read_rows(&input[..], 375)
            .unwrap()
            .iter()
            .map(|r| r.new_banner)
            .collect();
        assert_eq!(flags, [false, false, true]);
    }

    #[test]
    fn wrong_field_count_names_the_line() {
        let input = b"h\th\th\th\nd1\t0\tF\t100\nd2\t1\tF\n";
        match read_rows(&input[..], 375) {
            Err(PrimoError::FieldCount { line, found }) => {
                assert_eq!(line, 3);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn blank_line_is_a_row_without_fields() {
        let input = b"h\th\th\th\nd1\t0\tF\t100\n\nd2\t1\tF\t90\n";
        assert!(matches!(
            read_rows(&input[..], 375),
            Err(PrimoError::FieldCount { line: 3, found: 0 })
        ));

        let after_header = b"h\th\th\th\r\n\r\nd1\t0\tF\t100\r\n";
        assert!(matches!(
            read_rows(&after_header[..], 375),
            Err(PrimoError::FieldCount { line: 2, found: 0 })
        ));
    }

    #[test]
    fn blank_line_past_the_cap_is_never_read() {
        let input = b"h\th\th\th\nd1\t0\tF\t100\nd2\t1\tF\t90\n\n";
        assert_eq!(read_rows(&input[..], 3).unwrap().len(), 2);
    }

    #[test]
    fn non_numeric_fields_are_rejected() {
        let bad_day = b"h\th\th\th\nd1\tone\tF\t100\n";
        assert!(matches!(
            read_rows(&bad_day[..], 375),
            Err(PrimoError::DayIndex { line: 2, .. })
        ));

        let bad_amount = b"h\th\th\th\nd1\t0\tF\t12.5\n";
        assert!(matches!(
            read_rows(&bad_amount[..], 375),
            Err(PrimoError::Amount { line: 2, .. })
        ));
    }

    #[test]
    fn missing_file() {
        let err = load_rows("does/not/exist.tsv", 375).unwrap_err();
        assert!(matches!(err, PrimoError::Io { .. }));
    }
}
