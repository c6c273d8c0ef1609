// Daily-bar CSV exports, with either a single header row or a two-level grouped header
use crate::model::FetchError;
use crate::parser::{is_known_field, ColumnKey, RawFrame, RawRow};
use crate::utils::parse_date;
use csv::{ReaderBuilder, StringRecord};

/// Parses a CSV export into a `RawFrame`.
///
/// Header rows are the leading rows whose first cell is not a date. A row that
/// only names the index (`Date,,,`) is skipped. One header row gives flat
/// columns; two header rows give `Nested` columns, where whichever level holds
/// a field name (`Adj Close`, `Volume`, ...) is the field and the other is the
/// ticker.
pub fn parse_csv_export(text: &str) -> Result<RawFrame, FetchError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let records = reader
        .records()
        .collect::<Result<Vec<StringRecord>, csv::Error>>()?;

    let header_len = records
        .iter()
        .position(|r| r.get(0).and_then(parse_date).is_some())
        .unwrap_or(records.len());
    let (headers, data) = records.split_at(header_len);

    let headers: Vec<&StringRecord> = headers
        .iter()
        .filter(|r| r.iter().skip(1).any(|cell| !cell.is_empty()))
        .collect();

    let columns: Vec<ColumnKey> = match headers.as_slice() {
        [] => return Err(FetchError::Malformed("CSV export has no header row".into())),
        [single] => single.iter().skip(1).map(ColumnKey::flat).collect(),
        [upper, lower] => upper
            .iter()
            .zip(lower.iter())
            .skip(1)
            .map(|(a, b)| {
                if is_known_field(a) {
                    ColumnKey::nested(b, a)
                } else if is_known_field(b) {
                    ColumnKey::nested(a, b)
                } else {
                    ColumnKey::flat(a)
                }
            })
            .collect(),
        deeper => {
            return Err(FetchError::Malformed(format!(
                "unsupported header depth: {}",
                deeper.len()
            )));
        }
    };

    let mut rows = Vec::with_capacity(data.len());
    for record in data {
        let Some(date) = record.get(0).and_then(parse_date) else {
            return Err(FetchError::Malformed(format!(
                "unreadable date in row: {:?}",
                record
            )));
        };
        let values = (1..=columns.len())
            .map(|i| record.get(i).and_then(|cell| cell.parse::<f64>().ok()))
            .collect();
        rows.push(RawRow { date, values });
    }

    Ok(RawFrame { columns, rows })
}
