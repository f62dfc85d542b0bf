//! CSV bar loading with strict timeline validation.
//!
//! Expects a header row with a `dt` timestamp column and `open`, `high`,
//! `low`, `close` price columns; a `volume` column is optional. Timestamps
//! parse as `%Y-%m-%d %H:%M:%S`, with a date-only `%Y-%m-%d` fallback.
//!
//! The loader enforces the invariants the rest of the crate relies on:
//! finite numeric fields and a strictly increasing timeline with no
//! duplicate timestamps.

use crate::domain::Bar;
use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;
use thiserror::Error;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read input file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{name}'")]
    MissingColumn { name: String },

    #[error("row {row}: bad value '{value}' in column '{column}'")]
    BadField {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: timestamp {ts} is not after the previous row")]
    OutOfOrder { row: usize, ts: NaiveDateTime },

    #[error("input contains no data rows")]
    Empty,
}

/// Column indices resolved from the header row.
struct Columns {
    dt: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, DataError> {
        let find = |name: &str| -> Option<usize> {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let required = |name: &str| -> Result<usize, DataError> {
            find(name).ok_or_else(|| DataError::MissingColumn {
                name: name.to_string(),
            })
        };
        Ok(Self {
            dt: required("dt")?,
            open: required("open")?,
            high: required("high")?,
            low: required("low")?,
            close: required("close")?,
            volume: find("volume"),
        })
    }
}

/// Load a bar series from a CSV file.
pub fn load_bars(path: impl AsRef<Path>) -> Result<Vec<Bar>, DataError> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let columns = Columns::resolve(reader.headers()?)?;

    let mut bars: Vec<Bar> = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // Header is row 1; first data row is row 2.
        let row = i + 2;
        let bar = parse_bar(&record, &columns, row)?;
        if let Some(prev) = bars.last() {
            if bar.ts <= prev.ts {
                return Err(DataError::OutOfOrder { row, ts: bar.ts });
            }
        }
        bars.push(bar);
    }

    if bars.is_empty() {
        return Err(DataError::Empty);
    }
    Ok(bars)
}

fn parse_bar(record: &csv::StringRecord, columns: &Columns, row: usize) -> Result<Bar, DataError> {
    let field = |idx: usize, column: &str| -> Result<&str, DataError> {
        record.get(idx).ok_or_else(|| DataError::BadField {
            row,
            column: column.to_string(),
            value: "<missing>".to_string(),
        })
    };

    let ts = parse_timestamp(field(columns.dt, "dt")?).ok_or_else(|| DataError::BadField {
        row,
        column: "dt".to_string(),
        value: record.get(columns.dt).unwrap_or("").to_string(),
    })?;

    let number = |idx: usize, column: &str| -> Result<f64, DataError> {
        let raw = field(idx, column)?.trim();
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(DataError::BadField {
                row,
                column: column.to_string(),
                value: raw.to_string(),
            }),
        }
    };

    let volume = match columns.volume {
        Some(idx) => number(idx, "volume")?,
        None => 0.0,
    };

    Ok(Bar {
        ts,
        open: number(columns.open, "open")?,
        high: number(columns.high, "high")?,
        low: number(columns.low, "low")?,
        close: number(columns.close, "close")?,
        volume,
    })
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(ts);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static FILE_SEQ: AtomicUsize = AtomicUsize::new(0);

    fn write_csv(content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir();
        let path = dir.join(format!(
            "goldcross_loader_{}_{}.csv",
            std::process::id(),
            FILE_SEQ.fetch_add(1, Ordering::SeqCst)
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_datetime_indexed_bars() {
        let path = write_csv(
            "dt,open,high,low,close,volume\n\
             2023-01-01 00:00:00,10,11,9,10.5,100\n\
             2023-01-01 01:00:00,10.5,12,10,11.5,120\n",
        );
        let bars = load_bars(&path).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 10.5);
        assert_eq!(bars[1].volume, 120.0);
        assert!(bars[0].ts < bars[1].ts);
    }

    #[test]
    fn loads_date_only_timestamps() {
        let path = write_csv(
            "dt,open,high,low,close\n\
             2023-01-01,10,11,9,10.5\n\
             2023-01-02,10.5,12,10,11.5\n",
        );
        let bars = load_bars(&path).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].volume, 0.0);
    }

    #[test]
    fn rejects_missing_column() {
        let path = write_csv("dt,open,high,low\n2023-01-01,10,11,9\n");
        match load_bars(&path) {
            Err(DataError::MissingColumn { name }) => assert_eq!(name, "close"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_timestamp() {
        let path = write_csv(
            "dt,open,high,low,close\n\
             2023-01-01,10,11,9,10.5\n\
             2023-01-01,10.5,12,10,11.5\n",
        );
        match load_bars(&path) {
            Err(DataError::OutOfOrder { row, .. }) => assert_eq!(row, 3),
            other => panic!("expected OutOfOrder, got {other:?}"),
        }
    }

    #[test]
    fn rejects_backwards_timestamp() {
        let path = write_csv(
            "dt,open,high,low,close\n\
             2023-01-02,10,11,9,10.5\n\
             2023-01-01,10.5,12,10,11.5\n",
        );
        assert!(matches!(
            load_bars(&path),
            Err(DataError::OutOfOrder { row: 3, .. })
        ));
    }

    #[test]
    fn rejects_unparseable_number() {
        let path = write_csv("dt,open,high,low,close\n2023-01-01,ten,11,9,10.5\n");
        match load_bars(&path) {
            Err(DataError::BadField { row, column, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "open");
            }
            other => panic!("expected BadField, got {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_timestamp() {
        let path = write_csv("dt,open,high,low,close\nnot-a-date,10,11,9,10.5\n");
        assert!(matches!(
            load_bars(&path),
            Err(DataError::BadField { row: 2, .. })
        ));
    }

    #[test]
    fn rejects_empty_file() {
        let path = write_csv("dt,open,high,low,close\n");
        assert!(matches!(load_bars(&path), Err(DataError::Empty)));
    }

    #[test]
    fn rejects_missing_file() {
        assert!(matches!(
            load_bars("/nonexistent/goldcross.csv"),
            Err(DataError::Csv(_) | DataError::Io(_))
        ));
    }
}
