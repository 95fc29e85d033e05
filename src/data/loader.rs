use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use thiserror::Error;

use super::coerce::{coerce_geolocation, coerce_numeric};
use super::model::{Cell, CleanedTable, Field, Measure, Record};

/// Delimiters tried by [`detect_delimiter`], in order of preference on ties.
const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Number of leading lines inspected when sniffing the delimiter.
const SNIFF_LINES: usize = 10;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The dataset could not be turned into a table at all.
///
/// Row- and cell-level problems never surface here: malformed rows are
/// skipped and bad cells become [`Measure::Missing`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not UTF-8 text", .path.display())]
    Encoding { path: PathBuf },
    #[error("cannot read header row: {0}")]
    Csv(#[from] csv::Error),
    #[error("required column '{0}' is missing")]
    MissingColumn(&'static str),
}

/// Bookkeeping from one load, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_loaded: usize,
    pub rows_skipped: usize,
    pub delimiter: u8,
    pub has_geolocation: bool,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and clean a delimited survey file.
pub fn load_file(path: &Path) -> Result<CleanedTable, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|_| LoadError::Encoding {
        path: path.to_path_buf(),
    })?;

    let (table, report) = parse_str(&text)?;
    log::info!(
        "Loaded {} rows from {} ({} skipped, delimiter {:?}, geolocation: {})",
        report.rows_loaded,
        path.display(),
        report.rows_skipped,
        report.delimiter as char,
        report.has_geolocation,
    );
    if table.is_empty() {
        log::warn!("{} contains no usable rows", path.display());
    }
    Ok(table)
}

/// Clean already-decoded delimited text.
///
/// Numeric columns are coerced in place; when a `Geolocation` column exists
/// `lat` and `lon` are appended after the source columns. Row order is kept.
pub fn parse_str(text: &str) -> Result<(CleanedTable, LoadReport), LoadError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let delimiter = detect_delimiter(text);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let position = |field: Field| headers.iter().position(|h| h == field.header());

    for field in Field::REQUIRED {
        if position(field).is_none() {
            return Err(LoadError::MissingColumn(field.header()));
        }
    }

    // Repeated numeric headers are all coerced.
    let numeric: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| Field::NUMERIC.iter().any(|f| f.header() == h.as_str()))
        .map(|(idx, _)| idx)
        .collect();
    for field in Field::NUMERIC {
        if position(field).is_none() {
            log::warn!("Column '{field}' not found; its values will be missing");
        }
    }

    let geolocation = headers
        .iter()
        .rposition(|h| h == Field::Geolocation.header());
    if geolocation.is_none() {
        log::warn!("No '{}' column; map placement unavailable", Field::Geolocation);
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                log::debug!("Skipping row {row_no}: {e}");
                skipped += 1;
                continue;
            }
        };

        let mut cells: Vec<Cell> = raw
            .iter()
            .enumerate()
            .map(|(idx, value)| {
                if numeric.contains(&idx) {
                    Cell::Number(coerce_numeric(value))
                } else if value.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(value.to_string())
                }
            })
            .collect();

        if let Some(idx) = geolocation {
            let point = raw.get(idx).and_then(coerce_geolocation);
            let (lat, lon) = match point {
                Some(p) => (Measure::Value(p.lat), Measure::Value(p.lon)),
                None => (Measure::Missing, Measure::Missing),
            };
            cells.push(Cell::Number(lat));
            cells.push(Cell::Number(lon));
        }

        records.push(Record::new(cells));
    }

    let mut columns = headers;
    if geolocation.is_some() {
        columns.push(Field::Lat.header().to_string());
        columns.push(Field::Lon.header().to_string());
    }

    let report = LoadReport {
        rows_loaded: records.len(),
        rows_skipped: skipped,
        delimiter,
        has_geolocation: geolocation.is_some(),
    };
    Ok((CleanedTable::new(columns, records), report))
}

// ---------------------------------------------------------------------------
// Delimiter sniffing
// ---------------------------------------------------------------------------

/// Pick the delimiter that appears most consistently across the first lines.
///
/// Each candidate is scored by mean count per line divided by one plus the
/// standard deviation, counting only occurrences outside double quotes.
/// Falls back to `,` when nothing scores.
pub fn detect_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();
    if sample.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0.0f32;

    for delimiter in DELIMITER_CANDIDATES {
        let counts: Vec<f32> = sample
            .iter()
            .map(|line| count_unquoted(line, delimiter) as f32)
            .collect();
        let n = counts.len() as f32;
        let avg = counts.iter().sum::<f32>() / n;
        let variance = counts.iter().map(|c| (c - avg).powi(2)).sum::<f32>() / n;
        let score = avg / (1.0 + variance.sqrt());

        if score > best_score {
            best_score = score;
            best = delimiter;
        }
    }

    best
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for &b in line.as_bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::GeoPoint;

    const COMMA_CSV: &str = "\
Topic,Age Group,LocationAbbr,LocationDesc,Stratification1,Data_Value,Low_Confidence_Limit,High_Confidence_Limit,Geolocation
Obesity,65 years or older,IL,Illinois,Overall,31.2,29.0,33.4,POINT (-88.99771 40.48501)
Obesity,65 years or older,CA,California,Female,,,,
Obesity,65 years or older,TX,Texas,Male,27.1,25.0,29.9,\"POINT (-99.42677 31.82724)\"
";

    const SEMICOLON_CSV: &str = "\
Topic;Age Group;LocationAbbr;LocationDesc;Stratification1;Data_Value;Low_Confidence_Limit;High_Confidence_Limit;Geolocation
Obesity;65 years or older;IL;Illinois;Overall;31,2;29,0;33,4;POINT (-88.99771 40.48501)
Obesity;65 years or older;CA;California;Female;n/a;;;N/A
broken;row
Obesity;65 years or older;TX;Texas;Male;27,1;25;29,9;POINT (-99.42677 31.82724)
";

    #[test]
    fn detects_comma_and_semicolon() {
        assert_eq!(detect_delimiter("a,b,c\nd,e,f"), b',');
        assert_eq!(detect_delimiter("a;b;c\nd;e;f"), b';');
        assert_eq!(detect_delimiter(SEMICOLON_CSV), b';');
        assert_eq!(detect_delimiter(COMMA_CSV), b',');
        assert_eq!(detect_delimiter(""), b',');
    }

    #[test]
    fn quoted_delimiters_are_ignored_when_sniffing() {
        let text = "a;b\n\"x,y,z\";1\n\"p,q,r\";2";
        assert_eq!(detect_delimiter(text), b';');
    }

    #[test]
    fn parses_comma_file_and_appends_coordinates() {
        let (table, report) = parse_str(COMMA_CSV).unwrap();
        assert_eq!(report.rows_loaded, 3);
        assert_eq!(report.rows_skipped, 0);
        assert!(report.has_geolocation);

        let cols = table.columns();
        assert_eq!(cols[cols.len() - 2], "lat");
        assert_eq!(cols[cols.len() - 1], "lon");
        assert_eq!(table.position(Field::DataValue), Some(5));

        let rows = table.records();
        assert_eq!(table.measure(&rows[0], Field::DataValue), Measure::Value(31.2));
        assert_eq!(
            table.geo(&rows[0]),
            Some(GeoPoint { lat: 40.48501, lon: -88.99771 })
        );
        assert_eq!(table.measure(&rows[1], Field::DataValue), Measure::Missing);
        assert_eq!(table.geo(&rows[1]), None);
        assert_eq!(table.text(&rows[2], Field::LocationDesc), Some("Texas"));
    }

    #[test]
    fn semicolon_file_skips_malformed_rows() {
        let (table, report) = parse_str(SEMICOLON_CSV).unwrap();
        assert_eq!(report.delimiter, b';');
        assert_eq!(report.rows_loaded, 3);
        assert_eq!(report.rows_skipped, 1);

        let rows = table.records();
        assert_eq!(table.measure(&rows[0], Field::DataValue), Measure::Value(31.2));
        assert_eq!(
            table.measure(&rows[2], Field::HighConfidenceLimit),
            Measure::Value(29.9)
        );
        assert_eq!(table.measure(&rows[1], Field::DataValue), Measure::Missing);
        assert_eq!(table.geo(&rows[1]), None);
    }

    #[test]
    fn numeric_columns_never_hold_text() {
        let (table, _) = parse_str(SEMICOLON_CSV).unwrap();
        for field in Field::NUMERIC.into_iter().chain([Field::Lat, Field::Lon]) {
            let idx = table.position(field).unwrap();
            for record in table.records() {
                assert!(matches!(record.cell(idx), Some(Cell::Number(_))));
            }
        }
    }

    #[test]
    fn coordinates_are_both_present_or_both_missing() {
        let (table, _) = parse_str(COMMA_CSV).unwrap();
        for record in table.records() {
            let lat = table.measure(record, Field::Lat).is_missing();
            let lon = table.measure(record, Field::Lon).is_missing();
            assert_eq!(lat, lon);
        }
    }

    #[test]
    fn missing_geolocation_column_adds_nothing() {
        let text = "Topic,Age Group,LocationAbbr,LocationDesc,Data_Value\nT,A,IL,Illinois,1\n";
        let (table, report) = parse_str(text).unwrap();
        assert!(!report.has_geolocation);
        assert_eq!(table.columns().len(), 5);
        assert!(!table.has(Field::Lat));
    }

    #[test]
    fn missing_required_column_fails() {
        let err = parse_str("Topic,LocationAbbr\nT,IL\n").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("Age Group")));
    }

    #[test]
    fn repeated_numeric_header_is_coerced_everywhere() {
        let text = "Topic,Age Group,LocationAbbr,LocationDesc,Data_Value,Data_Value\nT,A,IL,Illinois,1,2,5\nT,A,IL,Illinois,1,x\n";
        let (table, report) = parse_str(text).unwrap();
        assert_eq!(report.rows_skipped, 1);
        let record = &table.records()[0];
        assert_eq!(record.cell(4), Some(&Cell::Number(Measure::Value(1.0))));
        assert_eq!(table.measure(record, Field::DataValue), Measure::Missing);
    }

    #[test]
    fn byte_order_mark_is_stripped() {
        let text = format!("\u{feff}{COMMA_CSV}");
        let (table, _) = parse_str(&text).unwrap();
        assert_eq!(table.position(Field::Topic), Some(0));
    }

    #[test]
    fn unreadable_file_is_a_single_failure() {
        let err = load_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn header_only_file_loads_as_empty_table() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Topic,Age Group,LocationAbbr,LocationDesc,Data_Value\n")
            .unwrap();
        let table = load_file(file.path()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.position(Field::LocationDesc), Some(3));
    }
}
