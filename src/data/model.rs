use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Measure – a coerced numeric cell
// ---------------------------------------------------------------------------

/// A numeric survey value after coercion.
///
/// `Missing` is a first-class value, distinct from zero: blank cells,
/// unparseable text and non-finite numbers all end up here.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Measure {
    Value(f64),
    #[default]
    Missing,
}

impl Measure {
    /// Wrap a float, mapping NaN and infinities to `Missing`.
    pub fn from_f64(v: f64) -> Self {
        if v.is_finite() {
            Measure::Value(v)
        } else {
            Measure::Missing
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Measure::Value(v) => Some(v),
            Measure::Missing => None,
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, Measure::Missing)
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Value(v) => write!(f, "{v}"),
            Measure::Missing => write!(f, "<missing>"),
        }
    }
}

// ---------------------------------------------------------------------------
// GeoPoint – parsed `Geolocation`
// ---------------------------------------------------------------------------

/// Coordinates parsed from a `POINT (lon lat)` cell. Both halves or nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

// ---------------------------------------------------------------------------
// Field – columns the pipeline knows by name
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Topic,
    AgeGroup,
    LocationAbbr,
    LocationDesc,
    Stratification1,
    DataValue,
    LowConfidenceLimit,
    HighConfidenceLimit,
    Geolocation,
    /// Derived from `Geolocation`.
    Lat,
    /// Derived from `Geolocation`.
    Lon,
}

impl Field {
    /// Columns that must be present for a load to succeed.
    pub const REQUIRED: [Field; 4] = [
        Field::Topic,
        Field::AgeGroup,
        Field::LocationAbbr,
        Field::LocationDesc,
    ];

    /// Columns coerced to [`Measure`] in place.
    pub const NUMERIC: [Field; 3] = [
        Field::DataValue,
        Field::LowConfidenceLimit,
        Field::HighConfidenceLimit,
    ];

    pub const ALL: [Field; 11] = [
        Field::Topic,
        Field::AgeGroup,
        Field::LocationAbbr,
        Field::LocationDesc,
        Field::Stratification1,
        Field::DataValue,
        Field::LowConfidenceLimit,
        Field::HighConfidenceLimit,
        Field::Geolocation,
        Field::Lat,
        Field::Lon,
    ];

    /// Header text of the column in the source file.
    pub const fn header(self) -> &'static str {
        match self {
            Field::Topic => "Topic",
            Field::AgeGroup => "Age Group",
            Field::LocationAbbr => "LocationAbbr",
            Field::LocationDesc => "LocationDesc",
            Field::Stratification1 => "Stratification1",
            Field::DataValue => "Data_Value",
            Field::LowConfidenceLimit => "Low_Confidence_Limit",
            Field::HighConfidenceLimit => "High_Confidence_Limit",
            Field::Geolocation => "Geolocation",
            Field::Lat => "lat",
            Field::Lon => "lon",
        }
    }

    pub fn from_header(header: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.header() == header)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ---------------------------------------------------------------------------
// Cell / Record – one row of the cleaned table
// ---------------------------------------------------------------------------

/// A single cleaned cell. Numeric columns only ever hold `Number`.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(Measure),
    Empty,
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_measure(&self) -> Measure {
        match self {
            Cell::Number(m) => *m,
            _ => Measure::Missing,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(Measure::Value(v)) => write!(f, "{v}"),
            Cell::Number(Measure::Missing) | Cell::Empty => Ok(()),
        }
    }
}

/// One survey row, cells aligned with [`CleanedTable::columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    cells: Vec<Cell>,
}

impl Record {
    pub fn new(cells: Vec<Cell>) -> Self {
        Record { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, idx: usize) -> Option<&Cell> {
        self.cells.get(idx)
    }
}

// ---------------------------------------------------------------------------
// CleanedTable – the loaded dataset
// ---------------------------------------------------------------------------

/// The cleaned dataset. Built once per load, read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedTable {
    columns: Vec<String>,
    positions: BTreeMap<Field, usize>,
    records: Vec<Record>,
}

impl CleanedTable {
    /// Build a table, resolving known columns by header. If a header repeats,
    /// the last occurrence wins (so derived `lat`/`lon` shadow source columns).
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        let mut positions = BTreeMap::new();
        for (idx, name) in columns.iter().enumerate() {
            if let Some(field) = Field::from_header(name) {
                positions.insert(field, idx);
            }
        }
        CleanedTable {
            columns,
            positions,
            records,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn position(&self, field: Field) -> Option<usize> {
        self.positions.get(&field).copied()
    }

    pub fn has(&self, field: Field) -> bool {
        self.positions.contains_key(&field)
    }

    /// Text of a categorical field; `None` when blank or the column is absent.
    pub fn text<'a>(&self, record: &'a Record, field: Field) -> Option<&'a str> {
        record.cell(self.position(field)?)?.as_text()
    }

    pub fn measure(&self, record: &Record, field: Field) -> Measure {
        self.position(field)
            .and_then(|idx| record.cell(idx))
            .map_or(Measure::Missing, Cell::as_measure)
    }

    pub fn geo(&self, record: &Record) -> Option<GeoPoint> {
        let lat = self.measure(record, Field::Lat).value()?;
        let lon = self.measure(record, Field::Lon).value()?;
        Some(GeoPoint { lat, lon })
    }
}

// ---------------------------------------------------------------------------
// Subset – a filtered view over a CleanedTable
// ---------------------------------------------------------------------------

/// Row indices into a borrowed table, in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct Subset<'a> {
    table: &'a CleanedTable,
    indices: Vec<usize>,
}

impl<'a> Subset<'a> {
    /// Every row of the table.
    pub fn all(table: &'a CleanedTable) -> Self {
        Subset {
            table,
            indices: (0..table.len()).collect(),
        }
    }

    /// Rebuild a view from indices previously taken from the same table.
    /// Out-of-range indices are dropped.
    pub fn from_indices(table: &'a CleanedTable, mut indices: Vec<usize>) -> Self {
        indices.retain(|&i| i < table.len());
        Subset { table, indices }
    }

    pub fn table(&self) -> &'a CleanedTable {
        self.table
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// `(row index, record)` pairs in table order.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &'a Record)> + '_ {
        let records = self.table.records();
        self.indices.iter().map(move |&i| (i, &records[i]))
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.rows().map(|(_, r)| r)
    }
}
