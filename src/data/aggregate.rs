use std::collections::BTreeMap;

use super::model::{Field, GeoPoint, Measure, Subset};

/// Grouping keys of the map view.
pub const MAP_GROUP_KEYS: [Field; 2] = [Field::LocationAbbr, Field::LocationDesc];

/// Grouping keys of the stratification bar chart.
pub const STRATIFICATION_GROUP_KEYS: [Field; 2] = [Field::Stratification1, Field::LocationDesc];

/// One grouping key: the text of each key field, in key order.
pub type GroupKey = Vec<String>;

// ---------------------------------------------------------------------------
// GroupedAggregate
// ---------------------------------------------------------------------------

/// Mean `Data_Value` per group, ordered by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedAggregate {
    groups: BTreeMap<GroupKey, Measure>,
}

impl GroupedAggregate {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, key: &[&str]) -> Option<Measure> {
        let key: GroupKey = key.iter().map(|s| s.to_string()).collect();
        self.groups.get(&key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, Measure)> + '_ {
        self.groups.iter().map(|(k, m)| (k, *m))
    }

    /// Smallest and largest non-missing mean, if any.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.groups
            .values()
            .filter_map(|m| m.value())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

// ---------------------------------------------------------------------------
// Reductions
// ---------------------------------------------------------------------------

/// Group the subset by `keys` and average `Data_Value` within each group.
///
/// Rows with a blank key field are left out, as are missing values from the
/// mean. A group whose values are all missing maps to [`Measure::Missing`].
pub fn aggregate(subset: &Subset<'_>, keys: &[Field]) -> GroupedAggregate {
    let table = subset.table();
    let mut buckets: BTreeMap<GroupKey, Vec<f64>> = BTreeMap::new();

    for record in subset.records() {
        let key: Option<GroupKey> = keys
            .iter()
            .map(|&f| table.text(record, f).map(str::to_string))
            .collect();
        let Some(key) = key else {
            continue;
        };
        let bucket = buckets.entry(key).or_default();
        if let Some(v) = table.measure(record, Field::DataValue).value() {
            bucket.push(v);
        }
    }

    GroupedAggregate {
        groups: buckets
            .into_iter()
            .map(|(key, mut values)| (key, mean(&mut values)))
            .collect(),
    }
}

/// Mean coordinate of each location's rows, keyed by `field`.
/// Rows without coordinates are ignored.
pub fn centroids(subset: &Subset<'_>, field: Field) -> BTreeMap<String, GeoPoint> {
    let table = subset.table();
    let mut buckets: BTreeMap<&str, (Vec<f64>, Vec<f64>)> = BTreeMap::new();

    for record in subset.records() {
        let (Some(name), Some(point)) = (table.text(record, field), table.geo(record)) else {
            continue;
        };
        let (lats, lons) = buckets.entry(name).or_default();
        lats.push(point.lat);
        lons.push(point.lon);
    }

    buckets
        .into_iter()
        .filter_map(|(name, (mut lats, mut lons))| {
            let lat = mean(&mut lats).value()?;
            let lon = mean(&mut lons).value()?;
            Some((name.to_string(), GeoPoint { lat, lon }))
        })
        .collect()
}

/// Order-independent mean: values are sorted before summing so any
/// permutation of the input produces the same bits.
fn mean(values: &mut [f64]) -> Measure {
    if values.is_empty() {
        return Measure::Missing;
    }
    values.sort_by(f64::total_cmp);
    let sum: f64 = values.iter().sum();
    Measure::from_f64(sum / values.len() as f64)
}
