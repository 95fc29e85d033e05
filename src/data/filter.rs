use std::collections::BTreeSet;

use super::model::{CleanedTable, Field, Record, Subset};

// ---------------------------------------------------------------------------
// Selection criteria
// ---------------------------------------------------------------------------

/// Filter criteria combined with logical AND.
/// A `None` criterion matches every row; `Some` of an empty location set
/// matches none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub topic: Option<String>,
    pub age_group: Option<String>,
    pub locations: Option<BTreeSet<String>>,
    /// Set when two combined criteria contradict each other.
    unsatisfiable: bool,
}

impl Selection {
    /// Primary stage: topic and age group.
    pub fn primary(topic: impl Into<String>, age_group: impl Into<String>) -> Self {
        Selection {
            topic: Some(topic.into()),
            age_group: Some(age_group.into()),
            ..Selection::default()
        }
    }

    /// Secondary stage: membership on `LocationDesc`.
    pub fn locations<I, S>(locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection {
            locations: Some(locations.into_iter().map(Into::into).collect()),
            ..Selection::default()
        }
    }

    /// Conjunction of both selections' criteria. Two different values for
    /// the same field match nothing; two location sets intersect.
    pub fn and(self, other: Selection) -> Self {
        let mut unsatisfiable = self.unsatisfiable || other.unsatisfiable;
        let mut both = |a: Option<String>, b: Option<String>| match (a, b) {
            (Some(a), Some(b)) => {
                unsatisfiable |= a != b;
                Some(a)
            }
            (a, b) => a.or(b),
        };
        let topic = both(self.topic, other.topic);
        let age_group = both(self.age_group, other.age_group);
        let locations = match (self.locations, other.locations) {
            (Some(a), Some(b)) => Some(a.intersection(&b).cloned().collect()),
            (a, b) => a.or(b),
        };
        Selection {
            topic,
            age_group,
            locations,
            unsatisfiable,
        }
    }

    fn matches(&self, table: &CleanedTable, record: &Record) -> bool {
        if self.unsatisfiable {
            return false;
        }
        let equals = |field: Field, wanted: &Option<String>| match wanted {
            Some(w) => table.text(record, field) == Some(w.as_str()),
            None => true,
        };
        if !equals(Field::Topic, &self.topic) || !equals(Field::AgeGroup, &self.age_group) {
            return false;
        }
        match &self.locations {
            Some(set) => table
                .text(record, Field::LocationDesc)
                .is_some_and(|loc| set.contains(loc)),
            None => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Selection stages
// ---------------------------------------------------------------------------

/// Rows of the whole table matching `selection`. No match is an empty subset.
pub fn select<'a>(table: &'a CleanedTable, selection: &Selection) -> Subset<'a> {
    refine(&Subset::all(table), selection)
}

/// Narrow an existing subset further. The candidate rows are only those
/// already in `subset`, so chaining stages equals one combined selection.
pub fn refine<'a>(subset: &Subset<'a>, selection: &Selection) -> Subset<'a> {
    let table = subset.table();
    let indices = subset
        .rows()
        .filter(|(_, record)| selection.matches(table, record))
        .map(|(i, _)| i)
        .collect();
    Subset::from_indices(table, indices)
}

// ---------------------------------------------------------------------------
// Choice lists
// ---------------------------------------------------------------------------

/// Sorted distinct non-blank values of `field` within the subset.
pub fn distinct_values(subset: &Subset<'_>, field: Field) -> Vec<String> {
    let table = subset.table();
    subset
        .records()
        .filter_map(|r| table.text(r, field))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Sorted distinct `LocationDesc` values: the universe for the secondary stage.
pub fn distinct_locations(subset: &Subset<'_>) -> Vec<String> {
    distinct_values(subset, Field::LocationDesc)
}

/// The first `count` locations in lexicographic order, used when the user
/// has not picked any.
pub fn default_locations(subset: &Subset<'_>, count: usize) -> BTreeSet<String> {
    distinct_locations(subset).into_iter().take(count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_str;

    const CSV: &str = "\
Topic,Age Group,LocationAbbr,LocationDesc,Data_Value
Obesity,Overall,IL,Illinois,30
Obesity,Overall,CA,California,25
Obesity,50-64 years,IL,Illinois,28
Smoking,Overall,IL,Illinois,12
Obesity,Overall,TX,Texas,33
Obesity,Overall,AK,Alaska,29
Obesity,Overall,OH,Ohio,31
Obesity,Overall,NY,New York,
Obesity,Overall,,,40
";

    fn table() -> CleanedTable {
        parse_str(CSV).unwrap().0
    }

    #[test]
    fn primary_stage_matches_topic_and_age() {
        let table = table();
        let subset = select(&table, &Selection::primary("Obesity", "Overall"));
        assert_eq!(subset.indices(), &[0, 1, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn absent_criteria_match_everything() {
        let table = table();
        assert_eq!(select(&table, &Selection::default()).len(), table.len());
    }

    #[test]
    fn unknown_topic_yields_empty_subset() {
        let table = table();
        let subset = select(&table, &Selection::primary("Cognitive Decline", "Overall"));
        assert!(subset.is_empty());
    }

    #[test]
    fn empty_location_set_matches_nothing() {
        let table = table();
        let none: [&str; 0] = [];
        assert!(select(&table, &Selection::locations(none)).is_empty());
    }

    #[test]
    fn chained_stages_equal_combined_selection() {
        let table = table();
        let primary = Selection::primary("Obesity", "Overall");
        let first = select(&table, &primary);

        let universe = distinct_locations(&first);
        let chosen: Vec<&String> = universe.iter().step_by(2).collect();
        let secondary = Selection::locations(chosen.iter().map(|s| s.as_str()));

        let chained = refine(&first, &secondary);
        let direct = select(&table, &primary.and(secondary));
        assert_eq!(chained.indices(), direct.indices());
        assert!(!chained.is_empty());
    }

    #[test]
    fn conflicting_topics_match_nothing() {
        let table = table();
        let both = Selection::primary("Obesity", "Overall")
            .and(Selection::primary("Smoking", "Overall"));
        assert!(select(&table, &both).is_empty());

        let ages = Selection::primary("Obesity", "Overall")
            .and(Selection::primary("Obesity", "50-64 years"));
        assert!(select(&table, &ages).is_empty());
    }

    #[test]
    fn repeated_criteria_are_idempotent() {
        let table = table();
        let primary = Selection::primary("Obesity", "Overall");
        let twice = primary.clone().and(primary.clone());
        assert_eq!(
            select(&table, &twice).indices(),
            select(&table, &primary).indices()
        );
    }

    #[test]
    fn overlapping_location_sets_intersect() {
        let table = table();
        let west = Selection::locations(["Alaska", "California", "Texas"]);
        let south = Selection::locations(["Texas", "Ohio"]);
        let both = Selection::primary("Obesity", "Overall").and(west).and(south);

        assert_eq!(both.locations, Some(BTreeSet::from(["Texas".to_string()])));
        assert_eq!(select(&table, &both).indices(), &[4]);
    }

    #[test]
    fn refine_never_leaves_the_primary_universe() {
        let table = table();
        let first = select(&table, &Selection::primary("Obesity", "50-64 years"));
        let narrowed = refine(&first, &Selection::locations(["Illinois", "Texas"]));
        assert_eq!(narrowed.indices(), &[2]);
    }

    #[test]
    fn default_locations_take_first_alphabetically() {
        let table = table();
        let first = select(&table, &Selection::primary("Obesity", "Overall"));
        assert_eq!(
            distinct_locations(&first),
            ["Alaska", "California", "Illinois", "New York", "Ohio", "Texas"]
        );
        let defaults: Vec<String> = default_locations(&first, 5).into_iter().collect();
        assert_eq!(
            defaults,
            ["Alaska", "California", "Illinois", "New York", "Ohio"]
        );
    }

    #[test]
    fn blank_values_are_not_choices() {
        let table = table();
        let topics = distinct_values(&Subset::all(&table), Field::Topic);
        assert_eq!(topics, ["Obesity", "Smoking"]);
    }
}
