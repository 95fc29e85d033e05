use std::io::Write;

use aging_atlas::data::aggregate::{aggregate, MAP_GROUP_KEYS};
use aging_atlas::data::filter::{default_locations, distinct_locations, refine, select, Selection};
use aging_atlas::data::loader::{load_file, LoadError};
use aging_atlas::data::model::{Field, Measure, Subset};
use tempfile::NamedTempFile;

const SURVEY: &str = "\
Topic;Age Group;LocationAbbr;LocationDesc;Stratification1;Data_Value;Low_Confidence_Limit;High_Confidence_Limit;Geolocation
Obesity;Overall;IL;Illinois;Overall;30,5;28,1;32,9;POINT (-88.99771 40.48501)
Obesity;Overall;IL;Illinois;Female;29,5;27,0;32,0;POINT (-88.99771 40.48501)
Obesity;Overall;CA;California;Overall;;;;POINT (-120.99999 37.63864)
Obesity;65 years or older;TX;Texas;Overall;33,0;31,0;35,0;POINT (-99.42677 31.82724)
this;row;is;short
Smoking;Overall;OH;Ohio;Male;12,25;10,0;14,5;N/A
Obesity;Overall;WA;Washington;White, non-Hispanic;27,0;25,5;28,5;POINT (-120.47001 47.52227)
";

fn survey_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SURVEY.as_bytes()).unwrap();
    file
}

#[test]
fn loading_twice_gives_identical_tables() {
    let file = survey_file();
    let first = load_file(file.path()).unwrap();
    let second = load_file(file.path()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 6);
}

#[test]
fn pipeline_from_file_to_map_values() {
    let file = survey_file();
    let table = load_file(file.path()).unwrap();

    let primary = select(&table, &Selection::primary("Obesity", "Overall"));
    assert_eq!(primary.len(), 4);
    assert_eq!(
        distinct_locations(&primary),
        ["California", "Illinois", "Washington"]
    );

    let map = aggregate(&primary, &MAP_GROUP_KEYS);
    assert_eq!(map.get(&["IL", "Illinois"]), Some(Measure::Value(30.0)));
    assert_eq!(map.get(&["CA", "California"]), Some(Measure::Missing));
    assert_eq!(map.get(&["WA", "Washington"]), Some(Measure::Value(27.0)));
    assert_eq!(map.get(&["TX", "Texas"]), None);

    let chosen = default_locations(&primary, 2);
    let compared = refine(&primary, &Selection::locations(chosen));
    let names: Vec<&str> = compared
        .records()
        .filter_map(|r| table.text(r, Field::LocationDesc))
        .collect();
    assert_eq!(names, ["Illinois", "Illinois", "California"]);
}

#[test]
fn unmatched_topic_is_an_empty_selection() {
    let file = survey_file();
    let table = load_file(file.path()).unwrap();
    let subset = select(&table, &Selection::primary("Cognitive Decline", "Overall"));
    assert!(subset.is_empty());
    assert!(aggregate(&subset, &MAP_GROUP_KEYS).is_empty());
}

#[test]
fn shuffled_rows_aggregate_identically() {
    let file = survey_file();
    let table = load_file(file.path()).unwrap();
    let forward = Subset::all(&table);
    let mut reversed: Vec<usize> = forward.indices().to_vec();
    reversed.reverse();
    let reversed = Subset::from_indices(&table, reversed);

    assert_eq!(
        aggregate(&forward, &MAP_GROUP_KEYS),
        aggregate(&reversed, &MAP_GROUP_KEYS)
    );
}

#[test]
fn non_utf8_file_fails_as_a_whole() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[0x54, 0x6f, 0xff, 0xfe, 0x0a]).unwrap();
    assert!(matches!(
        load_file(file.path()),
        Err(LoadError::Encoding { .. })
    ));
}
