use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use aging_atlas::config::Settings;
use aging_atlas::data::aggregate::{aggregate, centroids, GroupedAggregate, MAP_GROUP_KEYS};
use aging_atlas::data::cache::DatasetCache;
use aging_atlas::data::filter::{
    default_locations, distinct_locations, distinct_values, refine, select, Selection,
};
use aging_atlas::data::model::{CleanedTable, Field, GeoPoint, Subset};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Map,
    Compare,
    Table,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub settings: Settings,
    cache: DatasetCache,

    /// Loaded dataset (None until a load succeeds).
    pub table: Option<Arc<CleanedTable>>,

    /// Choices offered by the selectors.
    pub topics: Vec<String>,
    pub age_groups: Vec<String>,
    pub topic: Option<String>,
    pub age_group: Option<String>,

    /// Distinct locations of the primary result.
    pub location_choices: Vec<String>,
    pub selected_locations: BTreeSet<String>,
    /// Set once the user edits the location selection.
    locations_chosen: bool,

    /// Rows matching topic + age group (cached).
    pub primary_indices: Vec<usize>,
    /// Primary rows restricted to `selected_locations` (cached).
    pub secondary_indices: Vec<usize>,

    /// Mean value per (LocationAbbr, LocationDesc) of the primary rows.
    pub map_values: GroupedAggregate,
    /// Map placement per LocationAbbr.
    pub map_points: BTreeMap<String, GeoPoint>,

    pub tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            cache: DatasetCache::new(),
            table: None,
            topics: Vec::new(),
            age_groups: Vec::new(),
            topic: None,
            age_group: None,
            location_choices: Vec::new(),
            selected_locations: BTreeSet::new(),
            locations_chosen: false,
            primary_indices: Vec::new(),
            secondary_indices: Vec::new(),
            map_values: GroupedAggregate::default(),
            map_points: BTreeMap::new(),
            tab: Tab::default(),
            status_message: None,
        }
    }

    /// Load (or reuse) the dataset at `path`. A failure clears every view.
    pub fn load(&mut self, path: &Path) {
        match self.cache.load(path) {
            Ok(table) => {
                self.settings.dataset_path = path.to_path_buf();
                self.set_table(table);
            }
            Err(e) => {
                log::error!("Failed to load dataset: {e}");
                self.clear();
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a loaded table and pick the first topic and age group.
    pub fn set_table(&mut self, table: Arc<CleanedTable>) {
        {
            let all = Subset::all(&table);
            self.topics = distinct_values(&all, Field::Topic);
            self.age_groups = distinct_values(&all, Field::AgeGroup);
        }
        self.topic = self.topics.first().cloned();
        self.age_group = self.age_groups.first().cloned();
        self.locations_chosen = false;
        self.selected_locations.clear();
        self.table = Some(table);
        self.status_message = None;
        self.apply_primary();
    }

    fn clear(&mut self) {
        let settings = self.settings.clone();
        let cache = std::mem::take(&mut self.cache);
        *self = Self::new(settings);
        self.cache = cache;
    }

    pub fn set_topic(&mut self, topic: String) {
        self.topic = Some(topic);
        self.apply_primary();
    }

    pub fn set_age_group(&mut self, age_group: String) {
        self.age_group = Some(age_group);
        self.apply_primary();
    }

    /// Toggle one location in the comparison selection.
    pub fn toggle_location(&mut self, location: &str) {
        self.locations_chosen = true;
        if !self.selected_locations.remove(location) {
            self.selected_locations.insert(location.to_string());
        }
        self.apply_secondary();
    }

    pub fn select_all_locations(&mut self) {
        self.locations_chosen = true;
        self.selected_locations = self.location_choices.iter().cloned().collect();
        self.apply_secondary();
    }

    pub fn select_no_locations(&mut self) {
        self.locations_chosen = true;
        self.selected_locations.clear();
        self.apply_secondary();
    }

    /// Recompute everything downstream of topic / age group.
    fn apply_primary(&mut self) {
        let Some(table) = self.table.clone() else {
            return;
        };
        let selection = match (&self.topic, &self.age_group) {
            (Some(topic), Some(age)) => Selection::primary(topic.as_str(), age.as_str()),
            _ => Selection::default(),
        };
        let primary = select(&table, &selection);

        self.location_choices = distinct_locations(&primary);
        if self.locations_chosen {
            let choices = &self.location_choices;
            self.selected_locations
                .retain(|loc| choices.binary_search(loc).is_ok());
        } else {
            self.selected_locations =
                default_locations(&primary, self.settings.default_location_count);
        }

        self.map_values = aggregate(&primary, &MAP_GROUP_KEYS);
        self.map_points = centroids(&primary, Field::LocationAbbr);
        self.primary_indices = primary.into_indices();
        self.apply_secondary();
    }

    /// Recompute `secondary_indices` after a location change.
    fn apply_secondary(&mut self) {
        let Some(table) = self.table.clone() else {
            return;
        };
        let primary = Subset::from_indices(&table, self.primary_indices.clone());
        let locations = Selection::locations(self.selected_locations.iter().cloned());
        self.secondary_indices = refine(&primary, &locations).into_indices();
    }

    pub fn primary(&self) -> Option<Subset<'_>> {
        let table = self.table.as_deref()?;
        Some(Subset::from_indices(table, self.primary_indices.clone()))
    }

    pub fn secondary(&self) -> Option<Subset<'_>> {
        let table = self.table.as_deref()?;
        Some(Subset::from_indices(table, self.secondary_indices.clone()))
    }

    /// Rows for the table view: the comparison rows, or all primary rows
    /// when no location is selected.
    pub fn table_view(&self) -> Option<Subset<'_>> {
        let secondary = self.secondary()?;
        if secondary.is_empty() {
            self.primary()
        } else {
            Some(secondary)
        }
    }
}
