use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Global settings");
    ui.separator();

    if state.table.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ui.strong("1. Topic");
    if let Some(topic) = combo(ui, "topic", &state.topics, state.topic.as_deref()) {
        state.set_topic(topic);
    }

    ui.add_space(6.0);
    ui.strong("2. Age group");
    if let Some(age) = combo(ui, "age_group", &state.age_groups, state.age_group.as_deref()) {
        state.set_age_group(age);
    }

    ui.separator();

    let n_selected = state.selected_locations.len();
    let n_total = state.location_choices.len();
    ui.strong(format!("3. States to compare  ({n_selected}/{n_total})"));
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all_locations();
        }
        if ui.small_button("None").clicked() {
            state.select_no_locations();
        }
    });

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let mut toggled = None;
            for loc in &state.location_choices {
                let mut checked = state.selected_locations.contains(loc);
                if ui.checkbox(&mut checked, loc).changed() {
                    toggled = Some(loc.clone());
                }
            }
            if let Some(loc) = toggled {
                state.toggle_location(&loc);
            }
        });
}

/// A combo box over `options`; returns the newly picked value, if any.
fn combo(ui: &mut Ui, id: &str, options: &[String], current: Option<&str>) -> Option<String> {
    let current = current.unwrap_or_default();
    let mut picked = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in options {
                if ui.selectable_label(current == option.as_str(), option).clicked()
                    && current != option.as_str()
                {
                    picked = Some(option.clone());
                }
            }
        });
    picked
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} rows loaded, {} match topic and age group, {} compared",
                table.len(),
                state.primary_indices.len(),
                state.secondary_indices.len()
            ));
        }

        ui.separator();

        for (tab, label) in [
            (Tab::Map, "National map"),
            (Tab::Compare, "State comparison"),
            (Tab::Table, "Detailed data"),
        ] {
            ui.selectable_value(&mut state.tab, tab, label);
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open survey data")
        .add_filter("Delimited text", &["csv", "txt"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}
