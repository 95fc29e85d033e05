use eframe::egui::{Color32, Ui};
use egui_plot::{Plot, PlotPoint, Points, Text};

use crate::color::{RedScale, MISSING_COLOR};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// National map (Map tab)
// ---------------------------------------------------------------------------

/// One marker per location at its mean coordinate, shaded by mean value.
pub fn choropleth(ui: &mut Ui, state: &AppState) {
    let topic = state.topic.as_deref().unwrap_or_default();
    ui.heading(format!("Intensity of {topic}"));

    if state.map_values.is_empty() {
        ui.label("No data for this selection.");
        return;
    }

    let range = state.map_values.value_range();
    let scale = RedScale::new(range);
    match range {
        Some((lo, hi)) => {
            ui.label(format!(
                "Darker means higher prevalence. Mean Data_Value from {lo:.1} to {hi:.1}."
            ));
        }
        None => {
            ui.label("Every location in this selection lacks a value.");
        }
    }

    if state.map_points.is_empty() {
        ui.label("The dataset has no coordinates to place locations on a map.");
        return;
    }

    Plot::new("choropleth")
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (key, value) in state.map_values.iter() {
                let [abbr, desc] = key.as_slice() else {
                    continue;
                };
                let Some(point) = state.map_points.get(abbr) else {
                    continue;
                };

                let color = scale.map_or(MISSING_COLOR, |s| s.color_for(value));
                let label = match value.value() {
                    Some(v) => format!("{desc}: {v:.1}"),
                    None => format!("{desc}: no data"),
                };

                plot_ui.points(
                    Points::new(vec![[point.lon, point.lat]])
                        .radius(9.0)
                        .color(color)
                        .name(label),
                );
                plot_ui.text(
                    Text::new(PlotPoint::new(point.lon, point.lat), abbr.as_str())
                        .color(Color32::BLACK),
                );
            }
        });
}
