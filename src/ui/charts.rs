use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, Points};

use aging_atlas::data::aggregate::{aggregate, STRATIFICATION_GROUP_KEYS};
use aging_atlas::data::filter::{distinct_locations, distinct_values};
use aging_atlas::data::model::{Field, Subset};

use crate::color::LocationColors;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// State comparison (Compare tab)
// ---------------------------------------------------------------------------

pub fn comparison(ui: &mut Ui, state: &AppState) {
    ui.heading("Compare selected states");

    let Some(subset) = state.secondary() else {
        return;
    };
    if subset.is_empty() {
        ui.colored_label(
            Color32::YELLOW,
            "Select at least one state to see the comparison charts.",
        );
        return;
    }

    let locations = distinct_locations(&subset);
    let colors = LocationColors::new(&locations);

    ui.columns(2, |cols| {
        stratification_bars(&mut cols[0], &subset, &locations, &colors);
        confidence_scatter(&mut cols[1], &subset, &colors);
    });
}

/// Grouped bars: mean Data_Value per stratum, one series per location.
fn stratification_bars(
    ui: &mut Ui,
    subset: &Subset<'_>,
    locations: &[String],
    colors: &LocationColors,
) {
    ui.strong("Breakdown by stratification");

    let strata = distinct_values(subset, Field::Stratification1);
    let means = aggregate(subset, &STRATIFICATION_GROUP_KEYS);
    let width = 0.8 / locations.len().max(1) as f64;

    let charts: Vec<BarChart> = locations
        .iter()
        .enumerate()
        .map(|(li, loc)| {
            let bars: Vec<Bar> = strata
                .iter()
                .enumerate()
                .filter_map(|(si, stratum)| {
                    let v = means.get(&[stratum.as_str(), loc.as_str()])?.value()?;
                    let x = si as f64 - 0.4 + width * (li as f64 + 0.5);
                    Some(Bar::new(x, v).width(width).name(stratum))
                })
                .collect();
            BarChart::new(bars).name(loc).color(colors.color_for(loc))
        })
        .collect();

    let labels = strata.clone();
    Plot::new("stratification_bars")
        .legend(Legend::default())
        .y_axis_label("Data_Value")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// Low vs high confidence limit per row; rows missing either are left out.
fn confidence_scatter(ui: &mut Ui, subset: &Subset<'_>, colors: &LocationColors) {
    ui.strong("Spread of values");

    let table = subset.table();
    let mut series: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for record in subset.records() {
        let low = table.measure(record, Field::LowConfidenceLimit).value();
        let high = table.measure(record, Field::HighConfidenceLimit).value();
        let (Some(loc), Some(low), Some(high)) =
            (table.text(record, Field::LocationDesc), low, high)
        else {
            continue;
        };
        series.entry(loc).or_default().push([low, high]);
    }

    Plot::new("confidence_scatter")
        .legend(Legend::default())
        .x_axis_label("Low_Confidence_Limit")
        .y_axis_label("High_Confidence_Limit")
        .show(ui, |plot_ui| {
            for (loc, points) in series {
                plot_ui.points(
                    Points::new(points)
                        .name(loc)
                        .color(colors.color_for(loc))
                        .radius(3.0),
                );
            }
        });
}
