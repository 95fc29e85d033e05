use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Raw data explorer (Table tab)
// ---------------------------------------------------------------------------

pub fn data_table(ui: &mut Ui, state: &AppState) {
    ui.heading("Raw data explorer");

    let Some(subset) = state.table_view() else {
        return;
    };
    if subset.is_empty() {
        ui.label("No data for this selection.");
        return;
    }
    ui.label(format!("{} rows", subset.len()));

    let table = subset.table();
    let columns = table.columns();

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .columns(Column::auto().at_least(60.0).clip(true), columns.len())
            .header(20.0, |mut header| {
                for name in columns {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, subset.len(), |mut row| {
                    let record = &table.records()[subset.indices()[row.index()]];
                    for cell in record.cells() {
                        row.col(|ui| {
                            ui.label(cell.to_string());
                        });
                    }
                });
            });
    });
}
