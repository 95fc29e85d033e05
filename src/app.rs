use aging_atlas::config::Settings;
use eframe::egui::{self, RichText, Ui};

use crate::state::{AppState, Tab};
use crate::ui::{charts, map, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AgingAtlasApp {
    pub state: AppState,
}

impl AgingAtlasApp {
    /// Build the app and load the configured dataset once.
    pub fn new(settings: Settings) -> Self {
        let path = settings.dataset_path.clone();
        let mut state = AppState::new(settings);
        state.load(&path);
        Self { state }
    }
}

impl eframe::App for AgingAtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.table.is_none() {
                unavailable(ui, &self.state);
                return;
            }
            match self.state.tab {
                Tab::Map => map::choropleth(ui, &self.state),
                Tab::Compare => charts::comparison(ui, &self.state),
                Tab::Table => table::data_table(ui, &self.state),
            }
        });
    }
}

fn unavailable(ui: &mut Ui, state: &AppState) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(RichText::new(format!(
            "Could not load {}. Place the survey CSV there or use File → Open…",
            state.settings.dataset_path.display()
        )));
    });
}
