use std::sync::Arc;

use eframe::egui::{self, Ui};

use crate::config::DashboardConfig;
use crate::data::model::Dataset;
use crate::state::AppState;
use crate::ui::plot::scatter_series;
use crate::ui::{panels, plot, table, value_boxes};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PenguinsApp {
    pub state: AppState,
}

impl PenguinsApp {
    pub fn new(dataset: Arc<Dataset>, config: &DashboardConfig) -> Self {
        Self {
            state: AppState::new(dataset, config),
        }
    }
}

impl eframe::App for PenguinsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: value boxes, chart, grid ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let summary = self.state.summary();
            value_boxes::value_boxes(ui, &summary);
            ui.add_space(8.0);

            if self.state.view.is_empty() {
                ui.label(
                    egui::RichText::new("No penguins match the current filters.")
                        .italics()
                        .weak(),
                );
            }

            let series = scatter_series(self.state.view.records(), &self.state.colors);
            let state = &mut self.state;
            ui.columns(2, |columns: &mut [Ui]| {
                if let [left, right] = columns {
                    egui::Frame::group(left.style()).show(left, |ui: &mut Ui| {
                        plot::bill_scatter(ui, &series);
                    });
                    egui::Frame::group(right.style()).show(right, |ui: &mut Ui| {
                        table::data_grid(ui, state);
                    });
                }
            });
        });
    }
}
