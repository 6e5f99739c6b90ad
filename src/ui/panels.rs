use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::model::Species;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter controls
// ---------------------------------------------------------------------------

/// Render the "Filter controls" sidebar: mass slider and species checkboxes.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter controls");
    ui.separator();

    // ---- Mass slider (id "mass") ----
    let range = state.view.mass_range();
    let mut max_mass = state.view.filters().max_mass;
    ui.push_id("mass", |ui: &mut Ui| {
        ui.strong("Mass");
        let slider = egui::Slider::new(&mut max_mass, range.min..=range.max)
            .step_by(1.0)
            .suffix(" g");
        if ui.add(slider).changed() {
            state.set_max_mass(max_mass);
        }
    });
    ui.add_space(8.0);

    // ---- Species checkbox group (id "species") ----
    ui.push_id("species", |ui: &mut Ui| {
        ui.strong("Species");
        ui.horizontal(|ui: &mut Ui| {
            if ui.small_button("All").clicked() {
                state.select_all();
            }
            if ui.small_button("None").clicked() {
                state.select_none();
            }
        });

        for species in Species::ALL {
            let mut checked = state.view.filters().selected_species.contains(&species);
            let text = RichText::new(species.label()).color(state.colors.color_for(species));
            if ui.checkbox(&mut checked, text).changed() {
                state.set_species_selected(species, checked);
            }
        }
    });

    ui.separator();
    let total = state.dataset().len();
    let visible = state.view.len();
    ui.label(format!("{visible} of {total} penguins match"));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export filtered rows…").clicked() {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if state.grid.is_active() {
            if ui.button("Clear table filters").clicked() {
                state.grid.clear();
            }
            ui.separator();
        }

        if let Some(msg) = &state.status_message {
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered penguins")
        .add_filter("CSV", &["csv"])
        .set_file_name("penguins_filtered.csv")
        .save_file();

    if let Some(path) = file {
        match state.export_table(&path) {
            Ok(rows) => log::info!("Exported {rows} rows to {}", path.display()),
            Err(e) => log::error!("Failed to export: {e:#}"),
        }
    }
}
