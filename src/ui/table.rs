use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::grid::TableColumn;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Penguin data grid
// ---------------------------------------------------------------------------

/// Render the data grid: one filter box per column above the header, then
/// the filtered rows.
pub fn data_grid(ui: &mut Ui, state: &mut AppState) {
    let rows: Vec<[String; 5]> = state
        .table_records()
        .into_iter()
        .map(|r| TableColumn::ALL.map(|c| c.cell_text(r)))
        .collect();
    let mut inputs = TableColumn::ALL.map(|c| state.grid.input(c).to_string());
    let mut edited = [false; 5];

    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Penguin Data");
        ui.label(format!("{} rows", rows.len()));
    });

    let text_height = egui::TextStyle::Body.resolve(ui.style()).size * 1.5;

    let mut builder = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .min_scrolled_height(0.0)
        .vscroll(true);
    for column in TableColumn::ALL {
        let width = if column.is_numeric() { 110.0 } else { 90.0 };
        builder = builder.column(Column::initial(width).at_least(60.0).clip(true));
    }

    builder
        .header(48.0, |mut header| {
            for (i, column) in TableColumn::ALL.into_iter().enumerate() {
                header.col(|ui: &mut Ui| {
                    ui.vertical(|ui: &mut Ui| {
                        ui.strong(column.name());
                        let hint = if column.is_numeric() { "e.g. 3500..4000" } else { "contains" };
                        let edit = egui::TextEdit::singleline(&mut inputs[i])
                            .hint_text(hint)
                            .desired_width(f32::INFINITY);
                        edited[i] = ui.add(edit).changed();
                    });
                });
            }
        })
        .body(|body| {
            body.rows(text_height, rows.len(), |mut row| {
                let cells = &rows[row.index()];
                for cell in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });

    for ((column, text), changed) in TableColumn::ALL.into_iter().zip(inputs).zip(edited) {
        if changed {
            state.set_grid_filter(column, text);
        }
    }
}
