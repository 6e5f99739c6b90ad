use eframe::egui::{self, RichText, Ui};

use crate::data::stats::Summary;

/// Render the three headline value boxes side by side.
pub fn value_boxes(ui: &mut Ui, summary: &Summary) {
    let boxes = [
        ("Number of penguins", summary.count_text()),
        ("Average bill length", summary.bill_length_text()),
        ("Average bill depth", summary.bill_depth_text()),
    ];

    ui.columns(boxes.len(), |columns: &mut [Ui]| {
        for (ui, (title, value)) in columns.iter_mut().zip(boxes) {
            egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                ui.set_width(ui.available_width());
                ui.label(title);
                ui.label(RichText::new(value).size(28.0).strong());
            });
        }
    });
}
