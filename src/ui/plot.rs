use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Plot, PlotPoints, Points};

use crate::color::SpeciesColors;
use crate::data::model::{Record, Species};

// ---------------------------------------------------------------------------
// Bill length vs depth scatter
// ---------------------------------------------------------------------------

/// One legend entry of the scatter: all points of a species.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub species: Species,
    pub color: Color32,
    pub points: Vec<[f64; 2]>,
}

/// Group `(bill_length_mm, bill_depth_mm)` pairs by species.
/// Records missing either measurement are left out of the chart.
pub fn scatter_series<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    colors: &SpeciesColors,
) -> Vec<ScatterSeries> {
    let mut by_species: BTreeMap<Species, Vec<[f64; 2]>> = BTreeMap::new();
    for r in records {
        if let (Some(x), Some(y)) = (r.bill_length_mm, r.bill_depth_mm) {
            by_species.entry(r.species).or_default().push([x, y]);
        }
    }
    by_species
        .into_iter()
        .map(|(species, points)| ScatterSeries {
            species,
            color: colors.color_for(species),
            points,
        })
        .collect()
}

/// Render the scatter card. An empty `series` still draws the axes.
pub fn bill_scatter(ui: &mut Ui, series: &[ScatterSeries]) {
    ui.strong("Bill Length vs Depth");

    Plot::new("length_depth")
        .legend(Legend::default())
        .x_axis_label("Bill Length (mm)")
        .y_axis_label("Bill Depth (mm)")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for s in series {
                let points: PlotPoints = s.points.iter().copied().collect();
                plot_ui.points(
                    Points::new(points)
                        .name(s.species.label())
                        .color(s.color)
                        .radius(3.0),
                );
            }
        });
}
