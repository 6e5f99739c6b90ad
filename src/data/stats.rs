use super::model::Record;

// ---------------------------------------------------------------------------
// Value-box aggregations over the filtered view
// ---------------------------------------------------------------------------

/// Placeholder shown when a mean has no values to average.
pub const NOT_AVAILABLE: &str = "N/A";

/// The three headline numbers of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub count: usize,
    pub mean_bill_length_mm: Option<f64>,
    pub mean_bill_depth_mm: Option<f64>,
}

impl Summary {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut count = 0;
        let mut length = MeanAccumulator::default();
        let mut depth = MeanAccumulator::default();
        for r in records {
            count += 1;
            length.push(r.bill_length_mm);
            depth.push(r.bill_depth_mm);
        }
        Summary {
            count,
            mean_bill_length_mm: length.mean(),
            mean_bill_depth_mm: depth.mean(),
        }
    }

    pub fn count_text(&self) -> String {
        self.count.to_string()
    }

    pub fn bill_length_text(&self) -> String {
        format_mm(self.mean_bill_length_mm)
    }

    pub fn bill_depth_text(&self) -> String {
        format_mm(self.mean_bill_depth_mm)
    }
}

/// Running mean that skips missing values.
#[derive(Debug, Default, Clone, Copy)]
struct MeanAccumulator {
    sum: f64,
    n: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value.filter(|v| v.is_finite()) {
            self.sum += v;
            self.n += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.n > 0).then(|| self.sum / self.n as f64)
    }
}

/// One decimal with a millimetre suffix, or [`NOT_AVAILABLE`].
pub fn format_mm(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1} mm"),
        None => NOT_AVAILABLE.to_string(),
    }
}
