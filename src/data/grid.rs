use super::model::Record;

// ---------------------------------------------------------------------------
// Data grid columns
// ---------------------------------------------------------------------------

/// The five columns shown in the data grid, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableColumn {
    Species,
    Island,
    BillLength,
    BillDepth,
    BodyMass,
}

impl TableColumn {
    pub const ALL: [TableColumn; 5] = [
        TableColumn::Species,
        TableColumn::Island,
        TableColumn::BillLength,
        TableColumn::BillDepth,
        TableColumn::BodyMass,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TableColumn::Species => "species",
            TableColumn::Island => "island",
            TableColumn::BillLength => "bill_length_mm",
            TableColumn::BillDepth => "bill_depth_mm",
            TableColumn::BodyMass => "body_mass_g",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, TableColumn::Species | TableColumn::Island)
    }

    fn number(self, record: &Record) -> Option<f64> {
        match self {
            TableColumn::Species | TableColumn::Island => None,
            TableColumn::BillLength => record.bill_length_mm,
            TableColumn::BillDepth => record.bill_depth_mm,
            TableColumn::BodyMass => record.body_mass_g,
        }
    }

    /// Display text of this column's cell; missing values render as `NA`.
    pub fn cell_text(self, record: &Record) -> String {
        match self {
            TableColumn::Species => record.species.to_string(),
            TableColumn::Island => record.island.clone(),
            _ => self
                .number(record)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "NA".to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-column filter expressions
// ---------------------------------------------------------------------------

/// A parsed grid filter for one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    Any,
    /// Case-insensitive substring of the cell text.
    Contains(String),
    /// Inclusive range; either bound may be open.
    Range { min: Option<f64>, max: Option<f64> },
    Above { bound: f64, inclusive: bool },
    Below { bound: f64, inclusive: bool },
    Equals(f64),
}

impl ColumnFilter {
    /// Parse the text typed into a column's filter box.
    ///
    /// Numeric columns understand `a..b`, `>x`, `>=x`, `<x`, `<=x` and bare
    /// numbers. Anything else is a substring match.
    pub fn parse(column: TableColumn, input: &str) -> Self {
        let text = input.trim();
        if text.is_empty() {
            return ColumnFilter::Any;
        }
        if column.is_numeric() {
            if let Some(filter) = parse_numeric(text) {
                return filter;
            }
        }
        ColumnFilter::Contains(text.to_lowercase())
    }

    pub fn matches(&self, column: TableColumn, record: &Record) -> bool {
        let value = column.number(record);
        match self {
            ColumnFilter::Any => true,
            ColumnFilter::Contains(needle) => {
                column.cell_text(record).to_lowercase().contains(needle.as_str())
            }
            ColumnFilter::Range { min, max } => value.is_some_and(|v| {
                min.map_or(true, |lo| v >= lo) && max.map_or(true, |hi| v <= hi)
            }),
            ColumnFilter::Above { bound, inclusive } => {
                value.is_some_and(|v| if *inclusive { v >= *bound } else { v > *bound })
            }
            ColumnFilter::Below { bound, inclusive } => {
                value.is_some_and(|v| if *inclusive { v <= *bound } else { v < *bound })
            }
            ColumnFilter::Equals(target) => value.is_some_and(|v| v == *target),
        }
    }
}

fn parse_numeric(text: &str) -> Option<ColumnFilter> {
    let number = |s: &str| s.trim().parse::<f64>().ok();

    if let Some((lo, hi)) = text.split_once("..") {
        let parse_bound = |s: &str| -> Option<Option<f64>> {
            if s.trim().is_empty() {
                Some(None)
            } else {
                number(s).map(Some)
            }
        };
        let min = parse_bound(lo)?;
        let max = parse_bound(hi)?;
        return Some(ColumnFilter::Range { min, max });
    }
    if let Some(rest) = text.strip_prefix(">=") {
        return number(rest).map(|bound| ColumnFilter::Above { bound, inclusive: true });
    }
    if let Some(rest) = text.strip_prefix("<=") {
        return number(rest).map(|bound| ColumnFilter::Below { bound, inclusive: true });
    }
    if let Some(rest) = text.strip_prefix('>') {
        return number(rest).map(|bound| ColumnFilter::Above { bound, inclusive: false });
    }
    if let Some(rest) = text.strip_prefix('<') {
        return number(rest).map(|bound| ColumnFilter::Below { bound, inclusive: false });
    }
    number(text).map(ColumnFilter::Equals)
}

/// The text of every column filter box plus its parsed form.
#[derive(Debug, Clone)]
pub struct GridFilters {
    inputs: [String; 5],
    parsed: [ColumnFilter; 5],
}

impl Default for GridFilters {
    fn default() -> Self {
        Self {
            inputs: Default::default(),
            parsed: std::array::from_fn(|_| ColumnFilter::Any),
        }
    }
}

impl GridFilters {
    pub fn input(&self, column: TableColumn) -> &str {
        &self.inputs[column as usize]
    }

    pub fn set_input(&mut self, column: TableColumn, text: impl Into<String>) {
        let text = text.into();
        self.parsed[column as usize] = ColumnFilter::parse(column, &text);
        self.inputs[column as usize] = text;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.parsed.iter().any(|f| *f != ColumnFilter::Any)
    }

    pub fn matches(&self, record: &Record) -> bool {
        TableColumn::ALL
            .into_iter()
            .zip(&self.parsed)
            .all(|(column, filter)| filter.matches(column, record))
    }
}
