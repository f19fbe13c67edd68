//! Chart assembly and rendering.
//!
//! Charts are described, not drawn: a builder produces a [`ChartSpec`] (a tidy
//! table plus field mappings) and a [`ChartRenderer`] turns it into whatever
//! the presentation layer consumes.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Summary   │────▶│  ChartSpec  │────▶│  Renderer   │
//! │   tables    │     │ (tidy data) │     │ (Plotly)    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```

pub mod demographic;
pub mod families;
pub mod plotly;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ChartError, ChartResult};

pub use demographic::{demographic_chart, FIRST_CLASS_MALE, THIRD_CLASS_CHILD};
pub use families::{family_chart, FAMILY_SIZE_GROUP, LAST_NAMES_GROUP};
pub use plotly::PlotlyRenderer;

// =============================================================================
// Tidy table
// =============================================================================

/// One row per observation, one column per variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TidyTable {
    columns: Vec<String>,
    rows: Vec<Map<String, Value>>,
}

impl TidyTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Declared columns absent from `row` are stored as null,
    /// keys that are not declared columns are dropped.
    pub fn push(&mut self, mut row: Map<String, Value>) {
        let row = self
            .columns
            .iter()
            .map(|c| (c.clone(), row.remove(c).unwrap_or(Value::Null)))
            .collect();
        self.rows.push(row);
    }

    /// Append every row of `other`, keeping this table's columns.
    pub fn extend(&mut self, other: TidyTable) {
        for row in other.rows {
            self.push(row);
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, field: &str) -> bool {
        self.columns.iter().any(|c| c == field)
    }

    /// All values of a column, in row order.
    pub fn column(&self, field: &str) -> ChartResult<Vec<&Value>> {
        if !self.has_column(field) {
            return Err(ChartError::UnknownField(field.to_string()));
        }
        Ok(self.rows.iter().map(|r| r.get(field).unwrap_or(&Value::Null)).collect())
    }

    /// Distinct values of a column in first-seen order.
    pub fn distinct(&self, field: &str) -> ChartResult<Vec<Value>> {
        let mut seen: Vec<Value> = Vec::new();
        for value in self.column(field)? {
            if !seen.contains(value) {
                seen.push(value.clone());
            }
        }
        Ok(seen)
    }

    /// Rows whose `field` equals `value`.
    pub fn filter_eq(&self, field: &str, value: &Value) -> ChartResult<TidyTable> {
        if !self.has_column(field) {
            return Err(ChartError::UnknownField(field.to_string()));
        }
        Ok(TidyTable {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|r| r.get(field) == Some(value))
                .cloned()
                .collect(),
        })
    }
}

// =============================================================================
// Chart spec
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// One bar per x value, height from `histfunc` over `y`.
    Bar,
    /// Distribution of `x` values.
    Histogram,
}

/// How y values sharing an x value are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistFunc {
    Count,
    Sum,
    Avg,
}

impl HistFunc {
    /// Combine numeric values. Nulls are skipped before this is called;
    /// `None` when nothing is left to combine.
    pub fn apply(self, values: &[f64]) -> Option<f64> {
        match self {
            HistFunc::Count => Some(values.len() as f64),
            HistFunc::Sum => Some(values.iter().sum()),
            HistFunc::Avg if values.is_empty() => None,
            HistFunc::Avg => Some(values.iter().sum::<f64>() / values.len() as f64),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HistFunc::Count => "count",
            HistFunc::Sum => "sum",
            HistFunc::Avg => "avg",
        }
    }
}

/// Named color sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    Plotly,
    D3,
}

impl Palette {
    pub fn colors(self) -> &'static [&'static str] {
        match self {
            Palette::Plotly => &[
                "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A",
                "#19D3F3", "#FF6692", "#B6E880", "#FF97FF", "#FECB52",
            ],
            Palette::D3 => &[
                "#1F77B4", "#FF7F0E", "#2CA02C", "#D62728", "#9467BD",
                "#8C564B", "#E377C2", "#7F7F7F", "#BCBD22", "#17BECF",
            ],
        }
    }

    pub fn color(self, index: usize) -> &'static str {
        let colors = self.colors();
        colors[index % colors.len()]
    }
}

/// Everything a renderer needs: data plus field mappings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub data: TidyTable,
    pub x: String,
    pub y: Option<String>,
    pub color: Option<String>,
    pub facet_row: Option<String>,
    pub histfunc: HistFunc,
    pub hover: Vec<String>,
    pub palette: Palette,
}

impl ChartSpec {
    pub fn new(title: impl Into<String>, kind: ChartKind, data: TidyTable, x: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind,
            data,
            x: x.into(),
            y: None,
            color: None,
            facet_row: None,
            histfunc: HistFunc::Count,
            hover: Vec::new(),
            palette: Palette::Plotly,
        }
    }

    pub fn with_y(mut self, field: impl Into<String>) -> Self {
        self.y = Some(field.into());
        self
    }

    pub fn with_color(mut self, field: impl Into<String>) -> Self {
        self.color = Some(field.into());
        self
    }

    pub fn with_facet_row(mut self, field: impl Into<String>) -> Self {
        self.facet_row = Some(field.into());
        self
    }

    pub fn with_histfunc(mut self, histfunc: HistFunc) -> Self {
        self.histfunc = histfunc;
        self
    }

    pub fn with_hover(mut self, field: impl Into<String>) -> Self {
        self.hover.push(field.into());
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Check that every mapped field exists and that the kind has what it needs.
    pub fn validate(&self) -> ChartResult<()> {
        let mapped = std::iter::once(&self.x)
            .chain(self.y.iter())
            .chain(self.color.iter())
            .chain(self.facet_row.iter())
            .chain(self.hover.iter());

        for field in mapped {
            if !self.data.has_column(field) {
                return Err(ChartError::UnknownField(field.clone()));
            }
        }

        if self.kind == ChartKind::Bar && self.histfunc != HistFunc::Count && self.y.is_none() {
            return Err(ChartError::MissingChannel {
                title: self.title.clone(),
                channel: "y",
            });
        }

        Ok(())
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// One aggregated bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub x: Value,
    pub y: Option<f64>,
}

/// Aggregate a table into bars: one per distinct `x` in first-seen order.
///
/// With `Count` rows are counted; otherwise the non-null `y` values are combined.
pub fn aggregate_bars(data: &TidyTable, x: &str, y: Option<&str>, histfunc: HistFunc) -> ChartResult<Vec<Bar>> {
    let mut bars = Vec::new();

    for key in data.distinct(x)? {
        let subset = data.filter_eq(x, &key)?;

        let value = match (histfunc, y) {
            (HistFunc::Count, _) | (_, None) => Some(subset.len() as f64),
            (func, Some(field)) => {
                let values = numeric_values(&subset, field)?;
                func.apply(&values)
            }
        };

        bars.push(Bar { x: key, y: value });
    }

    Ok(bars)
}

/// Non-null numeric values of a column. Strings and other non-numbers are errors.
pub fn numeric_values(data: &TidyTable, field: &str) -> ChartResult<Vec<f64>> {
    let mut out = Vec::new();
    for value in data.column(field)? {
        match value {
            Value::Null => continue,
            Value::Number(n) => out.extend(n.as_f64()),
            other => {
                return Err(ChartError::NotNumeric {
                    field: field.to_string(),
                    value: other.to_string(),
                })
            }
        }
    }
    Ok(out)
}

/// Display text of a cell: strings unquoted, everything else as JSON.
pub fn value_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// =============================================================================
// Renderer seam
// =============================================================================

/// Turns a [`ChartSpec`] into a presentable artifact.
pub trait ChartRenderer {
    type Output;

    fn render(&self, spec: &ChartSpec) -> ChartResult<Self::Output>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn table() -> TidyTable {
        let mut t = TidyTable::new(["category", "pct"]);
        t.push(row(json!({"category": "a", "pct": 10.0})));
        t.push(row(json!({"category": "b", "pct": 30.0})));
        t.push(row(json!({"category": "a", "pct": null})));
        t.push(row(json!({"category": "a", "pct": 20.0})));
        t
    }

    #[test]
    fn test_push_normalizes_columns() {
        let mut t = TidyTable::new(["a", "b"]);
        t.push(row(json!({"a": 1, "extra": true})));

        assert_eq!(t.rows()[0].len(), 2);
        assert_eq!(t.rows()[0]["b"], Value::Null);
        assert!(t.rows()[0].get("extra").is_none());
    }

    #[test]
    fn test_distinct_first_seen() {
        assert_eq!(table().distinct("category").unwrap(), vec![json!("a"), json!("b")]);
        assert!(matches!(
            table().distinct("nope").unwrap_err(),
            ChartError::UnknownField(_)
        ));
    }

    #[test]
    fn test_average_skips_nulls() {
        let bars = aggregate_bars(&table(), "category", Some("pct"), HistFunc::Avg).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0], Bar { x: json!("a"), y: Some(15.0) });
        assert_eq!(bars[1], Bar { x: json!("b"), y: Some(30.0) });
    }

    #[test]
    fn test_count_and_sum() {
        let counts = aggregate_bars(&table(), "category", None, HistFunc::Count).unwrap();
        assert_eq!(counts[0].y, Some(3.0));

        let sums = aggregate_bars(&table(), "category", Some("pct"), HistFunc::Sum).unwrap();
        assert_eq!(sums[0].y, Some(30.0));
    }

    #[test]
    fn test_non_numeric_rejected() {
        let err = aggregate_bars(&table(), "pct", Some("category"), HistFunc::Avg).unwrap_err();
        assert!(matches!(err, ChartError::NotNumeric { .. }));
    }

    #[test]
    fn test_validate_fields() {
        let spec = ChartSpec::new("t", ChartKind::Bar, table(), "category")
            .with_histfunc(HistFunc::Avg);
        assert!(matches!(spec.validate().unwrap_err(), ChartError::MissingChannel { .. }));

        let spec = spec.with_y("missing");
        assert!(matches!(spec.validate().unwrap_err(), ChartError::UnknownField(_)));

        let spec = ChartSpec::new("t", ChartKind::Bar, table(), "category")
            .with_y("pct")
            .with_histfunc(HistFunc::Avg);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(Palette::D3.color(0), "#1F77B4");
        assert_eq!(Palette::D3.color(10), "#1F77B4");
    }
}
