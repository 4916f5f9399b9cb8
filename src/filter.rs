//! Filtering, sorting and grouping as a pure transform over a provider.
//!
//! The result is a [`DataView`] mapping view rows to provider rows; the
//! provider itself is never modified.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::provider::DataGridProvider;
use crate::types::{CellValue, ColumnHeader, SortOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Empty,
    NotEmpty,
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    Between,
}

/// A predicate on one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnFilter {
    pub col: u32,
    pub operator: FilterOperator,
    #[serde(default)]
    pub value: CellValue,
    /// Upper bound for `between`
    #[serde(default)]
    pub value_to: CellValue,
}

impl ColumnFilter {
    pub fn new(col: u32, operator: FilterOperator, value: impl Into<CellValue>) -> Self {
        Self {
            col,
            operator,
            value: value.into(),
            value_to: CellValue::Empty,
        }
    }

    pub fn between(col: u32, low: impl Into<CellValue>, high: impl Into<CellValue>) -> Self {
        Self {
            col,
            operator: FilterOperator::Between,
            value: low.into(),
            value_to: high.into(),
        }
    }

    fn is_range(&self) -> bool {
        matches!(
            self.operator,
            FilterOperator::Gt
                | FilterOperator::Gte
                | FilterOperator::Lt
                | FilterOperator::Lte
                | FilterOperator::Between
        )
    }

    /// Range operators never match NaN.
    pub fn matches(&self, value: &CellValue) -> bool {
        let text = || value.display_text().to_lowercase();
        let needle = || self.value.display_text().to_lowercase();
        match self.operator {
            FilterOperator::Empty => value.is_empty(),
            FilterOperator::NotEmpty => !value.is_empty(),
            FilterOperator::Eq => value.loose_eq(&self.value),
            FilterOperator::Neq => !value.loose_eq(&self.value),
            _ if self.is_range() && value.is_nan() => false,
            FilterOperator::Gt => value.compare(&self.value) == Ordering::Greater,
            FilterOperator::Gte => value.compare(&self.value) != Ordering::Less,
            FilterOperator::Lt => value.compare(&self.value) == Ordering::Less,
            FilterOperator::Lte => value.compare(&self.value) != Ordering::Greater,
            FilterOperator::Contains => text().contains(&needle()),
            FilterOperator::NotContains => !text().contains(&needle()),
            FilterOperator::StartsWith => text().starts_with(&needle()),
            FilterOperator::EndsWith => text().ends_with(&needle()),
            FilterOperator::Between => {
                value.compare(&self.value) != Ordering::Less
                    && value.compare(&self.value_to) != Ordering::Greater
            }
        }
    }
}

/// One sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub col: u32,
    pub order: SortOrder,
}

/// A run of consecutive view rows sharing a group-by value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    pub value: String,
    /// First view row of the group
    pub start_index: usize,
    /// Last view row (inclusive); `None` when collapsed
    pub end_index: Option<usize>,
    pub collapsed: bool,
    /// Rows in the group, collapsed or not
    pub row_count: usize,
}

/// Result of filtering, sorting and grouping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataView {
    /// View row -> provider row
    pub row_map: Vec<u32>,
    pub visible_row_count: usize,
    pub groups: Vec<GroupInfo>,
}

impl DataView {
    /// Provider row shown at a view row.
    pub fn source_row(&self, view_row: u32) -> Option<u32> {
        self.row_map.get(view_row as usize).copied()
    }
}

/// Everything that shapes a view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewSpec {
    pub filters: Vec<ColumnFilter>,
    pub sorts: Vec<SortState>,
    pub quick_filter: String,
    pub group_by: Option<u32>,
}

impl ViewSpec {
    /// Whether the spec changes anything compared to the raw provider.
    pub fn is_active(&self) -> bool {
        !self.filters.is_empty()
            || !self.sorts.is_empty()
            || !self.quick_filter.is_empty()
            || self.group_by.is_some()
    }
}

/// Builds views and remembers which groups are collapsed.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    collapsed: HashSet<String>,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter, then sort, then group.
    pub fn build_view(&self, provider: &dyn DataGridProvider, spec: &ViewSpec) -> DataView {
        let total = u32::try_from(provider.row_count()).unwrap_or(u32::MAX);
        let col_count = u32::try_from(provider.column_count()).unwrap_or(u32::MAX);
        let quick = spec.quick_filter.to_lowercase();

        let mut rows: Vec<u32> = (0..total)
            .filter(|&r| {
                spec.filters
                    .iter()
                    .all(|f| f.matches(&provider.cell_data(r, f.col)))
            })
            .filter(|&r| quick.is_empty() || matches_quick(provider, r, col_count, &quick))
            .collect();

        if !spec.sorts.is_empty() {
            rows.sort_by(|&a, &b| {
                for s in &spec.sorts {
                    let ord = provider
                        .cell_data(a, s.col)
                        .compare(&provider.cell_data(b, s.col));
                    if ord != Ordering::Equal {
                        return match s.order {
                            SortOrder::Asc => ord,
                            SortOrder::Desc => ord.reverse(),
                        };
                    }
                }
                a.cmp(&b)
            });
        }

        let mut groups = Vec::new();
        if let Some(group_col) = spec.group_by {
            let mut order: Vec<String> = Vec::new();
            let mut members: HashMap<String, Vec<u32>> = HashMap::new();
            for &r in &rows {
                let key = provider.cell_data(r, group_col).display_text();
                members
                    .entry(key.clone())
                    .or_insert_with(|| {
                        order.push(key);
                        Vec::new()
                    })
                    .push(r);
            }
            let mut grouped = Vec::with_capacity(rows.len());
            for key in order {
                let group_rows = members.remove(&key).unwrap_or_default();
                let collapsed = self.collapsed.contains(&key);
                let start = grouped.len();
                if !collapsed {
                    grouped.extend_from_slice(&group_rows);
                }
                groups.push(GroupInfo {
                    end_index: (!collapsed && !group_rows.is_empty())
                        .then(|| start + group_rows.len() - 1),
                    value: key,
                    start_index: start,
                    collapsed,
                    row_count: group_rows.len(),
                });
            }
            rows = grouped;
        }

        tracing::trace!(visible = rows.len(), total, "built data view");
        DataView {
            visible_row_count: rows.len(),
            row_map: rows,
            groups,
        }
    }

    pub fn toggle_group(&mut self, value: &str) {
        if !self.collapsed.remove(value) {
            self.collapsed.insert(value.to_string());
        }
    }

    pub fn is_group_collapsed(&self, value: &str) -> bool {
        self.collapsed.contains(value)
    }
}

fn matches_quick(provider: &dyn DataGridProvider, row: u32, col_count: u32, needle: &str) -> bool {
    (0..col_count).any(|c| {
        let value = provider.cell_data(row, c);
        !matches!(value, CellValue::Empty) && value.display_text().to_lowercase().contains(needle)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregate {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

/// Aggregate a column over provider rows. Non-numeric values are skipped
/// (except by `Count`); an empty row set yields `None`.
pub fn aggregate(
    provider: &dyn DataGridProvider,
    rows: &[u32],
    col: u32,
    kind: Aggregate,
) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    let numbers = rows.iter().filter_map(|&r| provider.cell_data(r, col).as_f64());
    match kind {
        Aggregate::Count => Some(rows.len() as f64),
        Aggregate::Sum => Some(numbers.sum()),
        Aggregate::Avg => {
            let (sum, n) = numbers.fold((0.0, 0_u32), |(s, n), v| (s + v, n + 1));
            (n > 0).then(|| sum / f64::from(n))
        }
        Aggregate::Min => numbers.reduce(f64::min),
        Aggregate::Max => numbers.reduce(f64::max),
    }
}

/// Read-only provider presenting a [`DataView`] over another provider.
pub struct ViewProvider<'a> {
    inner: &'a dyn DataGridProvider,
    view: &'a DataView,
}

impl<'a> ViewProvider<'a> {
    pub fn new(inner: &'a dyn DataGridProvider, view: &'a DataView) -> Self {
        Self { inner, view }
    }
}

impl DataGridProvider for ViewProvider<'_> {
    fn row_count(&self) -> usize {
        self.view.visible_row_count
    }

    fn column_count(&self) -> usize {
        self.inner.column_count()
    }

    fn cell_data(&self, row: u32, col: u32) -> CellValue {
        self.view
            .source_row(row)
            .map(|r| self.inner.cell_data(r, col))
            .unwrap_or_default()
    }

    fn header(&self, col: u32) -> ColumnHeader {
        self.inner.header(col)
    }

    fn can_edit_cells(&self) -> bool {
        self.inner.can_edit_cells()
    }
}
