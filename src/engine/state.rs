//! Immutable view state and the pure projection pipeline.
//!
//! `ViewState` is a value: every mutation produces a new state, and the
//! engine replaces its copy wholesale per input event. The filtered →
//! sorted → paginated projection is a pure function of (records, state,
//! page size) with no hidden inputs, so snapshots of `ViewState` are
//! enough to reproduce any screen.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::NaiveDate;

use crate::model::{Employee, Field};

/// Sort direction for the single active sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn toggled(&self) -> SortDir {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

/// The single cell currently open for in-place editing.
///
/// `buffer` holds the in-flight text; `original` the pre-edit value so a
/// buffered cancel can discard cleanly.
#[derive(Debug, Clone, PartialEq)]
pub struct EditTarget {
    pub id: u64,
    pub field: Field,
    pub buffer: String,
    pub original: String,
}

/// User-controlled view state: filters, sort, page, selection, edit target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// Per-column match values. Absent/empty means no constraint.
    pub filters: BTreeMap<Field, String>,
    /// At most one active sort key.
    pub sort: Option<(Field, SortDir)>,
    /// Current page, 1-based.
    pub page: usize,
    /// Selection keys (record ids, or visible positions under
    /// position-keyed selection).
    pub selected: BTreeSet<u64>,
    pub edit: Option<EditTarget>,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            page: 1,
            ..Self::default()
        }
    }

    /// Replaces one filter value. An empty value clears the constraint.
    /// Changing a filter invalidates the page position, so page resets to 1.
    pub fn with_filter(&self, field: Field, value: &str) -> Self {
        let mut next = self.clone();
        if value.is_empty() {
            next.filters.remove(&field);
        } else {
            next.filters.insert(field, value.to_string());
        }
        next.page = 1;
        next
    }

    /// Toggles direction if `key` is already active, else activates `key`
    /// ascending.
    pub fn with_sort_toggled(&self, key: Field) -> Self {
        let mut next = self.clone();
        next.sort = match self.sort {
            Some((active, dir)) if active == key => Some((key, dir.toggled())),
            _ => Some((key, SortDir::Asc)),
        };
        next
    }

    /// Sets the page, clamped into `[1, max(1, total_pages)]`.
    pub fn with_page(&self, page: usize, total_pages: usize) -> Self {
        let mut next = self.clone();
        next.page = page.clamp(1, total_pages.max(1));
        next
    }

    pub fn with_selection_toggled(&self, key: u64) -> Self {
        let mut next = self.clone();
        if !next.selected.remove(&key) {
            next.selected.insert(key);
        }
        next
    }

    pub fn with_selection_extended(&self, keys: impl IntoIterator<Item = u64>) -> Self {
        let mut next = self.clone();
        next.selected.extend(keys);
        next
    }

    pub fn with_selection_subtracted(&self, keys: impl IntoIterator<Item = u64>) -> Self {
        let mut next = self.clone();
        for key in keys {
            next.selected.remove(&key);
        }
        next
    }

    pub fn with_selection_cleared(&self) -> Self {
        let mut next = self.clone();
        next.selected.clear();
        next
    }

    pub fn with_edit(&self, edit: Option<EditTarget>) -> Self {
        let mut next = self.clone();
        next.edit = edit;
        next
    }

    /// Drops selection keys and any edit target that reference ids no
    /// longer in `live`. Only meaningful under id-keyed selection.
    pub fn pruned(&self, live: &HashSet<u64>) -> Self {
        let mut next = self.clone();
        next.selected.retain(|id| live.contains(id));
        if let Some(edit) = &next.edit {
            if !live.contains(&edit.id) {
                next.edit = None;
            }
        }
        next
    }
}

/// True iff the record satisfies every non-empty filter constraint.
///
/// Text fields match by case-insensitive substring; the joined-date filter
/// requires exact calendar-day equality. Constraints are conjunctive.
pub fn matches_filters(rec: &Employee, filters: &BTreeMap<Field, String>) -> bool {
    filters.iter().all(|(field, value)| match field {
        Field::JoinedDate => joined_day_matches(rec, value),
        _ => rec
            .value_of(*field)
            .to_lowercase()
            .contains(&value.to_lowercase()),
    })
}

fn joined_day_matches(rec: &Employee, value: &str) -> bool {
    match (
        rec.joined_day(),
        NaiveDate::parse_from_str(value, "%Y-%m-%d").ok(),
    ) {
        (Some(day), Some(wanted)) => day == wanted,
        _ => false,
    }
}

/// Records surviving the filter step, in source order.
pub fn filter_records<'a>(
    records: &'a [Employee],
    filters: &BTreeMap<Field, String>,
) -> Vec<&'a Employee> {
    records
        .iter()
        .filter(|rec| matches_filters(rec, filters))
        .collect()
}

/// Stable sort by the active key, case-insensitive lexicographic on the
/// string value. Rows with equal keys keep their filtered order; no
/// secondary tie-break.
pub fn sort_rows(rows: &mut [&Employee], sort: Option<(Field, SortDir)>) {
    let Some((key, dir)) = sort else { return };
    rows.sort_by(|a, b| {
        let va = a.value_of(key).to_lowercase();
        let vb = b.value_of(key).to_lowercase();
        match dir {
            SortDir::Asc => va.cmp(&vb),
            SortDir::Desc => vb.cmp(&va),
        }
    });
}

/// `ceil(visible / page_size)`; zero when the visible set is empty.
pub fn page_count(visible: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    visible.div_ceil(page_size)
}

/// One page of the projected sequence, plus the figures the renderer needs.
#[derive(Debug)]
pub struct GridView<'a> {
    /// Up to `page_size` contiguous rows of the filtered+sorted sequence.
    pub rows: Vec<&'a Employee>,
    /// Effective page after clamping.
    pub page: usize,
    /// Always at least 1 so the page indicator stays meaningful.
    pub total_pages: usize,
    /// Size of the visible (filtered) set before pagination.
    pub visible_count: usize,
}

impl GridView<'_> {
    /// "No data" signal: the filtered set is empty.
    pub fn is_empty(&self) -> bool {
        self.visible_count == 0
    }
}

/// Pure projection: filter, stable-sort, then slice out the current page.
pub fn compute_view<'a>(
    records: &'a [Employee],
    state: &ViewState,
    page_size: usize,
) -> GridView<'a> {
    let mut rows = filter_records(records, &state.filters);
    sort_rows(&mut rows, state.sort);

    let visible_count = rows.len();
    let total_pages = page_count(visible_count, page_size).max(1);
    let page = state.page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(visible_count);
    let rows = if start < visible_count {
        rows[start..end].to_vec()
    } else {
        Vec::new()
    };

    GridView {
        rows,
        page,
        total_pages,
        visible_count,
    }
}
