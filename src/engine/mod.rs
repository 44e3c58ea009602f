//! Record view-state engine.
//!
//! Owns the source record collection and the view state, and exposes the
//! pure `compute_view()` projection plus the mutator operations the
//! rendering collaborator routes input events through. Every mutator is
//! all-or-nothing with respect to its own state slice, and every state
//! change goes through a pure `ViewState::with_*` method so snapshots stay
//! trivially comparable.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, warn};

use crate::export;
use crate::model::{Employee, Field};

mod state;

pub use state::{EditTarget, GridView, SortDir, ViewState};
pub use state::{compute_view, filter_records, matches_filters, page_count, sort_rows};

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Which input gesture opens a cell for editing. Consumed by the rendering
/// collaborator's mouse path only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditTrigger {
    #[default]
    SingleClick,
    DoubleClick,
}

/// How selection keys are interpreted.
///
/// `Id` is canonical: keys are record identifiers and survive filtering and
/// sorting. `Position` keys by absolute visible position and silently
/// retargets when the visible set changes; it exists only for compatibility
/// with the behavior it replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionKey {
    #[default]
    Id,
    Position,
}

/// Edit commit semantics.
///
/// `Buffered` (default) holds keystrokes in the edit target's buffer until
/// an explicit commit, so cancel restores the pre-edit value. `Immediate`
/// writes every keystroke straight into the record, so cancel cannot
/// restore; kept as a compatibility option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditCommit {
    #[default]
    Buffered,
    Immediate,
}

/// Engine configuration, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    pub page_size: usize,
    pub edit_trigger: EditTrigger,
    pub selection_key: SelectionKey,
    pub edit_commit: EditCommit,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            edit_trigger: EditTrigger::default(),
            selection_key: SelectionKey::default(),
            edit_commit: EditCommit::default(),
        }
    }
}

/// Non-fatal operation failures. All recovered locally and surfaced as
/// warnings by the notification collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// `delete_selected` with nothing selected; state unchanged.
    EmptySelection,
    /// Selection or edit target references an id no longer in the
    /// collection.
    StaleReference { id: u64 },
    /// `begin_edit` on a field outside the editable subset.
    InvalidField(Field),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::EmptySelection => write!(f, "No rows selected for deletion"),
            GridError::StaleReference { id } => {
                write!(f, "Record {id} no longer exists")
            }
            GridError::InvalidField(field) => write!(f, "Field {field} is not editable"),
        }
    }
}

impl std::error::Error for GridError {}

/// Discrete success signals for the notification collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Deleted(usize),
    EditSaved,
    Exported(usize),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Deleted(n) => write!(f, "Deleted {n} selected row(s)"),
            Notice::EditSaved => write!(f, "Changes saved"),
            Notice::Exported(n) => write!(f, "Exported {n} row(s)"),
        }
    }
}

/// The view-state engine. Exclusive owner of the record collection;
/// collaborators receive read-only views and route all mutations through
/// the methods below.
#[derive(Debug, Clone)]
pub struct GridEngine {
    records: Vec<Employee>,
    view: ViewState,
    config: GridConfig,
}

impl GridEngine {
    pub fn new(records: Vec<Employee>, config: GridConfig) -> Self {
        debug_assert!(
            {
                let mut seen = HashSet::new();
                records.iter().all(|r| seen.insert(r.id))
            },
            "record ids must be unique at ingestion"
        );
        Self {
            records,
            view: ViewState::new(),
            config,
        }
    }

    pub fn records(&self) -> &[Employee] {
        &self.records
    }

    pub fn state(&self) -> &ViewState {
        &self.view
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Pure projection of the current page. Fresh, independent result on
    /// every call.
    pub fn compute_view(&self) -> GridView<'_> {
        state::compute_view(&self.records, &self.view, self.config.page_size)
    }

    /// Replaces the filter value for `field` and resets to page 1. An empty
    /// value clears the constraint; no other validation.
    pub fn set_filter(&mut self, field: Field, value: &str) {
        debug!(%field, value, "filter changed");
        self.view = self.view.with_filter(field, value);
    }

    /// Toggles direction on the active key, or activates `key` ascending.
    /// Non-sortable columns are ignored.
    pub fn set_sort(&mut self, key: Field) {
        if !key.sortable() {
            warn!(%key, "ignoring sort on non-sortable column");
            return;
        }
        self.view = self.view.with_sort_toggled(key);
    }

    pub fn set_page(&mut self, page: usize) {
        let total = page_count(self.visible_len(), self.config.page_size);
        self.view = self.view.with_page(page, total);
    }

    pub fn next_page(&mut self) {
        self.set_page(self.view.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.view.page.saturating_sub(1));
    }

    /// Adds `id` to the selection if absent, removes it if present.
    /// Unknown ids are stale references, never silently tolerated.
    pub fn toggle_select(&mut self, id: u64) -> Result<(), GridError> {
        if !self.is_live(id) {
            warn!(id, "toggle_select on unknown id");
            return Err(GridError::StaleReference { id });
        }
        self.view = self.view.with_selection_toggled(id);
        Ok(())
    }

    /// Toggles the selection key under `row` of the current page, resolved
    /// per the configured keying. Out-of-range rows are a no-op.
    pub fn toggle_select_visible(&mut self, row: usize) {
        if let Some(key) = self.page_keys().get(row).copied() {
            self.view = self.view.with_selection_toggled(key);
        }
    }

    /// Unions the current page's keys into the selection. Selections made
    /// on other pages are preserved.
    pub fn select_all_visible(&mut self) {
        let keys = self.page_keys();
        self.view = self.view.with_selection_extended(keys);
    }

    /// Subtracts the current page's keys from the selection, leaving
    /// off-page selections intact.
    pub fn deselect_all_visible(&mut self) {
        let keys = self.page_keys();
        self.view = self.view.with_selection_subtracted(keys);
    }

    /// True iff every row on the current page is selected (and the page is
    /// non-empty). Drives the "select all" checkbox state.
    pub fn page_fully_selected(&self) -> bool {
        let keys = self.page_keys();
        !keys.is_empty() && keys.iter().all(|k| self.view.selected.contains(k))
    }

    /// Whether the row at `row` of the current page is selected.
    pub fn is_row_selected(&self, row: usize) -> bool {
        self.page_keys()
            .get(row)
            .is_some_and(|k| self.view.selected.contains(k))
    }

    /// Removes every selected record. The only destructive mutation.
    ///
    /// Fails with `EmptySelection` (state unchanged) when nothing is
    /// selected. On success the selection is cleared, any edit target whose
    /// record vanished is closed, and the page is re-clamped.
    pub fn delete_selected(&mut self) -> Result<Notice, GridError> {
        if self.view.selected.is_empty() {
            return Err(GridError::EmptySelection);
        }

        let doomed: HashSet<u64> = match self.config.selection_key {
            SelectionKey::Id => self.view.selected.iter().copied().collect(),
            SelectionKey::Position => {
                // Positions resolve against the visible sequence as it
                // stands right now; positions past its end select nothing.
                let rows = self.visible_sorted();
                self.view
                    .selected
                    .iter()
                    .filter_map(|&pos| rows.get(pos as usize).map(|rec| rec.id))
                    .collect()
            }
        };

        let before = self.records.len();
        self.records.retain(|rec| !doomed.contains(&rec.id));
        let deleted = before - self.records.len();

        let live: HashSet<u64> = self.records.iter().map(|r| r.id).collect();
        let total = page_count(self.visible_len(), self.config.page_size);
        self.view = self
            .view
            .with_selection_cleared()
            .pruned(&live)
            .with_page(self.view.page, total);

        debug!(deleted, remaining = self.records.len(), "deleted selection");
        Ok(Notice::Deleted(deleted))
    }

    /// Opens `(id, field)` for in-place editing. Only one edit target may
    /// be open; an already-open target is implicitly closed first, which
    /// under buffered commits discards its in-flight buffer.
    pub fn begin_edit(&mut self, id: u64, field: Field) -> Result<(), GridError> {
        if !field.editable() {
            return Err(GridError::InvalidField(field));
        }
        let Some(rec) = self.records.iter().find(|r| r.id == id) else {
            return Err(GridError::StaleReference { id });
        };
        let value = rec.value_of(field).to_string();
        self.view = self.view.with_edit(Some(EditTarget {
            id,
            field,
            buffer: value.clone(),
            original: value,
        }));
        Ok(())
    }

    /// Appends one keystroke to the open edit. Under immediate commits the
    /// keystroke is also written through to the record.
    pub fn edit_input(&mut self, ch: char) -> Result<(), GridError> {
        self.edit_mutate(|buffer| buffer.push(ch))
    }

    /// Removes the last character of the open edit.
    pub fn edit_backspace(&mut self) -> Result<(), GridError> {
        self.edit_mutate(|buffer| {
            buffer.pop();
        })
    }

    fn edit_mutate(&mut self, apply: impl FnOnce(&mut String)) -> Result<(), GridError> {
        let Some(mut edit) = self.view.edit.clone() else {
            return Ok(());
        };
        apply(&mut edit.buffer);
        if self.config.edit_commit == EditCommit::Immediate {
            self.write_field(edit.id, edit.field, &edit.buffer)?;
        }
        self.view = self.view.with_edit(Some(edit));
        Ok(())
    }

    /// Confirms the open edit: writes the buffer into the record and closes
    /// the edit target. Returns `None` when no edit is open.
    pub fn commit_edit(&mut self) -> Result<Option<Notice>, GridError> {
        let Some(edit) = self.view.edit.clone() else {
            return Ok(None);
        };
        self.write_field(edit.id, edit.field, &edit.buffer)?;
        self.view = self.view.with_edit(None);
        debug!(id = edit.id, field = %edit.field, "edit committed");
        Ok(Some(Notice::EditSaved))
    }

    /// One-shot edit: validates and overwrites `field` on record `id`,
    /// equivalent to begin/commit with the given value. Closes an open
    /// edit target on the same cell so its buffer cannot go stale.
    pub fn apply_edit(&mut self, id: u64, field: Field, value: &str) -> Result<Notice, GridError> {
        if !field.editable() {
            return Err(GridError::InvalidField(field));
        }
        if !self.is_live(id) {
            return Err(GridError::StaleReference { id });
        }
        self.write_field(id, field, value)?;
        if self
            .view
            .edit
            .as_ref()
            .is_some_and(|edit| edit.id == id && edit.field == field)
        {
            self.view = self.view.with_edit(None);
        }
        Ok(Notice::EditSaved)
    }

    /// Discards the open edit. Under buffered commits the record was never
    /// touched; under immediate commits the keystrokes already written stay
    /// written.
    pub fn cancel_edit(&mut self) {
        self.view = self.view.with_edit(None);
    }

    /// CSV over the filtered set, in filter order, ignoring sort and page.
    pub fn export_rows(&self) -> Result<String, csv::Error> {
        let rows = filter_records(&self.records, &self.view.filters);
        export::to_csv(rows)
    }

    /// Distinct non-empty values of a column, in first-occurrence order.
    pub fn distinct_values(&self, field: Field) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|rec| rec.value_of(field))
            .filter(|v| !v.is_empty() && seen.insert(v.to_string()))
            .map(str::to_string)
            .collect()
    }

    fn is_live(&self, id: u64) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    fn write_field(&mut self, id: u64, field: Field, value: &str) -> Result<(), GridError> {
        let Some(rec) = self.records.iter_mut().find(|r| r.id == id) else {
            warn!(id, "edit target went stale");
            self.view = self.view.with_edit(None);
            return Err(GridError::StaleReference { id });
        };
        let slot = match field {
            Field::Name => &mut rec.name,
            Field::Email => &mut rec.email,
            Field::Role => &mut rec.role,
            Field::Department => &mut rec.department,
            Field::Location => &mut rec.location,
            // begin_edit rejects these before a target can open.
            Field::JoinedDate | Field::Manager => {
                return Err(GridError::InvalidField(field));
            }
        };
        *slot = value.to_string();
        Ok(())
    }

    fn visible_len(&self) -> usize {
        filter_records(&self.records, &self.view.filters).len()
    }

    fn visible_sorted(&self) -> Vec<&Employee> {
        let mut rows = filter_records(&self.records, &self.view.filters);
        sort_rows(&mut rows, self.view.sort);
        rows
    }

    /// Selection keys of the current page's rows, per the configured
    /// keying.
    fn page_keys(&self) -> Vec<u64> {
        let view = self.compute_view();
        let offset = (view.page - 1) * self.config.page_size;
        view.rows
            .iter()
            .enumerate()
            .map(|(i, rec)| match self.config.selection_key {
                SelectionKey::Id => rec.id,
                SelectionKey::Position => (offset + i) as u64,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EmployeeDetails;

    fn emp(id: u64, name: &str, role: &str) -> Employee {
        Employee {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            role: role.to_string(),
            department: "Engineering".to_string(),
            location: "Berlin".to_string(),
            joined_date: "2021-05-14T00:00:00".to_string(),
            details: EmployeeDetails {
                manager: "Priya Nair".to_string(),
                ..EmployeeDetails::default()
            },
        }
    }

    fn seed() -> Vec<Employee> {
        vec![
            emp(1, "Alice", "Developer"),
            emp(2, "Bob", "Designer"),
            emp(3, "Ann", "Developer"),
        ]
    }

    fn engine() -> GridEngine {
        GridEngine::new(seed(), GridConfig::default())
    }

    fn names(view: &GridView) -> Vec<String> {
        view.rows.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn scenario_filter_sort_toggle_delete() {
        let mut eng = engine();

        eng.set_filter(Field::Role, "Developer");
        assert_eq!(names(&eng.compute_view()), ["Alice", "Ann"]);

        // First activation sorts ascending: "alice" < "ann".
        eng.set_sort(Field::Name);
        assert_eq!(names(&eng.compute_view()), ["Alice", "Ann"]);

        eng.set_sort(Field::Name);
        assert_eq!(names(&eng.compute_view()), ["Ann", "Alice"]);

        eng.toggle_select(1).expect("id 1 is live");
        let notice = eng.delete_selected().expect("selection non-empty");
        assert_eq!(notice, Notice::Deleted(1));
        let remaining: Vec<&str> = eng.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(remaining, ["Bob", "Ann"]);
        assert!(eng.state().selected.is_empty());
    }

    #[test]
    fn filters_are_conjunctive_and_case_insensitive() {
        let mut eng = engine();
        eng.set_filter(Field::Role, "dev");
        eng.set_filter(Field::Name, "AL");
        assert_eq!(names(&eng.compute_view()), ["Alice"]);

        // Clearing one constraint widens the set again.
        eng.set_filter(Field::Name, "");
        assert_eq!(names(&eng.compute_view()), ["Alice", "Ann"]);
    }

    #[test]
    fn joined_date_filter_matches_exact_day_only() {
        let mut records = seed();
        records[1].joined_date = "2019-11-02T08:30:00".to_string();
        let mut eng = GridEngine::new(records, GridConfig::default());

        eng.set_filter(Field::JoinedDate, "2019-11-02");
        assert_eq!(names(&eng.compute_view()), ["Bob"]);

        eng.set_filter(Field::JoinedDate, "2019-11-03");
        assert!(eng.compute_view().is_empty());

        // Unparseable filter value matches nothing.
        eng.set_filter(Field::JoinedDate, "not-a-date");
        assert!(eng.compute_view().is_empty());
    }

    #[test]
    fn missing_values_filter_as_empty_and_sort_low() {
        let mut records = seed();
        records[2].role = String::new();
        let mut eng = GridEngine::new(records, GridConfig::default());

        eng.set_filter(Field::Role, "e");
        assert_eq!(names(&eng.compute_view()), ["Alice", "Bob"]);
        eng.set_filter(Field::Role, "");

        eng.set_sort(Field::Role);
        assert_eq!(names(&eng.compute_view()), ["Ann", "Bob", "Alice"]);
    }

    #[test]
    fn sort_is_stable_for_duplicate_keys() {
        let records = vec![
            emp(1, "Zoe", "Developer"),
            emp(2, "Amy", "Designer"),
            emp(3, "Max", "Developer"),
            emp(4, "Ida", "Developer"),
        ];
        let mut eng = GridEngine::new(records, GridConfig::default());
        eng.set_sort(Field::Role);
        // Designer < Developer; the three Developers keep source order.
        assert_eq!(names(&eng.compute_view()), ["Amy", "Zoe", "Max", "Ida"]);

        eng.set_sort(Field::Role);
        assert_eq!(names(&eng.compute_view()), ["Zoe", "Max", "Ida", "Amy"]);
    }

    #[test]
    fn pages_concatenate_to_the_full_visible_sequence() {
        let records: Vec<Employee> = (1..=23)
            .map(|i| emp(i, &format!("Emp{i:02}"), "Developer"))
            .collect();
        let mut eng = GridEngine::new(records, GridConfig::default());
        eng.set_sort(Field::Name);

        let mut collected = Vec::new();
        let total = eng.compute_view().total_pages;
        assert_eq!(total, 3);
        for page in 1..=total {
            eng.set_page(page);
            let view = eng.compute_view();
            assert!(view.rows.len() <= DEFAULT_PAGE_SIZE);
            collected.extend(names(&view));
        }

        let mut expected: Vec<String> = (1..=23).map(|i| format!("Emp{i:02}")).collect();
        expected.sort();
        assert_eq!(collected, expected);
    }

    #[test]
    fn page_is_clamped_when_the_visible_set_shrinks() {
        let records: Vec<Employee> = (1..=23)
            .map(|i| emp(i, &format!("Emp{i:02}"), "Developer"))
            .collect();
        let mut eng = GridEngine::new(records, GridConfig::default());

        eng.set_page(3);
        assert_eq!(eng.compute_view().page, 3);

        // Filtering resets to page 1.
        eng.set_filter(Field::Name, "Emp0");
        assert_eq!(eng.state().page, 1);
        eng.set_filter(Field::Name, "");

        // Deleting the back page clamps the page number.
        eng.set_page(3);
        for id in 15..=23 {
            eng.toggle_select(id).expect("live");
        }
        eng.delete_selected().expect("non-empty");
        assert_eq!(eng.compute_view().page, 2);

        // Out-of-range requests clamp instead of failing.
        eng.set_page(99);
        assert_eq!(eng.state().page, 2);
        eng.set_page(0);
        assert_eq!(eng.state().page, 1);
    }

    #[test]
    fn empty_visible_set_reports_no_data() {
        let mut eng = engine();
        eng.set_filter(Field::Name, "zzz");
        let view = eng.compute_view();
        assert!(view.is_empty());
        assert!(view.rows.is_empty());
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.page, 1);
    }

    #[test]
    fn selection_survives_refilter() {
        let mut eng = engine();
        eng.toggle_select(1).expect("live");
        eng.toggle_select(3).expect("live");

        eng.set_filter(Field::Name, "Bob");
        assert_eq!(names(&eng.compute_view()), ["Bob"]);
        assert!(eng.state().selected.contains(&1));
        assert!(eng.state().selected.contains(&3));

        eng.set_filter(Field::Name, "");
        assert_eq!(
            eng.state().selected.iter().copied().collect::<Vec<_>>(),
            [1, 3]
        );
    }

    #[test]
    fn delete_with_empty_selection_is_a_warning_not_a_mutation() {
        let mut eng = engine();
        assert_eq!(eng.delete_selected(), Err(GridError::EmptySelection));
        assert_eq!(eng.records().len(), 3);
    }

    #[test]
    fn toggle_select_rejects_stale_ids() {
        let mut eng = engine();
        assert_eq!(
            eng.toggle_select(99),
            Err(GridError::StaleReference { id: 99 })
        );
        assert!(eng.state().selected.is_empty());
    }

    #[test]
    fn select_all_visible_is_scoped_to_the_current_page() {
        let records: Vec<Employee> = (1..=15)
            .map(|i| emp(i, &format!("Emp{i:02}"), "Developer"))
            .collect();
        let mut eng = GridEngine::new(records, GridConfig::default());

        // Select a row on page 2, then select-all on page 1.
        eng.set_page(2);
        eng.toggle_select_visible(0);
        eng.set_page(1);
        eng.select_all_visible();
        assert!(eng.page_fully_selected());
        assert_eq!(eng.state().selected.len(), 11);

        // Deselect-all on page 1 keeps the page-2 selection.
        eng.deselect_all_visible();
        assert_eq!(
            eng.state().selected.iter().copied().collect::<Vec<_>>(),
            [11]
        );
    }

    #[test]
    fn deleting_prunes_selection_and_closes_stale_edit() {
        let mut eng = engine();
        eng.begin_edit(1, Field::Name).expect("editable");
        eng.toggle_select(1).expect("live");
        eng.delete_selected().expect("non-empty");

        assert!(eng.state().selected.is_empty());
        assert!(eng.state().edit.is_none());
        assert!(eng.records().iter().all(|r| r.id != 1));
    }

    #[test]
    fn begin_edit_validates_field_and_id() {
        let mut eng = engine();
        assert_eq!(
            eng.begin_edit(1, Field::JoinedDate),
            Err(GridError::InvalidField(Field::JoinedDate))
        );
        assert_eq!(
            eng.begin_edit(1, Field::Manager),
            Err(GridError::InvalidField(Field::Manager))
        );
        assert_eq!(
            eng.begin_edit(42, Field::Name),
            Err(GridError::StaleReference { id: 42 })
        );
        assert!(eng.state().edit.is_none());
    }

    #[test]
    fn apply_edit_writes_directly_and_closes_a_matching_target() {
        let mut eng = engine();
        assert_eq!(
            eng.apply_edit(1, Field::JoinedDate, "2024-01-01"),
            Err(GridError::InvalidField(Field::JoinedDate))
        );
        assert_eq!(
            eng.apply_edit(42, Field::Name, "Nobody"),
            Err(GridError::StaleReference { id: 42 })
        );

        eng.begin_edit(2, Field::Role).expect("editable");
        let notice = eng.apply_edit(2, Field::Role, "Lead Designer");
        assert_eq!(notice, Ok(Notice::EditSaved));
        assert_eq!(eng.records()[1].role, "Lead Designer");
        assert!(eng.state().edit.is_none());
    }

    #[test]
    fn buffered_edit_commits_on_confirm_only() {
        let mut eng = engine();
        eng.begin_edit(2, Field::Role).expect("editable");
        for ch in "!".chars() {
            eng.edit_input(ch).expect("edit open");
        }
        // Record untouched until commit.
        assert_eq!(eng.records()[1].role, "Designer");

        let notice = eng.commit_edit().expect("target live");
        assert_eq!(notice, Some(Notice::EditSaved));
        assert_eq!(eng.records()[1].role, "Designer!");
        assert!(eng.state().edit.is_none());
    }

    #[test]
    fn buffered_cancel_restores_the_pre_edit_value() {
        let mut eng = engine();
        eng.begin_edit(2, Field::Role).expect("editable");
        eng.edit_backspace().expect("edit open");
        eng.edit_input('X').expect("edit open");
        eng.cancel_edit();
        assert_eq!(eng.records()[1].role, "Designer");
        assert!(eng.state().edit.is_none());
    }

    #[test]
    fn immediate_mode_writes_through_and_cancel_cannot_restore() {
        let config = GridConfig {
            edit_commit: EditCommit::Immediate,
            ..GridConfig::default()
        };
        let mut eng = GridEngine::new(seed(), config);
        eng.begin_edit(2, Field::Role).expect("editable");
        eng.edit_input('!').expect("edit open");
        assert_eq!(eng.records()[1].role, "Designer!");

        eng.cancel_edit();
        assert_eq!(eng.records()[1].role, "Designer!");
    }

    #[test]
    fn opening_a_second_edit_implicitly_closes_the_first() {
        let mut eng = engine();
        eng.begin_edit(1, Field::Name).expect("editable");
        eng.edit_input('X').expect("edit open");
        eng.begin_edit(2, Field::Email).expect("editable");

        let edit = eng.state().edit.as_ref().expect("second target open");
        assert_eq!((edit.id, edit.field), (2, Field::Email));
        // The abandoned buffer never reached the record.
        assert_eq!(eng.records()[0].name, "Alice");
    }

    #[test]
    fn position_keyed_selection_retargets_after_refilter() {
        let config = GridConfig {
            selection_key: SelectionKey::Position,
            ..GridConfig::default()
        };
        let mut eng = GridEngine::new(seed(), config);

        // Select visible row 0 (Alice), then filter so row 0 is Bob.
        eng.toggle_select_visible(0);
        eng.set_filter(Field::Name, "Bob");
        eng.delete_selected().expect("non-empty");

        // The position key deleted whoever sat at row 0, not Alice.
        let remaining: Vec<&str> = eng.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(remaining, ["Alice", "Ann"]);
    }

    #[test]
    fn export_covers_the_filtered_set_regardless_of_sort_and_page() {
        let records: Vec<Employee> = (1..=15)
            .map(|i| emp(i, &format!("Emp{i:02}"), "Developer"))
            .collect();
        let mut eng = GridEngine::new(records, GridConfig::default());
        eng.set_sort(Field::Name);
        eng.set_sort(Field::Name); // descending
        eng.set_page(2);
        eng.set_filter(Field::Name, "Emp1");

        let csv = eng.export_rows().expect("export");
        let lines: Vec<&str> = csv.lines().collect();
        // Header + Emp10..Emp15, in filter (source) order despite the sort.
        assert_eq!(lines.len(), 1 + 6);
        assert!(lines[1].contains("\"Emp10\""));
        assert!(lines[6].contains("\"Emp15\""));
    }

    #[test]
    fn distinct_values_keep_first_occurrence_order() {
        let eng = engine();
        assert_eq!(eng.distinct_values(Field::Role), ["Developer", "Designer"]);
    }

    #[test]
    fn compute_view_is_a_pure_projection() {
        let mut eng = engine();
        eng.set_filter(Field::Role, "Developer");
        eng.set_sort(Field::Name);
        let snapshot = eng.state().clone();

        let a = names(&eng.compute_view());
        let b = names(&eng.compute_view());
        assert_eq!(a, b);
        assert_eq!(eng.state(), &snapshot);
    }
}
