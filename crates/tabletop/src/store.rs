//! Subscribable table state store.
//!
//! [`TableStore`] owns a [`TableState`] and exposes the operations that
//! transform it: loading rows, paging, filtering, page-scoped sorting,
//! selection, and undoable deletes. Each operation computes the next state
//! from the current one, replaces the snapshot atomically, and notifies
//! subscribers in subscription order. Operations with nothing to do leave
//! the state untouched and notify nobody.
//!
//! # Example
//!
//! ```rust
//! use tabletop::row::{Row, SortValue};
//! use tabletop::store::TableStore;
//!
//! #[derive(Clone)]
//! struct Task {
//!     id: String,
//!     title: String,
//! }
//!
//! impl Row for Task {
//!     fn id(&self) -> &str {
//!         &self.id
//!     }
//!
//!     fn filter_value(&self) -> &str {
//!         &self.title
//!     }
//!
//!     fn sort_value(&self, field: &str) -> Option<SortValue> {
//!         match field {
//!             "title" => Some(SortValue::Text(self.title.clone())),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let store = TableStore::new();
//! store.init(
//!     vec![
//!         Task { id: "1".into(), title: "Buy milk".into() },
//!         Task { id: "2".into(), title: "Walk dog".into() },
//!     ],
//!     None,
//!     None,
//! );
//! store.filter_data("milk");
//! assert_eq!(store.snapshot().items.len(), 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::row::{Row, RowId, SortDirection, compare_values};
use crate::state::{
    ActionKind, PageSize, PendingAction, StateUpdate, TableState, last_page_for, page_window,
    select_all_state,
};

/// Handle returned by [`TableStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<R> = Box<dyn Fn(&TableState<R>) + Send>;

struct Subscriber<R> {
    id: SubscriptionId,
    callback: Callback<R>,
}

/// Observable state container for a single table.
///
/// Construct one store per table; there is no process-wide instance.
/// Subscriber callbacks run outside the state lock but must not call back
/// into the store that invoked them.
pub struct TableStore<R: Row> {
    state: RwLock<TableState<R>>,
    subscribers: Mutex<Vec<Subscriber<R>>>,
    next_subscriber: AtomicU64,
}

impl<R: Row> Default for TableStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Row> TableStore<R> {
    /// Creates a store holding the default empty state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(TableState::default()),
            subscribers: Mutex::new(Vec::new()),
            next_subscriber: AtomicU64::new(0),
        }
    }

    /// Returns a clone of the current state.
    #[must_use]
    pub fn snapshot(&self) -> TableState<R> {
        self.state.read().clone()
    }

    /// Registers a callback invoked with the current snapshot immediately,
    /// then once after every state change, in subscription order.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&TableState<R>) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscriber.fetch_add(1, AtomicOrdering::Relaxed));
        let snapshot = self.snapshot();
        callback(&snapshot);
        self.subscribers.lock().push(Subscriber {
            id,
            callback: Box::new(callback),
        });
        id
    }

    /// Removes a subscriber. Unknown handles are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.lock().retain(|s| s.id != id);
    }

    /// Applies a transition and notifies subscribers if it produced a new
    /// state.
    fn apply<F>(&self, transition: F)
    where
        F: FnOnce(&TableState<R>) -> Option<TableState<R>>,
    {
        let snapshot = {
            let mut state = self.state.write();
            let Some(next) = transition(&state) else {
                return;
            };
            *state = next;
            state.clone()
        };
        for subscriber in self.subscribers.lock().iter() {
            (subscriber.callback)(&snapshot);
        }
    }

    /// Loads `rows` into the store.
    ///
    /// The current page position is kept, clamped against the new row
    /// count, so a reload lands the reader where they were. Selection and
    /// any pending action reset. Empty input is a no-op, which lets a
    /// failed fetch leave previously loaded rows in place.
    pub fn init(
        &self,
        rows: Vec<R>,
        page_size: Option<PageSize>,
        page_sizes: Option<Vec<PageSize>>,
    ) {
        if rows.is_empty() {
            return;
        }
        self.apply(|state| {
            let page_size = page_size.unwrap_or(state.page_size);
            let page_sizes = page_sizes.unwrap_or_else(|| state.page_sizes.clone());
            let items = rows.clone();
            let last_page = last_page_for(items.len(), page_size);
            let current_page = state.current_page.min(last_page);
            let (page_start, page_end) =
                page_window(current_page * page_size.as_usize(), page_size, items.len());
            let page_items = items[page_start..page_end].to_vec();
            debug!(
                rows = items.len(),
                page_size = %page_size,
                current_page,
                last_page,
                "init"
            );
            Some(TableState {
                action: None,
                all_selected: Some(false),
                current_page,
                data: rows,
                items,
                last_page,
                page_end,
                page_items,
                page_size,
                page_sizes,
                page_start,
                selected_rows: Vec::new(),
            })
        });
    }

    /// Merges the given fields into the state verbatim.
    ///
    /// No derived fields are recomputed; this is the raw escape hatch for
    /// view layers that manage part of the state themselves. An empty patch
    /// is a no-op.
    pub fn update(&self, patch: StateUpdate<R>) {
        if patch.is_empty() {
            return;
        }
        self.apply(|state| {
            let mut next = state.clone();
            if let Some(current_page) = patch.current_page {
                next.current_page = current_page;
            }
            if let Some(data) = patch.data {
                next.data = data;
            }
            if let Some(items) = patch.items {
                next.items = items;
            }
            if let Some(last_page) = patch.last_page {
                next.last_page = last_page;
            }
            if let Some(page_end) = patch.page_end {
                next.page_end = page_end;
            }
            if let Some(page_items) = patch.page_items {
                next.page_items = page_items;
            }
            if let Some(page_size) = patch.page_size {
                next.page_size = page_size;
            }
            if let Some(page_sizes) = patch.page_sizes {
                next.page_sizes = page_sizes;
            }
            if let Some(page_start) = patch.page_start {
                next.page_start = page_start;
            }
            if let Some(selected_rows) = patch.selected_rows {
                next.selected_rows = selected_rows;
            }
            debug!("update");
            Some(next)
        });
    }

    /// Changes the page size.
    ///
    /// Recomputes the window end, last page, and visible rows from the
    /// existing `page_start`. `page_start` and `current_page` themselves
    /// are left alone, so the window can disagree with `current_page` until
    /// the next [`goto_page`](Self::goto_page).
    pub fn set_page_size(&self, size: PageSize) {
        self.apply(|state| {
            let (page_start, page_end) = page_window(state.page_start, size, state.items.len());
            let mut next = state.clone();
            next.page_size = size;
            next.page_start = page_start;
            next.page_end = page_end;
            next.last_page = last_page_for(state.items.len(), size);
            next.page_items = state.items[page_start..page_end].to_vec();
            debug!(page_size = %size, page_end, last_page = next.last_page, "set_page_size");
            Some(next)
        });
    }

    /// Filters the ground-truth rows by case-sensitive substring match on
    /// their filter value.
    ///
    /// An empty query matches every row. The window is recomputed from the
    /// existing `page_start`, clamped to the new item count. No-op while no
    /// data is loaded.
    pub fn filter_data(&self, query: &str) {
        self.apply(|state| {
            if state.data.is_empty() {
                return None;
            }
            let items: Vec<R> = state
                .data
                .iter()
                .filter(|row| row.filter_value().contains(query))
                .cloned()
                .collect();
            let (page_start, page_end) = page_window(state.page_start, state.page_size, items.len());
            let mut next = state.clone();
            next.last_page = last_page_for(items.len(), state.page_size);
            next.page_start = page_start;
            next.page_end = page_end;
            next.page_items = items[page_start..page_end].to_vec();
            next.items = items;
            debug!(query, items = next.items.len(), last_page = next.last_page, "filter_data");
            Some(next)
        });
    }

    /// Sorts the rows on the current page in place by the given field.
    ///
    /// The sort is page-scoped: `items` keeps its order, so the arrangement
    /// is lost on the next page change or filter. Two text values compare
    /// lexicographically; anything else compares numerically. No-op while
    /// the page is empty.
    pub fn sort_page_items(&self, field: &str, direction: SortDirection) {
        self.apply(|state| {
            if state.page_items.is_empty() {
                return None;
            }
            let mut next = state.clone();
            next.page_items.sort_by(|a, b| {
                let (first, second) = match direction {
                    SortDirection::Ascending => (a, b),
                    SortDirection::Descending => (b, a),
                };
                compare_values(
                    first.sort_value(field).as_ref(),
                    second.sort_value(field).as_ref(),
                )
            });
            debug!(field, ?direction, "sort_page_items");
            Some(next)
        });
    }

    /// Navigates to a page, clamping past-the-end indices to the last page.
    ///
    /// Always clears the selection. No-op while `items` is empty.
    pub fn goto_page(&self, index: usize) {
        self.apply(|state| {
            if state.items.is_empty() {
                return None;
            }
            let current_page = index.min(state.last_page);
            let (page_start, page_end) = page_window(
                current_page * state.page_size.as_usize(),
                state.page_size,
                state.items.len(),
            );
            let mut next = state.clone();
            next.all_selected = Some(false);
            next.current_page = current_page;
            next.page_start = page_start;
            next.page_end = page_end;
            next.page_items = state.items[page_start..page_end].to_vec();
            next.selected_rows = Vec::new();
            debug!(page = current_page, page_start, page_end, "goto_page");
            Some(next)
        });
    }

    /// Replaces the selection with the given identifiers.
    ///
    /// The input is truncated to at most one page worth of entries;
    /// identifiers not on the current page are dropped, and the rest are
    /// kept sorted and deduplicated.
    pub fn select_rows(&self, ids: Vec<RowId>) {
        self.apply(|state| {
            let mut ids = ids;
            ids.truncate(state.page_size.as_usize());
            let mut selected: Vec<RowId> = ids
                .into_iter()
                .filter(|id| state.page_items.iter().any(|row| row.id() == id.as_str()))
                .collect();
            selected.sort();
            selected.dedup();
            let mut next = state.clone();
            next.all_selected = select_all_state(selected.len(), state.page_size);
            next.selected_rows = selected;
            debug!(selected = next.selected_rows.len(), "select_rows");
            Some(next)
        });
    }

    /// Adds the identifier to the selection, or removes it if already
    /// selected.
    ///
    /// The set stays sorted. Adding an identifier that is not on the
    /// current page is a no-op.
    pub fn toggle_selected_row(&self, id: &str) {
        self.apply(|state| {
            let mut next = state.clone();
            match next.selected_rows.binary_search_by(|s| s.as_str().cmp(id)) {
                Ok(pos) => {
                    next.selected_rows.remove(pos);
                }
                Err(pos) => {
                    if !state.page_items.iter().any(|row| row.id() == id) {
                        return None;
                    }
                    next.selected_rows.insert(pos, id.to_string());
                }
            }
            next.all_selected = select_all_state(next.selected_rows.len(), state.page_size);
            debug!(id, selected = next.selected_rows.len(), "toggle_selected_row");
            Some(next)
        });
    }

    /// Selects every row on the current page, or clears the selection if it
    /// already covers the whole page.
    ///
    /// Calling it twice with no page change in between is the identity.
    /// No-op while the page is empty.
    pub fn toggle_selected_all_rows(&self) {
        self.apply(|state| {
            if state.page_items.is_empty() {
                return None;
            }
            let covered = state
                .page_items
                .iter()
                .all(|row| state.selected_rows.iter().any(|s| s.as_str() == row.id()));
            let mut selected: Vec<RowId> = if covered {
                Vec::new()
            } else {
                state
                    .page_items
                    .iter()
                    .map(|row| row.id().to_string())
                    .collect()
            };
            selected.sort();
            let mut next = state.clone();
            next.all_selected = select_all_state(selected.len(), state.page_size);
            next.selected_rows = selected;
            debug!(selected = next.selected_rows.len(), "toggle_selected_all_rows");
            Some(next)
        });
    }

    /// Removes every selected row from the ground truth and the filtered
    /// view, recording a snapshot so the removal can be undone.
    ///
    /// A second delete before [`undo_action`](Self::undo_action) overwrites
    /// the recorded snapshot. No-op when nothing is selected, so an idle
    /// delete gesture cannot clobber a pending undo.
    pub fn delete(&self) {
        self.apply(|state| {
            if state.selected_rows.is_empty() {
                return None;
            }
            let action = PendingAction {
                kind: ActionKind::Delete,
                data: state.data.clone(),
                items: state.items.clone(),
                selected_rows: state.selected_rows.clone(),
            };
            let data: Vec<R> = state
                .data
                .iter()
                .filter(|row| !is_selected(&state.selected_rows, row.id()))
                .cloned()
                .collect();
            let items: Vec<R> = state
                .items
                .iter()
                .filter(|row| !is_selected(&state.selected_rows, row.id()))
                .cloned()
                .collect();
            let (page_start, page_end) = page_window(state.page_start, state.page_size, items.len());
            let mut next = state.clone();
            next.action = Some(action);
            next.all_selected = Some(false);
            next.last_page = last_page_for(items.len(), state.page_size);
            next.page_start = page_start;
            next.page_end = page_end;
            next.page_items = items[page_start..page_end].to_vec();
            next.data = data;
            next.items = items;
            next.selected_rows = Vec::new();
            debug!(
                removed = state.selected_rows.len(),
                remaining = next.items.len(),
                "delete"
            );
            Some(next)
        });
    }

    /// Clears the whole table, recording a snapshot so the wipe can be
    /// undone.
    ///
    /// No-op while no data is loaded.
    pub fn delete_all(&self) {
        self.apply(|state| {
            if state.data.is_empty() {
                return None;
            }
            let action = PendingAction {
                kind: ActionKind::DeleteAll,
                data: state.data.clone(),
                items: state.items.clone(),
                selected_rows: state.selected_rows.clone(),
            };
            let mut next = state.clone();
            next.action = Some(action);
            next.all_selected = Some(false);
            next.data = Vec::new();
            next.items = Vec::new();
            next.last_page = 0;
            next.page_end = 0;
            next.page_items = Vec::new();
            next.page_start = 0;
            next.selected_rows = Vec::new();
            debug!(removed = state.data.len(), "delete_all");
            Some(next)
        });
    }

    /// Restores the state recorded by the last delete.
    ///
    /// For a row delete the prior selection comes back too; after undoing a
    /// full wipe the selection stays empty. The pending slot is cleared
    /// either way. Other operations never clear a pending action, so a
    /// stale undo can fire long after the gesture that recorded it. No-op
    /// when nothing is pending.
    pub fn undo_action(&self) {
        self.apply(|state| {
            let action = state.action.as_ref()?;
            let items = action.items.clone();
            let (page_start, page_end) = page_window(state.page_start, state.page_size, items.len());
            let mut next = state.clone();
            next.data = action.data.clone();
            next.last_page = last_page_for(items.len(), state.page_size);
            next.page_start = page_start;
            next.page_end = page_end;
            next.page_items = items[page_start..page_end].to_vec();
            next.items = items;
            match action.kind {
                ActionKind::Delete => {
                    next.all_selected = select_all_state(action.selected_rows.len(), state.page_size);
                    next.selected_rows = action.selected_rows.clone();
                }
                ActionKind::DeleteAll => {
                    next.all_selected = Some(false);
                    next.selected_rows = Vec::new();
                }
            }
            next.action = None;
            debug!(kind = ?action.kind, restored = next.items.len(), "undo_action");
            Some(next)
        });
    }

    /// Discards everything and returns to the default empty state.
    pub fn reset(&self) {
        self.apply(|_| {
            debug!("reset");
            Some(TableState::default())
        });
    }
}

/// Membership test against the sorted selection.
fn is_selected(selected: &[RowId], id: &str) -> bool {
    selected.binary_search_by(|s| s.as_str().cmp(id)).is_ok()
}
