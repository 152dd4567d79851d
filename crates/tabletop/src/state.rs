//! Table state aggregate and paging math.
//!
//! [`TableState`] is the single snapshot a store hands to its subscribers:
//! ground-truth rows, the filtered view, the current page window, the
//! selection, and the pending undo slot. All derived-field arithmetic lives
//! here so every store operation computes windows the same way.

use crate::row::{Row, RowId};

/// Number of rows shown per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    /// 10 rows per page.
    #[default]
    Ten,
    /// 25 rows per page.
    TwentyFive,
    /// 50 rows per page.
    Fifty,
    /// 100 rows per page.
    Hundred,
}

impl PageSize {
    /// Sizes offered to the view by default.
    pub const DEFAULT_SET: [Self; 3] = [Self::Ten, Self::TwentyFive, Self::Hundred];

    /// Returns the numeric page size.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        match self {
            Self::Ten => 10,
            Self::TwentyFive => 25,
            Self::Fifty => 50,
            Self::Hundred => 100,
        }
    }

    /// Returns the variant for a numeric size, if it is a supported value.
    #[must_use]
    pub const fn from_usize(n: usize) -> Option<Self> {
        match n {
            10 => Some(Self::Ten),
            25 => Some(Self::TwentyFive),
            50 => Some(Self::Fifty),
            100 => Some(Self::Hundred),
            _ => None,
        }
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_usize())
    }
}

/// Kind of a pending undoable action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Selected rows were removed.
    Delete,
    /// The whole table was cleared.
    DeleteAll,
}

/// Recorded state for a single undoable action.
///
/// The snapshot holds the full pre-action rows and selection, so undo
/// restores exactly the state immediately prior. There is one slot: a new
/// delete overwrites whatever was pending.
#[derive(Debug, Clone)]
pub struct PendingAction<R> {
    /// What produced this snapshot.
    pub kind: ActionKind,
    pub(crate) data: Vec<R>,
    pub(crate) items: Vec<R>,
    pub(crate) selected_rows: Vec<RowId>,
}

impl<R> PendingAction<R> {
    /// The selection as it stood immediately before the action.
    #[must_use]
    pub fn selected_rows(&self) -> &[RowId] {
        &self.selected_rows
    }
}

/// Complete table state snapshot.
///
/// `page_items` is always exactly `items[page_start..page_end]` after an
/// operation completes, except that page sorting reorders it in place.
#[derive(Debug, Clone)]
pub struct TableState<R> {
    /// Pending undoable action, if any.
    pub action: Option<PendingAction<R>>,
    /// Select-all checkbox value: `Some(false)` for no selection,
    /// `Some(true)` when the selection fills a whole page, `None` when
    /// partial.
    pub all_selected: Option<bool>,
    /// Current page index (zero-based).
    pub current_page: usize,
    /// Ground-truth rows; filters re-apply against this, and only delete
    /// operations mutate it.
    pub data: Vec<R>,
    /// Rows after the current filter; a subsequence of `data`.
    pub items: Vec<R>,
    /// Highest valid page index.
    pub last_page: usize,
    /// End of the page window (exclusive index into `items`).
    pub page_end: usize,
    /// Rows visible on the current page.
    pub page_items: Vec<R>,
    /// Rows per page.
    pub page_size: PageSize,
    /// Page sizes offered to the view.
    pub page_sizes: Vec<PageSize>,
    /// Start of the page window (inclusive index into `items`).
    pub page_start: usize,
    /// Identifiers selected on the current page, kept sorted.
    pub selected_rows: Vec<RowId>,
}

impl<R> Default for TableState<R> {
    fn default() -> Self {
        Self {
            action: None,
            all_selected: Some(false),
            current_page: 0,
            data: Vec::new(),
            items: Vec::new(),
            last_page: 0,
            page_end: 0,
            page_items: Vec::new(),
            page_size: PageSize::default(),
            page_sizes: PageSize::DEFAULT_SET.to_vec(),
            page_start: 0,
            selected_rows: Vec::new(),
        }
    }
}

impl<R: Row> TableState<R> {
    /// Returns whether no data has been loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns whether an undoable action is pending.
    #[must_use]
    pub fn has_pending_action(&self) -> bool {
        self.action.is_some()
    }
}

/// Partial state patch for [`TableStore::update`](crate::store::TableStore::update).
///
/// Only the fields that are `Some` are merged; the pending-action slot and
/// the derived select-all flag are managed by the store alone and cannot be
/// patched.
#[derive(Debug, Clone)]
pub struct StateUpdate<R> {
    /// Replaces the current page index.
    pub current_page: Option<usize>,
    /// Replaces the ground-truth rows.
    pub data: Option<Vec<R>>,
    /// Replaces the filtered rows.
    pub items: Option<Vec<R>>,
    /// Replaces the last page index.
    pub last_page: Option<usize>,
    /// Replaces the window end.
    pub page_end: Option<usize>,
    /// Replaces the visible rows.
    pub page_items: Option<Vec<R>>,
    /// Replaces the page size.
    pub page_size: Option<PageSize>,
    /// Replaces the offered page sizes.
    pub page_sizes: Option<Vec<PageSize>>,
    /// Replaces the window start.
    pub page_start: Option<usize>,
    /// Replaces the selection.
    pub selected_rows: Option<Vec<RowId>>,
}

impl<R> Default for StateUpdate<R> {
    fn default() -> Self {
        Self {
            current_page: None,
            data: None,
            items: None,
            last_page: None,
            page_end: None,
            page_items: None,
            page_size: None,
            page_sizes: None,
            page_start: None,
            selected_rows: None,
        }
    }
}

impl<R> StateUpdate<R> {
    /// Returns whether the patch carries no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current_page.is_none()
            && self.data.is_none()
            && self.items.is_none()
            && self.last_page.is_none()
            && self.page_end.is_none()
            && self.page_items.is_none()
            && self.page_size.is_none()
            && self.page_sizes.is_none()
            && self.page_start.is_none()
            && self.selected_rows.is_none()
    }
}

/// Highest valid zero-based page index for `len` items.
pub(crate) fn last_page_for(len: usize, page_size: PageSize) -> usize {
    len.div_ceil(page_size.as_usize()).saturating_sub(1)
}

/// Clamped half-open window into a list of `len` items.
///
/// `page_start` may point past the end after a shrinking operation; the
/// window is clamped so `start <= end <= len` always holds.
pub(crate) fn page_window(page_start: usize, page_size: PageSize, len: usize) -> (usize, usize) {
    let start = page_start.min(len);
    let end = (start + page_size.as_usize()).min(len);
    (start, end)
}

/// Select-all checkbox value for a selection of `selected` rows.
pub(crate) fn select_all_state(selected: usize, page_size: PageSize) -> Option<bool> {
    if selected == 0 {
        return Some(false);
    }
    if selected == page_size.as_usize() {
        return Some(true);
    }
    None
}
