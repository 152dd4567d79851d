#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::doc_markdown)]
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Tabletop
//!
//! An observable state store for data tables.
//!
//! A [`TableStore`] holds the full dataset, the filtered view, the current
//! page window, the selection, and a single-slot undo snapshot. Views
//! subscribe for state changes and call the operation set in response to
//! user gestures:
//!
//! - **paging** — [`TableStore::goto_page`], [`TableStore::set_page_size`]
//! - **filtering** — [`TableStore::filter_data`] (case-sensitive substring)
//! - **page sorting** — [`TableStore::sort_page_items`] (visible page only)
//! - **selection** — [`TableStore::select_rows`],
//!   [`TableStore::toggle_selected_row`],
//!   [`TableStore::toggle_selected_all_rows`]
//! - **undoable deletes** — [`TableStore::delete`],
//!   [`TableStore::delete_all`], [`TableStore::undo_action`]
//!
//! Stores are plain values; create as many independent tables as needed.
//! All edge cases (paging past the end, filtering an empty table, undoing
//! with nothing pending) are absorbed by clamping or no-ops — no operation
//! fails once its arguments typecheck.

pub mod row;
pub mod state;
pub mod store;

pub use row::{Row, RowId, SortDirection, SortValue};
pub use state::{ActionKind, PageSize, PendingAction, StateUpdate, TableState};
pub use store::{SubscriptionId, TableStore};

#[cfg(test)]
pub(crate) mod test_fixtures {
    use crate::row::{Row, SortValue};

    /// Simple row used across the unit tests.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Task {
        pub id: String,
        pub title: String,
        pub priority: u32,
    }

    impl Task {
        pub fn new(id: usize, title: &str, priority: u32) -> Self {
            Self {
                id: id.to_string(),
                title: title.to_string(),
                priority,
            }
        }

        pub fn titled(id: usize, title: &str) -> Self {
            Self::new(id, title, 0)
        }
    }

    impl Row for Task {
        fn id(&self) -> &str {
            &self.id
        }

        fn filter_value(&self) -> &str {
            &self.title
        }

        fn sort_value(&self, field: &str) -> Option<SortValue> {
            match field {
                "id" => Some(SortValue::Text(self.id.clone())),
                "title" => Some(SortValue::Text(self.title.clone())),
                "priority" => Some(SortValue::Number(f64::from(self.priority))),
                _ => None,
            }
        }
    }

    /// Rows with ids `0..n` and titles `task 00`, `task 01`, ...
    pub fn numbered(n: usize) -> Vec<Task> {
        (0..n)
            .map(|i| Task::new(i, &format!("task {i:02}"), (i % 5) as u32))
            .collect()
    }

    /// Identifier list of a row slice, for order-sensitive assertions.
    pub fn ids(rows: &[Task]) -> Vec<String> {
        rows.iter().map(|row| row.id.clone()).collect()
    }
}
