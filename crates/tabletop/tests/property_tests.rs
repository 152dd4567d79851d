use proptest::prelude::*;
use tabletop::{PageSize, Row, SortValue, TableStore};

#[derive(Debug, Clone, PartialEq)]
struct Item {
    id: String,
    title: String,
}

impl Row for Item {
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
            _ => None,
        }
    }
}

fn rows(n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| Item {
            id: i.to_string(),
            title: format!("row {i:03}"),
        })
        .collect()
}

fn page_sizes() -> impl Strategy<Value = PageSize> {
    prop_oneof![
        Just(PageSize::Ten),
        Just(PageSize::TwentyFive),
        Just(PageSize::Fifty),
        Just(PageSize::Hundred),
    ]
}

proptest! {
    #[test]
    fn test_window_invariants(
        n in 1usize..500,
        size in page_sizes(),
        page in 0usize..100, // deliberately larger than the page count
    ) {
        let store = TableStore::new();
        store.init(rows(n), Some(size), None);
        store.goto_page(page);
        let state = store.snapshot();

        prop_assert_eq!(state.last_page, n.div_ceil(size.as_usize()).saturating_sub(1));
        prop_assert!(state.current_page <= state.last_page);
        prop_assert!(state.page_start <= state.page_end);
        prop_assert!(state.page_end <= state.items.len());
        prop_assert!(state.page_end - state.page_start <= size.as_usize());
        prop_assert_eq!(
            &state.page_items[..],
            &state.items[state.page_start..state.page_end]
        );
        prop_assert!(state.selected_rows.is_empty());
    }

    #[test]
    fn test_goto_page_is_idempotent(n in 1usize..300, page in 0usize..50) {
        let store = TableStore::new();
        store.init(rows(n), None, None);
        store.goto_page(page);
        let first = store.snapshot();
        store.goto_page(page);
        let second = store.snapshot();

        prop_assert_eq!(first.current_page, second.current_page);
        prop_assert_eq!(first.page_start, second.page_start);
        prop_assert_eq!(first.page_end, second.page_end);
        prop_assert_eq!(first.page_items, second.page_items);
    }

    #[test]
    fn test_filter_yields_matching_subsequence(n in 1usize..300, query in "[0-9]{0,2}") {
        let store = TableStore::new();
        store.init(rows(n), None, None);
        store.filter_data(&query);
        let state = store.snapshot();

        prop_assert!(state.items.len() <= state.data.len());
        prop_assert!(state.items.iter().all(|row| row.title.contains(query.as_str())));
        prop_assert_eq!(
            state.last_page,
            state.items.len().div_ceil(state.page_size.as_usize()).saturating_sub(1)
        );

        // Clearing the filter restores the full ground truth.
        store.filter_data("");
        prop_assert_eq!(store.snapshot().items.len(), n);
    }

    #[test]
    fn test_delete_undo_round_trip(n in 1usize..200, page in 0usize..30, k in 1usize..10) {
        let store = TableStore::new();
        store.init(rows(n), None, None);
        store.goto_page(page);

        let picked: Vec<String> = store
            .snapshot()
            .page_items
            .iter()
            .take(k)
            .map(|row| row.id.clone())
            .collect();
        store.select_rows(picked.clone());
        let before = store.snapshot();

        store.delete();
        let deleted = store.snapshot();
        prop_assert_eq!(deleted.items.len(), n - picked.len());
        prop_assert!(deleted.items.iter().all(|row| !picked.contains(&row.id)));
        prop_assert!(deleted.selected_rows.is_empty());

        store.undo_action();
        let after = store.snapshot();
        prop_assert_eq!(&after.items, &before.items);
        prop_assert_eq!(&after.page_items, &before.page_items);
        prop_assert_eq!(&after.selected_rows, &before.selected_rows);
        prop_assert!(!after.has_pending_action());
    }
}
