//! End-to-end showcase: fetch rows, load a table store, walk it through its
//! operations, and print each page as it changes.

use anyhow::Result;
use clap::Parser;
use sideboard::{DataSource, Todo};
use tabletop::{PageSize, SortDirection, TableState, TableStore};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Walk a tabletop store through a scripted tour of its operations.
#[derive(Debug, Parser)]
#[command(name = "tabletop-demo", version, about)]
struct Cli {
    /// Remote JSON document to load rows from.
    #[arg(long, env = "TABLETOP_DATA_URL")]
    url: Option<String>,

    /// Rows per page (one of 10, 25, 50, 100).
    #[arg(long, default_value = "10", value_parser = parse_page_size)]
    page_size: PageSize,

    /// Substring filter applied to row titles after loading.
    #[arg(long)]
    filter: Option<String>,
}

fn parse_page_size(s: &str) -> Result<PageSize, String> {
    let n: usize = s.parse().map_err(|_| format!("invalid page size: {s}"))?;
    PageSize::from_usize(n).ok_or_else(|| format!("unsupported page size: {n}"))
}

fn print_page(state: &TableState<Todo>) {
    println!(
        "page {}/{} · rows {}..{} of {} · {} selected",
        state.current_page + 1,
        state.last_page + 1,
        state.page_start,
        state.page_end,
        state.items.len(),
        state.selected_rows.len()
    );
    for row in &state.page_items {
        let marker = if state.selected_rows.iter().any(|s| s == &row.id) {
            '*'
        } else {
            ' '
        };
        let done = if row.completed { 'x' } else { ' ' };
        println!("  {marker}[{done}] {:>4}  {}", row.id, row.title);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let source = match cli.url {
        Some(url) => DataSource::with_url(url),
        None => DataSource::new(),
    };

    let rows = source.fetch_data().await;
    if rows.is_empty() {
        println!("no rows loaded from {}", source.url());
        return Ok(());
    }
    println!("loaded {} rows from {}", rows.len(), source.url());

    let store = TableStore::new();
    let changes = store.subscribe(|state| {
        debug!(
            page = state.current_page,
            items = state.items.len(),
            selected = state.selected_rows.len(),
            "state changed"
        );
    });

    store.init(rows, Some(cli.page_size), None);

    if let Some(query) = cli.filter.as_deref() {
        store.filter_data(query);
        println!("\nfilter {query:?}:");
    }
    print_page(&store.snapshot());

    let last = store.snapshot().last_page;
    store.goto_page(last);
    println!("\nlast page:");
    print_page(&store.snapshot());

    store.goto_page(0);
    store.sort_page_items("title", SortDirection::Ascending);
    println!("\nfirst page, sorted by title:");
    print_page(&store.snapshot());

    store.toggle_selected_all_rows();
    println!("\nselect every row on the page:");
    print_page(&store.snapshot());

    store.delete();
    println!("\ndelete the selection:");
    print_page(&store.snapshot());

    store.undo_action();
    println!("\nundo the delete:");
    print_page(&store.snapshot());

    store.unsubscribe(changes);
    Ok(())
}
