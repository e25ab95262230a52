//! Search command - filter the inventory and print one page

use super::{evaluate, Context, FilterArgs};
use anyhow::Result;
use ricambi_cli::output::Status;
use ricambi_search::{FilterStats, Query, Record};
use serde::Serialize;

#[derive(Serialize)]
struct SearchOutput<'a> {
    query: &'a Query,
    total: usize,
    page: usize,
    total_pages: usize,
    page_size: usize,
    stats: FilterStats,
    rows: &'a [&'a Record],
}

/// Run a single query
pub fn run(
    ctx: &Context,
    filter: &FilterArgs,
    page: usize,
    page_size: Option<usize>,
    width: Option<u16>,
) -> Result<()> {
    let query = filter.to_query(&ctx.base_query()?)?;
    let dataset = ctx.load_dataset()?;
    let result = evaluate(&dataset, &query);

    let page_size = page_size.unwrap_or(ctx.config.schema.display.page_size);
    let page = result.page(page, page_size);

    if ctx.is_json() {
        let output = SearchOutput {
            query: &query,
            total: result.len(),
            page: page.number,
            total_pages: page.total_pages,
            page_size: page.page_size,
            stats: result.stats(),
            rows: page.items,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let layout = ctx.layout(width);
    let renderer = ctx.renderer(layout);

    println!("{}", renderer.count_header(result.len()));
    if result.is_empty() {
        return Ok(());
    }
    println!();
    print!("{}", renderer.render(&page, query.description()));

    if layout.offers_export() {
        Status::hint("Save all matching rows with `ricambi export` using the same filters");
    }
    Ok(())
}
