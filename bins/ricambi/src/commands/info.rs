//! Info command - inventory summary and active settings

use super::Context;
use anyhow::Result;
use ricambi_cli::output::{on_off, Status};
use ricambi_telemetry::{metrics, session_id};

pub fn run(ctx: &Context, include_metrics: bool) -> Result<()> {
    let source = ctx.source();
    let dataset = ctx.load_dataset()?;
    let schema = &ctx.config.schema;
    let categories = dataset.categories().len();

    if ctx.is_json() {
        let mut body = serde_json::json!({
            "source": source.path.display().to_string(),
            "sheet": source.sheet,
            "rows": dataset.len(),
            "categories": categories,
            "config_path": ctx.config.path,
            "search": schema.search,
            "display": schema.display,
            "session_id": session_id(),
        });
        if include_metrics {
            body["metrics"] = metrics().export_json();
        }
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    Status::header("Inventory");
    println!("  Source:      {}", source.path.display());
    if let Some(sheet) = &source.sheet {
        println!("  Sheet:       {}", sheet);
    }
    println!("  Rows:        {}", dataset.len());
    println!("  Categories:  {}", categories);

    Status::header("Settings");
    println!(
        "  Config:      {}",
        ctx.config.path.as_deref().unwrap_or("(defaults)")
    );
    println!("  Threshold:   {}%", schema.search.similarity_threshold);
    println!("  Row limit:   {}", schema.search.candidate_row_limit);
    println!(
        "  Word mode:   {}",
        if schema.search.match_all_words { "all" } else { "any" }
    );
    println!("  Auto-apply:  {}", on_off(schema.search.auto_apply));
    println!("  Page size:   {}", schema.display.page_size);
    println!("  Highlight:   {}", on_off(schema.display.highlight));

    if include_metrics {
        Status::header("Metrics");
        println!("{}", serde_json::to_string_pretty(&metrics().export_json())?);
    }
    Ok(())
}
