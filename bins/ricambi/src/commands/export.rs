//! Export command - write matching rows as CSV

use super::{evaluate, Context, FilterArgs};
use anyhow::Result;
use ricambi_cli::output::{format_count, Status};
use ricambi_core::export::{export_to_path, write_csv};
use std::path::Path;

/// Export every row matching `filter` to `output`, or stdout for "-"
pub fn run(ctx: &Context, filter: &FilterArgs, output: Option<&Path>) -> Result<()> {
    let query = filter.to_query(&ctx.base_query()?)?;
    let dataset = ctx.load_dataset()?;
    let result = evaluate(&dataset, &query);

    if output == Some(Path::new("-")) {
        write_csv(result.iter(), std::io::stdout().lock())?;
        return Ok(());
    }

    let default_path;
    let path = match output {
        Some(path) => path,
        None => {
            default_path = ctx.config.schema.export.file_name.clone();
            Path::new(&default_path)
        }
    };
    let written = export_to_path(result.iter(), path)?;

    if ctx.is_json() {
        let body = serde_json::json!({ "path": path.display().to_string(), "rows": written });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        Status::success(&format!(
            "Exported {} to {}",
            format_count(written, "row", "rows"),
            path.display()
        ));
    }
    Ok(())
}
