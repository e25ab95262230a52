//! Categories command - list category choices

use super::Context;
use anyhow::Result;
use ricambi_search::{Dataset, ALL_SENTINEL};

/// Category choices: the "all" sentinel, then every distinct category sorted
pub fn choices(dataset: &Dataset) -> Vec<&str> {
    std::iter::once(ALL_SENTINEL)
        .chain(dataset.categories())
        .collect()
}

pub fn run(ctx: &Context) -> Result<()> {
    let dataset = ctx.load_dataset()?;
    let choices = choices(&dataset);

    if ctx.is_json() {
        println!("{}", serde_json::to_string_pretty(&choices)?);
    } else {
        for choice in choices {
            println!("{}", choice);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ricambi_search::Record;

    #[test]
    fn test_sentinel_first() {
        let dataset = Dataset::new(vec![
            Record::new(Some("1"), None, None, Some("Motori")),
            Record::new(Some("2"), None, None, Some("Filtri")),
            Record::new(Some("3"), None, None, Some("Motori")),
            Record::new(Some("4"), None, None, None),
        ]);
        assert_eq!(choices(&dataset), vec!["all", "Filtri", "Motori"]);
    }
}
