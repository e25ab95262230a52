//! Rendering result pages as text
//!
//! Everything renders into a `String` so commands decide where it goes.
//! Description matches are highlighted with terminal colors; without
//! colors the text is left plain.

use console::{measure_text_width, pad_str, truncate_str, Alignment};
use owo_colors::OwoColorize;
use ricambi_search::{highlight_spans, Field, Page, Record};
use std::fmt::Write;

use crate::output::format_count;
use crate::viewport::Layout;

/// Widest a description column may grow in table layout
pub const MAX_DESCRIPTION_WIDTH: usize = 60;

/// Result renderer
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    layout: Layout,
    highlight: bool,
    color: bool,
}

impl Renderer {
    /// Renderer for `layout`, coloring when the terminal supports it
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            highlight: true,
            color: console::colors_enabled(),
        }
    }

    /// Enable or disable match highlighting
    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    /// Force colors on or off
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Layout this renderer draws
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// "N results found"
    pub fn count_header(&self, total: usize) -> String {
        let text = format_count(total, "result found", "results found");
        if self.color {
            text.bold().to_string()
        } else {
            text
        }
    }

    /// Render one page; `description_query` drives highlighting
    pub fn render(&self, page: &Page<'_, &Record>, description_query: &str) -> String {
        let mut out = String::new();
        if page.items.is_empty() {
            return out;
        }

        match self.layout {
            Layout::Table => self.render_table(&mut out, page.items, description_query),
            Layout::Compact => self.render_cards(&mut out, page.items, description_query),
        }

        if page.total_pages > 1 {
            let footer = format!("Page {} of {}", page.number, page.total_pages);
            let _ = writeln!(out);
            if self.color {
                let _ = writeln!(out, "{}", footer.dimmed());
            } else {
                let _ = writeln!(out, "{}", footer);
            }
        }
        out
    }

    fn mark(&self, text: &str, query: &str) -> String {
        if !self.highlight || !self.color {
            return text.to_string();
        }
        let spans = highlight_spans(text, query);
        if spans.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len() + spans.len() * 16);
        let mut cursor = 0;
        for span in spans {
            out.push_str(&text[cursor..span.start]);
            let _ = write!(out, "{}", (&text[span.clone()]).black().on_yellow());
            cursor = span.end;
        }
        out.push_str(&text[cursor..]);
        out
    }

    fn render_table(&self, out: &mut String, rows: &[&Record], query: &str) {
        let mut widths: Vec<usize> = Field::ALL.iter().map(|f| f.header().len()).collect();
        for record in rows {
            for (i, field) in Field::ALL.iter().enumerate() {
                widths[i] = widths[i].max(measure_text_width(record.get(*field)));
            }
        }
        widths[1] = widths[1].min(MAX_DESCRIPTION_WIDTH);

        let header: Vec<String> = Field::ALL
            .iter()
            .zip(&widths)
            .map(|(f, &w)| pad_str(f.header(), w, Alignment::Left, None).into_owned())
            .collect();
        let header = header.join("  ");
        if self.color {
            let _ = writeln!(out, "{}", header.bold());
        } else {
            let _ = writeln!(out, "{}", header);
        }
        let rule: Vec<String> = widths.iter().map(|&w| "─".repeat(w)).collect();
        let _ = writeln!(out, "{}", rule.join("  "));

        for record in rows {
            let cells: Vec<String> = Field::ALL
                .iter()
                .zip(&widths)
                .map(|(field, &w)| {
                    let text = truncate_str(record.get(*field), w, "…");
                    let text = if *field == Field::Description {
                        self.mark(&text, query)
                    } else {
                        text.into_owned()
                    };
                    pad_str(&text, w, Alignment::Left, None).into_owned()
                })
                .collect();
            let _ = writeln!(out, "{}", cells.join("  ").trim_end());
        }
    }

    fn render_cards(&self, out: &mut String, rows: &[&Record], query: &str) {
        for (i, record) in rows.iter().enumerate() {
            if i > 0 {
                let _ = writeln!(out);
            }
            if self.color {
                let _ = writeln!(out, "{}", record.code.cyan().bold());
            } else {
                let _ = writeln!(out, "{}", record.code);
            }
            for field in [Field::Description, Field::Location, Field::Category] {
                let value = if field == Field::Description {
                    self.mark(record.get(field), query)
                } else {
                    record.get(field).to_string()
                };
                let label = format!("{}:", field.header());
                let _ = writeln!(out, "  {} {}", pad_str(&label, 12, Alignment::Left, None), value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ricambi_search::paginate;

    fn records() -> Vec<Record> {
        vec![
            Record::new(Some("C100"), Some("Cuscinetto a sfera"), Some("A1"), Some("Motori")),
            Record::new(Some("C200"), Some("Filtro aria"), Some("B2"), Some("Filtri")),
        ]
    }

    #[test]
    fn test_table_plain() {
        let records = records();
        let rows: Vec<&Record> = records.iter().collect();
        let page = paginate(&rows, 1, 25);
        let text = Renderer::new(Layout::Table).with_color(false).render(&page, "sfera");

        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("Codice  Descrizione"));
        assert!(lines.next().unwrap().starts_with("──────"));
        assert!(lines.next().unwrap().contains("Cuscinetto a sfera  A1"));
        assert!(!text.contains("Page"));
    }

    #[test]
    fn test_cards_highlight_description() {
        let records = records();
        let rows: Vec<&Record> = records.iter().collect();
        let page = paginate(&rows, 1, 25);
        let text = Renderer::new(Layout::Compact).with_color(true).render(&page, "sfera");

        assert!(text.contains("\u{1b}["));
        assert!(text.contains("Ubicazione:"));
        assert!(console::strip_ansi_codes(&text).contains("Cuscinetto a sfera"));
    }

    #[test]
    fn test_highlight_disabled() {
        let records = records();
        let rows: Vec<&Record> = records.iter().collect();
        let page = paginate(&rows, 1, 25);
        let text = Renderer::new(Layout::Compact)
            .with_color(true)
            .with_highlight(false)
            .render(&page, "sfera");
        assert!(text.contains("Descrizione: Cuscinetto a sfera"));
    }

    #[test]
    fn test_page_footer() {
        let records = records();
        let rows: Vec<&Record> = records.iter().collect();
        let page = paginate(&rows, 2, 1);
        let text = Renderer::new(Layout::Compact).with_color(false).render(&page, "");
        assert!(text.starts_with("C200"));
        assert!(text.trim_end().ends_with("Page 2 of 2"));
    }

    #[test]
    fn test_count_header() {
        let r = Renderer::new(Layout::Table).with_color(false);
        assert_eq!(r.count_header(1), "1 result found");
        assert_eq!(r.count_header(0), "0 results found");
    }

    #[test]
    fn test_empty_page_renders_nothing() {
        let rows: Vec<&Record> = Vec::new();
        let page = paginate(&rows, 1, 25);
        assert!(Renderer::new(Layout::Table).render(&page, "x").is_empty());
    }
}
