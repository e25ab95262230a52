//! Shell command - interactive filtering session
//!
//! The dataset is loaded once; each line edits the query, moves between
//! pages or exports the current rows. With auto-apply on, every filter
//! change re-runs the search immediately, otherwise only `apply` does.

use super::categories::choices;
use super::{evaluate, Context};
use anyhow::{bail, ensure, Context as _, Result};
use ricambi_cli::output::{format_count, on_off, Status};
use ricambi_cli::{Layout, Renderer};
use ricambi_core::config::{ROW_LIMIT_RANGE, THRESHOLD_RANGE};
use ricambi_core::export::export_to_path;
use ricambi_search::{
    clamp_page, paginate, Dataset, Field, FilterStats, Page, Query, QueryBuilder, Record, WordMode,
};
use std::fmt::Write as _;
use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::str::FromStr;

const HELP: &str = "\
Filters (an empty value clears the filter):
  code <text>        substring of the part code
  desc <words>       words of the description
  loc <text>         substring of the location
  cat <name|all>     exact category
Tuning:
  mode all|any       description words required
  threshold <50-100> minimum similarity percentage
  limit <100-5000>   largest candidate set that gets similarity scoring
  auto on|off        re-run the search after every change
Session:
  apply              run the search now
  reset              clear the four filters
  page <n>, next, prev, show
  export [file]      write the current rows as CSV
  categories, status, help, quit";

/// One parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Set(Field, String),
    Mode(WordMode),
    Threshold(u8),
    Limit(usize),
    Auto(bool),
    Apply,
    Reset,
    Page(usize),
    Next,
    Prev,
    Show,
    Status,
    Export(Option<PathBuf>),
    Categories,
    Help,
    Quit,
}

fn parse_switch(value: &str) -> Result<bool> {
    match value {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => bail!("expected `on` or `off`, got `{}`", other),
    }
}

impl FromStr for ShellCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        let command = match head.to_lowercase().as_str() {
            "code" | "codice" => ShellCommand::Set(Field::Code, rest.to_string()),
            "desc" | "description" | "descrizione" => {
                ShellCommand::Set(Field::Description, rest.to_string())
            }
            "loc" | "location" | "ubicazione" => ShellCommand::Set(Field::Location, rest.to_string()),
            "cat" | "category" | "categoria" => ShellCommand::Set(Field::Category, rest.to_string()),
            "mode" => match rest {
                "all" => ShellCommand::Mode(WordMode::AllWords),
                "any" => ShellCommand::Mode(WordMode::AnyWord),
                other => bail!("mode expects `all` or `any`, got `{}`", other),
            },
            "threshold" => {
                let value: u8 = rest
                    .parse()
                    .with_context(|| format!("threshold expects a number, got `{}`", rest))?;
                let (min, max) = THRESHOLD_RANGE;
                ensure!((min..=max).contains(&value), "threshold must be between {} and {}", min, max);
                ShellCommand::Threshold(value)
            }
            "limit" => {
                let value: usize = rest
                    .parse()
                    .with_context(|| format!("limit expects a number, got `{}`", rest))?;
                let (min, max) = ROW_LIMIT_RANGE;
                ensure!((min..=max).contains(&value), "limit must be between {} and {}", min, max);
                ShellCommand::Limit(value)
            }
            "auto" => ShellCommand::Auto(parse_switch(rest)?),
            "apply" => ShellCommand::Apply,
            "reset" => ShellCommand::Reset,
            "page" => ShellCommand::Page(
                rest.parse()
                    .with_context(|| format!("page expects a number, got `{}`", rest))?,
            ),
            "next" | "n" => ShellCommand::Next,
            "prev" | "p" => ShellCommand::Prev,
            "show" | "ls" => ShellCommand::Show,
            "status" => ShellCommand::Status,
            "export" => ShellCommand::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "categories" => ShellCommand::Categories,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => bail!("unknown command `{}`, type `help`", other),
        };
        Ok(command)
    }
}

/// What the loop should print after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Show the count and the current page
    Results,
    /// Filters changed but were not applied
    Pending,
    Message(String),
    Quit,
}

/// State of one interactive session over a loaded dataset
pub struct Session<'d> {
    dataset: &'d Dataset,
    query: Query,
    auto_apply: bool,
    rows: Vec<&'d Record>,
    stats: Option<FilterStats>,
    page: usize,
    page_size: usize,
    export_file: PathBuf,
}

impl<'d> Session<'d> {
    /// Start with every row shown; nothing has been evaluated yet
    pub fn new(dataset: &'d Dataset, query: Query, auto_apply: bool, page_size: usize) -> Self {
        Self {
            dataset,
            query,
            auto_apply,
            rows: dataset.records().iter().collect(),
            stats: None,
            page: 1,
            page_size: page_size.max(1),
            export_file: PathBuf::from(ricambi_core::export::DEFAULT_FILE_NAME),
        }
    }

    pub fn with_export_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_file = path.into();
        self
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn rows(&self) -> &[&'d Record] {
        &self.rows
    }

    pub fn page(&self) -> Page<'_, &'d Record> {
        paginate(&self.rows, self.page, self.page_size)
    }

    /// Evaluate the current query and go back to the first page
    pub fn apply(&mut self) {
        let result = evaluate(self.dataset, &self.query);
        self.stats = Some(result.stats());
        self.rows = result.into_rows();
        self.page = 1;
    }

    fn change(&mut self, builder: QueryBuilder) -> Result<Reply> {
        self.query = builder.build()?;
        if self.auto_apply {
            self.apply();
            Ok(Reply::Results)
        } else {
            Ok(Reply::Pending)
        }
    }

    fn set_page(&mut self, page: usize) {
        self.page = clamp_page(page, self.rows.len(), self.page_size);
    }

    pub fn execute(&mut self, command: ShellCommand) -> Result<Reply> {
        let builder = self.query.to_builder();
        match command {
            ShellCommand::Set(field, value) => self.change(match field {
                Field::Code => builder.code(value),
                Field::Description => builder.description(value),
                Field::Location => builder.location(value),
                Field::Category => builder.category(&value),
            }),
            ShellCommand::Mode(mode) => self.change(builder.word_mode(mode)),
            ShellCommand::Threshold(value) => self.change(builder.similarity_threshold(value)),
            ShellCommand::Limit(value) => self.change(builder.candidate_row_limit(value)),
            ShellCommand::Auto(on) => {
                self.auto_apply = on;
                Ok(Reply::Message(format!("Auto-apply {}", on_off(on))))
            }
            ShellCommand::Apply => {
                self.apply();
                Ok(Reply::Results)
            }
            ShellCommand::Reset => {
                self.query = self.query.reset_filters();
                self.apply();
                Ok(Reply::Results)
            }
            ShellCommand::Page(n) => {
                self.set_page(n);
                Ok(Reply::Results)
            }
            ShellCommand::Next => {
                self.set_page(self.page + 1);
                Ok(Reply::Results)
            }
            ShellCommand::Prev => {
                self.set_page(self.page.saturating_sub(1));
                Ok(Reply::Results)
            }
            ShellCommand::Show => Ok(Reply::Results),
            ShellCommand::Status => Ok(Reply::Message(self.status())),
            ShellCommand::Export(path) => {
                let path = path.unwrap_or_else(|| self.export_file.clone());
                let written = export_to_path(self.rows.iter().copied(), &path)?;
                Ok(Reply::Message(format!(
                    "Exported {} to {}",
                    format_count(written, "row", "rows"),
                    path.display()
                )))
            }
            ShellCommand::Categories => Ok(Reply::Message(choices(self.dataset).join("\n"))),
            ShellCommand::Help => Ok(Reply::Message(HELP.to_string())),
            ShellCommand::Quit => Ok(Reply::Quit),
        }
    }

    fn status(&self) -> String {
        let q = &self.query;
        let mut out = String::new();
        let _ = writeln!(out, "Codice:       {}", q.code());
        let _ = writeln!(out, "Descrizione:  {}", q.description());
        let _ = writeln!(out, "Ubicazione:   {}", q.location());
        let _ = writeln!(out, "Categoria:    {}", q.category());
        let mode = if q.match_all_words() { "all" } else { "any" };
        let _ = writeln!(out, "Word mode:    {}", mode);
        let _ = writeln!(out, "Threshold:    {}%", q.similarity_threshold());
        let _ = writeln!(out, "Row limit:    {}", q.candidate_row_limit());
        let _ = write!(out, "Auto-apply:   {}", on_off(self.auto_apply));
        if let Some(stats) = self.stats {
            let _ = write!(
                out,
                "\nLast run:     {} scanned, {} after fields, {} after words, scoring {:?}",
                stats.scanned, stats.after_fields, stats.after_words, stats.fuzzy
            );
        }
        out
    }
}

fn show_results(session: &Session<'_>, renderer: &Renderer) {
    println!("{}", renderer.count_header(session.rows().len()));
    if session.rows().is_empty() {
        return;
    }
    println!();
    print!("{}", renderer.render(&session.page(), session.query().description()));
    if renderer.layout() == Layout::Table && session.page().total_pages > 1 {
        Status::hint("`next`, `prev` or `page <n>` to move between pages");
    }
}

pub fn run(ctx: &Context, width: Option<u16>) -> Result<()> {
    let dataset = ctx.load_dataset()?;
    let schema = &ctx.config.schema;
    let renderer = ctx.renderer(ctx.layout(width));

    let mut session = Session::new(
        &dataset,
        ctx.base_query()?,
        schema.search.auto_apply,
        schema.display.page_size,
    )
    .with_export_file(&schema.export.file_name);

    let interactive = std::io::stdin().is_terminal();
    if interactive {
        Status::info(&format!(
            "{} loaded, type `help` for commands",
            format_count(dataset.len(), "row", "rows")
        ));
    }
    show_results(&session, &renderer);

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            print!("ricambi> ");
            std::io::stdout().flush()?;
        }
        let Some(line) = lines.next() else { break };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let reply = line
            .parse::<ShellCommand>()
            .and_then(|command| session.execute(command));
        match reply {
            Ok(Reply::Results) => show_results(&session, &renderer),
            Ok(Reply::Pending) => Status::info("Filters updated, type `apply` to search"),
            Ok(Reply::Message(text)) => println!("{}", text),
            Ok(Reply::Quit) => break,
            Err(e) => Status::error(&format!("{:#}", e)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Record::new(Some("C100"), Some("Cuscinetto a sfera"), Some("A1"), Some("Motori")),
            Record::new(Some("C200"), Some("Filtro aria"), Some("B2"), Some("Filtri")),
            Record::new(Some("C300"), Some("Filtro olio"), Some("B3"), Some("Filtri")),
        ])
    }

    fn codes(session: &Session<'_>) -> Vec<String> {
        session.rows().iter().map(|r| r.code.clone()).collect()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "desc  cuscinetto sfera ".parse::<ShellCommand>().unwrap(),
            ShellCommand::Set(Field::Description, "cuscinetto sfera".into())
        );
        assert_eq!("cat".parse::<ShellCommand>().unwrap(), ShellCommand::Set(Field::Category, String::new()));
        assert_eq!("mode any".parse::<ShellCommand>().unwrap(), ShellCommand::Mode(WordMode::AnyWord));
        assert_eq!("auto off".parse::<ShellCommand>().unwrap(), ShellCommand::Auto(false));
        assert_eq!("export".parse::<ShellCommand>().unwrap(), ShellCommand::Export(None));
        assert_eq!("Q".parse::<ShellCommand>().unwrap(), ShellCommand::Quit);
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!("threshold 40".parse::<ShellCommand>().is_err());
        assert!("threshold x".parse::<ShellCommand>().is_err());
        assert!("limit 99".parse::<ShellCommand>().is_err());
        assert!("frobnicate".parse::<ShellCommand>().is_err());
    }

    #[test]
    fn test_starts_with_full_dataset() {
        let dataset = dataset();
        let session = Session::new(&dataset, Query::default(), true, 25);
        assert_eq!(session.rows().len(), 3);
    }

    #[test]
    fn test_auto_apply() {
        let dataset = dataset();
        let mut session = Session::new(&dataset, Query::default(), true, 25);
        let reply = session.execute(ShellCommand::Set(Field::Category, "filtri".into())).unwrap();
        assert_eq!(reply, Reply::Results);
        assert_eq!(codes(&session), vec!["C200", "C300"]);
    }

    #[test]
    fn test_manual_apply() {
        let dataset = dataset();
        let mut session = Session::new(&dataset, Query::default(), false, 25);
        let reply = session.execute(ShellCommand::Set(Field::Code, "C1".into())).unwrap();
        assert_eq!(reply, Reply::Pending);
        assert_eq!(session.rows().len(), 3);

        session.execute(ShellCommand::Apply).unwrap();
        assert_eq!(codes(&session), vec!["C100"]);
    }

    #[test]
    fn test_reset_keeps_tuning() {
        let dataset = dataset();
        let mut session = Session::new(&dataset, Query::default(), true, 25);
        session.execute(ShellCommand::Threshold(90)).unwrap();
        session.execute(ShellCommand::Set(Field::Location, "b".into())).unwrap();
        assert_eq!(session.rows().len(), 2);

        session.execute(ShellCommand::Reset).unwrap();
        assert_eq!(session.rows().len(), 3);
        assert_eq!(session.query().location(), "");
        assert_eq!(session.query().similarity_threshold(), 90);
    }

    #[test]
    fn test_paging_is_clamped() {
        let dataset = dataset();
        let mut session = Session::new(&dataset, Query::default(), true, 2);
        session.execute(ShellCommand::Next).unwrap();
        session.execute(ShellCommand::Next).unwrap();
        assert_eq!(session.page().number, 2);
        assert_eq!(session.page().items.len(), 1);

        session.execute(ShellCommand::Page(0)).unwrap();
        assert_eq!(session.page().number, 1);
        session.execute(ShellCommand::Prev).unwrap();
        assert_eq!(session.page().number, 1);
    }

    #[test]
    fn test_apply_returns_to_first_page() {
        let dataset = dataset();
        let mut session = Session::new(&dataset, Query::default(), true, 1);
        session.execute(ShellCommand::Page(3)).unwrap();
        session.execute(ShellCommand::Set(Field::Category, "Filtri".into())).unwrap();
        assert_eq!(session.page().number, 1);
    }

    #[test]
    fn test_export_current_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let dataset = dataset();
        let mut session = Session::new(&dataset, Query::default(), true, 25);
        session.execute(ShellCommand::Set(Field::Code, "C2".into())).unwrap();

        let reply = session.execute(ShellCommand::Export(Some(path.clone()))).unwrap();
        assert_eq!(reply, Reply::Message(format!("Exported 1 row to {}", path.display())));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 2);
    }

    #[test]
    fn test_status_mentions_last_run() {
        let dataset = dataset();
        let mut session = Session::new(&dataset, Query::default(), true, 25);
        let Reply::Message(before) = session.execute(ShellCommand::Status).unwrap() else {
            panic!("expected a message");
        };
        assert!(!before.contains("Last run"));

        session.execute(ShellCommand::Apply).unwrap();
        let Reply::Message(after) = session.execute(ShellCommand::Status).unwrap() else {
            panic!("expected a message");
        };
        assert!(after.contains("Last run:     3 scanned"));
    }
}
