//! Table rendering for list output.

use clap::ValueEnum;
use comfy_table::{presets, Cell, ContentArrangement, Table};
use thiserror::Error;

/// Double-line box drawing, without separators between body rows.
const DOUBLE: &str = "║║══╠═╬╣║    ╦╩╔╗╚╝";

/// Column separators only: no borders, no header rule.
const PORCELAIN: &str = "        |          ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TableType {
    /// Single-line box drawing
    #[default]
    Single,
    /// Double-line box drawing
    Double,
    /// Plain ASCII borders
    Ascii,
    /// GitHub flavoured markdown
    Github,
    /// Borderless, pipe separated; stable for scripts
    Porcelain,
}

impl TableType {
    fn preset(self) -> &'static str {
        match self {
            Self::Single => presets::UTF8_FULL,
            Self::Double => DOUBLE,
            Self::Ascii => presets::ASCII_FULL,
            Self::Github => presets::ASCII_MARKDOWN,
            Self::Porcelain => PORCELAIN,
        }
    }
}

/// Table style flags shared by the listing actions.
#[derive(Debug, Clone, Copy, clap::Args)]
pub struct TableArgs {
    /// Table style
    #[arg(long, value_enum, default_value_t = TableType::Single)]
    pub table_type: TableType,

    /// Shortcut for `--table-type porcelain`
    #[arg(long, conflicts_with = "table_type")]
    pub porcelain: bool,
}

impl TableArgs {
    pub fn table_type(&self) -> TableType {
        if self.porcelain {
            TableType::Porcelain
        } else {
            self.table_type
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("row {row} has {found} cells, expected {expected}")]
    ColumnMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error(
        "terminal too narrow for table ({needed} columns needed, {available} available), try --porcelain"
    )]
    TooNarrow { needed: usize, available: usize },
}

/// A titled table that sheds optional columns to fit the terminal.
#[derive(Debug, Clone)]
pub struct TerminalTable {
    table_type: TableType,
    title: Option<String>,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    drop_columns: Vec<usize>,
    max_width: Option<usize>,
}

impl TerminalTable {
    pub fn new(table_type: TableType, header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            table_type,
            title: None,
            header,
            rows,
            drop_columns: Vec::new(),
            max_width: terminal_width(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Columns (by index) that may be dropped, in order, when the table is
    /// too wide.
    pub fn with_drop_columns(mut self, columns: &[usize]) -> Self {
        self.drop_columns = columns.to_vec();
        self
    }

    pub fn with_max_width(mut self, width: Option<usize>) -> Self {
        self.max_width = width;
        self
    }

    pub fn render(&self) -> Result<String, TableError> {
        let expected = self.header.len();
        if let Some((row, cells)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != expected)
        {
            return Err(TableError::ColumnMismatch {
                row: row + 1,
                expected,
                found: cells.len(),
            });
        }

        let mut visible: Vec<usize> = (0..expected).collect();
        let mut droppable = self.drop_columns.iter();

        loop {
            let rendered = self.render_columns(&visible);
            let width = rendered
                .lines()
                .map(|line| line.chars().count())
                .max()
                .unwrap_or(0);

            let available = match self.max_width {
                Some(available) if self.table_type != TableType::Porcelain => available,
                _ => return Ok(self.with_title_line(rendered)),
            };
            if width <= available {
                return Ok(self.with_title_line(rendered));
            }

            match droppable.find(|column| visible.contains(column)) {
                Some(column) => {
                    log::debug!("Dropping column {} to fit {} columns", column, available);
                    visible.retain(|c| c != column);
                }
                None => {
                    return Err(TableError::TooNarrow {
                        needed: width,
                        available,
                    })
                }
            }
        }
    }

    fn render_columns(&self, visible: &[usize]) -> String {
        let mut table = Table::new();
        table
            .load_preset(self.table_type.preset())
            .set_content_arrangement(ContentArrangement::Disabled);

        table.set_header(visible.iter().map(|&i| Cell::new(&self.header[i])));

        for row in &self.rows {
            table.add_row(visible.iter().map(|&i| Cell::new(&row[i])));
        }

        table.to_string()
    }

    fn with_title_line(&self, table: String) -> String {
        match &self.title {
            Some(title) => format!("{title}\n{table}"),
            None => table,
        }
    }
}

/// Width of the attached terminal, `None` when not writing to one.
fn terminal_width() -> Option<usize> {
    Table::new().width().map(usize::from)
}
