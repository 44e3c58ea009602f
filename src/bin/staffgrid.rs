//! staffgrid - Interactive grid over an employee dataset.
//!
//! Usage:
//!   staffgrid                      # bundled dataset, interactive TUI
//!   staffgrid --data team.json     # custom dataset
//!   staffgrid --export out.csv     # headless CSV export, no TUI
//!   staffgrid --edit-trigger double-click --edit-commit immediate

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use staffgrid::engine::{EditCommit, EditTrigger, GridConfig, GridEngine, SelectionKey};
use staffgrid::model;
use staffgrid::tui::App;

/// Default path for the `x` export key.
const DEFAULT_EXPORT_PATH: &str = "employees.csv";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EditTriggerArg {
    SingleClick,
    DoubleClick,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EditCommitArg {
    /// Keystrokes are buffered; Esc restores the pre-edit value.
    Buffered,
    /// Keystrokes write through immediately; Esc cannot restore.
    Immediate,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SelectionKeyArg {
    /// Selection keyed by record id (survives filtering and sorting).
    Id,
    /// Selection keyed by visible position (legacy-compatible).
    Position,
}

/// Interactive viewer and editor for an employee dataset.
#[derive(Parser)]
#[command(name = "staffgrid", about = "Employee grid viewer")]
struct Args {
    /// Path to a JSON dataset. Default: the bundled sample.
    #[arg(long, value_name = "PATH")]
    data: Option<PathBuf>,

    /// Rows per page.
    #[arg(long, default_value_t = 10)]
    page_size: usize,

    /// Mouse gesture that opens a cell for editing.
    #[arg(long, value_enum, default_value = "single-click")]
    edit_trigger: EditTriggerArg,

    /// Edit commit semantics.
    #[arg(long, value_enum, default_value = "buffered")]
    edit_commit: EditCommitArg,

    /// Selection keying.
    #[arg(long, value_enum, default_value = "id")]
    selection_key: SelectionKeyArg,

    /// Write the full dataset as CSV to PATH and exit without starting
    /// the TUI.
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Path the `x` key exports to inside the TUI.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_EXPORT_PATH)]
    export_path: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let records = match &args.data {
        Some(path) => model::load_employees(path),
        None => model::bundled_employees(),
    };
    let records = match records {
        Ok(records) => records,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    if args.page_size == 0 {
        eprintln!("Error: --page-size must be at least 1");
        std::process::exit(1);
    }

    let config = GridConfig {
        page_size: args.page_size,
        edit_trigger: match args.edit_trigger {
            EditTriggerArg::SingleClick => EditTrigger::SingleClick,
            EditTriggerArg::DoubleClick => EditTrigger::DoubleClick,
        },
        edit_commit: match args.edit_commit {
            EditCommitArg::Buffered => EditCommit::Buffered,
            EditCommitArg::Immediate => EditCommit::Immediate,
        },
        selection_key: match args.selection_key {
            SelectionKeyArg::Id => SelectionKey::Id,
            SelectionKeyArg::Position => SelectionKey::Position,
        },
    };
    let engine = GridEngine::new(records, config);

    // Headless export mode.
    if let Some(path) = args.export {
        let csv = match engine.export_rows() {
            Ok(csv) => csv,
            Err(err) => {
                eprintln!("Error formatting CSV: {err}");
                std::process::exit(1);
            }
        };
        if let Err(err) = std::fs::write(&path, csv) {
            eprintln!("Error writing '{}': {err}", path.display());
            std::process::exit(1);
        }
        println!("Exported {} row(s) to {}", engine.records().len(), path.display());
        return;
    }

    let app = App::new(engine, args.export_path);
    if let Err(err) = app.run(Duration::from_millis(250)) {
        eprintln!("Terminal error: {err}");
        std::process::exit(1);
    }
}
