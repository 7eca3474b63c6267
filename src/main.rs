// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Result};
use std::env;
use std::path::PathBuf;

use portfolio_matrix::{load_accounts, open_store, save_accounts, storage};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("import") => run_import(args.get(2))?,
        Some("export") => run_export(args.get(2))?,
        _ => run_ui_mode()?,
    }

    Ok(())
}

/// Store location: next to the working directory by default,
/// overridable for tests and multi-portfolio setups.
fn store_path() -> PathBuf {
    env::var_os("PORTFOLIO_MATRIX_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("portfolio.db"))
}

fn run_import(path: Option<&String>) -> Result<()> {
    let Some(path) = path else {
        bail!("Usage: portfolio-matrix import <file.json>");
    };

    println!("📦 Importing portfolio from {}...", path);
    let accounts = storage::import_file(path)?;

    let conn = open_store(store_path())?;
    save_accounts(&conn, &accounts)?;

    println!(
        "✓ Imported {} accounts (previous portfolio replaced)",
        accounts.len()
    );
    Ok(())
}

fn run_export(path: Option<&String>) -> Result<()> {
    let Some(path) = path else {
        bail!("Usage: portfolio-matrix export <file.json>");
    };

    let conn = open_store(store_path())?;
    let accounts = load_accounts(&conn)?;

    storage::export_file(path, &accounts)?;
    println!("✓ Exported {} accounts to {}", accounts.len(), path);
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode() -> Result<()> {
    println!("🖥️  Loading Portfolio Matrix UI...\n");

    let conn = open_store(store_path())?;
    let accounts = load_accounts(&conn)?;

    println!("📊 Loaded {} accounts", accounts.len());
    println!("Starting UI... (Press 'q' to quit)\n");

    let store = portfolio_matrix::PortfolioStore::from_accounts(accounts);
    let mut app = ui::App::new(store);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode() -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin matrix-server --features server");
    std::process::exit(1);
}
