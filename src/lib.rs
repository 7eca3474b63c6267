// Portfolio Matrix - Core Library
// Exposes all modules for use in the CLI, API server, and tests

pub mod account;
pub mod category;
pub mod layout;
pub mod schema;
pub mod scoring;
pub mod storage;

// Re-export commonly used types
pub use account::{Account, AccountInput, PortfolioStore};
pub use category::{Category, QUADRANT_THRESHOLD};
pub use layout::{LabelAnchor, LabelPlacement, LayoutConfig, Point};
pub use schema::{
    validate_account, validate_input, validate_portfolio, ValidationError, ValidationResult,
};
pub use scoring::{
    calculate_scores, portfolio_stats, CalculatedAccount, PortfolioStats, ENGAGEMENT_WEIGHT,
    EXPANSION_WEIGHT, STAKEHOLDER_WEIGHT,
};
pub use storage::{
    export_file, export_json, import_file, import_json, load_accounts, open_store, save_accounts,
    STORAGE_KEY,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
