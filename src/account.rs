// 💼 Account Entity + Portfolio Store
// Stable UUID identity; the store is the single owner of the collection
//
// The store recomputes the full derived set (stats → scores →
// categories) after every mutation. Derivation is a pure total function
// of the whole collection, so there is no incremental update path and
// no hidden dependency tracking.

use crate::scoring::{calculate_scores, portfolio_stats, CalculatedAccount, PortfolioStats};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// ACCOUNT
// ============================================================================

/// A business account as persisted and exchanged with collaborators.
///
/// Wire shape is camelCase with `createdAt` in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Stable identity (UUID) - never changes after creation
    pub id: String,

    pub name: String,

    /// Annual recurring revenue (non-negative currency amount)
    pub arr: f64,

    pub logins_per_month: u32,

    /// Average session duration in hours
    pub session_duration: f64,

    pub notes: String,

    /// 0-100
    pub expansion_probability: f64,

    /// 0-100
    pub stakeholder_probability: f64,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// The fields a form or API client submits for create and update.
/// Identity and creation time are minted by the store, never by the
/// caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInput {
    pub name: String,
    pub arr: f64,
    pub logins_per_month: u32,
    pub session_duration: f64,
    #[serde(default)]
    pub notes: String,
    pub expansion_probability: f64,
    pub stakeholder_probability: f64,
}

impl Account {
    /// Create a new account with a fresh UUID and creation timestamp.
    pub fn new(input: AccountInput) -> Self {
        let now = Utc::now();
        // Creation time is held at millisecond precision so a stored
        // account round-trips through the wire format unchanged.
        let created_at = DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now);

        Account {
            id: uuid::Uuid::new_v4().to_string(),
            name: input.name,
            arr: input.arr,
            logins_per_month: input.logins_per_month,
            session_duration: input.session_duration,
            notes: input.notes,
            expansion_probability: input.expansion_probability,
            stakeholder_probability: input.stakeholder_probability,
            created_at,
        }
    }

    /// Usage intensity proxy: logins per month × hours per session.
    pub fn engagement(&self) -> f64 {
        f64::from(self.logins_per_month) * self.session_duration
    }

    /// Overwrite the editable fields. Identity and creation time
    /// survive edits.
    fn apply(&mut self, input: AccountInput) {
        self.name = input.name;
        self.arr = input.arr;
        self.logins_per_month = input.logins_per_month;
        self.session_duration = input.session_duration;
        self.notes = input.notes;
        self.expansion_probability = input.expansion_probability;
        self.stakeholder_probability = input.stakeholder_probability;
    }
}

// ============================================================================
// PORTFOLIO STORE
// ============================================================================

/// Single logical owner of the account collection.
///
/// Holds the source accounts and the derived calculated set side by
/// side; every mutation ends with `recalculate()`. Presentation state
/// (selection, editing, label visibility) lives with the UI layers,
/// never here.
#[derive(Debug, Default)]
pub struct PortfolioStore {
    accounts: Vec<Account>,
    calculated: Vec<CalculatedAccount>,
}

impl PortfolioStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from an existing collection (e.g. loaded from
    /// persistence) and derive its calculated set.
    pub fn from_accounts(accounts: Vec<Account>) -> Self {
        let mut store = PortfolioStore {
            accounts,
            calculated: Vec::new(),
        };
        store.recalculate();
        store
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// The derived view: one calculated account per source account, in
    /// collection order.
    pub fn calculated(&self) -> &[CalculatedAccount] {
        &self.calculated
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Current normalization maxima.
    pub fn stats(&self) -> PortfolioStats {
        portfolio_stats(&self.accounts)
    }

    /// Sum of ARR across the portfolio.
    pub fn total_arr(&self) -> f64 {
        self.accounts.iter().map(|a| a.arr).sum()
    }

    /// Number of accounts currently classified into `category`.
    pub fn category_count(&self, category: crate::category::Category) -> usize {
        self.calculated
            .iter()
            .filter(|c| c.category == category)
            .count()
    }

    pub fn find(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn find_calculated(&self, id: &str) -> Option<&CalculatedAccount> {
        self.calculated.iter().find(|c| c.account.id == id)
    }

    /// Add a new account; returns its minted id.
    pub fn add(&mut self, input: AccountInput) -> String {
        let account = Account::new(input);
        let id = account.id.clone();
        self.accounts.push(account);
        self.recalculate();
        id
    }

    /// Update an existing account's editable fields.
    pub fn update(&mut self, id: &str, input: AccountInput) -> Result<()> {
        let account = self
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| anyhow!("Account not found: {}", id))?;
        account.apply(input);
        self.recalculate();
        Ok(())
    }

    /// Delete an account.
    pub fn remove(&mut self, id: &str) -> Result<()> {
        let before = self.accounts.len();
        self.accounts.retain(|a| a.id != id);
        if self.accounts.len() == before {
            return Err(anyhow!("Account not found: {}", id));
        }
        self.recalculate();
        Ok(())
    }

    /// Import semantics: the incoming collection replaces the current
    /// one entirely. Never merges.
    pub fn replace_all(&mut self, accounts: Vec<Account>) {
        self.accounts = accounts;
        self.recalculate();
    }

    /// Full recomputation pass: stats snapshot first, then every
    /// account scored against it.
    fn recalculate(&mut self) {
        let stats = portfolio_stats(&self.accounts);
        self.calculated = self
            .accounts
            .iter()
            .map(|account| calculate_scores(account, &stats))
            .collect();
    }
}

// ============================================================================
// TESTS
// ============================================================================
