// 📋 Boundary Validation
// Field-level checks applied where data enters the system
//
// The scoring engine is total over its documented domain and performs
// no validation of its own. Anything arriving from a form, an API
// client, or an import document passes through here first.

use crate::account::{Account, AccountInput};
use serde::Serialize;

/// Upper bound for the probability inputs.
pub const PROBABILITY_MAX: f64 = 100.0;

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub context: String,
}

impl ValidationError {
    fn new(context: &str, field: &str, message: String) -> Self {
        ValidationError {
            field: field.to_string(),
            message,
            context: context.to_string(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.context, self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), Vec<ValidationError>>;

// ============================================================================
// ACCOUNT VALIDATION
// ============================================================================

fn check_amount(errors: &mut Vec<ValidationError>, context: &str, field: &str, value: f64) {
    if !value.is_finite() {
        errors.push(ValidationError::new(
            context,
            field,
            format!("Must be a finite number, got {}", value),
        ));
    } else if value < 0.0 {
        errors.push(ValidationError::new(
            context,
            field,
            format!("Must be non-negative, got {}", value),
        ));
    }
}

fn check_probability(errors: &mut Vec<ValidationError>, context: &str, field: &str, value: f64) {
    if !value.is_finite() || !(0.0..=PROBABILITY_MAX).contains(&value) {
        errors.push(ValidationError::new(
            context,
            field,
            format!("Must be between 0 and {}, got {}", PROBABILITY_MAX, value),
        ));
    }
}

fn check_fields(errors: &mut Vec<ValidationError>, context: &str, input: &AccountInput) {
    if input.name.trim().is_empty() {
        errors.push(ValidationError::new(
            context,
            "name",
            "Required field is empty".to_string(),
        ));
    }

    check_amount(errors, context, "arr", input.arr);
    check_amount(errors, context, "sessionDuration", input.session_duration);
    check_probability(errors, context, "expansionProbability", input.expansion_probability);
    check_probability(
        errors,
        context,
        "stakeholderProbability",
        input.stakeholder_probability,
    );
}

/// Validate a create/update payload before it reaches the store.
pub fn validate_input(input: &AccountInput) -> ValidationResult {
    let mut errors = Vec::new();
    let context = if input.name.trim().is_empty() {
        "Account".to_string()
    } else {
        input.name.clone()
    };
    check_fields(&mut errors, &context, input);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a full account record (e.g. one element of an import
/// document). Also requires the persisted identity fields.
pub fn validate_account(account: &Account) -> ValidationResult {
    let mut errors = Vec::new();
    let context = if account.name.trim().is_empty() {
        account.id.clone()
    } else {
        account.name.clone()
    };

    if account.id.trim().is_empty() {
        errors.push(ValidationError::new(
            &context,
            "id",
            "Required field is empty".to_string(),
        ));
    }

    let input = AccountInput {
        name: account.name.clone(),
        arr: account.arr,
        logins_per_month: account.logins_per_month,
        session_duration: account.session_duration,
        notes: account.notes.clone(),
        expansion_probability: account.expansion_probability,
        stakeholder_probability: account.stakeholder_probability,
    };
    check_fields(&mut errors, &context, &input);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate every element of an incoming collection, aggregating all
/// errors so a rejection names everything wrong at once.
pub fn validate_portfolio(accounts: &[Account]) -> ValidationResult {
    let mut errors = Vec::new();

    for (index, account) in accounts.iter().enumerate() {
        if let Err(mut account_errors) = validate_account(account) {
            for error in &mut account_errors {
                error.context = format!("accounts[{}] {}", index, error.context);
            }
            errors.append(&mut account_errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// ============================================================================
// TESTS
// ============================================================================
