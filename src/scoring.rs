// 📊 Scoring Engine
// Portfolio-wide stats aggregation + per-account score derivation
//
// Every derived value is a pure function of (account, stats of its
// collection). Accounts never depend on each other's derived values,
// so recomputation order across a portfolio does not matter.

use crate::account::Account;
use crate::category::Category;
use serde::{Deserialize, Serialize};

/// Weight of the normalized engagement sub-score.
pub const ENGAGEMENT_WEIGHT: f64 = 30.0;
/// Weight of the expansion-probability sub-score.
pub const EXPANSION_WEIGHT: f64 = 40.0;
/// Weight of the stakeholder-probability sub-score.
pub const STAKEHOLDER_WEIGHT: f64 = 30.0;

// ============================================================================
// PORTFOLIO STATS
// ============================================================================

/// Portfolio-wide maxima used to normalize per-account scores.
///
/// Transient: recomputed on every change to the collection, never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStats {
    pub arr_max: f64,
    pub engagement_max: f64,
}

/// Reduce a collection to its normalization maxima.
/// An empty collection yields zeros, which is valid input downstream.
pub fn portfolio_stats(accounts: &[Account]) -> PortfolioStats {
    accounts
        .iter()
        .fold(PortfolioStats::default(), |stats, account| PortfolioStats {
            arr_max: stats.arr_max.max(account.arr),
            engagement_max: stats.engagement_max.max(account.engagement()),
        })
}

// ============================================================================
// CALCULATED ACCOUNT
// ============================================================================

/// An account plus its derived scores and quadrant category.
///
/// Fully derived: never stored independently of its source account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedAccount {
    #[serde(flatten)]
    pub account: Account,

    /// logins/month × session hours
    pub engagement: f64,

    /// Engagement normalized against the portfolio max, weight 30
    pub engagement_score: f64,

    /// Expansion probability scaled to weight 40
    pub expansion_score: f64,

    /// Stakeholder probability scaled to weight 30
    pub stakeholder_score: f64,

    /// Normalized ARR, 0-100
    pub volume_score: f64,

    /// Sum of the three sub-scores, 0-100
    pub potential_score: f64,

    pub category: Category,
}

/// Derive scores and category for one account against its portfolio
/// stats.
///
/// Zero maxima (single-account portfolio with zero engagement, all-zero
/// ARR) resolve the corresponding score to 0 rather than dividing by
/// zero. Inputs are assumed validated at the boundary; this function
/// performs no checks of its own.
pub fn calculate_scores(account: &Account, stats: &PortfolioStats) -> CalculatedAccount {
    let engagement = account.engagement();

    let engagement_score = if stats.engagement_max > 0.0 {
        (engagement / stats.engagement_max) * ENGAGEMENT_WEIGHT
    } else {
        0.0
    };

    let expansion_score = account.expansion_probability * EXPANSION_WEIGHT / 100.0;
    let stakeholder_score = account.stakeholder_probability * STAKEHOLDER_WEIGHT / 100.0;

    // The account holding the portfolio max always scores exactly 100
    let volume_score = if stats.arr_max > 0.0 {
        (account.arr / stats.arr_max) * 100.0
    } else {
        0.0
    };

    let potential_score = engagement_score + expansion_score + stakeholder_score;

    CalculatedAccount {
        account: account.clone(),
        engagement,
        engagement_score,
        expansion_score,
        stakeholder_score,
        volume_score,
        potential_score,
        category: Category::classify(volume_score, potential_score),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountInput;

    fn account(name: &str, arr: f64, logins: u32, duration: f64, exp: f64, stake: f64) -> Account {
        Account::new(AccountInput {
            name: name.to_string(),
            arr,
            logins_per_month: logins,
            session_duration: duration,
            notes: String::new(),
            expansion_probability: exp,
            stakeholder_probability: stake,
        })
    }

    #[test]
    fn test_stats_empty_collection_yields_zeros() {
        let stats = portfolio_stats(&[]);
        assert_eq!(stats.arr_max, 0.0);
        assert_eq!(stats.engagement_max, 0.0);
    }

    #[test]
    fn test_stats_are_exact_maxima() {
        let accounts = vec![
            account("A", 100.0, 10, 2.0, 0.0, 0.0),
            account("B", 250.0, 4, 1.5, 0.0, 0.0),
            account("C", 80.0, 30, 0.5, 0.0, 0.0),
        ];

        let stats = portfolio_stats(&accounts);
        assert_eq!(stats.arr_max, 250.0);
        assert_eq!(stats.engagement_max, 20.0); // A: 10 × 2.0

        for acc in &accounts {
            assert!(stats.arr_max >= acc.arr);
            assert!(stats.engagement_max >= acc.engagement());
        }
    }

    #[test]
    fn test_worked_example_two_accounts() {
        let a = account("A", 100.0, 10, 2.0, 80.0, 60.0);
        let b = account("B", 50.0, 5, 1.0, 20.0, 10.0);
        let stats = portfolio_stats(&[a.clone(), b.clone()]);

        assert_eq!(stats.arr_max, 100.0);
        assert_eq!(stats.engagement_max, 20.0);

        let calc_a = calculate_scores(&a, &stats);
        assert_eq!(calc_a.engagement, 20.0);
        assert_eq!(calc_a.engagement_score, 30.0);
        assert_eq!(calc_a.expansion_score, 32.0);
        assert_eq!(calc_a.stakeholder_score, 18.0);
        assert_eq!(calc_a.potential_score, 80.0);
        assert_eq!(calc_a.volume_score, 100.0);
        assert_eq!(calc_a.category, Category::GrowScale);

        let calc_b = calculate_scores(&b, &stats);
        assert_eq!(calc_b.engagement, 5.0);
        assert_eq!(calc_b.engagement_score, 7.5);
        assert_eq!(calc_b.expansion_score, 8.0);
        assert_eq!(calc_b.stakeholder_score, 3.0);
        assert_eq!(calc_b.potential_score, 18.5);
        assert_eq!(calc_b.volume_score, 50.0);
        // volume exactly on the threshold, potential below it
        assert_eq!(calc_b.category, Category::Protect);
    }

    #[test]
    fn test_max_arr_account_scores_exactly_100() {
        let accounts = vec![
            account("small", 10.0, 1, 1.0, 50.0, 50.0),
            account("big", 9999.0, 2, 1.0, 50.0, 50.0),
        ];
        let stats = portfolio_stats(&accounts);

        let calc = calculate_scores(&accounts[1], &stats);
        assert_eq!(calc.volume_score, 100.0);
    }

    #[test]
    fn test_scores_stay_in_range() {
        let accounts = vec![
            account("A", 123.0, 7, 1.3, 100.0, 100.0),
            account("B", 45.0, 12, 0.25, 0.0, 100.0),
            account("C", 0.0, 0, 0.0, 30.0, 70.0),
        ];
        let stats = portfolio_stats(&accounts);

        for acc in &accounts {
            let calc = calculate_scores(acc, &stats);
            assert!((0.0..=100.0).contains(&calc.volume_score));
            assert!((0.0..=100.0).contains(&calc.potential_score));
            assert!((0.0..=ENGAGEMENT_WEIGHT).contains(&calc.engagement_score));
            assert!((0.0..=EXPANSION_WEIGHT).contains(&calc.expansion_score));
            assert!((0.0..=STAKEHOLDER_WEIGHT).contains(&calc.stakeholder_score));
        }
    }

    #[test]
    fn test_zero_maxima_resolve_to_zero_not_nan() {
        // Single account with zero ARR and zero engagement: both
        // normalizations would divide by zero
        let acc = account("zero", 0.0, 0, 0.0, 0.0, 0.0);
        let stats = portfolio_stats(std::slice::from_ref(&acc));

        assert_eq!(stats.arr_max, 0.0);
        assert_eq!(stats.engagement_max, 0.0);

        let calc = calculate_scores(&acc, &stats);
        assert_eq!(calc.engagement_score, 0.0);
        assert_eq!(calc.volume_score, 0.0);
        assert_eq!(calc.potential_score, 0.0);
        assert_eq!(calc.category, Category::MaintainExit);
        assert!(calc.volume_score.is_finite());
        assert!(calc.potential_score.is_finite());
    }

    #[test]
    fn test_derivation_does_not_depend_on_ordering() {
        let a = account("A", 100.0, 10, 2.0, 80.0, 60.0);
        let b = account("B", 50.0, 5, 1.0, 20.0, 10.0);

        let forward = portfolio_stats(&[a.clone(), b.clone()]);
        let reverse = portfolio_stats(&[b.clone(), a.clone()]);
        assert_eq!(forward, reverse);

        let calc_forward = calculate_scores(&a, &forward);
        let calc_reverse = calculate_scores(&a, &reverse);
        assert_eq!(calc_forward.potential_score, calc_reverse.potential_score);
        assert_eq!(calc_forward.volume_score, calc_reverse.volume_score);
    }
}
