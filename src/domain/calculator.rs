//! Loan payment calculations.
//!
//! Two formulas live here and they are expected to disagree: the calculator
//! screen uses the standard amortization formula, while submitted
//! applications carry a quick estimate based on a flat markup.

use super::models::{LoanTerms, PaymentResult};
use tracing::debug;

/// Markup applied to one month of simple interest by the quick estimate.
pub const QUICK_ESTIMATE_MARKUP: f64 = 1.5;

/// Computes repayment figures for a fixed annual rate.
///
/// # Examples
///
/// ```
/// use microloan::domain::{LoanTerms, PaymentCalculator};
///
/// let result = PaymentCalculator::calculate(&LoanTerms::new(50_000, 12, 15.9));
/// assert_eq!(result.monthly_payment, 4_534);
/// assert_eq!(result.total_repayment, 54_410);
/// assert_eq!(result.overpayment, 4_410);
/// ```
pub struct PaymentCalculator;

impl PaymentCalculator {
    /// Applies the amortization formula `M = P·r·(1+r)^N / ((1+r)^N − 1)`.
    ///
    /// The total is derived from the unrounded monthly payment, and every
    /// output is rounded to whole currency units. A zero rate spreads the
    /// principal evenly; a zero term is repaid at once.
    pub fn calculate(terms: &LoanTerms) -> PaymentResult {
        if terms.term_months == 0 {
            return PaymentResult {
                monthly_payment: terms.principal,
                total_repayment: terms.principal,
                overpayment: 0,
            };
        }

        let principal = terms.principal as f64;
        let months = terms.term_months as f64;
        let rate = terms.monthly_rate();

        let payment = if rate > 0.0 {
            let growth = (1.0 + rate).powf(months);
            principal * rate * growth / (growth - 1.0)
        } else {
            principal / months
        };
        let total = payment * months;
        let overpayment = total - principal;

        debug!(
            principal = terms.principal,
            term = terms.term_months,
            rate = terms.annual_rate,
            payment,
            "payment recalculated"
        );

        PaymentResult {
            monthly_payment: round_units(payment),
            total_repayment: round_units(total),
            overpayment: round_units(overpayment),
        }
    }

    /// Monthly figure recorded on submitted applications:
    /// `round(amount × rate / 12 × 1.5)`.
    ///
    /// ```
    /// use microloan::domain::PaymentCalculator;
    ///
    /// assert_eq!(PaymentCalculator::quick_estimate(50_000, 15.9), 994);
    /// ```
    pub fn quick_estimate(amount: u64, annual_rate: f64) -> u64 {
        round_units(amount as f64 * (annual_rate / 100.0) / 12.0 * QUICK_ESTIMATE_MARKUP)
    }
}

fn round_units(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}
