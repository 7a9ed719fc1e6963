//! Derived stock aggregation.
//!
//! The source of truth is the raw movement rows; aggregation is an explicit
//! operation here rather than an ad-hoc client computation. The store calls
//! this over a product's movements so there is exactly one implementation
//! of the stock law.

use crate::movement::Movement;

/// Signed sum of a set of movements.
///
/// Callers pass the movements of a single product; entries for other
/// products must be filtered out before aggregation. The result may be
/// negative: outflows are not blocked at record time and adjustments are
/// the sanctioned correction path.
pub fn derived_stock<'a, I>(movements: I) -> i64
where
    I: IntoIterator<Item = &'a Movement>,
{
    movements.into_iter().map(Movement::signed_effect).sum()
}
