use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Multiplier taking a pre-tax total to its tax-inclusive amount
/// (20.6% rate).
pub const TAX_FACTOR: Decimal = dec!(1.206);

/// Pre-tax and tax-inclusive totals of a quotation or bill.
///
/// Computed in `Decimal` arithmetic so the same line set always
/// produces the same amounts, down to the last digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotationTotals {
    pub total: Decimal,
    pub tax_inclusive: Decimal,
}

impl QuotationTotals {
    /// Sums `quantity * unit_price` over the given lines. No lines
    /// yields zero totals. Amounts are normalized so the storage
    /// scale does not leak trailing zeros into responses.
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = (i32, Decimal)>,
    {
        let total: Decimal = lines
            .into_iter()
            .map(|(quantity, unit_price)| Decimal::from(quantity) * unit_price)
            .sum();
        Self {
            total: total.normalize(),
            tax_inclusive: (total * TAX_FACTOR).normalize(),
        }
    }
}
