//! Price histogram bucketing for the bar chart.

use crate::report::models::PriceRangeCount;

/// A contiguous price interval of the histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct PriceBand {
    /// The lowest whole price shown in the label.
    pub min: u32,
    /// The highest price in the band, inclusive. `None` for the open-ended last band.
    pub max: Option<u32>,
}

impl PriceBand {
    const fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    /// The label shown on the chart, e.g. "0-100" or "901-above".
    pub(super) fn label(&self) -> String {
        match self.max {
            Some(max) => format!("{}-{}", self.min, max),
            None => format!("{}-above", self.min),
        }
    }
}

/// The bands of the bar chart, in display order.
pub(super) const PRICE_BANDS: [PriceBand; 10] = [
    PriceBand::new(0, Some(100)),
    PriceBand::new(101, Some(200)),
    PriceBand::new(201, Some(300)),
    PriceBand::new(301, Some(400)),
    PriceBand::new(401, Some(500)),
    PriceBand::new(501, Some(600)),
    PriceBand::new(601, Some(700)),
    PriceBand::new(701, Some(800)),
    PriceBand::new(801, Some(900)),
    PriceBand::new(901, None),
];

/// Finds the index of the band in [PRICE_BANDS] that `price` belongs to.
///
/// A band holds every price above the previous band's maximum up to and
/// including its own maximum, so fractional prices such as 100.5 fall in the
/// next band ("101-200") rather than between bands.
///
/// # Returns
/// `None` for negative prices and NaN.
pub(super) fn find_price_band(price: f64) -> Option<usize> {
    if price.is_nan() || price < 0.0 {
        return None;
    }

    PRICE_BANDS
        .iter()
        .position(|band| band.max.is_none_or(|max| price <= f64::from(max)))
}

/// Counts `prices` per price band.
///
/// # Returns
/// One entry per band of [PRICE_BANDS], in the same order, including bands
/// with a count of zero.
pub(super) fn count_by_price_band(prices: &[f64]) -> Vec<PriceRangeCount> {
    let mut counts = [0u32; PRICE_BANDS.len()];

    for &price in prices {
        match find_price_band(price) {
            Some(index) => counts[index] += 1,
            None => tracing::debug!("Price {price} does not fall in any price band"),
        }
    }

    PRICE_BANDS
        .iter()
        .zip(counts)
        .map(|(band, count)| PriceRangeCount {
            price_range: band.label(),
            count,
        })
        .collect()
}
