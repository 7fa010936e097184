// =============================================================================
// Drawdown
// =============================================================================
//
//   peak_t     = max(p_0 .. p_t)
//   DRAWDOWN_t = p_t / peak_t - 1
//
// Always <= 0, and exactly 0 on every new running maximum (including t = 0).
// NaN prices are excluded from the running peak and yield NaN at their own
// position.
// =============================================================================

/// Percentage decline from the running peak for each price.
pub fn drawdown_curve(prices: &[f64]) -> Vec<f64> {
    let mut peak: Option<f64> = None;
    prices
        .iter()
        .map(|&price| {
            if price.is_nan() {
                return f64::NAN;
            }
            let p = match peak {
                Some(prev) if prev >= price => prev,
                _ => price,
            };
            peak = Some(p);
            price / p - 1.0
        })
        .collect()
}

/// Deepest drawdown over the whole series (a non-positive number).
///
/// NaN when no price is defined.
pub fn max_drawdown(prices: &[f64]) -> f64 {
    drawdown_curve(prices)
        .into_iter()
        .filter(|dd| !dd.is_nan())
        .fold(None, |acc: Option<f64>, dd| Some(acc.map_or(dd, |m| m.min(dd))))
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn drawdown_known_values() {
        let dd = drawdown_curve(&[100.0, 110.0, 99.0, 121.0]);
        assert_eq!(dd[0], 0.0);
        assert_eq!(dd[1], 0.0);
        assert!((dd[2] + 0.1).abs() < 1e-12);
        assert_eq!(dd[3], 0.0);
    }

    #[test]
    fn max_drawdown_picks_deepest() {
        let mdd = max_drawdown(&[100.0, 110.0, 105.0, 115.0, 100.0]);
        assert!((mdd - (100.0 / 115.0 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn max_drawdown_of_rising_series_is_zero() {
        let prices: Vec<f64> = (1..=50).map(|x| x as f64).collect();
        assert_eq!(max_drawdown(&prices), 0.0);
    }

    #[test]
    fn max_drawdown_of_empty_is_nan() {
        assert!(max_drawdown(&[]).is_nan());
    }

    #[test]
    fn nan_price_does_not_reset_peak() {
        let dd = drawdown_curve(&[100.0, f64::NAN, 50.0]);
        assert!(dd[1].is_nan());
        assert!((dd[2] + 0.5).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn drawdown_never_positive(prices in prop::collection::vec(0.01f64..1_000.0, 1..150)) {
            let dd = drawdown_curve(&prices);
            prop_assert_eq!(dd[0], 0.0);
            let mut running_max = f64::MIN;
            for (i, &p) in prices.iter().enumerate() {
                prop_assert!(dd[i] <= 0.0);
                if p >= running_max {
                    running_max = p;
                    prop_assert_eq!(dd[i], 0.0);
                }
            }
        }
    }
}
