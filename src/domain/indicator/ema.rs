//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the SMA of the first n closes, then
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k). First n-1 bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price::PriceBar;

pub fn calculate_ema(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Ema(period);

    if period == 0 {
        let values = bars
            .iter()
            .map(|b| IndicatorPoint::invalid(b.date, IndicatorValue::Simple(0.0)))
            .collect();
        return IndicatorSeries {
            indicator_type,
            values,
        };
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut values = Vec::with_capacity(bars.len());
    let mut seed_sum = 0.0;
    let mut ema = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i + 1 < period {
            seed_sum += bar.close;
            values.push(IndicatorPoint::invalid(bar.date, IndicatorValue::Simple(0.0)));
            continue;
        }

        ema = if i + 1 == period {
            seed_sum += bar.close;
            seed_sum / period as f64
        } else {
            bar.close * k + ema * (1.0 - k)
        };

        values.push(IndicatorPoint {
            date: bar.date,
            valid: true,
            value: IndicatorValue::Simple(ema),
        });
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<PriceBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                ticker: "TEST".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn ema_warmup_then_valid() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_ema(&bars, 3);

        assert_eq!(series.values.len(), 5);
        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[4].valid);
    }

    #[test]
    fn ema_seed_is_sma_of_first_period() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_ema(&bars, 3);

        let seed = series.values[2].simple().unwrap();
        assert_relative_eq!(seed, 20.0);
    }

    #[test]
    fn ema_recurrence_after_seed() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_ema(&bars, 3);

        let k = 2.0 / 4.0;
        let seed = 20.0;
        let ema_3 = 40.0 * k + seed * (1.0 - k);
        let ema_4 = 50.0 * k + ema_3 * (1.0 - k);

        assert_relative_eq!(series.values[3].simple().unwrap(), ema_3);
        assert_relative_eq!(series.values[4].simple().unwrap(), ema_4);
    }

    #[test]
    fn ema_period_1_tracks_closes() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_ema(&bars, 1);

        for (point, bar) in series.values.iter().zip(&bars) {
            assert_relative_eq!(point.simple().unwrap(), bar.close);
        }
    }

    #[test]
    fn ema_constant_prices_stay_constant() {
        let bars = make_bars(&[100.0; 6]);
        let series = calculate_ema(&bars, 3);

        for point in series.values.iter().skip(2) {
            assert_relative_eq!(point.simple().unwrap(), 100.0);
        }
    }

    #[test]
    fn ema_period_0_yields_all_invalid() {
        let bars = make_bars(&[10.0, 20.0]);
        let series = calculate_ema(&bars, 0);

        assert_eq!(series.values.len(), 2);
        assert!(series.values.iter().all(|p| !p.valid));
    }

    #[test]
    fn ema_empty_bars() {
        let series = calculate_ema(&[], 3);
        assert!(series.values.is_empty());
        assert_eq!(series.indicator_type, IndicatorType::Ema(3));
    }

    #[test]
    fn ema_insufficient_bars_all_invalid() {
        let bars = make_bars(&[10.0, 20.0]);
        let series = calculate_ema(&bars, 5);

        assert_eq!(series.values.len(), 2);
        assert!(series.values.iter().all(|p| !p.valid));
    }
}
