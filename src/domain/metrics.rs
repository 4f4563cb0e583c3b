//! Risk and performance statistics over an excess-return series.
//!
//! Every statistic except `count` is an `Option`: `None` means the sample is
//! too small or degenerate for that statistic, not that computation failed.
//! Standard deviations are sample (n - 1) deviations.

use super::series::TimeSeries;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub downside_std: Option<f64>,
    pub vol_annualized: Option<f64>,
    pub sharpe_daily: Option<f64>,
    pub sharpe_annualized: Option<f64>,
    pub sortino_annualized: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub hit_rate: Option<f64>,
    pub cumulative_return: Option<f64>,
    pub t_stat: Option<f64>,
}

impl MetricsSummary {
    /// Reduce `excess`, skipping undefined entries.
    pub fn compute(excess: &TimeSeries<f64>, trading_days: f64) -> Self {
        Self::from_samples(&excess.defined(), trading_days)
    }

    pub fn from_samples(samples: &[f64], trading_days: f64) -> Self {
        let n = samples.len();
        let annualizer = trading_days.sqrt();

        let mean = mean(samples);
        let std = sample_std(samples);

        let downside: Vec<f64> = samples.iter().copied().filter(|&x| x < 0.0).collect();
        let downside_std = sample_std(&downside);

        let vol_annualized = std.map(|s| s * annualizer);
        let sharpe_daily = ratio(mean, std);
        let sharpe_annualized = sharpe_daily.map(|s| s * annualizer);
        let sortino_annualized = ratio(mean, downside_std).map(|s| s * annualizer);

        let t_stat = match (mean, std) {
            (Some(m), Some(s)) if n >= 2 && s != 0.0 => Some(m / (s / (n as f64).sqrt())),
            _ => None,
        };

        let hit_rate = if n > 0 {
            Some(samples.iter().filter(|&&x| x > 0.0).count() as f64 / n as f64)
        } else {
            None
        };

        let equity = equity_curve(samples);
        let cumulative_return = equity.last().map(|e| e - 1.0);

        MetricsSummary {
            count: n,
            mean,
            std,
            downside_std,
            vol_annualized,
            sharpe_daily,
            sharpe_annualized,
            sortino_annualized,
            max_drawdown: max_drawdown(&equity),
            hit_rate,
            cumulative_return,
            t_stat,
        }
    }
}

/// Annualized Sharpe of a sample, as reported in [`MetricsSummary`].
pub fn annualized_sharpe(samples: &[f64], trading_days: f64) -> Option<f64> {
    ratio(mean(samples), sample_std(samples)).map(|s| s * trading_days.sqrt())
}

pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        None
    } else {
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }
}

/// Bessel-corrected standard deviation. Identical samples give exactly 0.
pub fn sample_std(samples: &[f64]) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }
    let first = samples[0];
    if samples.iter().all(|&x| x == first) {
        return Some(0.0);
    }
    let m = samples.iter().sum::<f64>() / samples.len() as f64;
    let ss: f64 = samples.iter().map(|x| (x - m).powi(2)).sum();
    Some((ss / (samples.len() - 1) as f64).sqrt())
}

fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

/// equity[t] = prod_{i <= t} (1 + r[i]), starting from a unit stake.
pub fn equity_curve(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0_f64, |eq, r| {
            *eq *= 1.0 + r;
            Some(*eq)
        })
        .collect()
}

/// Most negative equity / running peak - 1; zero for a non-decreasing curve.
pub fn max_drawdown(equity: &[f64]) -> Option<f64> {
    let first = *equity.first()?;
    let mut peak = first;
    let mut worst = 0.0_f64;

    for &eq in equity {
        if eq > peak {
            peak = eq;
        }
        let dd = if peak > 0.0 { eq / peak - 1.0 } else { -1.0 };
        if dd < worst {
            worst = dd;
        }
    }

    Some(worst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn empty_sample_everything_undefined_but_count() {
        let m = MetricsSummary::from_samples(&[], TRADING_DAYS_PER_YEAR);
        assert_eq!(m.count, 0);
        assert_eq!(m.mean, None);
        assert_eq!(m.std, None);
        assert_eq!(m.max_drawdown, None);
        assert_eq!(m.hit_rate, None);
        assert_eq!(m.cumulative_return, None);
        assert_eq!(m.t_stat, None);
    }

    #[test]
    fn single_sample() {
        let m = MetricsSummary::from_samples(&[0.02], TRADING_DAYS_PER_YEAR);
        assert_eq!(m.count, 1);
        assert_abs_diff_eq!(m.mean.unwrap(), 0.02);
        assert_eq!(m.std, None);
        assert_eq!(m.vol_annualized, None);
        assert_eq!(m.sharpe_annualized, None);
        assert_eq!(m.t_stat, None);
        assert_abs_diff_eq!(m.hit_rate.unwrap(), 1.0);
        assert_abs_diff_eq!(m.cumulative_return.unwrap(), 0.02, epsilon = 1e-12);
        assert_abs_diff_eq!(m.max_drawdown.unwrap(), 0.0);
    }

    #[test]
    fn known_statistics() {
        let xs = [0.01, -0.02, 0.03, -0.01, 0.02];
        let m = MetricsSummary::from_samples(&xs, TRADING_DAYS_PER_YEAR);

        let mean = 0.03 / 5.0;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / 4.0;
        let std = var.sqrt();

        assert_abs_diff_eq!(m.mean.unwrap(), mean, epsilon = 1e-15);
        assert_abs_diff_eq!(m.std.unwrap(), std, epsilon = 1e-15);
        assert_abs_diff_eq!(m.vol_annualized.unwrap(), std * 252f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(m.sharpe_daily.unwrap(), mean / std, epsilon = 1e-12);
        assert_abs_diff_eq!(
            m.sharpe_annualized.unwrap(),
            mean / std * 252f64.sqrt(),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(m.t_stat.unwrap(), mean / (std / 5f64.sqrt()), epsilon = 1e-12);
        assert_abs_diff_eq!(m.hit_rate.unwrap(), 0.6, epsilon = 1e-15);
    }

    #[test]
    fn downside_std_uses_negative_subset() {
        let xs = [0.05, -0.02, 0.01, -0.04];
        let m = MetricsSummary::from_samples(&xs, TRADING_DAYS_PER_YEAR);
        // negatives: [-0.02, -0.04] → mean -0.03, var = (0.0001 + 0.0001) / 1
        assert_abs_diff_eq!(m.downside_std.unwrap(), 0.0002f64.sqrt(), epsilon = 1e-12);
        let expected = m.mean.unwrap() / 0.0002f64.sqrt() * 252f64.sqrt();
        assert_abs_diff_eq!(m.sortino_annualized.unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn downside_undefined_with_one_negative() {
        let m = MetricsSummary::from_samples(&[0.01, 0.02, -0.01], TRADING_DAYS_PER_YEAR);
        assert_eq!(m.downside_std, None);
        assert_eq!(m.sortino_annualized, None);
        assert!(m.sharpe_annualized.is_some());
    }

    #[test]
    fn downside_zero_makes_sortino_undefined() {
        let m = MetricsSummary::from_samples(&[0.01, -0.02, -0.02], TRADING_DAYS_PER_YEAR);
        assert_eq!(m.downside_std, Some(0.0));
        assert_eq!(m.sortino_annualized, None);
    }

    #[test]
    fn identical_samples_have_undefined_sharpe() {
        let m = MetricsSummary::from_samples(&[0.001; 20], TRADING_DAYS_PER_YEAR);
        assert_eq!(m.std, Some(0.0));
        assert_eq!(m.vol_annualized, Some(0.0));
        assert_eq!(m.sharpe_annualized, None);
        assert_eq!(m.t_stat, None);
    }

    #[test]
    fn all_zero_samples() {
        let m = MetricsSummary::from_samples(&[0.0; 10], TRADING_DAYS_PER_YEAR);
        assert_eq!(m.sharpe_annualized, None);
        assert_eq!(m.sortino_annualized, None);
        assert_eq!(m.max_drawdown, Some(0.0));
        assert_eq!(m.hit_rate, Some(0.0));
        assert_eq!(m.cumulative_return, Some(0.0));
    }

    #[test]
    fn custom_trading_days() {
        let xs = [0.01, -0.01, 0.02];
        let daily = MetricsSummary::from_samples(&xs, 1.0);
        let weekly = MetricsSummary::from_samples(&xs, 52.0);
        assert_abs_diff_eq!(
            weekly.sharpe_annualized.unwrap(),
            daily.sharpe_annualized.unwrap() * 52f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn equity_and_cumulative_return() {
        let xs = [0.1, -0.5, 0.2];
        let eq = equity_curve(&xs);
        assert_abs_diff_eq!(eq[0], 1.1, epsilon = 1e-12);
        assert_abs_diff_eq!(eq[1], 0.55, epsilon = 1e-12);
        assert_abs_diff_eq!(eq[2], 0.66, epsilon = 1e-12);
        let m = MetricsSummary::from_samples(&xs, TRADING_DAYS_PER_YEAR);
        assert_abs_diff_eq!(m.cumulative_return.unwrap(), -0.34, epsilon = 1e-12);
    }

    #[test]
    fn max_drawdown_peak_to_trough() {
        let eq = [100.0, 110.0, 90.0, 95.0, 80.0, 100.0];
        assert_abs_diff_eq!(max_drawdown(&eq).unwrap(), 80.0 / 110.0 - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn max_drawdown_zero_for_rising_curve() {
        assert_eq!(max_drawdown(&[1.0, 1.0, 1.2, 1.5]), Some(0.0));
        assert_eq!(max_drawdown(&[]), None);
    }

    #[test]
    fn annualized_sharpe_matches_summary() {
        let xs = [0.003, -0.001, 0.002, 0.0, -0.004, 0.006];
        let m = MetricsSummary::from_samples(&xs, TRADING_DAYS_PER_YEAR);
        assert_eq!(annualized_sharpe(&xs, TRADING_DAYS_PER_YEAR), m.sharpe_annualized);
    }
}
