use crate::indicator::ma::MA;
use crate::indicator::utils::{finite, moving_average};
use std::fmt::Display;

/// 지수이동평균(EMA) 기술적 지표
///
/// 계산된 EMA 값을 저장하고 제공합니다.
#[derive(Clone, Debug)]
pub struct EMA {
    /// EMA 계산 기간
    period: usize,
    /// 계산된 EMA 값
    ema: f64,
}

impl Display for EMA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({}: {:.2})", self.period, self.ema)
    }
}

impl MA for EMA {
    fn get(&self) -> f64 {
        self.ema
    }

    fn period(&self) -> usize {
        self.period
    }
}

impl EMA {
    /// 종가 배열에서 EMA 생성
    ///
    /// # Returns
    /// * `Option<EMA>` - 데이터가 기간보다 짧거나 결과가 유한하지 않으면 `None`
    pub fn from_values(values: &[f64], period: usize) -> Option<EMA> {
        if period == 0 || values.len() < period {
            return None;
        }

        let ema = ema_series(values, period).last().copied().and_then(finite)?;
        Some(EMA { period, ema })
    }
}

/// 모든 지점의 EMA를 계산합니다.
///
/// 첫 값으로 시작해 `k = 2 / (period + 1)`로 혼합합니다.
/// 결과 길이는 입력 길이와 같습니다.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let alpha = moving_average::calculate_ema_alpha(period);
    let mut series = Vec::with_capacity(values.len());

    let mut iter = values.iter();
    let Some(&first) = iter.next() else {
        return series;
    };

    let mut ema = first;
    series.push(ema);
    for &price in iter {
        ema = moving_average::calculate_ema_step(price, ema, alpha);
        series.push(ema);
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_series_seeded_at_first_value() {
        let series = ema_series(&[10.0, 20.0, 20.0], 3);
        assert_eq!(series[0], 10.0);
        assert!((series[1] - 15.0).abs() < 1e-12);
        assert!((series[2] - 17.5).abs() < 1e-12);
    }

    #[test]
    fn test_ema_series_empty() {
        assert!(ema_series(&[], 12).is_empty());
    }

    #[test]
    fn test_ema_requires_period() {
        assert!(EMA::from_values(&[1.0, 2.0], 3).is_none());
        assert!(EMA::from_values(&[1.0, 2.0, 3.0], 3).is_some());
    }

    #[test]
    fn test_ema_constant_series() {
        let ema = EMA::from_values(&[4.0; 30], 12).unwrap();
        assert!((ema.get() - 4.0).abs() < 1e-9);
    }
}
