use crate::indicator::ma::ema::ema_series;
use crate::indicator::utils::finite;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// MACD 파라미터 (빠른 EMA, 느린 EMA, 시그널 기간)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MACDParams {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
}

impl Default for MACDParams {
    fn default() -> Self {
        MACDParams {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD와 시그널 라인의 교차 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MACDCrossover {
    BullishCrossover,
    BearishCrossover,
    Neutral,
}

/// MACD와 시그널 라인 간격으로 본 신호 강도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MACDStrength {
    Low,
    Medium,
    High,
}

/// MACD(Moving Average Convergence Divergence) 기술적 지표
///
/// MACD는 추세 추종 모멘텀 지표로, 추세의 방향과 강도를 나타냅니다.
#[derive(Clone, Debug)]
pub struct MACD {
    params: MACDParams,
    /// MACD 라인 (빠른 EMA - 느린 EMA)
    pub macd_line: f64,
    /// 시그널 라인 (MACD의 EMA)
    pub signal_line: f64,
    /// 히스토그램 (MACD - 시그널)
    pub histogram: f64,
}

impl Display for MACD {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD({},{},{}: {:.2}, {:.2}, {:.2})",
            self.params.fast_period,
            self.params.slow_period,
            self.params.signal_period,
            self.macd_line,
            self.signal_line,
            self.histogram
        )
    }
}

/// 모든 지점의 MACD 라인과 시그널 라인을 계산합니다.
///
/// MACD 라인은 지점별 `EMA(fast) - EMA(slow)`, 시그널 라인은 MACD 라인의 EMA입니다.
///
/// # Returns
/// * `(Vec<f64>, Vec<f64>)` - (MACD 라인, 시그널 라인), 두 길이 모두 입력 길이와 같음
pub fn macd_series(values: &[f64], params: &MACDParams) -> (Vec<f64>, Vec<f64>) {
    let fast = ema_series(values, params.fast_period);
    let slow = ema_series(values, params.slow_period);

    let macd_lines = fast
        .iter()
        .zip(slow.iter())
        .map(|(fast, slow)| fast - slow)
        .collect::<Vec<_>>();
    let signal_lines = ema_series(&macd_lines, params.signal_period);

    (macd_lines, signal_lines)
}

impl MACD {
    /// 종가 배열에서 MACD 생성
    ///
    /// # Returns
    /// * `Option<MACD>` - 느린 EMA 기간보다 데이터가 짧으면 `None`
    pub fn from_values(values: &[f64], params: &MACDParams) -> Option<MACD> {
        if params.slow_period == 0 || values.len() < params.slow_period {
            return None;
        }

        let (macd_lines, signal_lines) = macd_series(values, params);
        let macd_line = macd_lines.last().copied().and_then(finite)?;
        let signal_line = signal_lines.last().copied().and_then(finite)?;

        Some(MACD {
            params: *params,
            macd_line,
            signal_line,
            histogram: macd_line - signal_line,
        })
    }

    pub fn params(&self) -> &MACDParams {
        &self.params
    }

    /// 마지막 MACD와 시그널 라인의 관계
    pub fn crossover(&self) -> MACDCrossover {
        if self.macd_line > self.signal_line {
            MACDCrossover::BullishCrossover
        } else if self.macd_line < self.signal_line {
            MACDCrossover::BearishCrossover
        } else {
            MACDCrossover::Neutral
        }
    }

    /// |MACD - 시그널| 크기에 따른 강도
    ///
    /// # Arguments
    /// * `medium` - 이 값을 초과하면 Medium
    /// * `high` - 이 값을 초과하면 High
    pub fn strength(&self, medium: f64, high: f64) -> MACDStrength {
        let spread = self.histogram.abs();
        if spread > high {
            MACDStrength::High
        } else if spread > medium {
            MACDStrength::Medium
        } else {
            MACDStrength::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macd_requires_slow_period() {
        let values = (0..25).map(|i| i as f64).collect::<Vec<_>>();
        assert!(MACD::from_values(&values, &MACDParams::default()).is_none());
    }

    #[test]
    fn test_macd_uptrend_is_bullish() {
        let values = (0..60).map(|i| 100.0 + i as f64).collect::<Vec<_>>();
        let macd = MACD::from_values(&values, &MACDParams::default()).unwrap();
        assert!(macd.macd_line > 0.0);
        assert_eq!(macd.crossover(), MACDCrossover::BullishCrossover);
        assert!((macd.histogram - (macd.macd_line - macd.signal_line)).abs() < 1e-12);
    }

    #[test]
    fn test_macd_downtrend_is_bearish() {
        let values = (0..60).map(|i| 200.0 - i as f64).collect::<Vec<_>>();
        let macd = MACD::from_values(&values, &MACDParams::default()).unwrap();
        assert!(macd.macd_line < 0.0);
        assert_eq!(macd.crossover(), MACDCrossover::BearishCrossover);
    }

    #[test]
    fn test_macd_flat_is_neutral() {
        let values = vec![50.0; 40];
        let macd = MACD::from_values(&values, &MACDParams::default()).unwrap();
        assert_eq!(macd.crossover(), MACDCrossover::Neutral);
        assert_eq!(macd.strength(5.0, 10.0), MACDStrength::Low);
    }

    #[test]
    fn test_macd_strength_levels() {
        let macd = MACD {
            params: MACDParams::default(),
            macd_line: 20.0,
            signal_line: 12.0,
            histogram: 8.0,
        };
        assert_eq!(macd.strength(5.0, 10.0), MACDStrength::Medium);

        let macd = MACD {
            histogram: -11.0,
            ..macd
        };
        assert_eq!(macd.strength(5.0, 10.0), MACDStrength::High);
    }
}
