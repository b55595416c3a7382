// 종가/고가/저가 배열을 받는 순수 함수형 기술적 지표 모듈

pub mod bband;
pub mod extrema;
pub mod ma;
pub mod macd;
pub mod rsi;
pub mod utils;

use crate::config_loader::{ConfigError, ConfigResult, ConfigValidation};
use bband::BollingerBands;
use ma::MA;
use ma::ema::EMA;
use macd::{MACD, MACDCrossover, MACDParams, MACDStrength};
use rsi::RSI;
use serde::{Deserialize, Serialize};

/// 지표 계산 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub rsi_period: usize,
    pub ema_short: usize,
    pub ema_long: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    /// |MACD - 시그널|이 이 값을 넘으면 Medium
    pub macd_medium_spread: f64,
    /// |MACD - 시그널|이 이 값을 넘으면 High
    pub macd_high_spread: f64,
    pub bollinger_period: usize,
    pub bollinger_multiplier: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        IndicatorConfig {
            rsi_period: rsi::DEFAULT_RSI_PERIOD,
            ema_short: 12,
            ema_long: 26,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            macd_medium_spread: 5.0,
            macd_high_spread: 10.0,
            bollinger_period: 20,
            bollinger_multiplier: 2.0,
        }
    }
}

impl IndicatorConfig {
    pub fn macd_params(&self) -> MACDParams {
        MACDParams {
            fast_period: self.macd_fast,
            slow_period: self.macd_slow,
            signal_period: self.macd_signal,
        }
    }
}

impl ConfigValidation for IndicatorConfig {
    fn validate(&self) -> ConfigResult<()> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("ema_short", self.ema_short),
            ("ema_long", self.ema_long),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bollinger_period", self.bollinger_period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, period)| *period == 0) {
            return Err(ConfigError::ValidationError(format!(
                "{}는 0보다 커야 합니다",
                name
            )));
        }

        if self.macd_fast >= self.macd_slow {
            return Err(ConfigError::ValidationError(
                "macd_fast는 macd_slow보다 작아야 합니다".to_string(),
            ));
        }

        if !(self.bollinger_multiplier > 0.0) {
            return Err(ConfigError::ValidationError(
                "bollinger_multiplier는 0보다 커야 합니다".to_string(),
            ));
        }

        if !(self.macd_medium_spread >= 0.0 && self.macd_medium_spread <= self.macd_high_spread) {
            return Err(ConfigError::ValidationError(
                "0 <= macd_medium_spread <= macd_high_spread 이어야 합니다".to_string(),
            ));
        }

        Ok(())
    }
}

/// MACD 요약
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MACDSummary {
    pub signal: MACDCrossover,
    pub strength: MACDStrength,
    pub macd: Option<f64>,
    pub signal_line: Option<f64>,
    pub histogram: Option<f64>,
}

/// 단기/장기 EMA 요약
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EMASummary {
    pub short: Option<f64>,
    pub long: Option<f64>,
}

/// 볼린저 밴드 요약
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerSummary {
    pub upper: Option<f64>,
    pub middle: Option<f64>,
    pub lower: Option<f64>,
    pub width: Option<f64>,
}

/// 종가 배열 하나로 계산한 지표 스냅샷
///
/// 각 지표의 최소 기간보다 이력이 짧으면 해당 필드는 `None`입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSummary {
    pub rsi: Option<f64>,
    pub macd: MACDSummary,
    pub ema: EMASummary,
    pub bollinger: BollingerSummary,
}

impl IndicatorSummary {
    /// 기본 기간(RSI 14, EMA 12/26, MACD 12/26/9, 볼린저 20/2σ)으로 계산
    pub fn from_closes(closes: &[f64]) -> IndicatorSummary {
        Self::with_config(closes, &IndicatorConfig::default())
    }

    pub fn with_config(closes: &[f64], config: &IndicatorConfig) -> IndicatorSummary {
        let rsi = RSI::from_values(closes, config.rsi_period).map(|rsi| rsi.value);

        let macd = match MACD::from_values(closes, &config.macd_params()) {
            Some(macd) => MACDSummary {
                signal: macd.crossover(),
                strength: macd.strength(config.macd_medium_spread, config.macd_high_spread),
                macd: Some(macd.macd_line),
                signal_line: Some(macd.signal_line),
                histogram: Some(macd.histogram),
            },
            None => MACDSummary {
                signal: MACDCrossover::Neutral,
                strength: MACDStrength::Low,
                macd: None,
                signal_line: None,
                histogram: None,
            },
        };

        let ema = EMASummary {
            short: EMA::from_values(closes, config.ema_short).map(|ema| ema.get()),
            long: EMA::from_values(closes, config.ema_long).map(|ema| ema.get()),
        };

        let bands = BollingerBands::from_values(
            closes,
            config.bollinger_period,
            config.bollinger_multiplier,
        );
        let bollinger = BollingerSummary {
            upper: bands.as_ref().map(|b| b.upper()),
            middle: bands.as_ref().map(|b| b.middle()),
            lower: bands.as_ref().map(|b| b.lower()),
            width: bands.as_ref().map(|b| b.width()),
        };

        log::trace!(
            "지표 계산 완료: closes={}, rsi={:?}, macd={:?}",
            closes.len(),
            rsi,
            macd.signal
        );

        IndicatorSummary {
            rsi,
            macd,
            ema,
            bollinger,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_history_is_all_none() {
        let summary = IndicatorSummary::from_closes(&[10.0, 10.5, 11.0, 10.8, 10.2]);
        assert!(summary.rsi.is_none());
        assert!(summary.macd.macd.is_none());
        assert_eq!(summary.macd.signal, MACDCrossover::Neutral);
        assert!(summary.ema.short.is_none());
        assert!(summary.ema.long.is_none());
        assert!(summary.bollinger.upper.is_none());
        assert!(summary.bollinger.width.is_none());
    }

    #[test]
    fn test_partial_history() {
        let closes = (0..20).map(|i| 100.0 + i as f64).collect::<Vec<_>>();
        let summary = IndicatorSummary::from_closes(&closes);
        assert!(summary.rsi.is_some());
        assert!(summary.ema.short.is_some());
        assert!(summary.ema.long.is_none());
        assert!(summary.macd.macd.is_none());
        assert!(summary.bollinger.middle.is_some());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(IndicatorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_macd_periods() {
        let config = IndicatorConfig {
            macd_fast: 26,
            macd_slow: 12,
            ..IndicatorConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
