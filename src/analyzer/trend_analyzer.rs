use crate::config_loader::{ConfigError, ConfigResult, ConfigValidation};
use crate::indicator::ma::MAType;
use crate::model::Trend;
use serde::{Deserialize, Serialize};

/// 추세 분류 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    pub short_period: usize,
    pub long_period: usize,
    /// 장기 이동평균 대비 허용 폭 (0.01 = ±1%)
    pub band: f64,
    pub ma_type: MAType,
}

impl Default for TrendConfig {
    fn default() -> Self {
        TrendConfig {
            short_period: 10,
            long_period: 30,
            band: 0.01,
            ma_type: MAType::SMA,
        }
    }
}

impl ConfigValidation for TrendConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.short_period == 0 || self.short_period >= self.long_period {
            return Err(ConfigError::ValidationError(format!(
                "0 < short_period < long_period 이어야 합니다: {} / {}",
                self.short_period, self.long_period
            )));
        }
        if !(0.0..1.0).contains(&self.band) {
            return Err(ConfigError::ValidationError(format!(
                "trend.band는 [0, 1) 범위여야 합니다: {}",
                self.band
            )));
        }
        Ok(())
    }
}

/// 단기/장기 단순이동평균으로 추세 분류 (기본 허용 폭 1%)
///
/// # Arguments
/// * `closes` - 시간 오름차순 종가
/// * `short_period` - 단기 기간 (기본값 10)
/// * `long_period` - 장기 기간 (기본값 30)
pub fn classify_trend(closes: &[f64], short_period: usize, long_period: usize) -> Trend {
    classify_trend_with_config(
        closes,
        &TrendConfig {
            short_period,
            long_period,
            ..TrendConfig::default()
        },
    )
}

/// 단기 이동평균이 장기 이동평균보다 `band` 이상 높으면 상승, 낮으면 하락, 그 외 횡보.
///
/// 이력이 장기 기간보다 짧으면 횡보를 반환합니다.
pub fn classify_trend_with_config(closes: &[f64], config: &TrendConfig) -> Trend {
    if closes.len() < config.long_period {
        log::trace!(
            "추세 분류 데이터 부족: {} < {}",
            closes.len(),
            config.long_period
        );
        return Trend::Sideways;
    }

    let (Some(short), Some(long)) = (
        config.ma_type.compute(closes, config.short_period),
        config.ma_type.compute(closes, config.long_period),
    ) else {
        return Trend::Sideways;
    };

    let (short, long) = (short.get(), long.get());
    if short > long * (1.0 + config.band) {
        Trend::Bullish
    } else if short < long * (1.0 - config.band) {
        Trend::Bearish
    } else {
        Trend::Sideways
    }
}
