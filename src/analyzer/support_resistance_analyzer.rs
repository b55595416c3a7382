use crate::config_loader::{ConfigError, ConfigResult, ConfigValidation};
use crate::model::{Candle, Pattern, PatternPoint, PatternType};
use serde::{Deserialize, Serialize};

/// 레벨 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelType {
    Support,
    Resistance,
}

impl LevelType {
    fn pattern_type(&self) -> PatternType {
        match self {
            LevelType::Support => PatternType::Support,
            LevelType::Resistance => PatternType::Resistance,
        }
    }
}

/// 지지/저항 레벨 데이터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportResistanceLevel {
    /// 레벨 가격
    pub price: f64,
    pub level_type: LevelType,
    /// 레벨을 계산한 구간 (양 끝 포함)
    pub start_index: usize,
    pub end_index: usize,
}

impl SupportResistanceLevel {
    /// 구간 처음과 끝을 잇는 수평선 패턴
    pub fn to_pattern<C: Candle>(&self, candles: &[C]) -> Option<Pattern> {
        let start = candles.get(self.start_index)?;
        let end = candles.get(self.end_index)?;
        Some(Pattern {
            name: self.level_type.pattern_type().display_name().to_owned(),
            pattern_type: self.level_type.pattern_type(),
            points: vec![
                PatternPoint {
                    time: start.time_millis(),
                    price: self.price,
                },
                PatternPoint {
                    time: end.time_millis(),
                    price: self.price,
                },
            ],
            confidence: 1.0,
        })
    }
}

/// 지지/저항 분석 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportResistanceConfig {
    pub lookback: usize,
}

impl Default for SupportResistanceConfig {
    fn default() -> Self {
        SupportResistanceConfig { lookback: 20 }
    }
}

impl ConfigValidation for SupportResistanceConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.lookback == 0 {
            return Err(ConfigError::ValidationError(
                "support_resistance.lookback은 0보다 커야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}

/// 마지막 `lookback`개 캔들의 지지선(최저 저가)과 저항선(최고 고가)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    pub support: SupportResistanceLevel,
    pub resistance: SupportResistanceLevel,
}

impl SupportResistance {
    /// 캔들 윈도우에서 지지/저항 레벨 계산
    ///
    /// 캔들이 `lookback`보다 적으면 있는 만큼만 사용하며, 비어 있으면 `None`입니다.
    pub fn from_candles<C: Candle>(candles: &[C], lookback: usize) -> Option<SupportResistance> {
        if candles.is_empty() || lookback == 0 {
            return None;
        }

        let start_index = candles.len().saturating_sub(lookback);
        let end_index = candles.len() - 1;
        let window = &candles[start_index..];

        let support = window
            .iter()
            .map(|c| c.low_price())
            .filter(|v| v.is_finite())
            .reduce(f64::min)?;
        let resistance = window
            .iter()
            .map(|c| c.high_price())
            .filter(|v| v.is_finite())
            .reduce(f64::max)?;

        Some(SupportResistance {
            support: SupportResistanceLevel {
                price: support,
                level_type: LevelType::Support,
                start_index,
                end_index,
            },
            resistance: SupportResistanceLevel {
                price: resistance,
                level_type: LevelType::Resistance,
                start_index,
                end_index,
            },
        })
    }

    /// 가격이 지지선 근처(`threshold` 비율 이내)에 있는지 확인
    pub fn is_near_support(&self, price: f64, threshold: f64) -> bool {
        (price - self.support.price).abs() <= self.support.price.abs() * threshold
    }

    /// 가격이 저항선 근처(`threshold` 비율 이내)에 있는지 확인
    pub fn is_near_resistance(&self, price: f64, threshold: f64) -> bool {
        (price - self.resistance.price).abs() <= self.resistance.price.abs() * threshold
    }

    /// 지지선, 저항선 순서의 그리기용 패턴
    pub fn to_patterns<C: Candle>(&self, candles: &[C]) -> Vec<Pattern> {
        [&self.support, &self.resistance]
            .into_iter()
            .filter_map(|level| level.to_pattern(candles))
            .collect()
    }
}
