use crate::config_loader::{ConfigError, ConfigResult, ConfigValidation};
use crate::indicator::extrema::{local_maxima, local_minima};
use crate::model::{Candle, PatternBias, PatternMatch, PatternType};
use log::debug;
use serde::{Deserialize, Serialize};

/// 헤드 앤 숄더 판정 기준
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadShouldersConfig {
    /// 극점 윈도우
    pub window: usize,
    /// |p1 - p3| / max(p1, p3) 최대값 (미만)
    pub shoulder_tolerance: f64,
    /// (p2 - max(p1, p3)) / p2 최소값 (초과)
    pub min_head_prominence: f64,
    pub base_confidence: f64,
    pub confidence_weight: f64,
    pub max_confidence: f64,
}

impl Default for HeadShouldersConfig {
    fn default() -> Self {
        HeadShouldersConfig {
            window: 3,
            shoulder_tolerance: 0.05,
            min_head_prominence: 0.02,
            base_confidence: 0.7,
            confidence_weight: 0.25,
            max_confidence: 0.95,
        }
    }
}

/// 이중 천장/바닥 판정 기준
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoubleExtremumConfig {
    pub window: usize,
    /// 두 극점 가격 차이 비율 최대값 (미만)
    pub price_tolerance: f64,
    /// 두 극점 인덱스 간격 하한 (초과)
    pub min_distance: usize,
    /// 두 극점 인덱스 간격 상한 (미만)
    pub max_distance: usize,
    pub base_confidence: f64,
    pub confidence_weight: f64,
    pub max_confidence: f64,
}

impl Default for DoubleExtremumConfig {
    fn default() -> Self {
        DoubleExtremumConfig {
            window: 3,
            price_tolerance: 0.03,
            min_distance: 5,
            max_distance: 50,
            base_confidence: 0.6,
            confidence_weight: 0.3,
            max_confidence: 0.9,
        }
    }
}

/// 상승 삼각형 판정 기준
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AscendingTriangleConfig {
    /// 검사할 최근 캔들 수
    pub lookback: usize,
    pub window: usize,
    /// 저항 고점들의 평균 대비 최대 편차 비율 (이하)
    pub resistance_tolerance: f64,
    /// 사용할 최근 고점/저점 개수
    pub pivot_count: usize,
    pub confidence: f64,
}

impl Default for AscendingTriangleConfig {
    fn default() -> Self {
        AscendingTriangleConfig {
            lookback: 20,
            window: 2,
            resistance_tolerance: 0.02,
            pivot_count: 3,
            confidence: 0.8,
        }
    }
}

/// 차트 패턴 탐지 설정
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    pub head_shoulders: HeadShouldersConfig,
    pub double_extremum: DoubleExtremumConfig,
    pub ascending_triangle: AscendingTriangleConfig,
}

fn check_ratio(name: &str, value: f64) -> ConfigResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{}는 [0, 1] 범위여야 합니다: {}",
            name, value
        )))
    }
}

/// 극점 비교 구간 길이 `2 * window + 1`
fn check_window(name: &str, window: usize) -> ConfigResult<usize> {
    if window == 0 {
        return Err(ConfigError::ValidationError(format!(
            "{}는 0보다 커야 합니다",
            name
        )));
    }
    window
        .checked_mul(2)
        .and_then(|w| w.checked_add(1))
        .ok_or_else(|| {
            ConfigError::ValidationError(format!("{}가 너무 큽니다: {}", name, window))
        })
}

impl ConfigValidation for PatternConfig {
    fn validate(&self) -> ConfigResult<()> {
        let hs = &self.head_shoulders;
        check_window("head_shoulders.window", hs.window)?;
        check_ratio("head_shoulders.shoulder_tolerance", hs.shoulder_tolerance)?;
        check_ratio("head_shoulders.min_head_prominence", hs.min_head_prominence)?;
        check_ratio("head_shoulders.base_confidence", hs.base_confidence)?;
        check_ratio("head_shoulders.max_confidence", hs.max_confidence)?;

        let de = &self.double_extremum;
        check_window("double_extremum.window", de.window)?;
        check_ratio("double_extremum.price_tolerance", de.price_tolerance)?;
        check_ratio("double_extremum.base_confidence", de.base_confidence)?;
        check_ratio("double_extremum.max_confidence", de.max_confidence)?;
        if de.min_distance >= de.max_distance {
            return Err(ConfigError::ValidationError(format!(
                "double_extremum.min_distance({})는 max_distance({})보다 작아야 합니다",
                de.min_distance, de.max_distance
            )));
        }

        let at = &self.ascending_triangle;
        let span = check_window("ascending_triangle.window", at.window)?;
        check_ratio(
            "ascending_triangle.resistance_tolerance",
            at.resistance_tolerance,
        )?;
        check_ratio("ascending_triangle.confidence", at.confidence)?;
        if at.pivot_count < 2 {
            return Err(ConfigError::ValidationError(
                "ascending_triangle.pivot_count는 2 이상이어야 합니다".to_string(),
            ));
        }
        if at.lookback < span {
            return Err(ConfigError::ValidationError(format!(
                "ascending_triangle.lookback({})은 2 * window + 1 이상이어야 합니다",
                at.lookback
            )));
        }

        Ok(())
    }
}

/// 헤드 앤 숄더 탐지
///
/// 연속한 고점 세 개 (p1, p2, p3)에서 p2가 양쪽보다 높고, 어깨 높이가 비슷하며
/// 머리가 충분히 돌출된 첫 번째 조합을 반환합니다.
pub fn detect_head_and_shoulders(
    highs: &[f64],
    config: &HeadShouldersConfig,
) -> Option<PatternMatch> {
    let peaks = local_maxima(highs, config.window);

    peaks.windows(3).find_map(|triple| {
        let (idx1, idx2, idx3) = (triple[0], triple[1], triple[2]);
        let (p1, p2, p3) = (highs[idx1], highs[idx2], highs[idx3]);

        if !(p2 > p1 && p2 > p3) {
            return None;
        }

        let shoulder_top = p1.max(p3);
        if shoulder_top <= 0.0 {
            return None;
        }
        let shoulder_diff = (p1 - p3).abs() / shoulder_top;
        let head_height = (p2 - shoulder_top) / p2;

        if shoulder_diff < config.shoulder_tolerance && head_height > config.min_head_prominence {
            Some(PatternMatch {
                kind: PatternType::HeadShoulders,
                bias: PatternBias::Bearish,
                range: (idx1, idx3),
                pivots: vec![(idx1, p1), (idx2, p2), (idx3, p3)],
                confidence: config
                    .max_confidence
                    .min(config.base_confidence + (1.0 - shoulder_diff) * config.confidence_weight),
                description: "하락 반전: 비슷한 높이의 두 어깨 사이에 머리".to_string(),
            })
        } else {
            None
        }
    })
}

/// 연속한 두 극점 중 가격 차이와 간격 기준을 만족하는 첫 쌍
///
/// `denominator`는 가격 차이 비율의 분모를 고른다 (천장은 큰 값, 바닥은 작은 값).
fn find_double(
    series: &[f64],
    pivots: &[usize],
    config: &DoubleExtremumConfig,
    denominator: impl Fn(f64, f64) -> f64,
) -> Option<(usize, usize, f64)> {
    pivots.windows(2).find_map(|pair| {
        let (idx1, idx2) = (pair[0], pair[1]);
        let (v1, v2) = (series[idx1], series[idx2]);

        let base = denominator(v1, v2);
        if !(base > 0.0) {
            return None;
        }
        let price_diff = (v1 - v2).abs() / base;
        let distance = idx2 - idx1;

        (price_diff < config.price_tolerance
            && distance > config.min_distance
            && distance < config.max_distance)
            .then_some((idx1, idx2, price_diff))
    })
}

fn double_confidence(config: &DoubleExtremumConfig, price_diff: f64) -> f64 {
    config
        .max_confidence
        .min(config.base_confidence + (1.0 - price_diff) * config.confidence_weight)
}

/// 이중 천장 탐지 (고점 기준)
pub fn detect_double_top(highs: &[f64], config: &DoubleExtremumConfig) -> Option<PatternMatch> {
    let peaks = local_maxima(highs, config.window);
    let (idx1, idx2, price_diff) = find_double(highs, &peaks, config, f64::max)?;

    Some(PatternMatch {
        kind: PatternType::DoubleTop,
        bias: PatternBias::Bearish,
        range: (idx1, idx2),
        pivots: vec![(idx1, highs[idx1]), (idx2, highs[idx2])],
        confidence: double_confidence(config, price_diff),
        description: "하락 반전: 비슷한 높이의 두 고점".to_string(),
    })
}

/// 이중 바닥 탐지 (저점 기준)
pub fn detect_double_bottom(lows: &[f64], config: &DoubleExtremumConfig) -> Option<PatternMatch> {
    let valleys = local_minima(lows, config.window);
    let (idx1, idx2, price_diff) = find_double(lows, &valleys, config, f64::min)?;

    Some(PatternMatch {
        kind: PatternType::DoubleBottom,
        bias: PatternBias::Bullish,
        range: (idx1, idx2),
        pivots: vec![(idx1, lows[idx1]), (idx2, lows[idx2])],
        confidence: double_confidence(config, price_diff),
        description: "상승 반전: 비슷한 깊이의 두 저점".to_string(),
    })
}

/// 상승 삼각형 탐지
///
/// 최근 `lookback`개 캔들에서 마지막 고점들이 평균 대비 `resistance_tolerance` 이내(수평 저항)이고
/// 마지막 저점들이 엄격하게 상승(상승 지지)하면 탐지합니다.
pub fn detect_ascending_triangle(
    highs: &[f64],
    lows: &[f64],
    config: &AscendingTriangleConfig,
) -> Option<PatternMatch> {
    let len = highs.len().min(lows.len());
    if config.lookback == 0 || len < config.lookback {
        return None;
    }

    let offset = len - config.lookback;
    let recent_highs = &highs[offset..len];
    let recent_lows = &lows[offset..len];

    let peaks = local_maxima(recent_highs, config.window);
    if peaks.len() < 2 {
        return None;
    }
    let last_peaks = &peaks[peaks.len().saturating_sub(config.pivot_count)..];
    let peak_prices = last_peaks.iter().map(|&i| recent_highs[i]).collect::<Vec<_>>();
    let resistance = peak_prices.iter().sum::<f64>() / peak_prices.len() as f64;
    if !(resistance > 0.0) {
        return None;
    }

    let max_deviation = peak_prices
        .iter()
        .map(|p| (p - resistance).abs() / resistance)
        .fold(0.0, f64::max);
    if max_deviation > config.resistance_tolerance {
        return None;
    }

    let valleys = local_minima(recent_lows, config.window);
    if valleys.len() < 2 {
        return None;
    }
    let last_valleys = &valleys[valleys.len().saturating_sub(config.pivot_count)..];
    let ascending = last_valleys
        .windows(2)
        .all(|pair| recent_lows[pair[1]] > recent_lows[pair[0]]);
    if !ascending {
        return None;
    }

    let mut pivots = last_peaks
        .iter()
        .map(|&i| (offset + i, recent_highs[i]))
        .collect::<Vec<_>>();
    pivots.extend(last_valleys.iter().map(|&i| (offset + i, recent_lows[i])));

    Some(PatternMatch {
        kind: PatternType::AscendingTriangle,
        bias: PatternBias::Bullish,
        range: (offset, len - 1),
        pivots,
        confidence: config.confidence,
        description: "상승 지속: 수평 저항과 상승하는 지지".to_string(),
    })
}

/// 기본 기준으로 캔들에서 차트 패턴 탐지
///
/// 헤드 앤 숄더 기본 윈도우는 3이므로 고점이 한 캔들 간격으로 붙어 있는 짧은 시퀀스
/// (예: 고가 `[100, 101, 99, 108, 99, 101, 100]`)는 탐지되지 않습니다.
/// 이런 경우 `head_shoulders.window = 1`로 [`detect_patterns_with_config`]를 사용합니다.
pub fn detect_patterns<C: Candle>(candles: &[C]) -> Vec<PatternMatch> {
    detect_patterns_with_config(candles, &PatternConfig::default())
}

/// 캔들에서 차트 패턴 탐지
///
/// 패턴 종류마다 가장 이른 하나만 보고하며, 여러 종류가 함께 나올 수 있습니다.
/// 순서는 헤드 앤 숄더, 이중 천장, 이중 바닥, 상승 삼각형입니다.
pub fn detect_patterns_with_config<C: Candle>(
    candles: &[C],
    config: &PatternConfig,
) -> Vec<PatternMatch> {
    let highs = candles.iter().map(|c| c.high_price()).collect::<Vec<_>>();
    let lows = candles.iter().map(|c| c.low_price()).collect::<Vec<_>>();

    let patterns = [
        detect_head_and_shoulders(&highs, &config.head_shoulders),
        detect_double_top(&highs, &config.double_extremum),
        detect_double_bottom(&lows, &config.double_extremum),
        detect_ascending_triangle(&highs, &lows, &config.ascending_triangle),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>();

    debug!(
        "캔들 {}개에서 패턴 {}개 탐지: {:?}",
        candles.len(),
        patterns.len(),
        patterns.iter().map(|p| p.kind).collect::<Vec<_>>()
    );
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn narrow_hs_config() -> HeadShouldersConfig {
        HeadShouldersConfig {
            window: 1,
            ..HeadShouldersConfig::default()
        }
    }

    #[test]
    fn test_head_and_shoulders_scenario() {
        let highs = vec![100.0, 101.0, 99.0, 108.0, 99.0, 101.0, 100.0];
        let found = detect_head_and_shoulders(&highs, &narrow_hs_config()).unwrap();

        assert_eq!(found.kind, PatternType::HeadShoulders);
        assert_eq!(found.bias, PatternBias::Bearish);
        assert_eq!(found.range, (1, 5));
        assert!(found.confidence >= 0.7);
        assert!(found.confidence <= 0.95);
        assert_eq!(found.pivots.len(), 3);
    }

    #[test]
    fn test_head_and_shoulders_rejects_flat_head() {
        let highs = vec![100.0, 101.0, 99.0, 101.5, 99.0, 101.0, 100.0];
        assert!(detect_head_and_shoulders(&highs, &narrow_hs_config()).is_none());
    }

    #[test]
    fn test_head_and_shoulders_rejects_uneven_shoulders() {
        let highs = vec![100.0, 101.0, 90.0, 120.0, 90.0, 110.0, 100.0];
        assert!(detect_head_and_shoulders(&highs, &narrow_hs_config()).is_none());
    }

    /// 두 봉우리를 `gap` 간격으로 둔 고가 배열
    fn two_peaks(gap: usize, first: f64, second: f64) -> Vec<f64> {
        let len = gap + 10;
        let mut highs = (0..len).map(|i| 50.0 + (i % 2) as f64).collect::<Vec<_>>();
        highs[4] = first;
        highs[4 + gap] = second;
        highs
    }

    #[test]
    fn test_double_top_distance_bounds() {
        let config = DoubleExtremumConfig::default();
        assert!(detect_double_top(&two_peaks(5, 100.0, 100.0), &config).is_none());
        assert!(detect_double_top(&two_peaks(6, 100.0, 100.0), &config).is_some());
        assert!(detect_double_top(&two_peaks(49, 100.0, 100.0), &config).is_some());
        assert!(detect_double_top(&two_peaks(50, 100.0, 100.0), &config).is_none());
    }

    #[test]
    fn test_double_top_price_tolerance() {
        let config = DoubleExtremumConfig::default();
        let found = detect_double_top(&two_peaks(10, 100.0, 98.0), &config).unwrap();
        assert_eq!(found.range, (4, 14));
        // 0.6 + 0.98 * 0.3
        assert!((found.confidence - 0.894).abs() < 1e-9);

        assert!(detect_double_top(&two_peaks(10, 100.0, 96.0), &config).is_none());
    }

    #[test]
    fn test_double_bottom_uses_minima() {
        let config = DoubleExtremumConfig::default();
        let lows = two_peaks(10, 100.0, 100.0)
            .into_iter()
            .map(|v| -v + 200.0)
            .collect::<Vec<_>>();
        let found = detect_double_bottom(&lows, &config).unwrap();
        assert_eq!(found.kind, PatternType::DoubleBottom);
        assert_eq!(found.bias, PatternBias::Bullish);
        assert_eq!(found.range, (4, 14));
        assert!((found.confidence - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_double_requires_two_extrema() {
        let config = DoubleExtremumConfig::default();
        let highs = vec![1.0, 2.0, 3.0, 9.0, 3.0, 2.0, 1.0];
        assert!(detect_double_top(&highs, &config).is_none());
        assert!(detect_double_bottom(&[], &config).is_none());
    }

    #[test]
    fn test_ascending_triangle_needs_lookback() {
        let highs = vec![10.0; 19];
        let lows = vec![9.0; 19];
        let config = AscendingTriangleConfig::default();
        assert!(detect_ascending_triangle(&highs, &lows, &config).is_none());
    }
}
