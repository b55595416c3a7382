use crate::config_loader::{ConfigError, ConfigResult, ConfigValidation};
use crate::model::Candle;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// 거래량 기반 매집/분산 신호
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeSignal {
    /// 거래량 증가 + 가격 상승
    Accumulation,
    /// 거래량 증가 + 가격 하락
    Distribution,
    Neutral,
}

/// 거래량 분석 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// 평균 거래량 계산 기간
    pub lookback: usize,
    /// 매집/분산 판단에 필요한 최소 상대 거래량 (초과)
    pub signal_ratio: f64,
    /// 거래량 급증 기준 상대 거래량 (초과)
    pub spike_ratio: f64,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        VolumeConfig {
            lookback: 20,
            signal_ratio: 1.3,
            spike_ratio: 1.6,
        }
    }
}

impl ConfigValidation for VolumeConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.lookback == 0 {
            return Err(ConfigError::ValidationError(
                "volume.lookback은 0보다 커야 합니다".to_string(),
            ));
        }
        if !(self.signal_ratio > 0.0 && self.spike_ratio > 0.0) {
            return Err(ConfigError::ValidationError(
                "volume 비율 기준은 0보다 커야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}

/// 거래량 분석 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSummary {
    pub avg_volume: Option<f64>,
    pub current_volume: Option<f64>,
    /// 현재 거래량 / 평균 거래량
    pub relative_volume: Option<f64>,
    pub signal: VolumeSignal,
    pub spike: bool,
}

impl VolumeSummary {
    /// 데이터 부족 시 결과
    pub fn neutral() -> Self {
        VolumeSummary {
            avg_volume: None,
            current_volume: None,
            relative_volume: None,
            signal: VolumeSignal::Neutral,
            spike: false,
        }
    }

    /// 상대 거래량이 `threshold`를 넘는지 확인
    pub fn is_volume_above(&self, threshold: f64) -> bool {
        self.relative_volume.is_some_and(|ratio| ratio > threshold)
    }
}

impl Display for VolumeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Volume(avg={:?}, current={:?}, ratio={:?}, signal={:?}, spike={})",
            self.avg_volume, self.current_volume, self.relative_volume, self.signal, self.spike
        )
    }
}

/// 기본 비율 기준(1.3 / 1.6)으로 거래량 분석
///
/// # Arguments
/// * `candles` - 시간 오름차순 캔들
/// * `lookback` - 평균 거래량 계산 기간 (기본값 20)
pub fn analyze_volume<C: Candle>(candles: &[C], lookback: usize) -> VolumeSummary {
    analyze_volume_with_config(
        candles,
        &VolumeConfig {
            lookback,
            ..VolumeConfig::default()
        },
    )
}

/// 마지막 `lookback`개 캔들로 상대 거래량과 매집/분산 신호를 계산합니다.
///
/// 캔들이 `lookback`보다 적으면 모든 값이 비어 있는 중립 결과를 반환합니다.
/// 평균 거래량이 0이면 상대 거래량은 `None`입니다.
pub fn analyze_volume_with_config<C: Candle>(
    candles: &[C],
    config: &VolumeConfig,
) -> VolumeSummary {
    let lookback = config.lookback;
    if lookback == 0 || candles.len() < lookback {
        log::trace!(
            "거래량 분석 데이터 부족: {} < {}",
            candles.len(),
            lookback
        );
        return VolumeSummary::neutral();
    }

    let recent = &candles[candles.len() - lookback..];
    let avg_volume = recent.iter().map(|c| c.volume()).sum::<f64>() / lookback as f64;
    let current_volume = recent[lookback - 1].volume();
    let relative_volume = (avg_volume > 0.0)
        .then(|| current_volume / avg_volume)
        .filter(|ratio| ratio.is_finite());

    let mut signal = VolumeSignal::Neutral;
    if relative_volume.is_some_and(|ratio| ratio > config.signal_ratio) {
        let price_change = recent[lookback - 1].close_price() - recent[0].close_price();
        if price_change > 0.0 {
            signal = VolumeSignal::Accumulation;
        } else if price_change < 0.0 {
            signal = VolumeSignal::Distribution;
        }
    }

    let spike = relative_volume.is_some_and(|ratio| ratio > config.spike_ratio);

    VolumeSummary {
        avg_volume: Some(avg_volume),
        current_volume: Some(current_volume),
        relative_volume,
        signal,
        spike,
    }
}
