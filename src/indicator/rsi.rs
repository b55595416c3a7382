use crate::indicator::utils::finite;
use std::fmt::Display;

/// RSI 기본 기간
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// RSI 계산 함수
///
/// 마지막 `period`개 가격 변화의 평균 상승폭/하락폭으로 계산합니다.
/// 하락폭 평균이 0이면 1로 대체하므로 순수 상승 구간에서도 100보다 약간 작을 수 있습니다.
///
/// # Returns
/// * `Option<f64>` - `period + 1`개 미만이면 `None`
pub fn calculate_rsi(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period + 1 {
        return None;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in values.len() - period..values.len() {
        let change = values[i] - values[i - 1];
        if change >= 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;
    let avg_loss = if avg_loss == 0.0 { 1.0 } else { avg_loss };

    let rs = avg_gain / avg_loss;
    finite(100.0 - (100.0 / (1.0 + rs))).map(|rsi| rsi.clamp(0.0, 100.0))
}

/// 상대강도지수(RSI) 기술적 지표
///
/// RSI는 가격 변동의 상대적 강도를 측정하여 과매수/과매도 상태를 판단
#[derive(Clone, Debug)]
pub struct RSI {
    /// RSI 계산 기간
    period: usize,
    /// RSI 값 (0-100)
    pub value: f64,
}

impl Display for RSI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({}: {:.2})", self.period, self.value)
    }
}

impl RSI {
    /// 종가 배열에서 RSI 생성
    pub fn from_values(values: &[f64], period: usize) -> Option<RSI> {
        calculate_rsi(values, period).map(|value| RSI { period, value })
    }

    /// RSI가 과매수 상태인지 확인 (일반적으로 70 이상)
    ///
    /// # Arguments
    /// * `threshold` - 과매수 기준값 (기본값 70.0)
    pub fn is_overbought(&self, threshold: Option<f64>) -> bool {
        self.value >= threshold.unwrap_or(70.0)
    }

    /// RSI가 과매도 상태인지 확인 (일반적으로 30 이하)
    ///
    /// # Arguments
    /// * `threshold` - 과매도 기준값 (기본값 30.0)
    pub fn is_oversold(&self, threshold: Option<f64>) -> bool {
        self.value <= threshold.unwrap_or(30.0)
    }

    /// RSI 값이 특정 범위 내에 있는지 확인
    pub fn is_within_range(&self, lower: f64, upper: f64) -> bool {
        self.value >= lower && self.value <= upper
    }

    /// RSI 기간 반환
    pub fn period(&self) -> usize {
        self.period
    }
}
