/// 공통 이동평균 계산 함수들
pub mod moving_average {
    /// 단순이동평균(SMA) 계산 - 마지막 `period`개 값의 평균
    ///
    /// # Arguments
    /// * `values` - 가격 데이터 배열
    /// * `period` - 계산 기간
    ///
    /// # Returns
    /// * `Option<f64>` - 데이터가 부족하거나 period가 0이면 `None`
    pub fn calculate_sma(values: &[f64], period: usize) -> Option<f64> {
        if period == 0 || values.len() < period {
            return None;
        }

        let slice = &values[values.len() - period..];
        Some(slice.iter().sum::<f64>() / period as f64)
    }

    /// 마지막 `period`개 값의 모표준편차
    pub fn calculate_standard_deviation(values: &[f64], period: usize) -> Option<f64> {
        let mean = calculate_sma(values, period)?;
        let slice = &values[values.len() - period..];

        let variance = slice
            .iter()
            .map(|&x| {
                let diff = x - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;

        Some(variance.sqrt())
    }

    /// 지수이동평균(EMA) 계산을 위한 알파값 계산
    ///
    /// # Arguments
    /// * `period` - EMA 기간
    ///
    /// # Returns
    /// * `f64` - 알파값 (평활화 계수)
    pub fn calculate_ema_alpha(period: usize) -> f64 {
        2.0 / (period + 1) as f64
    }

    /// 지수이동평균(EMA) 한 스텝 계산
    ///
    /// # Arguments
    /// * `current_price` - 현재 가격
    /// * `previous_ema` - 이전 EMA 값
    /// * `alpha` - 평활화 계수
    ///
    /// # Returns
    /// * `f64` - 계산된 EMA 값
    pub fn calculate_ema_step(current_price: f64, previous_ema: f64, alpha: f64) -> f64 {
        alpha * current_price + (1.0 - alpha) * previous_ema
    }
}

/// 유한한 값만 통과시킨다 (NaN/무한대 -> None)
pub(crate) fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
