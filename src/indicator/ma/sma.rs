use crate::indicator::ma::MA;
use crate::indicator::utils::{finite, moving_average};
use std::fmt::Display;

#[derive(Clone, Debug)]
pub struct SMA {
    period: usize,
    sma: f64,
}

impl Display for SMA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMA({}: {})", self.period, self.sma)
    }
}

impl MA for SMA {
    fn get(&self) -> f64 {
        self.sma
    }

    fn period(&self) -> usize {
        self.period
    }
}

impl SMA {
    pub fn from_values(values: &[f64], period: usize) -> Option<SMA> {
        simple_moving_average(values, period).map(|sma| SMA { period, sma })
    }
}

/// 마지막 `period`개 값의 단순이동평균. 데이터 부족 또는 NaN이면 `None`
pub fn simple_moving_average(values: &[f64], period: usize) -> Option<f64> {
    moving_average::calculate_sma(values, period).and_then(finite)
}
