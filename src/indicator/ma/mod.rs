pub mod ema;
pub mod sma;

use ema::EMA;
use serde::{Deserialize, Serialize};
use sma::SMA;
use std::fmt::Debug;
use std::fmt::Display;

/// 이동평균(Moving Average) 인터페이스
///
/// 다양한 이동평균 구현체에 대한 공통 인터페이스
pub trait MA: Display + Send + Debug {
    /// 이동평균 계산 기간
    fn period(&self) -> usize;

    /// 현재 이동평균 값
    fn get(&self) -> f64;
}

/// 이동평균 계산 방식
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MAType {
    /// 지수이동평균 (Exponential Moving Average)
    /// 최근 데이터에 더 큰 가중치를 부여합니다.
    EMA,
    /// 단순이동평균 (Simple Moving Average)
    /// 모든 데이터에 동일한 가중치를 부여합니다.
    #[default]
    SMA,
}

impl Display for MAType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MAType::EMA => write!(f, "EMA"),
            MAType::SMA => write!(f, "SMA"),
        }
    }
}

impl MAType {
    /// 지정된 유형의 이동평균 계산
    ///
    /// # Arguments
    /// * `values` - 가격 데이터
    /// * `period` - 이동평균 기간
    ///
    /// # Returns
    /// * `Option<Box<dyn MA>>` - 기간보다 데이터가 짧으면 `None`
    pub fn compute(&self, values: &[f64], period: usize) -> Option<Box<dyn MA>> {
        match self {
            MAType::EMA => EMA::from_values(values, period).map(|ma| Box::new(ma) as Box<dyn MA>),
            MAType::SMA => SMA::from_values(values, period).map(|ma| Box::new(ma) as Box<dyn MA>),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_dispatches_by_type() {
        let values = vec![1.0, 2.0, 3.0, 4.0];
        let sma = MAType::SMA.compute(&values, 2).unwrap();
        assert_eq!(sma.get(), 3.5);
        assert_eq!(sma.period(), 2);

        let ema = MAType::EMA.compute(&values, 3).unwrap();
        assert!(ema.get() > 3.0 && ema.get() < 4.0);

        assert!(MAType::SMA.compute(&values, 5).is_none());
    }
}
