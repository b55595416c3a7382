use crate::indicator::utils::{finite, moving_average};
use std::fmt::{Debug, Display};

/// 볼린저 밴드 기술적 지표
///
/// 볼린저 밴드는 가격의 변동성을 측정하는 기술적 지표로,
/// 이동평균선과 그 주변의 표준편차 기반 밴드로 구성됩니다.
///
/// # 성능 고려사항
/// - 마지막 period개 값만 사용하므로 O(period) 시간에 계산
#[derive(Clone, Debug)]
pub struct BollingerBands {
    pub middle: f64,
    pub upper: f64,
    pub lower: f64,
    /// 계산 기간
    period: usize,
    /// 표준편차 승수
    multiplier: f64,
}

impl BollingerBands {
    /// 종가 배열에서 볼린저 밴드 생성
    ///
    /// # Arguments
    /// * `values` - 종가 배열
    /// * `period` - SMA/표준편차 기간 (기본값 20)
    /// * `multiplier` - 표준편차 승수 (기본값 2.0)
    ///
    /// # Returns
    /// * `Option<BollingerBands>` - 데이터가 기간보다 짧거나 NaN이 섞이면 `None`
    pub fn from_values(values: &[f64], period: usize, multiplier: f64) -> Option<BollingerBands> {
        let middle = moving_average::calculate_sma(values, period).and_then(finite)?;
        let std_dev =
            moving_average::calculate_standard_deviation(values, period).and_then(finite)?;

        // 승수가 음수여도 상단 >= 중간 >= 하단을 유지
        let offset = std_dev * multiplier.abs();

        Some(BollingerBands {
            middle,
            upper: middle + offset,
            lower: middle - offset,
            period,
            multiplier,
        })
    }

    /// 중간 밴드(이동평균) 값 반환
    pub fn middle(&self) -> f64 {
        self.middle
    }

    /// 상단 밴드 값 반환
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// 하단 밴드 값 반환
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// 계산 기간 반환
    pub fn period(&self) -> usize {
        self.period
    }

    /// 표준편차 승수 반환
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// 밴드 폭 (상단 - 하단)
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// 현재 밴드폭 계산
    ///
    /// # Returns
    /// * `f64` - 밴드폭 (상단 - 하단) / 중간
    pub fn bandwidth(&self) -> f64 {
        if self.middle.abs() < f64::EPSILON {
            return 0.0;
        }
        self.width() / self.middle
    }

    /// 밴드 내 가격 위치 (%B). 하단 0, 상단 1
    pub fn percent_b(&self, price: f64) -> f64 {
        let width = self.width();
        if width.abs() < f64::EPSILON {
            return 0.5;
        }
        (price - self.lower) / width
    }
}

impl Display for BollingerBands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BBand({}, {}: {:.2}, {:.2}, {:.2})",
            self.period, self.multiplier, self.lower, self.middle, self.upper
        )
    }
}
