use log::warn;

/// 대칭 윈도우 안에서 엄격한 극점을 찾는 공통 함수
///
/// `w <= i <= len - 1 - w`인 인덱스 `i`에 대해, `[i - w, i + w]` 범위의 모든 다른 점이
/// `beats(series[i], series[j])`를 만족하면 극점입니다.
/// 동일한 값(평탄 구간)이나 NaN 이웃이 있으면 극점이 아닙니다.
fn find_extrema(series: &[f64], window: usize, beats: impl Fn(f64, f64) -> bool) -> Vec<usize> {
    if window == 0 {
        warn!("극점 윈도우는 0보다 커야 합니다");
        return Vec::new();
    }
    if series.len() < window.saturating_mul(2).saturating_add(1) {
        return Vec::new();
    }

    (window..series.len() - window)
        .filter(|&i| {
            (i - window..=i + window)
                .filter(|&j| j != i)
                .all(|j| beats(series[i], series[j]))
        })
        .collect()
}

/// 지역 최대점 인덱스 (오름차순)
///
/// # Arguments
/// * `series` - 값 배열 (보통 고가)
/// * `window` - 좌우로 비교할 점의 수
pub fn local_maxima(series: &[f64], window: usize) -> Vec<usize> {
    find_extrema(series, window, |center, other| other < center)
}

/// 지역 최소점 인덱스 (오름차순)
///
/// # Arguments
/// * `series` - 값 배열 (보통 저가)
/// * `window` - 좌우로 비교할 점의 수
pub fn local_minima(series: &[f64], window: usize) -> Vec<usize> {
    find_extrema(series, window, |center, other| other > center)
}
