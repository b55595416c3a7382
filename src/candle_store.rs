use crate::error::{AnalysisError, AnalysisResult};
use crate::model::Candle;

/// 분석용 캔들 윈도우
///
/// 호출 경계에서 들어온 캔들을 시간 오름차순으로 정렬하고, 같은 시각의
/// 캔들은 마지막 것만 남깁니다. 최대 크기를 넘으면 가장 오래된 캔들부터 제거합니다.
#[derive(Debug, Clone)]
pub struct CandleStore<C: Candle> {
    items: Vec<C>,
    pub max_size: usize,
}

/// 캔들 한 개의 OHLCV 값이 유효한지 검사합니다.
///
/// # Arguments
/// * `index` - 오류 보고용 인덱스
/// * `candle` - 검사할 캔들
pub fn validate_candle<C: Candle>(index: usize, candle: &C) -> AnalysisResult<()> {
    let fields = [
        ("open", candle.open_price()),
        ("high", candle.high_price()),
        ("low", candle.low_price()),
        ("close", candle.close_price()),
        ("volume", candle.volume()),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(AnalysisError::MalformedCandle {
                index,
                reason: format!("{} 값이 유한하지 않습니다: {}", name, value),
            });
        }
    }

    if candle.volume() < 0.0 {
        return Err(AnalysisError::MalformedCandle {
            index,
            reason: format!("거래량은 음수일 수 없습니다: {}", candle.volume()),
        });
    }

    let body_low = candle.open_price().min(candle.close_price());
    let body_high = candle.open_price().max(candle.close_price());
    if candle.low_price() > body_low || body_high > candle.high_price() {
        return Err(AnalysisError::MalformedCandle {
            index,
            reason: format!(
                "low <= min(open, close) <= max(open, close) <= high 조건 위반: {:?}",
                candle
            ),
        });
    }

    Ok(())
}

impl<C: Candle> CandleStore<C> {
    /// 새로운 CandleStore 인스턴스를 생성합니다.
    ///
    /// # Arguments
    /// * `items` - 초기 캔들 목록 (순서 무관)
    /// * `max_size` - 유지할 최대 캔들 수
    pub fn new(mut items: Vec<C>, max_size: usize) -> CandleStore<C> {
        // 안정 정렬이므로 같은 시각이면 입력 순서가 유지된다
        items.sort_by_key(|item| item.time_millis());

        let mut deduped: Vec<C> = Vec::with_capacity(items.len());
        for item in items {
            match deduped.last_mut() {
                Some(last) if last.time_millis() == item.time_millis() => *last = item,
                _ => deduped.push(item),
            }
        }

        let mut store = CandleStore {
            items: deduped,
            max_size,
        };
        store.truncate_oldest();
        store
    }

    /// 캔들을 시간 순서 위치에 삽입합니다. 같은 시각의 캔들이 있으면 교체합니다.
    pub fn add(&mut self, data: C) {
        match self
            .items
            .binary_search_by_key(&data.time_millis(), |item| item.time_millis())
        {
            Ok(idx) => self.items[idx] = data,
            Err(idx) => self.items.insert(idx, data),
        }
        self.truncate_oldest();
    }

    fn truncate_oldest(&mut self) {
        if self.items.len() > self.max_size {
            let excess = self.items.len() - self.max_size;
            log::trace!("오래된 캔들 {}개 제거", excess);
            self.items.drain(0..excess);
        }
    }

    /// 모든 캔들의 OHLCV 값을 검사합니다.
    pub fn validate(&self) -> AnalysisResult<()> {
        self.items
            .iter()
            .enumerate()
            .try_for_each(|(index, candle)| validate_candle(index, candle))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 가장 최근 캔들
    pub fn last(&self) -> Option<&C> {
        self.items.last()
    }

    pub fn get(&self, index: usize) -> Option<&C> {
        self.items.get(index)
    }

    /// 시간 오름차순 캔들 슬라이스
    pub fn items(&self) -> &[C] {
        &self.items
    }

    pub fn closes(&self) -> Vec<f64> {
        self.items.iter().map(|c| c.close_price()).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.items.iter().map(|c| c.high_price()).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.items.iter().map(|c| c.low_price()).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.items.iter().map(|c| c.volume()).collect()
    }
}
