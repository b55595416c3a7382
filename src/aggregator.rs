use crate::error::{AnalysisError, AnalysisResult};
use crate::model::{OhlcvCandle, Tick};
use chrono::TimeDelta;
use log::{debug, warn};
use std::fmt::Display;
use std::str::FromStr;

/// 캔들 간격 단위
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalUnit {
    Second,
    Minute,
    Hour,
}

/// 캔들 집계 간격 (`"30s"`, `"5m"`, `"4h"` 형식)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandleInterval {
    count: u32,
    unit: IntervalUnit,
}

impl CandleInterval {
    /// 새 간격 생성
    ///
    /// # Errors
    /// * `count`가 0이면 `DegenerateWindow`
    pub fn new(count: u32, unit: IntervalUnit) -> AnalysisResult<Self> {
        if count == 0 {
            return Err(AnalysisError::DegenerateWindow(
                "캔들 간격은 0보다 커야 합니다".to_string(),
            ));
        }
        Ok(CandleInterval { count, unit })
    }

    pub fn minutes(count: u32) -> AnalysisResult<Self> {
        Self::new(count, IntervalUnit::Minute)
    }

    pub fn hours(count: u32) -> AnalysisResult<Self> {
        Self::new(count, IntervalUnit::Hour)
    }

    /// 버킷 길이
    pub fn duration(&self) -> TimeDelta {
        let count = i64::from(self.count);
        match self.unit {
            IntervalUnit::Second => TimeDelta::seconds(count),
            IntervalUnit::Minute => TimeDelta::minutes(count),
            IntervalUnit::Hour => TimeDelta::hours(count),
        }
    }

    /// 버킷 길이 (밀리초)
    pub fn bucket_millis(&self) -> i64 {
        self.duration().num_milliseconds()
    }

    /// 1분 미만 간격이면 틱을 그대로 캔들로 만든다
    pub fn is_sub_minute(&self) -> bool {
        self.duration() < TimeDelta::minutes(1)
    }

    /// 틱 시각이 속하는 버킷의 시작 시각
    pub fn bucket_start(&self, time: i64) -> i64 {
        let millis = self.bucket_millis();
        time.div_euclid(millis) * millis
    }
}

impl FromStr for CandleInterval {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some(unit_char) = s.chars().last() else {
            return Err(AnalysisError::InvalidInterval(s.to_string()));
        };

        let unit = match unit_char {
            's' => IntervalUnit::Second,
            'm' => IntervalUnit::Minute,
            'h' => IntervalUnit::Hour,
            _ => return Err(AnalysisError::InvalidInterval(s.to_string())),
        };

        let count = s[..s.len() - unit_char.len_utf8()]
            .parse::<u32>()
            .map_err(|_| AnalysisError::InvalidInterval(s.to_string()))?;

        CandleInterval::new(count, unit)
    }
}

impl Display for CandleInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let unit = match self.unit {
            IntervalUnit::Second => "s",
            IntervalUnit::Minute => "m",
            IntervalUnit::Hour => "h",
        };
        write!(f, "{}{}", self.count, unit)
    }
}

/// 집계 중인 버킷
struct Bucket {
    start: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

impl Bucket {
    fn open(start: i64, price: f64) -> Self {
        Bucket {
            start,
            open: price,
            high: price,
            low: price,
            close: price,
        }
    }

    fn push(&mut self, price: f64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
    }

    // 틱에는 거래량이 없다
    fn finish(self) -> OhlcvCandle {
        OhlcvCandle::new(self.start, self.open, self.high, self.low, self.close, 0.0)
    }
}

/// 시간순 틱을 고정 간격 OHLCV 캔들로 집계합니다.
///
/// 틱의 버킷 시작 시각이 현재 버킷과 달라지면 현재 버킷을 닫아 내보냅니다.
/// 1분 미만 간격이면 각 틱이 시가=고가=저가=종가인 캔들 하나가 됩니다.
/// 가격이 유한하지 않은 틱은 건너뜁니다.
///
/// # Arguments
/// * `ticks` - 시간 오름차순 틱
/// * `interval` - 집계 간격
pub fn aggregate(ticks: &[Tick], interval: &CandleInterval) -> Vec<OhlcvCandle> {
    let valid = ticks.iter().filter(|tick| {
        let ok = tick.price.is_finite();
        if !ok {
            warn!("유효하지 않은 틱 가격 무시: {:?}", tick);
        }
        ok
    });

    if interval.is_sub_minute() {
        return valid
            .map(|tick| OhlcvCandle::flat(tick.time, tick.price))
            .collect();
    }

    let mut candles = Vec::new();
    let mut current: Option<Bucket> = None;

    for tick in valid {
        let start = interval.bucket_start(tick.time);
        if let Some(bucket) = current.as_mut() {
            if bucket.start == start {
                bucket.push(tick.price);
                continue;
            }
        }
        if let Some(done) = current.replace(Bucket::open(start, tick.price)) {
            candles.push(done.finish());
        }
    }

    if let Some(done) = current {
        candles.push(done.finish());
    }

    debug!(
        "틱 {}개를 {} 캔들 {}개로 집계",
        ticks.len(),
        interval,
        candles.len()
    );
    candles
}

/// 간격 문자열을 해석한 뒤 [`aggregate`]를 호출합니다.
///
/// # Errors
/// * 간격 문자열이 잘못되었거나 0 간격이면 오류
pub fn aggregate_with_interval(ticks: &[Tick], interval: &str) -> AnalysisResult<Vec<OhlcvCandle>> {
    let interval = interval.parse::<CandleInterval>()?;
    Ok(aggregate(ticks, &interval))
}
