use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};

/// 캔들 데이터 접근 인터페이스
///
/// 분석 함수들은 이 트레이트를 통해서만 캔들 값을 읽으므로
/// 외부 시세 어댑터의 캔들 타입도 그대로 넘길 수 있습니다.
pub trait Candle: Debug + Clone {
    /// 캔들 시작 시각 (epoch 밀리초)
    fn time_millis(&self) -> i64;
    fn open_price(&self) -> f64;
    fn high_price(&self) -> f64;
    fn low_price(&self) -> f64;
    fn close_price(&self) -> f64;
    fn volume(&self) -> f64;

    /// 캔들 시작 시각을 UTC 시각으로 반환
    fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.time_millis()).unwrap_or_default()
    }
}

/// 기본 OHLCV 캔들
///
/// 직렬화 형식은 `{time, open, high, low, close, volume}` 입니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcvCandle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl OhlcvCandle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        OhlcvCandle {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 단일 가격으로 시가=고가=저가=종가인 캔들 생성
    pub fn flat(time: i64, price: f64) -> Self {
        Self::new(time, price, price, price, price, 0.0)
    }
}

impl Display for OhlcvCandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Candle(t={}, o={}, h={}, l={}, c={}, v={})",
            self.time, self.open, self.high, self.low, self.close, self.volume
        )
    }
}

impl Candle for OhlcvCandle {
    fn time_millis(&self) -> i64 {
        self.time
    }
    fn open_price(&self) -> f64 {
        self.open
    }
    fn high_price(&self) -> f64 {
        self.high
    }
    fn low_price(&self) -> f64 {
        self.low
    }
    fn close_price(&self) -> f64 {
        self.close
    }
    fn volume(&self) -> f64 {
        self.volume
    }
}

/// 원시 체결 틱 (캔들 집계 입력)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// epoch 밀리초
    pub time: i64,
    pub price: f64,
}

impl Tick {
    pub fn new(time: i64, price: f64) -> Self {
        Tick { time, price }
    }

    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.time).unwrap_or_default()
    }
}

/// 추세 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// 상승 추세
    Bullish,
    /// 하락 추세
    Bearish,
    /// 횡보
    Sideways,
}

impl Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Bullish => write!(f, "bullish"),
            Trend::Bearish => write!(f, "bearish"),
            Trend::Sideways => write!(f, "sideways"),
        }
    }
}

/// 차트 패턴 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// 추세선 (외부 렌더러/LLM 출력과의 호환용)
    Trendline,
    /// 수평 지지선
    Support,
    /// 수평 저항선
    Resistance,
    /// 헤드 앤 숄더
    HeadShoulders,
    /// 이중 천장
    DoubleTop,
    /// 이중 바닥
    DoubleBottom,
    /// 상승 삼각형
    AscendingTriangle,
}

impl PatternType {
    /// 표시용 패턴 이름
    pub fn display_name(&self) -> &'static str {
        match self {
            PatternType::Trendline => "Trendline",
            PatternType::Support => "Support",
            PatternType::Resistance => "Resistance",
            PatternType::HeadShoulders => "Head & Shoulders",
            PatternType::DoubleTop => "Double Top",
            PatternType::DoubleBottom => "Double Bottom",
            PatternType::AscendingTriangle => "Ascending Triangle",
        }
    }
}

impl Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// 패턴이 암시하는 방향성
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternBias {
    Bullish,
    Bearish,
    Neutral,
}

/// 패턴을 그리기 위한 (시각, 가격) 좌표
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternPoint {
    pub time: i64,
    pub price: f64,
}

/// 렌더러에 전달되는 그리기용 패턴
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub name: String,
    #[serde(rename = "type")]
    pub pattern_type: PatternType,
    /// 2개 이상의 좌표, 시간 오름차순
    pub points: Vec<PatternPoint>,
    /// 신뢰도 (0.0 ~ 1.0)
    pub confidence: f64,
}

/// 패턴 탐지 결과
///
/// 절대 시각 대신 입력 배열의 인덱스를 담습니다.
/// 좌표가 필요하면 원본 캔들로 [`PatternMatch::to_pattern`]을 호출합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub kind: PatternType,
    pub bias: PatternBias,
    /// 패턴이 걸친 인덱스 구간 (양 끝 포함)
    pub range: (usize, usize),
    /// 패턴을 구성하는 극점 (인덱스, 가격)
    pub pivots: Vec<(usize, f64)>,
    pub confidence: f64,
    pub description: String,
}

impl PatternMatch {
    /// 원본 캔들에 극점 인덱스를 대응시켜 그리기용 패턴으로 변환
    ///
    /// 범위를 벗어난 극점은 버리며, 좌표가 2개 미만이면 `None`을 반환합니다.
    pub fn to_pattern<C: Candle>(&self, candles: &[C]) -> Option<Pattern> {
        let points = self
            .pivots
            .iter()
            .filter_map(|&(index, price)| {
                candles.get(index).map(|candle| PatternPoint {
                    time: candle.time_millis(),
                    price,
                })
            })
            .collect::<Vec<_>>();

        if points.len() < 2 {
            return None;
        }

        Some(Pattern {
            name: self.kind.display_name().to_owned(),
            pattern_type: self.kind,
            points,
            confidence: self.confidence.clamp(0.0, 1.0),
        })
    }
}

impl Display for PatternMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}[{}..={}] ({:.2})",
            self.kind, self.range.0, self.range.1, self.confidence
        )
    }
}
