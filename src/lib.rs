//! 시세 틱/캔들로부터 OHLCV 집계, 기술적 지표 요약, 차트 패턴 탐지를 수행하는
//! 순수 함수형 분석 엔진입니다.
//!
//! 모든 계산은 호출자가 넘긴 윈도우만 읽으며 호출 사이에 상태를 남기지 않습니다.
//! 이력이 부족하면 오류 대신 `None`, 빈 목록 또는 중립 결과를 반환합니다.

pub mod aggregator;
pub mod analyzer;
pub mod candle_store;
pub mod error;
pub mod indicator;
pub mod model;

/// 설정 로더
pub mod config_loader;

pub use aggregator::{CandleInterval, aggregate, aggregate_with_interval};
pub use analyzer::chart_pattern_analyzer::{detect_patterns, detect_patterns_with_config};
pub use analyzer::trend_analyzer::classify_trend;
pub use analyzer::volume_analyzer::analyze_volume;
pub use analyzer::{AnalysisReport, analyze};
pub use config_loader::AnalysisConfig;
pub use error::{AnalysisError, AnalysisResult};
pub use indicator::IndicatorSummary;
pub use model::{Candle, OhlcvCandle, Pattern, PatternMatch, PatternType, Tick, Trend};
