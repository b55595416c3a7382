pub mod chart_pattern_analyzer;
pub mod market_snapshot;
pub mod support_resistance_analyzer;
pub mod trend_analyzer;
pub mod volume_analyzer;

use crate::config_loader::AnalysisConfig;
use crate::indicator::IndicatorSummary;
use crate::model::{Candle, Pattern, PatternMatch, Trend};
use chart_pattern_analyzer::detect_patterns_with_config;
use market_snapshot::MarketSnapshot;
use serde::Serialize;
use support_resistance_analyzer::SupportResistance;
use trend_analyzer::classify_trend_with_config;
use volume_analyzer::{VolumeSummary, analyze_volume_with_config};

/// 캔들 윈도우 하나에 대한 전체 분석 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub success: bool,
    pub candle_count: usize,
    pub indicators: IndicatorSummary,
    pub volume: VolumeSummary,
    pub trend: Trend,
    pub snapshot: Option<MarketSnapshot>,
    /// 인덱스 기반 패턴 탐지 결과
    pub patterns: Vec<PatternMatch>,
    /// 지지/저항선을 포함한 그리기용 패턴
    pub drawable: Vec<Pattern>,
}

/// 캔들 윈도우 전체를 분석합니다.
///
/// 지표, 거래량, 추세, 패턴은 서로 독립적으로 계산되며 호출 간 상태를 남기지 않습니다.
///
/// # Arguments
/// * `candles` - 시간 오름차순 캔들
/// * `config` - 분석 설정
pub fn analyze<C: Candle>(candles: &[C], config: &AnalysisConfig) -> AnalysisReport {
    let closes = candles.iter().map(|c| c.close_price()).collect::<Vec<_>>();

    let indicators = IndicatorSummary::with_config(&closes, &config.indicators);
    let volume = analyze_volume_with_config(candles, &config.volume);
    let trend = classify_trend_with_config(&closes, &config.trend);
    let snapshot = MarketSnapshot::from_candles(candles, config);
    let patterns = detect_patterns_with_config(candles, &config.patterns);

    let mut drawable = patterns
        .iter()
        .filter_map(|found| found.to_pattern(candles))
        .collect::<Vec<_>>();
    if let Some(levels) =
        SupportResistance::from_candles(candles, config.support_resistance.lookback)
    {
        drawable.extend(levels.to_patterns(candles));
    }

    log::info!(
        "분석 완료: candles={}, trend={}, patterns={}",
        candles.len(),
        trend,
        patterns.len()
    );

    AnalysisReport {
        success: true,
        candle_count: candles.len(),
        indicators,
        volume,
        trend,
        snapshot,
        patterns,
        drawable,
    }
}
