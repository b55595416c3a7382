use crate::analyzer::support_resistance_analyzer::SupportResistance;
use crate::analyzer::trend_analyzer::classify_trend_with_config;
use crate::config_loader::AnalysisConfig;
use crate::indicator::macd::{MACD, MACDCrossover, MACDStrength};
use crate::indicator::rsi::RSI;
use crate::model::{Candle, Trend};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// 스냅샷용 MACD 신호
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MACDSignal {
    pub signal: MACDCrossover,
    pub strength: MACDStrength,
}

/// 프롬프트 생성기에 넘기는 압축된 시장 상태
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub trend: Trend,
    pub support_levels: Vec<f64>,
    pub resistance_levels: Vec<f64>,
    /// 반올림한 RSI
    pub rsi: Option<f64>,
    pub macd: MACDSignal,
    pub last_close: f64,
}

impl MarketSnapshot {
    /// 캔들 윈도우에서 스냅샷 생성. 캔들이 없으면 `None`
    pub fn from_candles<C: Candle>(
        candles: &[C],
        config: &AnalysisConfig,
    ) -> Option<MarketSnapshot> {
        let last_close = candles.last()?.close_price();
        let closes = candles.iter().map(|c| c.close_price()).collect::<Vec<_>>();

        let trend = classify_trend_with_config(&closes, &config.trend);
        let (support_levels, resistance_levels) =
            match SupportResistance::from_candles(candles, config.support_resistance.lookback) {
                Some(levels) => (vec![levels.support.price], vec![levels.resistance.price]),
                None => (Vec::new(), Vec::new()),
            };

        let rsi =
            RSI::from_values(&closes, config.indicators.rsi_period).map(|rsi| rsi.value.round());

        let macd = match MACD::from_values(&closes, &config.indicators.macd_params()) {
            Some(macd) => MACDSignal {
                signal: macd.crossover(),
                strength: macd.strength(
                    config.indicators.macd_medium_spread,
                    config.indicators.macd_high_spread,
                ),
            },
            None => MACDSignal {
                signal: MACDCrossover::Neutral,
                strength: MACDStrength::Low,
            },
        };

        Some(MarketSnapshot {
            trend,
            support_levels,
            resistance_levels,
            rsi,
            macd,
            last_close,
        })
    }
}

impl Display for MarketSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "trend={} support={:?} resistance={:?} rsi={:?} macd={:?}/{:?} last_close={}",
            self.trend,
            self.support_levels,
            self.resistance_levels,
            self.rsi,
            self.macd.signal,
            self.macd.strength,
            self.last_close
        )
    }
}
