use chart_analysis::aggregator::{CandleInterval, aggregate, aggregate_with_interval};
use chart_analysis::candle_store::CandleStore;
use chart_analysis::error::AnalysisError;
use chart_analysis::model::{Candle, OhlcvCandle, Tick};

fn ticks_every(step_ms: i64, prices: &[f64]) -> Vec<Tick> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &price)| Tick::new(i as i64 * step_ms, price))
        .collect()
}

#[test]
fn test_one_minute_scenario() {
    let ticks = vec![
        Tick::new(0, 100.0),
        Tick::new(30_000, 101.0),
        Tick::new(70_000, 99.0),
    ];
    let candles = aggregate_with_interval(&ticks, "1m").unwrap();

    assert_eq!(candles.len(), 2);
    let first = &candles[0];
    assert_eq!(first.time_millis(), 0);
    assert_eq!(first.open_price(), 100.0);
    assert_eq!(first.high_price(), 101.0);
    assert_eq!(first.low_price(), 100.0);
    assert_eq!(first.close_price(), 101.0);

    let second = &candles[1];
    assert_eq!(second.time_millis(), 60_000);
    assert_eq!(second.open_price(), 99.0);
    assert_eq!(second.close_price(), 99.0);
}

#[test]
fn test_five_minute_buckets() {
    // 1분마다 틱 12개 -> 5분 버킷 3개 (5, 5, 2)
    let prices = [10.0, 12.0, 9.0, 11.0, 10.5, 20.0, 21.0, 19.0, 22.0, 20.5, 30.0, 29.0];
    let ticks = ticks_every(60_000, &prices);
    let candles = aggregate_with_interval(&ticks, "5m").unwrap();

    assert_eq!(candles.len(), 3);
    assert_eq!(candles[0], OhlcvCandle::new(0, 10.0, 12.0, 9.0, 10.5, 0.0));
    assert_eq!(candles[1], OhlcvCandle::new(300_000, 20.0, 22.0, 19.0, 20.5, 0.0));
    assert_eq!(candles[2], OhlcvCandle::new(600_000, 30.0, 30.0, 29.0, 29.0, 0.0));
}

#[test]
fn test_sub_minute_interval_passes_ticks_through() {
    let ticks = ticks_every(1_000, &[1.0, 2.0, 3.0]);
    let candles = aggregate_with_interval(&ticks, "30s").unwrap();

    assert_eq!(candles.len(), ticks.len());
    for (candle, tick) in candles.iter().zip(&ticks) {
        assert_eq!(candle, &OhlcvCandle::flat(tick.time, tick.price));
    }
}

#[test]
fn test_empty_ticks() {
    let interval = CandleInterval::minutes(1).unwrap();
    assert!(aggregate(&[], &interval).is_empty());
}

#[test]
fn test_non_finite_ticks_are_skipped() {
    let ticks = vec![
        Tick::new(0, 100.0),
        Tick::new(10_000, f64::NAN),
        Tick::new(20_000, f64::INFINITY),
        Tick::new(30_000, 98.0),
    ];
    let candles = aggregate_with_interval(&ticks, "1m").unwrap();
    assert_eq!(candles, vec![OhlcvCandle::new(0, 100.0, 100.0, 98.0, 98.0, 0.0)]);
}

#[test]
fn test_invalid_interval_strings() {
    let ticks = ticks_every(60_000, &[1.0, 2.0]);
    assert!(matches!(
        aggregate_with_interval(&ticks, "1w"),
        Err(AnalysisError::InvalidInterval(_))
    ));
    assert!(matches!(
        aggregate_with_interval(&ticks, "m"),
        Err(AnalysisError::InvalidInterval(_))
    ));
    assert!(matches!(
        aggregate_with_interval(&ticks, "0h"),
        Err(AnalysisError::DegenerateWindow(_))
    ));
}

#[test]
fn test_aggregated_candles_are_valid_and_ordered() {
    let prices = (0..200)
        .map(|i| 100.0 + ((i * 37) % 17) as f64 - 8.0)
        .collect::<Vec<_>>();
    let ticks = ticks_every(7_000, &prices);
    let candles = aggregate_with_interval(&ticks, "1m").unwrap();

    assert!(candles.windows(2).all(|w| w[0].time < w[1].time));
    assert!(candles.iter().all(|c| c.time % 60_000 == 0));

    let store = CandleStore::new(candles.clone(), 1000);
    assert_eq!(store.len(), candles.len());
    assert!(store.validate().is_ok());
}

#[test]
fn test_interval_duration() {
    let interval: CandleInterval = "2h".parse().unwrap();
    assert_eq!(interval.duration(), chrono::TimeDelta::hours(2));
    assert!(!interval.is_sub_minute());
    assert!("59s".parse::<CandleInterval>().unwrap().is_sub_minute());
    assert!(!"60s".parse::<CandleInterval>().unwrap().is_sub_minute());
}
