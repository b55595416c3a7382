use common_test_utils::*;

use chart_analysis::candle_store::{CandleStore, validate_candle};
use chart_analysis::error::AnalysisError;

#[test]
fn test_candle_store_creation() {
    let store = CandleStore::<TestCandle>::new(Vec::new(), 1000);
    assert!(store.is_empty());
    assert!(store.last().is_none());
    assert!(store.validate().is_ok());
}

#[test]
fn test_candle_store_sorts_ascending() {
    let mut candles = create_uptrend_candles(10, 100.0, 1.0);
    candles.reverse();

    let store = CandleStore::new(candles, 1000);
    let times = store.items().iter().map(|c| c.timestamp).collect::<Vec<_>>();
    assert!(times.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(store.last().unwrap().timestamp, 9 * MINUTE_MS);
}

#[test]
fn test_candle_store_keeps_latest_duplicate() {
    let candles = vec![
        TestCandle::new(0, 1.0, 2.0, 0.5, 1.5, 10.0),
        TestCandle::new(MINUTE_MS, 1.0, 2.0, 0.5, 1.5, 10.0),
        TestCandle::new(0, 3.0, 4.0, 2.5, 3.5, 20.0),
    ];
    let store = CandleStore::new(candles, 1000);

    assert_eq!(store.len(), 2);
    assert_eq!(store.get(0).unwrap().close, 3.5);
}

#[test]
fn test_candle_store_max_size() {
    let store = CandleStore::new(create_uptrend_candles(50, 100.0, 1.0), 20);
    assert_eq!(store.len(), 20);
    assert_eq!(store.get(0).unwrap().timestamp, 30 * MINUTE_MS);

    let mut store = store;
    store.add(TestCandle::new(50 * MINUTE_MS, 150.0, 151.0, 149.0, 150.5, 1000.0));
    assert_eq!(store.len(), 20);
    assert_eq!(store.get(0).unwrap().timestamp, 31 * MINUTE_MS);
    assert_eq!(store.last().unwrap().close, 150.5);
}

#[test]
fn test_candle_store_add_in_order() {
    let mut store = CandleStore::new(create_sideways_candles(5, 100.0, 4.0), 1000);
    store.add(TestCandle::new(MINUTE_MS / 2, 1.0, 1.0, 1.0, 1.0, 0.0));
    store.add(TestCandle::new(2 * MINUTE_MS, 7.0, 7.0, 7.0, 7.0, 0.0));

    assert_eq!(store.len(), 6);
    assert_eq!(store.get(1).unwrap().timestamp, MINUTE_MS / 2);
    assert_eq!(store.get(3).unwrap().close, 7.0);
}

#[test]
fn test_candle_store_series() {
    let store = CandleStore::new(create_downtrend_candles(3, 100.0, 2.0), 1000);
    assert_eq!(store.closes(), vec![99.0, 97.0, 95.0]);
    assert_eq!(store.highs(), vec![102.0, 100.0, 98.0]);
    assert_eq!(store.lows(), vec![98.0, 96.0, 94.0]);
    assert_eq!(store.volumes(), vec![1000.0; 3]);
}

#[test]
fn test_validate_rejects_broken_envelope() {
    // 종가가 고가보다 높음
    let candle = TestCandle::new(0, 10.0, 11.0, 9.0, 12.0, 1.0);
    assert!(matches!(
        validate_candle(3, &candle),
        Err(AnalysisError::MalformedCandle { index: 3, .. })
    ));
}

#[test]
fn test_validate_rejects_non_finite_and_negative_volume() {
    let nan = TestCandle::new(0, f64::NAN, 11.0, 9.0, 10.0, 1.0);
    assert!(validate_candle(0, &nan).is_err());

    let negative = TestCandle::new(0, 10.0, 11.0, 9.0, 10.0, -1.0);
    assert!(validate_candle(0, &negative).is_err());
}

#[test]
fn test_validate_reports_first_bad_index() {
    let mut candles = create_uptrend_candles(5, 100.0, 1.0);
    candles[2].low = candles[2].high + 1.0;
    candles[4].volume = -5.0;

    let store = CandleStore::new(candles, 1000);
    match store.validate() {
        Err(AnalysisError::MalformedCandle { index, .. }) => assert_eq!(index, 2),
        other => panic!("잘못된 캔들 오류가 발생해야 함: {:?}", other),
    }
}
