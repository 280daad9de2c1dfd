use approx::assert_abs_diff_eq;
use passenger_forecast::{
    evaluate_one_step, EngineState, ForecastEngine, ForecastError, Observation, SeriesBuffer,
    SsaConfig, SsaForecastModel,
};
use std::f64::consts::PI;

fn seasonal_buffer(n: usize) -> SeriesBuffer {
    SeriesBuffer::from_observations((0..n).map(|i| {
        let value = 150.0
            + 1.5 * i as f64
            + 25.0 * (2.0 * PI * i as f64 / 12.0).sin()
            + if i % 3 == 0 { 4.0 } else { -2.0 };
        Observation::for_month(1949 + (i / 12) as i32, (i % 12) as u32 + 1, value).unwrap()
    }))
    .unwrap()
}

fn fitted_engine(buffer: &SeriesBuffer) -> ForecastEngine {
    let (train, _) = buffer.split(0.8).unwrap();
    let model = SsaForecastModel::fit(train, &SsaConfig::new(12, 48, 6, 0.95)).unwrap();
    ForecastEngine::new(model, train).unwrap()
}

#[test]
fn test_new_engine_is_fitted_at_end_of_training() {
    let buffer = seasonal_buffer(72);
    let engine = fitted_engine(&buffer);

    assert_eq!(engine.state(), EngineState::Fitted);
    assert_eq!(engine.cursor(), 58);
    assert_eq!(
        engine.last_observation().unwrap().timestamp(),
        buffer.view().observations()[57].timestamp()
    );
}

#[test]
fn test_forecast_does_not_mutate() {
    let buffer = seasonal_buffer(72);
    let engine = fitted_engine(&buffer);

    let first = engine.forecast(6).unwrap();
    let second = engine.forecast(6).unwrap();
    assert_eq!(first, second);
    assert_eq!(engine.cursor(), 58);
    assert_eq!(engine.state(), EngineState::Fitted);

    let default = engine.predict().unwrap();
    assert_eq!(default, first);
}

#[test]
fn test_ingest_advances_cursor() {
    let buffer = seasonal_buffer(72);
    let (_, test) = buffer.split(0.8).unwrap();
    let mut engine = fitted_engine(&buffer);

    engine.ingest(test.observations()[0]).unwrap();
    assert_eq!(engine.state(), EngineState::Advanced);
    assert_eq!(engine.cursor(), 59);

    engine.ingest(test.observations()[1]).unwrap();
    assert_eq!(engine.cursor(), 60);
}

#[test]
fn test_forecast_after_ingest_starts_from_new_origin() {
    let buffer = seasonal_buffer(72);
    let (_, test) = buffer.split(0.8).unwrap();
    let mut engine = fitted_engine(&buffer);

    engine.ingest(test.observations()[0]).unwrap();
    let forecast = engine.forecast(3).unwrap();

    let known = buffer.slice(0, 59).unwrap().values();
    let expected = engine.model().forecast_from(&known, 3).unwrap();
    assert_eq!(forecast, expected);

    // Bounds restart at step one relative to the new cursor
    assert_abs_diff_eq!(forecast.half_widths()[0], engine.model().half_width(1), epsilon = 1e-12);
}

#[test]
fn test_out_of_order_ingest_leaves_state_untouched() {
    let buffer = seasonal_buffer(72);
    let mut engine = fitted_engine(&buffer);
    let last = *engine.last_observation().unwrap();

    let err = engine.ingest(last).unwrap_err();
    assert!(matches!(err, ForecastError::OutOfOrder { .. }));
    assert_eq!(engine.state(), EngineState::Fitted);
    assert_eq!(engine.cursor(), 58);

    let earlier = Observation::for_month(1949, 1, 100.0).unwrap();
    assert!(matches!(
        engine.ingest(earlier),
        Err(ForecastError::OutOfOrder { .. })
    ));
}

#[test]
fn test_rolling_evaluation_matches_manual_loop() {
    let buffer = seasonal_buffer(72);
    let (_, test) = buffer.split(0.8).unwrap();

    let mut manual = fitted_engine(&buffer);
    let mut expected = Vec::new();
    for observation in test.observations() {
        expected.push(manual.forecast(1).unwrap().point_forecast()[0]);
        manual.ingest(*observation).unwrap();
    }

    let mut engine = fitted_engine(&buffer);
    let evaluation = evaluate_one_step(&mut engine, test).unwrap();

    assert_eq!(evaluation.forecast, expected);
    assert_eq!(evaluation.actual, test.values());
    assert_eq!(engine.cursor(), 72);
    assert!(evaluation.score.mae > 0.0);
    assert!(evaluation.score.rmse >= evaluation.score.mae);
}

#[test]
fn test_engine_needs_enough_history() {
    let buffer = seasonal_buffer(72);
    let model = SsaForecastModel::fit(buffer.view(), &SsaConfig::new(12, 48, 6, 0.95)).unwrap();
    let short = buffer.slice(0, 5).unwrap();

    assert!(matches!(
        ForecastEngine::new(model, short),
        Err(ForecastError::InsufficientData {
            available: 5,
            required: 11
        })
    ));
}
