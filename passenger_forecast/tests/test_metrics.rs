use approx::assert_abs_diff_eq;
use passenger_forecast::{score, ForecastError, ForecastResult, Score};

#[test]
fn test_perfect_forecast_scores_zero() {
    let s = score(&[10.0, 20.0, 30.0], &[10.0, 20.0, 30.0]).unwrap();
    assert_eq!(s, Score { mae: 0.0, rmse: 0.0 });
}

#[test]
fn test_symmetric_errors() {
    let s = score(&[10.0, 20.0], &[12.0, 18.0]).unwrap();
    assert_abs_diff_eq!(s.mae, 2.0);
    assert_abs_diff_eq!(s.rmse, 2.0);
}

#[test]
fn test_regression_metrics() {
    let actual = vec![10.0, 20.0, 30.0, 40.0, 50.0];
    let predicted = vec![12.0, 18.0, 33.0, 37.0, 52.0];

    let s = score(&actual, &predicted).unwrap();
    assert_abs_diff_eq!(s.mae, 2.4, epsilon = 1e-12);
    assert_abs_diff_eq!(s.rmse, 30.0_f64.sqrt() / 5.0_f64.sqrt(), epsilon = 1e-12);
}

#[test]
fn test_length_mismatch() {
    let err = score(&[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
    assert!(matches!(
        err,
        ForecastError::LengthMismatch {
            actual: 3,
            forecast: 2
        }
    ));
}

#[test]
fn test_empty_sequences() {
    assert!(matches!(
        score(&[], &[]),
        Err(ForecastError::InvalidArgument(_))
    ));
}

#[test]
fn test_score_against_forecast_result() {
    let forecast =
        ForecastResult::new(vec![105.0, 106.0, 107.0], vec![0.0; 3], vec![200.0; 3]).unwrap();
    let s = forecast.score_against(&[106.0, 107.0, 108.0]).unwrap();
    assert_abs_diff_eq!(s.mae, 1.0);
    assert_abs_diff_eq!(s.rmse, 1.0);
}

#[test]
fn test_score_display() {
    let text = Score { mae: 1.23456, rmse: 2.0 }.to_string();
    assert!(text.contains("Mean Absolute Error: 1.235"));
    assert!(text.contains("Root Mean Squared Error: 2.000"));
}
