use super::*;
use crate::services::tools::{BmiCategory, Gender, UnitSystem};
use crate::state::test_helpers;

#[tokio::test]
async fn bmi_route_computes_report() {
    let input = BmiInput { gender: Gender::Male, units: UnitSystem::Metric, height: 170.0, weight: 70.0 };
    let Json(report) = bmi(Json(input)).await.unwrap();
    assert_eq!(report.category, BmiCategory::NormalWeight);
}

#[tokio::test]
async fn bmi_route_rejects_zero_height() {
    let input = BmiInput { gender: Gender::Male, units: UnitSystem::Metric, height: 0.0, weight: 70.0 };
    let err = bmi(Json(input)).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.code(), "E_INVALID_MEASUREMENT");
}

#[tokio::test]
async fn heart_rate_route_validates_age() {
    let Json(report) = heart_rate(Json(HeartRateInput { gender: Gender::Male, age: 30 })).await.unwrap();
    assert_eq!(report.max_heart_rate, 190);

    let err = heart_rate(Json(HeartRateInput { gender: Gender::Male, age: 0 })).await.unwrap_err();
    assert_eq!(err.code(), "E_INVALID_AGE");
}

#[tokio::test]
async fn flip_accumulates_and_reset_clears() {
    let state = test_helpers::test_app_state();

    let Json(first) = flip_coin(State(state.clone()), Json(FlipBody { count: 25 })).await.unwrap();
    assert_eq!(first.batch.points.len(), 25);
    assert_eq!(first.session.total, 25);

    let Json(second) = flip_coin(State(state.clone()), Json(FlipBody { count: 5 })).await.unwrap();
    assert_eq!(second.session.total, 30);
    assert_eq!(second.batch.points[0].flip_number, 26);

    let Json(session) = get_coin(State(state.clone())).await;
    assert_eq!(session.series.len(), 30);

    assert_eq!(reset_coin(State(state.clone())).await, StatusCode::NO_CONTENT);
    let Json(session) = get_coin(State(state)).await;
    assert_eq!(session.total(), 0);
    assert!(session.series.is_empty());
}

#[tokio::test]
async fn flip_rejects_too_many() {
    let state = test_helpers::test_app_state();
    let err = flip_coin(State(state.clone()), Json(FlipBody { count: 10_001 })).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.coin.read().await.total(), 0);
}
