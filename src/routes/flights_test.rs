use super::*;
use crate::sources::SourceError;
use crate::state::test_helpers;

fn search_for(q: &str) -> Query<SearchQuery> {
    Query(SearchQuery { q: q.into() })
}

#[test]
fn flight_error_to_status_maps_query_and_upstream() {
    assert_eq!(flight_error_to_status(&FlightError::EmptyQuery), StatusCode::BAD_REQUEST);
    let upstream = FlightError::Source(SourceError::Status { status: 500, body: String::new() });
    assert_eq!(flight_error_to_status(&upstream), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn list_flights_returns_all() {
    let state = test_helpers::test_app_state();
    let Json(all) = list_flights(State(state)).await.unwrap();
    assert_eq!(all.len(), 5);
}

#[tokio::test]
async fn search_flights_matches_fragment() {
    let state = test_helpers::test_app_state();
    let Json(hits) = search_flights(State(state), search_for("sw2")).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].flight_number, "SW202");
}

#[tokio::test]
async fn search_flights_rejects_blank_query() {
    let state = test_helpers::test_app_state();
    let err = search_flights(State(state), search_for("   ")).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.code(), "E_EMPTY_QUERY");
}
