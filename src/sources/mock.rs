//! Fixture-backed sources with simulated latency.

use std::time::Duration;

use uuid::Uuid;

use super::{FlightSource, GraphSource, SourceError};
use crate::services::flights::{self, Flight};
use crate::services::mindmap::{Edge, Graph, Node, NodeCreated, Position};

const MINDMAP_FIXTURE: &str = include_str!("fixtures/mindmap.json");
const FLIGHTS_FIXTURE: &str = include_str!("fixtures/flights.json");

async fn simulate_latency(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

fn parse_fixture<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, SourceError> {
    serde_json::from_str(raw).map_err(|e| SourceError::Parse(e.to_string()))
}

// =============================================================================
// GRAPH
// =============================================================================

pub struct MockGraphSource {
    fetch_delay: Duration,
    add_delay: Duration,
}

impl MockGraphSource {
    #[must_use]
    pub fn new(fetch_delay: Duration, add_delay: Duration) -> Self {
        Self { fetch_delay, add_delay }
    }
}

#[async_trait::async_trait]
impl GraphSource for MockGraphSource {
    async fn fetch_graph(&self) -> Result<Graph, SourceError> {
        simulate_latency(self.fetch_delay).await;
        parse_fixture(MINDMAP_FIXTURE)
    }

    async fn add_node(&self, parent_id: &str, question: &str, answer: &str) -> Result<NodeCreated, SourceError> {
        simulate_latency(self.add_delay).await;

        let id = format!("node-{}", Uuid::new_v4());
        let edge = Edge { id: format!("edge-{parent_id}-{id}"), source: parent_id.to_owned(), target: id.clone() };
        let node = Node {
            id,
            question: question.to_owned(),
            answer: answer.to_owned(),
            is_root: false,
            position: Position::default(),
        };
        Ok(NodeCreated { node, edge })
    }
}

// =============================================================================
// FLIGHTS
// =============================================================================

pub struct MockFlightSource {
    delay: Duration,
}

impl MockFlightSource {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait::async_trait]
impl FlightSource for MockFlightSource {
    async fn all_flights(&self) -> Result<Vec<Flight>, SourceError> {
        simulate_latency(self.delay).await;
        parse_fixture(FLIGHTS_FIXTURE)
    }

    async fn search(&self, needle: &str) -> Result<Vec<Flight>, SourceError> {
        simulate_latency(self.delay).await;
        let all: Vec<Flight> = parse_fixture(FLIGHTS_FIXTURE)?;
        Ok(all
            .into_iter()
            .filter(|f| flights::flight_number_matches(f, needle))
            .collect())
    }
}

#[cfg(test)]
#[path = "mock_test.rs"]
mod tests;
