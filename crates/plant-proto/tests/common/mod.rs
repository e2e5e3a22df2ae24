//! Canned GraphQL server for exercising `GraphqlClient` over real HTTP.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use plant_proto::protocol::GraphqlRequest;
use serde_json::Value;
use tokio::net::TcpListener;

type Responder = dyn Fn(&GraphqlRequest) -> (StatusCode, Value) + Send + Sync;

#[derive(Clone)]
struct MockState {
    received: Arc<Mutex<Vec<GraphqlRequest>>>,
    respond: Arc<Responder>,
}

pub struct MockGraphqlServer {
    pub addr: SocketAddr,
    received: Arc<Mutex<Vec<GraphqlRequest>>>,
}

impl MockGraphqlServer {
    pub async fn start(
        respond: impl Fn(&GraphqlRequest) -> (StatusCode, Value) + Send + Sync + 'static,
    ) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            received: Arc::clone(&received),
            respond: Arc::new(respond),
        };
        let app = Router::new()
            .route("/graphql", post(graphql))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, received }
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}/graphql", self.addr)
    }

    pub fn received(&self) -> Vec<GraphqlRequest> {
        self.received.lock().unwrap().clone()
    }
}

async fn graphql(
    State(state): State<MockState>,
    Json(request): Json<GraphqlRequest>,
) -> (StatusCode, Json<Value>) {
    state.received.lock().unwrap().push(request.clone());
    let (status, body) = (state.respond)(&request);
    (status, Json(body))
}

/// The two-plant response used across the UI and client tests.
pub fn plants_to_care_body() -> Value {
    serde_json::json!({
        "data": {
            "plantsToCare": [
                {
                    "__typename": "Plant",
                    "id": "1",
                    "name": "Pancake plant",
                    "imageUrl": "https://examples.com/pancake-plant.png",
                    "description": "A plant that grows pancakes every morning",
                    "careType": "WATER"
                },
                {
                    "__typename": "Plant",
                    "id": "2",
                    "name": "UFO plant",
                    "imageUrl": "https://examples.com/pancake-plant.png",
                    "description": "A plant that summons aliens",
                    "careType": "CLEAN"
                }
            ]
        }
    })
}
