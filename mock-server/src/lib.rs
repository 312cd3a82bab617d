//! In-process stand-in for the public users API.
//!
//! Serves a fixed seed list. Writes are answered the way the public service
//! answers them (echoing the payload with an id) but nothing is stored, so a
//! following `GET /users` always returns the seed list.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use tracing::debug;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub catch_phrase: String,
    pub bs: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub address: Address,
    pub company: Company,
}

/// Shared router state. Clones share the `unavailable` switch.
#[derive(Clone, Debug)]
pub struct MockState {
    users: Arc<Vec<User>>,
    unavailable: Arc<AtomicBool>,
}

impl Default for MockState {
    fn default() -> Self {
        Self::with_users(seed_users())
    }
}

impl MockState {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(users),
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// While set, every route answers 503.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn is_unavailable(&self) -> bool {
        self.unavailable.load(Ordering::SeqCst)
    }

    fn contains(&self, id: u64) -> bool {
        self.users.iter().any(|u| u.id == id)
    }
}

pub fn app() -> Router {
    app_with(MockState::default())
}

pub fn app_with(state: MockState) -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .layer(middleware::from_fn_with_state(state.clone(), availability))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(state)).await
}

async fn availability(State(state): State<MockState>, request: Request, next: Next) -> Response {
    if state.is_unavailable() {
        debug!(method = %request.method(), uri = %request.uri(), "rejecting, service unavailable");
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    next.run(request).await
}

async fn list_users(State(state): State<MockState>) -> Json<Vec<User>> {
    Json(state.users().to_vec())
}

async fn get_user(
    State(state): State<MockState>,
    Path(id): Path<u64>,
) -> Result<Json<User>, StatusCode> {
    state
        .users()
        .iter()
        .find(|u| u.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Echo the payload with the next id the seed list would use.
async fn create_user(
    State(state): State<MockState>,
    Json(mut input): Json<Map<String, Value>>,
) -> (StatusCode, Json<Value>) {
    let id = state.users().len() as u64 + 1;
    input.insert("id".to_string(), json!(id));
    debug!(id, "create accepted, not stored");
    (StatusCode::CREATED, Json(Value::Object(input)))
}

async fn update_user(
    State(state): State<MockState>,
    Path(id): Path<u64>,
    Json(mut input): Json<Map<String, Value>>,
) -> Result<Json<Value>, StatusCode> {
    if !state.contains(id) {
        return Err(StatusCode::NOT_FOUND);
    }
    input.insert("id".to_string(), json!(id));
    debug!(id, "update accepted, not stored");
    Ok(Json(Value::Object(input)))
}

async fn delete_user(
    State(state): State<MockState>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, StatusCode> {
    if !state.contains(id) {
        return Err(StatusCode::NOT_FOUND);
    }
    debug!(id, "delete accepted, not stored");
    Ok(Json(json!({})))
}

#[allow(clippy::too_many_arguments)]
fn user(
    id: u64,
    name: &str,
    username: &str,
    email: &str,
    phone: &str,
    website: &str,
    (street, suite, city, zipcode): (&str, &str, &str, &str),
    (company, catch_phrase, bs): (&str, &str, &str),
) -> User {
    User {
        id,
        name: name.to_string(),
        username: username.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        website: website.to_string(),
        address: Address {
            street: street.to_string(),
            suite: suite.to_string(),
            city: city.to_string(),
            zipcode: zipcode.to_string(),
        },
        company: Company {
            name: company.to_string(),
            catch_phrase: catch_phrase.to_string(),
            bs: bs.to_string(),
        },
    }
}

/// The first five users of the public service's fixture data.
pub fn seed_users() -> Vec<User> {
    vec![
        user(
            1,
            "Leanne Graham",
            "Bret",
            "Sincere@april.biz",
            "1-770-736-8031 x56442",
            "hildegard.org",
            ("Kulas Light", "Apt. 556", "Gwenborough", "92998-3874"),
            ("Romaguera-Crona", "Multi-layered client-server neural-net", "harness real-time e-markets"),
        ),
        user(
            2,
            "Ervin Howell",
            "Antonette",
            "Shanna@melissa.tv",
            "010-692-6593 x09125",
            "anastasia.net",
            ("Victor Plains", "Suite 879", "Wisokyburgh", "90566-7771"),
            ("Deckow-Crist", "Proactive didactic contingency", "synergize scalable supply-chains"),
        ),
        user(
            3,
            "Clementine Bauch",
            "Samantha",
            "Nathan@yesenia.net",
            "1-463-123-4447",
            "ramiro.info",
            ("Douglas Extension", "Suite 847", "McKenziehaven", "59590-4157"),
            ("Romaguera-Jacobson", "Face to face bifurcated interface", "e-enable strategic applications"),
        ),
        user(
            4,
            "Patricia Lebsack",
            "Karianne",
            "Julianne.OConner@kory.org",
            "493-170-9623 x156",
            "kale.biz",
            ("Hoeger Mall", "Apt. 692", "South Elvis", "53919-4257"),
            ("Robel-Corkery", "Multi-tiered zero tolerance productivity", "transition cutting-edge web services"),
        ),
        user(
            5,
            "Chelsey Dietrich",
            "Kamren",
            "Lucio_Hettinger@annie.ca",
            "(254)954-1289",
            "demarco.info",
            ("Skiles Walks", "Suite 351", "Roscoeview", "33263"),
            ("Keebler LLC", "User-centric fault-tolerant solution", "revolutionize end-to-end systems"),
        ),
    ]
}
