//! Store lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every store
//! operation over real HTTP through a ureq-backed `Transport`. The server
//! never persists writes, so these tests also check that the store, not the
//! service, is what keeps the session's view consistent.

use mock_server::MockState;
use users_core::{
    HttpMethod, HttpRequest, HttpResponse, NewUser, SyncError, Transport, TransportError,
    UserPatch, UserStore, UsersClient,
};

/// Executes requests with ureq, returning 4xx/5xx as data rather than `Err`
/// so the core does the status interpretation.
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match (req.method, req.body) {
            (HttpMethod::Get, _) => self.agent.get(&req.path).call(),
            (HttpMethod::Delete, _) => self.agent.delete(&req.path).call(),
            (HttpMethod::Post, Some(body)) => self
                .agent
                .post(&req.path)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Post, None) => self.agent.post(&req.path).send_empty(),
            (HttpMethod::Put, Some(body)) => self
                .agent
                .put(&req.path)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Put, None) => self.agent.put(&req.path).send_empty(),
        };
        let mut response = result.map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::new(e.to_string()))?;
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

/// Start the mock server on a random port and return its base URL.
fn spawn_server(state: MockState) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with(listener, state).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn jane() -> NewUser {
    NewUser {
        name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        phone: "555-0100".to_string(),
        username: None,
    }
}

#[test]
fn store_lifecycle() {
    let base_url = spawn_server(MockState::default());
    let transport = UreqTransport::new();
    let mut store = UserStore::new(UsersClient::new(&base_url));

    // Step 1: load the seed list.
    let ids: Vec<u64> = store.load(&transport).unwrap().iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert!(!store.is_loading());
    assert!(store.error().is_none());

    // Step 2: create, the server answers id 6 but the store allocates its own.
    let created = store.create(&transport, jane()).unwrap();
    assert_eq!(created.id, 6);
    assert_eq!(created.username, "janedoe");
    assert_eq!(store.users()[0], created);

    // Step 3: a second create still gets a fresh id even though the
    // server keeps answering 6.
    let mut john = jane();
    john.name = "John Roe".to_string();
    let second = store.create(&transport, john).unwrap();
    assert_eq!(second.id, 7);

    // Step 4: update an existing record; untouched fields survive.
    let before = store.get(3).cloned().unwrap();
    let patch = UserPatch {
        name: Some("Clem B.".to_string()),
        ..UserPatch::default()
    };
    let updated = store.update(&transport, 3, &patch).unwrap();
    assert_eq!(updated.name, "Clem B.");
    assert_eq!(updated.email, before.email);
    assert_eq!(updated.address, before.address);
    assert_eq!(updated.company, before.company);

    // Step 5: delete one seed user.
    store.delete(&transport, 2).unwrap();
    let ids: Vec<u64> = store.users().iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![7, 6, 1, 3, 4, 5]);

    // Step 6: a further load is a no-op because the store is populated.
    assert_eq!(store.load(&transport).unwrap().len(), 6);
    assert!(!store.is_loading());
}

#[test]
fn locally_created_user_is_unknown_to_the_server() {
    let base_url = spawn_server(MockState::default());
    let transport = UreqTransport::new();
    let mut store = UserStore::new(UsersClient::new(&base_url));
    store.load(&transport).unwrap();

    let created = store.create(&transport, jane()).unwrap();
    let err = store.delete(&transport, created.id).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(store.error(), Some("Failed to delete user"));
    assert!(store.get(created.id).is_some());
}

#[test]
fn unavailable_service_leaves_store_untouched() {
    let state = MockState::default();
    let base_url = spawn_server(state.clone());
    let transport = UreqTransport::new();
    let mut store = UserStore::new(UsersClient::new(&base_url));

    state.set_unavailable(true);
    let err = store.load(&transport).unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch users");
    assert!(store.is_empty());
    assert!(!store.is_loading());

    state.set_unavailable(false);
    store.load(&transport).unwrap();
    assert!(store.error().is_none());

    state.set_unavailable(true);
    let err = store.create(&transport, jane()).unwrap_err();
    assert!(matches!(err, SyncError::RequestFailed { .. }));
    assert_eq!(store.len(), 5);
    assert_eq!(store.error(), Some("Failed to create user"));
}

#[test]
fn unreachable_service_is_a_transport_failure() {
    // Bind then drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let transport = UreqTransport::new();
    let mut store = UserStore::new(UsersClient::new(&format!("http://{addr}")));

    let err = store.load(&transport).unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch users");
    assert_eq!(store.error(), Some("Failed to fetch users"));
}
