//! The client-side user store and its synchronization functions.
//!
//! # Design
//! `UserStore` owns the session's user list, a loading indicator and an
//! error slot. Each synchronization function (load, create, update, delete)
//! is split the same way `UsersClient` is: `begin_*` opens a ticket and
//! returns a [`Pending`] carrying the request to send, `finish_*` consumes
//! the ticket together with whatever the host got back and reconciles the
//! list. `load`/`create`/`update`/`delete` run both halves through a
//! [`Transport`] for hosts that are happy to block.
//!
//! Loading is derived from the set of open tickets, so overlapping
//! operations keep the indicator raised until the last one settles. The
//! error slot holds the message of the most recently settled failure and is
//! cleared by the next success. A failed round trip never mutates the list.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info, warn};

use crate::client::UsersClient;
use crate::error::{ApiError, SyncError, SyncOp, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::ids::IdAllocator;
use crate::transport::Transport;
use crate::types::{NewUser, User, UserPatch};

/// What the host got back for a pending request.
pub type Outcome = Result<HttpResponse, TransportError>;

/// An outstanding operation: the request to execute and the ticket to hand
/// back to the matching `finish_*` (or to [`UserStore::abandon`]).
#[derive(Debug)]
#[must_use = "a pending operation keeps the store loading until it is finished or abandoned"]
pub struct Pending<K> {
    ticket: u64,
    request: HttpRequest,
    kind: K,
}

impl<K> Pending<K> {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }
}

#[derive(Debug)]
pub struct LoadOp;

#[derive(Debug)]
pub struct CreateOp {
    input: NewUser,
}

#[derive(Debug)]
pub struct UpdateOp {
    id: u64,
}

#[derive(Debug)]
pub struct DeleteOp {
    id: u64,
}

#[derive(Debug)]
pub struct UserStore {
    client: UsersClient,
    users: Vec<User>,
    ids: IdAllocator,
    /// Ids of records this session created, as opposed to loaded.
    local: HashSet<u64>,
    in_flight: BTreeMap<u64, SyncOp>,
    next_ticket: u64,
    error: Option<String>,
}

impl UserStore {
    pub fn new(client: UsersClient) -> Self {
        Self {
            client,
            users: Vec::new(),
            ids: IdAllocator::new(),
            local: HashSet::new(),
            in_flight: BTreeMap::new(),
            next_ticket: 1,
            error: None,
        }
    }

    pub fn client(&self) -> &UsersClient {
        &self.client
    }

    /// Users in server order, newest local creations first.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn get(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Number of operations begun but not yet finished or abandoned.
    pub fn outstanding(&self) -> usize {
        self.in_flight.len()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // -----------------------------------------------------------------------
    // Load
    // -----------------------------------------------------------------------

    /// Start the initial fetch. Returns `None` (nothing to send) when the
    /// store already holds users or a load is already outstanding.
    pub fn begin_load(&mut self) -> Option<Pending<LoadOp>> {
        if !self.users.is_empty() {
            debug!(users = self.users.len(), "store already populated, skipping load");
            return None;
        }
        if self.in_flight.values().any(|op| *op == SyncOp::Load) {
            debug!("load already outstanding");
            return None;
        }
        let request = self.client.build_list_users();
        Some(self.open(SyncOp::Load, request, LoadOp))
    }

    pub fn finish_load(
        &mut self,
        pending: Pending<LoadOp>,
        outcome: Outcome,
    ) -> Result<&[User], SyncError> {
        let mut users = self.receive(pending.ticket, SyncOp::Load, outcome, |c, r| {
            c.parse_list_users(r)
        })?;

        let mut seen = HashSet::new();
        let before = users.len();
        users.retain(|u| seen.insert(u.id));
        if users.len() != before {
            warn!(dropped = before - users.len(), "service returned duplicate user ids");
        }

        self.ids.observe_all(users.iter().map(|u| u.id));
        self.users = self.merge_local(users);
        self.succeed(SyncOp::Load);
        info!(users = self.users.len(), "users loaded");
        Ok(&self.users)
    }

    /// Records created while the load was out stay in front of the loaded
    /// list. One whose id was also returned by the service gets a new id
    /// above everything observed.
    fn merge_local(&mut self, loaded: Vec<User>) -> Vec<User> {
        let loaded_ids: HashSet<u64> = loaded.iter().map(|u| u.id).collect();
        let mut merged: Vec<User> = std::mem::take(&mut self.users)
            .into_iter()
            .filter(|u| self.local.contains(&u.id))
            .collect();
        for user in &mut merged {
            if loaded_ids.contains(&user.id) {
                let rekeyed = self.ids.allocate();
                warn!(old = user.id, new = rekeyed, "created user collides with loaded id, re-keyed");
                self.local.remove(&user.id);
                self.local.insert(rekeyed);
                user.id = rekeyed;
            }
        }
        merged.extend(loaded);
        merged
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    /// Validate `input` and start a create. Validation failures, and creates
    /// attempted while the initial load is outstanding, are returned without
    /// sending anything and without touching loading or error state.
    pub fn begin_create(&mut self, input: NewUser) -> Result<Pending<CreateOp>, SyncError> {
        input.validate()?;
        if self.in_flight.values().any(|op| *op == SyncOp::Load) {
            return Err(SyncError::LoadInProgress);
        }
        let request = self
            .client
            .build_create_user(&input)
            .map_err(|e| self.reject(SyncOp::Create, e))?;
        Ok(self.open(SyncOp::Create, request, CreateOp { input }))
    }

    /// On success the record gets a locally allocated id and is prepended.
    pub fn finish_create(
        &mut self,
        pending: Pending<CreateOp>,
        outcome: Outcome,
    ) -> Result<User, SyncError> {
        let patch = self.receive(pending.ticket, SyncOp::Create, outcome, |c, r| {
            c.parse_create_user(r)
        })?;

        let CreateOp { input } = pending.kind;
        let username = input.effective_username();
        let mut user = User {
            id: 0,
            name: input.name,
            email: input.email,
            phone: input.phone,
            username: username.clone(),
            website: None,
            address: None,
            company: None,
        };
        patch.apply_to(&mut user);
        user.id = self.ids.allocate();
        user.username = username;

        self.local.insert(user.id);
        self.users.insert(0, user.clone());
        self.succeed(SyncOp::Create);
        info!(id = user.id, "user created");
        Ok(user)
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    /// Validate `patch` and start an update. Like `begin_create`, a rejected
    /// patch sends nothing and leaves loading and error state alone.
    pub fn begin_update(
        &mut self,
        id: u64,
        patch: &UserPatch,
    ) -> Result<Pending<UpdateOp>, SyncError> {
        patch.validate()?;
        if self.get(id).is_none() {
            return Err(SyncError::UnknownUser(id));
        }
        let request = self
            .client
            .build_update_user(id, patch)
            .map_err(|e| self.reject(SyncOp::Update, e))?;
        Ok(self.open(SyncOp::Update, request, UpdateOp { id }))
    }

    /// Merge the service's payload into the stored record. Fields the
    /// payload omits keep their previous values.
    pub fn finish_update(
        &mut self,
        pending: Pending<UpdateOp>,
        outcome: Outcome,
    ) -> Result<User, SyncError> {
        let patch = self.receive(pending.ticket, SyncOp::Update, outcome, |c, r| {
            c.parse_update_user(r)
        })?;

        let id = pending.kind.id;
        let Some(index) = self.users.iter().position(|u| u.id == id) else {
            // Deleted by another operation while this one was in flight.
            let err = SyncError::UnknownUser(id);
            self.record(SyncOp::Update, &err);
            return Err(err);
        };
        let user = &mut self.users[index];
        patch.apply_to(user);
        let merged = user.clone();

        self.succeed(SyncOp::Update);
        info!(id, "user updated");
        Ok(merged)
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    pub fn begin_delete(&mut self, id: u64) -> Result<Pending<DeleteOp>, SyncError> {
        if self.get(id).is_none() {
            return Err(SyncError::UnknownUser(id));
        }
        let request = self.client.build_delete_user(id);
        Ok(self.open(SyncOp::Delete, request, DeleteOp { id }))
    }

    pub fn finish_delete(
        &mut self,
        pending: Pending<DeleteOp>,
        outcome: Outcome,
    ) -> Result<(), SyncError> {
        self.receive(pending.ticket, SyncOp::Delete, outcome, |c, r| {
            c.parse_delete_user(r)
        })?;

        let id = pending.kind.id;
        self.users.retain(|u| u.id != id);
        self.local.remove(&id);
        self.succeed(SyncOp::Delete);
        info!(id, "user deleted");
        Ok(())
    }

    /// Drop an outstanding operation without reconciling anything, e.g.
    /// after the host gave up on a request that never answered.
    pub fn abandon<K>(&mut self, pending: Pending<K>) {
        if let Some(op) = self.in_flight.remove(&pending.ticket) {
            debug!(ticket = pending.ticket, %op, "operation abandoned");
        }
    }

    // -----------------------------------------------------------------------
    // Blocking drivers
    // -----------------------------------------------------------------------

    /// Fetch the list if the store is empty; otherwise return it as is.
    pub fn load<T: Transport>(&mut self, transport: &T) -> Result<&[User], SyncError> {
        match self.begin_load() {
            None => Ok(&self.users),
            Some(pending) => {
                let outcome = transport.execute(pending.request().clone());
                self.finish_load(pending, outcome)
            }
        }
    }

    pub fn create<T: Transport>(
        &mut self,
        transport: &T,
        input: NewUser,
    ) -> Result<User, SyncError> {
        let pending = self.begin_create(input)?;
        let outcome = transport.execute(pending.request().clone());
        self.finish_create(pending, outcome)
    }

    pub fn update<T: Transport>(
        &mut self,
        transport: &T,
        id: u64,
        patch: &UserPatch,
    ) -> Result<User, SyncError> {
        let pending = self.begin_update(id, patch)?;
        let outcome = transport.execute(pending.request().clone());
        self.finish_update(pending, outcome)
    }

    pub fn delete<T: Transport>(&mut self, transport: &T, id: u64) -> Result<(), SyncError> {
        let pending = self.begin_delete(id)?;
        let outcome = transport.execute(pending.request().clone());
        self.finish_delete(pending, outcome)
    }

    // -----------------------------------------------------------------------
    // Bookkeeping
    // -----------------------------------------------------------------------

    fn open<K>(&mut self, op: SyncOp, request: HttpRequest, kind: K) -> Pending<K> {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight.insert(ticket, op);
        debug!(ticket, %op, method = %request.method, path = %request.path, "request issued");
        Pending {
            ticket,
            request,
            kind,
        }
    }

    /// Close `ticket` and turn the outcome into the parsed payload, recording
    /// any failure in the error slot.
    fn receive<T>(
        &mut self,
        ticket: u64,
        op: SyncOp,
        outcome: Outcome,
        parse: impl FnOnce(&UsersClient, HttpResponse) -> Result<T, ApiError>,
    ) -> Result<T, SyncError> {
        if self.in_flight.remove(&ticket).is_none() {
            warn!(ticket, %op, "finished a ticket this store did not issue");
        }
        let result = match outcome {
            Ok(response) => {
                let status = response.status;
                debug!(ticket, %op, status, "response received");
                parse(&self.client, response).map_err(|e| SyncError::request_failed(op, e))
            }
            Err(e) => Err(SyncError::request_failed(op, e)),
        };
        if let Err(err) = &result {
            self.record(op, err);
        }
        result
    }

    fn reject(&mut self, op: SyncOp, cause: ApiError) -> SyncError {
        let err = SyncError::request_failed(op, cause);
        self.record(op, &err);
        err
    }

    fn record(&mut self, op: SyncOp, err: &SyncError) {
        let cause = std::error::Error::source(err).map(ToString::to_string);
        warn!(%op, error = %err, cause = cause.as_deref().unwrap_or(""), "synchronization failed");
        self.error = Some(err.to_string());
    }

    fn succeed(&mut self, op: SyncOp) {
        debug!(%op, "synchronization succeeded");
        self.error = None;
    }
}
