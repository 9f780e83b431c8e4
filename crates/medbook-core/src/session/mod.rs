//! Session store: who is logged in, and as what.
//!
//! The store owns one versioned [`Session`] record plus its persistence
//! backend. Mutations go through `login` and `logout`; the gateway uses
//! `expire` so that several failing requests invalidate a session once.

mod storage;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

pub use storage::{
    FileStorage, KEY_ACCESS, KEY_DOCTOR_ID, KEY_PATIENT_ID, KEY_REFRESH, KEY_ROLE, KEY_USER_ID,
    MemoryStorage, SESSION_KEYS, SessionFields, SessionStorage,
};

use crate::api::types::{Id, LoginResponse, Role};

/// Identifiers of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Id,
    pub patient_id: Option<Id>,
    pub doctor_id: Option<Id>,
}

/// An authenticated session. Role and access token only exist together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub role: Role,
    pub identity: Identity,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Snapshot of the session state at some version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    active: Option<ActiveSession>,
    version: u64,
}

impl Session {
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.active.as_ref().map(|s| s.role)
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.active.as_ref().map(|s| &s.identity)
    }

    pub fn access_token(&self) -> Option<&str> {
        self.active.as_ref().map(|s| s.access_token.as_str())
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    /// Monotonic counter bumped by every state change.
    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Failure to establish a session from a login payload.
#[derive(Debug)]
pub enum SessionError {
    /// A required field was absent or blank
    MissingField(&'static str),
    /// The role string is not one of PATIENT, DOCTOR, ADMIN
    UnknownRole(String),
    /// The session could not be persisted
    Storage(anyhow::Error),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::MissingField(field) => {
                write!(f, "Login response is missing '{field}'")
            }
            SessionError::UnknownRole(role) => write!(f, "Unknown role '{role}'"),
            SessionError::Storage(err) => write!(f, "Failed to persist session: {err:#}"),
        }
    }
}

impl std::error::Error for SessionError {}

struct StoreState {
    session: Session,
    storage: Box<dyn SessionStorage>,
}

/// Shared handle to the process-wide session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<StoreState>>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("SessionStore")
            .field("active", &state.session.is_active())
            .field("role", &state.session.role())
            .field("version", &state.session.version)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Creates an empty store over `storage`. Call [`SessionStore::restore`]
    /// to pick up a previously saved session.
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreState {
                session: Session::default(),
                storage: Box::new(storage),
            })),
        }
    }

    /// Store backed by `<base>/session.json`.
    pub fn file_backed() -> Self {
        Self::new(FileStorage::default_location())
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current session snapshot.
    pub fn snapshot(&self) -> Session {
        self.state().session.clone()
    }

    /// Rebuilds the session from persisted fields.
    ///
    /// Requires a known role, a user id and an access token; anything less
    /// leaves the session empty. Unreadable storage is logged and treated as
    /// empty.
    pub fn restore(&self) -> Session {
        let mut state = self.state();
        let fields = match state.storage.load() {
            Ok(fields) => fields,
            Err(err) => {
                warn!("Ignoring unreadable session storage: {err:#}");
                SessionFields::new()
            }
        };

        let restored = active_from_fields(&fields);
        if let Some(active) = &restored {
            info!(role = %active.role, "restored session");
        }
        if state.session.active != restored {
            state.session.active = restored;
            state.session.version += 1;
        }
        state.session.clone()
    }

    /// Establishes a session from a login response and persists it.
    ///
    /// `access`, `role` and `user_id` are mandatory. A missing
    /// `patient_id`/`doctor_id` is tolerated with a warning.
    ///
    /// # Errors
    /// Returns [`SessionError`] if the payload is incomplete or cannot be
    /// persisted; the previous session is left untouched in that case.
    pub fn login(&self, response: &LoginResponse) -> Result<Session, SessionError> {
        let access = non_blank(response.access.as_deref())
            .ok_or(SessionError::MissingField(KEY_ACCESS))?;
        let role_raw =
            non_blank(response.role.as_deref()).ok_or(SessionError::MissingField(KEY_ROLE))?;
        let role =
            Role::from_wire(role_raw).ok_or_else(|| SessionError::UnknownRole(role_raw.into()))?;
        let user_id = response
            .user_id
            .clone()
            .ok_or(SessionError::MissingField(KEY_USER_ID))?;

        match role {
            Role::Patient if response.patient_id.is_none() => {
                warn!("patient login response has no patient_id");
            }
            Role::Doctor if response.doctor_id.is_none() => {
                warn!("doctor login response has no doctor_id");
            }
            _ => {}
        }

        let active = ActiveSession {
            role,
            identity: Identity {
                user_id,
                patient_id: response.patient_id.clone(),
                doctor_id: response.doctor_id.clone(),
            },
            access_token: access.to_string(),
            refresh_token: non_blank(response.refresh.as_deref()).map(str::to_string),
        };

        let mut state = self.state();
        state
            .storage
            .save(&fields_from_active(&active))
            .map_err(SessionError::Storage)?;
        state.session.active = Some(active);
        state.session.version += 1;
        info!(role = %role, "logged in");
        Ok(state.session.clone())
    }

    /// Clears the session and its persisted fields. Safe to call repeatedly.
    ///
    /// # Errors
    /// Returns an error if persisted fields could not be removed; the
    /// in-memory session is cleared regardless.
    pub fn logout(&self) -> anyhow::Result<()> {
        let mut state = self.state();
        if state.session.active.take().is_some() {
            state.session.version += 1;
            info!("logged out");
        }
        state.storage.clear()
    }

    /// Invalidates the session a failed request was sent with.
    ///
    /// Only acts when the session is still active and still at
    /// `observed_version`; returns whether it did. Storage errors are logged.
    pub fn expire(&self, observed_version: u64) -> bool {
        let mut state = self.state();
        if state.session.active.is_none() || state.session.version != observed_version {
            return false;
        }

        state.session.active = None;
        state.session.version += 1;
        if let Err(err) = state.storage.clear() {
            warn!("Failed to clear persisted session: {err:#}");
        }
        warn!("session expired by server");
        true
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn active_from_fields(fields: &SessionFields) -> Option<ActiveSession> {
    let get = |key: &str| non_blank(fields.get(key).map(String::as_str));

    let role = get(KEY_ROLE).and_then(Role::from_wire)?;
    let user_id = get(KEY_USER_ID)?;
    let access = get(KEY_ACCESS)?;

    Some(ActiveSession {
        role,
        identity: Identity {
            user_id: Id::from(user_id),
            patient_id: get(KEY_PATIENT_ID).map(Id::from),
            doctor_id: get(KEY_DOCTOR_ID).map(Id::from),
        },
        access_token: access.to_string(),
        refresh_token: get(KEY_REFRESH).map(str::to_string),
    })
}

fn fields_from_active(active: &ActiveSession) -> SessionFields {
    let mut fields = SessionFields::new();
    fields.insert(KEY_ACCESS.to_string(), active.access_token.clone());
    fields.insert(KEY_ROLE.to_string(), active.role.as_str().to_string());
    fields.insert(
        KEY_USER_ID.to_string(),
        active.identity.user_id.as_str().to_string(),
    );
    if let Some(refresh) = &active.refresh_token {
        fields.insert(KEY_REFRESH.to_string(), refresh.clone());
    }
    if let Some(patient_id) = &active.identity.patient_id {
        fields.insert(KEY_PATIENT_ID.to_string(), patient_id.as_str().to_string());
    }
    if let Some(doctor_id) = &active.identity.doctor_id {
        fields.insert(KEY_DOCTOR_ID.to_string(), doctor_id.as_str().to_string());
    }
    fields
}
