//! Shared fixtures for the client integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use gearbook_auth::storage::persist_session;
use gearbook_auth::{Claims, InMemoryStorage, Session, encode_claims};
use gearbook_client::{AdminConsole, AuthScheme, ClientConfig, ResourceClient, ResourceManager, SessionStore};
use gearbook_core::Resource;
use wiremock::MockServer;

pub fn admin_token() -> String {
    encode_claims(&Claims::new().with("sub", "admin").with("administrador", true))
}

pub fn plain_token() -> String {
    encode_claims(&Claims::new().with("sub", "ana").with("administrador", false))
}

pub fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(server.uri())
}

pub fn raw_config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        auth_scheme: AuthScheme::Raw,
        ..config(server)
    }
}

/// Storage already holding `session`.
pub fn storage_with(session: &Session) -> Arc<InMemoryStorage> {
    let storage = Arc::new(InMemoryStorage::new());
    persist_session(storage.as_ref(), session).unwrap();
    storage
}

pub fn admin_storage() -> Arc<InMemoryStorage> {
    storage_with(&Session::authenticated(admin_token(), true))
}

pub fn plain_storage() -> Arc<InMemoryStorage> {
    storage_with(&Session::authenticated(plain_token(), false))
}

pub fn session_store(config: &ClientConfig, storage: Arc<InMemoryStorage>) -> Arc<SessionStore> {
    Arc::new(SessionStore::new(config, storage))
}

pub fn manager<R: Resource>(config: &ClientConfig, session: &Arc<SessionStore>) -> ResourceManager<R> {
    ResourceManager::new(ResourceClient::new(config, Arc::clone(session)), Arc::clone(session))
}

pub fn console(config: &ClientConfig, storage: Arc<InMemoryStorage>) -> AdminConsole {
    AdminConsole::new(config, storage)
}
