//! The administration console: one session shared by the four catalog screens.

use std::sync::Arc;

use gearbook_auth::{Credentials, Session, SessionStorage, StorageError, Users};
use gearbook_catalog::{AccessoryTypes, Brands, Models};
use gearbook_core::{Resource, ResourceKind};

use crate::error::LoginError;
use crate::{ClientConfig, ResourceClient, ResourceManager, SessionStore};

/// Every catalog the console manages, in screen order.
pub const KINDS: [ResourceKind; 4] = [AccessoryTypes::KIND, Brands::KIND, Models::KIND, Users::KIND];

const LOGIN_OK: &str = "Login successful.";
const LOGIN_FAILED: &str = "An error occurred during login.";

pub struct AdminConsole {
    session: Arc<SessionStore>,
    pub accessory_types: ResourceManager<AccessoryTypes>,
    pub brands: ResourceManager<Brands>,
    pub models: ResourceManager<Models>,
    pub users: ResourceManager<Users>,
    login_status: Option<String>,
}

impl AdminConsole {
    /// Wire all screens to one session store and one HTTP connection pool.
    pub fn new(config: &ClientConfig, storage: Arc<dyn SessionStorage>) -> Self {
        let http = reqwest::Client::new();
        let session = Arc::new(SessionStore::with_http(config, storage, http.clone()));

        Self {
            accessory_types: manager(config, &session, &http),
            brands: manager(config, &session, &http),
            models: manager(config, &session, &http),
            users: manager(config, &session, &http),
            session,
            login_status: None,
        }
    }

    pub fn session(&self) -> Session {
        self.session.current()
    }

    pub fn session_store(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Message for the login form, if a login was attempted.
    pub fn login_status(&self) -> Option<&str> {
        self.login_status.as_deref()
    }

    pub async fn login(&mut self, credentials: &Credentials) -> Result<Session, LoginError> {
        let result = self.session.login(credentials).await;
        self.login_status = Some(match &result {
            Ok(_) => LOGIN_OK.to_string(),
            Err(LoginError::Authentication(err)) => err.message.clone(),
            Err(_) => LOGIN_FAILED.to_string(),
        });
        result
    }

    /// Forget the session and everything the screens loaded under it.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.login_status = None;
        self.accessory_types.reset();
        self.brands.reset();
        self.models.reset();
        self.users.reset();
        self.session.logout()
    }

    /// Load every screen the session may see.
    ///
    /// Screens are independent: one failing list leaves the others loaded,
    /// and each failure is reported through that screen's status.
    pub async fn mount(&mut self) {
        let session = self.session.current();
        tracing::info!(privileged = session.is_privileged, "mounting console");

        let _ = self.accessory_types.refresh().await;
        let _ = self.brands.refresh().await;
        let _ = self.models.refresh().await;
        if gearbook_auth::can_view(&session, &Users::KIND) {
            let _ = self.users.refresh().await;
        }
    }
}

fn manager<R: Resource>(
    config: &ClientConfig,
    session: &Arc<SessionStore>,
    http: &reqwest::Client,
) -> ResourceManager<R> {
    let client = ResourceClient::with_http(config, Arc::clone(session), http.clone());
    ResourceManager::new(client, Arc::clone(session))
}
