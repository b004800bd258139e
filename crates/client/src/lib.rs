//! `gearbook-client`
//!
//! **Responsibility:** the HTTP side of the administration client.
//!
//! This crate provides:
//! - `SessionStore`: credential exchange and durable session custody
//! - `ResourceClient<R>`: typed list/create/update/delete gateway per catalog
//! - `ResourceManager<R>`: the CRUD state machine every catalog screen drives
//! - `AdminConsole`: the four catalogs wired to one session
//!
//! Rendering is left to the caller; everything here returns state to render.

pub mod config;
pub mod console;
pub mod error;
mod http;
pub mod manager;
pub mod resource_client;
pub mod session_store;

pub use config::{AuthScheme, ClientConfig};
pub use console::{AdminConsole, KINDS};
pub use error::{AuthenticationError, FetchError, LoginError, OperationError};
pub use manager::{EditTarget, FormState, ResourceManager};
pub use resource_client::ResourceClient;
pub use session_store::SessionStore;
