//! The CRUD state machine behind every catalog screen.
//!
//! A manager holds the last server snapshot of one catalog, the record being
//! edited (if any) and the outcome of the last operation. It never patches the
//! list locally: after every successful mutation the list is re-fetched.
//!
//! Operations take `&mut self`, so calls on one manager are serialized by the
//! borrow checker; managers of different catalogs run independently.

use std::sync::Arc;

use gearbook_auth::{AuthzError, Capability, Session, authorize};
use gearbook_core::{Entity, RecordId, Resource, ResourceKind};

use crate::error::OperationError;
use crate::{ResourceClient, SessionStore};

/// Resolution of the editing pointer against the current list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget<'a, T> {
    /// Nothing is being edited: the form creates a new record.
    New,
    /// The pointer resolved to a listed record.
    Existing(&'a T),
    /// The pointer names a record that is not in the current list.
    Missing(RecordId),
}

/// What a create/edit form should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState<F> {
    /// Record the form will update on save, or `None` for create.
    pub editing: Option<RecordId>,
    pub values: F,
}

pub struct ResourceManager<R: Resource> {
    client: ResourceClient<R>,
    session: Arc<SessionStore>,
    records: Vec<R::Record>,
    editing: Option<RecordId>,
    status: Option<String>,
}

impl<R: Resource> ResourceManager<R> {
    pub fn new(client: ResourceClient<R>, session: Arc<SessionStore>) -> Self {
        Self {
            client,
            session,
            records: Vec::new(),
            editing: None,
            status: None,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        R::KIND
    }

    /// Last known server snapshot.
    pub fn records(&self) -> &[R::Record] {
        &self.records
    }

    pub fn editing(&self) -> Option<RecordId> {
        self.editing
    }

    /// Outcome of the last operation, success or failure.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn can_view(&self) -> bool {
        self.check(&self.session.current(), Capability::View).is_ok()
    }

    pub fn can_mutate(&self) -> bool {
        self.check(&self.session.current(), Capability::Mutate).is_ok()
    }

    /// Replace the held list with a fresh server snapshot.
    ///
    /// On success any earlier status is cleared. On failure the list is kept
    /// as is and the status describes the error.
    pub async fn refresh(&mut self) -> Result<(), OperationError> {
        self.ensure(Capability::View)?;

        match self.client.list().await {
            Ok(records) => {
                tracing::debug!(kind = R::KIND.name, count = records.len(), "list refreshed");
                self.records = records;
                self.status = None;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(kind = R::KIND.name, "list refresh failed: {err}");
                self.status = Some(format!("Error fetching {}: {err}", R::KIND.plural));
                Err(err.into())
            }
        }
    }

    /// Point the form at `id`. Resolution happens when the form is read.
    pub fn begin_edit(&mut self, id: RecordId) {
        self.editing = Some(id);
    }

    /// Return the form to "create" without touching the server.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Forget the held list, pointer and status (used on logout).
    pub fn reset(&mut self) {
        self.records.clear();
        self.editing = None;
        self.status = None;
    }

    pub fn edit_target(&self) -> EditTarget<'_, R::Record> {
        match self.editing {
            None => EditTarget::New,
            Some(id) => match self.records.iter().find(|r| r.id() == id) {
                Some(record) => EditTarget::Existing(record),
                None => EditTarget::Missing(id),
            },
        }
    }

    /// Form contents for the current editing pointer.
    ///
    /// A pointer that no longer resolves (the record vanished on refresh)
    /// yields empty values rather than an error.
    pub fn form(&self) -> FormState<R::Fields> {
        let values = match self.edit_target() {
            EditTarget::Existing(record) => R::form_values(record),
            EditTarget::New | EditTarget::Missing(_) => R::Fields::default(),
        };
        FormState {
            editing: self.editing,
            values,
        }
    }

    /// Create (no pointer) or update (pointer set) with `fields`.
    ///
    /// On success the pointer is cleared and the list re-fetched. On failure
    /// pointer and list stay as they were.
    pub async fn save(&mut self, fields: &R::Fields) -> Result<(), OperationError> {
        self.ensure(Capability::Mutate)?;

        let result = match self.editing {
            Some(id) => self.client.update(id, fields).await,
            None => self.client.create(fields).await,
        };

        match result {
            Ok(()) => {
                tracing::info!(kind = R::KIND.name, editing = ?self.editing, "record saved");
                self.editing = None;
                self.refresh_after_mutation(format!("{} saved successfully.", R::KIND.label))
                    .await;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(kind = R::KIND.name, "save failed: {err}");
                self.status = Some(format!("Error saving {}: {err}", R::KIND.noun()));
                Err(err.into())
            }
        }
    }

    pub async fn remove(&mut self, id: RecordId) -> Result<(), OperationError> {
        self.ensure(Capability::Mutate)?;

        match self.client.delete(id).await {
            Ok(confirmation) => {
                tracing::info!(kind = R::KIND.name, %id, "record deleted");
                let success = confirmation.unwrap_or_else(|| format!("{} deleted successfully.", R::KIND.label));
                self.refresh_after_mutation(success).await;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(kind = R::KIND.name, %id, "delete failed: {err}");
                self.status = Some(format!("Error deleting {}: {err}", R::KIND.noun()));
                Err(err.into())
            }
        }
    }

    // The mutation already succeeded; a failed refresh leaves its own error
    // as the status instead of `success`.
    async fn refresh_after_mutation(&mut self, success: String) {
        if self.refresh().await.is_ok() {
            self.status = Some(success);
        }
    }

    fn check(&self, session: &Session, capability: Capability) -> Result<(), AuthzError> {
        authorize(session, &R::KIND, capability)
    }

    fn ensure(&mut self, capability: Capability) -> Result<(), OperationError> {
        let session = self.session.current();
        self.check(&session, capability).map_err(|err| {
            tracing::warn!(kind = R::KIND.name, ?capability, "operation not permitted");
            self.status = Some(err.to_string());
            OperationError::Forbidden(err)
        })
    }
}
