//! Generic admin panel: list loader, form controller, row actions and alert
//! presenter for one entity.

use std::{marker::PhantomData, sync::Arc};

use shared::domain::RecordId;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    alert::AlertPresenter,
    entity::Entity,
    form::{FormChrome, FormError, FormMode},
    view::{PanelView, TableRow},
    AdminClient, ClientError,
};

const MUTATION_FAILURE_PREFIX: &str = "Error: ";

/// Returned after the failure has already been shown in the alert region.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Form(#[from] FormError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined the confirmation; nothing was sent.
    Declined,
}

pub struct CrudPanel<E: Entity, V: PanelView> {
    client: AdminClient,
    view: Arc<V>,
    alerts: AlertPresenter<V>,
    mode: FormMode,
    _entity: PhantomData<E>,
}

impl<E: Entity, V: PanelView> CrudPanel<E, V> {
    pub fn new(client: AdminClient, view: Arc<V>) -> Self {
        let alerts = AlertPresenter::new(Arc::clone(&view), client.config().alert_duration);
        Self {
            client,
            view,
            alerts,
            mode: FormMode::Create,
            _entity: PhantomData,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn view(&self) -> &Arc<V> {
        &self.view
    }

    /// Page load: create-mode chrome, then the first list fetch.
    pub async fn init(&mut self) -> Result<usize, PanelError> {
        self.view.set_chrome(&FormChrome::for_mode(&E::LABELS, self.mode));
        self.load().await
    }

    /// Fetches every record and re-renders the table. On failure the table is
    /// left as it was.
    pub async fn load(&self) -> Result<usize, PanelError> {
        let records = match self.client.list::<E>().await {
            Ok(records) => records,
            Err(err) => {
                let prefix = format!("Error al cargar {}: ", E::LABELS.plural);
                self.report(&err, &prefix).await;
                return Err(err.into());
            }
        };

        if records.is_empty() {
            self.view.render_placeholder(E::LABELS.empty);
        } else {
            let rows: Vec<TableRow> = records
                .iter()
                .map(|record| TableRow {
                    id: E::record_id(record),
                    cells: E::cells(record),
                })
                .collect();
            self.view.render_rows(&rows);
        }
        debug!(entity = E::ENDPOINT, count = records.len(), "table rendered");
        Ok(records.len())
    }

    /// Creates in create-mode, updates the edited record in edit-mode. A
    /// failed submit keeps both the mode and the typed values.
    pub async fn submit(&mut self) -> Result<(), PanelError> {
        let values = self.view.read_form();
        let payload = match E::payload(&values) {
            Ok(payload) => payload,
            Err(err) => {
                debug!(entity = E::ENDPOINT, error = %err, "form rejected before submit");
                self.alerts.error(format!("{MUTATION_FAILURE_PREFIX}{err}")).await;
                return Err(err.into());
            }
        };

        let result = match self.mode {
            FormMode::Create => self.client.create::<E>(&payload).await,
            FormMode::Edit(id) => self.client.update::<E>(id, &payload).await,
        };

        match result {
            Ok(message) => {
                info!(entity = E::ENDPOINT, mode = ?self.mode, "record saved");
                self.alerts.success(message).await;
                self.reset_form();
                self.reload().await;
                Ok(())
            }
            Err(err) => {
                self.report(&err, MUTATION_FAILURE_PREFIX).await;
                Err(err.into())
            }
        }
    }

    /// Fetches one record into the form. The mode only changes when the
    /// fetch succeeds.
    pub async fn enter_edit(&mut self, id: RecordId) -> Result<(), PanelError> {
        let record = match self.client.fetch::<E>(id).await {
            Ok(record) => record,
            Err(err) => {
                let prefix = format!("Error al cargar {}: ", E::LABELS.singular);
                self.report(&err, &prefix).await;
                return Err(err.into());
            }
        };

        self.view.fill_form(&E::form_values(&record));
        self.mode = FormMode::Edit(id);
        self.view.set_chrome(&FormChrome::for_mode(&E::LABELS, self.mode));
        self.view.scroll_to_form();
        debug!(entity = E::ENDPOINT, record_id = %id, "editing record");
        Ok(())
    }

    /// Row "edit" action.
    pub async fn edit_row(&mut self, id: RecordId) -> Result<(), PanelError> {
        self.enter_edit(id).await
    }

    /// Row "delete" action. Nothing is sent unless the user confirms.
    pub async fn delete_row(&mut self, id: RecordId) -> Result<DeleteOutcome, PanelError> {
        if !self.view.confirm(E::LABELS.delete_prompt).await {
            debug!(entity = E::ENDPOINT, record_id = %id, "delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        match self.client.delete::<E>(id).await {
            Ok(message) => {
                info!(entity = E::ENDPOINT, record_id = %id, "record deleted");
                self.alerts.success(message).await;
                self.reset_form();
                self.reload().await;
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => {
                self.report(&err, MUTATION_FAILURE_PREFIX).await;
                Err(err.into())
            }
        }
    }

    pub fn cancel_edit(&mut self) {
        self.reset_form();
    }

    /// Clears the fields and restores create-mode chrome.
    pub fn reset_form(&mut self) {
        self.view.clear_form();
        self.mode = FormMode::Create;
        self.view.set_chrome(&FormChrome::for_mode(&E::LABELS, self.mode));
    }

    async fn reload(&self) {
        // A failed reload has already raised its own alert.
        if let Err(error) = self.load().await {
            debug!(entity = E::ENDPOINT, %error, "reload after mutation failed");
        }
    }

    async fn report(&self, err: &ClientError, failure_prefix: &str) {
        warn!(
            entity = E::ENDPOINT,
            application = err.is_application(),
            error = %err,
            "request failed"
        );
        self.alerts.error(err.alert_message(failure_prefix)).await;
    }
}

#[cfg(test)]
#[path = "tests/panel_tests.rs"]
mod tests;
