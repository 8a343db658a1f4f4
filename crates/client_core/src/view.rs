//! The seam between panel logic and whatever draws the table, form and alert
//! region.

use async_trait::async_trait;
use shared::domain::RecordId;

use crate::{
    alert::Alert,
    form::{FormChrome, FormValues},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Target of the row's edit/delete actions.
    pub id: RecordId,
    pub cells: Vec<String>,
}

#[async_trait]
pub trait PanelView: Send + Sync + 'static {
    /// Replaces the table body with one row per record.
    fn render_rows(&self, rows: &[TableRow]);

    /// Replaces the table body with a single placeholder row.
    fn render_placeholder(&self, message: &str);

    /// Replaces whatever alert is currently shown.
    fn show_alert(&self, alert: &Alert);

    fn clear_alert(&self, alert_id: u64);

    fn read_form(&self) -> FormValues;

    fn fill_form(&self, values: &FormValues);

    fn clear_form(&self);

    fn set_chrome(&self, chrome: &FormChrome);

    fn scroll_to_form(&self) {}

    /// Interactive yes/no confirmation.
    async fn confirm(&self, prompt: &str) -> bool;
}
