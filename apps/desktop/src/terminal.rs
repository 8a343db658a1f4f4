//! Plain-terminal rendering of a panel: the table, the form and the alert
//! region all go to stdout, confirmations are read from stdin.

use std::{
    io::Write,
    sync::{Mutex, PoisonError},
};

use async_trait::async_trait;
use client_core::{
    Alert, AlertKind, Entity, FieldKind, FieldSpec, FormChrome, FormValues, PanelView, TableRow,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

pub struct TerminalView {
    columns: &'static [&'static str],
    fields: &'static [FieldSpec],
    form: Mutex<FormValues>,
    chrome: Mutex<Option<FormChrome>>,
    assume_yes: bool,
}

impl TerminalView {
    pub fn for_entity<E: Entity>(assume_yes: bool) -> Self {
        Self {
            columns: E::COLUMNS,
            fields: E::FIELDS,
            form: Mutex::new(FormValues::default()),
            chrome: Mutex::new(None),
            assume_yes,
        }
    }

    /// Same as the user typing into a form control.
    pub fn type_field(&self, name: &str, value: &str) {
        self.form
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set(name, value);
    }

    fn print_table(&self, rows: &[Vec<String>]) {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header: Vec<String> = self.columns.iter().map(|c| c.to_string()).collect();
        println!("{}", format_line(&header, &widths));
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        println!("{}", format_line(&rule, &widths));
        for row in rows {
            println!("{}", format_line(row, &widths));
        }
    }
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

#[async_trait]
impl PanelView for TerminalView {
    fn render_rows(&self, rows: &[TableRow]) {
        let cells: Vec<Vec<String>> = rows.iter().map(|row| row.cells.clone()).collect();
        self.print_table(&cells);
    }

    fn render_placeholder(&self, message: &str) {
        self.print_table(&[]);
        println!("{message}");
    }

    fn show_alert(&self, alert: &Alert) {
        let tag = match alert.kind {
            AlertKind::Success => "ok",
            AlertKind::Error => "error",
        };
        println!("[{tag}] {}", alert.message);
    }

    fn clear_alert(&self, alert_id: u64) {
        debug!(alert_id, "alert expired");
    }

    fn read_form(&self) -> FormValues {
        self.form
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn fill_form(&self, values: &FormValues) {
        *self.form.lock().unwrap_or_else(PoisonError::into_inner) = values.clone();
    }

    fn clear_form(&self) {
        *self.form.lock().unwrap_or_else(PoisonError::into_inner) = FormValues::default();
    }

    fn set_chrome(&self, chrome: &FormChrome) {
        *self.chrome.lock().unwrap_or_else(PoisonError::into_inner) = Some(*chrome);
    }

    fn scroll_to_form(&self) {
        let chrome = *self.chrome.lock().unwrap_or_else(PoisonError::into_inner);
        let form = self.read_form();
        if let Some(chrome) = chrome {
            println!("== {} ==", chrome.title);
        }
        for field in self.fields {
            let required = if field.kind == FieldKind::RequiredText { "*" } else { "" };
            println!("  {}{required}: {}", field.label, form.get(field.name));
        }
        if let Some(chrome) = chrome {
            println!("  [{}]", chrome.submit_label);
        }
    }

    async fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{prompt} [s/N] ");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match BufReader::new(tokio::io::stdin()).read_line(&mut line).await {
            Ok(_) => matches!(
                line.trim().to_lowercase().as_str(),
                "s" | "si" | "sí" | "y" | "yes"
            ),
            Err(error) => {
                debug!(%error, "could not read confirmation");
                false
            }
        }
    }
}
