use std::{sync::Arc, time::Duration};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use client_core::{
    AdminClient, ClientConfig, CrudPanel, Customers, DeleteOutcome, Entity, Products,
};
use shared::domain::RecordId;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod terminal;

use terminal::TerminalView;

#[derive(Parser, Debug)]
#[command(about = "Terminal admin panel for customers and products")]
struct Cli {
    #[arg(long, env = "ADMIN_SERVER_URL", default_value = "http://127.0.0.1:8080")]
    server_url: String,
    /// Seconds an alert stays visible.
    #[arg(long, default_value_t = 5)]
    alert_seconds: u64,
    /// Per-request timeout; requests wait indefinitely when unset.
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    panel: PanelCommand,
}

#[derive(Subcommand, Debug)]
enum PanelCommand {
    Customers {
        #[command(subcommand)]
        action: Action,
    },
    Products {
        #[command(subcommand)]
        action: Action,
    },
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Show the table.
    List,
    /// Fill the form and submit it in create-mode.
    Create(FieldArgs),
    /// Load a record into the form, apply the given fields and submit.
    Edit {
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    Delete {
        id: i64,
        /// Answer the confirmation prompt with yes.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
struct FieldArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    price: Option<String>,
}

impl FieldArgs {
    fn apply<E: Entity>(&self, view: &TerminalView) {
        let typed = [
            ("nombre", &self.name),
            ("direccion", &self.address),
            ("telefono", &self.phone),
            ("precio", &self.price),
        ];
        for (field, value) in typed {
            let Some(value) = value else {
                continue;
            };
            if E::FIELDS.iter().any(|spec| spec.name == field) {
                view.type_field(field, value);
            } else {
                warn!(entity = E::ENDPOINT, field, "ignoring field not present on this form");
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config = ClientConfig::new(&cli.server_url)?
        .with_alert_duration(Duration::from_secs(cli.alert_seconds))
        .with_request_timeout(cli.timeout_secs.map(Duration::from_secs));
    let client = AdminClient::new(config)?;

    match cli.panel {
        PanelCommand::Customers { action } => run::<Customers>(client, action).await,
        PanelCommand::Products { action } => run::<Products>(client, action).await,
    }
}

async fn run<E: Entity>(client: AdminClient, action: Action) -> Result<()> {
    let assume_yes = matches!(action, Action::Delete { yes: true, .. });
    let view = Arc::new(TerminalView::for_entity::<E>(assume_yes));
    let mut panel: CrudPanel<E, TerminalView> = CrudPanel::new(client, Arc::clone(&view));

    panel.init().await?;
    match action {
        Action::List => {}
        Action::Create(fields) => {
            fields.apply::<E>(&view);
            panel.submit().await?;
        }
        Action::Edit { id, fields } => {
            panel.edit_row(RecordId(id)).await?;
            fields.apply::<E>(&view);
            panel.submit().await?;
        }
        Action::Delete { id, .. } => {
            if panel.delete_row(RecordId(id)).await? == DeleteOutcome::Declined {
                println!("Eliminación cancelada");
            }
        }
    }
    Ok(())
}
