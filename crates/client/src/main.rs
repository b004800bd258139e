use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;

use gearbook_auth::{Credentials, FileStorage, decode_claims};
use gearbook_catalog::{AccessoryTypes, Brands, Models};
use gearbook_client::{AdminConsole, ClientConfig, KINDS, ResourceManager};
use gearbook_core::{RecordId, Resource, ResourceKind};

#[derive(Parser)]
#[command(name = "gearbook")]
#[command(version)]
#[command(about = "Administration client for the gear catalog backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "GEARBOOK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the stored session
    Whoami,

    /// List records of a catalog (accessory-type, brand, model, user)
    List {
        #[arg(value_name = "KIND")]
        kind: String,
    },

    /// Create a record from a JSON field object
    Create {
        #[arg(value_name = "KIND")]
        kind: String,

        /// Fields as JSON, e.g. '{"nombre":"Acme"}'
        #[arg(long)]
        data: String,
    },

    /// Update a record from a JSON field object
    Update {
        #[arg(value_name = "KIND")]
        kind: String,

        #[arg(long)]
        id: RecordId,

        #[arg(long)]
        data: String,
    },

    /// Delete a record
    Delete {
        #[arg(value_name = "KIND")]
        kind: String,

        #[arg(long)]
        id: RecordId,
    },
}

enum Action {
    List,
    Create(String),
    Update(RecordId, String),
    Delete(RecordId),
}

#[tokio::main]
async fn main() -> Result<()> {
    gearbook_observability::init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env();
    tracing::debug!(base_url = %config.base_url, session_file = %config.session_file.display(), "configured");

    let storage = Arc::new(FileStorage::new(config.session_file.clone()));
    let mut console = AdminConsole::new(&config, storage);

    match cli.command {
        Commands::Login { username, password } => {
            let result = console.login(&Credentials::new(username, password)).await;
            println!("{}", console.login_status().unwrap_or_default());
            let session = result.context("login failed")?;
            println!("privileged: {}", session.is_privileged);
        }
        Commands::Logout => {
            console.logout().context("failed to clear the stored session")?;
            println!("Logged out.");
        }
        Commands::Whoami => whoami(&console)?,
        Commands::List { kind } => dispatch(&mut console, &kind, Action::List).await?,
        Commands::Create { kind, data } => dispatch(&mut console, &kind, Action::Create(data)).await?,
        Commands::Update { kind, id, data } => dispatch(&mut console, &kind, Action::Update(id, data)).await?,
        Commands::Delete { kind, id } => dispatch(&mut console, &kind, Action::Delete(id)).await?,
    }

    Ok(())
}

fn whoami(console: &AdminConsole) -> Result<()> {
    let session = console.session();
    let Some(token) = session.token() else {
        println!("Not logged in.");
        return Ok(());
    };

    let claims = decode_claims(token).context("stored token is malformed")?;
    println!("subject: {}", claims.subject().unwrap_or("-"));
    println!("privileged: {}", session.is_privileged);
    match claims.expires_at() {
        Some(at) => println!("expires: {}", at.to_rfc3339()),
        None => println!("expires: -"),
    }
    Ok(())
}

async fn dispatch(console: &mut AdminConsole, name: &str, action: Action) -> Result<()> {
    let kind = ResourceKind::find(&KINDS, name)?;

    if kind == AccessoryTypes::KIND {
        run(&mut console.accessory_types, action).await
    } else if kind == Brands::KIND {
        run(&mut console.brands, action).await
    } else if kind == Models::KIND {
        run(&mut console.models, action).await
    } else {
        run(&mut console.users, action).await
    }
}

async fn run<R: Resource>(manager: &mut ResourceManager<R>, action: Action) -> Result<()> {
    let outcome = match action {
        Action::List => manager.refresh().await,
        Action::Create(data) => {
            let fields = parse_fields::<R>(&data)?;
            manager.save(&fields).await
        }
        Action::Update(id, data) => {
            let fields = parse_fields::<R>(&data)?;
            manager.begin_edit(id);
            manager.save(&fields).await
        }
        Action::Delete(id) => manager.remove(id).await,
    };

    if let Some(status) = manager.status() {
        println!("{status}");
    }
    if outcome.is_err() {
        bail!("{} operation failed", R::KIND.noun());
    }

    for record in manager.records() {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}

fn parse_fields<R: Resource>(data: &str) -> Result<R::Fields> {
    serde_json::from_str(data).with_context(|| format!("invalid {} fields: {data}", R::KIND.noun()))
}
