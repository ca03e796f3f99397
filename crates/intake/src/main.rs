use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leadline_core::FieldName;
use leadline_delivery::{HttpLeadSubmitter, HttpTokenIssuer, TokenIssuer};
use leadline_intake::config::{IntakeConfig, StorageConfig};
use leadline_intake::export::{export_csv, ExportOutcome};
use leadline_intake::terminal::TerminalSurface;
use leadline_intake::{IntakeContext, LeadIntakeHandler};
use leadline_store::{FileStorage, LeadLog};

const DEFAULT_LOG_FILTER: &str =
    "leadline=info,leadline_intake=info,leadline_store=info,leadline_delivery=info";

#[derive(Debug, Parser)]
#[command(name = "leadline", version, about = "Contact form lead intake")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate, store, verify and relay one lead.
    Submit(LeadArgs),
    /// Export every locally stored lead as CSV.
    Export {
        /// Output file (default: contact_leads.csv in the working directory).
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct LeadArgs {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    reason: Option<String>,
    #[arg(long)]
    personal_relation: Option<String>,
    #[arg(long)]
    business_relation: Option<String>,
}

impl LeadArgs {
    fn into_values(self) -> HashMap<FieldName, String> {
        [
            (FieldName::FirstName, self.first_name),
            (FieldName::LastName, self.last_name),
            (FieldName::Phone, self.phone),
            (FieldName::Email, self.email),
            (FieldName::Reason, self.reason),
            (FieldName::PersonalRelation, self.personal_relation),
            (FieldName::BusinessRelation, self.business_relation),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Submit(args) => submit(args).await,
        Command::Export { out } => export(out),
    }
}

async fn submit(args: LeadArgs) -> anyhow::Result<ExitCode> {
    // --- Configuration ---
    let config = IntakeConfig::from_env()?;
    tracing::info!(
        endpoint = %config.submit_endpoint,
        format = ?config.payload_format,
        storage = %config.storage.dir.display(),
        "Loaded intake configuration"
    );

    // --- Collaborators ---
    let storage = Arc::new(FileStorage::new(&config.storage.dir));
    let leads = LeadLog::new(storage, config.storage.key.clone());

    let submitter = Arc::new(HttpLeadSubmitter::new(
        &config.submit_endpoint,
        config.payload_format,
        config.request_timeout,
    )?);

    let issuer: Option<Arc<dyn TokenIssuer>> = match &config.token_url {
        Some(url) => Some(Arc::new(HttpTokenIssuer::new(url, config.request_timeout)?)),
        None => None,
    };

    let surface = Arc::new(TerminalSurface::new(
        args.into_values(),
        config.contact_details.clone(),
    ));

    let handler = LeadIntakeHandler::attach(
        IntakeContext {
            surface,
            leads,
            issuer,
            submitter,
        },
        config.handler_settings(),
    );

    let record = handler.submit().await;
    Ok(if record.outcome.contact_revealed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn export(out: Option<PathBuf>) -> anyhow::Result<ExitCode> {
    let storage_config = StorageConfig::from_env();
    let leads = LeadLog::new(
        Arc::new(FileStorage::new(&storage_config.dir)),
        storage_config.key,
    );

    let mut surface = TerminalSurface::new(HashMap::new(), "");
    if let Some(path) = out {
        surface = surface.download_to(path);
    }

    Ok(match export_csv(&surface, &leads) {
        ExportOutcome::Exported { .. } => ExitCode::SUCCESS,
        ExportOutcome::Empty | ExportOutcome::DownloadFailed => ExitCode::FAILURE,
    })
}
