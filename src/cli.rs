use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tokio::sync::watch;

use crate::{
    apps::ListAppInfosForAppQuery,
    client::{AppStoreConnectClient, Config},
    reporting::GetPerfPowerMetricsQuery,
    upload::UploadOperations,
    users::ListInvitationsQuery,
    util::{pretty_state, resource_id, resource_name},
};

#[derive(Parser, Debug)]
#[command(name = "asconnect", version, about = "App Store Connect CLI in Rust", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a short-lived App Store Connect bearer token
    Token,
    /// List App Store infos for an app
    AppInfos {
        /// App ID
        #[arg(short, long)]
        app: String,
    },
    /// List App Store versions for an app
    Versions {
        /// App ID
        #[arg(short, long)]
        app: String,
    },
    /// Show raw App Store version JSON
    VersionInfo {
        /// App Store Version ID
        #[arg(short = 'i', long = "id")]
        version_id: String,
    },
    /// List pending team invitations
    Invitations,
    /// Cancel a pending team invitation
    InvitationCancel {
        /// User Invitation ID
        #[arg(short = 'i', long = "id")]
        invitation_id: String,
    },
    /// List power and performance metrics for an app
    Metrics {
        /// App ID
        #[arg(short, long)]
        app: String,
    },
    /// Upload a file in server-specified chunks
    Upload {
        /// Path to the file to upload
        #[arg(short, long)]
        file: PathBuf,
        /// Path to a JSON array of uploadOperations from a reservation response
        #[arg(short, long)]
        operations: PathBuf,
    },
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let cfg = Config::from_env()?;
    let client = AppStoreConnectClient::new(cfg, cli.verbose)?;

    match cli.command {
        Commands::Token => print_token_cmd(&client).await?,
        Commands::AppInfos { app } => list_app_infos_cmd(&client, &app).await?,
        Commands::Versions { app } => list_versions_cmd(&client, &app).await?,
        Commands::VersionInfo { version_id } => version_info_cmd(&client, &version_id).await?,
        Commands::Invitations => list_invitations_cmd(&client).await?,
        Commands::InvitationCancel { invitation_id } => {
            cancel_invitation_cmd(&client, &invitation_id).await?
        }
        Commands::Metrics { app } => list_metrics_cmd(&client, &app).await?,
        Commands::Upload { file, operations } => upload_cmd(&client, &file, &operations).await?,
    }

    Ok(())
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    pb.set_message(msg.to_string());
    pb
}

async fn print_token_cmd(client: &AppStoreConnectClient) -> Result<()> {
    let token = client.bearer().await?;
    println!("{}", token);
    Ok(())
}

async fn list_app_infos_cmd(client: &AppStoreConnectClient, app_id: &str) -> Result<()> {
    let pb = spinner("Loading app infos...");
    let infos = client
        .list_app_infos_for_app(app_id, &ListAppInfosForAppQuery::default())
        .await?;
    pb.finish_and_clear();

    if infos.data.is_empty() {
        println!("No app infos found");
        return Ok(());
    }

    for info in infos.data {
        let state = info
            .attributes
            .as_ref()
            .and_then(|a| a.app_store_state)
            .map(|s| format!("{:?}", s))
            .unwrap_or_else(|| "UNKNOWN".into());
        println!("{}\t{}", info.id, state);
    }
    Ok(())
}

async fn list_versions_cmd(client: &AppStoreConnectClient, app_id: &str) -> Result<()> {
    let pb = spinner("Loading versions...");
    let versions = client
        .list_all(&format!("v1/apps/{}/appStoreVersions?limit=200", app_id))
        .await?;
    pb.finish_and_clear();

    if versions.is_empty() {
        println!("No versions found");
        return Ok(());
    }

    for v in versions {
        println!(
            "{}\t{}\t{}",
            resource_id(&v),
            resource_name(&v),
            pretty_state(&v)
        );
    }
    Ok(())
}

async fn version_info_cmd(client: &AppStoreConnectClient, version_id: &str) -> Result<()> {
    let pb = spinner("Loading version info...");
    let v = client
        .get(&format!("v1/appStoreVersions/{}", version_id))
        .await?;
    pb.finish_and_clear();
    println!("{}", serde_json::to_string_pretty(&v)?);
    Ok(())
}

async fn list_invitations_cmd(client: &AppStoreConnectClient) -> Result<()> {
    let pb = spinner("Loading invitations...");
    let invitations = client
        .list_invitations(&ListInvitationsQuery::default())
        .await?;
    pb.finish_and_clear();

    if invitations.data.is_empty() {
        println!("No pending invitations");
        return Ok(());
    }

    for invitation in invitations.data {
        let attrs = invitation.attributes.unwrap_or_default();
        let roles = attrs
            .roles
            .map(|r| {
                r.iter()
                    .map(|role| format!("{:?}", role))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .unwrap_or_default();
        println!(
            "{}\t{}\t{}",
            invitation.id,
            attrs.email.as_deref().unwrap_or("<unknown>"),
            roles,
        );
    }
    Ok(())
}

async fn cancel_invitation_cmd(client: &AppStoreConnectClient, invitation_id: &str) -> Result<()> {
    let pb = spinner("Cancelling invitation...");
    let res = client.cancel_invitation(invitation_id).await;
    pb.finish_and_clear();
    match res {
        Ok(()) => println!("Invitation {} cancelled", invitation_id),
        Err(e) => eprintln!("Failed to cancel invitation: {}", e),
    }
    Ok(())
}

async fn list_metrics_cmd(client: &AppStoreConnectClient, app_id: &str) -> Result<()> {
    let pb = spinner("Loading metrics...");
    let metrics = client
        .get_perf_power_metrics_for_app(app_id, &GetPerfPowerMetricsQuery::default())
        .await?;
    pb.finish_and_clear();

    if metrics.data.is_empty() {
        println!("No metrics found");
        return Ok(());
    }

    for metric in metrics.data {
        let attrs = metric.attributes.unwrap_or_default();
        println!(
            "{}\t{}\t{}\t{}",
            metric.id,
            attrs.metric_type.as_deref().unwrap_or("<unknown>"),
            attrs.device_type.as_deref().unwrap_or("<unknown>"),
            attrs.platform.as_deref().unwrap_or("<unknown>"),
        );
    }
    Ok(())
}

async fn upload_cmd(
    client: &AppStoreConnectClient,
    file_path: &PathBuf,
    operations_path: &PathBuf,
) -> Result<()> {
    let operations_file = std::fs::File::open(operations_path)
        .with_context(|| format!("Failed to open {}", operations_path.display()))?;
    let operations: UploadOperations = serde_json::from_reader(operations_file)
        .context("Failed to parse upload operations JSON")?;
    let mut file = std::fs::File::open(file_path)
        .with_context(|| format!("Failed to open {}", file_path.display()))?;

    // Ctrl-C aborts the in-flight chunk requests.
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = cancel_tx.send(true);
        }
    });

    let pb = spinner(&format!("Uploading {} chunks...", operations.len()));
    let res = client.upload(&operations, &mut file, cancel_rx).await;
    pb.finish_and_clear();

    match res {
        Ok(()) => {
            println!("Upload complete: {} chunks", operations.len());
            Ok(())
        }
        Err(e) => Err(anyhow!(
            "chunk at offset {} failed: {}",
            e.operation
                .offset
                .map(|o| o.to_string())
                .unwrap_or_else(|| "<unset>".into()),
            e
        )),
    }
}
