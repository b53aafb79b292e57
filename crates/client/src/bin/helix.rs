//! Operator console for the Helix request service.
//!
//! Reads the bearer token from `HELIX_AUTH_TOKEN` and the API base URL from
//! `HELIX_API_URL`. Intended for admins poking at an environment without the
//! web frontend.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use helix_client::{
    ActivityScope, ApiGateway, Config, LifecycleController, ListScope, NewRequest, Priority,
    RequestService, StaticTokenProvider, Status,
};

#[derive(Parser)]
#[command(name = "helix", about = "Operator console for the Helix request service", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the authenticated profile.
    Whoami,
    /// List requests.
    List {
        /// List every request instead of only your own (admin).
        #[arg(long)]
        all: bool,
    },
    /// Submit a new request.
    Create {
        title: String,
        description: String,
        /// LOW, MEDIUM, HIGH, or URGENT (defaults to MEDIUM server-side).
        #[arg(long)]
        priority: Option<String>,
    },
    /// Move a request to a new workflow status (admin).
    Status { id: i64, target: String },
    /// Change a request's priority (admin).
    Priority { id: i64, target: String },
    /// Assign a request to an admin user id, or unassign when --to is omitted (admin).
    Assign {
        id: i64,
        #[arg(long)]
        to: Option<i64>,
    },
    /// Delete a request (admin).
    Delete { id: i64 },
    /// Print the activity log for a request.
    Activities {
        id: i64,
        /// Use the admin endpoint.
        #[arg(long)]
        admin: bool,
    },
    /// Watch the request list, re-fetching on an interval (admin).
    Watch {
        /// Seconds between fetches.
        #[arg(long, default_value_t = 10)]
        every: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let token = std::env::var("HELIX_AUTH_TOKEN").context("HELIX_AUTH_TOKEN is not set")?;
    let tokens = Arc::new(StaticTokenProvider::new(token));
    let config = Config::default();
    let gateway = ApiGateway::new(&config, tokens)?;
    let service = RequestService::new(gateway);

    match cli.command {
        Command::Whoami => {
            let profile = service.me().await?;
            println!("{} ({}, uid {})", profile.email, profile.role, profile.uid);
        }
        Command::List { all } => {
            let requests = if all {
                service.list_all().await?
            } else {
                service.list_mine().await?
            };
            for request in requests {
                println!(
                    "#{:<5} {:<12} {:<8} {}",
                    request.id, request.status, request.priority, request.title
                );
            }
        }
        Command::Create {
            title,
            description,
            priority,
        } => {
            let mut input = NewRequest::new(title, description);
            if let Some(priority) = priority {
                input = input.with_priority(Priority::from(priority));
            }
            let request = service.create(&input).await?;
            println!("created #{} ({})", request.id, request.status);
        }
        Command::Status { id, target } => {
            let controller = LifecycleController::new(service);
            controller.refresh(ListScope::All).await?;
            let request = controller.change_status(id, Status::from(target)).await?;
            println!("#{} is now {}", request.id, request.status);
        }
        Command::Priority { id, target } => {
            let controller = LifecycleController::new(service);
            controller.refresh(ListScope::All).await?;
            let request = controller
                .change_priority(id, Priority::from(target))
                .await?;
            println!("#{} is now {}", request.id, request.priority);
        }
        Command::Assign { id, to } => {
            let request = service.assign(id, to).await?;
            match request.assigned_to_email {
                Some(email) => println!("#{} assigned to {email}", request.id),
                None => println!("#{} unassigned", request.id),
            }
        }
        Command::Delete { id } => {
            service.delete(id).await?;
            println!("#{id} deleted");
        }
        Command::Activities { id, admin } => {
            let scope = if admin {
                ActivityScope::Admin
            } else {
                ActivityScope::Own
            };
            for activity in service.activities(id, scope).await? {
                println!(
                    "{}  {:<14} {:<24} {}",
                    activity.timestamp.format("%Y-%m-%d %H:%M"),
                    activity.action,
                    activity.performed_by_email.as_deref().unwrap_or("-"),
                    activity.detail
                );
            }
        }
        Command::Watch { every } => {
            let controller = LifecycleController::new(service);
            controller.refresh(ListScope::All).await?;
            let store = controller.store();
            let poller = controller.spawn_poller(ListScope::All, Duration::from_secs(every));
            loop {
                tokio::time::sleep(Duration::from_secs(every)).await;
                let requests = store.snapshot().await;
                println!("── {} requests ──", requests.len());
                for request in requests {
                    println!(
                        "#{:<5} {:<12} {:<8} {}",
                        request.id, request.status, request.priority, request.title
                    );
                }
                if poller.is_finished() {
                    break;
                }
            }
        }
    }

    Ok(())
}
