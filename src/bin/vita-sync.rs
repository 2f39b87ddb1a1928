// ABOUTME: Vita Sync CLI - drives sync runs and account flows from the command line
// ABOUTME: Login/logout, registration, password reset, full sync runs, and trends display
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health
//!
//! Usage:
//! ```bash
//! # Sign in and cache the session
//! vita-sync login --email user@example.com --password secret
//!
//! # Run one full sync (synthetic device source)
//! vita-sync sync --seed 42
//!
//! # Show recent daily aggregates
//! vita-sync trends --days 7
//!
//! # Sign out
//! vita-sync logout
//! ```

use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use vita_core::{ApiError, RegisterRequest};
use vita_sync::config::ClientConfig;
use vita_sync::logging::LoggingConfig;
use vita_sync::session::SessionStore;
use vita_sync::snapshot::SyntheticSnapshotProvider;
use vita_sync::sync::{SyncConfig, SyncOrchestrator};
use vita_sync::transport::{ApiClient, HealthApi};

#[derive(Parser)]
#[command(
    name = "vita-sync",
    about = "Vita health-data synchronization client",
    long_about = "Command-line client for the Vita health-tracking backend: account flows, full sync runs, and trend display."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Sign in and cache the session credential
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long)]
        password: String,
    },

    /// Drop the cached session credential
    Logout,

    /// Create a new account
    Register {
        /// Given name
        #[arg(long)]
        name: String,

        /// Family name
        #[arg(long)]
        surname: String,

        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long)]
        password: String,
    },

    /// Request a password-reset email
    ForgotPassword {
        /// Account email
        #[arg(long)]
        email: String,
    },

    /// Complete a password reset with the emailed token
    ResetPassword {
        /// Reset token from the email link
        #[arg(long)]
        token: String,

        /// Replacement password
        #[arg(long)]
        new_password: String,
    },

    /// Run one full sync: capture, upload, backfill, aggregate, display
    Sync {
        /// Manual heart-rate override (bpm) when the device has no samples
        #[arg(long)]
        manual_heart_rate: Option<u32>,

        /// Override the trailing backfill window in days
        #[arg(long)]
        days: Option<u32>,

        /// Seed for the synthetic device source
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Show recent daily aggregates
    Trends {
        /// Number of trailing days to fetch
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    LoggingConfig::from_env().init()?;
    let cli = Cli::parse();

    let config = ClientConfig::from_env()?;
    let session = Arc::new(SessionStore::open(config.session_file.clone())?);
    let api = Arc::new(ApiClient::new(&config, Arc::clone(&session))?);

    match cli.command {
        Command::Login { email, password } => {
            let response = api.login(&email, &password).await.map_err(user_facing)?;
            session.save_session(&response.token, response.user_id)?;
            println!("Signed in as {}", response.email.unwrap_or(email));
        }
        Command::Logout => {
            session.clear()?;
            println!("Signed out.");
        }
        Command::Register {
            name,
            surname,
            email,
            password,
        } => {
            let request = RegisterRequest {
                name,
                surname,
                email,
                password,
            };
            api.register(&request).await.map_err(user_facing)?;
            println!("Account created. You can sign in now.");
        }
        Command::ForgotPassword { email } => {
            api.request_password_reset(&email)
                .await
                .map_err(user_facing)?;
            println!("Reset email sent if the account exists.");
        }
        Command::ResetPassword { token, new_password } => {
            api.reset_password(&token, &new_password)
                .await
                .map_err(user_facing)?;
            println!("Password updated.");
        }
        Command::Sync {
            manual_heart_rate,
            days,
            seed,
        } => run_sync(&config, api, session, manual_heart_rate, days, seed).await?,
        Command::Trends { days } => {
            let user_id = session
                .user_id()
                .ok_or_else(|| anyhow!("not signed in; run `vita-sync login` first"))?;
            let trends = api.fetch_trends(user_id, days).await.map_err(user_facing)?;
            if trends.is_empty() {
                println!("No aggregates yet.");
            }
            for summary in trends {
                let day = summary
                    .day()
                    .map_or_else(|| "????-??-??".to_owned(), |d| d.to_string());
                println!(
                    "{day}  steps {:>6}  kcal {:>7.1}  hr {:>5.1}  sleep {:>4.1}h",
                    summary.steps_total.unwrap_or(0),
                    summary.calories_total.unwrap_or(0.0),
                    summary.hr_mean.unwrap_or(0.0),
                    summary.sleep_hours_total.unwrap_or(0.0),
                );
            }
        }
    }

    Ok(())
}

/// Run the full orchestrated sync and print what happened.
async fn run_sync(
    config: &ClientConfig,
    api: Arc<ApiClient>,
    session: Arc<SessionStore>,
    manual_heart_rate: Option<u32>,
    days: Option<u32>,
    seed: u64,
) -> Result<()> {
    let mut sync_config = config.sync_config();
    if let Some(days) = days {
        sync_config.backfill_days = days;
    }

    let provider = Arc::new(SyntheticSnapshotProvider::new(seed));
    let orchestrator = SyncOrchestrator::new(api, session, provider, sync_config);
    let display = orchestrator.subscribe_display();

    info!("starting sync run");
    let report = orchestrator.run(manual_heart_rate).await;

    if report.session_expired {
        return Err(anyhow!(
            "session expired during sync; run `vita-sync login` again"
        ));
    }

    println!(
        "Sync finished: today uploaded: {}, profile synced: {}, display refreshed: {}",
        report.today_uploaded, report.profile_synced, report.display_refreshed
    );
    if let Some(backfill) = &report.backfill {
        println!(
            "Backfill: {} uploaded, {} inactive, {} without data (of {} days)",
            backfill.uploaded,
            backfill.skipped_inactive,
            backfill.skipped_no_data,
            backfill.days_considered
        );
    }
    if let Some(week_end) = report.weekly_summary_for {
        println!("Weekly summary generated for week ending {week_end}");
    }

    let state = display.borrow();
    if let Some(headline) = &state.headline {
        let prefix = if headline.is_weekly_summary() {
            "WEEKLY REPORT: "
        } else {
            ""
        };
        println!("{prefix}{}", headline.recommendation_text);
    } else {
        println!("No recommendations yet. Tracking your health...");
    }

    Ok(())
}

/// Convert an API error into the message shown for explicit user actions.
fn user_facing(err: ApiError) -> anyhow::Error {
    anyhow!(err.user_message())
}
