//! feestatus main entry point

mod render;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use feestatus_api::{HttpFeeStatusApi, ProofDownloader};
use feestatus_config::{Config, ConfigError};
use feestatus_core::{
    Action, Column, CoreError, FeeStatusModule, KeyInput, Officer, SortState, StatusUpdate, StudentId,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "feestatus")]
#[command(version = "0.1.0")]
#[command(about = "Review student fee payments against the FeeStatus API", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the student roster
    List {
        /// Column to sort by (enrollmentNo, fullName, email, mobile, year, modeOfPayment, amount, feeStatus)
        #[arg(short, long)]
        sort: Option<String>,
        /// Sort descending
        #[arg(long)]
        desc: bool,
    },
    /// Accept a student's payment
    Accept {
        id: String,
    },
    /// Reject a student's payment; prompts for the reason when omitted
    Reject {
        id: String,
        reason: Option<String>,
    },
    /// Download a student's proof of payment
    Download {
        id: String,
        /// Output directory (defaults to download.directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Send the officer signup request
    Signup,
    /// Print the default configuration file
    InitConfig,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Command::InitConfig = args.command {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let (config, missing_config) = match Config::load(&args.config) {
        Ok(config) => (config, false),
        Err(ConfigError::FileNotFound { .. }) => (Config::default(), true),
        Err(e) => {
            eprintln!("{}", e.to_details());
            return Err(e.into());
        }
    };

    env_logger::Builder::new()
        .parse_filters(&config.logging.level)
        .parse_default_env()
        .init();

    if missing_config {
        log::warn!(
            "Config file {} not found, using defaults (api.base_url={})",
            args.config.display(),
            config.api.base_url
        );
    } else {
        log::info!("Config loaded from {}", args.config.display());
    }

    let rt = Runtime::new()?;
    rt.block_on(run(args.command, config))
}

async fn run(command: Command, config: Config) -> anyhow::Result<()> {
    let api = Arc::new(HttpFeeStatusApi::new(&config.api)?);
    let module = FeeStatusModule::new(api.clone(), Officer::from(&config.officer))
        .with_sort(initial_sort(&command, &config)?);

    let result = match command {
        Command::List { .. } => {
            module.activate().await;
            print!("{}", render::roster_table(module.officer(), &module.sorted().await, module.sort_state().await));
            Ok(())
        }
        Command::Accept { id } => {
            let id = activate_and_resolve(&module, &id).await?;
            let record = module
                .set_action(&id, Action::Accept)
                .await
                .ok_or_else(|| anyhow!("Accepting student {} failed, see log for details", id))?;
            println!("{}", render::decision_line(&record));
            Ok(())
        }
        Command::Reject { id, reason } => {
            let id = activate_and_resolve(&module, &id).await?;
            let record = match reason {
                Some(reason) => {
                    StatusUpdate::rejection(&reason).validate()?;
                    module.set_rejection_reason(&id, &reason).await
                }
                None => prompt_reason(&module, &id).await?,
            }
            .ok_or_else(|| anyhow!("Rejecting student {} failed, see log for details", id))?;
            println!("{}", render::decision_line(&record));
            Ok(())
        }
        Command::Download { id, out } => {
            let id = activate_and_resolve(&module, &id).await?;
            let request = module
                .download_request(&id)
                .await
                .ok_or_else(|| anyhow!("Student {} has no proof of payment", id))?;
            let dir = out.unwrap_or_else(|| config.download.directory.clone());
            let path = ProofDownloader::new(&api)
                .download(&request, &dir)
                .await
                .with_context(|| format!("Downloading proof for student {}", id))?;
            println!("Saved {}", path.display());
            Ok(())
        }
        Command::Signup => {
            if module.signup().await {
                println!("Signup sent for {}", module.officer().name);
                Ok(())
            } else {
                Err(anyhow!("Signup failed, see log for details"))
            }
        }
        Command::InitConfig => Ok(()),
    };

    module.teardown();
    result
}

/// Sort state from the command line, falling back to the config
fn initial_sort(command: &Command, config: &Config) -> anyhow::Result<SortState> {
    let mut state = SortState::new(
        config.display.sort_column.parse::<Column>().map_err(|e| anyhow!(e))?,
        config.display.sort_direction,
    );
    if let Command::List { sort, desc } = command {
        if let Some(key) = sort {
            state.column = key.parse::<Column>().map_err(|e| anyhow!(e))?;
        }
        if *desc {
            state.direction = feestatus_core::SortDirection::Desc;
        }
    }
    Ok(state)
}

async fn activate_and_resolve(module: &FeeStatusModule, key: &str) -> anyhow::Result<StudentId> {
    if !module.activate().await {
        bail!("Could not load the student roster, see log for details");
    }
    let id = module
        .resolve_id(key)
        .await
        .ok_or_else(|| CoreError::StudentNotFound { id: key.to_string() })?;
    Ok(id)
}

/// Read a reason from stdin through the reason field; only the final
/// Enter submits it
async fn prompt_reason(module: &FeeStatusModule, id: &StudentId) -> anyhow::Result<Option<feestatus_core::Student>> {
    if let Some(existing) = module.student(id).await.as_ref().and_then(|s| s.rejection_reason().map(str::to_string)) {
        println!("Current reason: {}", existing);
    }
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"Reason for rejection: ").await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;

    for c in line.trim_end_matches(['\r', '\n']).chars() {
        module.reason_key(id, KeyInput::Char(c)).await;
    }
    StatusUpdate::rejection(&module.reason_draft(id).await).validate()?;
    Ok(module.reason_key(id, KeyInput::Enter).await)
}
