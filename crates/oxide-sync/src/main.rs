//! oxide-sync CLI
//!
//! Compares a DDL file with a live MySQL database and generates, or
//! applies, an additive sync script.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use oxide_ddl::RenderOptions;
use oxide_sync::config::CHARSET;
use oxide_sync::prelude::*;

/// Additive MySQL schema sync from CREATE TABLE files.
#[derive(Parser)]
#[command(name = "oxide-sync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file.
    #[arg(short, long, env = "OXIDE_SYNC_CONFIG", default_value = CONFIG_FILE)]
    config: PathBuf,

    /// DDL file holding the desired schema.
    #[arg(short, long)]
    sql_file: Option<PathBuf>,

    /// MySQL host.
    #[arg(long, env = "MYSQL_HOST")]
    host: Option<String>,

    /// MySQL port.
    #[arg(short = 'P', long, env = "MYSQL_TCP_PORT")]
    port: Option<u16>,

    /// MySQL user.
    #[arg(short, long, env = "MYSQL_USER")]
    user: Option<String>,

    /// MySQL password.
    #[arg(short, long, env = "MYSQL_PWD", hide_env_values = true)]
    password: Option<String>,

    /// Target database.
    #[arg(short, long, env = "MYSQL_DATABASE")]
    database: Option<String>,

    /// Do not write the merged settings back to the configuration file.
    #[arg(long)]
    no_save: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the DDL file with the database and print the sync script.
    Compare {
        /// Write the script to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare, then execute the sync script after confirmation.
    Apply {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the effective configuration.
    ShowConfig,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            sql_file: self.sql_file.clone(),
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging; stdout is reserved for the script
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Err(e) = run(cli).await {
        error!(stage = e.stage(), "{e}");
        return Err(e.into());
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = SyncConfig::load(&cli.config).await.merge(cli.overrides());

    if matches!(cli.command, Commands::ShowConfig) {
        println!("{}", serde_json::to_string_pretty(&config.masked())?);
        return Ok(());
    }

    config.validate()?;
    if !cli.no_save {
        if let Err(e) = config.save(&cli.config).await {
            warn!(path = %cli.config.display(), error = %e, "Failed to save config");
        }
    }

    let inspector = MySqlInspector::connect(&config).await?;
    let options = RenderOptions {
        charset: CHARSET.to_string(),
        generated_at: Some(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
    };
    let comparison = compare_with_database(&config.sql_file(), &inspector, &options).await?;

    if comparison.is_up_to_date() {
        info!("Schemas already match, nothing to do.");
        return Ok(());
    }

    match cli.command {
        Commands::Compare { output } => {
            if let Some(path) = output {
                tokio::fs::write(&path, comparison.script.sql()).await?;
                info!("Sync script written to {}", path.display());
            } else {
                print!("{}", comparison.script.sql());
            }
        }

        Commands::Apply { yes } => {
            print!("{}", comparison.script.sql());
            io::stdout().flush()?;

            let approved = yes || prompt_confirmation(io::stdin().lock(), io::stderr())?;
            let script = comparison.script.confirm_if(approved)?;

            let executor = ScriptExecutor::new(inspector.pool().clone());
            let report = executor.execute(&script).await?;
            info!(
                "Applied {} statement(s), {} row(s) affected.",
                report.statements, report.rows_affected
            );
        }

        Commands::ShowConfig => {}
    }

    Ok(())
}
