use anyhow::Result;
use clap::Parser;

use folio::cli::commands::{ConfigCommand, ContactCommand, InitCommand, InquireCommand, ResumeCommand};
use folio::cli::{Cli, Commands};
use folio::{init_telemetry, FolioConfig, SubmissionStatus};

/// Load layered configuration and start logging.
fn configure(verbose: bool) -> Result<FolioConfig> {
    let config = FolioConfig::load()?;

    let mut observability = config.observability.clone();
    if verbose {
        observability.log_level = "debug".to_string();
    }
    init_telemetry(&observability)?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = FolioConfig::load_env_file() {
        eprintln!("⚠️  Ignoring unreadable .env file: {e}");
    }

    match cli.command {
        // init must work even when the existing files are broken
        Commands::Init { force } => {
            InitCommand::new(force).execute()?;
        }
        Commands::Inquire { name, email, message } => {
            let config = configure(cli.verbose)?;
            let status = tokio::runtime::Runtime::new()?
                .block_on(InquireCommand::new(name, email, message).execute(&config))?;
            if status != SubmissionStatus::Success {
                std::process::exit(1);
            }
        }
        Commands::Resume {
            name,
            email,
            print_only,
        } => {
            let config = configure(cli.verbose)?;
            let released = tokio::runtime::Runtime::new()?.block_on(
                ResumeCommand::new(name, email)
                    .with_print_only(print_only)
                    .execute(&config),
            )?;
            if !released {
                std::process::exit(1);
            }
        }
        Commands::Contact => ContactCommand.execute(&configure(cli.verbose)?),
        Commands::Config => ConfigCommand.execute(&configure(cli.verbose)?)?,
    }

    Ok(())
}
