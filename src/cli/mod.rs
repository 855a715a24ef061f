use clap::{Parser, Subcommand};

pub mod commands;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Portfolio contact and gated resume download")]
#[command(long_about = "folio delivers portfolio inquiries to the site owner through a \
                       transactional email service and releases the resume after a visitor \
                       leaves their name and email. Configure it with folio.toml, FOLIO_* \
                       variables, or the site's VITE_* variables.")]
pub struct Cli {
    /// Log at debug level regardless of configuration
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send an inquiry to the site owner
    Inquire {
        /// Your name
        #[arg(long)]
        name: String,
        /// Address the owner can reply to
        #[arg(long)]
        email: String,
        /// What you would like to discuss
        #[arg(long)]
        message: String,
    },
    /// Leave your details and open the resume
    Resume {
        /// Your name
        #[arg(long)]
        name: String,
        /// Your email address
        #[arg(long)]
        email: String,
        /// Print the resume link instead of launching a browser
        #[arg(long, help = "Print the resume URL instead of opening it")]
        print_only: bool,
    },
    /// Show contact details and certificate links
    Contact,
    /// Print the resolved configuration with secrets masked
    Config,
    /// Write a starter folio.toml in the current directory
    Init {
        /// Overwrite an existing folio.toml
        #[arg(long, help = "Overwrite an existing folio.toml")]
        force: bool,
    },
}
