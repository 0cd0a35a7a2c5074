pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "portal-api")]
#[command(about = "Client portal API server and operator tools")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Apply the embedded schema to DATABASE_URL")]
    Migrate,

    #[command(about = "Mint a session token signed with SESSION_JWT_SECRET")]
    Token {
        #[arg(help = "External identity id to put in `sub`")]
        user_id: String,
        #[arg(long, help = "Email claim")]
        email: Option<String>,
        #[arg(long, default_value_t = 24, help = "Lifetime in hours")]
        hours: i64,
    },

    #[command(about = "Grant or revoke admin status for a profile")]
    Admin {
        #[arg(help = "External identity id of the profile")]
        user_id: String,
        #[arg(long, help = "Revoke instead of grant")]
        revoke: bool,
    },

    #[command(about = "Show how the middleware classifies a path")]
    Route {
        #[arg(help = "Request path, e.g. /projects/123")]
        path: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => commands::serve::handle().await,
        Commands::Migrate => commands::database::migrate().await,
        Commands::Token { user_id, email, hours } => commands::token::handle(user_id, email, hours, output_format),
        Commands::Admin { user_id, revoke } => commands::database::set_admin(&user_id, !revoke, output_format).await,
        Commands::Route { path } => {
            commands::route::handle(&path, output_format);
            Ok(())
        }
    }
}
