use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cipherstudio::auth::TokenVerifier;
use cipherstudio::cli::{
    LocalCommands, ProjectCommands, TokenCommands, http_client::ApiClient, run_local_delete,
    run_local_list, run_local_show, run_project_delete, run_project_list, run_project_pull,
    run_project_push, run_project_show, run_token_issue,
};
use cipherstudio::config::ServerConfig;
use cipherstudio::server::{AppState, create_router};
use cipherstudio::store::{SqliteStore, Store};

const DEFAULT_STORAGE: &str = "./data/local_storage.json";

#[derive(Parser)]
#[command(name = "cipherstudio")]
#[command(about = "A code playground backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Serve {
        /// TOML config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long, short)]
        port: Option<u16>,

        /// Data directory for the database
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Secret for verifying bearer credentials
        #[arg(long)]
        jwt_secret: Option<String>,
    },

    /// Issue credentials
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },

    /// Work with projects on a server
    Project {
        /// Server base URL
        #[arg(
            long,
            global = true,
            env = "CIPHERSTUDIO_SERVER",
            default_value = "http://127.0.0.1:5000"
        )]
        server: String,

        /// Bearer credential
        #[arg(long, global = true, env = "CIPHERSTUDIO_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Local mirror file used by push and pull
        #[arg(long, global = true, default_value = DEFAULT_STORAGE)]
        storage: String,

        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Work with the local project mirror
    Local {
        /// Local mirror file
        #[arg(long, global = true, default_value = DEFAULT_STORAGE)]
        storage: String,

        #[command(subcommand)]
        command: LocalCommands,
    },
}

async fn run_serve(
    config: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    data_dir: Option<PathBuf>,
    jwt_secret: Option<String>,
) -> anyhow::Result<()> {
    let mut config = match config {
        Some(path) => ServerConfig::load(&path)?,
        None => ServerConfig::default(),
    }
    .with_env();

    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(data_dir) = data_dir {
        config.data_dir = data_dir;
    }
    if jwt_secret.is_some() {
        config.jwt_secret = jwt_secret;
    }

    fs::create_dir_all(&config.data_dir)?;

    let store = Arc::new(SqliteStore::new(config.db_path())?);
    store.initialize()?;
    info!("Database at {}", config.db_path().display());

    let verifier = TokenVerifier::new(config.secret().as_bytes());
    let state = Arc::new(
        AppState::new(store.clone(), verifier).with_max_body_bytes(config.max_body_bytes),
    );

    let app = create_router(state);
    let addr = config.socket_addr()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close()?;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("cipherstudio=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            data_dir,
            jwt_secret,
        } => run_serve(config, host, port, data_dir, jwt_secret).await?,
        Commands::Token { command } => match command {
            TokenCommands::Issue {
                user_id,
                expires_in,
                jwt_secret,
                config,
            } => run_token_issue(&user_id, expires_in, jwt_secret, config.as_deref())?,
        },
        Commands::Project {
            server,
            token,
            storage,
            command,
        } => {
            // The blocking client must not run on a runtime worker.
            tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
                let client = ApiClient::new(&server, token)?;
                match command {
                    ProjectCommands::List { mine, json } => run_project_list(&client, mine, json),
                    ProjectCommands::Show { id, json } => run_project_show(&client, &id, json),
                    ProjectCommands::Push {
                        local_id,
                        public,
                        to,
                    } => run_project_push(&client, &storage, &local_id, public, to.as_deref()),
                    ProjectCommands::Pull { id } => run_project_pull(&client, &storage, &id),
                    ProjectCommands::Delete {
                        id,
                        non_interactive,
                        yes,
                    } => run_project_delete(&client, &id, non_interactive, yes),
                }
            })
            .await??;
        }
        Commands::Local { storage, command } => match command {
            LocalCommands::List { json } => run_local_list(&storage, json)?,
            LocalCommands::Show { id } => run_local_show(&storage, &id)?,
            LocalCommands::Delete {
                id,
                non_interactive,
                yes,
            } => run_local_delete(&storage, &id, non_interactive, yes)?,
        },
    }

    Ok(())
}
