use anyhow::Context;
use clap::Parser;
use np_core::{ArticleStore, Config, NewArticle};
use np_storage::StoreKind;
use np_web::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "News publishing server and article admin tool", long_about = None)]
pub struct Cli {
    /// JSON settings file, e.g. {"adminCredentials": {"username": "...", "password": "..."}}
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Path of the article document
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    #[arg(long, global = true, default_value = "json", help = "Storage backend: json (default) or memory")]
    storage: StoreKind,
    #[arg(long, global = true, env = "NP_ADMIN_USERNAME")]
    admin_username: Option<String>,
    #[arg(long, global = true, env = "NP_ADMIN_PASSWORD", hide_env_values = true)]
    admin_password: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to bind, e.g. 127.0.0.1:3000
        #[arg(long)]
        addr: Option<String>,
    },
    /// Manage articles directly in the store
    Articles {
        #[command(subcommand)]
        command: ArticleCommands,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ArticleCommands {
    List,
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        image_url: Option<String>,
    },
    Delete {
        id: String,
    },
}

async fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load(path).await?,
        None => Config::default(),
    };
    let mut config = config.with_credentials(cli.admin_username.clone(), cli.admin_password.clone());
    if let Some(data) = &cli.data {
        config.data_path = data.clone();
    }
    Ok(config)
}

async fn check_store(store: &Arc<dyn ArticleStore>, kind: StoreKind) -> anyhow::Result<()> {
    let articles = store
        .list()
        .await
        .with_context(|| format!("Article store ({}) is not readable", kind))?;
    info!("💾 Store holds {} articles", articles.len());
    Ok(())
}

async fn run_articles(store: Arc<dyn ArticleStore>, command: ArticleCommands) -> anyhow::Result<()> {
    match command {
        ArticleCommands::List => {
            for article in store.list().await? {
                println!("{}  {}  {}", article.id, article.date, article.title);
            }
        }
        ArticleCommands::Add { title, description, content, image_url } => {
            let article = store
                .create(NewArticle { title, description, content, image_url })
                .await?;
            println!("{}", serde_json::to_string_pretty(&article)?);
        }
        ArticleCommands::Delete { id } => {
            store.delete(&id).await?;
            info!("Deleted {} (if it existed)", id);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();
    let mut config = resolve_config(&cli).await?;

    let store = np_storage::create_store(cli.storage, &config.data_path).await?;
    check_store(&store, cli.storage).await?;

    match cli.command {
        Commands::Serve { addr } => {
            if let Some(addr) = addr {
                config.bind_addr = addr;
            }
            let credentials = config.credentials()?.clone();
            let listener = tokio::net::TcpListener::bind(&config.bind_addr)
                .await
                .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
            np_web::serve(listener, AppState::new(store, credentials)).await?;
        }
        Commands::Articles { command } => run_articles(store, command).await?,
    }

    Ok(())
}
