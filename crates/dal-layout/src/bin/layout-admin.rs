use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use dal_config::prelude::{LogSettings, Loader, StoreBackend, StoreSettings};
use dal_layout::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "layout-admin",
    about = "Inspect and maintain tenant-scoped layouts in a SurrealDB store",
    long_about = "Inspect and maintain tenant-scoped layouts in a SurrealDB store.\n\n\
                  Select the store with --set store.backend=surreal (or DAL__STORE__BACKEND=surreal); \
                  the in-memory backend holds no data between runs and is rejected.",
    version
)]
struct Cli {
    /// JSON config file; repeat to layer several
    #[arg(long = "config", global = true)]
    config: Vec<PathBuf>,

    /// Override a config key, e.g. --set store.backend=surreal
    #[arg(long = "set", value_name = "KEY=VALUE", global = true)]
    overrides: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct Target {
    /// Layout id
    id: String,

    #[arg(long)]
    environment: String,

    #[arg(long)]
    organization: String,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List layouts of an environment and/or organization
    List {
        #[arg(long)]
        environment: Option<String>,

        #[arg(long)]
        organization: Option<String>,

        #[arg(long)]
        channel: Option<ChannelType>,

        #[arg(long)]
        name: Option<String>,

        /// Include soft-deleted layouts
        #[arg(long)]
        include_deleted: bool,

        #[arg(long, default_value_t = 20)]
        limit: u64,

        #[arg(long, default_value_t = 0)]
        skip: u64,
    },
    /// Print one layout
    Show {
        #[command(flatten)]
        target: Target,

        #[arg(long)]
        include_deleted: bool,
    },
    /// Soft delete a layout
    Delete {
        #[command(flatten)]
        target: Target,
    },
    /// Flag a layout as the default
    SetDefault {
        #[command(flatten)]
        target: Target,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let args = cli
        .overrides
        .iter()
        .map(|kv| format!("--{kv}"))
        .collect();

    let snapshot = Loader::layered(cli.config, args)?
        .load_once()
        .await
        .context("loading configuration")?;
    init_tracing(&LogSettings::from_snapshot(&snapshot)?);

    let settings = StoreSettings::from_snapshot(&snapshot)?;
    require_persistent(&settings)?;
    let store = open_store(&settings).await?;
    let layouts = store.layouts;

    match cli.command {
        Command::List {
            environment,
            organization,
            channel,
            name,
            include_deleted,
            limit,
            skip,
        } => {
            let scope = match (environment, organization) {
                (Some(env), Some(org)) => TenantScope::both(env, org),
                (Some(env), None) => TenantScope::environment(env),
                (None, Some(org)) => TenantScope::organization(org),
                (None, None) => bail!("--environment or --organization is required"),
            };
            let mut query = LayoutQuery::new(scope).deleted(deleted_mode(include_deleted));
            if let Some(channel) = channel {
                query = query.on_channel(channel);
            }
            if let Some(name) = name {
                query = query.named(name);
            }
            let found = layouts
                .filter_layouts(&query, Pagination::new(limit, skip))
                .await?;
            println!("{}", serde_json::to_string_pretty(&found)?);
        }
        Command::Show {
            target,
            include_deleted,
        } => {
            let (id, env, org) = target.ids();
            match layouts
                .find_layout(&id, &env, &org, deleted_mode(include_deleted))
                .await?
            {
                Some(layout) => println!("{}", serde_json::to_string_pretty(&layout)?),
                None => bail!("layout {id} not found in environment {env}"),
            }
        }
        Command::Delete { target } => {
            let (id, env, org) = target.ids();
            layouts.delete_layout(&id, &env, &org).await?;
            println!("deleted {id}");
        }
        Command::SetDefault { target } => {
            let (id, env, org) = target.ids();
            layouts.set_layout_as_default(&id, &env, &org).await?;
            println!("default set on {id}");
        }
    }
    Ok(())
}

impl Target {
    fn ids(self) -> (LayoutId, EnvironmentId, OrganizationId) {
        (
            LayoutId::from(self.id),
            EnvironmentId::from(self.environment),
            OrganizationId::from(self.organization),
        )
    }
}

/// Every invocation opens a fresh store, so only a persistent backend is useful.
fn require_persistent(settings: &StoreSettings) -> Result<()> {
    if settings.backend == StoreBackend::Memory {
        bail!(
            "store.backend=memory starts empty on every run; \
             use --set store.backend=surreal or DAL__STORE__BACKEND=surreal"
        );
    }
    Ok(())
}

fn deleted_mode(include_deleted: bool) -> DeletedFilter {
    if include_deleted {
        DeletedFilter::Include
    } else {
        DeletedFilter::Exclude
    }
}

fn init_tracing(log: &LogSettings) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use dal_config::prelude::SurrealSettings;

    fn settings(backend: StoreBackend) -> StoreSettings {
        StoreSettings {
            backend,
            surreal: SurrealSettings {
                endpoint: "127.0.0.1:8000".into(),
                namespace: "dal".into(),
                database: "layouts".into(),
                protocol: "ws".into(),
                username: None,
                password: None,
                max_connections: 8,
                strict: true,
            },
        }
    }

    #[test]
    fn memory_backend_is_refused() {
        let err = require_persistent(&settings(StoreBackend::Memory)).unwrap_err();
        assert!(err.to_string().contains("store.backend=surreal"));
        assert!(require_persistent(&settings(StoreBackend::Surreal)).is_ok());
    }

    #[test]
    fn overrides_parse_as_key_value_pairs() {
        let cli = Cli::parse_from([
            "layout-admin",
            "--set",
            "store.backend=surreal",
            "delete",
            "L1",
            "--environment",
            "E1",
            "--organization",
            "O1",
        ]);
        assert_eq!(cli.overrides, vec!["store.backend=surreal".to_string()]);
        assert!(matches!(cli.command, Command::Delete { .. }));
    }
}
