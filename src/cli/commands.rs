use crate::cache::{self, RouteCache};
use crate::config::{load_config, RouteAttributesConfig};
use crate::hot_reload::{rebuild_table, watch_directories};
use crate::linter::{has_errors, lint_config, print_lint_issues, LintSeverity};
use crate::provider::{AppContext, RouteAttributesServiceProvider};
use crate::route::EffectiveRoute;
use arc_swap::ArcSwap;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Command-line interface for route-attributes
#[derive(Parser)]
#[command(name = "route-attributes")]
#[command(about = "Discover attribute routes in controller sources", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the route-attributes config file (YAML, TOML or JSON)
    #[arg(
        short,
        long,
        global = true,
        env = "ROUTE_ATTRIBUTES_CONFIG",
        default_value = "route-attributes.yaml"
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every discovered route in registration order
    List {
        /// Print the routes as JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Lint controller sources
    ///
    /// Reports parse errors, malformed attributes, route attributes that are
    /// never registered, duplicate routes and unknown where parameters.
    Lint {
        /// Exit with error code if any errors are found
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,

        /// Show only errors (hide warnings and info)
        #[arg(long, default_value_t = false)]
        errors_only: bool,
    },
    /// Discover routes and write them to the route cache
    Cache {
        /// Cache file (defaults to `app.route_cache` from the config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Remove the route cache
    Clear,
    /// Watch controller directories and rebuild routes on change
    Watch,
}

/// Parse the process arguments and run the selected command.
pub fn run_cli() -> anyhow::Result<()> {
    run(Cli::parse())
}

/// Run an already parsed command line.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load(&cli.config)?;
    let app = AppContext::from(&config.app);
    let provider = RouteAttributesServiceProvider::new(config);

    match cli.command {
        Commands::List { json } => {
            let table = rebuild_table(&provider, &app)?;
            let routes: Vec<EffectiveRoute> =
                table.routes().iter().map(|r| (**r).clone()).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&routes)?);
            } else {
                print!("{}", format_routes(&routes));
            }
            Ok(())
        }
        Commands::Lint {
            fail_on_error,
            errors_only,
        } => {
            let mut issues = lint_config(provider.config(), &app)?;
            if errors_only {
                issues.retain(|i| i.severity == LintSeverity::Error);
            }
            print_lint_issues(&issues);
            if fail_on_error && has_errors(&issues) {
                anyhow::bail!("lint found errors");
            }
            Ok(())
        }
        Commands::Cache { output } => {
            let path = cache_path(output, &app)?;
            let table = rebuild_table(&provider, &app)?;
            RouteCache::from_table(&table).write(&path)?;
            println!("Cached {} route(s) to {}", table.len(), path.display());
            Ok(())
        }
        Commands::Clear => {
            let path = cache_path(None, &app)?;
            if cache::clear(&path)? {
                println!("Removed {}", path.display());
            } else {
                println!("No route cache at {}", path.display());
            }
            Ok(())
        }
        Commands::Watch => {
            let table = Arc::new(ArcSwap::from_pointee(rebuild_table(&provider, &app)?));
            info!(routes = table.load().len(), "Initial route table built");
            let _watcher = watch_directories(provider, app, Arc::clone(&table), |rebuilt| {
                println!("Reloaded {} route(s)", rebuilt.len());
            })?;
            loop {
                std::thread::park();
            }
        }
    }
}

fn load(path: &Path) -> anyhow::Result<RouteAttributesConfig> {
    let mut config = load_config(path)?;
    config.apply_env_overrides();
    Ok(config)
}

fn cache_path(output: Option<PathBuf>, app: &AppContext) -> anyhow::Result<PathBuf> {
    output
        .or_else(|| app.route_cache.clone())
        .ok_or_else(|| anyhow::anyhow!("no cache file: pass --output or set app.route_cache"))
}

/// Render routes as an aligned text table.
pub fn format_routes(routes: &[EffectiveRoute]) -> String {
    let rows: Vec<[String; 5]> = routes
        .iter()
        .map(|route| {
            let verbs = route
                .verbs
                .iter()
                .map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join("|");
            let uri = match &route.domain {
                Some(domain) => format!("{domain}/{}", route.uri.trim_start_matches('/')),
                None => route.uri.clone(),
            };
            [
                verbs,
                uri,
                route.name.clone().unwrap_or_default(),
                route.handler.to_string(),
                route.middleware.join(","),
            ]
        })
        .collect();

    let header = ["METHOD", "URI", "NAME", "ACTION", "MIDDLEWARE"].map(String::from);
    let mut widths = header.clone().map(|h| h.len());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(&header).chain(rows.iter()) {
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            line.push_str(&format!("{cell:<width$}  ", width = widths[i]));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
