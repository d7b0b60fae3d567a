//! permview: access-control snapshot viewer
//!
//! Pivots an exported group/user/application permission snapshot around a
//! single user and answers group, application and permission lookups.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use permview::{
    cli::{self, CommandContext, PivotQuery, UsersQuery},
    config,
    pivot::ViewMode,
    reports::ReportFormat,
    viewmodel::SortField,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "permview")]
#[command(version)]
#[command(about = "Access-control snapshot viewer", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Pivot one teller's access: groups, then applications, then permissions
    permview pivot T001

    # Start from permissions instead, drilling into one of them
    permview pivot T001 --mode user-perm-app-group --select permPrint

    # Who can print receipts, as JSON
    permview permission permPrint -o json

    # Read a specific export
    permview --data /srv/exports/UserPermissions.json summary")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Snapshot file (defaults to `data.path` from config, then ./UserPermissions.json)
    #[arg(short, long, global = true, env = "PERMVIEW_DATA")]
    data: Option<PathBuf>,

    /// Output format (defaults to `output.format` from config)
    #[arg(short, long, global = true, value_enum)]
    output: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long, global = true)]
    output_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `users` subcommand
#[derive(Parser)]
struct UsersArgs {
    /// Case-insensitive substring filter
    #[arg(short, long)]
    filter: Option<String>,

    /// Field to sort by
    #[arg(short, long, value_enum)]
    sort: Option<SortField>,

    /// Sort descending (by name unless --sort is given)
    #[arg(long)]
    desc: bool,
}

/// Arguments for the `pivot` subcommand
#[derive(Parser)]
struct PivotArgs {
    /// Identifier of the root user
    user: String,

    /// Join order below the user (user-group-app-perm, user-app-group-perm, user-perm-app-group)
    #[arg(short, long)]
    mode: Option<ViewMode>,

    /// Row label to select in panel 1, then panel 2 (repeatable)
    #[arg(long = "select", value_name = "LABEL")]
    select: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show snapshot freshness and totals
    Summary,

    /// List users across all groups
    Users(UsersArgs),

    /// Pivot a user's access through groups, applications and permissions
    Pivot(PivotArgs),

    /// Show a group's applications and members
    Group {
        /// Group name (case-insensitive)
        name: String,

        /// Also list this application's permissions within the group
        #[arg(long)]
        app: Option<String>,
    },

    /// Show which groups, permissions and users an application involves
    App {
        /// Application name (case-insensitive)
        name: String,
    },

    /// Show who holds a permission
    Permission {
        /// Permission code or label (case-insensitive)
        code: String,

        /// Narrow the groups to one application
        #[arg(long)]
        app: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format (honors --output-file)
    ConfigSchema,

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .permview.yaml in the current directory
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match cli.command {
        Commands::Summary => cli::run_summary(&context(&cli)?),
        Commands::Users(ref args) => {
            let query = UsersQuery {
                filter: args.filter.clone(),
                sort: args.sort,
                descending: args.desc,
            };
            cli::run_users(&context(&cli)?, &query)
        }
        Commands::Pivot(ref args) => {
            let query = PivotQuery {
                user: args.user.clone(),
                mode: args.mode,
                select: args.select.clone(),
            };
            cli::run_pivot(&context(&cli)?, &query)
        }
        Commands::Group { ref name, ref app } => {
            cli::run_group(&context(&cli)?, name, app.as_deref())
        }
        Commands::App { ref name } => cli::run_app(&context(&cli)?, name),
        Commands::Permission { ref code, ref app } => {
            cli::run_permission(&context(&cli)?, code, app.as_deref())
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "permview", &mut io::stdout());
            Ok(())
        }

        Commands::ConfigSchema => {
            let schema = config::generate_json_schema().context("failed to build schema")?;
            match &cli.output_file {
                Some(path) => {
                    std::fs::write(path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(())
        }

        Commands::Config { ref action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) = config::load_or_default(cli.config.as_deref());
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Path => {
                eprintln!("Config file search paths (in order):");
                for dir in config::search_dirs() {
                    eprintln!("  {}", dir.display());
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in config::CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(())
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(config::CONFIG_FILE_NAMES[0]);
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                std::fs::write(&target, config::generate_example_config())
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(())
            }
        },
    }
}

/// Load the config file and combine it with the global flags.
fn context(cli: &Cli) -> Result<CommandContext> {
    let (config, loaded_from) = config::load_or_default(cli.config.as_deref());
    if let Some(path) = &loaded_from {
        tracing::debug!("Using config {}", path.display());
    }
    CommandContext::new(
        config,
        cli.data.clone(),
        cli.output,
        cli.output_file.clone(),
        cli.no_color,
        cli.quiet,
    )
}
