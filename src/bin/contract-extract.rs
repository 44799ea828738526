//! contract-extract CLI: run contract-driven extraction against a template store.
//!
//! Usage:
//!   contract-extract import --node <id> [--contract f] [--policy f] [--engine f]...
//!   contract-extract extract --node <id> <text>
//!   contract-extract render --node <id> <pattern>
//!   contract-extract normalize --node <id> <pattern>
//!   contract-extract advise <entity-type>
//!   contract-extract nodes
//!   contract-extract new-field-id

use clap::{Parser, Subcommand};
use contract_extract::{
    default_engine_order, EngineConfig, EscalationPolicy, EscalationRunner, FieldId,
    IdentifierLabelMap, OpenStore, RuntimeConfig, SemanticContract, SqliteStore, TemplateStore,
};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "contract-extract",
    version,
    about = "Contract-driven, multi-engine text extraction"
)]
struct Cli {
    /// Path to SQLite template database
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Path to YAML runtime config
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load YAML templates for a node into the store
    Import {
        #[arg(long)]
        node: String,
        /// Semantic contract file
        #[arg(long)]
        contract: Option<PathBuf>,
        /// Escalation policy file
        #[arg(long)]
        policy: Option<PathBuf>,
        /// Engine config file (repeatable)
        #[arg(long)]
        engine: Vec<PathBuf>,
    },
    /// Extract values from text using the node's contract and engines
    Extract {
        #[arg(long)]
        node: String,
        text: String,
    },
    /// Show a technical pattern with human-readable group labels
    Render {
        #[arg(long)]
        node: String,
        pattern: String,
    },
    /// Convert a labeled pattern back to technical group names
    Normalize {
        #[arg(long)]
        node: String,
        pattern: String,
    },
    /// Print the default engine order for an entity type
    Advise { entity_type: String },
    /// List node ids with stored templates
    Nodes,
    /// Print a fresh technical field identifier
    NewFieldId,
}

/// Get the default database path (~/.local/share/contract-extract/templates.db)
fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("contract-extract").join("templates.db")
}

fn open_store(db: Option<PathBuf>) -> Result<SqliteStore, String> {
    let db_path = db.unwrap_or_else(default_db_path);
    SqliteStore::open(&db_path).map_err(|e| format!("Failed to open database: {}", e))
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;
    serde_yaml::from_str(&text).map_err(|e| format!("cannot parse '{}': {}", path.display(), e))
}

fn load_contract(store: &SqliteStore, node: &str) -> Result<SemanticContract, String> {
    store
        .load_contract(node)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("no contract for node '{}'", node))
}

fn cmd_import(
    store: &SqliteStore,
    node: &str,
    contract: Option<PathBuf>,
    policy: Option<PathBuf>,
    engines: Vec<PathBuf>,
) -> Result<(), String> {
    if let Some(path) = contract {
        let contract: SemanticContract = read_yaml(&path)?;
        contract.check().map_err(|e| e.to_string())?;
        for invalid in contract.invalid_field_ids() {
            eprintln!("Warning: {}; the field will not get a label", invalid);
        }
        store.save_contract(node, &contract).map_err(|e| e.to_string())?;
        println!("Imported contract for '{}'", node);
    }
    if let Some(path) = policy {
        let policy: EscalationPolicy = read_yaml(&path)?;
        if !policy.has_enabled_engines() {
            eprintln!("Warning: policy for '{}' has no enabled engines", node);
        }
        store.save_escalation_policy(node, &policy).map_err(|e| e.to_string())?;
        println!("Imported escalation policy for '{}'", node);
    }
    for path in engines {
        let config: EngineConfig = read_yaml(&path)?;
        store.save_engine_config(node, &config).map_err(|e| e.to_string())?;
        println!(
            "Imported {} engine v{} for '{}'",
            config.engine_type(),
            config.version(),
            node
        );
    }
    Ok(())
}

fn cmd_extract(
    store: SqliteStore,
    config: &RuntimeConfig,
    node: &str,
    text: &str,
) -> Result<(), String> {
    let factory = config.engine_factory().map_err(|e| e.to_string())?;
    let runner = EscalationRunner::new(Arc::new(store), factory);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| format!("failed to create tokio runtime: {}", e))?;
    let result = rt.block_on(runner.extract(node, text));

    let json = serde_json::to_string_pretty(&result).map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}

fn cmd_render(store: &SqliteStore, node: &str, pattern: &str) -> Result<(), String> {
    let contract = load_contract(store, node)?;
    println!("{}", IdentifierLabelMap::from_contract(&contract).render(pattern));
    Ok(())
}

fn cmd_normalize(store: &SqliteStore, node: &str, pattern: &str) -> Result<(), String> {
    let contract = load_contract(store, node)?;
    let normalized = IdentifierLabelMap::from_contract(&contract)
        .normalize(pattern)
        .map_err(|e| e.to_string())?;
    println!("{}", normalized);
    Ok(())
}

fn run(cli: Cli, config: &RuntimeConfig) -> Result<(), String> {
    match cli.command {
        Commands::Advise { entity_type } => {
            let order: Vec<String> = default_engine_order(&entity_type)
                .iter()
                .map(|t| t.to_string())
                .collect();
            println!("{}", order.join(" -> "));
            Ok(())
        }
        Commands::NewFieldId => {
            println!("{}", FieldId::generate());
            Ok(())
        }
        Commands::Nodes => {
            for node in open_store(cli.db)?.list_nodes().map_err(|e| e.to_string())? {
                println!("{}", node);
            }
            Ok(())
        }
        Commands::Import {
            node,
            contract,
            policy,
            engine,
        } => cmd_import(&open_store(cli.db)?, &node, contract, policy, engine),
        Commands::Extract { node, text } => cmd_extract(open_store(cli.db)?, config, &node, &text),
        Commands::Render { node, pattern } => cmd_render(&open_store(cli.db)?, &node, &pattern),
        Commands::Normalize { node, pattern } => {
            cmd_normalize(&open_store(cli.db)?, &node, &pattern)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match RuntimeConfig::load_or_default(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli, &config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
