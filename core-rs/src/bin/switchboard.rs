//! switchboard - impersonation catalogue CLI
//!
//! Manages the agent/port/uri/parameter catalogue on disk, moves it between
//! machines as snapshots, and applies combinations against a target app.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::Level;

use switchboard_core::remote::endpoint;
use switchboard_core::store::Navigation;
use switchboard_core::url_builder::{build_redirect_target, ParameterOverrides};
use switchboard_core::{
    detect_conflicts, export_snapshot, import_snapshot, is_draft, read_snapshot_file,
    resolve_references, write_snapshot_file, AddressBookClient, Agent, AgentUpdate, Combination,
    CombinationUpdate, EntityKind, EntityStore, ImpersonationClient, JsonFileStore,
    NewCombination, NewOptyParameter, NewPort, NewTailParameter, NewUri, OptyParameterUpdate,
    PortUpdate, SwitchboardConfig, TailParameterUpdate, UriUpdate,
};

type Store = EntityStore<JsonFileStore>;

#[derive(Parser)]
#[command(name = "switchboard")]
#[command(version)]
#[command(about = "Impersonation catalogue and redirect builder", long_about = None)]
struct Cli {
    /// Config file (default: ./switchboard.yaml, then ~/.config/switchboard/)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Store directory, overrides the config file
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// Debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage agents (list, add, set, rm)
    Agent {
        #[command(subcommand)]
        command: AgentCommands,
    },
    /// Manage ports (list, add, set, rm)
    Port {
        #[command(subcommand)]
        command: PortCommands,
    },
    /// Manage URIs (list, add, set, rm)
    Uri {
        #[command(subcommand)]
        command: UriCommands,
    },
    /// Manage tail parameters (list, add, set, rm)
    Tail {
        #[command(subcommand)]
        command: TailCommands,
    },
    /// Manage OPTY parameters (list, add, set, rm)
    Opty {
        #[command(subcommand)]
        command: OptyCommands,
    },
    /// Manage combinations (list, add, set, copy, show, rm)
    Combination {
        #[command(subcommand)]
        command: CombinationCommands,
    },
    /// Export the catalogue as a snapshot
    Export {
        /// Output file (stdout if omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Import a snapshot
    Import {
        /// Snapshot file
        file: PathBuf,
        /// Replace conflicting records instead of keeping the local ones
        #[arg(long)]
        overwrite: bool,
        /// Only report conflicts
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the redirect target of a combination
    Url {
        /// Combination id (default: last selected)
        combination: Option<String>,
        /// URL of the page the redirect starts from
        #[arg(long)]
        current: String,
        /// Keep the current path instead of the combination's URI
        #[arg(long)]
        skip_uri: bool,
        /// Temporary tail value override (key=value)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        values: Vec<String>,
        /// Temporary OPTY override (key=true|false)
        #[arg(long = "flag", value_name = "KEY=BOOL")]
        flags: Vec<String>,
    },
    /// Impersonate a combination's agent and print the redirect target
    Impersonate {
        /// Combination id (default: last selected)
        combination: Option<String>,
        /// URL of the page the redirect starts from
        #[arg(long)]
        current: String,
        /// Keep the current path instead of the combination's URI
        #[arg(long)]
        skip_uri: bool,
        /// Skip /unimpersonate/ even if an impersonation was recorded for this origin
        #[arg(long)]
        fresh: bool,
    },
    /// Partner address book (list, addresses, remove-address)
    Partners {
        #[command(subcommand)]
        command: PartnerCommands,
    },
    /// Delete every record and reset session state
    Clear {
        /// Confirm
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum AgentCommands {
    List,
    /// Add an agent under its application user id
    Add { id: String, username: String },
    Set {
        id: String,
        /// Rename the id
        #[arg(long)]
        new_id: Option<String>,
        #[arg(long)]
        username: Option<String>,
    },
    Rm { id: String },
}

#[derive(Subcommand)]
enum PortCommands {
    List,
    Add {
        port: u16,
        #[arg(long)]
        description: Option<String>,
    },
    Set {
        id: String,
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, conflicts_with = "description")]
        clear_description: bool,
    },
    Rm { id: String },
}

#[derive(Subcommand)]
enum UriCommands {
    List,
    Add {
        uri: String,
        #[arg(long)]
        description: Option<String>,
    },
    Set {
        id: String,
        #[arg(long)]
        uri: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, conflicts_with = "description")]
        clear_description: bool,
    },
    Rm { id: String },
}

#[derive(Subcommand)]
enum TailCommands {
    List,
    Add { key: String, value: String },
    Set {
        id: String,
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        value: Option<String>,
    },
    Rm { id: String },
}

#[derive(Subcommand)]
enum OptyCommands {
    List,
    /// Add an OPTY flag (value: true|false)
    Add { key: String, value: String },
    Set {
        id: String,
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        value: Option<String>,
    },
    Rm { id: String },
}

#[derive(Subcommand)]
enum CombinationCommands {
    List,
    Add {
        title: String,
        #[arg(long)]
        agent: Option<String>,
        #[arg(long)]
        port: Option<String>,
        #[arg(long)]
        uri: Option<String>,
        /// Tail parameter id (repeatable)
        #[arg(long = "tail")]
        tail: Vec<String>,
        /// OPTY parameter id (repeatable)
        #[arg(long = "opty")]
        opty: Vec<String>,
    },
    Set {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        agent: Option<String>,
        #[arg(long, conflicts_with = "agent")]
        clear_agent: bool,
        #[arg(long)]
        port: Option<String>,
        #[arg(long, conflicts_with = "port")]
        clear_port: bool,
        #[arg(long)]
        uri: Option<String>,
        #[arg(long, conflicts_with = "uri")]
        clear_uri: bool,
        /// Replace the tail parameter selection (repeatable)
        #[arg(long = "tail")]
        tail: Vec<String>,
        /// Replace the OPTY parameter selection (repeatable)
        #[arg(long = "opty")]
        opty: Vec<String>,
        /// Drop both parameter selections
        #[arg(long, conflicts_with_all = ["tail", "opty"])]
        clear_params: bool,
    },
    /// Duplicate under a new id
    Copy { id: String },
    /// Show a combination with its references resolved
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    Rm { id: String },
}

#[derive(Subcommand)]
enum PartnerCommands {
    /// List partner names
    List,
    /// Addresses recorded for a partner
    Addresses { name: String },
    /// Remove one address from a partner
    RemoveAddress { name: String, address: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = std::env::var("SWITCHBOARD_LOG")
        .ok()
        .and_then(|v| v.parse::<Level>().ok())
        .unwrap_or(if verbose { Level::DEBUG } else { Level::WARN });

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = SwitchboardConfig::discover(cli.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(dir) = cli.store {
        config.store_dir = dir;
    }

    match cli.command {
        Commands::Partners { command } => handle_partners(&config, command).await,
        command => {
            let store = open_store(&config.store_dir)?;
            dispatch(&store, &config, command).await
        }
    }
}

async fn dispatch(store: &Store, config: &SwitchboardConfig, command: Commands) -> Result<()> {
    match command {
        Commands::Agent { command } => handle_agent(store, command),
        Commands::Port { command } => handle_port(store, command),
        Commands::Uri { command } => handle_uri(store, command),
        Commands::Tail { command } => handle_tail(store, command),
        Commands::Opty { command } => handle_opty(store, command),
        Commands::Combination { command } => handle_combination(store, command),
        Commands::Export { output } => handle_export(store, output.as_deref()),
        Commands::Import {
            file,
            overwrite,
            dry_run,
        } => handle_import(store, &file, overwrite, dry_run),
        Commands::Url {
            combination,
            current,
            skip_uri,
            values,
            flags,
        } => {
            let combination = pick_combination(store, combination.as_deref())?;
            let overrides = parse_overrides(&values, &flags)?;
            let resolved = resolve_references(&combination, store)?;
            let target = build_redirect_target(&current, &resolved, &overrides, skip_uri)?;
            println!("{}", target);
            Ok(())
        }
        Commands::Impersonate {
            combination,
            current,
            skip_uri,
            fresh,
        } => {
            handle_impersonate(store, config, combination.as_deref(), &current, skip_uri, fresh)
                .await
        }
        Commands::Partners { command } => handle_partners(config, command).await,
        Commands::Clear { yes } => {
            if !yes {
                bail!("refusing to delete every record without --yes");
            }
            store.clear_all_data()?;
            println!("{} Catalogue and session state cleared", "✓".green());
            Ok(())
        }
    }
}

fn open_store(dir: &Path) -> Result<Store> {
    let kv = JsonFileStore::open(dir)
        .with_context(|| format!("cannot open store at {}", dir.display()))?;
    Ok(EntityStore::new(kv))
}

fn remember_section(store: &Store, kind: EntityKind) -> Result<()> {
    store.set_current_navigation(Navigation::from(kind))?;
    Ok(())
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" => Ok(false),
        other => bail!("expected true or false, got '{}'", other),
    }
}

fn split_pair(raw: &str) -> Result<(&str, &str)> {
    raw.split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got '{}'", raw))
}

fn parse_overrides(values: &[String], flags: &[String]) -> Result<ParameterOverrides> {
    let mut overrides = ParameterOverrides::default();
    for raw in values {
        let (key, value) = split_pair(raw)?;
        overrides.set_value(key, value);
    }
    for raw in flags {
        let (key, value) = split_pair(raw)?;
        overrides.set_flag(key, parse_bool(value)?);
    }
    Ok(overrides)
}

fn optional(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

fn reference(set: Option<String>, clear: bool) -> Option<Option<String>> {
    if clear {
        Some(None)
    } else {
        set.map(Some)
    }
}

fn print_header(columns: &str, width: usize) {
    println!("\n{}", columns.bold());
    println!("{}", "-".repeat(width));
}

fn print_empty(what: &str) {
    println!("No {} found.", what);
}

fn handle_agent(store: &Store, command: AgentCommands) -> Result<()> {
    match command {
        AgentCommands::List => {
            remember_section(store, EntityKind::Agent)?;
            let agents = store.all_agents()?;
            if agents.is_empty() {
                print_empty("agents");
                return Ok(());
            }
            print_header(&format!("{:<24} {:<32}", "ID", "USERNAME"), 57);
            for a in agents {
                println!("{:<24} {:<32}", a.id, a.username);
            }
            println!();
        }
        AgentCommands::Add { id, username } => {
            let agent = store.create_agent(Agent { id, username })?;
            println!("{} Agent '{}' added", "✓".green(), agent.id);
        }
        AgentCommands::Set {
            id,
            new_id,
            username,
        } => {
            let agent = store.update_agent(&id, AgentUpdate { id: new_id, username })?;
            println!("{} Agent '{}' updated", "✓".green(), agent.id);
        }
        AgentCommands::Rm { id } => {
            store.delete_agent(&id)?;
            println!("{} Agent '{}' removed", "✓".green(), id);
        }
    }
    Ok(())
}

fn handle_port(store: &Store, command: PortCommands) -> Result<()> {
    match command {
        PortCommands::List => {
            remember_section(store, EntityKind::Port)?;
            let ports = store.all_ports()?;
            if ports.is_empty() {
                print_empty("ports");
                return Ok(());
            }
            print_header(&format!("{:<38} {:<6} {}", "ID", "PORT", "DESCRIPTION"), 70);
            for p in ports {
                println!("{:<38} {:<6} {}", p.id, p.port, optional(&p.description));
            }
            println!();
        }
        PortCommands::Add { port, description } => {
            let created = store.create_port(NewPort { port, description })?;
            println!("{} Port {} added ({})", "✓".green(), created.port, created.id);
        }
        PortCommands::Set {
            id,
            port,
            description,
            clear_description,
        } => {
            let update = PortUpdate {
                port,
                description: reference(description, clear_description),
            };
            let updated = store.update_port(&id, update)?;
            println!("{} Port '{}' updated", "✓".green(), updated.id);
        }
        PortCommands::Rm { id } => {
            store.delete_port(&id)?;
            println!("{} Port '{}' removed", "✓".green(), id);
        }
    }
    Ok(())
}

fn handle_uri(store: &Store, command: UriCommands) -> Result<()> {
    match command {
        UriCommands::List => {
            remember_section(store, EntityKind::Uri)?;
            let uris = store.all_uris()?;
            if uris.is_empty() {
                print_empty("URIs");
                return Ok(());
            }
            print_header(&format!("{:<38} {:<32} {}", "ID", "URI", "DESCRIPTION"), 90);
            for u in uris {
                println!("{:<38} {:<32} {}", u.id, u.uri, optional(&u.description));
            }
            println!();
        }
        UriCommands::Add { uri, description } => {
            let created = store.create_uri(NewUri { uri, description })?;
            println!("{} URI '{}' added ({})", "✓".green(), created.uri, created.id);
        }
        UriCommands::Set {
            id,
            uri,
            description,
            clear_description,
        } => {
            let update = UriUpdate {
                uri,
                description: reference(description, clear_description),
            };
            let updated = store.update_uri(&id, update)?;
            println!("{} URI '{}' updated", "✓".green(), updated.id);
        }
        UriCommands::Rm { id } => {
            store.delete_uri(&id)?;
            println!("{} URI '{}' removed", "✓".green(), id);
        }
    }
    Ok(())
}

fn handle_tail(store: &Store, command: TailCommands) -> Result<()> {
    match command {
        TailCommands::List => {
            remember_section(store, EntityKind::TailParameter)?;
            let params = store.all_tail_parameters()?;
            if params.is_empty() {
                print_empty("tail parameters");
                return Ok(());
            }
            print_header(&format!("{:<38} {:<24} {}", "ID", "KEY", "VALUE"), 80);
            for p in params {
                println!("{:<38} {:<24} {}", p.id, p.key, p.value);
            }
            println!();
        }
        TailCommands::Add { key, value } => {
            let created = store.create_tail_parameter(NewTailParameter { key, value })?;
            println!("{} Tail parameter '{}' added ({})", "✓".green(), created.key, created.id);
        }
        TailCommands::Set { id, key, value } => {
            let updated = store.update_tail_parameter(&id, TailParameterUpdate { key, value })?;
            println!("{} Tail parameter '{}' updated", "✓".green(), updated.id);
        }
        TailCommands::Rm { id } => {
            store.delete_tail_parameter(&id)?;
            println!("{} Tail parameter '{}' removed", "✓".green(), id);
        }
    }
    Ok(())
}

fn handle_opty(store: &Store, command: OptyCommands) -> Result<()> {
    match command {
        OptyCommands::List => {
            remember_section(store, EntityKind::OptyParameter)?;
            let params = store.all_opty_parameters()?;
            if params.is_empty() {
                print_empty("OPTY parameters");
                return Ok(());
            }
            print_header(&format!("{:<38} {:<24} {}", "ID", "KEY", "VALUE"), 70);
            for p in params {
                let value = if p.value { "true".green() } else { "false".red() };
                println!("{:<38} {:<24} {}", p.id, p.key, value);
            }
            println!();
        }
        OptyCommands::Add { key, value } => {
            let value = parse_bool(&value)?;
            let created = store.create_opty_parameter(NewOptyParameter { key, value })?;
            println!("{} OPTY parameter '{}' added ({})", "✓".green(), created.key, created.id);
        }
        OptyCommands::Set { id, key, value } => {
            let value = value.as_deref().map(parse_bool).transpose()?;
            let updated = store.update_opty_parameter(&id, OptyParameterUpdate { key, value })?;
            println!("{} OPTY parameter '{}' updated", "✓".green(), updated.id);
        }
        OptyCommands::Rm { id } => {
            store.delete_opty_parameter(&id)?;
            println!("{} OPTY parameter '{}' removed", "✓".green(), id);
        }
    }
    Ok(())
}

fn status_label(combination: &Combination) -> colored::ColoredString {
    if is_draft(combination) {
        "draft".yellow()
    } else {
        "ready".green()
    }
}

fn handle_combination(store: &Store, command: CombinationCommands) -> Result<()> {
    match command {
        CombinationCommands::List => {
            remember_section(store, EntityKind::Combination)?;
            let combinations = store.all_combinations()?;
            if combinations.is_empty() {
                print_empty("combinations");
                return Ok(());
            }
            print_header(
                &format!("{:<38} {:<28} {:<6} {}", "ID", "TITLE", "STATUS", "UPDATED"),
                100,
            );
            for c in &combinations {
                println!(
                    "{:<38} {:<28} {:<6} {}",
                    c.id,
                    c.title,
                    status_label(c),
                    c.updated_at.format("%Y-%m-%d %H:%M")
                );
            }
            println!();
        }
        CombinationCommands::Add {
            title,
            agent,
            port,
            uri,
            tail,
            opty,
        } => {
            let created = store.create_combination(NewCombination {
                title,
                agent_id: agent,
                port_id: port,
                uri_id: uri,
                tail_parameter_ids: tail,
                opty_parameter_ids: opty,
            })?;
            println!(
                "{} Combination '{}' added ({}, {})",
                "✓".green(),
                created.title,
                created.id,
                status_label(&created)
            );
        }
        CombinationCommands::Set {
            id,
            title,
            agent,
            clear_agent,
            port,
            clear_port,
            uri,
            clear_uri,
            tail,
            opty,
            clear_params,
        } => {
            let selection = |ids: Vec<String>| {
                if clear_params {
                    Some(Vec::new())
                } else if ids.is_empty() {
                    None
                } else {
                    Some(ids)
                }
            };
            let update = CombinationUpdate {
                title,
                agent_id: reference(agent, clear_agent),
                port_id: reference(port, clear_port),
                uri_id: reference(uri, clear_uri),
                tail_parameter_ids: selection(tail),
                opty_parameter_ids: selection(opty),
            };
            let updated = store.update_combination(&id, update)?;
            println!(
                "{} Combination '{}' updated ({})",
                "✓".green(),
                updated.title,
                status_label(&updated)
            );
        }
        CombinationCommands::Copy { id } => {
            let copied = store.copy_combination(&id)?;
            println!("{} Copied to '{}' ({})", "✓".green(), copied.title, copied.id);
        }
        CombinationCommands::Show { id, json } => {
            let combination = store
                .combination_by_id(&id)?
                .ok_or_else(|| anyhow!("combination '{}' not found", id))?;
            let resolved = resolve_references(&combination, store)?;

            if json {
                let doc = serde_json::json!({
                    "combination": combination,
                    "draft": is_draft(&combination),
                    "resolved": resolved,
                });
                println!("{}", serde_json::to_string_pretty(&doc)?);
                return Ok(());
            }

            println!("\n{} ({})", combination.title.bold(), status_label(&combination));
            println!("  ID:      {}", combination.id);
            println!(
                "  Agent:   {}",
                resolved
                    .agent
                    .as_ref()
                    .map(|a| format!("{} ({})", a.username, a.id))
                    .unwrap_or_else(|| "-".to_string())
            );
            println!(
                "  Port:    {}",
                resolved
                    .port
                    .as_ref()
                    .map(|p| p.port.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
            println!(
                "  URI:     {}",
                resolved.uri.as_ref().map(|u| u.uri.as_str()).unwrap_or("-")
            );
            for p in &resolved.tail_parameters {
                println!("  Tail:    {}={}", p.key, p.value);
            }
            for p in &resolved.opty_parameters {
                println!("  OPTY:    {}={}", p.key, p.value);
            }
            println!("  Created: {}", combination.created_at.to_rfc3339());
            println!("  Updated: {}", combination.updated_at.to_rfc3339());
            println!();
        }
        CombinationCommands::Rm { id } => {
            store.delete_combination(&id)?;
            println!("{} Combination '{}' removed", "✓".green(), id);
        }
    }
    Ok(())
}

fn pick_combination(store: &Store, id: Option<&str>) -> Result<Combination> {
    let id = match id {
        Some(id) => id.to_string(),
        None => store
            .last_selected_combination_id()?
            .ok_or_else(|| anyhow!("no combination given and none selected before"))?,
    };
    store
        .combination_by_id(&id)?
        .ok_or_else(|| anyhow!("combination '{}' not found", id))
}

async fn handle_impersonate(
    store: &Store,
    config: &SwitchboardConfig,
    id: Option<&str>,
    current: &str,
    skip_uri: bool,
    fresh: bool,
) -> Result<()> {
    let combination = pick_combination(store, id)?;
    if is_draft(&combination) {
        bail!(
            "combination '{}' is a draft; set agent, port and uri first",
            combination.title
        );
    }

    let resolved = resolve_references(&combination, store)?;
    let agent = resolved
        .agent
        .as_ref()
        .ok_or_else(|| anyhow!("agent of '{}' no longer exists", combination.title))?;
    let target = build_redirect_target(current, &resolved, &ParameterOverrides::default(), skip_uri)?;

    let origin = endpoint(current, "/")?.to_string();
    let already_impersonating = !fresh && store.is_impersonating_on(&origin)?;
    let client = ImpersonationClient::new(&config.impersonation, config.timeout())?;
    client
        .impersonate(current, &agent.id, already_impersonating)
        .await
        .with_context(|| format!("impersonating '{}' failed", agent.username))?;

    store.record_impersonation(&origin, &agent.id)?;
    store.set_last_selected_combination_id(Some(&combination.id))?;
    store.set_current_combination_initialized(Some(&combination.id))?;

    println!("{} Impersonating {} ({})", "✓".green(), agent.username.bold(), agent.id);
    println!("{}", target);
    Ok(())
}

fn handle_export(store: &Store, output: Option<&Path>) -> Result<()> {
    let snapshot = export_snapshot(store)?;
    match output {
        Some(path) => {
            write_snapshot_file(path, &snapshot)
                .with_context(|| format!("cannot write {}", path.display()))?;
            eprintln!(
                "{} Exported {} records to {}",
                "✓".green(),
                snapshot.data.record_count(),
                path.display()
            );
        }
        None => println!("{}", snapshot.to_json_pretty()?),
    }
    Ok(())
}

fn handle_import(store: &Store, file: &Path, overwrite: bool, dry_run: bool) -> Result<()> {
    let snapshot = read_snapshot_file(file)
        .with_context(|| format!("cannot read snapshot {}", file.display()))?;

    let conflicts = detect_conflicts(store, &snapshot.data)?;
    if conflicts.has_conflicts {
        println!(
            "{} {} conflicting record(s)",
            "!".yellow().bold(),
            conflicts.conflict_count()
        );
        for (kind, ids) in conflicts.conflicts.iter() {
            if !ids.is_empty() {
                println!("  {:<16} {}", kind.to_string(), ids.join(", "));
            }
        }
    } else {
        println!("No conflicts.");
    }

    if dry_run {
        return Ok(());
    }

    let report = import_snapshot(store, &snapshot.data, overwrite)?;
    print_header(
        &format!(
            "{:<16} {:>8} {:>9} {:>8} {:>11}",
            "KIND", "INSERTED", "UNCHANGED", "SKIPPED", "OVERWRITTEN"
        ),
        56,
    );
    for (kind, counts) in report.iter() {
        println!(
            "{:<16} {:>8} {:>9} {:>8} {:>11}",
            kind.to_string(),
            counts.inserted,
            counts.unchanged,
            counts.skipped,
            counts.overwritten
        );
    }
    let total = report.total();
    println!(
        "\n{} Imported: {} inserted, {} overwritten, {} kept local",
        "✓".green(),
        total.inserted,
        total.overwritten,
        total.skipped
    );
    Ok(())
}

async fn handle_partners(config: &SwitchboardConfig, command: PartnerCommands) -> Result<()> {
    let client = AddressBookClient::new(config.deployment_url()?, config.timeout())?;

    match command {
        PartnerCommands::List => {
            let names = client.list_partner_names().await?;
            if names.is_empty() {
                print_empty("partners");
            }
            for name in names {
                println!("{}", name);
            }
        }
        PartnerCommands::Addresses { name } => {
            let addresses = client.addresses_for_partner(&name).await?;
            if addresses.is_empty() {
                println!("No addresses recorded for '{}'.", name);
            }
            for address in addresses {
                println!("{}", address);
            }
        }
        PartnerCommands::RemoveAddress { name, address } => {
            client.remove_address(&name, &address).await?;
            println!("{} Removed '{}' from '{}'", "✓".green(), address, name);
        }
    }
    Ok(())
}
