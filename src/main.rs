//! @ai:module:intent CLI for the outreach console
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use outreach_console::{
    client::{
        AccountCreateRequest, ConsoleClient, ConsoleClientTrait, Credential, KeyCreateRequest,
        KeyUpdate, ModelSelectionUpdate,
    },
    config::ConsoleConfig,
    domain::{AccountStatus, KeyStatus, SnapshotLoader, SnapshotLoaderTrait, Task, TelegramAccount},
    metrics::{DashboardSummary, MetricsAggregator},
    report::ReportGenerator,
};
use std::path::{Path, PathBuf};
use uuid::Uuid;

const DEFAULT_CONFIG_FILE: &str = "outreach.toml";
const TITLE_WIDTH: usize = 32;

#[derive(Parser)]
#[command(name = "outreach")]
#[command(about = "Operator console for the outreach agent API")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// API base URL, overrides config and environment
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Access key, overrides config and environment
    #[arg(short, long, global = true)]
    key: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the API is reachable
    Health,

    /// Validate the access key and show its permissions
    Login,

    /// List tasks with dialogue counts and review state
    Tasks,

    /// Show metric averages and conversion
    Metrics {
        /// Read tasks from a snapshot file or directory instead of the API
        #[arg(short, long)]
        snapshot: Option<PathBuf>,
    },

    /// Show the server-side weekly overview and metric averages
    Overview,

    /// Generate JSON, Markdown and chart reports
    Report {
        /// Read tasks from a snapshot file or directory instead of the API
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// Output directory, defaults to report.output_dir
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Save the current task list to a JSON file
    Snapshot {
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Check instruction history consistency of a snapshot
    Validate {
        #[arg(short, long)]
        snapshot: PathBuf,
    },

    /// Manage access keys
    Keys {
        #[command(subcommand)]
        action: KeyCommand,
    },

    /// Manage messaging accounts
    Accounts {
        #[command(subcommand)]
        action: AccountCommand,
    },

    /// Inspect and launch task conversations
    Conversations {
        #[command(subcommand)]
        action: ConversationCommand,
    },

    /// Request PDF/DOCX report exports
    Export {
        /// Also email the report to the key owner
        #[arg(long)]
        email: bool,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum KeyCommand {
    /// List all keys
    List,

    /// Issue a key for a new user
    Create {
        #[arg(long)]
        email: String,

        #[arg(long)]
        organization: String,

        /// Create the key inactive
        #[arg(long)]
        inactive: bool,
    },

    /// Allow or forbid model selection for a key
    AllowModel {
        #[arg(long)]
        id: Uuid,

        #[arg(long, conflicts_with = "disable", required_unless_present = "disable")]
        enable: bool,

        #[arg(long)]
        disable: bool,
    },

    /// Activate or deactivate a key
    SetStatus {
        #[arg(long)]
        id: Uuid,

        /// active or inactive
        #[arg(long, value_parser = parse_key_status)]
        status: KeyStatus,
    },

    /// Choose the model used by a key, globally or for one task
    Model {
        #[arg(long)]
        id: Uuid,

        #[arg(long)]
        model: String,

        #[arg(long)]
        task: Option<Uuid>,
    },
}

#[derive(Subcommand)]
enum AccountCommand {
    /// List messaging accounts
    List,

    /// Register a messaging account
    Create {
        #[arg(long)]
        label: String,

        #[arg(long)]
        credentials: String,
    },

    /// Bind an account to a key
    Assign {
        #[arg(long)]
        account: Uuid,

        #[arg(long)]
        key: Uuid,
    },
}

#[derive(Subcommand)]
enum ConversationCommand {
    /// List conversations of a task
    List {
        #[arg(long)]
        task: Uuid,

        /// Only these conversation IDs (comma-separated)
        #[arg(long, value_delimiter = ',')]
        ids: Vec<Uuid>,
    },

    /// Start conversations on the given accounts
    Submit {
        #[arg(long)]
        task: Uuid,

        /// Account IDs (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        accounts: Vec<Uuid>,
    },
}

fn parse_key_status(value: &str) -> std::result::Result<KeyStatus, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "active" => Ok(KeyStatus::Active),
        "inactive" => Ok(KeyStatus::Inactive),
        other => Err(format!("unknown key status '{other}', expected active or inactive")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let directive = if cli.verbose {
        "outreach_console=debug"
    } else {
        "outreach_console=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .init();

    if let Commands::Init { output } = &cli.command {
        return init_config(output);
    }

    let mut config = load_or_default_config(cli.config.as_deref())?;
    config.apply_env();
    config.apply_overrides(cli.api_base, cli.key);
    config.validate()?;

    match cli.command {
        Commands::Validate { snapshot } => validate_snapshot(&snapshot),
        Commands::Metrics {
            snapshot: Some(path),
        } => {
            let tasks = load_snapshot(&path)?;
            print_summary(&summarize(&tasks));
            Ok(())
        }
        Commands::Report {
            snapshot: Some(path),
            output,
        } => {
            let tasks = load_snapshot(&path)?;
            generate_reports(&tasks, &config, output)
        }
        command => run_online(command, &config).await,
    }
}

/// @ai:intent Run a command that talks to the API
/// @ai:effects network, fs:write
async fn run_online(command: Commands, config: &ConsoleConfig) -> Result<()> {
    let client = ConsoleClient::new(&config.api).context("Failed to build HTTP client")?;
    tracing::debug!("Using API at {}", client.base_url());

    if let Commands::Health = command {
        let status = client.health().await?;
        println!("{}: {}", client.base_url(), status.status);
        return Ok(());
    }

    let credential = resolve_credential(config)?;

    match command {
        Commands::Login => login(&client, &credential).await,
        Commands::Tasks => list_tasks(&client, &credential).await,
        Commands::Metrics { .. } => {
            let tasks = client.list_tasks(&credential).await?;
            print_summary(&summarize(&tasks));
            Ok(())
        }
        Commands::Overview => show_overview(&client, &credential).await,
        Commands::Report { output, .. } => {
            let tasks = client.list_tasks(&credential).await?;
            generate_reports(&tasks, config, output)
        }
        Commands::Snapshot { output } => {
            let tasks = client.list_tasks(&credential).await?;
            SnapshotLoader::new()
                .save(&tasks, &output)
                .with_context(|| format!("Failed to write snapshot {}", output.display()))?;
            println!("Saved {} tasks to {}", tasks.len(), output.display());
            Ok(())
        }
        Commands::Keys { action } => run_key_command(&client, &credential, action).await,
        Commands::Accounts { action } => run_account_command(&client, &credential, action).await,
        Commands::Conversations { action } => {
            run_conversation_command(&client, &credential, action).await
        }
        Commands::Export { email } => {
            let links = client.export_reports(&credential).await?;
            println!("PDF:  {}", links.pdf);
            println!("DOCX: {}", links.docx);

            if email {
                let status = client.email_report(&credential).await?;
                println!("Email: {}", status.status);
            }
            Ok(())
        }
        Commands::Health | Commands::Init { .. } | Commands::Validate { .. } => Ok(()),
    }
}

/// @ai:intent Pick the access key from flags, environment or config
/// @ai:effects pure
fn resolve_credential(config: &ConsoleConfig) -> Result<Credential> {
    let credential = config
        .api
        .api_key
        .as_deref()
        .map(Credential::new)
        .filter(|c| !c.is_empty());

    credential.ok_or_else(|| {
        anyhow::anyhow!("No access key configured. Pass --key or set OUTREACH_API_KEY")
    })
}

/// @ai:effects fs:read
fn load_snapshot(path: &Path) -> Result<Vec<Task>> {
    SnapshotLoader::new()
        .load(path)
        .with_context(|| format!("Failed to load snapshot {}", path.display()))
}

fn summarize(tasks: &[Task]) -> DashboardSummary {
    MetricsAggregator::new().summarize(tasks, chrono::Utc::now())
}

/// @ai:intent Validate the key and print the bound identity
/// @ai:effects network
async fn login<C: ConsoleClientTrait>(client: &C, credential: &Credential) -> Result<()> {
    let identity = client.login(credential.as_str()).await?;

    println!("Key:             {}", identity.key_id);
    println!("User:            {}", identity.user_id);
    println!("Default model:   {}", identity.default_model);
    println!(
        "Model selection: {}",
        if identity.allow_model_selection { "allowed" } else { "locked" }
    );
    Ok(())
}

/// @ai:intent Fetch accounts, treating a failed request as no accounts
/// @ai:effects network
async fn accounts_or_empty<C: ConsoleClientTrait>(
    client: &C,
    credential: &Credential,
) -> Vec<TelegramAccount> {
    match client.list_accounts(credential).await {
        Ok(accounts) => accounts,
        Err(e) => {
            tracing::warn!("Could not load messaging accounts: {}", e);
            Vec::new()
        }
    }
}

/// @ai:intent Print the task table and ready account count
/// @ai:effects network
async fn list_tasks<C: ConsoleClientTrait>(client: &C, credential: &Credential) -> Result<()> {
    let tasks = client.list_tasks(credential).await?;
    let accounts = accounts_or_empty(client, credential).await;
    let rows = MetricsAggregator::new().task_rows(&tasks);

    println!("Tasks ({}):", rows.len());
    println!();
    println!(
        "{:<w$} {:>13} {:>9} {:<12} {:<12}",
        "Title",
        "Conversations",
        "Dialogues",
        "Last",
        "Diff",
        w = TITLE_WIDTH
    );
    println!("{}", "-".repeat(TITLE_WIDTH + 50));

    for row in &rows {
        let last = row
            .last_dialogue_at
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<w$} {:>13} {:>9} {:<12} {:<12}",
            truncate(&row.title, TITLE_WIDTH),
            row.conversations,
            row.dialogues,
            last,
            row.review_state(),
            w = TITLE_WIDTH
        );
    }

    let ready = accounts
        .iter()
        .filter(|a| a.status == AccountStatus::Ready)
        .count();
    println!();
    println!("Ready accounts: {} of {}", ready, accounts.len());

    Ok(())
}

/// @ai:intent Print server-side reporting data
/// @ai:effects network
async fn show_overview<C: ConsoleClientTrait>(client: &C, credential: &Credential) -> Result<()> {
    let overview = client.reports_overview(credential).await?;
    let averages = client.reports_metrics(credential).await?;

    println!("Completed dialogues per week:");
    if overview.weekly_conversion.is_empty() {
        println!("  (none)");
    }
    for (week, completed) in &overview.weekly_conversion {
        println!("  {:<10} {:>6}", week, completed);
    }

    println!();
    println!("Metric averages:");
    for (metric, value) in &averages {
        println!("  {:<20} {:>4.1}", metric.label(), value);
    }

    Ok(())
}

/// @ai:intent Write the report set for the given tasks
/// @ai:effects fs:write
fn generate_reports(tasks: &[Task], config: &ConsoleConfig, output: Option<PathBuf>) -> Result<()> {
    let summary = summarize(tasks);
    let output_dir = output.unwrap_or_else(|| config.report.output_dir.clone());

    let written = ReportGenerator::new()
        .with_charts(config.report.charts)
        .generate_all(&summary, &output_dir)
        .with_context(|| format!("Failed to write reports to {}", output_dir.display()))?;

    print_summary(&summary);
    println!();
    println!("Reports written to {}:", output_dir.display());
    for file in &written {
        println!("  - {}", file);
    }

    Ok(())
}

/// @ai:intent Check every task's current instruction against its history
/// @ai:effects fs:read
fn validate_snapshot(path: &Path) -> Result<()> {
    let tasks = load_snapshot(path)?;

    let inconsistent: Vec<&Task> = tasks
        .iter()
        .filter(|t| !t.instruction_is_consistent())
        .collect();

    if !inconsistent.is_empty() {
        for task in &inconsistent {
            println!("  - {} ({}): current instruction differs from history", task.title, task.id);
        }
        anyhow::bail!(
            "{} of {} tasks have an inconsistent instruction history",
            inconsistent.len(),
            tasks.len()
        );
    }

    println!("Snapshot validation passed!");
    println!("Total tasks: {}", tasks.len());
    Ok(())
}

async fn run_key_command<C: ConsoleClientTrait>(
    client: &C,
    credential: &Credential,
    action: KeyCommand,
) -> Result<()> {
    match action {
        KeyCommand::List => {
            let keys = client.list_keys(credential).await?;

            println!("{:<38} {:<9} {:<9} {:<20}", "ID", "Status", "Models", "Default model");
            println!("{}", "-".repeat(78));
            for key in &keys {
                println!(
                    "{:<38} {:<9} {:<9} {:<20}",
                    key.id,
                    key.status.as_str(),
                    if key.allow_model_selection { "open" } else { "locked" },
                    key.default_model
                );
            }
        }
        KeyCommand::Create {
            email,
            organization,
            inactive,
        } => {
            let request = KeyCreateRequest {
                email,
                organization,
                status: if inactive { KeyStatus::Inactive } else { KeyStatus::Active },
            };
            let created = client.create_key(credential, &request).await?;
            println!("Key {} issued to {}", created.key.id, created.user.email);
            println!("Value: {}", created.key.value);
        }
        KeyCommand::AllowModel { id, enable, disable } => {
            let update = KeyUpdate::allow_model_selection(enable && !disable);
            let key = client.update_key(credential, id, &update).await?;
            println!("Model selection for {}: {}", key.id, key.allow_model_selection);
        }
        KeyCommand::SetStatus { id, status } => {
            let key = client
                .update_key(credential, id, &KeyUpdate::status(status))
                .await?;
            println!("Key {} is now {}", key.id, key.status);
        }
        KeyCommand::Model { id, model, task } => {
            let update = match task {
                Some(task_id) => ModelSelectionUpdate::for_task(task_id, model),
                None => ModelSelectionUpdate::global(model),
            };
            let key = client.update_model_selection(credential, id, &update).await?;
            println!("Key {} default model: {}", key.id, key.default_model);
            if let Some(task_id) = task {
                println!("Task {} model: {}", task_id, key.model_for_task(task_id));
            }
        }
    }

    Ok(())
}

async fn run_account_command<C: ConsoleClientTrait>(
    client: &C,
    credential: &Credential,
    action: AccountCommand,
) -> Result<()> {
    match action {
        AccountCommand::List => {
            let accounts = client.list_accounts(credential).await?;

            println!("{:<38} {:<24} {:<8} {}", "ID", "Label", "Status", "Key");
            println!("{}", "-".repeat(86));
            for account in &accounts {
                println!(
                    "{:<38} {:<24} {:<8} {}",
                    account.id,
                    truncate(&account.label, 24),
                    account.status,
                    account.link_label()
                );
            }
        }
        AccountCommand::Create { label, credentials } => {
            let request = AccountCreateRequest {
                label,
                credentials,
                status: AccountStatus::Ready,
            };
            let account = client.create_account(credential, &request).await?;
            println!("Account {} created ({})", account.id, account.label);
        }
        AccountCommand::Assign { account, key } => {
            let updated = client.assign_account(credential, account, key).await?;
            println!("Account {} {}", updated.id, updated.link_label());
        }
    }

    Ok(())
}

async fn run_conversation_command<C: ConsoleClientTrait>(
    client: &C,
    credential: &Credential,
    action: ConversationCommand,
) -> Result<()> {
    match action {
        ConversationCommand::List { task, ids } => {
            let list = client.list_conversations(credential, task, &ids).await?;

            println!("Task {} ({})", list.task_id, list.status);
            for conversation in &list.conversations {
                println!(
                    "  {} via {} [{}] {}",
                    conversation.id,
                    conversation.telegram_account_id,
                    conversation.status,
                    conversation.result.as_deref().unwrap_or("")
                );
            }
        }
        ConversationCommand::Submit { task, accounts } => {
            let updated = client.submit_conversations(credential, task, &accounts).await?;
            println!(
                "Started {} conversations; task now has {}",
                accounts.len(),
                updated.conversations.len()
            );
        }
    }

    Ok(())
}

fn print_summary(summary: &DashboardSummary) {
    println!();
    println!("Outreach Summary");
    println!("================");
    println!();
    println!("Tasks: {}    Dialogues: {}", summary.task_count, summary.dialogue_count);
    println!();

    println!("{:<20} {:>8} {:>8}", "Metric", "Average", "Samples");
    println!("{}", "-".repeat(38));
    for (metric, average) in &summary.metrics {
        if average.has_data() {
            println!("{:<20} {:>8.1} {:>8}", metric.label(), average.value, average.samples);
        } else {
            println!("{:<20} {:>8.1} {:>8}", metric.label(), average.value, "no data");
        }
    }
    println!();

    let conversion = &summary.conversion;
    println!(
        "Completed: {}  Failed: {}  In progress: {}",
        conversion.completed, conversion.failed, conversion.in_progress
    );
    println!("Conversion rate: {:.1}%", conversion.rate);
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{cut}...")
}

/// @ai:effects fs:read
fn load_or_default_config(path: Option<&Path>) -> Result<ConsoleConfig> {
    match path {
        Some(p) => ConsoleConfig::load(p)
            .with_context(|| format!("Failed to load config {}", p.display())),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);

            if default_path.exists() {
                Ok(ConsoleConfig::load(default_path)?)
            } else {
                Ok(ConsoleConfig::default())
            }
        }
    }
}

fn init_config(output: &Path) -> Result<()> {
    let config = ConsoleConfig::default();
    config.save(output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}
