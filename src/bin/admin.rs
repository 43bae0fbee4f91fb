//! Command-line console for the RBAC administration backend.
//!
//! Logs in once, keeps the credential in the configured store and runs
//! menu, role, user and resource operations against the backend.
//!
//! # Usage
//!
//! ```bash
//! # Log in (prompts for password and captcha)
//! cargo run --bin admin -- login --user root
//!
//! # Browse menus
//! cargo run --bin admin -- menu tree
//! cargo run --bin admin -- menu locate /system/menu
//!
//! # Manage roles and users
//! cargo run --bin admin -- role list --page 1 --size 20
//! cargo run --bin admin -- user disable 42
//!
//! # End the session
//! cargo run --bin admin -- logout
//! ```
//!
//! # Environment Variables
//!
//! See [`admin_console::config`]. `.env` is loaded when present.
//!
//! # Session expiry
//!
//! When the backend answers 401 the command prints nothing for that call;
//! the session is torn down after the command and a new `login` is required.

use admin_console::application::services::{
    LoginService, MenuService, ResourceService, RoleService, UserService,
};
use admin_console::application::{Notifier, RequestGateway, SessionTeardown, TracingNotifier};
use admin_console::config::{self, Config, StoreKind};
use admin_console::domain::entities::{
    LoginForm, MenuQuery, MenuTreeNode, PageQuery, PasswordForm, ResourceQuery, RoleQuery,
    STATUS_ENABLED, UserQuery,
};
use admin_console::domain::{Outcome, SessionEvent, menu_nav};
use admin_console::error::ApiError;
use admin_console::infrastructure::store::{CredentialStore, FileStore, MemoryStore, RedisStore};
use admin_console::infrastructure::transport::ReqwestTransport;
use admin_console::telemetry;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Console for the RBAC administration backend.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Log in and store the issued credential
    Login {
        /// User name
        #[arg(short, long)]
        user: Option<String>,

        /// Captcha code (prompted after the captcha URL is shown if omitted)
        #[arg(short, long)]
        captcha: Option<String>,
    },

    /// End the session
    Logout,

    /// Show the logged in user
    Whoami,

    /// Change the password of the logged in user
    Password,

    /// Manage menus
    Menu {
        #[command(subcommand)]
        action: MenuAction,
    },

    /// Manage roles
    Role {
        #[command(subcommand)]
        action: RoleAction,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage API resources
    Resource {
        #[command(subcommand)]
        action: ResourceAction,
    },
}

/// Paging flags shared by list commands.
#[derive(Args, Clone, Copy)]
struct PageArgs {
    /// Page number (1-based)
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Page size
    #[arg(long, default_value_t = 20)]
    size: u32,
}

impl From<PageArgs> for PageQuery {
    fn from(args: PageArgs) -> Self {
        PageQuery::new(args.page, args.size)
    }
}

/// Targets of delete commands.
#[derive(Args)]
struct DeleteArgs {
    /// Record ids
    #[arg(required = true)]
    ids: Vec<String>,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,
}

#[derive(Subcommand)]
enum MenuAction {
    /// Print the navigable menu tree
    Tree,
    /// List menus page by page
    List {
        /// Filter by name
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one menu
    Show { id: String },
    /// Enable a menu
    Enable { id: String },
    /// Disable a menu
    Disable { id: String },
    /// Delete one or more menus
    Delete(DeleteArgs),
    /// Find the menu owning a route in your menu tree
    Locate { path: String },
}

#[derive(Subcommand)]
enum RoleAction {
    /// List roles page by page
    List {
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// List enabled roles in short form
    Select,
    Enable { id: String },
    Disable { id: String },
    /// Delete one or more roles
    Delete(DeleteArgs),
}

#[derive(Subcommand)]
enum UserAction {
    /// List users page by page
    List {
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    Enable { id: String },
    Disable { id: String },
    /// Delete a user
    Delete {
        id: String,
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ResourceAction {
    /// List resources page by page
    List {
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Delete one or more resources
    Delete(DeleteArgs),
}

/// Prints failed calls to stderr.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, error: &ApiError) {
        let status = if error.status == 0 {
            String::new()
        } else {
            format!(" [{}]", error.status)
        };
        eprintln!("{} {}{}", "✗".red().bold(), error.message.red(), status.bright_black());
    }
}

/// Services sharing one gateway.
struct Console {
    gateway: Arc<RequestGateway>,
    login: LoginService,
    menus: MenuService,
    roles: RoleService,
    users: UserService,
    resources: ResourceService,
}

impl Console {
    fn new(gateway: Arc<RequestGateway>) -> Self {
        Self {
            login: LoginService::new(gateway.clone()),
            menus: MenuService::new(gateway.clone()),
            roles: RoleService::new(gateway.clone()),
            users: UserService::new(gateway.clone()),
            resources: ResourceService::new(gateway.clone()),
            gateway,
        }
    }
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        // Gateway failures were already printed by the notifier.
        if e.downcast_ref::<ApiError>().is_none() {
            eprintln!("{} {:#}", "✗".red().bold(), e);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::load_from_env().context("Invalid configuration")?;
    telemetry::init(&config);
    config.print_summary();

    let store = build_store(&config).await?;
    let transport = Arc::new(
        ReqwestTransport::new(config.request_timeout()).context("Failed to build HTTP client")?,
    );

    // With JSON logging, failures go to the log stream.
    let notifier: Arc<dyn Notifier> = if config.log_format == "json" {
        Arc::new(TracingNotifier)
    } else {
        Arc::new(ConsoleNotifier)
    };

    let (session_tx, mut session_rx) = mpsc::channel::<SessionEvent>(16);
    let gateway = Arc::new(RequestGateway::new(
        config.gateway_config(),
        transport,
        store,
        Arc::new(session_tx),
        notifier,
    ));
    let console = Console::new(gateway.clone());

    let result = match cli.command {
        Commands::Login { user, captcha } => login(&console, user, captcha).await,
        Commands::Logout => logout(&console).await,
        Commands::Whoami => whoami(&console).await,
        Commands::Password => change_password(&console).await,
        Commands::Menu { action } => handle_menu_action(&console, action).await,
        Commands::Role { action } => handle_role_action(&console, action).await,
        Commands::User { action } => handle_user_action(&console, action).await,
        Commands::Resource { action } => handle_resource_action(&console, action).await,
    };

    // 401s seen during the command end the session now.
    let teardown = SessionTeardown::new(gateway);
    let mut expired = false;
    while let Ok(event) = session_rx.try_recv() {
        expired |= teardown.handle(event).await;
    }
    if expired {
        println!();
        println!(
            "{}",
            "⚠️  Session expired. Run `admin login` to sign in again.".yellow()
        );
    }

    result
}

/// Builds the credential store selected by `CONSOLE_STORE`.
async fn build_store(config: &Config) -> Result<Arc<dyn CredentialStore>> {
    let store: Arc<dyn CredentialStore> = match config.store {
        StoreKind::File => Arc::new(FileStore::new(config.store_path.clone())),
        StoreKind::Memory => Arc::new(MemoryStore::new()),
        StoreKind::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL must be set for the redis store")?;
            Arc::new(
                RedisStore::connect(url, config.store_key.clone())
                    .await
                    .context("Failed to connect credential store")?,
            )
        }
    };

    if !store.health_check().await {
        tracing::warn!("Credential store is not reachable");
    }

    Ok(store)
}

/// Turns a failed outcome into an error; the failure was already notified.
fn settle<T>(outcome: Outcome<T>) -> Result<T> {
    outcome.into_result().map_err(anyhow::Error::new)
}

fn confirm(prompt: &str, skip: bool) -> Result<bool> {
    if skip {
        return Ok(true);
    }

    let confirmed = Confirm::new().with_prompt(prompt).default(false).interact()?;
    if !confirmed {
        println!("{}", "❌ Cancelled".red());
    }
    Ok(confirmed)
}

fn status_label(status: i32) -> ColoredString {
    if status == STATUS_ENABLED {
        "ENABLED".green()
    } else {
        "DISABLED".red()
    }
}

fn print_total(shown: usize, total: Option<u64>) {
    println!();
    match total {
        Some(total) => println!(
            "  Showing {} of {}",
            shown.to_string().bright_white().bold(),
            total.to_string().bright_white().bold()
        ),
        None => println!("  Total: {}", shown.to_string().bright_white().bold()),
    }
    println!();
}

/// Logs in with interactive prompts.
///
/// # Flow
///
/// 1. Prompt for user name (or use provided)
/// 2. Prompt for password
/// 3. Fetch a captcha id and show the captcha image URL
/// 4. Prompt for the captcha code (or use provided)
/// 5. Post the login; the gateway stores the issued credential
async fn login(console: &Console, user: Option<String>, captcha: Option<String>) -> Result<()> {
    println!("{}", "🔑 Login".bright_blue().bold());
    println!();

    let user_name = match user {
        Some(u) => u,
        None => Input::new().with_prompt("User name").interact_text()?,
    };
    let password = Password::new().with_prompt("Password").interact()?;

    let captcha_id = settle(console.login.captcha_id().await)?.captcha_id;
    let captcha_code = match captcha {
        Some(c) => c,
        None => {
            if let Some(url) = console.login.captcha_url(&captcha_id, false) {
                println!("  Captcha: {}", url.bright_cyan());
            }
            Input::new().with_prompt("Captcha code").interact_text()?
        }
    };

    let form = LoginForm {
        user_name,
        password,
        captcha_id,
        captcha_code,
    };
    let credential = settle(console.login.login(&form).await)?;

    println!();
    if credential.access_token.is_empty() {
        println!("{}", "⚠️  Login was not accepted".yellow().bold());
        println!();
        return Ok(());
    }

    println!("{}", "✅ Logged in".green().bold());
    if let Some(expires_at) = credential.expires_at
        && let Some(at) = chrono::DateTime::from_timestamp(expires_at, 0)
    {
        println!(
            "  Session valid until {}",
            at.format("%Y-%m-%d %H:%M UTC").to_string().bright_black()
        );
    }
    println!();

    Ok(())
}

async fn logout(console: &Console) -> Result<()> {
    if console.gateway.current_credential().await.is_none() {
        println!("{}", "⚠️  Not logged in".yellow());
        return Ok(());
    }

    // The local credential is dropped even if the backend call fails.
    let _ = console.login.logout().await;
    println!("{}", "✅ Logged out".green().bold());
    Ok(())
}

async fn whoami(console: &Console) -> Result<()> {
    let user = settle(console.login.current_user().await)?;
    if user.user_name.is_empty() {
        println!("{}", "⚠️  Not logged in".yellow());
        return Ok(());
    }

    println!("  User:  {}", user.user_name.cyan());
    println!("  Name:  {}", user.real_name);
    println!("  Roles: {}", user.role_names.join(", ").bright_black());
    Ok(())
}

async fn change_password(console: &Console) -> Result<()> {
    println!("{}", "🔒 Change Password".bright_blue().bold());
    println!();

    let old_password = Password::new().with_prompt("Current password").interact()?;
    let new_password = Password::new()
        .with_prompt("New password")
        .with_confirmation("Repeat new password", "Passwords do not match")
        .interact()?;

    let form = PasswordForm {
        old_password,
        new_password,
    };
    settle(console.login.update_password(&form).await)?;

    println!();
    println!("{}", "✅ Password changed".green().bold());
    Ok(())
}

/// Dispatches menu commands.
async fn handle_menu_action(console: &Console, action: MenuAction) -> Result<()> {
    match action {
        MenuAction::Tree => {
            println!("{}", "📋 Menus".bright_blue().bold());
            println!();
            let tree = settle(console.menus.tree().await)?;
            print_tree(&tree.list, 0);
            println!();
        }
        MenuAction::List { name, page } => {
            let query = MenuQuery {
                name,
                ..MenuQuery::page(page.into())
            };
            let result = settle(console.menus.query(&query).await)?;

            println!(
                "  {:<24} {:<20} {:<10} {:<10}",
                "ID".bright_white().bold(),
                "Name".bright_white().bold(),
                "Type".bright_white().bold(),
                "Status".bright_white().bold()
            );
            println!("  {}", "─".repeat(70).bright_black());
            for menu in &result.list {
                let kind = menu.menu_kind().map(|k| k.label()).unwrap_or("?");
                println!(
                    "  {:<24} {:<20} {:<10} {}",
                    menu.record_id.bright_black(),
                    menu.name.cyan(),
                    kind,
                    status_label(menu.status)
                );
            }
            print_total(result.list.len(), result.pagination.map(|p| p.total));
        }
        MenuAction::Show { id } => {
            let menu = settle(console.menus.get(&id).await)?;
            println!("  ID:         {}", menu.record_id.bright_black());
            println!("  Code:       {}", menu.code);
            println!("  Name:       {}", menu.name.cyan());
            println!(
                "  Type:       {}",
                menu.menu_kind().map(|k| k.label()).unwrap_or("?")
            );
            println!("  Route:      {}", menu.path);
            println!("  Level code: {}", menu.level_code);
            println!("  Parent:     {}", menu.parent_id);
            println!("  Status:     {}", status_label(menu.status));
        }
        MenuAction::Enable { id } => {
            settle(console.menus.enable(&id).await)?;
            println!("{}", "✅ Menu enabled".green().bold());
        }
        MenuAction::Disable { id } => {
            settle(console.menus.disable(&id).await)?;
            println!("{}", "✅ Menu disabled".green().bold());
        }
        MenuAction::Delete(args) => {
            if !confirm(&format!("Delete {} menu(s)?", args.ids.len()), args.yes)? {
                return Ok(());
            }
            if let [id] = args.ids.as_slice() {
                settle(console.menus.delete(id).await)?;
            } else {
                settle(console.menus.delete_many(&args.ids).await)?;
            }
            println!("{}", "✅ Deleted".green().bold());
        }
        MenuAction::Locate { path } => {
            let tree = settle(console.login.menu_tree().await)?.list;
            let index = menu_nav::index_by_router(&tree);

            match menu_nav::find_node(&path, &index) {
                Some(node) => {
                    println!("  Menu:       {}", node.name.cyan());
                    println!("  Route:      {}", node.router);
                    println!("  Level code: {}", node.level_code);
                    println!(
                        "  Expand:     {}",
                        menu_nav::menu_keys(&path, &index, &tree).join(" > ")
                    );
                    println!(
                        "  Ancestors:  {}",
                        menu_nav::open_keys(node).join(" > ").bright_black()
                    );
                }
                None => println!("{}", format!("⚠️  No menu owns {}", path).yellow()),
            }
        }
    }

    Ok(())
}

fn print_tree(nodes: &[MenuTreeNode], depth: usize) {
    for node in nodes {
        let router = if node.router.is_empty() {
            String::new()
        } else {
            format!("  {}", node.router)
        };
        println!(
            "  {}{} {}{}",
            "  ".repeat(depth),
            node.name.cyan(),
            node.level_code.bright_black(),
            router.bright_black()
        );
        print_tree(&node.children, depth + 1);
    }
}

/// Dispatches role commands.
async fn handle_role_action(console: &Console, action: RoleAction) -> Result<()> {
    match action {
        RoleAction::List { name, page } => {
            let query = RoleQuery {
                name,
                ..RoleQuery::page(page.into())
            };
            let result = settle(console.roles.query(&query).await)?;

            println!(
                "  {:<24} {:<24} {:<8} {:<10}",
                "ID".bright_white().bold(),
                "Name".bright_white().bold(),
                "Order".bright_white().bold(),
                "Status".bright_white().bold()
            );
            println!("  {}", "─".repeat(70).bright_black());
            for role in &result.list {
                println!(
                    "  {:<24} {:<24} {:<8} {}",
                    role.record_id.bright_black(),
                    role.name.cyan(),
                    role.sequence,
                    status_label(role.status)
                );
            }
            print_total(result.list.len(), result.pagination.map(|p| p.total));
        }
        RoleAction::Select => {
            let result = settle(console.roles.select().await)?;
            for role in &result.list {
                println!("  {:<24} {}", role.record_id.bright_black(), role.name.cyan());
            }
            print_total(result.list.len(), None);
        }
        RoleAction::Enable { id } => {
            settle(console.roles.enable(&id).await)?;
            println!("{}", "✅ Role enabled".green().bold());
        }
        RoleAction::Disable { id } => {
            settle(console.roles.disable(&id).await)?;
            println!("{}", "✅ Role disabled".green().bold());
        }
        RoleAction::Delete(args) => {
            if !confirm(&format!("Delete {} role(s)?", args.ids.len()), args.yes)? {
                return Ok(());
            }
            if let [id] = args.ids.as_slice() {
                settle(console.roles.delete(id).await)?;
            } else {
                settle(console.roles.delete_many(&args.ids).await)?;
            }
            println!("{}", "✅ Deleted".green().bold());
        }
    }

    Ok(())
}

/// Dispatches user commands.
async fn handle_user_action(console: &Console, action: UserAction) -> Result<()> {
    match action {
        UserAction::List { name, page } => {
            let query = UserQuery {
                user_name: name,
                ..UserQuery::page(page.into())
            };
            let result = settle(console.users.query(&query).await)?;

            println!(
                "  {:<24} {:<16} {:<16} {:<24} {:<10}",
                "ID".bright_white().bold(),
                "User".bright_white().bold(),
                "Name".bright_white().bold(),
                "Roles".bright_white().bold(),
                "Status".bright_white().bold()
            );
            println!("  {}", "─".repeat(95).bright_black());
            for user in &result.list {
                println!(
                    "  {:<24} {:<16} {:<16} {:<24} {}",
                    user.record_id.bright_black(),
                    user.user_name.cyan(),
                    user.real_name,
                    user.role_names(),
                    status_label(user.status)
                );
            }
            print_total(result.list.len(), result.pagination.map(|p| p.total));
        }
        UserAction::Enable { id } => {
            settle(console.users.enable(&id).await)?;
            println!("{}", "✅ User enabled".green().bold());
        }
        UserAction::Disable { id } => {
            settle(console.users.disable(&id).await)?;
            println!("{}", "✅ User disabled".green().bold());
        }
        UserAction::Delete { id, yes } => {
            if !confirm(&format!("Delete user {}?", id), yes)? {
                return Ok(());
            }
            settle(console.users.delete(&id).await)?;
            println!("{}", "✅ Deleted".green().bold());
        }
    }

    Ok(())
}

/// Dispatches resource commands.
async fn handle_resource_action(console: &Console, action: ResourceAction) -> Result<()> {
    match action {
        ResourceAction::List { name, page } => {
            let query = ResourceQuery {
                name,
                ..ResourceQuery::page(page.into())
            };
            let result = settle(console.resources.query(&query).await)?;

            println!(
                "  {:<24} {:<20} {:<8} {:<30}",
                "ID".bright_white().bold(),
                "Code".bright_white().bold(),
                "Method".bright_white().bold(),
                "Path".bright_white().bold()
            );
            println!("  {}", "─".repeat(85).bright_black());
            for resource in &result.list {
                println!(
                    "  {:<24} {:<20} {:<8} {}",
                    resource.record_id.bright_black(),
                    resource.code.cyan(),
                    resource.method,
                    resource.path
                );
            }
            print_total(result.list.len(), result.pagination.map(|p| p.total));
        }
        ResourceAction::Delete(args) => {
            if !confirm(&format!("Delete {} resource(s)?", args.ids.len()), args.yes)? {
                return Ok(());
            }
            if let [id] = args.ids.as_slice() {
                settle(console.resources.delete(id).await)?;
            } else {
                settle(console.resources.delete_many(&args.ids).await)?;
            }
            println!("{}", "✅ Deleted".green().bold());
        }
    }

    Ok(())
}
