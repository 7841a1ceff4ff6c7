mod cli;

use minerva::api::{self, AppState};
use minerva::client::{ApiClient, RegisterRequest, SessionStore};
use minerva::config::Config;
use minerva::project::{PLACEHOLDER_PROJECT_DESCRIPTION, Project, Task};
use minerva::storage::database;
use minerva::store::{ProjectStore, TaskEdit, path};
use minerva::utils::paths::{ensure_minerva_dir_exists, get_database_path, get_logs_dir};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use cli::{Cli, Commands, ProjectCommand, TaskCommand};
use std::fs;
use std::path::PathBuf;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Serve { port } => run_server(port.unwrap_or(config.server_port), &config),
        command => run_client_command(command, &config),
    }
}

fn resolve_database_path(config: &Config) -> Result<PathBuf> {
    match &config.database_path {
        Some(path) => Ok(path.clone()),
        None => {
            ensure_minerva_dir_exists()?;
            get_database_path()
        }
    }
}

#[tokio::main]
async fn run_server(port: u16, config: &Config) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let db_path = resolve_database_path(config)?;
    let conn = database::open_database(&db_path)?;
    let app = api::create_router(AppState::new(conn));

    let addr = format!("0.0.0.0:{port}");
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Client-side logging goes to a rolling file under ~/.minerva/logs so
/// command output stays clean. Level comes from RUST_LOG (default: info).
fn init_file_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let logs_dir = get_logs_dir().ok()?;
    if let Err(e) = fs::create_dir_all(&logs_dir) {
        eprintln!("Warning: Could not create logs directory: {}", e);
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "minerva.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    Some(guard)
}

#[tokio::main]
async fn run_client_command(command: Commands, config: &Config) -> Result<()> {
    // Guard must be kept alive for the duration of the command
    let _log_guard = init_file_logging();

    let session = SessionStore::load_default()?;
    let client = ApiClient::new(config.api_base_url.clone(), session)?;

    match command {
        Commands::Serve { .. } => unreachable!("serve is handled before client dispatch"),
        Commands::Register {
            email,
            password,
            first_name,
            last_name,
            plan,
        } => {
            let message = client
                .register(&RegisterRequest {
                    email,
                    password,
                    first_name,
                    last_name,
                    plan,
                })
                .await?;
            println!("{message}");
        }
        Commands::Login { email, password } => {
            let session = client.login(&email, &password).await?;
            println!(
                "Logged in as {} ({} plan)",
                session.email_address, session.plan
            );
        }
        Commands::Logout => {
            client.logout();
            println!("Logged out");
        }
        Commands::Projects { command } => handle_project_command(&client, command).await?,
        Commands::Task { command } => handle_task_command(&client, command).await?,
    }

    Ok(())
}

async fn handle_project_command(client: &ApiClient, command: ProjectCommand) -> Result<()> {
    match command {
        ProjectCommand::List => {
            let mut store = ProjectStore::new();
            store.fetch_projects(client).await?;

            for project in store.projects() {
                let marker = if project.is_placeholder() {
                    " (unsaved)"
                } else {
                    ""
                };
                println!(
                    "{:>6}  {:>3}%  {}{}",
                    project.project_id,
                    project.completion_percent(),
                    project.display_name(),
                    marker,
                );
            }
        }
        ProjectCommand::Create { name, description } => {
            let mut project = Project::placeholder();
            project.project_name = name;
            project.project_description = if description.is_empty() {
                PLACEHOLDER_PROJECT_DESCRIPTION.to_string()
            } else {
                description
            };

            let project_id = client.create_project(&project).await?;
            println!("Created project {project_id}");
        }
        ProjectCommand::Delete { project_id } => {
            let message = client.delete_project(project_id).await?;
            println!("{message}");
        }
    }
    Ok(())
}

async fn handle_task_command(client: &ApiClient, command: TaskCommand) -> Result<()> {
    match command {
        TaskCommand::List { project } => {
            let store = load_store(client, project).await?;
            let active = store.active_project().context("No projects found")?;

            println!("{} ({}% done)", active.display_name(), active.completion_percent());
            if active.tasks.is_empty() {
                println!("  (no tasks)");
            } else {
                print_task_tree(&active.tasks, &mut Vec::new());
            }
        }
        TaskCommand::Add {
            path: path_arg,
            name,
            description,
            project,
        } => {
            let mut store = load_store(client, project).await?;
            let task_path = path::parse_path(&path_arg)?;

            let mut task = match name {
                Some(name) => Task::new(name),
                None => Task::untitled(),
            };
            task.description = description;

            store.add_task(&task_path, task)?;
            push_active_project(client, &store).await?;
        }
        TaskCommand::Done {
            path: path_arg,
            undo,
            project,
        } => {
            let mut store = load_store(client, project).await?;
            let task_path = path::parse_path(&path_arg)?;

            store.edit_task(&task_path, TaskEdit::Completed(!undo))?;
            push_active_project(client, &store).await?;
        }
        TaskCommand::Remove { path: path_arg, project } => {
            let mut store = load_store(client, project).await?;
            let task_path = path::parse_path(&path_arg)?;

            let removed = store.delete_task(&task_path)?;
            println!("Removed '{}'", removed.display_name());
            push_active_project(client, &store).await?;
        }
    }
    Ok(())
}

/// Fetches the project list into a store and selects the requested project
/// (or keeps the default: the first one).
async fn load_store(client: &ApiClient, project_id: Option<i64>) -> Result<ProjectStore> {
    let mut store = ProjectStore::new();
    store.fetch_projects(client).await?;

    if let Some(id) = project_id {
        if !store.projects().iter().any(|p| p.project_id == id) {
            return Err(anyhow!("Project {id} not found"));
        }
        store.set_active_project_id(Some(id));
    }
    Ok(store)
}

/// Uploads the active project's current tree and waits for the answer; a
/// short-lived process cannot leave the write in flight.
async fn push_active_project(client: &ApiClient, store: &ProjectStore) -> Result<()> {
    let project = store.active_project().context("No active project")?;

    if project.is_placeholder() {
        let project_id = client.create_project(project).await?;
        println!("Saved as new project {project_id}");
    } else {
        let message = client.update_project(project).await?;
        println!("{message}");
    }
    Ok(())
}

fn print_task_tree(tasks: &[Task], prefix: &mut Vec<usize>) {
    for (index, task) in tasks.iter().enumerate() {
        prefix.push(index);
        let label = prefix
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".");
        let marker = if task.completed { "x" } else { " " };
        let indent = "  ".repeat(prefix.len() - 1);
        println!("{indent}[{marker}] {label}  {}", task.display_name());
        print_task_tree(&task.tasks, prefix);
        prefix.pop();
    }
}
