use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "minerva")]
#[command(about = "Hierarchical task and project manager", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the API server
    Serve {
        /// Port to listen on (defaults to the configured server_port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long, default_value = "free")]
        plan: String,
    },
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Manage projects
    Projects {
        #[command(subcommand)]
        command: ProjectCommand,
    },
    /// Edit a project's task tree
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// List saved projects
    List,
    /// Create a new project
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete a project by id
    Delete { project_id: i64 },
}

/// Task paths use dotted indices: `0.2.1` is the second child of the third
/// child of the first root task. An empty path addresses the root list.
#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Print the task tree with path labels
    List {
        /// Project id (defaults to the first project)
        #[arg(long)]
        project: Option<i64>,
    },
    /// Add a task under PATH (empty path targets the project root)
    Add {
        #[arg(long, default_value = "")]
        path: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        project: Option<i64>,
    },
    /// Mark the task at PATH completed
    Done {
        path: String,
        /// Mark it not-completed instead
        #[arg(long)]
        undo: bool,
        #[arg(long)]
        project: Option<i64>,
    },
    /// Remove the task at PATH
    Remove {
        path: String,
        #[arg(long)]
        project: Option<i64>,
    },
}
