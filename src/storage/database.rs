//! SQLite persistence for the API server.
//!
//! Three tables: `users` (one row per account), `sessions` (bearer tokens
//! with an expiry), and `saved_projects` (one row per project, task tree
//! JSON-encoded in a TEXT column). Project deletes are soft: `deleted_at`
//! is set and listings filter it.
//!
//! Every helper takes `&Connection` so the server state and in-memory test
//! databases run the same code.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub plan: &'a str,
}

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub plan: String,
}

impl UserRecord {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            email: row.get(0)?,
            password_hash: row.get(1)?,
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            plan: row.get(4)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProjectRecord {
    pub project_id: i64,
    pub email: String,
    pub project_name: String,
    pub project_description: String,
    /// Raw TEXT column: a JSON-encoded task tree, or NULL
    pub tasks: Option<String>,
    pub updated_at: String,
}

impl ProjectRecord {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            project_id: row.get(0)?,
            email: row.get(1)?,
            project_name: row.get(2)?,
            project_description: row.get(3)?,
            tasks: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

const PROJECT_COLUMNS: &str =
    "project_id, email, project_name, project_description, tasks, updated_at";

pub fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database at {path:?}"))?;
    init_database(&conn)?;
    Ok(conn)
}

pub fn init_database(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            email TEXT PRIMARY KEY,
            password_hash TEXT NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            plan TEXT NOT NULL DEFAULT 'free',
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            email TEXT NOT NULL,
            created_at TEXT NOT NULL,
            expires_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS saved_projects (
            project_id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL,
            project_name TEXT NOT NULL,
            project_description TEXT NOT NULL,
            tasks TEXT,
            updated_at TEXT NOT NULL,
            deleted_at TEXT
        )",
        [],
    )?;

    Ok(())
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

// ----------------------------------------------------------------------
// Users
// ----------------------------------------------------------------------

pub fn insert_user(conn: &Connection, user: &NewUser) -> Result<()> {
    conn.execute(
        "INSERT INTO users (email, password_hash, first_name, last_name, plan, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.email,
            user.password_hash,
            user.first_name,
            user.last_name,
            user.plan,
            now_rfc3339(),
        ],
    )
    .context("Failed to insert user")?;
    Ok(())
}

pub fn find_user(conn: &Connection, email: &str) -> Result<Option<UserRecord>> {
    let user = conn
        .query_row(
            "SELECT email, password_hash, first_name, last_name, plan
             FROM users WHERE email = ?1",
            params![email],
            UserRecord::from_row,
        )
        .optional()?;
    Ok(user)
}

// ----------------------------------------------------------------------
// Sessions
// ----------------------------------------------------------------------

pub fn insert_session(
    conn: &Connection,
    token: &str,
    email: &str,
    expires_at: DateTime<Utc>,
) -> Result<()> {
    conn.execute(
        "INSERT INTO sessions (token, email, created_at, expires_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![token, email, now_rfc3339(), expires_at.to_rfc3339()],
    )
    .context("Failed to insert session")?;
    Ok(())
}

/// Resolves a bearer token to the owning email, ignoring expired rows.
pub fn find_session_email(conn: &Connection, token: &str) -> Result<Option<String>> {
    let email = conn
        .query_row(
            "SELECT email FROM sessions WHERE token = ?1 AND expires_at > ?2",
            params![token, now_rfc3339()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(email)
}

// ----------------------------------------------------------------------
// Projects
// ----------------------------------------------------------------------

pub fn insert_project(
    conn: &Connection,
    email: &str,
    project_name: &str,
    project_description: &str,
    tasks: Option<&str>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO saved_projects (email, project_name, project_description, tasks, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![email, project_name, project_description, tasks, now_rfc3339()],
    )
    .context("Failed to insert project")?;
    Ok(conn.last_insert_rowid())
}

pub fn list_projects(conn: &Connection, email: &str) -> Result<Vec<ProjectRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM saved_projects
         WHERE email = ?1 AND deleted_at IS NULL
         ORDER BY project_id"
    ))?;

    let projects = stmt
        .query_map(params![email], ProjectRecord::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(projects)
}

pub fn get_project(conn: &Connection, project_id: i64) -> Result<Option<ProjectRecord>> {
    let project = conn
        .query_row(
            &format!(
                "SELECT {PROJECT_COLUMNS} FROM saved_projects
                 WHERE project_id = ?1 AND deleted_at IS NULL"
            ),
            params![project_id],
            ProjectRecord::from_row,
        )
        .optional()?;
    Ok(project)
}

/// Updates only the supplied fields, always refreshing `updated_at`.
/// Returns false when no live row matches.
pub fn update_project(
    conn: &Connection,
    project_id: i64,
    project_name: Option<&str>,
    project_description: Option<&str>,
    tasks: Option<&str>,
) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE saved_projects SET
            project_name = COALESCE(?2, project_name),
            project_description = COALESCE(?3, project_description),
            tasks = COALESCE(?4, tasks),
            updated_at = ?5
         WHERE project_id = ?1 AND deleted_at IS NULL",
        params![project_id, project_name, project_description, tasks, now_rfc3339()],
    )?;
    Ok(changed > 0)
}

/// Marks the project deleted for this owner; the row stays around.
pub fn soft_delete_project(conn: &Connection, project_id: i64, email: &str) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE saved_projects SET deleted_at = ?3
         WHERE project_id = ?1 AND email = ?2 AND deleted_at IS NULL",
        params![project_id, email, now_rfc3339()],
    )?;
    Ok(changed > 0)
}
