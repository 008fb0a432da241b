use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::schema::SCHEMA;
use super::{ProjectFilter, Store};
use crate::error::{Error, Result};
use crate::types::{FileMap, Project};

const PROJECT_COLUMNS: &str = "id, name, files, owner_id, is_public, created_at, updated_at";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory database. Contents vanish when the store is dropped.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a guard to the underlying database connection.
    /// This allows consuming applications to execute custom SQL.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

/// Fixed-width so that text ordering in SQL matches chronological ordering.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    let files_json: String = row.get(2)?;
    let files: FileMap = serde_json::from_str(&files_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        files,
        owner_id: row.get(3)?,
        is_public: row.get(4)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
        updated_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    fn create_project(&self, project: &Project) -> Result<()> {
        let files = serde_json::to_string(&project.files)?;
        self.conn().execute(
            "INSERT INTO projects (id, name, files, owner_id, is_public, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                project.id,
                project.name,
                files,
                project.owner_id,
                project.is_public,
                format_datetime(&project.created_at),
                format_datetime(&project.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"),
            params![id],
            project_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_projects(&self, filter: ProjectFilter<'_>) -> Result<Vec<Project>> {
        let conn = self.conn();
        let order = "ORDER BY updated_at DESC, id";

        let rows = match filter {
            ProjectFilter::Public => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {PROJECT_COLUMNS} FROM projects WHERE is_public = 1 {order}"
                ))?;
                let projects = stmt
                    .query_map([], project_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>();
                projects
            }
            ProjectFilter::VisibleTo(subject) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {PROJECT_COLUMNS} FROM projects
                     WHERE is_public = 1 OR owner_id = ?1 {order}"
                ))?;
                let projects = stmt
                    .query_map(params![subject], project_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>();
                projects
            }
            ProjectFilter::OwnedBy(subject) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {PROJECT_COLUMNS} FROM projects WHERE owner_id = ?1 {order}"
                ))?;
                let projects = stmt
                    .query_map(params![subject], project_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>();
                projects
            }
        };

        rows.map_err(Error::from)
    }

    fn update_project(&self, project: &Project) -> Result<()> {
        let files = serde_json::to_string(&project.files)?;
        let rows = self.conn().execute(
            "UPDATE projects SET name = ?1, files = ?2, owner_id = ?3, is_public = ?4, updated_at = ?5
             WHERE id = ?6",
            params![
                project.name,
                files,
                project.owner_id,
                project.is_public,
                format_datetime(&project.updated_at),
                project.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_project(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn close(&self) -> Result<()> {
        self.conn()
            .query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        Ok(())
    }
}
