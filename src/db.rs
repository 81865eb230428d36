use crate::batch::ImportReport;
use crate::employee::{
    Employee, EmployeeCore, EmployeeKind, Manager, ManagerRef, ManagerSource, SalesRep, Technician,
};
use crate::store::{EmployeeRepository, ManagerDirectory};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tracing::{info, warn};

const STORED_DATE_FORMAT: &str = "%Y-%m-%d";

const EMPLOYEE_COLUMNS: &str = "identifier, kind, last_name, first_name, hire_date, salary,
                                grade, manager_identifier, annual_revenue, performance";

/// What an audit entry records, and what its subject identifies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditKind {
    /// Subject: employee identifier
    EmployeeImported,
    /// Subject: source digest, or the source path when it could not be read
    BatchImported,
}

impl AuditKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditKind::EmployeeImported => "employee_imported",
            AuditKind::BatchImported => "batch_imported",
        }
    }
}

/// One row of the audit log
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub entry_id: String,
    pub recorded_at: DateTime<Utc>,
    pub kind: AuditKind,
    pub subject: String,
    pub data: serde_json::Value,
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // ==========================================================================
    // Employees Table (one row per identifier, subtype columns nullable)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS employees (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            identifier TEXT UNIQUE NOT NULL,
            kind TEXT NOT NULL,
            last_name TEXT NOT NULL,
            first_name TEXT NOT NULL,
            hire_date TEXT NOT NULL,
            salary REAL NOT NULL,
            -- Technician
            grade INTEGER,
            manager_identifier TEXT,
            -- SalesRep
            annual_revenue REAL,
            performance INTEGER,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // ==========================================================================
    // Audit Log (append-only)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS audit_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            entry_id TEXT UNIQUE NOT NULL,
            recorded_at TEXT NOT NULL,
            kind TEXT NOT NULL,
            subject TEXT NOT NULL,
            data TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_employees_kind ON employees(kind)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_employees_manager ON employees(manager_identifier)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_audit_subject ON audit_log(kind, subject)",
        [],
    )?;

    Ok(())
}

/// Insert employees; identifiers already stored are skipped and counted as duplicates
pub fn insert_employees(conn: &Connection, employees: &[Employee]) -> Result<usize> {
    let mut inserted = 0;
    let mut duplicates = 0;

    for employee in employees {
        let core = employee.core();
        let (grade, manager_identifier, annual_revenue, performance) = match employee {
            Employee::Manager(_) => (None, None, None, None),
            Employee::Technician(t) => (Some(t.grade), Some(t.manager.identifier.as_str()), None, None),
            Employee::SalesRep(c) => (None, None, Some(c.annual_revenue), Some(c.performance)),
        };

        let result = conn.execute(
            "INSERT INTO employees (
                identifier, kind, last_name, first_name, hire_date, salary,
                grade, manager_identifier, annual_revenue, performance
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                core.identifier,
                employee.kind().as_str(),
                core.last_name,
                core.first_name,
                core.hire_date.format(STORED_DATE_FORMAT).to_string(),
                core.salary,
                grade,
                manager_identifier,
                annual_revenue,
                performance,
            ],
        );

        match result {
            Ok(_) => {
                inserted += 1;

                let data = serde_json::json!({
                    "kind": employee.kind().as_str(),
                    "salary": core.salary,
                });
                if let Err(e) = record_audit(conn, AuditKind::EmployeeImported, &core.identifier, &data) {
                    warn!("Could not record audit event for {}: {:#}", core.identifier, e);
                }
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                warn!("Skipping {}: identifier already stored", core.identifier);
                duplicates += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to insert employee {}", core.identifier))
            }
        }
    }

    info!("Inserted: {} employees, skipped duplicates: {}", inserted, duplicates);

    Ok(inserted)
}

fn record_audit(conn: &Connection, kind: AuditKind, subject: &str, data: &serde_json::Value) -> Result<()> {
    conn.execute(
        "INSERT INTO audit_log (entry_id, recorded_at, kind, subject, data)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            uuid::Uuid::new_v4().to_string(),
            Utc::now().to_rfc3339(),
            kind.as_str(),
            subject,
            serde_json::to_string(data)?,
        ],
    )?;

    Ok(())
}

/// Audit entries of one kind for one subject, oldest first
pub fn audit_trail(conn: &Connection, kind: AuditKind, subject: &str) -> Result<Vec<AuditEntry>> {
    let mut stmt = conn.prepare(
        "SELECT entry_id, recorded_at, data FROM audit_log
         WHERE kind = ?1 AND subject = ?2
         ORDER BY id",
    )?;

    let entries = stmt
        .query_map(params![kind.as_str(), subject], |row| {
            let recorded_at: String = row.get(1)?;
            let data: String = row.get(2)?;

            Ok(AuditEntry {
                entry_id: row.get(0)?,
                recorded_at: DateTime::parse_from_rfc3339(&recorded_at)
                    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?
                    .with_timezone(&Utc),
                kind,
                subject: subject.to_string(),
                data: serde_json::from_str(&data)
                    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(entries)
}

/// Record a finished run, keyed by the source digest
pub fn record_import_run(conn: &Connection, report: &ImportReport) -> Result<()> {
    let subject = if report.source_digest.is_empty() {
        report.source.as_str()
    } else {
        report.source_digest.as_str()
    };

    let data = serde_json::json!({
        "source": report.source,
        "lines_read": report.lines_read,
        "accepted": report.accepted,
        "persisted": report.persisted,
        "rejected": report.rejected.len(),
        "source_error": report.source_error,
    });

    record_audit(conn, AuditKind::BatchImported, subject, &data)
        .with_context(|| format!("Failed to record import run for {}", report.source))
}

fn row_to_employee(row: &Row<'_>) -> rusqlite::Result<Employee> {
    let kind_str: String = row.get(1)?;
    let kind = EmployeeKind::parse(&kind_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            Type::Text,
            anyhow!("unknown employee kind '{}'", kind_str).into(),
        )
    })?;

    let hire_date_str: String = row.get(4)?;
    let hire_date = NaiveDate::parse_from_str(&hire_date_str, STORED_DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    let core = EmployeeCore {
        identifier: row.get(0)?,
        last_name: row.get(2)?,
        first_name: row.get(3)?,
        hire_date,
        salary: row.get(5)?,
    };

    Ok(match kind {
        EmployeeKind::Manager => Employee::Manager(Manager::new(core)),
        // Anything read back was resolved in an earlier run
        EmployeeKind::Technician => Employee::Technician(Technician {
            core,
            grade: row.get(6)?,
            manager: ManagerRef {
                identifier: row.get(7)?,
                source: ManagerSource::Store,
            },
        }),
        EmployeeKind::SalesRep => Employee::SalesRep(SalesRep {
            core,
            annual_revenue: row.get(8)?,
            performance: row.get(9)?,
        }),
    })
}

pub fn find_manager_by_identifier(conn: &Connection, identifier: &str) -> Result<Option<Manager>> {
    let employee = conn
        .query_row(
            &format!(
                "SELECT {} FROM employees WHERE identifier = ?1 AND kind = ?2",
                EMPLOYEE_COLUMNS
            ),
            params![identifier, EmployeeKind::Manager.as_str()],
            row_to_employee,
        )
        .optional()
        .with_context(|| format!("Failed to look up manager {}", identifier))?;

    Ok(employee.and_then(|e| e.as_manager().cloned()))
}

pub fn get_all_employees(conn: &Connection) -> Result<Vec<Employee>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM employees ORDER BY id",
        EMPLOYEE_COLUMNS
    ))?;

    let employees = stmt
        .query_map([], row_to_employee)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(employees)
}

pub fn verify_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM employees", [], |row| row.get(0))?;

    Ok(count)
}

// ============================================================================
// SQLITE STORE
// ============================================================================

/// SQLite-backed employee store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        setup_database(&conn)?;
        Ok(SqliteStore { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        setup_database(&conn)?;
        Ok(SqliteStore { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn record_import_run(&self, report: &ImportReport) -> Result<()> {
        record_import_run(&self.conn, report)
    }
}

impl ManagerDirectory for SqliteStore {
    fn find_manager_by_identifier(&self, identifier: &str) -> Result<Option<Manager>> {
        find_manager_by_identifier(&self.conn, identifier)
    }
}

impl EmployeeRepository for SqliteStore {
    fn save_all(&mut self, employees: &[Employee]) -> Result<usize> {
        insert_employees(&self.conn, employees)
    }
}
