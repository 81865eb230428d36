// Employee Roster Import - Core Library
// Exposes all modules for use in the CLI and tests

pub mod error;          // Per-line and source error taxonomy
pub mod employee;       // Employee tagged variant + manager references
pub mod validators;     // Single-field validators
pub mod builders;       // Per-subtype record builders
pub mod resolver;       // Technician → manager resolution
pub mod classifier;     // Leading-character dispatch
pub mod batch;          // Line-by-line batch processor
pub mod store;          // Persistence interfaces + in-memory store
pub mod db;             // SQLite store
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{LineOutcome, RecordError, SourceError};
pub use employee::{
    Employee, EmployeeCore, EmployeeKind, Manager, ManagerRef, ManagerSource, SalesRep, Technician,
};
pub use validators::{GradeBounds, IdPattern, EMPLOYEE_ID_PATTERN, MANAGER_ID_PATTERN};
pub use builders::{
    builder_for, split_fields, BuildContext, ManagerBuilder, RecordBuilder, SalesRepBuilder,
    TechnicianBuilder,
};
pub use resolver::{ManagerResolver, ResolvedManager};
pub use classifier::LineClassifier;
pub use batch::{
    read_source, source_digest, write_rejections, REJECTION_HEADER,
    Batch, BatchProcessor, BatchRun, ImportReport, RejectedLine,
};
pub use store::{EmployeeRepository, InMemoryStore, ManagerDirectory};
pub use db::{
    AuditEntry, AuditKind, SqliteStore,
    setup_database, insert_employees, audit_trail,
    get_all_employees, find_manager_by_identifier, record_import_run, verify_count,
};
pub use config::ImportConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
