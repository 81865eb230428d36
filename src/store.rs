// 🗄️ Store Interfaces - what the import engine needs from persistence
//
// ManagerDirectory: narrow read-only lookup used by manager resolution
// EmployeeRepository: bulk save of the accepted batch, once per run

use crate::employee::{Employee, Manager};
use anyhow::Result;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{info, warn};

pub trait ManagerDirectory {
    /// Look up a persisted manager by identifier
    fn find_manager_by_identifier(&self, identifier: &str) -> Result<Option<Manager>>;
}

pub trait EmployeeRepository {
    /// Persist the accepted batch. Returns how many records were stored.
    /// An identifier that is already stored keeps its first record.
    fn save_all(&mut self, employees: &[Employee]) -> Result<usize>;
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// HashMap-backed store keyed by identifier. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    employees: HashMap<String, Employee>,
    save_calls: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with already-persisted employees
    pub fn with_employees<I: IntoIterator<Item = Employee>>(employees: I) -> Self {
        let mut store = Self::new();
        for employee in employees {
            store
                .employees
                .entry(employee.identifier().to_string())
                .or_insert(employee);
        }
        store
    }

    pub fn get(&self, identifier: &str) -> Option<&Employee> {
        self.employees.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Number of times save_all has been called
    pub fn save_calls(&self) -> usize {
        self.save_calls
    }
}

impl ManagerDirectory for InMemoryStore {
    fn find_manager_by_identifier(&self, identifier: &str) -> Result<Option<Manager>> {
        Ok(self
            .employees
            .get(identifier)
            .and_then(Employee::as_manager)
            .cloned())
    }
}

impl EmployeeRepository for InMemoryStore {
    fn save_all(&mut self, employees: &[Employee]) -> Result<usize> {
        self.save_calls += 1;
        let mut inserted = 0;
        let mut duplicates = 0;

        for employee in employees {
            match self.employees.entry(employee.identifier().to_string()) {
                Entry::Vacant(slot) => {
                    slot.insert(employee.clone());
                    inserted += 1;
                }
                Entry::Occupied(_) => {
                    warn!("Skipping {}: identifier already stored", employee.identifier());
                    duplicates += 1;
                }
            }
        }

        info!("Inserted: {} employees, skipped duplicates: {}", inserted, duplicates);

        Ok(inserted)
    }
}
