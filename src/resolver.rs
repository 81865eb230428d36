// 🔗 Manager Resolution - technician → manager references
//
// Sources, in order:
//   1. managers already accepted earlier in this run's batch
//   2. the external manager store
// A manager defined on a LATER line is not visible yet: resolution depends
// on file order. Nothing is cached and the store is never written.

use crate::batch::Batch;
use crate::employee::{Manager, ManagerRef, ManagerSource};
use crate::error::{LineOutcome, RecordError};
use crate::store::ManagerDirectory;

/// A manager found by the resolver, with where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedManager {
    pub manager: Manager,
    pub source: ManagerSource,
}

impl ResolvedManager {
    /// Weak reference to attach to a technician
    pub fn to_ref(&self) -> ManagerRef {
        ManagerRef {
            identifier: self.manager.identifier().to_string(),
            source: self.source,
        }
    }
}

pub struct ManagerResolver<'a> {
    batch: &'a Batch,
    store: &'a dyn ManagerDirectory,
}

impl<'a> ManagerResolver<'a> {
    pub fn new(batch: &'a Batch, store: &'a dyn ManagerDirectory) -> Self {
        ManagerResolver { batch, store }
    }

    pub fn resolve(&self, identifier: &str) -> LineOutcome<ResolvedManager> {
        if let Some(manager) = self.batch.find_manager(identifier) {
            return Ok(ResolvedManager {
                manager: manager.clone(),
                source: ManagerSource::Batch,
            });
        }

        match self.store.find_manager_by_identifier(identifier) {
            Ok(Some(manager)) => Ok(ResolvedManager {
                manager,
                source: ManagerSource::Store,
            }),
            Ok(None) => Err(RecordError::ManagerNotFound {
                identifier: identifier.to_string(),
            }),
            Err(e) => Err(RecordError::ManagerLookupFailed {
                identifier: identifier.to_string(),
                message: format!("{:#}", e),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::{Employee, EmployeeCore};
    use crate::store::InMemoryStore;
    use anyhow::{anyhow, Result};
    use chrono::NaiveDate;

    fn manager(id: &str, last_name: &str) -> Manager {
        Manager::new(EmployeeCore {
            identifier: id.to_string(),
            last_name: last_name.to_string(),
            first_name: "Ann".to_string(),
            hire_date: NaiveDate::from_ymd_opt(2018, 3, 15).unwrap(),
            salary: 4000.0,
        })
    }

    struct BrokenDirectory;

    impl ManagerDirectory for BrokenDirectory {
        fn find_manager_by_identifier(&self, _identifier: &str) -> Result<Option<Manager>> {
            Err(anyhow!("database is locked"))
        }
    }

    #[test]
    fn test_resolves_from_batch_first() {
        let mut batch = Batch::new();
        batch.push(Employee::Manager(manager("M12345", "InBatch")));
        let store = InMemoryStore::with_employees(vec![Employee::Manager(manager("M12345", "InStore"))]);

        let resolved = ManagerResolver::new(&batch, &store).resolve("M12345").unwrap();

        assert_eq!(resolved.source, ManagerSource::Batch);
        assert_eq!(resolved.manager.core.last_name, "InBatch");
        assert_eq!(resolved.to_ref().identifier, "M12345");
    }

    #[test]
    fn test_falls_back_to_store() {
        let batch = Batch::new();
        let store = InMemoryStore::with_employees(vec![Employee::Manager(manager("M54321", "Stored"))]);

        let resolved = ManagerResolver::new(&batch, &store).resolve("M54321").unwrap();

        assert_eq!(resolved.source, ManagerSource::Store);
        assert_eq!(resolved.to_ref().source, ManagerSource::Store);
    }

    #[test]
    fn test_not_found_anywhere() {
        let batch = Batch::new();
        let store = InMemoryStore::new();

        let err = ManagerResolver::new(&batch, &store).resolve("M99999").unwrap_err();

        assert_eq!(
            err,
            RecordError::ManagerNotFound {
                identifier: "M99999".to_string()
            }
        );
    }

    #[test]
    fn test_store_failure_is_a_line_error() {
        let batch = Batch::new();
        let err = ManagerResolver::new(&batch, &BrokenDirectory)
            .resolve("M11111")
            .unwrap_err();

        assert!(matches!(err, RecordError::ManagerLookupFailed { .. }));
        assert!(err.to_string().contains("database is locked"));
    }
}
