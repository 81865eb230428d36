// 👤 Employee Records - tagged variant instead of a class hierarchy
//
// An employee is built only after every field of its subtype validated,
// and is never mutated afterwards. The identifier's first character
// tags the subtype: M = Manager, T = Technician, C = SalesRep.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// EMPLOYEE KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeKind {
    Manager,
    Technician,
    SalesRep,
}

impl EmployeeKind {
    /// Leading character of identifiers (and roster lines) of this kind
    pub fn prefix(&self) -> char {
        match self {
            EmployeeKind::Manager => 'M',
            EmployeeKind::Technician => 'T',
            EmployeeKind::SalesRep => 'C',
        }
    }

    pub fn from_prefix(c: char) -> Option<Self> {
        match c {
            'M' => Some(EmployeeKind::Manager),
            'T' => Some(EmployeeKind::Technician),
            'C' => Some(EmployeeKind::SalesRep),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeKind::Manager => "Manager",
            EmployeeKind::Technician => "Technician",
            EmployeeKind::SalesRep => "SalesRep",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Manager" => Some(EmployeeKind::Manager),
            "Technician" => Some(EmployeeKind::Technician),
            "SalesRep" => Some(EmployeeKind::SalesRep),
            _ => None,
        }
    }
}

// ============================================================================
// COMMON ATTRIBUTES
// ============================================================================

/// Attributes every employee carries, in roster column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeCore {
    pub identifier: String,
    pub last_name: String,
    pub first_name: String,
    pub hire_date: NaiveDate,
    pub salary: f64,
}

// ============================================================================
// SUBTYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manager {
    pub core: EmployeeCore,
}

impl Manager {
    pub fn new(core: EmployeeCore) -> Self {
        Manager { core }
    }

    pub fn identifier(&self) -> &str {
        &self.core.identifier
    }
}

/// Where a manager reference was resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManagerSource {
    /// Accepted earlier in the same run
    Batch,
    /// Already persisted before this run
    Store,
}

/// Weak Technician → Manager link: the identifier plus where it resolved.
/// The technician never owns the manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerRef {
    pub identifier: String,
    pub source: ManagerSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technician {
    pub core: EmployeeCore,
    pub grade: i32,
    pub manager: ManagerRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRep {
    pub core: EmployeeCore,
    pub annual_revenue: f64,
    pub performance: i32,
}

// ============================================================================
// EMPLOYEE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Employee {
    Manager(Manager),
    Technician(Technician),
    SalesRep(SalesRep),
}

impl Employee {
    pub fn kind(&self) -> EmployeeKind {
        match self {
            Employee::Manager(_) => EmployeeKind::Manager,
            Employee::Technician(_) => EmployeeKind::Technician,
            Employee::SalesRep(_) => EmployeeKind::SalesRep,
        }
    }

    pub fn core(&self) -> &EmployeeCore {
        match self {
            Employee::Manager(m) => &m.core,
            Employee::Technician(t) => &t.core,
            Employee::SalesRep(c) => &c.core,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.core().identifier
    }

    pub fn as_manager(&self) -> Option<&Manager> {
        match self {
            Employee::Manager(m) => Some(m),
            _ => None,
        }
    }
}

impl From<Manager> for Employee {
    fn from(m: Manager) -> Self {
        Employee::Manager(m)
    }
}

impl From<Technician> for Employee {
    fn from(t: Technician) -> Self {
        Employee::Technician(t)
    }
}

impl From<SalesRep> for Employee {
    fn from(c: SalesRep) -> Self {
        Employee::SalesRep(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core(id: &str) -> EmployeeCore {
        EmployeeCore {
            identifier: id.to_string(),
            last_name: "Doe".to_string(),
            first_name: "Jane".to_string(),
            hire_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            salary: 3000.0,
        }
    }

    #[test]
    fn test_kind_prefix_round_trip() {
        for kind in [EmployeeKind::Manager, EmployeeKind::Technician, EmployeeKind::SalesRep] {
            assert_eq!(EmployeeKind::from_prefix(kind.prefix()), Some(kind));
            assert_eq!(EmployeeKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EmployeeKind::from_prefix('X'), None);
    }

    #[test]
    fn test_employee_accessors() {
        let employee: Employee = Manager::new(core("M12345")).into();

        assert_eq!(employee.kind(), EmployeeKind::Manager);
        assert_eq!(employee.identifier(), "M12345");
        assert!(employee.as_manager().is_some());

        let tech: Employee = Technician {
            core: core("T23456"),
            grade: 3,
            manager: ManagerRef {
                identifier: "M12345".to_string(),
                source: ManagerSource::Batch,
            },
        }
        .into();
        assert_eq!(tech.kind(), EmployeeKind::Technician);
        assert!(tech.as_manager().is_none());
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let employee: Employee = SalesRep {
            core: core("C34567"),
            annual_revenue: 150000.0,
            performance: 4,
        }
        .into();

        let json = serde_json::to_value(&employee).unwrap();
        assert_eq!(json["kind"], "SalesRep");
        assert_eq!(json["core"]["identifier"], "C34567");
        assert_eq!(json["performance"], 4);
    }
}
