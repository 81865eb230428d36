// 🏗️ Record Builders - one per employee subtype
//
// Each builder splits the raw line on ',' (no quoting), checks the field
// count, then runs its validators in a fixed order. The first failure
// aborts the line; an employee only exists once every check passed.
//
// Adding a subtype = implement RecordBuilder + one arm in builder_for().

use crate::employee::{Employee, EmployeeCore, EmployeeKind, Manager, SalesRep, Technician};
use crate::error::{LineOutcome, RecordError};
use crate::resolver::ManagerResolver;
use crate::validators::{
    validate_date, validate_grade, validate_identifier, validate_performance, validate_revenue,
    validate_salary, GradeBounds, IdPattern,
};

pub const FIELD_DELIMITER: char = ',';
pub const MANAGER_FIELD_COUNT: usize = 5;
pub const TECHNICIAN_FIELD_COUNT: usize = 7;
pub const SALES_REP_FIELD_COUNT: usize = 7;

// ============================================================================
// BUILD CONTEXT
// ============================================================================

/// What a builder may consult besides the line itself
pub struct BuildContext<'a> {
    pub resolver: ManagerResolver<'a>,
    pub grade_bounds: GradeBounds,
}

// ============================================================================
// FIELD SPLITTING
// ============================================================================

/// Split a line on commas. Trailing empty fields are dropped, so
/// "M12345,Doe,Jane,01/01/2020," counts 4 fields, not 5.
pub fn split_fields(line: &str) -> Vec<&str> {
    let mut fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    while fields.last().map_or(false, |f| f.is_empty()) {
        fields.pop();
    }
    fields
}

// ============================================================================
// BUILDER TRAIT
// ============================================================================

pub trait RecordBuilder: Send + Sync {
    fn kind(&self) -> EmployeeKind;

    fn field_count(&self) -> usize;

    /// Validate already-split fields. Only called with exactly field_count() fields.
    fn build_fields(&self, fields: &[&str], ctx: &BuildContext<'_>) -> LineOutcome<Employee>;

    fn build(&self, line: &str, ctx: &BuildContext<'_>) -> LineOutcome<Employee> {
        let fields = split_fields(line);
        if fields.len() != self.field_count() {
            return Err(RecordError::WrongFieldCount {
                expected: self.field_count(),
                actual: fields.len(),
            });
        }
        self.build_fields(&fields, ctx)
    }
}

/// Identifier, hire date, salary: the columns every subtype shares
fn build_core(fields: &[&str], pattern: IdPattern) -> LineOutcome<EmployeeCore> {
    let identifier = validate_identifier(fields[0], pattern)?;
    let hire_date = validate_date(fields[3])?;
    let salary = validate_salary(fields[4])?;

    Ok(EmployeeCore {
        identifier,
        last_name: fields[1].to_string(),
        first_name: fields[2].to_string(),
        hire_date,
        salary,
    })
}

// ============================================================================
// BUILDERS
// ============================================================================

pub struct ManagerBuilder;

impl RecordBuilder for ManagerBuilder {
    fn kind(&self) -> EmployeeKind {
        EmployeeKind::Manager
    }

    fn field_count(&self) -> usize {
        MANAGER_FIELD_COUNT
    }

    fn build_fields(&self, fields: &[&str], _ctx: &BuildContext<'_>) -> LineOutcome<Employee> {
        let core = build_core(fields, IdPattern::Manager)?;
        Ok(Manager::new(core).into())
    }
}

pub struct SalesRepBuilder;

impl RecordBuilder for SalesRepBuilder {
    fn kind(&self) -> EmployeeKind {
        EmployeeKind::SalesRep
    }

    fn field_count(&self) -> usize {
        SALES_REP_FIELD_COUNT
    }

    fn build_fields(&self, fields: &[&str], _ctx: &BuildContext<'_>) -> LineOutcome<Employee> {
        let core = build_core(fields, IdPattern::Employee)?;
        let annual_revenue = validate_revenue(fields[5])?;
        let performance = validate_performance(fields[6])?;

        Ok(SalesRep {
            core,
            annual_revenue,
            performance,
        }
        .into())
    }
}

pub struct TechnicianBuilder;

impl RecordBuilder for TechnicianBuilder {
    fn kind(&self) -> EmployeeKind {
        EmployeeKind::Technician
    }

    fn field_count(&self) -> usize {
        TECHNICIAN_FIELD_COUNT
    }

    fn build_fields(&self, fields: &[&str], ctx: &BuildContext<'_>) -> LineOutcome<Employee> {
        let core = build_core(fields, IdPattern::Employee)?;
        let grade = validate_grade(fields[5], ctx.grade_bounds)?;
        let manager_id = validate_identifier(fields[6], IdPattern::Manager)?;

        let manager = ctx.resolver.resolve(&manager_id)?.to_ref();

        Ok(Technician {
            core,
            grade,
            manager,
        }
        .into())
    }
}

/// Builder for a subtype (static dispatch table)
pub fn builder_for(kind: EmployeeKind) -> &'static dyn RecordBuilder {
    match kind {
        EmployeeKind::Manager => &ManagerBuilder,
        EmployeeKind::Technician => &TechnicianBuilder,
        EmployeeKind::SalesRep => &SalesRepBuilder,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::Batch;
    use crate::employee::ManagerSource;
    use crate::store::InMemoryStore;
    use chrono::NaiveDate;

    fn build(builder: &dyn RecordBuilder, line: &str, batch: &Batch) -> LineOutcome<Employee> {
        let store = InMemoryStore::new();
        let ctx = BuildContext {
            resolver: ManagerResolver::new(batch, &store),
            grade_bounds: GradeBounds::default(),
        };
        builder.build(line, &ctx)
    }

    fn batch_with_manager(line: &str) -> Batch {
        let mut batch = Batch::new();
        batch.push(build(&ManagerBuilder, line, &Batch::new()).unwrap());
        batch
    }

    #[test]
    fn test_split_fields_drops_trailing_empties() {
        assert_eq!(split_fields("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(split_fields("a,,c"), vec!["a", "", "c"]);
        assert_eq!(split_fields("a,b,,"), vec!["a", "b"]);
        assert!(split_fields("").is_empty());
    }

    #[test]
    fn test_manager_line() {
        let employee = build(&ManagerBuilder, "M12345,Doe,Jane,01/01/2020,3000.0", &Batch::new()).unwrap();

        let Employee::Manager(m) = employee else {
            panic!("expected a manager");
        };
        assert_eq!(m.core.identifier, "M12345");
        assert_eq!(m.core.last_name, "Doe");
        assert_eq!(m.core.first_name, "Jane");
        assert_eq!(m.core.hire_date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(m.core.salary, 3000.0);
    }

    #[test]
    fn test_manager_requires_manager_identifier() {
        let err = build(&ManagerBuilder, "M1234A,Doe,Jane,01/01/2020,3000.0", &Batch::new()).unwrap_err();
        assert!(matches!(err, RecordError::InvalidIdentifierFormat { .. }));
    }

    #[test]
    fn test_field_count_checked_before_content() {
        // Garbage in every field, but the count is what gets reported
        let err = build(&ManagerBuilder, "Mxx,a,b,c", &Batch::new()).unwrap_err();
        assert_eq!(err, RecordError::WrongFieldCount { expected: 5, actual: 4 });

        let err = build(&TechnicianBuilder, "T23456,Smith,John,01/01/2020,2500.0,3", &Batch::new()).unwrap_err();
        assert_eq!(err, RecordError::WrongFieldCount { expected: 7, actual: 6 });

        let err = build(&SalesRepBuilder, "C34567,Lee,Ann,01/01/2020,2800.0,1.0,4,extra", &Batch::new()).unwrap_err();
        assert_eq!(err, RecordError::WrongFieldCount { expected: 7, actual: 8 });

        // Empty salary at the end of the line disappears with the trailing split
        let err = build(&ManagerBuilder, "M12345,Doe,Jane,01/01/2020,", &Batch::new()).unwrap_err();
        assert_eq!(err, RecordError::WrongFieldCount { expected: 5, actual: 4 });
    }

    #[test]
    fn test_validation_order_stops_at_first_failure() {
        // Both date and salary are bad: the date is checked first
        let err = build(&ManagerBuilder, "M12345,Doe,Jane,2020-01-01,abc", &Batch::new()).unwrap_err();
        assert!(matches!(err, RecordError::InvalidDateFormat { .. }));

        let err = build(&ManagerBuilder, "M12345,Doe,Jane,01/01/2020,abc", &Batch::new()).unwrap_err();
        assert!(matches!(err, RecordError::InvalidSalary { .. }));
    }

    #[test]
    fn test_sales_rep_line() {
        let employee = build(&SalesRepBuilder, "C34567,Lee,Ann,01/01/2020,2800.0,150000.0,4", &Batch::new()).unwrap();

        let Employee::SalesRep(c) = employee else {
            panic!("expected a sales rep");
        };
        assert_eq!(c.core.identifier, "C34567");
        assert_eq!(c.annual_revenue, 150000.0);
        assert_eq!(c.performance, 4);
    }

    #[test]
    fn test_sales_rep_bad_revenue_then_performance() {
        let err = build(&SalesRepBuilder, "C34567,Lee,Ann,01/01/2020,2800.0,abc,x", &Batch::new()).unwrap_err();
        assert!(matches!(err, RecordError::InvalidRevenue { .. }));

        let err = build(&SalesRepBuilder, "C34567,Lee,Ann,01/01/2020,2800.0,10.0,x", &Batch::new()).unwrap_err();
        assert!(matches!(err, RecordError::InvalidPerformance { .. }));
    }

    #[test]
    fn test_technician_with_manager_in_batch() {
        let batch = batch_with_manager("M12345,Doe,Jane,01/01/2020,3000.0");

        let employee = build(&TechnicianBuilder, "T23456,Smith,John,01/01/2020,2500.0,3,M12345", &batch).unwrap();

        let Employee::Technician(t) = employee else {
            panic!("expected a technician");
        };
        assert_eq!(t.grade, 3);
        assert_eq!(t.manager.identifier, "M12345");
        assert_eq!(t.manager.source, ManagerSource::Batch);
    }

    #[test]
    fn test_technician_unknown_manager() {
        let err = build(&TechnicianBuilder, "T23456,Smith,John,01/01/2020,2500.0,3,M99999", &Batch::new()).unwrap_err();
        assert_eq!(
            err,
            RecordError::ManagerNotFound {
                identifier: "M99999".to_string()
            }
        );
    }

    #[test]
    fn test_technician_grade_out_of_range() {
        let batch = batch_with_manager("M12345,Doe,Jane,01/01/2020,3000.0");

        let err = build(&TechnicianBuilder, "T23456,Smith,John,01/01/2020,2500.0,9,M12345", &batch).unwrap_err();
        assert!(matches!(err, RecordError::InvalidGrade { .. }));
    }

    #[test]
    fn test_technician_manager_field_must_be_manager_identifier() {
        let err = build(&TechnicianBuilder, "T23456,Smith,John,01/01/2020,2500.0,3,C12345", &Batch::new()).unwrap_err();
        assert!(matches!(
            err,
            RecordError::InvalidIdentifierFormat { ref value, .. } if value == "C12345"
        ));
    }

    #[test]
    fn test_builder_for_matches_kind() {
        for kind in [EmployeeKind::Manager, EmployeeKind::Technician, EmployeeKind::SalesRep] {
            assert_eq!(builder_for(kind).kind(), kind);
        }
        assert_eq!(builder_for(EmployeeKind::Manager).field_count(), 5);
        assert_eq!(builder_for(EmployeeKind::Technician).field_count(), 7);
    }
}
