// 🧭 Line Classifier - first character picks the record builder
// M → Manager, T → Technician, C → SalesRep, anything else is refused

use crate::builders::{builder_for, BuildContext};
use crate::employee::{Employee, EmployeeKind};
use crate::error::{LineOutcome, RecordError};

pub struct LineClassifier;

impl LineClassifier {
    /// Subtype of a line, from its leading character only
    pub fn classify(line: &str) -> LineOutcome<EmployeeKind> {
        line.chars()
            .next()
            .and_then(EmployeeKind::from_prefix)
            .ok_or_else(|| RecordError::UnknownRecordType {
                line: line.to_string(),
            })
    }

    /// Classify, then hand the line to the matching builder
    pub fn process_line(line: &str, ctx: &BuildContext<'_>) -> LineOutcome<Employee> {
        let kind = Self::classify(line)?;
        builder_for(kind).build(line, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::Batch;
    use crate::resolver::ManagerResolver;
    use crate::store::InMemoryStore;
    use crate::validators::GradeBounds;

    #[test]
    fn test_classify_by_prefix() {
        assert_eq!(LineClassifier::classify("M12345,...").unwrap(), EmployeeKind::Manager);
        assert_eq!(LineClassifier::classify("T23456,...").unwrap(), EmployeeKind::Technician);
        assert_eq!(LineClassifier::classify("C34567,...").unwrap(), EmployeeKind::SalesRep);
    }

    #[test]
    fn test_unknown_prefix() {
        let err = LineClassifier::classify("X00000,Foo,Bar").unwrap_err();
        assert_eq!(
            err,
            RecordError::UnknownRecordType {
                line: "X00000,Foo,Bar".to_string()
            }
        );

        // Lowercase prefixes are not accepted
        assert!(LineClassifier::classify("m12345,Doe,Jane,01/01/2020,3000.0").is_err());
    }

    #[test]
    fn test_empty_line_is_unknown() {
        assert!(matches!(
            LineClassifier::classify(""),
            Err(RecordError::UnknownRecordType { .. })
        ));
    }

    #[test]
    fn test_process_line_dispatches() {
        let batch = Batch::new();
        let store = InMemoryStore::new();
        let ctx = BuildContext {
            resolver: ManagerResolver::new(&batch, &store),
            grade_bounds: GradeBounds::default(),
        };

        let employee = LineClassifier::process_line("C34567,Lee,Ann,01/01/2020,2800.0,150000.0,4", &ctx).unwrap();
        assert_eq!(employee.kind(), EmployeeKind::SalesRep);

        // Prefix says manager, shape says sales rep: the manager builder rejects it
        let err = LineClassifier::process_line("M34567,Lee,Ann,01/01/2020,2800.0,150000.0,4", &ctx).unwrap_err();
        assert_eq!(err, RecordError::WrongFieldCount { expected: 5, actual: 7 });
    }
}
