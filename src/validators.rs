// 🔍 Field Validators - one raw field in, typed value or classified failure out
// Pure functions, no state

use crate::error::{LineOutcome, RecordError};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// PATTERNS
// ============================================================================

/// Any employee identifier: subtype letter followed by five digits
pub const EMPLOYEE_ID_PATTERN: &str = "^[MTC][0-9]{5}$";

/// Manager identifiers only
pub const MANAGER_ID_PATTERN: &str = "^M[0-9]{5}$";

pub const DATE_FORMAT: &str = "%d/%m/%Y";

static EMPLOYEE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(EMPLOYEE_ID_PATTERN).unwrap());
static MANAGER_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(MANAGER_ID_PATTERN).unwrap());

// chrono accepts single-digit days and months, the roster layout does not
static DATE_SHAPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{2}/[0-9]{2}/[0-9]{4}$").unwrap());

/// Which identifier pattern a field must match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPattern {
    Employee,
    Manager,
}

impl IdPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdPattern::Employee => EMPLOYEE_ID_PATTERN,
            IdPattern::Manager => MANAGER_ID_PATTERN,
        }
    }

    fn regex(&self) -> &'static Regex {
        match self {
            IdPattern::Employee => &*EMPLOYEE_ID_RE,
            IdPattern::Manager => &*MANAGER_ID_RE,
        }
    }
}

// ============================================================================
// GRADE BOUNDS
// ============================================================================

/// Inclusive technician grade range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeBounds {
    pub min: i32,
    pub max: i32,
}

impl GradeBounds {
    pub fn new(min: i32, max: i32) -> Self {
        GradeBounds { min, max }
    }

    pub fn contains(&self, grade: i32) -> bool {
        (self.min..=self.max).contains(&grade)
    }
}

impl Default for GradeBounds {
    fn default() -> Self {
        GradeBounds { min: 1, max: 5 }
    }
}

// ============================================================================
// VALIDATORS
// ============================================================================

pub fn validate_identifier(value: &str, pattern: IdPattern) -> LineOutcome<String> {
    if pattern.regex().is_match(value) {
        Ok(value.to_string())
    } else {
        Err(RecordError::InvalidIdentifierFormat {
            value: value.to_string(),
            pattern: pattern.as_str().to_string(),
        })
    }
}

pub fn validate_date(value: &str) -> LineOutcome<NaiveDate> {
    if !DATE_SHAPE_RE.is_match(value) {
        return Err(RecordError::InvalidDateFormat {
            value: value.to_string(),
        });
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| RecordError::InvalidDateFormat {
        value: value.to_string(),
    })
}

/// No range check: zero and negative salaries are accepted
pub fn validate_salary(value: &str) -> LineOutcome<f64> {
    parse_decimal(value).ok_or_else(|| RecordError::InvalidSalary {
        value: value.to_string(),
    })
}

pub fn validate_revenue(value: &str) -> LineOutcome<f64> {
    parse_decimal(value).ok_or_else(|| RecordError::InvalidRevenue {
        value: value.to_string(),
    })
}

/// No range check
pub fn validate_performance(value: &str) -> LineOutcome<i32> {
    value.parse::<i32>().map_err(|_| RecordError::InvalidPerformance {
        value: value.to_string(),
    })
}

pub fn validate_grade(value: &str, bounds: GradeBounds) -> LineOutcome<i32> {
    let invalid = || RecordError::InvalidGrade {
        value: value.to_string(),
        min: bounds.min,
        max: bounds.max,
    };

    let grade = value.parse::<i32>().map_err(|_| invalid())?;
    if bounds.contains(grade) {
        Ok(grade)
    } else {
        Err(invalid())
    }
}

/// Surrounding whitespace is ignored; NaN and infinities are refused
fn parse_decimal(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

// ============================================================================
// TESTS
// ============================================================================
