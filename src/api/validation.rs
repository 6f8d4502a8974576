/// One failed field constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON name of the offending field
    pub field: &'static str,
    pub message: String,
}

impl Violation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// Client-facing line, e.g. `JSON Error: firstName must not be blank`
    pub fn describe(&self) -> String {
        format!("JSON Error: {} {}", self.field, self.message)
    }
}

/// Field constraints of a request input.
///
/// Violations come back in field declaration order.
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<Violation>>;
}

/// Render violations as the 400 response body entries
pub fn format_violations(violations: &[Violation]) -> Vec<String> {
    violations.iter().map(Violation::describe).collect()
}

/// Value must be present and contain at least one non-whitespace character
pub fn not_blank(field: &'static str, value: Option<&str>, violations: &mut Vec<Violation>) {
    if value.map_or(true, |v| v.trim().is_empty()) {
        violations.push(Violation::new(field, "must not be blank"));
    }
}

/// When present, value must be exactly `len` characters long
pub fn exact_length(
    field: &'static str,
    value: Option<&str>,
    len: usize,
    message: &str,
    violations: &mut Vec<Violation>,
) {
    if let Some(v) = value {
        if v.chars().count() != len {
            violations.push(Violation::new(field, message));
        }
    }
}
