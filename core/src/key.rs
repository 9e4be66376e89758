//! Key types for rollcall records.
//!
//! Every collection has exactly one unique key:
//! - Instructors and registrations carry surrogate integer ids
//! - Students are keyed by their student number
//! - Courses are keyed by their course code (exact byte equality)

use std::fmt;

/// Unique identifier for an instructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstructorId(pub u32);

impl InstructorId {
    /// Create a new InstructorId from a raw value.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for InstructorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A student's number, assigned by the institution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StudentNumber(pub u32);

impl StudentNumber {
    /// Create a new StudentNumber from a raw value.
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for StudentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A course code, e.g. `CS50` or `6.0001`.
///
/// Codes never contain whitespace and compare by exact bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CourseCode(pub String);

impl CourseCode {
    /// Create a new CourseCode from a raw string.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CourseCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for CourseCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

/// Unique identifier for a registration, assigned by the store at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationId(pub u32);

impl RegistrationId {
    /// Create a new RegistrationId from a raw value.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
