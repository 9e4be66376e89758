//! Record card rendering.
//!
//! The presentation layer prints records as bordered cards; the formats
//! here are the canonical ones listings and the interactive menu use.

use std::fmt;

use crate::{Course, Instructor, Record, Registration, Student};

fn opt(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or("")
}

impl fmt::Display for Instructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "###INSTRUCTOR RECORD###")?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Name: {}", opt(&self.name))?;
        writeln!(f, "Surname: {}", opt(&self.surname))?;
        writeln!(f, "Title: {}", opt(&self.title))?;
        write!(f, "#######################")
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "###COURSE RECORD###")?;
        writeln!(f, "Course code: {}", self.code)?;
        writeln!(f, "Course name: {}", opt(&self.name))?;
        writeln!(f, "Credit: {}", self.credit)?;
        writeln!(f, "Quota: {}/{}", self.quota.registered, self.quota.total)?;
        match self.instructor {
            Some(id) => writeln!(f, "Instructor ID: {}", id)?,
            None => writeln!(f, "Instructor ID:")?,
        }
        write!(f, "###################")
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "###STUDENT RECORD###")?;
        writeln!(f, "Student number: {}", self.number)?;
        writeln!(f, "Name: {}", opt(&self.name))?;
        writeln!(f, "Surname: {}", opt(&self.surname))?;
        writeln!(f, "Number of courses registered: {}", self.courses_registered)?;
        writeln!(f, "Number of credits taken: {}", self.credits_taken)?;
        write!(f, "#####################")
    }
}

impl fmt::Display for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "###REGISTRATION RECORD###")?;
        match self.id {
            Some(id) => writeln!(f, "ID: {}", id)?,
            None => writeln!(f, "ID:")?,
        }
        match self.student {
            Some(number) => writeln!(f, "Student number: {}", number)?,
            None => writeln!(f, "Student number:")?,
        }
        match &self.course {
            Some(code) => writeln!(f, "Course code: {}", code)?,
            None => writeln!(f, "Course code:")?,
        }
        writeln!(
            f,
            "Still registered: {}",
            if self.still_registered { "True" } else { "False" }
        )?;
        writeln!(f, "Registration date: {}", opt(&self.date))?;
        write!(f, "##########################")
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Instructor(i) => i.fmt(f),
            Record::Course(c) => c.fmt(f),
            Record::Student(s) => s.fmt(f),
            Record::Registration(r) => r.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InstructorId, Quota};

    #[test]
    fn test_course_card_shows_quota_as_fraction() {
        let course = Course::new("CS50UT", "CS50's Understanding Technology", 3, Quota::new(2, 9), InstructorId::new(4));
        let card = course.to_string();

        assert!(card.starts_with("###COURSE RECORD###"));
        assert!(card.contains("Quota: 2/9"));
        assert!(card.contains("Instructor ID: 4"));
    }

    #[test]
    fn test_partial_fields_render_empty() {
        let probe = Instructor::with_id(InstructorId::new(1));
        let card = probe.to_string();

        assert!(card.contains("ID: 1"));
        assert!(card.contains("Name: \n"));
    }
}
