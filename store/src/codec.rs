//! The labeled-line record codec.
//!
//! One attribute per line as `Label: value`, records separated by a single
//! blank line. Field order is fixed per kind and both directions of the
//! codec agree on it.

use rollcall_core::{
    Course, CourseCode, Instructor, InstructorId, Quota, Record, RecordKind, Registration,
    RegistrationId, Student, StudentNumber,
};

use crate::error::{StoreError, StoreResult};

/// Encode a record as its labeled-line block, trailing separator included.
pub fn encode(record: &Record) -> StoreResult<String> {
    if record.is_partial() {
        return Err(StoreError::partial_record(record.kind()));
    }
    let mut out = String::new();
    match record {
        Record::Instructor(i) => {
            push(&mut out, "ID", i.id);
            push(&mut out, "Name", i.name.as_deref().unwrap_or(""));
            push(&mut out, "Surname", i.surname.as_deref().unwrap_or(""));
            push(&mut out, "Title", i.title.as_deref().unwrap_or(""));
        }
        Record::Course(c) => {
            push(&mut out, "Course code", &c.code);
            push(&mut out, "Course name", c.name.as_deref().unwrap_or(""));
            push(&mut out, "Credit", c.credit);
            push(
                &mut out,
                "Quota",
                format_args!("{}/{}", c.quota.registered, c.quota.total),
            );
            push(&mut out, "Instructor ID", c.instructor.unwrap_or(InstructorId::new(0)));
        }
        Record::Student(s) => {
            push(&mut out, "Student number", s.number);
            push(&mut out, "Name", s.name.as_deref().unwrap_or(""));
            push(&mut out, "Surname", s.surname.as_deref().unwrap_or(""));
            push(&mut out, "Number of courses registered", s.courses_registered);
            push(&mut out, "Number of credits taken", s.credits_taken);
        }
        Record::Registration(r) => {
            push(&mut out, "ID", r.id.unwrap_or(RegistrationId::new(0)));
            push(&mut out, "Course code", r.course.as_ref().map(CourseCode::as_str).unwrap_or(""));
            push(&mut out, "Student number", r.student.unwrap_or(StudentNumber::new(0)));
            push(
                &mut out,
                "Still registered",
                if r.still_registered { "True" } else { "False" },
            );
            push(&mut out, "Registration date", r.date.as_deref().unwrap_or(""));
        }
    }
    out.push('\n');
    Ok(out)
}

fn push(out: &mut String, label: &str, value: impl std::fmt::Display) {
    out.push_str(label);
    out.push_str(": ");
    out.push_str(&value.to_string());
    out.push('\n');
}

/// Decode one record from exactly `kind.field_count()` attribute lines.
pub fn decode(kind: RecordKind, lines: &[String]) -> StoreResult<Record> {
    let collection = kind.collection_name();
    match kind {
        RecordKind::Instructor => Ok(Record::Instructor(Instructor {
            id: InstructorId::new(int(collection, lines, 0, "ID")?),
            name: Some(text(collection, lines, 1, "Name")?),
            surname: Some(text(collection, lines, 2, "Surname")?),
            title: Some(text(collection, lines, 3, "Title")?),
        })),
        RecordKind::Course => Ok(Record::Course(Course {
            code: CourseCode::new(text(collection, lines, 0, "Course code")?),
            name: Some(text(collection, lines, 1, "Course name")?),
            credit: int(collection, lines, 2, "Credit")?,
            quota: quota(collection, lines, 3)?,
            instructor: Some(InstructorId::new(int(collection, lines, 4, "Instructor ID")?)),
        })),
        RecordKind::Student => Ok(Record::Student(Student {
            number: StudentNumber::new(int(collection, lines, 0, "Student number")?),
            name: Some(text(collection, lines, 1, "Name")?),
            surname: Some(text(collection, lines, 2, "Surname")?),
            courses_registered: int(collection, lines, 3, "Number of courses registered")?,
            credits_taken: int(collection, lines, 4, "Number of credits taken")?,
        })),
        RecordKind::Registration => Ok(Record::Registration(Registration {
            id: Some(RegistrationId::new(int(collection, lines, 0, "ID")?)),
            course: Some(CourseCode::new(text(collection, lines, 1, "Course code")?)),
            student: Some(StudentNumber::new(int(collection, lines, 2, "Student number")?)),
            still_registered: text(collection, lines, 3, "Still registered")? != "False",
            date: Some(text(collection, lines, 4, "Registration date")?),
        })),
    }
}

fn raw<'a>(
    collection: &'static str,
    lines: &'a [String],
    index: usize,
    label: &str,
) -> StoreResult<&'a str> {
    let line = lines.get(index).ok_or_else(|| {
        StoreError::bad_record(collection, format!("record truncated before `{}`", label))
    })?;
    let value = line
        .strip_prefix(label)
        .and_then(|rest| rest.strip_prefix(':'))
        .ok_or_else(|| {
            StoreError::bad_record(collection, format!("expected `{}:`, got `{}`", label, line))
        })?;
    Ok(value.trim())
}

fn text(
    collection: &'static str,
    lines: &[String],
    index: usize,
    label: &str,
) -> StoreResult<String> {
    raw(collection, lines, index, label).map(str::to_string)
}

fn int(
    collection: &'static str,
    lines: &[String],
    index: usize,
    label: &str,
) -> StoreResult<u32> {
    let value = raw(collection, lines, index, label)?;
    value.parse().map_err(|_| {
        StoreError::bad_record(collection, format!("`{}` is not a number: `{}`", label, value))
    })
}

fn quota(collection: &'static str, lines: &[String], index: usize) -> StoreResult<Quota> {
    let value = raw(collection, lines, index, "Quota")?;
    let (registered, total) = value.split_once('/').ok_or_else(|| {
        StoreError::bad_record(collection, format!("`Quota` is not `n/m`: `{}`", value))
    })?;
    let parse = |part: &str| {
        part.trim().parse::<u32>().map_err(|_| {
            StoreError::bad_record(collection, format!("`Quota` is not `n/m`: `{}`", value))
        })
    };
    Ok(Quota::new(parse(registered)?, parse(total)?))
}
