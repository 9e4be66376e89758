//! The menu loop.

use std::io;

use rollcall_core::{
    Course, CourseCode, Instructor, InstructorId, Quota, Record, Registration, Student,
    StudentNumber,
};
use rollcall_mutation::EnrollLimits;
use rollcall_session::{Database, SessionError, SessionResult};

use crate::prompt::{read_line, read_u32, read_word};

/// Menu state.
pub struct Repl {
    db: Database,
    /// Quarter limits, asked for once before the first enrollment.
    limits: Option<EnrollLimits>,
}

impl Repl {
    /// Create a new menu over `db`.
    pub fn new(db: Database) -> Self {
        Self { db, limits: None }
    }

    /// Run the menu until the user exits.
    pub fn run(&mut self) -> io::Result<()> {
        println!("Select the operation you want to perform:");
        println!("Enter '1', for adding Instructor, Course, Student or Registration record.");
        println!("Enter '2', for removing Instructor, Course, Student or Registration record.");
        println!("Enter '3', for updating Instructor, Course or Student record.");
        println!("Enter '4', for listing operations.");
        println!("Enter '5', for terminating the program.");
        loop {
            println!("\n('1' -> Add, '2' -> Remove, '3' -> Update, '4' -> List, '5' -> Exit)");
            match read_line("Please enter a valid operation number: ")?.as_str() {
                "1" => self.add_menu()?,
                "2" => self.remove_menu()?,
                "3" => self.update_menu()?,
                "4" => self.list_menu()?,
                "5" => {
                    println!("Program terminated.");
                    return Ok(());
                }
                _ => println!("Invalid operation number."),
            }
        }
    }

    fn add_menu(&mut self) -> io::Result<()> {
        println!("\nEnter '1', for adding Instructor.");
        println!("Enter '2', for adding Course.");
        println!("Enter '3', for adding Student.");
        println!("Enter '4', for adding Registration.\n");
        match read_line("Enter value: ")?.as_str() {
            "1" => {
                let instructor = self.prompt_instructor()?;
                self.report_add(self.db.add(Record::from(instructor)));
            }
            "2" => {
                let course = self.prompt_course()?;
                self.report_add(self.db.add(Record::from(course)));
            }
            "3" => {
                let student = self.prompt_student()?;
                self.report_add(self.db.add(Record::from(student)));
            }
            "4" => self.enroll_flow()?,
            _ => println!("Invalid operation number."),
        }
        Ok(())
    }

    fn remove_menu(&mut self) -> io::Result<()> {
        println!("\nEnter '1', for removing Instructor.");
        println!("Enter '2', for removing Course.");
        println!("Enter '3', for removing Student.");
        println!("Enter '4', for removing Registration.\n");
        match read_line("Enter value: ")?.as_str() {
            "1" => {
                println!("CAUTION: All of the courses taught by this instructor, and all the");
                println!("registrations made for those courses, will also get removed.");
                let id = read_u32("Enter the ID of the instructor you want to delete: ")?;
                let probe = Record::from(Instructor::with_id(InstructorId::new(id)));
                self.report_remove(self.db.remove(&probe));
            }
            "2" => {
                println!("CAUTION: All of the registrations made for the course will also get removed.");
                let code = read_word("Enter the code of the course you want to delete: ")?;
                let probe = Record::from(Course::with_code(code));
                self.report_remove(self.db.remove(&probe));
            }
            "3" => {
                println!("CAUTION: All of the registration records of the student will also get removed.");
                let number = read_u32("Enter the student number of the student you want to delete: ")?;
                let probe = Record::from(Student::with_number(StudentNumber::new(number)));
                self.report_remove(self.db.remove(&probe));
            }
            "4" => {
                let number = read_u32("Enter the student number for the registration you want to delete: ")?;
                self.print_courses_of_student(StudentNumber::new(number));
                let code = read_word("Enter the course code for removing registration: ")?;
                let probe = Record::from(Registration::with_pair(StudentNumber::new(number), code));
                self.report_remove(self.db.remove(&probe));
            }
            _ => println!("Invalid operation number."),
        }
        Ok(())
    }

    fn update_menu(&mut self) -> io::Result<()> {
        println!("\nEnter '1', for updating Instructor.");
        println!("Enter '2', for updating Course.");
        println!("Enter '3', for updating Student.\n");
        match read_line("Enter value: ")?.as_str() {
            "1" => {
                let id = read_u32("Enter the ID of the instructor you want to update: ")?;
                println!("\nEnter values for the updated version of the instructor:");
                let updated = self.prompt_instructor()?;
                let target = Record::from(Instructor::with_id(InstructorId::new(id)));
                self.report_update(self.db.update(&target, Record::from(updated)));
            }
            "2" => {
                let code = read_word("Enter the code of the course that you want to update: ")?;
                println!("\nEnter values for the updated version of the course:");
                let updated = self.prompt_course()?;
                let target = Record::from(Course::with_code(code));
                self.report_update(self.db.update(&target, Record::from(updated)));
            }
            "3" => {
                let number = read_u32("Enter the student number of the student that you want to update: ")?;
                println!("\nEnter values for the updated version of the student:");
                let updated = self.prompt_student()?;
                let target = Record::from(Student::with_number(StudentNumber::new(number)));
                self.report_update(self.db.update(&target, Record::from(updated)));
            }
            _ => println!("Invalid operation number."),
        }
        Ok(())
    }

    fn list_menu(&mut self) -> io::Result<()> {
        println!("\nEnter '1', for listing courses given by a specific instructor.");
        println!("Enter '2', for listing students registered for a specific course.");
        println!("Enter '3', for listing all courses a specific student is registered for.");
        println!("Enter '4', for printing the student list of a course to a file.\n");
        match read_line("Enter value: ")?.as_str() {
            "1" => {
                let id = read_u32("Enter the ID of the instructor: ")?;
                self.print_courses_by_instructor(InstructorId::new(id));
            }
            "2" => {
                let code = read_word("Enter the code of the course: ")?;
                self.print_students_in_course(CourseCode::new(code));
            }
            "3" => {
                let number = read_u32("Enter the student number: ")?;
                self.print_courses_of_student(StudentNumber::new(number));
            }
            "4" => {
                let code = read_word("Enter the code of the course: ")?;
                match self.db.export_roster(&CourseCode::new(code)) {
                    Ok(path) => {
                        println!("\nSuccessfully printed the students list to {}", path.display());
                    }
                    Err(e) => println!("ERROR: {}", e),
                }
            }
            _ => println!("Invalid selection."),
        }
        Ok(())
    }

    fn prompt_instructor(&self) -> io::Result<Instructor> {
        let id = read_u32("\nEnter the ID for the instructor: ")?;
        let name = read_line("Enter the name of the instructor: ")?;
        let surname = read_line("Enter the surname of the instructor: ")?;
        let title = read_line("Enter the title of the instructor: ")?;
        Ok(Instructor::new(InstructorId::new(id), name, surname, title))
    }

    fn prompt_course(&self) -> io::Result<Course> {
        let code = read_word("\nEnter the code for the course: ")?;
        let name = read_line("Enter the name of the course: ")?;
        let total = read_u32("Enter the quota for the course: ")?;
        let credit = read_u32("Enter the credit of the course: ")?;
        let instructor = read_u32("Enter the instructor ID for the course: ")?;
        Ok(Course::new(
            code,
            name,
            credit,
            Quota::new(0, total),
            InstructorId::new(instructor),
        ))
    }

    fn prompt_student(&self) -> io::Result<Student> {
        let number = read_u32("\nEnter student number for student: ")?;
        let name = read_line("Enter the name of the student: ")?;
        let surname = read_line("Enter the surname of the student: ")?;
        Ok(Student::new(StudentNumber::new(number), name, surname))
    }

    fn enroll_flow(&mut self) -> io::Result<()> {
        let limits = match self.limits {
            Some(limits) => limits,
            None => {
                let max_courses = read_u32(
                    "\nEnter the maximum number of courses that a student can register in a quarter: ",
                )?;
                let max_credits = read_u32(
                    "Enter the maximum number of credits that a student can use in a quarter: ",
                )?;
                let limits = EnrollLimits::new(max_courses, max_credits);
                self.limits = Some(limits);
                limits
            }
        };
        let number = read_u32("\nEnter the student number of the student: ")?;
        let code = read_word("Enter the course code: ")?;
        match self.db.enroll(&CourseCode::new(code), StudentNumber::new(number), limits) {
            Ok(outcome) => {
                if let Some(registration) = outcome.enrolled() {
                    println!(
                        "Successfully registered student {} for the course {}",
                        number,
                        registration.course.as_ref().map(CourseCode::as_str).unwrap_or("?"),
                    );
                }
            }
            Err(e) => self.report_error(e),
        }
        Ok(())
    }

    fn print_courses_by_instructor(&self, id: InstructorId) {
        match self.db.courses_by_instructor(id) {
            Ok(courses) => {
                println!("\nHere are all the courses given by instructor {}:\n", id);
                for course in courses {
                    println!("{}\n", course);
                }
            }
            Err(e) => println!("ERROR: {}", e),
        }
    }

    fn print_students_in_course(&self, code: CourseCode) {
        match self.db.students_in_course(&code) {
            Ok(students) => {
                println!("\nHere is the list of all students registered for the course {}:\n", code);
                for student in students {
                    println!("{}\n", student);
                }
            }
            Err(e) => println!("ERROR: {}", e),
        }
    }

    fn print_courses_of_student(&self, number: StudentNumber) {
        match self.db.courses_of_student(number) {
            Ok(courses) => {
                println!("\nHere is the list of all courses that student {} is registered for:\n", number);
                for course in courses {
                    println!("{}\n", course);
                }
            }
            Err(e) => println!("ERROR: {}", e),
        }
    }

    fn report_add(&self, result: SessionResult<rollcall_mutation::MutationOutcome>) {
        match result {
            Ok(outcome) => {
                if let Some(record) = outcome.record() {
                    println!("Added the {} with key {}.", record.kind(), record.key_string());
                }
            }
            Err(e) => self.report_error(e),
        }
    }

    fn report_remove(&self, result: SessionResult<rollcall_mutation::MutationOutcome>) {
        match result {
            Ok(outcome) => {
                if let Some(record) = outcome.record() {
                    println!("Removed the {} with key {}.", record.kind(), record.key_string());
                }
                let cascaded = outcome.cascaded_registrations();
                if cascaded > 0 {
                    println!("({} registrations were cancelled along the way.)", cascaded);
                }
            }
            Err(e) => self.report_error(e),
        }
    }

    fn report_update(&self, result: SessionResult<rollcall_mutation::MutationOutcome>) {
        match result {
            Ok(_) => println!("Updated successfully."),
            Err(e) => self.report_error(e),
        }
    }

    fn report_error(&self, error: SessionError) {
        println!("ERROR: {}", error);
    }
}
