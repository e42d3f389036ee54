use crate::error::Result;
use crate::manager::AttendanceManager;
use crate::models::Student;
use chrono::NaiveDate;

/// The state of one logged-in user: which class they opened, how, and the roster they last saw.
///
/// A session is created by a successful [`Session::login`] and handed to whatever front-end code
/// acts on that class.
#[derive(Debug, Clone)]
pub struct Session {
    class: String,
    password: String,
    is_admin: bool,
    students: Vec<Student>,
    last_absent: Vec<i32>,
}

impl Session {
    /// Authenticates against `class` and caches its roster. The session keeps the class name as
    /// stored, which may differ in case from `class`.
    pub fn login(manager: &mut AttendanceManager, class: &str, password: &str) -> Result<Self> {
        let students = manager.authenticate(class, password)?;
        let class = manager.resolve_class(class)?;
        let is_admin = manager.is_admin_password(password);

        tracing::info!(class = %class, is_admin, students = students.len(), "logged in");

        Ok(Self {
            class,
            password: password.to_string(),
            is_admin,
            students,
            last_absent: Vec::new(),
        })
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// The roster as of the last login or refresh, ordered by roll number.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// The roll numbers most recently marked absent through this session.
    pub fn last_absent(&self) -> &[i32] {
        &self.last_absent
    }

    /// Re-authenticates and reloads the cached roster.
    pub fn refresh(&mut self, manager: &mut AttendanceManager) -> Result<&[Student]> {
        self.students = manager.authenticate(&self.class, &self.password)?;
        Ok(&self.students)
    }

    /// Marks `rolls` absent in this session's class and remembers the selection.
    pub fn mark_absent(
        &mut self,
        manager: &mut AttendanceManager,
        rolls: &[i32],
        date: NaiveDate,
    ) -> Result<usize> {
        let marked = manager.mark_absent(&self.class, rolls, date)?;
        self.last_absent = rolls.to_vec();
        self.refresh(manager)?;

        Ok(marked)
    }
}
