use crate::calendar::{RestDays, date_column_name};
use crate::config::{DatabaseSettings, Settings};
use crate::engine::{Database, Statement, placeholders};
use crate::error::{AttendanceError, Result};
use crate::ident::{PASSWORD_TABLE, validate_class_name, validate_identifier};
use crate::models::{AttendanceEntry, AttendanceRow, AttendanceUpdate, NameRow, Status, Student};
use crate::password::hash_password;
use chrono::NaiveDate;

/// The most rows written by a single statement. Keeps `IN (...)` lists and multi-row inserts
/// well under the bound-parameter limits of both engines.
const ROWS_PER_STATEMENT: usize = 250;

/// The manager for recording, modifying, and retrieving attendance data.
///
/// The manager owns at most one connection, and every operation takes `&mut self`, so calls are
/// serialized by ownership. Wrap it in a `Mutex` to share it between threads.
pub struct AttendanceManager {
    settings: DatabaseSettings,
    admin_password: Option<String>,
    rest_days: RestDays,
    db: Option<Database>,
}

impl AttendanceManager {
    /// Creates a disconnected manager. The connection is opened by [`connect`](Self::connect) or
    /// lazily by the first operation that needs it.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: settings.database,
            admin_password: settings.admin_password,
            rest_days: settings.rest_days,
            db: None,
        }
    }

    /// Opens the connection if it is not already open.
    pub fn connect(&mut self) -> Result<()> {
        self.db().map(|_| ())
    }

    /// Closes the connection if it is open. Safe to call repeatedly.
    pub fn close(&mut self) {
        if self.db.take().is_some() {
            tracing::info!(database = %self.settings.describe(), "closed database connection");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.db.is_some()
    }

    fn db(&mut self) -> Result<&mut Database> {
        if self.db.is_none() {
            let db = Database::establish(&self.settings)?;
            tracing::info!(database = %self.settings.describe(), "connected to database");
            self.db = Some(db);
        }

        self.db
            .as_mut()
            .ok_or_else(|| AttendanceError::ConnectionFailure("connection was not opened".into()))
    }

    fn quote(&mut self, identifier: &str) -> Result<String> {
        Ok(self.db()?.dialect().quote(identifier))
    }

    /// Returns the names of every class table, in alphabetical order.
    pub fn list_class_tables(&mut self) -> Result<Vec<String>> {
        let db = self.db()?;
        let statement = db.dialect().list_tables();

        Ok(db
            .load::<NameRow>(&statement)?
            .into_iter()
            .map(|row| row.name)
            .filter(|name| !name.eq_ignore_ascii_case(PASSWORD_TABLE))
            .collect())
    }

    /// Returns the stored name of the class table `class` refers to, matching names the way the
    /// engine does.
    fn find_class(&mut self, class: &str) -> Result<Option<String>> {
        validate_class_name(class)?;

        let dialect = self.db()?.dialect();
        Ok(self
            .list_class_tables()?
            .into_iter()
            .find(|name| dialect.same_table(name, class)))
    }

    /// Validates `class` and returns the name its table is stored under. On sqlite, `cs101`
    /// resolves to an existing `CS101`.
    pub fn resolve_class(&mut self, class: &str) -> Result<String> {
        self.find_class(class)?
            .ok_or_else(|| AttendanceError::ClassNotFound(class.to_string()))
    }

    /// The stored name if the class exists, otherwise `class` itself.
    fn class_key(&mut self, class: &str) -> Result<String> {
        Ok(self.find_class(class)?.unwrap_or_else(|| class.to_string()))
    }

    /// Creates the table for a new class. Does nothing if the class already exists.
    pub fn create_class_table(&mut self, class: &str) -> Result<()> {
        self.ensure_class_table(class).map(|_| ())
    }

    /// Creates the class table if needed and returns its stored name.
    fn ensure_class_table(&mut self, class: &str) -> Result<String> {
        if let Some(existing) = self.find_class(class)? {
            tracing::debug!(class = %existing, "class table already exists");
            return Ok(existing);
        }

        let db = self.db()?;
        let statement = db.dialect().create_class_table(class);
        db.execute(&statement)?;

        tracing::info!(class, "created class table");
        Ok(class.to_string())
    }

    /// Sets or replaces the password of a class.
    pub fn set_class_password(&mut self, class: &str, password: &str) -> Result<()> {
        let class = self.class_key(class)?;

        let hash = hash_password(password);
        self.db()?.upsert_password_hash(&class, &hash)?;

        tracing::info!(class = %class, "updated class password");
        Ok(())
    }

    /// Returns the stored password hash of a class, if one was ever set.
    pub fn get_class_password_hash(&mut self, class: &str) -> Result<Option<String>> {
        let class = self.class_key(class)?;

        Ok(self.db()?.password_hash(&class)?)
    }

    /// Whether `password` is the configured admin override.
    pub fn is_admin_password(&self, password: &str) -> bool {
        self.admin_password
            .as_deref()
            .is_some_and(|admin| admin == password)
    }

    /// Checks `password` against the class password (or the admin override) and returns the
    /// class roster ordered by roll number.
    pub fn authenticate(&mut self, class: &str, password: &str) -> Result<Vec<Student>> {
        let class = self.resolve_class(class)?;

        if self.is_admin_password(password) {
            tracing::warn!(class = %class, "admin override used to open class");
            return self.roster(&class);
        }

        let stored = self
            .db()?
            .password_hash(&class)?
            .ok_or_else(|| AttendanceError::NoPasswordSet(class.clone()))?;

        if stored != hash_password(password) {
            tracing::info!(class = %class, "rejected login with incorrect password");
            return Err(AttendanceError::AuthenticationFailed);
        }

        self.roster(&class)
    }

    fn roster(&mut self, class: &str) -> Result<Vec<Student>> {
        let table = self.quote(class)?;
        let statement = Statement::new(format!(
            "SELECT Roll_no AS roll_no, Student_name AS name FROM {table} ORDER BY Roll_no"
        ));

        Ok(self.db()?.load::<Student>(&statement)?)
    }

    fn column_exists(&mut self, table: &str, column: &str) -> Result<bool> {
        let db = self.db()?;
        let statement = db.dialect().list_columns(table);

        Ok(db
            .load::<NameRow>(&statement)?
            .iter()
            .any(|row| row.name.eq_ignore_ascii_case(column)))
    }

    /// Adds the attendance column for `date` to `table` unless it is already there. Returns
    /// whether the column was added.
    fn ensure_date_column(&mut self, table: &str, date: NaiveDate) -> Result<bool> {
        let column = date_column_name(date);

        if self.column_exists(table, &column)? {
            return Ok(false);
        }

        let db = self.db()?;
        let statement = db.dialect().add_date_column(table, &column);
        db.execute(&statement)
            .map_err(|source| AttendanceError::SchemaMigrationFailure {
                table: table.to_string(),
                column: column.clone(),
                source,
            })?;

        tracing::info!(table, column = %column, "added attendance column");
        Ok(true)
    }

    /// Opens the attendance column for `date` in every class, unless `date` is a rest day.
    ///
    /// Returns the number of classes that gained a column.
    pub fn ensure_today_columns(&mut self, date: NaiveDate) -> Result<usize> {
        if self.rest_days.contains(date) {
            tracing::debug!(%date, "rest day, no attendance columns added");
            return Ok(0);
        }

        let mut added = 0;
        for table in self.list_class_tables()? {
            validate_identifier(&table)?;

            if self.ensure_date_column(&table, date)? {
                added += 1;
            }
        }

        Ok(added)
    }

    /// Marks every student in `class` present on `date`.
    pub fn mark_all_present(&mut self, class: &str, date: NaiveDate) -> Result<usize> {
        let class = self.resolve_class(class)?;
        self.ensure_date_column(&class, date)?;

        let table = self.quote(&class)?;
        let column = self.quote(&date_column_name(date))?;
        let statement = Statement::new(format!("UPDATE {table} SET {column} = ?"))
            .text(Status::Present.as_str());

        Ok(self.db()?.execute(&statement)?)
    }

    /// Marks exactly the students with the given roll numbers absent on `date`.
    pub fn mark_absent(&mut self, class: &str, rolls: &[i32], date: NaiveDate) -> Result<usize> {
        validate_class_name(class)?;

        if rolls.is_empty() {
            return Ok(0);
        }

        let class = self.resolve_class(class)?;
        self.ensure_date_column(&class, date)?;

        let table = self.quote(&class)?;
        let column = self.quote(&date_column_name(date))?;
        let statements: Vec<Statement> = rolls
            .chunks(ROWS_PER_STATEMENT)
            .map(|chunk| {
                Statement::new(format!(
                    "UPDATE {table} SET {column} = ? WHERE Roll_no IN ({})",
                    placeholders(chunk.len())
                ))
                .text(Status::Absent.as_str())
                .ints(chunk)
            })
            .collect();

        Ok(self.db()?.execute_all(&statements)?)
    }

    /// Inserts or renames students from raw `(name, roll)` records, e.g. rows of a CSV file, and
    /// returns how many students were written.
    ///
    /// Blank records are skipped and not counted. Every record is checked before anything is written, so a
    /// malformed record leaves the class untouched.
    pub fn bulk_insert_from_records<R, F>(&mut self, class: &str, records: R) -> Result<usize>
    where
        R: IntoIterator,
        R::Item: AsRef<[F]>,
        F: AsRef<str>,
    {
        let mut students = Vec::new();

        for (index, record) in records.into_iter().enumerate() {
            let fields = record.as_ref();

            if fields.iter().all(|field| field.as_ref().trim().is_empty()) {
                continue;
            }

            if fields.len() < 2 {
                return Err(AttendanceError::MalformedRecord(format!(
                    "record {} has {} field(s), expected a name and a roll number",
                    index + 1,
                    fields.len()
                )));
            }

            let name = fields[0].as_ref().trim();
            let roll = fields[1].as_ref().trim();
            let roll = roll.parse::<i32>().map_err(|_| {
                AttendanceError::MalformedRecord(format!(
                    "record {}: roll number {roll:?} is not an integer",
                    index + 1
                ))
            })?;

            students.push((name.to_string(), roll));
        }

        self.upsert_students(class, &students)
    }

    /// Inserts one student, or renames the student already holding `roll`. Returns 1.
    pub fn insert_one(&mut self, class: &str, name: &str, roll: i32) -> Result<usize> {
        self.upsert_students(class, &[(name.to_string(), roll)])
    }

    fn upsert_students(&mut self, class: &str, students: &[(String, i32)]) -> Result<usize> {
        let class = self.ensure_class_table(class)?;

        if students.is_empty() {
            return Ok(0);
        }

        let dialect = self.db()?.dialect();
        let statements: Vec<Statement> = students
            .chunks(ROWS_PER_STATEMENT)
            .map(|chunk| {
                chunk.iter().fold(
                    Statement::new(dialect.upsert_students(&class, chunk.len())),
                    |statement, (name, roll)| statement.text(name.as_str()).int(*roll),
                )
            })
            .collect();

        let affected = self.db()?.execute_all(&statements)?;
        tracing::info!(class = %class, students = students.len(), affected, "upserted students");

        Ok(students.len())
    }

    /// Removes the students with the given roll numbers.
    pub fn delete_by_roll(&mut self, class: &str, rolls: &[i32]) -> Result<usize> {
        validate_class_name(class)?;

        if rolls.is_empty() {
            return Ok(0);
        }

        let class = self.resolve_class(class)?;

        let table = self.quote(&class)?;
        let statements: Vec<Statement> = rolls
            .chunks(ROWS_PER_STATEMENT)
            .map(|chunk| {
                Statement::new(format!(
                    "DELETE FROM {table} WHERE Roll_no IN ({})",
                    placeholders(chunk.len())
                ))
                .ints(chunk)
            })
            .collect();

        let deleted = self.db()?.execute_all(&statements)?;
        tracing::info!(class = %class, deleted, "deleted students");

        Ok(deleted)
    }

    /// Removes every student from `class`, keeping the table and its attendance columns.
    pub fn delete_all(&mut self, class: &str) -> Result<usize> {
        let class = self.resolve_class(class)?;

        let table = self.quote(&class)?;
        let deleted = self
            .db()?
            .execute(&Statement::new(format!("DELETE FROM {table}")))?;
        tracing::info!(class = %class, deleted, "cleared class roster");

        Ok(deleted)
    }

    /// Returns the attendance sheet of `class` for `date`, opening the date column if needed.
    pub fn attendance_sheet(&mut self, class: &str, date: NaiveDate) -> Result<Vec<AttendanceEntry>> {
        let class = self.resolve_class(class)?;
        self.ensure_date_column(&class, date)?;

        self.load_sheet(&class, date)
    }

    /// Returns the attendance recorded for `class` on `date` without changing the schema. When
    /// no column exists for `date`, every student is reported absent.
    pub fn attendance_history(&mut self, class: &str, date: NaiveDate) -> Result<Vec<AttendanceEntry>> {
        let class = self.resolve_class(class)?;

        if self.column_exists(&class, &date_column_name(date))? {
            return self.load_sheet(&class, date);
        }

        Ok(self
            .roster(&class)?
            .into_iter()
            .map(|student| AttendanceEntry {
                roll_no: student.roll_no,
                name: student.name,
                status: Status::Absent,
            })
            .collect())
    }

    fn load_sheet(&mut self, class: &str, date: NaiveDate) -> Result<Vec<AttendanceEntry>> {
        let table = self.quote(class)?;
        let column = self.quote(&date_column_name(date))?;
        let statement = Statement::new(format!(
            "SELECT Roll_no AS roll_no, Student_name AS name, {column} AS status \
             FROM {table} ORDER BY Roll_no"
        ));

        Ok(self
            .db()?
            .load::<AttendanceRow>(&statement)?
            .into_iter()
            .map(AttendanceEntry::from)
            .collect())
    }

    /// Applies edits to the attendance sheet of `class` for `date` in one transaction.
    pub fn update_attendance(
        &mut self,
        class: &str,
        date: NaiveDate,
        updates: &[AttendanceUpdate],
    ) -> Result<usize> {
        validate_class_name(class)?;

        if updates.is_empty() {
            return Ok(0);
        }

        let class = self.resolve_class(class)?;
        self.ensure_date_column(&class, date)?;

        let table = self.quote(&class)?;
        let column = self.quote(&date_column_name(date))?;
        let mut statements = Vec::new();

        for update in updates {
            if let Some(name) = update.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
                statements.push(
                    Statement::new(format!("UPDATE {table} SET Student_name = ? WHERE Roll_no = ?"))
                        .text(name)
                        .int(update.roll_no),
                );
            }

            statements.push(
                Statement::new(format!("UPDATE {table} SET {column} = ? WHERE Roll_no = ?"))
                    .text(update.status.as_str())
                    .int(update.roll_no),
            );
        }

        Ok(self.db()?.execute_all(&statements)?)
    }
}

impl Drop for AttendanceManager {
    fn drop(&mut self) {
        self.close();
    }
}
