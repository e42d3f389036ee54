//! The connection to the backing store.
//!
//! [`Database`] holds a live diesel connection for whichever engine the settings name. Queries
//! are raw SQL [`Statement`]s because class tables are created at runtime and have no static
//! schema; values always travel as bound parameters.

mod dialect;

pub use dialect::{Dialect, placeholders};

use crate::config::DatabaseSettings;
use crate::error::{AttendanceError, Result};
use crate::models::NewClassPassword;
use crate::schema::class_passwords;
use diesel::backend::Backend;
use diesel::prelude::*;
use diesel::deserialize::QueryableByName;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::result::QueryResult;
use diesel::serialize::ToSql;
use diesel::sql_types::{HasSqlType, Integer, Text};
use diesel::sqlite::Sqlite;

#[cfg(feature = "mysql")]
use diesel::mysql::Mysql;

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Text(String),
    Int(i32),
}

/// SQL text together with its bound parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    sql: String,
    params: Vec<Param>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn text(mut self, value: impl Into<String>) -> Self {
        self.params.push(Param::Text(value.into()));
        self
    }

    pub fn int(mut self, value: i32) -> Self {
        self.params.push(Param::Int(value));
        self
    }

    pub fn ints(mut self, values: &[i32]) -> Self {
        self.params.extend(values.iter().copied().map(Param::Int));
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    fn bind<DB>(&self) -> BoxedSqlQuery<'static, DB, SqlQuery>
    where
        DB: Backend + HasSqlType<Text> + HasSqlType<Integer>,
        String: ToSql<Text, DB>,
        i32: ToSql<Integer, DB>,
    {
        let query: BoxedSqlQuery<'static, DB, SqlQuery> =
            diesel::sql_query(self.sql.clone()).into_boxed();

        self.params
            .iter()
            .fold(query, |query, param| match param {
                Param::Text(value) => query.bind::<Text, _>(value.clone()),
                Param::Int(value) => query.bind::<Integer, _>(*value),
            })
    }
}

/// Rows that can be loaded by column name from every compiled-in engine.
#[cfg(not(feature = "mysql"))]
pub trait Row: QueryableByName<Sqlite> + 'static {}
#[cfg(not(feature = "mysql"))]
impl<T: QueryableByName<Sqlite> + 'static> Row for T {}

/// Rows that can be loaded by column name from every compiled-in engine.
#[cfg(feature = "mysql")]
pub trait Row: QueryableByName<Sqlite> + QueryableByName<Mysql> + 'static {}
#[cfg(feature = "mysql")]
impl<T: QueryableByName<Sqlite> + QueryableByName<Mysql> + 'static> Row for T {}

/// An open connection to one of the supported engines.
pub enum Database {
    Sqlite(SqliteConnection),
    #[cfg(feature = "mysql")]
    Mysql(MysqlConnection),
}

impl Database {
    /// Opens a connection and makes sure the password table exists.
    pub fn establish(settings: &DatabaseSettings) -> Result<Self> {
        let mut database = match settings {
            DatabaseSettings::Sqlite { path } => SqliteConnection::establish(path)
                .map(Database::Sqlite)
                .map_err(|e| AttendanceError::ConnectionFailure(e.to_string()))?,
            #[cfg(feature = "mysql")]
            DatabaseSettings::Mysql {
                host,
                port,
                user,
                password,
                name,
            } => {
                let authority = match port {
                    Some(port) => format!("{host}:{port}"),
                    None => host.clone(),
                };
                let url = format!(
                    "mysql://{}:{}@{authority}/{name}",
                    urlencoding::encode(user),
                    urlencoding::encode(password),
                );
                MysqlConnection::establish(&url)
                    .map(Database::Mysql)
                    .map_err(|e| AttendanceError::ConnectionFailure(e.to_string()))?
            }
            #[cfg(not(feature = "mysql"))]
            DatabaseSettings::Mysql { .. } => {
                return Err(AttendanceError::ConnectionFailure(
                    "this build does not include mysql support (enable the `mysql` feature)"
                        .to_string(),
                ));
            }
        };

        let ddl = database.dialect().create_password_table();
        database
            .execute(&ddl)
            .map_err(|e| AttendanceError::ConnectionFailure(e.to_string()))?;

        Ok(database)
    }

    pub fn dialect(&self) -> Dialect {
        match self {
            Database::Sqlite(_) => Dialect::Sqlite,
            #[cfg(feature = "mysql")]
            Database::Mysql(_) => Dialect::Mysql,
        }
    }

    /// Runs a single statement, returning the number of affected rows.
    pub fn execute(&mut self, statement: &Statement) -> QueryResult<usize> {
        tracing::debug!(sql = statement.sql(), params = statement.params().len(), "execute");

        match self {
            Database::Sqlite(conn) => statement.bind::<Sqlite>().execute(conn),
            #[cfg(feature = "mysql")]
            Database::Mysql(conn) => statement.bind::<Mysql>().execute(conn),
        }
    }

    /// Runs `statements` in one transaction: either all of them commit or none do.
    pub fn execute_all(&mut self, statements: &[Statement]) -> QueryResult<usize> {
        tracing::debug!(statements = statements.len(), "execute in transaction");

        match self {
            Database::Sqlite(conn) => conn.transaction::<_, diesel::result::Error, _>(|conn| {
                let mut affected = 0;
                for statement in statements {
                    affected += statement.bind::<Sqlite>().execute(conn)?;
                }
                Ok(affected)
            }),
            #[cfg(feature = "mysql")]
            Database::Mysql(conn) => conn.transaction::<_, diesel::result::Error, _>(|conn| {
                let mut affected = 0;
                for statement in statements {
                    affected += statement.bind::<Mysql>().execute(conn)?;
                }
                Ok(affected)
            }),
        }
    }

    /// Runs a query and maps each row by column name.
    pub fn load<T: Row>(&mut self, statement: &Statement) -> QueryResult<Vec<T>> {
        tracing::debug!(sql = statement.sql(), params = statement.params().len(), "load");

        match self {
            Database::Sqlite(conn) => statement.bind::<Sqlite>().load::<T>(conn),
            #[cfg(feature = "mysql")]
            Database::Mysql(conn) => statement.bind::<Mysql>().load::<T>(conn),
        }
    }

    /// Sets the password hash of a class, replacing any previous one.
    pub fn upsert_password_hash(&mut self, class: &str, hash: &str) -> QueryResult<usize> {
        let record = NewClassPassword {
            class_name: class,
            password_hash: hash,
        };

        match self {
            Database::Sqlite(conn) => diesel::replace_into(class_passwords::table)
                .values(&record)
                .execute(conn),
            #[cfg(feature = "mysql")]
            Database::Mysql(conn) => diesel::replace_into(class_passwords::table)
                .values(&record)
                .execute(conn),
        }
    }

    pub fn password_hash(&mut self, class: &str) -> QueryResult<Option<String>> {
        let query = class_passwords::table
            .find(class.to_string())
            .select(class_passwords::password_hash);

        match self {
            Database::Sqlite(conn) => query.first::<String>(conn).optional(),
            #[cfg(feature = "mysql")]
            Database::Mysql(conn) => query.first::<String>(conn).optional(),
        }
    }
}
