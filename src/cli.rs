//! This module contains the command-line interface [`Cli`] parser for managing class attendance
//! records.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// The command line configuration struct, where the command-line interface parser is automatically
/// derived by [`clap::Parser`].
#[derive(Parser, Debug)]
#[command(name = "attendance", version, about = "Classroom attendance register")]
pub struct Cli {
    /// Configuration file to read, without the extension.
    #[arg(long, short, global = true, default_value = "attendance")]
    pub config: String,

    /// The different commands available for managing class attendance records.
    #[command(subcommand)]
    pub command: Command,
}

/// Credentials for a class-scoped command.
#[derive(Args, Debug)]
pub struct Login {
    /// The class to open.
    #[arg(long, short = 'k')]
    pub class: String,

    /// The class password, or the admin override.
    #[arg(long, short, env = "ATTENDANCE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every class.
    ListClasses,

    /// Create a new class, optionally setting its password.
    CreateClass {
        name: String,
        #[arg(long)]
        password: Option<String>,
    },

    /// Set or change the password of a class.
    SetPassword { name: String, password: String },

    /// Open the attendance column for a day in every class (skipped on rest days).
    OpenDay {
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show the roster of a class.
    Roster(Login),

    /// Mark every student of a class present.
    MarkAllPresent {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Mark the given roll numbers absent.
    MarkAbsent {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(required = true)]
        rolls: Vec<i32>,
    },

    /// Add a student, or rename the student holding that roll number.
    AddStudent {
        #[command(flatten)]
        login: Login,
        name: String,
        roll: i32,
    },

    /// Add or rename students from a CSV file of `name,roll` rows.
    Import {
        #[command(flatten)]
        login: Login,
        file: PathBuf,
        /// Skip the first row of the file.
        #[arg(long)]
        has_header: bool,
    },

    /// Remove the students with the given roll numbers.
    Delete {
        #[command(flatten)]
        login: Login,
        #[arg(required = true)]
        rolls: Vec<i32>,
    },

    /// Remove every student from a class.
    DeleteAll(Login),

    /// Show the attendance sheet for a day, opening its column if needed.
    Sheet {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show the attendance recorded for a day without changing anything.
    History {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Set individual students present or absent for a day.
    Set {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, value_delimiter = ',')]
        present: Vec<i32>,
        #[arg(long, value_delimiter = ',')]
        absent: Vec<i32>,
    },

    /// Export the attendance sheet for a day to a CSV file.
    Export {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        date: Option<NaiveDate>,
        file: PathBuf,
    },
}
