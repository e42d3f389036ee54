use anyhow::Result;
use attendance::cli::{Cli, Command, Login};
use attendance::models::{AttendanceUpdate, Status};
use attendance::{AttendanceManager, Session, display, roster};
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attendance=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut manager = attendance::create_default_manager(&cli.config)?;
    manager.connect()?;

    let result = run(&mut manager, cli.command);
    manager.close();

    result
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn login(manager: &mut AttendanceManager, login: &Login) -> Result<Session> {
    Ok(Session::login(manager, &login.class, &login.password)?)
}

fn run(manager: &mut AttendanceManager, command: Command) -> Result<()> {
    match command {
        Command::ListClasses => {
            let classes = manager.list_class_tables()?;
            println!("{}", display::class_list(&classes));
        }
        Command::CreateClass { name, password } => {
            manager.create_class_table(&name)?;
            match password {
                Some(password) => {
                    manager.set_class_password(&name, &password)?;
                    println!("Class '{name}' created with its own password.");
                }
                None => println!("Class '{name}' created, but no password set yet."),
            }
        }
        Command::SetPassword { name, password } => {
            manager.set_class_password(&name, &password)?;
            println!("Password for '{name}' updated.");
        }
        Command::OpenDay { date } => {
            let date = date.unwrap_or_else(today);
            let added = manager.ensure_today_columns(date)?;
            println!("Opened {date} in {added} class(es).");
        }
        Command::Roster(credentials) => {
            let session = login(manager, &credentials)?;
            println!("{}", display::roster_table(session.class(), session.students()));
        }
        Command::MarkAllPresent {
            login: credentials,
            date,
        } => {
            let session = login(manager, &credentials)?;
            let date = date.unwrap_or_else(today);
            let marked = manager.mark_all_present(session.class(), date)?;
            println!("Marked {marked} student(s) present on {date}.");
        }
        Command::MarkAbsent {
            login: credentials,
            date,
            rolls,
        } => {
            let mut session = login(manager, &credentials)?;
            let date = date.unwrap_or_else(today);
            let marked = session.mark_absent(manager, &rolls, date)?;
            println!("Marked {marked} student(s) absent on {date}.");
        }
        Command::AddStudent {
            login: credentials,
            name,
            roll,
        } => {
            let mut session = login(manager, &credentials)?;
            manager.insert_one(session.class(), &name, roll)?;
            session.refresh(manager)?;
            println!("{}", display::roster_table(session.class(), session.students()));
        }
        Command::Import {
            login: credentials,
            file,
            has_header,
        } => {
            let mut session = login(manager, &credentials)?;
            let records = roster::read_records(&file, has_header)?;
            let imported = manager.bulk_insert_from_records(session.class(), &records)?;
            session.refresh(manager)?;
            println!("Imported {imported} student(s) into '{}'.", session.class());
        }
        Command::Delete {
            login: credentials,
            rolls,
        } => {
            let session = login(manager, &credentials)?;
            let deleted = manager.delete_by_roll(session.class(), &rolls)?;
            println!("Deleted {deleted} student(s).");
        }
        Command::DeleteAll(credentials) => {
            let session = login(manager, &credentials)?;
            let deleted = manager.delete_all(session.class())?;
            println!("Deleted {deleted} student(s) from '{}'.", session.class());
        }
        Command::Sheet {
            login: credentials,
            date,
        } => {
            let session = login(manager, &credentials)?;
            let date = date.unwrap_or_else(today);
            let entries = manager.attendance_sheet(session.class(), date)?;
            println!("{}", display::sheet_table(session.class(), date, &entries));
        }
        Command::History {
            login: credentials,
            date,
        } => {
            let session = login(manager, &credentials)?;
            let date = date.unwrap_or_else(today);
            let entries = manager.attendance_history(session.class(), date)?;
            println!("{}", display::sheet_table(session.class(), date, &entries));
        }
        Command::Set {
            login: credentials,
            date,
            present,
            absent,
        } => {
            let session = login(manager, &credentials)?;
            let date = date.unwrap_or_else(today);
            let updates: Vec<AttendanceUpdate> = present
                .into_iter()
                .map(|roll| AttendanceUpdate::status(roll, Status::Present))
                .chain(
                    absent
                        .into_iter()
                        .map(|roll| AttendanceUpdate::status(roll, Status::Absent)),
                )
                .collect();
            manager.update_attendance(session.class(), date, &updates)?;
            let entries = manager.attendance_history(session.class(), date)?;
            println!("{}", display::sheet_table(session.class(), date, &entries));
        }
        Command::Export {
            login: credentials,
            date,
            file,
        } => {
            let session = login(manager, &credentials)?;
            let date = date.unwrap_or_else(today);
            let entries = manager.attendance_history(session.class(), date)?;
            roster::write_sheet(&file, &entries)?;
            println!("Exported {} line(s) to {}.", entries.len(), file.display());
        }
    }

    Ok(())
}
