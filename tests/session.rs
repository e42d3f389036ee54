use attendance::calendar::RestDays;
use attendance::config::{DatabaseSettings, Settings};
use attendance::models::Status;
use attendance::{AttendanceError, AttendanceManager, Session};
use chrono::NaiveDate;

fn manager() -> AttendanceManager {
    let mut manager = AttendanceManager::new(Settings {
        database: DatabaseSettings::sqlite(":memory:"),
        admin_password: Some("admin".to_string()),
        rest_days: RestDays::default(),
    });
    manager.create_class_table("CS101").unwrap();
    manager.set_class_password("CS101", "secret").unwrap();
    manager.insert_one("CS101", "Alice", 1).unwrap();
    manager.insert_one("CS101", "Bob", 2).unwrap();
    manager
}

#[test]
fn login_caches_the_roster() {
    let mut manager = manager();

    let session = Session::login(&mut manager, "CS101", "secret").unwrap();

    assert_eq!(session.class(), "CS101");
    assert!(!session.is_admin());
    assert_eq!(session.students().len(), 2);
    assert!(session.last_absent().is_empty());
}

#[test]
fn admin_login_is_flagged() {
    let mut manager = manager();

    let session = Session::login(&mut manager, "CS101", "admin").unwrap();

    assert!(session.is_admin());
}

#[test]
fn failed_login_creates_no_session() {
    let mut manager = manager();

    assert!(matches!(
        Session::login(&mut manager, "CS101", "nope"),
        Err(AttendanceError::AuthenticationFailed)
    ));
}

#[test]
fn refresh_picks_up_roster_changes() {
    let mut manager = manager();
    let mut session = Session::login(&mut manager, "CS101", "secret").unwrap();

    manager.insert_one("CS101", "Carol", 3).unwrap();
    assert_eq!(session.students().len(), 2);

    assert_eq!(session.refresh(&mut manager).unwrap().len(), 3);
    assert_eq!(session.students()[2].name, "Carol");
}

#[test]
fn mark_absent_remembers_the_selection() {
    let mut manager = manager();
    let mut session = Session::login(&mut manager, "CS101", "secret").unwrap();
    let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();

    manager.mark_all_present("CS101", date).unwrap();
    assert_eq!(session.mark_absent(&mut manager, &[2], date).unwrap(), 1);
    assert_eq!(session.last_absent(), &[2]);

    let sheet = manager.attendance_history("CS101", date).unwrap();
    assert_eq!(sheet[0].status, Status::Present);
    assert_eq!(sheet[1].status, Status::Absent);
}
