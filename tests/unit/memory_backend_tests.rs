//! Dispatch tests against a pre-populated in-memory backend, registered
//! under a custom protocol name the way an embedding application would
//! register a remote-protocol module.

use std::io::ErrorKind;

use syncvio::backend::memory::MemBackend;
use syncvio::backend::{BackendOptions, FileType};
use syncvio::codec::PathCodec;
use syncvio::registry::Registry;
use syncvio::session::{ReplicaRole, Session};
use syncvio::Error;

fn bound_session() -> Session {
    let mut registry = Registry::with_builtins();
    registry.register("mem-fixture", || {
        let mut backend = MemBackend::new();
        backend.insert_dir("/docs");
        backend.insert_file("/docs/a.txt", 3);
        backend.insert_file("/docs/b.txt", 7);
        backend.insert_dir("/docs/sub");
        Box::new(backend)
    });

    let mut session = Session::with_registry(ReplicaRole::Remote, PathCodec::default(), registry);
    session
        .bind("mem-fixture", &BackendOptions::default())
        .expect("fixture backend must bind");
    session
}

fn io_kind(err: &anyhow::Error) -> Option<ErrorKind> {
    match err.downcast_ref::<Error>() {
        Some(Error::Io(io)) => Some(io.kind()),
        _ => None,
    }
}

#[test]
fn enumerates_one_directory_level() {
    let mut session = bound_session();
    let handle = session.open_dir("/docs").expect("open_dir");

    let mut names = Vec::new();
    while let Some(entry) = session.read_dir(handle).expect("read_dir") {
        names.push((entry.name, entry.file_type));
    }
    session.close_dir(handle).expect("close");

    names.sort();
    assert_eq!(
        names,
        vec![
            ("a.txt".to_string(), FileType::Regular),
            ("b.txt".to_string(), FileType::Regular),
            ("sub".to_string(), FileType::Directory),
        ]
    );
}

#[test]
fn stat_matches_fixture_entries() {
    let mut session = bound_session();

    let stat = session.stat("/docs/a.txt").expect("stat file");
    assert_eq!(stat.name, "a.txt");
    assert_eq!(stat.file_type, FileType::Regular);
    assert_eq!(stat.size, 3);

    let stat = session.stat("/docs").expect("stat dir");
    assert_eq!(stat.name, "docs");
    assert_eq!(stat.file_type, FileType::Directory);

    let err = session.stat("/docs/absent").expect_err("absent");
    assert_eq!(io_kind(&err), Some(ErrorKind::NotFound));
}

#[test]
fn opendir_on_regular_file_fails() {
    let mut session = bound_session();
    let err = session.open_dir("/docs/a.txt").expect_err("file, not dir");
    assert_eq!(io_kind(&err), Some(ErrorKind::NotADirectory));
}

#[test]
fn rename_moves_directories_with_their_children() {
    let mut session = bound_session();
    session.rename("/docs", "/archive").expect("rename dir");

    assert_eq!(session.stat("/archive/a.txt").unwrap().name, "a.txt");
    assert_eq!(
        io_kind(&session.stat("/docs/a.txt").unwrap_err()),
        Some(ErrorKind::NotFound)
    );
}

#[test]
fn rmdir_refuses_non_empty_directories() {
    let mut session = bound_session();

    let err = session.rmdir("/docs").expect_err("non-empty dir");
    assert_eq!(io_kind(&err), Some(ErrorKind::DirectoryNotEmpty));

    session.rmdir("/docs/sub").expect("empty dir removes");
    session.unlink("/docs/a.txt").expect("unlink");
    session.unlink("/docs/b.txt").expect("unlink");
    session.rmdir("/docs").expect("now empty");
}

#[test]
fn unlink_refuses_directories() {
    let mut session = bound_session();
    let err = session.unlink("/docs/sub").expect_err("directory");
    assert_eq!(io_kind(&err), Some(ErrorKind::IsADirectory));
}

#[test]
fn mkdir_then_enumerate_round_trips() {
    let mut session = bound_session();
    session.mkdir("/docs/new", 0o755).expect("mkdir");

    let err = session.mkdir("/docs/new", 0o755).expect_err("exists");
    assert_eq!(io_kind(&err), Some(ErrorKind::AlreadyExists));

    let handle = session.open_dir("/docs/new").expect("open new dir");
    assert!(session.read_dir(handle).expect("empty").is_none());
    session.close_dir(handle).expect("close");
}

#[test]
fn omitted_mutations_report_unsupported() {
    let mut session = bound_session();

    let err = session.chmod("/docs/a.txt", 0o600).expect_err("no chmod");
    let actual = err.downcast_ref::<Error>().expect("syncvio::Error");
    assert!(matches!(actual, Error::Unsupported("chmod")));

    let err = session
        .set_mtime("/docs/a.txt", std::time::SystemTime::UNIX_EPOCH)
        .expect_err("no set_mtime");
    let actual = err.downcast_ref::<Error>().expect("syncvio::Error");
    assert!(matches!(actual, Error::Unsupported("set_mtime")));
}
