//! Resolution logging with secret masking, checked against captured output.

use ordinal_config::prelude::*;
use ordinal_config::sources::MapSource;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

/// Run `f` with debug logs written to the returned buffer.
fn capture<T>(f: impl FnOnce() -> T) -> (T, String) {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, captured.text())
}

#[test]
fn test_profile_secret_is_masked() {
    let config = Config::builder()
        .with_source(
            MapSource::new("app")
                .with_property("db.password", "plain-secret")
                .with_property("%dev.db.password", "hunter2")
                .with_property("db.user", "admin"),
        )
        .with_profile("dev")
        .with_secret_keys(["db.password"])
        .with_logging()
        .build()
        .unwrap();

    let ((password, user), logs) = capture(|| {
        (
            config.get_value::<String>("db.password").unwrap(),
            config.get_value::<String>("db.user").unwrap(),
        )
    });

    assert_eq!(password, "hunter2");
    assert_eq!(user, "admin");
    assert!(logs.contains("%dev.db.password"), "{logs}");
    assert!(logs.contains("***"), "{logs}");
    assert!(!logs.contains("hunter2"), "{logs}");
    assert!(!logs.contains("plain-secret"), "{logs}");
    assert!(logs.contains("admin"), "{logs}");
}

#[test]
fn test_relocated_secret_is_masked() {
    let config = Config::builder()
        .with_source(MapSource::new("app").with_property("datasource.password", "s3cret"))
        .with_relocations(HashMap::from([(
            "db.password".to_string(),
            "datasource.password".to_string(),
        )]))
        .with_secret_keys(["db.password"])
        .with_logging()
        .build()
        .unwrap();

    let (password, logs) = capture(|| config.get_value::<String>("db.password").unwrap());

    assert_eq!(password, "s3cret");
    assert!(logs.contains("datasource.password"), "{logs}");
    assert!(!logs.contains("s3cret"), "{logs}");
}
