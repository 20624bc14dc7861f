//! Test utilities for the taskdeck crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or when the
//! `test-support` feature is enabled.

pub mod cap_fs {
    //! Capability-safe filesystem helpers for tests.
    //!
    //! The crate avoids direct `std::fs` calls. These helpers provide common
    //! read and write operations built on `cap_std::fs::Dir` so test
    //! suites share consistent, policy-compliant file access.

    use std::ffi::OsString;
    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// Read a UTF-8 text file through `cap_std`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use taskdeck::test_support::cap_fs::{read_file_to_string, write_file};
    ///
    /// let dir = tempfile::tempdir()?;
    /// let path = dir.path().join("read-example.txt");
    /// write_file(&path, b"hello\n")?;
    ///
    /// assert_eq!(read_file_to_string(&path)?, "hello\n");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn read_file_to_string(path: &Path) -> io::Result<String> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.read_to_string(Path::new(&file_name))
    }

    /// Write bytes to a file through `cap_std`.
    pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.write(Path::new(&file_name), contents)
    }

    fn parent_and_file_name(path: &Path) -> io::Result<(&Path, OsString)> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "path must include a file or directory name",
            )
        })?;
        Ok((parent, file_name.to_os_string()))
    }
}

pub mod clock {
    //! Controllable clock for expiry and overdue tests.

    use std::sync::{Mutex, MutexGuard};

    use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
    use mockable::Clock;

    /// Clock whose current instant only moves when a test advances it.
    pub struct MutableClock(Mutex<DateTime<Utc>>);

    impl MutableClock {
        /// Clock pinned to `now`.
        pub fn new(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        /// Clock pinned to `2025-01-01T00:00:00Z`.
        pub fn at_epoch_of_tests() -> Self {
            match Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single() {
                Some(now) => Self::new(now),
                None => panic!("fixed test instant is valid"),
            }
        }

        /// Move the clock forward by `delta`.
        pub fn advance(&self, delta: TimeDelta) {
            *self.lock_clock() += delta;
        }

        fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
            match self.0.lock() {
                Ok(guard) => guard,
                Err(_) => panic!("clock mutex"),
            }
        }
    }

    impl Clock for MutableClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.lock_clock()
        }
    }
}

pub mod http {
    //! Fully wired HTTP state over the in-memory adapters.
    //!
    //! Uses the real Argon2 hasher and HMAC token authority so tests exercise
    //! the same credential path as production.

    use std::sync::Arc;

    use chrono::Duration;
    use mockable::Clock;

    use crate::domain::{AccountService, TaskService};
    use crate::inbound::http::state::{HttpState, HttpStatePorts};
    use crate::outbound::memory::{InMemoryTaskRepository, InMemoryUserRepository};
    use crate::outbound::security::{
        Argon2PasswordHasher, DEFAULT_TOKEN_TTL_HOURS, HmacTokenAuthority, TokenSecret,
    };

    /// Signing key shared by every in-memory test state.
    pub const TEST_SECRET: [u8; 32] = [0x5a; 32];

    /// Build an [`HttpState`] backed by fresh in-memory stores.
    pub fn in_memory_state(clock: Arc<dyn Clock>) -> HttpState {
        let secret = match TokenSecret::from_bytes(TEST_SECRET.to_vec()) {
            Some(secret) => secret,
            None => panic!("test secret meets the minimum length"),
        };
        let authority = Arc::new(HmacTokenAuthority::new(
            secret,
            Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
            clock.clone(),
        ));
        let accounts = Arc::new(AccountService::new(
            Arc::new(InMemoryUserRepository::default()),
            Arc::new(Argon2PasswordHasher),
            authority.clone(),
        ));
        let tasks = Arc::new(TaskService::new(
            Arc::new(InMemoryTaskRepository::default()),
            clock,
        ));
        HttpState::new(
            HttpStatePorts {
                login: accounts.clone(),
                settings: accounts,
                tasks: tasks.clone(),
                tasks_query: tasks,
            },
            authority,
        )
    }
}

pub mod openapi {
    //! OpenAPI schema traversal helpers.
    //!
    //! Resolves `RefOr<Schema>` wrappers to concrete `Object` schemas with
    //! diagnostic messages on type mismatches.

    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::{Object, Schema};

    /// Extract an `Object` schema, panicking with a diagnostic if not an Object.
    pub fn unwrap_object_schema<'a>(schema: &'a RefOr<Schema>, name: &str) -> &'a Object {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj,
            RefOr::Ref(reference) => {
                panic!(
                    "schema '{name}' is a $ref to '{}'; resolve the reference first",
                    reference.ref_location
                );
            }
            RefOr::T(Schema::AllOf(_)) => {
                panic!("schema '{name}' is an AllOf combinator; inspect composed schemas");
            }
            RefOr::T(Schema::Array(_)) => {
                panic!("schema '{name}' is an Array, not an Object");
            }
            _ => panic!("schema '{name}' has unexpected type"),
        }
    }

    /// Get a property from an Object schema by name.
    ///
    /// Panics if the property does not exist.
    pub fn get_property<'a>(obj: &'a Object, field: &str) -> &'a RefOr<Schema> {
        match obj.properties.get(field) {
            Some(property) => property,
            None => panic!("property '{field}' not found"),
        }
    }
}
