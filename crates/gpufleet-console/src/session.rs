use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::history::History;
use super::logger::SessionLogger;
use super::transcript::Transcript;

/// Mutable console state for one host
///
/// `cwd` starts empty (unknown) and is only ever set from a successful
/// dispatch response that carried a directory.
#[derive(Debug)]
pub struct Session {
    pub cwd: String,
    pub history: History,
    pub transcript: Transcript,
    pub logger: Option<SessionLogger>,
}

impl Session {
    fn new(logger: Option<SessionLogger>) -> Self {
        Self {
            cwd: String::new(),
            history: History::new(),
            transcript: Transcript::new(),
            logger,
        }
    }
}

/// One slot per host: the busy flag lives outside the state lock so the
/// one-in-flight check never blocks on state access.
#[derive(Debug)]
pub struct SessionSlot {
    host: String,
    busy: AtomicBool,
    state: Mutex<Session>,
}

impl SessionSlot {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Claim the session for an outbound call; fails when one is in flight
    pub(crate) fn try_acquire(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub(crate) fn release(&self) {
        self.busy.store(false, Ordering::SeqCst);
    }

    /// Lock the session state; hold only for short synchronous sections
    pub fn state(&self) -> MutexGuard<'_, Session> {
        self.state.lock().unwrap()
    }
}

/// All sessions, keyed by host
///
/// Lookups are idempotent creation; sessions are never deleted and live for
/// the lifetime of the dashboard process.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Arc<SessionSlot>>>,
    log_dir: Option<PathBuf>,
}

impl SessionStore {
    pub fn new(log_dir: Option<PathBuf>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            log_dir,
        }
    }

    pub fn get_or_create(&self, host: &str) -> Arc<SessionSlot> {
        let mut sessions = self.sessions.lock().unwrap();
        let slot = sessions.entry(host.to_string()).or_insert_with(|| {
            let logger = self.log_dir.as_ref().and_then(|dir| {
                match SessionLogger::new(host, dir.clone()) {
                    Ok(logger) => Some(logger),
                    Err(err) => {
                        eprintln!("Console logging disabled for {}: {}", host, err);
                        None
                    }
                }
            });
            Arc::new(SessionSlot {
                host: host.to_string(),
                busy: AtomicBool::new(false),
                state: Mutex::new(Session::new(logger)),
            })
        });
        Arc::clone(slot)
    }
}
