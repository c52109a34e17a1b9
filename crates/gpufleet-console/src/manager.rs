use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use gpufleet_types::CommandOutcome;

use super::completion::{self, CandidateOutcome};
use super::events::{ConsoleEvent, EventSink};
use super::remote::RemoteShell;
use super::session::{SessionSlot, SessionStore};
use super::transcript::Transcript;
use super::OUTPUT_PLACEHOLDER;

/// Result of submitting a command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The dispatch ran and the collaborator answered
    Completed { ok: bool, exit_code: Option<i32> },
    /// A dispatch was already in flight for this session
    Busy,
    /// Nothing left after trimming
    EmptyInput,
    /// Transport-level failure; only the echoed attempt reached the session
    TransportFailed,
}

/// Result of a Tab press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabOutcome {
    /// Replace the input line with `text` and move the caret
    Applied { text: String, caret: usize },
    /// Ambiguous candidates were appended to the transcript
    Listed,
    /// Input unchanged
    Noop,
}

/// Routes events to the sink, dropping those for hosts other than the
/// active selection. Session state is always updated; only rendering is
/// gated on activeness.
struct EventHub {
    sink: Box<dyn EventSink>,
    active: Mutex<Option<String>>,
}

impl EventHub {
    fn is_active(&self, host: &str) -> bool {
        self.active.lock().unwrap().as_deref() == Some(host)
    }

    fn set_active(&self, host: &str) {
        *self.active.lock().unwrap() = Some(host.to_string());
    }

    fn active_host(&self) -> Option<String> {
        self.active.lock().unwrap().clone()
    }

    fn emit(&self, event: ConsoleEvent) {
        if self.is_active(event.host()) {
            self.sink.emit(event);
        }
    }
}

/// Scoped one-in-flight claim on a session
///
/// Holding the guard is the only way to issue an outbound call for the
/// session; dropping it releases the claim on every exit path.
struct DispatchGuard {
    slot: Arc<SessionSlot>,
    hub: Arc<EventHub>,
}

impl DispatchGuard {
    fn acquire(slot: &Arc<SessionSlot>, hub: &Arc<EventHub>) -> Option<Self> {
        if !slot.try_acquire() {
            return None;
        }
        hub.emit(ConsoleEvent::BusyChanged {
            host: slot.host().to_string(),
            busy: true,
        });
        Some(Self {
            slot: Arc::clone(slot),
            hub: Arc::clone(hub),
        })
    }
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        self.slot.release();
        self.hub.emit(ConsoleEvent::BusyChanged {
            host: self.slot.host().to_string(),
            busy: false,
        });
    }
}

/// Session controller for the remote command console
///
/// Sequences the session store, remote shell, transcript and history per
/// user action, enforcing at most one outbound call per session. The
/// presentation layer drives it with user actions and renders the events
/// it produces.
pub struct ConsoleManager {
    store: SessionStore,
    remote: Box<dyn RemoteShell>,
    hub: Arc<EventHub>,
}

impl std::fmt::Debug for ConsoleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleManager")
            .field("remote", &self.remote.shell_name())
            .field("active", &self.hub.active_host())
            .finish()
    }
}

impl ConsoleManager {
    pub fn new(remote: Box<dyn RemoteShell>, sink: Box<dyn EventSink>) -> Self {
        Self {
            store: SessionStore::new(None),
            remote,
            hub: Arc::new(EventHub {
                sink,
                active: Mutex::new(None),
            }),
        }
    }

    /// Keep per-host JSONL console logs under `log_dir`
    pub fn with_log_dir(mut self, log_dir: PathBuf) -> Self {
        self.store = SessionStore::new(Some(log_dir));
        self
    }

    /// Make `host` the active selection and refresh its rendering
    ///
    /// An in-flight dispatch for the previous host keeps running; its
    /// session state stays keyed by host and is picked up on return. The
    /// history cursor parks on the fresh line when a session gains focus.
    pub async fn select_host(&self, host: &str) {
        let slot = self.store.get_or_create(host);
        self.hub.set_active(host);

        let (cwd, text) = {
            let mut session = slot.state();
            session.history.reset_cursor();
            (session.cwd.clone(), render_text(&session.transcript))
        };
        self.hub.emit(ConsoleEvent::PromptChanged {
            host: host.to_string(),
            cwd,
        });
        self.hub.emit(ConsoleEvent::TranscriptChanged {
            host: host.to_string(),
            text,
        });
        self.hub.emit(ConsoleEvent::BusyChanged {
            host: host.to_string(),
            busy: slot.is_busy(),
        });

        self.ensure_cwd(host).await;
    }

    pub fn active_host(&self) -> Option<String> {
        self.hub.active_host()
    }

    /// Run a command line for `host`
    ///
    /// Rejected without side effects while a dispatch is in flight. The
    /// attempted line is echoed to the transcript before the call, but
    /// history and cwd only change once the collaborator answers.
    pub async fn submit(&self, host: &str, input: &str) -> SubmitOutcome {
        let command = input.trim().to_string();
        if command.is_empty() {
            self.hub.emit(ConsoleEvent::Notice {
                host: host.to_string(),
                message: "Enter a command.".to_string(),
            });
            return SubmitOutcome::EmptyInput;
        }

        let slot = self.store.get_or_create(host);
        let guard = match DispatchGuard::acquire(&slot, &self.hub) {
            Some(guard) => guard,
            None => return SubmitOutcome::Busy,
        };

        let (cwd, text) = {
            let mut session = slot.state();
            let echo = format!("{} {}", prompt_line(host, &session.cwd), command);
            session.transcript.append(&echo);
            let cwd = session.cwd.clone();
            if let Some(logger) = session.logger.as_mut() {
                let _ = logger.log_command(&command, &cwd);
            }
            (cwd, render_text(&session.transcript))
        };
        self.hub.emit(ConsoleEvent::TranscriptChanged {
            host: host.to_string(),
            text,
        });

        let outcome = match self.remote.execute(host, &command, &cwd).await {
            Ok(outcome) => outcome,
            Err(err) => {
                self.hub.emit(ConsoleEvent::ExitCodeReported {
                    host: host.to_string(),
                    exit_code: None,
                });
                self.hub.emit(ConsoleEvent::Notice {
                    host: host.to_string(),
                    message: err.to_string(),
                });
                return SubmitOutcome::TransportFailed;
            }
        };

        let (prompt_update, text) = {
            let mut session = slot.state();
            session.history.record(&command);

            let mut prompt_update = None;
            if outcome.ok {
                if let Some(cwd) = outcome.cwd.clone() {
                    session.cwd = cwd.clone();
                    if let Some(logger) = session.logger.as_mut() {
                        let _ = logger.log_cwd(&cwd);
                    }
                    prompt_update = Some(cwd);
                }
            }

            session.transcript.append(&assemble_output(&outcome));
            if let Some(logger) = session.logger.as_mut() {
                let _ = logger.log_outcome(
                    outcome.ok,
                    outcome.exit_code,
                    outcome.stdout.len(),
                    outcome.stderr.len(),
                );
            }
            (prompt_update, render_text(&session.transcript))
        };

        if let Some(cwd) = prompt_update {
            self.hub.emit(ConsoleEvent::PromptChanged {
                host: host.to_string(),
                cwd,
            });
        }
        self.hub.emit(ConsoleEvent::TranscriptChanged {
            host: host.to_string(),
            text,
        });
        self.hub.emit(ConsoleEvent::ExitCodeReported {
            host: host.to_string(),
            exit_code: outcome.exit_code,
        });
        if !outcome.ok {
            let message = outcome.error.clone().unwrap_or_else(|| {
                let exit = outcome
                    .exit_code
                    .map(|code| code.to_string())
                    .unwrap_or_else(|| "--".to_string());
                format!("Command failed (exit {})", exit)
            });
            self.hub.emit(ConsoleEvent::Notice {
                host: host.to_string(),
                message,
            });
        }

        drop(guard);
        SubmitOutcome::Completed {
            ok: outcome.ok,
            exit_code: outcome.exit_code,
        }
    }

    /// Complete the token under the caret
    ///
    /// `caret` is a byte offset into `input`. An `Applied` outcome carries
    /// the replacement input line; it is suppressed when the user switched
    /// hosts while the request was outstanding.
    pub async fn press_tab(&self, host: &str, input: &str, caret: usize) -> TabOutcome {
        let slot = self.store.get_or_create(host);
        if slot.is_busy() {
            return TabOutcome::Noop;
        }
        self.ensure_cwd(host).await;

        let span = match completion::token_before_caret(input, caret) {
            Some(span) => span,
            None => return TabOutcome::Noop,
        };
        let mode = completion::classify(input, &span);
        let cwd = slot.state().cwd.clone();

        let guard = match DispatchGuard::acquire(&slot, &self.hub) {
            Some(guard) => guard,
            None => return TabOutcome::Noop,
        };
        let result = self.remote.complete(host, &cwd, &span.text, mode).await;
        drop(guard);

        let outcome = match result {
            Ok(outcome) if outcome.ok => outcome,
            Ok(outcome) => {
                self.hub.emit(ConsoleEvent::Notice {
                    host: host.to_string(),
                    message: outcome
                        .error
                        .unwrap_or_else(|| "Completion failed.".to_string()),
                });
                return TabOutcome::Noop;
            }
            Err(err) => {
                self.hub.emit(ConsoleEvent::Notice {
                    host: host.to_string(),
                    message: err.to_string(),
                });
                return TabOutcome::Noop;
            }
        };

        {
            let mut session = slot.state();
            if let Some(logger) = session.logger.as_mut() {
                let _ = logger.log_completion(&span.text, mode, outcome.matches.len());
            }
        }

        match completion::resolve(&span.text, &outcome.matches) {
            None => TabOutcome::Noop,
            Some(CandidateOutcome::Replace(replacement)) => {
                if !self.hub.is_active(host) {
                    // The user switched hosts while the request was out;
                    // don't rewrite the new host's input line.
                    return TabOutcome::Noop;
                }
                let caret = span.start + replacement.len();
                let text = format!(
                    "{}{}{}",
                    &input[..span.start],
                    replacement,
                    &input[span.end..]
                );
                TabOutcome::Applied { text, caret }
            }
            Some(CandidateOutcome::ListAll) => {
                let text = {
                    let mut session = slot.state();
                    session.transcript.append(&outcome.matches.join("  "));
                    render_text(&session.transcript)
                };
                self.hub.emit(ConsoleEvent::TranscriptChanged {
                    host: host.to_string(),
                    text,
                });
                TabOutcome::Listed
            }
        }
    }

    /// Recall the previous history entry (Up)
    ///
    /// Only fires with the caret at the start of the line, so mid-line
    /// cursor movement keeps its meaning. Never blocked by a dispatch.
    pub fn recall_previous(&self, host: &str, caret: usize) -> Option<String> {
        if caret != 0 {
            return None;
        }
        let slot = self.store.get_or_create(host);
        let mut session = slot.state();
        session.history.previous()
    }

    /// Recall the next history entry (Down)
    ///
    /// Only fires with the caret at the end of the line. Past the newest
    /// entry it returns the empty string: back to a fresh line.
    pub fn recall_next(&self, host: &str, caret: usize, line_len: usize) -> Option<String> {
        if caret != line_len {
            return None;
        }
        let slot = self.store.get_or_create(host);
        let mut session = slot.state();
        if session.history.is_empty() {
            return None;
        }
        Some(session.history.next())
    }

    /// Drop the transcript and park the history cursor on the fresh line
    ///
    /// The presentation shows `placeholder` instead of an empty transcript.
    pub fn clear_transcript(&self, host: &str, placeholder: &str) {
        let slot = self.store.get_or_create(host);
        {
            let mut session = slot.state();
            session.transcript.clear();
            session.history.reset_cursor();
        }
        self.hub.emit(ConsoleEvent::TranscriptChanged {
            host: host.to_string(),
            text: placeholder.to_string(),
        });
    }

    pub fn is_busy(&self, host: &str) -> bool {
        self.store.get_or_create(host).is_busy()
    }

    pub fn cwd(&self, host: &str) -> String {
        self.store.get_or_create(host).state().cwd.clone()
    }

    pub fn transcript_text(&self, host: &str) -> String {
        self.store.get_or_create(host).state().transcript.text().to_string()
    }

    pub fn history_len(&self, host: &str) -> usize {
        self.store.get_or_create(host).state().history.len()
    }

    /// Shell-style prompt for a host; an unknown cwd renders as `~`
    pub fn prompt(&self, host: &str) -> String {
        prompt_line(host, &self.cwd(host))
    }

    /// Discover the working directory with a silent `pwd` dispatch
    ///
    /// Skipped when the cwd is already known or another dispatch holds the
    /// session. Never recorded in history or echoed to the transcript.
    async fn ensure_cwd(&self, host: &str) {
        let slot = self.store.get_or_create(host);
        if !slot.state().cwd.is_empty() {
            return;
        }
        let guard = match DispatchGuard::acquire(&slot, &self.hub) {
            Some(guard) => guard,
            None => return,
        };

        match self.remote.execute(host, "pwd", "").await {
            Ok(outcome) if outcome.ok => {
                let prompt_update = {
                    let mut session = slot.state();
                    match outcome.cwd {
                        Some(cwd) if session.cwd.is_empty() => {
                            session.cwd = cwd.clone();
                            if let Some(logger) = session.logger.as_mut() {
                                let _ = logger.log_cwd(&cwd);
                            }
                            Some(cwd)
                        }
                        _ => None,
                    }
                };
                if let Some(cwd) = prompt_update {
                    self.hub.emit(ConsoleEvent::PromptChanged {
                        host: host.to_string(),
                        cwd,
                    });
                }
            }
            Ok(_) => {}
            Err(err) => {
                self.hub.emit(ConsoleEvent::Notice {
                    host: host.to_string(),
                    message: err.to_string(),
                });
            }
        }

        drop(guard);
    }
}

fn prompt_line(host: &str, cwd: &str) -> String {
    let display = if cwd.is_empty() { "~" } else { cwd };
    format!("{}:{}$", host, display)
}

fn render_text(transcript: &Transcript) -> String {
    if transcript.is_empty() {
        OUTPUT_PLACEHOLDER.to_string()
    } else {
        transcript.text().to_string()
    }
}

/// Assemble the transcript block for a dispatch outcome: stdout, then a
/// delimited stderr section, joined by a blank line. Empty when the
/// command produced no output.
fn assemble_output(outcome: &CommandOutcome) -> String {
    let mut parts = Vec::new();
    if !outcome.stdout.is_empty() {
        parts.push(outcome.stdout.clone());
    }
    if !outcome.stderr.is_empty() {
        parts.push(format!("[stderr]\n{}", outcome.stderr));
    }
    parts.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_renders_unknown_cwd_as_tilde() {
        assert_eq!(prompt_line("gpu-01", ""), "gpu-01:~$");
        assert_eq!(prompt_line("gpu-01", "/data"), "gpu-01:/data$");
    }

    #[test]
    fn output_assembly_delimits_stderr() {
        let outcome = CommandOutcome {
            ok: true,
            stdout: "out".to_string(),
            stderr: "err".to_string(),
            exit_code: Some(0),
            cwd: None,
            error: None,
        };
        assert_eq!(assemble_output(&outcome), "out\n\n[stderr]\nerr");
    }

    #[test]
    fn output_assembly_is_empty_for_silent_commands() {
        let outcome = CommandOutcome {
            ok: true,
            stdout: String::new(),
            stderr: String::new(),
            exit_code: Some(0),
            cwd: None,
            error: None,
        };
        assert_eq!(assemble_output(&outcome), "");
    }
}
