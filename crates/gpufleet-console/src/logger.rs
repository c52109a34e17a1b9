use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::json;

use gpufleet_types::CompletionMode;

/// Append-only JSONL log of console traffic for one host
#[derive(Debug)]
pub struct SessionLogger {
    host: String,
    log_file: File,
}

impl SessionLogger {
    /// Create a logger writing to `<log_dir>/console-<host>.log`
    pub fn new(host: &str, log_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

        let log_path = log_dir.join(format!("console-{}.log", host));
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .context("Failed to create log file")?;

        Ok(Self {
            host: host.to_string(),
            log_file,
        })
    }

    /// Log a submitted command line
    pub fn log_command(&mut self, command: &str, cwd: &str) -> Result<()> {
        self.log_entry(json!({
            "timestamp": Utc::now().to_rfc3339(),
            "host": self.host,
            "event": "command",
            "command": command,
            "cwd": cwd,
        }))
    }

    /// Log the outcome of a dispatch
    pub fn log_outcome(
        &mut self,
        ok: bool,
        exit_code: Option<i32>,
        stdout_bytes: usize,
        stderr_bytes: usize,
    ) -> Result<()> {
        self.log_entry(json!({
            "timestamp": Utc::now().to_rfc3339(),
            "host": self.host,
            "event": "outcome",
            "ok": ok,
            "exit_code": exit_code,
            "stdout_bytes": stdout_bytes,
            "stderr_bytes": stderr_bytes,
        }))
    }

    /// Log a completion request and how many candidates came back
    pub fn log_completion(
        &mut self,
        prefix: &str,
        mode: CompletionMode,
        matches: usize,
    ) -> Result<()> {
        self.log_entry(json!({
            "timestamp": Utc::now().to_rfc3339(),
            "host": self.host,
            "event": "completion",
            "prefix": prefix,
            "mode": mode.to_string(),
            "matches": matches,
        }))
    }

    /// Log a working directory change
    pub fn log_cwd(&mut self, cwd: &str) -> Result<()> {
        self.log_entry(json!({
            "timestamp": Utc::now().to_rfc3339(),
            "host": self.host,
            "event": "cwd",
            "cwd": cwd,
        }))
    }

    fn log_entry(&mut self, entry: serde_json::Value) -> Result<()> {
        writeln!(self.log_file, "{}", entry).context("Failed to write to log file")?;
        self.log_file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_jsonl_entries() {
        let dir = TempDir::new().unwrap();
        let mut logger = SessionLogger::new("gpu-01", dir.path().to_path_buf()).unwrap();
        logger.log_command("ls", "/data").unwrap();
        logger
            .log_completion("fo", CompletionMode::File, 2)
            .unwrap();

        let contents =
            std::fs::read_to_string(dir.path().join("console-gpu-01.log")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "command");
        assert_eq!(first["host"], "gpu-01");
        assert_eq!(first["command"], "ls");

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["event"], "completion");
        assert_eq!(second["mode"], "file");
    }
}
