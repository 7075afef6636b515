//! Boundary to the external linter.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::FixError;
use crate::diagnostic::{LintMessage, LintReport};

/// Something that can lint a document.
pub trait LintEngine: Send + Sync {
    /// Lints `content`. `path` is the document's file path when it has one.
    fn lint(&self, path: Option<&Path>, content: &str) -> Result<Vec<LintMessage>, FixError>;
}

/// Runs an external command that reads the document on stdin and prints a
/// JSON report on stdout.
///
/// The report has the shape `{ "passed": bool, "errors": [{ "message": [..] }] }`.
/// A non-zero exit status alone is not a failure; linters commonly exit
/// non-zero when they find problems.
#[derive(Debug, Clone)]
pub struct CommandLinter {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
}

impl CommandLinter {
    /// Creates a linter running `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Appends arguments passed before the document path.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the working directory of the command.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Name of the program being run.
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl LintEngine for CommandLinter {
    fn lint(&self, path: Option<&Path>, content: &str) -> Result<Vec<LintMessage>, FixError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(path) = path {
            command.arg(path);
        }
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        debug!("Running linter: {} {:?}", self.program, self.args);
        let mut child = command
            .spawn()
            .map_err(|e| FixError::linter(format!("Failed to start '{}': {}", self.program, e)))?;

        // The linter may fill stdout before it has read all of stdin.
        let stdin = child.stdin.take();
        let input = content.to_string();
        let writer = std::thread::spawn(move || -> std::io::Result<()> {
            if let Some(mut stdin) = stdin {
                stdin.write_all(input.as_bytes())?;
            }
            Ok(())
        });

        let output = child.wait_with_output()?;

        match writer.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to write document to linter: {}", e),
            Err(_) => warn!("Linter stdin writer panicked"),
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            if output.status.success() {
                return Ok(Vec::new());
            }
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FixError::linter(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        parse_report(&stdout)
    }
}

/// Parses a linter report into its messages.
pub fn parse_report(json: &str) -> Result<Vec<LintMessage>, FixError> {
    let report: LintReport = serde_json::from_str(json)
        .map_err(|e| FixError::parse(format!("Invalid linter report: {}", e)))?;
    Ok(report.into_messages())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const REPORT: &str = r##"{
        "passed": false,
        "errors": [
            {
                "message": [
                    {
                        "line": 2, "start": 9, "endline": 2, "end": 11,
                        "descr": "Use hex color", "rule": "color",
                        "fix": { "replace": "#fff" }
                    },
                    {
                        "line": 3, "start": 1, "endline": 3, "end": 4,
                        "descr": "Too deep", "rule": "depthControl"
                    }
                ]
            }
        ]
    }"##;

    #[test]
    fn test_parse_report() {
        let messages = parse_report(REPORT).unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].rule, "color");
        assert_eq!(messages[0].fix.as_ref().map(|f| f.replace.as_str()), Some("#fff"));
        assert!(messages[1].fix.is_none());
    }

    #[test]
    fn test_parse_report_passed() {
        assert!(parse_report(r#"{ "passed": true }"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_report_garbage() {
        let err = parse_report("not json").unwrap_err();
        assert!(matches!(err, FixError::Parse(_)));
    }

    #[test]
    fn test_missing_program() {
        let linter = CommandLinter::new("batchfix-test-no-such-linter");
        let err = linter.lint(None, "a { }").unwrap_err();
        assert!(matches!(err, FixError::Linter(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_reads_stdin() {
        // `cat` echoes the report it is given on stdin.
        let linter = CommandLinter::new("cat");
        let messages = linter.lint(None, REPORT).unwrap();
        assert_eq!(messages.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_appends_path_and_args() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("report.json");
        std::fs::write(&report, REPORT).unwrap();

        // `cat -- <path>` ignores stdin and prints the file.
        let linter = CommandLinter::new("cat").args(["--"]).current_dir(dir.path());
        let messages = linter.lint(Some(Path::new("report.json")), "ignored").unwrap();
        assert_eq!(messages.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_without_output() {
        let linter = CommandLinter::new("false");
        let err = linter.lint(None, "").unwrap_err();
        assert!(matches!(err, FixError::Linter(_)));
    }
}
