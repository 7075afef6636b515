use std::path::Path;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc::UnboundedReceiver;

use batchfix_core::{FixError, LintEngine, LintFix, LintMessage};

pub async fn send_msg<W: AsyncWriteExt + Unpin>(writer: &mut W, msg: &str) {
    let content = format!("Content-Length: {}\r\n\r\n{}", msg.len(), msg);
    writer.write_all(content.as_bytes()).await.unwrap();
    writer.flush().await.unwrap();
}

pub async fn recv_msg<R: AsyncReadExt + Unpin>(reader: &mut R) -> Option<String> {
    // Simple LSP parser: read headers until \r\n\r\n, parse Content-Length, read body
    let mut buffer = Vec::new();
    let mut content_length = 0;

    // Read headers
    loop {
        let byte = reader.read_u8().await.ok()?;
        buffer.push(byte);
        if buffer.ends_with(b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buffer);
            for line in headers.lines() {
                if line.to_lowercase().starts_with("content-length:") {
                    let parts: Vec<&str> = line.split(':').collect();
                    if parts.len() == 2 {
                        content_length = parts[1].trim().parse().unwrap_or_else(|e| {
                            panic!("Failed to parse Content-Length: {e}, header: {line}")
                        });
                    }
                }
            }
            break;
        }
    }

    if content_length == 0 {
        return None;
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).await.ok()?;

    Some(String::from_utf8(body).unwrap())
}

/// Receives messages until one satisfies `matches`, giving up after 5 seconds.
pub async fn wait_for<F>(rx: &mut UnboundedReceiver<String>, matches: F) -> Option<serde_json::Value>
where
    F: Fn(&serde_json::Value) -> bool,
{
    let timeout = tokio::time::sleep(Duration::from_secs(5));
    tokio::pin!(timeout);

    loop {
        tokio::select! {
            msg = rx.recv() => {
                let value: serde_json::Value = serde_json::from_str(&msg?).ok()?;
                if matches(&value) {
                    return Some(value);
                }
            }
            _ = &mut timeout => return None,
        }
    }
}

/// Flags every `red` (fix: `#f00`) and every non-empty line that does not
/// end in a semicolon (fix: the line with `;` appended).
pub struct StyleLinter;

impl LintEngine for StyleLinter {
    fn lint(&self, _path: Option<&Path>, content: &str) -> Result<Vec<LintMessage>, FixError> {
        let mut messages = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line_no = index as u32 + 1;
            for (column, _) in line.match_indices("red") {
                messages.push(LintMessage {
                    line: line_no,
                    start: column as u32 + 1,
                    endline: line_no,
                    end: column as u32 + 3,
                    descr: "Use hex color".to_string(),
                    rule: "hex".to_string(),
                    fix: Some(LintFix {
                        replace: "#f00".to_string(),
                    }),
                });
            }
            if !line.is_empty() && !line.ends_with(';') {
                messages.push(LintMessage {
                    line: line_no,
                    start: 1,
                    endline: line_no,
                    end: line.len() as u32,
                    descr: "Missing semicolon".to_string(),
                    rule: "semicolon".to_string(),
                    fix: Some(LintFix {
                        replace: format!("{};", line),
                    }),
                });
            }
        }
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recv_msg_success() {
        let payload = r#"{"jsonrpc":"2.0","method":"abc","params":{}}"#;
        let data = format!("Content-Length: {}\r\n\r\n{}", payload.len(), payload);
        let mut cursor = std::io::Cursor::new(data.as_bytes());

        let result = recv_msg(&mut cursor).await;
        assert_eq!(result.unwrap(), payload);
    }

    #[tokio::test]
    #[should_panic(expected = "Failed to parse Content-Length")]
    async fn test_recv_msg_parse_error() {
        let data = "Content-Length: invalid\r\n\r\n{}";
        let mut cursor = std::io::Cursor::new(data.as_bytes());
        let _ = recv_msg(&mut cursor).await;
    }

    #[test]
    fn test_style_linter() {
        let messages = StyleLinter.lint(None, "color red\nborder 0;\n").unwrap();
        let rules: Vec<&str> = messages.iter().map(|m| m.rule.as_str()).collect();
        assert_eq!(rules, vec!["hex", "semicolon"]);
    }
}
