use anyhow::Result;
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

#[derive(Serialize)]
struct LogEntry {
    timestamp: String, // ISO-8601 local time
    from: String,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    persona: Option<String>,
}

/// Appends one JSONL line per conversation turn to a timestamped file
/// under `logs/`.
pub struct ConversationLogger {
    file_path: PathBuf,
    file: tokio::fs::File,
}

impl ConversationLogger {
    /// Create a new logger; the file name is derived from the current
    /// local time.
    pub async fn new(workspace: &Path) -> Result<Self> {
        let logs_dir = workspace.join("logs");
        fs::create_dir_all(&logs_dir).await?;

        let now_local = Local::now();
        let filename = format!("personaai-{}.jsonl", now_local.format("%Y-%m-%d-%H%M%S"));
        let file_path = logs_dir.join(filename);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)
            .await?;

        Ok(Self { file_path, file })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Append a single entry. Logging failures are reported but never
    /// interrupt the conversation.
    pub async fn log(&mut self, from: &str, text: &str, persona: Option<&str>) {
        let entry = LogEntry {
            timestamp: Local::now().to_rfc3339(),
            from: from.to_string(),
            text: text.to_string(),
            persona: persona.map(|p| p.to_string()),
        };

        match serde_json::to_string(&entry) {
            Ok(mut line) => {
                line.push('\n');
                if let Err(e) = self.file.write_all(line.as_bytes()).await {
                    eprintln!("Failed to write conversation log: {}", e);
                }
            }
            Err(e) => eprintln!("Failed to serialize log entry: {}", e),
        }
    }
}
