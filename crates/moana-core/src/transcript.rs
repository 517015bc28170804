//! Plain-text transcripts of closed ticket channels.

use crate::gateway::{ChannelHandle, GatewayError, TranscriptEntry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moana_common::{flatten_lines, format_timestamp};
use std::path::{Path, PathBuf};
use tracing::info;

/// Renders one transcript line: `[YYYY-MM-DD HH:MM:SS] name (id): text`.
pub fn render_line(entry: &TranscriptEntry) -> String {
    format!(
        "[{}] {} ({}): {}",
        format_timestamp(entry.at),
        entry.author_name,
        entry.author_id,
        flatten_lines(&entry.text)
    )
}

/// Renders a whole transcript, one message per line.
pub fn render_transcript(entries: &[TranscriptEntry]) -> String {
    entries.iter().map(render_line).collect::<Vec<_>>().join("\n")
}

/// File name for a transcript: `<channel>_<YYYYmmddHHMMSS>.txt`.
pub fn transcript_file_name(channel_name: &str, at: DateTime<Utc>) -> String {
    let safe_name: String = channel_name
        .chars()
        .map(|c| if std::path::is_separator(c) || c == '.' { '-' } else { c })
        .collect();
    format!("{safe_name}_{}.txt", at.format("%Y%m%d%H%M%S"))
}

/// Destination for captured transcripts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptSink: Send + Sync {
    /// Persists the transcript of `channel` and returns where it went.
    async fn store(
        &self,
        channel: &ChannelHandle,
        entries: &[TranscriptEntry],
        at: DateTime<Utc>,
    ) -> Result<PathBuf, GatewayError>;
}

/// Writes transcripts as text files into a directory.
#[derive(Debug, Clone)]
pub struct FileTranscriptStore {
    directory: PathBuf,
}

impl FileTranscriptStore {
    /// Creates a store writing into `directory`, created on first use.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Target directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

#[async_trait]
impl TranscriptSink for FileTranscriptStore {
    async fn store(
        &self,
        channel: &ChannelHandle,
        entries: &[TranscriptEntry],
        at: DateTime<Utc>,
    ) -> Result<PathBuf, GatewayError> {
        tokio::fs::create_dir_all(&self.directory).await?;
        let path = self.directory.join(transcript_file_name(&channel.name, at));
        tokio::fs::write(&path, render_transcript(entries)).await?;
        info!("Saved transcript {} ({} messages)", path.display(), entries.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moana_common::test_utils::{discord_fixtures, mock_timestamp};
    use moana_common::UserId;

    fn entry(text: &str, sec: u32) -> TranscriptEntry {
        TranscriptEntry {
            at: mock_timestamp(2025, 6, 1, 9, 30, sec),
            author_id: UserId(42),
            author_name: "moana".to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_render_line_flattens_newlines() {
        assert_eq!(
            render_line(&entry("hello\nworld", 5)),
            "[2025-06-01 09:30:05] moana (42): hello world"
        );
    }

    #[test]
    fn test_render_transcript_one_line_per_message() {
        let rendered = render_transcript(&[entry("first", 1), entry("second", 2)]);
        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.starts_with("[2025-06-01 09:30:01]"));
        assert_eq!(render_transcript(&[]), "");
    }

    #[test]
    fn test_file_name_is_timestamped_and_safe() {
        let at = mock_timestamp(2025, 6, 1, 9, 30, 0);
        assert_eq!(transcript_file_name("ticket-moana", at), "ticket-moana_20250601093000.txt");
        assert_eq!(transcript_file_name("../etc", at), "---etc_20250601093000.txt");
    }

    #[tokio::test]
    async fn test_file_store_writes_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTranscriptStore::new(dir.path().join("transcripts"));
        let channel = ChannelHandle::new(discord_fixtures::test_channel_id(), "ticket-moana");
        let at = mock_timestamp(2025, 6, 1, 10, 0, 0);

        let path = store
            .store(&channel, &[entry("need help", 0), entry("on it", 9)], at)
            .await
            .unwrap();

        assert!(path.starts_with(store.directory()));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "[2025-06-01 09:30:00] moana (42): need help\n[2025-06-01 09:30:09] moana (42): on it"
        );
    }
}
