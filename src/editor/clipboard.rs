//! Clipboard collaborator and copy feedback bookkeeping
//!
//! Uses the arboard crate for cross-platform clipboard access. Writes are
//! blocking, so async callers go through [`write_text_async`], which runs
//! them on tokio's blocking pool.

use crate::error::{ClipboardError, ClipboardResult};
use arboard::Clipboard;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Anything that can receive copied text
pub trait ClipboardWriter: Send + Sync {
    fn write_text(&self, text: &str) -> ClipboardResult<()>;
}

/// System clipboard.
///
/// arboard's Clipboard is not Send/Sync on all platforms, so a handle is
/// opened per operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&self, text: &str) -> ClipboardResult<()> {
        let mut clipboard =
            Clipboard::new().map_err(|e| ClipboardError::AccessDenied(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::WriteError(e.to_string()))
    }
}

/// Clipboard that keeps everything written to it
#[derive(Debug, Default)]
pub struct RecordingClipboard {
    texts: Mutex<Vec<String>>,
    fail_with: Option<ClipboardError>,
}

impl RecordingClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose every write fails
    pub fn failing(error: ClipboardError) -> Self {
        Self {
            texts: Mutex::new(Vec::new()),
            fail_with: Some(error),
        }
    }

    /// Texts written so far, oldest first
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

impl ClipboardWriter for RecordingClipboard {
    fn write_text(&self, text: &str) -> ClipboardResult<()> {
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }
        self.texts
            .lock()
            .map_err(|e| ClipboardError::AccessDenied(e.to_string()))?
            .push(text.to_string());
        Ok(())
    }
}

/// Write to `clipboard` without blocking the event loop
pub async fn write_text_async(
    clipboard: Arc<dyn ClipboardWriter>,
    text: String,
) -> ClipboardResult<()> {
    tokio::task::spawn_blocking(move || clipboard.write_text(&text))
        .await
        .map_err(|_| ClipboardError::Interrupted)?
}

/// Tracks which copy is the latest per block so that only the newest
/// feedback timer may revert the icon.
#[derive(Debug, Default)]
pub struct CopyFeedbackTracker {
    next_generation: u64,
    latest: HashMap<String, u64>,
}

impl CopyFeedbackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new copy on `block_id` and return its generation
    pub fn begin(&mut self, block_id: &str) -> u64 {
        self.next_generation += 1;
        self.latest.insert(block_id.to_string(), self.next_generation);
        self.next_generation
    }

    /// Whether `generation` is still the newest copy on `block_id`
    pub fn is_current(&self, block_id: &str, generation: u64) -> bool {
        self.latest.get(block_id) == Some(&generation)
    }

    /// Consume the newest generation if it matches; used when reverting
    pub fn expire(&mut self, block_id: &str, generation: u64) -> bool {
        if self.is_current(block_id, generation) {
            self.latest.remove(block_id);
            true
        } else {
            false
        }
    }

    /// Block ids changed; pending timers no longer refer to anything
    pub fn clear(&mut self) {
        self.latest.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard_records() {
        let clipboard = RecordingClipboard::new();
        clipboard.write_text("one").unwrap();
        clipboard.write_text("two").unwrap();
        assert_eq!(clipboard.texts(), ["one", "two"]);
    }

    #[test]
    fn test_failing_clipboard() {
        let clipboard = RecordingClipboard::failing(ClipboardError::AccessDenied("no".into()));
        assert!(clipboard.write_text("x").is_err());
        assert!(clipboard.texts().is_empty());
    }

    #[tokio::test]
    async fn test_async_write() {
        let clipboard = Arc::new(RecordingClipboard::new());
        write_text_async(clipboard.clone(), "async".to_string())
            .await
            .unwrap();
        assert_eq!(clipboard.texts(), ["async"]);
    }

    #[test]
    fn test_newer_copy_supersedes_older_timer() {
        let mut tracker = CopyFeedbackTracker::new();
        let first = tracker.begin("code-a");
        let second = tracker.begin("code-a");
        let other = tracker.begin("code-b");

        assert!(!tracker.expire("code-a", first));
        assert!(tracker.expire("code-a", second));
        assert!(!tracker.expire("code-a", second));
        assert!(tracker.is_current("code-b", other));

        tracker.clear();
        assert!(!tracker.is_current("code-b", other));
    }
}
