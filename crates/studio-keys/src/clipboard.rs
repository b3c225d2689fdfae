//! Clipboard seam.

use async_trait::async_trait;
use studio_core::Result;
use tokio::sync::RwLock;

/// A platform clipboard.
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents with `text`.
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// Clipboard held in process memory.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: RwLock<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents.
    pub async fn contents(&self) -> Option<String> {
        self.contents.read().await.clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        *self.contents.write().await = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_replaces_contents() {
        let clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.contents().await, None);
        clipboard.write_text("one").await.unwrap();
        clipboard.write_text("two").await.unwrap();
        assert_eq!(clipboard.contents().await.as_deref(), Some("two"));
    }
}
