use super::InfraError;
use arboard::Clipboard;
use tracing::debug;

pub struct ClipboardService;

impl ClipboardService {
    pub fn copy(text: &str) -> Result<(), InfraError> {
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text.to_string())?;
        debug!(len = text.len(), "copied to clipboard");
        Ok(())
    }
}
