use engine_logging::engine_warn;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DesktopError {
    #[error("clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),
    #[error("could not open browser: {0}")]
    Open(#[from] std::io::Error),
}

/// System clipboard and browser. The clipboard handle is kept alive so that
/// copied text stays available on platforms where the owner must persist.
#[derive(Default)]
pub struct Desktop {
    clipboard: Option<arboard::Clipboard>,
}

impl Desktop {
    pub fn copy_text(&mut self, text: &str) -> Result<(), DesktopError> {
        let mut clipboard = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()?,
        };
        if let Err(err) = clipboard.set_text(text.to_owned()) {
            engine_warn!("Clipboard write failed, dropping handle: {}", err);
            return Err(err.into());
        }
        self.clipboard = Some(clipboard);
        Ok(())
    }

    pub fn open_url(&self, url: &str) -> Result<(), DesktopError> {
        open::that(url)?;
        Ok(())
    }
}
