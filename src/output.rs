use anyhow::{Context, Result};
use arboard::Clipboard;
#[cfg(target_os = "linux")]
use std::time::{Duration, Instant};

/// How long the process keeps serving the X11/Wayland selection after a
/// copy. Returns early once a clipboard manager or another app takes it.
#[cfg(target_os = "linux")]
pub const CLIPBOARD_HANDOFF: Duration = Duration::from_secs(2);

/// Printed on stdout when the provider returns no text.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate command.";

pub fn wrap_in_backticks(text: &str) -> String {
    format!("`{}`", text)
}

pub trait ClipboardSink {
    fn copy(&mut self, text: &str) -> Result<()>;
}

/// The desktop clipboard, opened on each copy.
///
/// On Linux the selection lives only as long as its owner, so the copy
/// blocks for up to `CLIPBOARD_HANDOFF` unless something takes it over.
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new().context("Failed to access the clipboard")?;
        set_clipboard_text(&mut clipboard, text).context("Failed to write to the clipboard")?;
        Ok(())
    }
}

#[cfg(target_os = "linux")]
fn set_clipboard_text(clipboard: &mut Clipboard, text: &str) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;

    clipboard
        .set()
        .wait_until(Instant::now() + CLIPBOARD_HANDOFF)
        .text(text.to_owned())
}

#[cfg(not(target_os = "linux"))]
fn set_clipboard_text(clipboard: &mut Clipboard, text: &str) -> Result<(), arboard::Error> {
    clipboard.set_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_handoff_is_bounded() {
        assert!(CLIPBOARD_HANDOFF > Duration::ZERO);
        assert!(CLIPBOARD_HANDOFF <= Duration::from_secs(5));
    }

    #[test]
    fn backticks_wrap_without_other_changes() {
        assert_eq!(wrap_in_backticks("ls"), "`ls`");
        assert_eq!(
            wrap_in_backticks("find . -name '*.rs' | xargs wc -l"),
            "`find . -name '*.rs' | xargs wc -l`"
        );
        assert_eq!(wrap_in_backticks(" a  b "), "` a  b `");
    }
}
