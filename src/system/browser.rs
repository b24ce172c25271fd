//! Best-effort browser launch

use std::io;

/// Open `url` in the desktop browser. Never fails the caller; returns whether
/// the launcher reported success.
pub fn open(url: &str) -> bool {
    open_with(url, |url| ::open::that(url))
}

fn open_with<F>(url: &str, launch: F) -> bool
where
    F: FnOnce(&str) -> io::Result<()>,
{
    log::debug!("opening {url}");
    match launch(url) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("could not open browser, visit {url} manually: {e}");
            false
        }
    }
}
