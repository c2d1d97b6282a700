//! Background loading of profile pictures into data URIs.
//!
//! The add/edit form asks the [`PictureLoader`] for a file; a worker thread
//! reads and encodes it while the UI keeps running. Each request gets a
//! [`PictureTicket`]. Only the result for the ticket still pending is handed
//! back by [`PictureLoader::poll`]; anything else (cancelled, superseded,
//! form closed) is dropped.
//!
use anyhow::{Context, bail};
use base64::{Engine, engine::general_purpose};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use tracing::{debug, warn};

use crate::error::ValidationError;

/// Identifies one load request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PictureTicket(pub(crate) u64);

/// Outcome delivered for the pending ticket.
#[derive(Debug)]
pub struct PictureLoaded {
    pub ticket: PictureTicket,
    pub path: PathBuf,
    pub result: Result<String, String>,
}

struct Pending {
    ticket: PictureTicket,
    cancelled: Arc<AtomicBool>,
}

pub struct PictureLoader {
    tx: Sender<PictureLoaded>,
    rx: Receiver<PictureLoaded>,
    next_ticket: u64,
    pending: Option<Pending>,
}

impl PictureLoader {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self { tx, rx, next_ticket: 1, pending: None }
    }

    /// Start loading `path` on a worker thread. Supersedes any pending load.
    pub fn request(&mut self, path: PathBuf) -> PictureTicket {
        self.cancel();
        let ticket = PictureTicket(self.next_ticket);
        self.next_ticket += 1;
        let cancelled = Arc::new(AtomicBool::new(false));
        self.pending = Some(Pending { ticket, cancelled: cancelled.clone() });

        let tx = self.tx.clone();
        debug!(ticket = ticket.0, path = %path.display(), "picture load requested");
        std::thread::spawn(move || {
            let result = encode_data_uri(&path).map_err(|e| format!("{e:#}"));
            if cancelled.load(Ordering::Relaxed) {
                debug!(ticket = ticket.0, "picture load cancelled, dropping result");
                return;
            }
            // Receiver gone means the app is shutting down.
            let _ = tx.send(PictureLoaded { ticket, path, result });
        });
        ticket
    }

    /// Abandon the pending load, if any.
    pub fn cancel(&mut self) {
        if let Some(p) = self.pending.take() {
            p.cancelled.store(true, Ordering::Relaxed);
            debug!(ticket = p.ticket.0, "picture load cancelled");
        }
    }

    pub fn pending_ticket(&self) -> Option<PictureTicket> {
        self.pending.as_ref().map(|p| p.ticket)
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Drain finished loads; return the one matching the pending ticket.
    pub fn poll(&mut self) -> Option<PictureLoaded> {
        loop {
            match self.rx.try_recv() {
                Ok(done) => {
                    if self.pending_ticket() == Some(done.ticket) {
                        self.pending = None;
                        if let Err(e) = &done.result {
                            warn!(path = %done.path.display(), error = %e, "picture load failed");
                        }
                        return Some(done);
                    }
                    debug!(ticket = done.ticket.0, "discarding stale picture result");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
            }
        }
    }
}

impl Default for PictureLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// MIME type for an image path, judged by extension.
pub fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        _ => return None,
    };
    Some(mime)
}

/// Read an image file and wrap it as `data:<mime>;base64,<payload>`.
pub fn encode_data_uri(path: &Path) -> anyhow::Result<String> {
    let Some(mime) = image_mime(path) else {
        bail!(ValidationError::NotAnImage(path.display().to_string()));
    };
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read picture file: {}", path.display()))?;
    Ok(format!("data:{mime};base64,{}", general_purpose::STANDARD.encode(bytes)))
}
