//! Client build fingerprint for the `X-Client-Hash` header.
//!
//! The fingerprint is the first 16 hex characters of the SHA-256 of the
//! running executable. It is best-effort evidence of which build is talking
//! to the gateway; when the executable cannot be read the header is omitted.

use once_cell::sync::OnceCell;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::trace;

/// Length of the fingerprint in hex characters.
pub const FINGERPRINT_LEN: usize = 16;

static PROCESS_FINGERPRINT: OnceCell<Option<String>> = OnceCell::new();

/// Fingerprint of arbitrary bytes.
pub fn fingerprint_bytes(bytes: &[u8]) -> String {
    truncated_hex(Sha256::digest(bytes).as_slice())
}

/// Fingerprint of a file on disk, hashed as a stream.
pub fn fingerprint_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(truncated_hex(hasher.finalize().as_slice()))
}

fn truncated_hex(digest: &[u8]) -> String {
    let mut hex = hex::encode(digest);
    hex.truncate(FINGERPRINT_LEN);
    hex
}

/// Fingerprint of the running executable, computed once per process.
pub fn process_fingerprint() -> Option<&'static str> {
    PROCESS_FINGERPRINT
        .get_or_init(|| {
            let computed = std::env::current_exe().and_then(|exe| fingerprint_file(&exe));
            match computed {
                Ok(hash) => Some(hash),
                Err(e) => {
                    trace!(error = %e, "client fingerprint unavailable");
                    None
                }
            }
        })
        .as_deref()
}
