//! Format-sniffing file loader and writer.
//!
//! Loading walks an ordered chain of fallible codecs: archived graph, then
//! structured document, then raw bytes. Each candidate answers with a
//! definite success or failure, so the chain advances deterministically and
//! unrecognized content always lands as `Raw` instead of an error.
//!
//! Writing inverts the choice from the payload's own kind and offers an
//! atomic-replace mode that never leaves a truncated target behind.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, error};

use crate::archive;
use crate::coder::{Codable, Described};
use crate::document;
use crate::model::Stored;
use crate::registry::Registry;
use crate::{Error, Result};

// ============================================================================
// Loader
// ============================================================================

/// Load and classify the file at `path`.
pub fn load_path(path: impl AsRef<Path>, registry: &Registry) -> Result<Stored> {
    let bytes = fs::read(path.as_ref())?;
    let stored = load_bytes(bytes, registry)?;
    debug!(path = %path.as_ref().display(), format = ?stored.format(), "loaded");
    Ok(stored)
}

/// Classify `bytes` through the codec chain.
///
/// Errors only when the content is structurally an archive (marker and
/// version match) but its payload conflicts with the declared attribute
/// kinds — partial objects of the wrong shape must not escape. Everything
/// else degrades down the chain.
pub fn load_bytes(bytes: Vec<u8>, registry: &Registry) -> Result<Stored> {
    match archive::from_bytes(&bytes, registry) {
        Ok(object) => return Ok(Stored::Object(object)),
        Err(err @ Error::TypeMismatch { .. }) => return Err(err),
        Err(_) => {} // not an archive — advance
    }

    match document::from_bytes(&bytes) {
        Ok(value) => Ok(Stored::Document(value)),
        Err(_) => Ok(Stored::Raw(bytes)),
    }
}

/// Typed load: the reconstructed root must be exactly `T`.
///
/// A root of any other class — related or not — reports
/// [`Error::TypeMismatch`] naming both classes; no partially-initialized
/// object is returned. Untyped [`load_path`] accepts any root.
pub fn load_path_as<T>(path: impl AsRef<Path>, registry: &Registry) -> Result<T>
where
    T: Described + Codable,
{
    let bytes = fs::read(path.as_ref())?;
    load_bytes_as(bytes, registry)
}

/// Typed load from bytes. See [`load_path_as`].
pub fn load_bytes_as<T>(bytes: Vec<u8>, registry: &Registry) -> Result<T>
where
    T: Described + Codable,
{
    let expected = T::type_descriptor();
    match load_bytes(bytes, registry)? {
        Stored::Object(object) => object
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|object| Error::TypeMismatch {
                expected: expected.name().to_owned(),
                got: object.descriptor().name().to_owned(),
            }),
        other => Err(Error::TypeMismatch {
            expected: expected.name().to_owned(),
            got: format!("{:?}", other.format()),
        }),
    }
}

// ============================================================================
// Writer
// ============================================================================

/// Write `stored` to `path`, choosing the encoding from its kind:
/// documents as human-readable JSON, objects as an archived graph, raw
/// bytes verbatim.
///
/// Returns the outcome as a boolean so batch callers continue past
/// individual failures; the cause is logged. Use [`try_write`] to get the
/// error itself.
pub fn write(stored: &Stored, path: impl AsRef<Path>, registry: &Registry, atomic: bool) -> bool {
    match try_write(stored, path.as_ref(), registry, atomic) {
        Ok(()) => true,
        Err(err) => {
            error!(path = %path.as_ref().display(), %err, "write failed");
            false
        }
    }
}

/// Fallible variant of [`write`].
pub fn try_write(
    stored: &Stored,
    path: impl AsRef<Path>,
    registry: &Registry,
    atomic: bool,
) -> Result<()> {
    let bytes = match stored {
        Stored::Object(object) => archive::to_bytes(object.as_ref(), registry)?,
        Stored::Document(value) => document::to_bytes(value)?,
        Stored::Raw(raw) => raw.clone(),
    };

    if atomic {
        write_atomic(path.as_ref(), &bytes)?;
    } else {
        fs::write(path.as_ref(), &bytes)?;
    }
    debug!(path = %path.as_ref().display(), format = ?stored.format(), bytes = bytes.len(), "wrote");
    Ok(())
}

/// Write a sibling temp file, then rename over the target. A failure before
/// the rename leaves the target untouched; the temp file is cleaned up
/// best-effort.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let tmp = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    if let Err(err) = fs::write(&tmp, bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    Ok(())
}
