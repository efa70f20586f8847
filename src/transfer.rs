use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use md5::{Digest, Md5};
use tracing::debug;

use crate::error::ExtractError;

/// Where the legacy web root lives on the extraction host.
pub const DEFAULT_STORAGE_ROOT: &str = "/var/www/drupal/drupal-root";

const PRIVATE_SCHEME: &str = "private://";
const PUBLIC_SCHEME: &str = "public://";
const PRIVATE_DIR: &str = "sites/default/files/private";
const PUBLIC_DIR: &str = "sites/default/files";

/// Translate a stored file URI into its concrete path under the storage root.
pub fn resolve_source(storage_root: &Path, uri: &str) -> PathBuf {
    if let Some(rest) = uri.strip_prefix(PRIVATE_SCHEME) {
        storage_root.join(PRIVATE_DIR).join(rest)
    } else if let Some(rest) = uri.strip_prefix(PUBLIC_SCHEME) {
        storage_root.join(PUBLIC_DIR).join(rest)
    } else {
        storage_root.join(uri)
    }
}

/// Copy one attachment into the flat destination directory and verify the
/// copied bytes against the stored checksum. Returns the base filename.
///
/// On a hash mismatch the bad copy is left in place for inspection; the run
/// aborts either way.
pub fn transfer(
    storage_root: &Path,
    uri: &str,
    destination: &Path,
    expected_md5: &str,
) -> Result<String, ExtractError> {
    let source = resolve_source(storage_root, uri);
    if !source.exists() {
        return Err(ExtractError::MissingSource {
            uri: uri.to_string(),
            path: source,
        });
    }

    // A URI whose resolved path has no final component (e.g. it ends in
    // "..") names no file at all.
    let name = match source.file_name() {
        Some(n) => n.to_string_lossy().into_owned(),
        None => {
            return Err(ExtractError::MissingSource {
                uri: uri.to_string(),
                path: source,
            })
        }
    };
    let dest = destination.join(&name);
    // Transfers are never silently overwritten; each run uses a clean
    // destination, so an existing file means two entities share a filename.
    if dest.exists() {
        return Err(ExtractError::DestinationCollision { path: dest });
    }

    debug!("Copying {} -> {}", source.display(), dest.display());
    fs::copy(&source, &dest)?;

    let actual = md5_hex(&dest)?;
    if !actual.eq_ignore_ascii_case(expected_md5) {
        return Err(ExtractError::Integrity {
            path: dest,
            expected: expected_md5.to_string(),
            actual,
        });
    }
    Ok(name)
}

fn md5_hex(path: &Path) -> Result<String, ExtractError> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Md5::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
