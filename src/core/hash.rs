use std::fs::File;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

/// Stream a file through SHA-256
pub fn compute_file_hash(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Generate a short hash (first 12 characters) for display purposes
pub fn short_hash(full_hash: &str) -> String {
    full_hash.chars().take(12).collect()
}
