//! Build script for the site crate.
//!
//! Fingerprints the stylesheet so templates can link an immutable,
//! content-addressed asset: `main.css` is copied to
//! `static/css/derived/main.<hash>.css` and the hash is exported as the
//! compile-time `CSS_HASH` environment variable.

use std::path::Path;
use std::{env, fs};

use sha2::{Digest, Sha256};

const HASH_CHARS: usize = 12;

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    fingerprint_stylesheet(Path::new(&manifest_dir));
}

fn fingerprint_stylesheet(manifest_dir: &Path) {
    let source = manifest_dir.join("static/css/main.css");
    println!("cargo:rerun-if-changed={}", source.display());

    // A fresh checkout may not have the stylesheet yet; an empty hash
    // keeps the build going and the template link simply misses.
    let Ok(content) = fs::read(&source) else {
        println!("cargo:warning=static/css/main.css missing, CSS_HASH left empty");
        println!("cargo:rustc-env=CSS_HASH=");
        return;
    };

    let digest = format!("{:x}", Sha256::digest(&content));
    let (short_hash, _) = digest.split_at(HASH_CHARS);
    println!("cargo:rustc-env=CSS_HASH={short_hash}");

    let derived_dir = manifest_dir.join("static/css/derived");
    fs::create_dir_all(&derived_dir).expect("Failed to create derived CSS directory");

    // Drop fingerprints of earlier revisions so the directory holds
    // exactly the file the current binary links
    if let Ok(entries) = fs::read_dir(&derived_dir) {
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with("main.") && name.ends_with(".css") {
                let _ = fs::remove_file(entry.path());
            }
        }
    }

    let derived = derived_dir.join(format!("main.{short_hash}.css"));
    fs::copy(&source, &derived).expect("Failed to copy CSS into the derived directory");
}
