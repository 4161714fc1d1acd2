//! Hash domain governance lock tests.
//!
//! Proves:
//! 1. Domain prefixes are unique and null-terminated
//! 2. All domains follow `MOVECOMPAT::*::V1\0`
//! 3. No raw `MOVECOMPAT::` domain literals in production source outside `hash.rs`

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use movecompat_kernel::proof::hash::{DOMAIN_ACQUISITION_TRACE, DOMAIN_DEX_SNAPSHOT, DOMAIN_QUERY_REPORT};

const ALL: [&[u8]; 3] = [DOMAIN_DEX_SNAPSHOT, DOMAIN_QUERY_REPORT, DOMAIN_ACQUISITION_TRACE];

// ---------------------------------------------------------------------------
// 1. Unique, null-terminated
// ---------------------------------------------------------------------------

#[test]
fn domains_unique_and_null_terminated() {
    let mut seen = BTreeSet::new();
    for domain in ALL {
        let shown = String::from_utf8_lossy(domain);
        assert!(seen.insert(domain), "duplicate domain bytes: {shown}");
        assert!(domain.ends_with(&[0]), "{shown} is not null-terminated");
        assert_eq!(
            domain.iter().filter(|&&b| b == 0).count(),
            1,
            "{shown} has an interior null"
        );
    }
}

// ---------------------------------------------------------------------------
// 2. Naming convention
// ---------------------------------------------------------------------------

#[test]
fn domains_follow_naming_convention() {
    for domain in ALL {
        let shown = String::from_utf8_lossy(domain);
        assert!(domain.starts_with(b"MOVECOMPAT::"), "{shown} does not start with MOVECOMPAT::");
        assert!(domain.ends_with(b"::V1\0"), "{shown} does not end with ::V1\\0");
    }
}

// ---------------------------------------------------------------------------
// 3. Single authority for domain literals
// ---------------------------------------------------------------------------

#[test]
fn no_raw_domain_literals_outside_authority() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
    let pattern = "b\"MOVECOMPAT::";
    let mut violations = Vec::new();
    let mut scanned = 0;

    for crate_dir in ["kernel", "search", "harness"] {
        for path in rust_files(&root.join(crate_dir).join("src")) {
            scanned += 1;
            if path.ends_with("proof/hash.rs") {
                continue;
            }
            let content = std::fs::read_to_string(&path).expect("source is readable");
            for (i, line) in content.lines().enumerate() {
                let trimmed = line.trim();
                if !trimmed.starts_with("//") && trimmed.contains(pattern) {
                    violations.push(format!("  {}:{}: {trimmed}", path.display(), i + 1));
                }
            }
        }
    }

    assert!(scanned > 10, "scanned only {scanned} files; is the workspace layout intact?");
    assert!(
        violations.is_empty(),
        "raw MOVECOMPAT:: domain literals found outside proof/hash.rs:\n{}",
        violations.join("\n")
    );
}

fn rust_files(dir: &Path) -> Vec<PathBuf> {
    let mut results = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                results.extend(rust_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                results.push(path);
            }
        }
    }
    results
}
