//! Determinism lock tests.
//!
//! Proves:
//! 1. Repeated in-process searches produce byte-identical traces and reports
//! 2. Reloading the data set from its canonical bytes preserves the digest
//! 3. The fixture binary produces identical output across cwd and locale
//!    variants, and that output matches the in-process report

use std::path::Path;
use std::process::Command;

use lock_tests::demo;
use movecompat_harness::query::search_by_name;
use movecompat_harness::report::search_report;
use movecompat_kernel::dex::dataset::Dex;
use movecompat_search::policy::SearchPolicy;

const N_RUNS: usize = 10;

const QUERY: [&str; 4] = ["Bulbasaur", "30", "Body Slam", "Razor Leaf"];

fn report_bytes(dex: &Dex) -> Vec<u8> {
    let (request, result) =
        search_by_name(dex, QUERY[0], 30, &QUERY[2..], &SearchPolicy::default()).expect("query resolves");
    search_report(dex, &request, &result)
        .expect("report builds")
        .to_json_bytes()
        .expect("envelope canonicalizes")
}

// ---------------------------------------------------------------------------
// 1. In-process
// ---------------------------------------------------------------------------

#[test]
fn search_report_identical_across_runs() {
    let dex = demo();
    let first = report_bytes(&dex);
    for run in 1..N_RUNS {
        assert_eq!(report_bytes(&dex), first, "report diverged on run {run}");
    }
}

#[test]
fn trace_digest_identical_across_fresh_data_sets() {
    let digests: Vec<String> = (0..N_RUNS)
        .map(|_| {
            let dex = demo();
            let (_, result) = search_by_name(&dex, "Pichu", 10, &["Charm", "Double Kick"], &SearchPolicy::default())
                .expect("query resolves");
            let trace = result.outcome.trace().expect("found");
            trace.digest(&dex).expect("trace digest").as_str().to_string()
        })
        .collect();
    assert!(digests.windows(2).all(|w| w[0] == w[1]), "trace digests diverged: {digests:?}");
}

// ---------------------------------------------------------------------------
// 2. Data set round trip
// ---------------------------------------------------------------------------

#[test]
fn canonical_bytes_reload_to_same_digest() {
    let dex = demo();
    let bytes = dex.canonical_bytes().expect("canonical bytes");
    let reloaded = Dex::from_json_slice(&bytes).expect("canonical bytes reload");
    assert_eq!(reloaded.digest().expect("digest"), dex.digest().expect("digest"));
    assert_eq!(report_bytes(&reloaded), report_bytes(&dex));
}

// ---------------------------------------------------------------------------
// 3. Cross-process
// ---------------------------------------------------------------------------

fn run_variant(work_dir: &Path, env_overrides: &[(&str, &str)]) -> String {
    let bin = env!("CARGO_BIN_EXE_search_fixture");
    let mut command = Command::new(bin);
    command
        .args(QUERY)
        .current_dir(work_dir)
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("LANGUAGE")
        .env_remove("RUST_LOG");
    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!("failed to spawn {bin} (work_dir={}, overrides={env_overrides:?}): {e}", work_dir.display())
    });
    assert!(
        output.status.success(),
        "search_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

#[test]
fn crossproc_output_identical_across_env_variants() {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let temp = tempfile::tempdir().expect("temp dir");

    let baseline = run_variant(manifest_dir, &[]);
    let moved = run_variant(temp.path(), &[]);
    let localized = run_variant(manifest_dir, &[("LC_ALL", "C"), ("LANG", "tr_TR.UTF-8")]);

    assert_eq!(baseline, moved, "output depends on cwd");
    assert_eq!(baseline, localized, "output depends on locale");
    assert!(baseline.contains("result=found"), "unexpected output:\n{baseline}");
}

#[test]
fn crossproc_report_matches_in_process() {
    let output = run_variant(Path::new(env!("CARGO_MANIFEST_DIR")), &[]);
    let envelope = output.lines().last().expect("envelope line");
    let expected = String::from_utf8(report_bytes(&demo())).expect("canonical JSON is UTF-8");
    assert_eq!(envelope, expected);
}
