//! Binary that runs one compatibility search against the demo data set and
//! prints deterministic output lines for cross-process verification.
//!
//! Usage: `search_fixture <species> <level> [ability...]`
//!
//! Output: key=value lines, then the canonical report envelope on the last
//! line.

use lock_tests::demo;
use movecompat_harness::query::search_by_name;
use movecompat_harness::report::search_report;
use movecompat_search::policy::SearchPolicy;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (species, rest) = args.split_first().expect("usage: search_fixture <species> <level> [ability...]");
    let (level, abilities) = rest.split_first().expect("missing level");
    let level: u8 = level.parse().expect("level is a number");

    let dex = demo();
    let (request, result) =
        search_by_name(&dex, species, level, abilities, &SearchPolicy::default()).expect("query resolves");
    let report = search_report(&dex, &request, &result).expect("report builds");
    let envelope = report.to_json_bytes().expect("envelope canonicalizes");

    println!("dex_digest={}", dex.digest().expect("dex digest"));
    println!("result={}", result.outcome.kind());
    println!("processed={}", result.stats.processed);
    println!("report_digest={}", report.digest);
    println!("{}", String::from_utf8(envelope).expect("canonical JSON is UTF-8"));
}
