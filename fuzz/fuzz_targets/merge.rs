#![no_main]

use libfuzzer_sys::fuzz_target;
use po_translate_helpers::extract::remaining_work;
use po_translate_helpers::merge::merge;
use po_translate_helpers::state::is_translated;
use po_translate_helpers_fuzz::{create_catalog, FuzzEntry};
use pretty_assertions::assert_eq;

fuzz_target!(|input: (Vec<FuzzEntry>, Vec<FuzzEntry>)| {
    let (base, result) = input;
    let base = create_catalog(&base);
    let result = create_catalog(&result);
    let scope = remaining_work(&base, None);

    let merged = merge(&base, &scope, &result);
    for entry in base.live_entries() {
        if is_translated(entry) {
            let after = merged.catalog.lookup(&entry.key()).expect("entry kept");
            assert_eq!(after.translation(), entry.translation());
        }
    }

    let again = merge(&merged.catalog, &scope, &result);
    assert_eq!(again.report.updated_count(), 0);
});
