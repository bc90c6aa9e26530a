#![no_main]

use libfuzzer_sys::fuzz_target;
use po_translate_helpers::Catalog;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    if let Ok(catalog) = Catalog::load(data) {
        // Unmodified catalogs are written back unchanged.
        let saved = catalog.save();
        let reloaded = Catalog::load(&saved).expect("saved catalog parses");
        assert_eq!(reloaded.save(), saved);
    }
});
