#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfmerge::merge::parse_page_spec;

fuzz_target!(|data: &[u8]| {
    let Some((&total, spec)) = data.split_first() else {
        return;
    };
    let total = usize::from(total);
    let spec = String::from_utf8_lossy(spec);

    // Whatever the input, accepted pages must exist in the document.
    if let Ok(pages) = parse_page_spec(&spec, total) {
        assert!(pages.iter().all(|&page| page < total));
    }
});
