#![no_main]

use libfuzzer_sys::fuzz_target;
use reelstats_core::extract_year;

fuzz_target!(|data: &[u8]| {
    if let Ok(title) = std::str::from_utf8(data) {
        if title.len() > 10_000 {
            return;
        }

        if let Some(year) = extract_year(title) {
            assert!((0..=9999).contains(&year));
            let trimmed = title.trim_end();
            assert!(trimmed.ends_with(')'));
            assert!(trimmed.contains(&format!("{:04})", year)));
        }
    }
});
