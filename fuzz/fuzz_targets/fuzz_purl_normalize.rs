#![no_main]
use bd_spdx_export::purl::{known_ecosystems, normalize};
use libfuzzer_sys::fuzz_target;

/// Fuzz purl normalization.
///
/// The first byte picks a known ecosystem so the per-ecosystem splitting
/// rules are reached instead of failing at the table lookup.
fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    if let Ok(external_id) = std::str::from_utf8(rest) {
        let ecosystems: Vec<&str> = known_ecosystems().collect();
        let ecosystem = ecosystems[usize::from(selector) % ecosystems.len()];
        let _ = normalize(ecosystem, external_id);
        let _ = normalize(external_id, external_id);
    }
});
