#![no_main]
use libfuzzer_sys::fuzz_target;

// Whatever the user types, a parsed limit is finite.
fuzz_target!(|data: &str| {
    if let Some(v) = thermo_config::parse_limit_text(data) {
        assert!(v.is_finite());
    }
});
