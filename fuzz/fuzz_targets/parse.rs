#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // Lexing and parsing never stop early, so every input reaches both stages
        let parsed = cflat::parse_source(s);
        if !parsed.has_errors() {
            // Clean parses must also print
            let _ = cflat::format_source(s);
        }
    }
});
