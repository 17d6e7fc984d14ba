#![no_main]

use cellbase::shell::parse_line;
use libfuzzer_sys::fuzz_target;

// Fuzz target for the shell command parser.
// Any line either parses, is skipped, or yields an InvalidArgument error.
fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    if let Err(e) = parse_line(line) {
        assert!(e.is_invalid_argument(), "unexpected error kind: {e}");
    }
});
