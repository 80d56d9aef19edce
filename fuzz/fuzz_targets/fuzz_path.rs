// SPDX-License-Identifier: AGPL-3.0-or-later
//! Fuzz target for path splitting and joining

#![no_main]

use libfuzzer_sys::fuzz_target;
use polydisk_core::path;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let (dir, name) = path::split(input);
        assert!(path::join(dir, name).len() <= input.len());
        assert!(!name.contains(path::DELIMITER));
        assert_eq!(path::parent(input), dir);

        let first = path::first_segment(input);
        assert!(input.starts_with(first));

        // Joining onto a root never loses the path.
        if let Some((root, rest)) = input.split_once('\n') {
            let joined = path::join(root, rest);
            assert!(joined.ends_with(rest));
            assert!(joined.starts_with(root));
        }
    }
});
