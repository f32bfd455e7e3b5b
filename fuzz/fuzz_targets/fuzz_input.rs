// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

use plantvision::classifier::features::{extract_features, FEATURE_CATEGORIES};
use plantvision::history::{HistoryStore, MAX_HISTORY_ENTRIES};
use plantvision::storage::MemoryStore;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    image: &'a [u8],
    import_text: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    let features = extract_features(input.image);
    assert!(FEATURE_CATEGORIES.contains(&features.category));
    assert!((0.6..=0.991).contains(&features.image_quality));

    let history = HistoryStore::new(Arc::new(MemoryStore::new()));
    let accepted = history.import_from_text(input.import_text);
    let entries = history.list();
    assert!(entries.len() <= MAX_HISTORY_ENTRIES);
    if !accepted {
        assert!(entries.is_empty());
    }
});
