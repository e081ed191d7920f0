// SPDX-License-Identifier: AGPL-3.0-or-later
#![no_main]

use blockform_core::formats::html::render_value;
use blockform_core::formats::markdown::parse_blocks;
use blockform_core::wire::blocks_to_value;
use blockform_core::{validate, RenderConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let config = RenderConfig::default();

    let blocks = parse_blocks(text);
    let report = validate(&blocks_to_value(&blocks));
    let _ = render_value(report.fixed_data, &config);

    if let Ok(json) = serde_json::from_str::<serde_json::Value>(text) {
        let report = validate(&json);
        if report.fixed_data.is_array() || report.fixed_data.is_object() {
            let again = validate(&report.fixed_data);
            assert!(again.fixes.is_empty() && again.errors.is_empty());
        }
        let _ = render_value(json, &config);
    }
});
