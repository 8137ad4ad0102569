// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;

fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[yare::parameterized(
    plain_var = { "token = \"${TOKEN}\"", "token = \"abc\"" },
    default_unused = { "${TOKEN:-fallback}", "abc" },
    default_used = { "${MISSING:-fallback}", "fallback" },
    empty_default = { "[${MISSING:-}]", "[]" },
    unset_without_default = { "[${MISSING}]", "[]" },
    repeated = { "${TOKEN}/${TOKEN}", "abc/abc" },
    no_pattern = { "command = \"npx\"", "command = \"npx\"" },
    bare_dollar_left_alone = { "$TOKEN", "$TOKEN" },
)]
fn substitutes_patterns(input: &str, expected: &str) {
    let lookup = lookup_in(&[("TOKEN", "abc"), ("EMPTY", "")]);
    assert_eq!(substitute_with(input, lookup), expected);
}

#[test]
fn empty_value_takes_default() {
    let lookup = lookup_in(&[("EMPTY", "")]);
    assert_eq!(substitute_with("${EMPTY:-x}", lookup), "x");
}

#[test]
fn empty_value_without_default_stays_empty() {
    let lookup = lookup_in(&[("EMPTY", "")]);
    assert_eq!(substitute_with("<${EMPTY}>", lookup), "<>");
}

#[test]
fn substitute_env_reads_process_environment() {
    std::env::set_var("TENDER_ENV_TEST_VAR", "from_env");
    assert_eq!(
        substitute_env("value = \"${TENDER_ENV_TEST_VAR}\""),
        "value = \"from_env\""
    );
    std::env::remove_var("TENDER_ENV_TEST_VAR");
}
