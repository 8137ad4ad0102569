// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    start = { WarmState::Pending, WarmState::Warming, WarmState::Warming },
    succeed = { WarmState::Warming, WarmState::Warmed, WarmState::Warmed },
    fail = { WarmState::Warming, WarmState::Failed, WarmState::Failed },
    write_off_pending = { WarmState::Pending, WarmState::Failed, WarmState::Failed },
    skip_warming = { WarmState::Pending, WarmState::Warmed, WarmState::Pending },
    warmed_is_sticky = { WarmState::Warmed, WarmState::Failed, WarmState::Warmed },
    failed_is_sticky = { WarmState::Failed, WarmState::Warming, WarmState::Failed },
)]
fn transitions(from: WarmState, to: WarmState, expected: WarmState) {
    assert_eq!(from.transition(to), expected);
}

#[test]
fn only_warmed_and_failed_are_terminal() {
    assert!(!WarmState::Pending.is_terminal());
    assert!(!WarmState::Warming.is_terminal());
    assert!(WarmState::Warmed.is_terminal());
    assert!(WarmState::Failed.is_terminal());
}
