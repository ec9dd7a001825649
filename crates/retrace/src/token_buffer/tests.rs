use alloc::vec::Vec;

use quickcheck::{QuickCheck, TestResult};
use rstest::rstest;

use super::*;

fn filled(units: &str) -> TokenBuffer<char> {
    let mut buf = TokenBuffer::with_bound(1);
    for ch in units.chars() {
        buf.enqueue(ch);
    }
    buf
}

fn available(buf: &TokenBuffer<char>) -> Vec<char> {
    buf.iter().copied().collect()
}

#[test]
fn dequeue_moves_cursor_but_retains() {
    let mut buf = filled("abc");
    assert_eq!(buf.len(), 3);
    assert_eq!(buf.dequeue(), Some(&'a'));
    assert_eq!(buf.len(), 2);
    assert_eq!(buf.retained(), 3);
    assert_eq!(buf.peek(0), Some(&'b'));
    assert_eq!(buf.peek(1), Some(&'c'));
    assert_eq!(buf.peek(2), None);
}

#[test]
fn grows_past_initial_ring() {
    let units: Vec<char> = ('a'..='z').collect();
    let mut buf = TokenBuffer::with_bound(0);
    for &ch in &units {
        buf.enqueue(ch);
    }
    assert_eq!(available(&buf), units);

    let cp = buf.checkpoint();
    assert_eq!(cp, 0);
    buf.skip(20);
    buf.restore(cp).unwrap();
    assert_eq!(buf.dequeue(), Some(&'a'));
}

#[test]
fn repeated_growth_keeps_every_unit_at_its_index() {
    let mut buf = TokenBuffer::with_bound(0);
    for i in 0..100_u32 {
        buf.enqueue(i);
    }
    assert_eq!(buf.retained(), 100);
    assert!((0..100).all(|i| buf.get(i as usize) == Some(&i)));
    assert_eq!(buf.get(100), None);

    buf.skip(10);
    assert_eq!(buf.commit(), 10);
    assert_eq!(buf.get(9), None);
    assert_eq!(buf.get(10), Some(&10));
    assert!(buf.check(9).is_err());
    assert_eq!(buf.check(10), Ok(()));
    assert_eq!(buf.check(100), Ok(()));
    assert!(buf.check(101).is_err());
}

#[rstest]
#[case(0, 0, &['a', 'b', 'c', 'd'])]
#[case(1, 1, &['b', 'c', 'd'])]
#[case(4, 4, &[])]
#[case(9, 4, &[])]
fn skip_clamps(#[case] n: usize, #[case] skipped: usize, #[case] rest: &[char]) {
    let mut buf = filled("abcd");
    assert_eq!(buf.skip(n), skipped);
    assert_eq!(available(&buf), rest);
}

#[test]
fn restore_replays_dequeued_units() {
    let mut buf = filled("xyz");
    buf.dequeue();
    let cp = buf.checkpoint();
    assert_eq!(cp, 1);
    let first: Vec<char> = core::iter::from_fn(|| buf.dequeue().copied()).collect();
    buf.restore(cp).unwrap();
    let second: Vec<char> = core::iter::from_fn(|| buf.dequeue().copied()).collect();
    assert_eq!(first, ['y', 'z']);
    assert_eq!(first, second);
}

#[test]
fn restore_may_move_forward() {
    let mut buf = filled("abc");
    buf.skip(2);
    let ahead = buf.checkpoint();
    buf.restore(0).unwrap();
    buf.restore(ahead).unwrap();
    assert_eq!(buf.peek(0), Some(&'c'));
}

#[test]
fn restore_past_end_is_rejected() {
    let mut buf = filled("ab");
    buf.dequeue();
    let err = buf.restore(3).unwrap_err();
    assert_eq!(
        err,
        CheckpointError::OutOfRange {
            checkpoint: 3,
            low: 0,
            high: 2,
        }
    );
    assert_eq!(buf.checkpoint(), 1);
    // The end itself is a valid position.
    buf.restore(2).unwrap();
    assert!(buf.is_empty());
}

#[test]
fn commit_releases_prefix_and_invalidates_older_checkpoints() {
    let mut buf = filled("abcdef");
    let old = buf.checkpoint();
    buf.skip(4);
    assert_eq!(buf.commit(), 4);
    assert_eq!(buf.retained(), 2);
    assert_eq!(buf.len(), 2);
    assert_eq!(buf.checkpoint(), 4);
    assert!(matches!(
        buf.restore(old),
        Err(CheckpointError::OutOfRange { low: 4, .. })
    ));

    // Absolute indices keep counting after a commit.
    buf.enqueue('g');
    let cp = buf.checkpoint();
    assert_eq!(buf.dequeue(), Some(&'e'));
    buf.restore(cp).unwrap();
    assert_eq!(available(&buf), ['e', 'f', 'g']);
    assert_eq!(buf.commit(), 0);
}

#[test]
fn commit_reuses_ring_slots() {
    let mut buf = TokenBuffer::with_bound(2);
    for round in 0..10u32 {
        for i in 0..3 {
            buf.enqueue(round * 3 + i);
        }
        buf.skip(3);
        buf.commit();
    }
    assert_eq!(buf.ring.capacity(), 4);
    assert_eq!(buf.checkpoint(), 30);
}

/// Property: taking a checkpoint, dequeuing anything, and restoring yields
/// the same peeks and the same dequeue sequence as before.
#[test]
fn checkpoint_restore_roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(units: Vec<u8>, consumed: usize, wander: usize) -> TestResult {
        if units.is_empty() {
            return TestResult::discard();
        }
        let mut buf = TokenBuffer::with_bound(0);
        for &u in &units {
            buf.enqueue(u);
        }
        buf.skip(consumed % units.len());

        let cp = buf.checkpoint();
        let peeks: Vec<Option<u8>> = (0..=units.len()).map(|n| buf.peek(n).copied()).collect();
        let expected: Vec<u8> = buf.iter().copied().collect();

        buf.skip(wander % (units.len() + 1));
        if buf.restore(cp).is_err() {
            return TestResult::failed();
        }

        let peeks_after: Vec<Option<u8>> =
            (0..=units.len()).map(|n| buf.peek(n).copied()).collect();
        let replay: Vec<u8> = core::iter::from_fn(|| buf.dequeue().copied()).collect();
        TestResult::from_bool(peeks == peeks_after && replay == expected)
    }

    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;

    QuickCheck::new()
        .tests(tests)
        .quickcheck(prop as fn(Vec<u8>, usize, usize) -> TestResult);
}
