#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use retrace::{Checkpoint, Reader};

#[derive(Debug, Arbitrary)]
enum Op {
    Eat,
    Peek(u8),
    Skip(u8),
    Checkpoint,
    Restore(u8),
    Commit,
    MatchString(String),
    EatUntil(char),
    SkipWhitespace,
}

#[derive(Debug, Arbitrary)]
struct Input {
    text: String,
    ops: Vec<Op>,
}

/// Saved positions alongside the byte offset the model expects to return to.
struct Saved {
    checkpoint: Checkpoint,
    offset: usize,
    live: bool,
}

fn run(Input { text, ops }: Input) {
    let mut reader = Reader::new(&text);
    // The model is simply the byte offset into `text`.
    let mut at = 0usize;
    let mut saved: Vec<Saved> = Vec::new();

    for op in ops {
        match op {
            Op::Eat => {
                let expected = text[at..].chars().next();
                assert_eq!(reader.eat(), expected);
                at += expected.map_or(0, char::len_utf8);
            }
            Op::Peek(n) => {
                let n = usize::from(n);
                assert_eq!(reader.peek_nth(n), text[at..].chars().nth(n));
            }
            Op::Skip(n) => {
                let skipped = reader.skip(usize::from(n));
                let bytes: usize = text[at..].chars().take(skipped).map(char::len_utf8).sum();
                assert!(skipped == usize::from(n) || at + bytes == text.len());
                at += bytes;
            }
            Op::Checkpoint => saved.push(Saved {
                checkpoint: reader.checkpoint(),
                offset: at,
                live: true,
            }),
            Op::Restore(i) => {
                let Some(s) = saved.get(usize::from(i) % saved.len().max(1)) else {
                    continue;
                };
                match (reader.restore(s.checkpoint), s.live) {
                    (Ok(()), true) => at = s.offset,
                    (Err(_), false) => {}
                    (result, live) => panic!("restore to {:?} gave {result:?}, live: {live}", s.checkpoint),
                }
            }
            Op::Commit => {
                reader.commit();
                for s in &mut saved {
                    s.live &= s.offset >= at;
                }
            }
            Op::MatchString(s) => {
                let expected = text[at..].starts_with(s.as_str());
                assert_eq!(reader.match_string(&s), expected);
                if expected {
                    at += s.len();
                }
            }
            Op::EatUntil(stop) => {
                let run = text[at..].find(stop).unwrap_or(text.len() - at);
                assert_eq!(reader.eat_until(stop), &text[at..at + run]);
                at += run;
            }
            Op::SkipWhitespace => {
                let run = text[at..]
                    .find(|ch: char| !reader.is_whitespace(ch))
                    .unwrap_or(text.len() - at);
                assert_eq!(reader.skip_whitespace().len(), run);
                at += run;
            }
        }
        assert_eq!(reader.offset(), at);
        assert_eq!(reader.rest(), &text[at..]);
        reader.assert_consistent();
    }
}

fuzz_target!(|input: Input| run(input));
