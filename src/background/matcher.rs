//! Keyword scoring fallback: picks the catalog record whose tags best match a
//! free-text answer. Pure and deterministic; used whenever the external
//! match service is not configured or fails.

use std::borrow::Cow;

use super::catalog::BackgroundRecord;

const EXACT_WORD_POINTS: u32 = 10;
const PARTIAL_WORD_POINTS: u32 = 3;
const PHRASE_POINTS: u32 = 5;
/// Words and tags must be longer than this (in chars) for substring rules.
const MIN_PARTIAL_LEN: usize = 3;

fn long_enough(s: &str) -> bool {
    s.chars().count() > MIN_PARTIAL_LEN
}

/// Score a single record against an already lower-cased input and its words.
/// Each rule fires at most once per tag; rules are additive.
pub fn score_record(record: &BackgroundRecord, lowered: &str, words: &[&str]) -> u32 {
    let mut score = 0;
    for tag in record.tags {
        // Built-in tags are lowercase already; custom records may not be.
        let tag: Cow<str> = if tag.chars().any(char::is_uppercase) {
            Cow::Owned(tag.to_lowercase())
        } else {
            Cow::Borrowed(*tag)
        };
        let tag_is_long = long_enough(&tag);

        if words.iter().any(|w| *w == &*tag) {
            score += EXACT_WORD_POINTS;
        }
        let partial = words.iter().any(|w| {
            (long_enough(w) && tag.contains(*w)) || (tag_is_long && w.contains(&*tag))
        });
        if partial {
            score += PARTIAL_WORD_POINTS;
        }
        if tag_is_long && lowered.contains(&*tag) {
            score += PHRASE_POINTS;
        }
    }
    score
}

/// Best-scoring record for `input`, or `default` when the input is blank or
/// nothing scores. Ties keep the earliest record in `records` order.
pub fn best_match<'a>(
    input: &str,
    records: &'a [BackgroundRecord],
    default: &'a BackgroundRecord,
) -> &'a BackgroundRecord {
    if input.trim().is_empty() {
        return default;
    }
    let lowered = input.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();

    let mut best: Option<(&BackgroundRecord, u32)> = None;
    for record in records {
        let score = score_record(record, &lowered, &words);
        if score == 0 {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((record, score)),
        }
    }
    best.map(|(r, _)| r).unwrap_or(default)
}
