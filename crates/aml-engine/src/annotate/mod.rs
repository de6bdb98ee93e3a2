//! # Chinese annotation
//!
//! Splits a run of CJK characters into dictionary words by greedy longest
//! match, attaching a pronunciation and definition to every word found.
//! Characters the dictionary does not know become one-character segments
//! with no annotation, so the segments always cover the whole run.

mod cedict;
mod pinyin;

pub use cedict::{CedictDictionary, DictionaryError};
pub use pinyin::numbered_to_marked;

use std::collections::HashMap;

use serde::Serialize;

/// Default upper bound on word length, in characters.
pub const DEFAULT_MAX_WORD_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictEntry {
    /// Tone-marked pinyin.
    pub pinyin: String,
    pub definition: String,
}

/// Pronunciation and definition lookup by exact word.
pub trait Dictionary: Send + Sync {
    fn lookup(&self, word: &str) -> Option<&DictEntry>;
}

impl Dictionary for HashMap<String, DictEntry> {
    fn lookup(&self, word: &str) -> Option<&DictEntry> {
        self.get(word)
    }
}

/// A dictionary that knows no words.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDictionary;

impl Dictionary for NoDictionary {
    fn lookup(&self, _word: &str) -> Option<&DictEntry> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub pinyin: Option<String>,
    pub definition: Option<String>,
}

impl Segment {
    pub fn is_annotated(&self) -> bool {
        self.pinyin.is_some()
    }
}

/// Segments `run`, trying prefixes of at most `max_len` characters longest
/// first. A `max_len` of zero is treated as one.
pub fn annotate(run: &str, dictionary: &dyn Dictionary, max_len: usize) -> Vec<Segment> {
    let max_len = max_len.max(1);
    // Byte offsets of every char boundary, including the end.
    let bounds: Vec<usize> = run
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(run.len()))
        .collect();

    let mut segments = Vec::new();
    let mut at = 0;
    while at + 1 < bounds.len() {
        let longest = max_len.min(bounds.len() - 1 - at);
        let found = (1..=longest).rev().find_map(|len| {
            let word = &run[bounds[at]..bounds[at + len]];
            dictionary.lookup(word).map(|entry| (len, word, entry))
        });
        match found {
            Some((len, word, entry)) => {
                segments.push(Segment {
                    text: word.to_string(),
                    pinyin: Some(entry.pinyin.clone()),
                    definition: Some(entry.definition.clone()),
                });
                at += len;
            }
            None => {
                segments.push(Segment {
                    text: run[bounds[at]..bounds[at + 1]].to_string(),
                    pinyin: None,
                    definition: None,
                });
                at += 1;
            }
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dict(entries: &[(&str, &str, &str)]) -> HashMap<String, DictEntry> {
        entries
            .iter()
            .map(|(word, pinyin, definition)| {
                (
                    word.to_string(),
                    DictEntry {
                        pinyin: pinyin.to_string(),
                        definition: definition.to_string(),
                    },
                )
            })
            .collect()
    }

    fn texts(segments: &[Segment]) -> Vec<&str> {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn longest_match_wins() {
        let d = dict(&[
            ("中", "zhōng", "middle"),
            ("中国", "zhōng guó", "China"),
            ("中国人", "zhōng guó rén", "Chinese person"),
        ]);
        let segments = annotate("中国人好", &d, 4);
        assert_eq!(texts(&segments), vec!["中国人", "好"]);
        assert_eq!(segments[0].pinyin.as_deref(), Some("zhōng guó rén"));
        assert!(!segments[1].is_annotated());
    }

    #[test]
    fn max_len_bounds_the_search() {
        let d = dict(&[("中国人", "zhōng guó rén", "Chinese person"), ("中", "zhōng", "middle")]);
        assert_eq!(texts(&annotate("中国人", &d, 2)), vec!["中", "国", "人"]);
    }

    #[test]
    fn unknown_characters_fall_back_one_at_a_time() {
        let segments = annotate("你好吗", &NoDictionary, 4);
        assert_eq!(texts(&segments), vec!["你", "好", "吗"]);
        assert!(segments.iter().all(|s| s.pinyin.is_none() && s.definition.is_none()));
    }

    #[test]
    fn segments_cover_the_run() {
        let d = dict(&[("你好", "nǐ hǎo", "hello")]);
        let run = "他说你好你好";
        let joined: String = annotate(run, &d, 4).into_iter().map(|s| s.text).collect();
        assert_eq!(joined, run);
    }

    #[test]
    fn empty_run() {
        assert!(annotate("", &NoDictionary, 4).is_empty());
    }
}
