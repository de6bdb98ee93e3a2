//! CC-CEDICT dictionary loading.
//!
//! Each entry line reads `Traditional Simplified [pin1 yin1] /def 1/def 2/`.
//! Both character forms are indexed. When a word appears on several lines
//! the first pronunciation is kept and later definitions are appended.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::pinyin::numbered_to_marked;
use super::{DictEntry, Dictionary};

static LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+) (\S+) \[([^\]]*)\] /(.*)/\s*$").expect("valid regex")
});

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("Failed to open dictionary at {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read dictionary line {line}: {source}")]
    Read {
        line: usize,
        source: std::io::Error,
    },
}

#[derive(Debug, Default)]
pub struct CedictDictionary {
    entries: HashMap<String, DictEntry>,
}

impl CedictDictionary {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DictionaryError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let dictionary = Self::from_reader(BufReader::new(file))?;
        log::info!(
            "loaded {} dictionary words from {}",
            dictionary.len(),
            path.display()
        );
        Ok(dictionary)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, DictionaryError> {
        let mut dictionary = Self::default();
        let mut malformed = 0usize;
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| DictionaryError::Read {
                line: index + 1,
                source,
            })?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if !dictionary.add_line(line) {
                malformed += 1;
                log::debug!("skipping malformed dictionary line {}: {line}", index + 1);
            }
        }
        if malformed > 0 {
            log::warn!("skipped {malformed} malformed dictionary lines");
        }
        Ok(dictionary)
    }

    /// Parses one entry line. Returns `false` when it does not match the
    /// CC-CEDICT shape.
    fn add_line(&mut self, line: &str) -> bool {
        let Some(caps) = LINE.captures(line) else {
            return false;
        };
        let definitions: Vec<&str> = caps[4].split('/').filter(|d| !d.is_empty()).collect();
        if definitions.is_empty() {
            return false;
        }
        let pinyin = numbered_to_marked(&caps[3]);
        let definition = definitions.join("; ");

        let traditional = &caps[1];
        let simplified = &caps[2];
        self.insert(simplified, &pinyin, &definition);
        if traditional != simplified {
            self.insert(traditional, &pinyin, &definition);
        }
        true
    }

    fn insert(&mut self, word: &str, pinyin: &str, definition: &str) {
        match self.entries.entry(word.to_string()) {
            Entry::Occupied(mut existing) => {
                let existing = existing.get_mut();
                existing.definition.push_str("; ");
                existing.definition.push_str(definition);
            }
            Entry::Vacant(slot) => {
                slot.insert(DictEntry {
                    pinyin: pinyin.to_string(),
                    definition: definition.to_string(),
                });
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Dictionary for CedictDictionary {
    fn lookup(&self, word: &str) -> Option<&DictEntry> {
        self.entries.get(word)
    }
}
