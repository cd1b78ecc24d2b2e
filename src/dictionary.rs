use std::collections::TryReserveError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;

use crate::config::OversizedPolicy;

/// Maximum number of characters a stored word may contain.
pub const LENGTH: usize = 45;

/// Number of buckets, one per letter of the alphabet.
pub const N: usize = 26;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not open {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error reading {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("out of memory after {loaded} words: {source}")]
    Allocation {
        loaded: usize,
        source: TryReserveError,
    },
}

/// Picks the bucket for a word from its first byte alone.
///
/// ASCII letters map case-insensitively onto `0..N`. Anything else, including
/// an empty word, falls back to bucket 0.
pub fn hash(word: &str) -> usize {
    match word.as_bytes().first() {
        Some(c) if c.is_ascii_alphabetic() => (c.to_ascii_lowercase() - b'a') as usize,
        _ => 0,
    }
}

/// A fixed-bucket set of words with case-insensitive lookup.
///
/// Built once with [`WordTable::load`], queried with [`WordTable::check`] and
/// torn down with [`WordTable::unload`]. Words are stored verbatim; duplicates
/// are kept as separate entries.
#[derive(Debug, Default)]
pub struct WordTable {
    buckets: [Vec<String>; N],
    word_count: usize,
    policy: OversizedPolicy,
}

impl WordTable {
    pub fn with_policy(policy: OversizedPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Loads every whitespace-separated token of the file at `path`.
    ///
    /// The table is left untouched when the file cannot be opened. Otherwise
    /// it is reset first; a read or allocation failure part way through keeps
    /// the words inserted so far.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        self.unload();
        self.read_words(BufReader::new(file), path)?;

        info!("loaded {} words from {:?}", self.word_count, path);
        debug!("chain lengths {:?}", self.chain_lengths());
        Ok(())
    }

    /// Inserts every token of `reader` without resetting the table first.
    fn read_words<R: BufRead>(&mut self, reader: R, path: &Path) -> Result<(), LoadError> {
        for line in reader.split(b'\n') {
            let line = line.map_err(|source| LoadError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let line = String::from_utf8_lossy(&line);
            for token in line.split_whitespace() {
                self.insert(token)?;
            }
        }
        Ok(())
    }

    /// Inserts one word at the head of its chain.
    ///
    /// Returns `Ok(false)` when the word is longer than [`LENGTH`] and the
    /// table rejects oversized words.
    pub fn insert(&mut self, word: &str) -> Result<bool, LoadError> {
        let stored = match word.char_indices().nth(LENGTH) {
            None => word,
            Some((end, _)) => match self.policy {
                OversizedPolicy::Reject => {
                    warn!("skipping word longer than {LENGTH} characters: {word}");
                    return Ok(false);
                }
                OversizedPolicy::Truncate => {
                    warn!("truncating word longer than {LENGTH} characters: {word}");
                    &word[..end]
                }
            },
        };

        let loaded = self.word_count;
        let mut entry = String::new();
        entry
            .try_reserve_exact(stored.len())
            .map_err(|source| LoadError::Allocation { loaded, source })?;
        entry.push_str(stored);

        let bucket = &mut self.buckets[hash(&entry)];
        bucket
            .try_reserve(1)
            .map_err(|source| LoadError::Allocation { loaded, source })?;
        // The back of the vec is the head of the chain.
        bucket.push(entry);

        self.word_count += 1;
        Ok(true)
    }

    pub fn check(&self, word: &str) -> bool {
        self.buckets[hash(word)]
            .iter()
            .rev()
            .any(|entry| entry.eq_ignore_ascii_case(word))
    }

    pub fn size(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    /// Releases every entry and resets the count. Always succeeds.
    pub fn unload(&mut self) -> bool {
        for bucket in self.buckets.iter_mut() {
            drop(std::mem::take(bucket));
        }
        self.word_count = 0;
        true
    }

    pub fn chain_lengths(&self) -> [usize; N] {
        std::array::from_fn(|i| self.buckets[i].len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read, Write};
    use tempfile::NamedTempFile;

    struct BrokenDisk;

    impl Read for BrokenDisk {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk gone"))
        }
    }

    fn word_list(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn hash_uses_first_letter() {
        assert_eq!(hash("apple"), 0);
        assert_eq!(hash("avocado"), 0);
        assert_eq!(hash("Apple"), 0);
        assert_eq!(hash("banana"), 1);
        assert_eq!(hash("Zebra"), 25);
        assert_eq!(hash("zebra"), 25);
    }

    #[test]
    fn hash_falls_back_to_first_bucket() {
        assert_eq!(hash("123"), 0);
        assert_eq!(hash("'tis"), 0);
        assert_eq!(hash("éclair"), 0);
        assert_eq!(hash(""), 0);
    }

    #[test]
    fn check_ignores_case() {
        let list = word_list("Apple\nbanana\ncherry\n");
        let mut table = WordTable::default();
        table.load(list.path()).unwrap();

        assert!(table.check("APPLE"));
        assert!(table.check("apple"));
        assert!(table.check("ApPlE"));
        assert!(table.check("BANANA"));
        assert!(!table.check("grape"));
        assert!(!table.check("appl"));
        assert!(!table.check("apples"));
    }

    #[test]
    fn empty_table_finds_nothing() {
        let table = WordTable::default();
        assert!(!table.check("anything"));
        assert_eq!(table.size(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn size_counts_duplicates() {
        let list = word_list("cat\ncat\n");
        let mut table = WordTable::default();
        table.load(list.path()).unwrap();

        assert_eq!(table.size(), 2);
        assert!(table.check("cat"));
        assert_eq!(table.chain_lengths()[hash("cat")], 2);
    }

    #[test]
    fn load_splits_on_any_whitespace() {
        let list = word_list("one two\tthree\r\n\n  four\nfive");
        let mut table = WordTable::default();
        table.load(list.path()).unwrap();

        assert_eq!(table.size(), 5);
        for word in ["one", "two", "three", "four", "five"] {
            assert!(table.check(word), "{word} missing");
        }
    }

    #[test]
    fn non_letter_words_share_first_bucket() {
        let list = word_list("42nd\napple\n");
        let mut table = WordTable::default();
        table.load(list.path()).unwrap();

        assert!(table.check("42nd"));
        assert!(table.check("APPLE"));
        assert_eq!(table.chain_lengths()[0], 2);
    }

    #[test]
    fn unload_forgets_every_word() {
        let list = word_list("apple\nbanana\n");
        let mut table = WordTable::default();
        table.load(list.path()).unwrap();

        assert!(table.unload());
        assert!(!table.check("apple"));
        assert!(!table.check("banana"));
        assert_eq!(table.size(), 0);
        assert_eq!(table.chain_lengths(), [0; N]);
    }

    #[test]
    fn unload_twice() {
        let mut table = WordTable::default();
        table.insert("apple").unwrap();
        assert!(table.unload());
        assert!(table.unload());
        assert!(!table.check("apple"));
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = WordTable::default();
        let result = table.load(dir.path().join("missing.txt"));

        assert!(matches!(result, Err(LoadError::Open { .. })));
        assert!(!table.check("anything"));
        assert_eq!(table.size(), 0);
    }

    #[test]
    fn reload_after_unload() {
        let list = word_list("alpha\nbeta\ngamma\nbeta\n");
        let mut table = WordTable::default();

        table.load(list.path()).unwrap();
        let first_size = table.size();
        let first = ["alpha", "beta", "gamma", "delta"].map(|w| table.check(w));

        table.unload();
        table.load(list.path()).unwrap();
        let second = ["alpha", "beta", "gamma", "delta"].map(|w| table.check(w));

        assert_eq!(first_size, 4);
        assert_eq!(table.size(), first_size);
        assert_eq!(first, second);
        assert_eq!(first, [true, true, true, false]);
    }

    #[test]
    fn load_replaces_previous_words() {
        let first = word_list("apple\n");
        let second = word_list("banana\n");
        let mut table = WordTable::default();

        table.load(first.path()).unwrap();
        table.load(second.path()).unwrap();

        assert_eq!(table.size(), 1);
        assert!(!table.check("apple"));
        assert!(table.check("banana"));
    }

    #[test]
    fn oversized_words_are_rejected_by_default() {
        let long = "a".repeat(LENGTH + 1);
        let exact = "b".repeat(LENGTH);
        let list = word_list(&format!("{long}\n{exact}\nok\n"));
        let mut table = WordTable::default();
        table.load(list.path()).unwrap();

        assert_eq!(table.size(), 2);
        assert!(!table.check(&long));
        assert!(!table.check(&long[..LENGTH]));
        assert!(table.check(&exact));
    }

    #[test]
    fn oversized_words_can_be_truncated() {
        let long = format!("{}xyz", "a".repeat(LENGTH));
        let mut table = WordTable::with_policy(OversizedPolicy::Truncate);

        assert!(table.insert(&long).unwrap());
        assert_eq!(table.size(), 1);
        assert!(table.check(&"A".repeat(LENGTH)));
        assert!(!table.check(&long));
    }

    #[test]
    fn insert_reports_rejection() {
        let mut table = WordTable::default();
        assert!(!table.insert(&"q".repeat(LENGTH + 5)).unwrap());
        assert!(table.insert("queen").unwrap());
        assert_eq!(table.size(), 1);
    }

    #[test]
    fn check_compares_non_letters_exactly() {
        let mut table = WordTable::default();
        table.insert("don't").unwrap();

        assert!(table.check("DON'T"));
        assert!(!table.check("dont"));
        assert!(!table.check("don`t"));
    }

    #[test]
    fn read_failure_keeps_earlier_words() {
        let reader = BufReader::new(Cursor::new("apple\nBanana\n").chain(BrokenDisk));
        let mut table = WordTable::default();

        let result = table.read_words(reader, Path::new("words.txt"));

        assert!(matches!(result, Err(LoadError::Read { .. })));
        assert_eq!(table.size(), 2);
        assert!(table.check("APPLE"));
        assert!(table.check("banana"));
        assert!(!table.check("cherry"));
    }
}
