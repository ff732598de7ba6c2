use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::path::{Path, PathBuf};

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// Session lengths offered on the welcome screen
pub const WORD_COUNT_OPTIONS: [usize; 5] = [5, 10, 25, 50, 100];

/// Longest session accepted from the command line or the config file
pub const MAX_WORD_COUNT: usize = 1000;

pub const DEFAULT_CORPUS: &str = "english";

#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("corpus {0:?} not found")]
    NotFound(String),
    #[error("failed to read corpus {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse corpus: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("corpus {0:?} has no usable words")]
    Empty(String),
}

/// A list of words to draw sessions from
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Corpus {
    pub name: String,
    #[serde(default)]
    pub size: u32,
    pub words: Vec<String>,
}

impl Corpus {
    /// Loads one of the corpora bundled into the binary
    pub fn embedded(name: &str) -> Result<Self, CorpusError> {
        let file = LANG_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| CorpusError::NotFound(name.to_string()))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| CorpusError::NotFound(name.to_string()))?;
        Self::from_json(contents)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Parses a corpus, dropping entries that cannot be typed as one word
    pub fn from_json(json: &str) -> Result<Self, CorpusError> {
        let mut corpus: Corpus = serde_json::from_str(json)?;
        corpus
            .words
            .retain(|w| !w.is_empty() && !w.chars().any(char::is_whitespace));

        if corpus.words.is_empty() {
            return Err(CorpusError::Empty(corpus.name));
        }
        corpus.size = corpus.words.len() as u32;
        Ok(corpus)
    }
}

/// Strategy for drawing the words of a session
pub trait WordSelector {
    fn select_words(&mut self, words: &[String], count: usize) -> Vec<String>;
}

/// Uniform draws with replacement, so sessions may be longer than the corpus
pub struct RandomSelector<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomSelector<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> WordSelector for RandomSelector<R> {
    fn select_words(&mut self, words: &[String], count: usize) -> Vec<String> {
        (0..count)
            .filter_map(|_| words.choose(&mut self.rng).cloned())
            .collect()
    }
}

/// Where session words come from
#[derive(Debug, Clone)]
pub enum WordSource {
    Corpus(Corpus),
    /// A fixed prompt, used as-is regardless of the requested count
    Fixed(Vec<String>),
}

impl WordSource {
    pub fn fixed_from_prompt(prompt: &str) -> Option<Self> {
        let words: Vec<String> = prompt.split_whitespace().map(str::to_string).collect();
        (!words.is_empty()).then_some(WordSource::Fixed(words))
    }

    pub fn words(&self, selector: &mut dyn WordSelector, count: usize) -> Vec<String> {
        match self {
            WordSource::Corpus(corpus) => selector.select_words(&corpus.words, count),
            WordSource::Fixed(words) => words.clone(),
        }
    }
}
