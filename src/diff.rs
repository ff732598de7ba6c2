use itertools::{EitherOrBoth, Itertools};

use crate::session::Session;

/// How a rendered character relates to what was expected
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Classification {
    Untyped,
    CorrectlyTyped,
    IncorrectlyTyped,
    Missed,
    Extra,
    Cursor,
}

/// A word's position relative to the word being typed
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum WordStatus {
    Passed,
    Current,
    Next,
}

impl WordStatus {
    /// `typed_word_count` counts the in-progress word, so it is at least one
    pub fn for_index(index: usize, typed_word_count: usize) -> Self {
        let current = typed_word_count.saturating_sub(1);
        match index.cmp(&current) {
            std::cmp::Ordering::Less => WordStatus::Passed,
            std::cmp::Ordering::Equal => WordStatus::Current,
            std::cmp::Ordering::Greater => WordStatus::Next,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassifiedChar {
    pub ch: char,
    pub class: Classification,
}

impl ClassifiedChar {
    pub fn new(ch: char, class: Classification) -> Self {
        Self { ch, class }
    }
}

/// Aligns `typed` against `expected` position by position.
///
/// The rendered character is the typed one wherever the user typed
/// something, otherwise the expected one.
pub fn classify_chars(expected: &str, typed: &str, status: WordStatus) -> Vec<ClassifiedChar> {
    let typed_len = typed.chars().count();

    expected
        .chars()
        .zip_longest(typed.chars())
        .enumerate()
        .map(|(idx, pair)| match pair {
            EitherOrBoth::Both(e, t) if e == t => ClassifiedChar::new(t, Classification::CorrectlyTyped),
            EitherOrBoth::Both(_, t) => ClassifiedChar::new(t, Classification::IncorrectlyTyped),
            EitherOrBoth::Left(e) => {
                let class = match status {
                    WordStatus::Current if idx == typed_len => Classification::Cursor,
                    WordStatus::Passed => Classification::Missed,
                    _ => Classification::Untyped,
                };
                ClassifiedChar::new(e, class)
            }
            EitherOrBoth::Right(t) => ClassifiedChar::new(t, Classification::Extra),
        })
        .collect()
}

/// One tag per rendered character of the word
pub fn classify_word(expected: &str, typed: &str, status: WordStatus) -> Vec<Classification> {
    classify_chars(expected, typed, status)
        .into_iter()
        .map(|c| c.class)
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifiedWord {
    pub chars: Vec<ClassifiedChar>,
    /// The space that follows this word, absent after the last word
    pub separator: Option<Classification>,
}

impl ClassifiedWord {
    pub fn raw(&self) -> String {
        self.chars.iter().map(|c| c.ch).collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassifiedText {
    pub words: Vec<ClassifiedWord>,
}

impl ClassifiedText {
    /// The undecorated text, words joined by single spaces
    pub fn raw(&self) -> String {
        self.words.iter().map(ClassifiedWord::raw).join(" ")
    }

    pub fn chars(&self) -> impl Iterator<Item = ClassifiedChar> + '_ {
        self.words.iter().flat_map(|w| {
            w.chars
                .iter()
                .copied()
                .chain(w.separator.map(|class| ClassifiedChar::new(' ', class)))
        })
    }
}

/// Classifies every expected word of a session against what has been typed
pub fn classify_session(session: &Session) -> ClassifiedText {
    let typed_words = session.typed_words();
    let expected = session.expected_words();
    let last = expected.len().saturating_sub(1);

    let words = expected
        .iter()
        .enumerate()
        .map(|(idx, word)| {
            let typed = typed_words.get(idx).map(String::as_str).unwrap_or("");
            let status = WordStatus::for_index(idx, typed_words.len());

            let separator = (idx < last).then(|| {
                if status == WordStatus::Current && typed.chars().count() >= word.chars().count() {
                    Classification::Cursor
                } else {
                    Classification::Untyped
                }
            });

            ClassifiedWord {
                chars: classify_chars(word, typed, status),
                separator,
            }
        })
        .collect();

    ClassifiedText { words }
}
