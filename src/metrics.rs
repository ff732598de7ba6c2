use std::time::Duration;

use crate::diff::{classify_word, Classification, WordStatus};
use crate::key::KeyEvent;
use crate::session::Session;

/// Characters per standard word when normalizing speeds
pub const CHARS_PER_WORD: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetricsError {
    #[error("session has not finished")]
    NotFinished,
    #[error("typed {typed} words but {expected} were expected")]
    WordCountMismatch { typed: usize, expected: usize },
    #[error("session finished with zero elapsed time")]
    ZeroDuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    pub net_wpm: f64,
    pub raw_wpm: f64,
    /// Percentage of typed characters that were correct
    pub accuracy: f64,
    pub correct_count: usize,
    pub error_count: usize,
    pub missed_count: usize,
    pub extra_count: usize,
    pub wrong_word_count: usize,
}

impl Metrics {
    pub fn compute(session: &Session) -> Result<Self, MetricsError> {
        let duration = session.duration().ok_or(MetricsError::NotFinished)?;
        if duration.is_zero() {
            return Err(MetricsError::ZeroDuration);
        }

        let typed_words = comparable_typed_words(session);
        let expected = session.expected_words();
        // Unreachable through Session::handle: the word index follows the typed
        // spaces, so a finished session has one typed word per expected word
        if typed_words.len() != expected.len() {
            log::warn!(
                "typed/expected word count mismatch: {} vs {}",
                typed_words.len(),
                expected.len()
            );
            return Err(MetricsError::WordCountMismatch {
                typed: typed_words.len(),
                expected: expected.len(),
            });
        }

        let minutes = minutes(duration);
        let raw_wpm = (session.typed_keys().len() as f64 / CHARS_PER_WORD) / minutes;

        let wrong_word_count = expected
            .iter()
            .zip(&typed_words)
            .filter(|(e, t)| e != t)
            .count();
        let net_wpm = raw_wpm - (wrong_word_count as f64 / minutes);

        let mut metrics = Metrics {
            net_wpm,
            raw_wpm,
            wrong_word_count,
            ..Default::default()
        };
        for (e, t) in expected.iter().zip(&typed_words) {
            for class in classify_word(e, t, WordStatus::Passed) {
                match class {
                    Classification::CorrectlyTyped => metrics.correct_count += 1,
                    Classification::IncorrectlyTyped => metrics.error_count += 1,
                    Classification::Missed => metrics.missed_count += 1,
                    Classification::Extra => metrics.extra_count += 1,
                    Classification::Untyped | Classification::Cursor => {}
                }
            }
        }
        metrics.accuracy = accuracy(
            metrics.correct_count,
            metrics.error_count + metrics.extra_count,
        );

        Ok(metrics)
    }
}

/// Typed words of a finished session, minus the empty segment a closing
/// space leaves behind
fn comparable_typed_words(session: &Session) -> Vec<String> {
    let mut words = session.typed_words();
    let closed_by_space = session.typed_keys().last() == Some(&KeyEvent::Space);
    if closed_by_space && words.len() > session.expected_words().len() {
        words.pop();
    }
    words
}

fn minutes(duration: Duration) -> f64 {
    duration.as_secs_f64() / 60.0
}

pub fn accuracy(correct: usize, wrong: usize) -> f64 {
    match correct + wrong {
        0 => 0.0,
        total => correct as f64 / total as f64 * 100.0,
    }
}
