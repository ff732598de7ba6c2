use std::time::{Duration, Instant};

use crate::key::{KeyEvent, KeyKind};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("{0} is a control key and cannot be typed into a session")]
    InvalidKeyKind(KeyKind),
    #[error("session has already finished")]
    SessionAlreadyFinished,
    #[error("session has not finished yet")]
    NotFinished,
    #[error("a session needs at least one word")]
    EmptyWordList,
    #[error("invalid word {0:?}: words must be non-empty and contain no whitespace")]
    InvalidWord(String),
}

/// A single typing attempt over a fixed list of words.
///
/// Timing starts lazily on the first accepted key and the session becomes
/// read-only once it has finished.
#[derive(Debug, Clone)]
pub struct Session {
    expected_words: Vec<String>,
    current_word_index: usize,
    /// Characters and space markers; backspace pops instead of appending
    typed_keys: Vec<KeyEvent>,
    /// Every accepted key, never rewritten
    raw_key_log: Vec<KeyEvent>,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
}

impl Session {
    pub fn new<I, S>(words: I) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let expected_words: Vec<String> = words.into_iter().map(Into::into).collect();

        if expected_words.is_empty() {
            return Err(SessionError::EmptyWordList);
        }
        if let Some(bad) = expected_words
            .iter()
            .find(|w| w.is_empty() || w.chars().any(char::is_whitespace))
        {
            return Err(SessionError::InvalidWord(bad.clone()));
        }

        Ok(Self {
            expected_words,
            current_word_index: 0,
            typed_keys: vec![],
            raw_key_log: vec![],
            started_at: None,
            finished_at: None,
        })
    }

    pub fn handle(&mut self, key: KeyEvent) -> Result<(), SessionError> {
        self.handle_at(key, Instant::now())
    }

    /// Applies one key as if it arrived at `now`
    pub fn handle_at(&mut self, key: KeyEvent, now: Instant) -> Result<(), SessionError> {
        if self.is_finished() {
            return Err(SessionError::SessionAlreadyFinished);
        }

        let key = key.normalized();
        if matches!(key, KeyEvent::Enter | KeyEvent::Escape) {
            return Err(SessionError::InvalidKeyKind(key.kind()));
        }

        if self.started_at.is_none() {
            log::debug!("session started ({} words)", self.expected_words.len());
            self.started_at = Some(now);
        }
        self.raw_key_log.push(key);
        log::trace!("key {:?} at word {}", key, self.current_word_index);

        match key {
            KeyEvent::Char(_) => self.handle_char(key, now),
            KeyEvent::Space => self.handle_space(now),
            KeyEvent::Backspace => self.handle_backspace(),
            KeyEvent::Enter | KeyEvent::Escape => {}
        }

        Ok(())
    }

    fn handle_char(&mut self, key: KeyEvent, now: Instant) {
        self.typed_keys.push(key);

        if self.on_last_word() && self.current_typed_word() == self.expected_words[self.last_index()]
        {
            self.finish(now);
        }
    }

    fn handle_space(&mut self, now: Instant) {
        self.typed_keys.push(KeyEvent::Space);

        if self.on_last_word() {
            self.finish(now);
        } else {
            self.current_word_index += 1;
        }
    }

    fn handle_backspace(&mut self) {
        if self.current_word_index == 0 && self.typed_keys.is_empty() {
            return;
        }

        if self.char_index_in_word() == 0 {
            self.current_word_index = self.current_word_index.saturating_sub(1);
        }
        self.typed_keys.pop();
    }

    fn finish(&mut self, now: Instant) {
        let started_at = *self.started_at.get_or_insert(now);
        self.finished_at = Some(now.max(started_at));
        log::debug!(
            "session finished after {:.2}s",
            self.duration().unwrap_or_default().as_secs_f64()
        );
    }

    fn last_index(&self) -> usize {
        self.expected_words.len() - 1
    }

    fn on_last_word(&self) -> bool {
        self.current_word_index == self.last_index()
    }

    /// Offset of the cursor within the word being typed
    pub fn char_index_in_word(&self) -> usize {
        self.typed_keys
            .iter()
            .rev()
            .take_while(|k| **k != KeyEvent::Space)
            .count()
    }

    /// Characters typed since the last space
    pub fn current_typed_word(&self) -> String {
        let start = self.typed_keys.len() - self.char_index_in_word();
        self.typed_keys[start..].iter().filter_map(KeyEvent::char).collect()
    }

    /// Typed keys split on space markers, the in-progress word included
    pub fn typed_words(&self) -> Vec<String> {
        let mut words = vec![String::new()];
        for key in &self.typed_keys {
            match key {
                KeyEvent::Space => words.push(String::new()),
                other => {
                    if let (Some(c), Some(word)) = (other.char(), words.last_mut()) {
                        word.push(c);
                    }
                }
            }
        }
        words
    }

    pub fn expected_words(&self) -> &[String] {
        &self.expected_words
    }

    pub fn current_word_index(&self) -> usize {
        self.current_word_index
    }

    pub fn typed_keys(&self) -> &[KeyEvent] {
        &self.typed_keys
    }

    pub fn raw_key_log(&self) -> &[KeyEvent] {
        &self.raw_key_log
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<Instant> {
        self.finished_at
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Time between the first key and the finishing key
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some(end.duration_since(start)),
            _ => None,
        }
    }

    /// Live elapsed time, frozen once the session has finished
    pub fn elapsed(&self, now: Instant) -> Duration {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.duration_since(start),
            (Some(start), None) => now.saturating_duration_since(start),
            (None, _) => Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::keys_for;
    use assert_matches::assert_matches;

    fn type_all(session: &mut Session, text: &str, at: Instant) {
        for key in keys_for(text) {
            session.handle_at(key, at).unwrap();
        }
    }

    #[test]
    fn new_rejects_empty_list() {
        let words: Vec<String> = vec![];
        assert_matches!(Session::new(words), Err(SessionError::EmptyWordList));
    }

    #[test]
    fn new_rejects_blank_and_spaced_words() {
        assert_matches!(
            Session::new(["ok", ""]),
            Err(SessionError::InvalidWord(w)) if w.is_empty()
        );
        assert_matches!(
            Session::new(["two words"]),
            Err(SessionError::InvalidWord(w)) if w == "two words"
        );
    }

    #[test]
    fn first_key_starts_the_clock() {
        let mut session = Session::new(["cat", "dog"]).unwrap();
        assert!(!session.has_started());

        let t0 = Instant::now();
        session.handle_at(KeyEvent::Char('c'), t0).unwrap();
        session
            .handle_at(KeyEvent::Char('a'), t0 + Duration::from_secs(1))
            .unwrap();

        assert_eq!(session.started_at(), Some(t0));
        assert!(!session.is_finished());
    }

    #[test]
    fn backspace_counts_as_first_key() {
        let mut session = Session::new(["cat"]).unwrap();
        let t0 = Instant::now();
        session.handle_at(KeyEvent::Backspace, t0).unwrap();
        assert_eq!(session.started_at(), Some(t0));
        assert_eq!(session.raw_key_log(), &[KeyEvent::Backspace]);
    }

    #[test]
    fn space_advances_word_index() {
        let mut session = Session::new(["cat", "dog", "fox"]).unwrap();
        type_all(&mut session, "cat ", Instant::now());
        assert_eq!(session.current_word_index(), 1);
        assert_eq!(session.char_index_in_word(), 0);
    }

    #[test]
    fn space_advances_even_on_wrong_word() {
        let mut session = Session::new(["cat", "dog"]).unwrap();
        type_all(&mut session, "x ", Instant::now());
        assert_eq!(session.current_word_index(), 1);
        assert_eq!(session.typed_words(), vec!["x", ""]);
    }

    #[test]
    fn finishes_on_last_word_without_trailing_space() {
        let mut session = Session::new(["no", "yes"]).unwrap();
        let t0 = Instant::now();
        type_all(&mut session, "no ye", t0);
        assert!(!session.is_finished());

        let t1 = t0 + Duration::from_secs(3);
        session.handle_at(KeyEvent::Char('s'), t1).unwrap();
        assert!(session.is_finished());
        assert_eq!(session.finished_at(), Some(t1));
        assert!(session.finished_at() >= session.started_at());
        assert_eq!(session.duration(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn wrong_last_word_does_not_finish_until_space() {
        let mut session = Session::new(["no", "yes"]).unwrap();
        let t0 = Instant::now();
        type_all(&mut session, "no yas", t0);
        assert!(!session.is_finished());

        session.handle_at(KeyEvent::Space, t0).unwrap();
        assert!(session.is_finished());
        assert_eq!(session.current_word_index(), 1);
    }

    #[test]
    fn space_on_last_word_finishes() {
        let mut session = Session::new(["solo"]).unwrap();
        let t0 = Instant::now();
        session.handle_at(KeyEvent::Space, t0).unwrap();
        assert!(session.is_finished());
        assert_eq!(session.current_word_index(), 0);
    }

    #[test]
    fn backspace_on_empty_session_is_noop() {
        let mut session = Session::new(["cat"]).unwrap();
        session.handle_at(KeyEvent::Backspace, Instant::now()).unwrap();
        session.handle_at(KeyEvent::Backspace, Instant::now()).unwrap();

        assert_eq!(session.current_word_index(), 0);
        assert!(session.typed_keys().is_empty());
        assert_eq!(session.raw_key_log().len(), 2);
    }

    #[test]
    fn backspace_within_word_pops_char() {
        let mut session = Session::new(["cat", "dog"]).unwrap();
        type_all(&mut session, "cax", Instant::now());
        session.handle(KeyEvent::Backspace).unwrap();
        assert_eq!(session.current_typed_word(), "ca");
        assert_eq!(session.current_word_index(), 0);
    }

    #[test]
    fn backspace_after_space_returns_to_previous_word() {
        let mut session = Session::new(["cat", "dog", "fox"]).unwrap();
        type_all(&mut session, "cat do", Instant::now());
        assert_eq!(session.current_word_index(), 1);

        session.handle(KeyEvent::Backspace).unwrap();
        session.handle(KeyEvent::Backspace).unwrap();
        assert_eq!(session.current_word_index(), 1);
        assert_eq!(session.typed_keys().last(), Some(&KeyEvent::Space));

        session.handle(KeyEvent::Backspace).unwrap();
        assert_eq!(session.current_word_index(), 0);
        assert_eq!(session.current_typed_word(), "cat");
        assert_eq!(session.typed_words(), vec!["cat"]);
    }

    #[test]
    fn char_index_in_word_counts_since_space() {
        let mut session = Session::new(["ab", "cd"]).unwrap();
        assert_eq!(session.char_index_in_word(), 0);
        type_all(&mut session, "ab", Instant::now());
        assert_eq!(session.char_index_in_word(), 2);
        type_all(&mut session, " c", Instant::now());
        assert_eq!(session.char_index_in_word(), 1);
    }

    #[test]
    fn control_keys_are_rejected_without_side_effects() {
        let mut session = Session::new(["cat"]).unwrap();

        assert_matches!(
            session.handle(KeyEvent::Enter),
            Err(SessionError::InvalidKeyKind(KeyKind::Enter))
        );
        assert_matches!(
            session.handle(KeyEvent::Char('\x1b')),
            Err(SessionError::InvalidKeyKind(KeyKind::Escape))
        );
        assert!(!session.has_started());
        assert!(session.raw_key_log().is_empty());
    }

    #[test]
    fn finished_session_rejects_further_keys() {
        let mut session = Session::new(["hi"]).unwrap();
        type_all(&mut session, "hi", Instant::now());
        assert!(session.is_finished());

        let typed_before = session.typed_keys().to_vec();
        assert_matches!(
            session.handle(KeyEvent::Char('x')),
            Err(SessionError::SessionAlreadyFinished)
        );
        assert_matches!(
            session.handle(KeyEvent::Backspace),
            Err(SessionError::SessionAlreadyFinished)
        );
        assert_eq!(session.typed_keys(), typed_before.as_slice());
        assert_eq!(session.raw_key_log().len(), 2);
    }

    #[test]
    fn raw_log_matches_successful_calls() {
        let mut session = Session::new(["ab", "cd"]).unwrap();
        let keys = [
            KeyEvent::Char('a'),
            KeyEvent::Enter,
            KeyEvent::Backspace,
            KeyEvent::Backspace,
            KeyEvent::Char('a'),
            KeyEvent::Char('b'),
            KeyEvent::Escape,
            KeyEvent::Space,
            KeyEvent::Char('c'),
        ];
        let ok = keys
            .iter()
            .filter(|k| session.handle(**k).is_ok())
            .count();

        assert_eq!(ok, 7);
        assert_eq!(session.raw_key_log().len(), ok);
        assert_eq!(session.typed_words(), vec!["ab", "c"]);
    }

    #[test]
    fn char_space_is_treated_as_space() {
        let mut session = Session::new(["a", "b"]).unwrap();
        session.handle(KeyEvent::Char('a')).unwrap();
        session.handle(KeyEvent::Char(' ')).unwrap();
        assert_eq!(session.current_word_index(), 1);
        assert_eq!(session.typed_keys().last(), Some(&KeyEvent::Space));
    }

    #[test]
    fn elapsed_freezes_after_finish() {
        let mut session = Session::new(["a"]).unwrap();
        let t0 = Instant::now();
        assert_eq!(session.elapsed(t0), Duration::ZERO);

        session.handle_at(KeyEvent::Backspace, t0).unwrap();
        assert_eq!(
            session.elapsed(t0 + Duration::from_secs(2)),
            Duration::from_secs(2)
        );

        session
            .handle_at(KeyEvent::Char('a'), t0 + Duration::from_secs(5))
            .unwrap();
        assert_eq!(
            session.elapsed(t0 + Duration::from_secs(60)),
            Duration::from_secs(5)
        );
    }
}
