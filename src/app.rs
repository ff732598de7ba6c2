use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent as CtKeyEvent, KeyEventKind, KeyModifiers};

use crate::config::{Config, ConfigStore};
use crate::key::KeyEvent;
use crate::result::SessionResult;
use crate::session::Session;
use crate::words::{WordSelector, WordSource, WORD_COUNT_OPTIONS};

/// Whether the event loop should keep going after a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeState {
    pub number_of_words: usize,
}

#[derive(Debug, Clone)]
pub struct RunningState {
    pub session: Session,
    /// Refreshed on every key and tick for the live timer
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub enum AppState {
    Welcome(WelcomeState),
    Running(RunningState),
    Finished(SessionResult),
}

pub struct App {
    pub state: AppState,
    config: Config,
    source: WordSource,
    selector: Box<dyn WordSelector>,
    config_store: Box<dyn ConfigStore>,
}

impl App {
    pub fn new(
        source: WordSource,
        selector: Box<dyn WordSelector>,
        config_store: Box<dyn ConfigStore>,
    ) -> Self {
        let config = config_store.load();
        Self {
            state: AppState::Welcome(WelcomeState {
                number_of_words: config.number_of_words,
            }),
            config,
            source,
            selector,
            config_store,
        }
    }

    /// Overrides the remembered session length (e.g. from the command line)
    pub fn with_number_of_words(mut self, number_of_words: usize) -> Self {
        self.config.number_of_words = number_of_words;
        self.state = AppState::Welcome(self.welcome_state());
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn welcome_state(&self) -> WelcomeState {
        WelcomeState {
            number_of_words: self.config.number_of_words,
        }
    }

    pub fn handle_key(&mut self, key: &CtKeyEvent, now: Instant) -> Flow {
        if key.kind == KeyEventKind::Release {
            return Flow::Continue;
        }
        let ctrl_c =
            key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);

        match &mut self.state {
            AppState::Welcome(welcome) => match key.code {
                _ if ctrl_c => return Flow::Quit,
                KeyCode::Esc => return Flow::Quit,
                KeyCode::Enter => {
                    let number_of_words = welcome.number_of_words;
                    self.start(number_of_words);
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    welcome.number_of_words = cycle_option(welcome.number_of_words, false);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    welcome.number_of_words = cycle_option(welcome.number_of_words, true);
                }
                _ => {}
            },
            AppState::Running(running) => {
                if ctrl_c || key.code == KeyCode::Esc {
                    log::info!("session abandoned");
                    self.state = AppState::Welcome(self.welcome_state());
                    return Flow::Continue;
                }
                // Enter is a control key, not typing input
                if key.code == KeyCode::Enter {
                    return Flow::Continue;
                }

                if let Some(k) = KeyEvent::from_crossterm(key) {
                    if let Err(err) = running.session.handle_at(k, now) {
                        log::warn!("key {k:?} rejected: {err}");
                    }
                    running.elapsed = running.session.elapsed(now);
                    if running.session.is_finished() {
                        self.finish();
                    }
                }
            }
            AppState::Finished(_) => {
                if ctrl_c || matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                    self.state = AppState::Welcome(self.welcome_state());
                }
            }
        }

        Flow::Continue
    }

    pub fn on_tick(&mut self, now: Instant) {
        if let AppState::Running(running) = &mut self.state {
            running.elapsed = running.session.elapsed(now);
        }
    }

    fn start(&mut self, number_of_words: usize) {
        self.config.number_of_words = number_of_words;
        if let Err(err) = self.config_store.save(&self.config) {
            log::warn!("failed to save config: {err}");
        }

        let words = self.source.words(self.selector.as_mut(), number_of_words);
        match Session::new(words) {
            Ok(session) => {
                log::info!("starting session with {} words", session.expected_words().len());
                self.state = AppState::Running(RunningState {
                    session,
                    elapsed: Duration::ZERO,
                });
            }
            Err(err) => {
                log::error!("could not start session: {err}");
                self.state = AppState::Welcome(self.welcome_state());
            }
        }
    }

    fn finish(&mut self) {
        let welcome = self.welcome_state();
        let AppState::Running(running) = std::mem::replace(&mut self.state, AppState::Welcome(welcome))
        else {
            return;
        };

        match SessionResult::new(running.session) {
            Ok(result) => {
                if let Ok(m) = result.metrics() {
                    log::info!(
                        "session finished: {:.1} net wpm, {:.1}% accuracy",
                        m.net_wpm,
                        m.accuracy
                    );
                }
                self.state = AppState::Finished(result);
            }
            Err(err) => log::error!("could not build session result: {err}"),
        }
    }
}

/// Next session length option in either direction, wrapping around.
/// Values outside the option list snap to the nearest option that way.
pub fn cycle_option(current: usize, forward: bool) -> usize {
    let first = WORD_COUNT_OPTIONS[0];
    let last = WORD_COUNT_OPTIONS[WORD_COUNT_OPTIONS.len() - 1];
    if forward {
        WORD_COUNT_OPTIONS
            .into_iter()
            .find(|n| *n > current)
            .unwrap_or(first)
    } else {
        WORD_COUNT_OPTIONS
            .into_iter()
            .rev()
            .find(|n| *n < current)
            .unwrap_or(last)
    }
}
