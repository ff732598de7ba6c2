use std::time::Duration;

use chrono::{DateTime, Local};

use crate::metrics::{Metrics, MetricsError};
use crate::session::{Session, SessionError};

/// Immutable outcome of a finished session, handed to the results screen
#[derive(Debug, Clone)]
pub struct SessionResult {
    final_state: Session,
    duration: Duration,
    metrics: Result<Metrics, MetricsError>,
    completed_at: DateTime<Local>,
}

impl SessionResult {
    pub fn new(session: Session) -> Result<Self, SessionError> {
        let duration = session.duration().ok_or(SessionError::NotFinished)?;
        let metrics = Metrics::compute(&session);
        if let Err(err) = &metrics {
            log::warn!("metrics unavailable: {err}");
        }

        Ok(Self {
            final_state: session,
            duration,
            metrics,
            completed_at: Local::now(),
        })
    }

    pub fn final_state(&self) -> &Session {
        &self.final_state
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn metrics(&self) -> Result<&Metrics, &MetricsError> {
        self.metrics.as_ref()
    }

    pub fn net_wpm(&self) -> Option<f64> {
        self.metrics().ok().map(|m| m.net_wpm)
    }

    pub fn raw_wpm(&self) -> Option<f64> {
        self.metrics().ok().map(|m| m.raw_wpm)
    }

    pub fn accuracy(&self) -> Option<f64> {
        self.metrics().ok().map(|m| m.accuracy)
    }

    pub fn completed_at(&self) -> DateTime<Local> {
        self.completed_at
    }
}
