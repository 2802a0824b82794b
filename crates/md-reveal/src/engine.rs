//! Session registry for the reveal engine.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use md_segment::Segment;
use tokio::sync::{mpsc, watch};

use crate::config::RevealConfig;
use crate::highlight::{Highlight, PlainHighlighter};
use crate::session::{run_session, total_chars, StopKind};
use crate::snapshot::RevealSnapshot;
use crate::timing::TimingPolicy;

/// Identifies one reveal session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

struct ActiveSession {
    stop: watch::Sender<Option<StopKind>>,
    /// Aborted on drop so an engine going away cannot leak ticking tasks.
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl ActiveSession {
    /// Forgets the task handle so dropping this bookkeeping entry lets the
    /// task run to its cooperative stop instead of aborting it.
    fn detach(mut self) {
        self.handle.take();
    }
}

impl Drop for ActiveSession {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Owns reveal sessions and their background tasks.
///
/// Each started session runs as one cooperative tokio task that emits
/// [`RevealSnapshot`]s over the returned channel. Sessions are independent;
/// the engine only keeps the stop signal and task handle per session.
///
/// Must be used from within a tokio runtime.
pub struct RevealEngine {
    config: RevealConfig,
    highlighter: Arc<dyn Highlight>,
    sessions: HashMap<SessionId, ActiveSession>,
}

impl RevealEngine {
    pub fn new(config: RevealConfig) -> Self {
        Self::with_highlighter(config, Arc::new(PlainHighlighter))
    }

    pub fn with_highlighter(config: RevealConfig, highlighter: Arc<dyn Highlight>) -> Self {
        Self {
            config,
            highlighter,
            sessions: HashMap::new(),
        }
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    /// Starts revealing `segments` under `session_id` and returns the
    /// snapshot stream.
    ///
    /// Reusing an id supersedes the session already running under it: the
    /// old session is cancelled (its receiver gets the usual final
    /// snapshot) before the new one starts.
    pub fn start_reveal(
        &mut self,
        segments: Vec<Segment>,
        session_id: SessionId,
    ) -> mpsc::UnboundedReceiver<RevealSnapshot> {
        if let Some(old) = self.sessions.remove(&session_id) {
            tracing::debug!(session = %session_id, "superseding active session");
            let _ = old.stop.send(Some(StopKind::Cancelled));
            // The superseded task still owes its receiver a final snapshot.
            old.detach();
        }

        let segments: Arc<[Segment]> = segments.into();
        let policy = TimingPolicy::for_text(&self.config, total_chars(&segments));
        let (tx, rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(None);
        let handle = tokio::spawn(run_session(
            session_id.clone(),
            segments,
            policy,
            Arc::clone(&self.highlighter),
            tx,
            stop_rx,
        ));
        self.sessions.insert(
            session_id,
            ActiveSession {
                stop: stop_tx,
                handle: Some(handle),
            },
        );
        rx
    }

    /// Cooperatively stops `session_id` at its next tick boundary.
    ///
    /// Idempotent: unknown, finished, or already-cancelled sessions are a
    /// no-op.
    pub fn cancel(&mut self, session_id: &SessionId) {
        self.stop(session_id, StopKind::Cancelled);
    }

    /// The user asked for the full answer now. Same mechanics as
    /// [`cancel`](Self::cancel); a separate entry point so hosts and logs
    /// can tell the two triggers apart.
    pub fn skip_to_end(&mut self, session_id: &SessionId) {
        self.stop(session_id, StopKind::Skipped);
    }

    fn stop(&mut self, session_id: &SessionId, kind: StopKind) {
        let Some(session) = self.sessions.get(session_id) else {
            tracing::debug!(session = %session_id, "stop for unknown session ignored");
            return;
        };
        // Send failure means the task already finished; nothing to do.
        let _ = session.stop.send(Some(kind));
    }

    /// Drops bookkeeping for sessions whose task has finished.
    pub fn reap_finished(&mut self) {
        self.sessions.retain(|_, session| {
            session
                .handle
                .as_ref()
                .map_or(false, |handle| !handle.is_finished())
        });
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }
}
