//! The per-session reveal task.
//!
//! All mutable session state (current segment index, revealed character
//! count, stop flag) is owned by the task itself; the only thing shared
//! with the engine is the stop channel and the immutable segment list.

use std::sync::Arc;

use md_segment::Segment;
use tokio::sync::{mpsc, watch};

use crate::engine::SessionId;
use crate::highlight::Highlight;
use crate::snapshot::{partial_for, table_char_len, RevealSnapshot};
use crate::timing::TimingPolicy;

/// Why a session was asked to stop. Mechanically identical either way;
/// kept apart so logs can tell a user skip from a supersession.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopKind {
    Cancelled,
    Skipped,
}

pub(crate) async fn run_session(
    session_id: SessionId,
    segments: Arc<[Segment]>,
    policy: TimingPolicy,
    highlighter: Arc<dyn Highlight>,
    tx: mpsc::UnboundedSender<RevealSnapshot>,
    mut stop: watch::Receiver<Option<StopKind>>,
) {
    tracing::debug!(
        session = %session_id,
        segments = segments.len(),
        "reveal session started"
    );

    let last = segments.len().saturating_sub(1);

    for (segment_index, segment) in segments.iter().enumerate() {
        let chars = reveal_chars(segment);

        if chars.is_empty() {
            let snapshot = RevealSnapshot {
                session_id: session_id.clone(),
                segment_index,
                partial: partial_for(segment, 0, highlighter.as_ref()),
                is_segment_complete: true,
                is_stream_complete: segment_index == last,
            };
            if tx.send(snapshot).is_err() {
                return;
            }
            continue;
        }

        let mut revealed = 0;
        while revealed < chars.len() {
            let delay = policy.delay_for(chars[revealed]);

            tokio::select! {
                kind = wait_for_stop(&mut stop) => {
                    // Flush the current segment in full; segments not yet
                    // started stay unrevealed.
                    let snapshot = RevealSnapshot {
                        session_id: session_id.clone(),
                        segment_index,
                        partial: partial_for(segment, chars.len(), highlighter.as_ref()),
                        is_segment_complete: true,
                        is_stream_complete: true,
                    };
                    let _ = tx.send(snapshot);
                    match kind {
                        StopKind::Cancelled => {
                            tracing::debug!(session = %session_id, "reveal session cancelled")
                        }
                        StopKind::Skipped => {
                            tracing::debug!(session = %session_id, "reveal session skipped to end")
                        }
                    }
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            revealed += 1;
            let is_segment_complete = revealed == chars.len();
            let snapshot = RevealSnapshot {
                session_id: session_id.clone(),
                segment_index,
                partial: partial_for(segment, revealed, highlighter.as_ref()),
                is_segment_complete,
                is_stream_complete: is_segment_complete && segment_index == last,
            };
            if tx.send(snapshot).is_err() {
                tracing::debug!(session = %session_id, "snapshot receiver dropped, ending session");
                return;
            }
        }
    }

    tracing::debug!(session = %session_id, "reveal session complete");
}

/// Resolves when a stop has been signalled. If the engine side went away
/// without signalling, parks forever; the aborted task handle is what
/// tears the session down then.
async fn wait_for_stop(stop: &mut watch::Receiver<Option<StopKind>>) -> StopKind {
    loop {
        if let Some(kind) = *stop.borrow_and_update() {
            return kind;
        }
        if stop.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// The characters of `segment` in reveal order. For tables that is headers
/// first, then each row's cells left to right.
fn reveal_chars(segment: &Segment) -> Vec<char> {
    match segment {
        Segment::Text(styled) | Segment::Blockquote(styled) => styled.text.chars().collect(),
        Segment::CodeBlock { code, .. } | Segment::InlineCode { code } => code.chars().collect(),
        Segment::Table(table) => table
            .headers
            .iter()
            .chain(table.rows.iter().flatten())
            .flat_map(|cell| cell.text.chars())
            .collect(),
    }
}

pub(crate) fn segment_char_len(segment: &Segment) -> usize {
    match segment {
        Segment::Text(styled) | Segment::Blockquote(styled) => styled.char_len(),
        Segment::CodeBlock { code, .. } | Segment::InlineCode { code } => code.chars().count(),
        Segment::Table(table) => table_char_len(table),
    }
}

/// Total characters across the whole message, the input to the timing
/// policy's length pre-scaling.
pub(crate) fn total_chars(segments: &[Segment]) -> usize {
    segments.iter().map(segment_char_len).sum()
}
