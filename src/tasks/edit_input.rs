//! Terminal editing of a running timer

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use crate::{state::TimerState, timer::Timer};

/// Treat each input line as an edit of the displayed time.
///
/// A non-empty line focuses the timer (pausing it) and blurs it with the
/// line as the edited text. An empty line toggles pause and resume. Returns
/// when the input closes or the timer stops.
pub async fn edit_input_task<R>(timer: Timer, input: R)
where
    R: AsyncBufRead + Unpin,
{
    info!("Editing enabled: type a time such as \"1:30 min\", or press enter to pause/resume");

    let mut lines = input.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read edit input: {}", e);
                break;
            }
        };

        if timer.state() == TimerState::Stopped {
            break;
        }

        let text = line.trim();
        if text.is_empty() {
            if !timer.pause() {
                timer.resume();
            }
            continue;
        }

        timer.on_focus();
        if let Err(e) = timer.on_blur(text) {
            warn!("Edit not applied, timer stays paused: {}", e);
        }
    }
}
