// src/system/autosave.rs
//
// Debounced background persistence. Every state change sends a unit signal
// into a channel; the autosave task coalesces bursts and writes the project's
// pyproject.toml once the form has been quiet for the debounce window.

use crate::constants::AUTOSAVE_DELAY_MS;
use crate::core::writer;
use crate::state::FormState;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tokio::time;

/// Spawns the autosave task with the standard debounce window. The task runs
/// until the signal channel closes; a change still pending at shutdown is
/// flushed before the task exits.
pub fn spawn_autosave(
    state: Arc<Mutex<FormState>>,
    signals: UnboundedReceiver<()>,
) -> JoinHandle<()> {
    spawn_autosave_with_delay(state, signals, Duration::from_millis(AUTOSAVE_DELAY_MS))
}

pub fn spawn_autosave_with_delay(
    state: Arc<Mutex<FormState>>,
    mut signals: UnboundedReceiver<()>,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if signals.recv().await.is_none() {
                break;
            }
            // A change arrived; keep restarting the window until the form
            // goes quiet, then save once.
            loop {
                tokio::select! {
                    more = signals.recv() => match more {
                        Some(()) => continue,
                        None => {
                            save_now(&state);
                            return;
                        }
                    },
                    () = time::sleep(delay) => {
                        save_now(&state);
                        break;
                    }
                }
            }
        }
    })
}

fn save_now(state: &Arc<Mutex<FormState>>) {
    let guard = state.lock().expect("Mutex should not be poisoned");
    if guard.python_app_path.is_empty() {
        log::debug!("Skipping autosave: no project path set.");
        return;
    }
    let project_dir = guard.python_app_path.clone();
    if writer::save_to_path(&project_dir, &guard) {
        log::debug!("Autosaved configuration to '{}'.", project_dir);
    }
}
