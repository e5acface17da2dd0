//! Pulse step: the quality selector and the 15-second tap counter.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tcm_core::i18n::{self, Language, TextKey};
use tcm_core::models::form::{FormData, FormPatch};
use tcm_core::models::pulse::{PulsePatch, PulseQuality, first_conflict};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Length of a tap-count measurement.
pub const MEASURE_SECONDS: u32 = 15;

/// Rejected toggle: `selected` contradicts the already chosen `existing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseConflict {
    pub selected: PulseQuality,
    pub existing: PulseQuality,
}

impl PulseConflict {
    pub fn message(&self, lang: Language) -> String {
        let name = |q: PulseQuality| match lang {
            Language::En => q.name_en(),
            Language::Zh => q.name_zh(),
        };
        i18n::format(
            lang,
            TextKey::PulseConflict,
            &[
                ("selected", name(self.selected)),
                ("existing", name(self.existing)),
            ],
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PulseSelection {
    selected: Vec<PulseQuality>,
}

impl PulseSelection {
    pub fn from_form(form: &FormData) -> Self {
        Self {
            selected: form.pulse.qualities.clone(),
        }
    }

    pub fn selected(&self) -> &[PulseQuality] {
        &self.selected
    }

    pub fn contains(&self, quality: PulseQuality) -> bool {
        self.selected.contains(&quality)
    }

    /// Deselecting always succeeds. Selecting is refused when an already
    /// selected quality contradicts it; the selection is then unchanged.
    pub fn toggle(&mut self, quality: PulseQuality) -> Result<(), PulseConflict> {
        if let Some(pos) = self.selected.iter().position(|&q| q == quality) {
            self.selected.remove(pos);
            return Ok(());
        }
        if let Some(existing) = first_conflict(&self.selected, quality) {
            return Err(PulseConflict {
                selected: quality,
                existing,
            });
        }
        self.selected.push(quality);
        Ok(())
    }

    pub fn patch(&self) -> FormPatch {
        FormPatch::Pulse(PulsePatch {
            bpm: None,
            qualities: Some(self.selected.clone()),
        })
    }
}

/// Typed BPM entry. An empty string clears the reading.
pub fn bpm_patch(raw: &str) -> FormPatch {
    FormPatch::Pulse(PulsePatch {
        bpm: Some(raw.to_string()),
        qualities: None,
    })
}

/// Beats per minute from taps counted over `seconds`.
pub fn bpm_from_taps(taps: u32, seconds: u32) -> u16 {
    if seconds == 0 {
        return 0;
    }
    u16::try_from(taps.saturating_mul(60) / seconds).unwrap_or(u16::MAX)
}

/// A running tap-count measurement.
///
/// A background task ticks once per second and publishes the seconds left
/// on a watch channel. The task is aborted when the countdown is cancelled
/// or dropped, so leaving the step never leaks a timer.
pub struct PulseCountdown {
    seconds: u32,
    remaining: watch::Receiver<u32>,
    taps: Arc<AtomicU32>,
    task: JoinHandle<()>,
}

impl PulseCountdown {
    pub fn start(seconds: u32) -> Self {
        let (tx, rx) = watch::channel(seconds);
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // The first tick completes immediately.
            interval.tick().await;
            let mut left = seconds;
            while left > 0 {
                interval.tick().await;
                left -= 1;
                if tx.send(left).is_err() {
                    break;
                }
            }
            debug!("pulse countdown finished");
        });

        Self {
            seconds,
            remaining: rx,
            taps: Arc::new(AtomicU32::new(0)),
            task,
        }
    }

    pub fn remaining(&self) -> u32 {
        *self.remaining.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.remaining.clone()
    }

    /// Count one beat. Ignored once time is up.
    pub fn tap(&self) -> bool {
        if self.remaining() == 0 {
            return false;
        }
        self.taps.fetch_add(1, Ordering::Relaxed);
        true
    }

    pub fn taps(&self) -> u32 {
        self.taps.load(Ordering::Relaxed)
    }

    /// Wait for the countdown to reach zero and return the measured BPM.
    /// `None` if the timer stopped early.
    pub async fn finished(&mut self) -> Option<u16> {
        self.remaining.wait_for(|&left| left == 0).await.ok()?;
        Some(bpm_from_taps(self.taps(), self.seconds))
    }

    pub fn cancel(self) {
        self.task.abort();
    }
}

impl Drop for PulseCountdown {
    fn drop(&mut self) {
        self.task.abort();
    }
}
