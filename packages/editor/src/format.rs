//! # Format State
//!
//! Which representation of the document is authoritative, and when the
//! derived one has to be rebuilt.
//!
//! ```text
//!            switch_to_text                 text_changed
//!   Tree ─────────────────────▶ Text ◀──────────────────┐
//!    ▲                           │  (debounce armed)    │
//!    │      switch_to_tree       │                      │
//!    └───────────────────────────┘   tick ≥ deadline ──▶ re-derive tree,
//!                                                        typing released
//!                                                        after release delay
//! ```
//!
//! The clock is injected: every time-dependent call takes an [`Instant`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::trace;

/// Default quiet period after the last keystroke before the tree is rebuilt.
pub const DEFAULT_DEBOUNCE_MS: u64 = 220;

/// Default delay between a rebuild and the end of the typing phase.
pub const DEFAULT_TYPING_RELEASE_MS: u64 = 350;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Structured tree.
    Tree,
    /// Flat Markdown text with raw component blocks.
    Text,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Tree => write!(f, "tree"),
            Format::Text => write!(f, "text"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncTiming {
    pub debounce: Duration,
    pub typing_release: Duration,
}

impl SyncTiming {
    pub fn from_millis(debounce_ms: u64, typing_release_ms: u64) -> Self {
        Self {
            debounce: Duration::from_millis(debounce_ms),
            typing_release: Duration::from_millis(typing_release_ms),
        }
    }
}

impl Default for SyncTiming {
    fn default() -> Self {
        Self::from_millis(DEFAULT_DEBOUNCE_MS, DEFAULT_TYPING_RELEASE_MS)
    }
}

/// Representation synchronizer state.
#[derive(Debug, Clone)]
pub struct FormatState {
    authoritative: Format,
    timing: SyncTiming,
    /// Deadline of the armed debounce, if any.
    pending_sync: Option<Instant>,
    typing: bool,
    release_at: Option<Instant>,
    rederivations: u64,
}

impl FormatState {
    pub fn new(authoritative: Format, timing: SyncTiming) -> Self {
        Self {
            authoritative,
            timing,
            pending_sync: None,
            typing: false,
            release_at: None,
            rederivations: 0,
        }
    }

    pub fn authoritative(&self) -> Format {
        self.authoritative
    }

    pub fn timing(&self) -> SyncTiming {
        self.timing
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn has_pending_sync(&self) -> bool {
        self.pending_sync.is_some()
    }

    /// Number of times the tree was rebuilt from text.
    pub fn rederivations(&self) -> u64 {
        self.rederivations
    }

    /// Text becomes authoritative. Called after the text snapshot is taken.
    pub fn enter_text(&mut self) {
        self.authoritative = Format::Text;
        self.reset_typing();
    }

    /// Tree becomes authoritative. Called after the tree snapshot is taken.
    pub fn enter_tree(&mut self) {
        self.authoritative = Format::Tree;
        self.reset_typing();
    }

    fn reset_typing(&mut self) {
        self.pending_sync = None;
        self.typing = false;
        self.release_at = None;
    }

    /// A keystroke: mark typing and (re)arm the debounce deadline.
    pub fn text_changed(&mut self, now: Instant) {
        self.typing = true;
        self.release_at = None;
        self.pending_sync = Some(now + self.timing.debounce);
        trace!(debounce_ms = self.timing.debounce.as_millis() as u64, "debounce armed");
    }

    /// Advance the clock. Returns `true` when the tree must be rebuilt now.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut rebuild = false;
        if let Some(deadline) = self.pending_sync {
            if now >= deadline {
                self.pending_sync = None;
                self.record_rederivation();
                self.release_at = Some(now + self.timing.typing_release);
                rebuild = true;
            }
        }
        if let Some(release) = self.release_at {
            if now >= release {
                self.release_at = None;
                self.typing = false;
            }
        }
        rebuild
    }

    /// Count a rebuild that happened outside the debounce path.
    pub fn record_rederivation(&mut self) {
        self.rederivations += 1;
    }

    /// Tree to text refresh is allowed only while text is authoritative and
    /// the user is not typing.
    pub fn allows_reverse_sync(&self) -> bool {
        self.authoritative == Format::Text && !self.typing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_debounce_coalesces_keystrokes() {
        let t0 = Instant::now();
        let mut state = FormatState::new(Format::Text, SyncTiming::default());

        state.text_changed(t0);
        state.text_changed(t0 + ms(100));
        state.text_changed(t0 + ms(200));
        assert!(!state.tick(t0 + ms(300)));
        assert!(state.is_typing());

        assert!(state.tick(t0 + ms(420)));
        assert!(!state.tick(t0 + ms(500)));
        assert_eq!(state.rederivations(), 1);
        assert!(state.is_typing());
        assert!(!state.allows_reverse_sync());
    }

    #[test]
    fn test_typing_released_after_delay() {
        let t0 = Instant::now();
        let mut state = FormatState::new(Format::Text, SyncTiming::default());
        state.text_changed(t0);
        assert!(state.tick(t0 + ms(220)));
        assert!(!state.tick(t0 + ms(569)));
        assert!(state.is_typing());
        state.tick(t0 + ms(570));
        assert!(!state.is_typing());
        assert!(state.allows_reverse_sync());
    }

    #[test]
    fn test_keystroke_after_rebuild_rearms() {
        let t0 = Instant::now();
        let mut state = FormatState::new(Format::Text, SyncTiming::default());
        state.text_changed(t0);
        assert!(state.tick(t0 + ms(220)));
        state.text_changed(t0 + ms(300));
        assert!(!state.tick(t0 + ms(500)));
        assert!(state.is_typing());
        assert!(state.tick(t0 + ms(520)));
        assert!(!state.tick(t0 + ms(869)));
        assert!(state.is_typing());
        state.tick(t0 + ms(870));
        assert!(!state.is_typing());
        assert_eq!(state.rederivations(), 2);
    }

    #[test]
    fn test_switching_clears_pending_work() {
        let t0 = Instant::now();
        let mut state = FormatState::new(Format::Text, SyncTiming::from_millis(10, 10));
        state.text_changed(t0);
        state.enter_tree();
        assert_eq!(state.authoritative(), Format::Tree);
        assert!(!state.has_pending_sync());
        assert!(!state.tick(t0 + ms(50)));
        assert!(!state.allows_reverse_sync());
    }
}
