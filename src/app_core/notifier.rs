//! Transient acknowledgement overlay.
//!
//! Time is injected as milliseconds from whatever clock the runtime owns
//! (`performance.now()` in the browser, an `Instant` natively). A newer message
//! replaces both the text and the dismissal deadline, so a dismissal scheduled
//! for an older message never hides a newer one early.

/// How long a message stays up before it is dismissed automatically.
pub const NOTICE_DURATION_MS: u64 = 1000;

#[derive(Debug, Clone, Default)]
pub struct Notifier {
    message: String,
    visible: bool,
    dismiss_at_ms: Option<u64>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `message` and schedules its dismissal.
    pub fn notify(&mut self, message: impl Into<String>, now_ms: u64) {
        self.message = message.into();
        self.visible = true;
        self.dismiss_at_ms = Some(now_ms.saturating_add(NOTICE_DURATION_MS));
    }

    pub fn dismiss(&mut self) {
        self.visible = false;
        self.dismiss_at_ms = None;
    }

    /// Handles a click on the overlay. Clicks on the content itself keep it up.
    /// Returns `true` if the overlay was dismissed.
    pub fn click(&mut self, inside_content: bool) -> bool {
        if !self.visible || inside_content {
            return false;
        }
        self.dismiss();
        true
    }

    /// Applies the scheduled dismissal. Returns `true` if visibility changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match self.dismiss_at_ms {
            Some(deadline) if self.visible && now_ms >= deadline => {
                self.dismiss();
                true
            }
            _ => false,
        }
    }

    /// Milliseconds until the pending dismissal, if one is scheduled.
    pub fn time_to_dismiss(&self, now_ms: u64) -> Option<u64> {
        self.dismiss_at_ms
            .filter(|_| self.visible)
            .map(|deadline| deadline.saturating_sub(now_ms))
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
