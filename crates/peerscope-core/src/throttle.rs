//! Rate limiting primitives driven by explicit instants.
//!
//! Neither type reads the clock or spawns anything: callers pass `now` in and
//! ask when the next deadline is. That keeps them usable from a tokio task,
//! a UI effect, or a test with a hand-rolled clock.

use std::time::Duration;

use tokio::time::Instant;

/// What happened to a value offered to a [`ThrottleWindow`].
#[derive(Debug, PartialEq)]
pub enum Offer<T> {
    /// Window had elapsed: publish this value now
    Emit(T),
    /// Held until the returned window boundary
    Scheduled(Instant),
    /// Replaced an already-held value; the existing deadline stands
    Coalesced,
}

/// Leading-edge throttle with last-write-wins coalescing.
///
/// At most one value is released per `window`. A value arriving after the
/// window has elapsed is released immediately; anything arriving sooner is
/// held until the window boundary, and a newer arrival replaces the held one.
#[derive(Debug)]
pub struct ThrottleWindow<T> {
    window: Duration,
    last_emit: Option<Instant>,
    pending: Option<T>,
}

impl<T> ThrottleWindow<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_emit: None,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Offer a value at `now`.
    pub fn offer(&mut self, now: Instant, value: T) -> Offer<T> {
        match self.last_emit {
            Some(last) if now < last + self.window => {
                if self.pending.replace(value).is_some() {
                    Offer::Coalesced
                } else {
                    Offer::Scheduled(last + self.window)
                }
            }
            _ => {
                // Anything still held is older than `value`
                self.pending = None;
                self.last_emit = Some(now);
                Offer::Emit(value)
            }
        }
    }

    /// When the held value becomes due, if one is held
    pub fn deadline(&self) -> Option<Instant> {
        match (&self.pending, self.last_emit) {
            (Some(_), Some(last)) => Some(last + self.window),
            _ => None,
        }
    }

    /// Release the held value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self.deadline()?;
        if now < due {
            return None;
        }
        self.last_emit = Some(now);
        self.pending.take()
    }

    /// Drop any held value without releasing it
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Trailing-edge debounce: a value is released once no newer value has
/// arrived for `delay`.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a new value, restarting the quiet period
    pub fn push(&mut self, now: Instant, value: T) {
        self.pending = Some((value, now + self.delay));
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    /// Release the value if the quiet period has passed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((_, due)) if now >= due => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }
}
