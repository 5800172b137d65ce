//! Theme broadcast: the process-wide theme index and its publish/subscribe
//! contract.
//!
//! One [`ThemeBroadcast`] holds the current index into three parallel
//! palettes (object colors, background colors, accent colors). Only the
//! impact dispatcher advances it. Everyone else reads through [`ThemeSource`]
//! or listens on a channel obtained from [`ThemeBroadcast::subscribe`].
//!
//! Late joiners (a header created after a few clicks, say) read the last
//! published value with [`ThemeBroadcast::current_color`] before they start
//! listening, so nothing is lost between page transitions.
//!
//! ```ignore
//! let theme = ThemeBroadcast::global();
//! let events = theme.subscribe();
//! println!("accent now {}", theme.current_color());
//! for event in events.try_iter() { /* ... */ }
//! ```

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use crate::color::Rgb;

/// Number of entries in each theme palette.
pub const THEME_COUNT: usize = 5;

/// Parallel palettes selected by the theme index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePalette {
    /// Color of the "colored" objects.
    pub objects: [Rgb; THEME_COUNT],
    /// Dark scene background behind the objects.
    pub backgrounds: [Rgb; THEME_COUNT],
    /// Light tint for accent lighting.
    pub accents: [Rgb; THEME_COUNT],
}

impl ThemePalette {
    /// The industrial palette: blue, grass green, engineering red, purple,
    /// warning yellow.
    pub const INDUSTRIAL: ThemePalette = ThemePalette {
        objects: [
            Rgb::hex(0x1F3FBF),
            Rgb::hex(0x8FBF00),
            Rgb::hex(0xC4161C),
            Rgb::hex(0x6A2DBF),
            Rgb::hex(0xC9A400),
        ],
        backgrounds: [
            Rgb::hex(0x0D1120),
            Rgb::hex(0x0E1A14),
            Rgb::hex(0x1A0E0E),
            Rgb::hex(0x14101F),
            Rgb::hex(0x1A160E),
        ],
        accents: [
            Rgb::hex(0xEEF2FF),
            Rgb::hex(0xEAF7F0),
            Rgb::hex(0xFFEAE5),
            Rgb::hex(0xF0EBFF),
            Rgb::hex(0xFAF4DF),
        ],
    };

    /// Number of themes the index cycles through.
    #[inline]
    pub fn len(&self) -> usize {
        THEME_COUNT
    }

    /// Object color for a theme index (wraps).
    pub fn object(&self, index: usize) -> Rgb {
        self.objects[index % THEME_COUNT]
    }

    /// Background color for a theme index (wraps).
    pub fn background(&self, index: usize) -> Rgb {
        self.backgrounds[index % THEME_COUNT]
    }

    /// Accent color for a theme index (wraps).
    pub fn accent(&self, index: usize) -> Rgb {
        self.accents[index % THEME_COUNT]
    }
}

impl Default for ThemePalette {
    fn default() -> Self {
        Self::INDUSTRIAL
    }
}

/// Events published to theme listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeEvent {
    /// The theme index advanced. `color` is the new object color as a
    /// `#RRGGBB` string, which is what UI chrome consumes.
    ColorChanged { index: usize, color: String },
    /// The first interaction of the session happened; sound may start.
    SoundEnabled,
}

/// Read-only view of the theme, for consumers that only need the current
/// selection.
pub trait ThemeSource {
    /// Current theme index, always `< palette().len()`.
    fn theme_index(&self) -> usize;

    /// Palettes the index selects from.
    fn palette(&self) -> &ThemePalette;

    /// Current object color.
    fn object_color(&self) -> Rgb {
        self.palette().object(self.theme_index())
    }

    /// Current background color.
    fn background_color(&self) -> Rgb {
        self.palette().background(self.theme_index())
    }

    /// Current accent color.
    fn accent_color(&self) -> Rgb {
        self.palette().accent(self.theme_index())
    }
}

/// Theme state with a last-value cache and a subscriber list.
#[derive(Debug)]
pub struct ThemeBroadcast {
    palette: ThemePalette,
    index: AtomicUsize,
    sound_enabled: AtomicBool,
    subscribers: Mutex<Vec<Sender<ThemeEvent>>>,
}

static GLOBAL_THEME: OnceLock<Arc<ThemeBroadcast>> = OnceLock::new();

impl ThemeBroadcast {
    /// Create a theme starting at index 0.
    pub fn new(palette: ThemePalette) -> Self {
        Self {
            palette,
            index: AtomicUsize::new(0),
            sound_enabled: AtomicBool::new(false),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// The process-wide theme. Created at index 0 on first use and kept for
    /// the life of the process.
    pub fn global() -> Arc<ThemeBroadcast> {
        GLOBAL_THEME
            .get_or_init(|| Arc::new(ThemeBroadcast::new(ThemePalette::default())))
            .clone()
    }

    /// Register a listener. Every event published after this call is
    /// delivered; read [`Self::current_color`] first for the value so far.
    pub fn subscribe(&self) -> Receiver<ThemeEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Current object color as a `#RRGGBB` string.
    pub fn current_color(&self) -> String {
        self.object_color().to_string()
    }

    /// Whether the first interaction already enabled sound.
    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled.load(Ordering::Acquire)
    }

    /// Advance to the next theme (wrapping) and publish it. Returns the new
    /// index.
    pub(crate) fn advance(&self) -> usize {
        let len = self.palette.len();
        let previous = self
            .index
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |i| Some((i + 1) % len))
            .unwrap_or_else(|i| i);
        let next = (previous + 1) % len;

        self.publish(ThemeEvent::ColorChanged {
            index: next,
            color: self.palette.object(next).to_string(),
        });
        next
    }

    /// Return to theme 0 for a new scene. Subscribers stay registered and
    /// hear a `ColorChanged` only if the index actually moved. The sound flag
    /// is left alone.
    pub(crate) fn reset(&self) {
        if self.index.swap(0, Ordering::AcqRel) != 0 {
            self.publish(ThemeEvent::ColorChanged {
                index: 0,
                color: self.palette.object(0).to_string(),
            });
        }
    }

    /// Flip the sound flag on. Publishes [`ThemeEvent::SoundEnabled`] and
    /// returns `true` only the first time.
    pub(crate) fn enable_sound(&self) -> bool {
        let newly_enabled = !self.sound_enabled.swap(true, Ordering::AcqRel);
        if newly_enabled {
            self.publish(ThemeEvent::SoundEnabled);
        }
        newly_enabled
    }

    fn publish(&self, event: ThemeEvent) {
        // Dropped receivers are pruned here.
        self.subscribers
            .lock()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl Default for ThemeBroadcast {
    fn default() -> Self {
        Self::new(ThemePalette::default())
    }
}

impl ThemeSource for ThemeBroadcast {
    fn theme_index(&self) -> usize {
        self.index.load(Ordering::Acquire)
    }

    fn palette(&self) -> &ThemePalette {
        &self.palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        let theme = ThemeBroadcast::default();
        assert_eq!(theme.theme_index(), 0);
        assert_eq!(theme.current_color(), "#1F3FBF");
        assert_eq!(theme.background_color(), Rgb::hex(0x0D1120));
        assert!(!theme.sound_enabled());
    }

    #[test]
    fn test_advance_wraps() {
        let theme = ThemeBroadcast::default();
        for expected in [1, 2, 3, 4, 0, 1] {
            assert_eq!(theme.advance(), expected);
            assert_eq!(theme.theme_index(), expected);
        }
    }

    #[test]
    fn test_subscribers_receive_color_changes() {
        let theme = ThemeBroadcast::default();
        let rx = theme.subscribe();

        theme.advance();

        assert_eq!(
            rx.try_recv(),
            Ok(ThemeEvent::ColorChanged {
                index: 1,
                color: "#8FBF00".to_string()
            })
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_late_joiner_reads_last_value() {
        let theme = ThemeBroadcast::default();
        theme.advance();
        theme.advance();

        let rx = theme.subscribe();
        assert_eq!(theme.current_color(), "#C4161C");
        // Nothing replayed, only the cache
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let theme = ThemeBroadcast::default();
        let keep = theme.subscribe();
        drop(theme.subscribe());
        assert_eq!(theme.subscriber_count(), 2);

        theme.advance();
        assert_eq!(theme.subscriber_count(), 1);
        assert!(keep.try_recv().is_ok());
    }

    #[test]
    fn test_sound_enabled_once() {
        let theme = ThemeBroadcast::default();
        let rx = theme.subscribe();

        assert!(theme.enable_sound());
        assert!(!theme.enable_sound());
        assert!(theme.sound_enabled());

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events, vec![ThemeEvent::SoundEnabled]);
    }

    #[test]
    fn test_reset_returns_to_zero_and_keeps_subscribers() {
        let theme = ThemeBroadcast::default();
        let rx = theme.subscribe();
        theme.enable_sound();
        theme.advance();
        theme.advance();
        let _: Vec<_> = rx.try_iter().collect();

        theme.reset();
        assert_eq!(theme.theme_index(), 0);
        assert!(theme.sound_enabled());
        assert_eq!(theme.subscriber_count(), 1);
        assert_eq!(
            rx.try_recv(),
            Ok(ThemeEvent::ColorChanged {
                index: 0,
                color: "#1F3FBF".to_string()
            })
        );

        // Already at zero: nothing published
        theme.reset();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_palettes_are_parallel() {
        let palette = ThemePalette::INDUSTRIAL;
        assert_eq!(palette.objects.len(), palette.backgrounds.len());
        assert_eq!(palette.objects.len(), palette.accents.len());
        assert_eq!(palette.accent(5), palette.accent(0));
    }

    #[test]
    fn test_global_is_shared() {
        let a = ThemeBroadcast::global();
        let b = ThemeBroadcast::global();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
