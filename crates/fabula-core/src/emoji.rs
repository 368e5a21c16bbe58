//! Emoji selection.
//!
//! Drawing is a pure function of the pool, the already-shown set, and the
//! requested count; [`EmojiDeck`] is a thin stateful wrapper that tracks the
//! shown set across draws for one running session.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::session::{MAX_EMOJIS, MIN_EMOJIS};

static ALL_EMOJIS: Lazy<Vec<String>> =
    Lazy::new(|| emojis::iter().map(|e| e.as_str().to_string()).collect());

/// The built-in pool: every emoji the `emojis` crate knows about.
pub fn builtin_pool() -> &'static [String] {
    &ALL_EMOJIS
}

/// The outcome of one draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Draw {
    /// Selected emojis, in display order.
    pub emojis: Vec<String>,
    /// True if the already-shown set was exhausted and sampling restarted
    /// from the full pool.
    pub reset: bool,
}

/// Draws `count` distinct emojis from `pool`, avoiding `already_shown`.
///
/// `count` is clamped to `[MIN_EMOJIS, MAX_EMOJIS]`. When fewer than `count`
/// unshown emojis remain, the shown set is treated as exhausted and the draw
/// samples from the full pool again, reported via [`Draw::reset`].
pub fn draw_unique<R: Rng + ?Sized>(
    pool: &[String],
    already_shown: &HashSet<String>,
    count: usize,
    rng: &mut R,
) -> Draw {
    let count = count.clamp(MIN_EMOJIS, MAX_EMOJIS).min(pool.len());

    let available: Vec<&String> = pool.iter().filter(|e| !already_shown.contains(*e)).collect();

    let (candidates, reset) = if available.len() < count {
        (pool.iter().collect::<Vec<_>>(), true)
    } else {
        (available, false)
    };

    let emojis = candidates
        .choose_multiple(rng, count)
        .map(|e| (*e).clone())
        .collect();

    Draw { emojis, reset }
}

/// Tracks which emojis have been shown so repeated draws stay fresh until
/// the pool runs out.
pub struct EmojiDeck {
    pool: Vec<String>,
    shown: HashSet<String>,
}

impl EmojiDeck {
    /// Creates a deck over the built-in pool.
    pub fn new() -> Self {
        Self::with_pool(builtin_pool().to_vec())
    }

    /// Creates a deck over a caller-supplied pool.
    pub fn with_pool(pool: Vec<String>) -> Self {
        Self {
            pool,
            shown: HashSet::new(),
        }
    }

    /// Draws `count` emojis and records them as shown. Clears the shown set
    /// first whenever the draw had to restart from the full pool.
    pub fn draw(&mut self, count: usize) -> Draw {
        let draw = draw_unique(&self.pool, &self.shown, count, &mut rand::thread_rng());
        if draw.reset {
            self.shown.clear();
        }
        self.shown.extend(draw.emojis.iter().cloned());
        draw
    }

    /// Forgets everything that has been shown.
    pub fn reset(&mut self) {
        self.shown.clear();
    }

    /// Number of emojis shown since the last reset.
    pub fn shown_count(&self) -> usize {
        self.shown.len()
    }
}

impl Default for EmojiDeck {
    fn default() -> Self {
        Self::new()
    }
}
