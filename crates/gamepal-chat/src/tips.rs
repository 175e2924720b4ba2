//! Quick tips shown to new users.

use rand::seq::IndexedRandom;
use rand::Rng;

pub const TIPS: &[&str] = &[
    "💡 Tip: Be specific about your game and situation for better advice!",
    "🎯 Tip: Ask about strategies, mechanics, builds, or troubleshooting!",
    "⚡ Tip: Switch your current game with /game for tailored responses!",
    "🔥 Tip: You can ask follow-up questions for deeper insights!",
];

/// One tip picked at random.
pub fn random_tip() -> &'static str {
    random_tip_with(&mut rand::rng())
}

pub fn random_tip_with<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    TIPS.choose(rng).copied().unwrap_or(TIPS[0])
}
