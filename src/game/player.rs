//! Player identity and spell charge pools.

use crate::game::Spell;

/// Seat of a player: 0 owns the low half, 1 the high half.
pub type PlayerId = u8;

/// Number of players in a game.
pub const PLAYER_COUNT: usize = 2;

/// The other player.
#[must_use]
pub const fn opponent(player: PlayerId) -> PlayerId {
    1 - (player & 1)
}

/// Per-player spell charges, one counter per spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourcePool {
    /// Charges indexed by [`Spell::index`].
    charges: [u8; Spell::COUNT],
}

impl ResourcePool {
    /// A pool with every counter at its cap.
    #[must_use]
    pub fn full() -> Self {
        Self {
            charges: Spell::ALL.map(Spell::cap),
        }
    }

    /// Build a pool from raw counters without clamping.
    #[must_use]
    pub const fn from_charges(charges: [u8; Spell::COUNT]) -> Self {
        Self { charges }
    }

    /// Raw counters in spell order.
    #[must_use]
    pub const fn charges(&self) -> [u8; Spell::COUNT] {
        self.charges
    }

    /// Current charge for a spell.
    #[must_use]
    pub const fn charge(&self, spell: Spell) -> u8 {
        self.charges[spell.index()]
    }

    /// Add `amount` to every counter, clamping each at its spell's cap.
    pub fn top_up(&mut self, amount: u32) {
        for spell in Spell::ALL {
            let slot = &mut self.charges[spell.index()];
            let raised = u32::from(*slot).saturating_add(amount).min(u32::from(spell.cap()));
            *slot = u8::try_from(raised).unwrap_or(spell.cap());
        }
    }

    /// Zero the counter of a spell, returning what it held.
    pub fn spend(&mut self, spell: Spell) -> u8 {
        std::mem::take(&mut self.charges[spell.index()])
    }

    /// Check that no counter exceeds its cap.
    #[must_use]
    pub fn within_caps(&self) -> bool {
        Spell::ALL.iter().all(|&spell| self.charge(spell) <= spell.cap())
    }
}
