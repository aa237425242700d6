//! The dice engine: five faces, five keep flags, a roll budget.

use rand::Rng;

use yacht_protocol::DICE_COUNT;

/// Rolls a player gets per turn.
pub const ROLLS_PER_TURN: u8 = 3;

/// Face value of a die that has not been rolled this turn. The scoring
/// engine treats it as absent.
pub const UNDETERMINED: u8 = 0;

/// The five dice of the current turn.
///
/// A new turn always starts with every face undetermined, so at least one
/// roll is needed before a submission can score anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceSet {
    faces: [u8; DICE_COUNT],
    kept: [bool; DICE_COUNT],
    rolls_remaining: u8,
}

impl DiceSet {
    pub fn new() -> Self {
        Self {
            faces: [UNDETERMINED; DICE_COUNT],
            kept: [false; DICE_COUNT],
            rolls_remaining: ROLLS_PER_TURN,
        }
    }

    /// Restores the turn-start state: full roll budget, nothing kept,
    /// every face undetermined.
    pub fn reset_for_new_turn(&mut self) {
        self.faces = [UNDETERMINED; DICE_COUNT];
        self.kept = [false; DICE_COUNT];
        self.rolls_remaining = ROLLS_PER_TURN;
    }

    /// Re-rolls every non-kept die and spends one roll.
    ///
    /// Returns `false` (state untouched) when the roll budget is spent.
    pub fn roll<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.rolls_remaining == 0 {
            return false;
        }
        for i in 0..DICE_COUNT {
            if !self.kept[i] {
                self.faces[i] = rng.random_range(1..=6);
            }
        }
        self.rolls_remaining -= 1;
        true
    }

    /// Flips the keep flag at `index`. Returns `false` when out of range.
    ///
    /// Toggling is allowed even before the first roll of a turn; it is
    /// merely pointless while the faces are undetermined.
    pub fn toggle_keep(&mut self, index: usize) -> bool {
        match self.kept.get_mut(index) {
            Some(flag) => {
                *flag = !*flag;
                true
            }
            None => false,
        }
    }

    pub fn faces(&self) -> [u8; DICE_COUNT] {
        self.faces
    }

    pub fn kept(&self) -> [bool; DICE_COUNT] {
        self.kept
    }

    pub fn rolls_remaining(&self) -> u8 {
        self.rolls_remaining
    }
}

impl Default for DiceSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn test_new_turn_starts_undetermined() {
        let dice = DiceSet::new();
        assert_eq!(dice.faces(), [UNDETERMINED; DICE_COUNT]);
        assert_eq!(dice.kept(), [false; DICE_COUNT]);
        assert_eq!(dice.rolls_remaining(), ROLLS_PER_TURN);
    }

    #[test]
    fn test_roll_assigns_valid_faces_and_spends_budget() {
        let mut dice = DiceSet::new();
        let mut rng = rng();

        assert!(dice.roll(&mut rng));
        assert!(dice.faces().iter().all(|f| (1..=6).contains(f)));
        assert_eq!(dice.rolls_remaining(), 2);
    }

    #[test]
    fn test_fourth_roll_is_rejected_without_mutation() {
        let mut dice = DiceSet::new();
        let mut rng = rng();

        assert!(dice.roll(&mut rng));
        assert!(dice.roll(&mut rng));
        assert!(dice.roll(&mut rng));
        assert_eq!(dice.rolls_remaining(), 0);

        let faces = dice.faces();
        assert!(!dice.roll(&mut rng));
        assert_eq!(dice.faces(), faces, "rejected roll must not touch faces");
        assert_eq!(dice.rolls_remaining(), 0);
    }

    #[test]
    fn test_kept_dice_survive_a_roll() {
        let mut dice = DiceSet::new();
        let mut rng = rng();

        dice.roll(&mut rng);
        assert!(dice.toggle_keep(1));
        assert!(dice.toggle_keep(3));
        let before = dice.faces();

        // Re-roll many times: kept faces must never move.
        dice.roll(&mut rng);
        dice.roll(&mut rng);
        let after = dice.faces();
        assert_eq!(after[1], before[1]);
        assert_eq!(after[3], before[3]);
    }

    #[test]
    fn test_toggle_keep_flips_and_bounds_checks() {
        let mut dice = DiceSet::new();
        assert!(dice.toggle_keep(0));
        assert!(dice.kept()[0]);
        assert!(dice.toggle_keep(0));
        assert!(!dice.kept()[0]);
        assert!(!dice.toggle_keep(DICE_COUNT));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut dice = DiceSet::new();
        let mut rng = rng();
        dice.roll(&mut rng);
        dice.toggle_keep(2);

        dice.reset_for_new_turn();
        assert_eq!(dice.faces(), [UNDETERMINED; DICE_COUNT]);
        assert_eq!(dice.kept(), [false; DICE_COUNT]);
        assert_eq!(dice.rolls_remaining(), ROLLS_PER_TURN);
    }
}
