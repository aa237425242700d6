//! The standings resolver: totals, the upper bonus, and the winner.

use std::collections::HashMap;

use yacht_protocol::{PlayerId, ScoreBoard, UNFILLED};

/// Bonus awarded when the Ones..Sixes subtotal reaches the threshold.
pub const UPPER_BONUS: i32 = 35;

/// Upper-section subtotal required for the bonus.
pub const UPPER_BONUS_THRESHOLD: i32 = 63;

/// Final result of a finished match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standings {
    /// Per-player totals, in turn order.
    pub totals: Vec<(PlayerId, i32)>,
    /// Highest total; ties go to the earliest player in turn order.
    pub winner: Option<PlayerId>,
}

/// True once every player's board is completely filled.
pub fn is_game_over(boards: &HashMap<PlayerId, ScoreBoard>) -> bool {
    !boards.is_empty() && boards.values().all(ScoreBoard::is_complete)
}

/// Total for one board. Unfilled slots count as zero, and the upper bonus
/// applies when the Ones..Sixes subtotal reaches [`UPPER_BONUS_THRESHOLD`].
pub fn board_total(board: &ScoreBoard) -> i32 {
    let mut total = 0;
    let mut upper = 0;
    for (index, slot) in board.slots().iter().enumerate() {
        let value = if *slot == UNFILLED { 0 } else { *slot };
        total += value;
        if index < 6 {
            upper += value;
        }
    }
    if upper >= UPPER_BONUS_THRESHOLD {
        total += UPPER_BONUS;
    }
    total
}

/// Resolves final standings over the fixed turn order.
///
/// Players are scanned in turn order and a later player must score
/// strictly higher to take the lead, so a tie resolves to the earliest
/// player in the order.
pub fn resolve(order: &[PlayerId], boards: &HashMap<PlayerId, ScoreBoard>) -> Standings {
    let mut totals = Vec::with_capacity(order.len());
    let mut leader: Option<(PlayerId, i32)> = None;

    for id in order {
        let Some(board) = boards.get(id) else {
            continue;
        };
        let total = board_total(board);
        totals.push((id.clone(), total));
        if leader.as_ref().is_none_or(|(_, best)| total > *best) {
            leader = Some((id.clone(), total));
        }
    }

    Standings {
        totals,
        winner: leader.map(|(id, _)| id),
    }
}
