//! The scoring engine: a pure mapping from dice faces to category points.
//!
//! Scores depend only on the multiset of faces — never on turn state —
//! and undetermined faces (0) are simply absent from the counts, so a
//! submission before any roll scores zero everywhere.

use yacht_protocol::{CATEGORY_COUNT, DICE_COUNT};

/// Fixed score for a completed straight, small or large.
pub const STRAIGHT_SCORE: i32 = 30;

/// Score for five of a kind.
pub const YACHT_SCORE: i32 = 50;

/// The twelve scoring categories, in score-board slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Ones,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    Choice,
    FourOfAKind,
    FullHouse,
    SmallStraight,
    LargeStraight,
    Yacht,
}

impl Category {
    /// Every category, indexed by score-board slot.
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Ones,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
        Category::Choice,
        Category::FourOfAKind,
        Category::FullHouse,
        Category::SmallStraight,
        Category::LargeStraight,
        Category::Yacht,
    ];

    /// Maps a score-board slot index to its category.
    pub fn from_index(index: usize) -> Option<Category> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Scores one category for the given faces.
///
/// The straights each test a single fixed window — 1-5 for small, 2-6 for
/// large — and a five-of-a-kind satisfies the full-house triple and pair
/// at once. Both are deliberate rule choices, not general runs.
pub fn score(faces: [u8; DICE_COUNT], category: Category) -> i32 {
    let mut counts = [0u8; 7];
    let mut sum: i32 = 0;
    for face in faces {
        if (1..=6).contains(&face) {
            counts[face as usize] += 1;
            sum += i32::from(face);
        }
    }

    match category {
        Category::Ones
        | Category::Twos
        | Category::Threes
        | Category::Fours
        | Category::Fives
        | Category::Sixes => {
            let face = category.index() + 1;
            i32::from(counts[face]) * face as i32
        }
        Category::Choice => sum,
        Category::FourOfAKind => {
            if counts[1..].iter().any(|&c| c >= 4) {
                sum
            } else {
                0
            }
        }
        Category::FullHouse => {
            let triple = counts[1..].iter().any(|&c| c == 3 || c == 5);
            let pair = counts[1..].iter().any(|&c| c == 2 || c == 5);
            if triple && pair { sum } else { 0 }
        }
        Category::SmallStraight => {
            if (1..=5).all(|f| counts[f] >= 1) {
                STRAIGHT_SCORE
            } else {
                0
            }
        }
        Category::LargeStraight => {
            if (2..=6).all(|f| counts[f] >= 1) {
                STRAIGHT_SCORE
            } else {
                0
            }
        }
        Category::Yacht => {
            if counts[1..].iter().any(|&c| c == 5) {
                YACHT_SCORE
            } else {
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_index_round_trip() {
        for (i, cat) in Category::ALL.iter().enumerate() {
            assert_eq!(cat.index(), i);
            assert_eq!(Category::from_index(i), Some(*cat));
        }
        assert_eq!(Category::from_index(CATEGORY_COUNT), None);
    }

    #[test]
    fn test_upper_categories_count_matching_faces() {
        let faces = [3, 3, 3, 5, 5];
        assert_eq!(score(faces, Category::Threes), 9);
        assert_eq!(score(faces, Category::Fives), 10);
        assert_eq!(score(faces, Category::Ones), 0);
    }

    #[test]
    fn test_score_ignores_dice_order() {
        let a = [1, 3, 3, 5, 3];
        let b = [3, 3, 3, 1, 5];
        for cat in Category::ALL {
            assert_eq!(score(a, cat), score(b, cat), "{cat:?}");
        }
    }

    #[test]
    fn test_choice_sums_all_faces() {
        assert_eq!(score([2, 2, 2, 5, 5], Category::Choice), 16);
        assert_eq!(score([6, 6, 6, 6, 6], Category::Choice), 30);
    }

    #[test]
    fn test_four_of_a_kind() {
        assert_eq!(score([4, 4, 4, 4, 2], Category::FourOfAKind), 18);
        assert_eq!(score([4, 4, 4, 4, 4], Category::FourOfAKind), 20);
        assert_eq!(score([4, 4, 4, 2, 2], Category::FourOfAKind), 0);
    }

    #[test]
    fn test_full_house() {
        assert_eq!(score([2, 2, 2, 5, 5], Category::FullHouse), 16);
        assert_eq!(score([1, 1, 2, 2, 3], Category::FullHouse), 0);
        assert_eq!(score([3, 3, 3, 3, 2], Category::FullHouse), 0);
    }

    #[test]
    fn test_five_of_a_kind_counts_as_full_house() {
        assert_eq!(score([4, 4, 4, 4, 4], Category::FullHouse), 20);
    }

    #[test]
    fn test_small_straight_tests_only_the_one_to_five_window() {
        assert_eq!(score([1, 2, 3, 4, 5], Category::SmallStraight), 30);
        assert_eq!(score([5, 4, 3, 2, 1], Category::SmallStraight), 30);
        assert_eq!(score([2, 3, 4, 5, 6], Category::SmallStraight), 0);
    }

    #[test]
    fn test_large_straight_tests_only_the_two_to_six_window() {
        assert_eq!(score([2, 3, 4, 5, 6], Category::LargeStraight), 30);
        assert_eq!(score([1, 2, 3, 4, 5], Category::LargeStraight), 0);
    }

    #[test]
    fn test_yacht() {
        assert_eq!(score([6, 6, 6, 6, 6], Category::Yacht), 50);
        assert_eq!(score([6, 6, 6, 6, 5], Category::Yacht), 0);
    }

    #[test]
    fn test_undetermined_faces_are_absent() {
        // Two unrolled dice: only the three threes count.
        let faces = [0, 0, 3, 3, 3];
        assert_eq!(score(faces, Category::Threes), 9);
        assert_eq!(score(faces, Category::Choice), 9);
        assert_eq!(score(faces, Category::FourOfAKind), 0);
        assert_eq!(score(faces, Category::Yacht), 0);
    }

    #[test]
    fn test_all_undetermined_scores_zero_everywhere() {
        for cat in Category::ALL {
            assert_eq!(score([0; DICE_COUNT], cat), 0, "{cat:?}");
        }
    }
}
