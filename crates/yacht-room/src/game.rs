//! The game-room state machine: one match of Yacht Dice.
//!
//! [`GameRoom`] owns every piece of mutable match state — dice, turn
//! ownership, score boards, phase — and is driven exclusively through
//! [`GameRoom::handle_action`]. An accepted action mutates state and
//! yields exactly one broadcast; a rejected action yields `None` and
//! leaves the state untouched. There is no error channel: silence is
//! the rejection signal.
//!
//! The room actor in [`crate::room`] serializes access, so this type can
//! stay synchronous and lock-free.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use yacht_protocol::{
    Action, GameData, PlayerId, RoomId, RoomSnapshot, ScoreBoard, StateKind, StateMessage,
};

use crate::dice::DiceSet;
use crate::roster::Roster;
use crate::scoring::{self, Category};
use crate::standings;

/// One match's worth of game state, driven by player actions.
pub struct GameRoom {
    room_id: RoomId,
    dice: DiceSet,
    /// Owner of the current turn; `None` before the first game starts.
    current_turn: Option<PlayerId>,
    /// Turn sequence, snapshotted from the roster at game start. Roster
    /// churn during a match never alters it.
    player_order: Vec<PlayerId>,
    score_boards: HashMap<PlayerId, ScoreBoard>,
    in_progress: bool,
    rng: Box<dyn RngCore + Send>,
}

impl GameRoom {
    /// Creates a room with an OS-seeded dice RNG.
    pub fn new(room_id: RoomId) -> Self {
        Self::with_rng(room_id, Box::new(StdRng::from_os_rng()))
    }

    /// Creates a room rolling dice from the given RNG. Inject a seeded
    /// RNG for deterministic rolls.
    pub fn with_rng(room_id: RoomId, rng: Box<dyn RngCore + Send>) -> Self {
        Self {
            room_id,
            dice: DiceSet::new(),
            current_turn: None,
            player_order: Vec::new(),
            score_boards: HashMap::new(),
            in_progress: false,
            rng,
        }
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    pub fn current_turn(&self) -> Option<&PlayerId> {
        self.current_turn.as_ref()
    }

    pub fn score_board(&self, player: &PlayerId) -> Option<&ScoreBoard> {
        self.score_boards.get(player)
    }

    // -----------------------------------------------------------------
    // Action dispatch
    // -----------------------------------------------------------------

    /// Dispatches one player action.
    ///
    /// Returns the broadcast the action produced, or `None` if it was
    /// rejected: `START` while a game runs, any in-turn action outside a
    /// running game or from a player who does not own the current turn,
    /// a roll with no rolls left, an out-of-range index, or a submission
    /// into a filled slot.
    pub fn handle_action(
        &mut self,
        roster: &Roster,
        sender: &PlayerId,
        action: &Action,
    ) -> Option<StateMessage> {
        match action {
            Action::Start => {
                if self.in_progress {
                    return None;
                }
                self.start_game(roster)?;
                Some(self.state_message(
                    roster,
                    StateKind::GameStart,
                    Some("Yacht game started!".to_owned()),
                    None,
                ))
            }
            Action::Roll => {
                self.check_turn(sender)?;
                if !self.dice.roll(&mut *self.rng) {
                    return None;
                }
                Some(self.state_message(roster, StateKind::Update, None, None))
            }
            Action::ToggleKeep { index } => {
                self.check_turn(sender)?;
                if !self.dice.toggle_keep(*index) {
                    return None;
                }
                Some(self.state_message(roster, StateKind::Update, None, None))
            }
            Action::Submit { category_idx } => {
                self.check_turn(sender)?;
                self.submit(roster, sender, *category_idx)
            }
        }
    }

    /// Gate for in-turn actions: a game must be running and `sender` must
    /// own the current turn.
    fn check_turn(&self, sender: &PlayerId) -> Option<()> {
        (self.in_progress && self.current_turn.as_ref() == Some(sender)).then_some(())
    }

    // -----------------------------------------------------------------
    // Turn controller
    // -----------------------------------------------------------------

    /// Resets boards and turn state for a fresh match.
    ///
    /// `None` when the roster is empty. Accepted again after a finished
    /// game — a rematch simply re-snapshots the roster.
    fn start_game(&mut self, roster: &Roster) -> Option<()> {
        if roster.is_empty() {
            return None;
        }

        self.player_order = roster.ids().cloned().collect();
        self.score_boards = self
            .player_order
            .iter()
            .map(|id| (id.clone(), ScoreBoard::new()))
            .collect();
        self.current_turn = Some(self.player_order[0].clone());
        self.in_progress = true;
        self.dice.reset_for_new_turn();

        tracing::info!(
            room_id = %self.room_id,
            players = self.player_order.len(),
            "game started"
        );
        Some(())
    }

    /// Hands the turn to the next player in the fixed order, wrapping
    /// past the end, and resets the dice for their turn.
    fn next_turn(&mut self) {
        if let Some(current) = &self.current_turn {
            let index = self
                .player_order
                .iter()
                .position(|p| p == current)
                .unwrap_or(0);
            let next = (index + 1) % self.player_order.len();
            self.current_turn = Some(self.player_order[next].clone());
        }
        self.dice.reset_for_new_turn();
    }

    // -----------------------------------------------------------------
    // Submission and game end
    // -----------------------------------------------------------------

    fn submit(
        &mut self,
        roster: &Roster,
        sender: &PlayerId,
        category_idx: usize,
    ) -> Option<StateMessage> {
        let category = Category::from_index(category_idx)?;
        let value = scoring::score(self.dice.faces(), category);

        let board = self.score_boards.get_mut(sender)?;
        if !board.fill(category_idx, value) {
            return None;
        }
        tracing::debug!(
            room_id = %self.room_id,
            player = %sender,
            category = category_idx,
            value,
            "score committed"
        );

        if standings::is_game_over(&self.score_boards) {
            return Some(self.finish_game(roster));
        }

        self.next_turn();
        Some(self.state_message(
            roster,
            StateKind::Update,
            Some("Turn changed.".to_owned()),
            None,
        ))
    }

    /// Ends the match and builds the terminal broadcast.
    fn finish_game(&mut self, roster: &Roster) -> StateMessage {
        self.in_progress = false;

        let standings = standings::resolve(&self.player_order, &self.score_boards);
        let winning_total = standings
            .winner
            .as_ref()
            .and_then(|id| {
                standings
                    .totals
                    .iter()
                    .find(|(player, _)| player == id)
                    .map(|(_, total)| *total)
            })
            .unwrap_or(0);
        let winner_name = standings
            .winner
            .as_ref()
            .and_then(|id| roster.nickname(id))
            .unwrap_or("Unknown")
            .to_owned();

        tracing::info!(
            room_id = %self.room_id,
            winner = %winner_name,
            total = winning_total,
            "game over"
        );

        let content = format!("Game over! Winner: {winner_name} ({winning_total} pts)");
        self.state_message(
            roster,
            StateKind::GameOver,
            Some(content),
            Some(winner_name),
        )
    }

    // -----------------------------------------------------------------
    // Presentation
    // -----------------------------------------------------------------

    /// The on-demand snapshot: broadcast payload plus the phase flag.
    /// Read-only; safe to call between actions.
    pub fn snapshot(&self, roster: &Roster) -> RoomSnapshot {
        RoomSnapshot {
            in_progress: self.in_progress,
            data: self.game_data(roster),
        }
    }

    fn game_data(&self, roster: &Roster) -> GameData {
        GameData {
            dice_faces: self.dice.faces(),
            keep_flags: self.dice.kept(),
            rolls_remaining: self.dice.rolls_remaining(),
            current_turn_player_id: self.current_turn.clone().unwrap_or_default(),
            score_boards: self.score_boards.clone(),
            player_names: roster.names(),
        }
    }

    fn state_message(
        &self,
        roster: &Roster,
        kind: StateKind,
        content: Option<String>,
        winner_name: Option<String>,
    ) -> StateMessage {
        StateMessage {
            message_type: kind,
            room_id: self.room_id,
            content,
            winner_name,
            data: self.game_data(roster),
        }
    }
}
