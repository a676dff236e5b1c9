use serde::{Deserialize, Serialize};

use crate::board::{is_knight_move, legal_moves, Square, Visited, TOTAL_SQUARES};
use crate::stats::{Stats, StatsStore};

/// Every game starts from the a1 corner.
pub const START_SQUARE: Square = Square { row: 0, col: 0 };

/// One attempt at a tour: the knight, the squares it has covered, and how
/// many moves it took. Ends when all 25 squares are visited.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct GameSession {
    pub knight: Square,
    pub visited: Visited,
    pub move_count: u32,
    pub won: bool,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        let mut visited = Visited::new();
        // The start square counts as visited without costing a move.
        visited.mark(START_SQUARE);
        GameSession {
            knight: START_SQUARE,
            visited,
            move_count: 0,
            won: false,
        }
    }

    pub fn legal_moves(&self) -> Vec<Square> {
        legal_moves(self.knight, &self.visited)
    }

    /// Try to move the knight to `target`. Accepted only while the game is
    /// unfinished, for knight-shaped moves onto unvisited squares; anything
    /// else leaves the session untouched and returns false.
    pub fn attempt_move(&mut self, target: Square) -> bool {
        if self.won {
            return false;
        }
        if !is_knight_move(self.knight, target) || self.visited.contains(target) {
            return false;
        }

        self.knight = target;
        self.move_count += 1;
        self.visited.mark(target);

        if self.visited.count() == TOTAL_SQUARES {
            self.won = true;
        }
        true
    }
}

/// What a click did to the session.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClickOutcome {
    /// Guard failed; nothing changed.
    Rejected,
    /// Move accepted, tour still in progress.
    Moved,
    /// Move accepted and it completed the tour. The caller starts the
    /// celebration on this transition.
    Won,
}

/// The session controller: owns the current session and the stats store,
/// and turns the two UI events (click, reset) into state transitions.
pub struct Game {
    session: GameSession,
    stats: StatsStore,
}

impl Game {
    /// Start the first session. Counts as a played game, as does every
    /// later reset.
    pub fn new(mut stats: StatsStore) -> Self {
        stats.record_new_game();
        Game {
            session: GameSession::new(),
            stats,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn stats(&self) -> &Stats {
        self.stats.stats()
    }

    pub fn legal_moves(&self) -> Vec<Square> {
        self.session.legal_moves()
    }

    pub fn click(&mut self, target: Square) -> ClickOutcome {
        if !self.session.attempt_move(target) {
            return ClickOutcome::Rejected;
        }

        self.stats.record_visited_count(self.session.visited.count());

        if self.session.won {
            self.stats.record_win(self.session.move_count);
            ClickOutcome::Won
        } else {
            ClickOutcome::Moved
        }
    }

    /// Discard the current session and start fresh. Valid from any state.
    pub fn reset(&mut self) {
        self.session = GameSession::new();
        self.stats.record_new_game();
    }
}
