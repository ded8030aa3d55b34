//! Session bookkeeping shown in the header: elapsed time for the current
//! game, games played, high score, and wins (games that filled the grid).

use std::time::{Duration, Instant};

pub struct SessionMetrics {
    start_time: Instant,
    elapsed: Duration,
    games_played: u32,
    high_score: u32,
    wins: u32,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed: Duration::ZERO,
            games_played: 0,
            high_score: 0,
            wins: 0,
        }
    }

    /// Refresh the elapsed-time reading
    pub fn update(&mut self) {
        self.elapsed = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
    }

    /// A game that ended by exhausting the grid
    pub fn on_win(&mut self, final_score: u32) {
        self.on_game_over(final_score);
        self.wins += 1;
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{minutes:02}:{seconds:02}")
    }

    #[cfg(test)]
    fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}
