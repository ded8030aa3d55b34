use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::interval;

use crate::game::{GameConfig, GameEngine, Outcome};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionMetrics;
use crate::render::Renderer;

/// Render frame rate. Simulation steps are timed independently by the
/// engine's own accumulator, so a slow frame drains several steps at once.
const FRAMES_PER_SECOND: u64 = 60;

const TITLE: &str = "Snake";

pub struct App {
    engine: GameEngine,
    metrics: SessionMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    last_outcome: Outcome,
    titled_score: Option<u32>,
}

impl App {
    pub fn new(config: GameConfig) -> Self {
        let engine = GameEngine::new(config);

        Self {
            last_outcome: engine.outcome(),
            engine,
            metrics: SessionMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            titled_score: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut frame_timer = interval(Duration::from_millis(1000 / FRAMES_PER_SECOND));
        let mut last_frame = Instant::now();

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Advance the simulation by the elapsed wall-clock time,
                // then render exactly once with the leftover fraction
                _ = frame_timer.tick() => {
                    let now = Instant::now();
                    let delta = now - last_frame;
                    last_frame = now;

                    self.advance(delta);
                    self.update_title(terminal)?;
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.engine, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn advance(&mut self, delta: Duration) {
        if self.engine.is_running() {
            self.metrics.update();
        }
        self.engine.update(delta);

        let outcome = self.engine.outcome();
        if outcome != self.last_outcome {
            match outcome {
                Outcome::GameOver => self.metrics.on_game_over(self.engine.body_length()),
                Outcome::Won => self.metrics.on_win(self.engine.body_length()),
                Outcome::Running => {}
            }
            self.last_outcome = outcome;
        }
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Steer(direction) => self.engine.set_input_direction(direction),
                KeyAction::Restart => self.restart(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    fn restart(&mut self) {
        self.engine.reset();
        self.last_outcome = self.engine.outcome();
        self.metrics.on_game_start();
    }

    /// Mirror the score into the terminal title bar when it changes
    fn update_title(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let score = self.engine.body_length();
        if self.titled_score != Some(score) {
            execute!(
                terminal.backend_mut(),
                SetTitle(format!("{TITLE}   Score: {score}"))
            )
            .context("Failed to set terminal title")?;
            self.titled_score = Some(score);
        }
        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_initialization() {
        let app = App::new(GameConfig::small());
        assert!(app.engine.is_running());
        assert_eq!(app.engine.body_length(), 1);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_restart_starts_a_fresh_game() {
        let mut app = App::new(GameConfig::small());
        app.engine.update(Duration::from_millis(350));

        app.restart();
        assert!(app.engine.is_running());
        assert_eq!(app.engine.body_length(), 1);
        assert_eq!(app.last_outcome, Outcome::Running);
    }

    #[test]
    fn test_advance_records_a_finished_game_once() {
        use crate::game::Direction;

        // On 2x2, eating at (1,1) grows the snake into its own tail
        // marker on the same tick: one step, deterministic game over.
        let mut app = App::new(GameConfig::new(2, 2));
        app.engine = GameEngine::with_chain(
            GameConfig::new(2, 2),
            &[(0, 1)],
            (0, 0),
            Direction::Down,
            (1, 1),
        );
        app.engine.set_input_direction(Direction::Right);
        app.engine.step();
        assert!(!app.engine.is_running());

        app.advance(Duration::ZERO);
        assert_eq!(app.metrics.games_played(), 1);

        // staying in the terminal state must not double-count
        app.advance(Duration::ZERO);
        assert_eq!(app.metrics.games_played(), 1);
    }
}
