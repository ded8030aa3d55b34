use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, canvas::Canvas},
};

use super::motion;
use super::shapes::{FilledCircle, FilledRect};
use crate::game::{GameEngine, Outcome};
use crate::metrics::SessionMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, engine: &GameEngine, metrics: &SessionMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(engine, metrics);
        frame.render_widget(stats, chunks[0]);

        let field_area = self.field_area(chunks[1], engine);
        self.render_field(frame, field_area, engine);

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    /// A centered rect just large enough for the pixel field: braille
    /// packs 2x4 dots per terminal cell, plus one cell of border all
    /// around.
    fn field_area(&self, area: Rect, engine: &GameEngine) -> Rect {
        let (width_px, height_px) = engine.config().pixel_size();
        let cols = (width_px.div_ceil(2) as u16 + 2).min(area.width);
        let rows = (height_px.div_ceil(4) as u16 + 2).min(area.height);
        Rect::new(
            area.x + (area.width - cols) / 2,
            area.y + (area.height - rows) / 2,
            cols,
            rows,
        )
    }

    /// Paint the playing field. The canvas coordinate space is the pixel
    /// space of the grid; canvas y grows upward, so sprite rows are
    /// flipped here. In a terminal outcome the last simulation state stays
    /// on screen under a re-titled border.
    fn render_field(&self, frame: &mut Frame, area: Rect, engine: &GameEngine) {
        let config = engine.config();
        let (width_px, height_px) = config.pixel_size();
        let tile = config.tile_size as f64;

        let (title, border_color) = match engine.outcome() {
            Outcome::Running => (" Snake ", Color::White),
            Outcome::GameOver => (" Snake | GAME OVER, R restarts ", Color::Red),
            Outcome::Won => (" Snake | YOU WIN, R restarts ", Color::Yellow),
        };

        let canvas = Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(border_color))
                    .title(title),
            )
            .background_color(config.background_color)
            .marker(Marker::Braille)
            .x_bounds([0.0, width_px as f64])
            .y_bounds([0.0, height_px as f64])
            .paint(|ctx| {
                let food = motion::food_sprite(engine);
                ctx.draw(&FilledRect {
                    x: food.x as f64,
                    y: height_px as f64 - food.y as f64 - tile,
                    width: tile,
                    height: tile,
                    color: config.food_color,
                });

                for sprite in motion::body_sprites(engine) {
                    ctx.draw(&FilledCircle {
                        x: sprite.x as f64 + tile / 2.0,
                        y: height_px as f64 - (sprite.y as f64 + tile / 2.0),
                        radius: tile / 2.0,
                        color: config.snake_color,
                    });
                }
            });

        frame.render_widget(canvas, area);
    }

    fn render_stats(&self, engine: &GameEngine, metrics: &SessionMetrics) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                engine.body_length().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.high_score().to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Wins: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.wins().to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to steer | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
