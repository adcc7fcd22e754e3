use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{Position, Snapshot};
use crate::metrics::GameMetrics;
use crate::schedule::Phase;

/// Draws a snapshot. Holds no game state of its own.
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot, phase: Phase, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(snapshot, metrics), chunks[0]);

        let board = board_area(chunks[1], snapshot);
        frame.render_widget(self.render_grid(snapshot, phase), board);

        match phase {
            Phase::Idle => self.render_overlay(frame, board, self.idle_text(), Color::Cyan),
            Phase::GameOver => {
                self.render_overlay(frame, board, self.game_over_text(snapshot), Color::Red)
            }
            Phase::Running => {}
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot, phase: Phase) -> Paragraph<'_> {
        let head = snapshot.head();
        let mut lines = Vec::with_capacity(snapshot.grid_height);

        for y in 0..snapshot.grid_height {
            let spans: Vec<Span> = (0..snapshot.grid_width)
                .map(|x| {
                    let pos = Position::new(x as i32, y as i32);
                    if pos == head {
                        Span::styled(
                            "■ ",
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD),
                        )
                    } else if snapshot.snake.contains(&pos) {
                        Span::styled("□ ", Style::default().fg(Color::Green))
                    } else if pos == snapshot.food {
                        Span::styled(
                            "● ",
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        )
                    } else {
                        Span::styled(". ", Style::default().fg(Color::DarkGray))
                    }
                })
                .collect();

            lines.push(Line::from(spans));
        }

        let border = match phase {
            Phase::GameOver => Color::Red,
            _ => Color::White,
        };

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(border))
                .title(" Snake "),
        )
    }

    fn render_stats(&self, snapshot: &Snapshot, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(snapshot.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(format!("{}ms", snapshot.speed_ms), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn idle_text(&self) -> Vec<Line<'static>> {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "SNAKE",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start", Style::default().fg(Color::Gray)),
            ]),
        ]
    }

    fn game_over_text(&self, snapshot: &Snapshot) -> Vec<Line<'static>> {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("R", Style::default().fg(Color::Green)),
                Span::styled(" restart  ", Style::default().fg(Color::Gray)),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::styled(" quit", Style::default().fg(Color::Gray)),
            ]),
        ]
    }

    fn render_overlay(&self, frame: &mut Frame, board: Rect, text: Vec<Line<'static>>, color: Color) {
        let height = text.len() as u16 + 2;
        let popup = centered(board, 26, height);

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(color)),
            ),
            popup,
        );
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Enter/R", Style::default().fg(Color::Green)),
            Span::raw(" to (re)start | "),
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

/// Exact-fit rectangle for the grid (two columns per cell plus the border),
/// centered in `area` and clipped to it.
fn board_area(area: Rect, snapshot: &Snapshot) -> Rect {
    let width = (snapshot.grid_width as u16).saturating_mul(2).saturating_add(2);
    let height = (snapshot.grid_height as u16).saturating_add(2);
    centered(area, width, height)
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}
