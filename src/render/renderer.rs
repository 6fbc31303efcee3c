use std::collections::HashMap;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Field, GameEngine, Phase, SnakeColor, Vector2};
use crate::metrics::GameMetrics;

const FOOD_COLOR: Color = Color::Red;
const COLLISION_COLOR: Color = Color::Blue;
const EMPTY_COLOR: Color = Color::DarkGray;

/// What a grid cell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Food,
    Snake { color: SnakeColor, head: bool },
    Collision,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, engine: &GameEngine, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(4), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(engine, metrics), chunks[0]);

        match engine.field() {
            Some(field) => frame.render_widget(self.render_grid(engine, field), chunks[1]),
            None => frame.render_widget(self.render_welcome(), chunks[1]),
        }

        let footer = if engine.phase() == Phase::GameOver {
            self.render_game_over(engine)
        } else {
            self.render_controls()
        };
        frame.render_widget(footer, chunks[2]);
    }

    /// Cell contents keyed by position, later layers painted over earlier ones
    fn paint_cells(engine: &GameEngine, field: &Field) -> HashMap<Vector2, Cell> {
        let mut cells = HashMap::new();
        for food in field.foods() {
            cells.insert(*food, Cell::Food);
        }
        for snake in field.snakes() {
            for p in snake.body_minus_head() {
                cells.insert(p, Cell::Snake {
                    color: snake.color(),
                    head: false,
                });
            }
        }
        // Heads last, so a tail cannot hide another snake's head
        for snake in field.snakes() {
            cells.insert(snake.head(), Cell::Snake {
                color: snake.color(),
                head: true,
            });
        }
        if let Some(report) = engine.last_report() {
            for p in report.collision_positions() {
                cells.insert(p, Cell::Collision);
            }
        }
        cells
    }

    /// Cells whose right-hand gap joins two segments of the same snake.
    ///
    /// Only segments that sit side by side on screen are joined; a step
    /// across the wrapping edge leaves no visible gap to fill.
    fn connectors(field: &Field) -> HashMap<Vector2, SnakeColor> {
        let mut joined = HashMap::new();
        for snake in field.snakes() {
            for (a, b) in snake.body().zip(snake.body_minus_head()) {
                if a.y == b.y && (a.x - b.x).abs() == 1 {
                    joined.insert(Vector2::new(a.x.min(b.x), a.y), snake.color());
                }
            }
        }
        joined
    }

    fn render_grid(&self, engine: &GameEngine, field: &Field) -> Paragraph<'_> {
        let cells = Self::paint_cells(engine, field);
        let joined = Self::connectors(field);
        let mut lines = Vec::with_capacity(field.height());

        for y in 0..field.height() as i32 {
            let mut spans = Vec::with_capacity(field.width() * 2);

            for x in 0..field.width() as i32 {
                let pos = Vector2::new(x, y);
                let cell = match cells.get(&pos) {
                    Some(Cell::Snake { color, head: true }) => Span::styled(
                        "█",
                        Style::default()
                            .fg(snake_color(*color))
                            .add_modifier(Modifier::BOLD),
                    ),
                    Some(Cell::Snake { color, head: false }) => {
                        Span::styled("█", Style::default().fg(snake_color(*color)))
                    }
                    Some(Cell::Food) => Span::styled(
                        "●",
                        Style::default().fg(FOOD_COLOR).add_modifier(Modifier::BOLD),
                    ),
                    Some(Cell::Collision) => Span::styled(
                        "✖",
                        Style::default()
                            .fg(COLLISION_COLOR)
                            .add_modifier(Modifier::BOLD),
                    ),
                    None => Span::styled("·", Style::default().fg(EMPTY_COLOR)),
                };
                spans.push(cell);

                let gap = match joined.get(&pos) {
                    Some(color) => Span::styled("█", Style::default().fg(snake_color(*color))),
                    None => Span::raw(" "),
                };
                spans.push(gap);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Duel Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, engine: &GameEngine, metrics: &GameMetrics) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("Round: ", Style::default().fg(Color::Yellow)),
            Span::styled(engine.round().to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Tick: ", Style::default().fg(Color::Yellow)),
            Span::styled(engine.ticks().to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.longest_snake.to_string(),
                Style::default().fg(Color::White),
            ),
        ];

        if let Some(field) = engine.field() {
            for snake in field.snakes() {
                spans.push(Span::raw("    "));
                spans.push(Span::styled(
                    format!("{}: {}", snake.color().name(), snake.len()),
                    Style::default()
                        .fg(snake_color(snake.color()))
                        .add_modifier(Modifier::BOLD),
                ));
            }
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_welcome(&self) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "N",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start a game", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Duel Snake "))
    }

    fn render_game_over(&self, engine: &GameEngine) -> Paragraph<'_> {
        let crashed: Vec<Span> = match (engine.field(), engine.last_report()) {
            (Some(field), Some(report)) => report
                .collisions
                .iter()
                .filter_map(|c| field.snake(c.snake))
                .map(|snake| {
                    Span::styled(
                        format!(" {} ({}) ", snake.color().name(), snake.len()),
                        Style::default().fg(snake_color(snake.color())),
                    )
                })
                .collect(),
            _ => Vec::new(),
        };

        let mut summary = vec![Span::styled(
            "GAME OVER",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )];
        if crashed.is_empty() {
            summary.push(Span::styled("  stopped", Style::default().fg(Color::Gray)));
        } else {
            summary.push(Span::raw("  crashed:"));
            summary.extend(crashed);
        }

        let text = vec![
            Line::from(summary),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "N",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" for a new game or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![
            Line::from(vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" first snake | "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" second snake"),
            ]),
            Line::from(vec![
                Span::styled("N", Style::default().fg(Color::Green)),
                Span::raw(" new game | "),
                Span::styled("X", Style::default().fg(Color::Yellow)),
                Span::raw(" stop | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" quit"),
            ]),
        ];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn snake_color(color: SnakeColor) -> Color {
    match color {
        SnakeColor::Green => Color::Green,
        SnakeColor::Yellow => Color::Yellow,
        SnakeColor::Cyan => Color::Cyan,
        SnakeColor::Magenta => Color::Magenta,
        SnakeColor::Blue => Color::LightBlue,
        SnakeColor::White => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig, SnakeSpawn};
    use ratatui::{Terminal, backend::TestBackend};

    fn engine(width: usize, height: usize, snakes: Vec<SnakeSpawn>) -> GameEngine {
        GameEngine::new(GameConfig {
            food_count: 0,
            seed: Some(3),
            snakes,
            ..GameConfig::new(width, height)
        })
        .unwrap()
    }

    fn spawn(x: i32, y: i32, direction: Direction, color: SnakeColor) -> SnakeSpawn {
        SnakeSpawn {
            position: Vector2::new(x, y),
            direction,
            color,
        }
    }

    #[test]
    fn test_connectors_skip_wrapped_edge() {
        let mut engine = engine(4, 2, vec![spawn(2, 0, Direction::Right, SnakeColor::Green)]);
        engine.new_game();
        // Body grows to (0,0) (3,0) (2,0)
        engine.advance();
        engine.advance();

        let joined = Renderer::connectors(engine.field().unwrap());
        assert_eq!(joined.len(), 1);
        assert_eq!(joined.get(&Vector2::new(2, 0)), Some(&SnakeColor::Green));
    }

    #[test]
    fn test_collision_painted_over_heads() {
        let mut engine = engine(
            5,
            1,
            vec![
                spawn(1, 0, Direction::Right, SnakeColor::Green),
                spawn(3, 0, Direction::Left, SnakeColor::Yellow),
            ],
        );
        engine.new_game();
        engine.advance();

        let cells = Renderer::paint_cells(&engine, engine.field().unwrap());
        assert_eq!(cells.get(&Vector2::new(2, 0)), Some(&Cell::Collision));
        assert_eq!(
            cells.get(&Vector2::new(1, 0)),
            Some(&Cell::Snake {
                color: SnakeColor::Green,
                head: false
            })
        );
    }

    #[test]
    fn test_renders_every_phase() {
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let renderer = Renderer::new();
        let metrics = GameMetrics::new();
        let mut engine = engine(10, 10, Vec::new());

        terminal
            .draw(|frame| renderer.render(frame, &engine, &metrics))
            .unwrap();

        engine.new_game();
        engine.advance();
        terminal
            .draw(|frame| renderer.render(frame, &engine, &metrics))
            .unwrap();

        engine.stop_game();
        terminal
            .draw(|frame| renderer.render(frame, &engine, &metrics))
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("GAME OVER"));
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_stopped_round_has_no_crash_list() {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let renderer = Renderer::new();
        let metrics = GameMetrics::new();
        let mut engine = engine(10, 10, Vec::new());

        engine.new_game();
        engine.advance();
        engine.stop_game();
        terminal
            .draw(|frame| renderer.render(frame, &engine, &metrics))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("GAME OVER  stopped"));
        assert!(!text.contains("crashed:"));
    }

    #[test]
    fn test_crashed_round_lists_snakes() {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let renderer = Renderer::new();
        let metrics = GameMetrics::new();
        let mut engine = engine(
            5,
            1,
            vec![
                spawn(1, 0, Direction::Right, SnakeColor::Green),
                spawn(3, 0, Direction::Left, SnakeColor::Yellow),
            ],
        );

        engine.new_game();
        engine.advance();
        terminal
            .draw(|frame| renderer.render(frame, &engine, &metrics))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("crashed:"));
        assert!(text.contains("green"));
        assert!(!text.contains("stopped"));
    }
}
