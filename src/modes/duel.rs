use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;

use crate::clock::TickClock;
use crate::game::{GameConfig, GameEngine, Phase};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Two players on one keyboard.
///
/// Ticks, key presses and frames are all handled on one task, so a tick
/// always runs to completion before the next key press is applied.
pub struct DuelMode {
    engine: GameEngine,
    clock: TickClock,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl DuelMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let engine = GameEngine::new(config).context("Invalid game configuration")?;

        Ok(Self {
            engine,
            clock: TickClock::new(),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
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

        self.new_game();

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

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = self.clock.fired() => {
                    self.on_tick();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
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
                info!("quitting");
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            self.apply(self.input_handler.handle_key_event(key));
        }
    }

    fn apply(&mut self, action: KeyAction) {
        match action {
            KeyAction::Turn { player, direction } => {
                self.engine.queue_direction(player, direction);
            }
            KeyAction::NewGame => self.new_game(),
            KeyAction::Stop => self.stop_game(),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    /// Advance the round by one tick and arm the clock for the next one
    fn on_tick(&mut self) {
        let continues = match self.engine.advance() {
            Some(report) => report.continues(),
            None => return,
        };

        if continues {
            self.clock.schedule(self.engine.config().tick_period());
        } else {
            self.clock.cancel();
            self.record_game_over();
        }
    }

    fn new_game(&mut self) {
        if self.engine.phase() == Phase::Running {
            self.record_game_over();
        }
        self.clock.cancel();
        self.engine.new_game();
        self.metrics.on_game_start();
        self.clock.schedule(self.engine.config().tick_period());
    }

    fn stop_game(&mut self) {
        self.clock.cancel();
        if self.engine.stop_game() {
            self.record_game_over();
        }
    }

    fn record_game_over(&mut self) {
        let lengths: Vec<usize> = self
            .engine
            .field()
            .map(|field| field.snakes().iter().map(|s| s.len()).collect())
            .unwrap_or_default();
        self.metrics.on_game_over(&lengths);
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
