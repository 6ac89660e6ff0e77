use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEventKind};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Rows scrolled per mouse wheel notch
const WHEEL_ROWS: i32 = 3;

/// How long the reader blocks before checking whether anyone still listens
const READER_POLL: Duration = Duration::from_millis(50);

/// Terminal events pumped from a blocking reader task
///
/// Must be created inside a tokio runtime. The reader stops once the
/// handler is dropped.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tick_rate: Duration,
    /// Wait between frames while something is moving
    animation_rate: Duration,
}

impl EventHandler {
    pub fn with_animation_fps(tick_rate_ms: u64, fps: u32) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::task::spawn_blocking(move || read_terminal(tx));
        Self::from_receiver(rx, tick_rate_ms, fps)
    }

    fn from_receiver(rx: mpsc::UnboundedReceiver<AppEvent>, tick_rate_ms: u64, fps: u32) -> Self {
        let fps = fps.clamp(1, 240) as u64;
        Self {
            rx,
            tick_rate: Duration::from_millis(tick_rate_ms.max(1)),
            animation_rate: Duration::from_millis((1000 / fps).max(1)),
        }
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    pub fn animation_rate(&self) -> Duration {
        self.animation_rate
    }

    /// Next event, or a tick after the idle interval
    pub async fn next(&mut self) -> Result<AppEvent> {
        self.wait(self.tick_rate).await
    }

    /// Next event, or a tick after one animation frame
    pub async fn next_animation(&mut self) -> Result<AppEvent> {
        self.wait(self.animation_rate).await
    }

    async fn wait(&mut self, timeout: Duration) -> Result<AppEvent> {
        tokio::select! {
            event = self.rx.recv() => {
                event.ok_or_else(|| anyhow::anyhow!("terminal event reader stopped"))
            }
            _ = tokio::time::sleep(timeout) => Ok(AppEvent::Tick),
        }
    }
}

fn read_terminal(tx: mpsc::UnboundedSender<AppEvent>) {
    while !tx.is_closed() {
        match event::poll(READER_POLL) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(e) => {
                warn!("terminal poll failed: {}", e);
                return;
            }
        }
        match event::read() {
            Ok(event) => {
                if let Some(event) = translate(event) {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
            }
            Err(e) => {
                warn!("terminal read failed: {}", e);
                return;
            }
        }
    }
    debug!("terminal reader finished");
}

fn translate(event: Event) -> Option<AppEvent> {
    match event {
        // Release events arrive on some platforms; only presses count
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollDown => Some(AppEvent::Scroll(WHEEL_ROWS)),
            MouseEventKind::ScrollUp => Some(AppEvent::Scroll(-WHEEL_ROWS)),
            _ => None,
        },
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        _ => None,
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Mouse wheel, in rows (positive = down)
    Scroll(i32),
    /// Terminal was resized
    Resize(u16, u16),
    /// Nothing happened within the wait interval
    Tick,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers, MouseEvent};

    #[test]
    fn test_rates() {
        let (_tx, rx) = mpsc::unbounded_channel();
        let handler = EventHandler::from_receiver(rx, 100, 50);
        assert_eq!(handler.tick_rate(), Duration::from_millis(100));
        assert_eq!(handler.animation_rate(), Duration::from_millis(20));

        let (_tx, rx) = mpsc::unbounded_channel();
        let handler = EventHandler::from_receiver(rx, 0, 0);
        assert_eq!(handler.animation_rate(), Duration::from_millis(1000));
        assert_eq!(handler.tick_rate(), Duration::from_millis(1));
    }

    #[tokio::test]
    async fn test_queued_event_before_tick() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut handler = EventHandler::from_receiver(rx, 10, 60);

        tx.send(AppEvent::Scroll(3)).unwrap();
        assert!(matches!(handler.next().await.unwrap(), AppEvent::Scroll(3)));
        assert!(matches!(handler.next_animation().await.unwrap(), AppEvent::Tick));
    }

    #[tokio::test]
    async fn test_closed_reader_is_an_error() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut handler = EventHandler::from_receiver(rx, 10, 60);
        drop(tx);
        assert!(handler.next().await.is_err());
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut key = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        assert!(matches!(translate(Event::Key(key)), Some(AppEvent::Key(_))));

        key.kind = KeyEventKind::Release;
        assert!(translate(Event::Key(key)).is_none());
    }

    #[test]
    fn test_mouse_wheel() {
        let wheel = |kind| {
            Event::Mouse(MouseEvent {
                kind,
                column: 0,
                row: 0,
                modifiers: KeyModifiers::NONE,
            })
        };
        assert!(matches!(
            translate(wheel(MouseEventKind::ScrollDown)),
            Some(AppEvent::Scroll(3))
        ));
        assert!(matches!(
            translate(wheel(MouseEventKind::ScrollUp)),
            Some(AppEvent::Scroll(-3))
        ));
        assert!(translate(wheel(MouseEventKind::Moved)).is_none());
    }
}
