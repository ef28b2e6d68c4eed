use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;

#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    Tick,
    Resize,
}

/// Multiplexes terminal input and the sampling tick into one channel.
///
/// The forwarding task owns no application state; the receiving loop stays
/// the single actor. Input arrival never delays a tick and a tick never
/// blocks on input. Cadence changes are applied in place by the one spawned
/// task — only one reader ever polls the input stream, so no keystroke can
/// be swallowed by a superseded pump.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    rate_tx: mpsc::UnboundedSender<Duration>,
    _task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self::with_input(event::EventStream::new(), tick_rate)
    }

    fn with_input<S>(input: S, tick_rate: Duration) -> Self
    where
        S: Stream<Item = std::io::Result<CrosstermEvent>> + Send + Unpin + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();
        let (rate_tx, mut rate_rx) = mpsc::unbounded_channel::<Duration>();

        let task = tokio::spawn(async move {
            let mut reader = input;
            let mut tick_interval = interval_after(tick_rate);

            loop {
                tokio::select! {
                    maybe_event = reader.next() => {
                        match maybe_event {
                            Some(Ok(evt)) => {
                                let mapped = match evt {
                                    CrosstermEvent::Key(key) => Some(Event::Key(key)),
                                    CrosstermEvent::Resize(_, _) => Some(Event::Resize),
                                    _ => None,
                                };
                                if let Some(e) = mapped
                                    && tx.send(e).is_err()
                                {
                                    break;
                                }
                            }
                            Some(Err(_)) => break,
                            None => break,
                        }
                    }
                    _ = tick_interval.tick() => {
                        if tx.send(Event::Tick).is_err() {
                            break;
                        }
                    }
                    maybe_rate = rate_rx.recv() => {
                        match maybe_rate {
                            Some(rate) => tick_interval = interval_after(rate),
                            // Handler dropped; nothing left to deliver to.
                            None => break,
                        }
                    }
                }
            }
        });

        Self { rx, rate_tx, _task: task }
    }

    /// Changes the tick cadence without disturbing input delivery. The next
    /// tick fires one full new interval from now.
    pub fn set_tick_rate(&self, tick_rate: Duration) {
        let _ = self.rate_tx.send(tick_rate);
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// An interval whose first tick fires one period from now, not immediately.
fn interval_after(period: Duration) -> tokio::time::Interval {
    tokio::time::interval_at(tokio::time::Instant::now() + period, period)
}
