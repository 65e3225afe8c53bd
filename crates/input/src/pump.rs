//! Producer thread that reads the terminal and feeds key events to the game loop.
//!
//! The thread owns the blocking `poll`/`read` calls and only ever sends
//! [`TimedKey`]s down a channel, each stamped when it was read. The game loop
//! drains the channel once per frame without blocking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use arrayvec::ArrayVec;
use crossterm::event::{self, Event, KeyEvent};

/// Upper bound on events handed to one frame; the rest wait for the next.
pub const MAX_EVENTS_PER_FRAME: usize = 64;

/// How long one poll waits before re-checking the stop flag.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A key event and the moment the producer thread read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedKey {
    pub key: KeyEvent,
    pub at: Instant,
}

pub struct InputPump {
    rx: Receiver<TimedKey>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<Result<()>>>,
    disconnected: bool,
}

impl InputPump {
    /// Start reading key events from the terminal.
    pub fn spawn() -> Result<Self> {
        Self::spawn_with(|timeout| {
            if !event::poll(timeout)? {
                return Ok(None);
            }
            match event::read()? {
                Event::Key(key) => Ok(Some(key)),
                _ => Ok(None),
            }
        })
    }

    /// Start a producer over any event source.
    ///
    /// `source` is called with the poll timeout and returns the next key event
    /// if one arrived. An error ends the thread and is reported by [`stop`](Self::stop).
    pub fn spawn_with<F>(mut source: F) -> Result<Self>
    where
        F: FnMut(Duration) -> Result<Option<KeyEvent>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("input-pump".to_string())
            .spawn(move || -> Result<()> {
                while !thread_stop.load(Ordering::Relaxed) {
                    let Some(key) = source(POLL_INTERVAL)? else {
                        continue;
                    };
                    let event = TimedKey {
                        key,
                        at: Instant::now(),
                    };
                    if tx.send(event).is_err() {
                        // Receiver gone: the game loop has shut down.
                        break;
                    }
                }
                Ok(())
            })
            .context("spawn input thread")?;

        log::debug!("input pump started");
        Ok(Self {
            rx,
            stop,
            handle: Some(handle),
            disconnected: false,
        })
    }

    /// Take the events that arrived since the last call, without blocking.
    pub fn drain(&mut self) -> ArrayVec<TimedKey, MAX_EVENTS_PER_FRAME> {
        let mut events = ArrayVec::new();
        while !events.is_full() {
            match self.rx.try_recv() {
                Ok(key) => events.push(key),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        log::warn!("input thread exited");
                    }
                    self.disconnected = true;
                    break;
                }
            }
        }
        events
    }

    /// The producer thread has exited (error or end of input).
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    /// Stop the producer thread and wait for it. Returns the thread's error, if any.
    pub fn stop(&mut self) -> Result<()> {
        self.stop.store(true, Ordering::Relaxed);
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        let result = handle
            .join()
            .map_err(|_| anyhow!("input thread panicked"))?;
        log::debug!("input pump stopped");
        result
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            log::warn!("input pump shutdown: {err:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use std::collections::VecDeque;

    fn wait_for(pump: &mut InputPump, want: usize) -> Vec<TimedKey> {
        let deadline = Instant::now() + Duration::from_secs(2);
        let mut seen = Vec::new();
        while seen.len() < want && Instant::now() < deadline {
            seen.extend(pump.drain());
            thread::sleep(Duration::from_millis(1));
        }
        seen
    }

    #[test]
    fn test_events_arrive_in_order() {
        let mut script: VecDeque<KeyEvent> = [KeyCode::Up, KeyCode::Char(' '), KeyCode::Left]
            .into_iter()
            .map(KeyEvent::from)
            .collect();
        let before = Instant::now();
        let mut pump = InputPump::spawn_with(move |timeout| {
            if script.is_empty() {
                thread::sleep(timeout);
            }
            Ok(script.pop_front())
        })
        .unwrap();

        let events = wait_for(&mut pump, 3);
        let seen: Vec<KeyCode> = events.iter().map(|e| e.key.code).collect();
        assert_eq!(seen, vec![KeyCode::Up, KeyCode::Char(' '), KeyCode::Left]);
        assert!(events.windows(2).all(|w| w[0].at <= w[1].at));
        assert!(events.iter().all(|e| e.at >= before && e.at <= Instant::now()));
        assert!(pump.stop().is_ok());
    }

    #[test]
    fn test_drain_is_bounded_per_frame() {
        let mut remaining = MAX_EVENTS_PER_FRAME + 10;
        let mut pump = InputPump::spawn_with(move |timeout| {
            if remaining == 0 {
                thread::sleep(timeout);
                return Ok(None);
            }
            remaining -= 1;
            Ok(Some(KeyEvent::from(KeyCode::Down)))
        })
        .unwrap();

        // Let the producer fill the channel.
        let deadline = Instant::now() + Duration::from_secs(2);
        let mut first = ArrayVec::<TimedKey, MAX_EVENTS_PER_FRAME>::new();
        while first.is_empty() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(50));
            first = pump.drain();
        }
        assert!(first.len() <= MAX_EVENTS_PER_FRAME);

        let rest = wait_for(&mut pump, MAX_EVENTS_PER_FRAME + 10 - first.len());
        assert_eq!(first.len() + rest.len(), MAX_EVENTS_PER_FRAME + 10);
        pump.stop().unwrap();
    }

    #[test]
    fn test_source_error_is_reported_on_stop() {
        let mut pump = InputPump::spawn_with(|_| Err(anyhow!("tty went away"))).unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        while !pump.is_disconnected() && Instant::now() < deadline {
            pump.drain();
            thread::sleep(Duration::from_millis(1));
        }
        assert!(pump.is_disconnected());

        let err = pump.stop().unwrap_err();
        assert!(err.to_string().contains("tty went away"));
        assert!(pump.stop().is_ok(), "second stop is a no-op");
    }
}
