//! Terminal input and output seams for the interactive desktop.

pub mod console;
pub mod keyboard;

pub use console::{ConsoleInputDriver, ConsoleOutputDriver};
pub use keyboard::KeyboardNormalizer;

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use ::crossterm::event::Event;
use ratatui::Frame;

pub trait InputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
    fn set_mouse_capture(&mut self, _enabled: bool) -> io::Result<()> {
        Ok(())
    }
}

impl<T: InputDriver + ?Sized> InputDriver for &mut T {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        (**self).poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        (**self).read()
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        (**self).set_mouse_capture(enabled)
    }
}

pub trait OutputDriver {
    fn enter(&mut self) -> io::Result<()>;
    fn exit(&mut self) -> io::Result<()>;
    /// Columns and rows currently available.
    fn size(&self) -> io::Result<(u16, u16)>;
    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>);
}

/// Replays a fixed list of events. `poll` reports false once it runs dry.
#[derive(Debug, Default)]
pub struct QueuedInputDriver {
    events: VecDeque<Event>,
}

impl QueuedInputDriver {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl InputDriver for QueuedInputDriver {
    fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
        Ok(!self.events.is_empty())
    }

    fn read(&mut self) -> io::Result<Event> {
        self.events
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input queue is empty"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all<D: InputDriver>(mut driver: D) -> Vec<Event> {
        let mut out = Vec::new();
        while driver.poll(Duration::ZERO).unwrap() {
            out.push(driver.read().unwrap());
        }
        out
    }

    #[test]
    fn queued_driver_runs_dry() {
        let mut driver = QueuedInputDriver::new([Event::Resize(80, 24)]);
        driver.push(Event::FocusGained);
        assert_eq!(
            read_all(&mut driver),
            vec![Event::Resize(80, 24), Event::FocusGained]
        );
        assert_eq!(driver.remaining(), 0);
        assert_eq!(
            driver.read().unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }
}
