use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// What the loop hands its handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pulse {
    /// Once per iteration, before input is read. Pending gesture writes are
    /// committed and the screen is redrawn here.
    Frame,
    Input(Event),
}

/// Single-threaded loop driving the interactive desktop.
///
/// Each iteration emits one [`Pulse::Frame`], then waits up to
/// `poll_interval` for input and drains every queued event before the next
/// frame. Draining keeps a burst of pointer moves from lagging behind the
/// screen; the frame coalescers in the gesture controllers collapse the burst
/// into a single write.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(Pulse) -> io::Result<ControlFlow>,
    {
        loop {
            if handler(Pulse::Frame)? == ControlFlow::Quit {
                return Ok(());
            }

            if self.driver.poll(self.poll_interval)? {
                loop {
                    let event = self.driver.read()?;
                    if handler(Pulse::Input(event))? == ControlFlow::Quit {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
        }
    }
}
