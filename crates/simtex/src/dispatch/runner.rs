//! The request/response loop over a framed channel.

use std::io::{Read, Write};

use tracing::{debug, info};

use super::DISPATCH_TARGET;
use super::dispatcher::{Dispatcher, Step};
use crate::channel::{ChannelError, FramedChannel};
use crate::registry::ExitRequest;

/// Phase of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for the next command.
    Idle,
    /// Serving a request.
    Executing,
}

/// Serves requests from the engine until `exit` or a channel failure.
#[derive(Debug)]
pub struct DispatchLoop<R, W: Write> {
    channel: FramedChannel<R, W>,
    dispatcher: Dispatcher,
    state: LoopState,
    served: u64,
}

impl<R: Read, W: Write> DispatchLoop<R, W> {
    /// Creates a loop reading requests from `channel`.
    #[must_use]
    pub const fn new(channel: FramedChannel<R, W>, dispatcher: Dispatcher) -> Self {
        Self {
            channel,
            dispatcher,
            state: LoopState::Idle,
            served: 0,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    /// Number of requests answered so far.
    #[must_use]
    pub const fn served(&self) -> u64 {
        self.served
    }

    /// Runs until the engine sends `exit`.
    ///
    /// # Errors
    ///
    /// Returns the [`ChannelError`] that ended the session. Per-request
    /// failures are answered and never end the loop.
    pub fn run(&mut self) -> Result<ExitRequest, ChannelError> {
        info!(
            target: DISPATCH_TARGET,
            commands = ?self.dispatcher.registry().names(),
            "dispatch loop started"
        );
        loop {
            if let Some(request) = self.step()? {
                info!(
                    target: DISPATCH_TARGET,
                    status = request.status(),
                    served = self.served,
                    "exit requested"
                );
                return Ok(request);
            }
        }
    }

    /// Serves exactly one request. Returns the exit request when the engine
    /// asked to stop; nothing is sent back in that case.
    ///
    /// # Errors
    ///
    /// Returns a [`ChannelError`] when receiving the request or sending the
    /// response fails.
    pub fn step(&mut self) -> Result<Option<ExitRequest>, ChannelError> {
        self.state = LoopState::Idle;
        let command = self.channel.receive()?;
        let arguments = self.channel.receive()?;
        self.state = LoopState::Executing;
        debug!(target: DISPATCH_TARGET, command = %command, "request received");

        let outcome = match self.dispatcher.dispatch(&command, &arguments) {
            Step::Exit(request) => return Ok(Some(request)),
            Step::Respond(outcome) => outcome,
        };
        self.channel.send(outcome.status())?;
        self.channel.send(&outcome.payload())?;
        self.served += 1;
        self.state = LoopState::Idle;
        debug!(
            target: DISPATCH_TARGET,
            command = %command,
            status = outcome.status(),
            "response sent"
        );
        Ok(None)
    }

    /// Returns the channel, for the transport to close.
    #[must_use]
    pub fn into_channel(self) -> FramedChannel<R, W> {
        self.channel
    }
}
