//! Real-time driver for the simulation core.
//!
//! The core never sleeps; it only reports when its next pending step is
//! due.  This module races that deadline against new input on a
//! single-threaded executor, so a reading that arrives mid round trip
//! cancels the rest of it at the moment it arrives.
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────────┐
//!  │  futures_lite::block_on                                  │
//!  │  ┌────────────────────────────────────────────────────┐  │
//!  │  │  edge_executor::LocalExecutor                      │  │
//!  │  │                                                    │  │
//!  │  │  ┌──────────┐   InputChannel   ┌────────────────┐  │  │
//!  │  │  │ Script   │─────────────────▶│ drive          │  │  │
//!  │  │  │ cues ⏱   │                  │ input | due ⏱  │  │  │
//!  │  │  └──────────┘                  └────────────────┘  │  │
//!  │  └────────────────────────────────────────────────────┘  │
//!  └──────────────────────────────────────────────────────────┘
//! ```

use core::time::Duration;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use futures_lite::future;
use log::{debug, info};

// `async_io_mini::Timer` is driven by `embassy-time-driver`; the `std`
// feature of `embassy-time` provides that driver on the host.
use embassy_time as _;

use crate::app::commands::AppCommand;
use crate::app::ports::{Clock, EventSink};
use crate::app::service::FlowerpotService;
use crate::time::Millis;

/// Depth of the input channel.
pub const INPUT_DEPTH: usize = 8;

/// Something the input surface hands to the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Command(AppCommand),
    /// Stop accepting input; return once the pending round trip is done.
    Shutdown,
}

impl From<AppCommand> for Input {
    fn from(cmd: AppCommand) -> Self {
        Self::Command(cmd)
    }
}

/// Input surface → driver.  Single-threaded, so no locking.
pub type InputChannel = Channel<NoopRawMutex, Input, INPUT_DEPTH>;

/// One scripted input, sent `after` the previous one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub after: Duration,
    pub command: AppCommand,
}

impl Cue {
    pub fn after_ms(ms: u64, command: AppCommand) -> Self {
        Self {
            after: Duration::from_millis(ms),
            command,
        }
    }
}

enum Wake {
    Input(Input),
    Due(Millis),
}

async fn sleep_until(clock: &impl Clock, due: Millis) {
    let wait = due.saturating_since(clock.now());
    if !wait.is_zero() {
        async_io_mini::Timer::after(wait).await;
    }
}

/// Run `service` against real time until [`Input::Shutdown`] arrives and
/// the round trip in flight at that moment has finished.
pub async fn drive(
    service: &mut FlowerpotService,
    inputs: &InputChannel,
    clock: &impl Clock,
    sink: &mut impl EventSink,
) {
    let mut draining = false;
    loop {
        let wake = match (service.next_deadline(), draining) {
            (None, true) => break,
            (Some(due), true) => {
                sleep_until(clock, due).await;
                Wake::Due(due)
            }
            (Some(due), false) => {
                future::or(async { Wake::Input(inputs.receive().await) }, async {
                    sleep_until(clock, due).await;
                    Wake::Due(due)
                })
                .await
            }
            (None, false) => Wake::Input(inputs.receive().await),
        };

        let now = clock.now();
        match wake {
            // Never run a step before its due time, even if the host
            // clock rounds down.
            Wake::Due(due) => {
                service.advance(now.max(due), sink);
            }
            Wake::Input(Input::Command(cmd)) => {
                debug!("Driver: {cmd:?} at {}", now.as_u64());
                service.handle_command(cmd, now, sink);
            }
            Wake::Input(Input::Shutdown) => {
                info!("Driver: shutdown requested, draining");
                draining = true;
            }
        }
    }
    info!(
        "Driver stopped ({} completed, {} cancelled)",
        service.completed_count(),
        service.cancelled_count()
    );
}

async fn feed(inputs: &InputChannel, cues: &[Cue]) {
    for cue in cues {
        if !cue.after.is_zero() {
            async_io_mini::Timer::after(cue.after).await;
        }
        inputs.send(Input::Command(cue.command)).await;
    }
    inputs.send(Input::Shutdown).await;
}

/// Play `cues` into `service` in real time and block until the last
/// round trip has settled.
pub fn run_script(
    service: &mut FlowerpotService,
    cues: &[Cue],
    clock: &impl Clock,
    sink: &mut impl EventSink,
) {
    let inputs = InputChannel::new();
    let executor: edge_executor::LocalExecutor<'_, 8> = edge_executor::LocalExecutor::new();

    executor.spawn(feed(&inputs, cues)).detach();

    info!("Script started ({} cues)", cues.len());
    future::block_on(executor.run(drive(service, &inputs, clock, sink)));
}
