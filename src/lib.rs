//! # TinyGKit
//!
//! Telemetry decoding and machine-state tracking for TinyG and g2core
//! motion controllers speaking the JSON protocol.
//!
//! ## Architecture
//!
//! TinyGKit is organized as a workspace with multiple crates:
//!
//! 1. **tinygkit-core** - Errors, axis positions, tracker policies, event dispatch
//! 2. **tinygkit-communication** - Frame classification, code translation, state merge, controller
//! 3. **tinygkit-settings** - Configuration files and validation
//! 4. **tinygkit** - Replay binary that integrates all crates

pub use tinygkit_communication::firmware;

pub use tinygkit_core::{Axis, AxisPosition, Error, EventDispatcher, FooterPolicy, FrameError, Result};

pub use tinygkit_communication::firmware::tinyg::{
    Footer, MachineSnapshot, MachineState, ModalGroup, Notification, NotificationFilter, Overrides,
    ReportKind, StatusReport, TinyGController, TinyGSettings,
};
pub use tinygkit_communication::ControllerType;

pub use tinygkit_settings::{Config, LoggingSettings, TrackerSettings};

use serde::Serialize;
use std::io::BufRead;
use tokio::sync::mpsc;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Final state of a replay session, as printed by the binary
#[derive(Debug, Clone, Serialize)]
pub struct ReplaySummary {
    /// Lines read from the input
    pub lines: usize,
    /// Controller family guessed from the hardware platform
    pub controller: String,
    /// Last reported machine state
    pub machine_state: Option<MachineState>,
    /// Machine position
    pub machine_position: AxisPosition,
    /// Work position
    pub work_position: AxisPosition,
    /// Active modal groups
    pub modal: ModalGroup,
    /// Highest planner buffer availability seen
    pub planner_buffer_pool_size: u32,
    /// Device settings
    pub settings: TinyGSettings,
    /// Last footer
    pub footer: Footer,
}

impl ReplaySummary {
    /// Summarize the state of `controller` after `lines` lines
    pub fn new(controller: &TinyGController, lines: usize) -> Self {
        Self {
            lines,
            controller: controller.controller_type().to_string(),
            machine_state: controller.machine_state(),
            machine_position: controller.machine_position(),
            work_position: controller.work_position(),
            modal: controller.modal_group().clone(),
            planner_buffer_pool_size: controller.planner_buffer_pool_size(),
            settings: controller.settings().clone(),
            footer: controller.footer(),
        }
    }
}

/// Replay `reader` through `controller`, sending every notification to `tx`
///
/// Blocks while the channel is full, so no notification is dropped. Must be
/// called outside the async runtime (for example from `spawn_blocking`).
pub fn replay_to_channel<R: BufRead>(
    controller: &mut TinyGController,
    reader: R,
    tx: &mpsc::Sender<Notification>,
) -> Result<usize> {
    controller.replay(reader, |notification| {
        if tx.blocking_send(notification.clone()).is_err() {
            tracing::warn!("Notification receiver closed");
        }
    })
}

/// Initialize logging from the logging settings
///
/// Sets up structured logging with:
/// - `RUST_LOG` environment variable support, falling back to the configured level
/// - Pretty or JSON formatting on stderr, keeping stdout for command output
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    if settings.json {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .json();
        registry.with(fmt_layer).try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true)
            .pretty();
        registry.with(fmt_layer).try_init()?;
    }

    Ok(())
}
