//! Scheduling infrastructure for channel sync jobs
//!
//! - [`TaskJobDispatcher`] runs each submitted job on its own tokio task.
//! - [`ChannelSyncScheduler`] enqueues jobs for every active channel
//!   configuration on a cron schedule, with explicit start/stop, a
//!   cancellation token and timeouts on every lifecycle step.

pub mod channel_scheduler;
pub mod dispatcher;
pub mod error;

pub use channel_scheduler::{enqueue_active_channels, ChannelSchedulerConfig, ChannelSyncScheduler};
pub use dispatcher::TaskJobDispatcher;
pub use error::{SchedulerError, SchedulerResult};
