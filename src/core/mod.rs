//! Runtime core: run orchestration.
//!
//! The public API from this module is [`Runner`] (with [`RunnerBuilder`] and
//! [`make_runner`]) and its [`Config`].
//!
//! Internal modules:
//! - [`run`]: drives one item list (step / complete / advance / settle);
//! - [`state`]: per-run slots, retry buckets and results;
//! - [`invoker`]: pacing timers;
//! - [`attempt`]: issues one worker call with panic isolation;
//! - [`runner`]: shared context and the public entry points;
//! - [`builder`]: hook and sink wiring.

mod attempt;
mod builder;
mod config;
mod invoker;
mod run;
mod runner;
mod state;


pub use builder::RunnerBuilder;
pub use config::Config;
pub use runner::{Runner, make_runner};
