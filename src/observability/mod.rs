//! Observability for the validation engine
//!
//! Structured JSON logging of definition, lookup and rejection events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No effect on validation outcomes
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```
//! use datatypes::observability::{Event, Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! Logger::info(Event::ContextLoaded, &[("modules", "2")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

#[cfg(test)]
pub(crate) use logger::capture_events;
