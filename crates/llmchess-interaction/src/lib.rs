//! Talking to the completion service.
//!
//! [`CompletionService`] is the network seam; [`OpenAiCompatibleAgent`] is the
//! production implementation and [`CompletionClient`] adds the retry, throttle
//! and accounting policy the game loop relies on.

pub mod client;
pub mod completion;
pub mod openai_compatible;

pub use client::{BackoffPolicy, ClientContext, CompletionClient, ExponentialBackoff, NoBackoff};
pub use completion::{CompletionRequest, CompletionResponse, CompletionService};
pub use openai_compatible::OpenAiCompatibleAgent;
