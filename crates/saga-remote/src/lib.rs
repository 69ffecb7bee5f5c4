//! Talking to the saga generation service, and surviving when it fails.
//!
//! # Architecture
//!
//! - **service**: `GenerationService` trait with a blocking HTTP implementation
//! - **summon**: fetch → decode → judge, substituting the demo bundle on any failure
//! - **aux**: lore, chat and quest calls whose JSON replies are resolved into `AuxReply`

pub mod aux;
pub mod service;
pub mod summon;

pub use aux::{AuxReply, ChatReply, ChatTurn, Lore, Quest};
#[cfg(feature = "http")]
pub use service::HttpService;
pub use service::{GenerationService, ScriptRequest, ServiceError};
pub use summon::{Saga, SummonError, SummonOptions, summon};
