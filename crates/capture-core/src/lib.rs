//! Capture lifecycle for web page fragments.
//!
//! Provides:
//! - Capture record schema
//! - Context-menu triggers
//! - Capture producer and page responders
//! - Bounded capture storage
//! - Host request/response messages

pub mod message;
pub mod producer;
pub mod schema;
pub mod storage;
pub mod trigger;

pub use message::{CaptureAck, Request, Response};
pub use producer::{
    CaptureError, Captured, CommandResponder, NoResponder, PageError, PageResponder, Producer,
    responder_from_config,
};
pub use schema::{Capture, CaptureRecord, CaptureType, PageContent, PageImage, PageMetadata};
pub use storage::{CaptureStore, FileCaptureStore, MAX_CAPTURES, MemoryCaptureStore, StoreError};
pub use trigger::{MENU_ITEMS, MenuItem, Trigger, TriggerError};
