//! Data models for the Gummyte admin API.
//!
//! - `SignupRecord`, `MessageRecord`: the two admin collections, unified as `Record`
//! - `RecordKind`: selects the collection and its expected shape
//! - `ContactForm`, `NotifyRequest`: public form payloads

pub mod forms;
pub mod record;

pub use forms::{ContactForm, NotifyRequest};
pub use record::{sort_newest_first, MessageRecord, Record, RecordKind, SignupRecord};
