//! Domain entities: structs mapped one-to-one onto MongoDB collections.
//!
//! Every entity carries `#[serde(rename = "_id")]` on its optional id and
//! bson `DateTime` timestamps, and is persisted through its matching
//! `#[repository]` component.

pub mod accounts;
pub mod banking;
pub mod commerce;
pub mod courses;
pub mod messaging;
pub mod students;
