// handlers/mod.rs - HTTP handlers
//
// Access control runs in middleware before any of these are reached, so the
// handlers only deal with parsing, delegation and rendering.
pub mod docs;
pub mod person;
pub mod system;
