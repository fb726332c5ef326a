//! The logical operations of the nutrition core, independent of transport.

pub mod body;
pub mod diary;
pub mod goals;
pub mod profile;
