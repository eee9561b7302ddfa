//! Repository Implementations
//!
//! Domain層のRepository traitの具体的な実装

pub mod json_provenance_repository;
