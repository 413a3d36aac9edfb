//! Flutter-facing bindings for the Bookshelf inventory core.

pub mod api;
