//! Compact full-text indices over a byte string: an online suffix
//! automaton (DAWG), a heavy-path decomposition of it, and four query-time
//! structures that trade space for lookup speed by walking the heavy path
//! in large jumps instead of one byte at a time.

pub mod byte_map;
pub mod dawg;
pub mod heavy;
mod ids;
pub mod index;
pub mod la;
pub mod query;

pub use ids::NodeIndex;
pub use index::Index;
