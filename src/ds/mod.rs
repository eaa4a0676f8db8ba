//! Data structures underpinning the eviction policies.
//!
//! - [`SlotArena`]: slab with free-list reuse and stable [`SlotId`] handles.
//! - [`OrderList`]: doubly-linked order queue over arena slots (FIFO queue,
//!   LRU/MRU recency order).
//! - [`FrequencyBuckets`]: frequency → insertion-ordered key buckets with a
//!   minimum marker (LFU).

mod frequency_buckets;
mod order_list;
mod slot_arena;

pub use frequency_buckets::FrequencyBuckets;
pub use order_list::OrderList;
pub use slot_arena::{SlotArena, SlotId};
