pub use crate::cache::PolicyCache;
pub use crate::config::{
    CacheConfig, DelayConfig, Distribution, PoissonParams, Scenario, SimulationConfig,
    WeightedParams,
};
pub use crate::ds::{FrequencyBuckets, OrderList, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError, UnknownPolicy};
pub use crate::manager::CacheRegistry;
pub use crate::policy::{PolicyKind, PolicyState};
pub use crate::provider::{ReadStats, TextArchive};
pub use crate::stats::{CacheStats, PolicyReport, RegistryComparison};
pub use crate::store::{EntryMeta, EntryStore};
pub use crate::workload::{RequestGenerator, RunResult, SimulationReport, Simulator};
