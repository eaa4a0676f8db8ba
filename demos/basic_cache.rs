//! Minimal walkthrough of one cache per policy.

use cachelab::cache::PolicyCache;
use cachelab::policy::PolicyKind;

fn main() {
    for kind in PolicyKind::all() {
        let mut cache = PolicyCache::new(kind, 3);
        cache.put(1, "first");
        cache.put(2, "second");
        cache.put(3, "third");

        // Touch key 1, then overflow the cache.
        cache.get(&1);
        cache.put(4, "fourth");

        let stats = cache.stats();
        println!(
            "{kind}: kept {:?}, hit rate {:.1}%",
            cache.eviction_order(),
            stats.hit_rate
        );
    }
}
