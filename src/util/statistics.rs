//! Collection statistics.

use crate::object::ObjectKind;

use enum_map::EnumMap;
use std::fmt;

/// Counters kept by the runtime over its whole lifetime.
#[derive(Debug, Default, Clone)]
pub struct GcStats {
    /// Completed collections.
    pub collections: usize,
    /// Times the heap was grown from the host.
    pub heap_growths: usize,
    /// Bytes handed out by the allocator, after rounding.
    pub bytes_allocated: usize,
    /// Objects copied by the collector, per kind.
    pub objects_copied: EnumMap<ObjectKind, usize>,
    /// Bytes copied by the collector, per kind.
    pub bytes_copied: EnumMap<ObjectKind, usize>,
    /// Root slots that pointed at a live object, over all collections.
    pub roots_traced: usize,
    /// Bytes in the active semispace right after the last collection.
    pub live_bytes: usize,
}

impl GcStats {
    pub(crate) fn record_alloc(&mut self, bytes: usize) {
        self.bytes_allocated += bytes;
    }

    pub(crate) fn record_copy(&mut self, kind: ObjectKind, bytes: usize) {
        self.objects_copied[kind] += 1;
        self.bytes_copied[kind] += bytes;
    }

    pub(crate) fn record_collection(&mut self, roots: usize, live_bytes: usize) {
        self.collections += 1;
        self.roots_traced += roots;
        self.live_bytes = live_bytes;
    }

    pub(crate) fn record_growth(&mut self) {
        self.heap_growths += 1;
    }

    pub fn total_objects_copied(&self) -> usize {
        self.objects_copied.values().sum()
    }

    pub fn total_bytes_copied(&self) -> usize {
        self.bytes_copied.values().sum()
    }
}

impl fmt::Display for GcStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "collections: {}, growths: {}, allocated: {} bytes, live: {} bytes",
            self.collections, self.heap_growths, self.bytes_allocated, self.live_bytes
        )?;
        for (kind, objects) in self.objects_copied.iter() {
            if *objects > 0 {
                let name: &'static str = kind.into();
                writeln!(
                    f,
                    "  copied {:<8} {} objects, {} bytes",
                    name, objects, self.bytes_copied[kind]
                )?;
            }
        }
        Ok(())
    }
}
