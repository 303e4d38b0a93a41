pub(super) mod gc_work;
pub(super) mod global;

pub use self::global::SemiSpace;
