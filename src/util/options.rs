//! Runtime options.
//!
//! Every option has a type, a validator and a default. Defaults can be overridden by environment
//! variables named after the option with the `TAGHEAP_` prefix (e.g. `TAGHEAP_STRESS_FACTOR=4096`),
//! and afterwards through [`crate::runtime::RuntimeBuilder::set_option`].

use crate::util::constants::*;
use std::default::Default;

/// The default number of bytes reserved for the shadow stack.
pub const DEFAULT_STACK_SIZE: usize = 64 << LOG_BYTES_IN_KBYTE;
/// The default lower bound of a single heap growth.
pub const DEFAULT_MIN_GROWTH_BYTES: usize = BYTES_IN_PAGE;

fn always_valid<T>(_: &T) -> bool {
    true
}

macro_rules! options {
    ($($name:ident: $type:ty[$validator:expr] = $default:expr),*,) => [
        options!($($name: $type[$validator] = $default),*);
    ];
    ($($name:ident: $type:ty[$validator:expr] = $default:expr),*) => [
        #[derive(Clone, Debug)]
        pub struct Options {
            $(pub $name: $type),*
        }
        impl Options {
            /// Set an option from its name and a string value. Returns true if the option exists,
            /// the value parses and the value is valid. Otherwise the option keeps its old value.
            pub fn set_from_str(&mut self, s: &str, val: &str) -> bool {
                match s {
                    // Parse the given value from str (by env vars or by the builder) to the right type
                    $(stringify!($name) => if let Ok(ref val) = val.parse::<$type>() {
                        // Validate
                        let validate_fn = $validator;
                        let is_valid = validate_fn(val);
                        if is_valid {
                            // Only set value if valid.
                            self.$name = val.clone();
                        } else {
                            warn!("Unable to set {}={:?}. Invalid value. Keeping {:?}.", s, val, self.$name);
                        }
                        is_valid
                    } else {
                        warn!("Unable to set {}={:?}. Cannot parse value. Keeping {:?}.", s, val, self.$name);
                        false
                    })*
                    _ => {
                        warn!("Unknown option {}", s);
                        false
                    }
                }
            }

            /// The defaults, ignoring environment variables.
            pub fn new_with_defaults() -> Self {
                Options {
                    $($name: $default),*
                }
            }

            fn read_env_var_settings(&mut self) {
                const PREFIX: &str = "TAGHEAP_";
                for (key, val) in std::env::vars() {
                    // strip the prefix, and get the lower case string
                    if let Some(rest_of_key) = key.strip_prefix(PREFIX) {
                        let lowercase: &str = &rest_of_key.to_lowercase();
                        match lowercase {
                            $(stringify!($name) => { self.set_from_str(lowercase, &val); },)*
                            _ => {}
                        }
                    }
                }
            }
        }
    ]
}

options! {
    // The number of bytes below the stack base reserved for the shadow stack.
    stack_size:       usize [|v: &usize| *v >= BYTES_IN_WORD && *v % BYTES_IN_WORD == 0] = DEFAULT_STACK_SIZE,
    // The largest size the linear memory may grow to, in 64 KiB pages.
    max_memory_pages: usize [|v: &usize| (1..=MAX_PAGES).contains(v)] = MAX_PAGES,
    // Force a collection once this many bytes have been allocated since the last one.
    stress_factor:    usize [always_valid] = DEFAULT_STRESS_FACTOR,
    // The smallest capacity a single heap growth adds to each semispace.
    min_growth_bytes: usize [|v: &usize| *v % BYTES_IN_WORD == 0] = DEFAULT_MIN_GROWTH_BYTES,
    // Zero the abandoned from-space after each collection so stale pointers read as null.
    zero_on_release:  bool  [always_valid] = false,
}

impl Options {
    /// Set multiple options from a string of whitespace separated `key=value` pairs, such as
    /// `"stress_factor=4096 zero_on_release=true"`. Returns true if all of them are set.
    pub fn set_bulk_from_str(&mut self, options: &str) -> bool {
        let mut all_ok = true;
        for opt in options.split_ascii_whitespace() {
            match opt.split_once('=') {
                Some((key, val)) => all_ok &= self.set_from_str(key, val),
                None => {
                    warn!("Option {:?} is not a key=value pair", opt);
                    all_ok = false;
                }
            }
        }
        all_ok
    }

    /// Is stress collection enabled?
    pub fn is_stress_test_gc_enabled(&self) -> bool {
        self.stress_factor != DEFAULT_STRESS_FACTOR
    }
}

impl Default for Options {
    /// The defaults, overridden by any valid `TAGHEAP_*` environment variables.
    fn default() -> Self {
        let mut options = Self::new_with_defaults();
        options.read_env_var_settings();
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_util::{serial_test, with_cleanup};

    #[test]
    fn no_env_var() {
        serial_test(|| {
            let options = Options::default();
            assert_eq!(options.stress_factor, DEFAULT_STRESS_FACTOR);
            assert_eq!(options.stack_size, DEFAULT_STACK_SIZE);
            assert!(!options.is_stress_test_gc_enabled());
        })
    }

    #[test]
    fn with_valid_env_var() {
        serial_test(|| {
            with_cleanup(
                || {
                    std::env::set_var("TAGHEAP_STRESS_FACTOR", "4096");

                    let options = Options::default();
                    assert_eq!(options.stress_factor, 4096);
                    assert!(options.is_stress_test_gc_enabled());
                },
                || {
                    std::env::remove_var("TAGHEAP_STRESS_FACTOR");
                },
            )
        })
    }

    #[test]
    fn with_multiple_valid_env_vars() {
        serial_test(|| {
            with_cleanup(
                || {
                    std::env::set_var("TAGHEAP_STRESS_FACTOR", "4096");
                    std::env::set_var("TAGHEAP_ZERO_ON_RELEASE", "true");

                    let options = Options::default();
                    assert_eq!(options.stress_factor, 4096);
                    assert!(options.zero_on_release);
                },
                || {
                    std::env::remove_var("TAGHEAP_STRESS_FACTOR");
                    std::env::remove_var("TAGHEAP_ZERO_ON_RELEASE");
                },
            )
        })
    }

    #[test]
    fn with_invalid_env_var_value() {
        serial_test(|| {
            with_cleanup(
                || {
                    // invalid value, we cannot parse the value, so use the default value
                    std::env::set_var("TAGHEAP_STRESS_FACTOR", "abc");

                    let options = Options::default();
                    assert_eq!(options.stress_factor, DEFAULT_STRESS_FACTOR);
                },
                || {
                    std::env::remove_var("TAGHEAP_STRESS_FACTOR");
                },
            )
        })
    }

    #[test]
    fn with_invalid_env_var_key() {
        serial_test(|| {
            with_cleanup(
                || {
                    std::env::set_var("TAGHEAP_ABC", "42");

                    let options = Options::default();
                    assert_eq!(options.stress_factor, DEFAULT_STRESS_FACTOR);
                },
                || {
                    std::env::remove_var("TAGHEAP_ABC");
                },
            )
        })
    }

    #[test]
    fn validator_rejects_out_of_range() {
        serial_test(|| {
            let mut options = Options::default();
            assert!(!options.set_from_str("max_memory_pages", "0"));
            assert!(!options.set_from_str("max_memory_pages", "65536"));
            assert_eq!(options.max_memory_pages, MAX_PAGES);
            assert!(options.set_from_str("max_memory_pages", "16"));
            assert_eq!(options.max_memory_pages, 16);
            assert!(!options.set_from_str("stack_size", "6"));
        })
    }

    #[test]
    fn bulk() {
        serial_test(|| {
            let mut options = Options::default();
            assert!(options.set_bulk_from_str("stress_factor=64 min_growth_bytes=128"));
            assert_eq!(options.stress_factor, 64);
            assert_eq!(options.min_growth_bytes, 128);
            assert!(!options.set_bulk_from_str("stress_factor=1 no_such_option=3"));
            assert_eq!(options.stress_factor, 1);
            assert!(!options.set_bulk_from_str("stress_factor"));
        })
    }
}
