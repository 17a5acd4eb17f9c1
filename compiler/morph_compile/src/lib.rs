//! Morph Compile - compiles shape-to-shape conversion routines.
//!
//! Given a source shape, a destination shape and a [`MappingConfig`], the
//! [`Compiler`] produces a routine plan: an IR program for records and
//! primitives or a collection plan for collection destinations. Lowering
//! turns the plan into a [`CompiledRoutine`] made of closures, and the
//! [`RoutineRegistry`] caches routines so each pair is compiled once.
//!
//! # Pipeline
//!
//! ```text
//! (from, to, config) -> Compiler -> RoutinePlan -> lower -> CompiledRoutine
//!                                                               |
//!                      member / element sub-routines  <- LazyRoutine (resolved
//!                                                         through the registry)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let registry = RoutineRegistry::new(Arc::new(pool));
//! let config = Arc::new(MappingConfig::new("api"));
//! let routine = registry.get_or_compile(person, person_dto, &config)?;
//! let dto = routine.map(&person_value)?;
//! ```

mod collection;
mod compiler;
mod config;
mod construct;
mod convert;
mod error;
mod lower;
mod registry;
mod routine;
mod rules;
mod stack;

#[cfg(test)]
mod test_helpers;

use std::sync::Once;

pub use collection::{plan_collection, CollectionKind, CollectionPlan, ElementRoute};
pub use compiler::{Compiler, RoutinePlan};
pub use config::{ConfigId, ConverterFn, CopyMode, MappingConfig};
pub use construct::{create_instance_program, Construction};
pub use convert::{can_convert, convert_primitive};
pub use error::{CompileError, ConversionError};
pub use registry::RoutineRegistry;
pub use routine::{CompiledRoutine, LazyRoutine, RoutineKey};
pub use rules::{MemberPair, MemberRules, NameMatchRules};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=morph_compile=debug`; `trace` also dumps the IR of
/// every lowered routine.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
