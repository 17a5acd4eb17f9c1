//! Mapping configuration.
//!
//! A [`MappingConfig`] is the configuration identity routines are cached
//! under. It selects shallow or deep copying, supplies the member
//! correspondence rules and holds custom converters.

use std::fmt;
use std::sync::Arc;

use morph_ir::ConverterId;
use morph_types::ShapeId;
use morph_value::Value;

use crate::rules::{MemberRules, NameMatchRules};
use crate::ConversionError;

/// Whether nested records and collections are re-created or shared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CopyMode {
    /// Same-shape members and collection elements are shared by reference.
    Shallow,
    /// Nested records and collections are converted recursively.
    #[default]
    Deep,
}

/// Name identifying a configuration in the routine cache.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigId(Arc<str>);

impl ConfigId {
    pub fn new(name: &str) -> Self {
        ConfigId(Arc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// User conversion: `(source, state) -> converted value`.
pub type ConverterFn = Arc<dyn Fn(&Value, &Value) -> Result<Value, ConversionError> + Send + Sync>;

#[derive(Clone)]
struct CustomConverter {
    from: ShapeId,
    to: ShapeId,
    func: ConverterFn,
}

/// Configuration a routine is compiled under.
///
/// Two configurations with the same name are the same configuration as far
/// as the routine cache is concerned.
#[derive(Clone)]
pub struct MappingConfig {
    id: ConfigId,
    copy_mode: CopyMode,
    rules: Arc<dyn MemberRules>,
    converters: Vec<CustomConverter>,
}

impl MappingConfig {
    /// Deep-copying configuration matching members by name.
    pub fn new(name: &str) -> Self {
        MappingConfig {
            id: ConfigId::new(name),
            copy_mode: CopyMode::Deep,
            rules: Arc::new(NameMatchRules::new()),
            converters: Vec::new(),
        }
    }

    #[must_use]
    pub fn shallow(self) -> Self {
        self.with_copy_mode(CopyMode::Shallow)
    }

    #[must_use]
    pub fn deep(self) -> Self {
        self.with_copy_mode(CopyMode::Deep)
    }

    #[must_use]
    pub fn with_copy_mode(mut self, copy_mode: CopyMode) -> Self {
        self.copy_mode = copy_mode;
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: impl MemberRules + 'static) -> Self {
        self.rules = Arc::new(rules);
        self
    }

    /// Register a converter for the `(from, to)` pair. A later registration
    /// for the same pair replaces the earlier one.
    #[must_use]
    pub fn with_converter<F>(mut self, from: ShapeId, to: ShapeId, func: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<Value, ConversionError> + Send + Sync + 'static,
    {
        self.converters.retain(|c| (c.from, c.to) != (from, to));
        self.converters.push(CustomConverter {
            from,
            to,
            func: Arc::new(func),
        });
        self
    }

    #[inline]
    pub fn id(&self) -> &ConfigId {
        &self.id
    }

    #[inline]
    pub fn copy_mode(&self) -> CopyMode {
        self.copy_mode
    }

    #[inline]
    pub fn rules(&self) -> &dyn MemberRules {
        &*self.rules
    }

    /// Converter registered for exactly this pair.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "converter count never approaches u32::MAX"
    )]
    pub fn converter_for(&self, from: ShapeId, to: ShapeId) -> Option<ConverterId> {
        self.converters
            .iter()
            .position(|c| c.from == from && c.to == to)
            .map(|index| ConverterId::new(index as u32))
    }

    pub fn converter(&self, id: ConverterId) -> Option<&ConverterFn> {
        self.converters.get(id.index()).map(|c| &c.func)
    }
}

impl Default for MappingConfig {
    fn default() -> Self {
        MappingConfig::new("default")
    }
}

impl fmt::Debug for MappingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingConfig")
            .field("id", &self.id)
            .field("copy_mode", &self.copy_mode)
            .field("rules", &self.rules)
            .field("converters", &self.converters.len())
            .finish()
    }
}
