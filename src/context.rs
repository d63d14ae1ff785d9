//! Per-call coordination state.
//!
//! One [`WriteContext`] is created for each top-level write and passed by
//! `&mut` through every nested procedure. The scoped helpers change a flag
//! for the duration of a closure and restore the previous value afterwards,
//! whether the closure succeeded or returned an error.

use crate::engine::Engine;
use crate::format::Format;
use crate::Result;
use std::fmt;

/// Flags consulted by nested procedures during one top-level write.
pub struct WriteContext<'e> {
    engine: &'e Engine,
    format: Format,
    key_depth: usize,
    writing_map_value: bool,
    writing_dynamic: bool,
}

impl<'e> WriteContext<'e> {
    pub(crate) fn new(engine: &'e Engine, format: Format) -> Self {
        WriteContext {
            engine,
            format,
            key_depth: 0,
            writing_map_value: false,
            writing_dynamic: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn engine(&self) -> &'e Engine {
        self.engine
    }

    #[inline]
    #[must_use]
    pub fn format(&self) -> Format {
        self.format
    }

    /// Number of map keys currently being written, counting nested ones.
    #[inline]
    #[must_use]
    pub fn key_depth(&self) -> usize {
        self.key_depth
    }

    #[inline]
    #[must_use]
    pub fn is_writing_map_value(&self) -> bool {
        self.writing_map_value
    }

    /// Set while writing a value whose declared type was polymorphic.
    #[inline]
    #[must_use]
    pub fn is_writing_dynamic(&self) -> bool {
        self.writing_dynamic
    }

    /// Writes the null token of the active format.
    pub fn write_null(&self, out: &mut dyn fmt::Write) -> Result<()> {
        out.write_str(self.format.null_token())?;
        Ok(())
    }

    /// Runs `f` while writing a map key.
    pub fn with_key<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        let saved = self.writing_map_value;
        self.key_depth += 1;
        self.writing_map_value = false;
        let result = f(self);
        self.key_depth -= 1;
        self.writing_map_value = saved;
        result
    }

    /// Runs `f` with the map-value flag set to `value`.
    pub fn with_map_value<R>(
        &mut self,
        value: bool,
        f: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        let saved = std::mem::replace(&mut self.writing_map_value, value);
        let result = f(self);
        self.writing_map_value = saved;
        result
    }

    /// Runs `f` with the dynamic flag set to `value`.
    pub fn with_dynamic<R>(
        &mut self,
        value: bool,
        f: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        let saved = std::mem::replace(&mut self.writing_dynamic, value);
        let result = f(self);
        self.writing_dynamic = saved;
        result
    }
}

impl fmt::Debug for WriteContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteContext")
            .field("format", &self.format)
            .field("key_depth", &self.key_depth)
            .field("writing_map_value", &self.writing_map_value)
            .field("writing_dynamic", &self.writing_dynamic)
            .finish()
    }
}
