//! Blend-mode lookup table.
//!
//! Maps a mode key to its per-channel blend function and, where one exists,
//! the native bulk operation a raster backend may provide for it. Lookup is a
//! direct match on the key; there is no probing of strategies.
//!
//! | key        | blend fn                          | native op            |
//! |------------|-----------------------------------|----------------------|
//! | `opacity`  | [`blend::opacity`](crate::blend::opacity)   | [`NativeOp::Over`]     |
//! | `multiply` | [`blend::multiply`](crate::blend::multiply) | [`NativeOp::Multiply`] |
//! | `screen`   | [`blend::screen`](crate::blend::screen)     | [`NativeOp::Screen`]   |
//! | `overlay`  | [`blend::overlay`](crate::blend::overlay)   | none                 |

use crate::blend::{self, BlendMode, PixelBlendFn};
use crate::OpsResult;
use aquamark_core::NativeOp;

/// Everything the composite engine needs to run one blend mode.
#[derive(Debug, Clone, Copy)]
pub struct BlendEntry {
    /// Mode this entry implements.
    pub mode: BlendMode,
    /// Per-channel blend for the manual path.
    pub blender: PixelBlendFn,
    /// Bulk operation for the native path, if any backend can offer one.
    pub native: Option<NativeOp>,
}

static ENTRIES: [BlendEntry; 4] = [
    BlendEntry {
        mode: BlendMode::Opacity,
        blender: blend::opacity,
        native: Some(NativeOp::Over),
    },
    BlendEntry {
        mode: BlendMode::Multiply,
        blender: blend::multiply,
        native: Some(NativeOp::Multiply),
    },
    BlendEntry {
        mode: BlendMode::Screen,
        blender: blend::screen,
        native: Some(NativeOp::Screen),
    },
    BlendEntry {
        mode: BlendMode::Overlay,
        blender: blend::overlay,
        native: None,
    },
];

/// Fixed registry of the four blend modes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlendModeRegistry;

impl BlendModeRegistry {
    /// Resolves a settings key, failing with
    /// [`OpsError::UnsupportedBlendMode`] for anything unregistered.
    pub fn resolve(&self, key: &str) -> OpsResult<&'static BlendEntry> {
        let mode: BlendMode = key.parse()?;
        Ok(self.get(mode))
    }

    /// Entry for a typed mode. Always present.
    pub fn get(&self, mode: BlendMode) -> &'static BlendEntry {
        match mode {
            BlendMode::Opacity => &ENTRIES[0],
            BlendMode::Multiply => &ENTRIES[1],
            BlendMode::Screen => &ENTRIES[2],
            BlendMode::Overlay => &ENTRIES[3],
        }
    }

    /// Canonical pass-through entry.
    pub fn default_entry(&self) -> &'static BlendEntry {
        self.get(BlendMode::default())
    }

    /// Registered entries in key order.
    pub fn entries(&self) -> &'static [BlendEntry] {
        &ENTRIES
    }

    /// Whether `key` names a registered mode.
    pub fn contains(&self, key: &str) -> bool {
        self.resolve(key).is_ok()
    }
}
