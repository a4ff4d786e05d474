use crate::keys::DirectionalKeys;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

/// Raw mouse motion in device units, positive x right and positive y down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MouseDelta {
    pub dx: i32,
    pub dy: i32,
}

impl MouseDelta {
    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    fn pack(self) -> u64 {
        ((self.dx as u32 as u64) << 32) | self.dy as u32 as u64
    }

    fn unpack(bits: u64) -> Self {
        Self {
            dx: (bits >> 32) as u32 as i32,
            dy: bits as u32 as i32,
        }
    }
}

/// Everything the camera controller consumes for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputFrame {
    pub mouse: MouseDelta,
    pub keys: DirectionalKeys,
}

impl InputFrame {
    pub fn new(mouse: MouseDelta, keys: DirectionalKeys) -> Self {
        Self { mouse, keys }
    }
}

/// Input written by the platform's event source and drained once per frame.
///
/// Both mouse axes share one 64-bit word so a drain is a single atomic swap:
/// a concurrent write lands either wholly before or wholly after it.
/// Accumulation saturates instead of wrapping.
#[derive(Debug, Default)]
pub struct InputAccumulator {
    mouse: AtomicU64,
    keys: AtomicU8,
}

impl InputAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add relative mouse motion.
    pub fn add_mouse_delta(&self, dx: i32, dy: i32) {
        // The closure never returns None, so fetch_update cannot fail.
        let _ = self
            .mouse
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                let acc = MouseDelta::unpack(bits);
                Some(MouseDelta::new(acc.dx.saturating_add(dx), acc.dy.saturating_add(dy)).pack())
            });
    }

    /// Record a key press or release. Several keys may be passed at once.
    pub fn set_keys(&self, keys: DirectionalKeys, pressed: bool) {
        if pressed {
            self.keys.fetch_or(keys.bits(), Ordering::AcqRel);
        } else {
            self.keys.fetch_and(!keys.bits(), Ordering::AcqRel);
        }
    }

    /// Release every held key, e.g. when the window loses focus and the
    /// matching key-up events will never arrive.
    pub fn release_all(&self) {
        self.keys.store(0, Ordering::Release);
    }

    /// Currently held keys.
    pub fn keys(&self) -> DirectionalKeys {
        DirectionalKeys::from_bits_truncate(self.keys.load(Ordering::Acquire))
    }

    /// Mouse motion accumulated since the last drain, without consuming it.
    pub fn pending_mouse_delta(&self) -> MouseDelta {
        MouseDelta::unpack(self.mouse.load(Ordering::Acquire))
    }

    /// Take the accumulated mouse motion, resetting it to zero, together with
    /// the currently held keys.
    pub fn drain(&self) -> InputFrame {
        let mouse = MouseDelta::unpack(self.mouse.swap(0, Ordering::AcqRel));
        let frame = InputFrame::new(mouse, self.keys());
        tracing::trace!(dx = mouse.dx, dy = mouse.dy, keys = ?frame.keys, "drained input");
        frame
    }
}
