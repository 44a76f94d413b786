//! Linear undo/redo over full scene snapshots.

use pipecad_ir::ComponentInstance;
use std::collections::VecDeque;

/// Maximum number of snapshots kept.
pub const HISTORY_LIMIT: usize = 50;

/// A deep copy of the scene at one point in time.
pub type Snapshot = Vec<ComponentInstance>;

/// Bounded undo/redo stack.
///
/// Starts with a single empty-scene snapshot. `index` points at the
/// snapshot matching the live scene.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<Snapshot>,
    index: usize,
    limit: usize,
}

impl History {
    /// Empty history with the standard bound.
    pub fn new() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }

    /// Empty history keeping at most `limit` snapshots (at least one).
    pub fn with_limit(limit: usize) -> Self {
        let mut snapshots = VecDeque::with_capacity(limit.max(1));
        snapshots.push_back(Snapshot::new());
        Self {
            snapshots,
            index: 0,
            limit: limit.max(1),
        }
    }

    /// Record `scene` as the newest state.
    ///
    /// Drops any redo tail and evicts the oldest snapshot past the bound.
    /// Returns `false` (and changes nothing) when `scene` equals the
    /// current snapshot.
    pub fn commit(&mut self, scene: &[ComponentInstance]) -> bool {
        if self.snapshots[self.index].as_slice() == scene {
            return false;
        }
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push_back(scene.to_vec());
        if self.snapshots.len() > self.limit {
            self.snapshots.pop_front();
        }
        self.index = self.snapshots.len() - 1;
        true
    }

    /// Step back; returns the scene to restore, or `None` at the oldest.
    pub fn undo(&mut self) -> Option<&[ComponentInstance]> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.snapshots[self.index].as_slice())
    }

    /// Step forward; returns the scene to restore, or `None` at the newest.
    pub fn redo(&mut self) -> Option<&[ComponentInstance]> {
        if self.index + 1 >= self.snapshots.len() {
            return None;
        }
        self.index += 1;
        Some(self.snapshots[self.index].as_slice())
    }

    /// Whether [`History::undo`] would move.
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Whether [`History::redo`] would move.
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    /// The snapshot at the current index.
    pub fn current(&self) -> &[ComponentInstance] {
        &self.snapshots[self.index]
    }

    /// Number of snapshots held.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false: history holds at least the initial snapshot.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Position of the current snapshot.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Forget everything and start over from `scene`.
    pub fn reset(&mut self, scene: &[ComponentInstance]) {
        self.snapshots.clear();
        self.snapshots.push_back(scene.to_vec());
        self.index = 0;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
