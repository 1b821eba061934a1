use std::any::Any;

use nestview_core::{Bounds, ListError, Vec3};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

new_key_type! {
    pub struct WorkspaceId;
}

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("workspace setup failed: {0}")]
    Setup(#[from] ListError),
    #[error("unknown workspace")]
    Unknown,
}

/// A panel living in the scene.
pub trait Workspace: Any {
    /// First-time setup, called once by the host right after the workspace
    /// is added and its host connections are made.
    fn setup(&mut self) -> Result<(), WorkspaceError>;

    /// Region a "vacuum" gesture can grab the workspace by.
    fn vacuum_bounds(&self) -> Bounds;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

type DestroyedListener = Box<dyn FnMut(WorkspaceId)>;

/// Owns open workspaces and tells listeners when one goes away.
#[derive(Default)]
pub struct WorkspaceHost {
    workspaces: SlotMap<WorkspaceId, Box<dyn Workspace>>,
    destroyed: Vec<DestroyedListener>,
}

impl WorkspaceHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add and set up a workspace. A failed setup leaves nothing behind.
    pub fn open(&mut self, mut workspace: Box<dyn Workspace>) -> Result<WorkspaceId, WorkspaceError> {
        workspace.setup()?;
        let id = self.workspaces.insert(workspace);
        log::info!("workspace {id:?} opened");
        Ok(id)
    }

    /// Remove a workspace and fire the destroyed notification.
    pub fn close(&mut self, id: WorkspaceId) -> Result<(), WorkspaceError> {
        self.workspaces.remove(id).ok_or(WorkspaceError::Unknown)?;
        log::info!("workspace {id:?} closed");
        for listener in &mut self.destroyed {
            listener(id);
        }
        Ok(())
    }

    pub fn on_destroyed(&mut self, f: impl FnMut(WorkspaceId) + 'static) {
        self.destroyed.push(Box::new(f));
    }

    pub fn get_mut<T: Workspace>(&mut self, id: WorkspaceId) -> Option<&mut T> {
        self.workspaces
            .get_mut(id)
            .and_then(|w| w.as_any_mut().downcast_mut::<T>())
    }

    /// Workspaces whose vacuum bounds contain `point`.
    pub fn vacuumable_at(&self, point: Vec3) -> Vec<WorkspaceId> {
        self.workspaces
            .iter()
            .filter(|(_, w)| w.vacuum_bounds().contains(point))
            .map(|(id, _)| id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.workspaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty()
    }
}
