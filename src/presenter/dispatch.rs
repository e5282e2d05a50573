use uuid::Uuid;

/// Routes the process-wide cancel gesture (Escape) to the presenter that
/// currently owns it.
///
/// At most one presenter is ever editing, so ownership is a single slot:
/// acquired on entering edit mode, released on every exit path. Keeping the
/// slot here instead of scattering listener registration across presenters is
/// what makes the leak-on-forgotten-unregister failure mode impossible.
#[derive(Debug, Default)]
pub struct CancelDispatcher {
    owner: Option<Uuid>,
}

impl CancelDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand the cancel gesture to a presenter, displacing any previous owner.
    pub fn acquire(&mut self, waypoint: Uuid) {
        self.owner = Some(waypoint);
    }

    /// Release ownership. No-op unless `waypoint` is the current owner, so a
    /// presenter closed after being displaced cannot drop someone else's claim.
    pub fn release(&mut self, waypoint: Uuid) {
        if self.owner == Some(waypoint) {
            self.owner = None;
        }
    }

    /// Presenter the next cancel gesture should be forwarded to.
    pub fn owner(&self) -> Option<Uuid> {
        self.owner
    }
}
