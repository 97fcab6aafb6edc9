use crate::actor::capability;
use crate::{Actor, ScopeTable};

/// Decides which configured spawn groups an actor belongs to.
///
/// A group is configured once any entry is stored for it. Membership is the
/// `playerspawn.group.<name>` capability.
#[derive(Clone)]
pub struct GroupMembership {
    table: ScopeTable,
}

impl GroupMembership {
    pub fn new(table: ScopeTable) -> Self {
        Self { table }
    }

    /// The actor's groups in configured order.
    pub fn groups_for(&self, actor: &dyn Actor) -> Vec<String> {
        self.table
            .configured_groups()
            .into_iter()
            .filter(|group| actor.has_capability(&capability::group_member(group)))
            .collect()
    }
}
