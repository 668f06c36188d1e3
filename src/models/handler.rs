use std::sync::Arc;
use std::time::Instant;

use serenity::all::RoleId;

use super::giveaway::GiveawayStore;

#[derive(Clone)]
pub struct Handler {
    pub store: Arc<GiveawayStore>,
    pub giveaway_role: RoleId,
    pub prefix: String,
    pub start_time: Instant,
}

impl Handler {
    pub fn has_giveaway_role(&self, roles: &[RoleId]) -> bool {
        roles.contains(&self.giveaway_role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler() -> Handler {
        Handler {
            store: Arc::new(GiveawayStore::new()),
            giveaway_role: RoleId::new(5),
            prefix: "!".to_string(),
            start_time: Instant::now(),
        }
    }

    #[test]
    fn role_gate_requires_the_configured_role() {
        let handler = handler();

        assert!(handler.has_giveaway_role(&[RoleId::new(1), RoleId::new(5)]));
        assert!(!handler.has_giveaway_role(&[RoleId::new(1), RoleId::new(2)]));
        assert!(!handler.has_giveaway_role(&[]));
    }
}
