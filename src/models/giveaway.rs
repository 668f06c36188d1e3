use std::collections::HashMap;
use std::sync::Mutex;

use serenity::all::{ChannelId, MessageId};
use time::OffsetDateTime;
use tokio::task::AbortHandle;

/// A giveaway whose completion timer has not yet fired. The timer handle is
/// owned exclusively by this record; early termination aborts it.
#[derive(Debug, Clone)]
pub struct ActiveGiveaway {
    pub channel_id: ChannelId,
    pub prize: String,
    pub winner_count: u32,
    pub timer: AbortHandle,
}

/// A giveaway for which winners have been drawn and announced. Rerolls read
/// this record and edit the result message in place.
#[derive(Debug, Clone)]
pub struct EndedGiveaway {
    pub channel_id: ChannelId,
    pub prize: String,
    pub winner_count: u32,
    pub ended_at: OffsetDateTime,
    pub result_message_id: MessageId,
}

/// Process-wide registry of giveaway state, keyed by the announcement message
/// id. A message id lives in at most one of the two maps at any time. All
/// state is volatile; giveaways still active at shutdown are lost.
#[derive(Debug, Default)]
pub struct GiveawayStore {
    active: Mutex<HashMap<MessageId, ActiveGiveaway>>,
    ended: Mutex<HashMap<MessageId, EndedGiveaway>>,
}

impl GiveawayStore {
    pub fn new() -> Self {
        GiveawayStore::default()
    }

    pub fn register(&self, message_id: MessageId, giveaway: ActiveGiveaway) {
        self.active.lock().unwrap().insert(message_id, giveaway);
    }

    /// Removal half of the active→ended transition. The record is taken out
    /// before any network call happens, so a timer fire racing a manual end
    /// resolves to one draw and one no-op.
    pub fn complete(&self, message_id: MessageId) -> Option<ActiveGiveaway> {
        self.active.lock().unwrap().remove(&message_id)
    }

    pub fn record_ended(&self, message_id: MessageId, giveaway: EndedGiveaway) {
        self.ended.lock().unwrap().insert(message_id, giveaway);
    }

    pub fn lookup_ended(&self, message_id: MessageId) -> Option<EndedGiveaway> {
        self.ended.lock().unwrap().get(&message_id).cloned()
    }

    /// Points an ended giveaway at a replacement result message, used when a
    /// reroll finds the original result message deleted.
    pub fn update_result_message(&self, message_id: MessageId, result_message_id: MessageId) {
        if let Some(giveaway) = self.ended.lock().unwrap().get_mut(&message_id) {
            giveaway.result_message_id = result_message_id;
        }
    }

    pub fn active_count(&self) -> usize {
        self.active.lock().unwrap().len()
    }

    pub fn ended_count(&self) -> usize {
        self.ended.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_timer() -> AbortHandle {
        tokio::spawn(std::future::pending::<()>()).abort_handle()
    }

    fn active_giveaway(prize: &str) -> ActiveGiveaway {
        ActiveGiveaway {
            channel_id: ChannelId::new(10),
            prize: prize.to_string(),
            winner_count: 2,
            timer: dummy_timer(),
        }
    }

    #[tokio::test]
    async fn register_then_complete_removes_the_record() {
        let store = GiveawayStore::new();
        let message_id = MessageId::new(1);

        store.register(message_id, active_giveaway("Gift Card"));
        assert_eq!(store.active_count(), 1);

        let giveaway = store.complete(message_id).unwrap();
        assert_eq!(giveaway.prize, "Gift Card");
        assert_eq!(giveaway.winner_count, 2);
        assert_eq!(store.active_count(), 0);
    }

    #[tokio::test]
    async fn second_complete_is_a_no_op() {
        let store = GiveawayStore::new();
        let message_id = MessageId::new(1);
        store.register(message_id, active_giveaway("Gift Card"));

        assert!(store.complete(message_id).is_some());
        assert!(store.complete(message_id).is_none());
    }

    #[test]
    fn completing_an_unknown_id_is_none() {
        let store = GiveawayStore::new();
        assert!(store.complete(MessageId::new(99)).is_none());
    }

    #[test]
    fn looking_up_an_unknown_ended_id_is_none() {
        let store = GiveawayStore::new();
        assert!(store.lookup_ended(MessageId::new(99)).is_none());
    }

    #[tokio::test]
    async fn transition_moves_a_giveaway_between_the_maps() {
        let store = GiveawayStore::new();
        let message_id = MessageId::new(1);
        store.register(message_id, active_giveaway("Gift Card"));

        let active = store.complete(message_id).unwrap();
        store.record_ended(
            message_id,
            EndedGiveaway {
                channel_id: active.channel_id,
                prize: active.prize,
                winner_count: active.winner_count,
                ended_at: OffsetDateTime::now_utc(),
                result_message_id: MessageId::new(2),
            },
        );

        assert_eq!(store.active_count(), 0);
        assert_eq!(store.ended_count(), 1);

        let ended = store.lookup_ended(message_id).unwrap();
        assert_eq!(ended.prize, "Gift Card");
        assert_eq!(ended.winner_count, 2);
        assert_eq!(ended.result_message_id, MessageId::new(2));
    }

    #[tokio::test]
    async fn update_result_message_repoints_an_ended_record() {
        let store = GiveawayStore::new();
        let message_id = MessageId::new(1);
        store.record_ended(
            message_id,
            EndedGiveaway {
                channel_id: ChannelId::new(10),
                prize: "Gift Card".to_string(),
                winner_count: 1,
                ended_at: OffsetDateTime::now_utc(),
                result_message_id: MessageId::new(2),
            },
        );

        store.update_result_message(message_id, MessageId::new(3));
        assert_eq!(
            store.lookup_ended(message_id).unwrap().result_message_id,
            MessageId::new(3)
        );

        // Unknown ids are ignored rather than inserted.
        store.update_result_message(MessageId::new(99), MessageId::new(4));
        assert_eq!(store.ended_count(), 1);
    }
}
