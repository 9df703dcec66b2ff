//! Fading screen messages, stacked per anchor.

use cid_core::constants::{MESSAGE_DURATION_SECS, MESSAGE_STACK_OFFSET};
use cid_core::enums::{MessageAnchor, MessageLevel};
use cid_core::events::ScreenMessage;
use cid_core::state::MessageView;

#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<ScreenMessage>,
    next_id: u32,
}

impl MessageLog {
    pub fn push(&mut self, level: MessageLevel, anchor: MessageAnchor, text: impl Into<String>) {
        let offset = self.messages.iter().filter(|m| m.anchor == anchor).count() as f64
            * MESSAGE_STACK_OFFSET;
        self.messages.push(ScreenMessage {
            id: self.next_id,
            level,
            anchor,
            text: text.into(),
            age_secs: 0.0,
            duration_secs: MESSAGE_DURATION_SECS,
            offset,
        });
        self.next_id = self.next_id.wrapping_add(1);
    }

    /// Age every message, drop expired ones and close the gaps in each stack.
    pub fn tick(&mut self, dt: f64) {
        for m in &mut self.messages {
            m.age_secs += dt;
        }
        self.messages.retain(|m| !m.is_expired());

        for anchor in [MessageAnchor::Top, MessageAnchor::Center, MessageAnchor::Bottom] {
            for (slot, m) in self
                .messages
                .iter_mut()
                .filter(|m| m.anchor == anchor)
                .enumerate()
            {
                m.offset = slot as f64 * MESSAGE_STACK_OFFSET;
            }
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn views(&self) -> Vec<MessageView> {
        self.messages
            .iter()
            .map(|m| MessageView {
                text: m.text.clone(),
                level: m.level,
                anchor: m.anchor,
                offset: m.offset,
                alpha: m.alpha(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_stack_and_expire() {
        let mut log = MessageLog::default();
        log.push(MessageLevel::Info, MessageAnchor::Top, "first");
        log.tick(1.0);
        log.push(MessageLevel::Success, MessageAnchor::Top, "second");
        log.push(MessageLevel::Error, MessageAnchor::Center, "other anchor");

        let views = log.views();
        assert_eq!(views[0].offset, 0.0);
        assert_eq!(views[1].offset, MESSAGE_STACK_OFFSET);
        assert_eq!(views[2].offset, 0.0);

        log.tick(2.5);
        let views = log.views();
        assert_eq!(views.len(), 2, "first message expired");
        assert_eq!(views[0].text, "second");
        assert_eq!(views[0].offset, 0.0, "stack closes up");
        assert!(views[0].alpha < 1.0);
    }
}
