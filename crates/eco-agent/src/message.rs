//! Message envelope handed from sender to recipients.

use eco_core::AgentId;

/// A message between agents.
///
/// The engine only reads [`recipients`](Message::recipients); `content` is
/// opaque to it.  Applications usually make `M` an enum and match on it in
/// their behaviour.
#[derive(Clone, Debug, PartialEq)]
pub struct Message<M> {
    pub sender: AgentId,
    pub recipients: Vec<AgentId>,
    pub content: M,
}

impl<M> Message<M> {
    pub fn new(sender: AgentId, recipients: Vec<AgentId>, content: M) -> Self {
        Self { sender, recipients, content }
    }

    /// Message with a single recipient.
    pub fn to(sender: AgentId, recipient: AgentId, content: M) -> Self {
        Self::new(sender, vec![recipient], content)
    }

    #[inline]
    pub fn recipients(&self) -> &[AgentId] {
        &self.recipients
    }

    pub fn is_addressed_to(&self, id: AgentId) -> bool {
        self.recipients.contains(&id)
    }
}
