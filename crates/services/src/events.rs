use skillforge_core::model::UserProfile;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 32;

/// Sign-in state changes other parts of the app react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(UserProfile),
    SignedOut,
}

/// Broadcast channel for [`AuthEvent`]s.
///
/// Publishing with no subscriber is not an error; late subscribers only see
/// events sent after they subscribed.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AuthEvent>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, event: AuthEvent) {
        // Err only means nobody is listening right now.
        let _ = self.sender.send(event);
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
