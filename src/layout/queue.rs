use tokio::sync::mpsc;

use super::PageLayout;

/// Layout event buffer size; reloads are rare so this never fills
const QUEUE_SIZE: usize = 16;

/// Events flowing from the layout watcher to the frame loop
#[derive(Debug, Clone)]
pub enum LayoutEvent {
    /// The layout file changed and parsed cleanly
    Reloaded(PageLayout),
}

/// Creates the watcher-to-app channel pair
pub fn create_layout_queue() -> (LayoutSender, LayoutReceiver) {
    let (tx, rx) = mpsc::channel(QUEUE_SIZE);
    (LayoutSender(tx), LayoutReceiver(rx))
}

/// Sender side of the layout queue
#[derive(Clone)]
pub struct LayoutSender(pub mpsc::Sender<LayoutEvent>);

impl LayoutSender {
    pub async fn send(&self, event: LayoutEvent) -> Result<(), mpsc::error::SendError<LayoutEvent>> {
        self.0.send(event).await
    }

    pub fn inner(&self) -> mpsc::Sender<LayoutEvent> {
        self.0.clone()
    }
}

/// Receiver side of the layout queue
pub struct LayoutReceiver(pub mpsc::Receiver<LayoutEvent>);

impl LayoutReceiver {
    pub async fn recv(&mut self) -> Option<LayoutEvent> {
        self.0.recv().await
    }

    pub fn try_recv(&mut self) -> Result<LayoutEvent, mpsc::error::TryRecvError> {
        self.0.try_recv()
    }
}
