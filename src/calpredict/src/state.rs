use calpredict_types::{MetricState, MetricUpdate};
use tokio::sync::{mpsc, watch};

/// Where fetch tasks deliver their results. The holder of the matching
/// [`MetricPublisher`] decides on which task the state is mutated.
pub type UpdateSink = mpsc::UnboundedSender<MetricUpdate>;

/// Sole owner of the published metrics.
///
/// Updates are applied strictly in arrival order, so for any metric the value
/// of whichever query resolved last is the one that sticks. Observers follow
/// the state through [`MetricPublisher::subscribe`].
pub struct MetricPublisher {
    updates: mpsc::UnboundedReceiver<MetricUpdate>,
    state: watch::Sender<MetricState>,
}

impl MetricPublisher {
    pub fn new() -> (Self, UpdateSink) {
        Self::with_state(MetricState::default())
    }

    pub fn with_state(initial: MetricState) -> (Self, UpdateSink) {
        let (sink, updates) = mpsc::unbounded_channel();
        let (state, _) = watch::channel(initial);
        (Self { updates, state }, sink)
    }

    pub fn state(&self) -> MetricState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<MetricState> {
        self.state.subscribe()
    }

    /// Applies whatever is already queued without waiting. Returns the number
    /// of updates applied.
    pub fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.updates.try_recv() {
            self.apply(update);
            applied += 1;
        }
        applied
    }

    /// Waits for the next update and applies it. `None` once every sink is gone.
    pub async fn next(&mut self) -> Option<MetricUpdate> {
        let update = self.updates.recv().await?;
        self.apply(update);
        Some(update)
    }

    /// Drains updates until every [`UpdateSink`] has been dropped.
    pub async fn run(mut self) -> MetricState {
        while self.next().await.is_some() {}
        self.state()
    }

    fn apply(&self, update: MetricUpdate) {
        trace!("{} <- {}", update.metric, update.value);
        self.state.send_modify(|state| state.apply(update));
    }
}
