//! Drives a [`RevealController`] from the tokio clock.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::debug;

use centering_gateway::AnalysisGateway;

use crate::controller::{Action, PendingRequest, RevealController, ViewSnapshot};

#[derive(Debug, Error)]
#[error("reveal runner has stopped")]
pub struct RunnerStopped;

/// Owns a controller and a gateway; see [`RevealRunner::spawn`].
pub struct RevealRunner<G> {
    controller: RevealController,
    gateway: Arc<G>,
    origin: Instant,
}

/// Sends actions to a spawned runner and observes its view.
pub struct RevealHandle {
    actions: mpsc::Sender<Action>,
    views: watch::Receiver<ViewSnapshot>,
    task: JoinHandle<()>,
}

impl RevealHandle {
    pub async fn send(&self, action: Action) -> Result<(), RunnerStopped> {
        self.actions.send(action).await.map_err(|_| RunnerStopped)
    }

    pub fn views(&self) -> watch::Receiver<ViewSnapshot> {
        self.views.clone()
    }

    pub fn current(&self) -> ViewSnapshot {
        self.views.borrow().clone()
    }

    /// Stop accepting actions and wait for the runner to finish.
    pub async fn shutdown(self) {
        drop(self.actions);
        let _ = self.task.await;
    }
}

impl<G> RevealRunner<G>
where
    G: AnalysisGateway + 'static,
{
    pub fn new(controller: RevealController, gateway: Arc<G>) -> Self {
        Self {
            controller,
            gateway,
            origin: Instant::now(),
        }
    }

    /// Run on the current tokio runtime until the handle is shut down.
    pub fn spawn(self) -> RevealHandle {
        let (actions_tx, actions_rx) = mpsc::channel(16);
        let (views_tx, views_rx) = watch::channel(self.controller.snapshot());
        let task = tokio::spawn(self.run(actions_rx, views_tx));

        RevealHandle {
            actions: actions_tx,
            views: views_rx,
            task,
        }
    }

    async fn run(
        mut self,
        mut actions: mpsc::Receiver<Action>,
        views: watch::Sender<ViewSnapshot>,
    ) {
        let (resolved_tx, mut resolved_rx) = mpsc::unbounded_channel();

        loop {
            let deadline = self
                .controller
                .next_deadline()
                .map(|ms| self.origin + Duration::from_millis(ms));

            let action = tokio::select! {
                received = actions.recv() => match received {
                    Some(action) => action,
                    None => break,
                },
                Some(action) = resolved_rx.recv() => action,
                () = async {
                    if let Some(deadline) = deadline {
                        time::sleep_until(deadline).await;
                    }
                }, if deadline.is_some() => Action::Tick,
            };

            if let Some(request) = self.controller.dispatch(self.now_ms(), action) {
                self.request(request, resolved_tx.clone());
            }
            views.send_replace(self.controller.snapshot());
        }

        debug!("reveal runner stopped");
    }

    fn request(&self, request: PendingRequest, resolved: mpsc::UnboundedSender<Action>) {
        let gateway = Arc::clone(&self.gateway);
        tokio::spawn(async move {
            let outcome = gateway.analyze(&request.text).await;
            let _ = resolved.send(Action::GatewayResolved {
                ticket: request.ticket,
                outcome,
            });
        });
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Phase;
    use async_trait::async_trait;
    use centering_view::{parse_response, AnalysisPayload, GatewayError, GatewayResult};

    const STUDY: &str = "John has been acting quite odd. He called up Mike yesterday. \
                         Mike was studying for his driver's test. He was annoyed by John's call.";

    struct Fixed(GatewayResult<AnalysisPayload>);

    #[async_trait]
    impl AnalysisGateway for Fixed {
        async fn analyze(&self, _text: &str) -> GatewayResult<AnalysisPayload> {
            time::sleep(Duration::from_millis(300)).await;
            self.0.clone()
        }
    }

    fn study() -> GatewayResult<AnalysisPayload> {
        parse_response(include_bytes!("../../fixtures/study.json"))
    }

    #[tokio::test(start_paused = true)]
    async fn reveals_every_sentence_on_the_clock() {
        let start = Instant::now();
        let handle =
            RevealRunner::new(RevealController::default(), Arc::new(Fixed(study()))).spawn();
        let mut views = handle.views();

        handle.send(Action::EditText(STUDY.to_string())).await.unwrap();
        handle.send(Action::Submit).await.unwrap();

        let done = views
            .wait_for(|view| {
                view.discourse.as_ref().map(|d| d.cursor) == Some(3) && view.pending_tasks == 0
            })
            .await
            .unwrap()
            .clone();

        assert_eq!(done.phase, Phase::Revealing);
        assert!(done.flags.results_visible);
        assert_eq!(done.discourse.unwrap().sentences.len(), 4);
        // 300 ms request, then three 2000 ms dwells.
        assert!(start.elapsed() >= Duration::from_millis(6_300));

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn gateway_failure_returns_to_input() {
        let gateway = Fixed(Err(GatewayError::EmptyResult));
        let handle = RevealRunner::new(RevealController::default(), Arc::new(gateway)).spawn();
        let mut views = handle.views();

        handle.send(Action::EditText(STUDY.to_string())).await.unwrap();
        handle.send(Action::Submit).await.unwrap();

        let failed = views
            .wait_for(|view| view.error.is_some())
            .await
            .unwrap()
            .clone();
        assert_eq!(failed.phase, Phase::Input);
        assert_eq!(failed.draft, STUDY);
        assert!(!failed.flags.loading);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn clear_during_request_drops_the_response() {
        let handle =
            RevealRunner::new(RevealController::default(), Arc::new(Fixed(study()))).spawn();
        let mut views = handle.views();

        handle.send(Action::EditText(STUDY.to_string())).await.unwrap();
        handle.send(Action::Submit).await.unwrap();
        handle.send(Action::Clear).await.unwrap();

        views
            .wait_for(|view| view.phase == Phase::Clearing)
            .await
            .unwrap();
        let ready = views
            .wait_for(|view| view.phase == Phase::Input && view.pending_tasks == 0)
            .await
            .unwrap()
            .clone();
        assert!(ready.flags.input_visible);
        assert!(ready.draft.is_empty());

        time::sleep(Duration::from_millis(1_000)).await;
        assert!(handle.current().discourse.is_none());

        handle.shutdown().await;
    }
}
