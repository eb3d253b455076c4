//! Upload pipeline. Carries one audio resource to the predictor and feeds
//! the outcome back into the event loop as a [`MoodEvent`].
//!
//! The session guarantees there is never more than one in-flight upload, so
//! the pipeline itself stays dumb: spawn, await, forward. No retries; the
//! user re-triggers the flow manually on failure.

use std::time::Instant;

use moodcap_core::SourceLocator;
use moodcap_predict::{HttpPredictor, PredictError, Predictor};
use tao::event_loop::EventLoopProxy;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::Label;
use crate::event::MoodEvent;

pub struct UploadPipeline {
    runtime: Runtime,
    predictor: HttpPredictor,
    tasks: mpsc::UnboundedSender<UploadTask>,
}

type UploadTask = tokio::task::JoinHandle<Result<Label, PredictError>>;

impl UploadPipeline {
    /// Create a new pipeline targeting the given endpoint.
    pub fn new(endpoint: &str, event_sender: EventLoopProxy<MoodEvent>) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;

        let predictor = HttpPredictor::new(endpoint);
        let tasks = start_results_collector(&runtime, event_sender);

        Ok(Self {
            runtime,
            predictor,
            tasks,
        })
    }

    /// Submit one audio resource for prediction. Non-blocking; the outcome
    /// arrives later as a user event.
    pub fn submit(&self, source: SourceLocator) -> anyhow::Result<()> {
        info!(
            backend = self.predictor.name(),
            endpoint = %self.predictor.endpoint(),
            file_name = %source.file_name(),
            bytes = ?source.len_hint(),
            "upload submitted"
        );

        let predictor = self.predictor.clone();
        let handle = self.runtime.spawn(async move {
            let before = Instant::now();
            let result = predictor.predict(source).await;
            info!(
                duration = ?before.elapsed(),
                ok = result.is_ok(),
                "prediction finished"
            );
            result
        });

        self.tasks.send(handle)?;
        Ok(())
    }
}

fn start_results_collector(
    runtime: &Runtime,
    event_sender: EventLoopProxy<MoodEvent>,
) -> mpsc::UnboundedSender<UploadTask> {
    let (task_sender, mut task_receiver) = mpsc::unbounded_channel();

    runtime.spawn(async move {
        while let Some(task) = task_receiver.recv().await {
            let event = match task.await {
                Ok(Ok(label)) => {
                    info!(label = %label, "prediction ready");
                    MoodEvent::PredictionReady(label)
                }
                Ok(Err(e)) => {
                    error!("prediction failed: {:?}", e);
                    MoodEvent::PredictionFailed
                }
                Err(e) => {
                    error!("error joining upload task: {:?}", e);
                    MoodEvent::PredictionFailed
                }
            };
            event_sender.send_event(event).ok();
        }

        error!("results collector task ended unexpectedly");
    });

    task_sender
}
