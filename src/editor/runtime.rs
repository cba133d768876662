//! Async event loop
//!
//! Feeds [`Message`]s from an mpsc channel into an [`EditorController`]
//! and turns the returned [`Effect`]s into tokio tasks that report back
//! through the same channel.

use super::clipboard::{write_text_async, ClipboardWriter};
use super::controller::{EditorController, Effect};
use crate::message::{Message, PreviewMessage, SystemMessage, ViewMessage};
use crate::surface::PreviewSurface;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

/// Drives one editor until [`SystemMessage::Shutdown`]
pub struct Runtime {
    sender: UnboundedSender<Message>,
    receiver: UnboundedReceiver<Message>,
    clipboard: Arc<dyn ClipboardWriter>,
}

impl Runtime {
    pub fn new(clipboard: Arc<dyn ClipboardWriter>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver,
            clipboard,
        }
    }

    /// Handle for delivering host events
    pub fn sender(&self) -> UnboundedSender<Message> {
        self.sender.clone()
    }

    /// Start `controller` and process messages until shutdown
    pub async fn run<S: PreviewSurface>(mut self, controller: &mut EditorController<S>) {
        let frame_interval = Duration::from_millis(controller.config().layout.frame_interval_ms);

        let effects = controller.start();
        self.execute(effects, frame_interval);

        let autosave = controller.persistence().is_some().then(|| {
            let period = Duration::from_millis(controller.config().editor.autosave_interval_ms);
            self.spawn_autosave(period)
        });

        while let Some(message) = self.receiver.recv().await {
            if matches!(message, Message::System(SystemMessage::Shutdown)) {
                log::debug!("Shutting down editor runtime");
                break;
            }
            let effects = controller.update(message);
            self.execute(effects, frame_interval);
        }

        if let Some(handle) = autosave {
            handle.abort();
            // Flush anything typed since the last tick
            controller.update(SystemMessage::AutosaveTick.into());
        }
    }

    fn execute(&self, effects: Vec<Effect>, frame_interval: Duration) {
        for effect in effects {
            let sender = self.sender.clone();
            match effect {
                Effect::RequestAnimationFrame => {
                    tokio::spawn(async move {
                        time::sleep(frame_interval).await;
                        let _ = sender.send(ViewMessage::AnimationFrame.into());
                    });
                }

                Effect::WriteClipboard {
                    block_id,
                    generation,
                    text,
                } => {
                    let clipboard = Arc::clone(&self.clipboard);
                    tokio::spawn(async move {
                        let result = write_text_async(clipboard, text).await;
                        let _ = sender.send(
                            PreviewMessage::CopyFinished {
                                block_id,
                                generation,
                                result,
                            }
                            .into(),
                        );
                    });
                }

                Effect::ScheduleFeedbackReset {
                    block_id,
                    generation,
                    delay,
                } => {
                    tokio::spawn(async move {
                        time::sleep(delay).await;
                        let _ = sender.send(
                            PreviewMessage::CopyFeedbackExpired {
                                block_id,
                                generation,
                            }
                            .into(),
                        );
                    });
                }
            }
        }
    }

    fn spawn_autosave(&self, period: Duration) -> JoinHandle<()> {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if sender.send(SystemMessage::AutosaveTick.into()).is_err() {
                    break;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BlockIdStrategy, Config};
    use crate::editor::RecordingClipboard;
    use crate::error::ClipboardError;
    use crate::markdown::RenderPipeline;
    use crate::message::EditorMessage;
    use crate::state::{MemoryStore, SessionPersistence};
    use crate::surface::{CopyFeedback, MemorySurface};

    fn config() -> Config {
        let mut config = Config::default();
        config.features.block_ids = BlockIdStrategy::Positional;
        config.editor.copy_feedback_ms = 10;
        config.editor.autosave_interval_ms = 10;
        config.layout.frame_interval_ms = 1;
        config
    }

    fn controller(config: Config) -> EditorController<MemorySurface> {
        let pipeline = RenderPipeline::new(&config).with_highlighter(None);
        EditorController::with_pipeline(config, pipeline, MemorySurface::new())
    }

    fn shutdown_after(sender: UnboundedSender<Message>, millis: u64) {
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(millis)).await;
            let _ = sender.send(SystemMessage::Shutdown.into());
        });
    }

    #[tokio::test]
    async fn test_copy_writes_clipboard_and_reverts_feedback() {
        let clipboard = Arc::new(RecordingClipboard::new());
        let runtime = Runtime::new(clipboard.clone());
        let sender = runtime.sender();

        sender
            .send(EditorMessage::TextChanged("```sh\necho \"hi\" && exit\n```".into()).into())
            .unwrap();
        sender
            .send(PreviewMessage::CopyCode("code-0".into()).into())
            .unwrap();
        shutdown_after(sender, 150);

        let mut controller = controller(config());
        runtime.run(&mut controller).await;

        assert_eq!(clipboard.texts(), ["echo \"hi\" && exit\n"]);
        assert_eq!(
            controller.surface().feedback_history,
            vec![
                ("code-0".to_string(), CopyFeedback::Copied),
                ("code-0".to_string(), CopyFeedback::Idle),
            ]
        );
    }

    #[tokio::test]
    async fn test_clipboard_failure_is_transient() {
        let clipboard = Arc::new(RecordingClipboard::failing(ClipboardError::WriteError(
            "busy".into(),
        )));
        let runtime = Runtime::new(clipboard);
        let sender = runtime.sender();

        sender
            .send(EditorMessage::TextChanged("```\nx\n```".into()).into())
            .unwrap();
        sender
            .send(PreviewMessage::CopyCode("code-0".into()).into())
            .unwrap();
        shutdown_after(sender, 150);

        let mut controller = controller(config());
        runtime.run(&mut controller).await;

        let states: Vec<_> = controller
            .surface()
            .feedback_history
            .iter()
            .map(|(_, feedback)| *feedback)
            .collect();
        assert_eq!(states, [CopyFeedback::Failed, CopyFeedback::Idle]);
    }

    #[tokio::test]
    async fn test_scroll_is_applied_on_next_frame() {
        let runtime = Runtime::new(Arc::new(RecordingClipboard::new()));
        let sender = runtime.sender();

        let mut controller = controller(config());
        controller.surface_mut().set_heading_tops(&[0.0, 500.0]);
        controller.surface_mut().scroll_offset = 450.0;

        sender
            .send(EditorMessage::TextChanged("# A\n\n## B\n".into()).into())
            .unwrap();
        shutdown_after(sender, 100);
        runtime.run(&mut controller).await;

        assert_eq!(controller.surface().active_outline_entry, Some(1));
    }

    #[tokio::test]
    async fn test_autosave_runs_while_persistence_enabled() {
        let mut config = config();
        config.features.persistence = true;

        let runtime = Runtime::new(Arc::new(RecordingClipboard::new()));
        let sender = runtime.sender();
        sender
            .send(EditorMessage::TextChanged("# Draft\n".into()).into())
            .unwrap();
        shutdown_after(sender, 100);

        let mut controller = controller(config)
            .with_persistence(SessionPersistence::new(Box::new(MemoryStore::new()), "rt"));
        runtime.run(&mut controller).await;

        let persistence = controller.persistence().unwrap();
        assert!(persistence.last_saved().is_some());
        assert!(!persistence.is_dirty("# Draft\n", None));
    }
}
