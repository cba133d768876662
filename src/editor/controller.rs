//! Editor controller
//!
//! Owns the document, the current preview and all interaction state, and
//! applies [`Message`]s to a [`PreviewSurface`]. Anything that has to wait
//! (clipboard writes, timers, the next display frame) is returned as an
//! [`Effect`] for the runtime to carry out.

use super::clipboard::CopyFeedbackTracker;
use crate::config::Config;
use crate::markdown::{scroll_target, RenderPipeline, RenderedPreview};
use crate::message::{EditorMessage, Key, Message, PreviewMessage, SystemMessage, ViewMessage};
use crate::state::{scroll_to_top_target, LayoutState, ScrollState, SessionPersistence};
use crate::surface::{CopyFeedback, PreviewSurface};
use std::time::Duration;

/// Deferred work requested by [`EditorController::update`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Deliver `ViewMessage::AnimationFrame` on the next display frame
    RequestAnimationFrame,

    /// Write `text` to the clipboard, then report `CopyFinished`
    WriteClipboard {
        block_id: String,
        generation: u64,
        text: String,
    },

    /// Deliver `CopyFeedbackExpired` after `delay`
    ScheduleFeedbackReset {
        block_id: String,
        generation: u64,
        delay: Duration,
    },
}

/// The markdown editing surface
pub struct EditorController<S: PreviewSurface> {
    config: Config,
    pipeline: RenderPipeline,
    surface: S,
    document: String,
    title: Option<String>,
    preview: Option<RenderedPreview>,
    scroll: ScrollState,
    layout: LayoutState,
    feedback: CopyFeedbackTracker,
    persistence: Option<SessionPersistence>,
}

impl<S: PreviewSurface> EditorController<S> {
    /// Controller with the default pipeline for `config`
    pub fn new(config: Config, surface: S) -> Self {
        let pipeline = RenderPipeline::new(&config);
        Self::with_pipeline(config, pipeline, surface)
    }

    pub fn with_pipeline(config: Config, pipeline: RenderPipeline, surface: S) -> Self {
        let layout = LayoutState::new(&config.layout);
        Self {
            config,
            pipeline,
            surface,
            document: String::new(),
            title: None,
            preview: None,
            scroll: ScrollState::new(),
            layout,
            feedback: CopyFeedbackTracker::new(),
            persistence: None,
        }
    }

    /// Attach a session store. Ignored unless the persistence feature is on.
    pub fn with_persistence(mut self, persistence: SessionPersistence) -> Self {
        if self.config.features.persistence {
            self.persistence = Some(persistence);
        } else {
            log::debug!("Persistence disabled in config, session store not attached");
        }
        self
    }

    /// Restore any saved session and perform the initial render
    pub fn start(&mut self) -> Vec<Effect> {
        if let Some(persistence) = self.persistence.as_mut() {
            match persistence.restore() {
                Ok(restored) => {
                    if let Some(content) = restored.content {
                        log::info!("Restored session {}", persistence.session_id());
                        self.document = content;
                    }
                    self.title = restored.title;
                }
                Err(e) => log::warn!("Failed to restore session: {}", e),
            }
        }

        self.surface.set_editor_visible(self.layout.editor_visible);
        self.rerender()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Title for display, falling back to the configured default
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.config.editor.default_title)
    }

    pub fn preview(&self) -> Option<&RenderedPreview> {
        self.preview.as_ref()
    }

    pub fn scroll_state(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn layout_state(&self) -> &LayoutState {
        &self.layout
    }

    pub fn persistence(&self) -> Option<&SessionPersistence> {
        self.persistence.as_ref()
    }

    /// Apply one message
    pub fn update(&mut self, message: Message) -> Vec<Effect> {
        match message {
            Message::Editor(msg) => self.handle_editor_message(msg),
            Message::Preview(msg) => self.handle_preview_message(msg),
            Message::View(msg) => self.handle_view_message(msg),
            Message::System(msg) => self.handle_system_message(msg),
        }
    }

    fn handle_editor_message(&mut self, msg: EditorMessage) -> Vec<Effect> {
        match msg {
            EditorMessage::TextChanged(text) => {
                self.document = text;
                return self.rerender();
            }

            EditorMessage::TitleChanged(title) => {
                self.title = Some(title);
            }

            EditorMessage::Save => {
                if let Some(persistence) = self.persistence.as_mut() {
                    if let Err(e) = persistence.save(&self.document, self.title.as_deref()) {
                        log::warn!("Failed to save session: {}", e);
                    }
                }
            }

            EditorMessage::ToggleEditor => {
                if self.config.features.toggle_editor {
                    let visible = self.layout.toggle_editor();
                    self.surface.set_editor_visible(visible);
                }
            }
        }
        Vec::new()
    }

    fn handle_preview_message(&mut self, msg: PreviewMessage) -> Vec<Effect> {
        match msg {
            PreviewMessage::ToggleCollapse(block_id) => {
                let Some(block) = self
                    .preview
                    .as_mut()
                    .and_then(|preview| preview.fragment.block_mut(&block_id))
                else {
                    log::debug!("Collapse toggle for unknown block {}", block_id);
                    return Vec::new();
                };
                let collapsed = block.toggle_collapsed();
                self.surface.set_block_collapsed(&block_id, collapsed);
            }

            PreviewMessage::CopyCode(block_id) => {
                let Some(text) = self
                    .preview
                    .as_ref()
                    .and_then(|preview| preview.fragment.block(&block_id))
                    .map(|block| block.raw_text.clone())
                else {
                    log::debug!("Copy for unknown block {}", block_id);
                    return Vec::new();
                };
                let generation = self.feedback.begin(&block_id);
                return vec![Effect::WriteClipboard {
                    block_id,
                    generation,
                    text,
                }];
            }

            PreviewMessage::CopyFinished {
                block_id,
                generation,
                result,
            } => {
                if !self.feedback.is_current(&block_id, generation) {
                    return Vec::new();
                }
                let feedback = match result {
                    Ok(()) => CopyFeedback::Copied,
                    Err(e) => {
                        log::warn!("Failed to copy block {}: {}", block_id, e);
                        CopyFeedback::Failed
                    }
                };
                if self.surface.set_copy_feedback(&block_id, feedback) {
                    return vec![Effect::ScheduleFeedbackReset {
                        block_id,
                        generation,
                        delay: Duration::from_millis(self.config.editor.copy_feedback_ms),
                    }];
                }
            }

            PreviewMessage::CopyFeedbackExpired {
                block_id,
                generation,
            } => {
                if self.feedback.expire(&block_id, generation) {
                    self.surface.set_copy_feedback(&block_id, CopyFeedback::Idle);
                }
            }

            PreviewMessage::OutlineLinkActivated(anchor) => {
                if let Some(top) = self.surface.element_top(&anchor) {
                    let target = scroll_target(
                        top,
                        self.navbar_height(),
                        self.config.layout.outline_scroll_margin,
                    );
                    self.surface.scroll_to(target);
                }
            }
        }
        Vec::new()
    }

    fn handle_view_message(&mut self, msg: ViewMessage) -> Vec<Effect> {
        match msg {
            ViewMessage::Scrolled => return self.request_frame(),

            ViewMessage::AnimationFrame => {
                if self.scroll.frames.take() {
                    self.recompute_scroll_state();
                }
            }

            ViewMessage::ScrollToTop => {
                let target = scroll_to_top_target(self.surface.hero_height(), self.navbar_height());
                self.surface.scroll_to(target);
            }

            ViewMessage::OpenDrawer => {
                if self.layout.drawer.open() {
                    self.surface.set_drawer_open(true);
                }
            }

            ViewMessage::CloseDrawer
            | ViewMessage::OverlayClicked
            | ViewMessage::KeyPressed(Key::Escape) => {
                if self.layout.drawer.close() {
                    self.surface.set_drawer_open(false);
                }
            }

            ViewMessage::KeyPressed(Key::Other) => {}

            ViewMessage::DividerPressed => {
                self.layout.resizer.begin();
                self.surface.set_resize_cursor(true);
            }

            ViewMessage::PointerMoved {
                x,
                container_left,
                container_width,
            } => {
                let resized = self.layout.resizer.drag(x, container_left, container_width);
                if let Some(percent) = resized {
                    self.surface.set_input_pane_width(percent);
                }
            }

            ViewMessage::PointerReleased => {
                if self.layout.resizer.end() {
                    self.surface.set_resize_cursor(false);
                }
            }
        }
        Vec::new()
    }

    fn handle_system_message(&mut self, msg: SystemMessage) -> Vec<Effect> {
        match msg {
            SystemMessage::AutosaveTick => {
                if let Some(persistence) = self.persistence.as_mut() {
                    if let Err(e) = persistence.autosave(&self.document, self.title.as_deref()) {
                        log::warn!("Autosave failed: {}", e);
                    }
                }
            }

            // Handled by the runtime loop
            SystemMessage::Shutdown => {}
        }
        Vec::new()
    }

    /// Render the current document and schedule a recompute against the new layout
    fn rerender(&mut self) -> Vec<Effect> {
        let preview = self.pipeline.render(&self.document, &mut self.surface);
        self.preview = Some(preview);
        self.feedback.clear();
        self.scroll.reset_active();
        self.request_frame()
    }

    /// Measured navbar height, or the configured one when the host cannot measure
    fn navbar_height(&self) -> f64 {
        let measured = self.surface.navbar_height();
        if measured.is_finite() && measured > 0.0 {
            measured
        } else {
            self.config.layout.navbar_height
        }
    }

    fn request_frame(&mut self) -> Vec<Effect> {
        if self.scroll.frames.request() {
            vec![Effect::RequestAnimationFrame]
        } else {
            Vec::new()
        }
    }

    fn recompute_scroll_state(&mut self) {
        let tops = self.surface.heading_tops();
        let (active_changed, chrome_changed) = self.scroll.recompute(
            &tops,
            self.surface.scroll_offset(),
            self.surface.hero_height(),
            &self.config.layout,
        );

        let has_outline = self
            .preview
            .as_ref()
            .is_some_and(|preview| preview.outline.is_some());
        if active_changed && has_outline {
            self.surface.set_active_outline_entry(self.scroll.active_entry);
        }
        if chrome_changed && self.config.features.scroll_chrome {
            self.surface.set_chrome(self.scroll.chrome);
        }
    }
}
