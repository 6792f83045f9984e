//! Edit session with undo history.
//!
//! A session owns the current image, the untouched original, and one of two
//! history representations chosen at construction:
//!
//! - **Unlimited**: every prior image is kept on a stack, paired one-to-one
//!   with a log of operation names. The bottom entry is always the original
//!   tagged `"original"` and is never popped.
//! - **Single-step**: one saved image plus a flag; a revert consumes it.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::buffer::ImageBuffer;
use crate::codec;
use crate::error::{EditError, Result};

/// Log tag for the original image and for resets to it.
pub const ORIGINAL_TAG: &str = "original";

/// Undo depth, fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryMode {
    /// Keep every prior image.
    #[default]
    Unlimited,
    /// Keep only the image before the last edit.
    SingleStep,
}

#[derive(Debug, Clone)]
enum History {
    Unlimited {
        stack: Vec<ImageBuffer>,
        log: Vec<String>,
    },
    SingleStep {
        previous: Option<ImageBuffer>,
        revertible: bool,
    },
}

impl History {
    fn new(mode: HistoryMode, original: &ImageBuffer) -> Self {
        match mode {
            HistoryMode::Unlimited => History::Unlimited {
                stack: vec![original.clone()],
                log: vec![ORIGINAL_TAG.to_string()],
            },
            HistoryMode::SingleStep => History::SingleStep {
                previous: None,
                revertible: false,
            },
        }
    }
}

/// Displays a buffer; the session never inspects how.
pub trait Viewer {
    fn show(&self, image: &ImageBuffer) -> Result<()>;
}

/// Asks the user where to save. `None` means the prompt was cancelled.
pub trait SavePathPrompt {
    fn prompt(&self) -> Option<PathBuf>;
}

/// An image being edited, with undo.
#[derive(Debug, Clone)]
pub struct EditSession {
    current: ImageBuffer,
    original: ImageBuffer,
    history: History,
}

impl EditSession {
    /// Start a session from a buffer. The session keeps its own copies.
    pub fn new(image: ImageBuffer, mode: HistoryMode) -> Self {
        debug!(width = image.width(), height = image.height(), ?mode, "session created");
        let original = image.clone();
        let history = History::new(mode, &original);
        Self {
            current: image,
            original,
            history,
        }
    }

    /// Start a session from an image file.
    pub fn open(path: impl AsRef<Path>, mode: HistoryMode) -> Result<Self> {
        let image = codec::load(path)?;
        Ok(Self::new(image, mode))
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    pub fn mode(&self) -> HistoryMode {
        match self.history {
            History::Unlimited { .. } => HistoryMode::Unlimited,
            History::SingleStep { .. } => HistoryMode::SingleStep,
        }
    }

    /// Independent copy of the current image.
    pub fn current(&self) -> ImageBuffer {
        self.current.clone()
    }

    /// Borrow the current image without copying.
    pub fn current_ref(&self) -> &ImageBuffer {
        &self.current
    }

    pub fn original(&self) -> &ImageBuffer {
        &self.original
    }

    /// The buffer a filter reads: the original if `original`, else the current.
    pub fn source(&self, original: bool) -> &ImageBuffer {
        if original {
            &self.original
        } else {
            &self.current
        }
    }

    /// Install `image` as current, saving the previous current for undo.
    pub fn apply(&mut self, image: ImageBuffer, op: impl Into<String>) {
        let op = op.into();
        let prior = std::mem::replace(&mut self.current, image);
        match &mut self.history {
            History::Unlimited { stack, log } => {
                stack.push(prior);
                log.push(op);
                debug!(op = %log[log.len() - 1], stack_len = stack.len(), "edit applied");
            }
            History::SingleStep {
                previous,
                revertible,
            } => {
                *previous = Some(prior);
                *revertible = true;
                debug!(%op, "edit applied");
            }
        }
    }

    /// Step back one edit, or jump back to the original with `original`.
    ///
    /// # Errors
    /// * [`EditError::Underflow`] - unlimited mode with nothing left to undo
    /// * [`EditError::NotRevertible`] - single-step mode with no saved image
    pub fn revert(&mut self, original: bool) -> Result<()> {
        match &mut self.history {
            History::Unlimited { stack, log } => {
                if original {
                    let prior = std::mem::replace(&mut self.current, self.original.clone());
                    stack.push(prior);
                    log.push(ORIGINAL_TAG.to_string());
                } else {
                    if stack.len() <= 1 {
                        return Err(EditError::Underflow);
                    }
                    if let (Some(image), Some(_)) = (stack.pop(), log.pop()) {
                        self.current = image;
                    }
                }
                debug!(original, stack_len = stack.len(), "reverted");
            }
            History::SingleStep {
                previous,
                revertible,
            } => {
                if original {
                    let prior = std::mem::replace(&mut self.current, self.original.clone());
                    *previous = Some(prior);
                    *revertible = true;
                } else {
                    let restored = match (*revertible, previous.as_ref()) {
                        (true, Some(image)) => image.clone(),
                        _ => return Err(EditError::NotRevertible),
                    };
                    self.current = restored;
                    *revertible = false;
                }
                debug!(original, "reverted");
            }
        }
        Ok(())
    }

    /// Operation names, oldest first (unlimited mode only).
    pub fn history(&self) -> Option<&[String]> {
        match &self.history {
            History::Unlimited { log, .. } => Some(log),
            History::SingleStep { .. } => None,
        }
    }

    /// Number of images on the undo stack (unlimited mode only).
    pub fn stack_len(&self) -> Option<usize> {
        match &self.history {
            History::Unlimited { stack, .. } => Some(stack.len()),
            History::SingleStep { .. } => None,
        }
    }

    /// Whether `revert(false)` would succeed.
    pub fn can_revert(&self) -> bool {
        match &self.history {
            History::Unlimited { stack, .. } => stack.len() > 1,
            History::SingleStep { revertible, .. } => *revertible,
        }
    }

    pub fn preview(&self, viewer: &dyn Viewer) -> Result<()> {
        viewer.show(&self.current)
    }

    /// Write the current image to `path`; the format follows the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        debug!(path = %path.display(), "saving session image");
        codec::save(&self.current, path)
    }

    /// Ask `prompt` for a destination and save there.
    ///
    /// Returns the chosen path, or `None` if the prompt was cancelled.
    pub fn save_with(&self, prompt: &dyn SavePathPrompt) -> Result<Option<PathBuf>> {
        match prompt.prompt() {
            Some(path) => {
                self.save(&path)?;
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }
}

impl fmt::Display for EditSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.history {
            History::Unlimited { stack, log } => {
                writeln!(f, "history: [{}]", log.join(", "))?;
                write!(f, "stack size: {}", stack.len())
            }
            History::SingleStep { revertible, .. } => {
                write!(f, "single-step history (revertible: {})", revertible)
            }
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Configures and constructs an [`EditSession`].
///
/// A supplied image takes precedence over a path.
#[derive(Debug, Default)]
pub struct SessionBuilder {
    path: Option<PathBuf>,
    image: Option<ImageBuffer>,
    history: HistoryMode,
}

impl SessionBuilder {
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn image(mut self, image: ImageBuffer) -> Self {
        self.image = Some(image);
        self
    }

    pub fn history(mut self, mode: HistoryMode) -> Self {
        self.history = mode;
        self
    }

    /// # Errors
    /// [`EditError::Construction`] if neither an image nor a path was given.
    pub fn build(self) -> Result<EditSession> {
        match (self.image, self.path) {
            (Some(image), _) => Ok(EditSession::new(image, self.history)),
            (None, Some(path)) => EditSession::open(path, self.history),
            (None, None) => Err(EditError::Construction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn image(value: u8) -> ImageBuffer {
        ImageBuffer::filled(2, 2, [value, value, value]).unwrap()
    }

    // ========================================================================
    // Unlimited mode
    // ========================================================================

    #[test]
    fn test_unlimited_initial_state() {
        let session = EditSession::new(image(1), HistoryMode::Unlimited);
        assert_eq!(session.history().unwrap(), &["original".to_string()]);
        assert_eq!(session.stack_len(), Some(1));
        assert!(!session.can_revert());
    }

    #[test]
    fn test_unlimited_apply_then_revert() {
        let mut session = EditSession::new(image(1), HistoryMode::Unlimited);
        session.apply(image(2), "a");
        session.apply(image(3), "b");
        assert_eq!(session.stack_len(), Some(3));
        assert_eq!(session.history().unwrap(), &["original", "a", "b"]);

        session.revert(false).unwrap();
        assert_eq!(session.current_ref(), &image(2));
        assert_eq!(session.history().unwrap(), &["original", "a"]);
        assert_eq!(session.stack_len(), Some(2));

        session.revert(false).unwrap();
        assert_eq!(session.current_ref(), &image(1));
        assert_eq!(session.stack_len(), Some(1));
    }

    #[test]
    fn test_unlimited_underflow() {
        let mut session = EditSession::new(image(1), HistoryMode::Unlimited);
        assert!(matches!(session.revert(false), Err(EditError::Underflow)));

        session.apply(image(2), "a");
        session.revert(false).unwrap();
        assert!(matches!(session.revert(false), Err(EditError::Underflow)));
        assert_eq!(session.stack_len(), Some(1));
        assert_eq!(session.current_ref(), &image(1));
    }

    #[test]
    fn test_unlimited_reset_is_undoable() {
        let mut session = EditSession::new(image(1), HistoryMode::Unlimited);
        session.apply(image(2), "a");
        session.revert(true).unwrap();
        assert_eq!(session.current_ref(), &image(1));
        assert_eq!(session.history().unwrap(), &["original", "a", "original"]);

        session.revert(false).unwrap();
        assert_eq!(session.current_ref(), &image(2));
    }

    #[test]
    fn test_stack_and_log_stay_in_step() {
        let mut session = EditSession::new(image(1), HistoryMode::Unlimited);
        for i in 0..5u8 {
            session.apply(image(i), format!("op{}", i));
            if i % 2 == 0 {
                session.revert(true).unwrap();
            }
            assert_eq!(session.stack_len(), session.history().map(|h| h.len()));
        }
        while session.revert(false).is_ok() {
            assert_eq!(session.stack_len(), session.history().map(|h| h.len()));
        }
        assert_eq!(session.stack_len(), Some(1));
    }

    // ========================================================================
    // Single-step mode
    // ========================================================================

    #[test]
    fn test_single_step_not_revertible_initially() {
        let mut session = EditSession::new(image(1), HistoryMode::SingleStep);
        assert!(matches!(session.revert(false), Err(EditError::NotRevertible)));
        assert_eq!(session.history(), None);
        assert_eq!(session.stack_len(), None);
    }

    #[test]
    fn test_single_step_one_shot() {
        let mut session = EditSession::new(image(1), HistoryMode::SingleStep);
        session.apply(image(2), "a");
        session.apply(image(3), "b");

        session.revert(false).unwrap();
        assert_eq!(session.current_ref(), &image(2));
        assert!(matches!(session.revert(false), Err(EditError::NotRevertible)));
        assert_eq!(session.current_ref(), &image(2));
    }

    #[test]
    fn test_single_step_reset_to_original() {
        let mut session = EditSession::new(image(1), HistoryMode::SingleStep);
        session.revert(true).unwrap();
        assert_eq!(session.current_ref(), &image(1));

        session.apply(image(5), "a");
        session.revert(true).unwrap();
        assert_eq!(session.current_ref(), &image(1));
        session.revert(false).unwrap();
        assert_eq!(session.current_ref(), &image(5));
    }

    // ========================================================================
    // Ownership and reporting
    // ========================================================================

    #[test]
    fn test_current_is_a_copy() {
        let session = EditSession::new(image(9), HistoryMode::Unlimited);
        let mut copy = session.current();
        copy.put_rgb(0, 0, [0, 0, 0]);
        assert_eq!(session.current_ref(), &image(9));
    }

    #[test]
    fn test_original_survives_edits() {
        let mut session = EditSession::new(image(4), HistoryMode::SingleStep);
        session.apply(image(8), "a");
        assert_eq!(session.original(), &image(4));
        assert_eq!(session.source(true), &image(4));
        assert_eq!(session.source(false), &image(8));
    }

    #[test]
    fn test_display_report() {
        let mut session = EditSession::new(image(1), HistoryMode::Unlimited);
        session.apply(image(2), "negative");
        assert_eq!(
            session.to_string(),
            "history: [original, negative]\nstack size: 2"
        );

        let single = EditSession::new(image(1), HistoryMode::SingleStep);
        assert_eq!(single.to_string(), "single-step history (revertible: false)");
    }

    #[test]
    fn test_builder_requires_a_source() {
        assert!(matches!(
            EditSession::builder().build(),
            Err(EditError::Construction)
        ));
    }

    #[test]
    fn test_builder_prefers_image_over_path() {
        let session = EditSession::builder()
            .path("/definitely/not/here.png")
            .image(image(3))
            .history(HistoryMode::SingleStep)
            .build()
            .unwrap();
        assert_eq!(session.mode(), HistoryMode::SingleStep);
        assert_eq!(session.current_ref(), &image(3));
    }

    #[test]
    fn test_builder_missing_file_is_codec_error() {
        let result = EditSession::builder().path("/definitely/not/here.png").build();
        assert!(matches!(result, Err(EditError::Codec(_))));
    }

    struct RecordingViewer {
        shown: RefCell<Vec<(usize, usize)>>,
    }

    impl Viewer for RecordingViewer {
        fn show(&self, image: &ImageBuffer) -> Result<()> {
            self.shown.borrow_mut().push(image.size());
            Ok(())
        }
    }

    #[test]
    fn test_preview_hands_current_to_viewer() {
        let session = EditSession::new(image(1), HistoryMode::Unlimited);
        let viewer = RecordingViewer {
            shown: RefCell::new(Vec::new()),
        };
        session.preview(&viewer).unwrap();
        assert_eq!(viewer.shown.borrow().as_slice(), &[(2, 2)]);
    }

    struct FixedPrompt(Option<PathBuf>);

    impl SavePathPrompt for FixedPrompt {
        fn prompt(&self) -> Option<PathBuf> {
            self.0.clone()
        }
    }

    #[test]
    fn test_save_with_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.png");
        let session = EditSession::new(image(7), HistoryMode::Unlimited);

        let saved = session.save_with(&FixedPrompt(Some(target.clone()))).unwrap();
        assert_eq!(saved.as_deref(), Some(target.as_path()));
        assert!(target.exists());

        assert_eq!(session.save_with(&FixedPrompt(None)).unwrap(), None);
    }
}
