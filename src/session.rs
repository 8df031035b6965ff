//! Conversion session state and its event handlers.
//!
//! A [`Session`] is a plain value owned by whoever drives the UI. Every user
//! action is an [`Event`]; [`Session::handle`] consumes the current session
//! and returns the next one inside a [`Step`], together with the notice to
//! show and, for downloads, the file to save.
//!
//! ## Stages
//!
//! ```text
//! Empty ──decode ok──▶ Loaded ──resize ok──▶ Resized
//!   ▲                    │  ▲                  │ │
//!   │                    │  └───decode ok──────┘ │ (resize ok loops)
//!   └──────── reset ─────┴───────────────────────┘
//! ```
//!
//! Resize is only accepted in `Loaded`/`Resized`, download only in `Resized`.
//! Out-of-stage requests are ignored without a notice, the way a disabled
//! button ignores clicks.
//!
//! ## Loads
//!
//! Loading is split in two events. `FileSelected` validates the declared
//! media type and opens a new load generation; the caller then decodes the
//! bytes and reports back with `Decoded { generation, .. }`. A decode whose
//! generation is no longer current was superseded by a later selection (or a
//! reset) and is dropped.
//!
//! ## Dimension fields
//!
//! Width and height are kept as the raw text the user typed. With the aspect
//! lock on, an edit to one field rewrites the other directly; the rewrite is
//! not an event, so it never bounces back. Presets overwrite both fields and
//! become the active preset; manual edits leave the active preset as it is.

use crate::config::Preset;
use crate::imaging::{
    Axis, BackendError, ImageBackend, OutputFormat, RenderSettings, ResizeError, TargetInput,
    derive_linked_axis, parse_linked_value, resize,
};
use crate::output::{FileInfo, format_resolution};
use crate::types::{ResizedArtifact, SourceImage};
use image::DynamicImage;
use thiserror::Error;
use tracing::{debug, info};

/// Errors a session reports back to the user. None of them end the session.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("Could not decode image: {0}")]
    DecodeFailed(#[source] BackendError),
    #[error(transparent)]
    Resize(#[from] ResizeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient, dismissable message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: &str) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.to_string(),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl From<&SessionError> for Notice {
    fn from(err: &SessionError) -> Self {
        match err {
            SessionError::UnsupportedFileType(_) => Notice::error("Please select an image file"),
            SessionError::DecodeFailed(_) => Notice::error(&err.to_string()),
            SessionError::Resize(ResizeError::InvalidDimensions { .. }) => {
                Notice::error("Please enter valid dimensions")
            }
            SessionError::Resize(ResizeError::EncodingFailed(e)) => {
                Notice::error(&format!("Could not encode image: {e}"))
            }
        }
    }
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Loaded,
    Resized,
}

/// The file facts known when a file is picked, before its bytes are decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    pub name: String,
    pub media_type: String,
    pub size: u64,
}

impl FileSelection {
    pub fn new(name: &str, media_type: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            media_type: media_type.to_string(),
            size,
        }
    }
}

/// Everything a user can do to a session.
#[derive(Debug)]
pub enum Event {
    FileSelected(FileSelection),
    Decoded {
        generation: u64,
        pixels: Result<DynamicImage, BackendError>,
    },
    WidthEdited(String),
    HeightEdited(String),
    PresetChosen(Preset),
    FormatChosen(OutputFormat),
    AspectLockToggled(bool),
    Resize,
    Download,
    Reset,
}

/// A file ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Result of handling one event.
#[derive(Debug)]
pub struct Step {
    pub session: Session,
    pub notice: Option<Notice>,
    pub download: Option<Download>,
}

impl Step {
    fn quiet(session: Session) -> Self {
        Self {
            session,
            notice: None,
            download: None,
        }
    }

    fn notify(session: Session, notice: Notice) -> Self {
        Self {
            session,
            notice: Some(notice),
            download: None,
        }
    }
}

#[derive(Debug)]
enum Stage {
    Empty,
    Loaded {
        source: SourceImage,
    },
    Resized {
        source: SourceImage,
        artifact: ResizedArtifact,
    },
}

/// One conversion session: source, selections, and the latest artifact.
#[derive(Debug)]
pub struct Session {
    stage: Stage,
    width_field: String,
    height_field: String,
    format: OutputFormat,
    aspect_lock: bool,
    active_preset: Option<String>,
    generation: u64,
    pending: Option<FileSelection>,
    settings: RenderSettings,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}

impl Session {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            stage: Stage::Empty,
            width_field: String::new(),
            height_field: String::new(),
            format: OutputFormat::Original,
            aspect_lock: true,
            active_preset: None,
            generation: 0,
            pending: None,
            settings,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.stage {
            Stage::Empty => Phase::Empty,
            Stage::Loaded { .. } => Phase::Loaded,
            Stage::Resized { .. } => Phase::Resized,
        }
    }

    pub fn source(&self) -> Option<&SourceImage> {
        match &self.stage {
            Stage::Empty => None,
            Stage::Loaded { source } | Stage::Resized { source, .. } => Some(source),
        }
    }

    pub fn artifact(&self) -> Option<&ResizedArtifact> {
        match &self.stage {
            Stage::Resized { artifact, .. } => Some(artifact),
            _ => None,
        }
    }

    pub fn width_field(&self) -> &str {
        &self.width_field
    }

    pub fn height_field(&self) -> &str {
        &self.height_field
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn aspect_lock(&self) -> bool {
        self.aspect_lock
    }

    pub fn active_preset(&self) -> Option<&str> {
        self.active_preset.as_deref()
    }

    /// Generation of the most recent file selection; decodes must echo it.
    pub fn load_generation(&self) -> u64 {
        self.generation
    }

    pub fn can_resize(&self) -> bool {
        matches!(self.phase(), Phase::Loaded | Phase::Resized)
    }

    pub fn can_download(&self) -> bool {
        self.phase() == Phase::Resized
    }

    /// Metadata shown for the loaded source.
    pub fn file_info(&self) -> Option<FileInfo> {
        self.source().map(FileInfo::from_source)
    }

    /// Resolution of whatever is being previewed: the artifact if there is
    /// one, else the source, else `-`.
    pub fn preview_resolution(&self) -> String {
        match &self.stage {
            Stage::Empty => "-".to_string(),
            Stage::Loaded { source } => format_resolution(source.width(), source.height()),
            Stage::Resized { artifact, .. } => format_resolution(artifact.width, artifact.height),
        }
    }

    /// Apply one event and return the next session.
    pub fn handle(self, event: Event, backend: &impl ImageBackend) -> Step {
        match event {
            Event::FileSelected(selection) => self.select_file(selection),
            Event::Decoded { generation, pixels } => self.finish_load(generation, pixels),
            Event::WidthEdited(text) => Step::quiet(self.edit(Axis::Width, text)),
            Event::HeightEdited(text) => Step::quiet(self.edit(Axis::Height, text)),
            Event::PresetChosen(preset) => Step::quiet(self.choose_preset(preset)),
            Event::FormatChosen(format) => Step::quiet(Self { format, ..self }),
            Event::AspectLockToggled(aspect_lock) => Step::quiet(Self {
                aspect_lock,
                ..self
            }),
            Event::Resize => self.resize(backend),
            Event::Download => self.download(),
            Event::Reset => self.reset(),
        }
    }

    fn select_file(mut self, selection: FileSelection) -> Step {
        if !selection.media_type.starts_with("image/") {
            let err = SessionError::UnsupportedFileType(selection.media_type.clone());
            info!(name = %selection.name, media_type = %selection.media_type, "rejected non-image file");
            return Step::notify(self, Notice::from(&err));
        }
        self.generation += 1;
        debug!(generation = self.generation, name = %selection.name, "decode requested");
        self.pending = Some(selection);
        Step::quiet(self)
    }

    fn finish_load(mut self, generation: u64, pixels: Result<DynamicImage, BackendError>) -> Step {
        if generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                "discarding superseded decode"
            );
            return Step::quiet(self);
        }
        let Some(selection) = self.pending.take() else {
            debug!(generation, "discarding decode with no pending selection");
            return Step::quiet(self);
        };

        let pixels = match pixels {
            Ok(pixels) => pixels,
            Err(e) => {
                let err = SessionError::DecodeFailed(e);
                info!(name = %selection.name, error = %err, "decode failed");
                return Step::notify(self, Notice::from(&err));
            }
        };

        let source = SourceImage::new(pixels, &selection.name, &selection.media_type, selection.size);
        info!(
            name = %selection.name,
            width = source.width(),
            height = source.height(),
            "image loaded"
        );
        self.width_field = source.width().to_string();
        self.height_field = source.height().to_string();
        self.stage = Stage::Loaded { source };
        Step::notify(self, Notice::success("Image uploaded successfully"))
    }

    fn edit(mut self, axis: Axis, text: String) -> Self {
        let linked = self.source().and_then(|source| {
            let value = parse_linked_value(&text)?;
            derive_linked_axis(source.dimensions(), axis, value, self.aspect_lock)
        });

        match axis {
            Axis::Width => self.width_field = text,
            Axis::Height => self.height_field = text,
        }
        if let Some(linked) = linked {
            match axis.other() {
                Axis::Width => self.width_field = linked.to_string(),
                Axis::Height => self.height_field = linked.to_string(),
            }
        }
        self
    }

    fn choose_preset(mut self, preset: Preset) -> Self {
        self.width_field = preset.width.to_string();
        self.height_field = preset.height.to_string();
        self.active_preset = Some(preset.name);
        self
    }

    fn resize(mut self, backend: &impl ImageBackend) -> Step {
        let (source, previous) = match std::mem::replace(&mut self.stage, Stage::Empty) {
            Stage::Empty => return Step::quiet(self),
            Stage::Loaded { source } => (source, None),
            Stage::Resized { source, artifact } => (source, Some(artifact)),
        };

        let target = TargetInput::from_fields(&self.width_field, &self.height_field);
        match resize(backend, &source, target, self.format, &self.settings) {
            Ok(artifact) => {
                info!(
                    width = artifact.width,
                    height = artifact.height,
                    mime = artifact.mime,
                    bytes = artifact.bytes.len(),
                    "image resized"
                );
                self.stage = Stage::Resized { source, artifact };
                Step::notify(self, Notice::success("Image resized successfully"))
            }
            Err(e) => {
                let err = SessionError::from(e);
                info!(error = %err, "resize rejected");
                self.stage = match previous {
                    Some(artifact) => Stage::Resized { source, artifact },
                    None => Stage::Loaded { source },
                };
                Step::notify(self, Notice::from(&err))
            }
        }
    }

    fn download(self) -> Step {
        let Some(artifact) = self.artifact() else {
            return Step::quiet(self);
        };
        let download = Download {
            filename: artifact.download_name(),
            mime: artifact.mime,
            bytes: artifact.bytes.clone(),
        };
        Step {
            session: self,
            notice: Some(Notice::success("Image downloaded successfully")),
            download: Some(download),
        }
    }

    fn reset(self) -> Step {
        let generation = self.generation + 1;
        info!(generation, "session reset");
        let session = Self {
            generation,
            ..Self::new(self.settings)
        };
        Step::notify(session, Notice::success("Application reset"))
    }
}
