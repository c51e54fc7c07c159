//! Capability seams for the AI features
//!
//! Each capability is a trait object created on first use and then shared for
//! the life of the process. A capability whose backend cannot be created stays
//! unavailable; callers get `AiError::Unavailable` instead of a panic.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tempfile::TempDir;

use super::tesseract::TesseractOcr;
use super::video::FfmpegSampler;
use crate::config::AiConfig;
use crate::error::AiError;

/// Recognized text of one image plus word boxes
#[derive(Debug, Clone, Default)]
pub struct OcrOutput {
    pub text: String,
    pub boxes: Vec<TextBox>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TextBox {
    pub text: String,
    pub confidence: f32,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

/// One sampled frame written to disk
#[derive(Debug, Clone)]
pub struct SampledFrame {
    pub index: u64,
    pub time: f64,
    pub image: PathBuf,
}

/// Frames sampled from a video; the images live as long as this value
#[derive(Debug)]
pub struct SampledVideo {
    pub total_frames: u64,
    pub frames: Vec<SampledFrame>,
    pub workdir: Option<TempDir>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Detection {
    #[serde(rename = "class")]
    pub label: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct FaceLocation {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

/// A detected face and its embedding
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedFace {
    pub location: FaceLocation,
    pub encoding: Vec<f32>,
}

pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &Path) -> Result<OcrOutput, AiError>;
}

pub trait FrameSampler: Send + Sync {
    /// Sample every `interval`-th frame, starting with frame 0
    fn sample(&self, video: &Path, interval: u32) -> Result<SampledVideo, AiError>;
}

pub trait ObjectDetector: Send + Sync {
    fn detect(&self, image: &Path, confidence_threshold: f32) -> Result<Vec<Detection>, AiError>;
}

pub trait FaceEncoder: Send + Sync {
    fn encode(&self, image: &Path) -> Result<Vec<DetectedFace>, AiError>;
}

type Init<T> = Box<dyn Fn() -> Result<Arc<T>, AiError> + Send + Sync>;

/// A handle created on first use, then reused
pub struct LazyCapability<T: ?Sized> {
    name: &'static str,
    init: Option<Init<T>>,
    cell: OnceLock<Option<Arc<T>>>,
}

impl<T: ?Sized> LazyCapability<T> {
    pub fn new<F>(name: &'static str, init: F) -> Self
    where
        F: Fn() -> Result<Arc<T>, AiError> + Send + Sync + 'static,
    {
        Self {
            name,
            init: Some(Box::new(init)),
            cell: OnceLock::new(),
        }
    }

    /// Already-built handle
    pub fn ready(name: &'static str, handle: Arc<T>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(Some(handle));
        Self { name, init: None, cell }
    }

    /// No backend registered
    pub fn missing(name: &'static str) -> Self {
        Self {
            name,
            init: None,
            cell: OnceLock::new(),
        }
    }

    pub fn get(&self) -> Result<Arc<T>, AiError> {
        self.cell
            .get_or_init(|| {
                let init = self.init.as_ref()?;
                match init() {
                    Ok(handle) => Some(handle),
                    Err(e) => {
                        log::warn!("{} unavailable: {}", self.name, e);
                        None
                    }
                }
            })
            .clone()
            .ok_or(AiError::Unavailable(self.name))
    }

    pub fn is_available(&self) -> bool {
        self.get().is_ok()
    }
}

/// Every AI backend the handlers may call
pub struct CapabilityProvider {
    pub text_recognizer: LazyCapability<dyn TextRecognizer>,
    pub frame_sampler: LazyCapability<dyn FrameSampler>,
    pub object_detector: LazyCapability<dyn ObjectDetector>,
    pub face_encoder: LazyCapability<dyn FaceEncoder>,
}

impl CapabilityProvider {
    pub const OCR: &'static str = "Tesseract OCR";
    pub const FRAMES: &'static str = "Video frame sampling";
    pub const OBJECTS: &'static str = "Object detection model";
    pub const FACES: &'static str = "Face recognition";

    /// Nothing registered; every capability reports unavailable
    pub fn empty() -> Self {
        Self {
            text_recognizer: LazyCapability::missing(Self::OCR),
            frame_sampler: LazyCapability::missing(Self::FRAMES),
            object_detector: LazyCapability::missing(Self::OBJECTS),
            face_encoder: LazyCapability::missing(Self::FACES),
        }
    }

    /// Bundled backends: the tesseract and ffmpeg executables. Object
    /// detection and face embedding need a registered backend.
    pub fn from_config(config: &AiConfig) -> Self {
        let tesseract = (config.tesseract_command.clone(), config.tesseract_language.clone());
        let ffmpeg = (config.ffmpeg_command.clone(), config.ffprobe_command.clone());

        Self {
            text_recognizer: LazyCapability::new(Self::OCR, move || {
                let ocr = TesseractOcr::detect(&tesseract.0, &tesseract.1)?;
                Ok(Arc::new(ocr) as Arc<dyn TextRecognizer>)
            }),
            frame_sampler: LazyCapability::new(Self::FRAMES, move || {
                let sampler = FfmpegSampler::detect(&ffmpeg.0, &ffmpeg.1)?;
                Ok(Arc::new(sampler) as Arc<dyn FrameSampler>)
            }),
            ..Self::empty()
        }
    }

    pub fn with_text_recognizer(mut self, handle: Arc<dyn TextRecognizer>) -> Self {
        self.text_recognizer = LazyCapability::ready(Self::OCR, handle);
        self
    }

    pub fn with_frame_sampler(mut self, handle: Arc<dyn FrameSampler>) -> Self {
        self.frame_sampler = LazyCapability::ready(Self::FRAMES, handle);
        self
    }

    pub fn with_object_detector(mut self, handle: Arc<dyn ObjectDetector>) -> Self {
        self.object_detector = LazyCapability::ready(Self::OBJECTS, handle);
        self
    }

    pub fn with_face_encoder(mut self, handle: Arc<dyn FaceEncoder>) -> Self {
        self.face_encoder = LazyCapability::ready(Self::FACES, handle);
        self
    }
}
