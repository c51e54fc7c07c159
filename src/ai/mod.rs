//! AI-assisted image and video analysis
//!
//! Every handler is a standalone call that returns either
//! `{"success": true, ...}` or `{"error": "..."}`. None of them touch the
//! search pipeline.

mod faces;
pub mod provider;
mod tesseract;
mod video;

use serde::{Serialize, Serializer};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

use crate::config::AiConfig;
use crate::error::AiError;
pub use faces::{best_match, compare_all, face_distance, similarity_percentage, FaceMatch};
pub use provider::{
    BoundingBox, CapabilityProvider, DetectedFace, Detection, FaceEncoder, FaceLocation, FrameSampler,
    LazyCapability, ObjectDetector, OcrOutput, SampledFrame, SampledVideo, TextBox, TextRecognizer,
};
pub use tesseract::parse_tsv;

/// Image formats scanned by `find_matching_faces_in_folder`
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "webp"];

/// Run an external tool and return its stdout
pub(crate) fn run_tool<I, S>(command: &str, args: I) -> Result<String, AiError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(command).args(args).output().map_err(|e| AiError::Tool {
        tool: command.to_string(),
        message: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(AiError::Tool {
            tool: command.to_string(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Outcome of one AI call
#[derive(Debug)]
pub enum AiResponse<T> {
    Success(T),
    Error(String),
}

impl<T> AiResponse<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, AiResponse::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            AiResponse::Success(data) => Some(data),
            AiResponse::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AiResponse::Success(_) => None,
            AiResponse::Error(reason) => Some(reason),
        }
    }
}

impl<T> From<Result<T, AiError>> for AiResponse<T> {
    fn from(result: Result<T, AiError>) -> Self {
        match result {
            Ok(data) => AiResponse::Success(data),
            Err(e) => AiResponse::Error(e.to_string()),
        }
    }
}

#[derive(Serialize)]
struct SuccessEnvelope<'a, T> {
    success: bool,
    #[serde(flatten)]
    data: &'a T,
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: &'a str,
}

impl<T: Serialize> Serialize for AiResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AiResponse::Success(data) => SuccessEnvelope { success: true, data }.serialize(serializer),
            AiResponse::Error(error) => ErrorEnvelope { error }.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageText {
    /// Trimmed text
    pub text: String,
    pub full_text: String,
    pub boxes: Vec<TextBox>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameText {
    pub frame: u64,
    pub time: f64,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoText {
    pub total_frames: u64,
    pub frames_processed: usize,
    pub text: String,
    pub frame_texts: Vec<FrameText>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjectDetections {
    pub detections: Vec<Detection>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FaceEntry {
    pub face_id: usize,
    pub location: FaceLocation,
    pub encoding: Vec<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageFaces {
    pub faces: Vec<FaceEntry>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoFace {
    pub frame: u64,
    pub time: f64,
    pub location: FaceLocation,
    pub encoding: Vec<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoFaces {
    pub total_frames: u64,
    pub faces_detected: usize,
    pub faces: Vec<VideoFace>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FaceComparison {
    pub faces_in_image1: usize,
    pub faces_in_image2: usize,
    pub matches: Vec<FaceMatch>,
    pub best_match: Option<FaceMatch>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FolderMatch {
    pub image_path: String,
    pub similarity_percentage: f32,
    pub distance: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct FolderMatches {
    pub reference_image: String,
    pub matches_found: usize,
    pub matches: Vec<FolderMatch>,
}

/// Which capabilities can be served right now
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Capabilities {
    pub ocr: bool,
    pub face_detection: bool,
    pub object_detection: bool,
    pub face_matching: bool,
}

/// AI handlers over one capability provider
pub struct AiFeatures {
    provider: CapabilityProvider,
}

impl AiFeatures {
    pub fn new(provider: CapabilityProvider) -> Self {
        Self { provider }
    }

    pub fn from_config(config: &AiConfig) -> Self {
        Self::new(CapabilityProvider::from_config(config))
    }

    pub fn provider(&self) -> &CapabilityProvider {
        &self.provider
    }

    pub fn extract_text_from_image(&self, image: &Path) -> AiResponse<ImageText> {
        self.image_text(image).into()
    }

    pub fn extract_text_from_video(&self, video: &Path, frame_interval: u32) -> AiResponse<VideoText> {
        self.video_text(video, frame_interval).into()
    }

    pub fn detect_objects(&self, image: &Path, confidence_threshold: f32) -> AiResponse<ObjectDetections> {
        self.objects(image, confidence_threshold).into()
    }

    pub fn detect_faces(&self, image: &Path) -> AiResponse<ImageFaces> {
        self.image_faces(image).into()
    }

    pub fn detect_faces_in_video(&self, video: &Path, frame_interval: u32) -> AiResponse<VideoFaces> {
        self.video_faces(video, frame_interval).into()
    }

    pub fn match_faces(&self, image1: &Path, image2: &Path, threshold: f32) -> AiResponse<FaceComparison> {
        self.compare_faces(image1, image2, threshold).into()
    }

    pub fn find_matching_faces_in_folder(
        &self,
        reference: &Path,
        folder: &Path,
        threshold: f32,
    ) -> AiResponse<FolderMatches> {
        self.folder_matches(reference, folder, threshold).into()
    }

    pub fn capabilities(&self) -> Capabilities {
        let faces = self.provider.face_encoder.is_available();
        Capabilities {
            ocr: self.provider.text_recognizer.is_available(),
            face_detection: faces,
            object_detection: self.provider.object_detector.is_available(),
            face_matching: faces,
        }
    }

    fn image_text(&self, image: &Path) -> Result<ImageText, AiError> {
        let ocr = self.provider.text_recognizer.get()?;
        let output = ocr.recognize(image)?;
        Ok(ImageText {
            text: output.text.trim().to_string(),
            full_text: output.text,
            boxes: output.boxes,
        })
    }

    fn video_text(&self, video: &Path, frame_interval: u32) -> Result<VideoText, AiError> {
        let ocr = self.provider.text_recognizer.get()?;
        let sampler = self.provider.frame_sampler.get()?;
        let sampled = sampler.sample(video, frame_interval)?;

        let mut frame_texts = Vec::new();
        for frame in &sampled.frames {
            let text = ocr.recognize(&frame.image)?.text;
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            frame_texts.push(FrameText {
                frame: frame.index,
                time: frame.time,
                text: text.to_string(),
            });
        }

        let text = frame_texts
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        Ok(VideoText {
            total_frames: sampled.total_frames,
            frames_processed: frame_texts.len(),
            text,
            frame_texts,
        })
    }

    fn objects(&self, image: &Path, confidence_threshold: f32) -> Result<ObjectDetections, AiError> {
        let detector = self.provider.object_detector.get()?;
        let detections = detector.detect(image, confidence_threshold)?;
        Ok(ObjectDetections {
            count: detections.len(),
            detections,
        })
    }

    fn image_faces(&self, image: &Path) -> Result<ImageFaces, AiError> {
        let encoder = self.provider.face_encoder.get()?;
        let faces: Vec<FaceEntry> = encoder
            .encode(image)?
            .into_iter()
            .enumerate()
            .map(|(face_id, face)| FaceEntry {
                face_id,
                location: face.location,
                encoding: face.encoding,
            })
            .collect();
        Ok(ImageFaces {
            count: faces.len(),
            faces,
        })
    }

    fn video_faces(&self, video: &Path, frame_interval: u32) -> Result<VideoFaces, AiError> {
        let encoder = self.provider.face_encoder.get()?;
        let sampler = self.provider.frame_sampler.get()?;
        let sampled = sampler.sample(video, frame_interval)?;

        let mut faces = Vec::new();
        for frame in &sampled.frames {
            for face in encoder.encode(&frame.image)? {
                faces.push(VideoFace {
                    frame: frame.index,
                    time: frame.time,
                    location: face.location,
                    encoding: face.encoding,
                });
            }
        }

        Ok(VideoFaces {
            total_frames: sampled.total_frames,
            faces_detected: faces.len(),
            faces,
        })
    }

    fn compare_faces(&self, image1: &Path, image2: &Path, threshold: f32) -> Result<FaceComparison, AiError> {
        let encoder = self.provider.face_encoder.get()?;
        let first = encodings(encoder.encode(image1)?);
        let second = encodings(encoder.encode(image2)?);

        if first.is_empty() {
            return Err(AiError::NoFaces("No faces found in first image"));
        }
        if second.is_empty() {
            return Err(AiError::NoFaces("No faces found in second image"));
        }

        let matches = compare_all(&first, &second, threshold);
        Ok(FaceComparison {
            faces_in_image1: first.len(),
            faces_in_image2: second.len(),
            best_match: best_match(&matches),
            matches,
        })
    }

    fn folder_matches(&self, reference: &Path, folder: &Path, threshold: f32) -> Result<FolderMatches, AiError> {
        let encoder = self.provider.face_encoder.get()?;
        let reference_face = encoder
            .encode(reference)?
            .into_iter()
            .next()
            .ok_or(AiError::NoFaces("No faces found in reference image"))?;

        let mut matches = Vec::new();
        for image in image_files(folder) {
            let faces = match encoder.encode(&image) {
                Ok(faces) => faces,
                Err(e) => {
                    log::debug!("Skipping {:?}: {}", image, e);
                    continue;
                }
            };

            let found = faces
                .iter()
                .map(|face| face_distance(&reference_face.encoding, &face.encoding))
                .find(|distance| *distance < threshold);
            if let Some(distance) = found {
                matches.push(FolderMatch {
                    image_path: image.to_string_lossy().to_string(),
                    similarity_percentage: similarity_percentage(distance),
                    distance,
                });
            }
        }

        matches.sort_by(|a, b| b.similarity_percentage.total_cmp(&a.similarity_percentage));
        Ok(FolderMatches {
            reference_image: reference.to_string_lossy().to_string(),
            matches_found: matches.len(),
            matches,
        })
    }
}

fn encodings(faces: Vec<DetectedFace>) -> Vec<Vec<f32>> {
    faces.into_iter().map(|face| face.encoding).collect()
}

fn image_files(folder: &Path) -> Vec<PathBuf> {
    WalkDir::new(folder)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .map(|e| e.into_path())
        .collect()
}
