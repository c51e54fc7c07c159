//! Video frame sampling through `ffprobe` and `ffmpeg`

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::provider::{FrameSampler, SampledFrame, SampledVideo};
use super::run_tool;
use crate::error::AiError;

pub struct FfmpegSampler {
    ffmpeg: String,
    ffprobe: String,
}

impl FfmpegSampler {
    pub fn detect(ffmpeg: &str, ffprobe: &str) -> Result<Self, AiError> {
        for tool in [ffmpeg, ffprobe] {
            let status = Command::new(tool).arg("-version").output().map_err(|e| AiError::Tool {
                tool: tool.to_string(),
                message: e.to_string(),
            })?;
            if !status.status.success() {
                return Err(AiError::Tool {
                    tool: tool.to_string(),
                    message: "version check failed".to_string(),
                });
            }
        }
        Ok(Self {
            ffmpeg: ffmpeg.to_string(),
            ffprobe: ffprobe.to_string(),
        })
    }
}

impl FrameSampler for FfmpegSampler {
    fn sample(&self, video: &Path, interval: u32) -> Result<SampledVideo, AiError> {
        if !video.is_file() {
            return Err(AiError::Unreadable(video.to_path_buf()));
        }
        let interval = interval.max(1);
        let video_arg = video.to_string_lossy();

        let stats = run_tool(
            &self.ffprobe,
            [
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-count_frames",
                "-show_entries",
                "stream=r_frame_rate,nb_read_frames",
                "-of",
                "csv=p=0",
                &*video_arg,
            ],
        )?;
        let (fps, total_frames) = parse_stream_stats(&stats).ok_or_else(|| AiError::Tool {
            tool: self.ffprobe.clone(),
            message: format!("unexpected stream info: {}", stats.trim()),
        })?;

        let workdir = tempfile::tempdir()?;
        let pattern = workdir.path().join("frame_%08d.png");
        let filter = format!("select=not(mod(n\\,{}))", interval);
        run_tool(
            &self.ffmpeg,
            [
                "-v",
                "error",
                "-i",
                &*video_arg,
                "-vf",
                filter.as_str(),
                "-vsync",
                "vfr",
                &*pattern.to_string_lossy(),
            ],
        )?;

        let frames = sampled_frames(workdir.path(), interval, fps)?;
        Ok(SampledVideo {
            total_frames,
            frames,
            workdir: Some(workdir),
        })
    }
}

/// Parse `ffprobe -of csv=p=0` output such as `30000/1001,412`
fn parse_stream_stats(output: &str) -> Option<(f64, u64)> {
    let line = output.lines().find(|l| !l.trim().is_empty())?;
    let mut fps = None;
    let mut frames = None;

    for field in line.trim().split(',') {
        if let Some((num, den)) = field.split_once('/') {
            let num: f64 = num.parse().ok()?;
            let den: f64 = den.parse().ok()?;
            if den > 0.0 {
                fps = Some(num / den);
            }
        } else if let Ok(count) = field.parse::<u64>() {
            frames = Some(count);
        }
    }

    Some((fps.filter(|f| *f > 0.0)?, frames?))
}

/// Output frame k (0-based, in name order) is source frame k * interval
fn sampled_frames(dir: &Path, interval: u32, fps: f64) -> Result<Vec<SampledFrame>, AiError> {
    let mut images: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
        .collect();
    images.sort();

    Ok(images
        .into_iter()
        .enumerate()
        .map(|(k, image)| {
            let index = k as u64 * interval as u64;
            SampledFrame {
                index,
                time: index as f64 / fps,
                image,
            }
        })
        .collect())
}
