use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::cli::AiCommand;
use crate::state::AppState;

/// Run one AI call and print its JSON response
pub fn run_ai<W: Write>(state: &AppState, command: &AiCommand, out: &mut W) -> Result<()> {
    let ai = &state.ai;
    let defaults = &state.config.ai;

    match command {
        AiCommand::Capabilities => write_json(out, &ai.capabilities()),
        AiCommand::Ocr { image } => write_json(out, &ai.extract_text_from_image(image)),
        AiCommand::VideoOcr { video, interval } => write_json(
            out,
            &ai.extract_text_from_video(video, interval.unwrap_or(defaults.frame_interval)),
        ),
        AiCommand::Objects { image, confidence } => write_json(
            out,
            &ai.detect_objects(image, confidence.unwrap_or(defaults.confidence_threshold)),
        ),
        AiCommand::Faces { image } => write_json(out, &ai.detect_faces(image)),
        AiCommand::VideoFaces { video, interval } => write_json(
            out,
            &ai.detect_faces_in_video(video, interval.unwrap_or(defaults.frame_interval)),
        ),
        AiCommand::MatchFaces {
            image1,
            image2,
            threshold,
        } => write_json(
            out,
            &ai.match_faces(image1, image2, threshold.unwrap_or(defaults.face_threshold)),
        ),
        AiCommand::FindFaces {
            reference,
            folder,
            threshold,
        } => write_json(
            out,
            &ai.find_matching_faces_in_folder(reference, folder, threshold.unwrap_or(defaults.face_threshold)),
        ),
    }
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
