use anyhow::Context;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};

/// A decoded picture as packed RGB24.
pub struct DecodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode the first frame of an image (or video) file to RGB24 through ffmpeg.
/// Alpha is dropped by the rgb24 conversion.
pub fn decode_image(input_path: &str) -> anyhow::Result<DecodedImage> {
    let mut child = FfmpegCommand::new()
        .input(input_path)
        .args(["-frames:v", "1"])
        .rawvideo()
        .spawn()
        .context("failed to spawn ffmpeg — is it installed?")?;

    let events = child.iter().context("failed to iterate ffmpeg events")?;

    let mut errors = Vec::new();
    for event in events {
        match event {
            FfmpegEvent::OutputFrame(frame) => {
                let expected = frame.width as usize * frame.height as usize * 3;
                if frame.data.len() != expected {
                    anyhow::bail!(
                        "ffmpeg returned {} bytes for a {}x{} frame",
                        frame.data.len(),
                        frame.width,
                        frame.height
                    );
                }
                let _ = child.kill();
                return Ok(DecodedImage {
                    data: frame.data,
                    width: frame.width,
                    height: frame.height,
                });
            }
            FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, msg) => {
                tracing::debug!("ffmpeg: {msg}");
                errors.push(msg);
            }
            FfmpegEvent::Error(msg) => errors.push(msg),
            _ => {}
        }
    }

    match errors.last() {
        Some(msg) => anyhow::bail!("could not decode {input_path}: {msg}"),
        None => anyhow::bail!("could not decode {input_path}: ffmpeg produced no frame"),
    }
}
