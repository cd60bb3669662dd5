/// Whole-file decoding to interleaved stereo using Symphonia
use soul_core::{Result, SampleRate, SoulError};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decoded audio, always interleaved stereo f32
pub struct DecodedAudio {
    pub sample_rate: SampleRate,
    pub samples: Vec<f32>,
}

impl DecodedAudio {
    pub fn frames(&self) -> usize {
        self.samples.len() / 2
    }
}

/// Decode `path` completely
///
/// Mono is duplicated to both channels; for more than two channels only the
/// first two are kept.
pub fn decode_stereo(path: &Path) -> Result<DecodedAudio> {
    if !path.exists() {
        return Err(SoulError::audio(format!("File not found: {}", path.display())));
    }

    let file = std::fs::File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| SoulError::audio(format!("Failed to probe file: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| SoulError::audio("No audio tracks found"))?;

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| SoulError::audio("Unknown sample rate"))?;
    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| SoulError::audio(format!("Failed to create decoder: {}", e)))?;

    let mut samples = Vec::new();
    let mut buffer: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => {
                return Err(SoulError::audio(format!("Error reading packet: {}", e)));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // Corrupt packets are skipped, the rest of the stream is still usable
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::warn!("Skipping undecodable packet in {}: {}", path.display(), e);
                continue;
            }
            Err(e) => return Err(SoulError::audio(format!("Decode error: {}", e))),
        };

        let spec = *decoded.spec();
        let channels = spec.channels.count();
        if channels == 0 {
            continue;
        }

        let needed = decoded.capacity() * channels;
        if buffer.as_ref().map_or(true, |b| b.capacity() < needed) {
            buffer = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
        }
        if let Some(sample_buffer) = buffer.as_mut() {
            sample_buffer.copy_interleaved_ref(decoded);
            append_stereo(&mut samples, sample_buffer.samples(), channels);
        }
    }

    Ok(DecodedAudio {
        sample_rate: SampleRate::new(sample_rate),
        samples,
    })
}

/// Append `interleaved` frames of `channels` channels as stereo frames
fn append_stereo(out: &mut Vec<f32>, interleaved: &[f32], channels: usize) {
    out.reserve(interleaved.len() / channels * 2);
    for frame in interleaved.chunks_exact(channels) {
        let left = frame[0];
        let right = if channels == 1 { left } else { frame[1] };
        out.push(left);
        out.push(right);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_is_duplicated() {
        let mut out = Vec::new();
        append_stereo(&mut out, &[0.1, 0.2], 1);
        assert_eq!(out, vec![0.1, 0.1, 0.2, 0.2]);
    }

    #[test]
    fn surround_keeps_front_pair() {
        let mut out = Vec::new();
        append_stereo(&mut out, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3);
        assert_eq!(out, vec![1.0, 2.0, 4.0, 5.0]);
    }

    #[test]
    fn missing_file_is_an_audio_error() {
        let result = decode_stereo(Path::new("/nonexistent/song.flac"));
        assert!(matches!(result, Err(SoulError::Audio(_))));
    }

    #[test]
    fn garbage_file_fails_to_probe() {
        let mut file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"definitely not audio").unwrap();
        assert!(decode_stereo(file.path()).is_err());
    }
}
