use std::io::Cursor;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::AudioError;

/// Container facts pulled from a WAV header
#[derive(Debug, Clone, Copy)]
pub struct WavInfo {
    pub channels: u16,
    pub sample_rate: u32,
    /// Samples per channel
    pub frames: u32,
}

const fn pcm16_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn scale_to_i16(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16
}

/// Encode a mono waveform as an in-memory 16-bit PCM WAV
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> crate::Result<Vec<u8>> {
    if samples.is_empty() {
        return Err(AudioError::Empty);
    }

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = WavWriter::new(&mut cursor, pcm16_spec(sample_rate)).map_err(AudioError::Encode)?;
    for &sample in samples {
        writer.write_sample(scale_to_i16(sample)).map_err(AudioError::Encode)?;
    }
    writer.finalize().map_err(AudioError::Encode)?;

    Ok(cursor.into_inner())
}

/// Write a mono waveform to a 16-bit PCM WAV file
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> crate::Result<()> {
    if samples.is_empty() {
        return Err(AudioError::Empty);
    }

    let mut writer = WavWriter::create(path, pcm16_spec(sample_rate)).map_err(AudioError::Encode)?;
    for &sample in samples {
        writer.write_sample(scale_to_i16(sample)).map_err(AudioError::Encode)?;
    }
    writer.finalize().map_err(AudioError::Encode)
}

/// Read a WAV file as a mono waveform, averaging channels
pub fn read_wav(path: &Path) -> crate::Result<(Vec<f32>, u32)> {
    let reader = WavReader::open(path).map_err(AudioError::InvalidWav)?;
    decode(reader)
}

/// Parse the WAV header of an in-memory payload
///
/// Rejects payloads that are not a WAV container without decoding the
/// sample data, so validation stays cheap.
pub fn probe_wav(bytes: &[u8]) -> crate::Result<WavInfo> {
    let reader = WavReader::new(Cursor::new(bytes)).map_err(AudioError::InvalidWav)?;
    let spec = reader.spec();
    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        frames: reader.duration(),
    })
}

#[allow(clippy::cast_precision_loss)]
fn decode<R: std::io::Read>(mut reader: WavReader<R>) -> crate::Result<(Vec<f32>, u32)> {
    let spec = reader.spec();
    let channels = usize::from(spec.channels);
    let mut frames: Vec<f32> = Vec::new();

    match spec.sample_format {
        SampleFormat::Float => {
            for (idx, sample) in reader.samples::<f32>().enumerate() {
                let value = sample.map_err(AudioError::InvalidWav)?;
                accumulate(&mut frames, idx, channels, value);
            }
        }
        SampleFormat::Int => {
            let max = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            for (idx, sample) in reader.samples::<i32>().enumerate() {
                let value = sample.map_err(AudioError::InvalidWav)? as f32 / max;
                accumulate(&mut frames, idx, channels, value);
            }
        }
    }

    if channels > 1 {
        for value in &mut frames {
            *value /= channels as f32;
        }
    }

    Ok((frames, spec.sample_rate))
}

fn accumulate(frames: &mut Vec<f32>, idx: usize, channels: usize, value: f32) {
    let frame = idx / channels;
    if frame == frames.len() {
        frames.push(value);
    } else {
        frames[frame] += value;
    }
}
