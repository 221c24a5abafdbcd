//! PCM Ingestion Module
//!
//! Recording value type plus raw-PCM and WAV decode/encode:
//! - Raw: headerless interleaved 16-bit signed little-endian frames
//! - WAV: standard containers via hound, 16-bit integer only

pub mod decode;
pub mod recording;

pub use decode::{
    decode_raw, encode_raw, load_audio, load_raw, load_wav, save_audio, save_raw, save_wav,
};
pub use recording::{check_same_shape, Recording, RecordingInfo};
