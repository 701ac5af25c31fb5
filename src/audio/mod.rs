//! Audio decoding and resampling.

mod decode;
mod resample;

pub use decode::{Recording, decode_audio_file};
pub use resample::resample;
