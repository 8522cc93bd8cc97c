//! Structured stream fields
//!
//! Fixed-schema video and audio attributes kept as native values. There is
//! no validation: zero and negative values are legal and usually mean
//! "unset".

use crate::core::error::{MetaError, MetaResult};
use crate::types::context::ContextHandle;
use crate::types::fourcc::FourCc;

/// Number of planes with a stride
pub const VIDEO_PLANES: usize = 4;

/// Instance id of a node that was never assigned one
pub const INSTANCE_UNSET: u32 = u32::MAX;

// Generates a getter/setter pair for a plain copyable field
macro_rules! field_accessors {
    ($($(#[$doc:meta])* $field:ident, $setter:ident: $ty:ty;)*) => {
        $(
            $(#[$doc])*
            pub fn $field(&self) -> $ty {
                self.$field
            }

            $(#[$doc])*
            pub fn $setter(&mut self, value: $ty) {
                self.$field = value;
            }
        )*
    };
}

/// Video and audio attributes of a stream
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreamFields {
    video_width: i32,
    video_height: i32,
    video_lines: i32,
    video_stride: [i32; VIDEO_PLANES],
    pixel_width: i32,
    pixel_height: i32,
    video_x: i32,
    video_y: i32,
    video_frame_rate: f32,
    video_bitrate: i32,
    video_min_bitrate: i32,
    video_max_bitrate: i32,
    fourcc: FourCc,
    instance: u32,

    audio_channels: i32,
    audio_sample_rate: i32,
    audio_bit_rate: i32,
    audio_bits_per_sample: i32,
    audio_block_align: i32,
    audio_volume: f32,
    send_audio_only: bool,
    subtitle: bool,

    #[cfg_attr(feature = "serde", serde(skip))]
    context: Option<ContextHandle>,
}

impl StreamFields {
    /// Create fields in the unset state
    pub fn new() -> Self {
        Self {
            video_width: 0,
            video_height: 0,
            video_lines: 0,
            video_stride: [0; VIDEO_PLANES],
            pixel_width: 0,
            pixel_height: 0,
            video_x: 0,
            video_y: 0,
            video_frame_rate: 0.0,
            video_bitrate: 0,
            video_min_bitrate: 0,
            video_max_bitrate: 0,
            fourcc: FourCc::default(),
            instance: INSTANCE_UNSET,
            audio_channels: 0,
            audio_sample_rate: 0,
            audio_bit_rate: 0,
            audio_bits_per_sample: 0,
            audio_block_align: 0,
            audio_volume: 0.0,
            send_audio_only: false,
            subtitle: false,
            context: None,
        }
    }

    /// Return every field to the unset state
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    field_accessors! {
        /// Picture width in pixels
        video_width, set_video_width: i32;
        /// Picture height in pixels
        video_height, set_video_height: i32;
        /// Number of lines in the frame buffer
        video_lines, set_video_lines: i32;
        /// Pixel aspect numerator
        pixel_width, set_pixel_width: i32;
        /// Pixel aspect denominator
        pixel_height, set_pixel_height: i32;
        /// Frames per second
        video_frame_rate, set_video_frame_rate: f32;
        /// Target video bitrate
        video_bitrate, set_video_bitrate: i32;
        video_min_bitrate, set_video_min_bitrate: i32;
        video_max_bitrate, set_video_max_bitrate: i32;
        /// Codec tag
        fourcc, set_fourcc: FourCc;
        /// Instance id, [`INSTANCE_UNSET`] by default
        instance, set_instance: u32;
        /// Number of audio channels
        audio_channels, set_audio_channels: i32;
        /// Audio sample rate in Hz
        audio_sample_rate, set_audio_sample_rate: i32;
        audio_bit_rate, set_audio_bit_rate: i32;
        audio_bits_per_sample, set_audio_bits_per_sample: i32;
        audio_block_align, set_audio_block_align: i32;
        audio_volume, set_audio_volume: f32;
        /// Only the audio track of the stream is sent
        send_audio_only, set_send_audio_only: bool;
        /// Opaque caller context
        context, set_context: Option<ContextHandle>;
    }

    /// Check if an instance id was assigned
    pub fn has_instance(&self) -> bool {
        self.instance != INSTANCE_UNSET
    }

    /// Check if the stream carries subtitles
    pub fn is_subtitle(&self) -> bool {
        self.subtitle
    }

    /// Mark the stream as a subtitle stream
    pub fn set_subtitle(&mut self, value: bool) {
        self.subtitle = value;
    }

    /// Display position as `(x, y)`
    pub fn video_position(&self) -> (i32, i32) {
        (self.video_x, self.video_y)
    }

    /// Set the display position
    pub fn set_video_position(&mut self, x: i32, y: i32) {
        self.video_x = x;
        self.video_y = y;
    }

    /// Row stride of a plane
    pub fn video_stride(&self, plane: usize) -> MetaResult<i32> {
        self.video_stride
            .get(plane)
            .copied()
            .ok_or(MetaError::IndexOutOfRange {
                index: plane,
                len: VIDEO_PLANES,
            })
    }

    /// Set the row stride of a plane
    pub fn set_video_stride(&mut self, plane: usize, stride: i32) -> MetaResult<()> {
        let slot = self
            .video_stride
            .get_mut(plane)
            .ok_or(MetaError::IndexOutOfRange {
                index: plane,
                len: VIDEO_PLANES,
            })?;
        *slot = stride;
        Ok(())
    }
}

impl Default for StreamFields {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_fields_unset() {
        let fields = StreamFields::new();
        assert_eq!(fields.video_width(), 0);
        assert_eq!(fields.audio_sample_rate(), 0);
        assert_eq!(fields.audio_volume(), 0.0);
        assert_eq!(fields.video_frame_rate(), 0.0);
        assert_eq!(fields.fourcc().as_u32(), 0);
        assert_eq!(fields.instance(), INSTANCE_UNSET);
        assert!(!fields.has_instance());
        assert!(!fields.send_audio_only());
        assert!(!fields.is_subtitle());
        assert_eq!(fields.context(), None);
        for plane in 0..VIDEO_PLANES {
            assert_eq!(fields.video_stride(plane), Ok(0));
        }
    }

    #[test]
    fn test_stride_bounds() {
        let mut fields = StreamFields::new();
        fields.set_video_stride(3, 960).unwrap();
        assert_eq!(fields.video_stride(3), Ok(960));
        assert_eq!(
            fields.video_stride(4),
            Err(MetaError::IndexOutOfRange { index: 4, len: 4 })
        );
        assert!(fields.set_video_stride(7, 1).is_err());
    }

    #[test]
    fn test_negative_values_kept() {
        let mut fields = StreamFields::new();
        fields.set_video_bitrate(-1);
        fields.set_video_position(-16, 32);
        assert_eq!(fields.video_bitrate(), -1);
        assert_eq!(fields.video_position(), (-16, 32));
    }

    #[test]
    fn test_reset() {
        let mut fields = StreamFields::new();
        fields.set_audio_channels(2);
        fields.set_instance(7);
        fields.set_subtitle(true);
        fields.reset();
        assert_eq!(fields, StreamFields::new());
    }
}
