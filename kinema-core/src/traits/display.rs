//! Display driver trait
//!
//! The display owns an RGB565 frame buffer covering the whole panel. Decoders
//! write into it through [`FrameDisplay::buffer_mut`] and [`FrameDisplay::show`]
//! pushes it to the panel.

use core::future::Future;

use crate::color::{PackedColor, BYTES_PER_PIXEL};

/// Errors that can occur with the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transfer to the panel failed
    Communication,
    /// Frame buffer does not match the panel size
    BufferSize {
        /// `width * height * 2`
        expected: usize,
        /// Actual buffer length
        actual: usize,
    },
}

/// Trait for a buffered color display
///
/// Every operation is required; a driver that cannot provide one of them is
/// not a usable playback surface.
pub trait FrameDisplay {
    /// Panel width in pixels
    fn width(&self) -> u16;

    /// Panel height in pixels
    fn height(&self) -> u16;

    /// Reset and configure the panel
    fn init(&mut self) -> impl Future<Output = Result<(), DisplayError>>;

    /// Fill the frame buffer with one color (not shown until [`Self::show`])
    fn fill(&mut self, color: PackedColor);

    /// Frame buffer, `width * height` big-endian RGB565 pixels in raster order
    fn buffer_mut(&mut self) -> &mut [u8];

    /// Push the frame buffer to the panel
    fn show(&mut self) -> impl Future<Output = Result<(), DisplayError>>;
}

/// Check that the frame buffer covers the panel exactly
pub fn check_surface<D: FrameDisplay>(display: &mut D) -> Result<(), DisplayError> {
    let expected = display.width() as usize * display.height() as usize * BYTES_PER_PIXEL;
    let actual = display.buffer_mut().len();
    if actual == expected {
        Ok(())
    } else {
        Err(DisplayError::BufferSize { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Panel {
        buffer: Vec<u8>,
    }

    impl FrameDisplay for Panel {
        fn width(&self) -> u16 {
            4
        }

        fn height(&self) -> u16 {
            2
        }

        async fn init(&mut self) -> Result<(), DisplayError> {
            Ok(())
        }

        fn fill(&mut self, color: PackedColor) {
            color.fill(&mut self.buffer);
        }

        fn buffer_mut(&mut self) -> &mut [u8] {
            &mut self.buffer
        }

        async fn show(&mut self) -> Result<(), DisplayError> {
            Ok(())
        }
    }

    #[test]
    fn test_surface_matches() {
        let mut panel = Panel { buffer: vec![0; 16] };
        assert_eq!(check_surface(&mut panel), Ok(()));
    }

    #[test]
    fn test_surface_mismatch() {
        let mut panel = Panel { buffer: vec![0; 15] };
        assert_eq!(
            check_surface(&mut panel),
            Err(DisplayError::BufferSize { expected: 16, actual: 15 })
        );
    }

    #[test]
    fn test_fill() {
        let mut panel = Panel { buffer: vec![0; 16] };
        panel.fill(PackedColor::WHITE);
        assert!(panel.buffer_mut().iter().all(|&b| b == 0xFF));
    }
}
