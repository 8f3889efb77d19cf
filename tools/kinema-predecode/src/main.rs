//! Kinema predecoder
//!
//! Converts a GIF into a folder of Delta-RLE frames so the player can stream
//! them without running LZW on the device:
//!
//! ```text
//! kinema-predecode intro.gif --out-dir animations/frames_delta/intro
//! ```
//!
//! Every GIF image is decoded on top of the previous one, then the first
//! screen is stored whole and each later screen as its changes.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use kinema_core::codec::{encode_delta, encode_full, max_encoded_len, FRAME_SUFFIX};
use kinema_core::color::BYTES_PER_PIXEL;
use kinema_core::config::SETTINGS_FILE;
use kinema_core::gif::{GifDecoder, LzwDecoder};
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "kinema-predecode")]
#[command(about = "Convert a GIF into Delta-RLE frames", long_about = None)]
struct Args {
    /// GIF file to convert
    input: PathBuf,

    /// Output folder (defaults to the input name without its extension)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Required screen width (defaults to the GIF's own)
    #[arg(long)]
    width: Option<u16>,

    /// Required screen height (defaults to the GIF's own)
    #[arg(long)]
    height: Option<u16>,
}

/// One encoded screen
#[derive(Debug, Clone, PartialEq, Eq)]
struct EncodedFrame {
    data: Vec<u8>,
    delay_ms: u32,
}

/// Logical screen size from a GIF header
fn screen_size(gif: &[u8]) -> Option<(u16, u16)> {
    let size = gif.get(6..10)?;
    Some((
        u16::from_le_bytes([size[0], size[1]]),
        u16::from_le_bytes([size[2], size[3]]),
    ))
}

/// Decode every image of `gif` and encode the resulting screens
fn predecode(gif: &[u8], width: u16, height: u16) -> Result<Vec<EncodedFrame>> {
    let mut decoder = GifDecoder::new(gif, width, height).context("unsupported GIF")?;
    let mut lzw = Box::new(LzwDecoder::new());

    let pixels = width as usize * height as usize;
    let mut screen = vec![0u8; pixels * BYTES_PER_PIXEL];
    decoder.background_color().fill(&mut screen);
    let mut previous: Option<Vec<u8>> = None;
    let mut out = vec![0u8; max_encoded_len(pixels)];
    let mut frames = Vec::new();

    while let Some(frame) = decoder
        .next_frame(&mut lzw, &mut screen)
        .with_context(|| format!("image {} is malformed", frames.len()))?
    {
        let len = match &previous {
            None => encode_full(&screen, &mut out)?,
            Some(prev) => encode_delta(prev, &screen, &mut out)?,
        };
        debug!(
            index = frames.len(),
            bytes = len,
            delay_ms = frame.delay_ms,
            "encoded frame"
        );

        frames.push(EncodedFrame {
            data: out[..len].to_vec(),
            delay_ms: frame.delay_ms,
        });
        previous = Some(screen.clone());
    }

    Ok(frames)
}

/// Contents of a generated settings file
fn settings_text(width: u16, height: u16, frames: &[EncodedFrame]) -> String {
    let total_ms: u32 = frames.iter().map(|f| f.delay_ms).sum();
    format!(
        "# Generated by kinema-predecode\n\
         FRAME_W={width}\n\
         FRAME_H={height}\n\
         FRAME_SKIP=1\n\
         TARGET_LOOP_MS={total_ms}\n\
         USE_TIMER_PACING=True\n"
    )
}

fn frame_name(index: usize) -> String {
    format!("frame_{index:03}{FRAME_SUFFIX}")
}

/// Write the frames, and a settings file unless one exists
fn write_folder(dir: &Path, width: u16, height: u16, frames: &[EncodedFrame]) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    for (index, frame) in frames.iter().enumerate() {
        let path = dir.join(frame_name(index));
        fs::write(&path, &frame.data)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    let settings = dir.join(SETTINGS_FILE);
    if settings.exists() {
        info!("keeping existing {}", settings.display());
    } else {
        fs::write(&settings, settings_text(width, height, frames))
            .with_context(|| format!("failed to write {}", settings.display()))?;
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let gif = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let Some((gif_width, gif_height)) = screen_size(&gif) else {
        bail!("{} is too short to be a GIF", args.input.display());
    };
    let width = args.width.unwrap_or(gif_width);
    let height = args.height.unwrap_or(gif_height);

    let out_dir = match args.out_dir {
        Some(dir) => dir,
        None => args.input.with_extension(""),
    };

    let frames = predecode(&gif, width, height)?;
    if frames.is_empty() {
        warn!("{} holds no images", args.input.display());
    }

    write_folder(&out_dir, width, height, &frames)?;

    let bytes: usize = frames.iter().map(|f| f.data.len()).sum();
    info!(
        frames = frames.len(),
        bytes,
        "wrote {}x{} frames to {}",
        width,
        height,
        out_dir.display()
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    run(Args::parse())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinema_core::codec::{decode_into, Placement};

    /// 10x10 four-color GIF89a with one image
    const SAMPLE: [u8; 69] = [
        0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x0A, 0x00, 0x0A, 0x00, 0x91, 0x00, 0x00, 0xFF, 0xFF,
        0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0x00, 0x00, 0x00, 0x21, 0xF9, 0x04, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x2C, 0x00, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x0A, 0x00, 0x00, 0x02, 0x16,
        0x8C, 0x2D, 0x99, 0x87, 0x2A, 0x1C, 0xDC, 0x33, 0xA0, 0x02, 0x75, 0xEC, 0x95, 0xFA, 0xA8,
        0xDE, 0x60, 0x8C, 0x04, 0x91, 0x4C, 0x01, 0x00, 0x3B,
    ];

    /// SAMPLE with its image repeated, the second one held for 250 ms
    fn twice() -> Vec<u8> {
        let image = &SAMPLE[33..68];
        let mut gif = SAMPLE[..68].to_vec();
        gif.extend_from_slice(&[0x21, 0xF9, 0x04, 0x00, 25, 0x00, 0x00, 0x00]);
        gif.extend_from_slice(image);
        gif.push(0x3B);
        gif
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("kinema-predecode-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_screen_size() {
        assert_eq!(screen_size(&SAMPLE), Some((10, 10)));
        assert_eq!(screen_size(b"GIF89a\x0A"), None);
    }

    #[test]
    fn test_first_frame_is_full() {
        let frames = predecode(&SAMPLE, 10, 10).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].delay_ms, 100);

        // Decodes to the same screen over any starting buffer
        let mut expected = vec![0u8; 200];
        let mut decoder = GifDecoder::new(&SAMPLE, 10, 10).unwrap();
        decoder.background_color().fill(&mut expected);
        decoder
            .next_frame(&mut LzwDecoder::new(), &mut expected)
            .unwrap();

        let mut screen = vec![0xAAu8; 200];
        decode_into(&frames[0].data, &mut screen, &Placement::identity(10, 10));
        assert_eq!(screen, expected);
    }

    #[test]
    fn test_repeated_image_is_all_skip() {
        let gif = twice();
        let frames = predecode(&gif, 10, 10).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].data, [100, 0]);
        assert_eq!(frames[1].delay_ms, 250);
    }

    #[test]
    fn test_size_must_match() {
        let err = predecode(&SAMPLE, 240, 135).unwrap_err();
        assert!(format!("{err:#}").contains("240x135"));
    }

    #[test]
    fn test_settings_text() {
        let frames = predecode(&twice(), 10, 10).unwrap();
        let text = settings_text(10, 10, &frames);
        let mut settings = kinema_core::config::Settings::default();
        assert_eq!(settings.apply(&text), 5);
        assert_eq!((settings.frame_width, settings.frame_height), (10, 10));
        assert_eq!(settings.frame_skip, 1);
        assert_eq!(settings.target_loop_ms, 350);
    }

    #[test]
    fn test_write_folder_keeps_settings() {
        let dir = temp_dir("keep");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(SETTINGS_FILE), "FRAME_SKIP=3\n").unwrap();

        let frames = predecode(&twice(), 10, 10).unwrap();
        write_folder(&dir, 10, 10, &frames).unwrap();

        assert_eq!(fs::read_to_string(dir.join(SETTINGS_FILE)).unwrap(), "FRAME_SKIP=3\n");
        assert_eq!(fs::read(dir.join("frame_001.drle")).unwrap(), [100, 0]);
        assert!(dir.join("frame_000.drle").exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_folder_creates_settings() {
        let dir = temp_dir("new");
        let frames = predecode(&SAMPLE, 10, 10).unwrap();
        write_folder(&dir, 10, 10, &frames).unwrap();

        let text = fs::read_to_string(dir.join(SETTINGS_FILE)).unwrap();
        assert!(text.contains("FRAME_W=10"));
        assert!(text.contains("TARGET_LOOP_MS=100"));
        fs::remove_dir_all(&dir).unwrap();
    }
}
