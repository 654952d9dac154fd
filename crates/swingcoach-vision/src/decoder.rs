//! Frame decoding through an `ffmpeg` child process
//!
//! ffmpeg re-encodes the video as a stream of binary PPM images on stdout.
//! Each image carries its own header, so rotated phone footage comes out
//! with the dimensions ffmpeg actually produced.

use image::codecs::pnm::PnmDecoder;
use image::{ColorType, ImageDecoder, ImageError, RgbImage};
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStderr, ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};
use swingcoach_core::{DecodeError, Frame};

/// Largest raster accepted from a single frame header (8K RGB fits)
const MAX_FRAME_BYTES: u64 = 256 * 1024 * 1024;

/// Trailing ffmpeg stderr kept for error reports
const STDERR_TAIL_BYTES: usize = 16 * 1024;

/// Decoder configuration
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// ffmpeg executable, resolved through PATH when relative
    pub ffmpeg: PathBuf,
}

impl DecoderConfig {
    pub fn new() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads consecutive 8-bit RGB PPM images from a byte stream
pub struct PpmFrameReader<R> {
    reader: R,
    next_index: usize,
    finished: bool,
}

impl<R: BufRead> PpmFrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            next_index: 0,
            finished: false,
        }
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, DecodeError> {
        if self.reader.fill_buf()?.is_empty() {
            return Ok(None);
        }
        let index = self.next_index;

        let decoder = PnmDecoder::new(&mut self.reader).map_err(|e| frame_error(index, e))?;
        if decoder.color_type() != ColorType::Rgb8 {
            return Err(DecodeError::InvalidFrame {
                index,
                reason: format!("expected 8-bit RGB, got {:?}", decoder.color_type()),
            });
        }

        let (width, height) = decoder.dimensions();
        let raster_len = Some(decoder.total_bytes())
            .filter(|&len| len > 0 && len <= MAX_FRAME_BYTES)
            .and_then(|len| usize::try_from(len).ok())
            .ok_or_else(|| DecodeError::InvalidFrame {
                index,
                reason: format!("unsupported frame size {}x{}", width, height),
            })?;

        let mut raster = vec![0u8; raster_len];
        decoder
            .read_image(&mut raster)
            .map_err(|e| frame_error(index, e))?;

        let image = RgbImage::from_raw(width, height, raster).ok_or_else(|| {
            DecodeError::InvalidFrame {
                index,
                reason: "raster does not match dimensions".to_string(),
            }
        })?;
        self.next_index += 1;
        Ok(Some(Frame::new(index, image)))
    }
}

fn frame_error(index: usize, err: ImageError) -> DecodeError {
    match err {
        ImageError::IoError(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            DecodeError::TruncatedFrame { index }
        }
        ImageError::IoError(e) => DecodeError::Io(e),
        other => DecodeError::InvalidFrame {
            index,
            reason: other.to_string(),
        },
    }
}

impl<R: BufRead> Iterator for PpmFrameReader<R> {
    type Item = Result<Frame, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_frame() {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Keep reading ffmpeg's stderr so it never blocks on a full pipe.
/// Only the last `STDERR_TAIL_BYTES` are returned.
fn drain_stderr(mut pipe: ChildStderr) -> io::Result<JoinHandle<String>> {
    thread::Builder::new()
        .name("ffmpeg-stderr".to_string())
        .spawn(move || {
            let mut tail = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                match pipe.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(n) => {
                        tail.extend_from_slice(&chunk[..n]);
                        if tail.len() > STDERR_TAIL_BYTES {
                            tail.drain(..tail.len() - STDERR_TAIL_BYTES);
                        }
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(_) => break,
                }
            }
            String::from_utf8_lossy(&tail).into_owned()
        })
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Lazily decodes a video file into frames in capture order.
///
/// The ffmpeg child is reaped when the stream ends and killed if the decoder
/// is dropped early, so no process outlives the iteration.
pub struct FrameDecoder {
    child: Option<Child>,
    stderr: Option<JoinHandle<String>>,
    frames: PpmFrameReader<BufReader<ChildStdout>>,
    program: String,
    done: bool,
}

impl FrameDecoder {
    pub fn open(config: &DecoderConfig, video: &Path) -> Result<Self, DecodeError> {
        let program = config.ffmpeg.display().to_string();
        let mut child = Command::new(&config.ffmpeg)
            .args(["-nostdin", "-v", "error", "-i"])
            .arg(video)
            .args([
                "-map", "0:v:0", "-an", "-sn", "-f", "image2pipe", "-vcodec", "ppm",
                "-pix_fmt", "rgb24", "pipe:1",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| DecodeError::Spawn {
                program: program.clone(),
                source,
            })?;

        let Some(stdout) = child.stdout.take() else {
            reap(&mut child);
            return Err(DecodeError::Spawn {
                program,
                source: io::Error::new(io::ErrorKind::BrokenPipe, "stdout not captured"),
            });
        };
        let stderr = match child.stderr.take().map(drain_stderr).transpose() {
            Ok(stderr) => stderr,
            Err(e) => {
                reap(&mut child);
                return Err(DecodeError::Io(e));
            }
        };

        tracing::debug!(video = %video.display(), pid = child.id(), "started frame decoder");

        Ok(Self {
            child: Some(child),
            stderr,
            frames: PpmFrameReader::new(BufReader::new(stdout)),
            program,
            done: false,
        })
    }

    /// Wait for ffmpeg after its stdout closes and surface a failing exit
    fn finish(&mut self) -> Result<(), DecodeError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        let status = child.wait()?;
        let stderr = self
            .stderr
            .take()
            .and_then(|drain| drain.join().ok())
            .unwrap_or_default();
        if status.success() {
            Ok(())
        } else {
            Err(DecodeError::Decoder {
                status: format!("{} ({})", status, self.program),
                stderr: stderr.trim().to_string(),
            })
        }
    }

    /// The stderr drain is detached, it exits once the pipe closes
    fn kill(&mut self) {
        if let Some(mut child) = self.child.take() {
            reap(&mut child);
        }
        self.stderr = None;
    }
}

impl Iterator for FrameDecoder {
    type Item = Result<Frame, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.frames.next() {
            Some(Ok(frame)) => Some(Ok(frame)),
            Some(Err(e)) => {
                self.done = true;
                if matches!(e, DecodeError::TruncatedFrame { .. }) {
                    // stdout hit EOF, so ffmpeg is exiting and its stderr explains why
                    if let Err(exit) = self.finish() {
                        return Some(Err(exit));
                    }
                } else {
                    self.kill();
                }
                Some(Err(e))
            }
            None => {
                self.done = true;
                self.finish().err().map(Err)
            }
        }
    }
}

impl Drop for FrameDecoder {
    fn drop(&mut self) {
        self.kill();
    }
}
