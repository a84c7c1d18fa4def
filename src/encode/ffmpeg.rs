//! FFmpeg Encoder
//! Composes every frame in-process and streams raw RGBA video to the `ffmpeg`
//! executable over stdin for MP4 and AVI output.

use crate::config::EncodeSettings;
use crate::encode::canvas::{canvas_size, compose_on_canvas, even_size};
use crate::encode::{frames_for_duration, EncodeError, Encoder, OutputFormat, TimedFrame};
use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{ChildStdin, Command, ExitStatus, Stdio};
use std::thread;

const FFMPEG: &str = "ffmpeg";

/// Video encoder backed by the ffmpeg command line tool.
pub struct FfmpegEncoder {
    format: OutputFormat,
    settings: EncodeSettings,
    program: PathBuf,
}

impl FfmpegEncoder {
    pub fn new(format: OutputFormat, settings: EncodeSettings) -> Self {
        Self {
            format,
            settings,
            program: PathBuf::from(FFMPEG),
        }
    }

    #[cfg(test)]
    fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Check if ffmpeg is available on PATH.
    pub fn is_available() -> bool {
        program_available(Path::new(FFMPEG))
    }

    /// Full argument list for one encode of a `size` canvas read from stdin.
    pub fn build_args(&self, output: &Path, (w, h): (u32, u32)) -> Vec<OsString> {
        let fps = self.settings.fps.to_string();
        let size = format!("{w}x{h}");
        let mut args: Vec<OsString> = [
            "-hide_banner",
            "-loglevel",
            "error",
            "-y",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-video_size",
            size.as_str(),
            "-framerate",
            fps.as_str(),
            "-i",
            "-",
            "-r",
            fps.as_str(),
            "-pix_fmt",
            "yuv420p",
        ]
        .into_iter()
        .map(OsString::from)
        .collect();

        if let Some(codec) = self.format.ffmpeg_codec() {
            args.push("-c:v".into());
            args.push(codec.into());
        }
        args.push("-b:v".into());
        args.push(self.settings.bitrate.clone().into());
        if self.format == OutputFormat::Mp4 {
            args.push("-preset".into());
            args.push(self.settings.preset.clone().into());
        }
        args.push("-an".into());
        args.push(output.as_os_str().to_owned());
        args
    }

    /// Decode, compose and write every frame, repeated to fill its duration.
    fn stream_frames(
        &self,
        stdin: &mut ChildStdin,
        frames: &[TimedFrame],
        (w, h): (u32, u32),
        total: usize,
        progress: &mut dyn FnMut(usize, usize),
    ) -> Result<(), EncodeError> {
        let mut done = 0;
        for frame in frames {
            let img = image::open(&frame.path)
                .map_err(|source| EncodeError::Image {
                    path: frame.path.clone(),
                    source,
                })?
                .to_rgba8();
            let composed = compose_on_canvas(&img, w, h);
            let repeats = frames_for_duration(frame.duration, self.settings.fps) as usize;
            for _ in 0..repeats {
                stdin.write_all(composed.as_raw())?;
            }
            done += repeats;
            progress(done, total);
        }
        stdin.flush()?;
        Ok(())
    }
}

impl Encoder for FfmpegEncoder {
    fn encode(
        &self,
        frames: &[TimedFrame],
        output: &Path,
        progress: &mut dyn FnMut(usize, usize),
    ) -> Result<(), EncodeError> {
        if frames.is_empty() {
            return Err(EncodeError::NoFrames);
        }
        if !program_available(&self.program) {
            return Err(EncodeError::FfmpegNotFound);
        }

        let size = even_size(canvas_size(frames)?);
        let total: usize = frames
            .iter()
            .map(|f| frames_for_duration(f.duration, self.settings.fps) as usize)
            .sum();

        let args = self.build_args(output, size);
        log::debug!("{} {:?}", self.program.display(), args);

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain stderr on its own thread so a full pipe never stalls ffmpeg
        let stderr_reader = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut text = String::new();
                let _ = stderr.read_to_string(&mut text);
                text
            })
        });

        let written = match child.stdin.take() {
            Some(mut stdin) => self.stream_frames(&mut stdin, frames, size, total, progress),
            None => Ok(()),
        };
        // stdin is closed here; ffmpeg sees EOF and finishes the file

        if matches!(written, Err(EncodeError::Image { .. })) {
            let _ = child.kill();
        }
        let status = child.wait()?;
        let stderr = stderr_reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        match written {
            // A write error is ffmpeg closing the pipe; its own message says why
            Ok(()) | Err(EncodeError::Io(_)) if !status.success() => {
                log::error!("ffmpeg failed: {}", stderr.trim());
                Err(EncodeError::FfmpegFailed(failure_message(&stderr, status)))
            }
            Err(e) => Err(e),
            Ok(()) => {
                log::info!("{} written: {}", self.format, output.display());
                Ok(())
            }
        }
    }
}

fn program_available(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Last non-empty stderr line, or the exit status when ffmpeg printed nothing.
fn failure_message(stderr: &str, status: ExitStatus) -> String {
    stderr
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .map(|l| l.trim().to_string())
        .unwrap_or_else(|| format!("exit status {}", status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::test_util::write_png;
    use image::{Rgb, RgbImage};

    fn args_of(format: OutputFormat, output: &str, size: (u32, u32)) -> Vec<String> {
        FfmpegEncoder::new(format, EncodeSettings::default())
            .build_args(Path::new(output), size)
            .into_iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect()
    }

    /// PNG and JPEG of different sizes, 0.5 s and 0.25 s.
    fn mixed_frames(dir: &Path) -> Vec<TimedFrame> {
        let png = write_png(dir, "first.png", 63, 47, [200, 30, 30, 255]);
        let jpg = dir.join("second.jpg");
        RgbImage::from_pixel(40, 30, Rgb([30, 30, 200])).save(&jpg).unwrap();
        vec![TimedFrame::from((png, 0.5)), TimedFrame::from((jpg, 0.25))]
    }

    #[test]
    fn mp4_args_use_h264_preset_and_bitrate() {
        let args = args_of(OutputFormat::Mp4, "/out/lapse.mp4", (64, 48));
        let pos = |flag: &str| args.iter().position(|a| a == flag).unwrap();
        assert_eq!(args[pos("-f") + 1], "rawvideo");
        assert_eq!(args[pos("-video_size") + 1], "64x48");
        assert_eq!(args[pos("-framerate") + 1], "24");
        assert_eq!(args[pos("-i") + 1], "-");
        assert_eq!(args[pos("-r") + 1], "24");
        assert_eq!(args[pos("-c:v") + 1], "libx264");
        assert_eq!(args[pos("-b:v") + 1], "5000k");
        assert_eq!(args[pos("-preset") + 1], "ultrafast");
        assert!(args.contains(&"-an".to_string()));
        assert_eq!(args.last().unwrap(), "/out/lapse.mp4");
    }

    #[test]
    fn avi_args_use_mpeg4_without_preset() {
        let args = args_of(OutputFormat::Avi, "out.avi", (100, 100));
        assert!(args.windows(2).any(|w| w[0] == "-c:v" && w[1] == "mpeg4"));
        assert!(!args.contains(&"-preset".to_string()));
    }

    #[test]
    fn failure_message_prefers_last_stderr_line() {
        let status = Command::new("true").status();
        if let Ok(status) = status {
            assert_eq!(
                failure_message("warning\nout.mp4: No such file or directory\n\n", status),
                "out.mp4: No such file or directory"
            );
            assert!(failure_message("", status).starts_with("exit status"));
        }
    }

    #[test]
    fn missing_program_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let frames = mixed_frames(tmp.path());
        let out = tmp.path().join("lapse.mp4");
        let result = FfmpegEncoder::new(OutputFormat::Mp4, EncodeSettings::default())
            .with_program(tmp.path().join("no-such-ffmpeg"))
            .encode(&frames, &out, &mut |_, _| {});
        assert!(matches!(result, Err(EncodeError::FfmpegNotFound)));
        assert!(!out.exists());
    }

    #[test]
    fn encodes_mixed_sizes_and_formats() {
        if !FfmpegEncoder::is_available() {
            return;
        }
        let tmp = tempfile::tempdir().unwrap();
        let frames = mixed_frames(tmp.path());

        for format in [OutputFormat::Mp4, OutputFormat::Avi] {
            let out = tmp.path().join(format!("lapse.{}", format.extension()));
            let mut reported = Vec::new();
            FfmpegEncoder::new(format, EncodeSettings::default())
                .encode(&frames, &out, &mut |done, total| reported.push((done, total)))
                .unwrap();

            // 12 frames for 0.5 s plus 6 for 0.25 s at 24 fps
            assert_eq!(reported, vec![(12, 18), (18, 18)]);
            assert!(std::fs::metadata(&out).unwrap().len() > 0, "{format} empty");
        }
    }

    #[test]
    fn unwritable_output_surfaces_ffmpeg_error() {
        let tmp = tempfile::tempdir().unwrap();
        let frames = mixed_frames(tmp.path());
        let out = tmp.path().join("missing-dir").join("lapse.mp4");
        let result = FfmpegEncoder::new(OutputFormat::Mp4, EncodeSettings::default())
            .encode(&frames, &out, &mut |_, _| {});

        match result {
            Err(EncodeError::FfmpegFailed(message)) => assert!(!message.is_empty()),
            Err(EncodeError::FfmpegNotFound) => assert!(!FfmpegEncoder::is_available()),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(!out.exists());
        // Only the two input images remain in the scratch dir
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 2);
    }

    #[test]
    fn unreadable_image_fails_before_ffmpeg_starts() {
        let tmp = tempfile::tempdir().unwrap();
        let good = write_png(tmp.path(), "good.png", 16, 16, [0, 0, 0, 255]);
        let bad = tmp.path().join("bad.png");
        std::fs::write(&bad, b"not an image").unwrap();
        let frames = vec![TimedFrame::from((good, 0.5)), TimedFrame::from((bad, 0.5))];
        let out = tmp.path().join("lapse.mp4");
        let result = FfmpegEncoder::new(OutputFormat::Mp4, EncodeSettings::default())
            .encode(&frames, &out, &mut |_, _| {});

        match result {
            Err(EncodeError::Image { path, .. }) => assert!(path.ends_with("bad.png")),
            Err(EncodeError::FfmpegNotFound) => assert!(!FfmpegEncoder::is_available()),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(!out.exists());
    }
}
