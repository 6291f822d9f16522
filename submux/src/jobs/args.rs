//! ffmpeg argument vectors for the two mux variants.

use std::path::Path;

use crate::config::extension_of;
use crate::settings::{EncodeSettings, UNCHANGED};

/// Subtitle codec for stream-copy muxing, taken from the subtitle file's
/// extension (`.srt` -> `srt`, `.ass` -> `ass`).
pub(crate) fn subtitle_codec(subtitle: &Path) -> String {
    extension_of(subtitle).unwrap_or_else(|| "srt".to_string())
}

/// Arguments for the stream-copy variant: map the subtitle stream first so
/// it becomes the default track, copy audio/video untouched.
pub(crate) fn softmux_args(video: &Path, subtitle: &Path, output: &Path) -> Vec<String> {
    let sub_codec = subtitle_codec(subtitle);

    let mut args: Vec<String> = vec!["-hide_banner".into()];
    args.extend(["-i".into(), video.to_string_lossy().into_owned()]);
    args.extend(["-i".into(), subtitle.to_string_lossy().into_owned()]);
    args.extend(["-map".into(), "1:0".into(), "-map".into(), "0".into()]);
    args.extend(["-disposition:s:0".into(), "default".into()]);
    args.extend(["-c:v".into(), "copy".into(), "-c:a".into(), "copy".into()]);
    args.extend(["-c:s".into(), sub_codec]);
    args.extend(["-y".into(), output.to_string_lossy().into_owned()]);
    args
}

/// Arguments for the re-encode variant: burn the subtitles into the video
/// via a filter chain, apply the user's optional scale/fps/codec settings,
/// keep the first audio stream as-is and drop everything else.
pub(crate) fn hardmux_args(
    video: &Path,
    subtitle: &Path,
    settings: &EncodeSettings,
    output: &Path,
) -> Vec<String> {
    let mut args: Vec<String> = vec!["-hide_banner".into()];
    args.extend(["-i".into(), video.to_string_lossy().into_owned()]);
    args.extend(["-vf".into(), filter_chain(subtitle, settings)]);

    if settings.codec != UNCHANGED {
        args.extend(["-c:v".into(), settings.codec.clone()]);
    }
    if settings.preset != UNCHANGED {
        args.extend(["-preset".into(), settings.preset.clone()]);
    }
    if settings.crf != UNCHANGED {
        args.extend(["-crf".into(), settings.crf.clone()]);
    }

    args.extend(["-map".into(), "0:v:0".into()]);
    args.extend(["-map".into(), "0:a:0?".into()]);
    args.extend(["-c:a".into(), "copy".into()]);
    args.extend(["-y".into(), output.to_string_lossy().into_owned()]);
    args
}

/// The video filter chain. Subtitles are always burned in; scale and fps
/// are appended only when the setting is not the `original` sentinel.
fn filter_chain(subtitle: &Path, settings: &EncodeSettings) -> String {
    let mut filters = vec![format!("subtitles={}", subtitle.to_string_lossy())];
    if settings.resolution != UNCHANGED {
        filters.push(format!("scale={}", settings.resolution));
    }
    if settings.fps != UNCHANGED {
        filters.push(format!("fps={}", settings.fps));
    }
    filters.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn has_pair(args: &[String], flag: &str, value: &str) -> bool {
        args.windows(2).any(|w| w[0] == flag && w[1] == value)
    }

    fn paths() -> (PathBuf, PathBuf, PathBuf) {
        (
            PathBuf::from("/dl/movie.mp4"),
            PathBuf::from("/dl/subs.srt"),
            PathBuf::from("/dl/movie_soft.mkv"),
        )
    }

    #[test]
    fn test_subtitle_codec_from_extension() {
        assert_eq!(subtitle_codec(Path::new("subs.srt")), "srt");
        assert_eq!(subtitle_codec(Path::new("subs.ass")), "ass");
        assert_eq!(subtitle_codec(Path::new("subs")), "srt");
    }

    #[test]
    fn test_softmux_args_exact() {
        let (video, subtitle, output) = paths();
        let args = softmux_args(&video, &subtitle, &output);
        assert_eq!(
            args,
            vec![
                "-hide_banner",
                "-i",
                "/dl/movie.mp4",
                "-i",
                "/dl/subs.srt",
                "-map",
                "1:0",
                "-map",
                "0",
                "-disposition:s:0",
                "default",
                "-c:v",
                "copy",
                "-c:a",
                "copy",
                "-c:s",
                "srt",
                "-y",
                "/dl/movie_soft.mkv",
            ]
        );
    }

    #[test]
    fn test_hardmux_args_with_defaults() {
        let (video, subtitle, _) = paths();
        let output = PathBuf::from("/dl/movie_hard.mp4");
        let args = hardmux_args(&video, &subtitle, &EncodeSettings::default(), &output);

        // Default resolution applies a scale filter, default fps does not.
        let vf = args[args.iter().position(|a| a == "-vf").unwrap() + 1].clone();
        assert_eq!(vf, "subtitles=/dl/subs.srt,scale=1920:1080");

        assert!(has_pair(&args, "-c:v", "libx264"));
        assert!(has_pair(&args, "-preset", "faster"));
        assert!(has_pair(&args, "-crf", "27"));
        assert!(has_pair(&args, "-map", "0:a:0?"));
        assert_eq!(args.last().unwrap(), "/dl/movie_hard.mp4");
    }

    #[test]
    fn test_hardmux_args_all_unchanged() {
        let (video, subtitle, _) = paths();
        let output = PathBuf::from("/dl/movie_hard.mp4");
        let settings = EncodeSettings {
            resolution: UNCHANGED.into(),
            fps: UNCHANGED.into(),
            codec: UNCHANGED.into(),
            crf: UNCHANGED.into(),
            preset: UNCHANGED.into(),
        };
        let args = hardmux_args(&video, &subtitle, &settings, &output);

        // Subtitles are still burned in, everything optional is omitted.
        let vf = args[args.iter().position(|a| a == "-vf").unwrap() + 1].clone();
        assert_eq!(vf, "subtitles=/dl/subs.srt");
        for flag in ["-c:v", "-preset", "-crf", "scale", "fps"] {
            assert!(
                !args.iter().any(|a| a == flag),
                "unexpected {flag} in {args:?}"
            );
        }
    }

    #[test]
    fn test_hardmux_args_custom_fps() {
        let (video, subtitle, _) = paths();
        let output = PathBuf::from("/dl/movie_hard.mp4");
        let settings = EncodeSettings {
            fps: "24".into(),
            ..Default::default()
        };
        let args = hardmux_args(&video, &subtitle, &settings, &output);
        let vf = args[args.iter().position(|a| a == "-vf").unwrap() + 1].clone();
        assert_eq!(vf, "subtitles=/dl/subs.srt,scale=1920:1080,fps=24");
    }
}
