//! Stand-ins for `ffprobe` and `ffmpeg`.
//!
//! The probe script prints the contents of the file it is given, so a test picks the
//! probe result by uploading that JSON as the "video".

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub struct FakeTools {
    _dir: tempfile::TempDir,
    pub probe_cat: PathBuf,
    pub ffmpeg_copy: PathBuf,
    /// Copies like `ffmpeg_copy`, after a one second pause.
    pub ffmpeg_slow: PathBuf,
    pub failing: PathBuf,
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

pub fn fake_tools() -> &'static FakeTools {
    static TOOLS: OnceLock<FakeTools> = OnceLock::new();
    TOOLS.get_or_init(|| {
        let dir = tempfile::tempdir().unwrap();
        let probe_cat = write_script(dir.path(), "ffprobe", r#"for last; do :; done; cat "$last""#);
        let ffmpeg_copy = write_script(dir.path(), "ffmpeg", r#"for last; do :; done; cp "$2" "$last""#);
        let ffmpeg_slow = write_script(
            dir.path(),
            "ffmpeg-slow",
            r#"sleep 1; for last; do :; done; cp "$2" "$last""#,
        );
        let failing = write_script(
            dir.path(),
            "ffmpeg-broken",
            r#"for last; do :; done; printf partial > "$last"; echo "moov atom not found" >&2; exit 1"#,
        );
        FakeTools {
            _dir: dir,
            probe_cat,
            ffmpeg_copy,
            ffmpeg_slow,
            failing,
        }
    })
}
