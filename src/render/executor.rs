use std::path::{Path, PathBuf};

use crate::foundation::error::{MixlineError, MixlineResult};
use crate::plan::filtergraph::FilterGraph;
use crate::timeline::model::ClipId;

/// One on-disk source backing a graph input.
#[derive(Clone, Debug)]
pub struct SourceFile {
    /// Clip the file backs.
    pub clip: ClipId,
    /// Path to the decodable container.
    pub path: PathBuf,
}

/// Render execution capability (consumed).
///
/// An engine takes the composed graph, the source files its inputs refer to
/// and the merged audio bytes, and produces one output container. Failures
/// propagate verbatim as [`MixlineError::Render`].
pub trait RenderEngine {
    /// Execute the graph and return the output container bytes.
    fn execute(
        &self,
        graph: &FilterGraph,
        sources: &[SourceFile],
        mixed_audio_wav: Option<&[u8]>,
    ) -> MixlineResult<Vec<u8>>;
}

/// Graph execution through the system `ffmpeg` binary (requires the
/// `media-ffmpeg` feature).
///
/// Sources are staged into `work_dir` under the graph's conventional input
/// names so the argument vector from
/// [`FilterGraph::ffmpeg_args`] resolves as-is. When merged audio is
/// provided it is muxed as an extra input mapped in place of the concat
/// audio stream, mirroring the server-side merge path.
#[derive(Clone, Debug)]
pub struct FfmpegRenderer {
    work_dir: PathBuf,
    overwrite: bool,
}

impl FfmpegRenderer {
    /// Create a renderer staging files under `work_dir`.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            overwrite: true,
        }
    }

    /// Refuse to overwrite an existing output file.
    pub fn keep_existing(mut self) -> Self {
        self.overwrite = false;
        self
    }
}

impl RenderEngine for FfmpegRenderer {
    fn execute(
        &self,
        graph: &FilterGraph,
        sources: &[SourceFile],
        mixed_audio_wav: Option<&[u8]>,
    ) -> MixlineResult<Vec<u8>> {
        run_ffmpeg_graph(
            &self.work_dir,
            self.overwrite,
            graph,
            sources,
            mixed_audio_wav,
        )
    }
}

#[cfg(feature = "media-ffmpeg")]
fn run_ffmpeg_graph(
    work_dir: &Path,
    overwrite: bool,
    graph: &FilterGraph,
    sources: &[SourceFile],
    mixed_audio_wav: Option<&[u8]>,
) -> MixlineResult<Vec<u8>> {
    use std::io::Read;
    use std::process::{Command, Stdio};

    if !is_ffmpeg_on_path() {
        return Err(MixlineError::render(
            "ffmpeg is required for graph execution, but was not found on PATH",
        ));
    }

    std::fs::create_dir_all(work_dir).map_err(|e| {
        MixlineError::render(format!(
            "failed to create render work directory '{}': {e}",
            work_dir.display()
        ))
    })?;

    // Stage every graph input under its conventional name.
    for input in &graph.inputs {
        let source = sources
            .iter()
            .find(|s| s.clip == input.clip)
            .ok_or_else(|| {
                MixlineError::render(format!("no source file provided for clip {}", input.clip))
            })?;
        std::fs::copy(&source.path, work_dir.join(&input.file_name)).map_err(|e| {
            MixlineError::render(format!(
                "failed to stage '{}' as '{}': {e}",
                source.path.display(),
                input.file_name
            ))
        })?;
    }

    let audio_name = "mixed_audio.wav";
    if let Some(wav) = mixed_audio_wav {
        std::fs::write(work_dir.join(audio_name), wav).map_err(|e| {
            MixlineError::render(format!("failed to stage merged audio: {e}"))
        })?;
    }

    let out_name = "output.mp4";
    let out_path = work_dir.join(out_name);
    if !overwrite && out_path.exists() {
        return Err(MixlineError::render(format!(
            "output file '{}' already exists",
            out_path.display()
        )));
    }

    let mut cmd = Command::new("ffmpeg");
    cmd.current_dir(work_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());
    cmd.arg(if overwrite { "-y" } else { "-n" });
    cmd.args(["-loglevel", "error"]);

    if mixed_audio_wav.is_some() {
        // Merged audio replaces the concat audio stream; the unused concat
        // audio output must still be consumed or ffmpeg rejects the graph.
        let filter = format!(
            "{};[{}]anullsink",
            graph.filter_complex(),
            graph.concat.audio_out
        );
        for input in &graph.inputs {
            cmd.args(["-i", &input.file_name]);
        }
        cmd.args(["-i", audio_name]);
        cmd.args(["-filter_complex", &filter]);
        cmd.args(["-map", &format!("[{}]", graph.concat.video_out)]);
        cmd.args(["-map", &format!("{}:a", graph.inputs.len())]);
        cmd.arg("-shortest");
        cmd.arg(out_name);
    } else {
        cmd.args(graph.ffmpeg_args(out_name));
    }

    let mut child = cmd.spawn().map_err(|e| {
        MixlineError::render(format!(
            "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
        ))
    })?;

    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| MixlineError::render("failed to open ffmpeg stderr (unexpected)"))?;
    let stderr_drain = std::thread::spawn(move || {
        let mut bytes = Vec::new();
        stderr.read_to_end(&mut bytes).map(|_| bytes)
    });

    let status = child
        .wait()
        .map_err(|e| MixlineError::render(format!("failed to wait for ffmpeg to finish: {e}")))?;
    let stderr_bytes = stderr_drain
        .join()
        .map_err(|_| MixlineError::render("ffmpeg stderr drain thread panicked"))?
        .map_err(|e| MixlineError::render(format!("ffmpeg stderr read failed: {e}")))?;

    if !status.success() {
        return Err(MixlineError::render(format!(
            "ffmpeg exited with status {}: {}",
            status,
            String::from_utf8_lossy(&stderr_bytes).trim()
        )));
    }

    std::fs::read(&out_path).map_err(|e| {
        MixlineError::render(format!(
            "failed to read rendered output '{}': {e}",
            out_path.display()
        ))
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
fn run_ffmpeg_graph(
    _work_dir: &Path,
    _overwrite: bool,
    _graph: &FilterGraph,
    _sources: &[SourceFile],
    _mixed_audio_wav: Option<&[u8]>,
) -> MixlineResult<Vec<u8>> {
    Err(MixlineError::render(
        "graph execution requires the 'media-ffmpeg' feature",
    ))
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
#[cfg(feature = "media-ffmpeg")]
pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
