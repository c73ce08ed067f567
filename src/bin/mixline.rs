use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use mixline::{
    CompositorSession, FfmpegMedia, FfmpegRenderer, GraphOpts, RenderEngine, SourceFile, Timeline,
    VideoProber,
};

#[derive(Parser, Debug)]
#[command(name = "mixline", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Delay-mix all audio clips and write the merged WAV.
    Mix(MixArgs),
    /// Print the video segment plan as JSON.
    Plan(PlanArgs),
    /// Print the composed ffmpeg filter graph.
    Graph(GraphArgs),
    /// Execute the graph through the system ffmpeg (requires `ffmpeg` on
    /// PATH and the `media-ffmpeg` feature).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct MixArgs {
    /// Input timeline project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output WAV path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Input timeline project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct GraphArgs {
    /// Input timeline project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Override the reference width for synthesized gaps.
    #[arg(long)]
    width: Option<u32>,

    /// Override the reference height for synthesized gaps.
    #[arg(long)]
    height: Option<u32>,

    /// Decimal places for gap durations.
    #[arg(long, default_value_t = 2)]
    gap_precision: usize,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input timeline project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Mux the merged audio mix over the concatenated per-segment audio.
    #[arg(long, default_value_t = false)]
    merged_audio: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Mix(args) => cmd_mix(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Graph(args) => cmd_graph(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn load_timeline(path: &Path) -> anyhow::Result<Timeline> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read timeline project '{}'", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("parse timeline project '{}'", path.display()))
}

fn assets_root(in_path: &Path) -> &Path {
    in_path.parent().unwrap_or_else(|| Path::new("."))
}

fn cmd_mix(args: MixArgs) -> anyhow::Result<()> {
    let timeline = load_timeline(&args.in_path)?;
    let media = FfmpegMedia::new(assets_root(&args.in_path));
    let mut session = CompositorSession::new(timeline, media);
    session.remix()?;

    match session.mixed_wav() {
        Some(wav) => {
            std::fs::write(&args.out, wav)
                .with_context(|| format!("write '{}'", args.out.display()))?;
            println!("wrote {} bytes to {}", wav.len(), args.out.display());
            Ok(())
        }
        None => anyhow::bail!("timeline has no audio clips; nothing to mix"),
    }
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let timeline = load_timeline(&args.in_path)?;
    let plan = mixline::plan_video_segments(&timeline)?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

fn cmd_graph(args: GraphArgs) -> anyhow::Result<()> {
    let timeline = load_timeline(&args.in_path)?;
    let plan = mixline::plan_video_segments(&timeline)?;
    let opts = GraphOpts {
        gap_precision: args.gap_precision,
        ..GraphOpts::default()
    };
    let reference = reference_resolution(&timeline, assets_root(&args.in_path), &args)?;
    let graph = mixline::compose_graph(&plan, reference, &opts)?;

    println!("{}", graph.filter_complex());
    println!("ffmpeg {}", graph.ffmpeg_args("output.mp4").join(" "));
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let timeline = load_timeline(&args.in_path)?;
    let root = assets_root(&args.in_path);
    let media = FfmpegMedia::new(root);

    let plan = mixline::plan_video_segments(&timeline)?;
    let reference = first_video_resolution(&timeline, &media);
    let graph = mixline::compose_graph(&plan, reference, &GraphOpts::default())?;

    let mut sources = Vec::new();
    for (_, clip) in timeline.video_clips() {
        sources.push(SourceFile {
            clip: clip.id,
            path: media.resolve(&clip.media)?,
        });
    }

    let mixed_wav = if args.merged_audio {
        let mut session = CompositorSession::new(timeline.clone(), media);
        session.remix()?;
        session.mixed_wav().map(|wav| wav.to_vec())
    } else {
        None
    };

    let work_dir = std::env::temp_dir().join("mixline-render");
    let renderer = FfmpegRenderer::new(&work_dir);
    let bytes = renderer.execute(&graph, &sources, mixed_wav.as_deref())?;

    std::fs::write(&args.out, &bytes)
        .with_context(|| format!("write '{}'", args.out.display()))?;
    println!("wrote {} bytes to {}", bytes.len(), args.out.display());
    Ok(())
}

/// Resolution for synthesized gaps: CLI override, else the first video
/// clip's probed resolution, else the composer default.
fn reference_resolution(
    timeline: &Timeline,
    root: &Path,
    args: &GraphArgs,
) -> anyhow::Result<Option<(u32, u32)>> {
    if let (Some(w), Some(h)) = (args.width, args.height) {
        return Ok(Some((w, h)));
    }
    Ok(first_video_resolution(timeline, &FfmpegMedia::new(root)))
}

fn first_video_resolution(timeline: &Timeline, media: &FfmpegMedia) -> Option<(u32, u32)> {
    let mut clips: Vec<_> = timeline.video_clips().map(|(_, c)| c).collect();
    clips.sort_by(|a, b| a.start_secs().total_cmp(&b.start_secs()));
    let first = clips.first()?;
    media
        .probe_video(&first.media)
        .ok()
        .map(|meta| (meta.width, meta.height))
}
