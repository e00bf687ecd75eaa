use clap::Parser;
use tracing_subscriber::EnvFilter;
use turntable::{AppConfig, FrameComposer, Handedness, MeshSource};

#[derive(Parser)]
#[command(name = "turntable", about = "Spin a mesh in front of a fixed camera")]
struct Cli {
    /// `cube`, `sphere`, or a path to an STL or OBJ file
    #[arg(short, long, default_value = "sphere")]
    mesh: MeshSource,

    /// Frames per second the animation clock assumes
    #[arg(long, default_value = "60")]
    fps: f32,

    /// Window width in logical pixels
    #[arg(long, default_value = "800")]
    width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value = "600")]
    height: u32,

    /// Use a right-handed projection (camera looks down -Z)
    #[arg(long)]
    right_handed: bool,

    /// The mesh file is Z-up
    #[arg(long)]
    z_up: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let fallback = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Right-handed cameras look down -Z, so mirror the default camera onto +Z.
    let composer = if cli.right_handed {
        let camera = FrameComposer::default().camera_position;
        FrameComposer::new()
            .with_handedness(Handedness::Right)
            .camera_at(camera * turntable::Vec3::new(1.0, 1.0, -1.0))
    } else {
        FrameComposer::new()
    };

    let config = AppConfig::new()
        .title(format!("turntable: {}", cli.mesh))
        .size(cli.width, cli.height)
        .frame_rate(cli.fps)
        .mesh(cli.mesh)
        .z_up(cli.z_up)
        .composer(composer);

    turntable::run(config)?;
    Ok(())
}
