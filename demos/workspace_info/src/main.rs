use argh::FromArgs;
use std::path::PathBuf;

use sparseview_workspace::WorkspaceRoot;

#[derive(FromArgs)]
/// List reconstruction workspaces and print a summary of one
struct Args {
    /// directory containing the workspace subdirectories
    #[argh(option)]
    base: PathBuf,

    /// workspace to summarize; defaults to listing only
    #[argh(option)]
    name: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let root = WorkspaceRoot::new(&args.base);

    let names = root.list();
    log::info!("found {} workspace(s) under {:?}", names.len(), args.base);
    for name in &names {
        println!("{name}");
    }

    if let Some(name) = args.name {
        let data = root.load(&name)?;
        println!(
            "{name}: {} camera(s), {} image(s), {} point(s)",
            data.cameras.len(),
            data.images.len(),
            data.points.len()
        );
        for camera in data.cameras.values() {
            println!(
                "  camera {}: {} {}x{} ({} params)",
                camera.camera_id,
                camera.model,
                camera.width,
                camera.height,
                camera.params.len()
            );
        }
    }

    Ok(())
}
