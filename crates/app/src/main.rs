//! Entry point: load a scene and report what a renderer would upload.
//! Usage: app <scene.obj | -> [--weld=linear|hashed] [--material-dir=DIR]

use anyhow::{Context, Result, bail};
use asset::{LoadOptions, STDIN_SENTINEL, Scene, WeldStrategy};

fn parse_weld_arg(args: &[String]) -> WeldStrategy {
    let mut weld = WeldStrategy::default();
    for arg in args {
        if let Some(val) = arg.strip_prefix("--weld=") {
            weld = val.parse().unwrap_or_else(|err| {
                log::warn!("{err}, falling back to {}", WeldStrategy::default());
                WeldStrategy::default()
            });
        }
    }
    weld
}

fn parse_material_dir_arg(args: &[String]) -> Option<String> {
    args.iter()
        .rev()
        .find_map(|arg| arg.strip_prefix("--material-dir="))
        .map(str::to_owned)
}

fn parse_scene_arg(args: &[String]) -> Option<&str> {
    // "-" alone is the stdin sentinel, not a flag.
    args.iter()
        .map(String::as_str)
        .find(|arg| *arg == STDIN_SENTINEL || !arg.starts_with("--"))
}

fn build_options(args: &[String]) -> Result<LoadOptions> {
    let mut options = LoadOptions::default().with_weld(parse_weld_arg(args));
    match parse_material_dir_arg(args) {
        Some(dir) => options = options.with_material_dir(dir),
        None if parse_scene_arg(args) == Some(STDIN_SENTINEL) => {
            let cwd = std::env::current_dir().context("Failed to resolve working directory")?;
            options = options.with_material_dir(cwd);
        }
        None => {}
    }
    Ok(options)
}

fn report(scene: &Scene) {
    log::info!(
        "Vertex buffer: {} vertices ({} bytes)",
        scene.vertices().len(),
        scene.vertex_bytes().len()
    );
    for (i, mesh) in scene.meshes().iter().enumerate() {
        let name = if mesh.material.name.is_empty() {
            "<default>"
        } else {
            mesh.material.name.as_str()
        };
        log::info!(
            "Mesh {i}: material={name}, triangles={}, kd={:?}, ns={}",
            mesh.triangle_count(),
            mesh.material.diffuse,
            mesh.material.shininess
        );
    }
    if let Some(bounds) = scene.bounds() {
        log::info!(
            "Bounds: min={:?} max={:?} center={:?} extent={:?}",
            bounds.min,
            bounds.max,
            bounds.center(),
            bounds.extent()
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(source) = parse_scene_arg(&args) else {
        bail!("Usage: app <scene.obj | -> [--weld=linear|hashed] [--material-dir=DIR]");
    };
    let options = build_options(&args)?;
    log::info!("Loading {source} with weld={}", options.weld);

    let scene = asset::load_scene(source, &options)
        .with_context(|| format!("Failed to load scene '{source}'"))?;
    report(&scene);

    log::info!("Done.");
    Ok(())
}
