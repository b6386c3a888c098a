//! Scene file loading and saving.
//!
//! Scene files are JSON documents describing a [`SceneDesc`]. Loading
//! validates the description so that the renderer can assume material
//! references are in range and every coordinate is a finite number.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::scene::{MaterialDesc, ObjectDesc, SceneDesc};

/// Errors that can occur while loading or saving scene files.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid scene: {message}")]
    InvalidScene { message: String },
}

/// Result type for scene file operations.
pub type SceneResult<T> = Result<T, SceneError>;

fn invalid(message: impl Into<String>) -> SceneError {
    SceneError::InvalidScene {
        message: message.into(),
    }
}

fn finite3(v: [f32; 3]) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// Load a scene from a JSON file.
///
/// The scene name defaults to the file stem when the document does not
/// set one.
///
/// # Example
///
/// ```ignore
/// use beam_core::load_scene;
///
/// let scene = load_scene("scene.json")?;
/// println!("Loaded {} objects", scene.object_count());
/// ```
pub fn load_scene<P: AsRef<Path>>(path: P) -> SceneResult<SceneDesc> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    let mut scene = load_scene_from_str(&content)?;
    if scene.name.is_empty() {
        scene.name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unnamed")
            .to_string();
    }

    log::info!(
        "Loaded scene '{}': {} materials, {} objects, {} lights",
        scene.name,
        scene.material_count(),
        scene.object_count(),
        scene.light_count()
    );

    Ok(scene)
}

/// Parse and validate a scene from JSON text.
pub fn load_scene_from_str(content: &str) -> SceneResult<SceneDesc> {
    let scene: SceneDesc = serde_json::from_str(content)?;
    validate(&scene)?;
    Ok(scene)
}

/// Save a scene to a JSON file (pretty-printed).
pub fn save_scene<P: AsRef<Path>>(path: P, scene: &SceneDesc) -> SceneResult<()> {
    validate(scene)?;
    let content = serde_json::to_string_pretty(scene)?;
    fs::write(path, content)?;
    Ok(())
}

/// Check a scene description for out-of-range references and
/// non-finite numbers.
pub fn validate(scene: &SceneDesc) -> SceneResult<()> {
    let camera = &scene.camera;
    if !finite3(camera.look_from) || !finite3(camera.look_at) || !finite3(camera.up) {
        return Err(invalid("camera coordinates must be finite"));
    }
    if camera.look_from == camera.look_at {
        return Err(invalid("camera look_from and look_at coincide"));
    }
    if camera.up == [0.0, 0.0, 0.0] {
        return Err(invalid("camera up vector is zero"));
    }
    if !camera.vertical_fov.is_finite() || camera.vertical_fov <= 0.0 || camera.vertical_fov >= 180.0
    {
        return Err(invalid(format!(
            "camera vertical_fov {} out of range (0, 180)",
            camera.vertical_fov
        )));
    }
    if !camera.defocus_angle.is_finite() || camera.defocus_angle < 0.0 {
        return Err(invalid("camera defocus_angle must be finite and >= 0"));
    }
    if !camera.focus_distance.is_finite() || camera.focus_distance < 0.0 {
        return Err(invalid("camera focus_distance must be finite and >= 0"));
    }

    if !finite3(scene.ambient) || !finite3(scene.background) {
        return Err(invalid("ambient and background colors must be finite"));
    }

    for (i, material) in scene.materials.iter().enumerate() {
        match material {
            MaterialDesc::Matte { albedo } => {
                if !finite3(*albedo) {
                    return Err(invalid(format!("material {}: albedo must be finite", i)));
                }
            }
            MaterialDesc::Metal { albedo, fuzz } => {
                if !finite3(*albedo) {
                    return Err(invalid(format!("material {}: albedo must be finite", i)));
                }
                if !fuzz.is_finite() || *fuzz < 0.0 {
                    return Err(invalid(format!(
                        "material {}: fuzz must be finite and >= 0",
                        i
                    )));
                }
            }
            MaterialDesc::Glass { ior } => {
                if !ior.is_finite() || *ior <= 0.0 {
                    return Err(invalid(format!(
                        "material {}: ior must be finite and > 0",
                        i
                    )));
                }
            }
        }
    }

    for (i, object) in scene.objects.iter().enumerate() {
        let material = object.material();
        if material >= scene.materials.len() {
            return Err(invalid(format!(
                "object {}: material index {} out of range ({} materials)",
                i,
                material,
                scene.materials.len()
            )));
        }

        match object {
            ObjectDesc::Sphere { center, radius, .. } => {
                if !finite3(*center) || !radius.is_finite() {
                    return Err(invalid(format!("object {}: sphere must be finite", i)));
                }
                if *radius <= 0.0 {
                    return Err(invalid(format!(
                        "object {}: sphere radius {} must be > 0",
                        i, radius
                    )));
                }
            }
            ObjectDesc::Triangle { a, b, c, .. } => {
                if !finite3(*a) || !finite3(*b) || !finite3(*c) {
                    return Err(invalid(format!(
                        "object {}: triangle vertices must be finite",
                        i
                    )));
                }
            }
            ObjectDesc::Plane { point, normal, .. } => {
                if !finite3(*point) || !finite3(*normal) {
                    return Err(invalid(format!("object {}: plane must be finite", i)));
                }
                if *normal == [0.0, 0.0, 0.0] {
                    return Err(invalid(format!("object {}: plane normal is zero", i)));
                }
            }
        }
    }

    for (i, light) in scene.lights.iter().enumerate() {
        if !finite3(light.position) || !finite3(light.intensity) {
            return Err(invalid(format!("light {}: must be finite", i)));
        }
    }

    Ok(())
}
