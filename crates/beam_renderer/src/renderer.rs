//! Whitted-style ray tracing integrator.
//!
//! Shading is deterministic: matte and metal surfaces gather direct
//! light from the point lights, metal adds a mirror reflection, and
//! glass splits every ray into a Fresnel-weighted reflected and
//! refracted branch. Randomness only enters through the per-pixel
//! jitter used for anti-aliasing.

use std::path::Path;

use crate::material::{reflect, reflectance, refract};
use crate::world::HitRecord;
use crate::{Camera, Color, Material, World};
use beam_math::{Interval, Ray, Vec3};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use thiserror::Error;

/// Error raised while writing render output.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result alias for render output operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Strength of the Blinn-Phong highlight on matte surfaces.
const MATTE_SPECULAR: f32 = 0.2;

/// Shininess exponent for the matte highlight.
const MATTE_SHININESS: f32 = 32.0;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray recursion depth
    pub max_depth: u32,
    /// Seed for the pixel jitter
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 16,
            max_depth: 50,
            seed: 0,
        }
    }
}

/// Compute the color seen by a ray.
///
/// Traces the ray into the world and shades the nearest hit. Rays that
/// escape return the world background; rays that exhaust the recursion
/// depth return black.
pub fn ray_color(ray: &Ray, world: &World, depth: u32) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    // The near offset keeps secondary rays from re-hitting the surface
    // they started on.
    let Some(hit) = world.intersect(ray, Interval::new(0.001, f32::INFINITY)) else {
        return world.background();
    };

    match *hit.material {
        Material::Matte { albedo } => shade_matte(ray, world, &hit, albedo),
        Material::Metal { albedo, fuzz } => shade_metal(ray, world, &hit, albedo, fuzz, depth),
        Material::Glass { ior } => shade_glass(ray, world, &hit, ior, depth),
    }
}

/// Lambert diffuse plus a fixed Blinn-Phong highlight.
fn shade_matte(ray: &Ray, world: &World, hit: &HitRecord, albedo: Color) -> Color {
    let mut color = world.ambient() * albedo;
    let view = -ray.direction.normalize();

    for light in world.lights() {
        let to_light = light.position - hit.point;
        let distance = to_light.length();
        if distance < 1e-4 {
            // The light sits on the surface; its direction is undefined
            continue;
        }
        let direction = to_light / distance;

        let n_dot_l = hit.normal.dot(direction);
        if n_dot_l <= 0.0 {
            continue;
        }
        if occluded(world, hit.point, direction, distance) {
            continue;
        }

        color += albedo * light.intensity * n_dot_l;

        let halfway = (direction + view).normalize();
        let highlight = hit.normal.dot(halfway).max(0.0).powf(MATTE_SHININESS);
        color += light.intensity * (MATTE_SPECULAR * highlight);
    }

    color
}

/// Tinted highlights plus a perfect mirror bounce.
fn shade_metal(
    ray: &Ray,
    world: &World,
    hit: &HitRecord,
    albedo: Color,
    fuzz: f32,
    depth: u32,
) -> Color {
    let mut color = world.ambient() * albedo;
    let view = -ray.direction.normalize();

    // Fuzz 0 gives a tight highlight, fuzz 1 a broad one
    let shininess = 4.0 + (1.0 - fuzz) * 252.0;

    for light in world.lights() {
        let to_light = light.position - hit.point;
        let distance = to_light.length();
        if distance < 1e-4 {
            continue;
        }
        let direction = to_light / distance;

        if hit.normal.dot(direction) <= 0.0 {
            continue;
        }
        if occluded(world, hit.point, direction, distance) {
            continue;
        }

        let halfway = (direction + view).normalize();
        let highlight = hit.normal.dot(halfway).max(0.0).powf(shininess);
        color += light.intensity * albedo * highlight;
    }

    let reflected = reflect(ray.direction.normalize(), hit.normal);
    let bounce = ray_color(&Ray::new(hit.point, reflected), world, depth - 1);
    color + albedo * bounce
}

/// Fresnel-weighted blend of a reflected and a refracted branch.
fn shade_glass(ray: &Ray, world: &World, hit: &HitRecord, ior: f32, depth: u32) -> Color {
    let ri = if hit.front_face { 1.0 / ior } else { ior };
    let unit_direction = ray.direction.normalize();

    let cos_theta = (-unit_direction).dot(hit.normal).min(1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

    let reflected = reflect(unit_direction, hit.normal);
    if ri * sin_theta > 1.0 {
        // Total internal reflection
        return ray_color(&Ray::new(hit.point, reflected), world, depth - 1);
    }

    let kr = reflectance(cos_theta, ri);
    let refracted = refract(unit_direction, hit.normal, ri);

    let reflected_color = ray_color(&Ray::new(hit.point, reflected), world, depth - 1);
    let refracted_color = ray_color(&Ray::new(hit.point, refracted), world, depth - 1);

    kr * reflected_color + (1.0 - kr) * refracted_color
}

/// Whether anything blocks the segment from `point` towards a light
/// `distance` away along the normalized `direction`.
fn occluded(world: &World, point: Vec3, direction: Vec3, distance: f32) -> bool {
    let shadow_ray = Ray::new(point, direction);
    world.intersect_any(&shadow_ray, Interval::new(0.001, distance))
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    // Apply gamma correction and convert to 0-255
    let r = (255.0 * clamp_01(linear_to_gamma(color.x))) as u8;
    let g = (255.0 * clamp_01(linear_to_gamma(color.y))) as u8;
    let b = (255.0 * clamp_01(linear_to_gamma(color.z))) as u8;
    [r, g, b, 255]
}

/// Render a single pixel.
///
/// A single sample shoots the ray through the pixel center and never
/// touches the rng, so one-sample renders are seed-independent.
pub fn render_pixel(
    camera: &Camera,
    world: &World,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    if config.samples_per_pixel <= 1 {
        let ray = camera.get_ray_centered(x, y);
        return ray_color(&ray, world, config.max_depth);
    }

    let mut pixel_color = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, config.max_depth);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel as f32
}

/// Simple image buffer for storing render output.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            let rgba = color_to_rgba(*color);
            bytes.extend_from_slice(&rgba);
        }
        bytes
    }

    /// Write the buffer as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let bytes = self.to_rgba();
        image::save_buffer(
            path.as_ref(),
            &bytes,
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )?;
        Ok(())
    }
}

/// Render the entire scene to an image buffer.
///
/// Single-threaded; `bucket::render_parallel` is the multi-threaded
/// entry point.
pub fn render(camera: &Camera, world: &World, config: &RenderConfig) -> ImageBuffer {
    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    let mut rng = StdRng::seed_from_u64(config.seed);

    for y in 0..camera.image_height {
        for x in 0..camera.image_width {
            let color = render_pixel(camera, world, x, y, config, &mut rng);
            image.set(x, y, color);
        }
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use beam_core::{LightDesc, MaterialDesc, ObjectDesc, SceneDesc};
    use beam_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sphere_scene(material: MaterialDesc) -> SceneDesc {
        let mut scene = SceneDesc::new("test");
        scene.ambient = [0.0, 0.0, 0.0];
        scene.background = [0.5, 0.7, 1.0];
        let m = scene.add_material(material);
        scene.add_object(ObjectDesc::Sphere {
            center: [0.0, 0.0, -3.0],
            radius: 1.0,
            material: m,
        });
        scene
    }

    fn lit_matte_scene() -> SceneDesc {
        let mut scene = SceneDesc::new("test");
        scene.ambient = [0.1, 0.1, 0.1];
        scene.background = [0.5, 0.7, 1.0];
        let m = scene.add_material(MaterialDesc::Matte {
            albedo: [0.8, 0.4, 0.2],
        });
        scene.add_object(ObjectDesc::Sphere {
            center: [0.0, 0.0, 0.0],
            radius: 1.0,
            material: m,
        });
        scene.add_light(LightDesc {
            position: [0.0, 5.0, 0.0],
            intensity: [1.0, 1.0, 1.0],
        });
        scene
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgba_clamps() {
        assert_eq!(color_to_rgba(Color::new(1.0, 0.0, 4.0)), [255, 0, 255, 255]);
        assert_eq!(color_to_rgba(Color::new(-1.0, 0.25, 0.0)), [0, 127, 0, 255]);
    }

    #[test]
    fn test_depth_zero_is_black() {
        let world = World::from_scene(&lit_matte_scene()).unwrap();
        let ray = Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::new(0.0, -1.0, 0.0));

        assert_eq!(ray_color(&ray, &world, 0), Color::ZERO);
    }

    #[test]
    fn test_miss_returns_background() {
        let world = World::from_scene(&lit_matte_scene()).unwrap();
        let ray = Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::new(0.0, 1.0, 0.0));

        let color = ray_color(&ray, &world, 5);
        assert_eq!(color, Color::new(0.5, 0.7, 1.0));
    }

    #[test]
    fn test_matte_direct_light() {
        // The ray hits the sphere's north pole with the light straight
        // overhead: full diffuse (albedo * 1.1 with ambient) plus the
        // full highlight (0.2).
        let world = World::from_scene(&lit_matte_scene()).unwrap();
        let ray = Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::new(0.0, -1.0, 0.0));

        let color = ray_color(&ray, &world, 5);
        let expected = Color::new(1.08, 0.64, 0.42);
        assert!(
            (color - expected).length() < 1e-4,
            "got {:?}, expected {:?}",
            color,
            expected
        );
    }

    #[test]
    fn test_matte_in_shadow_keeps_only_ambient() {
        let mut scene = lit_matte_scene();
        // Light moved off-axis, with a blocker on the segment from the
        // north pole (0,1,0) to the light at (4,5,0).
        scene.lights[0].position = [4.0, 5.0, 0.0];
        let blocker = scene.add_material(MaterialDesc::Matte {
            albedo: [0.5, 0.5, 0.5],
        });
        scene.add_object(ObjectDesc::Sphere {
            center: [2.0, 3.0, 0.0],
            radius: 0.5,
            material: blocker,
        });

        let world = World::from_scene(&scene).unwrap();
        let ray = Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::new(0.0, -1.0, 0.0));

        let color = ray_color(&ray, &world, 5);
        let expected = Color::new(0.08, 0.04, 0.02);
        assert!(
            (color - expected).length() < 1e-4,
            "got {:?}, expected {:?}",
            color,
            expected
        );
    }

    #[test]
    fn test_metal_mirrors_background() {
        // A head-on hit reflects straight back out of the scene, so a
        // white mirror with no lights returns the background untinted.
        let scene = sphere_scene(MaterialDesc::Metal {
            albedo: [1.0, 1.0, 1.0],
            fuzz: 0.0,
        });
        let world = World::from_scene(&scene).unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let color = ray_color(&ray, &world, 5);
        assert!((color - Color::new(0.5, 0.7, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_glass_passes_background_through() {
        // Head-on, every reflected or refracted branch eventually
        // escapes, and the Fresnel weights sum to one at each split.
        let scene = sphere_scene(MaterialDesc::Glass { ior: 1.5 });
        let world = World::from_scene(&scene).unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let color = ray_color(&ray, &world, 16);
        assert!(
            (color - Color::new(0.5, 0.7, 1.0)).length() < 1e-3,
            "got {:?}",
            color
        );
    }

    #[test]
    fn test_render_pixel_hits_sphere() {
        let world = World::from_scene(&lit_matte_scene()).unwrap();

        let mut camera = Camera::new()
            .with_resolution(10, 10)
            .with_position(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO, Vec3::Y)
            .with_lens(40.0, 0.0, 4.0);
        camera.initialize();

        let config = RenderConfig {
            samples_per_pixel: 4,
            max_depth: 5,
            seed: 0,
        };
        let mut rng = StdRng::seed_from_u64(42);

        let color = render_pixel(&camera, &world, 5, 5, &config, &mut rng);
        assert!(color.length() > 0.0);
        assert!((color - world.background()).length() > 0.1);
    }

    #[test]
    fn test_render_is_deterministic() {
        let world = World::from_scene(&lit_matte_scene()).unwrap();
        let camera = {
            let mut camera = Camera::new()
                .with_resolution(16, 12)
                .with_position(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO, Vec3::Y)
                .with_lens(40.0, 0.0, 4.0);
            camera.initialize();
            camera
        };
        let config = RenderConfig {
            samples_per_pixel: 4,
            max_depth: 5,
            seed: 7,
        };

        let first = render(&camera, &world, &config);
        let second = render(&camera, &world, &config);
        assert_eq!(first.pixels, second.pixels);
    }

    #[test]
    fn test_single_sample_ignores_seed() {
        let world = World::from_scene(&lit_matte_scene()).unwrap();
        let camera = {
            let mut camera = Camera::new()
                .with_resolution(8, 8)
                .with_position(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO, Vec3::Y)
                .with_lens(40.0, 0.0, 4.0);
            camera.initialize();
            camera
        };

        let one = RenderConfig {
            samples_per_pixel: 1,
            max_depth: 5,
            seed: 1,
        };
        let two = RenderConfig { seed: 2, ..one.clone() };

        let first = render(&camera, &world, &one);
        let second = render(&camera, &world, &two);
        assert_eq!(first.pixels, second.pixels);
    }
}
