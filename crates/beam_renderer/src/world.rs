//! Renderable world assembled from a scene description.
//!
//! [`World::from_scene`] validates the description, converts every
//! object into a [`Primitive`], resolves materials and lights, and
//! builds the acceleration structure once. Queries then resolve raw
//! tree hits into shading-ready [`HitRecord`]s.

use beam_core::{MaterialDesc, ObjectDesc, SceneDesc, SceneError};
use beam_math::{Interval, Ray, Vec3};
use thiserror::Error;

use crate::bvh::{BuildError, BuildOptions, BuildStats, Sbvh};
use crate::material::{Color, Material};
use crate::plane::Plane;
use crate::primitive::Primitive;
use crate::sphere::Sphere;
use crate::triangle::Triangle;

/// Errors from world assembly.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("invalid scene: {0}")]
    Scene(#[from] SceneError),

    #[error("acceleration structure build failed: {0}")]
    Build(#[from] BuildError),
}

/// Result type for world assembly.
pub type WorldResult<T> = Result<T, WorldError>;

/// A point light.
#[derive(Debug, Clone, Copy)]
pub struct Light {
    /// World-space position
    pub position: Vec3,
    /// RGB intensity (not clamped to 1.0)
    pub intensity: Color,
}

/// Record of a ray-surface intersection, resolved for shading.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Ray parameter of the hit
    pub t: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Unit surface normal, always pointing against the ray
    pub normal: Vec3,
    /// Whether the outside of the surface was hit
    pub front_face: bool,
    /// Material at the hit point
    pub material: &'a Material,
    /// Index of the primitive that was hit
    pub primitive: usize,
}

/// A complete renderable scene: primitives, materials, lights and the
/// acceleration structure over them.
#[derive(Debug)]
pub struct World {
    primitives: Vec<Primitive>,
    materials: Vec<Material>,
    lights: Vec<Light>,
    ambient: Color,
    background: Color,
    sbvh: Sbvh,
}

impl World {
    /// Assemble a world from a scene description with default build
    /// options.
    pub fn from_scene(scene: &SceneDesc) -> WorldResult<World> {
        Self::from_scene_with(scene, BuildOptions::default())
    }

    /// Assemble a world with explicit acceleration structure options.
    pub fn from_scene_with(scene: &SceneDesc, options: BuildOptions) -> WorldResult<World> {
        // Validation guarantees material indices are in range, so hit
        // resolution below can index without checking.
        beam_core::validate(scene)?;

        let materials = scene.materials.iter().map(convert_material).collect();
        let primitives: Vec<Primitive> = scene.objects.iter().map(convert_object).collect();
        let lights = scene
            .lights
            .iter()
            .map(|light| Light {
                position: Vec3::from_array(light.position),
                intensity: Vec3::from_array(light.intensity),
            })
            .collect();

        let sbvh = Sbvh::build_with(&primitives, options)?;

        Ok(World {
            primitives,
            materials,
            lights,
            ambient: Vec3::from_array(scene.ambient),
            background: Vec3::from_array(scene.background),
            sbvh,
        })
    }

    /// Point lights in the scene.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Flat ambient term added to every shaded point.
    pub fn ambient(&self) -> Color {
        self.ambient
    }

    /// Color for rays that escape the scene.
    pub fn background(&self) -> Color {
        self.background
    }

    /// Number of renderable primitives.
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    /// Statistics from the acceleration structure build.
    pub fn build_stats(&self) -> BuildStats {
        self.sbvh.stats()
    }

    /// Find the nearest surface hit along `ray` within `ray_t`.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let hit = self.sbvh.intersect(&self.primitives, ray, ray_t)?;
        let primitive = hit.prim as usize;
        let point = ray.at(hit.t);
        let outward = self.primitives[primitive].normal_at(point);

        // Store the normal against the ray and remember which side we hit
        let front_face = ray.direction.dot(outward) < 0.0;
        Some(HitRecord {
            t: hit.t,
            point,
            normal: if front_face { outward } else { -outward },
            front_face,
            material: &self.materials[self.primitives[primitive].material()],
            primitive,
        })
    }

    /// Report whether any surface lies along `ray` within `ray_t`.
    /// Cheaper than [`World::intersect`]; used for shadow rays.
    pub fn intersect_any(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.sbvh.intersect_any(&self.primitives, ray, ray_t)
    }
}

fn convert_material(desc: &MaterialDesc) -> Material {
    match desc {
        MaterialDesc::Matte { albedo } => Material::matte(Vec3::from_array(*albedo)),
        MaterialDesc::Metal { albedo, fuzz } => Material::metal(Vec3::from_array(*albedo), *fuzz),
        MaterialDesc::Glass { ior } => Material::glass(*ior),
    }
}

fn convert_object(desc: &ObjectDesc) -> Primitive {
    match desc {
        ObjectDesc::Sphere {
            center,
            radius,
            material,
        } => Primitive::Sphere(Sphere::new(Vec3::from_array(*center), *radius, *material)),
        ObjectDesc::Triangle { a, b, c, material } => Primitive::Triangle(Triangle::new(
            Vec3::from_array(*a),
            Vec3::from_array(*b),
            Vec3::from_array(*c),
            *material,
        )),
        ObjectDesc::Plane {
            point,
            normal,
            material,
        } => Primitive::Plane(Plane::new(
            Vec3::from_array(*point),
            Vec3::from_array(*normal),
            *material,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beam_core::LightDesc;

    fn test_scene() -> SceneDesc {
        let mut scene = SceneDesc::new("test");
        let red = scene.add_material(MaterialDesc::Matte {
            albedo: [0.8, 0.2, 0.2],
        });
        let mirror = scene.add_material(MaterialDesc::Metal {
            albedo: [0.9, 0.9, 0.9],
            fuzz: 0.0,
        });
        scene.add_object(ObjectDesc::Sphere {
            center: [0.0, 0.0, -3.0],
            radius: 1.0,
            material: red,
        });
        scene.add_object(ObjectDesc::Plane {
            point: [0.0, -2.0, 0.0],
            normal: [0.0, 1.0, 0.0],
            material: mirror,
        });
        scene.add_light(LightDesc {
            position: [0.0, 5.0, 0.0],
            intensity: [1.0, 1.0, 1.0],
        });
        scene
    }

    #[test]
    fn test_from_scene_builds() {
        let world = World::from_scene(&test_scene()).unwrap();

        assert_eq!(world.primitive_count(), 2);
        assert_eq!(world.lights().len(), 1);
        assert_eq!(world.background(), Vec3::new(0.5, 0.7, 1.0));
    }

    #[test]
    fn test_intersect_resolves_hit() {
        let world = World::from_scene(&test_scene()).unwrap();

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let record = world
            .intersect(&ray, Interval::new(0.001, f32::INFINITY))
            .unwrap();

        assert!((record.t - 2.0).abs() < 1e-5);
        assert_eq!(record.primitive, 0);
        assert!(record.front_face);
        assert!((record.normal - Vec3::Z).length() < 1e-5);
        assert!(matches!(record.material, Material::Matte { .. }));
    }

    #[test]
    fn test_inside_hit_flips_normal() {
        let mut scene = SceneDesc::new("inside");
        let glass = scene.add_material(MaterialDesc::Glass { ior: 1.5 });
        scene.add_object(ObjectDesc::Sphere {
            center: [0.0, 0.0, 0.0],
            radius: 2.0,
            material: glass,
        });
        let world = World::from_scene(&scene).unwrap();

        // From the center, every hit is a back face
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let record = world
            .intersect(&ray, Interval::new(0.001, f32::INFINITY))
            .unwrap();

        assert!(!record.front_face);
        // The stored normal still points against the ray
        assert!(record.normal.dot(ray.direction) < 0.0);
    }

    #[test]
    fn test_shadow_ray_occlusion() {
        let mut scene = SceneDesc::new("shadow");
        let matte = scene.add_material(MaterialDesc::Matte {
            albedo: [0.5, 0.5, 0.5],
        });
        scene.add_object(ObjectDesc::Sphere {
            center: [0.0, 2.0, 0.0],
            radius: 0.5,
            material: matte,
        });
        let world = World::from_scene(&scene).unwrap();

        // Straight up passes through the blocker
        let up = Ray::new(Vec3::ZERO, Vec3::Y);
        assert!(world.intersect_any(&up, Interval::new(0.001, 5.0)));

        // Sideways reaches the light unobstructed
        let side = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(!world.intersect_any(&side, Interval::new(0.001, 5.0)));

        // The blocker is beyond a short interval
        assert!(!world.intersect_any(&up, Interval::new(0.001, 1.0)));
    }

    #[test]
    fn test_invalid_scene_rejected() {
        let mut scene = SceneDesc::new("broken");
        // Material index 3 does not exist
        scene.add_object(ObjectDesc::Sphere {
            center: [0.0, 0.0, 0.0],
            radius: 1.0,
            material: 3,
        });

        let err = World::from_scene(&scene).unwrap_err();
        assert!(matches!(err, WorldError::Scene(_)));
    }
}
