//! Built-in demo scene, rendered when no scene file is given.

use beam_core::{LightDesc, MaterialDesc, ObjectDesc, SceneDesc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Build the demo scene.
///
/// A ground plane, three feature spheres (glass, matte, metal), a fan
/// of thin floor triangles and a ring of small random spheres. The
/// sphere placement is seeded, so the demo always renders the same
/// image.
pub fn demo_scene() -> SceneDesc {
    let mut scene = SceneDesc::new("demo");
    scene.camera.look_from = [0.0, 3.5, 9.0];
    scene.camera.look_at = [0.0, 1.0, 0.0];
    scene.camera.vertical_fov = 35.0;
    scene.ambient = [0.12, 0.12, 0.15];
    scene.background = [0.5, 0.7, 1.0];

    let ground = scene.add_material(MaterialDesc::Matte {
        albedo: [0.5, 0.5, 0.5],
    });
    scene.add_object(ObjectDesc::Plane {
        point: [0.0, 0.0, 0.0],
        normal: [0.0, 1.0, 0.0],
        material: ground,
    });

    let glass = scene.add_material(MaterialDesc::Glass { ior: 1.5 });
    scene.add_object(ObjectDesc::Sphere {
        center: [0.0, 1.0, 0.0],
        radius: 1.0,
        material: glass,
    });

    let matte = scene.add_material(MaterialDesc::Matte {
        albedo: [0.4, 0.2, 0.1],
    });
    scene.add_object(ObjectDesc::Sphere {
        center: [-2.5, 1.0, 0.0],
        radius: 1.0,
        material: matte,
    });

    let metal = scene.add_material(MaterialDesc::Metal {
        albedo: [0.7, 0.6, 0.5],
        fuzz: 0.1,
    });
    scene.add_object(ObjectDesc::Sphere {
        center: [2.5, 1.0, 0.0],
        radius: 1.0,
        material: metal,
    });

    // Fan of long thin triangles on the floor, pointing outward from
    // the center like compass needles.
    let needle = scene.add_material(MaterialDesc::Metal {
        albedo: [0.8, 0.75, 0.6],
        fuzz: 0.4,
    });
    let spokes = 12;
    for k in 0..spokes {
        let angle = k as f32 * std::f32::consts::TAU / spokes as f32;
        let half_width = 0.06;
        let (sin, cos) = angle.sin_cos();
        // Perpendicular direction in the floor plane
        let (px, pz) = (-sin * half_width, cos * half_width);

        let inner = 1.8;
        let outer = 4.5;
        scene.add_object(ObjectDesc::Triangle {
            a: [inner * cos + px, 0.02, inner * sin + pz],
            b: [inner * cos - px, 0.02, inner * sin - pz],
            c: [outer * cos, 0.02, outer * sin],
            material: needle,
        });
    }

    // Ring of small spheres outside the needles
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..30 {
        let angle = rng.gen::<f32>() * std::f32::consts::TAU;
        let radius = 4.8 + rng.gen::<f32>() * 2.2;
        let (sin, cos) = angle.sin_cos();

        let material = if rng.gen::<f32>() < 0.75 {
            scene.add_material(MaterialDesc::Matte {
                albedo: [rng.gen(), rng.gen(), rng.gen()],
            })
        } else {
            scene.add_material(MaterialDesc::Metal {
                albedo: [0.5 + 0.5 * rng.gen::<f32>(); 3],
                fuzz: 0.3 * rng.gen::<f32>(),
            })
        };

        scene.add_object(ObjectDesc::Sphere {
            center: [radius * cos, 0.25, radius * sin],
            radius: 0.25,
            material,
        });
    }

    scene.add_light(LightDesc {
        position: [6.0, 10.0, 6.0],
        intensity: [0.9, 0.9, 0.85],
    });
    scene.add_light(LightDesc {
        position: [-8.0, 6.0, 2.0],
        intensity: [0.25, 0.25, 0.35],
    });

    scene
}
