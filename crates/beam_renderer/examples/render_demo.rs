//! Renders a demo scene and saves it as a PNG.
//!
//! A matte ground plane, three feature spheres (glass, matte, metal)
//! and a field of small random spheres, lit by two point lights.

use beam_core::{LightDesc, MaterialDesc, ObjectDesc, SceneDesc};
use beam_renderer::{render_parallel, Camera, RenderConfig, Vec3, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() {
    env_logger::init();

    println!("Beam - render demo");
    println!("==================");

    let start = std::time::Instant::now();
    let scene = build_scene();
    let world = World::from_scene(&scene).expect("demo scene is valid");
    println!(
        "World built in {:?} ({} primitives)",
        start.elapsed(),
        world.primitive_count()
    );

    let camera = Camera::from_desc(&scene.camera, 800, 450);

    let config = RenderConfig {
        samples_per_pixel: 16,
        max_depth: 10,
        seed: 0,
    };

    println!(
        "Rendering {}x{} @ {} spp...",
        camera.image_width, camera.image_height, config.samples_per_pixel
    );

    let start = std::time::Instant::now();
    let image = render_parallel(&camera, &world, &config);
    println!("Rendered in {:?}", start.elapsed());

    let filename = "render_demo.png";
    image.save_png(filename).expect("failed to save image");
    println!("Saved to {}", filename);
}

fn build_scene() -> SceneDesc {
    let mut scene = SceneDesc::new("demo");
    scene.camera.look_from = [13.0, 2.0, 3.0];
    scene.camera.look_at = [0.0, 0.0, 0.0];
    scene.camera.vertical_fov = 20.0;
    scene.ambient = [0.15, 0.15, 0.18];
    scene.background = [0.5, 0.7, 1.0];

    // Ground plane
    let ground = scene.add_material(MaterialDesc::Matte {
        albedo: [0.5, 0.5, 0.5],
    });
    scene.add_object(ObjectDesc::Plane {
        point: [0.0, 0.0, 0.0],
        normal: [0.0, 1.0, 0.0],
        material: ground,
    });

    // Three main spheres
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
        center: [-4.0, 1.0, 0.0],
        radius: 1.0,
        material: matte,
    });

    let metal = scene.add_material(MaterialDesc::Metal {
        albedo: [0.7, 0.6, 0.5],
        fuzz: 0.0,
    });
    scene.add_object(ObjectDesc::Sphere {
        center: [4.0, 1.0, 0.0],
        radius: 1.0,
        material: metal,
    });

    // Small spheres scattered on the ground; the seed is fixed so the
    // demo always renders the same image.
    let mut rng = StdRng::seed_from_u64(42);
    for a in -5..5 {
        for b in -5..5 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            // Keep clear of the feature spheres
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() < 0.9
                || (center - Vec3::new(-4.0, 0.2, 0.0)).length() < 0.9
                || (center - Vec3::new(0.0, 0.2, 0.0)).length() < 0.9
            {
                continue;
            }

            let choose: f32 = rng.gen();
            let material = if choose < 0.7 {
                scene.add_material(MaterialDesc::Matte {
                    albedo: [
                        rng.gen::<f32>() * rng.gen::<f32>(),
                        rng.gen::<f32>() * rng.gen::<f32>(),
                        rng.gen::<f32>() * rng.gen::<f32>(),
                    ],
                })
            } else if choose < 0.9 {
                scene.add_material(MaterialDesc::Metal {
                    albedo: [
                        0.5 + 0.5 * rng.gen::<f32>(),
                        0.5 + 0.5 * rng.gen::<f32>(),
                        0.5 + 0.5 * rng.gen::<f32>(),
                    ],
                    fuzz: 0.5 * rng.gen::<f32>(),
                })
            } else {
                scene.add_material(MaterialDesc::Glass { ior: 1.5 })
            };

            scene.add_object(ObjectDesc::Sphere {
                center: center.to_array(),
                radius: 0.2,
                material,
            });
        }
    }

    // Key light and a dim blue fill
    scene.add_light(LightDesc {
        position: [10.0, 12.0, 4.0],
        intensity: [0.9, 0.9, 0.85],
    });
    scene.add_light(LightDesc {
        position: [-6.0, 8.0, -3.0],
        intensity: [0.25, 0.25, 0.3],
    });

    scene
}
