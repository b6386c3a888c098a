//! Beam renderer - CPU Whitted ray tracing.
//!
//! Scenes come in as `beam_core` descriptions, get baked into a
//! [`World`] with a spatial-split BVH over the primitives, and render
//! either scanline-by-scanline ([`render`]) or as parallel buckets
//! ([`render_parallel`]).

mod bucket;
mod bvh;
mod camera;
mod material;
mod plane;
mod primitive;
mod renderer;
mod sphere;
mod triangle;
mod world;

pub use bucket::{
    generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use bvh::{BuildError, BuildOptions, BuildResult, BuildStats, PrimHit, Sbvh, SpatialBin};
pub use camera::Camera;
pub use material::{Color, Material};
pub use plane::Plane;
pub use primitive::Primitive;
pub use renderer::{
    color_to_rgba, ray_color, render, render_pixel, ImageBuffer, RenderConfig, RenderError,
    RenderResult,
};
pub use sphere::Sphere;
pub use triangle::Triangle;
pub use world::{HitRecord, Light, World, WorldError, WorldResult};

/// Re-export Vec3 and common math types from beam_math
pub use beam_math::{Aabb, Axis, Interval, Ray, Vec3};
