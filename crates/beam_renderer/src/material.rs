//! Surface materials for Whitted-style shading.

use beam_math::Vec3;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// A surface material.
///
/// Materials are plain data; the integrator decides how each variant
/// responds to light. Shading is deterministic: reflection and
/// refraction branch instead of sampling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Diffuse surface with Lambert shading
    Matte { albedo: Color },

    /// Reflective surface; `fuzz` widens the specular highlight,
    /// 0.0 = perfect mirror, 1.0 = very rough
    Metal { albedo: Color, fuzz: f32 },

    /// Transparent dielectric
    Glass { ior: f32 },
}

impl Material {
    /// Create a matte material with the given albedo color.
    pub fn matte(albedo: Color) -> Self {
        Material::Matte { albedo }
    }

    /// Create a metal material. `fuzz` is clamped to [0, 1].
    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        Material::Metal {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    /// Create a glass material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn glass(ior: f32) -> Self {
        Material::Glass { ior }
    }

    /// Base surface color used for the ambient term.
    pub fn albedo(&self) -> Color {
        match self {
            Material::Matte { albedo } => *albedo,
            Material::Metal { albedo, .. } => *albedo,
            Material::Glass { .. } => Color::ONE,
        }
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through a surface.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance.
#[inline]
pub fn reflectance(cosine: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
