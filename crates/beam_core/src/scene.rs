//! Scene description types.
//!
//! This module defines the serializable scene representation. Colors and
//! positions are plain `[f32; 3]` arrays so that scene files stay
//! renderer-agnostic; the renderer converts them to its own math types.

use serde::{Deserialize, Serialize};

fn default_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn default_fov() -> f32 {
    40.0
}

fn default_ambient() -> [f32; 3] {
    [0.1, 0.1, 0.1]
}

fn default_background() -> [f32; 3] {
    [0.5, 0.7, 1.0]
}

/// Camera configuration.
///
/// `focus_distance` of zero means "focus on the look-at point". A
/// `defocus_angle` of zero gives a pinhole camera.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CameraDesc {
    /// Eye position
    pub look_from: [f32; 3],

    /// Point the camera looks at
    pub look_at: [f32; 3],

    /// Up direction (defaults to +Y)
    #[serde(default = "default_up")]
    pub up: [f32; 3],

    /// Vertical field of view in degrees
    #[serde(default = "default_fov")]
    pub vertical_fov: f32,

    /// Aperture angle in degrees (0 = pinhole)
    #[serde(default)]
    pub defocus_angle: f32,

    /// Distance to the plane of perfect focus (0 = auto)
    #[serde(default)]
    pub focus_distance: f32,
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            look_from: [0.0, 0.0, 0.0],
            look_at: [0.0, 0.0, -1.0],
            up: default_up(),
            vertical_fov: default_fov(),
            defocus_angle: 0.0,
            focus_distance: 0.0,
        }
    }
}

/// A surface material.
///
/// Serialized with a `type` tag: `matte`, `metal` or `glass`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDesc {
    /// Diffuse surface with Lambert shading
    Matte { albedo: [f32; 3] },

    /// Mirror-like surface; `fuzz` widens the specular highlight
    Metal {
        albedo: [f32; 3],
        #[serde(default)]
        fuzz: f32,
    },

    /// Transparent dielectric with the given refraction index
    Glass { ior: f32 },
}

/// A renderable object referencing a material by index.
///
/// Serialized with a `type` tag: `sphere`, `triangle` or `plane`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectDesc {
    Sphere {
        center: [f32; 3],
        radius: f32,
        material: usize,
    },
    Triangle {
        a: [f32; 3],
        b: [f32; 3],
        c: [f32; 3],
        material: usize,
    },
    Plane {
        point: [f32; 3],
        normal: [f32; 3],
        material: usize,
    },
}

impl ObjectDesc {
    /// Index of the material this object references.
    pub fn material(&self) -> usize {
        match self {
            ObjectDesc::Sphere { material, .. } => *material,
            ObjectDesc::Triangle { material, .. } => *material,
            ObjectDesc::Plane { material, .. } => *material,
        }
    }
}

/// A point light.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LightDesc {
    /// World-space position
    pub position: [f32; 3],

    /// RGB intensity (not clamped to 1.0)
    pub intensity: [f32; 3],
}

/// A complete scene: camera, materials, objects and lights.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneDesc {
    /// Scene name (usually from filename)
    #[serde(default)]
    pub name: String,

    /// Camera configuration
    #[serde(default)]
    pub camera: CameraDesc,

    /// Flat ambient term added to every shaded point
    #[serde(default = "default_ambient")]
    pub ambient: [f32; 3],

    /// Color returned by rays that escape the scene
    #[serde(default = "default_background")]
    pub background: [f32; 3],

    /// Materials referenced by index from objects
    #[serde(default)]
    pub materials: Vec<MaterialDesc>,

    /// Renderable objects
    #[serde(default)]
    pub objects: Vec<ObjectDesc>,

    /// Point lights
    #[serde(default)]
    pub lights: Vec<LightDesc>,
}

impl Default for SceneDesc {
    fn default() -> Self {
        Self {
            name: String::new(),
            camera: CameraDesc::default(),
            ambient: default_ambient(),
            background: default_background(),
            materials: Vec::new(),
            objects: Vec::new(),
            lights: Vec::new(),
        }
    }
}

impl SceneDesc {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a material to the scene and return its index.
    pub fn add_material(&mut self, material: MaterialDesc) -> usize {
        let id = self.materials.len();
        self.materials.push(material);
        id
    }

    /// Add an object to the scene.
    pub fn add_object(&mut self, object: ObjectDesc) {
        self.objects.push(object);
    }

    /// Add a point light to the scene.
    pub fn add_light(&mut self, light: LightDesc) {
        self.lights.push(light);
    }

    /// Get material count.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Get object count.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Get light count.
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }
}
