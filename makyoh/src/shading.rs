use super::*;

/// Light source parameters in the layout the shaders expect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightData {
    pub ambient: HVector,
    pub diffuse: HVector,
    pub specular: HVector,
    pub position: HVector,
}

impl LightData {
    /// `ambient` is a fraction of the full `color * intensity` term.
    #[must_use]
    pub fn new(color: &HVector, intensity: Float, ambient: Float, position: &HVector) -> Self {
        let lit = color * intensity;

        Self {
            ambient: lit * ambient,
            diffuse: lit,
            specular: lit,
            position: *position,
        }
    }
}

/// Surface material of the mirror.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub ambient: HVector,
    pub diffuse: HVector,
    pub specular: HVector,
    pub shininess: Float,
}

impl Material {
    /// The ambient reflectance follows the diffuse one.
    #[must_use]
    pub fn new(diffuse: &HVector, specular: &HVector, shininess: Float) -> Self {
        Self {
            ambient: *diffuse,
            diffuse: *diffuse,
            specular: *specular,
            shininess,
        }
    }
}

impl OpticalConfig {
    #[inline]
    pub fn light(&self) -> LightData {
        LightData::new(
            &self.light_color,
            self.light_intensity,
            self.light_ambient,
            &self.light_position,
        )
    }

    #[inline]
    pub fn illuminant(&self) -> LightData {
        LightData::new(
            &self.illuminant_color,
            self.illuminant_intensity,
            self.illuminant_ambient,
            &self.illuminant_position,
        )
    }

    #[inline]
    pub fn mirror_material(&self) -> Material {
        Material::new(
            &self.mirror_diffuse,
            &self.mirror_specular,
            self.mirror_shininess,
        )
    }
}
