use super::*;

use alloc::string::{String, ToString};
use core::fmt;

/// The kind of value stored under a configuration key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Float,
    Int,
    Vector,
    Size,
    Text,
}

/// A configuration value, tagged with its kind.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Float(Float),
    Int(i32),
    Vector(HVector),
    Size([u32; 2]),
    Text(String),
}

impl FieldValue {
    #[inline]
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Float(_) => FieldKind::Float,
            Self::Int(_) => FieldKind::Int,
            Self::Vector(_) => FieldKind::Vector,
            Self::Size(_) => FieldKind::Size,
            Self::Text(_) => FieldKind::Text,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(x) => write!(f, "{x}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Vector(v) => write!(f, "{} {} {} {}", v.x, v.y, v.z, v.w),
            Self::Size([w, h]) => write!(f, "{w} {h}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldError {
    UnknownKey(String),
    KindMismatch {
        key: &'static str,
        expected: FieldKind,
        found: FieldKind,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKey(key) => write!(f, "unknown configuration key: {key}"),
            Self::KindMismatch {
                key,
                expected,
                found,
            } => write!(f, "{key} expects a {expected:?} value, got a {found:?}"),
        }
    }
}

impl core::error::Error for FieldError {}

/// Every tunable parameter of the simulation.
///
/// Two instances are usually alive at once: the committed defaults, and the
/// live settings being edited.
#[derive(Clone, Debug, PartialEq)]
pub struct OpticalConfig {
    pub window_size: [u32; 2],
    pub menu_font: String,
    pub menu_font_size: Float,

    pub light_color: HVector,
    pub light_intensity: Float,
    pub light_ambient: Float,
    pub light_position: HVector,

    pub illuminant_color: HVector,
    pub illuminant_intensity: Float,
    pub illuminant_ambient: Float,
    pub illuminant_position: HVector,
    pub illuminant_target: HVector,
    pub illuminant_spread: Float,
    pub illuminant_map: String,

    pub mirror_diffuse: HVector,
    pub mirror_specular: HVector,
    pub mirror_shininess: Float,
    pub mirror_position: HVector,
    pub mirror_target: HVector,
    /// Always within `1..=MAX_SAMPLES` when written through [`Self::set`].
    pub mirror_sample_count: i32,
    pub mirror_height_map: String,
    pub mirror_height_scale: Float,

    pub receiver_model: String,
    pub receiver_position: HVector,
    /// Euler angles in radians in `xyz`, uniform scale in `w`.
    pub receiver_orientation: HVector,
}

impl Default for OpticalConfig {
    fn default() -> Self {
        Self {
            window_size: [1280, 960],
            menu_font: "Mplus1-Regular.ttf".to_string(),
            menu_font_size: 20.0,

            light_color: HVector::new(1.0, 1.0, 1.0, 0.0),
            light_intensity: 1.0,
            light_ambient: 0.1,
            light_position: HVector::new(2.0, 8.0, 1.0, 1.0),

            illuminant_color: HVector::new(1.0, 1.0, 1.0, 0.0),
            illuminant_intensity: 1.0,
            illuminant_ambient: 0.1,
            illuminant_position: HVector::new(0.0, 0.0, 2.0, 1.0),
            illuminant_target: HVector::new(0.0, 0.0, 0.0, 1.0),
            illuminant_spread: 100.0,
            illuminant_map: "illuminant_map.png".to_string(),

            mirror_diffuse: HVector::new(0.1, 0.1, 0.1, 0.0),
            mirror_specular: HVector::new(0.9, 0.9, 0.9, 0.0),
            mirror_shininess: 100.0,
            mirror_position: HVector::new(0.0, 0.0, 0.0, 1.0),
            mirror_target: HVector::new(0.0, 0.0, 1.0, 1.0),
            mirror_sample_count: 100,
            mirror_height_map: "height_map_128.png".to_string(),
            mirror_height_scale: 1.0,

            receiver_model: "logo.obj".to_string(),
            receiver_position: HVector::new(0.0, 0.0, 5.0, 1.0),
            receiver_orientation: HVector::new(0.0, 0.0, 0.0, 1.0),
        }
    }
}

/// Clamps a requested sample count into `1..=MAX_SAMPLES`.
#[inline]
pub fn clamp_sample_count(count: i32) -> i32 {
    count.clamp(1, MAX_SAMPLES as i32)
}

macro_rules! keyed_fields {
    ($($key:literal => $field:ident: $kind:ident),* $(,)?) => {
        impl OpticalConfig {
            /// Every configuration key, in file order.
            pub const KEYS: &'static [&'static str] = &[$($key),*];

            /// Reads the value stored under `key`.
            pub fn get(&self, key: &str) -> Option<FieldValue> {
                match key {
                    $($key => Some(FieldValue::$kind(self.$field.clone())),)*
                    _ => None,
                }
            }

            fn store(&mut self, key: &str, value: FieldValue) -> Result<(), FieldError> {
                match key {
                    $($key => match value {
                        FieldValue::$kind(v) => {
                            self.$field = v;
                            Ok(())
                        }
                        other => Err(FieldError::KindMismatch {
                            key: $key,
                            expected: FieldKind::$kind,
                            found: other.kind(),
                        }),
                    },)*
                    _ => Err(FieldError::UnknownKey(key.to_string())),
                }
            }
        }
    };
}

keyed_fields! {
    "window_size" => window_size: Size,
    "menu_font" => menu_font: Text,
    "menu_font_size" => menu_font_size: Float,
    "light_color" => light_color: Vector,
    "light_intensity" => light_intensity: Float,
    "light_ambient" => light_ambient: Float,
    "light_position" => light_position: Vector,
    "illuminant_color" => illuminant_color: Vector,
    "illuminant_intensity" => illuminant_intensity: Float,
    "illuminant_ambient" => illuminant_ambient: Float,
    "illuminant_position" => illuminant_position: Vector,
    "illuminant_target" => illuminant_target: Vector,
    "illuminant_spread" => illuminant_spread: Float,
    "illuminant_map" => illuminant_map: Text,
    "mirror_diffuse" => mirror_diffuse: Vector,
    "mirror_specular" => mirror_specular: Vector,
    "mirror_shininess" => mirror_shininess: Float,
    "mirror_position" => mirror_position: Vector,
    "mirror_target" => mirror_target: Vector,
    "mirror_sample_count" => mirror_sample_count: Int,
    "mirror_height_map" => mirror_height_map: Text,
    "mirror_height_scale" => mirror_height_scale: Float,
    "receiver_model" => receiver_model: Text,
    "receiver_position" => receiver_position: Vector,
    "receiver_orientation" => receiver_orientation: Vector,
}

impl OpticalConfig {
    /// The kind of value `key` holds, or `None` for unknown keys.
    #[inline]
    pub fn kind_of(&self, key: &str) -> Option<FieldKind> {
        self.get(key).as_ref().map(FieldValue::kind)
    }

    /// Writes `value` under `key`.
    ///
    /// The record is left untouched if the key is unknown or the value has the
    /// wrong kind. `mirror_sample_count` is clamped into `1..=MAX_SAMPLES`.
    pub fn set(&mut self, key: &str, value: FieldValue) -> Result<(), FieldError> {
        self.store(key, value)?;
        if key == "mirror_sample_count" {
            self.mirror_sample_count = clamp_sample_count(self.mirror_sample_count);
        }
        Ok(())
    }

    /// The number of mirror samples as a length, assuming the count was clamped.
    #[inline]
    pub fn sample_count(&self) -> usize {
        clamp_sample_count(self.mirror_sample_count) as usize
    }

    #[inline]
    pub fn illuminant_pose(&self) -> Pose {
        derive_pose(
            &self.illuminant_position,
            &self.illuminant_target,
            &default_up(),
        )
    }

    #[inline]
    pub fn mirror_pose(&self) -> Pose {
        derive_pose(&self.mirror_position, &self.mirror_target, &default_up())
    }

    #[inline]
    pub fn receiver_frame(&self) -> ReceiverFrame {
        ReceiverFrame::new(&self.receiver_position, &self.receiver_orientation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_is_readable() {
        let config = OpticalConfig::default();

        for key in OpticalConfig::KEYS {
            assert!(config.get(key).is_some(), "{key} has no accessor");
        }
        assert_eq!(OpticalConfig::KEYS.len(), 25);
    }

    #[test]
    fn keyed_writes() {
        let mut config = OpticalConfig::default();

        config
            .set("mirror_target", FieldValue::Vector(HVector::new(1., 2., 3., 1.)))
            .unwrap();
        config
            .set("receiver_model", FieldValue::Text("bunny.obj".into()))
            .unwrap();

        assert_eq!(config.mirror_target, HVector::new(1., 2., 3., 1.));
        assert_eq!(config.receiver_model, "bunny.obj");
        assert_eq!(
            config.get("receiver_model"),
            Some(FieldValue::Text("bunny.obj".into()))
        );
    }

    #[test]
    fn wrong_kind_leaves_record_unchanged() {
        let mut config = OpticalConfig::default();

        let err = config
            .set("light_intensity", FieldValue::Text("bright".into()))
            .unwrap_err();

        assert_eq!(
            err,
            FieldError::KindMismatch {
                key: "light_intensity",
                expected: FieldKind::Float,
                found: FieldKind::Text,
            }
        );
        assert_eq!(config, OpticalConfig::default());
    }

    #[test]
    fn unknown_key() {
        let mut config = OpticalConfig::default();

        assert_eq!(
            config.set("mirror_colour", FieldValue::Float(1.0)),
            Err(FieldError::UnknownKey("mirror_colour".into()))
        );
        assert_eq!(config.get("mirror_colour"), None);
        assert_eq!(config.kind_of("mirror_colour"), None);
    }

    #[test]
    fn sample_count_is_clamped() {
        let mut config = OpticalConfig::default();

        config.set("mirror_sample_count", FieldValue::Int(0)).unwrap();
        assert_eq!(config.mirror_sample_count, 1);

        config.set("mirror_sample_count", FieldValue::Int(-20)).unwrap();
        assert_eq!(config.mirror_sample_count, 1);

        config.set("mirror_sample_count", FieldValue::Int(5000)).unwrap();
        assert_eq!(config.mirror_sample_count, MAX_SAMPLES as i32);
        assert_eq!(config.sample_count(), MAX_SAMPLES);
    }

    #[test]
    fn default_poses() {
        let config = OpticalConfig::default();

        // the mirror faces +z from the origin
        assert!(config.mirror_pose().is_identity());

        let illuminant = config.illuminant_pose();
        assert_eq!(illuminant.translation(), Vector3::new(0., 0., 2.));
        assert_eq!(illuminant.forward(), Vector3::new(0., 0., -1.));
    }
}
