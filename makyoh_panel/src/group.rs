use core::{fmt, str::FromStr};

/// A set of fields restored together from the defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResetGroup {
    LightPosition,
    LightIntensity,
    IlluminantPose,
    IlluminantIntensity,
    MirrorPose,
    MirrorMaterial,
    ReceiverPose,
}

impl ResetGroup {
    pub const ALL: [Self; 7] = [
        Self::LightPosition,
        Self::LightIntensity,
        Self::IlluminantPose,
        Self::IlluminantIntensity,
        Self::MirrorPose,
        Self::MirrorMaterial,
        Self::ReceiverPose,
    ];

    /// The keys restored by this group. `ReceiverPose` also restores the
    /// receiver model, which is handled separately since it needs a reload.
    pub const fn keys(self) -> &'static [&'static str] {
        match self {
            Self::LightPosition => &["light_position"],
            Self::LightIntensity => &["light_color", "light_intensity", "light_ambient"],
            Self::IlluminantPose => &["illuminant_position", "illuminant_target"],
            Self::IlluminantIntensity => &[
                "illuminant_color",
                "illuminant_intensity",
                "illuminant_ambient",
                "illuminant_spread",
            ],
            Self::MirrorPose => &["mirror_position", "mirror_target"],
            Self::MirrorMaterial => &[
                "mirror_diffuse",
                "mirror_specular",
                "mirror_shininess",
                "mirror_height_scale",
            ],
            Self::ReceiverPose => &["receiver_position", "receiver_orientation"],
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::LightPosition => "light-position",
            Self::LightIntensity => "light-intensity",
            Self::IlluminantPose => "illuminant-pose",
            Self::IlluminantIntensity => "illuminant-intensity",
            Self::MirrorPose => "mirror-pose",
            Self::MirrorMaterial => "mirror-material",
            Self::ReceiverPose => "receiver-pose",
        }
    }
}

impl fmt::Display for ResetGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown name: {0}")]
pub struct UnknownName(pub String);

impl FromStr for ResetGroup {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|group| group.name() == s)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

/// A configuration field naming a file the panel loads a resource from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileField {
    IlluminantMap,
    MirrorHeightMap,
    ReceiverModel,
}

impl FileField {
    pub const ALL: [Self; 3] = [Self::IlluminantMap, Self::MirrorHeightMap, Self::ReceiverModel];

    #[inline]
    pub const fn key(self) -> &'static str {
        match self {
            Self::IlluminantMap => "illuminant_map",
            Self::MirrorHeightMap => "mirror_height_map",
            Self::ReceiverModel => "receiver_model",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

/// Which surface the renderer should draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DrawMode {
    #[default]
    Mirror,
    Receiver,
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mirror => "mirror",
            Self::Receiver => "receiver",
        })
    }
}

impl FromStr for DrawMode {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mirror" => Ok(Self::Mirror),
            "receiver" => Ok(Self::Receiver),
            _ => Err(UnknownName(s.to_string())),
        }
    }
}
