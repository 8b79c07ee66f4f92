use makyoh::{nalgebra::Matrix4, *};
use makyoh_assets::{AssetError, AssetLoader, Model, Texture};
use makyoh_json::ConfigError;
use makyoh_random::{generate_disk_samples, DEFAULT_SEED};

use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
};

mod group;
mod range;

pub use group::*;
pub use range::*;

#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// The interactive state of the simulation: the editable configuration, and
/// every frame input derived from it.
///
/// Edits go to the live settings; the defaults only change through an
/// explicit commit, which happens when saving.
pub struct ControlPanel<A> {
    assets: A,

    defaults: OpticalConfig,
    settings: OpticalConfig,

    light: LightData,
    illuminant: LightData,
    illuminant_pose: Pose,
    mirror_material: Material,
    mirror_pose: Pose,
    mirror_samples: SampleSet,
    receiver: ReceiverFrame,

    illuminant_map: Option<Texture>,
    mirror_height_map: Option<Texture>,
    receiver_model: Option<Model>,

    draw_mode: DrawMode,
    errors: VecDeque<String>,
}

impl<A: AssetLoader> ControlPanel<A> {
    /// Resources that fail to load are logged and left empty.
    pub fn new(config: OpticalConfig, assets: A) -> Self {
        let load_image = |path: &str| {
            assets
                .load_image(Path::new(path))
                .map_err(|e| log::warn!("{e}"))
                .ok()
        };

        let illuminant_map = load_image(&config.illuminant_map);
        let mirror_height_map = load_image(&config.mirror_height_map);
        let receiver_model = assets
            .load_model(Path::new(&config.receiver_model))
            .map_err(|e| log::warn!("{e}"))
            .ok();

        Self {
            assets,
            light: config.light(),
            illuminant: config.illuminant(),
            illuminant_pose: config.illuminant_pose(),
            mirror_material: config.mirror_material(),
            mirror_pose: config.mirror_pose(),
            mirror_samples: generate_disk_samples(config.sample_count(), DEFAULT_SEED),
            receiver: config.receiver_frame(),
            illuminant_map,
            mirror_height_map,
            receiver_model,
            draw_mode: DrawMode::default(),
            errors: VecDeque::new(),
            defaults: config.clone(),
            settings: config,
        }
    }

    fn refresh_all(&mut self) {
        self.light = self.settings.light();
        self.illuminant = self.settings.illuminant();
        self.illuminant_pose = self.settings.illuminant_pose();
        self.mirror_material = self.settings.mirror_material();
        self.mirror_pose = self.settings.mirror_pose();
        self.regenerate_samples();
        self.receiver = self.settings.receiver_frame();
    }

    fn regenerate_samples(&mut self) {
        self.mirror_samples = generate_disk_samples(self.settings.sample_count(), DEFAULT_SEED);
    }

    /// Recompute the values derived from `key`.
    fn refresh(&mut self, key: &str) {
        match key {
            "light_color" | "light_intensity" | "light_ambient" | "light_position" => {
                self.light = self.settings.light()
            }
            "illuminant_color" | "illuminant_intensity" | "illuminant_ambient" => {
                self.illuminant = self.settings.illuminant()
            }
            "illuminant_position" => {
                self.illuminant = self.settings.illuminant();
                self.illuminant_pose = self.settings.illuminant_pose();
            }
            "illuminant_target" => self.illuminant_pose = self.settings.illuminant_pose(),
            "mirror_diffuse" | "mirror_specular" | "mirror_shininess" => {
                self.mirror_material = self.settings.mirror_material()
            }
            "mirror_position" | "mirror_target" => self.mirror_pose = self.settings.mirror_pose(),
            "mirror_sample_count" => self.regenerate_samples(),
            "receiver_position" | "receiver_orientation" => {
                self.receiver = self.settings.receiver_frame()
            }
            // read directly by the renderer
            _ => {}
        }
    }

    /// Log `err` and queue its message for display.
    fn report(&mut self, err: impl Into<PanelError>) -> PanelError {
        let err = err.into();
        log::error!("{err}");
        self.errors.push_back(err.to_string());
        err
    }

    /// Write `value` under `key` in the live settings, clamped to the range of
    /// its control, and recompute what depends on it.
    ///
    /// File name fields load the named file, and only change if it succeeds.
    pub fn set_field(&mut self, key: &str, value: FieldValue) -> Result<(), PanelError> {
        if let Some(field) = FileField::from_key(key) {
            return match value {
                FieldValue::Text(path) => self.load_file(field, Path::new(&path)),
                other => Err(self.report(FieldError::KindMismatch {
                    key: field.key(),
                    expected: FieldKind::Text,
                    found: other.kind(),
                })),
            };
        }

        let value = clamp_to_ui_range(key, value);

        self.settings
            .set(key, value)
            .map_err(|e| self.report(e))?;

        self.refresh(key);
        Ok(())
    }

    /// Set the receiver's rotation from Euler angles in degrees, keeping its scale.
    pub fn set_receiver_rotation_degrees(&mut self, degrees: [Float; 3]) {
        let [x, y, z] = degrees
            .map(|d| d.clamp(-ROTATION_RANGE_DEGREES, ROTATION_RANGE_DEGREES).to_radians());

        let orientation = &mut self.settings.receiver_orientation;
        orientation.x = x;
        orientation.y = y;
        orientation.z = z;

        self.refresh("receiver_orientation");
    }

    /// The receiver's Euler angles, in degrees.
    pub fn receiver_rotation_degrees(&self) -> [Float; 3] {
        let o = &self.settings.receiver_orientation;
        [o.x, o.y, o.z].map(Float::to_degrees)
    }

    /// Restore the fields of `group` from the defaults.
    ///
    /// Resetting the receiver pose also restores its model, reloading it if the
    /// file name changed. A failed reload keeps the current model.
    pub fn reset(&mut self, group: ResetGroup) -> Result<(), PanelError> {
        for &key in group.keys() {
            if let Some(value) = self.defaults.get(key) {
                self.settings.set(key, value).map_err(|e| self.report(e))?;
                self.refresh(key);
            }
        }

        if group == ResetGroup::ReceiverPose
            && self.settings.receiver_model != self.defaults.receiver_model
        {
            let path = PathBuf::from(&self.defaults.receiver_model);
            self.load_receiver_model(path)?;
        }

        Ok(())
    }

    /// Replace the live settings with the file at `path`, applied on top of them.
    ///
    /// On failure nothing changes. On success everything is recomputed and the
    /// resources whose file names changed are reloaded; those that fail to
    /// reload keep their previous file name, and their errors are queued.
    pub fn load_config(&mut self, path: impl AsRef<Path>) -> Result<(), PanelError> {
        let path = path.as_ref();

        let mut next = self.settings.clone();
        makyoh_json::load(path, &mut next).map_err(|e| self.report(e))?;

        let previous = core::mem::replace(&mut self.settings, next);

        for field in FileField::ALL {
            let key = field.key();

            let (Some(FieldValue::Text(old)), Some(FieldValue::Text(new))) =
                (previous.get(key), self.settings.get(key))
            else {
                continue;
            };

            if old != new {
                // restored first, so a failed load leaves the previous name
                self.set_file_name(field, old);
                // already reported
                let _ = self.load_file(field, Path::new(&new));
            }
        }

        self.refresh_all();

        log::info!("loaded configuration from {}", path.display());
        Ok(())
    }

    /// Commit the live settings as the new defaults, then write them to `path`.
    pub fn save_config(&mut self, path: impl AsRef<Path>) -> Result<(), PanelError> {
        let path = path.as_ref();

        self.defaults = self.settings.clone();

        makyoh_json::save(path, &self.settings).map_err(|e| self.report(e))?;

        log::info!("saved configuration to {}", path.display());
        Ok(())
    }

    pub fn load_illuminant_map(&mut self, path: impl AsRef<Path>) -> Result<(), PanelError> {
        self.load_file(FileField::IlluminantMap, path.as_ref())
    }

    pub fn load_mirror_height_map(&mut self, path: impl AsRef<Path>) -> Result<(), PanelError> {
        self.load_file(FileField::MirrorHeightMap, path.as_ref())
    }

    pub fn load_receiver_model(&mut self, path: impl AsRef<Path>) -> Result<(), PanelError> {
        self.load_file(FileField::ReceiverModel, path.as_ref())
    }

    /// The previous resource and file name are kept unless loading succeeds.
    fn load_file(&mut self, field: FileField, path: &Path) -> Result<(), PanelError> {
        let loaded = match field {
            FileField::IlluminantMap => self
                .assets
                .load_image(path)
                .map(|texture| self.illuminant_map = Some(texture)),
            FileField::MirrorHeightMap => self
                .assets
                .load_image(path)
                .map(|texture| self.mirror_height_map = Some(texture)),
            FileField::ReceiverModel => self
                .assets
                .load_model(path)
                .map(|model| self.receiver_model = Some(model)),
        };

        loaded.map_err(|e| self.report(e))?;

        self.set_file_name(field, path.to_string_lossy().into_owned());
        log::info!("{} set to {}", field.key(), path.display());
        Ok(())
    }

    fn set_file_name(&mut self, field: FileField, name: String) {
        *match field {
            FileField::IlluminantMap => &mut self.settings.illuminant_map,
            FileField::MirrorHeightMap => &mut self.settings.mirror_height_map,
            FileField::ReceiverModel => &mut self.settings.receiver_model,
        } = name;
    }

    /// Where a file chooser for `field` should start: the file it last loaded.
    pub fn initial_path(&self, field: FileField) -> PathBuf {
        PathBuf::from(match field {
            FileField::IlluminantMap => &self.settings.illuminant_map,
            FileField::MirrorHeightMap => &self.settings.mirror_height_map,
            FileField::ReceiverModel => &self.settings.receiver_model,
        })
    }
}

impl<A> ControlPanel<A> {
    /// Pending error messages, oldest first.
    pub fn errors(&self) -> impl ExactSizeIterator<Item = &str> {
        self.errors.iter().map(String::as_str)
    }

    /// Remove the oldest pending error message.
    pub fn dismiss_error(&mut self) -> Option<String> {
        self.errors.pop_front()
    }

    #[inline]
    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    #[inline]
    pub fn set_draw_mode(&mut self, mode: DrawMode) {
        self.draw_mode = mode;
    }

    #[inline]
    pub fn defaults(&self) -> &OpticalConfig {
        &self.defaults
    }

    #[inline]
    pub fn settings(&self) -> &OpticalConfig {
        &self.settings
    }

    #[inline]
    pub fn assets(&self) -> &A {
        &self.assets
    }

    #[inline]
    pub fn light(&self) -> &LightData {
        &self.light
    }

    #[inline]
    pub fn illuminant(&self) -> &LightData {
        &self.illuminant
    }

    #[inline]
    pub fn illuminant_pose(&self) -> &Pose {
        &self.illuminant_pose
    }

    #[inline]
    pub fn illuminant_spread(&self) -> Float {
        self.settings.illuminant_spread
    }

    #[inline]
    pub fn mirror_material(&self) -> &Material {
        &self.mirror_material
    }

    #[inline]
    pub fn mirror_pose(&self) -> &Pose {
        &self.mirror_pose
    }

    #[inline]
    pub fn mirror_samples(&self) -> &SampleSet {
        &self.mirror_samples
    }

    #[inline]
    pub fn mirror_sample_count(&self) -> usize {
        self.mirror_samples.len()
    }

    #[inline]
    pub fn mirror_height_scale(&self) -> Float {
        self.settings.mirror_height_scale
    }

    #[inline]
    pub fn receiver_pose(&self) -> &Matrix4<Float> {
        &self.receiver.pose
    }

    #[inline]
    pub fn receiver_view(&self) -> &Matrix4<Float> {
        &self.receiver.view
    }

    #[inline]
    pub fn illuminant_map(&self) -> Option<&Texture> {
        self.illuminant_map.as_ref()
    }

    #[inline]
    pub fn mirror_height_map(&self) -> Option<&Texture> {
        self.mirror_height_map.as_ref()
    }

    #[inline]
    pub fn receiver_model(&self) -> Option<&Model> {
        self.receiver_model.as_ref()
    }
}
