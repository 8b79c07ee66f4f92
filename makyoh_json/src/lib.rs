use makyoh::*;

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

pub use serde_json;

use serde_json::{Map, Number, Value};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not valid JSON: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("configuration must be a JSON object")]
    NotAnObject,
    #[error("configuration object is empty")]
    Empty,
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Floats are written through their shortest decimal form, so `0.1f32` is
/// stored as `0.1` rather than `0.10000000149011612`.
///
/// Non-finite values have no JSON representation and become `null`.
pub fn float_to_json(x: Float) -> Value {
    x.to_string()
        .parse()
        .ok()
        .and_then(Number::from_f64)
        .map_or(Value::Null, Value::Number)
}

/// Overwrites the leading components of `v` with an array of 1 to 4 numbers.
///
/// `v` is left untouched if `json` has any other shape.
pub fn merge_json_vector(json: &Value, v: &mut HVector) -> Option<()> {
    let array = json.as_array().filter(|a| (1..=4).contains(&a.len()))?;

    let mut merged = *v;
    for (coord, value) in merged.iter_mut().zip(array) {
        *coord = value.as_f64()? as Float;
    }

    *v = merged;
    Some(())
}

/// Reads `json` as a value of the same kind as `current`.
///
/// Vectors may be partial (see [`merge_json_vector`]) and integers accept
/// any JSON number, truncated toward zero.
pub fn field_from_json(current: &FieldValue, json: &Value) -> Option<FieldValue> {
    Some(match current {
        FieldValue::Float(_) => FieldValue::Float(json.as_f64()? as Float),
        FieldValue::Int(_) => {
            let n = json
                .as_i64()
                .or_else(|| json.as_f64().map(|x| x as i64))?;
            FieldValue::Int(n.clamp(i32::MIN.into(), i32::MAX.into()) as i32)
        }
        FieldValue::Vector(v) => {
            let mut v = *v;
            merge_json_vector(json, &mut v)?;
            FieldValue::Vector(v)
        }
        FieldValue::Size(_) => {
            let [w, h]: &[Value; 2] = json.as_array()?.as_slice().try_into().ok()?;
            FieldValue::Size([
                w.as_u64()?.try_into().ok()?,
                h.as_u64()?.try_into().ok()?,
            ])
        }
        FieldValue::Text(_) => FieldValue::Text(json.as_str()?.to_string()),
    })
}

pub trait JsonSer {
    /// Serialize `self` into a JSON value.
    fn to_json(&self) -> Value;
}

impl JsonSer for FieldValue {
    fn to_json(&self) -> Value {
        match self {
            FieldValue::Float(x) => float_to_json(*x),
            FieldValue::Int(n) => Value::from(*n),
            FieldValue::Vector(v) => Value::Array(v.iter().copied().map(float_to_json).collect()),
            FieldValue::Size(size) => Value::from(size.as_slice()),
            FieldValue::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl JsonSer for OpticalConfig {
    /// Serialize every field, keyed by its name in [`OpticalConfig::KEYS`].
    fn to_json(&self) -> Value {
        Value::Object(Map::from_iter(OpticalConfig::KEYS.iter().filter_map(|&key| {
            self.get(key).map(|value| (key.to_string(), value.to_json()))
        })))
    }
}

pub trait JsonMerge {
    /// Apply the values found in `json` on top of `self`.
    ///
    /// Returns the number of values applied.
    fn merge_json(&mut self, json: &Value) -> Result<usize, ConfigError>;
}

impl JsonMerge for OpticalConfig {
    /// The JSON object must follow the following format, every key being optional:
    ///
    /// ```json
    /// {
    ///     "window_size": [1280, 960],
    ///     "light_intensity": 1.0,
    ///     "light_position": [2.0, 8.0, 1.0, 1.0],
    ///     "mirror_sample_count": 100,
    ///     "receiver_model": "logo.obj",
    ///     ...
    /// }
    /// ```
    ///
    /// Fails, leaving `self` untouched, if `json` isn't an object or is an empty one.
    /// Otherwise, values with the wrong shape are skipped and the previous ones kept.
    fn merge_json(&mut self, json: &Value) -> Result<usize, ConfigError> {
        let object = json.as_object().ok_or(ConfigError::NotAnObject)?;

        if object.is_empty() {
            return Err(ConfigError::Empty);
        }

        let mut applied = 0;

        for &key in OpticalConfig::KEYS {
            let (Some(value), Some(current)) = (object.get(key), self.get(key)) else {
                continue;
            };

            match field_from_json(&current, value) {
                Some(field) => {
                    self.set(key, field)?;
                    applied += 1;
                }
                None => log::warn!("ignoring invalid value for \"{key}\": {value}"),
            }
        }

        for key in object.keys() {
            if !OpticalConfig::KEYS.contains(&key.as_str()) {
                log::debug!("ignoring unknown configuration key \"{key}\"");
            }
        }

        Ok(applied)
    }
}

/// Read the configuration file at `path` on top of `config`.
///
/// Fails if the file can't be opened, isn't valid JSON, or isn't a non-empty
/// object. `config` is only modified on success.
pub fn load(path: impl AsRef<Path>, config: &mut OpticalConfig) -> Result<(), ConfigError> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let json: Value =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let applied = config.merge_json(&json)?;

    log::debug!("applied {applied} configuration values from {}", path.display());

    Ok(())
}

/// Write every field of `config` to `path`, as pretty-printed JSON.
pub fn save(path: impl AsRef<Path>, config: &OpticalConfig) -> Result<(), ConfigError> {
    let path = path.as_ref();

    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);

    serde_json::to_writer_pretty(&mut writer, &config.to_json()).map_err(|source| {
        ConfigError::Write {
            path: path.to_path_buf(),
            source,
        }
    })?;

    writer.flush().map_err(io_err)
}

/// Load the configuration at `path`, falling back to the defaults.
///
/// If the file can't be loaded, the defaults are written to `path` so the user
/// has a file to edit. Failing to write it is logged, not fatal.
pub fn load_or_create(path: impl AsRef<Path>) -> OpticalConfig {
    let path = path.as_ref();
    let mut config = OpticalConfig::default();

    match load(path, &mut config) {
        Ok(()) => log::info!("loaded configuration from {}", path.display()),
        Err(e) => {
            log::warn!("{e}, using defaults");

            config = OpticalConfig::default();

            match save(path, &config) {
                Ok(()) => log::info!("wrote default configuration to {}", path.display()),
                Err(e) => log::error!("{e}"),
            }
        }
    }

    config
}
