use anyhow::{anyhow, bail, ensure, Context, Result};
use makyoh::{FieldValue, Float, OpticalConfig};
use makyoh_assets::AssetLoader;
use makyoh_panel::{ControlPanel, DrawMode, ResetGroup};

use std::{io::Write, path::PathBuf};

pub const HELP: &str = "\
commands:
    help                              show this message
    show [key]                        print one or every configuration value
    set <key> <values...>             edit a configuration value
    rotate <x> <y> <z>                set the receiver rotation, in degrees
    reset <group>                     restore a group of values from the defaults
                                      (light-position, light-intensity, illuminant-pose,
                                      illuminant-intensity, mirror-pose, mirror-material,
                                      receiver-pose)
    load <file>                       load a configuration file
    save <file>                       save the configuration, making it the new defaults
    illuminant-map <file>             load the illuminant map image
    height-map <file>                 load the mirror height map image
    model <file>                      load the receiver model (Wavefront OBJ)
    pose <illuminant|mirror|receiver> print a pose matrix
    view                              print the receiver view matrix
    samples [n]                       print the mirror samples, optionally regenerating n of them
    mode [mirror|receiver]            print or select the draw mode
    errors                            list pending errors
    dismiss                           dismiss the oldest pending error
    quit                              exit";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoseTarget {
    Illuminant,
    Mirror,
    Receiver,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Help,
    Show(Option<String>),
    Set { key: String, values: Vec<String> },
    Rotate([Float; 3]),
    Reset(ResetGroup),
    Load(PathBuf),
    Save(PathBuf),
    IlluminantMap(PathBuf),
    HeightMap(PathBuf),
    Model(PathBuf),
    Pose(PoseTarget),
    View,
    Samples(Option<i32>),
    Mode(Option<DrawMode>),
    Errors,
    Dismiss,
    Quit,
}

fn number<T: core::str::FromStr>(token: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| anyhow!("invalid number: {token}"))
}

/// The rest of the line, as a file name. File names may contain spaces.
fn file_arg(rest: &[&str]) -> Result<PathBuf> {
    ensure!(!rest.is_empty(), "expected a file name");
    Ok(rest.join(" ").into())
}

impl Command {
    /// Returns `None` for blank lines and comments.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let Some((&name, rest)) = tokens.split_first() else {
            return Ok(None);
        };

        if name.starts_with('#') {
            return Ok(None);
        }

        let no_args = |command: Self| -> Result<Self> {
            ensure!(rest.is_empty(), "{name} takes no arguments");
            Ok(command)
        };

        let command = match name {
            "help" | "?" => no_args(Self::Help)?,
            "show" => match rest {
                [] => Self::Show(None),
                [key] => Self::Show(Some(key.to_string())),
                _ => bail!("usage: show [key]"),
            },
            "set" => match rest {
                [key, values @ ..] if !values.is_empty() => Self::Set {
                    key: key.to_string(),
                    values: values.iter().map(|s| s.to_string()).collect(),
                },
                _ => bail!("usage: set <key> <values...>"),
            },
            "rotate" => match rest {
                &[x, y, z] => Self::Rotate([number(x)?, number(y)?, number(z)?]),
                _ => bail!("usage: rotate <x> <y> <z>"),
            },
            "reset" => match rest {
                [group] => Self::Reset(group.parse()?),
                _ => bail!("usage: reset <group>"),
            },
            "load" => Self::Load(file_arg(rest)?),
            "save" => Self::Save(file_arg(rest)?),
            "illuminant-map" => Self::IlluminantMap(file_arg(rest)?),
            "height-map" => Self::HeightMap(file_arg(rest)?),
            "model" => Self::Model(file_arg(rest)?),
            "pose" => Self::Pose(match rest {
                ["illuminant"] => PoseTarget::Illuminant,
                ["mirror"] => PoseTarget::Mirror,
                ["receiver"] => PoseTarget::Receiver,
                _ => bail!("usage: pose <illuminant|mirror|receiver>"),
            }),
            "view" => no_args(Self::View)?,
            "samples" => match rest {
                [] => Self::Samples(None),
                [n] => Self::Samples(Some(number(n)?)),
                _ => bail!("usage: samples [n]"),
            },
            "mode" => match rest {
                [] => Self::Mode(None),
                [mode] => Self::Mode(Some(mode.parse()?)),
                _ => bail!("usage: mode [mirror|receiver]"),
            },
            "errors" => no_args(Self::Errors)?,
            "dismiss" => no_args(Self::Dismiss)?,
            "quit" | "exit" => no_args(Self::Quit)?,
            _ => bail!("unknown command: {name} (try `help`)"),
        };

        Ok(Some(command))
    }
}

/// Build the value to store under a key currently holding `current`.
///
/// Vectors take 1 to 4 numbers, overwriting the leading components.
pub fn parse_field_value(current: &FieldValue, values: &[String]) -> Result<FieldValue> {
    Ok(match (current, values) {
        (FieldValue::Float(_), [x]) => FieldValue::Float(number(x)?),
        (FieldValue::Int(_), [n]) => FieldValue::Int(number(n)?),
        (FieldValue::Size(_), [w, h]) => FieldValue::Size([number(w)?, number(h)?]),
        (FieldValue::Vector(v), values) if (1..=4).contains(&values.len()) => {
            let mut v = *v;
            for (coord, value) in v.iter_mut().zip(values) {
                *coord = number(value)?;
            }
            FieldValue::Vector(v)
        }
        (FieldValue::Text(_), values) => FieldValue::Text(values.join(" ")),
        (FieldValue::Float(_) | FieldValue::Int(_), _) => bail!("expected a single number"),
        (FieldValue::Size(_), _) => bail!("expected a width and a height"),
        (FieldValue::Vector(_), _) => bail!("expected 1 to 4 numbers"),
    })
}

pub enum Flow {
    Continue,
    Quit,
}

/// Run `command` against `panel`, writing its output to `out`.
///
/// Only failures to write `out` are returned; a failing panel operation is
/// reported on `out` and queued by the panel.
pub fn execute<A: AssetLoader>(
    panel: &mut ControlPanel<A>,
    command: Command,
    out: &mut impl Write,
) -> Result<Flow> {
    let outcome: Result<()> = match command {
        Command::Help => writeln!(out, "{HELP}").map_err(Into::into),
        Command::Show(None) => OpticalConfig::KEYS.iter().try_for_each(|&key| {
            show(panel.settings(), key, out)
        }),
        Command::Show(Some(key)) => show(panel.settings(), &key, out),
        Command::Set { key, values } => set(panel, &key, &values),
        Command::Rotate(degrees) => {
            panel.set_receiver_rotation_degrees(degrees);
            Ok(())
        }
        Command::Reset(group) => panel.reset(group).map_err(Into::into),
        Command::Load(path) => panel.load_config(path).map_err(Into::into),
        Command::Save(path) => panel.save_config(path).map_err(Into::into),
        Command::IlluminantMap(path) => panel.load_illuminant_map(path).map_err(Into::into),
        Command::HeightMap(path) => panel.load_mirror_height_map(path).map_err(Into::into),
        Command::Model(path) => panel.load_receiver_model(path).map_err(Into::into),
        Command::Pose(target) => {
            let matrix = match target {
                PoseTarget::Illuminant => panel.illuminant_pose().matrix(),
                PoseTarget::Mirror => panel.mirror_pose().matrix(),
                PoseTarget::Receiver => panel.receiver_pose(),
            };
            write!(out, "{matrix}").map_err(Into::into)
        }
        Command::View => write!(out, "{}", panel.receiver_view()).map_err(Into::into),
        Command::Samples(count) => samples(panel, count, out),
        Command::Mode(None) => writeln!(out, "{}", panel.draw_mode()).map_err(Into::into),
        Command::Mode(Some(mode)) => {
            panel.set_draw_mode(mode);
            Ok(())
        }
        Command::Errors => panel
            .errors()
            .try_for_each(|e| writeln!(out, "{e}"))
            .map_err(Into::into),
        Command::Dismiss => {
            panel.dismiss_error();
            Ok(())
        }
        Command::Quit => return Ok(Flow::Quit),
    };

    if let Err(e) = outcome {
        // write failures end the session
        if e.is::<std::io::Error>() {
            return Err(e);
        }
        writeln!(out, "error: {e:#}")?;
    }

    Ok(Flow::Continue)
}

fn show(config: &OpticalConfig, key: &str, out: &mut impl Write) -> Result<()> {
    let value = config
        .get(key)
        .with_context(|| format!("unknown configuration key: {key}"))?;

    writeln!(out, "{key} = {value}")?;
    Ok(())
}

fn set<A: AssetLoader>(panel: &mut ControlPanel<A>, key: &str, values: &[String]) -> Result<()> {
    let current = panel
        .settings()
        .get(key)
        .with_context(|| format!("unknown configuration key: {key}"))?;

    let value = parse_field_value(&current, values).with_context(|| format!("invalid {key}"))?;

    panel.set_field(key, value)?;
    Ok(())
}

fn samples<A: AssetLoader>(
    panel: &mut ControlPanel<A>,
    count: Option<i32>,
    out: &mut impl Write,
) -> Result<()> {
    if let Some(count) = count {
        panel.set_field("mirror_sample_count", FieldValue::Int(count))?;
    }

    writeln!(out, "{} samples", panel.mirror_sample_count())?;

    for point in panel.mirror_samples().iter() {
        writeln!(out, "{} {}", point.u(), point.v())?;
    }

    Ok(())
}
