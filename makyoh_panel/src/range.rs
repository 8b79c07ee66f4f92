use super::*;

/// Bound for every position and target component.
pub const POSITION_RANGE: Float = 10.;

/// Bound for the receiver's Euler angles, in degrees.
pub const ROTATION_RANGE_DEGREES: Float = 180.;

/// The interval the control for `key` allows, if any.
///
/// Vector bounds apply to `x`, `y` and `z`; `w` is never clamped.
pub fn ui_range(key: &str) -> Option<(Float, Float)> {
    Some(match key {
        "light_position" | "illuminant_position" | "illuminant_target" | "mirror_position"
        | "mirror_target" | "receiver_position" => (-POSITION_RANGE, POSITION_RANGE),
        "receiver_orientation" => {
            let r = ROTATION_RANGE_DEGREES.to_radians();
            (-r, r)
        }
        "light_intensity" | "illuminant_intensity" => (0., 10.),
        "light_ambient" | "illuminant_ambient" => (0., 1.),
        "illuminant_spread" => (0., 180.),
        "mirror_shininess" => (0., 200.),
        "mirror_height_scale" => (-1., 1.),
        _ => return None,
    })
}

/// Clamp `value` into the range of the control editing `key`.
///
/// NaN passes through unchanged, like any value for a key without a range.
pub fn clamp_to_ui_range(key: &str, value: FieldValue) -> FieldValue {
    let Some((min, max)) = ui_range(key) else {
        return value;
    };

    match value {
        FieldValue::Float(x) => FieldValue::Float(x.clamp(min, max)),
        FieldValue::Vector(mut v) => {
            for x in v.fixed_rows_mut::<3>(0).iter_mut() {
                *x = x.clamp(min, max);
            }
            FieldValue::Vector(v)
        }
        other => other,
    }
}
