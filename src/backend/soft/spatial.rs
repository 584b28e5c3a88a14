//! Distance attenuation and stereo panning.

use super::props::{ListenerProps, SourceProps};
use super::voice::VoiceMix;
use crate::backend::DistanceModel;
use std::f32::consts::FRAC_PI_4;

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn length(v: [f32; 3]) -> f32 {
    dot(v, v).sqrt()
}

/// Gain factor for a source `distance` units away from the listener.
pub(crate) fn attenuation(
    model: DistanceModel,
    distance: f32,
    reference: f32,
    rolloff: f32,
    max_distance: f32,
) -> f32 {
    let distance = if model.is_clamped() {
        distance.max(reference).min(max_distance.max(reference))
    } else {
        distance
    };

    match model {
        DistanceModel::None => 1.0,
        DistanceModel::InverseDistance | DistanceModel::InverseDistanceClamped => {
            let denominator = reference + rolloff * (distance - reference);
            if denominator > 0.0 {
                reference / denominator
            } else {
                1.0
            }
        }
        DistanceModel::LinearDistance | DistanceModel::LinearDistanceClamped => {
            let span = max_distance - reference;
            if span > 0.0 {
                let distance = distance.min(max_distance);
                (1.0 - rolloff * (distance - reference) / span).max(0.0)
            } else {
                1.0
            }
        }
        DistanceModel::ExponentDistance | DistanceModel::ExponentDistanceClamped => {
            if reference > 0.0 && distance > 0.0 {
                (distance / reference).powf(-rolloff)
            } else {
                1.0
            }
        }
    }
}

/// Pan position in `[-1, 1]` (left to right) of a source relative to the
/// listener's orientation.
fn pan(listener: &ListenerProps, source: &SourceProps, offset: [f32; 3]) -> f32 {
    let distance = length(offset);
    if distance <= f32::EPSILON {
        return 0.0;
    }
    if source.relative {
        return (offset[0] / distance).clamp(-1.0, 1.0);
    }

    let right = cross(listener.at, listener.up);
    let right_len = length(right);
    if right_len <= f32::EPSILON {
        return 0.0;
    }
    (dot(offset, right) / (distance * right_len)).clamp(-1.0, 1.0)
}

/// Mix parameters for a voice given the current listener and source state.
///
/// Stereo clips are not spatialized; they only receive the combined gain.
pub(crate) fn voice_mix(
    listener: &ListenerProps,
    source: &SourceProps,
    model: DistanceModel,
    channels: u16,
) -> VoiceMix {
    let offset = if source.relative {
        source.position
    } else {
        sub(source.position, listener.position)
    };

    let gain = if channels == 1 {
        let attenuated = source.gain
            * attenuation(
                model,
                length(offset),
                source.reference_distance,
                source.rolloff_factor,
                source.max_distance,
            );
        attenuated.max(source.min_gain).min(source.max_gain)
    } else {
        source.gain.max(source.min_gain).min(source.max_gain)
    } * listener.gain;

    let gains = if channels == 1 {
        let angle = (pan(listener, source, offset) + 1.0) * FRAC_PI_4;
        [gain * angle.cos(), gain * angle.sin()]
    } else {
        [gain, gain]
    };

    VoiceMix {
        gains,
        pitch: source.pitch,
        looping: source.looping,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    #[test]
    fn test_inverse_clamped_attenuation() {
        let model = DistanceModel::InverseDistanceClamped;
        assert_approx_eq!(attenuation(model, 0.5, 1.0, 1.0, 100.0) as f64, 1.0, 1e-6);
        assert_approx_eq!(attenuation(model, 2.0, 1.0, 1.0, 100.0) as f64, 0.5, 1e-6);
        assert_approx_eq!(attenuation(model, 1000.0, 1.0, 1.0, 4.0) as f64, 0.25, 1e-6);
    }

    #[test]
    fn test_linear_and_exponent_attenuation() {
        assert_approx_eq!(
            attenuation(DistanceModel::LinearDistance, 6.0, 1.0, 1.0, 11.0) as f64,
            0.5,
            1e-6
        );
        assert_approx_eq!(
            attenuation(DistanceModel::ExponentDistance, 4.0, 1.0, 0.5, 100.0) as f64,
            0.5,
            1e-6
        );
        assert_eq!(attenuation(DistanceModel::None, 50.0, 1.0, 1.0, 100.0), 1.0);
    }

    #[test]
    fn test_mono_source_to_the_right_pans_right() {
        let listener = ListenerProps::default();
        let source = SourceProps {
            position: [1.0, 0.0, 0.0],
            ..SourceProps::default()
        };
        let mix = voice_mix(&listener, &source, DistanceModel::None, 1);
        assert!(mix.gains[1] > 0.99);
        assert!(mix.gains[0] < 0.01);
    }

    #[test]
    fn test_centered_source_is_balanced() {
        let listener = ListenerProps::default();
        let source = SourceProps::default();
        let mix = voice_mix(&listener, &source, DistanceModel::InverseDistanceClamped, 1);
        assert_approx_eq!(mix.gains[0] as f64, mix.gains[1] as f64, 1e-6);
    }

    #[test]
    fn test_stereo_clip_only_gets_gain() {
        let listener = ListenerProps {
            gain: 0.5,
            ..ListenerProps::default()
        };
        let source = SourceProps {
            position: [30.0, 0.0, 0.0],
            ..SourceProps::default()
        };
        let mix = voice_mix(&listener, &source, DistanceModel::InverseDistanceClamped, 2);
        assert_eq!(mix.gains, [0.5, 0.5]);
    }
}
