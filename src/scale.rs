/// Reference pitch all note frequencies are derived from.
pub const A4_FREQUENCY: f32 = 440.0;

fn twelfth_root_of_two() -> f32 {
    2f32.powf(1.0 / 12.0)
}

/// Clamped linear interpolation of `cur_in` from `[min_in, max_in]` onto
/// `[min_out, max_out]`.
///
/// A `cur_in` of exactly zero always maps to `min_out`, whatever the input
/// range is. The frequency and radius mappings were tuned against this, so it
/// stays even where it is not the true interpolation.
pub fn scale(min_in: f32, max_in: f32, cur_in: f32, min_out: f32, max_out: f32) -> f32 {
    let t = if cur_in != 0.0 {
        (cur_in - min_in) / (max_in - min_in)
    } else {
        0.0
    };
    let t = t.clamp(0.0, 1.0);

    min_out + t * (max_out - min_out)
}

pub fn note_frequency(a4: f32, half_steps: f32) -> f32 {
    a4 * twelfth_root_of_two().powf(half_steps)
}

pub fn half_steps_from_frequency(a4: f32, frequency: f32) -> f32 {
    if frequency == 0.0 {
        return 0.0;
    }

    (frequency / a4).ln() / twelfth_root_of_two().ln()
}

/// `pos_start > pos_end` is allowed and flips the direction, e.g. to make a
/// smaller y mean a higher frequency.
pub fn frequency_of_position_in_linear_range(
    frequency_start: f32,
    frequency_end: f32,
    pos_start: f32,
    pos_end: f32,
    pos: f32,
) -> f32 {
    scale(pos_start, pos_end, pos, frequency_start, frequency_end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn scale_interpolates_the_midpoint() {
        assert_approx_eq!(scale(0.0, 10.0, 5.0, 100.0, 200.0), 150.0);
    }

    #[test]
    fn scale_maps_zero_input_to_min_output() {
        assert_approx_eq!(scale(0.0, 10.0, 0.0, 100.0, 200.0), 100.0);
    }

    // Known quirk: with a non-zero input range start, zero does not land where
    // the interpolation would put it.
    #[test]
    fn scale_zero_input_ignores_range_start() {
        assert_approx_eq!(scale(-10.0, 10.0, 0.0, 100.0, 200.0), 100.0);
        assert_approx_eq!(scale(-10.0, 10.0, 0.001, 100.0, 200.0), 150.0, 0.01);
    }

    #[test]
    fn scale_clamps_out_of_range_inputs() {
        assert_approx_eq!(scale(0.0, 10.0, 25.0, 100.0, 200.0), 200.0);
        assert_approx_eq!(scale(0.0, 10.0, -25.0, 100.0, 200.0), 100.0);
        assert_approx_eq!(scale(0.0, 10.0, 25.0, 200.0, 100.0), 100.0);
    }

    #[test]
    fn scale_is_monotonic_and_bounded() {
        let mut last = scale(0.0, 100.0, -20.0, 80.0, 30.0);
        for i in -19..140 {
            let out = scale(0.0, 100.0, i as f32, 80.0, 30.0);
            assert!(out <= last, "not monotonic at {}", i);
            assert!((30.0..=80.0).contains(&out));
            last = out;
        }
    }

    #[test]
    fn scale_handles_flipped_input_ranges() {
        assert_approx_eq!(scale(640.0, -640.0, 320.0, 0.0, 1.0), 0.25);
    }

    #[test]
    fn note_frequency_of_reference_and_octave() {
        assert_approx_eq!(note_frequency(A4_FREQUENCY, 0.0), 440.0);
        assert_approx_eq!(note_frequency(A4_FREQUENCY, 12.0), 880.0, 1e-3);
        assert_approx_eq!(note_frequency(A4_FREQUENCY, -12.0), 220.0, 1e-3);
    }

    #[test]
    fn half_steps_inverts_note_frequency() {
        for n in [-36.0, -20.5, -1.0, 0.0, 0.25, 7.0, 19.0, 30.0] {
            let frequency = note_frequency(A4_FREQUENCY, n);
            assert_approx_eq!(half_steps_from_frequency(A4_FREQUENCY, frequency), n, 1e-3);
        }
    }

    #[test]
    fn half_steps_of_zero_frequency_is_zero() {
        assert_eq!(half_steps_from_frequency(A4_FREQUENCY, 0.0), 0.0);
    }

    #[test]
    fn linear_range_flips_with_reversed_positions() {
        let low = 100.0;
        let high = 200.0;
        assert_approx_eq!(frequency_of_position_in_linear_range(low, high, 600.0, 100.0, 600.0), low);
        assert_approx_eq!(frequency_of_position_in_linear_range(low, high, 600.0, 100.0, 100.0), high);
        assert_approx_eq!(frequency_of_position_in_linear_range(low, high, 600.0, 100.0, 350.0), 150.0);
    }
}
