//! Sample buffer utilities shared by the analyzers

/// Scale factor from normalized float samples to 16-bit full scale
pub const FULL_SCALE_S16: f32 = 32767.0;

/// Split `frames` interleaved stereo frames into separate channel buffers
///
/// Both destinations must hold at least `frames` samples and `interleaved`
/// at least `2 * frames`.
pub fn deinterleave_buffer(
    left: &mut [f32],
    right: &mut [f32],
    interleaved: &[f32],
    frames: usize,
) {
    let frames_iter = interleaved[..frames * 2].chunks_exact(2);
    for ((l, r), frame) in left[..frames]
        .iter_mut()
        .zip(right[..frames].iter_mut())
        .zip(frames_iter)
    {
        *l = frame[0];
        *r = frame[1];
    }
}

/// Multiply every sample by `gain`
pub fn apply_gain(buffer: &mut [f32], gain: f32) {
    if gain == 1.0 {
        return;
    }
    if gain == 0.0 {
        buffer.fill(0.0);
        return;
    }
    for sample in buffer {
        *sample *= gain;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deinterleave_splits_channels() {
        let interleaved = [1.0, -1.0, 2.0, -2.0, 3.0, -3.0];
        let mut left = [0.0; 3];
        let mut right = [0.0; 3];
        deinterleave_buffer(&mut left, &mut right, &interleaved, 3);
        assert_eq!(left, [1.0, 2.0, 3.0]);
        assert_eq!(right, [-1.0, -2.0, -3.0]);
    }

    #[test]
    fn deinterleave_leaves_tail_untouched() {
        let interleaved = [1.0, -1.0, 2.0, -2.0];
        let mut left = [9.0; 4];
        let mut right = [9.0; 4];
        deinterleave_buffer(&mut left, &mut right, &interleaved, 2);
        assert_eq!(left, [1.0, 2.0, 9.0, 9.0]);
        assert_eq!(right, [-1.0, -2.0, 9.0, 9.0]);
    }

    #[test]
    fn apply_gain_scales() {
        let mut buffer = [0.5, -0.25, 1.0];
        apply_gain(&mut buffer, FULL_SCALE_S16);
        assert_eq!(buffer, [16383.5, -8191.75, 32767.0]);

        apply_gain(&mut buffer, 1.0);
        assert_eq!(buffer[2], 32767.0);

        apply_gain(&mut buffer, 0.0);
        assert_eq!(buffer, [0.0; 3]);
    }
}
