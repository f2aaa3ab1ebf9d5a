use std::f64::consts::PI;

/// Multiplies `frame` point-wise by a Hann window of the same length.
///
/// Needs at least two samples; a chunk size below that is rejected when
/// the estimator is configured.
pub fn hann_window(frame: &mut [f64]) {
    let last = (frame.len() - 1) as f64;
    for (i, value) in frame.iter_mut().enumerate() {
        *value *= 0.5 * (1.0 - (2.0 * PI * i as f64 / last).cos());
    }
}

#[cfg(test)]
mod tests {
    use super::hann_window;

    #[test]
    fn odd_length_peaks_at_center() {
        let mut frame = [1.0; 5];
        hann_window(&mut frame);
        assert_eq!(frame[0], 0.0);
        assert!((frame[1] - 0.5).abs() < 1e-12);
        assert_eq!(frame[2], 1.0);
        assert!((frame[3] - 0.5).abs() < 1e-12);
        assert!(frame[4].abs() < 1e-12);
    }

    #[test]
    fn even_length_is_symmetric() {
        let mut frame = [1.0; 6];
        hann_window(&mut frame);
        for i in 0..3 {
            assert!((frame[i] - frame[5 - i]).abs() < 1e-12);
        }
        assert!((frame[1] - 0.345491502812526).abs() < 1e-9);
    }

    #[test]
    fn two_samples_are_both_zeroed() {
        let mut frame = [0.7, -0.3];
        hann_window(&mut frame);
        assert_eq!(frame[0], 0.0);
        assert!(frame[1].abs() < 1e-12);
    }
}
