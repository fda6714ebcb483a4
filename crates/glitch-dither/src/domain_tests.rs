//! Domain-critical regression tests for glitch-dither.
//!
//! These tests are designed to catch specific classes of bugs, not just
//! confirm happy paths. Each test documents the regression it guards against.

#[cfg(test)]
mod domain_tests {
    use crate::{
        atkinson, block_average, floyd_steinberg, halftone, ordered_color, ordered_gray,
        ThresholdMatrix, THRESHOLD_MATRICES,
    };

    /// Deterministic pseudo-image: a diagonal colour gradient with varying alpha.
    fn gradient(width: usize, height: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            for x in 0..width {
                data.push(((x * 255) / width.max(1)) as u8);
                data.push(((y * 255) / height.max(1)) as u8);
                data.push(((x + y) * 7 % 256) as u8);
                data.push((x * 3 + y) as u8);
            }
        }
        data
    }

    fn alpha(data: &[u8]) -> Vec<u8> {
        data.chunks(4).map(|px| px[3]).collect()
    }

    // ========================================================================
    // Output domain: every binarizing dither must emit only 0 or 255
    // ========================================================================

    /// If this breaks, it means: accumulated error is leaking into the
    /// written value (e.g. writing `old + error` instead of the binarized
    /// level), so diffused output contains mid-tones.
    #[test]
    fn test_diffusion_output_is_binary() {
        type Diffuser = fn(&mut [u8], usize, usize);
        let runs: [(&str, Diffuser); 2] = [
            ("atkinson", atkinson),
            ("floyd-steinberg", floyd_steinberg),
        ];
        for (name, run) in runs {
            let mut data = gradient(23, 17);
            run(&mut data, 23, 17);
            for (n, px) in data.chunks(4).enumerate() {
                for &c in &px[..3] {
                    assert!(
                        c == 0 || c == 255,
                        "REGRESSION: {name} produced {c} at pixel {n}"
                    );
                }
            }
        }
    }

    /// If this breaks, it means: a dither writes all four bytes of a pixel
    /// instead of the three colour channels.
    #[test]
    fn test_every_dither_preserves_alpha() {
        let source = gradient(12, 9);
        let expected = alpha(&source);

        let mut runs: Vec<(&str, Vec<u8>)> = Vec::new();
        let mut data = source.clone();
        atkinson(&mut data, 12, 9);
        runs.push(("atkinson", data));
        let mut data = source.clone();
        floyd_steinberg(&mut data, 12, 9);
        runs.push(("floyd-steinberg", data));
        for matrix in THRESHOLD_MATRICES {
            let mut data = source.clone();
            ordered_gray(&mut data, 12, 9, &matrix);
            runs.push(("ordered-gray", data));
            let mut data = source.clone();
            ordered_color(&mut data, 12, 9, &matrix);
            runs.push(("ordered-color", data));
        }
        let mut data = source.clone();
        block_average(&mut data, 12, 9, 4);
        runs.push(("block-average", data));
        let mut data = source.clone();
        halftone(&mut data, 12, 9);
        runs.push(("halftone", data));

        for (name, data) in runs {
            assert_eq!(data.len(), source.len(), "{name} changed buffer length");
            assert_eq!(alpha(&data), expected, "REGRESSION: {name} touched alpha");
        }
    }

    // ========================================================================
    // Error conservation: Atkinson must lose error, Floyd-Steinberg must not
    // ========================================================================

    /// If this breaks, it means: the Atkinson kernel was "fixed" to conserve
    /// error, which turns its characteristic high-contrast look into plain
    /// Floyd-Steinberg. A flat 25% gray over a long row should come out
    /// darker under Atkinson than under Floyd-Steinberg.
    #[test]
    fn test_atkinson_discards_error() {
        let width = 64;
        let height = 8;
        let flat = [64u8, 64, 64, 255].repeat(width * height);

        let mut a = flat.clone();
        atkinson(&mut a, width, height);
        let mut f = flat.clone();
        floyd_steinberg(&mut f, width, height);

        let whites = |d: &[u8]| d.chunks(4).filter(|px| px[0] == 255).count();
        let total = (width * height) as f64;
        let ratio_f = whites(&f) as f64 / total;

        assert!(
            (ratio_f - 0.25).abs() < 0.05,
            "REGRESSION: Floyd-Steinberg white ratio {ratio_f:.3}, expected ~0.25"
        );
        assert!(
            whites(&a) < whites(&f),
            "REGRESSION: Atkinson ({}) should produce fewer whites than Floyd-Steinberg ({})",
            whites(&a),
            whites(&f)
        );
    }

    /// If this breaks, it means: error is being wrapped around the image
    /// edge. The last pixel of the first row would then push error into the
    /// first pixel of the next row.
    #[test]
    fn test_diffusion_does_not_wrap_rows() {
        // Row 0: [0, 0, 120]; row 1: [120, 0, 0]. Pixel (2,0) has error 120.
        // With wrapping, 7/16 of it would land on (0,1) → 172.5 → white.
        let mut data = vec![
            0, 0, 0, 255, 0, 0, 0, 255, 120, 120, 120, 255, //
            120, 120, 120, 255, 0, 0, 0, 255, 0, 0, 0, 255,
        ];
        floyd_steinberg(&mut data, 3, 2);
        assert_eq!(
            &data[12..15],
            &[0, 0, 0],
            "REGRESSION: error leaked across the row boundary"
        );
    }

    // ========================================================================
    // Threshold matrix orientation
    // ========================================================================

    /// If this breaks, it means: the matrix lookup was transposed to
    /// `[y][x]`. The 3×3 matrix is not symmetric, so a value that sits
    /// between ranks 6 and 7 distinguishes the two orientations.
    #[test]
    fn test_matrix_orientation() {
        // scaled = 90 * 17 / 255 = 6.0: white where rank <= 6, black where rank == 7.
        let matrix = ThresholdMatrix::by_index(0).unwrap();
        let mut data = [90u8, 90, 90, 255].repeat(2);
        let mut image = [90u8, 90, 90, 255].repeat(4);
        ordered_color(&mut image, 2, 2, matrix);
        assert_eq!(image[4], 255, "(x=1, y=0) reads rank 6");
        assert_eq!(image[8], 0, "(x=0, y=1) reads rank 7");

        ordered_gray(&mut data, 2, 1, matrix);
        assert_eq!(data[0], 255, "(0,0) reads rank 3");
    }
}
