use anyhow::Result;
use burn_ndarray::NdArray;
use ndarray::Array3;
use nifti::writer::WriterOptions;
use nifti::NiftiHeader;
use tempfile::tempdir;
use voxspace_core::resampler::{resample, ResampleOptions};
use voxspace_core::spatial::Spacing;
use voxspace_core::TargetSpacingConfig;
use voxspace_io::{get_target_spacing, read_nifti};

type Backend = NdArray<f32>;

fn header(pixdim: [f32; 3]) -> NiftiHeader {
    NiftiHeader {
        pixdim: [1.0, pixdim[0], pixdim[1], pixdim[2], 1.0, 1.0, 1.0, 1.0],
        sform_code: 0,
        qform_code: 0,
        ..NiftiHeader::default()
    }
}

#[test]
fn test_cohort_target_then_resample_labels() -> Result<()> {
    let dir = tempdir()?;
    let mut paths = Vec::new();
    for (i, z) in [4.0f32, 4.0, 2.0].into_iter().enumerate() {
        let path = dir.path().join(format!("case_{i}.nii.gz"));
        // Three classes split along x
        let labels = Array3::from_shape_fn((9, 8, 5), |(x, _, _)| (x / 3) as f32);
        WriterOptions::new(&path)
            .reference_header(&header([1.0, 1.0, z]))
            .write_nifti(&labels)?;
        paths.push(path);
    }

    let target = get_target_spacing(&paths, &TargetSpacingConfig::default())?;
    // median (1, 1, 4): 4 / 1 > 1 / 1, so z takes its 10th percentile (2.4)
    assert!((target.median[2] - 4.0).abs() < 1e-6);
    assert!((target.target[2] - 2.4).abs() < 1e-6);

    let device = Default::default();
    let image = read_nifti::<Backend, 3, _>(&paths[0], &device)?;
    let spacing = Spacing::try_from_slice(target.target.as_slice())?;
    let resampled = resample(&image, spacing, &ResampleOptions::label_3d())?;

    // z: floor(4 * 4 / 2.4) + 1
    assert_eq!(resampled.size(), [9, 8, 7]);
    assert_eq!(resampled.origin(), image.origin());
    assert!(resampled.metadata().is_empty());

    let values = resampled.to_vec()?;
    assert!(values.iter().all(|v| [0.0, 1.0, 2.0].contains(v)));
    // Same in-plane lattice, so each x column keeps its class.
    for x in 0..9 {
        assert_eq!(values[x], (x / 3) as f32);
    }
    Ok(())
}
