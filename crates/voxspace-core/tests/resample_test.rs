use burn::tensor::{Shape, Tensor, TensorData};
use burn_ndarray::NdArray;
use voxspace_core::error::Result;
use voxspace_core::image::{Image, MetadataDictionary};
use voxspace_core::interpolation::InterpolationOrder;
use voxspace_core::resampler::{one_hot_channel_count, resample, ResampleOptions};
use voxspace_core::spatial::{Direction, Point, Spacing};

type Backend = NdArray<f32>;

/// Volume of `size = (x, y, z)` voxels whose value is `f(x, y, z)`.
fn volume<F: Fn(usize, usize, usize) -> f32>(size: [usize; 3], spacing: [f64; 3], f: F) -> Image<Backend, 3> {
    let [nx, ny, nz] = size;
    let mut values = Vec::with_capacity(nx * ny * nz);
    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                values.push(f(x, y, z));
            }
        }
    }
    let data = Tensor::<Backend, 3>::from_data(TensorData::new(values, Shape::new([nz, ny, nx])), &Default::default());
    Image::new(data, Point::new([2.0, -3.0, 10.0]), Spacing::new(spacing), Direction::identity())
}

fn slice<F: Fn(usize, usize) -> f32>(size: [usize; 2], spacing: [f64; 2], f: F) -> Image<Backend, 2> {
    let [nx, ny] = size;
    let values: Vec<f32> = (0..ny).flat_map(|y| (0..nx).map(move |x| (x, y))).map(|(x, y)| f(x, y)).collect();
    let data = Tensor::<Backend, 2>::from_data(TensorData::new(values, Shape::new([ny, nx])), &Default::default());
    Image::new(data, Point::new([2.0, -3.0]), Spacing::new(spacing), Direction::identity())
}

fn assert_all_close(actual: &[f32], expected: &[f32], tolerance: f32) {
    assert_eq!(actual.len(), expected.len());
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!((a - e).abs() <= tolerance, "voxel {i}: expected {e}, got {a}");
    }
}

#[test]
fn test_every_order_resamples() -> Result<()> {
    let image = volume([6, 5, 4], [1.0, 1.0, 2.5], |x, y, z| (x + 2 * y + 3 * z) as f32);

    for order in InterpolationOrder::ALL {
        let options = ResampleOptions::image_3d().with_order(order);
        let result = resample(&image, Spacing::new([0.5, 0.5, 2.0]), &options)?;
        assert_eq!(result.size(), [11, 9, 4], "order {order}");
    }

    for name in ["NearestNeighbor", "Linear", "BSpline"] {
        let order: InterpolationOrder = name.parse()?;
        let options = ResampleOptions::image_2d().with_order(order);
        let result = resample(&slice([101, 3], [1.0, 1.0], |x, _| x as f32), Spacing::new([2.0, 1.0]), &options)?;
        assert_eq!(result.size(), [51, 3]);
    }
    Ok(())
}

#[test]
fn test_unknown_order_name_is_rejected() {
    assert!("Cubic".parse::<InterpolationOrder>().is_err());
}

#[test]
fn test_label_round_trip_on_same_spacing() -> Result<()> {
    let labels = volume([5, 4, 3], [0.8, 0.8, 3.0], |x, y, z| ((x + y + z) % 3) as f32);
    assert_eq!(one_hot_channel_count(&labels)?, Some(3));

    for order in [InterpolationOrder::NearestNeighbor, InterpolationOrder::Linear] {
        let options = ResampleOptions::label_3d()
            .with_order(order)
            .with_out_plane_order(InterpolationOrder::NearestNeighbor);
        let result = resample(&labels, *labels.spacing(), &options)?;

        assert_eq!(result.size(), labels.size());
        assert_eq!(result.to_vec()?, labels.to_vec()?, "order {order}");
    }
    Ok(())
}

#[test]
fn test_binary_labels_bypass_one_hot() -> Result<()> {
    let labels = slice([8, 6], [1.0, 1.0], |x, y| if x + y > 6 { 1.0 } else { 0.0 });
    assert_eq!(one_hot_channel_count(&labels)?, None);

    let target = Spacing::new([0.6, 0.6]);
    let with_one_hot = resample(&labels, target, &ResampleOptions::label_2d())?;
    let direct = resample(&labels, target, &ResampleOptions::label_2d().with_one_hot(false))?;

    assert_eq!(with_one_hot.to_vec()?, direct.to_vec()?);
    Ok(())
}

#[test]
fn test_one_hot_never_invents_classes() -> Result<()> {
    // Only classes 1 and 3: interpolating raw values would produce 2 along the border.
    let labels = volume([6, 6, 4], [1.0, 1.0, 2.0], |x, _, _| if x < 3 { 1.0 } else { 3.0 });

    let result = resample(&labels, Spacing::new([0.4, 0.7, 1.5]), &ResampleOptions::label_3d())?;

    let values = result.to_vec()?;
    assert!(values.iter().all(|v| *v == 1.0 || *v == 3.0), "unexpected classes in {values:?}");
    assert!(values.contains(&1.0) && values.contains(&3.0));
    Ok(())
}

#[test]
fn test_multiclass_2d_upsample() -> Result<()> {
    let labels = slice([6, 5], [1.0, 1.0], |x, y| match (x < 3, y < 2) {
        (true, true) => 0.0,
        (true, false) => 1.0,
        (false, _) => 2.0,
    });

    let result = resample(&labels, Spacing::new([0.5, 0.5]), &ResampleOptions::label_2d())?;

    assert_eq!(result.size(), [11, 9]);
    for value in result.to_vec()? {
        assert!(value == 0.0 || value == 1.0 || value == 2.0);
    }
    Ok(())
}

#[test]
fn test_negative_labels_are_rejected() {
    let labels = slice([3, 3], [1.0, 1.0], |x, _| x as f32 - 1.0);
    let err = resample(&labels, Spacing::new([0.5, 0.5]), &ResampleOptions::label_2d()).unwrap_err();
    assert!(matches!(err, voxspace_core::VoxspaceError::InvalidArgument(_)));
}

#[test]
fn test_split_planes_matches_separate_regrids() -> Result<()> {
    let in_plane = |x: usize, y: usize| ((x * x) as f32 * 0.5 - (y as f32) * 1.5).sin();
    let image = volume([6, 5, 4], [1.0, 1.0, 2.0], |x, y, _| in_plane(x, y));
    let target = Spacing::new([0.7, 0.7, 1.5]);

    let split = resample(&image, target, &ResampleOptions::image_3d())?;
    assert_eq!(split.size(), [8, 6, 5]);
    assert_eq!(split.spacing(), &target);

    // In-plane: every output slice is the 2D BSpline regrid of the (z-constant) input slice.
    let reference = resample(&slice([6, 5], [1.0, 1.0], in_plane), Spacing::new([0.7, 0.7]), &ResampleOptions::image_2d())?;
    let reference = reference.to_vec()?;
    let values = split.to_vec()?;
    for z in 0..5 {
        assert_all_close(&values[z * 48..(z + 1) * 48], &reference, 1e-4);
    }

    // Through-plane: a z-only profile is picked up by nearest neighbour, never blended.
    let layered = volume([3, 3, 4], [1.0, 1.0, 2.0], |_, _, z| (10 * z) as f32);
    let split = resample(&layered, Spacing::new([1.0, 1.0, 1.5]), &ResampleOptions::image_3d())?;
    let nearest = resample(
        &layered,
        Spacing::new([1.0, 1.0, 1.5]),
        &ResampleOptions::image_3d().with_order(InterpolationOrder::NearestNeighbor),
    )?;
    assert_all_close(&split.to_vec()?, &nearest.to_vec()?, 1e-4);
    Ok(())
}

#[test]
fn test_metadata_copy() -> Result<()> {
    let metadata: MetadataDictionary = [("descrip", "ct"), ("pixdim", "1 1 2.5")].into_iter().collect();
    let image = volume([4, 4, 3], [1.0, 1.0, 2.5], |x, _, _| x as f32).with_metadata(metadata.clone());
    let target = Spacing::new([2.0, 2.0, 2.5]);

    let copied = resample(&image, target, &ResampleOptions::image_3d())?;
    for (key, value) in metadata.iter() {
        assert_eq!(copied.metadata().get(key), Some(value));
    }

    let dropped = resample(&image, target, &ResampleOptions::image_3d().with_copy_metadata(false))?;
    assert!(dropped.metadata().is_empty());

    // The input is never modified.
    assert_eq!(image.metadata(), &metadata);
    assert_eq!(image.size(), [4, 4, 3]);
    Ok(())
}

/// z-profile at the centre column of a through-plane resample.
fn z_profile(image: &Image<Backend, 3>) -> Result<Vec<f32>> {
    let [nx, ny, nz] = image.size();
    let values = image.to_vec()?;
    Ok((0..nz).map(|z| values[z * nx * ny + (ny / 2) * nx + nx / 2]).collect())
}

#[test]
fn test_through_plane_upsample_replicates_slices() -> Result<()> {
    let layered = volume([3, 3, 4], [0.8, 0.8, 2.0], |_, _, z| (10 * z) as f32);
    let target = Spacing::new([0.8, 0.8, 1.0]);

    for options in [
        ResampleOptions::image_3d(),
        ResampleOptions::image_3d().with_order(InterpolationOrder::NearestNeighbor),
    ] {
        let result = resample(&layered, target, &options)?;
        assert_eq!(result.size(), [3, 3, 7]);
        assert_all_close(&z_profile(&result)?, &[0.0, 10.0, 10.0, 20.0, 20.0, 30.0, 30.0], 1e-4);
    }
    Ok(())
}

#[test]
fn test_through_plane_upsample_far_from_origin() -> Result<()> {
    let layered = volume([4, 3, 5], [0.25, 0.25, 2.0], |_, _, z| (10 * z) as f32);
    let scanner = Image::new(
        layered.data().clone(),
        Point::new([-1234.567, 987.3, -642.35]),
        *layered.spacing(),
        Direction::identity(),
    );

    let result = resample(&scanner, Spacing::new([0.125, 0.25, 1.0]), &ResampleOptions::image_3d())?;

    assert_eq!(result.size(), [7, 3, 9]);
    assert_all_close(
        &z_profile(&result)?,
        &[0.0, 10.0, 10.0, 20.0, 20.0, 30.0, 30.0, 40.0, 40.0],
        1e-4,
    );
    Ok(())
}

#[test]
fn test_label_through_plane_upsample_far_from_origin() -> Result<()> {
    let labels = volume([3, 3, 4], [1.0, 1.0, 3.0], |x, _, z| ((x + z) % 3) as f32);
    let scanner = Image::new(
        labels.data().clone(),
        Point::new([-1234.567, 987.3, 402.15]),
        *labels.spacing(),
        Direction::identity(),
    );

    let result = resample(&scanner, Spacing::new([1.0, 1.0, 1.5]), &ResampleOptions::label_3d())?;

    assert_eq!(result.size(), [3, 3, 7]);
    let values = result.to_vec()?;
    // Slice k reads source slice floor(k / 2 + 0.5): 0, 1, 1, 2, 2, 3, 3.
    for (k, source) in [0usize, 1, 1, 2, 2, 3, 3].into_iter().enumerate() {
        for x in 0..3 {
            assert_eq!(values[k * 9 + x], ((x + source) % 3) as f32, "slice {k}, x {x}");
        }
    }
    Ok(())
}
