use approx::assert_relative_eq;
use ndarray::{ArrayD, IxDyn};
use splint_core::{load_weights, DimensionSpec, MemoryOrder, SparseLinearTransform, SplintError};

#[test]
fn test_area_average_onto_coarser_grid() {
    // Each 1x2 output cell averages a 2x2 block of the 2x4 input grid
    let transform = SparseLinearTransform::new(
        vec![0.25; 8],
        vec![1, 1, 1, 1, 2, 2, 2, 2],
        vec![1, 2, 5, 6, 3, 4, 7, 8],
        DimensionSpec::new(["lat", "lon"], [2, 4]).unwrap(),
        DimensionSpec::new(["lat", "lon"], [1, 2]).unwrap(),
        true,
        MemoryOrder::RowMajor,
    )
    .unwrap();

    let data = ArrayD::from_shape_vec(
        IxDyn(&[2, 4]),
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
    )
    .unwrap();
    let result = transform.apply(&data).unwrap();

    assert_eq!(result.shape(), &[1, 2]);
    assert_relative_eq!(result[[0, 0]], 3.5);
    assert_relative_eq!(result[[0, 1]], 5.5);
}

#[test]
fn test_missing_weight_file() {
    let result = load_weights(
        "does/not/exist.npz",
        DimensionSpec::new(["x"], [1]).unwrap(),
        DimensionSpec::new(["x"], [1]).unwrap(),
    );
    assert!(matches!(result, Err(SplintError::FileAccess { .. })));
}
