use ndview::test_util::expect_equal;
use ndview::{ArrayError, ComplexArray, DimensionSlice, RealArray, ReduceOp};
use ndview_testing::TestCases;
use num_complex::Complex64;

fn arange(shape: &[usize]) -> RealArray {
    let len: usize = shape.iter().product();
    let values: Vec<f64> = (0..len).map(|x| x as f64).collect();
    RealArray::from_elements(shape, &values).unwrap()
}

#[test]
fn test_reshape_round_trip() {
    #[derive(Debug)]
    struct Case {
        shape: Vec<usize>,
        new_shape: Vec<usize>,
        transpose_first: bool,
    }

    let cases = [
        Case {
            shape: vec![2, 3],
            new_shape: vec![6],
            transpose_first: false,
        },
        Case {
            shape: vec![2, 3, 4],
            new_shape: vec![4, 6],
            transpose_first: false,
        },
        Case {
            shape: vec![2, 3, 4],
            new_shape: vec![24],
            transpose_first: true,
        },
        Case {
            shape: vec![6],
            new_shape: vec![1, 2, 3],
            transpose_first: false,
        },
    ];

    cases.test_each(|case| {
        let mut v = arange(&case.shape);
        if case.transpose_first {
            v = v.transpose().unwrap();
        }
        let round_trip = v.reshape(&case.new_shape).unwrap().reshape(v.shape()).unwrap();
        assert_eq!(round_trip.shape(), v.shape());
        assert_eq!(round_trip.to_vec(), v.to_vec());
    })
}

#[test]
fn test_views_alias_buffer() {
    let v = arange(&[3, 4]);

    let mut slice = v.slice(2).unwrap();
    slice.put(&[1], 100.).unwrap();
    assert_eq!(v.get(&[2, 1]), Ok(100.));

    let mut permuted = v.permute(&[1, 0]).unwrap();
    permuted.put(&[3, 0], 200.).unwrap();
    assert_eq!(v.get(&[0, 3]), Ok(200.));

    let mut transposed = v.transpose().unwrap();
    transposed.put(&[0, 1], 300.).unwrap();
    assert_eq!(v.get(&[1, 0]), Ok(300.));

    let mut sub = v.sub_array(&[0, 0], &[3, 4]).unwrap();
    sub.put(&[2, 3], 400.).unwrap();
    assert_eq!(v.get(&[2, 3]), Ok(400.));

    let mut sub = v.sub_array(&[1, 1], &[2, 2]).unwrap();
    sub.put(&[1, 1], 500.).unwrap();
    assert_eq!(v.get(&[2, 2]), Ok(500.));

    // `dup` breaks aliasing.
    let mut copy = v.dup();
    copy.put(&[0, 0], -1.).unwrap();
    assert_eq!(v.get(&[0, 0]), Ok(0.));
}

#[test]
fn test_complex_views_alias_buffer() {
    let values: Vec<Complex64> = (0..6).map(|i| Complex64::new(i as f64, 0.)).collect();
    let v = ComplexArray::from_elements(&[2, 3], &values).unwrap();
    let mut t = v.transpose().unwrap();
    t.put_imag(&[2, 1], 7.).unwrap();
    assert_eq!(v.get(&[1, 2]), Ok(Complex64::new(5., 7.)));
    assert_eq!(v.data()[11], 7.);
}

#[test]
fn test_complex_sum_and_mean() {
    let v = ComplexArray::from_parts(
        &RealArray::from_vec(vec![1., 2., 3.]),
        &RealArray::from_vec(vec![0., 0., 0.]),
    )
    .unwrap();
    assert_eq!(v.sum(0).unwrap(), ComplexArray::scalar(Complex64::new(6., 0.)));
    assert_eq!(v.mean(0).unwrap(), ComplexArray::scalar(Complex64::new(2., 0.)));
    assert_eq!(
        v.reduce(ReduceOp::Sum, 0).unwrap().item(),
        Some(Complex64::new(6., 0.))
    );
}

#[test]
fn test_cumsumi_is_monotonic() {
    let values = vec![0.5, 0., 3., 1.25, 0., 7.];
    let mut v = RealArray::from_vec(values.clone());
    let total = v.reduce_all(ReduceOp::Sum);
    v.cumsumi(0).unwrap();

    let sums = v.to_vec();
    assert!(sums.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(sums.last().copied(), Some(total));
}

#[test]
fn test_conj_is_involution() {
    let values: Vec<Complex64> = (0..12)
        .map(|i| Complex64::new(i as f64 * 0.5, 3. - i as f64))
        .collect();
    let v = ComplexArray::from_elements(&[3, 4], &values).unwrap();
    assert_eq!(v.conj().conj(), v);

    let p = v.permute(&[1, 0]).unwrap();
    assert_eq!(p.conj().conj(), p);
    assert_ne!(p.conj(), p);
}

#[test]
fn test_complex_equality_tolerance() {
    let a = ComplexArray::from_vec(vec![Complex64::new(1., 2.), Complex64::new(3., 4.)]);
    let b = ComplexArray::from_vec(vec![
        Complex64::new(1. + 9e-7, 2. - 9e-7),
        Complex64::new(3., 4. + 9e-7),
    ]);
    let c = ComplexArray::from_vec(vec![Complex64::new(1., 2.), Complex64::new(3., 4. + 2e-6)]);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_ne!(a, ComplexArray::from_vec(vec![Complex64::new(1., 2.)]));
}

#[test]
fn test_transpose_row_vector() {
    let v = RealArray::from_vec(vec![1., 2., 3.]);
    let t = v.transpose().unwrap();
    assert_eq!(t.shape(), &[3, 1]);
    assert_eq!(t.to_vec(), [1., 2., 3.]);
    assert!(t.is_column_vector());
    assert_eq!(t.transpose().unwrap().shape(), &[3]);
}

#[test]
fn test_matrix_slice_is_view() {
    let m = arange(&[3, 3]);
    let mut row = m.slice(1).unwrap();
    assert_eq!(row.shape(), &[3]);
    expect_equal(&row, &m.get_row(1).unwrap()).unwrap();

    row.fill(-1.);
    assert_eq!(m.to_vec(), [0., 1., 2., -1., -1., -1., 6., 7., 8.]);
}

#[test]
fn test_sum_over_dim_0_gives_column_sums() {
    let m = RealArray::from_data(&[2, 3], vec![1., 2., 3., 4., 5., 6.]).unwrap();
    let sums = m.sum(0).unwrap();
    assert_eq!(sums.shape(), &[3]);
    expect_equal(&sums, &RealArray::from_vec(vec![5., 7., 9.])).unwrap();
}

#[test]
fn test_user_op_with_write_back() {
    // Normalize each row of a matrix to unit sum, in place.
    let mut m = RealArray::from_data(&[2, 2], vec![1., 3., 2., 2.]).unwrap();
    let mut normalize = |slice: &mut DimensionSlice<f64>| {
        let total = slice.result.reduce_all(ReduceOp::Sum);
        let values: Vec<f64> = slice.result.to_vec().iter().map(|x| x / total).collect();
        slice.result = RealArray::from_vec(values);
    };
    m.iterate_over_dimension(1, &mut normalize, true).unwrap();
    assert_eq!(m.to_vec(), [0.25, 0.75, 0.5, 0.5]);
}

#[test]
fn test_invalid_dimensions() {
    let v = arange(&[3]);
    assert_eq!(
        v.sum(2).err(),
        Some(ArrayError::InvalidDimension { dim: 2, ndim: 1 })
    );
    let s = RealArray::scalar(1.);
    assert!(matches!(
        s.mean(1),
        Err(ArrayError::InvalidDimension { .. })
    ));
    assert!(matches!(
        "fft".parse::<ReduceOp>(),
        Err(ArrayError::UnsupportedOperation(_))
    ));
}
