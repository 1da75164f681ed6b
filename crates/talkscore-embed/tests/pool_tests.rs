use candle_core::{DType, Device, Tensor};
use talkscore_embed::masked_mean_l2;

fn pooled(hidden: &[f32], shape: (usize, usize, usize), mask: &[u32]) -> Vec<Vec<f32>> {
    let dev = Device::Cpu;
    let h = Tensor::from_slice(hidden, shape, &dev).unwrap();
    let m = Tensor::from_slice(mask, (shape.0, shape.1), &dev).unwrap();
    masked_mean_l2(&h, &m).unwrap().to_vec2().unwrap()
}

#[test]
fn padding_tokens_do_not_contribute() {
    // second token is padding
    let rows = pooled(&[1.0, 2.0, 3.0, 4.0, 50.0, 60.0, 70.0, 80.0], (1, 2, 4), &[1, 0]);
    let norm = 30f32.sqrt();
    for (got, want) in rows[0].iter().zip([1.0, 2.0, 3.0, 4.0]) {
        assert!((got - want / norm).abs() < 1e-5, "got {got}, want {}", want / norm);
    }
}

#[test]
fn averages_before_normalizing() {
    let rows = pooled(&[2.0, 0.0, 0.0, 4.0], (1, 2, 2), &[1, 1]);
    let inv = 1.0 / 2f32.sqrt();
    assert!((rows[0][0] - inv).abs() < 1e-5 && (rows[0][1] - inv).abs() < 1e-5);
}

#[test]
fn each_row_is_unit_length() {
    let rows = pooled(&[3.0, 0.0, 0.0, 5.0, 0.0, 2.0, 0.0, 9.0], (2, 2, 2), &[1, 0, 1, 0]);
    assert!((rows[0][0] - 1.0).abs() < 1e-5 && rows[0][1].abs() < 1e-5);
    assert!(rows[1][0].abs() < 1e-5 && (rows[1][1] - 1.0).abs() < 1e-5);
}

#[test]
fn fully_padded_row_pools_to_zero() {
    let rows = pooled(&[1.0, 1.0, 1.0, 1.0], (1, 2, 2), &[0, 0]);
    assert!(rows[0].iter().all(|x| *x == 0.0));
}

#[test]
fn rejects_wrong_rank() {
    let dev = Device::Cpu;
    let h = Tensor::zeros((2, 4), DType::F32, &dev).unwrap();
    let mask = Tensor::ones((2, 1), DType::F32, &dev).unwrap();
    assert!(masked_mean_l2(&h, &mask).is_err());
}
