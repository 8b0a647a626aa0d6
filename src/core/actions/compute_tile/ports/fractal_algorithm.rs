use crate::core::data::complex::Complex;

pub trait FractalAlgorithm: Sync {
    type Success: Send;

    fn compute(&self, point: Complex) -> Self::Success;
}
