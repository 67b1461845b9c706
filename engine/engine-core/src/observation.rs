//! Player-relative observations handed to predictors.

/// Stacked feature planes, `[planes, rows, cols]` in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    shape: [usize; 3],
    data: Vec<f32>,
}

impl Observation {
    /// All-zero observation of the given shape.
    pub fn zeros(planes: usize, rows: usize, cols: usize) -> Self {
        Self {
            shape: [planes, rows, cols],
            data: vec![0.0; planes * rows * cols],
        }
    }

    #[inline]
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn offset(&self, plane: usize, row: usize, col: usize) -> usize {
        let [_, rows, cols] = self.shape;
        (plane * rows + row) * cols + col
    }

    #[inline]
    pub fn get(&self, plane: usize, row: usize, col: usize) -> f32 {
        self.data[self.offset(plane, row, col)]
    }

    #[inline]
    pub fn set(&mut self, plane: usize, row: usize, col: usize, value: f32) {
        let offset = self.offset(plane, row, col);
        self.data[offset] = value;
    }

    /// One plane as a flat `rows * cols` slice.
    pub fn plane(&self, plane: usize) -> &[f32] {
        let size = self.shape[1] * self.shape[2];
        &self.data[plane * size..(plane + 1) * size]
    }

    /// Set every cell of `plane` to `value`.
    pub fn fill_plane(&mut self, plane: usize, value: f32) {
        let size = self.shape[1] * self.shape[2];
        self.data[plane * size..(plane + 1) * size].fill(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_layout() {
        let mut obs = Observation::zeros(2, 2, 3);
        obs.set(1, 1, 2, 5.0);
        assert_eq!(obs.len(), 12);
        assert_eq!(obs.data()[11], 5.0);
        assert_eq!(obs.plane(1), &[0.0, 0.0, 0.0, 0.0, 0.0, 5.0]);
        assert_eq!(obs.get(1, 1, 2), 5.0);
    }

    #[test]
    fn test_fill_plane() {
        let mut obs = Observation::zeros(2, 1, 2);
        obs.fill_plane(0, -1.0);
        assert_eq!(obs.data(), &[-1.0, -1.0, 0.0, 0.0]);
        assert_eq!(obs.plane(1), &[0.0, 0.0]);
    }
}
