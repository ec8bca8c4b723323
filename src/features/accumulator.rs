/// Running sums over the pixels of one component.
pub(crate) struct ComponentAccumulator {
    pub count: usize,
    pub sum_x: f64,
    pub sum_y: f64,
    pub sum_xx: f64,
    pub sum_yy: f64,
    pub sum_xy: f64,
    pub sum_mag: f64,
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

impl ComponentAccumulator {
    pub(crate) fn new() -> Self {
        Self {
            count: 0,
            sum_x: 0.0,
            sum_y: 0.0,
            sum_xx: 0.0,
            sum_yy: 0.0,
            sum_xy: 0.0,
            sum_mag: 0.0,
            min_x: usize::MAX,
            min_y: usize::MAX,
            max_x: 0,
            max_y: 0,
        }
    }

    pub(crate) fn push(&mut self, x: usize, y: usize, mag: f32) {
        self.count += 1;
        let xf = x as f64;
        let yf = y as f64;
        self.sum_x += xf;
        self.sum_y += yf;
        self.sum_xx += xf * xf;
        self.sum_yy += yf * yf;
        self.sum_xy += xf * yf;
        self.sum_mag += mag as f64;
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub(crate) fn centroid(&self) -> [f64; 2] {
        let n = self.count.max(1) as f64;
        [self.sum_x / n, self.sum_y / n]
    }

    /// Population covariance `(cxx, cxy, cyy)` about the centroid.
    pub(crate) fn covariance(&self) -> (f64, f64, f64) {
        let n = self.count.max(1) as f64;
        let [cx, cy] = self.centroid();
        (
            self.sum_xx / n - cx * cx,
            self.sum_xy / n - cx * cy,
            self.sum_yy / n - cy * cy,
        )
    }

    pub(crate) fn avg_mag(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            (self.sum_mag / self.count as f64) as f32
        }
    }
}
