const NEIGH_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// 8-connected set of foreground pixels, stored as linear indices in the
/// order the flood fill reached them (no spatial ordering implied).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    pub indices: Vec<usize>,
}

impl Component {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Iterative flood fill over a binary mask.
///
/// Seeds are visited in raster order, so the output order is deterministic.
pub(super) struct ComponentExtractor<'a> {
    mask: &'a [u8],
    width: usize,
    height: usize,
    min_size: usize,
    visited: Vec<u8>,
    stack: Vec<usize>,
    components: Vec<Component>,
}

impl<'a> ComponentExtractor<'a> {
    pub(super) fn new(mask: &'a [u8], width: usize, height: usize, min_size: usize) -> Self {
        debug_assert!(
            mask.len() >= width * height,
            "mask length {} must be at least width*height ({})",
            mask.len(),
            width * height
        );
        Self {
            mask,
            width,
            height,
            min_size,
            visited: vec![0u8; width * height],
            stack: Vec::with_capacity(64),
            components: Vec::new(),
        }
    }

    pub(super) fn extract(mut self) -> Vec<Component> {
        for idx in 0..(self.width * self.height) {
            self.process_seed(idx);
        }
        self.components
    }

    fn process_seed(&mut self, idx: usize) {
        if self.mask[idx] == 0 || self.visited[idx] != 0 {
            return;
        }
        self.visited[idx] = 1;
        self.stack.clear();
        self.stack.push(idx);

        let mut indices = Vec::new();
        while let Some(cur) = self.stack.pop() {
            indices.push(cur);
            let x = cur % self.width;
            let y = cur / self.width;
            for (dx, dy) in NEIGH_OFFSETS {
                let xn = x as isize + dx;
                let yn = y as isize + dy;
                if xn < 0 || yn < 0 || xn >= self.width as isize || yn >= self.height as isize {
                    continue;
                }
                let n = yn as usize * self.width + xn as usize;
                if self.mask[n] != 0 && self.visited[n] == 0 {
                    self.visited[n] = 1;
                    self.stack.push(n);
                }
            }
        }

        if indices.len() > self.min_size {
            self.components.push(Component { indices });
        }
    }
}
