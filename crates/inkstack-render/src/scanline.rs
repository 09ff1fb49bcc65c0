//! Non-zero winding scan conversion with 4x4 supersampling.

use kurbo::{BezPath, PathEl, Point};

/// Subsamples per pixel along each axis.
const SUBSAMPLES: usize = 4;
/// Flattening tolerance in pixels.
pub(crate) const TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone, Copy)]
struct Edge {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    /// +1 for downward edges, -1 for upward ones.
    winding: i32,
}

impl Edge {
    fn between(a: Point, b: Point) -> Option<Self> {
        if a.y == b.y {
            return None;
        }
        let edge = if a.y < b.y {
            Edge { x0: a.x, y0: a.y, x1: b.x, y1: b.y, winding: 1 }
        } else {
            Edge { x0: b.x, y0: b.y, x1: a.x, y1: a.y, winding: -1 }
        };
        Some(edge)
    }

    fn x_at(&self, y: f64) -> f64 {
        let t = (y - self.y0) / (self.y1 - self.y0);
        self.x0 + t * (self.x1 - self.x0)
    }
}

/// Flatten a path into line edges. Open subpaths are closed implicitly.
fn edges(path: &BezPath) -> Vec<Edge> {
    let mut edges = Vec::new();
    let mut start = Point::ZERO;
    let mut last = Point::ZERO;
    kurbo::flatten(path.iter(), TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => {
            edges.extend(Edge::between(last, start));
            start = p;
            last = p;
        }
        PathEl::LineTo(p) => {
            edges.extend(Edge::between(last, p));
            last = p;
        }
        PathEl::ClosePath => {
            edges.extend(Edge::between(last, start));
            last = start;
        }
        // flatten only emits lines
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });
    edges.extend(Edge::between(last, start));
    edges
}

/// First subsample index whose centre lies at or right of `x`.
fn sample_index(x: f64, sample_count: usize) -> usize {
    (x * SUBSAMPLES as f64 - 0.5).ceil().clamp(0.0, sample_count as f64) as usize
}

/// Compute the coverage of `path` inside a `width` x `height` pixel grid and
/// call `blend(x, y, coverage)` for every pixel with non-zero coverage.
pub(crate) fn fill_coverage(path: &BezPath, width: u32, height: u32, mut blend: impl FnMut(usize, usize, f32)) {
    let edges = edges(path);
    if edges.is_empty() || width == 0 || height == 0 {
        return;
    }
    let min_y = edges.iter().map(|e| e.y0).fold(f64::INFINITY, f64::min);
    let max_y = edges.iter().map(|e| e.y1).fold(f64::NEG_INFINITY, f64::max);
    let row_start = min_y.floor().max(0.0) as usize;
    let row_end = max_y.ceil().min(height as f64).max(0.0) as usize;

    let width = width as usize;
    let sample_count = width * SUBSAMPLES;
    let full = (SUBSAMPLES * SUBSAMPLES) as f32;
    let mut coverage = vec![0u32; width];
    let mut crossings: Vec<(f64, i32)> = Vec::new();

    for row in row_start..row_end {
        coverage.fill(0);
        for sub in 0..SUBSAMPLES {
            let y = row as f64 + (sub as f64 + 0.5) / SUBSAMPLES as f64;
            crossings.clear();
            crossings.extend(
                edges
                    .iter()
                    .filter(|e| y >= e.y0 && y < e.y1)
                    .map(|e| (e.x_at(y), e.winding)),
            );
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding == 0 {
                    continue;
                }
                let first = sample_index(pair[0].0, sample_count);
                let last = sample_index(pair[1].0, sample_count);
                for sample in first..last {
                    coverage[sample / SUBSAMPLES] += 1;
                }
            }
        }
        for (x, &hits) in coverage.iter().enumerate() {
            if hits > 0 {
                blend(x, row, hits as f32 / full);
            }
        }
    }
}
