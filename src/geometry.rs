//! Strip layout: turns a rectangle, an anchor side and a segment count into
//! the root rail pair and per-segment step vectors the engine builds from.

use crate::float::Float;
use crate::vec::{Size2, Vec2};
use alloc::vec;
use alloc::vec::Vec as AllocVec;

/// Rectangle side the strip is pinned to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Anchor {
    Left,
    Right,
    Top,
    Bottom,
}

impl Anchor {
    /// Top and bottom anchored strips run along Y.
    pub fn is_vertical(self) -> bool {
        matches!(self, Anchor::Top | Anchor::Bottom)
    }

    /// Rectangle dimension the strip runs along.
    pub fn length_of<F: Float>(self, rect: Size2<F>) -> F {
        if self.is_vertical() {
            rect.height
        } else {
            rect.width
        }
    }

    /// Reference heading in degrees used by the bend check: the direction
    /// the strip grows in, with `+y` pointing down.
    pub fn orientation<F: Float>(self) -> F {
        match self {
            Anchor::Bottom => F::from_f32(-90.0),
            Anchor::Top => F::from_f32(90.0),
            Anchor::Left => F::zero(),
            Anchor::Right => F::from_f32(-180.0),
        }
    }
}

/// Layout of one strip in rectangle-local coordinates (origin top-left).
#[derive(Clone, Debug, PartialEq)]
pub struct StripGeometry<F: Float> {
    /// First root particle.
    pub starting: Vec2<F>,
    /// Offset from the first root particle to the second (rail separation).
    pub opposite: Vec2<F>,
    /// One step per segment, from the root outward.
    pub steps: AllocVec<Vec2<F>>,
    pub orientation: F,
}

impl<F: Float> StripGeometry<F> {
    /// Lay out `segments` quads over `rect`, pinned at `anchor`.
    ///
    /// With `dynamic_split` (and more than one segment) the steps halve from
    /// the root outward: `H, H/2, .., H/2^(n-2), H/2^(n-2)` where `H` is half
    /// the rectangle along the strip, so they still sum to the full length.
    /// Otherwise all steps are `length / segments`.
    pub fn new(rect: Size2<F>, segments: usize, dynamic_split: bool, anchor: Anchor) -> Self {
        let vert = anchor.is_vertical();
        let count = F::from_usize(segments.max(1));

        let (half, full, opposite) = if vert {
            (
                Vec2::new(F::zero(), rect.height * F::half()),
                Vec2::new(F::zero(), rect.height / count),
                Vec2::new(rect.width, F::zero()),
            )
        } else {
            (
                Vec2::new(rect.width * F::half(), F::zero()),
                Vec2::new(rect.width / count, F::zero()),
                Vec2::new(F::zero(), rect.height),
            )
        };

        let starting = match anchor {
            Anchor::Bottom => Vec2::new(F::zero(), rect.height),
            Anchor::Right => Vec2::new(rect.width, F::zero()),
            Anchor::Top | Anchor::Left => Vec2::zero(),
        };
        // Steps point away from the anchored edge.
        let outward = match anchor {
            Anchor::Bottom | Anchor::Right => -F::one(),
            Anchor::Top | Anchor::Left => F::one(),
        };

        let steps = if dynamic_split && segments > 1 {
            let mut steps = AllocVec::with_capacity(segments);
            let mut step = half.scale(outward);
            for s in 0..segments - 1 {
                steps.push(step);
                if s == segments - 2 {
                    steps.push(step);
                }
                step = step.scale(F::half());
            }
            steps
        } else {
            vec![full.scale(outward); segments]
        };

        StripGeometry {
            starting,
            opposite,
            steps,
            orientation: anchor.orientation(),
        }
    }

    /// Number of segments laid out.
    pub fn segments(&self) -> usize {
        self.steps.len()
    }

    /// Sum of all steps: root-to-tip extent of the strip.
    pub fn span(&self) -> Vec2<F> {
        self.steps.iter().fold(Vec2::zero(), |acc, s| acc + *s)
    }

    /// Rails closer than one unit, or a strip with no extent, cannot hold
    /// a stable quad.
    pub fn is_degenerate(&self) -> bool {
        self.opposite.length() <= F::one()
            || self.span().length().is_near_zero(F::from_f32(1e-6))
    }
}
