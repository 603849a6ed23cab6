use std::{convert::TryFrom, ops::RangeInclusive};

use thiserror::Error;

use crate::models::{Color, PickRadius, Point, RadiusUnit};

use super::PixelReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NeighborhoodError {
    #[error("pixel neighborhoods need an odd amount to have a center pixel, got {0}")]
    EvenPixelAmount(u32),
}

/// Square of pixel offsets sampled around a click point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighborhood {
    max_radius: i64,
    min_radius: i64,
}

impl Neighborhood {
    pub fn new(spec: &PickRadius) -> Result<Self, NeighborhoodError> {
        let amount = spec.amount as i64;

        let max_radius = match spec.unit {
            RadiusUnit::Pixel => {
                if amount % 2 == 0 {
                    return Err(NeighborhoodError::EvenPixelAmount(spec.amount));
                }

                (amount - 1) / 2
            }
            RadiusUnit::Radius => amount,
        };

        Ok(Self {
            max_radius,
            min_radius: -max_radius - 1,
        })
    }

    /// Largest offset from the center, inclusive
    pub fn max_radius(&self) -> i64 {
        self.max_radius
    }

    /// Smallest offset from the center, exclusive
    pub fn min_radius(&self) -> i64 {
        self.min_radius
    }

    /// Number of pixels on each side of the square, saturating at `usize::MAX`
    pub fn side(&self) -> usize {
        usize::try_from(self.max_radius - self.min_radius - 1).unwrap_or(usize::MAX)
    }

    /// Offsets along one axis which land within `[0, len)` once subtracted from `center`
    fn offsets(&self, center: i64, len: u32) -> RangeInclusive<i64> {
        let low = (self.min_radius + 1).max(center - (i64::from(len) - 1));
        let high = self.max_radius.min(center);

        low..=high
    }

    /// Coordinates to sample around `center` on a `width` x `height` bitmap, in sampling order
    ///
    /// Offsets go from `max_radius` down to `min_radius` (exclusive), x-major, and are
    /// subtracted from the center. Offsets landing outside of the bitmap are never visited,
    /// so the cost is bounded by the bitmap size whatever the radius.
    pub fn coordinates(
        &self,
        center: Point,
        width: u32,
        height: u32,
    ) -> impl Iterator<Item = (u32, u32)> {
        let (cx, cy) = (i64::from(center.x), i64::from(center.y));
        let xs = self.offsets(cx, width);
        let ys = self.offsets(cy, height);

        xs.rev()
            .flat_map(move |x| ys.clone().rev().map(move |y| (cx - x, cy - y)))
            .filter_map(|(x, y)| Some((u32::try_from(x).ok()?, u32::try_from(y).ok()?)))
    }

    /// Reads the neighborhood of `center` from `image`
    ///
    /// Coordinates the reader has no pixel for are skipped.
    pub fn gather(&self, image: &impl PixelReader, center: Point) -> Vec<Color> {
        let (width, height) = (image.width(), image.height());
        let (cx, cy) = (i64::from(center.x), i64::from(center.y));
        let columns = range_len(&self.offsets(cx, width));
        let rows = range_len(&self.offsets(cy, height));
        let mut samples = Vec::with_capacity(columns.saturating_mul(rows));

        for (x, y) in self.coordinates(center, width, height) {
            match image.color_at(x, y) {
                Some(color) => samples.push(color),
                None => trace!(x, y, "sample outside of the bitmap"),
            }
        }

        samples
    }
}

fn range_len(range: &RangeInclusive<i64>) -> usize {
    usize::try_from(range.end() - range.start() + 1).unwrap_or(0)
}
