use tracing::debug;

use crate::profiler::camera::Resolution;
use crate::profiler::common::error::{ProfilerError, Result};
use crate::profiler::intensity::types::IntensityImage;

/// Rectangle inside an image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Centers `crop` in `source`. Offsets are `(source - crop) / 2`, rounded down, per axis.
pub fn center_crop_region(source: Resolution, crop: Resolution) -> Result<CropRegion> {
    if crop.is_empty() {
        return Err(ProfilerError::InvalidDimensions(crop.width, crop.height));
    }
    if !source.contains(crop) {
        return Err(ProfilerError::CropBoundsError {
            frame: source,
            crop,
        });
    }
    Ok(CropRegion {
        x: (source.width - crop.width) / 2,
        y: (source.height - crop.height) / 2,
        width: crop.width,
        height: crop.height,
    })
}

impl IntensityImage {
    /// Copies `region` out of the image.
    pub fn crop(&self, region: CropRegion) -> Result<IntensityImage> {
        let fits_x = region.x.checked_add(region.width).is_some_and(|end| end <= self.width());
        let fits_y = region.y.checked_add(region.height).is_some_and(|end| end <= self.height());
        if !fits_x || !fits_y {
            return Err(ProfilerError::CropBoundsError {
                frame: self.resolution(),
                crop: Resolution::new(region.width, region.height),
            });
        }

        let mut data = Vec::with_capacity(region.width * region.height);
        for row in self.rows().skip(region.y).take(region.height) {
            data.extend_from_slice(&row[region.x..region.x + region.width]);
        }
        IntensityImage::new(region.width, region.height, data)
    }

    pub fn center_crop(&self, crop: Resolution) -> Result<IntensityImage> {
        let region = center_crop_region(self.resolution(), crop)?;
        debug!(x = region.x, y = region.y, %crop, "Center crop");
        self.crop(region)
    }
}
