// ============================================================
// Layer 4 - Per-model Image Transform
// ============================================================
// Turns a raw CIFAR-10 image into the normalised CHW float
// vector a particular model expects:
//
//   alexnet:    resize 32→256, center-crop 224, scale to [0,1],
//               normalise with ImageNet mean/std
//   base-model: scale to [0,1], normalise to [-1,1]
//
// Resizing uses bilinear filtering (FilterType::Triangle).

use image::{imageops, imageops::FilterType, Rgb, RgbImage};

use crate::domain::{
    model_name::{ModelName, Normalization},
    traits::RawImage,
};

const PLANE: usize = RawImage::SIDE * RawImage::SIDE;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageTransform {
    resize_to: Option<usize>,
    crop:      usize,
    norm:      Normalization,
}

impl ImageTransform {
    pub fn for_model(model: ModelName) -> Self {
        Self {
            resize_to: model.resize_to(),
            crop:      model.input_size(),
            norm:      model.normalization(),
        }
    }

    /// Side length of the square output image
    pub fn output_side(&self) -> usize {
        self.crop
    }

    /// Apply the transform, returning `3 * side * side` floats in CHW order
    pub fn apply(&self, raw: &RawImage) -> Vec<f32> {
        match self.resize_to {
            None if self.crop == RawImage::SIDE => self.normalise_planar(&raw.pixels),
            _ => {
                let resized = self.resize_and_crop(raw);
                self.normalise_rgb(&resized)
            }
        }
    }

    fn normalise_planar(&self, pixels: &[u8]) -> Vec<f32> {
        pixels
            .iter()
            .enumerate()
            .map(|(i, &p)| self.normalise(i / PLANE, p))
            .collect()
    }

    fn resize_and_crop(&self, raw: &RawImage) -> RgbImage {
        let side = RawImage::SIDE as u32;
        let p    = &raw.pixels;
        let img  = RgbImage::from_fn(side, side, |x, y| {
            let i = (y * side + x) as usize;
            Rgb([p[i], p[PLANE + i], p[2 * PLANE + i]])
        });

        let scaled = match self.resize_to {
            Some(s) => imageops::resize(&img, s as u32, s as u32, FilterType::Triangle),
            None    => img,
        };

        let crop   = self.crop as u32;
        let left   = scaled.width().saturating_sub(crop) / 2;
        let top    = scaled.height().saturating_sub(crop) / 2;
        imageops::crop_imm(&scaled, left, top, crop, crop).to_image()
    }

    fn normalise_rgb(&self, img: &RgbImage) -> Vec<f32> {
        let (w, h) = img.dimensions();
        let plane  = (w * h) as usize;
        let mut out = vec![0.0f32; 3 * plane];
        for (x, y, pixel) in img.enumerate_pixels() {
            let i = (y * w + x) as usize;
            for c in 0..3 {
                out[c * plane + i] = self.normalise(c, pixel[c]);
            }
        }
        out
    }

    fn normalise(&self, channel: usize, value: u8) -> f32 {
        (value as f32 / 255.0 - self.norm.mean[channel]) / self.norm.std[channel]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(r: u8, g: u8, b: u8) -> RawImage {
        let mut pixels = vec![r; PLANE];
        pixels.extend(vec![g; PLANE]);
        pixels.extend(vec![b; PLANE]);
        RawImage::new(pixels, 0)
    }

    #[test]
    fn test_base_model_maps_to_unit_range() {
        let t   = ImageTransform::for_model(ModelName::BaseModel);
        let out = t.apply(&flat(0, 255, 0));
        assert_eq!(out.len(), 3 * 32 * 32);
        assert!((out[0] + 1.0).abs() < 1e-6);          // red 0   → -1
        assert!((out[PLANE] - 1.0).abs() < 1e-6);      // green 255 → 1
        assert!((out[2 * PLANE] + 1.0).abs() < 1e-6);  // blue 0  → -1
    }

    #[test]
    fn test_alexnet_output_is_224_square() {
        let t   = ImageTransform::for_model(ModelName::AlexNet);
        let out = t.apply(&flat(255, 128, 0));
        assert_eq!(t.output_side(), 224);
        assert_eq!(out.len(), 3 * 224 * 224);

        // A flat image stays flat through resize + crop (within one u8 step)
        let step  = 1.0 / 255.0 / 0.225;
        let red   = (1.0 - 0.485) / 0.229;
        let blue  = (0.0 - 0.406) / 0.225;
        let plane = 224 * 224;
        assert!(out[..plane].iter().all(|v| (v - red).abs() <= step));
        assert!(out[2 * plane..].iter().all(|v| (v - blue).abs() <= step));
    }

    #[test]
    fn test_planar_layout_is_preserved() {
        let t = ImageTransform::for_model(ModelName::BaseModel);
        let mut raw = flat(0, 0, 0);
        raw.pixels[5] = 255; // red channel, pixel (5, 0)
        let out = t.apply(&raw);
        assert!((out[5] - 1.0).abs() < 1e-6);
        assert!((out[PLANE + 5] + 1.0).abs() < 1e-6);
    }
}
