// ============================================================
// Layer 3 - Supported Model Identifiers
// ============================================================
// The closed set of architectures the trainer knows how to build.
// Everything that differs per architecture and is plain data
// (input size, normalisation constants, pretrained head size)
// lives here so the data and ml layers can dispatch on one enum
// instead of comparing strings.

use std::{fmt, str::FromStr};

use crate::domain::error::TrainError;

/// Per-channel normalisation applied after scaling pixels to [0, 1]:
/// `(x - mean[c]) / std[c]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub mean: [f32; 3],
    pub std:  [f32; 3],
}

/// ImageNet statistics, used by models that may start from ImageNet weights
const IMAGENET: Normalization = Normalization {
    mean: [0.485, 0.456, 0.406],
    std:  [0.229, 0.224, 0.225],
};

/// Maps [0, 1] onto [-1, 1]
const SYMMETRIC: Normalization = Normalization {
    mean: [0.5, 0.5, 0.5],
    std:  [0.5, 0.5, 0.5],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelName {
    /// AlexNet on upscaled 224×224 crops
    AlexNet,
    /// Small LeNet-style CNN on native 32×32 images
    BaseModel,
}

impl ModelName {
    pub const ALL: [ModelName; 2] = [ModelName::AlexNet, ModelName::BaseModel];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelName::AlexNet   => "alexnet",
            ModelName::BaseModel => "base-model",
        }
    }

    /// Side length of the square image the model consumes
    pub fn input_size(&self) -> usize {
        match self {
            ModelName::AlexNet   => 224,
            ModelName::BaseModel => 32,
        }
    }

    /// Side length images are rescaled to before center-cropping
    /// to `input_size`. `None` means images are used as-is.
    pub fn resize_to(&self) -> Option<usize> {
        match self {
            ModelName::AlexNet   => Some(256),
            ModelName::BaseModel => None,
        }
    }

    pub fn normalization(&self) -> Normalization {
        match self {
            ModelName::AlexNet   => IMAGENET,
            ModelName::BaseModel => SYMMETRIC,
        }
    }

    /// Number of logits produced by the pretrained weight set
    pub fn pretrained_classes(&self) -> usize {
        match self {
            ModelName::AlexNet   => 1000,
            ModelName::BaseModel => 10,
        }
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelName {
    type Err = TrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelName::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| TrainError::UnsupportedModel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        assert_eq!("alexnet".parse::<ModelName>().unwrap(),    ModelName::AlexNet);
        assert_eq!("base-model".parse::<ModelName>().unwrap(), ModelName::BaseModel);
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let err = "resnet18".parse::<ModelName>().unwrap_err();
        assert!(matches!(err, TrainError::UnsupportedModel(name) if name == "resnet18"));
    }

    #[test]
    fn test_display_round_trips() {
        for model in ModelName::ALL {
            assert_eq!(model.to_string().parse::<ModelName>().unwrap(), model);
        }
    }

    #[test]
    fn test_crop_fits_inside_resize() {
        for model in ModelName::ALL {
            if let Some(resize) = model.resize_to() {
                assert!(model.input_size() <= resize);
            }
        }
    }
}
