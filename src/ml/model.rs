// ============================================================
// Layer 5 - Classifier and Model Factory
// ============================================================
// `Classifier` is a closed enum over every supported
// architecture. Deriving Module on the enum lets the optimizer,
// recorder and valid() treat it like any single Burn module, while
// forward() dispatches to the concrete network.
//
// ModelFactory turns a model name into a ready-to-train Classifier:
//
//   "alexnet"    → AlexNet   (224×224 input)
//   "base-model" → BaseModel (32×32 input)
//   anything else → TrainError::UnsupportedModel
//
// With pretrained = true the network is first built with the
// pretrained head size, weights are loaded through WeightStore,
// and the final linear layer is replaced when the class count
// differs.

use burn::prelude::*;

use crate::domain::{error::TrainError, model_name::ModelName};
use crate::infra::weights::WeightStore;
use crate::ml::{alexnet::AlexNet, base_model::BaseModel};

#[derive(Module, Debug)]
pub enum Classifier<B: Backend> {
    AlexNet(AlexNet<B>),
    BaseModel(BaseModel<B>),
}

impl<B: Backend> Classifier<B> {
    /// Freshly initialised network producing `num_classes` logits
    pub fn init(model: ModelName, num_classes: usize, device: &B::Device) -> Self {
        match model {
            ModelName::AlexNet   => Classifier::AlexNet(AlexNet::new(num_classes, device)),
            ModelName::BaseModel => Classifier::BaseModel(BaseModel::new(num_classes, device)),
        }
    }

    /// images: [batch, 3, side, side] → logits: [batch, num_classes]
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        match self {
            Classifier::AlexNet(m)   => m.forward(images),
            Classifier::BaseModel(m) => m.forward(images),
        }
    }

    pub fn with_head(self, num_classes: usize, device: &B::Device) -> Self {
        match self {
            Classifier::AlexNet(m)   => Classifier::AlexNet(m.with_head(num_classes, device)),
            Classifier::BaseModel(m) => Classifier::BaseModel(m.with_head(num_classes, device)),
        }
    }

    pub fn num_classes(&self) -> usize {
        match self {
            Classifier::AlexNet(m)   => m.num_classes(),
            Classifier::BaseModel(m) => m.num_classes(),
        }
    }

    pub fn model_name(&self) -> ModelName {
        match self {
            Classifier::AlexNet(_)   => ModelName::AlexNet,
            Classifier::BaseModel(_) => ModelName::BaseModel,
        }
    }
}

pub struct ModelFactory {
    weights: WeightStore,
}

impl ModelFactory {
    pub fn new(weights: WeightStore) -> Self {
        Self { weights }
    }

    pub fn build<B: Backend>(
        &self,
        model_name:  &str,
        num_classes: usize,
        pretrained:  bool,
        device:      &B::Device,
    ) -> Result<Classifier<B>, TrainError> {
        let model: ModelName = model_name.parse()?;

        let classifier = if pretrained {
            let base = Classifier::init(model, model.pretrained_classes(), device);
            let base = self.weights.load(base, device)?;
            if base.num_classes() == num_classes {
                base
            } else {
                tracing::info!(
                    "Replacing {} head: {} → {} classes",
                    model, base.num_classes(), num_classes
                );
                base.with_head(num_classes, device)
            }
        } else {
            Classifier::init(model, num_classes, device)
        };

        tracing::info!(
            "Model ready: {} ({} parameters, {} classes, pretrained={})",
            model, classifier.num_params(), num_classes, pretrained
        );
        Ok(classifier)
    }
}
