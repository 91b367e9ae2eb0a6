// ============================================================
// Layer 5 - AlexNet
// ============================================================
// Same layer layout as torchvision's AlexNet, so ImageNet weights
// converted from it line up one-to-one:
//
//   features:   conv 3→64 11×11/4 p2 → relu → maxpool 3/2
//               conv 64→192 5×5 p2   → relu → maxpool 3/2
//               conv 192→384 3×3 p1  → relu
//               conv 384→256 3×3 p1  → relu
//               conv 256→256 3×3 p1  → relu → maxpool 3/2
//   avgpool:    adaptive 6×6
//   classifier: dropout → linear 9216→4096 → relu
//               dropout → linear 4096→4096 → relu
//               linear 4096→classes
//
// Input is [batch, 3, 224, 224].

use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig, MaxPool2d, MaxPool2dConfig},
        Dropout, DropoutConfig, Linear, LinearConfig, PaddingConfig2d, Relu,
    },
    prelude::*,
};

const HIDDEN: usize = 4096;
const POOLED: usize = 256 * 6 * 6;

#[derive(Module, Debug)]
pub struct AlexNet<B: Backend> {
    conv1:   Conv2d<B>,
    conv2:   Conv2d<B>,
    conv3:   Conv2d<B>,
    conv4:   Conv2d<B>,
    conv5:   Conv2d<B>,
    pool:    MaxPool2d,
    avgpool: AdaptiveAvgPool2d,
    dropout: Dropout,
    fc1:     Linear<B>,
    fc2:     Linear<B>,
    fc3:     Linear<B>,
    relu:    Relu,
}

fn conv<B: Backend>(
    channels: [usize; 2],
    kernel:   usize,
    stride:   usize,
    padding:  usize,
    device:   &B::Device,
) -> Conv2d<B> {
    Conv2dConfig::new(channels, [kernel, kernel])
        .with_stride([stride, stride])
        .with_padding(PaddingConfig2d::Explicit(padding, padding))
        .init(device)
}

impl<B: Backend> AlexNet<B> {
    pub fn new(num_classes: usize, device: &B::Device) -> Self {
        Self {
            conv1:   conv([3, 64], 11, 4, 2, device),
            conv2:   conv([64, 192], 5, 1, 2, device),
            conv3:   conv([192, 384], 3, 1, 1, device),
            conv4:   conv([384, 256], 3, 1, 1, device),
            conv5:   conv([256, 256], 3, 1, 1, device),
            pool:    MaxPool2dConfig::new([3, 3]).with_strides([2, 2]).init(),
            avgpool: AdaptiveAvgPool2dConfig::new([6, 6]).init(),
            dropout: DropoutConfig::new(0.5).init(),
            fc1:     LinearConfig::new(POOLED, HIDDEN).init(device),
            fc2:     LinearConfig::new(HIDDEN, HIDDEN).init(device),
            fc3:     LinearConfig::new(HIDDEN, num_classes).init(device),
            relu:    Relu::new(),
        }
    }

    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.pool.forward(self.relu.forward(self.conv1.forward(x))); // [b, 64, 27, 27]
        let x = self.pool.forward(self.relu.forward(self.conv2.forward(x))); // [b, 192, 13, 13]
        let x = self.relu.forward(self.conv3.forward(x));
        let x = self.relu.forward(self.conv4.forward(x));
        let x = self.pool.forward(self.relu.forward(self.conv5.forward(x))); // [b, 256, 6, 6]
        let x = self.avgpool.forward(x).flatten::<2>(1, 3);                  // [b, 9216]

        let x = self.relu.forward(self.fc1.forward(self.dropout.forward(x)));
        let x = self.relu.forward(self.fc2.forward(self.dropout.forward(x)));
        self.fc3.forward(x)
    }

    /// Swap the final layer for a fresh one with `num_classes` outputs
    pub fn with_head(mut self, num_classes: usize, device: &B::Device) -> Self {
        self.fc3 = LinearConfig::new(HIDDEN, num_classes).init(device);
        self
    }

    pub fn num_classes(&self) -> usize {
        self.fc3.weight.val().dims()[1]
    }
}
