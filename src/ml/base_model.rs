use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{MaxPool2d, MaxPool2dConfig},
        Linear, LinearConfig, Relu,
    },
    prelude::*,
};

/// LeNet-style CNN for native 32×32 CIFAR images.
///
/// conv 3→6 (5×5) → relu → pool 2
/// conv 6→16 (5×5) → relu → pool 2
/// linear 16·5·5→120 → relu → linear 120→84 → relu → linear 84→classes
#[derive(Module, Debug)]
pub struct BaseModel<B: Backend> {
    conv1: Conv2d<B>,
    conv2: Conv2d<B>,
    pool:  MaxPool2d,
    fc1:   Linear<B>,
    fc2:   Linear<B>,
    fc3:   Linear<B>,
    relu:  Relu,
}

impl<B: Backend> BaseModel<B> {
    pub fn new(num_classes: usize, device: &B::Device) -> Self {
        Self {
            conv1: Conv2dConfig::new([3, 6], [5, 5]).init(device),
            conv2: Conv2dConfig::new([6, 16], [5, 5]).init(device),
            pool:  MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init(),
            fc1:   LinearConfig::new(16 * 5 * 5, 120).init(device),
            fc2:   LinearConfig::new(120, 84).init(device),
            fc3:   LinearConfig::new(84, num_classes).init(device),
            relu:  Relu::new(),
        }
    }

    /// [batch, 3, 32, 32] → [batch, num_classes]
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.pool.forward(self.relu.forward(self.conv1.forward(x))); // [b, 6, 14, 14]
        let x = self.pool.forward(self.relu.forward(self.conv2.forward(x))); // [b, 16, 5, 5]
        let x = x.flatten::<2>(1, 3);
        let x = self.relu.forward(self.fc1.forward(x));
        let x = self.relu.forward(self.fc2.forward(x));
        self.fc3.forward(x)
    }

    /// Swap the final layer for a fresh one with `num_classes` outputs
    pub fn with_head(mut self, num_classes: usize, device: &B::Device) -> Self {
        self.fc3 = LinearConfig::new(84, num_classes).init(device);
        self
    }

    pub fn num_classes(&self) -> usize {
        self.fc3.weight.val().dims()[1]
    }
}
