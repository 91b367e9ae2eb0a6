// Resolves the --gpu selector into a wgpu device once, at startup.
//
//   "0", "1", …        → discrete GPU with that index
//   "cpu"              → wgpu CPU adapter
//   "auto" / "default" → best available adapter
//
// wgpu only looks for the adapter when a device is first used,
// and reports a missing one by panicking. ensure_usable() forces
// that lookup with a one-element tensor and turns the panic into
// TrainError::Device before any data is loaded.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use burn::{
    backend::{wgpu::WgpuDevice, Wgpu},
    tensor::Tensor,
};

use crate::domain::error::TrainError;

pub fn select_device(selector: &str) -> Result<WgpuDevice, TrainError> {
    let selector = selector.trim();
    let device = match selector.to_ascii_lowercase().as_str() {
        "cpu"                  => WgpuDevice::Cpu,
        "" | "auto" | "default" => WgpuDevice::default(),
        other => other
            .parse::<usize>()
            .map(WgpuDevice::DiscreteGpu)
            .map_err(|_| {
                TrainError::Device(format!(
                    "'{selector}' is not a GPU index, 'cpu' or 'auto'"
                ))
            })?,
    };
    tracing::info!("Using WGPU device: {:?}", device);
    Ok(device)
}

/// Allocate and read back a tensor on `device`
pub fn ensure_usable(device: &WgpuDevice) -> Result<(), TrainError> {
    let probe = panic::catch_unwind(AssertUnwindSafe(|| {
        Tensor::<Wgpu, 1>::zeros([1], device).into_data()
    }));
    match probe {
        Ok(_) => Ok(()),
        Err(cause) => Err(TrainError::Device(format!(
            "{device:?} is not available: {}",
            panic_message(cause.as_ref())
        ))),
    }
}

fn panic_message(cause: &(dyn Any + Send)) -> &str {
    cause
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| cause.downcast_ref::<&str>().copied())
        .unwrap_or("adapter initialisation failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpu_index() {
        assert_eq!(select_device("3").unwrap(), WgpuDevice::DiscreteGpu(3));
        assert_eq!(select_device(" 0 ").unwrap(), WgpuDevice::DiscreteGpu(0));
    }

    #[test]
    fn test_named_selectors() {
        assert_eq!(select_device("cpu").unwrap(),  WgpuDevice::Cpu);
        assert_eq!(select_device("auto").unwrap(), WgpuDevice::default());
    }

    #[test]
    fn test_missing_gpu_is_device_error() {
        let device = select_device("999").unwrap();
        assert!(matches!(ensure_usable(&device), Err(TrainError::Device(_))));
    }

    #[test]
    fn test_panic_message_is_recovered() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("no adapter"));
        assert_eq!(panic_message(owned.as_ref()), "no adapter");
        let literal: Box<dyn Any + Send> = Box::new("gone");
        assert_eq!(panic_message(literal.as_ref()), "gone");
        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(other.as_ref()), "adapter initialisation failed");
    }

    #[test]
    fn test_invalid_selector() {
        assert!(matches!(select_device("cuda:x"), Err(TrainError::Device(_))));
        assert!(matches!(select_device("-1"),     Err(TrainError::Device(_))));
    }
}
