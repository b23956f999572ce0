//! GPU adapter, device and queue selection for a window surface.
//!
//! Every pipeline of this crate passes its matrix and color as a [`MatrixColor`] push constant
//! block, so a device is only created if the adapter supports push constants of at least
//! [`MatrixColor::SIZE`] bytes. The device requests exactly that much.

use anyhow::{Context, Result, bail};
use log::info;

use crate::pods::MatrixColor;

const REQUIRED_FEATURES: wgpu::Features = wgpu::Features::PUSH_CONSTANTS;

#[derive(Debug, Clone)]
pub struct RenderDevice {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub alpha_mode: wgpu::CompositeAlphaMode,
}

impl RenderDevice {
    pub async fn for_surface(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'static>,
    ) -> Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::None,
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No GPU adapter can present to the surface")?;
        info!("GPU Adapter: {:?}", adapter.get_info());

        if !adapter.features().contains(REQUIRED_FEATURES) {
            bail!("GPU Adapter does not support {REQUIRED_FEATURES:?}");
        }
        let required_limits = push_constant_limits(&adapter.limits())?;

        let capabilities = surface.get_capabilities(&adapter);
        let surface_format = linear_surface_format(&capabilities.formats)
            .context("Surface is incompatible with the adapter")?;
        let alpha_mode = *capabilities
            .alpha_modes
            .first()
            .context("Surface reports no alpha modes")?;
        info!("- Surface format: {surface_format:?}, alpha mode: {alpha_mode:?}");

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Render Device"),
                required_features: REQUIRED_FEATURES,
                required_limits,
                memory_hints: Default::default(),
                trace: Default::default(),
            })
            .await
            .context("Requesting device")?;

        Ok(Self {
            device,
            queue,
            surface_format,
            alpha_mode,
        })
    }
}

/// The adapter's limits, with the push constant size lowered to what the pipelines use.
fn push_constant_limits(adapter: &wgpu::Limits) -> Result<wgpu::Limits> {
    let available = adapter.max_push_constant_size;
    if available < MatrixColor::SIZE {
        bail!(
            "GPU Adapter supports {available} bytes of push constants, {} required",
            MatrixColor::SIZE
        );
    }
    Ok(wgpu::Limits {
        max_push_constant_size: MatrixColor::SIZE,
        ..adapter.clone()
    })
}

/// Colors are linear, so a non-sRGB format is preferred.
fn linear_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|f| !f.is_srgb())
        .or(formats.first())
        .copied()
}

#[cfg(test)]
mod tests {
    use wgpu::TextureFormat;

    use super::*;

    #[test]
    fn push_constants_must_hold_a_matrix_and_a_color() {
        let none = wgpu::Limits::default();
        assert_eq!(none.max_push_constant_size, 0);
        assert!(push_constant_limits(&none).is_err());

        let adapter = wgpu::Limits {
            max_push_constant_size: 256,
            ..wgpu::Limits::default()
        };
        let required = push_constant_limits(&adapter).unwrap();
        assert_eq!(required.max_push_constant_size, MatrixColor::SIZE);
        assert_eq!(required.max_texture_dimension_2d, adapter.max_texture_dimension_2d);
    }

    #[test]
    fn prefers_linear_surface_formats() {
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        assert_eq!(
            linear_surface_format(&formats),
            Some(TextureFormat::Bgra8Unorm)
        );
        assert_eq!(
            linear_surface_format(&[TextureFormat::Rgba8UnormSrgb]),
            Some(TextureFormat::Rgba8UnormSrgb)
        );
        assert_eq!(linear_surface_format(&[]), None);
    }
}
