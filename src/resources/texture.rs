use crate::data_structures::{model, texture};

/// Layout of every textured material: a filterable 2D texture at binding 0
/// and its sampler at binding 1.
pub fn diffuse_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("diffuse_bind_group_layout"),
    })
}

/// Upload `image` and wrap it as a material bound to [`diffuse_layout`].
pub fn material_from_image(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &image::RgbaImage,
    name: &str,
    address_mode: wgpu::AddressMode,
) -> model::Material {
    let texture = texture::Texture::from_rgba(device, queue, image, name, address_mode);
    model::Material::new(device, name, texture, &diffuse_layout(device))
}

/// The size a `width` x `height` image shrinks to so that neither side
/// exceeds `max_side`, keeping its aspect ratio. `None` if it already fits.
pub fn fitted_size(width: u32, height: u32, max_side: u32) -> Option<(u32, u32)> {
    let max_side = max_side.max(1);
    let longest = width.max(height);
    if longest <= max_side {
        return None;
    }
    let scale = max_side as f64 / longest as f64;
    let fit = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, max_side);
    Some((fit(width), fit(height)))
}

/// A downscaled copy of `image` if it is too large to upload as one texture.
pub fn fit_to_limit(image: &image::RgbaImage, max_side: u32) -> Option<image::RgbaImage> {
    let (width, height) = fitted_size(image.width(), image.height(), max_side)?;
    log::warn!(
        "Image of {}x{} exceeds the {} px texture limit, scaling it to {}x{}",
        image.width(),
        image.height(),
        max_side,
        width,
        height
    );
    Some(image::imageops::resize(
        image,
        width,
        height,
        image::imageops::FilterType::Triangle,
    ))
}
