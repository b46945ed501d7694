use std::fmt;

/// What the selected adapter is, and the limits that matter for vertex input.
///
/// Logged once at startup; available to applications through [`super::Gpu::info`].
#[derive(Debug, Clone)]
pub struct GpuInfo {
    pub name: String,
    /// PCI vendor id, 0 when the backend does not report one.
    pub vendor: u32,
    pub backend: wgpu::Backend,
    pub device_type: wgpu::DeviceType,
    pub driver: String,
    pub driver_info: String,
    pub features: wgpu::Features,
    pub max_vertex_attributes: u32,
    pub max_vertex_buffer_array_stride: u32,
    pub max_buffer_size: u64,
}

impl GpuInfo {
    pub fn new(adapter: &wgpu::AdapterInfo, features: wgpu::Features, limits: &wgpu::Limits) -> Self {
        Self {
            name: adapter.name.clone(),
            vendor: adapter.vendor,
            backend: adapter.backend,
            device_type: adapter.device_type,
            driver: adapter.driver.clone(),
            driver_info: adapter.driver_info.clone(),
            features,
            max_vertex_attributes: limits.max_vertex_attributes,
            max_vertex_buffer_array_stride: limits.max_vertex_buffer_array_stride,
            max_buffer_size: limits.max_buffer_size,
        }
    }
}

impl fmt::Display for GpuInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?}, {:?})", self.name, self.backend, self.device_type)?;
        if self.vendor != 0 {
            write!(f, ", vendor {:#06x}", self.vendor)?;
        }
        if !self.driver.is_empty() {
            write!(f, ", driver {}", self.driver)?;
            if !self.driver_info.is_empty() {
                write!(f, " {}", self.driver_info)?;
            }
        }
        Ok(())
    }
}
