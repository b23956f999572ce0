use std::mem::size_of;

use bytemuck::Pod;
use log::debug;

/// A vertex buffer that is fully replaced on every upload and grows in powers of two.
#[derive(Debug)]
pub struct DynamicBuffer {
    label: &'static str,
    buffer: wgpu::Buffer,
    /// Number of elements the buffer can hold.
    capacity: usize,
    /// Number of elements of the last upload.
    len: usize,
}

impl DynamicBuffer {
    pub fn new<T: Pod>(device: &wgpu::Device, label: &'static str, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            label,
            buffer: Self::create_buffer::<T>(device, label, capacity),
            capacity,
            len: 0,
        }
    }

    /// Replaces the buffer contents with `elements`.
    pub fn upload<T: Pod>(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, elements: &[T]) {
        self.len = elements.len();
        if elements.is_empty() {
            return;
        }

        if elements.len() > self.capacity {
            let proposed = Self::grown_capacity(self.capacity, elements.len());
            debug!(
                "Growing {} from {} to {proposed} elements, required: {}",
                self.label,
                self.capacity,
                elements.len()
            );
            self.buffer = Self::create_buffer::<T>(device, self.label, proposed);
            self.capacity = proposed;
        }

        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(elements));
    }

    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn grown_capacity(current: usize, required: usize) -> usize {
        let mut proposed = current.max(1) << 1;
        while proposed < required {
            proposed <<= 1;
            assert!(proposed != 0);
        }
        proposed
    }

    fn create_buffer<T: Pod>(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * size_of::<T>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::DynamicBuffer;

    #[test]
    fn grows_in_powers_of_two() {
        assert_eq!(DynamicBuffer::grown_capacity(1, 2), 2);
        assert_eq!(DynamicBuffer::grown_capacity(4, 5), 8);
        assert_eq!(DynamicBuffer::grown_capacity(4, 100), 128);
        assert_eq!(DynamicBuffer::grown_capacity(0, 1), 2);
    }
}
