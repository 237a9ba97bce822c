//! PSRAM-backed RGB565 framebuffer, flushed to the panel in DMA-sized
//! row chunks.

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::{raw::RawU16, Rgb565},
    prelude::*,
    primitives::Rectangle,
    Pixel,
};

/// Native ST7789 panel dimensions (portrait).
pub const FB_WIDTH: u32 = 240;
pub const FB_HEIGHT: u32 = 320;

/// Number of rows sent per DMA chunk.
pub const CHUNK_LINES: i32 = 40;

/// Full-screen RGB565 buffer in PSRAM. The frame is composed here and
/// pushed out row-chunk by row-chunk through a small internal DMA buffer.
pub struct Framebuffer {
    buf: *mut u16,
    len: usize,
    width: u32,
    height: u32,
    dma_buf: *mut u8,
    dma_bytes: usize,
}

// The raw allocations are owned exclusively by this struct and only
// touched while the GUI lock is held.
unsafe impl Send for Framebuffer {}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let pixels = (width * height) as usize;
        let bytes = pixels * core::mem::size_of::<u16>();
        let ptr = unsafe {
            esp_idf_sys::heap_caps_malloc(bytes, esp_idf_sys::MALLOC_CAP_SPIRAM) as *mut u16
        };
        assert!(!ptr.is_null(), "PSRAM framebuffer alloc failed ({} bytes)", bytes);
        unsafe {
            core::ptr::write_bytes(ptr, 0, pixels);
        }

        let dma_pixels = (width as usize) * (CHUNK_LINES as usize);
        let dma_bytes = dma_pixels * 2;
        let dma_buf = unsafe {
            esp_idf_sys::heap_caps_malloc(
                dma_bytes,
                esp_idf_sys::MALLOC_CAP_DMA
                    | esp_idf_sys::MALLOC_CAP_INTERNAL
                    | esp_idf_sys::MALLOC_CAP_8BIT,
            ) as *mut u8
        };
        assert!(!dma_buf.is_null(), "DMA buffer alloc failed ({} bytes)", dma_bytes);

        Self {
            buf: ptr,
            len: pixels,
            width,
            height,
            dma_buf,
            dma_bytes,
        }
    }

    fn as_slice(&self) -> &[u16] {
        unsafe { core::slice::from_raw_parts(self.buf, self.len) }
    }

    fn as_mut_slice(&mut self) -> &mut [u16] {
        unsafe { core::slice::from_raw_parts_mut(self.buf, self.len) }
    }

    pub fn clear_color(&mut self, color: Rgb565) {
        let raw = RawU16::from(color).into_inner();
        self.as_mut_slice().fill(raw);
    }

    /// Push the whole frame to the panel (big-endian RGB565, chunked).
    pub fn flush_to_panel(&self, panel: esp_idf_sys::esp_lcd_panel_handle_t) {
        let dma_slice = unsafe { core::slice::from_raw_parts_mut(self.dma_buf, self.dma_bytes) };
        let fb = self.as_slice();
        let w = self.width as i32;
        let h = self.height as i32;

        let mut y = 0i32;
        while y < h {
            let y_end = (y + CHUNK_LINES).min(h);
            let mut di = 0usize;
            for row in y..y_end {
                let row_start = (row as usize) * (self.width as usize);
                for x in 0..self.width as usize {
                    let pixel = fb[row_start + x];
                    dma_slice[di] = (pixel >> 8) as u8;
                    dma_slice[di + 1] = (pixel & 0xFF) as u8;
                    di += 2;
                }
            }

            unsafe {
                esp_idf_sys::esp_lcd_panel_draw_bitmap(
                    panel,
                    0,
                    y,
                    w,
                    y_end,
                    dma_slice.as_ptr().cast(),
                );
            }

            y = y_end;
        }
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let w = self.width;
        let h = self.height;
        let buf = self.as_mut_slice();
        for Pixel(point, color) in pixels {
            let x = point.x;
            let y = point.y;
            if x >= 0 && y >= 0 && (x as u32) < w && (y as u32) < h {
                let idx = (y as u32 * w + x as u32) as usize;
                buf[idx] = RawU16::from(color).into_inner();
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let raw = RawU16::from(color).into_inner();
        let display = self.bounding_box();
        let area = area.intersection(&display);
        let w = self.width;
        let buf = self.as_mut_slice();
        for y in area.rows() {
            let row_start = (y as u32 * w) as usize;
            for x in area.columns() {
                buf[row_start + x as usize] = raw;
            }
        }
        Ok(())
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        unsafe {
            esp_idf_sys::heap_caps_free(self.buf.cast());
            esp_idf_sys::heap_caps_free(self.dma_buf.cast());
        }
    }
}
