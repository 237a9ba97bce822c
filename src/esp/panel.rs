//! ST7789 panel bring-up over 4-wire SPI.

use anyhow::Result;
use log::info;

use super::esp_check;
use super::framebuffer::{CHUNK_LINES, FB_WIDTH};

// ── SPI ─────────────────────────────────────────────────────────────
const PCLK_HZ: u32 = 40_000_000;

// ── Pins ────────────────────────────────────────────────────────────
const PIN_LCD_SCLK: i32 = 18;
const PIN_LCD_MOSI: i32 = 23;
const PIN_LCD_CS: i32 = 5;
const PIN_LCD_DC: i32 = 2;
const PIN_LCD_RST: i32 = 4;
const PIN_LCD_BL: i32 = 32;

/// Live panel handles. The IO handle stays owned here so the bus outlives
/// every draw call.
pub struct Panel {
    #[allow(dead_code)]
    io: esp_idf_sys::esp_lcd_panel_io_handle_t,
    pub panel: esp_idf_sys::esp_lcd_panel_handle_t,
}

// Handles are only used from inside the GUI lock once bring-up is done.
unsafe impl Send for Panel {}

pub fn init_panel() -> Result<Panel> {
    let mut bus_cfg = esp_idf_sys::spi_bus_config_t::default();
    bus_cfg.__bindgen_anon_1.mosi_io_num = PIN_LCD_MOSI;
    bus_cfg.__bindgen_anon_2.miso_io_num = -1;
    bus_cfg.__bindgen_anon_3.quadwp_io_num = -1;
    bus_cfg.__bindgen_anon_4.quadhd_io_num = -1;
    bus_cfg.sclk_io_num = PIN_LCD_SCLK;
    bus_cfg.max_transfer_sz = (FB_WIDTH as i32) * CHUNK_LINES * 2;

    let host = esp_idf_sys::spi_host_device_t_SPI2_HOST;
    esp_check(
        unsafe {
            esp_idf_sys::spi_bus_initialize(
                host,
                &bus_cfg,
                esp_idf_sys::spi_common_dma_t_SPI_DMA_CH_AUTO,
            )
        },
        "spi_bus_initialize",
    )?;

    let mut io: esp_idf_sys::esp_lcd_panel_io_handle_t = std::ptr::null_mut();
    let io_cfg = esp_idf_sys::esp_lcd_panel_io_spi_config_t {
        cs_gpio_num: PIN_LCD_CS,
        dc_gpio_num: PIN_LCD_DC,
        spi_mode: 0,
        pclk_hz: PCLK_HZ,
        trans_queue_depth: 10,
        on_color_trans_done: None,
        user_ctx: std::ptr::null_mut(),
        lcd_cmd_bits: 8,
        lcd_param_bits: 8,
        flags: esp_idf_sys::esp_lcd_panel_io_spi_config_t__bindgen_ty_1 {
            _bitfield_align_1: [],
            _bitfield_1: esp_idf_sys::esp_lcd_panel_io_spi_config_t__bindgen_ty_1::new_bitfield_1(
                0, 0, 0, 0, 0, 0, 0, 0,
            ),
            __bindgen_padding_0: [0; 3],
        },
    };
    esp_check(
        unsafe {
            esp_idf_sys::esp_lcd_new_panel_io_spi(
                host as esp_idf_sys::esp_lcd_spi_bus_handle_t,
                &io_cfg,
                &mut io,
            )
        },
        "esp_lcd_new_panel_io_spi",
    )?;

    let mut panel: esp_idf_sys::esp_lcd_panel_handle_t = std::ptr::null_mut();
    let panel_cfg = esp_idf_sys::esp_lcd_panel_dev_config_t {
        reset_gpio_num: PIN_LCD_RST,
        __bindgen_anon_1: esp_idf_sys::esp_lcd_panel_dev_config_t__bindgen_ty_1 {
            rgb_ele_order: esp_idf_sys::lcd_rgb_element_order_t_LCD_RGB_ELEMENT_ORDER_RGB,
        },
        data_endian: esp_idf_sys::lcd_rgb_data_endian_t_LCD_RGB_DATA_ENDIAN_BIG,
        bits_per_pixel: 16,
        flags: esp_idf_sys::esp_lcd_panel_dev_config_t__bindgen_ty_2 {
            _bitfield_align_1: [],
            _bitfield_1: esp_idf_sys::esp_lcd_panel_dev_config_t__bindgen_ty_2::new_bitfield_1(0),
            __bindgen_padding_0: [0; 3],
        },
        vendor_config: std::ptr::null_mut(),
    };
    esp_check(
        unsafe { esp_idf_sys::esp_lcd_new_panel_st7789(io, &panel_cfg, &mut panel) },
        "esp_lcd_new_panel_st7789",
    )?;

    esp_check(
        unsafe { esp_idf_sys::esp_lcd_panel_reset(panel) },
        "panel_reset",
    )?;
    esp_check(
        unsafe { esp_idf_sys::esp_lcd_panel_init(panel) },
        "panel_init",
    )?;
    // This module's glass needs inversion for correct colors.
    esp_check(
        unsafe { esp_idf_sys::esp_lcd_panel_invert_color(panel, true) },
        "panel_invert_color",
    )?;
    esp_check(
        unsafe { esp_idf_sys::esp_lcd_panel_disp_on_off(panel, true) },
        "disp_on",
    )?;

    info!("Display initialized OK");
    Ok(Panel { io, panel })
}

pub fn enable_backlight() {
    unsafe {
        let io_conf = esp_idf_sys::gpio_config_t {
            pin_bit_mask: 1u64 << (PIN_LCD_BL as u64),
            mode: esp_idf_sys::gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: esp_idf_sys::gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: esp_idf_sys::gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: esp_idf_sys::gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        esp_idf_sys::gpio_config(&io_conf);
        esp_idf_sys::gpio_set_level(PIN_LCD_BL, 1);
    }
    info!("Backlight ON");
}
