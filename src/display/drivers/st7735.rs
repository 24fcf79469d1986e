/*
 *  display/drivers/st7735.rs
 *
 *  panel-server - one panel, many frames
 *  (c) 2020-26 Stuart Hunter
 *
 *  ST7735 TFT panel on the Linux spidev and GPIO character devices
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use linux_embedded_hal::{
    gpio_cdev::{Chip, LineRequestFlags},
    spidev::{SpiModeFlags, SpidevOptions},
    CdevPin, Delay, SpidevDevice,
};
use st7735_lcd::{Orientation, ST7735};

use embedded_graphics::pixelcolor::raw::{RawData, RawU16};
use embedded_graphics::pixelcolor::Rgb565;

use std::path::Path;

use crate::constants::{
    BL_PIN, COLOR_ORDER, DC_PIN, GPIO_CHIP, INVERT, OFFSET_LEFT, OFFSET_TOP, PANEL_HEIGHT,
    PANEL_WIDTH, ROTATION_DEG, RST_PIN, SPI_BUS, SPI_SPEED_HZ,
};
use crate::display::error::DisplayError;
use crate::display::framebuffer::PixelBuffer;
use crate::display::traits::{check_frame, ColorOrder, DisplayCapabilities, PanelDriver};

use log::{debug, info};

/// ST7735 display driver wrapper
pub struct St7735Driver {
    /// The underlying st7735 driver
    lcd: ST7735<SpidevDevice, CdevPin, CdevPin>,

    /// Held so the backlight line stays claimed (and lit) while we run
    backlight: Option<CdevPin>,

    /// Display capabilities
    capabilities: DisplayCapabilities,
}

impl St7735Driver {
    /// Open the SPI bus and claim the control lines
    ///
    /// Missing device nodes mean the kernel side of the driver is absent
    /// and are reported as `DriverUnavailable`; anything failing after
    /// that is `DeviceUnreachable`.
    pub fn open() -> Result<Self, DisplayError> {
        info!("Opening ST7735 on {} (DC {}, RST {}, BL {})", SPI_BUS, DC_PIN, RST_PIN, BL_PIN);

        for node in [SPI_BUS, GPIO_CHIP] {
            if !Path::new(node).exists() {
                return Err(DisplayError::DriverUnavailable(format!(
                    "{} not found (is SPI enabled and the spidev/gpio driver loaded?)",
                    node
                )));
            }
        }

        let mut spi = SpidevDevice::open(SPI_BUS)
            .map_err(|e| DisplayError::DeviceUnreachable(format!("opening {}: {}", SPI_BUS, e)))?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(SPI_SPEED_HZ)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.configure(&options)
            .map_err(|e| DisplayError::DeviceUnreachable(format!("configuring {}: {}", SPI_BUS, e)))?;

        let mut chip = Chip::new(GPIO_CHIP)
            .map_err(|e| DisplayError::DeviceUnreachable(format!("opening {}: {}", GPIO_CHIP, e)))?;
        let dc = output_pin(&mut chip, DC_PIN, 0, "panel-server-dc")?;
        let rst = output_pin(&mut chip, RST_PIN, 0, "panel-server-rst")?;
        let backlight = output_pin(&mut chip, BL_PIN, 1, "panel-server-bl")?;

        let capabilities = DisplayCapabilities {
            width: PANEL_WIDTH,
            height: PANEL_HEIGHT,
            color_order: COLOR_ORDER,
            rotation_deg: ROTATION_DEG,
            inverted: INVERT,
        };

        let lcd = ST7735::new(
            spi,
            dc,
            rst,
            capabilities.color_order == ColorOrder::Rgb,
            capabilities.inverted,
            PANEL_WIDTH,
            PANEL_HEIGHT,
        );

        Ok(Self {
            lcd,
            backlight: Some(backlight),
            capabilities,
        })
    }
}

fn output_pin(chip: &mut Chip, line: u32, default: u8, consumer: &str) -> Result<CdevPin, DisplayError> {
    let handle = chip
        .get_line(line)
        .and_then(|l| l.request(LineRequestFlags::OUTPUT, default, consumer))
        .map_err(|e| line_unreachable(line, consumer, e))?;
    CdevPin::new(handle).map_err(|e| line_unreachable(line, consumer, e))
}

fn line_unreachable(line: u32, consumer: &str, err: impl std::fmt::Display) -> DisplayError {
    DisplayError::DeviceUnreachable(format!("{} line {} ({}): {}", GPIO_CHIP, line, consumer, err))
}

fn orientation(rotation_deg: u16) -> Result<Orientation, DisplayError> {
    match rotation_deg {
        0 => Ok(Orientation::Portrait),
        90 => Ok(Orientation::Landscape),
        180 => Ok(Orientation::PortraitSwapped),
        270 => Ok(Orientation::LandscapeSwapped),
        other => Err(DisplayError::DeviceUnreachable(format!(
            "rotation {} (must be 0, 90, 180, or 270)",
            other
        ))),
    }
}

impl PanelDriver for St7735Driver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        let mut delay = Delay;
        self.lcd.init(&mut delay)
            .map_err(|_| DisplayError::DeviceUnreachable("ST7735 init sequence failed".to_string()))?;
        self.lcd.set_orientation(&orientation(self.capabilities.rotation_deg)?)
            .map_err(|_| DisplayError::DeviceUnreachable("ST7735 orientation failed".to_string()))?;
        self.lcd.set_offset(OFFSET_LEFT, OFFSET_TOP);

        info!("ST7735 initialized {}x{}", self.capabilities.width, self.capabilities.height);
        Ok(())
    }

    fn render(&mut self, frame: &PixelBuffer) -> Result<(), DisplayError> {
        check_frame(&self.capabilities, frame)?;

        let (w, h) = self.dimensions();
        let colors = frame
            .as_slice()
            .iter()
            .map(|&c| RawU16::from(Rgb565::from(c)).into_inner());

        // one address window covering the panel, one burst of pixels
        self.lcd
            .set_pixels(0, 0, (w - 1) as u16, (h - 1) as u16, colors)
            .map_err(|_| DisplayError::SpiError("frame transfer failed".to_string()))?;

        debug!("frame written ({}x{})", w, h);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), DisplayError> {
        // dropping the handle releases the line back to the kernel
        self.backlight.take();
        info!("ST7735 released");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_table() {
        assert!(matches!(orientation(0), Ok(Orientation::Portrait)));
        assert!(matches!(orientation(270), Ok(Orientation::LandscapeSwapped)));
    }

    #[test]
    fn test_bad_rotation_is_unreachable() {
        let Err(err) = orientation(45) else {
            panic!("rotation 45 accepted");
        };
        assert!(matches!(err, DisplayError::DeviceUnreachable(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_line_failure_is_unreachable() {
        let err = line_unreachable(DC_PIN, "panel-server-dc", "Device or resource busy");
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "Display device unreachable: /dev/gpiochip0 line 25 (panel-server-dc): Device or resource busy"
        );
    }
}
