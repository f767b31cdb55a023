use crate::config::TrackerConfig;
use marker_vision::{AcquireError, CommandSink, SinkError};
use serialport::SerialPort;
use std::io::Write;
use tracing::{info, warn};

/// Newline-delimited command transport over a serial port.
pub struct SerialSink {
    port: Option<Box<dyn SerialPort>>,
    name: String,
}

impl SerialSink {
    /// Opens the port, then waits out the receiver's reset before returning.
    pub fn open(config: &TrackerConfig) -> Result<Self, AcquireError> {
        let port = serialport::new(&config.serial_port, config.baud_rate)
            .timeout(config.write_timeout())
            .open()
            .map_err(|err| AcquireError::SinkUnavailable(format!("{}: {err}", config.serial_port)))?;

        // Opening the port toggles DTR, which resets most USB microcontrollers.
        std::thread::sleep(config.settle_delay());
        info!("connected to {} @ {}bps", config.serial_port, config.baud_rate);

        Ok(Self {
            port: Some(port),
            name: config.serial_port.clone(),
        })
    }
}

impl CommandSink for SerialSink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        let port = self
            .port
            .as_mut()
            .ok_or_else(|| SinkError::Write(format!("{} is closed", self.name)))?;
        port.write_all(bytes)?;
        Ok(())
    }

    fn close(&mut self) {
        if let Some(mut port) = self.port.take() {
            if let Err(err) = port.flush() {
                warn!("flushing {} before close failed: {err}", self.name);
            }
            info!("closed {}", self.name);
        }
    }
}
