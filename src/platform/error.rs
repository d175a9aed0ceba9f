//! Platform error types
//!
//! This module defines error types for platform operations.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
///
/// All platform implementations map their HAL-specific errors to these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlatformError {
    /// EEPROM operation failed
    Eeprom(EepromError),
    /// GPIO operation failed
    Gpio(GpioError),
    /// Invalid configuration provided
    InvalidConfig,
}

/// EEPROM-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EepromError {
    /// Address (or address + length) outside the device
    InvalidAddress,
    /// Read operation failed
    ReadFailed,
    /// Write operation failed
    WriteFailed,
}

/// GPIO-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Invalid mode for operation
    InvalidMode,
}

impl From<EepromError> for PlatformError {
    fn from(e: EepromError) -> Self {
        PlatformError::Eeprom(e)
    }
}

impl From<GpioError> for PlatformError {
    fn from(e: GpioError) -> Self {
        PlatformError::Gpio(e)
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Eeprom(e) => write!(f, "EEPROM error: {:?}", e),
            PlatformError::Gpio(e) => write!(f, "GPIO error: {:?}", e),
            PlatformError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eeprom_error_conversion() {
        let err: PlatformError = EepromError::InvalidAddress.into();
        assert_eq!(err, PlatformError::Eeprom(EepromError::InvalidAddress));
    }

    #[test]
    fn test_gpio_error_conversion() {
        let err: PlatformError = GpioError::InvalidMode.into();
        assert_eq!(format!("{}", err), "GPIO error: InvalidMode");
    }

    #[test]
    fn test_display() {
        let err = PlatformError::Eeprom(EepromError::WriteFailed);
        assert_eq!(format!("{}", err), "EEPROM error: WriteFailed");
        assert_eq!(
            format!("{}", PlatformError::InvalidConfig),
            "Invalid configuration"
        );
    }
}
